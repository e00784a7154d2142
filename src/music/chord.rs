// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord qualities and Roman-numeral chord resolution.
//!
//! A chord token is a Roman numeral naming the scale degree, optionally
//! followed by `:` and an explicit quality, e.g. `IV` or `ii:min7`.
//! Resolution is forgiving: an unknown quality falls back to the mode's
//! diatonic quality, and an unknown numeral falls back to a major chord on
//! the tonic.

use std::fmt;

use tracing::warn;

use super::scale::{Mode, DEGREES};

/// Chord qualities available for explicit overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    /// Major triad
    Maj,
    /// Minor triad
    Min,
    /// Diminished triad
    Dim,
    /// Augmented triad
    Aug,
    /// Dominant seventh
    Dom7,
    /// Major seventh
    Maj7,
    /// Minor seventh
    Min7,
}

impl ChordQuality {
    /// All qualities, in the order they are listed to users
    pub const ALL: [ChordQuality; 7] = [
        ChordQuality::Maj,
        ChordQuality::Min,
        ChordQuality::Dim,
        ChordQuality::Aug,
        ChordQuality::Dom7,
        ChordQuality::Maj7,
        ChordQuality::Min7,
    ];

    /// Semitone offsets of the chord tones above the root
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Maj => &[0, 4, 7],
            ChordQuality::Min => &[0, 3, 7],
            ChordQuality::Dim => &[0, 3, 6],
            ChordQuality::Aug => &[0, 4, 8],
            ChordQuality::Dom7 => &[0, 4, 7, 10],
            ChordQuality::Maj7 => &[0, 4, 7, 11],
            ChordQuality::Min7 => &[0, 3, 7, 10],
        }
    }

    /// Short name as written in chord tokens
    pub fn name(self) -> &'static str {
        match self {
            ChordQuality::Maj => "maj",
            ChordQuality::Min => "min",
            ChordQuality::Dim => "dim",
            ChordQuality::Aug => "aug",
            ChordQuality::Dom7 => "7",
            ChordQuality::Maj7 => "maj7",
            ChordQuality::Min7 => "min7",
        }
    }

    /// Look up a quality by its short name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        ChordQuality::ALL.into_iter().find(|q| q.name() == s)
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Roman numerals I-VII, indexed by 0-based scale degree
const NUMERALS: [&str; DEGREES] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// 0-based scale degree for a Roman numeral (case-insensitive)
pub fn parse_numeral(numeral: &str) -> Option<usize> {
    let numeral = numeral.trim().to_uppercase();
    NUMERALS.iter().position(|&n| n == numeral)
}

/// Roman numeral for a 0-based degree, taken modulo 7
pub fn numeral(degree: usize) -> &'static str {
    NUMERALS[degree % DEGREES]
}

/// A chord token resolved against a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedChord {
    /// 0-based scale degree (0-6)
    pub degree: usize,
    /// Quality after applying the override or the diatonic default
    pub quality: ChordQuality,
}

impl ResolvedChord {
    /// Semitone offsets of the chord tones
    pub fn intervals(&self) -> &'static [u8] {
        self.quality.intervals()
    }
}

impl fmt::Display for ResolvedChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", numeral(self.degree), self.quality)
    }
}

/// Resolve a chord token such as `"IV"` or `"ii:maj7"` in the given mode.
///
/// Never fails. An unrecognized quality override yields the diatonic
/// quality of the degree, and an unrecognized numeral yields degree 0 with
/// a major quality.
pub fn resolve_chord(token: &str, mode: Mode) -> ResolvedChord {
    let mut parts = token.split(':');
    let numeral_part = parts.next().unwrap_or_default();
    let quality_part = parts.next();

    let Some(degree) = parse_numeral(numeral_part) else {
        warn!(token, "unrecognized roman numeral, using I:maj");
        return ResolvedChord {
            degree: 0,
            quality: ChordQuality::Maj,
        };
    };

    let quality = quality_part
        .and_then(ChordQuality::parse)
        .unwrap_or_else(|| mode.quality_at(degree));

    ResolvedChord { degree, quality }
}
