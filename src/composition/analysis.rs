// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Modal analysis summary for a composition.

use std::fmt;

use super::phrase::Phrase;
use crate::music::chord::{resolve_chord, ChordQuality};
use crate::music::scale::{Mode, DEGREES};

/// Breakdown of one phrase
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseBreakdown {
    /// 1-based scale degree
    pub degree: usize,
    /// Resolved chord quality
    pub quality: ChordQuality,
    /// Number of chord repetitions
    pub length: u32,
    /// Beats the phrase occupies
    pub beats: f64,
    /// Rhythm as written
    pub rhythm: String,
}

/// Mode characteristics plus a per-phrase breakdown
#[derive(Debug, Clone, PartialEq)]
pub struct ModalAnalysis {
    pub mode: Mode,
    pub diatonic: [ChordQuality; DEGREES],
    pub progression: &'static str,
    pub phrases: Vec<PhraseBreakdown>,
}

impl ModalAnalysis {
    /// Analyze a phrase list in the given mode
    pub fn new(mode: Mode, phrases: &[Phrase]) -> Self {
        let phrases = phrases
            .iter()
            .map(|phrase| {
                let chord = resolve_chord(&phrase.chord, mode);
                PhraseBreakdown {
                    degree: chord.degree + 1,
                    quality: chord.quality,
                    length: phrase.length,
                    beats: phrase.total_beats(),
                    rhythm: phrase.rhythm.to_string(),
                }
            })
            .collect();

        Self {
            mode,
            diatonic: mode.diatonic_qualities(),
            progression: mode.characteristic_progression(),
            phrases,
        }
    }

    /// Diatonic qualities joined for display, e.g. "maj, min, min, ..."
    pub fn diatonic_summary(&self) -> String {
        self.diatonic
            .iter()
            .map(|q| q.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ModalAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "### {} Mode Characteristics", self.mode)?;
        writeln!(f, "Diatonic Chords: {}", self.diatonic_summary())?;
        writeln!(f, "Characteristic Progression: {}", self.progression)?;
        writeln!(f)?;
        writeln!(f, "### Phrase Breakdown")?;
        for (i, phrase) in self.phrases.iter().enumerate() {
            writeln!(f, "Phrase {}", i + 1)?;
            writeln!(f, "- Scale Degree: {} ({})", phrase.degree, phrase.quality)?;
            writeln!(
                f,
                "- Length: {} repetitions ({} beats)",
                phrase.length, phrase.beats
            )?;
            writeln!(f, "- Rhythm: {}", phrase.rhythm)?;
        }
        Ok(())
    }
}
