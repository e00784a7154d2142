// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Phrases and rhythm patterns.

use std::fmt;
use std::str::FromStr;

use crate::error::{ComposeError, Result, MAX_DURATION_BEATS};

/// Ordered, non-empty list of positive beat durations, cycled over a phrase
#[derive(Debug, Clone, PartialEq)]
pub struct Rhythm {
    durations: Vec<f64>,
    source: String,
}

impl Rhythm {
    /// Parse a comma-separated list of durations, e.g. `"0.5, 0.5, 1.0"`.
    ///
    /// Every token must be a finite number greater than zero and no longer
    /// than `MAX_DURATION_BEATS`.
    pub fn parse(s: &str) -> Result<Self> {
        let mut durations = Vec::new();
        for token in s.split(',') {
            let token = token.trim();
            let value: f64 = token.parse().map_err(|_| ComposeError::InvalidRhythm {
                rhythm: s.to_string(),
                token: token.to_string(),
            })?;
            check_duration(s, value)?;
            durations.push(value);
        }

        if durations.is_empty() {
            return Err(ComposeError::EmptyRhythm);
        }

        Ok(Self {
            durations,
            source: s.trim().to_string(),
        })
    }

    /// Build a rhythm from durations already in hand
    pub fn from_durations(durations: Vec<f64>) -> Result<Self> {
        if durations.is_empty() {
            return Err(ComposeError::EmptyRhythm);
        }
        let source = durations
            .iter()
            .map(|d| format!("{:?}", d))
            .collect::<Vec<_>>()
            .join(", ");
        for &value in &durations {
            check_duration(&source, value)?;
        }
        Ok(Self { durations, source })
    }

    /// The durations in pattern order
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Duration of the `i`-th repetition, cycling through the pattern
    pub fn duration_at(&self, i: usize) -> f64 {
        self.durations[i % self.durations.len()]
    }

    /// Total beats covered by `repeats` repetitions
    pub fn total_beats(&self, repeats: u32) -> f64 {
        (0..repeats as usize).map(|i| self.duration_at(i)).sum()
    }

    /// The rhythm as the user wrote it
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn check_duration(rhythm: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ComposeError::NonPositiveDuration {
            rhythm: rhythm.to_string(),
            value,
        });
    }
    if value > MAX_DURATION_BEATS {
        return Err(ComposeError::DurationTooLong {
            rhythm: rhythm.to_string(),
            value,
        });
    }
    Ok(())
}

impl FromStr for Rhythm {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self> {
        Rhythm::parse(s)
    }
}

impl fmt::Display for Rhythm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// One user-authored unit of a composition: a chord repeated over a rhythm
#[derive(Debug, Clone, PartialEq)]
pub struct Phrase {
    /// Chord token, e.g. `"IV"` or `"ii:min7"`
    pub chord: String,
    /// Number of chord repetitions
    pub length: u32,
    /// Rhythm pattern cycled over the repetitions
    pub rhythm: Rhythm,
}

impl Phrase {
    /// Create a phrase, parsing the rhythm string
    pub fn new(chord: impl Into<String>, length: u32, rhythm: &str) -> Result<Self> {
        Ok(Self {
            chord: chord.into(),
            length,
            rhythm: Rhythm::parse(rhythm)?,
        })
    }

    /// Beats this phrase occupies
    pub fn total_beats(&self) -> f64 {
        self.rhythm.total_beats(self.length)
    }
}

impl Default for Phrase {
    fn default() -> Self {
        Self {
            chord: "I".to_string(),
            length: 4,
            rhythm: Rhythm {
                durations: vec![1.0],
                source: "1.0".to_string(),
            },
        }
    }
}
