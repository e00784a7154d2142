// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for composition input validation.

use thiserror::Error;

/// Maximum number of phrases in one composition
pub const MAX_PHRASES: usize = 8;

/// Maximum repeat length of a single phrase
pub const MAX_PHRASE_LENGTH: u32 = 16;

/// Longest single rhythm duration in beats. Keeps every MIDI delta-time
/// inside the four-byte variable-length limit.
pub const MAX_DURATION_BEATS: f64 = 100_000.0;

/// Errors raised while turning user input into a composition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComposeError {
    /// Tonic is not one of the twelve note names
    #[error("unknown key '{0}' (expected one of C, C#, D, D#, E, F, F#, G, G#, A, A#, B)")]
    UnknownKey(String),

    /// Mode is not one of the seven diatonic modes
    #[error("unknown mode '{0}' (expected ionian, dorian, phrygian, lydian, mixolydian, aeolian or locrian)")]
    UnknownMode(String),

    /// A rhythm token could not be read as a number
    #[error("invalid rhythm '{rhythm}': '{token}' is not a number")]
    InvalidRhythm { rhythm: String, token: String },

    /// A rhythm duration was zero, negative or not finite
    #[error("invalid rhythm '{rhythm}': duration {value} must be a positive number of beats")]
    NonPositiveDuration { rhythm: String, value: f64 },

    /// A rhythm duration too long to encode as a MIDI delta-time
    #[error("invalid rhythm '{rhythm}': duration {value} exceeds the 100000 beat limit")]
    DurationTooLong { rhythm: String, value: f64 },

    /// Rhythm string held no durations at all
    #[error("rhythm pattern is empty")]
    EmptyRhythm,

    /// Too few or too many phrases
    #[error("a composition needs between 1 and 8 phrases, got {0}")]
    PhraseCount(usize),

    /// Phrase repeat length outside the accepted range
    #[error("phrase {phrase}: length must be between 1 and 16, got {length}")]
    PhraseLength { phrase: usize, length: u32 },

    /// Tempo is zero, negative or not a number
    #[error("tempo must be a positive number of BPM, got {0}")]
    InvalidTempo(f64),
}

/// Result alias for composition operations
pub type Result<T> = std::result::Result<T, ComposeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ComposeError::InvalidRhythm {
            rhythm: "1.0, x".to_string(),
            token: "x".to_string(),
        };
        assert_eq!(err.to_string(), "invalid rhythm '1.0, x': 'x' is not a number");

        let err = ComposeError::PhraseCount(9);
        assert!(err.to_string().contains("between 1 and 8"));

        let err = ComposeError::PhraseLength { phrase: 2, length: 17 };
        assert!(err.to_string().starts_with("phrase 2"));

        let err = ComposeError::InvalidTempo(f64::NAN);
        assert_eq!(err.to_string(), "tempo must be a positive number of BPM, got NaN");
    }
}
