// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Compositions: a key, a mode and an ordered list of phrases.
//!
//! This module provides:
//! - Phrase and rhythm parsing
//! - Note sequence generation
//! - Modal analysis
//! - The `Composition` type tying them to MIDI export

pub mod analysis;
pub mod phrase;
pub mod sequence;

pub use analysis::{ModalAnalysis, PhraseBreakdown};
pub use phrase::{Phrase, Rhythm};
pub use sequence::{generate_notes, NoteEvent, NoteSequence, PhraseSpan};

use tracing::info;

use crate::error::{ComposeError, Result, MAX_PHRASES, MAX_PHRASE_LENGTH};
use crate::export::{self, midi_file, MidiExporter, MidiFileFormat};
use crate::music::scale::{Mode, Note};

/// Check phrase count and per-phrase lengths against the input limits
pub fn validate_phrases(phrases: &[Phrase]) -> Result<()> {
    if phrases.is_empty() || phrases.len() > MAX_PHRASES {
        return Err(ComposeError::PhraseCount(phrases.len()));
    }
    for (i, phrase) in phrases.iter().enumerate() {
        if phrase.length == 0 || phrase.length > MAX_PHRASE_LENGTH {
            return Err(ComposeError::PhraseLength {
                phrase: i + 1,
                length: phrase.length,
            });
        }
    }
    Ok(())
}

/// A validated composition request
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Track name written to the MIDI file
    pub name: String,
    /// Tonic
    pub key: Note,
    /// Mode
    pub mode: Mode,
    /// Tempo in BPM
    pub tempo: f64,
    /// Note velocity
    pub velocity: u8,
    /// MIDI file layout
    pub format: MidiFileFormat,
    phrases: Vec<Phrase>,
}

impl Composition {
    /// Create a composition, validating the phrase list
    pub fn new(key: Note, mode: Mode, phrases: Vec<Phrase>) -> Result<Self> {
        validate_phrases(&phrases)?;
        Ok(Self {
            name: midi_file::DEFAULT_TRACK_NAME.to_string(),
            key,
            mode,
            tempo: midi_file::DEFAULT_TEMPO,
            velocity: midi_file::DEFAULT_VELOCITY,
            format: MidiFileFormat::default(),
            phrases,
        })
    }

    /// Set the track name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the tempo in BPM, rejecting zero, negative and non-finite values
    pub fn with_tempo(mut self, tempo: f64) -> Result<Self> {
        if !tempo.is_finite() || tempo <= 0.0 {
            return Err(ComposeError::InvalidTempo(tempo));
        }
        self.tempo = tempo;
        Ok(self)
    }

    /// Set the note velocity
    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the MIDI file layout
    pub fn with_format(mut self, format: MidiFileFormat) -> Self {
        self.format = format;
        self
    }

    /// The phrases in order
    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    /// Generate the note sequence
    pub fn notes(&self) -> NoteSequence {
        generate_notes(self.key, self.mode, &self.phrases)
    }

    /// Exporter configured with this composition's settings
    pub fn exporter(&self) -> MidiExporter {
        let mut exporter = MidiExporter::new();
        exporter.set_format(self.format);
        exporter.set_tempo(self.tempo);
        exporter.set_velocity(self.velocity);
        exporter.set_track_name(self.name.clone());
        exporter
    }

    /// Modal analysis of this composition
    pub fn analysis(&self) -> ModalAnalysis {
        ModalAnalysis::new(self.mode, &self.phrases)
    }

    /// Suggested file name for the MIDI output
    pub fn file_name(&self) -> String {
        export::file_name(self.mode)
    }

    /// Generate notes and encode them as MIDI
    pub fn generate(&self) -> GeneratedComposition {
        let sequence = self.notes();
        let midi = self.exporter().encode(&sequence.notes);

        info!(
            key = %self.key,
            mode = %self.mode,
            notes = sequence.len(),
            beats = sequence.total_beats,
            bytes = midi.len(),
            "generated composition"
        );

        GeneratedComposition {
            sequence,
            midi,
            file_name: self.file_name(),
        }
    }
}

/// Output of a generation request
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedComposition {
    /// Generated notes
    pub sequence: NoteSequence,
    /// Encoded Standard MIDI file
    pub midi: Vec<u8>,
    /// Suggested file name
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases(n: usize) -> Vec<Phrase> {
        (0..n).map(|_| Phrase::default()).collect()
    }

    #[test]
    fn test_validate_phrase_count() {
        assert_eq!(validate_phrases(&[]), Err(ComposeError::PhraseCount(0)));
        assert!(validate_phrases(&phrases(1)).is_ok());
        assert!(validate_phrases(&phrases(8)).is_ok());
        assert_eq!(
            validate_phrases(&phrases(9)),
            Err(ComposeError::PhraseCount(9))
        );
    }

    #[test]
    fn test_validate_phrase_length() {
        let mut list = phrases(2);
        list[1].length = 17;
        assert_eq!(
            validate_phrases(&list),
            Err(ComposeError::PhraseLength { phrase: 2, length: 17 })
        );

        list[1].length = 0;
        assert!(validate_phrases(&list).is_err());

        list[1].length = 16;
        assert!(validate_phrases(&list).is_ok());
    }

    #[test]
    fn test_composition_defaults() {
        let composition = Composition::new(Note::G, Mode::Ionian, phrases(1)).unwrap();
        assert_eq!(composition.name, "Modal Composition");
        assert_eq!(composition.tempo, 120.0);
        assert_eq!(composition.velocity, 80);
        assert_eq!(composition.format, MidiFileFormat::Type0);
        assert_eq!(composition.file_name(), "ionian_composition.mid");
    }

    #[test]
    fn test_generate() {
        let composition = Composition::new(
            Note::C,
            Mode::Ionian,
            vec![Phrase::new("I", 2, "1.0").unwrap()],
        )
        .unwrap();
        let generated = composition.generate();

        assert_eq!(generated.sequence.len(), 6);
        assert_eq!(generated.sequence.total_beats, 2.0);
        assert_eq!(&generated.midi[0..4], b"MThd");
        assert_eq!(generated.file_name, "ionian_composition.mid");
        assert_eq!(generated, composition.generate());
    }

    #[test]
    fn test_exporter_uses_settings() {
        let composition = Composition::new(Note::A, Mode::Aeolian, phrases(1))
            .unwrap()
            .with_name("Sketch")
            .with_tempo(90.0)
            .unwrap()
            .with_velocity(100)
            .with_format(MidiFileFormat::Type1);
        let exporter = composition.exporter();

        assert_eq!(exporter.track_name(), "Sketch");
        assert_eq!(exporter.tempo(), 90.0);
        assert_eq!(exporter.velocity(), 100);
        assert_eq!(exporter.format(), MidiFileFormat::Type1);
    }

    #[test]
    fn test_tempo_is_validated() {
        let composition = Composition::new(Note::C, Mode::Ionian, phrases(1)).unwrap();
        for tempo in [0.0, -60.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                composition.clone().with_tempo(tempo),
                Err(ComposeError::InvalidTempo(_))
            ));
        }
        let slow = composition.with_tempo(10.0).unwrap();
        assert_eq!(slow.exporter().tempo(), 20.0);
    }
}
