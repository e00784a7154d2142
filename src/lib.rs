// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Modal chord-progression composer.
//!
//! Turns a tonic, a mode and a list of Roman-numeral phrases into timed
//! notes, a Standard MIDI file, a modal analysis and a terminal piano roll.

pub mod composition;
pub mod config;
pub mod error;
pub mod export;
pub mod music;
pub mod ui;

pub use composition::{
    generate_notes, Composition, GeneratedComposition, ModalAnalysis, NoteEvent, NoteSequence,
    Phrase, Rhythm,
};
pub use config::CompositionFile;
pub use error::ComposeError;
pub use export::{MidiExporter, MidiFileFormat};
pub use music::{resolve_chord, ChordQuality, Mode, Note, ResolvedChord};
