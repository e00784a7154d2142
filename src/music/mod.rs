// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory tables for modal composition.
//!
//! This module provides the fixed lookup tables (notes, modes, chord
//! qualities) and the Roman-numeral chord resolver built on them.

pub mod chord;
pub mod scale;

pub use chord::{resolve_chord, ChordQuality, ResolvedChord};
pub use scale::{note_name, MidiNote, Mode, Note};
