// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file export.

pub mod midi_file;

pub use midi_file::{MidiExporter, MidiFileFormat, TICKS_PER_BEAT};

use crate::music::scale::Mode;

/// Download file name for a composition in `mode`, e.g. `dorian_composition.mid`
pub fn file_name(mode: Mode) -> String {
    format!("{}_composition.mid", mode.id())
}
