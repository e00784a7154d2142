// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Phrase-to-note sequence generation.
//!
//! Walks the phrase list once with a running beat cursor. Each repetition of
//! a phrase's chord emits one note per chord tone at the cursor, then moves
//! the cursor forward by that repetition's rhythm duration, so phrases butt
//! up against each other with no gaps or overlaps.

use std::ops::Range;

use tracing::debug;

use super::phrase::Phrase;
use crate::music::chord::{resolve_chord, ResolvedChord};
use crate::music::scale::{MidiNote, Mode, Note, DEGREES};

/// Pitch of the tonic at degree I when the key is C (middle C)
pub const BASE_PITCH: MidiNote = 60;

/// A single generated note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// MIDI note number
    pub pitch: MidiNote,
    /// Start time in beats
    pub start: f64,
    /// Duration in beats
    pub duration: f64,
}

impl NoteEvent {
    /// Create a new note event
    pub fn new(pitch: MidiNote, start: f64, duration: f64) -> Self {
        Self {
            pitch,
            start,
            duration,
        }
    }

    /// End time in beats (exclusive)
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Where one phrase landed in the generated sequence
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseSpan {
    /// Resolved chord for the phrase
    pub chord: ResolvedChord,
    /// Root pitch of the chord
    pub root: MidiNote,
    /// Beat at which the phrase starts
    pub start: f64,
    /// Beat at which the phrase ends
    pub end: f64,
    /// Indices of the phrase's notes in the sequence
    pub notes: Range<usize>,
}

/// Output of a generation pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteSequence {
    /// Notes in emission order (non-decreasing start time)
    pub notes: Vec<NoteEvent>,
    /// One span per input phrase, in order
    pub spans: Vec<PhraseSpan>,
    /// Final cursor position in beats
    pub total_beats: f64,
}

impl NoteSequence {
    /// Number of generated notes
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Check if nothing was generated
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Lowest and highest pitch, if any notes exist
    pub fn pitch_range(&self) -> Option<(MidiNote, MidiNote)> {
        let min = self.notes.iter().map(|n| n.pitch).min()?;
        let max = self.notes.iter().map(|n| n.pitch).max()?;
        Some((min, max))
    }

    /// Notes belonging to the phrase at `index`
    pub fn phrase_notes(&self, index: usize) -> &[NoteEvent] {
        self.spans
            .get(index)
            .map(|span| &self.notes[span.notes.clone()])
            .unwrap_or(&[])
    }
}

/// Root pitch of a chord built on `degree` of `mode` in `key`
pub fn root_pitch(key: Note, mode: Mode, degree: usize) -> MidiNote {
    key.semitones() + BASE_PITCH + mode.intervals()[degree % DEGREES]
}

/// Generate the note sequence for a key, mode and ordered phrase list.
///
/// Pure and deterministic: the same inputs always yield the same sequence.
/// A phrase with `length == 0` contributes no notes and no time.
pub fn generate_notes(key: Note, mode: Mode, phrases: &[Phrase]) -> NoteSequence {
    let mut notes = Vec::new();
    let mut spans = Vec::with_capacity(phrases.len());
    let mut cursor = 0.0;

    for (index, phrase) in phrases.iter().enumerate() {
        let chord = resolve_chord(&phrase.chord, mode);
        let root = root_pitch(key, mode, chord.degree);
        let phrase_start = cursor;
        let first_note = notes.len();

        for i in 0..phrase.length as usize {
            let duration = phrase.rhythm.duration_at(i);
            for &interval in chord.intervals() {
                notes.push(NoteEvent::new(root + interval, cursor, duration));
            }
            cursor += duration;
        }

        debug!(
            phrase = index + 1,
            chord = %chord,
            root,
            start = phrase_start,
            end = cursor,
            "generated phrase"
        );

        spans.push(PhraseSpan {
            chord,
            root,
            start: phrase_start,
            end: cursor,
            notes: first_note..notes.len(),
        });
    }

    NoteSequence {
        notes,
        spans,
        total_beats: cursor,
    }
}
