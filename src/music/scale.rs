// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tonic notes and the seven diatonic modes.
//!
//! Each mode carries three fixed tables: its scale intervals, the chord
//! quality native to every scale degree, and a characteristic progression
//! used in the modal analysis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::chord::ChordQuality;
use crate::error::ComposeError;

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Number of degrees in every diatonic mode
pub const DEGREES: usize = 7;

/// Note names (pitch classes), spelled with sharps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Note {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Semitone offset above C (0-11)
    pub fn semitones(self) -> u8 {
        self as u8
    }

    /// Note for a pitch class; wraps values above 11
    pub fn from_pitch_class(pc: u8) -> Self {
        Note::ALL[(pc % 12) as usize]
    }

    /// Display name ("C", "C#", ...)
    pub fn name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::Cs => "C#",
            Note::D => "D",
            Note::Ds => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "G#",
            Note::A => "A",
            Note::As => "A#",
            Note::B => "B",
        }
    }
}

impl FromStr for Note {
    type Err = ComposeError;

    /// Accepts sharp and flat spellings in any case ("C#", "db", "Bb")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "C" => Ok(Note::C),
            "C#" | "DB" => Ok(Note::Cs),
            "D" => Ok(Note::D),
            "D#" | "EB" => Ok(Note::Ds),
            "E" => Ok(Note::E),
            "F" => Ok(Note::F),
            "F#" | "GB" => Ok(Note::Fs),
            "G" => Ok(Note::G),
            "G#" | "AB" => Ok(Note::Gs),
            "A" => Ok(Note::A),
            "A#" | "BB" => Ok(Note::As),
            "B" => Ok(Note::B),
            _ => Err(ComposeError::UnknownKey(s.to_string())),
        }
    }
}

impl TryFrom<String> for Note {
    type Error = ComposeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Note> for String {
    fn from(note: Note) -> Self {
        note.name().to_string()
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Name of a MIDI note number with its octave, middle C = "C4"
pub fn note_name(note: MidiNote) -> String {
    let octave = (note / 12) as i8 - 1;
    format!("{}{}", Note::from_pitch_class(note), octave)
}

/// The seven diatonic modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Mode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    /// All modes, ordered by the degree of the major scale they start on
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    /// Semitone offsets of the seven scale degrees
    pub fn intervals(self) -> [u8; DEGREES] {
        match self {
            Mode::Ionian => [0, 2, 4, 5, 7, 9, 11],
            Mode::Dorian => [0, 2, 3, 5, 7, 9, 10],
            Mode::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            Mode::Lydian => [0, 2, 4, 6, 7, 9, 11],
            Mode::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            Mode::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            Mode::Locrian => [0, 1, 3, 5, 6, 8, 10],
        }
    }

    /// Chord quality native to each scale degree
    pub fn diatonic_qualities(self) -> [ChordQuality; DEGREES] {
        use ChordQuality::{Dim, Maj, Min};
        match self {
            Mode::Ionian => [Maj, Min, Min, Maj, Maj, Min, Dim],
            Mode::Dorian => [Min, Min, Maj, Maj, Min, Dim, Maj],
            Mode::Phrygian => [Min, Maj, Maj, Min, Dim, Maj, Min],
            Mode::Lydian => [Maj, Maj, Min, Dim, Maj, Min, Min],
            Mode::Mixolydian => [Maj, Min, Dim, Maj, Min, Min, Maj],
            Mode::Aeolian => [Min, Dim, Maj, Min, Min, Maj, Maj],
            Mode::Locrian => [Dim, Maj, Min, Min, Maj, Maj, Min],
        }
    }

    /// Diatonic quality at a 0-based degree, taken modulo 7
    pub fn quality_at(self, degree: usize) -> ChordQuality {
        self.diatonic_qualities()[degree % DEGREES]
    }

    /// Progression that best shows off the mode's colour
    pub fn characteristic_progression(self) -> &'static str {
        match self {
            Mode::Ionian => "I-IV-V-I",
            Mode::Dorian => "i-IV-v",
            Mode::Phrygian => "i-II-III",
            Mode::Lydian => "I-II-I",
            Mode::Mixolydian => "I-bVII-IV",
            Mode::Aeolian => "i-VI-III-VII",
            Mode::Locrian => "i°-IV-vii°",
        }
    }

    /// Lowercase identifier, as used in files and file names
    pub fn id(self) -> &'static str {
        match self {
            Mode::Ionian => "ionian",
            Mode::Dorian => "dorian",
            Mode::Phrygian => "phrygian",
            Mode::Lydian => "lydian",
            Mode::Mixolydian => "mixolydian",
            Mode::Aeolian => "aeolian",
            Mode::Locrian => "locrian",
        }
    }

    /// Capitalized display name
    pub fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "Ionian",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Aeolian => "Aeolian",
            Mode::Locrian => "Locrian",
        }
    }
}

impl FromStr for Mode {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match normalized.as_str() {
            "ionian" | "major" => Ok(Mode::Ionian),
            "dorian" => Ok(Mode::Dorian),
            "phrygian" => Ok(Mode::Phrygian),
            "lydian" => Ok(Mode::Lydian),
            "mixolydian" => Ok(Mode::Mixolydian),
            "aeolian" | "minor" | "naturalminor" => Ok(Mode::Aeolian),
            "locrian" => Ok(Mode::Locrian),
            _ => Err(ComposeError::UnknownMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = ComposeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.id().to_string()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_semitones() {
        assert_eq!(Note::C.semitones(), 0);
        assert_eq!(Note::G.semitones(), 7);
        assert_eq!(Note::B.semitones(), 11);
    }

    #[test]
    fn test_note_parse() {
        assert_eq!("C".parse::<Note>(), Ok(Note::C));
        assert_eq!("c#".parse::<Note>(), Ok(Note::Cs));
        assert_eq!("Db".parse::<Note>(), Ok(Note::Cs));
        assert_eq!(" Bb ".parse::<Note>(), Ok(Note::As));
        assert_eq!(
            "H".parse::<Note>(),
            Err(ComposeError::UnknownKey("H".to_string()))
        );
    }

    #[test]
    fn test_note_names_round_trip_all_twelve() {
        for note in Note::ALL {
            assert_eq!(note.name().parse::<Note>(), Ok(note));
        }
    }

    #[test]
    fn test_note_name_for_midi_numbers() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(48), "C3");
        assert_eq!(note_name(83), "B5");
        assert_eq!(note_name(0), "C-1");
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Dorian".parse::<Mode>(), Ok(Mode::Dorian));
        assert_eq!("major".parse::<Mode>(), Ok(Mode::Ionian));
        assert_eq!("natural_minor".parse::<Mode>(), Ok(Mode::Aeolian));
        assert!("blues".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_intervals_are_rotations_of_major() {
        let major = Mode::Ionian.intervals();
        for (start, mode) in Mode::ALL.iter().enumerate() {
            let rotated: Vec<u8> = (0..DEGREES)
                .map(|i| {
                    let from = major[(start + i) % DEGREES] as i16;
                    (from - major[start] as i16).rem_euclid(12) as u8
                })
                .collect();
            assert_eq!(rotated, mode.intervals().to_vec(), "{}", mode);
        }
    }

    #[test]
    fn test_diatonic_qualities() {
        assert_eq!(Mode::Ionian.quality_at(0), ChordQuality::Maj);
        assert_eq!(Mode::Ionian.quality_at(6), ChordQuality::Dim);
        assert_eq!(Mode::Dorian.quality_at(0), ChordQuality::Min);
        assert_eq!(Mode::Locrian.quality_at(0), ChordQuality::Dim);
        // Wraps past the seventh degree
        assert_eq!(Mode::Ionian.quality_at(7), ChordQuality::Maj);
    }

    #[test]
    fn test_characteristic_progressions() {
        assert_eq!(Mode::Ionian.characteristic_progression(), "I-IV-V-I");
        assert_eq!(Mode::Mixolydian.characteristic_progression(), "I-bVII-IV");
        assert_eq!(Mode::Locrian.characteristic_progression(), "i°-IV-vii°");
    }

    #[test]
    fn test_mode_ids_and_names() {
        assert_eq!(Mode::Aeolian.id(), "aeolian");
        assert_eq!(Mode::Aeolian.to_string(), "Aeolian");
        assert_eq!(String::from(Mode::Lydian), "lydian");
    }
}
