// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Standard MIDI file encoding for generated note sequences.
//!
//! Writes Type 0 (single track) files by default, or Type 1 files with a
//! separate tempo track. Beat times are converted to ticks by rounding, and
//! each note's end tick is derived from its absolute end time so rounding
//! never accumulates across a long phrase.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::composition::sequence::NoteEvent;

/// Ticks per quarter note
pub const TICKS_PER_BEAT: u16 = 960;

/// Largest delta-time a four-byte variable-length quantity can hold
pub const MAX_DELTA_TICKS: u32 = 0x0FFF_FFFF;

/// Time signature written to every file
pub const TIME_SIGNATURE: (u8, u8) = (4, 4);

/// Default track name
pub const DEFAULT_TRACK_NAME: &str = "Modal Composition";

/// Default tempo in BPM
pub const DEFAULT_TEMPO: f64 = 120.0;

/// Default note velocity
pub const DEFAULT_VELOCITY: u8 = 80;

/// MIDI file format type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MidiFileFormat {
    /// Type 0: single track holding tempo and notes
    #[default]
    Type0,
    /// Type 1: tempo track plus one note track
    Type1,
}

/// Ordering of events sharing a tick: meta first, then note-offs, then
/// note-ons, so a re-attacked pitch is released before it sounds again
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventOrder {
    Meta,
    NoteOff,
    NoteOn,
}

/// MIDI event for export
#[derive(Debug, Clone)]
struct MidiExportEvent {
    /// Absolute tick
    tick: u64,
    order: EventOrder,
    /// Event data
    data: Vec<u8>,
}

impl MidiExportEvent {
    fn note_on(tick: u64, channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            order: EventOrder::NoteOn,
            data: vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F],
        }
    }

    fn note_off(tick: u64, channel: u8, note: u8) -> Self {
        Self {
            tick,
            order: EventOrder::NoteOff,
            data: vec![0x80 | (channel & 0x0F), note & 0x7F, 0],
        }
    }

    fn tempo(bpm: f64) -> Self {
        let microseconds = (60_000_000.0 / bpm).round() as u32;
        Self {
            tick: 0,
            order: EventOrder::Meta,
            data: vec![
                0xFF,
                0x51,
                0x03,
                ((microseconds >> 16) & 0xFF) as u8,
                ((microseconds >> 8) & 0xFF) as u8,
                (microseconds & 0xFF) as u8,
            ],
        }
    }

    fn time_signature(numerator: u8, denominator: u8) -> Self {
        // Denominator is stored as a power of two
        let denom_power = denominator.max(1).ilog2() as u8;
        Self {
            tick: 0,
            order: EventOrder::Meta,
            data: vec![0xFF, 0x58, 0x04, numerator, denom_power, 24, 8],
        }
    }

    fn track_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut data = vec![0xFF, 0x03];
        write_variable_length(&mut data, bytes.len() as u32);
        data.extend_from_slice(bytes);
        Self {
            tick: 0,
            order: EventOrder::Meta,
            data,
        }
    }
}

/// Write a variable-length quantity
fn write_variable_length(out: &mut Vec<u8>, mut value: u32) {
    let mut bytes = vec![(value & 0x7F) as u8];
    value >>= 7;

    while value > 0 {
        bytes.push((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }

    bytes.reverse();
    out.extend_from_slice(&bytes);
}

/// Encodes note sequences as Standard MIDI files
#[derive(Debug, Clone)]
pub struct MidiExporter {
    format: MidiFileFormat,
    tempo: f64,
    velocity: u8,
    channel: u8,
    track_name: String,
}

impl MidiExporter {
    /// Create an exporter with the default settings (Type 0, 120 BPM, velocity 80)
    pub fn new() -> Self {
        Self {
            format: MidiFileFormat::Type0,
            tempo: DEFAULT_TEMPO,
            velocity: DEFAULT_VELOCITY,
            channel: 0,
            track_name: DEFAULT_TRACK_NAME.to_string(),
        }
    }

    /// Get format
    pub fn format(&self) -> MidiFileFormat {
        self.format
    }

    /// Set format
    pub fn set_format(&mut self, format: MidiFileFormat) {
        self.format = format;
    }

    /// Get tempo
    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    /// Set tempo, clamped to 20-300 BPM. Non-finite or non-positive
    /// values leave the tempo unchanged.
    pub fn set_tempo(&mut self, bpm: f64) {
        if bpm.is_finite() && bpm > 0.0 {
            self.tempo = bpm.clamp(20.0, 300.0);
        }
    }

    /// Get velocity
    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Set velocity, clamped to 1-127
    pub fn set_velocity(&mut self, velocity: u8) {
        self.velocity = velocity.clamp(1, 127);
    }

    /// Set MIDI channel (0-15)
    pub fn set_channel(&mut self, channel: u8) {
        self.channel = channel & 0x0F;
    }

    /// Get track name
    pub fn track_name(&self) -> &str {
        &self.track_name
    }

    /// Set track name
    pub fn set_track_name(&mut self, name: impl Into<String>) {
        self.track_name = name.into();
    }

    /// Convert a beat position to ticks
    pub fn beats_to_ticks(&self, beats: f64) -> u64 {
        (beats.max(0.0) * TICKS_PER_BEAT as f64).round() as u64
    }

    /// Export notes to a file
    pub fn export<P: AsRef<Path>>(&self, notes: &[NoteEvent], path: P) -> io::Result<()> {
        let mut file = File::create(path)?;
        self.write(notes, &mut file)
    }

    /// Write encoded notes to a writer
    pub fn write<W: Write>(&self, notes: &[NoteEvent], writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.encode(notes))
    }

    /// Encode notes as a complete MIDI file
    pub fn encode(&self, notes: &[NoteEvent]) -> Vec<u8> {
        let mut buffer = Vec::new();
        match self.format {
            MidiFileFormat::Type0 => {
                let mut events = self.meta_events();
                events.push(MidiExportEvent::track_name(&self.track_name));
                events.extend(self.note_events(notes));
                self.write_header(&mut buffer, 0, 1);
                self.write_track(&mut buffer, events);
            }
            MidiFileFormat::Type1 => {
                let mut tempo_events = self.meta_events();
                tempo_events.push(MidiExportEvent::track_name("Tempo"));

                let mut note_events = vec![MidiExportEvent::track_name(&self.track_name)];
                note_events.extend(self.note_events(notes));

                self.write_header(&mut buffer, 1, 2);
                self.write_track(&mut buffer, tempo_events);
                self.write_track(&mut buffer, note_events);
            }
        }
        buffer
    }

    fn meta_events(&self) -> Vec<MidiExportEvent> {
        vec![
            MidiExportEvent::tempo(self.tempo),
            MidiExportEvent::time_signature(TIME_SIGNATURE.0, TIME_SIGNATURE.1),
        ]
    }

    fn note_events(&self, notes: &[NoteEvent]) -> Vec<MidiExportEvent> {
        let mut events = Vec::with_capacity(notes.len() * 2);
        for note in notes {
            let start = self.beats_to_ticks(note.start);
            let end = self.beats_to_ticks(note.end()).max(start + 1);
            events.push(MidiExportEvent::note_on(
                start,
                self.channel,
                note.pitch,
                self.velocity,
            ));
            events.push(MidiExportEvent::note_off(end, self.channel, note.pitch));
        }
        events
    }

    /// Write MIDI file header chunk
    fn write_header(&self, out: &mut Vec<u8>, format: u16, num_tracks: u16) {
        out.extend_from_slice(b"MThd");
        out.extend_from_slice(&6u32.to_be_bytes());
        out.extend_from_slice(&format.to_be_bytes());
        out.extend_from_slice(&num_tracks.to_be_bytes());
        out.extend_from_slice(&TICKS_PER_BEAT.to_be_bytes());
    }

    /// Write a track chunk, ordering events by tick
    fn write_track(&self, out: &mut Vec<u8>, mut events: Vec<MidiExportEvent>) {
        events.sort_by_key(|e| (e.tick, e.order));

        let mut track_data = Vec::new();
        let mut last_tick = 0u64;

        for event in &events {
            let delta = event.tick.saturating_sub(last_tick).min(MAX_DELTA_TICKS as u64);
            write_variable_length(&mut track_data, delta as u32);
            track_data.extend_from_slice(&event.data);
            last_tick = event.tick;
        }

        // End of track
        write_variable_length(&mut track_data, 0);
        track_data.extend_from_slice(&[0xFF, 0x2F, 0x00]);

        out.extend_from_slice(b"MTrk");
        out.extend_from_slice(&(track_data.len() as u32).to_be_bytes());
        out.extend_from_slice(&track_data);
    }
}

impl Default for MidiExporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_major_twice() -> Vec<NoteEvent> {
        vec![
            NoteEvent::new(60, 0.0, 1.0),
            NoteEvent::new(64, 0.0, 1.0),
            NoteEvent::new(67, 0.0, 1.0),
            NoteEvent::new(60, 1.0, 1.0),
            NoteEvent::new(64, 1.0, 1.0),
            NoteEvent::new(67, 1.0, 1.0),
        ]
    }

    /// Split a track chunk body into (delta, bytes) events
    fn parse_events(track: &[u8]) -> Vec<(u32, Vec<u8>)> {
        let mut events = Vec::new();
        let mut i = 0;
        while i < track.len() {
            let mut delta = 0u32;
            loop {
                let b = track[i];
                i += 1;
                delta = (delta << 7) | (b & 0x7F) as u32;
                if b & 0x80 == 0 {
                    break;
                }
            }
            let len = match track[i] {
                0xFF => 3 + track[i + 2] as usize,
                0x80..=0x9F => 3,
                _ => panic!("unexpected status byte {:#x}", track[i]),
            };
            events.push((delta, track[i..i + len].to_vec()));
            i += len;
        }
        events
    }

    #[test]
    fn test_exporter_defaults() {
        let exporter = MidiExporter::new();
        assert_eq!(exporter.format(), MidiFileFormat::Type0);
        assert_eq!(exporter.tempo(), 120.0);
        assert_eq!(exporter.velocity(), 80);
        assert_eq!(exporter.track_name(), "Modal Composition");
    }

    #[test]
    fn test_type0_header() {
        let bytes = MidiExporter::new().encode(&c_major_twice());

        assert_eq!(&bytes[0..4], b"MThd");
        assert_eq!(&bytes[4..8], &[0, 0, 0, 6]);
        assert_eq!(&bytes[8..10], &0u16.to_be_bytes());
        assert_eq!(&bytes[10..12], &1u16.to_be_bytes());
        assert_eq!(&bytes[12..14], &960u16.to_be_bytes());
        assert_eq!(&bytes[14..18], b"MTrk");

        let length = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]) as usize;
        assert_eq!(bytes.len(), 22 + length);
    }

    #[test]
    fn test_type0_events() {
        let bytes = MidiExporter::new().encode(&c_major_twice());
        let events = parse_events(&bytes[22..]);

        // tempo, time signature, track name, 12 note events, end of track
        assert_eq!(events.len(), 16);
        assert_eq!(events[0].1, vec![0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
        assert_eq!(&events[1].1[..2], &[0xFF, 0x58]);
        let mut name = vec![0xFF, 0x03, 17];
        name.extend_from_slice(b"Modal Composition");
        assert_eq!(events[2].1, name);

        // First chord attacks at tick 0 with velocity 80
        for (delta, data) in &events[3..6] {
            assert_eq!(*delta, 0);
            assert_eq!(data[0], 0x90);
            assert_eq!(data[2], 80);
        }

        // At tick 960 the first chord is released before the second attacks
        assert_eq!(events[6].0, 960);
        for (_, data) in &events[6..9] {
            assert_eq!(data[0], 0x80);
        }
        for (delta, data) in &events[9..12] {
            assert_eq!(*delta, 0);
            assert_eq!(data[0], 0x90);
        }
        assert_eq!(events[12].0, 960);
        assert_eq!(events[15].1, vec![0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn test_type1_has_tempo_track() {
        let mut exporter = MidiExporter::new();
        exporter.set_format(MidiFileFormat::Type1);
        let bytes = exporter.encode(&c_major_twice());

        assert_eq!(&bytes[8..10], &1u16.to_be_bytes());
        assert_eq!(&bytes[10..12], &2u16.to_be_bytes());

        let first_len = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]) as usize;
        let second = 22 + first_len;
        assert_eq!(&bytes[second..second + 4], b"MTrk");

        let tempo_track = parse_events(&bytes[22..second]);
        assert!(tempo_track.iter().all(|(_, d)| d[0] == 0xFF));
    }

    #[test]
    fn test_empty_sequence_is_valid_file() {
        let bytes = MidiExporter::new().encode(&[]);
        let events = parse_events(&bytes[22..]);
        assert_eq!(events.len(), 4);
        assert_eq!(events[3].1, vec![0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn test_variable_length() {
        let cases: [(u32, &[u8]); 5] = [
            (0, &[0x00]),
            (127, &[0x7F]),
            (128, &[0x81, 0x00]),
            (960, &[0x87, 0x40]),
            (16383, &[0xFF, 0x7F]),
        ];
        for (value, expected) in cases {
            let mut buffer = Vec::new();
            write_variable_length(&mut buffer, value);
            assert_eq!(buffer, expected, "value {}", value);
        }
    }

    #[test]
    fn test_beats_to_ticks() {
        let exporter = MidiExporter::new();
        assert_eq!(exporter.beats_to_ticks(0.0), 0);
        assert_eq!(exporter.beats_to_ticks(1.0), 960);
        assert_eq!(exporter.beats_to_ticks(0.25), 240);
        assert_eq!(exporter.beats_to_ticks(1.0 / 3.0), 320);
    }

    #[test]
    fn test_longest_duration_fits_delta_time() {
        let bytes = MidiExporter::new().encode(&[NoteEvent::new(60, 0.0, 100_000.0)]);
        let events = parse_events(&bytes[22..]);

        assert_eq!(events[4], (96_000_000, vec![0x80, 60, 0]));
        let mut encoded = Vec::new();
        write_variable_length(&mut encoded, MAX_DELTA_TICKS);
        assert_eq!(encoded, vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_tempo_event() {
        let event = MidiExportEvent::tempo(90.0);
        // 90 BPM = 666667 microseconds per beat = 0x0A2C2B
        assert_eq!(&event.data[3..], &[0x0A, 0x2C, 0x2B]);
    }

    #[test]
    fn test_settings_are_clamped() {
        let mut exporter = MidiExporter::new();
        exporter.set_tempo(1000.0);
        assert_eq!(exporter.tempo(), 300.0);
        exporter.set_tempo(f64::NAN);
        assert_eq!(exporter.tempo(), 300.0);
        exporter.set_tempo(-10.0);
        assert_eq!(exporter.tempo(), 300.0);
        exporter.set_velocity(0);
        assert_eq!(exporter.velocity(), 1);
        exporter.set_velocity(200);
        assert_eq!(exporter.velocity(), 127);
    }

    #[test]
    fn test_custom_velocity_and_channel() {
        let mut exporter = MidiExporter::new();
        exporter.set_velocity(100);
        exporter.set_channel(2);
        let bytes = exporter.encode(&[NoteEvent::new(72, 0.5, 0.5)]);
        let events = parse_events(&bytes[22..]);

        assert_eq!(events[3], (480, vec![0x92, 72, 100]));
        assert_eq!(events[4], (480, vec![0x82, 72, 0]));
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mid");
        let exporter = MidiExporter::new();
        exporter.export(&c_major_twice(), &path).unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, exporter.encode(&c_major_twice()));
    }
}
