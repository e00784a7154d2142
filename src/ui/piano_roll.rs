// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Piano-roll widget.
//!
//! Pitch runs vertically (highest at the top), beat time horizontally. Each
//! note is a bar covering `[start, start + duration)`; its first cell is drawn
//! as a half block so back-to-back attacks on one pitch stay distinguishable.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Widget},
};

use crate::composition::NoteEvent;
use crate::music::scale::{note_name, MidiNote};

/// Width of the pitch label column, including the separator
pub const LABEL_WIDTH: u16 = 5;

/// Pitch window shown when there are no notes (C3 to B5)
pub const DEFAULT_PITCH_RANGE: (MidiNote, MidiNote) = (48, 83);

const ONSET: &str = "▐";
const SUSTAIN: &str = "█";
const BEAT_LINE: &str = "·";

/// Widget drawing notes as horizontal bars
pub struct PianoRollWidget<'a> {
    notes: &'a [NoteEvent],
    cells_per_beat: u16,
    scroll: f64,
    block: Option<Block<'a>>,
}

impl<'a> PianoRollWidget<'a> {
    /// Create a new piano roll over `notes`
    pub fn new(notes: &'a [NoteEvent]) -> Self {
        Self {
            notes,
            cells_per_beat: 4,
            scroll: 0.0,
            block: None,
        }
    }

    /// Horizontal resolution
    pub fn cells_per_beat(mut self, cells: u16) -> Self {
        self.cells_per_beat = cells.max(1);
        self
    }

    /// First visible beat
    pub fn scroll(mut self, beats: f64) -> Self {
        self.scroll = beats.max(0.0);
        self
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn pitch_range(&self) -> (MidiNote, MidiNote) {
        let min = self.notes.iter().map(|n| n.pitch).min();
        let max = self.notes.iter().map(|n| n.pitch).max();
        match (min, max) {
            (Some(min), Some(max)) => (min, max),
            _ => DEFAULT_PITCH_RANGE,
        }
    }

    /// Column of a beat position relative to the scroll offset
    fn column(&self, beats: f64) -> i64 {
        ((beats - self.scroll) * self.cells_per_beat as f64).round() as i64
    }
}

impl Widget for PianoRollWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block.clone() {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if area.width <= LABEL_WIDTH || area.height == 0 {
            return;
        }

        let (low, high) = self.pitch_range();
        let grid_x = area.x + LABEL_WIDTH;
        let grid_width = (area.width - LABEL_WIDTH) as i64;
        let rows = (high - low) as u16 + 1;
        let first_beat_col = (self.scroll * self.cells_per_beat as f64).round() as i64;

        for row in 0..rows.min(area.height) {
            let pitch = high - row as MidiNote;
            let y = area.y + row;

            let label_style = if pitch % 12 == 0 {
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            buf.set_string(
                area.x,
                y,
                format!("{:<4}│", note_name(pitch)),
                label_style,
            );

            for col in 0..grid_width {
                if (first_beat_col + col) % self.cells_per_beat as i64 == 0 {
                    buf.set_string(
                        grid_x + col as u16,
                        y,
                        BEAT_LINE,
                        Style::default().fg(Color::DarkGray),
                    );
                }
            }

            for note in self.notes.iter().filter(|n| n.pitch == pitch) {
                let start = self.column(note.start);
                let end = self.column(note.end()).max(start + 1);
                let note_style = Style::default().fg(Color::Cyan);

                for col in start.max(0)..end.min(grid_width) {
                    let symbol = if col == start { ONSET } else { SUSTAIN };
                    buf.set_string(grid_x + col as u16, y, symbol, note_style);
                }
            }
        }
    }
}
