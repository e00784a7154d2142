// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Modal analysis panel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget, Wrap},
};

use crate::composition::ModalAnalysis;
use crate::music::chord::numeral;

/// Widget listing the mode's harmony and the phrase breakdown
pub struct AnalysisWidget<'a> {
    analysis: &'a ModalAnalysis,
    block: Option<Block<'a>>,
}

impl<'a> AnalysisWidget<'a> {
    pub fn new(analysis: &'a ModalAnalysis) -> Self {
        Self {
            analysis,
            block: None,
        }
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let label = Style::default().fg(Color::DarkGray);
        let analysis = self.analysis;

        let mut lines = vec![
            Line::from(Span::styled(format!("{} mode", analysis.mode), heading)),
            Line::from(vec![
                Span::styled("Diatonic  ", label),
                Span::raw(analysis.diatonic_summary()),
            ]),
            Line::from(vec![
                Span::styled("Typical   ", label),
                Span::raw(analysis.progression),
            ]),
            Line::from(""),
        ];

        for (i, phrase) in analysis.phrases.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(format!("{:>2} ", i + 1), label),
                Span::styled(
                    format!("{}:{}", numeral(phrase.degree - 1), phrase.quality),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(format!(
                    "  x{} [{}] {} beats",
                    phrase.length, phrase.rhythm, phrase.beats
                )),
            ]));
        }

        lines
    }
}

impl Widget for AnalysisWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut paragraph = Paragraph::new(self.lines()).wrap(Wrap { trim: false });
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        paragraph.render(area, buf);
    }
}
