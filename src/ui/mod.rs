// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal viewer for generated compositions.
//!
//! Shows a ratatui piano roll of the generated notes next to the modal
//! analysis. The viewer only reads the composition; regenerating happens
//! outside it.

mod analysis;
mod piano_roll;

pub use analysis::AnalysisWidget;
pub use piano_roll::{PianoRollWidget, DEFAULT_PITCH_RANGE, LABEL_WIDTH};

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::composition::{Composition, GeneratedComposition, ModalAnalysis};

/// Zoom levels, in cells per beat
const ZOOM_LEVELS: [u16; 5] = [1, 2, 4, 8, 16];

/// Key event result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Quit the viewer
    Quit,
    /// Scroll one beat earlier
    ScrollLeft,
    /// Scroll one beat later
    ScrollRight,
    /// Jump back to beat 0
    Home,
    /// More cells per beat
    ZoomIn,
    /// Fewer cells per beat
    ZoomOut,
    /// Show or hide the analysis panel
    ToggleAnalysis,
}

/// Map a key press to a viewer action
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => KeyAction::ScrollLeft,
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => KeyAction::ScrollRight,
        (KeyCode::Home, _) | (KeyCode::Char('0'), _) => KeyAction::Home,
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), _) => KeyAction::ZoomIn,
        (KeyCode::Char('-'), _) => KeyAction::ZoomOut,
        (KeyCode::Char('a'), _) | (KeyCode::Tab, _) => KeyAction::ToggleAnalysis,
        _ => KeyAction::None,
    }
}

/// Scroll and zoom state of the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    /// Index into the zoom levels
    zoom: usize,
    /// First visible beat
    pub scroll: f64,
    /// Length of the composition in beats
    pub total_beats: f64,
    /// Analysis panel visible
    pub show_analysis: bool,
}

impl ViewerState {
    /// Create state for a composition `total_beats` long
    pub fn new(total_beats: f64) -> Self {
        Self {
            zoom: 2,
            scroll: 0.0,
            total_beats,
            show_analysis: true,
        }
    }

    /// Current horizontal resolution
    pub fn cells_per_beat(&self) -> u16 {
        ZOOM_LEVELS[self.zoom]
    }

    /// Apply an action; returns false once the viewer should close
    pub fn apply(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::Quit => return false,
            KeyAction::ScrollLeft => self.scroll = (self.scroll - 1.0).max(0.0),
            KeyAction::ScrollRight => {
                let last = (self.total_beats - 1.0).max(0.0).floor();
                self.scroll = (self.scroll + 1.0).min(last);
            }
            KeyAction::Home => self.scroll = 0.0,
            KeyAction::ZoomIn => self.zoom = (self.zoom + 1).min(ZOOM_LEVELS.len() - 1),
            KeyAction::ZoomOut => self.zoom = self.zoom.saturating_sub(1),
            KeyAction::ToggleAnalysis => self.show_analysis = !self.show_analysis,
            KeyAction::None => {}
        }
        true
    }
}

/// Terminal viewer application
pub struct Viewer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    title: String,
    generated: GeneratedComposition,
    analysis: ModalAnalysis,
    state: ViewerState,
}

impl Viewer {
    /// Take over the terminal and prepare to show `composition`
    pub fn new(composition: &Composition) -> io::Result<Self> {
        let generated = composition.generate();
        let state = ViewerState::new(generated.sequence.total_beats);

        enable_raw_mode()?;
        let terminal = restore_on_error(
            || {
                let mut stdout = io::stdout();
                execute!(stdout, EnterAlternateScreen)?;
                Terminal::new(CrosstermBackend::new(stdout))
            },
            restore_terminal,
        )?;

        Ok(Self {
            terminal,
            title: format!(" {} {} ", composition.key, composition.mode),
            generated,
            analysis: composition.analysis(),
            state,
        })
    }

    /// Run until the user quits
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            self.draw()?;
            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if !self.state.apply(map_key(key.code, key.modifiers)) {
                    return Ok(());
                }
            }
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        let title = self.title.as_str();
        let generated = &self.generated;
        let analysis = &self.analysis;
        let state = &self.state;

        self.terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(5), Constraint::Length(1)])
                .split(frame.area());

            let columns = if state.show_analysis {
                Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(20), Constraint::Length(44)])
                    .split(chunks[0])
            } else {
                Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Min(20)])
                    .split(chunks[0])
            };

            let roll = PianoRollWidget::new(&generated.sequence.notes)
                .cells_per_beat(state.cells_per_beat())
                .scroll(state.scroll)
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(roll, columns[0]);

            if state.show_analysis {
                let panel = AnalysisWidget::new(analysis)
                    .block(Block::default().borders(Borders::ALL).title(" Analysis "));
                frame.render_widget(panel, columns[1]);
            }

            render_status_bar(frame, chunks[1], generated, state);
        })?;

        Ok(())
    }

    /// Restore the terminal
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Run `setup`, calling `restore` before returning its error
fn restore_on_error<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    setup().inspect_err(|_| restore())
}

/// Leave raw mode and the alternate screen outside of a built `Viewer`
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Show `composition` in the terminal until the user quits
pub fn run_viewer(composition: &Composition) -> io::Result<()> {
    let mut viewer = Viewer::new(composition)?;
    viewer.run()
}

fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    generated: &GeneratedComposition,
    state: &ViewerState,
) {
    let text = format!(
        " {} notes, {} beats | beat {} | {} cells/beat | ←/→ scroll  +/- zoom  a analysis  q quit",
        generated.sequence.len(),
        generated.sequence.total_beats,
        state.scroll,
        state.cells_per_beat(),
    );
    frame.render_widget(
        Paragraph::new(Line::from(text)).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
