//! In-game screen: the tile grid and everything around it.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tracing::{debug, info, instrument};

use crate::tui::input::{GRID_COLUMNS, clamp_cursor, move_cursor};
use crate::tui::screen::{Screen, ScreenTransition};
use crate::{Category, FeedbackKind, SELECTION_SIZE, Session, SessionStatus};

/// State for a running game.
///
/// Owns the [`Session`]; every engine call consumes it and stores the result.
#[derive(Debug)]
pub struct InGameScreen {
    session: Option<Session>,
    cursor: usize,
    feedback: Option<(String, FeedbackKind)>,
}

impl InGameScreen {
    /// Starts showing a freshly initialized session.
    #[instrument(skip(session), fields(title = %session.puzzle().title()))]
    pub fn new(session: Session) -> Self {
        info!("Game started");
        Self {
            session: Some(session),
            cursor: 0,
            feedback: None,
        }
    }

    /// The current session, if one is held.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Index of the highlighted tile.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Last feedback message and its presentation hint.
    pub fn feedback(&self) -> Option<&(String, FeedbackKind)> {
        self.feedback.as_ref()
    }

    /// Applies a consuming session operation in place.
    fn step(&mut self, op: impl FnOnce(Session) -> Session) {
        if let Some(session) = self.session.take() {
            let session = op(session);
            self.cursor = clamp_cursor(self.cursor, session.pool().len());
            self.session = Some(session);
        }
    }

    fn toggle_at_cursor(&mut self) {
        let word = self
            .session
            .as_ref()
            .and_then(|s| s.pool().get(self.cursor).cloned());
        if let Some(word) = word {
            self.step(|s| s.toggle_selection(&word));
        }
    }

    fn submit(&mut self) {
        if let Some(session) = self.session.take() {
            let (session, outcome) = session.submit();
            debug!(outcome = %outcome, "Submission evaluated");
            self.feedback = Some((outcome.to_string(), outcome.kind()));
            self.cursor = clamp_cursor(self.cursor, session.pool().len());
            self.session = Some(session);
        }
    }

    fn tile_style(&self, session: &Session, index: usize, word: &str) -> Style {
        let mut style = if session.is_selected(word) {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };
        if index == self.cursor {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        style
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let mode = if session.hard_mode() {
            Span::styled("Hard Mode: ON", Style::default().fg(Color::Red))
        } else {
            Span::styled("Hard Mode: OFF", Style::default().fg(Color::DarkGray))
        };
        let mut spans = vec![
            Span::styled(
                session.puzzle().title().clone(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  |  "),
            mode,
        ];
        if session.hard_mode() && session.status() == SessionStatus::Playing {
            spans.push(Span::raw(format!(
                "  |  Guesses Remaining: {}",
                session.guesses_remaining()
            )));
        }
        let header = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Selected: {} / {}", session.selection().len(), SELECTION_SIZE));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = session.pool().len().div_ceil(GRID_COLUMNS);
        if rows == 0 {
            return;
        }
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(3); rows])
            .split(inner);

        for (row, chunk) in session.pool().chunks(GRID_COLUMNS).enumerate() {
            let Some(row_area) = row_areas.get(row) else {
                break;
            };
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                .split(*row_area);
            for (column, word) in chunk.iter().enumerate() {
                let index = row * GRID_COLUMNS + column;
                let tile = Paragraph::new(word.as_str())
                    .style(self.tile_style(session, index, word))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(tile, cells[column]);
            }
        }
    }

    fn render_ending(&self, frame: &mut Frame, area: Rect, session: &Session) {
        let lines: Vec<Line> = match session.status() {
            SessionStatus::Won => {
                let mut lines = vec![
                    Line::styled(
                        "Congratulations!",
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Line::raw("You found all the categories!"),
                ];
                if session.hard_mode() {
                    lines.push(Line::styled(
                        "Hard Mode Complete!",
                        Style::default().fg(Color::Red),
                    ));
                }
                lines
            }
            SessionStatus::Lost => {
                let mut lines = vec![
                    Line::styled(
                        "Game Over",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    ),
                    Line::raw("You ran out of guesses in Hard Mode!"),
                    Line::raw(""),
                    Line::raw("The categories were:"),
                ];
                lines.extend(session.reveal().iter().map(category_line));
                lines
            }
            SessionStatus::Playing => Vec::new(),
        };
        let ending = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(ending, area);
    }
}

fn difficulty_color(category: &Category) -> Color {
    match category.difficulty() {
        Some(1) => Color::Yellow,
        Some(2) => Color::Green,
        Some(3) => Color::Blue,
        Some(4) => Color::Magenta,
        _ => Color::White,
    }
}

fn category_line(category: &Category) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{}: ", category.name()),
            Style::default()
                .fg(difficulty_color(category))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(category.words().join(", ")),
    ])
}

impl Screen for InGameScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let found_height = if session.found().is_empty() {
            0
        } else {
            session.found().len() as u16 + 2
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(found_height),
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0], session);

        if !session.found().is_empty() {
            let found = Paragraph::new(
                session.found().iter().map(category_line).collect::<Vec<_>>(),
            )
            .block(Block::default().borders(Borders::ALL).title("Found"));
            frame.render_widget(found, chunks[1]);
        }

        if session.is_terminal() {
            self.render_ending(frame, chunks[2], session);
        } else {
            self.render_grid(frame, chunks[2], session);
        }

        let (text, color) = match &self.feedback {
            Some((message, FeedbackKind::Success)) => (message.as_str(), Color::Green),
            Some((message, FeedbackKind::Error)) => (message.as_str(), Color::Red),
            Some((message, FeedbackKind::Info)) => (message.as_str(), Color::Yellow),
            None => ("", Color::White),
        };
        let feedback = Paragraph::new(text)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(feedback, chunks[3]);

        let help = Paragraph::new(
            "←↑↓→: Move | Space: Select | s: Submit | f: Shuffle | d: Deselect | h: Hard mode | r: Restart | Esc: Puzzles | q: Quit",
        )
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key), fields(code = ?key.code))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                let tiles = self.session.as_ref().map_or(0, |s| s.pool().len());
                self.cursor = move_cursor(self.cursor, key.code, tiles);
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_at_cursor(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.submit(),
            KeyCode::Char('f') | KeyCode::Char('F') => self.step(Session::shuffle),
            KeyCode::Char('d') | KeyCode::Char('D') => self.step(Session::deselect_all),
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.step(Session::toggle_hard_mode);
                self.feedback = None;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.step(Session::restart);
                self.cursor = 0;
                self.feedback = None;
            }
            KeyCode::Esc => return ScreenTransition::GoToPuzzleSelect,
            KeyCode::Char('q') | KeyCode::Char('Q') => return ScreenTransition::Quit,
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn show_error(&mut self, message: String) {
        self.feedback = Some((message, FeedbackKind::Error));
    }
}
