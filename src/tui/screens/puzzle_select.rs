//! Puzzle selection screen: browse stored puzzles, newest first.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::tui::screen::{Screen, ScreenTransition};
use crate::{GameSummary, User};

/// State for the puzzle selection screen.
#[derive(Debug, Getters)]
pub struct PuzzleSelectScreen {
    user: User,
    puzzles: Vec<GameSummary>,
    list_state: ListState,
    error_message: Option<String>,
}

impl PuzzleSelectScreen {
    /// Creates the screen for `user` from the listed puzzles.
    #[instrument(skip(puzzles), fields(user_id = user.id(), puzzle_count = puzzles.len()))]
    pub fn new(user: User, puzzles: Vec<GameSummary>) -> Self {
        let mut list_state = ListState::default();
        if !puzzles.is_empty() {
            list_state.select(Some(0));
        }
        debug!("PuzzleSelectScreen initialized");
        Self {
            user,
            puzzles,
            list_state,
            error_message: None,
        }
    }

    fn step(&mut self, forward: bool) {
        let len = self.puzzles.len();
        if len == 0 {
            return;
        }
        let i = match (self.list_state.selected(), forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) if i > 0 => i - 1,
            (_, false) => len - 1,
            (None, true) => 0,
        };
        self.list_state.select(Some(i));
    }
}

impl Screen for PuzzleSelectScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new(format!("Welcome, {}! Pick a puzzle", self.user.username()))
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let items: Vec<ListItem> = if self.puzzles.is_empty() {
            vec![ListItem::new("No puzzles yet. Create one with `connections create`.")]
        } else {
            self.puzzles
                .iter()
                .map(|p| {
                    ListItem::new(Line::from(vec![
                        Span::raw(p.title.clone()),
                        Span::styled(
                            format!("  by {}", p.creator_name),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                })
                .collect()
        };
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Puzzles"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = self.list_state.clone();
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let error = Paragraph::new(self.error_message.as_deref().unwrap_or(""))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(error, chunks[2]);

        let help = Paragraph::new("↑↓: Select | Enter: Play | Esc: Change player | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Up => {
                self.step(false);
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                self.step(true);
                ScreenTransition::Stay
            }
            KeyCode::Enter => {
                let Some(puzzle) = self.list_state.selected().and_then(|i| self.puzzles.get(i))
                else {
                    return ScreenTransition::Stay;
                };
                info!(game_id = puzzle.id, title = %puzzle.title, "Puzzle chosen");
                self.error_message = None;
                ScreenTransition::LoadPuzzle { game_id: puzzle.id }
            }
            KeyCode::Esc => ScreenTransition::GoToProfileSelect,
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }

    fn show_error(&mut self, message: String) {
        self.error_message = Some(message);
    }
}
