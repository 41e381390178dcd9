//! Profile selection screen: pick an existing player or type a new name.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::User;
use crate::tui::screen::{Screen, ScreenTransition};

/// State for the profile selection screen.
#[derive(Debug, Getters)]
pub struct ProfileSelectScreen {
    users: Vec<User>,
    list_state: ListState,
    new_name_input: String,
    input_mode: bool,
    error_message: Option<String>,
}

impl ProfileSelectScreen {
    /// Creates the screen from the users the store returned.
    #[instrument(skip(users), fields(user_count = users.len()))]
    pub fn new(users: Vec<User>) -> Self {
        let mut list_state = ListState::default();
        if !users.is_empty() {
            list_state.select(Some(0));
        }
        debug!("ProfileSelectScreen initialized");
        Self {
            input_mode: users.is_empty(),
            users,
            list_state,
            new_name_input: String::new(),
            error_message: None,
        }
    }

    fn select_previous(&mut self) {
        if self.users.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i > 0 => i - 1,
            _ => self.users.len() - 1,
        };
        self.list_state.select(Some(i));
    }

    fn select_next(&mut self) {
        if self.users.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.users.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Username under the list cursor.
    fn highlighted_username(&self) -> Option<String> {
        self.list_state
            .selected()
            .and_then(|i| self.users.get(i))
            .map(|u| u.username().clone())
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> ScreenTransition {
        match key.code {
            KeyCode::Char(c) => {
                self.new_name_input.push(c);
                ScreenTransition::Stay
            }
            KeyCode::Backspace => {
                self.new_name_input.pop();
                ScreenTransition::Stay
            }
            KeyCode::Enter => {
                let username = self.new_name_input.trim().to_string();
                if username.is_empty() {
                    self.error_message = Some("Name cannot be empty".to_string());
                    return ScreenTransition::Stay;
                }
                info!(username = %username, "New profile requested");
                ScreenTransition::SignIn { username }
            }
            KeyCode::Esc => {
                self.input_mode = false;
                self.new_name_input.clear();
                self.error_message = None;
                ScreenTransition::Stay
            }
            _ => ScreenTransition::Stay,
        }
    }
}

impl Screen for ProfileSelectScreen {
    #[instrument(skip(self, frame))]
    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new("Connections - Who's playing?")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let items: Vec<ListItem> = self
            .users
            .iter()
            .map(|u| ListItem::new(u.username().as_str()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Players"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = self.list_state.clone();
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let (input_title, input_style) = if self.input_mode {
            (
                "New player name (Enter to confirm, Esc to cancel)",
                Style::default().fg(Color::White),
            )
        } else {
            ("Press 'n' to add a player", Style::default().fg(Color::DarkGray))
        };
        let input = Paragraph::new(self.new_name_input.as_str())
            .style(input_style)
            .block(Block::default().borders(Borders::ALL).title(input_title));
        frame.render_widget(input, chunks[2]);

        let error = Paragraph::new(self.error_message.as_deref().unwrap_or(""))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(error, chunks[3]);

        let help_text = if self.input_mode {
            "Type name | Enter: Confirm | Esc: Cancel"
        } else {
            "↑↓: Select | Enter: Play | n: New | q: Quit"
        };
        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key))]
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition {
        if self.input_mode {
            return self.handle_input_key(key);
        }
        match key.code {
            KeyCode::Up => {
                self.select_previous();
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                self.select_next();
                ScreenTransition::Stay
            }
            KeyCode::Enter => match self.highlighted_username() {
                Some(username) => ScreenTransition::SignIn { username },
                None => {
                    self.input_mode = true;
                    ScreenTransition::Stay
                }
            },
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.input_mode = true;
                self.error_message = None;
                ScreenTransition::Stay
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }

    fn show_error(&mut self, message: String) {
        self.error_message = Some(message);
    }
}
