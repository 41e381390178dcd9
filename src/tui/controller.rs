//! Lobby controller: the state machine driving the terminal client.

use std::sync::Arc;

use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use tokio::time::{Duration, sleep};
use tracing::{debug, error, info, instrument, warn};

use crate::tui::screen::{Screen, ScreenTransition};
use crate::tui::screens::{InGameScreen, ProfileSelectScreen, PuzzleSelectScreen};
use crate::{PuzzleStore, Session, User};

/// Active screen in the lobby state machine.
#[derive(Debug)]
pub enum ActiveScreen {
    /// Choosing who plays.
    ProfileSelect(ProfileSelectScreen),
    /// Choosing what to play.
    PuzzleSelect(PuzzleSelectScreen),
    /// Playing.
    InGame(InGameScreen),
}

impl ActiveScreen {
    fn screen(&self) -> &dyn Screen {
        match self {
            Self::ProfileSelect(s) => s,
            Self::PuzzleSelect(s) => s,
            Self::InGame(s) => s,
        }
    }

    fn screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            Self::ProfileSelect(s) => s,
            Self::PuzzleSelect(s) => s,
            Self::InGame(s) => s,
        }
    }
}

/// Controller that drives the lobby state machine.
///
/// Call [`LobbyController::run`] to start the event loop.
pub struct LobbyController {
    store: Arc<dyn PuzzleStore>,
    current_user: Option<User>,
}

impl std::fmt::Debug for LobbyController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LobbyController")
            .field("current_user", &self.current_user)
            .finish_non_exhaustive()
    }
}

impl LobbyController {
    /// Creates a new lobby controller over a puzzle store.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn PuzzleStore>) -> Self {
        info!("Creating LobbyController");
        Self {
            store,
            current_user: None,
        }
    }

    /// The signed-in player, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Runs the lobby event loop until the user quits.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting lobby event loop");
        let mut screen = self.profile_select().await;

        loop {
            terminal.draw(|f| screen.screen().render(f))?;

            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
            {
                // Skip key release events (crossterm fires both press and release).
                if key.kind == KeyEventKind::Release {
                    continue;
                }

                let transition = screen.screen_mut().handle_key(key);
                screen = match self.apply_transition(transition, screen).await {
                    Some(next) => next,
                    None => {
                        info!("Lobby quitting");
                        return Ok(());
                    }
                };
            }

            sleep(Duration::from_millis(10)).await;
        }
    }

    /// Applies a screen transition, returning the next screen or `None` to quit.
    ///
    /// Store failures keep the current screen and show the error on it.
    #[instrument(skip(self, current))]
    pub async fn apply_transition(
        &mut self,
        transition: ScreenTransition,
        mut current: ActiveScreen,
    ) -> Option<ActiveScreen> {
        debug!(transition = ?transition, "Applying screen transition");
        match transition {
            ScreenTransition::Stay => Some(current),

            ScreenTransition::SignIn { username } => match self.store.sign_in(&username).await {
                Ok(user) => {
                    info!(user_id = user.id(), "Signed in");
                    self.current_user = Some(user.clone());
                    Some(self.puzzle_select(user).await)
                }
                Err(e) => {
                    warn!(error = %e, "Sign-in failed");
                    current.screen_mut().show_error(e.to_string());
                    Some(current)
                }
            },

            ScreenTransition::GoToProfileSelect => {
                self.current_user = None;
                Some(self.profile_select().await)
            }

            ScreenTransition::GoToPuzzleSelect => match self.current_user.clone() {
                Some(user) => Some(self.puzzle_select(user).await),
                None => {
                    warn!("No user for PuzzleSelect, redirecting to ProfileSelect");
                    Some(self.profile_select().await)
                }
            },

            ScreenTransition::LoadPuzzle { game_id } => {
                match self.store.load_puzzle(game_id).await {
                    Ok(puzzle) => {
                        if let Some(user) = &self.current_user
                            && let Err(e) = self.store.record_play(*user.id(), game_id).await
                        {
                            warn!(error = %e, "Failed to record play");
                        }
                        Some(ActiveScreen::InGame(InGameScreen::new(Session::initialize(
                            puzzle,
                        ))))
                    }
                    Err(e) => {
                        error!(game_id, error = %e, "Puzzle failed to load");
                        current.screen_mut().show_error(e.to_string());
                        Some(current)
                    }
                }
            }

            ScreenTransition::Quit => None,
        }
    }

    /// Builds the profile screen, listing users from the store.
    async fn profile_select(&self) -> ActiveScreen {
        let screen = match self.store.list_users().await {
            Ok(users) => ProfileSelectScreen::new(users),
            Err(e) => {
                let mut screen = ProfileSelectScreen::new(Vec::new());
                screen.show_error(e.to_string());
                screen
            }
        };
        ActiveScreen::ProfileSelect(screen)
    }

    /// Builds the puzzle screen for `user`, listing puzzles from the store.
    async fn puzzle_select(&self, user: User) -> ActiveScreen {
        match self.store.list_puzzles().await {
            Ok(puzzles) => ActiveScreen::PuzzleSelect(PuzzleSelectScreen::new(user, puzzles)),
            Err(e) => {
                let mut screen = PuzzleSelectScreen::new(user, Vec::new());
                screen.show_error(e.to_string());
                ActiveScreen::PuzzleSelect(screen)
            }
        }
    }
}
