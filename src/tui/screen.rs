//! Screen trait and transition type for the lobby state machine.

use crossterm::event::KeyEvent;
use ratatui::Frame;

/// The result of handling an input event on a screen.
///
/// Screens never touch the puzzle store themselves. Anything that needs the
/// store is returned as a transition and carried out by the
/// [`LobbyController`](crate::LobbyController).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenTransition {
    /// Stay on the current screen.
    Stay,
    /// Sign in as this user, creating it if needed, then list puzzles.
    SignIn {
        /// Username typed or picked by the player.
        username: String,
    },
    /// Navigate to the profile selection screen.
    GoToProfileSelect,
    /// Navigate to the puzzle list for the signed-in user.
    GoToPuzzleSelect,
    /// Load a puzzle and start playing it.
    LoadPuzzle {
        /// Stored game id.
        game_id: i32,
    },
    /// Exit the application cleanly.
    Quit,
}

/// Trait implemented by each screen in the lobby state machine.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render(&self, frame: &mut Frame);

    /// Handles a key event and returns the resulting [`ScreenTransition`].
    fn handle_key(&mut self, key: KeyEvent) -> ScreenTransition;

    /// Shows a failure from a transition the controller could not complete.
    fn show_error(&mut self, message: String);
}
