//! Terminal client for playing Connections.
//!
//! A small lobby of screens (player, puzzle list, game) driven by
//! [`LobbyController`] over any [`PuzzleStore`](crate::PuzzleStore).

mod controller;
mod input;
mod screen;
mod screens;

pub use controller::{ActiveScreen, LobbyController};
pub use screen::{Screen, ScreenTransition};
pub use screens::{InGameScreen, ProfileSelectScreen, PuzzleSelectScreen};

use std::future::Future;
use std::io;
use std::sync::Arc;

use crossterm::{
    cursor::Show,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, instrument};

use crate::PuzzleStore;

/// Takes over the terminal and runs the lobby until the player quits.
///
/// The terminal is restored even when the lobby, or its setup, fails.
#[instrument(skip(store))]
pub async fn run_tui(store: Arc<dyn PuzzleStore>) -> anyhow::Result<()> {
    info!("Starting Connections TUI");

    enable_raw_mode()?;
    with_restore(run_lobby(store), restore_terminal).await
}

async fn run_lobby(store: Arc<dyn PuzzleStore>) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut controller = LobbyController::new(store);
    controller.run(&mut terminal).await
}

fn restore_terminal() -> anyhow::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen, Show);
    raw?;
    screen?;
    Ok(())
}

/// Runs `body`, then `restore` whatever the outcome.
///
/// An error from `body` wins over an error from `restore`.
async fn with_restore<T, F>(
    body: F,
    restore: impl FnOnce() -> anyhow::Result<()>,
) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    let result = body.await;
    let restored = restore();

    if let Err(e) = &result {
        error!(error = ?e, "Lobby loop error");
    }
    let value = result?;
    restored?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_restore_runs_when_setup_fails() {
        let restored = Cell::new(false);
        let result: anyhow::Result<()> = with_restore(
            async { Err(anyhow::anyhow!("no alternate screen")) },
            || {
                restored.set(true);
                Ok(())
            },
        )
        .await;

        assert!(restored.get());
        assert_eq!(result.unwrap_err().to_string(), "no alternate screen");
    }

    #[tokio::test]
    async fn test_restore_failure_surfaces_after_clean_exit() {
        let result = with_restore(async { Ok(7) }, || Err(anyhow::anyhow!("tty gone"))).await;
        assert_eq!(result.unwrap_err().to_string(), "tty gone");
    }

    #[tokio::test]
    async fn test_body_value_passes_through() {
        let result = with_restore(async { Ok("done") }, || Ok(())).await;
        assert_eq!(result.unwrap(), "done");
    }
}
