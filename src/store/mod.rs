//! Puzzle store abstraction shared by the local service and the REST client.
//!
//! The terminal client only talks to a [`PuzzleStore`]; whether puzzles come
//! from a SQLite file or a running server is decided at startup.

mod rest_client;

pub use rest_client::RestPuzzleClient;

use derive_more::{Display, Error};

use crate::db::{CreatedGame, DbError, GameSummary, NewPuzzle, PlayRecorded, User};
use crate::games::connections::{ConstructionError, Puzzle};

/// Any failure reaching or reading the puzzle store.
///
/// Shown to the player verbatim; there is no retry.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("{message}")]
pub struct StoreError {
    /// Human-readable description.
    pub message: String,
}

impl StoreError {
    /// Creates a store error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        Self::new(err.message)
    }
}

impl From<ConstructionError> for StoreError {
    fn from(err: ConstructionError) -> Self {
        Self::new(format!("Puzzle could not be loaded: {}", err))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("Puzzle server unreachable: {}", err))
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::new(format!("Store task failed: {}", err))
    }
}

/// Source of users and puzzles for the terminal client.
#[async_trait::async_trait]
pub trait PuzzleStore: Send + Sync {
    /// Lists known users, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Returns the user with this name, creating it if needed.
    async fn sign_in(&self, username: &str) -> Result<User, StoreError>;

    /// Lists available puzzles, newest first.
    async fn list_puzzles(&self) -> Result<Vec<GameSummary>, StoreError>;

    /// Loads a puzzle ready for play.
    ///
    /// Fails if the stored game is not a well-formed puzzle.
    async fn load_puzzle(&self, game_id: i32) -> Result<Puzzle, StoreError>;

    /// Validates and stores a new puzzle.
    async fn create_puzzle(&self, puzzle: &NewPuzzle) -> Result<CreatedGame, StoreError>;

    /// Marks a puzzle as played by a user.
    async fn record_play(&self, user_id: i32, game_id: i32) -> Result<PlayRecorded, StoreError>;
}
