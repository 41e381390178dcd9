//! Local puzzle store backed directly by the SQLite repository.

use tracing::{debug, info, instrument};

use crate::db::{
    CreatedGame, DbError, DbErrorKind, GameSummary, NewPuzzle, PlayRecorded, PuzzleRepository,
    User,
};
use crate::games::connections::Puzzle;
use crate::store::{PuzzleStore, StoreError};

/// Service layer over [`PuzzleRepository`].
///
/// Adds get-or-create sign-in and conversion of stored games into playable
/// puzzles. The [`PuzzleStore`] impl moves each blocking call onto the
/// blocking thread pool.
#[derive(Debug, Clone)]
pub struct PuzzleService {
    repository: PuzzleRepository,
}

impl PuzzleService {
    /// Creates a new service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: PuzzleRepository) -> Self {
        info!(path = %repository.db_path(), "Creating PuzzleService");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &PuzzleRepository {
        &self.repository
    }

    /// Returns an existing user by name or creates one if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the name is blank or a database error occurs.
    #[instrument(skip(self))]
    pub fn get_or_create_user(&self, username: &str) -> Result<User, DbError> {
        let username = username.trim();
        debug!(username = %username, "Getting or creating user");

        if let Some(user) = self.repository.get_user_by_name(username)? {
            info!(user_id = user.id(), "Existing user found");
            return Ok(user);
        }

        match self.repository.create_user(username.to_string()) {
            Err(err) if err.kind == DbErrorKind::Conflict => {
                // Lost a race with another sign-in of the same name.
                self.repository
                    .get_user_by_name(username)?
                    .ok_or(err)
            }
            other => other,
        }
    }

    /// Loads a stored game and builds a playable puzzle from it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the game is missing or malformed.
    #[instrument(skip(self))]
    pub fn load_puzzle_blocking(&self, game_id: i32) -> Result<Puzzle, StoreError> {
        let detail = self.repository.game_detail(game_id)?;
        Ok(detail.to_puzzle()?)
    }
}

#[async_trait::async_trait]
impl PuzzleStore for PuzzleService {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let repository = self.repository.clone();
        Ok(tokio::task::spawn_blocking(move || repository.list_users()).await??)
    }

    async fn sign_in(&self, username: &str) -> Result<User, StoreError> {
        let service = self.clone();
        let username = username.to_string();
        Ok(tokio::task::spawn_blocking(move || service.get_or_create_user(&username)).await??)
    }

    async fn list_puzzles(&self) -> Result<Vec<GameSummary>, StoreError> {
        let repository = self.repository.clone();
        Ok(tokio::task::spawn_blocking(move || repository.list_games()).await??)
    }

    async fn load_puzzle(&self, game_id: i32) -> Result<Puzzle, StoreError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.load_puzzle_blocking(game_id)).await?
    }

    async fn create_puzzle(&self, puzzle: &NewPuzzle) -> Result<CreatedGame, StoreError> {
        let repository = self.repository.clone();
        let puzzle = puzzle.clone();
        Ok(tokio::task::spawn_blocking(move || repository.create_game(&puzzle)).await??)
    }

    async fn record_play(&self, user_id: i32, game_id: i32) -> Result<PlayRecorded, StoreError> {
        let repository = self.repository.clone();
        Ok(tokio::task::spawn_blocking(move || repository.record_play(user_id, game_id)).await??)
    }
}
