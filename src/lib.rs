//! Connections - a word-association puzzle game
//!
//! Players see sixteen words and must sort them into four hidden groups of
//! four. This library provides the match engine, a SQLite puzzle store, the
//! REST API that serves it, and clients for both.
//!
//! # Architecture
//!
//! - **Games**: the pure match engine ([`Puzzle`], [`Session`], [`Outcome`])
//! - **Db**: diesel repository for users, puzzles and play history
//! - **Api**: axum router exposing the repository as JSON
//! - **Store**: [`PuzzleStore`] trait with local and HTTP implementations
//! - **Tui**: ratatui lobby and game screens over any store
//!
//! # Example
//!
//! ```
//! use connections::{Category, Outcome, Puzzle, Session};
//!
//! let category = |name: &str, prefix: &str| {
//!     let words = (1..=4).map(|i| format!("{prefix}{i}")).collect();
//!     Category::new(name, words).unwrap()
//! };
//! let puzzle = Puzzle::new(
//!     "Demo",
//!     vec![category("A", "a"), category("B", "b"), category("C", "c"), category("D", "d")],
//! )
//! .unwrap();
//!
//! let mut session = Session::initialize(puzzle);
//! for word in ["a1", "a2", "a3", "a4"] {
//!     session = session.toggle_selection(word);
//! }
//! let (session, outcome) = session.submit();
//! assert!(matches!(outcome, Outcome::Correct(_)));
//! assert_eq!(session.pool().len(), 12);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod api;
mod config;
mod db;
mod games;
mod puzzle_service;
mod store;
mod tui;

// Crate-level exports - Match engine
pub use games::connections::{
    CATEGORY_COUNT, Category, ConstructionError, DEFAULT_TITLE, FeedbackKind, HARD_MODE_GUESSES,
    Outcome, Proximity, Puzzle, SELECTION_SIZE, Session, SessionStatus, WORDS_PER_CATEGORY,
};

// Crate-level exports - Persistence
pub use db::{
    CategoryDetail, CreatedGame, DbError, DbErrorKind, GameDetail, GameSummary, MAX_DIFFICULTY,
    MIGRATIONS, MIN_DIFFICULTY, NewCategory, NewPuzzle, PlayRecord, PlayRecorded,
    PuzzleDefinition, PuzzleRepository, PuzzleValidationError, User, UserDetail,
};

// Crate-level exports - REST API
pub use api::{
    ApiError, ApiErrorResponse, AppState, CreateUserRequest, HealthStatus, PlayedMessage,
    UserQuery, create_router,
};

// Crate-level exports - Store clients
pub use puzzle_service::PuzzleService;
pub use store::{PuzzleStore, RestPuzzleClient, StoreError};

// Crate-level exports - Terminal client
pub use tui::{
    ActiveScreen, InGameScreen, LobbyController, ProfileSelectScreen, PuzzleSelectScreen, Screen,
    ScreenTransition, run_tui,
};

// Crate-level exports - Configuration
pub use config::{ConfigError, DB_ENV, HOST_ENV, PORT_ENV, ServerConfig};
