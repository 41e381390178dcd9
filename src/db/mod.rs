//! Database persistence layer for users, puzzles and play history.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod views;

pub use error::{DbError, DbErrorKind};
pub use models::{PlayRecord, PlayRecorded, User};
pub use repository::{MIGRATIONS, PuzzleRepository};
pub use views::{
    CategoryDetail, CreatedGame, GameDetail, GameSummary, MAX_DIFFICULTY, MIN_DIFFICULTY,
    NewCategory, NewPuzzle, PuzzleDefinition, PuzzleValidationError, UserDetail,
};
