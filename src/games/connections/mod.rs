//! Connections: group sixteen words into four hidden categories.
//!
//! [`Puzzle`] validates the shape of a game definition, [`Session`] runs a
//! single play-through and [`Outcome`] reports what a submission did.

mod outcome;
mod session;
mod types;

pub use outcome::{FeedbackKind, Outcome, Proximity};
pub use session::{HARD_MODE_GUESSES, SELECTION_SIZE, Session, SessionStatus};
pub use types::{
    CATEGORY_COUNT, Category, ConstructionError, DEFAULT_TITLE, Puzzle, WORDS_PER_CATEGORY,
};
