//! Results of submitting a selection.
//!
//! Misses and hard-mode exhaustion are ordinary outcomes, not errors. The
//! caller decides how to present them.

use std::fmt;

use derive_more::Display;
use serde::Serialize;
use strum::EnumIter;

use super::types::Category;

/// How close a missed guess came to some category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, EnumIter)]
pub enum Proximity {
    /// Three of the four words share a category.
    #[display("One away! You have 3 correct words.")]
    OneAway,
    /// Two of the four words share a category.
    #[display("Two away! You have 2 correct words.")]
    TwoAway,
    /// At best one word lines up with any category.
    #[display("No matching words found in any category.")]
    NoMatches,
    /// Nothing lines up at all.
    #[display("Not quite! None of these words belong to the same category.")]
    NotQuite,
}

impl Proximity {
    /// Maps the best overlap with any category to a feedback tier.
    pub fn from_closest(closest: usize) -> Self {
        match closest {
            n if n >= 3 => Self::OneAway,
            2 => Self::TwoAway,
            1 => Self::NoMatches,
            _ => Self::NotQuite,
        }
    }

    /// Severity of the miss, lower is closer.
    ///
    /// `NoMatches` and `NotQuite` read differently but rank the same.
    pub fn severity(self) -> u8 {
        match self {
            Self::OneAway => 1,
            Self::TwoAway => 2,
            Self::NoMatches | Self::NotQuite => 3,
        }
    }
}

/// Presentation hint for an outcome message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FeedbackKind {
    /// A category was found.
    Success,
    /// The submission was rejected or the game was lost.
    Error,
    /// A miss with proximity feedback.
    Info,
}

/// Result of [`Session::submit`](super::Session::submit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The selection is exactly this category.
    Correct(Category),
    /// The selection matched nothing.
    Miss(Proximity),
    /// The last hard-mode guess was spent on a miss.
    HardModeExhausted,
    /// Fewer or more than four words were selected, or the game is over.
    InvalidSelection,
}

impl Outcome {
    /// Returns the presentation hint for this outcome.
    pub fn kind(&self) -> FeedbackKind {
        match self {
            Self::Correct(_) => FeedbackKind::Success,
            Self::Miss(_) => FeedbackKind::Info,
            Self::HardModeExhausted | Self::InvalidSelection => FeedbackKind::Error,
        }
    }

    /// Returns true for [`Outcome::Correct`].
    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Correct(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct(category) => write!(f, "Correct! You found: {}", category.name()),
            Self::Miss(proximity) => write!(f, "{}", proximity),
            Self::HardModeExhausted => {
                write!(f, "Game Over! You've run out of guesses in Hard Mode.")
            }
            Self::InvalidSelection => write!(f, "Please select exactly 4 words!"),
        }
    }
}
