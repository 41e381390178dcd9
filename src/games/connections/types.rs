//! Core domain types for Connections: categories and puzzles.

use std::collections::HashSet;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Number of categories in every puzzle.
pub const CATEGORY_COUNT: usize = 4;

/// Number of words in every category.
pub const WORDS_PER_CATEGORY: usize = 4;

/// Title used when a puzzle is built without one.
pub const DEFAULT_TITLE: &str = "Connections";

/// Errors raised while constructing a [`Category`] or [`Puzzle`].
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ConstructionError {
    /// The puzzle does not have exactly four categories.
    #[display("Puzzle must have exactly {} categories, found {found}", CATEGORY_COUNT)]
    CategoryCount {
        /// Number of categories supplied.
        found: usize,
    },

    /// A category does not have exactly four words.
    #[display("Category '{name}' must have exactly {} words, found {found}", WORDS_PER_CATEGORY)]
    WordCount {
        /// Category name.
        name: String,
        /// Number of words supplied.
        found: usize,
    },

    /// A category name or word is empty after trimming.
    #[display("Category names and words must not be blank")]
    Blank,

    /// A category lists the same word twice.
    #[display("Category '{name}' lists '{word}' more than once")]
    RepeatedWord {
        /// Category name.
        name: String,
        /// The repeated word.
        word: String,
    },

    /// The same word belongs to more than one category.
    #[display("Word '{word}' appears in more than one category")]
    DuplicateWord {
        /// The shared word.
        word: String,
    },
}

/// One group of four related words.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Getters)]
pub struct Category {
    /// Display name revealed once the group is found.
    name: String,
    /// The four member words, in authoring order.
    words: [String; WORDS_PER_CATEGORY],
    /// Difficulty level (1 easiest, 4 hardest) when the store provides one.
    difficulty: Option<u8>,
    /// Optional author note shown alongside the name.
    description: Option<String>,
}

impl Category {
    /// Creates a category from a name and exactly four distinct words.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] if the word count is not four, if any
    /// word or the name is blank, or if a word is repeated.
    #[instrument(skip_all, fields(words = words.len()))]
    pub fn new(
        name: impl Into<String>,
        words: Vec<String>,
    ) -> Result<Self, ConstructionError> {
        let name = name.into();

        if name.trim().is_empty() || words.iter().any(|w| w.trim().is_empty()) {
            return Err(ConstructionError::Blank);
        }

        let mut seen = HashSet::new();
        if let Some(word) = words.iter().find(|w| !seen.insert(w.as_str())) {
            return Err(ConstructionError::RepeatedWord {
                name,
                word: word.clone(),
            });
        }

        let found = words.len();
        let words: [String; WORDS_PER_CATEGORY] = words
            .try_into()
            .map_err(|_| ConstructionError::WordCount {
                name: name.clone(),
                found,
            })?;

        Ok(Self {
            name,
            words,
            difficulty: None,
            description: None,
        })
    }

    /// Attaches a difficulty level.
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Attaches a description.
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Returns true if `word` is a member of this category.
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    /// Counts how many of the given words belong to this category.
    pub fn overlap(&self, words: &[String]) -> usize {
        words.iter().filter(|w| self.contains(w)).count()
    }

    /// Returns true if `words` is exactly this category's word set.
    pub fn matches(&self, words: &[String]) -> bool {
        words.len() == WORDS_PER_CATEGORY && self.overlap(words) == WORDS_PER_CATEGORY
    }
}

/// A complete game definition: four categories of four words.
///
/// Immutable once built. Construction enforces the shape and that no word
/// is shared between categories, so matching a selection is never ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Puzzle {
    /// Puzzle title.
    title: String,
    /// The four categories, in the order the store supplied them.
    categories: [Category; CATEGORY_COUNT],
}

impl Puzzle {
    /// Builds a puzzle from exactly four categories.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError::CategoryCount`] for the wrong number of
    /// categories and [`ConstructionError::DuplicateWord`] if a word appears
    /// in two categories.
    #[instrument(skip(title, categories), fields(categories = categories.len()))]
    pub fn new(
        title: impl Into<String>,
        categories: Vec<Category>,
    ) -> Result<Self, ConstructionError> {
        let found = categories.len();
        let categories: [Category; CATEGORY_COUNT] = categories
            .try_into()
            .map_err(|_| ConstructionError::CategoryCount { found })?;

        let mut seen = HashSet::new();
        for word in categories.iter().flat_map(|c| c.words().iter()) {
            if !seen.insert(word.as_str()) {
                warn!(word = %word, "Word shared between categories");
                return Err(ConstructionError::DuplicateWord { word: word.clone() });
            }
        }

        let mut title = title.into();
        if title.trim().is_empty() {
            title = DEFAULT_TITLE.to_string();
        }

        debug!(title = %title, "Puzzle constructed");
        Ok(Self { title, categories })
    }

    /// Iterates over all sixteen words, category by category.
    pub fn words(&self) -> impl Iterator<Item = &String> {
        self.categories.iter().flat_map(|c| c.words().iter())
    }
}
