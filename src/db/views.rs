//! Wire-facing views of stored puzzles and the create-puzzle request.
//!
//! These are the fixed JSON schemas shared by the REST API and its client.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::games::connections::{
    CATEGORY_COUNT, Category, ConstructionError, Puzzle, WORDS_PER_CATEGORY,
};

/// Lowest stored difficulty level.
pub const MIN_DIFFICULTY: i32 = 1;

/// Highest stored difficulty level.
pub const MAX_DIFFICULTY: i32 = 4;

/// Game listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    /// Game id.
    pub id: i32,
    /// Title.
    pub title: String,
    /// Author's user id.
    pub creator_id: i32,
    /// Author's username.
    pub creator_name: String,
    /// When the game was stored.
    pub created_at: NaiveDateTime,
}

/// Category with its words, as served to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDetail {
    /// Category id.
    pub id: i32,
    /// Category name.
    pub category_name: String,
    /// Difficulty level, 1 to 4.
    pub difficulty_level: i32,
    /// Optional author note.
    pub description: Option<String>,
    /// Member words in authoring order.
    pub words: Vec<String>,
}

/// A full game: header plus categories ordered by difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDetail {
    /// Game id.
    pub id: i32,
    /// Title.
    pub title: String,
    /// Author's user id.
    pub creator_id: i32,
    /// Author's username.
    pub creator_name: String,
    /// When the game was stored.
    pub created_at: NaiveDateTime,
    /// Categories, easiest first.
    pub categories: Vec<CategoryDetail>,
}

impl GameDetail {
    /// Converts the stored game into a playable [`Puzzle`].
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] if the stored data is not four
    /// categories of four distinct words.
    #[instrument(skip(self), fields(game_id = self.id))]
    pub fn to_puzzle(&self) -> Result<Puzzle, ConstructionError> {
        let categories = self
            .categories
            .iter()
            .map(|c| {
                let category = Category::new(c.category_name.clone(), c.words.clone())?
                    .with_description(c.description.clone());
                Ok(match u8::try_from(c.difficulty_level) {
                    Ok(level) => category.with_difficulty(level),
                    Err(_) => category,
                })
            })
            .collect::<Result<Vec<_>, ConstructionError>>()?;

        debug!(categories = categories.len(), "Building puzzle from stored game");
        Puzzle::new(self.title.clone(), categories)
    }
}

/// A user together with the games they made and played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetail {
    /// User id.
    pub id: i32,
    /// Username.
    pub username: String,
    /// When the user signed up.
    pub created_at: NaiveDateTime,
    /// Ids of games this user created.
    pub created_games: Vec<i32>,
    /// Ids of games this user has played.
    pub played_games: Vec<i32>,
}

/// Response to a successful game creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedGame {
    /// New game id.
    pub id: i32,
    /// Title as stored.
    pub title: String,
    /// Author's user id.
    pub creator_id: i32,
}

/// One category of a create-puzzle request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    /// Category name.
    #[serde(alias = "name", default)]
    pub category_name: String,
    /// Difficulty level; defaults to the category's position (1 to 4).
    #[serde(default)]
    pub difficulty_level: Option<i32>,
    /// Optional author note.
    #[serde(default)]
    pub description: Option<String>,
    /// Exactly four words.
    #[serde(default)]
    pub words: Vec<String>,
}

/// Create-puzzle request body, also the TOML puzzle file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
///
/// Missing fields deserialize to empty values so that [`NewPuzzle::validate`]
/// reports them.
pub struct NewPuzzle {
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Author's user id.
    #[serde(default)]
    pub creator_id: Option<i32>,
    /// Exactly four categories.
    #[serde(default)]
    pub categories: Vec<NewCategory>,
}

/// A puzzle as written in a TOML file, before an author is attached.
///
/// ```toml
/// title = "Tech Terms"
///
/// [[categories]]
/// name = "Cloud Providers"
/// difficulty_level = 4
/// words = ["AWS", "AZURE", "GCP", "ORACLE"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    /// Title.
    pub title: String,
    /// Exactly four categories.
    pub categories: Vec<NewCategory>,
}

impl PuzzleDefinition {
    /// Parses a TOML puzzle definition.
    ///
    /// # Errors
    ///
    /// Returns the TOML parse error.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Attaches the author, producing a create-puzzle request.
    pub fn into_request(self, creator_id: i32) -> NewPuzzle {
        NewPuzzle {
            title: self.title,
            creator_id: Some(creator_id),
            categories: self.categories,
        }
    }
}

/// Reasons a create-puzzle request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PuzzleValidationError {
    /// Title is empty.
    #[display("Game must have a title")]
    MissingTitle,

    /// No author was given.
    #[display("Game must have a creator_id")]
    MissingCreator,

    /// Not exactly four categories.
    #[display("Game must have exactly {} categories, found {found}", CATEGORY_COUNT)]
    CategoryCount {
        /// Number supplied.
        found: usize,
    },

    /// A category has no name.
    #[display("Category {position} must have a name")]
    BlankCategoryName {
        /// 1-based position of the category.
        position: usize,
    },

    /// A category does not have exactly four words.
    #[display("Each category must have exactly {} words, '{category}' has {found}", WORDS_PER_CATEGORY)]
    WordCount {
        /// Category name.
        category: String,
        /// Number supplied.
        found: usize,
    },

    /// A category contains an empty word.
    #[display("Category '{category}' contains a blank word")]
    BlankWord {
        /// Category name.
        category: String,
    },

    /// Difficulty outside 1 to 4.
    #[display("Category '{category}' has difficulty {level}, expected 1 to 4")]
    DifficultyOutOfRange {
        /// Category name.
        category: String,
        /// Level supplied.
        level: i32,
    },

    /// A word is used twice in the puzzle.
    #[display("Word '{word}' is used more than once")]
    DuplicateWord {
        /// The repeated word.
        word: String,
    },
}

impl PuzzleValidationError {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingTitle => "MISSING_TITLE",
            Self::MissingCreator => "MISSING_CREATOR",
            Self::CategoryCount { .. } => "CATEGORY_COUNT",
            Self::BlankCategoryName { .. } => "BLANK_CATEGORY_NAME",
            Self::WordCount { .. } => "WORD_COUNT",
            Self::BlankWord { .. } => "BLANK_WORD",
            Self::DifficultyOutOfRange { .. } => "DIFFICULTY_OUT_OF_RANGE",
            Self::DuplicateWord { .. } => "DUPLICATE_WORD",
        }
    }
}

impl NewPuzzle {
    /// Checks the request against the puzzle shape rules.
    ///
    /// # Errors
    ///
    /// Returns the first [`PuzzleValidationError`] found.
    #[instrument(skip(self), fields(title = %self.title))]
    pub fn validate(&self) -> Result<(), PuzzleValidationError> {
        if self.title.trim().is_empty() {
            return Err(PuzzleValidationError::MissingTitle);
        }
        self.creator()?;
        if self.categories.len() != CATEGORY_COUNT {
            return Err(PuzzleValidationError::CategoryCount {
                found: self.categories.len(),
            });
        }

        let mut seen = HashSet::new();
        for (index, category) in self.categories.iter().enumerate() {
            let name = category.category_name.trim();
            if name.is_empty() {
                return Err(PuzzleValidationError::BlankCategoryName {
                    position: index + 1,
                });
            }
            if category.words.len() != WORDS_PER_CATEGORY {
                return Err(PuzzleValidationError::WordCount {
                    category: name.to_string(),
                    found: category.words.len(),
                });
            }
            if category.words.iter().any(|w| w.trim().is_empty()) {
                return Err(PuzzleValidationError::BlankWord {
                    category: name.to_string(),
                });
            }
            let level = self.difficulty_of(index);
            if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&level) {
                return Err(PuzzleValidationError::DifficultyOutOfRange {
                    category: name.to_string(),
                    level,
                });
            }
            for word in &category.words {
                if !seen.insert(word.trim()) {
                    return Err(PuzzleValidationError::DuplicateWord {
                        word: word.trim().to_string(),
                    });
                }
            }
        }

        debug!("Puzzle request is valid");
        Ok(())
    }

    /// The author's user id.
    ///
    /// # Errors
    ///
    /// Returns [`PuzzleValidationError::MissingCreator`] if none was given.
    pub fn creator(&self) -> Result<i32, PuzzleValidationError> {
        self.creator_id.ok_or(PuzzleValidationError::MissingCreator)
    }

    /// Difficulty for the category at `index`, falling back to its position.
    pub fn difficulty_of(&self, index: usize) -> i32 {
        self.categories
            .get(index)
            .and_then(|c| c.difficulty_level)
            .unwrap_or(index as i32 + 1)
    }

    /// The sample puzzle installed by `seed`.
    pub fn tech_terms(creator_id: i32) -> Self {
        let category = |name: &str, level: i32, description: &str, words: [&str; 4]| NewCategory {
            category_name: name.to_string(),
            difficulty_level: Some(level),
            description: Some(description.to_string()),
            words: words.iter().map(|w| w.to_string()).collect(),
        };

        Self {
            title: "Tech Terms".to_string(),
            creator_id: Some(creator_id),
            categories: vec![
                category(
                    "Programming Languages",
                    1,
                    "Popular programming languages",
                    ["PYTHON", "JAVASCRIPT", "JAVA", "RUBY"],
                ),
                category(
                    "Web Technologies",
                    2,
                    "Technologies used in web development",
                    ["REACT", "ANGULAR", "VUE", "SVELTE"],
                ),
                category(
                    "Database Systems",
                    3,
                    "Types of databases",
                    ["MYSQL", "POSTGRESQL", "MONGODB", "REDIS"],
                ),
                category(
                    "Cloud Providers",
                    4,
                    "Major cloud service providers",
                    ["AWS", "AZURE", "GCP", "ORACLE"],
                ),
            ],
        }
    }
}
