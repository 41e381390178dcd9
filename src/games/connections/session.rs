//! Session state machine for one play-through of a puzzle.
//!
//! A [`Session`] is a plain value. Every operation consumes it and returns
//! the next one, so the caller always holds exactly one current state.

use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::outcome::{Outcome, Proximity};
use super::types::{CATEGORY_COUNT, Category, Puzzle, WORDS_PER_CATEGORY};

/// Words that make up one guess.
pub const SELECTION_SIZE: usize = WORDS_PER_CATEGORY;

/// Guess budget granted whenever hard mode is toggled or the game restarts.
pub const HARD_MODE_GUESSES: u8 = 4;

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SessionStatus {
    /// Guesses are still being accepted.
    Playing,
    /// Every category has been found.
    Won,
    /// Hard mode ran out of guesses.
    Lost,
}

/// Runtime state of one play-through.
#[derive(Debug, Clone)]
pub struct Session {
    puzzle: Arc<Puzzle>,
    pool: Vec<String>,
    selection: Vec<String>,
    found: Vec<Category>,
    hard_mode: bool,
    guesses_remaining: u8,
    lost: bool,
}

// ─────────────────────────────────────────────────────────────
//  Construction
// ─────────────────────────────────────────────────────────────

impl Session {
    /// Starts a session with a freshly shuffled tile pool.
    pub fn initialize(puzzle: impl Into<Arc<Puzzle>>) -> Self {
        Self::initialize_with_rng(puzzle, &mut rand::rng())
    }

    /// Starts a session, shuffling with the given random source.
    #[instrument(skip_all)]
    pub fn initialize_with_rng<R: Rng + ?Sized>(
        puzzle: impl Into<Arc<Puzzle>>,
        rng: &mut R,
    ) -> Self {
        let puzzle = puzzle.into();
        let pool = shuffled_pool(&puzzle, rng);
        info!(title = %puzzle.title(), tiles = pool.len(), "Session initialized");
        Self {
            puzzle,
            pool,
            selection: Vec::with_capacity(SELECTION_SIZE),
            found: Vec::with_capacity(CATEGORY_COUNT),
            hard_mode: false,
            guesses_remaining: HARD_MODE_GUESSES,
            lost: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Player actions
// ─────────────────────────────────────────────────────────────

impl Session {
    /// Selects `word` if it is unselected, deselects it otherwise.
    ///
    /// Words outside the pool, a fifth word, and any change once the game
    /// is over are ignored.
    #[instrument(skip(self), fields(selected = self.selection.len()))]
    pub fn toggle_selection(mut self, word: &str) -> Self {
        if self.is_terminal() {
            debug!("Selection ignored, game is over");
            return self;
        }

        if let Some(index) = self.selection.iter().position(|w| w == word) {
            self.selection.remove(index);
            debug!("Word deselected");
        } else if self.selection.len() < SELECTION_SIZE && self.pool.iter().any(|w| w == word) {
            self.selection.push(word.to_string());
            debug!("Word selected");
        } else {
            debug!("Selection unchanged");
        }
        self
    }

    /// Re-randomizes the order of the tile pool.
    pub fn shuffle(self) -> Self {
        self.shuffle_with_rng(&mut rand::rng())
    }

    /// Re-randomizes the pool with the given random source.
    #[instrument(skip_all, fields(tiles = self.pool.len()))]
    pub fn shuffle_with_rng<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.pool.shuffle(rng);
        self
    }

    /// Clears the current selection.
    #[instrument(skip(self), fields(selected = self.selection.len()))]
    pub fn deselect_all(mut self) -> Self {
        self.selection.clear();
        self
    }

    /// Evaluates the current selection.
    ///
    /// Anything other than exactly four selected words leaves the session
    /// untouched and yields [`Outcome::InvalidSelection`].
    #[instrument(skip(self), fields(selection = ?self.selection, hard_mode = self.hard_mode))]
    pub fn submit(mut self) -> (Self, Outcome) {
        if self.is_terminal() || self.selection.len() != SELECTION_SIZE {
            debug!(selected = self.selection.len(), "Submission rejected");
            return (self, Outcome::InvalidSelection);
        }

        let matched = self
            .puzzle
            .categories()
            .iter()
            .find(|c| c.matches(&self.selection))
            .cloned();

        if let Some(category) = matched {
            self.pool.retain(|w| !category.contains(w));
            self.selection.clear();
            self.found.push(category.clone());
            info!(
                category = %category.name(),
                found = self.found.len(),
                remaining_tiles = self.pool.len(),
                "Category found"
            );
            return (self, Outcome::Correct(category));
        }

        if self.hard_mode {
            self.guesses_remaining = self.guesses_remaining.saturating_sub(1);
            if self.guesses_remaining == 0 {
                self.lost = true;
                self.selection.clear();
                info!("Hard mode guesses exhausted");
                return (self, Outcome::HardModeExhausted);
            }
        }

        let closest = self
            .puzzle
            .categories()
            .iter()
            .map(|c| c.overlap(&self.selection))
            .max()
            .unwrap_or(0);
        self.selection.clear();

        let proximity = Proximity::from_closest(closest);
        info!(
            closest,
            guesses_remaining = self.guesses_remaining,
            "Guess missed"
        );
        (self, Outcome::Miss(proximity))
    }

    /// Flips hard mode, restoring the full guess budget either way.
    ///
    /// Also clears a hard-mode loss, so toggling off after losing resumes
    /// play.
    #[instrument(skip(self), fields(hard_mode = self.hard_mode))]
    pub fn toggle_hard_mode(mut self) -> Self {
        self.hard_mode = !self.hard_mode;
        self.guesses_remaining = HARD_MODE_GUESSES;
        self.lost = false;
        info!(hard_mode = self.hard_mode, "Hard mode toggled");
        self
    }

    /// Starts the same puzzle over with a fresh shuffle, keeping hard mode.
    pub fn restart(self) -> Self {
        self.restart_with_rng(&mut rand::rng())
    }

    /// Starts over with the given random source.
    #[instrument(skip_all, fields(hard_mode = self.hard_mode))]
    pub fn restart_with_rng<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.pool = shuffled_pool(&self.puzzle, rng);
        self.selection.clear();
        self.found.clear();
        self.guesses_remaining = HARD_MODE_GUESSES;
        self.lost = false;
        info!("Session restarted");
        self
    }
}

// ─────────────────────────────────────────────────────────────
//  Queries
// ─────────────────────────────────────────────────────────────

impl Session {
    /// The puzzle being played.
    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    /// Tiles still on the board, in display order.
    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Currently selected words, in the order they were picked.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Found categories in discovery order.
    pub fn found(&self) -> &[Category] {
        &self.found
    }

    /// Whether hard mode is on.
    pub fn hard_mode(&self) -> bool {
        self.hard_mode
    }

    /// Guesses left before a hard-mode loss.
    pub fn guesses_remaining(&self) -> u8 {
        self.guesses_remaining
    }

    /// Returns true if `word` is currently selected.
    pub fn is_selected(&self, word: &str) -> bool {
        self.selection.iter().any(|w| w == word)
    }

    /// Current position in the state machine.
    pub fn status(&self) -> SessionStatus {
        if self.found.len() == CATEGORY_COUNT {
            SessionStatus::Won
        } else if self.lost {
            SessionStatus::Lost
        } else {
            SessionStatus::Playing
        }
    }

    /// Returns true once the game is won or lost.
    pub fn is_terminal(&self) -> bool {
        self.status() != SessionStatus::Playing
    }

    /// Every category of the puzzle, for the end-of-game reveal.
    pub fn reveal(&self) -> &[Category] {
        self.puzzle.categories()
    }
}

/// Flattens the puzzle's words and applies a uniform shuffle.
fn shuffled_pool<R: Rng + ?Sized>(puzzle: &Puzzle, rng: &mut R) -> Vec<String> {
    let mut pool: Vec<String> = puzzle.words().cloned().collect();
    pool.shuffle(rng);
    pool
}
