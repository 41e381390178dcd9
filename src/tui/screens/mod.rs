//! Screen implementations for the lobby state machine.

mod in_game;
mod profile_select;
mod puzzle_select;

pub use in_game::InGameScreen;
pub use profile_select::ProfileSelectScreen;
pub use puzzle_select::PuzzleSelectScreen;
