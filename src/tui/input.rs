//! Cursor movement over the tile grid.

use crossterm::event::KeyCode;

/// Tiles per grid row.
pub const GRID_COLUMNS: usize = 4;

/// Moves the cursor with the arrow keys over a grid of `tiles` tiles.
///
/// Movement stops at the grid edges rather than wrapping.
pub fn move_cursor(cursor: usize, key: KeyCode, tiles: usize) -> usize {
    if tiles == 0 {
        return 0;
    }
    let cursor = clamp_cursor(cursor, tiles);
    let column = cursor % GRID_COLUMNS;

    match key {
        KeyCode::Right if column + 1 < GRID_COLUMNS && cursor + 1 < tiles => cursor + 1,
        KeyCode::Left if column > 0 => cursor - 1,
        KeyCode::Down if cursor + GRID_COLUMNS < tiles => cursor + GRID_COLUMNS,
        KeyCode::Up if cursor >= GRID_COLUMNS => cursor - GRID_COLUMNS,
        _ => cursor,
    }
}

/// Keeps the cursor on a tile after the grid shrinks.
pub fn clamp_cursor(cursor: usize, tiles: usize) -> usize {
    cursor.min(tiles.saturating_sub(1))
}
