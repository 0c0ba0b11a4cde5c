//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, headless controllers, JSON protocol).
//!
//! # Board Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_WIDTH` | 8 | Columns (indexed 0-7) |
//! | `DEFAULT_BOARD_HEIGHT` | 8 | Rows (indexed 0-7, row 0 is the top) |
//! | `DEFAULT_NUM_COLORS` | 6 | Color categories used for matching |
//! | `DEFAULT_NUM_VARIETIES` | 5 | Cosmetic variants, no gameplay effect |
//!
//! # Scoring & Levels
//!
//! - `POINTS_PER_TOKEN`: 50 points for every cleared token
//! - `GOAL_PER_LEVEL`: level `n` ends once the score reaches `n * 1250`
//! - `LEVEL_TIME_MS`: 60 seconds per level
//!
//! # Examples
//!
//! ```
//! use match3_types::{Position, PowerUp, DEFAULT_BOARD_WIDTH};
//!
//! let a = Position::new(3, 3);
//! let b = Position::new(3, 4);
//! assert!(a.is_adjacent(b));
//! assert!(!a.is_adjacent(Position::new(4, 4)));
//!
//! assert_eq!(PowerUp::for_match_len(4), PowerUp::RowColClear);
//! assert!(PowerUp::for_match_len(5).is_some());
//! assert_eq!(DEFAULT_BOARD_WIDTH, 8);
//! ```

/// Default board width in cells
pub const DEFAULT_BOARD_WIDTH: usize = 8;

/// Default board height in cells
pub const DEFAULT_BOARD_HEIGHT: usize = 8;

/// Default number of color categories
pub const DEFAULT_NUM_COLORS: u8 = 6;

/// Default number of cosmetic variants per color
pub const DEFAULT_NUM_VARIETIES: u8 = 5;

/// Minimum run length that forms a match
pub const MIN_MATCH_LEN: usize = 3;

/// Points awarded per cleared token
pub const POINTS_PER_TOKEN: u32 = 50;

/// Score goal step per level (level 1 = 1250, level 2 = 2500, ...)
pub const GOAL_PER_LEVEL: u32 = 1250;

/// Time available per level (60 seconds)
pub const LEVEL_TIME_MS: u32 = 60_000;

/// A cell coordinate on the grid. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True when `other` shares an edge with this cell (no diagonals).
    pub fn is_adjacent(&self, other: Position) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr + dc == 1
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Power-up classification carried by a token
///
/// - **None**: Regular token
/// - **RowColClear**: Created from a 4-token match; clears its row and column
/// - **ColorClear**: Created from a match of 5 or more; clears every token of its color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerUp {
    #[default]
    None,
    RowColClear,
    ColorClear,
}

impl PowerUp {
    /// Power-up earned by a match of `len` tokens (before the survivor is taken out).
    ///
    /// ```
    /// use match3_types::PowerUp;
    ///
    /// assert_eq!(PowerUp::for_match_len(3), PowerUp::None);
    /// assert_eq!(PowerUp::for_match_len(4), PowerUp::RowColClear);
    /// assert_eq!(PowerUp::for_match_len(7), PowerUp::ColorClear);
    /// ```
    pub fn for_match_len(len: usize) -> Self {
        match len {
            0..=3 => PowerUp::None,
            4 => PowerUp::RowColClear,
            _ => PowerUp::ColorClear,
        }
    }

    pub fn is_some(&self) -> bool {
        !matches!(self, PowerUp::None)
    }
}

/// Core-side event emitted after a swap or power-up activation resolves.
///
/// This is engine-internal and can be mapped to the protocol `last_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoreLastEvent {
    /// Whether the action changed the board (false for a reverted swap).
    pub accepted: bool,
    /// Number of match → remove → settle rounds, including the triggering one.
    pub cascade_depth: u32,
    pub matches: u32,
    pub tokens_cleared: u32,
    pub power_ups_created: u32,
    pub score_delta: u32,
    /// The board had no legal move afterwards and was rebuilt.
    pub board_regenerated: bool,
}
