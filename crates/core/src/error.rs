//! Error types for grid and session operations.
//!
//! "No match" is never an error: detection returns `None` and the controller
//! reverts the swap. Errors are reserved for precondition violations.

use thiserror::Error;

use crate::types::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position ({}, {}) is outside the {width}x{height} grid", .position.row, .position.col)]
    InvalidPosition {
        position: Position,
        width: usize,
        height: usize,
    },

    #[error("cells ({}, {}) and ({}, {}) are not adjacent", .a.row, .a.col, .b.row, .b.col)]
    NotAdjacent { a: Position, b: Position },

    #[error("no power-up token at ({}, {})", .0.row, .0.col)]
    NotAPowerUp(Position),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("game is over")]
    GameOver,
}
