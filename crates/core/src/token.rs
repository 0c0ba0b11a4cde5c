//! Token module - a single colored unit on the grid

use crate::types::{Position, PowerUp};

/// Grid-unique token identity.
///
/// Ids are handed out monotonically by the grid, so a controller can follow
/// one token through swaps and falls without relying on cell positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub id: TokenId,
    pub row: usize,
    pub col: usize,
    pub color: u8,
    /// Cosmetic only.
    pub variant: u8,
    pub power_up: PowerUp,
    /// Cleared by a controller while the token is being dragged.
    pub visible: bool,
}

impl Token {
    pub fn new(id: TokenId, row: usize, col: usize, color: u8, variant: u8) -> Self {
        Self {
            id,
            row,
            col,
            color,
            variant,
            power_up: PowerUp::None,
            visible: true,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }

    pub fn is_power_up(&self) -> bool {
        self.power_up.is_some()
    }
}

/// A grid cell: `None` is the one canonical empty value.
pub type Cell = Option<Token>;
