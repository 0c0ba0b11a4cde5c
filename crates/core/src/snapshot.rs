use crate::types::PowerUp;

/// Flat copy of everything a controller needs to draw one frame.
///
/// `colors` and `power_ups` are row-major (`row * width + col`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridSnapshot {
    pub width: usize,
    pub height: usize,
    pub colors: Vec<Option<u8>>,
    pub power_ups: Vec<PowerUp>,
    pub score: u32,
    pub level: u32,
    pub goal: u32,
    pub timer_ms: u32,
    pub possible_moves: usize,
    pub regenerations: u32,
    pub game_over: bool,
}

impl GridSnapshot {
    /// Reset to the empty state, keeping allocated buffers.
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.colors.clear();
        self.power_ups.clear();
        self.score = 0;
        self.level = 0;
        self.goal = 0;
        self.timer_ms = 0;
        self.possible_moves = 0;
        self.regenerations = 0;
        self.game_over = false;
    }

    pub fn playable(&self) -> bool {
        !self.game_over && self.possible_moves > 0
    }

    pub fn color(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.colors.get(row * self.width + col).copied().flatten()
    }
}
