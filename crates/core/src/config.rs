//! Grid configuration supplied by the controller at construction.

use crate::error::GridError;
use crate::types::{
    DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_NUM_COLORS, DEFAULT_NUM_VARIETIES,
    MIN_MATCH_LEN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub num_colors: u8,
    pub num_varieties: u8,
    pub seed: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            num_colors: DEFAULT_NUM_COLORS,
            num_varieties: DEFAULT_NUM_VARIETIES,
            seed: 1,
        }
    }
}

impl GridConfig {
    pub fn new(width: usize, height: usize, num_colors: u8) -> Self {
        Self {
            width,
            height,
            num_colors,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_varieties(mut self, num_varieties: u8) -> Self {
        self.num_varieties = num_varieties;
        self
    }

    /// Read overrides from `MATCH3_*` environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        use std::env;

        fn parse<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            width: parse("MATCH3_WIDTH").unwrap_or(defaults.width),
            height: parse("MATCH3_HEIGHT").unwrap_or(defaults.height),
            num_colors: parse("MATCH3_COLORS").unwrap_or(defaults.num_colors),
            num_varieties: parse("MATCH3_VARIETIES").unwrap_or(defaults.num_varieties),
            seed: parse("MATCH3_SEED").unwrap_or(defaults.seed),
        }
    }

    /// Reject shapes the engine cannot fill or can never make playable.
    ///
    /// With fewer than 3 colors the match-free fill can deadlock (both the
    /// vertical and the horizontal neighbor pairs ruling out every color),
    /// and on a grid that admits no swap at all regeneration would never stop.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.width == 0 || self.height == 0 {
            return Err(GridError::InvalidConfig(format!(
                "grid must not be empty ({}x{})",
                self.width, self.height
            )));
        }
        // A lone line of exactly 3 cells can never be rearranged into a run.
        if self.width.max(self.height) < MIN_MATCH_LEN || self.width * self.height <= MIN_MATCH_LEN {
            return Err(GridError::InvalidConfig(format!(
                "a {}x{} grid has no playable swap",
                self.width, self.height
            )));
        }
        if self.num_colors < 3 {
            return Err(GridError::InvalidConfig(format!(
                "need at least 3 colors, got {}",
                self.num_colors
            )));
        }
        if self.num_varieties == 0 {
            return Err(GridError::InvalidConfig(
                "need at least 1 variety".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GridConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_two_colors() {
        let cfg = GridConfig::new(8, 8, 2);
        assert!(matches!(cfg.validate(), Err(GridError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_tiny_grids() {
        assert!(GridConfig::new(2, 2, 6).validate().is_err());
        assert!(GridConfig::new(0, 8, 6).validate().is_err());
        assert!(GridConfig::new(1, 3, 6).validate().is_err());
        assert!(GridConfig::new(1, 4, 6).validate().is_ok());
        assert!(GridConfig::new(3, 2, 6).validate().is_ok());
    }

    #[test]
    fn rejects_zero_varieties() {
        let cfg = GridConfig::default().with_varieties(0);
        assert!(cfg.validate().is_err());
    }
}
