//! Scoring module - points per cleared token and level goals

use crate::grid::Match;
use crate::types::{GOAL_PER_LEVEL, POINTS_PER_TOKEN};

/// Points for clearing `tokens` tokens
pub fn clear_score(tokens: usize) -> u32 {
    (tokens as u32).saturating_mul(POINTS_PER_TOKEN)
}

/// Points for a set of matches.
///
/// Each match scores the tokens it deletes; a promoted survivor is not
/// counted because it stays on the board as a power-up.
pub fn matches_score(matches: &[Match]) -> u32 {
    matches
        .iter()
        .map(|m| clear_score(m.len()))
        .fold(0u32, u32::saturating_add)
}

/// Score needed to finish `level` (1-based)
pub fn goal_for_level(level: u32) -> u32 {
    level.max(1).saturating_mul(GOAL_PER_LEVEL)
}
