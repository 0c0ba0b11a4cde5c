//! Core match-3 logic module - pure, deterministic, and testable
//!
//! This crate contains the grid engine and the rules around it. It has **no
//! dependencies** on rendering, audio, input or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical boards and refills
//! - **Testable**: Boards can be hand-built with [`Grid::from_layout`]
//! - **Portable**: Any controller (terminal, GUI, headless bot) can drive it
//!
//! # Module Structure
//!
//! - [`grid`]: Token storage, match detection, removal, gravity and refill,
//!   move counting and power-up activation
//! - `matcher`: Connected run discovery used by [`Grid::find_matches`]
//! - [`session`]: Controller for one game (swap/revert, cascades, score, levels)
//! - [`token`]: The colored unit stored in each cell
//! - [`rng`]: Seeded LCG for colors and variants
//! - [`scoring`]: Points per token and level goals
//! - [`snapshot`]: Flat board copy for observers
//!
//! # Game Rules
//!
//! - **Match**: 3 or more equal colors in a row or column; touching runs merge
//! - **Power-ups**: A match of 4 turns the last-moved token into a row/column
//!   clear, a match of 5+ into a color clear
//! - **Cascades**: After gravity and refill, new matches resolve automatically
//! - **Deadlock**: A board without a possible swap is rebuilt silently
//! - **Scoring**: 50 points per cleared token
//!
//! # Example
//!
//! ```
//! use match3_core::{GridConfig, Session, SwapOutcome};
//!
//! let mut session = Session::new(GridConfig::default().with_seed(12345)).unwrap();
//! let (from, to) = session.grid_mut().possible_swaps()[0];
//!
//! match session.try_swap(from, to).unwrap() {
//!     SwapOutcome::Resolved(report) => assert!(report.score_delta >= 150),
//!     SwapOutcome::Reverted => unreachable!("listed swaps always match"),
//! }
//! assert!(session.grid().is_full());
//! ```

pub mod config;
pub mod error;
pub mod grid;
mod matcher;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod token;

pub use match3_types as types;

// Re-export commonly used types for convenience
pub use config::GridConfig;
pub use error::GridError;
pub use grid::{Fall, Grid, Match, PowerUpRequest};
pub use rng::SimpleRng;
pub use scoring::{clear_score, goal_for_level, matches_score};
pub use session::{CascadeReport, CascadeStep, Session, SwapOutcome};
pub use snapshot::GridSnapshot;
pub use token::{Cell, Token, TokenId};
