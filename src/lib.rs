//! Match-3 (workspace facade crate).
//!
//! The engine lives in dedicated crates under `crates/`; this package re-exports
//! them as `match3::{core,types}` and adds the pieces a headless controller
//! needs: the JSON line protocol and the simulator behind the `match3-sim`
//! binary.

pub mod protocol;
pub mod sim;

pub use match3_core as core;
pub use match3_types as types;
