//! Input accumulation between ticks.
//!
//! # Invariants
//! - Event callbacks only write the accumulator; rendering state is
//!   never touched from a callback.
//! - The tick reads the accumulator exactly once, at its start.

pub mod accumulator;

pub use accumulator::{InputAccumulator, MOVE_STEP, MoveKey};
