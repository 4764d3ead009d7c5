//! Headless self-play harness.
//!
//! Drives two independent controllers against a toy match world at the
//! host tick cadence and emits serializable snapshots. Completely headless,
//! enabling deterministic testing.

pub mod match_sim;

pub use match_sim::{Match, MatchSnapshot, SelfPlayConfig};

#[cfg(test)]
mod tests;
