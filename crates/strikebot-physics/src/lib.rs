//! Forward physics predictors for the strikebot agent.
//!
//! Two independent models: the ball's future trajectory against the arena
//! (`arena` + `ball_path`), and the car's achievable travel distance over
//! time for a given boost budget (`acceleration`). Both are deterministic
//! pure functions of their inputs.

pub mod acceleration;
pub mod arena;
pub mod ball_path;

pub use arena::ArenaModel;
pub use ball_path::{BallPath, PathError};

#[cfg(test)]
mod tests;
