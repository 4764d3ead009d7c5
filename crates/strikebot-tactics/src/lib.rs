//! Decision layer of the strikebot agent.
//!
//! The plan/step engine (`plan`) sequences control outputs over multiple
//! ticks; the intercept solver (`intercept`) reconciles ball trajectories
//! with car capability profiles; the maneuver repertoire (`maneuvers`,
//! `set_pieces`, `steering`) produces the actual outputs; and the advisor
//! (`advisor`) runs race analysis and arbitrates which plan is active.

pub mod advisor;
pub mod context;
pub mod goals;
pub mod intercept;
pub mod maneuvers;
pub mod plan;
pub mod set_pieces;
pub mod steering;

pub use advisor::{Bot, TacticalSituation};
pub use intercept::InterceptCandidate;
pub use plan::{Plan, PlanError, Step, TickContext};

#[cfg(test)]
mod tests;
