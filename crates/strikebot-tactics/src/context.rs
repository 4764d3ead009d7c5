//! Per-controller telemetry side-channel.
//!
//! One `TacticsContext` is owned by each `Bot` instance and scoped to its
//! lifetime. The core publishes its most recent predictions here for the
//! host to read; nothing in the decision pipeline depends on it, so a host
//! that never looks loses nothing.

use strikebot_physics::BallPath;

use crate::advisor::TacticalSituation;

#[derive(Debug, Default)]
pub struct TacticsContext {
    /// Ball path predicted on the most recent tick.
    pub last_ball_path: Option<BallPath>,
    /// Race analysis from the most recent tick that ran one.
    pub last_situation: Option<TacticalSituation>,
}
