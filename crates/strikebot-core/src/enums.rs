//! Enumeration types shared across the agent.

use serde::{Deserialize, Serialize};

/// Team identity. Blue defends the negative-y goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Blue,
    Orange,
}

impl Team {
    pub fn opponent(&self) -> Team {
        match self {
            Team::Blue => Team::Orange,
            Team::Orange => Team::Blue,
        }
    }

    /// Sign of the y coordinate of this team's own goal.
    pub fn goal_side(&self) -> f64 {
        match self {
            Team::Blue => -1.0,
            Team::Orange => 1.0,
        }
    }
}

/// Urgency classification attached to a plan.
///
/// Declaration order is ascending urgency; the derived `Ord` drives
/// interrupt arbitration: an active plan is only replaced by a plan of
/// strictly greater posture (and only if it permits interruption).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Posture {
    #[default]
    Neutral,
    Offensive,
    Defensive,
    /// Ball is headed into the enemy box; push it in.
    Shot,
    /// Ball is headed into our box; get it out.
    Clear,
    /// A goal against us is predicted; block it.
    Save,
    /// Airborne with wheels off the ground; nothing else is executable.
    Landing,
    /// Kickoff is live; preempts everything.
    Kickoff,
}

impl Posture {
    pub fn less_urgent_than(&self, other: Posture) -> bool {
        *self < other
    }
}
