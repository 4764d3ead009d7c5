//! Per-tick world snapshot delivered by the host bridge.
//!
//! Snapshots are plain immutable data: the core reads them and never
//! writes back. Construction happens once per tick at the bridge boundary.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::Team;
use crate::types::GameTime;

/// Orthonormal orientation frame of a car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarOrientation {
    /// Unit vector out the nose.
    pub forward: DVec3,
    /// Unit vector out the roof.
    pub up: DVec3,
}

impl CarOrientation {
    pub fn new(forward: DVec3, up: DVec3) -> Self {
        Self {
            forward: forward.normalize(),
            up: up.normalize(),
        }
    }

    /// Frame of a car sitting flat on the ground facing `forward_flat`.
    pub fn level(forward_flat: DVec3) -> Self {
        Self::new(
            DVec3::new(forward_flat.x, forward_flat.y, 0.0),
            DVec3::Z,
        )
    }

    /// Unit vector out the right side (completes the right-handed frame).
    pub fn side(&self) -> DVec3 {
        self.forward.cross(self.up)
    }
}

/// Public state of one car at one tick. Never mutated after construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarState {
    pub position: DVec3,
    pub velocity: DVec3,
    pub orientation: CarOrientation,
    /// Boost reserve, 0-100.
    pub boost: f64,
    pub supersonic: bool,
    pub team: Team,
    pub time: GameTime,
}

/// Ball state at one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Goals scored so far, by team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub blue: u32,
    pub orange: u32,
}

/// Everything the agent knows about one tick of the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: GameTime,
    pub ball: BallState,
    pub blue_car: CarState,
    pub orange_car: CarState,
    pub score: ScoreLine,
}

impl WorldSnapshot {
    pub fn car(&self, team: Team) -> &CarState {
        match team {
            Team::Blue => &self.blue_car,
            Team::Orange => &self.orange_car,
        }
    }

    pub fn opponent_car(&self, team: Team) -> &CarState {
        self.car(team.opponent())
    }
}
