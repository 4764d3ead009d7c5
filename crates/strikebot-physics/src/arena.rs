//! Rigid-sphere ball simulation against the static arena boundaries.
//!
//! Six planes (floor, ceiling, four walls), coefficient of restitution
//! exactly 1, constant downward gravity. Energy-conserving bounces are a
//! deliberate simplification: predicted paths only need to be trustworthy
//! over a few seconds of lookahead.

use glam::DVec3;

use strikebot_core::constants::*;
use strikebot_core::types::{flatten, GameTime, Plane, SpaceTime};

use crate::ball_path::{BallPath, PathError};

/// The static collision environment.
pub struct ArenaModel {
    planes: [Plane; 6],
}

impl Default for ArenaModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ArenaModel {
    pub fn new() -> Self {
        Self {
            planes: [
                Plane::new(DVec3::Z, DVec3::ZERO),
                Plane::new(-DVec3::Z, DVec3::new(0.0, 0.0, CEILING)),
                Plane::new(DVec3::X, DVec3::new(-SIDE_WALL, 0.0, 0.0)),
                Plane::new(-DVec3::X, DVec3::new(SIDE_WALL, 0.0, 0.0)),
                Plane::new(DVec3::Y, DVec3::new(0.0, -BACK_WALL, 0.0)),
                Plane::new(-DVec3::Y, DVec3::new(0.0, BACK_WALL, 0.0)),
            ],
        }
    }

    /// Whether a ball centered at this position is inside the walls.
    pub fn is_in_bounds(&self, position: DVec3) -> bool {
        let flat = flatten(position);
        flat.x.abs() < SIDE_WALL - BALL_RADIUS && flat.y.abs() < BACK_WALL - BALL_RADIUS
    }

    /// Simulate the ball forward and produce its sampled trajectory.
    ///
    /// One `SpaceTime` sample is recorded per macro step
    /// (`BALL_SIMULATION_STEP_SECS`); the velocity at the end of the run is
    /// recorded separately since velocity is not sampled per slice.
    pub fn predict_ball_path(
        &self,
        position: DVec3,
        velocity: DVec3,
        start: GameTime,
        horizon_secs: f64,
    ) -> BallPath {
        let mut path = BallPath::new(SpaceTime::new(position, start));
        self.run_simulation(&mut path, position, velocity, start, horizon_secs);
        path
    }

    /// Continue a previously predicted path for `additional_secs` more.
    ///
    /// Precondition: the path's last sample must coincide with its recorded
    /// final velocity (`BallPath::can_extend`). A truncated path cannot be
    /// extended because the ball's velocity at the cut point is unknown.
    pub fn extend_ball_path(
        &self,
        path: &mut BallPath,
        additional_secs: f64,
    ) -> Result<(), PathError> {
        let velocity = match path.final_velocity() {
            Some(velocity) if path.can_extend() => velocity,
            _ => return Err(PathError::NotExtendable),
        };
        let endpoint = path.endpoint();
        self.run_simulation(path, endpoint.space, velocity, endpoint.time, additional_secs);
        Ok(())
    }

    fn run_simulation(
        &self,
        path: &mut BallPath,
        mut position: DVec3,
        mut velocity: DVec3,
        start: GameTime,
        horizon_secs: f64,
    ) {
        let macro_steps = (horizon_secs / BALL_SIMULATION_STEP_SECS).round() as u32;
        let sub_dt = BALL_SIMULATION_STEP_SECS / BALL_SIMULATION_SUB_STEPS as f64;

        let mut time = start;
        for _ in 0..macro_steps {
            for _ in 0..BALL_SIMULATION_SUB_STEPS {
                (position, velocity) = self.step_ball(position, velocity, sub_dt);
            }
            time = time.plus(BALL_SIMULATION_STEP_SECS);
            path.push_slice(SpaceTime::new(position, time));
        }
        path.set_final_velocity(velocity, time);
    }

    /// Advance the ball by one integration sub-step: gravity, drift, then
    /// elastic reflection off any plane the sphere has penetrated while
    /// moving inward.
    pub fn step_ball(&self, position: DVec3, velocity: DVec3, dt: f64) -> (DVec3, DVec3) {
        let mut velocity = velocity + DVec3::new(0.0, 0.0, -GRAVITY * dt);
        let mut position = position + velocity * dt;

        for plane in &self.planes {
            let clearance = plane.distance_to(position) - BALL_RADIUS;
            if clearance < 0.0 && velocity.dot(plane.normal) < 0.0 {
                // Restitution 1: mirror the normal component, keep tangential.
                velocity -= plane.normal * (2.0 * velocity.dot(plane.normal));
                position -= plane.normal * clearance;
            }
        }

        (position, velocity)
    }
}
