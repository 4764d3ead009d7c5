//! Time-sampled ball trajectory with interpolating queries.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use strikebot_core::constants::{BALL_RADIUS, BOUNCE_DOT_EPSILON};
use strikebot_core::types::{GameTime, Plane, SpaceTime, SpaceTimeVelocity};

/// Lifecycle misuse of a `BallPath`. Distinct from the `Option` channel
/// that query methods use for ordinary "no answer" results.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The path was truncated mid-step: its last sample does not line up
    /// with the recorded final velocity, so simulation cannot continue.
    #[error("ball path cannot be extended: endpoint does not match final velocity timestamp")]
    NotExtendable,
}

/// An ordered, time-ascending sequence of position samples plus the
/// velocity at the end of the simulated run.
///
/// Invariants: timestamps strictly increase; the first sample is the seed
/// state; extension appends only, starting exactly at the stored endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallPath {
    slices: Vec<SpaceTime>,
    final_velocity: Option<(DVec3, GameTime)>,
}

impl BallPath {
    pub fn new(seed: SpaceTime) -> Self {
        Self {
            slices: vec![seed],
            final_velocity: None,
        }
    }

    pub fn push_slice(&mut self, slice: SpaceTime) {
        debug_assert!(
            slice.time > self.endpoint().time,
            "path timestamps must strictly increase"
        );
        self.slices.push(slice);
    }

    pub fn set_final_velocity(&mut self, velocity: DVec3, time: GameTime) {
        self.final_velocity = Some((velocity, time));
    }

    pub fn slices(&self) -> &[SpaceTime] {
        &self.slices
    }

    pub fn start_point(&self) -> SpaceTime {
        self.slices[0]
    }

    pub fn endpoint(&self) -> SpaceTime {
        self.slices[self.slices.len() - 1]
    }

    pub fn final_velocity(&self) -> Option<DVec3> {
        self.final_velocity.map(|(v, _)| v)
    }

    /// True when the last sample coincides with the recorded final
    /// velocity, i.e. simulation may continue from the endpoint.
    pub fn can_extend(&self) -> bool {
        match self.final_velocity {
            Some((_, t)) => self.endpoint().time == t,
            None => false,
        }
    }

    /// Interpolated ball state at `time`.
    ///
    /// `None` outside `[first, last]`. Between samples the position is a
    /// linear blend and the velocity is the secant slope of the bracketing
    /// pair; at or beyond the last interior bracket the endpoint and final
    /// velocity are used.
    pub fn motion_at(&self, time: GameTime) -> Option<SpaceTimeVelocity> {
        if time < self.start_point().time || time > self.endpoint().time {
            return None;
        }

        for i in 1..self.slices.len() {
            let slice = self.slices[i];
            if slice.time > time {
                let previous = self.slices[i - 1];
                let step_secs = previous.time.seconds_until(slice.time);
                let tween = previous.time.seconds_until(time) / step_secs;
                let space = previous.space + (slice.space - previous.space) * tween;
                let velocity = secant_velocity(&previous, &slice);
                return Some(SpaceTimeVelocity::new(space, time, velocity));
            }
        }

        let endpoint = self.endpoint();
        let velocity = self
            .final_velocity()
            .unwrap_or_else(|| self.last_secant_velocity());
        Some(SpaceTimeVelocity::new(endpoint.space, endpoint.time, velocity))
    }

    /// Ball state just after the `n`-th bounce. Counting starts at 1.
    ///
    /// A bounce is recorded when consecutive secant-velocity estimates
    /// point in opposing directions: their normalized dot product falls
    /// below `-BOUNCE_DOT_EPSILON`. Near-zero dot products are deliberately
    /// not bounces, so grazing contact cannot flip-flop the count.
    pub fn motion_after_bounce(&self, n: u32) -> Option<SpaceTimeVelocity> {
        assert!(n > 0, "bounce counting starts at 1");

        let mut bounces = 0;
        let mut previous_velocity: Option<DVec3> = None;

        for i in 1..self.slices.len() {
            let previous = self.slices[i - 1];
            let slice = self.slices[i];
            let velocity = secant_velocity(&previous, &slice);

            if let Some(prev) = previous_velocity {
                if is_bounce(prev, velocity) {
                    bounces += 1;
                    if bounces == n {
                        if i + 1 >= self.slices.len() {
                            return None;
                        }
                        let next = self.slices[i + 1];
                        return Some(SpaceTimeVelocity {
                            space_time: next,
                            velocity: secant_velocity(&slice, &next),
                        });
                    }
                }
            }

            previous_velocity = Some(velocity);
        }

        None
    }

    /// First crossing of `plane` at or after `after`, scanning ascending.
    ///
    /// With `directional` set, only crossings that approach against the
    /// plane normal count (e.g. a ball entering a goal mouth, not leaving).
    pub fn plane_break(
        &self,
        after: GameTime,
        plane: &Plane,
        directional: bool,
    ) -> Option<SpaceTimeVelocity> {
        for i in 1..self.slices.len() {
            let previous = self.slices[i - 1];
            let slice = self.slices[i];
            if slice.time < after {
                continue;
            }

            let segment = slice.space - previous.space;
            if directional && segment.dot(plane.normal) >= 0.0 {
                continue;
            }

            if let Some(crossing) = plane.segment_intersection(previous.space, segment) {
                let step_secs = previous.time.seconds_until(slice.time);
                let fraction = if segment.length() > 1e-12 {
                    (crossing - previous.space).length() / segment.length()
                } else {
                    0.0
                };
                let time = previous.time.plus(step_secs * fraction);
                return Some(SpaceTimeVelocity::new(
                    crossing,
                    time,
                    secant_velocity(&previous, &slice),
                ));
            }
        }

        None
    }

    /// First floor touch at or after `after`: the moment the vertical
    /// velocity flips from falling to rising.
    pub fn landing(&self, after: GameTime) -> Option<SpaceTimeVelocity> {
        let mut previous_velocity: Option<DVec3> = None;

        for i in 1..self.slices.len() {
            let previous = self.slices[i - 1];
            let slice = self.slices[i];

            if slice.time < after {
                continue;
            }

            let velocity = secant_velocity(&previous, &slice);
            if let Some(prev) = previous_velocity {
                if prev.z < 0.0 && velocity.z > 0.0 {
                    if i + 1 >= self.slices.len() {
                        return None;
                    }
                    // Pick whichever bracketing sample sits closer to the floor.
                    let (space, time) = if previous.space.z < slice.space.z {
                        (previous.space, previous.time)
                    } else {
                        (slice.space, slice.time)
                    };
                    let touch = DVec3::new(space.x, space.y, BALL_RADIUS);
                    let next = self.slices[i + 1];
                    return Some(SpaceTimeVelocity::new(
                        touch,
                        time,
                        secant_velocity(&slice, &next),
                    ));
                }
            }
            previous_velocity = Some(velocity);
        }

        None
    }

    fn last_secant_velocity(&self) -> DVec3 {
        if self.slices.len() < 2 {
            return DVec3::ZERO;
        }
        let a = self.slices[self.slices.len() - 2];
        let b = self.slices[self.slices.len() - 1];
        secant_velocity(&a, &b)
    }
}

fn secant_velocity(before: &SpaceTime, after: &SpaceTime) -> DVec3 {
    let secs = before.time.seconds_until(after.time);
    (after.space - before.space) / secs
}

fn is_bounce(previous: DVec3, current: DVec3) -> bool {
    let prev = previous.normalize_or_zero();
    let curr = current.normalize_or_zero();
    prev.dot(curr) < -BOUNCE_DOT_EPSILON
}
