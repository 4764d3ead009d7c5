//! Fundamental geometric and timing types.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Seconds since the start of the match.
///
/// All timestamps in the core are expressed in game time, never wall-clock
/// time, so the whole decision pipeline stays a pure function of its inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct GameTime(f64);

impl GameTime {
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub fn secs(&self) -> f64 {
        self.0
    }

    /// A new timestamp `secs` later (negative values go backward).
    pub fn plus(&self, secs: f64) -> Self {
        Self(self.0 + secs)
    }

    /// Signed seconds from `self` until `later`.
    pub fn seconds_until(&self, later: GameTime) -> f64 {
        later.0 - self.0
    }
}

/// A position sample at a moment in time. Immutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceTime {
    pub space: DVec3,
    pub time: GameTime,
}

impl SpaceTime {
    pub fn new(space: DVec3, time: GameTime) -> Self {
        Self { space, time }
    }
}

/// A `SpaceTime` enriched with a velocity estimate, produced by
/// interpolation or by differencing adjacent path samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpaceTimeVelocity {
    pub space_time: SpaceTime,
    pub velocity: DVec3,
}

impl SpaceTimeVelocity {
    pub fn new(space: DVec3, time: GameTime, velocity: DVec3) -> Self {
        Self {
            space_time: SpaceTime::new(space, time),
            velocity,
        }
    }

    pub fn space(&self) -> DVec3 {
        self.space_time.space
    }

    pub fn time(&self) -> GameTime {
        self.space_time.time
    }
}

/// One sample of a capability profile: how far the car has traveled,
/// when, and how fast it is going at that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceTimeSpeed {
    pub distance: f64,
    pub time: GameTime,
    pub speed: f64,
}

impl DistanceTimeSpeed {
    pub fn new(distance: f64, time: GameTime, speed: f64) -> Self {
        Self {
            distance,
            time,
            speed,
        }
    }
}

/// An infinite plane given by a surface normal and any point on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: DVec3,
    pub position: DVec3,
}

impl Plane {
    pub fn new(normal: DVec3, position: DVec3) -> Self {
        Self {
            normal: normal.normalize(),
            position,
        }
    }

    /// Signed distance from a point to the plane (positive on the normal side).
    pub fn distance_to(&self, point: DVec3) -> f64 {
        self.normal.dot(point - self.position)
    }

    /// Intersection of the segment `start..start+segment` with the plane.
    ///
    /// Returns `None` when the segment is parallel to the plane or does not
    /// reach it. Degenerate geometry yields `None`, never NaN.
    pub fn segment_intersection(&self, start: DVec3, segment: DVec3) -> Option<DVec3> {
        let denominator = self.normal.dot(segment);
        if denominator.abs() < 1e-12 {
            return None;
        }

        let d = self.normal.dot(self.position);
        let x = (d - self.normal.dot(start)) / denominator;
        if !(0.0..=1.0).contains(&x) {
            return None;
        }

        Some(start + segment * x)
    }
}

/// Drop the vertical component.
pub fn flatten(v: DVec3) -> DVec2 {
    DVec2::new(v.x, v.y)
}

/// Distance between two points ignoring the vertical axis.
pub fn flat_distance(a: DVec3, b: DVec3) -> f64 {
    flatten(a).distance(flatten(b))
}

/// Rotate a flat vector counterclockwise by `radians`.
pub fn rotate_flat(v: DVec2, radians: f64) -> DVec2 {
    DVec2::new(
        v.x * radians.cos() - v.y * radians.sin(),
        v.x * radians.sin() + v.y * radians.cos(),
    )
}
