//! Intercept solver: reconciles a predicted ball path with a car's
//! capability profile to find a feasible rendezvous in space-time.

use glam::{DVec2, DVec3};
use log::debug;
use serde::{Deserialize, Serialize};

use strikebot_core::snapshot::CarState;
use strikebot_core::types::{flat_distance, GameTime, SpaceTime};
use strikebot_physics::acceleration::{DistancePlot, StrikeProfile};
use strikebot_physics::BallPath;

/// A space-time point judged reachable under a capability profile.
///
/// Short-lived: produced each tick, consumed by maneuver selection, never
/// carried across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterceptCandidate {
    pub space: DVec3,
    pub time: GameTime,
    /// Boost the maneuver should hold back for its terminal phase.
    pub reserved_boost: f64,
}

impl InterceptCandidate {
    pub fn with_reserved_boost(mut self, reserved_boost: f64) -> Self {
        self.reserved_boost = reserved_boost;
        self
    }
}

/// How the solver picks among feasible samples.
///
/// First-feasible is the production behavior: scan ascending and stop at
/// the first hit. Whether a minimal-slack optimum would play better is an
/// open tuning question, so the alternative stays selectable instead of
/// being decided silently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanOrder {
    #[default]
    FirstFeasible,
    /// Among all feasible samples, the one with the most spare distance.
    MostSlack,
}

/// Earliest feasible rendezvous with the ball path, scanning ascending.
///
/// For each path sample, the required distance is the flat distance from
/// the car to the sample position plus `offset`; the achievable distance
/// comes from the capability profile at the same elapsed time. The first
/// sample where achievable covers required and `predicate` accepts the
/// sample wins. `None` when the scan exhausts — the caller cannot tell
/// predicate failure from profile-horizon exhaustion, and does not need to.
pub fn soonest_intercept(
    car: &CarState,
    path: &BallPath,
    plot: &DistancePlot,
    offset: DVec3,
    predicate: impl Fn(&CarState, &SpaceTime) -> bool,
) -> Option<InterceptCandidate> {
    solve_intercept(car, path, plot, offset, None, ScanOrder::FirstFeasible, predicate)
}

/// `soonest_intercept` with a terminal strike burst folded into the
/// capability lookup.
pub fn soonest_intercept_with_strike(
    car: &CarState,
    path: &BallPath,
    plot: &DistancePlot,
    offset: DVec3,
    strike: StrikeProfile,
    predicate: impl Fn(&CarState, &SpaceTime) -> bool,
) -> Option<InterceptCandidate> {
    solve_intercept(
        car,
        path,
        plot,
        offset,
        Some(strike),
        ScanOrder::FirstFeasible,
        predicate,
    )
}

pub fn solve_intercept(
    car: &CarState,
    path: &BallPath,
    plot: &DistancePlot,
    offset: DVec3,
    strike: Option<StrikeProfile>,
    order: ScanOrder,
    predicate: impl Fn(&CarState, &SpaceTime) -> bool,
) -> Option<InterceptCandidate> {
    let mut best: Option<(f64, InterceptCandidate)> = None;
    let mut profile_exhausted = false;

    for slice in path.slices() {
        if slice.time < car.time {
            continue;
        }

        let achievable = match strike {
            Some(profile) => plot.motion_after_strike(slice.time, profile),
            None => plot.motion_at_time(slice.time),
        };
        let achievable = match achievable {
            Some(dts) => dts,
            None => {
                profile_exhausted = true;
                break;
            }
        };

        let required = flat_distance(car.position, slice.space + offset);
        if achievable.distance < required || !predicate(car, slice) {
            continue;
        }

        let candidate = InterceptCandidate {
            space: slice.space + offset,
            time: slice.time,
            reserved_boost: 0.0,
        };
        match order {
            ScanOrder::FirstFeasible => return Some(candidate),
            ScanOrder::MostSlack => {
                let slack = achievable.distance - required;
                if best.map_or(true, |(s, _)| slack > s) {
                    best = Some((slack, candidate));
                }
            }
        }
    }

    if profile_exhausted && best.is_none() {
        debug!(
            "intercept scan ran past capability horizon at {:.2}s with no solution",
            plot.end().time.secs()
        );
    }
    best.map(|(_, candidate)| candidate)
}

/// Closed-form planar lead pursuit: where a chaser moving at constant
/// `chaser_speed` first meets a target moving at constant velocity.
///
/// Degenerate quadratics (near-zero leading coefficient, negative
/// discriminant, no positive root) yield `None`, never NaN.
pub fn lead_target(
    chaser: DVec2,
    target_position: DVec2,
    target_velocity: DVec2,
    chaser_speed: f64,
) -> Option<(DVec2, f64)> {
    let to_target = target_position - chaser;
    let a = target_velocity.length_squared() - chaser_speed * chaser_speed;
    let b = 2.0 * to_target.dot(target_velocity);
    let c = to_target.length_squared();

    let time = if a.abs() < 1e-9 {
        // Speeds match: the quadratic collapses to a linear equation.
        if b.abs() < 1e-9 {
            return None;
        }
        -c / b
    } else {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let t1 = (-b - root) / (2.0 * a);
        let t2 = (-b + root) / (2.0 * a);
        match (t1 > 0.0, t2 > 0.0) {
            (true, true) => t1.min(t2),
            (true, false) => t1,
            (false, true) => t2,
            (false, false) => return None,
        }
    };

    if time <= 0.0 || !time.is_finite() {
        return None;
    }
    Some((target_position + target_velocity * time, time))
}
