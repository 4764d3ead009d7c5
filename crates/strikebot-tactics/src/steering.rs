//! Ground steering primitives shared by every maneuver.

use std::f64::consts::PI;

use glam::DVec3;

use strikebot_core::constants::{FRONT_FLIP_SECONDS, SUPERSONIC_SPEED};
use strikebot_core::control::ControlOutput;
use strikebot_core::enums::Posture;
use strikebot_core::snapshot::CarState;
use strikebot_core::types::{flat_distance, flatten, SpaceTime};

use crate::plan::Plan;
use crate::set_pieces;

/// Below this angular error the wheel is held straight.
const DEAD_ZONE: f64 = PI / 40.0;

/// Below this angular error boosting is productive.
const BOOST_CONE: f64 = PI / 6.0;

/// Signed angle from the car's flat forward direction to the flat direction
/// of `target`, in radians. Positive means the target is to the left.
pub fn correction_angle(car: &CarState, target: DVec3) -> f64 {
    let to_target = flatten(target - car.position);
    let forward = flatten(car.orientation.forward);
    if to_target.length_squared() < 1e-12 {
        return 0.0;
    }
    forward.perp_dot(to_target).atan2(forward.dot(to_target))
}

/// Full-throttle steering toward a flat target: proportional steer with a
/// small dead zone, powerslide past 90 degrees of error, boost only when
/// lined up and below the cap.
pub fn steer_toward(car: &CarState, target: DVec3) -> ControlOutput {
    let correction = correction_angle(car, target);
    let magnitude = correction.abs();

    let steer = if magnitude < DEAD_ZONE {
        0.0
    } else {
        -correction * 2.0
    };

    ControlOutput::neutral()
        .with_throttle(1.0)
        .with_steer(steer)
        .with_slide(magnitude > PI / 2.0)
        .with_boost(magnitude < BOOST_CONE && !car.supersonic && car.boost > 0.0)
}

/// Steering with speed modulated so the car arrives at `target.space` near
/// `target.time` rather than as fast as possible. Coasts or brakes when
/// ahead of schedule, boosts only when behind it.
pub fn get_there_on_time(car: &CarState, target: SpaceTime) -> ControlOutput {
    let seconds_remaining = car.time.seconds_until(target.time);
    let distance = flat_distance(car.position, target.space);

    if seconds_remaining <= 0.0 {
        return steer_toward(car, target.space);
    }

    let needed_speed = distance / seconds_remaining;
    let current_speed = flatten(car.velocity).length();
    let mut output = steer_toward(car, target.space);

    if needed_speed > current_speed + 2.0 {
        // Behind schedule: keep full throttle, let steer_toward's boost
        // decision stand.
        output
    } else if needed_speed < current_speed * 0.8 {
        // Ahead of schedule: brake gently.
        output = output.with_boost(false).with_throttle(0.0);
        output.with_reverse_throttle(0.3)
    } else {
        output = output.with_boost(false);
        output.with_throttle((needed_speed / SUPERSONIC_SPEED).max(0.25))
    }
}

/// A front flip toward `target`, only when one is actually sensible: on the
/// ground, lined up, carrying enough speed, below the cap, and far enough
/// that the committed flip distance cannot overshoot.
pub fn sensible_flip(car: &CarState, target: DVec3, posture: Posture) -> Option<Plan> {
    let on_ground = car.position.z < 0.5 && car.orientation.up.z > 0.99;
    if !on_ground || car.supersonic {
        return None;
    }

    let speed = flatten(car.velocity).length();
    if speed < 20.0 {
        return None;
    }

    if correction_angle(car, target).abs() > PI / 12.0 {
        return None;
    }

    let commitment_distance = (speed + 10.0) * FRONT_FLIP_SECONDS;
    if flat_distance(car.position, target) < commitment_distance {
        return None;
    }

    Some(set_pieces::front_flip(posture))
}
