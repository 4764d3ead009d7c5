//! Canned step sequences for committed physical actions.
//!
//! Each builder returns an un-begun plan; the timings are tuned for the
//! host game's jump mechanics and are held blind (timed steps ignore the
//! world entirely while they run).

use strikebot_core::control::ControlOutput;
use strikebot_core::enums::Posture;

use crate::maneuvers::{LandSafely, Maneuver};
use crate::plan::Plan;

/// A forward flip: jump tap, release to rearm the second jump, then the
/// dodge impulse (jump with the nose pitched down), then recover level.
pub fn front_flip(posture: Posture) -> Plan {
    Plan::new(posture)
        .with_timed(
            ControlOutput::neutral().with_throttle(1.0).with_jump(true),
            0.15,
        )
        .with_timed(ControlOutput::neutral().with_throttle(1.0), 0.03)
        .with_timed(
            ControlOutput::neutral()
                .with_throttle(1.0)
                .with_jump(true)
                .with_pitch(-1.0),
            0.15,
        )
        .with_maneuver(Maneuver::LandSafely(LandSafely::new()))
}

/// Boost-assisted aerial launch: hold the first jump while pitching back,
/// feather off, then boost along the nose toward the contact point.
///
/// `reserved_boost` is how much boost the caller solved the intercept with;
/// the ladder assumes at least that much is in the tank when it starts.
pub fn aerial_launch(posture: Posture, _reserved_boost: f64) -> Plan {
    Plan::new(posture)
        .with_timed(
            ControlOutput::neutral().with_jump(true).with_pitch(1.0),
            0.32,
        )
        .with_timed(ControlOutput::neutral().with_pitch(1.0), 0.05)
        .with_timed(
            ControlOutput::neutral()
                .with_jump(true)
                .with_boost(true)
                .with_pitch(0.5),
            0.5,
        )
        .with_timed(
            ControlOutput::neutral().with_boost(true).with_pitch(0.25),
            0.32,
        )
        .with_maneuver(Maneuver::LandSafely(LandSafely::new()))
}
