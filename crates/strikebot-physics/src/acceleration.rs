//! Car capability model: achievable travel distance over time.
//!
//! Fixed-timestep forward integration of a simplified speed/acceleration
//! envelope. Three regimes: full throttle acceleration below medium speed,
//! boost-only gains up to the supersonic cap, nothing above it. When boost
//! runs dry the model injects front flips as long as they would not
//! overshoot the caller's cutoff distance.

use serde::{Deserialize, Serialize};

use strikebot_core::constants::*;
use strikebot_core::snapshot::CarState;
use strikebot_core::types::{flatten, DistanceTimeSpeed, GameTime};

/// Terminal-approach adjustment: a short burst of extra speed applied in
/// the seconds immediately preceding a target contact moment, modeling a
/// dash or flip into the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeProfile {
    /// Seconds before contact during which the burst applies.
    pub duration_secs: f64,
    /// Speed added by the burst.
    pub speed_boost: f64,
}

impl StrikeProfile {
    pub fn new(duration_secs: f64, speed_boost: f64) -> Self {
        Self {
            duration_secs,
            speed_boost,
        }
    }

    /// Profile of a front flip thrown just before contact.
    pub fn front_flip() -> Self {
        Self::new(FRONT_FLIP_SECONDS, FRONT_FLIP_SPEED_BOOST)
    }
}

/// Ordered, time- and distance-ascending capability samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistancePlot {
    slices: Vec<DistanceTimeSpeed>,
}

impl DistancePlot {
    pub fn new(start: DistanceTimeSpeed) -> Self {
        Self {
            slices: vec![start],
        }
    }

    pub fn push_slice(&mut self, slice: DistanceTimeSpeed) {
        debug_assert!(
            slice.distance >= self.end().distance && slice.time >= self.end().time,
            "plot must ascend in distance and time"
        );
        self.slices.push(slice);
    }

    pub fn slices(&self) -> &[DistanceTimeSpeed] {
        &self.slices
    }

    pub fn start(&self) -> DistanceTimeSpeed {
        self.slices[0]
    }

    pub fn end(&self) -> DistanceTimeSpeed {
        self.slices[self.slices.len() - 1]
    }

    /// Interpolated motion at `time`; `None` outside the simulated window.
    pub fn motion_at_time(&self, time: GameTime) -> Option<DistanceTimeSpeed> {
        if time < self.start().time || time > self.end().time {
            return None;
        }

        for pair in self.slices.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            if next.time > time {
                let step_secs = current.time.seconds_until(next.time);
                let tween = current.time.seconds_until(time) / step_secs;
                let distance = (1.0 - tween) * current.distance + tween * next.distance;
                let speed = (1.0 - tween) * current.speed + tween * next.speed;
                return Some(DistanceTimeSpeed::new(distance, time, speed));
            }
        }

        Some(self.end())
    }

    /// Interpolated motion at `distance`; `None` when the plot never gets
    /// that far.
    pub fn motion_at_distance(&self, distance: f64) -> Option<DistanceTimeSpeed> {
        for pair in self.slices.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            if next.distance > distance {
                let span = next.distance - current.distance;
                if span < 1e-12 {
                    return Some(current);
                }
                let tween = (distance - current.distance) / span;
                let step_secs = current.time.seconds_until(next.time);
                let time = current.time.plus(step_secs * tween);
                let speed = (1.0 - tween) * current.speed + tween * next.speed;
                return Some(DistanceTimeSpeed::new(distance, time, speed));
            }
        }
        None
    }

    /// Seconds needed to cover `distance`, if the plot reaches it.
    pub fn travel_time(&self, distance: f64) -> Option<f64> {
        self.motion_at_distance(distance)
            .map(|dts| self.start().time.seconds_until(dts.time))
    }

    /// Motion at `time` adjusted for a terminal burst applied in the
    /// `strike.duration_secs` seconds before it.
    ///
    /// When the burst window reaches back past the start of the simulated
    /// run, the estimate degrades to the window that fits with half the
    /// speed boost (the average of a linear ramp) instead of failing.
    pub fn motion_after_strike(
        &self,
        time: GameTime,
        strike: StrikeProfile,
    ) -> Option<DistanceTimeSpeed> {
        let burst_start = time.plus(-strike.duration_secs);
        let start = self.start();

        if burst_start > start.time {
            let base = self.motion_at_time(burst_start)?;
            let distance =
                base.distance + (base.speed + strike.speed_boost) * strike.duration_secs;
            return Some(DistanceTimeSpeed::new(
                distance,
                time,
                base.speed + strike.speed_boost,
            ));
        }

        // Partial burst: less simulated time available than the window.
        let window = start.time.seconds_until(time);
        if window < 0.0 {
            return None;
        }
        let distance = start.distance + (start.speed + strike.speed_boost * 0.5) * window;
        Some(DistanceTimeSpeed::new(
            distance,
            time,
            start.speed + strike.speed_boost,
        ))
    }
}

/// Distance a front flip covers from `speed`, trapezoid of the speed jump
/// over the flip duration.
fn flip_distance(speed: f64) -> f64 {
    ((speed * 2.0 + FRONT_FLIP_SPEED_BOOST) / 2.0) * FRONT_FLIP_SECONDS
}

/// Simulate the car's reachable distance over `horizon_secs`.
///
/// `boost_budget` caps how much of the car's boost the simulation may
/// spend; `flip_cutoff_distance` bounds flip injection so the model never
/// schedules a flip that would carry the car past its target.
pub fn simulate_acceleration(
    car: &CarState,
    horizon_secs: f64,
    boost_budget: f64,
    flip_cutoff_distance: f64,
) -> DistancePlot {
    let dt = ACCELERATION_TIME_STEP_SECS;
    let mut speed = flatten(car.velocity).length();
    let mut boost = boost_budget.max(0.0);
    let mut distance = 0.0;
    let mut elapsed = 0.0;

    let mut plot = DistancePlot::new(DistanceTimeSpeed::new(0.0, car.time, speed));

    while elapsed < horizon_secs {
        if speed >= SUPERSONIC_SPEED {
            // Cap reached: extrapolate the remainder as one slice.
            speed = SUPERSONIC_SPEED;
            distance += speed * (horizon_secs - elapsed);
            plot.push_slice(DistanceTimeSpeed::new(
                distance,
                car.time.plus(horizon_secs),
                speed,
            ));
            break;
        }

        if boost <= 0.0 && distance + flip_distance(speed) < flip_cutoff_distance {
            // Flip: distance and speed jump discontinuously, and the flip
            // consumes its whole duration instead of a regular timestep.
            distance += flip_distance(speed);
            speed = (speed + FRONT_FLIP_SPEED_BOOST).min(SUPERSONIC_SPEED);
            elapsed += FRONT_FLIP_SECONDS;
            plot.push_slice(DistanceTimeSpeed::new(
                distance,
                car.time.plus(elapsed),
                speed,
            ));
            continue;
        }

        let boosting = boost > 0.0;
        let mut acceleration = 0.0;
        if speed < MEDIUM_SPEED {
            acceleration += SUB_MEDIUM_ACCELERATION;
        }
        if boosting {
            acceleration += BOOST_ACCELERATION;
            boost -= BOOST_CONSUMED_PER_SECOND * dt;
        }

        speed = (speed + acceleration * dt).min(SUPERSONIC_SPEED);
        distance += speed * dt;
        elapsed += dt;
        plot.push_slice(DistanceTimeSpeed::new(
            distance,
            car.time.plus(elapsed),
            speed,
        ));
    }

    plot
}
