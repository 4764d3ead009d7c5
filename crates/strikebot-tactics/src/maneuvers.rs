//! Reactive maneuver repertoire.
//!
//! A `Maneuver` recomputes its control output from the current tick and may
//! own a nested plan for a committed launch sequence. Dispatch is a closed
//! enum matched per tick; each variant keeps its state in a plain struct.
//! Returning `None` from `tick` means the maneuver is finished and the
//! owning plan should advance.

use std::f64::consts::PI;

use glam::DVec3;
use log::debug;

use strikebot_core::constants::{BALL_RADIUS, FRONT_FLIP_SECONDS, SUPERSONIC_SPEED};
use strikebot_core::control::ControlOutput;
use strikebot_core::enums::Posture;
use strikebot_core::snapshot::CarState;
use strikebot_core::types::{flat_distance, flatten, SpaceTime};
use strikebot_physics::acceleration::{simulate_acceleration, DistancePlot, StrikeProfile};
use strikebot_physics::BallPath;

use crate::intercept::{lead_target, soonest_intercept, soonest_intercept_with_strike};
use crate::plan::{Plan, TickContext};
use crate::steering::{self, correction_angle, get_there_on_time, steer_toward};

/// Ball-center heights a grounded car can still touch.
const GROUND_REACH: f64 = 3.0;

/// Ceiling of what an aerial launch can contest.
const AERIAL_REACH: f64 = 12.0;

/// Boost held back for the aerial's terminal burn.
const AERIAL_RESERVED_BOOST: f64 = 30.0;

/// Lookahead for per-tick intercept recomputation.
const INTERCEPT_HORIZON_SECS: f64 = 4.0;

/// The six large boost pads, by flat position.
const LARGE_BOOST_PADS: [DVec3; 6] = [
    DVec3::new(-71.68, 0.0, 0.0),
    DVec3::new(71.68, 0.0, 0.0),
    DVec3::new(-61.44, -81.92, 0.0),
    DVec3::new(61.44, -81.92, 0.0),
    DVec3::new(-61.44, 81.92, 0.0),
    DVec3::new(61.44, 81.92, 0.0),
];

#[derive(Debug)]
pub enum Maneuver {
    InterceptBall(InterceptBall),
    ChaseBall(ChaseBall),
    GetBoost(GetBoost),
    GetOnDefense(GetOnDefense),
    GetOnOffense(GetOnOffense),
    DirectedShot(DirectedShot),
    Dribble(Dribble),
    Kickoff(Kickoff),
    LandSafely(LandSafely),
}

impl Maneuver {
    pub fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        match self {
            Maneuver::InterceptBall(m) => m.tick(ctx),
            Maneuver::ChaseBall(m) => m.tick(ctx),
            Maneuver::GetBoost(m) => m.tick(ctx),
            Maneuver::GetOnDefense(m) => m.tick(ctx),
            Maneuver::GetOnOffense(m) => m.tick(ctx),
            Maneuver::DirectedShot(m) => m.tick(ctx),
            Maneuver::Dribble(m) => m.tick(ctx),
            Maneuver::Kickoff(m) => m.tick(ctx),
            Maneuver::LandSafely(m) => m.tick(ctx),
        }
    }

    /// Maneuvers driving a committed launch sequence refuse interruption;
    /// everything else yields freely.
    pub fn can_interrupt(&self) -> bool {
        match self {
            Maneuver::InterceptBall(m) => m.launch.is_none(),
            Maneuver::DirectedShot(m) => m.launch.is_none(),
            Maneuver::Kickoff(m) => m.launch.is_none(),
            _ => true,
        }
    }
}

/// Drive a nested launch plan for one tick. `None` means the plan is gone
/// (finished or errored) and the maneuver should resume steering.
fn drive_launch(launch: &mut Option<Box<Plan>>, ctx: &TickContext) -> Option<ControlOutput> {
    let plan = launch.as_mut()?;
    match plan.tick(ctx) {
        Ok(Some(output)) => Some(output),
        Ok(None) => {
            *launch = None;
            None
        }
        Err(err) => {
            debug!("launch sub-plan dropped: {err}");
            *launch = None;
            None
        }
    }
}

/// Chase the solved intercept point, optionally offset, and throw a flip
/// into the ball once committed contact is worthwhile.
#[derive(Debug)]
pub struct InterceptBall {
    offset: DVec3,
    strike: Option<StrikeProfile>,
    launch: Option<Box<Plan>>,
    posture: Posture,
}

impl InterceptBall {
    pub fn new(offset: DVec3, posture: Posture) -> Self {
        Self {
            offset,
            strike: None,
            launch: None,
            posture,
        }
    }

    pub fn with_strike(mut self, strike: StrikeProfile) -> Self {
        self.strike = Some(strike);
        self
    }

    fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        if let Some(output) = drive_launch(&mut self.launch, ctx) {
            return Some(output);
        }

        let car = ctx.car();
        let ball = ctx.ball();
        let path = ctx
            .arena
            .predict_ball_path(ball.position, ball.velocity, ctx.now(), INTERCEPT_HORIZON_SECS);
        let cutoff = flat_distance(car.position, ball.position);
        let plot = simulate_acceleration(car, INTERCEPT_HORIZON_SECS, car.boost, cutoff);

        let reachable = |_: &CarState, slice: &SpaceTime| slice.space.z < GROUND_REACH;
        let ground = match self.strike {
            Some(strike) => {
                soonest_intercept_with_strike(car, &path, &plot, self.offset, strike, reachable)
            }
            None => soonest_intercept(car, &path, &plot, self.offset, reachable),
        };
        let candidate = match ground {
            Some(candidate) => candidate,
            // No ground contact in reach: re-solve for the aerial height
            // regime before giving the ball up.
            None => return self.aerial_attempt(ctx, car, &path, &plot),
        };

        // Close and lined up: commit to the flip that carries us through
        // the contact point.
        if let Some(flip) = steering::sensible_flip(car, candidate.space, self.posture) {
            let commit = (flatten(car.velocity).length() + 10.0) * FRONT_FLIP_SECONDS;
            if flat_distance(car.position, candidate.space) < commit * 1.2 {
                self.launch = Some(Box::new(flip.begin()));
                return drive_launch(&mut self.launch, ctx);
            }
        }

        Some(get_there_on_time(
            car,
            SpaceTime::new(candidate.space, candidate.time),
        ))
    }

    /// Second solver pass for ball samples above ground reach. Launches
    /// the aerial ladder only once lined up under the contact point with
    /// boost to spare; otherwise keeps driving toward it.
    fn aerial_attempt(
        &mut self,
        ctx: &TickContext,
        car: &CarState,
        path: &BallPath,
        plot: &DistancePlot,
    ) -> Option<ControlOutput> {
        let liftable = |car: &CarState, slice: &SpaceTime| {
            slice.space.z >= GROUND_REACH
                && slice.space.z < AERIAL_REACH
                && car.boost > AERIAL_RESERVED_BOOST
        };
        let candidate = soonest_intercept(car, path, plot, self.offset, liftable)?
            .with_reserved_boost(AERIAL_RESERVED_BOOST);

        let lined_up = correction_angle(car, candidate.space).abs() < PI / 20.0;
        let close = flat_distance(car.position, candidate.space)
            < car.time.seconds_until(candidate.time) * flatten(car.velocity).length().max(1.0);
        if lined_up && close {
            self.launch = Some(Box::new(
                crate::set_pieces::aerial_launch(self.posture, candidate.reserved_boost).begin(),
            ));
            return drive_launch(&mut self.launch, ctx);
        }

        Some(get_there_on_time(
            car,
            SpaceTime::new(candidate.space, candidate.time),
        ))
    }
}

/// Fallback pursuit with constant-velocity lead; no contact planning.
#[derive(Debug)]
pub struct ChaseBall;

impl ChaseBall {
    pub fn new() -> Self {
        Self
    }

    fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        let car = ctx.car();
        let ball = ctx.ball();

        if flat_distance(car.position, ball.position) < 4.0 {
            return None;
        }

        let speed = flatten(car.velocity).length().max(10.0);
        let aim = match lead_target(
            flatten(car.position),
            flatten(ball.position),
            flatten(ball.velocity),
            speed,
        ) {
            Some((point, _)) => DVec3::new(point.x, point.y, 0.0),
            None => ball.position,
        };
        Some(steer_toward(car, aim))
    }
}

impl Default for ChaseBall {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive to the nearest large boost pad.
#[derive(Debug)]
pub struct GetBoost {
    target: Option<DVec3>,
}

impl GetBoost {
    pub fn new() -> Self {
        Self { target: None }
    }

    fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        let car = ctx.car();
        if car.boost > 99.0 {
            return None;
        }

        let target = *self.target.get_or_insert_with(|| {
            LARGE_BOOST_PADS
                .iter()
                .copied()
                .min_by(|a, b| {
                    flat_distance(car.position, *a)
                        .total_cmp(&flat_distance(car.position, *b))
                })
                .unwrap_or(DVec3::ZERO)
        });

        if flat_distance(car.position, target) < 2.0 {
            return None;
        }
        Some(steer_toward(car, target))
    }
}

impl Default for GetBoost {
    fn default() -> Self {
        Self::new()
    }
}

/// Retreat to a post between the ball and our goal mouth.
#[derive(Debug)]
pub struct GetOnDefense;

impl GetOnDefense {
    pub fn new() -> Self {
        Self
    }

    fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        let car = ctx.car();
        let ball = ctx.ball();
        let goal = crate::goals::Goal::for_team(ctx.team);

        // Station a few lengths field-side of the mouth, shaded toward
        // the ball's half.
        let inward = -goal.team.goal_side();
        let post = DVec3::new(
            ball.position.x.clamp(-15.0, 15.0),
            goal.center.y + inward * 8.0,
            0.0,
        );

        let goal_side_of_ball =
            (car.position.y - ball.position.y) * ctx.team.goal_side() > 0.0;
        if flat_distance(car.position, post) < 5.0 && goal_side_of_ball {
            return None;
        }
        Some(steer_toward(car, post))
    }
}

impl Default for GetOnDefense {
    fn default() -> Self {
        Self::new()
    }
}

/// Push up the field without overcommitting past the ball.
#[derive(Debug)]
pub struct GetOnOffense;

impl GetOnOffense {
    pub fn new() -> Self {
        Self
    }

    fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        let car = ctx.car();
        let ball = ctx.ball();
        let attack = -ctx.team.goal_side();

        // Midfield staging point on the attacking side, behind the ball.
        let y = (ball.position.y * attack - 15.0).min(40.0) * attack;
        let target = DVec3::new(ball.position.x * 0.5, y, 0.0);

        if flat_distance(car.position, target) < 5.0 {
            return None;
        }
        Some(steer_toward(car, target))
    }
}

impl Default for GetOnOffense {
    fn default() -> Self {
        Self::new()
    }
}

/// Line up contact so the ball is sent toward a target point, approaching
/// through a contact offset on the far side of the ball.
#[derive(Debug)]
pub struct DirectedShot {
    target: DVec3,
    launch: Option<Box<Plan>>,
    posture: Posture,
}

impl DirectedShot {
    pub fn new(target: DVec3, posture: Posture) -> Self {
        Self {
            target,
            launch: None,
            posture,
        }
    }

    fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        if let Some(output) = drive_launch(&mut self.launch, ctx) {
            return Some(output);
        }

        let car = ctx.car();
        let ball = ctx.ball();
        let path = ctx
            .arena
            .predict_ball_path(ball.position, ball.velocity, ctx.now(), INTERCEPT_HORIZON_SECS);
        let cutoff = flat_distance(car.position, ball.position);
        let plot = simulate_acceleration(car, INTERCEPT_HORIZON_SECS, car.boost, cutoff);

        // Contact on the side of the ball opposite the target pushes the
        // ball toward it.
        let away = flatten(ball.position) - flatten(self.target);
        let offset_flat = away.normalize_or_zero() * (BALL_RADIUS + 1.0);
        let offset = DVec3::new(offset_flat.x, offset_flat.y, 0.0);

        let candidate = soonest_intercept(car, &path, &plot, offset, |_, slice| {
            slice.space.z < GROUND_REACH
        })?;

        if let Some(flip) = steering::sensible_flip(car, ball.position, self.posture) {
            let commit = (flatten(car.velocity).length() + 10.0) * FRONT_FLIP_SECONDS;
            if flat_distance(car.position, ball.position) < commit * 1.1
                && correction_angle(car, self.target).abs() < PI / 8.0
            {
                self.launch = Some(Box::new(flip.begin()));
                return drive_launch(&mut self.launch, ctx);
            }
        }

        Some(get_there_on_time(
            car,
            SpaceTime::new(candidate.space, candidate.time),
        ))
    }
}

/// Carry the ball on the roof toward the enemy goal, matching its drift.
#[derive(Debug)]
pub struct Dribble;

impl Dribble {
    pub fn new() -> Self {
        Self
    }

    /// Whether the ball is in a carryable spot relative to this car.
    pub fn is_carryable(car: &CarState, ball_position: DVec3, ball_velocity: DVec3) -> bool {
        ball_position.z < 6.0
            && flat_distance(car.position, ball_position) < 10.0
            && flatten(ball_velocity).length() < 15.0
    }

    fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        let car = ctx.car();
        let ball = ctx.ball();

        if !Self::is_carryable(car, ball.position, ball.velocity) {
            return None;
        }

        // Aim for the point under the ball, biased a touch toward the
        // enemy goal so the carry keeps rolling forward.
        let goal = crate::goals::Goal::for_team(ctx.team.opponent());
        let push = (flatten(goal.center) - flatten(ball.position)).normalize_or_zero() * 0.8;
        let under = DVec3::new(
            ball.position.x - push.x,
            ball.position.y - push.y,
            0.0,
        );

        let mut output = steer_toward(car, under);
        // Speed-match instead of ramming: no boost, throttle scaled to the
        // gap we need to close.
        let gap = flat_distance(car.position, under);
        output = output.with_boost(false);
        Some(output.with_throttle((gap / 4.0).clamp(0.2, 1.0)))
    }
}

impl Default for Dribble {
    fn default() -> Self {
        Self::new()
    }
}

/// Kickoff rush: straight at the centered ball, flip through it at commit
/// range.
#[derive(Debug)]
pub struct Kickoff {
    launch: Option<Box<Plan>>,
}

impl Kickoff {
    pub fn new() -> Self {
        Self { launch: None }
    }

    fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        if let Some(output) = drive_launch(&mut self.launch, ctx) {
            return Some(output);
        }

        let ball = ctx.ball();
        let kickoff_live = flatten(ball.position).length() < 1.0
            && ball.velocity.length() < 0.5;
        if !kickoff_live {
            return None;
        }

        let car = ctx.car();
        let distance = flat_distance(car.position, ball.position);
        let speed = flatten(car.velocity).length();
        let commit = (speed + 10.0) * FRONT_FLIP_SECONDS;

        if distance < commit && speed > 20.0 {
            self.launch = Some(Box::new(
                crate::set_pieces::front_flip(Posture::Kickoff).begin(),
            ));
            return drive_launch(&mut self.launch, ctx);
        }

        let mut output = steer_toward(car, ball.position);
        output = output.with_boost(!car.supersonic && speed < SUPERSONIC_SPEED);
        Some(output)
    }
}

impl Default for Kickoff {
    fn default() -> Self {
        Self::new()
    }
}

/// Pitch the nose level while airborne; completes on touchdown.
#[derive(Debug)]
pub struct LandSafely;

impl LandSafely {
    pub fn new() -> Self {
        Self
    }

    fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        let car = ctx.car();
        let on_ground = car.position.z < 0.5 && car.orientation.up.z > 0.9;
        if on_ground {
            return None;
        }

        let pitch = (-car.orientation.forward.z * 2.0).clamp(-1.0, 1.0);
        Some(
            ControlOutput::neutral()
                .with_pitch(pitch)
                .with_throttle(1.0),
        )
    }
}

impl Default for LandSafely {
    fn default() -> Self {
        Self::new()
    }
}
