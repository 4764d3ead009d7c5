//! Tactics layer: race analysis and per-tick plan arbitration.
//!
//! Each tick the `Bot` predicts the ball's short-horizon path, checks a
//! small set of unconditional overrides (kickoff, landing, save, clear,
//! shot), and otherwise keeps driving the active plan. When no plan is
//! active it runs race analysis — both cars' earliest feasible intercepts —
//! and installs a plan from a fixed banded cascade on the time gap.

use std::f64::consts::PI;

use glam::DVec3;
use log::{debug, error};
use serde::{Deserialize, Serialize};

use strikebot_core::constants::BALL_RADIUS;
use strikebot_core::control::ControlOutput;
use strikebot_core::enums::{Posture, Team};
use strikebot_core::snapshot::{CarState, WorldSnapshot};
use strikebot_core::types::{flatten, SpaceTime};
use strikebot_physics::acceleration::{simulate_acceleration, StrikeProfile};
use strikebot_physics::{ArenaModel, BallPath};

use crate::context::TacticsContext;
use crate::goals::{self, Goal};
use crate::intercept::{soonest_intercept, InterceptCandidate};
use crate::maneuvers::{
    ChaseBall, DirectedShot, Dribble, GetBoost, GetOnDefense, GetOnOffense, InterceptBall,
    Kickoff, LandSafely, Maneuver,
};
use crate::plan::{Plan, TickContext};
use crate::steering::steer_toward;

/// How far ahead the per-tick ball prediction looks.
const BALL_HORIZON_SECS: f64 = 5.0;

/// Horizon for race-analysis capability simulation.
const RACE_HORIZON_SECS: f64 = 4.0;

/// Ball heights a grounded intercept can contest.
const GROUND_REACH: f64 = 3.0;

/// Enemy approach-angle error below which their shot on our goal is
/// plausible enough to defend against.
const DANGEROUS_APPROACH: f64 = PI / 3.0;

/// Result of comparing both cars' earliest feasible intercepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TacticalSituation {
    pub own_intercept: Option<InterceptCandidate>,
    pub enemy_intercept: Option<InterceptCandidate>,
    /// Enemy contact time minus own contact time: positive means we get
    /// there first. `None` when either side has no solution.
    pub lead_seconds: Option<f64>,
    /// Angle between the enemy's line to the ball and the ball's line to
    /// our goal. Small means their touch threatens our net.
    pub enemy_approach_error: f64,
    /// True when we are not goal-side of the ball.
    pub wrong_sided: bool,
}

/// Race analysis for one tick: solve the earliest feasible intercept for
/// both cars against the same predicted path.
pub fn assess(snapshot: &WorldSnapshot, team: Team, path: &BallPath) -> TacticalSituation {
    let car = snapshot.car(team);
    let enemy = snapshot.opponent_car(team);

    let own_intercept = earliest_intercept(car, path);
    let enemy_intercept = earliest_intercept(enemy, path);
    let lead_seconds = match (own_intercept, enemy_intercept) {
        (Some(own), Some(theirs)) => Some(own.time.seconds_until(theirs.time)),
        _ => None,
    };

    let own_goal = Goal::for_team(team);
    let to_ball = flatten(snapshot.ball.position - enemy.position);
    let ball_to_goal = flatten(own_goal.center - snapshot.ball.position);
    let enemy_approach_error = if to_ball.length_squared() < 1e-9 {
        0.0
    } else {
        to_ball.perp_dot(ball_to_goal).atan2(to_ball.dot(ball_to_goal)).abs()
    };

    let wrong_sided =
        (car.position.y - snapshot.ball.position.y) * team.goal_side() <= 0.0;

    TacticalSituation {
        own_intercept,
        enemy_intercept,
        lead_seconds,
        enemy_approach_error,
        wrong_sided,
    }
}

fn earliest_intercept(car: &CarState, path: &BallPath) -> Option<InterceptCandidate> {
    let plot = simulate_acceleration(car, RACE_HORIZON_SECS, car.boost, f64::MAX);
    soonest_intercept(car, path, &plot, DVec3::ZERO, |_, slice: &SpaceTime| {
        slice.space.z < GROUND_REACH
    })
}

/// The banded cascade on the race-analysis time gap.
pub fn make_plan(snapshot: &WorldSnapshot, team: Team, situation: &TacticalSituation) -> Plan {
    let ball = &snapshot.ball;
    let enemy_goal = Goal::for_team(team.opponent());

    // No feasible intercept of our own: fall back on positioning.
    if situation.own_intercept.is_none() {
        return if situation.enemy_approach_error < DANGEROUS_APPROACH {
            debug!("no own intercept, enemy threatens: defending");
            Plan::new(Posture::Defensive).with_maneuver(Maneuver::GetOnDefense(GetOnDefense::new()))
        } else {
            debug!("no own intercept, enemy harmless: pushing up");
            Plan::new(Posture::Offensive)
                .with_maneuver(Maneuver::GetOnOffense(GetOnOffense::new()))
                .with_maneuver(Maneuver::ChaseBall(ChaseBall::new()))
        };
    }

    let lead = situation.lead_seconds.unwrap_or(f64::INFINITY);

    if lead > 2.0 {
        return plan_with_plenty_of_time(snapshot, team, situation);
    }

    if lead > 0.5 {
        debug!("moderate lead {lead:.2}s: directed shot");
        let target = enemy_goal.nearest_entrance(snapshot.ball.position, 2.0);
        return Plan::new(Posture::Offensive).with_maneuver(Maneuver::DirectedShot(
            DirectedShot::new(target, Posture::Offensive),
        ));
    }

    if lead >= -0.5 {
        // Contested window: contest it only from the right side of the ball.
        return if !situation.wrong_sided {
            debug!("contested window {lead:.2}s, goal-side: challenging");
            let own_goal = Goal::for_team(team);
            let toward_own = (flatten(own_goal.center) - flatten(ball.position))
                .normalize_or_zero()
                * (BALL_RADIUS + 1.0);
            Plan::new(Posture::Offensive).with_maneuver(Maneuver::InterceptBall(
                InterceptBall::new(
                    DVec3::new(toward_own.x, toward_own.y, 0.0),
                    Posture::Offensive,
                ),
            ))
        } else {
            debug!("contested window {lead:.2}s, wrong-sided: retreating");
            Plan::new(Posture::Defensive).with_maneuver(Maneuver::GetOnDefense(GetOnDefense::new()))
        };
    }

    if situation.enemy_approach_error < DANGEROUS_APPROACH {
        debug!("enemy wins race by {:.2}s: defending", -lead);
        Plan::new(Posture::Defensive).with_maneuver(Maneuver::GetOnDefense(GetOnDefense::new()))
    } else {
        debug!("enemy wins race but cannot threaten: staying forward");
        Plan::new(Posture::Offensive)
            .with_maneuver(Maneuver::GetOnOffense(GetOnOffense::new()))
            .with_maneuver(Maneuver::ChaseBall(ChaseBall::new()))
    }
}

/// Discretionary selection when the race is comfortably won, in fixed
/// priority order: carry, directed shot, refuel, reposition, plain chase.
fn plan_with_plenty_of_time(
    snapshot: &WorldSnapshot,
    team: Team,
    situation: &TacticalSituation,
) -> Plan {
    let car = snapshot.car(team);
    let ball = &snapshot.ball;
    let enemy_goal = Goal::for_team(team.opponent());

    if Dribble::is_carryable(car, ball.position, ball.velocity) {
        debug!("plenty of time: dribbling");
        return Plan::new(Posture::Neutral).with_maneuver(Maneuver::Dribble(Dribble::new()));
    }

    // A shot is worth lining up when the contact will happen in their half.
    let attacking = -team.goal_side();
    if situation
        .own_intercept
        .map_or(false, |candidate| candidate.space.y * attacking > 0.0)
    {
        debug!("plenty of time: lining up directed shot");
        let target = enemy_goal.nearest_entrance(snapshot.ball.position, 2.0);
        return Plan::new(Posture::Offensive).with_maneuver(Maneuver::DirectedShot(
            DirectedShot::new(target, Posture::Offensive),
        ));
    }

    if car.boost < 30.0 {
        debug!("plenty of time: topping up boost");
        return Plan::new(Posture::Neutral).with_maneuver(Maneuver::GetBoost(GetBoost::new()));
    }

    if situation.wrong_sided {
        debug!("plenty of time: recovering goal side");
        return Plan::new(Posture::Neutral).with_maneuver(Maneuver::GetOnDefense(GetOnDefense::new()));
    }

    debug!("plenty of time: plain intercept");
    Plan::new(Posture::Neutral).with_maneuver(Maneuver::InterceptBall(InterceptBall::new(
        DVec3::ZERO,
        Posture::Neutral,
    )))
}

/// Per-tick controller for one car.
///
/// Owns the active plan and the telemetry context; guarantees that no
/// lifecycle error escapes a tick — the worst observable behavior is one
/// tick of neutral output.
pub struct Bot {
    team: Team,
    arena: ArenaModel,
    plan: Option<Plan>,
    pub context: TacticsContext,
}

impl Bot {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            arena: ArenaModel::new(),
            plan: None,
            context: TacticsContext::default(),
        }
    }

    pub fn team(&self) -> Team {
        self.team
    }

    /// One predict → solve → decide → emit pass.
    pub fn tick(&mut self, snapshot: &WorldSnapshot) -> ControlOutput {
        let ball = &snapshot.ball;
        let path = self.arena.predict_ball_path(
            ball.position,
            ball.velocity,
            snapshot.time,
            BALL_HORIZON_SECS,
        );

        if let Some(override_plan) = self.override_plan(snapshot, &path) {
            let replace = match &self.plan {
                Some(active) => active.can_interrupt_for(override_plan.posture()),
                None => true,
            };
            if replace {
                debug!("override installed: {:?}", override_plan.posture());
                self.plan = Some(override_plan.begin());
            }
        }

        let needs_plan = self.plan.as_ref().map_or(true, Plan::is_complete);
        if needs_plan {
            let situation = assess(snapshot, self.team, &path);
            let plan = make_plan(snapshot, self.team, &situation);
            debug!("new plan: {:?}", plan.posture());
            self.context.last_situation = Some(situation);
            self.plan = Some(plan.begin());
        }

        self.context.last_ball_path = Some(path);

        let ctx = TickContext::new(snapshot, self.team, &self.arena);
        let output = match self.plan.as_mut() {
            Some(plan) => plan.tick(&ctx),
            None => Ok(None),
        };

        match output {
            Ok(Some(output)) => output,
            Ok(None) => {
                // Plan ran out of steps mid-tick: keep moving, replan next
                // tick.
                self.plan = None;
                steer_toward(snapshot.car(self.team), ball.position)
            }
            Err(err) => {
                error!("plan lifecycle violation, emitting neutral: {err}");
                self.plan = None;
                ControlOutput::neutral()
            }
        }
    }

    /// Unconditional overrides, most urgent first. Returns the plan to
    /// install if any override condition holds this tick.
    fn override_plan(&self, snapshot: &WorldSnapshot, path: &BallPath) -> Option<Plan> {
        let ball = &snapshot.ball;
        let car = snapshot.car(self.team);

        let kickoff_live =
            flatten(ball.position).length() < 1.0 && ball.velocity.length() < 0.5;
        if kickoff_live {
            return Some(
                Plan::new(Posture::Kickoff).with_maneuver(Maneuver::Kickoff(Kickoff::new())),
            );
        }

        let airborne = car.position.z > 2.0;
        if airborne {
            return Some(
                Plan::new(Posture::Landing).with_maneuver(Maneuver::LandSafely(LandSafely::new())),
            );
        }

        let own_goal = Goal::for_team(self.team);
        let toward_own = (flatten(own_goal.center) - flatten(ball.position)).normalize_or_zero()
            * (BALL_RADIUS + 1.0);
        let clearing_offset = DVec3::new(toward_own.x, toward_own.y, 0.0);

        if goals::predict_goal_event(&own_goal, path).is_some() {
            // A save gets the full-reach solve: the terminal flip burst is
            // part of what we can cover.
            return Some(Plan::new(Posture::Save).with_maneuver(Maneuver::InterceptBall(
                InterceptBall::new(clearing_offset, Posture::Save)
                    .with_strike(StrikeProfile::front_flip()),
            )));
        }

        if goals::ball_enters_box(&own_goal, path, snapshot.time) {
            return Some(Plan::new(Posture::Clear).with_maneuver(Maneuver::InterceptBall(
                InterceptBall::new(clearing_offset, Posture::Clear),
            )));
        }

        let enemy_goal = Goal::for_team(self.team.opponent());
        if goals::ball_enters_box(&enemy_goal, path, snapshot.time) {
            let target = enemy_goal.nearest_entrance(snapshot.ball.position, 2.0);
            return Some(Plan::new(Posture::Shot).with_maneuver(Maneuver::DirectedShot(
                DirectedShot::new(target, Posture::Shot),
            )));
        }

        None
    }
}
