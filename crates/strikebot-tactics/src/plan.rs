//! Plan/step engine: a composable state machine that sequences control
//! outputs over multiple ticks.
//!
//! A `Plan` owns an ordered list of `Step`s and a cursor. Steps come in two
//! shapes: timed (a fixed output held for a scheduled duration) and reactive
//! (a maneuver that recomputes its output from the current tick, possibly
//! driving a nested plan it owns). Lifecycle is strictly forward-only; all
//! waiting is expressed as comparisons against the tick timestamp, never
//! real sleeps, so a plan is a pure function of (tick input, carried state).

use thiserror::Error;

use strikebot_core::control::ControlOutput;
use strikebot_core::enums::{Posture, Team};
use strikebot_core::snapshot::{BallState, CarState, WorldSnapshot};
use strikebot_core::types::GameTime;
use strikebot_physics::ArenaModel;

use crate::maneuvers::Maneuver;

/// Everything a step may read during one tick. Borrowed, never stored.
pub struct TickContext<'a> {
    pub snapshot: &'a WorldSnapshot,
    pub team: Team,
    pub arena: &'a ArenaModel,
}

impl<'a> TickContext<'a> {
    pub fn new(snapshot: &'a WorldSnapshot, team: Team, arena: &'a ArenaModel) -> Self {
        Self {
            snapshot,
            team,
            arena,
        }
    }

    pub fn now(&self) -> GameTime {
        self.snapshot.time
    }

    pub fn car(&self) -> &CarState {
        self.snapshot.car(self.team)
    }

    pub fn opponent(&self) -> &CarState {
        self.snapshot.opponent_car(self.team)
    }

    pub fn ball(&self) -> &BallState {
        &self.snapshot.ball
    }
}

/// Lifecycle misuse of a `Plan`. Deliberately a separate channel from
/// `Ok(None)`: running out of steps is normal, driving a plan out of order
/// is a programmer error the controller absorbs at the tick boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("plan ticked before begin()")]
    NotBegun,
    #[error("plan ticked after completion")]
    AlreadyComplete,
}

/// A fixed control output held until an absolute deadline.
///
/// The deadline is recorded at activation (first tick), not at construction,
/// so a plan built ahead of time still times its steps from when they
/// actually start. Timed steps refuse interruption: they model an already
/// committed physical action such as the first phase of a flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedStep {
    output: ControlOutput,
    duration_secs: f64,
    deadline: Option<GameTime>,
}

impl TimedStep {
    pub fn new(output: ControlOutput, duration_secs: f64) -> Self {
        Self {
            output,
            duration_secs,
            deadline: None,
        }
    }

    /// Complete at or after the deadline, never strictly before it.
    fn is_complete(&self, now: GameTime) -> bool {
        match self.deadline {
            Some(deadline) => now.secs() >= deadline.secs(),
            None => false,
        }
    }

    fn tick(&mut self, now: GameTime) -> Option<ControlOutput> {
        let deadline = *self
            .deadline
            .get_or_insert_with(|| now.plus(self.duration_secs));
        if now.secs() >= deadline.secs() {
            None
        } else {
            Some(self.output)
        }
    }
}

/// One unit of a plan: either a timed output or a reactive maneuver.
#[derive(Debug)]
pub enum Step {
    Timed(TimedStep),
    Reactive(Maneuver),
}

impl Step {
    /// True when the step can be skipped without consuming this tick.
    fn is_trivially_complete(&self, ctx: &TickContext) -> bool {
        match self {
            Step::Timed(timed) => timed.is_complete(ctx.now()),
            Step::Reactive(_) => false,
        }
    }

    fn tick(&mut self, ctx: &TickContext) -> Option<ControlOutput> {
        match self {
            Step::Timed(timed) => timed.tick(ctx.now()),
            Step::Reactive(maneuver) => maneuver.tick(ctx),
        }
    }

    pub fn can_interrupt(&self) -> bool {
        match self {
            Step::Timed(_) => false,
            Step::Reactive(maneuver) => maneuver.can_interrupt(),
        }
    }
}

/// An urgency-tagged sequence of steps driven once per tick.
///
/// Owned exclusively by the controller that created it and replaced
/// wholesale when superseded; dropping a plan discards any nested state
/// with no explicit teardown.
#[derive(Debug)]
pub struct Plan {
    posture: Posture,
    steps: Vec<Step>,
    cursor: usize,
    begun: bool,
    complete: bool,
}

impl Plan {
    pub fn new(posture: Posture) -> Self {
        Self {
            posture,
            steps: Vec::new(),
            cursor: 0,
            begun: false,
            complete: false,
        }
    }

    pub fn with_step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_timed(self, output: ControlOutput, duration_secs: f64) -> Self {
        self.with_step(Step::Timed(TimedStep::new(output, duration_secs)))
    }

    pub fn with_maneuver(self, maneuver: Maneuver) -> Self {
        self.with_step(Step::Reactive(maneuver))
    }

    /// Append every step of `other`, flattening it into this plan.
    pub fn with_sub_plan(mut self, other: Plan) -> Self {
        self.steps.extend(other.steps);
        self
    }

    pub fn posture(&self) -> Posture {
        self.posture
    }

    pub fn begin(mut self) -> Self {
        self.begun = true;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether the active step permits being abandoned right now.
    pub fn can_interrupt(&self) -> bool {
        if self.complete {
            return true;
        }
        match self.steps.get(self.cursor) {
            Some(step) => step.can_interrupt(),
            None => true,
        }
    }

    /// Whether a new plan of `posture` may replace this one: only strictly
    /// more urgent plans interrupt, and only if the active step allows it.
    pub fn can_interrupt_for(&self, posture: Posture) -> bool {
        if self.complete {
            return true;
        }
        self.posture.less_urgent_than(posture) && self.can_interrupt()
    }

    /// Drive the active step. `Ok(None)` means the plan just completed.
    ///
    /// Every step index is visited exactly once, strictly in order: a
    /// trivially-complete step advances the cursor without consuming the
    /// tick, a step yielding output ends the tick, and a step yielding
    /// nothing cedes to its successor.
    pub fn tick(&mut self, ctx: &TickContext) -> Result<Option<ControlOutput>, PlanError> {
        if !self.begun {
            return Err(PlanError::NotBegun);
        }
        if self.complete {
            return Err(PlanError::AlreadyComplete);
        }

        while self.cursor < self.steps.len() {
            if self.steps[self.cursor].is_trivially_complete(ctx) {
                self.cursor += 1;
                continue;
            }
            match self.steps[self.cursor].tick(ctx) {
                Some(output) => return Ok(Some(output)),
                None => self.cursor += 1,
            }
        }

        self.complete = true;
        Ok(None)
    }
}
