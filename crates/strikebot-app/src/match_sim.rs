//! Toy match world for self-play.
//!
//! The ball runs through the same arena stepper the predictor uses; cars
//! are kinematic ground vehicles driven by their controllers' outputs
//! through the capability-model envelope. Same seed, same match.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use strikebot_core::constants::*;
use strikebot_core::control::ControlOutput;
use strikebot_core::enums::Team;
use strikebot_core::snapshot::{
    BallState, CarOrientation, CarState, ScoreLine, WorldSnapshot,
};
use strikebot_core::types::{flat_distance, flatten, rotate_flat, GameTime};
use strikebot_physics::ArenaModel;
use strikebot_tactics::Bot;

/// Resting height of a car's center.
const CAR_RIDE_HEIGHT: f64 = 0.17;

/// Yaw rate at full steer, radians per second.
const TURN_RATE: f64 = 3.0;

/// Contact range between a car's nose and the ball center.
const CONTACT_RANGE: f64 = BALL_RADIUS + 1.5;

/// Passive boost trickle standing in for the small-pad lanes.
const BOOST_TRICKLE_PER_SECOND: f64 = 5.0;

/// Configuration for starting a self-play match.
pub struct SelfPlayConfig {
    /// RNG seed for determinism. Same seed = same match.
    pub seed: u64,
    /// Total ticks to run.
    pub ticks: u64,
    /// Emit one snapshot every this many ticks.
    pub emit_every: u64,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 3600,
            emit_every: 60,
        }
    }
}

/// Kinematic state of one car between ticks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CarBody {
    position: DVec3,
    forward: DVec3,
    speed: f64,
    boost: f64,
    team: Team,
}

impl CarBody {
    fn at_kickoff(team: Team, jitter_x: f64) -> Self {
        let side = team.goal_side();
        Self {
            position: DVec3::new(jitter_x, side * 40.0, CAR_RIDE_HEIGHT),
            forward: DVec3::new(0.0, -side, 0.0),
            speed: 0.0,
            boost: 34.0,
            team,
        }
    }

    fn velocity(&self) -> DVec3 {
        self.forward * self.speed
    }

    fn as_state(&self, time: GameTime) -> CarState {
        CarState {
            position: self.position,
            velocity: self.velocity(),
            orientation: CarOrientation::level(self.forward),
            boost: self.boost,
            supersonic: self.speed >= SUPERSONIC_SPEED - 1e-9,
            team: self.team,
            time,
        }
    }

    /// Apply one tick of control through the simplified ground envelope.
    fn integrate(&mut self, output: &ControlOutput, dt: f64) {
        // Steering authority scales up with speed and with the handbrake.
        let grip = (self.speed / 10.0).clamp(0.0, 1.0);
        let slide_factor = if output.slide { 1.5 } else { 1.0 };
        let yaw = -output.steer * TURN_RATE * grip * slide_factor * dt;
        let turned = rotate_flat(flatten(self.forward), yaw);
        self.forward = DVec3::new(turned.x, turned.y, 0.0).normalize_or_zero();

        let mut acceleration = 0.0;
        if self.speed < MEDIUM_SPEED {
            acceleration += SUB_MEDIUM_ACCELERATION * output.throttle;
        }
        if output.boost && self.boost > 0.0 {
            acceleration += BOOST_ACCELERATION;
            self.boost -= BOOST_CONSUMED_PER_SECOND * dt;
        }
        acceleration -= output.reverse_throttle * SUB_MEDIUM_ACCELERATION;
        // Rolling drag so released throttle bleeds off.
        if output.throttle == 0.0 && !output.boost {
            acceleration -= 3.0;
        }

        self.speed = (self.speed + acceleration * dt).clamp(0.0, SUPERSONIC_SPEED);
        self.boost = (self.boost + BOOST_TRICKLE_PER_SECOND * dt).clamp(0.0, 100.0);
        self.position += self.velocity() * dt;
        self.position.x = self.position.x.clamp(-(SIDE_WALL - 2.0), SIDE_WALL - 2.0);
        self.position.y = self.position.y.clamp(-(BACK_WALL - 2.0), BACK_WALL - 2.0);
        self.position.z = CAR_RIDE_HEIGHT;
    }
}

/// One emitted frame of the match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub time_secs: f64,
    pub ball: BallState,
    pub blue: CarState,
    pub orange: CarState,
    pub score: ScoreLine,
    pub blue_output: ControlOutput,
    pub orange_output: ControlOutput,
}

/// The self-play match engine. Owns the world, both controllers, and the
/// seeded RNG used for kickoff jitter.
pub struct Match {
    arena: ArenaModel,
    rng: ChaCha8Rng,
    tick: u64,
    time: GameTime,
    ball: BallState,
    blue: CarBody,
    orange: CarBody,
    blue_bot: Bot,
    orange_bot: Bot,
    score: ScoreLine,
}

impl Match {
    pub fn new(config: &SelfPlayConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let blue = CarBody::at_kickoff(Team::Blue, rng.gen_range(-2.0..2.0));
        let orange = CarBody::at_kickoff(Team::Orange, rng.gen_range(-2.0..2.0));
        Self {
            arena: ArenaModel::new(),
            rng,
            tick: 0,
            time: GameTime::from_secs(0.0),
            ball: BallState {
                position: DVec3::new(0.0, 0.0, BALL_RADIUS),
                velocity: DVec3::ZERO,
            },
            blue,
            orange,
            blue_bot: Bot::new(Team::Blue),
            orange_bot: Bot::new(Team::Orange),
            score: ScoreLine::default(),
        }
    }

    pub fn score(&self) -> ScoreLine {
        self.score
    }

    fn world_snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            time: self.time,
            ball: self.ball,
            blue_car: self.blue.as_state(self.time),
            orange_car: self.orange.as_state(self.time),
            score: self.score,
        }
    }

    /// Advance the match by one tick and return the resulting frame.
    pub fn tick(&mut self) -> MatchSnapshot {
        let snapshot = self.world_snapshot();
        let blue_output = self.blue_bot.tick(&snapshot);
        let orange_output = self.orange_bot.tick(&snapshot);

        self.blue.integrate(&blue_output, DT);
        self.orange.integrate(&orange_output, DT);

        let (position, velocity) =
            self.arena
                .step_ball(self.ball.position, self.ball.velocity, DT);
        self.ball = BallState { position, velocity };

        self.resolve_contact(Team::Blue);
        self.resolve_contact(Team::Orange);
        self.resolve_goals();

        self.tick += 1;
        self.time = self.time.plus(DT);

        MatchSnapshot {
            tick: self.tick,
            time_secs: self.time.secs(),
            ball: self.ball,
            blue: self.blue.as_state(self.time),
            orange: self.orange.as_state(self.time),
            score: self.score,
            blue_output,
            orange_output,
        }
    }

    /// Crude car-ball impulse: the ball leaves along the car-to-ball line
    /// carrying the car's momentum plus a kick, with a bit of loft.
    fn resolve_contact(&mut self, team: Team) {
        let car = match team {
            Team::Blue => &self.blue,
            Team::Orange => &self.orange,
        };
        if flat_distance(car.position, self.ball.position) > CONTACT_RANGE {
            return;
        }

        let away = (flatten(self.ball.position) - flatten(car.position)).normalize_or_zero();
        let kick = car.speed * 0.8 + 5.0;
        self.ball.velocity = DVec3::new(
            car.velocity().x + away.x * kick,
            car.velocity().y + away.y * kick,
            (car.speed * 0.15).min(10.0),
        );
        self.ball.position += DVec3::new(away.x, away.y, 0.0) * 0.2;
    }

    fn resolve_goals(&mut self) {
        // The stepper reflects the ball at one radius of wall clearance, so
        // the goal line sits one radius field-side of the mouth.
        let line = GOAL_DISTANCE - BALL_RADIUS;
        let ball = self.ball.position;
        if ball.y.abs() < line || ball.x.abs() > GOAL_EXTENT || ball.z > GOAL_HEIGHT {
            return;
        }

        // Positive y is Orange's wall, so crossing it scores for Blue.
        if ball.y > 0.0 {
            self.score.blue += 1;
            log::info!("goal for Blue, score {}:{}", self.score.blue, self.score.orange);
        } else {
            self.score.orange += 1;
            log::info!("goal for Orange, score {}:{}", self.score.blue, self.score.orange);
        }
        self.reset_kickoff();
    }

    fn reset_kickoff(&mut self) {
        self.ball = BallState {
            position: DVec3::new(0.0, 0.0, BALL_RADIUS),
            velocity: DVec3::ZERO,
        };
        self.blue = CarBody::at_kickoff(Team::Blue, self.rng.gen_range(-2.0..2.0));
        self.orange = CarBody::at_kickoff(Team::Orange, self.rng.gen_range(-2.0..2.0));
    }
}
