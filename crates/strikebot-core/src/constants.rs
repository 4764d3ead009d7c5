//! Arena geometry, ball physics, and car-envelope tuning constants.
//!
//! Distances are in field units (roughly 1/50 of the host game's raw units),
//! speeds in units per second, times in seconds.

// --- Arena ---

/// Half-width of the arena along the x axis.
pub const SIDE_WALL: f64 = 81.92;

/// Half-length of the arena along the y axis (goals sit on this wall).
pub const BACK_WALL: f64 = 102.4;

/// Arena ceiling height.
pub const CEILING: f64 = 40.88;

/// Downward gravitational acceleration applied to the ball.
pub const GRAVITY: f64 = 13.0;

/// Ball collision radius.
pub const BALL_RADIUS: f64 = 1.8555;

/// Macro sampling cadence of the ball simulation: one path sample per step.
pub const BALL_SIMULATION_STEP_SECS: f64 = 0.1;

/// Finer integration sub-steps within each macro step, for bounce stability.
pub const BALL_SIMULATION_SUB_STEPS: u32 = 10;

// --- Goals ---

/// Distance from field center to each goal mouth along y.
pub const GOAL_DISTANCE: f64 = 102.0;

/// Goal opening height.
pub const GOAL_HEIGHT: f64 = 12.8555;

/// Goal opening half-width.
pub const GOAL_EXTENT: f64 = 17.8555;

// --- Car capability envelope ---

/// Top speed; acceleration is zero at or above this and speed is clamped.
pub const SUPERSONIC_SPEED: f64 = 46.0;

/// Below this speed the car gets full throttle acceleration.
pub const MEDIUM_SPEED: f64 = 28.0;

/// Throttle acceleration below `MEDIUM_SPEED` (zero to medium in ~2 s).
pub const SUB_MEDIUM_ACCELERATION: f64 = 15.0;

/// Additional acceleration while boosting.
pub const BOOST_ACCELERATION: f64 = 8.0;

/// Boost drained per second of active boosting (budget is 0-100).
pub const BOOST_CONSUMED_PER_SECOND: f64 = 25.0;

/// Total duration of a front flip, commitment included.
pub const FRONT_FLIP_SECONDS: f64 = 1.5;

/// Instantaneous speed gained by a front flip.
pub const FRONT_FLIP_SPEED_BOOST: f64 = 10.0;

/// Timestep of the capability-model forward integration.
pub const ACCELERATION_TIME_STEP_SECS: f64 = 0.1;

// --- Bounce detection ---

/// Tolerance below zero that a normalized velocity dot product must clear
/// before consecutive samples count as a bounce. Keeps near-perpendicular
/// grazes from flip-flopping between bounce and no-bounce.
pub const BOUNCE_DOT_EPSILON: f64 = 1e-6;

// --- Tick cadence ---

/// Host tick rate the agent is driven at (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;
