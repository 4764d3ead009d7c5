//! The seven-field control command emitted once per tick.

use serde::{Deserialize, Serialize};

/// A single tick's worth of control input, normalized.
///
/// `Default` is the safe neutral command (everything zero/released), which
/// is what the controller falls back to if a tick fails to produce output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlOutput {
    /// -1 is hard left, 1 is hard right.
    pub steer: f64,
    /// -1 pitches the nose down, 1 pitches it up.
    pub pitch: f64,
    /// Forward throttle, 0 to 1.
    pub throttle: f64,
    /// Reverse throttle, 0 to 1.
    pub reverse_throttle: f64,
    pub jump: bool,
    pub boost: bool,
    /// Handbrake / powerslide.
    pub slide: bool,
}

impl ControlOutput {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn with_steer(mut self, steer: f64) -> Self {
        self.steer = steer.clamp(-1.0, 1.0);
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = pitch.clamp(-1.0, 1.0);
        self
    }

    pub fn with_throttle(mut self, throttle: f64) -> Self {
        self.throttle = throttle.clamp(0.0, 1.0);
        self
    }

    pub fn with_reverse_throttle(mut self, reverse: f64) -> Self {
        self.reverse_throttle = reverse.clamp(0.0, 1.0);
        self
    }

    pub fn with_jump(mut self, jump: bool) -> Self {
        self.jump = jump;
        self
    }

    pub fn with_boost(mut self, boost: bool) -> Self {
        self.boost = boost;
        self
    }

    pub fn with_slide(mut self, slide: bool) -> Self {
        self.slide = slide;
        self
    }
}
