//! Difficulty-driven error model
//!
//! Faster balls and lower difficulty both widen the aiming error and raise the
//! odds of a deliberate mistake.

use crate::consts::*;
use crate::settings::ControllerConfig;

/// Scale for random prediction error
pub fn error_margin(config: &ControllerConfig, ball_speed: f32) -> f32 {
    let speed_factor = ball_speed / ERROR_SPEED_SCALE;
    config.base_error_margin * (1.0 + speed_factor) * (1.0 - config.difficulty)
}

/// Chance per decision tick of starting a mistake (may exceed 1 for fast balls)
pub fn mistake_probability(difficulty: f32, ball_speed: f32) -> f32 {
    (1.0 - difficulty) * (ball_speed / MISTAKE_SPEED_SCALE)
}

/// Inputs to the mistake gate for one decision tick
#[derive(Debug, Clone, Copy)]
pub struct MistakeCheck {
    /// Mistake probability for this tick
    pub probability: f32,
    /// Uniform draw in [0, 1)
    pub roll: f32,
    /// Seconds since the round started
    pub round_time: f32,
    /// Vertical ball-to-paddle distance
    pub distance: f32,
    /// A mistake episode is already running
    pub mistake_active: bool,
}

impl MistakeCheck {
    /// Mistakes need a lucky roll, a settled round and room to recover
    pub fn is_eligible(&self) -> bool {
        !self.mistake_active
            && self.roll < self.probability
            && self.round_time > MISTAKE_GRACE_PERIOD
            && self.distance > MISTAKE_MIN_DISTANCE
    }
}
