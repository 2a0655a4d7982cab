//! Rival Paddle - autonomous opponent for a paddle-and-ball arcade game
//!
//! Core modules:
//! - `sim`: Controller simulation (prediction, decisions, speed, motion)
//! - `settings`: Controller configuration and difficulty presets
//! - `error`: Configuration and construction errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, ControllerError};
pub use settings::{ControllerConfig, DifficultyPreset};

/// Controller tuning constants
pub mod consts {
    /// Guard added to the vertical velocity before dividing by it
    pub const INTERCEPT_EPSILON: f32 = 0.0001;
    /// Horizontal overshoot in the direction of travel (fraction of ball vx)
    pub const VELOCITY_BIAS: f32 = 0.1;

    /// Decision tick interval range (seconds, re-drawn after each firing)
    pub const DECISION_INTERVAL_MIN: f32 = 0.05;
    pub const DECISION_INTERVAL_MAX: f32 = 0.15;
    /// Speed modulator period (seconds)
    pub const SPEED_ADJUST_INTERVAL: f32 = 0.1;

    /// Chance of going straight to Tracking once the ball is in range
    pub const TRACKING_CHANCE: f32 = 0.9;
    /// Hesitation episode duration range (seconds)
    pub const HESITATION_MIN: f32 = 0.05;
    pub const HESITATION_MAX: f32 = 0.15;

    /// No mistakes during the first seconds of a round
    pub const MISTAKE_GRACE_PERIOD: f32 = 2.0;
    /// No mistakes when the ball is closer than this (vertical units)
    pub const MISTAKE_MIN_DISTANCE: f32 = 2.0;
    /// Draws above this threshold nudge the target instead of slowing down
    pub const MISTAKE_NUDGE_THRESHOLD: f32 = 0.7;
    /// Maximum target nudge before difficulty scaling
    pub const MISTAKE_NUDGE_RANGE: f32 = 0.3;
    pub const MISTAKE_NUDGE_MIN: f32 = 0.05;
    pub const MISTAKE_NUDGE_MAX: f32 = 0.15;
    /// Base speed factor while a slowdown mistake is active
    pub const MISTAKE_SLOWDOWN_FACTOR: f32 = 0.7;
    pub const MISTAKE_SLOWDOWN_MIN: f32 = 0.1;
    pub const MISTAKE_SLOWDOWN_MAX: f32 = 0.2;
    /// Positional error under which Recovery hands back to Tracking
    pub const RECOVERY_TOLERANCE: f32 = 0.05;

    /// Ball speed normalisers for the error model
    pub const ERROR_SPEED_SCALE: f32 = 15.0;
    pub const MISTAKE_SPEED_SCALE: f32 = 25.0;
    /// Ball speed normaliser for urgency
    pub const URGENCY_SPEED_SCALE: f32 = 10.0;

    /// Speed multiplier range driven by urgency
    pub const URGENCY_MULTIPLIER_MIN: f32 = 0.8;
    pub const URGENCY_MULTIPLIER_MAX: f32 = 1.2;
    /// Speed multiplier forced while idle
    pub const IDLE_SPEED_MULTIPLIER: f32 = 0.5;
    /// Distance-driven speed scale range
    pub const DISTANCE_SCALE_MIN: f32 = 0.5;
    pub const DISTANCE_SCALE_MAX: f32 = 1.5;

    /// Neutral paddle position
    pub const NEUTRAL_X: f32 = 0.0;
}

/// Linear interpolation with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * clamp01(t)
}

/// Clamp to [0, 1], mapping NaN to 0
#[inline]
pub fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp to [-boundary, boundary]
///
/// A negative boundary is taken by magnitude and NaN collapses the range to 0.
#[inline]
pub fn clamp_to_boundary(x: f32, boundary: f32) -> f32 {
    let limit = if boundary.is_nan() { 0.0 } else { boundary.abs() };
    x.clamp(-limit, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_clamps_parameter() {
        assert_eq!(lerp(0.5, 1.5, 0.0), 0.5);
        assert_eq!(lerp(0.5, 1.5, 0.5), 1.0);
        assert_eq!(lerp(0.5, 1.5, 7.0), 1.5);
        assert_eq!(lerp(0.8, 1.2, -3.0), 0.8);
    }

    #[test]
    fn test_clamp01_nan() {
        assert_eq!(clamp01(f32::NAN), 0.0);
        assert_eq!(clamp01(2.0), 1.0);
    }

    #[test]
    fn test_clamp_to_boundary_tolerates_bad_limits() {
        assert_eq!(clamp_to_boundary(3.0, 1.6), 1.6);
        assert_eq!(clamp_to_boundary(-3.0, -1.6), -1.6);
        assert_eq!(clamp_to_boundary(0.5, f32::NAN), 0.0);
        assert_eq!(clamp_to_boundary(0.5, f32::INFINITY), 0.5);
    }
}
