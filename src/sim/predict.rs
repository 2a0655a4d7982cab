//! Trajectory prediction
//!
//! Projects the ball straight ahead to the paddle's height, then blurs the
//! answer by the current error margin. No wall bounces are modelled: the
//! controller is meant to misjudge banked shots the way a person does.

use rand::Rng;

use super::state::BallState;
use crate::consts::*;
use crate::clamp_to_boundary;
use crate::settings::ControllerConfig;

/// Seconds until the ball reaches `paddle_y` along its vertical velocity
///
/// Always finite: the velocity is guarded by [`INTERCEPT_EPSILON`], so a ball
/// moving purely sideways yields a very large (but finite) time.
pub fn time_to_intercept(ball: &BallState, paddle_y: f32) -> f32 {
    let delta_y = paddle_y - ball.pos.y;
    let mut denom = ball.vel.y + INTERCEPT_EPSILON;
    if denom.abs() < INTERCEPT_EPSILON {
        denom = INTERCEPT_EPSILON;
    }
    (delta_y / denom).abs()
}

/// Unperturbed intercept X after `time` seconds
#[inline]
pub fn perfect_intercept_x(ball: &BallState, time: f32) -> f32 {
    ball.pos.x + ball.vel.x * time
}

/// Predicted paddle target, or `None` when the ball is already level
///
/// `target_offset` is added before clamping (active nudge mistakes).
pub fn predict_target_x<R: Rng + ?Sized>(
    ball: &BallState,
    paddle_y: f32,
    config: &ControllerConfig,
    error_margin: f32,
    target_offset: f32,
    rng: &mut R,
) -> Option<f32> {
    let time = time_to_intercept(ball, paddle_y);
    if time.is_nan() || time <= 0.0 {
        return None;
    }

    let perfect_x = perfect_intercept_x(ball, time);
    let prediction_error = (1.0 - config.prediction_accuracy) * rng.random_range(-0.5..=0.5);
    let mut target = perfect_x + prediction_error * error_margin;

    // Overshoot in the direction of travel
    target += ball.vel.x * VELOCITY_BIAS;
    target += target_offset;

    if !target.is_finite() {
        target = NEUTRAL_X;
    }
    Some(clamp_to_boundary(target, config.boundary))
}
