//! Urgency-based speed modulation

use super::state::BallState;
use crate::consts::*;
use crate::{clamp01, lerp};

/// How close the ball is horizontally, normalised to [0, 1]
pub fn urgency(paddle_x: f32, ball_x: f32, reaction_distance: f32) -> f32 {
    let distance = (paddle_x - ball_x).abs();
    clamp01(1.0 - distance / reaction_distance)
}

/// New speed multiplier, or `None` to keep the current one
pub fn modulate(
    paddle_x: f32,
    paddle_y: f32,
    ball: &BallState,
    reaction_distance: f32,
) -> Option<f32> {
    if !ball.is_approaching(paddle_y) {
        return None;
    }
    let urgency = urgency(paddle_x, ball.pos.x, reaction_distance);
    Some(lerp(
        URGENCY_MULTIPLIER_MIN,
        URGENCY_MULTIPLIER_MAX,
        urgency * ball.speed() / URGENCY_SPEED_SCALE,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_urgency_bounds() {
        assert_eq!(urgency(0.0, 0.0, 12.0), 1.0);
        assert_eq!(urgency(0.0, 24.0, 12.0), 0.0);
        assert!((urgency(0.0, 6.0, 12.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_receding_ball_leaves_multiplier() {
        let ball = BallState::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 5.0));
        assert_eq!(modulate(0.0, -4.0, &ball, 12.0), None);
    }

    #[test]
    fn test_fast_close_ball_saturates() {
        let ball = BallState::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, -20.0));
        assert_eq!(modulate(0.0, -4.0, &ball, 12.0), Some(URGENCY_MULTIPLIER_MAX));
    }

    #[test]
    fn test_multiplier_interpolates() {
        // urgency 0.5, speed 10 -> t = 0.5
        let ball = BallState::new(Vec2::new(6.0, 0.0), Vec2::new(0.0, -10.0));
        let m = modulate(0.0, -4.0, &ball, 12.0).unwrap();
        assert!((m - 1.0).abs() < 1e-5);
    }
}
