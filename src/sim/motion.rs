//! Per-tick paddle motion
//!
//! Moves toward the target at a speed that grows with the remaining distance,
//! never overshooting and never leaving the boundary.

use super::state::{ControllerState, MoveCommand};
use crate::consts::*;
use crate::{clamp_to_boundary, lerp};

/// Distance-driven speed scale
///
/// The distance is deliberately not normalised by the boundary, so anything
/// one unit or further away runs at the top of the range.
#[inline]
pub fn distance_scale(distance_to_target: f32) -> f32 {
    lerp(DISTANCE_SCALE_MIN, DISTANCE_SCALE_MAX, distance_to_target)
}

/// Compute this tick's move for a paddle at `paddle_x`
///
/// Idle and hesitating paddles stay put.
pub fn step(
    paddle_x: f32,
    state: &ControllerState,
    max_speed: f32,
    boundary: f32,
    dt: f32,
) -> MoveCommand {
    let target_x = state.target_x;
    if !state.can_move() {
        return MoveCommand {
            target_x,
            delta_x: 0.0,
        };
    }

    let distance = (paddle_x - target_x).abs();
    let final_speed =
        state.base_speed(max_speed) * distance_scale(distance) * state.speed_multiplier;
    let max_delta = (final_speed * dt).max(0.0);

    let delta = (target_x - paddle_x).clamp(-max_delta, max_delta);
    let new_x = clamp_to_boundary(paddle_x + delta, boundary);

    MoveCommand {
        target_x,
        delta_x: new_x - paddle_x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Mode;
    use proptest::prelude::*;

    fn tracking(target_x: f32) -> ControllerState {
        ControllerState {
            mode: Mode::Tracking,
            target_x,
            speed_multiplier: 1.0,
            ..ControllerState::default()
        }
    }

    #[test]
    fn test_idle_and_hesitating_hold_still() {
        for mode in [Mode::Idle, Mode::Hesitating] {
            let state = ControllerState {
                mode,
                ..tracking(1.0)
            };
            assert_eq!(step(0.0, &state, 15.0, 1.6, 0.016).delta_x, 0.0);
        }
    }

    #[test]
    fn test_step_is_speed_limited() {
        // distance 1.0 -> scale 1.5; 10 * 1.5 * 1.0 * 0.01 = 0.15
        let cmd = step(0.0, &tracking(1.0), 10.0, 1.6, 0.01);
        assert!((cmd.delta_x - 0.15).abs() < 1e-6);
        assert_eq!(cmd.target_x, 1.0);
    }

    #[test]
    fn test_no_overshoot() {
        let cmd = step(0.95, &tracking(1.0), 15.0, 1.6, 0.1);
        assert!((cmd.apply(glam::Vec2::new(0.95, -4.0)).x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_recovery_moves_with_slowdown() {
        let mut state = tracking(-1.0);
        state.mode = Mode::Recovery;
        state.base_speed_override = Some(7.0);
        let cmd = step(0.0, &state, 10.0, 1.6, 0.01);
        assert!((cmd.delta_x + 7.0 * 1.5 * 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_distance_scale_saturates() {
        assert_eq!(distance_scale(0.0), 0.5);
        assert_eq!(distance_scale(0.5), 1.0);
        assert_eq!(distance_scale(40.0), 1.5);
    }

    #[test]
    fn test_paddle_outside_boundary_is_pulled_in() {
        let cmd = step(3.0, &tracking(1.0), 100.0, 1.6, 1.0);
        assert!((3.0 + cmd.delta_x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bad_boundary_does_not_panic() {
        let cmd = step(0.0, &tracking(1.0), 100.0, -0.5, 1.0);
        assert!((cmd.delta_x - 0.5).abs() < 1e-6);
        let cmd = step(0.0, &tracking(1.0), 100.0, f32::NAN, 1.0);
        assert_eq!(cmd.delta_x, 0.0);
    }

    proptest! {
        #[test]
        fn prop_step_stays_in_bounds_and_never_overshoots(
            paddle_x in -1.6f32..=1.6,
            target_x in -1.6f32..=1.6,
            multiplier in 0.0f32..2.0,
            dt in 0.0f32..0.5,
        ) {
            let mut state = tracking(target_x);
            state.speed_multiplier = multiplier;
            let cmd = step(paddle_x, &state, 15.0, 1.6, dt);
            let new_x = paddle_x + cmd.delta_x;
            prop_assert!(new_x.abs() <= 1.6 + 1e-5);
            prop_assert!((target_x - new_x).abs() <= (target_x - paddle_x).abs() + 1e-5);
        }
    }
}
