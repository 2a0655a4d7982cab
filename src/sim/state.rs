//! Controller state and the ball sampling seam
//!
//! Everything the controller mutates lives in [`ControllerState`]; the ball is
//! only ever read through a [`BallSource`].

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Kinematic snapshot of the ball
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BallState {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl BallState {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// True when the vertical velocity closes the gap to `paddle_y`
    pub fn is_approaching(&self, paddle_y: f32) -> bool {
        (paddle_y - self.pos.y) * self.vel.y > 0.0
    }

    /// Vertical distance to a paddle line
    #[inline]
    pub fn vertical_distance(&self, paddle_y: f32) -> f32 {
        (paddle_y - self.pos.y).abs()
    }
}

/// Read-only access to the most recent ball sample
pub trait BallSource {
    fn sample(&self) -> BallState;
}

/// A fixed ball (tests, replays)
impl BallSource for BallState {
    fn sample(&self) -> BallState {
        *self
    }
}

/// Ball shared with the physics owner on the same thread
impl BallSource for Rc<Cell<BallState>> {
    fn sample(&self) -> BallState {
        self.get()
    }
}

/// Behavioral mode of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Ball not approaching; parked at neutral
    #[default]
    Idle,
    /// Following the predicted intercept
    Tracking,
    /// Holding still before committing
    Hesitating,
    /// Working through a deliberate mistake
    Recovery,
}

/// Mutable controller state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    pub mode: Mode,
    pub target_x: f32,
    pub error_margin: f32,
    pub speed_multiplier: f32,
    /// Base speed in force while a slowdown mistake runs
    pub base_speed_override: Option<f32>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            mode: Mode::Idle,
            target_x: NEUTRAL_X,
            error_margin: 0.0,
            speed_multiplier: IDLE_SPEED_MULTIPLIER,
            base_speed_override: None,
        }
    }
}

impl ControllerState {
    /// Park at neutral (entering Idle)
    pub fn return_to_neutral(&mut self) {
        self.target_x = NEUTRAL_X;
        self.speed_multiplier = IDLE_SPEED_MULTIPLIER;
    }

    /// Base speed after any active slowdown
    #[inline]
    pub fn base_speed(&self, max_speed: f32) -> f32 {
        self.base_speed_override.unwrap_or(max_speed)
    }

    /// Whether the motion controller may move the paddle in this mode
    #[inline]
    pub fn can_move(&self) -> bool {
        !matches!(self.mode, Mode::Idle | Mode::Hesitating)
    }
}

/// Per-tick output for the paddle transform
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveCommand {
    pub target_x: f32,
    /// Horizontal displacement to apply this tick
    pub delta_x: f32,
}

impl MoveCommand {
    /// Apply to a paddle position (y is left alone)
    #[inline]
    pub fn apply(&self, paddle: Vec2) -> Vec2 {
        Vec2::new(paddle.x + self.delta_x, paddle.y)
    }
}
