//! Headless arena for proxy play
//!
//! Two controllers defend the top and bottom lines of a narrow court. The
//! court only reflects the ball off side walls and paddle faces along the
//! axes; it exists to drive controllers end to end, not to model physics.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::controller::PaddleController;
use super::state::BallState;
use crate::error::ControllerError;
use crate::settings::ControllerConfig;

/// Court geometry and serve rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Side walls at x = ±wall_x
    pub wall_x: f32,
    /// Paddle lines at y = ±paddle_y
    pub paddle_y: f32,
    pub paddle_half_width: f32,
    pub ball_radius: f32,
    /// Serve and rally speed (units/s)
    pub ball_speed: f32,
    /// Serve angle limit from vertical (degrees)
    pub max_serve_angle: f32,
    /// Horizontal velocity jitter added on bounces (±)
    pub bounce_jitter: f32,
    /// Distance past a paddle line before the point is lost
    pub miss_margin: f32,
    pub win_score: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            wall_x: 2.2,
            paddle_y: 4.0,
            paddle_half_width: 0.6,
            ball_radius: 0.15,
            ball_speed: 10.0,
            max_serve_angle: 45.0,
            bounce_jitter: 0.5,
            miss_margin: 1.0,
            win_score: 10,
        }
    }
}

/// Which line a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Bottom,
    Top,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Bottom => Side::Top,
            Side::Top => Side::Bottom,
        }
    }
}

/// Match score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub bottom: u32,
    pub top: u32,
}

impl Score {
    pub fn increment(&mut self, side: Side) {
        match side {
            Side::Bottom => self.bottom += 1,
            Side::Top => self.top += 1,
        }
    }

    pub fn winner(&self, win_score: u32) -> Option<Side> {
        if self.bottom >= win_score {
            Some(Side::Bottom)
        } else if self.top >= win_score {
            Some(Side::Top)
        } else {
            None
        }
    }
}

/// Something that happened during an arena step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaEvent {
    WallBounce,
    PaddleHit(Side),
    /// `Side` won the point; the round restarts
    Scored(Side),
    /// `Side` reached the win score
    MatchOver(Side),
}

/// Reflect a velocity about a unit normal
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Ball, paddles and score; the ball is shared read-only with controllers
#[derive(Debug)]
pub struct Arena {
    pub config: ArenaConfig,
    ball: Rc<Cell<BallState>>,
    pub bottom: Vec2,
    pub top: Vec2,
    pub score: Score,
    rng: Pcg32,
}

impl Arena {
    pub fn new(config: ArenaConfig, seed: u64) -> Self {
        let mut arena = Self {
            config,
            ball: Rc::new(Cell::new(BallState::default())),
            bottom: Vec2::new(0.0, -config.paddle_y),
            top: Vec2::new(0.0, config.paddle_y),
            score: Score::default(),
            rng: Pcg32::seed_from_u64(seed),
        };
        arena.serve();
        arena
    }

    /// Handle for controllers to sample the ball
    pub fn ball_handle(&self) -> Rc<Cell<BallState>> {
        Rc::clone(&self.ball)
    }

    pub fn ball(&self) -> BallState {
        self.ball.get()
    }

    pub fn paddle(&self, side: Side) -> Vec2 {
        match side {
            Side::Bottom => self.bottom,
            Side::Top => self.top,
        }
    }

    pub fn set_paddle(&mut self, side: Side, pos: Vec2) {
        match side {
            Side::Bottom => self.bottom = pos,
            Side::Top => self.top = pos,
        }
    }

    /// Centre the ball and launch it toward a random side
    pub fn serve(&mut self) {
        let spread = self.config.max_serve_angle.abs();
        let offset: f32 = self.rng.random_range(-spread..=spread);
        let base = if self.rng.random_bool(0.5) { -90.0 } else { 90.0 };
        let angle = (base + offset).to_radians();
        let dir = Vec2::new(angle.cos(), angle.sin());
        self.ball
            .set(BallState::new(Vec2::ZERO, dir * self.config.ball_speed));
    }

    /// Advance the ball; paddles are moved by their owners beforehand
    pub fn step(&mut self, dt: f32) -> Option<ArenaEvent> {
        let cfg = self.config;
        let mut ball = self.ball.get();
        ball.pos += ball.vel * dt;
        let mut event = None;

        let reach_x = cfg.wall_x - cfg.ball_radius;
        if ball.pos.x.abs() > reach_x {
            let normal = Vec2::new(-ball.pos.x.signum(), 0.0);
            if ball.vel.dot(normal) < 0.0 {
                ball.vel = reflect_velocity(ball.vel, normal);
                ball.vel.x += self.jitter();
            }
            ball.pos.x = ball.pos.x.clamp(-reach_x, reach_x);
            event = Some(ArenaEvent::WallBounce);
        }

        for side in [Side::Bottom, Side::Top] {
            let paddle = self.paddle(side);
            let normal = match side {
                Side::Bottom => Vec2::Y,
                Side::Top => Vec2::NEG_Y,
            };
            // Distance in front of the paddle face
            let front = (ball.pos.y - paddle.y) * normal.y - cfg.ball_radius;
            if ball.vel.dot(normal) >= 0.0 {
                continue;
            }
            if front <= 0.0 && front > -cfg.miss_margin {
                if (ball.pos.x - paddle.x).abs() <= cfg.paddle_half_width + cfg.ball_radius {
                    let dir = reflect_velocity(ball.vel, normal).normalize_or_zero();
                    ball.vel = dir * cfg.ball_speed;
                    ball.vel.x += self.jitter();
                    ball.pos.y = paddle.y + normal.y * cfg.ball_radius;
                    event = Some(ArenaEvent::PaddleHit(side));
                }
            } else if front <= -cfg.miss_margin {
                let scorer = side.opponent();
                self.ball.set(ball);
                return Some(self.award_point(scorer));
            }
        }

        self.ball.set(ball);
        event
    }

    fn award_point(&mut self, side: Side) -> ArenaEvent {
        self.score.increment(side);
        log::info!(
            "{:?} scores ({} - {})",
            side,
            self.score.bottom,
            self.score.top
        );
        if let Some(winner) = self.score.winner(self.config.win_score) {
            log::info!("{:?} wins the match", winner);
            return ArenaEvent::MatchOver(winner);
        }
        self.serve();
        ArenaEvent::Scored(side)
    }

    fn jitter(&mut self) -> f32 {
        let j = self.config.bounce_jitter;
        if j > 0.0 { self.rng.random_range(-j..=j) } else { 0.0 }
    }
}

/// Two controllers playing each other
#[derive(Debug)]
pub struct ProxyMatch {
    pub arena: Arena,
    pub bottom: PaddleController<Rc<Cell<BallState>>>,
    pub top: PaddleController<Rc<Cell<BallState>>>,
    time: f32,
}

impl ProxyMatch {
    pub fn new(
        arena: ArenaConfig,
        bottom: ControllerConfig,
        top: ControllerConfig,
        seed: u64,
    ) -> Result<Self, ControllerError> {
        let arena = Arena::new(arena, seed);
        let bottom = PaddleController::builder()
            .config(bottom)
            .ball(arena.ball_handle())
            .seed(seed.wrapping_add(1))
            .build()?;
        let top = PaddleController::builder()
            .config(top)
            .ball(arena.ball_handle())
            .seed(seed.wrapping_add(2))
            .build()?;
        Ok(Self {
            arena,
            bottom,
            top,
            time: 0.0,
        })
    }

    /// Total simulated seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn score(&self) -> Score {
        self.arena.score
    }

    /// Move both paddles, then the ball; resets controllers on a point
    pub fn step(&mut self, dt: f32) -> Option<ArenaEvent> {
        self.time += dt;

        let bottom = self.arena.bottom;
        let next = self.bottom.tick(bottom, dt).apply(bottom);
        self.arena.set_paddle(Side::Bottom, next);

        let top = self.arena.top;
        let next = self.top.tick(top, dt).apply(top);
        self.arena.set_paddle(Side::Top, next);

        let event = self.arena.step(dt);
        if let Some(ArenaEvent::Scored(_)) = event {
            self.bottom.reset_round();
            self.top.reset_round();
        }
        event
    }

    /// Play until someone wins or `max_seconds` elapse
    pub fn run(&mut self, dt: f32, max_seconds: f32) -> Option<Side> {
        while self.time < max_seconds {
            if let Some(ArenaEvent::MatchOver(winner)) = self.step(dt) {
                return Some(winner);
            }
        }
        None
    }
}
