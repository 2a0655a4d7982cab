//! Autonomous paddle controller
//!
//! Multiplexes three schedules onto a single `tick`:
//! - every tick: episode completion, prediction and motion
//! - decision tick: irregular interval in [0.05, 0.15] s
//! - speed tick: every 0.1 s
//!
//! All randomness comes from a seeded PCG stream, so two controllers with the
//! same seed and inputs issue identical commands.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::decision::{self, Decision, DecisionInput};
use super::episode::Episodes;
use super::motion;
use super::predict::predict_target_x;
use super::speed;
use super::state::{BallSource, ControllerState, Mode, MoveCommand};
use crate::consts::*;
use crate::error::ControllerError;
use crate::settings::ControllerConfig;

/// Builder wiring a ball source and config into a controller
#[derive(Debug, Clone)]
pub struct ControllerBuilder<S> {
    config: ControllerConfig,
    ball: Option<S>,
    seed: u64,
}

impl<S: BallSource> Default for ControllerBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BallSource> ControllerBuilder<S> {
    pub fn new() -> Self {
        Self {
            config: ControllerConfig::default(),
            ball: None,
            seed: 0,
        }
    }

    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ball(mut self, ball: S) -> Self {
        self.ball = Some(ball);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the controller; the config is sanitized here
    pub fn build(self) -> Result<PaddleController<S>, ControllerError> {
        let ball = self.ball.ok_or(ControllerError::MissingBall)?;
        Ok(PaddleController {
            config: self.config.sanitized(),
            ball,
            state: ControllerState::default(),
            episodes: Episodes::new(),
            rng: Pcg32::seed_from_u64(self.seed),
            round_time: 0.0,
            next_decision_at: 0.0,
            next_speed_adjust_at: 0.0,
        })
    }
}

/// Opponent paddle brain
#[derive(Debug, Clone)]
pub struct PaddleController<S> {
    config: ControllerConfig,
    ball: S,
    state: ControllerState,
    episodes: Episodes,
    rng: Pcg32,
    /// Seconds since the last round reset
    round_time: f32,
    next_decision_at: f32,
    next_speed_adjust_at: f32,
}

impl<S: BallSource> PaddleController<S> {
    pub fn builder() -> ControllerBuilder<S> {
        ControllerBuilder::new()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn episodes(&self) -> &Episodes {
        &self.episodes
    }

    pub fn ball(&self) -> &S {
        &self.ball
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    #[inline]
    pub fn target_x(&self) -> f32 {
        self.state.target_x
    }

    #[inline]
    pub fn round_time(&self) -> f32 {
        self.round_time
    }

    /// Round restarted: abandon episodes and park at neutral
    pub fn reset_round(&mut self) {
        log::info!(
            "Round reset after {:.2}s in {:?}",
            self.round_time,
            self.state.mode
        );
        self.state = ControllerState::default();
        self.episodes.clear();
        self.round_time = 0.0;
        self.next_decision_at = 0.0;
        self.next_speed_adjust_at = 0.0;
    }

    /// Advance by `dt` seconds for a paddle currently at `paddle`
    ///
    /// Returns the move the transform owner should apply this tick.
    pub fn tick(&mut self, paddle: Vec2, dt: f32) -> MoveCommand {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.round_time += dt;
        let now = self.round_time;

        decision::complete_episodes(&mut self.state, &mut self.episodes, now);

        let ball = self.ball.sample();

        if now >= self.next_decision_at {
            let input = DecisionInput {
                ball,
                paddle,
                round_time: now,
                config: &self.config,
            };
            let decision =
                decision::decide(&mut self.state, &mut self.episodes, &input, &mut self.rng);
            if decision != Decision::Hold {
                log::trace!("decision at {now:.3}s: {decision:?}");
            }
            self.next_decision_at =
                now + self.rng.random_range(DECISION_INTERVAL_MIN..=DECISION_INTERVAL_MAX);
        }

        if now >= self.next_speed_adjust_at {
            if let Some(multiplier) =
                speed::modulate(paddle.x, paddle.y, &ball, self.config.reaction_distance)
            {
                self.state.speed_multiplier = multiplier;
            }
            self.next_speed_adjust_at = now + SPEED_ADJUST_INTERVAL;
        }

        if self.state.mode != Mode::Idle {
            if let Some(target_x) = predict_target_x(
                &ball,
                paddle.y,
                &self.config,
                self.state.error_margin,
                self.episodes.target_offset(),
                &mut self.rng,
            ) {
                self.state.target_x = target_x;
            }
        }

        motion::step(
            paddle.x,
            &self.state,
            self.config.max_speed,
            self.config.boundary,
            dt,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::BallState;
    use std::cell::Cell;
    use std::rc::Rc;

    const DT: f32 = 1.0 / 60.0;
    const PADDLE_Y: f32 = -4.0;

    fn controller<S: BallSource>(
        ball: S,
        config: ControllerConfig,
        seed: u64,
    ) -> PaddleController<S> {
        PaddleController::builder()
            .config(config)
            .ball(ball)
            .seed(seed)
            .build()
            .unwrap()
    }

    fn difficulty(difficulty: f32) -> ControllerConfig {
        ControllerConfig {
            difficulty,
            ..ControllerConfig::default()
        }
    }

    #[test]
    fn test_missing_ball_is_rejected() {
        let result = ControllerBuilder::<BallState>::new().seed(3).build();
        assert!(matches!(result, Err(ControllerError::MissingBall)));
    }

    #[test]
    fn test_builder_sanitizes_config() {
        let c = controller(BallState::default(), difficulty(3.0), 0);
        assert_eq!(c.config().difficulty, 1.0);
    }

    #[test]
    fn test_reference_scenario() {
        let ball = BallState::new(Vec2::new(0.0, 5.0), Vec2::new(0.0, -5.0));
        assert!(ball.is_approaching(PADDLE_Y));

        let mut c = controller(ball, difficulty(0.7), 42);
        c.tick(Vec2::new(0.0, PADDLE_Y), DT);

        assert!(matches!(c.mode(), Mode::Tracking | Mode::Hesitating));
        assert!(c.target_x().abs() < 0.01, "target {}", c.target_x());
    }

    #[test]
    fn test_receding_ball_parks_within_one_decision_tick() {
        let shared = Rc::new(Cell::new(BallState::new(
            Vec2::new(0.0, 5.0),
            Vec2::new(3.0, -5.0),
        )));
        let mut c = controller(Rc::clone(&shared), difficulty(1.0), 7);
        let mut paddle = Vec2::new(0.0, PADDLE_Y);

        for _ in 0..30 {
            paddle = c.tick(paddle, DT).apply(paddle);
        }
        assert_ne!(c.mode(), Mode::Idle);
        assert!(c.target_x() > 0.0);

        shared.set(BallState::new(Vec2::new(1.0, 0.0), Vec2::new(3.0, 5.0)));
        let mut elapsed = 0.0;
        while elapsed <= DECISION_INTERVAL_MAX + DT {
            paddle = c.tick(paddle, DT).apply(paddle);
            elapsed += DT;
        }
        assert_eq!(c.mode(), Mode::Idle);
        assert_eq!(c.target_x(), NEUTRAL_X);
        assert_eq!(c.state().speed_multiplier, IDLE_SPEED_MULTIPLIER);
    }

    #[test]
    fn test_no_mistakes_during_grace_period() {
        for seed in 0..20 {
            // Probability 1 per decision tick once the grace period ends
            let ball = BallState::new(Vec2::new(0.0, 5.0), Vec2::new(0.0, -25.0));
            let mut c = controller(ball, difficulty(0.0), seed);
            let paddle = Vec2::new(0.0, PADDLE_Y);
            let mut saw_recovery = false;
            while c.round_time() < 2.5 {
                c.tick(paddle, DT);
                if c.mode() == Mode::Recovery || c.episodes().mistake_active() {
                    let at = c.round_time();
                    assert!(at > MISTAKE_GRACE_PERIOD, "mistake at {at}");
                    saw_recovery = true;
                }
            }
            assert!(saw_recovery, "seed {seed} never made a mistake");
        }
    }

    #[test]
    fn test_distant_ball_keeps_idle_paddle_parked() {
        for seed in 0..10 {
            // 14 units away; mistakes would be certain once engaged
            let ball = BallState::new(Vec2::new(0.0, 10.0), Vec2::new(0.0, -25.0));
            let mut c = controller(ball, difficulty(0.0), seed);
            let mut paddle = Vec2::new(0.0, PADDLE_Y);
            while c.round_time() < 3.0 {
                paddle = c.tick(paddle, DT).apply(paddle);
                assert_eq!(c.mode(), Mode::Idle, "seed {seed} at {}", c.round_time());
                assert!(!c.episodes().mistake_active());
            }
            assert_eq!(paddle.x, NEUTRAL_X);
        }
    }

    #[test]
    fn test_full_difficulty_never_recovers() {
        for (seed, speed) in [(1, 5.0), (2, 15.0), (3, 25.0), (4, 80.0)] {
            let ball = BallState::new(Vec2::new(0.4, 6.0), Vec2::new(1.0, -speed));
            let mut c = controller(ball, difficulty(1.0), seed);
            let mut paddle = Vec2::new(0.0, PADDLE_Y);
            for _ in 0..600 {
                paddle = c.tick(paddle, DT).apply(paddle);
                assert_ne!(c.mode(), Mode::Recovery);
            }
        }
    }

    #[test]
    fn test_mistake_episodes_end_on_time() {
        let ball = BallState::new(Vec2::new(0.0, 5.0), Vec2::new(0.0, -25.0));
        let mut c = controller(ball, difficulty(0.0), 11);
        let paddle = Vec2::new(0.0, PADDLE_Y);
        let mut checked = 0;
        let mut open: Option<f32> = None;

        while c.round_time() < 6.0 {
            c.tick(paddle, DT);
            let current = c.episodes().mistake().map(|e| e.started_at);
            if let Some(started) = open {
                if current != Some(started) {
                    assert!(c.round_time() <= started + MISTAKE_SLOWDOWN_MAX + DT + 1e-4);
                    checked += 1;
                    open = None;
                }
            }
            if open.is_none() {
                open = current;
            }
        }
        assert!(checked > 5);
    }

    #[test]
    fn test_hesitation_ends_in_tracking() {
        let ball = BallState::new(Vec2::new(0.0, 5.0), Vec2::new(0.0, -5.0));
        let paddle = Vec2::new(0.0, PADDLE_Y);
        let mut seen = 0;
        for seed in 0..200 {
            let mut c = controller(ball, difficulty(1.0), seed);
            c.tick(paddle, DT);
            if c.mode() != Mode::Hesitating {
                continue;
            }
            seen += 1;
            // Hesitating paddles do not move
            assert_eq!(c.tick(paddle, DT).delta_x, 0.0);
            let start = c.episodes().hesitation().unwrap().started_at;
            while c.round_time() < start + HESITATION_MAX + DT {
                c.tick(paddle, DT);
            }
            assert_eq!(c.mode(), Mode::Tracking);
        }
        assert!(seen > 0);
    }

    #[test]
    fn test_reset_abandons_episode() {
        let ball = BallState::new(Vec2::new(0.0, 5.0), Vec2::new(0.0, -25.0));
        let mut c = controller(ball, difficulty(0.0), 5);
        let paddle = Vec2::new(0.0, PADDLE_Y);
        while !c.episodes().mistake_active() {
            c.tick(paddle, DT);
            assert!(c.round_time() < 5.0);
        }

        c.reset_round();
        assert_eq!(c.mode(), Mode::Idle);
        assert_eq!(c.target_x(), NEUTRAL_X);
        assert_eq!(c.round_time(), 0.0);
        assert!(!c.episodes().mistake_active());
        assert_eq!(c.state().base_speed_override, None);
    }

    #[test]
    fn test_paddle_converges_on_intercept() {
        // 10 units away, inside the 12 unit reaction distance
        let ball = BallState::new(Vec2::new(-0.5, 6.0), Vec2::new(0.1, -6.0));
        let mut c = controller(ball, difficulty(1.0), 9);
        let mut paddle = Vec2::new(1.5, PADDLE_Y);
        for _ in 0..120 {
            paddle = c.tick(paddle, DT).apply(paddle);
            assert!(paddle.x.abs() <= c.config().boundary + 1e-5);
            assert_eq!(paddle.y, PADDLE_Y);
        }
        assert!((paddle.x - c.target_x()).abs() < 0.05);
    }

    #[test]
    fn test_determinism() {
        let ball = BallState::new(Vec2::new(0.2, 6.0), Vec2::new(2.0, -12.0));
        let mut a = controller(ball, difficulty(0.2), 1234);
        let mut b = controller(ball, difficulty(0.2), 1234);
        let mut pa = Vec2::new(0.0, PADDLE_Y);
        let mut pb = pa;
        for _ in 0..400 {
            let ca = a.tick(pa, DT);
            let cb = b.tick(pb, DT);
            assert_eq!(ca, cb);
            pa = ca.apply(pa);
            pb = cb.apply(pb);
        }
        assert_eq!(a.state(), b.state());
    }
}
