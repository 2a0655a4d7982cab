//! Decision state machine
//!
//! Evaluated on the irregular decision tick. Each mode has its own transition
//! function; Hesitating and Recovery are left by their episodes completing.

use glam::Vec2;
use rand::Rng;

use super::episode::{EpisodeKind, Episodes, MistakeKind};
use super::error_model::{self, MistakeCheck};
use super::state::{BallState, ControllerState, Mode};
use crate::consts::*;
use crate::settings::ControllerConfig;

/// Inputs sampled for one decision tick
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput<'a> {
    pub ball: BallState,
    pub paddle: Vec2,
    pub round_time: f32,
    pub config: &'a ControllerConfig,
}

/// What a decision tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Ball not approaching; parked (or stayed parked) at neutral
    Parked,
    /// A deliberate mistake began
    Mistake(MistakeKind),
    /// Mode changed
    Transition { from: Mode, to: Mode },
    /// Nothing changed
    Hold,
}

/// Run one decision tick
pub fn decide<R: Rng + ?Sized>(
    state: &mut ControllerState,
    episodes: &mut Episodes,
    input: &DecisionInput<'_>,
    rng: &mut R,
) -> Decision {
    let ball = &input.ball;
    let config = input.config;

    if !ball.is_approaching(input.paddle.y) {
        if state.mode != Mode::Idle {
            log::debug!("{:?} -> Idle (ball receding)", state.mode);
            state.mode = Mode::Idle;
            state.return_to_neutral();
        }
        return Decision::Parked;
    }

    let speed = ball.speed();
    state.error_margin = error_model::error_margin(config, speed);

    let distance = ball.vertical_distance(input.paddle.y);

    // Idle paddles have not engaged yet; only the reaction gate can wake them
    if state.mode != Mode::Idle {
        let check = MistakeCheck {
            probability: error_model::mistake_probability(config.difficulty, speed),
            roll: rng.random::<f32>(),
            round_time: input.round_time,
            distance,
            mistake_active: episodes.mistake_active(),
        };
        if check.is_eligible() {
            if let Some(kind) = begin_mistake(state, episodes, input, rng) {
                return Decision::Mistake(kind);
            }
        }
    }

    let from = state.mode;
    match from {
        Mode::Idle => from_idle(state, episodes, input, distance, rng),
        Mode::Recovery => from_recovery(state, input),
        Mode::Tracking | Mode::Hesitating => {}
    }

    if state.mode != from {
        log::debug!("{:?} -> {:?}", from, state.mode);
        Decision::Transition {
            from,
            to: state.mode,
        }
    } else {
        Decision::Hold
    }
}

fn from_idle<R: Rng + ?Sized>(
    state: &mut ControllerState,
    episodes: &mut Episodes,
    input: &DecisionInput<'_>,
    distance: f32,
    rng: &mut R,
) {
    if distance >= input.config.reaction_distance {
        return;
    }
    if rng.random::<f32>() < TRACKING_CHANCE {
        state.mode = Mode::Tracking;
    } else {
        state.mode = Mode::Hesitating;
        episodes.begin_hesitation(input.round_time, rng);
    }
}

fn from_recovery(state: &mut ControllerState, input: &DecisionInput<'_>) {
    if (input.paddle.x - state.target_x).abs() < RECOVERY_TOLERANCE {
        state.mode = Mode::Tracking;
    }
}

fn begin_mistake<R: Rng + ?Sized>(
    state: &mut ControllerState,
    episodes: &mut Episodes,
    input: &DecisionInput<'_>,
    rng: &mut R,
) -> Option<MistakeKind> {
    let kind = episodes.begin_mistake(input.round_time, input.config.difficulty, rng)?;
    if kind == MistakeKind::Slowdown {
        state.base_speed_override = Some(input.config.max_speed * MISTAKE_SLOWDOWN_FACTOR);
    }
    // Recovery supersedes a hesitation; it must not end the mistake early
    episodes.cancel_hesitation();
    log::debug!("{:?} -> Recovery ({:?})", state.mode, kind);
    state.mode = Mode::Recovery;
    Some(kind)
}

/// Finish every episode due at `now`, returning to Tracking
///
/// Returns true if any episode completed.
pub fn complete_episodes(state: &mut ControllerState, episodes: &mut Episodes, now: f32) -> bool {
    let mut completed = false;
    for episode in episodes.take_due(now) {
        if let EpisodeKind::Mistake(MistakeKind::Slowdown) = episode.kind {
            state.base_speed_override = None;
        }
        log::debug!("{:?} finished, {:?} -> Tracking", episode.kind, state.mode);
        state.mode = Mode::Tracking;
        completed = true;
    }
    completed
}
