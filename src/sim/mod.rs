//! Controller simulation module
//!
//! All controller logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick(dt)`
//! - Seeded RNG only
//! - No engine, rendering or platform dependencies

pub mod arena;
pub mod controller;
pub mod decision;
pub mod episode;
pub mod error_model;
pub mod motion;
pub mod predict;
pub mod speed;
pub mod state;

pub use arena::{Arena, ArenaConfig, ArenaEvent, ProxyMatch, Score, Side};
pub use controller::{ControllerBuilder, PaddleController};
pub use decision::Decision;
pub use episode::{Episode, EpisodeKind, Episodes, MistakeKind};
pub use predict::{predict_target_x, time_to_intercept};
pub use state::{BallSource, BallState, ControllerState, Mode, MoveCommand};
