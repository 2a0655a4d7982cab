//! Error types
//!
//! The control loop itself never fails; errors only surface while loading
//! configuration or wiring a controller together.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a controller configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to construct a controller
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The controller was built without a ball to follow
    #[error("controller has no ball source attached")]
    MissingBall,
}
