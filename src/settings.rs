//! Controller configuration and difficulty presets
//!
//! Configuration is immutable once a controller is built. Values coming from a
//! file or an editor surface are clamped by [`ControllerConfig::sanitized`]
//! instead of failing at runtime.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest reaction distance accepted (keeps the urgency division finite)
pub const MIN_REACTION_DISTANCE: f32 = 0.01;

/// Named difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
    Perfect,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
            DifficultyPreset::Perfect => "Perfect",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "norm" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            "perfect" | "max" => Some(DifficultyPreset::Perfect),
            _ => None,
        }
    }

    /// Difficulty value in [0, 1] (1 = no errors, no mistakes)
    pub fn difficulty(&self) -> f32 {
        match self {
            DifficultyPreset::Easy => 0.3,
            DifficultyPreset::Normal => 0.7,
            DifficultyPreset::Hard => 0.9,
            DifficultyPreset::Perfect => 1.0,
        }
    }
}

/// Tunable parameters of one controller
///
/// Keys in JSON use the editor names (`maxPaddleSpeed`, `boundaryX`,
/// `reactionDistance`, `predictionAccuracy`, `baseErrorMargin`,
/// `difficultySetting`). Missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerConfig {
    /// Base paddle speed (units/s)
    #[serde(rename = "maxPaddleSpeed")]
    pub max_speed: f32,
    /// Paddle travel limit; positions stay within [-boundary, boundary]
    #[serde(rename = "boundaryX")]
    pub boundary: f32,
    /// Vertical distance under which an idle paddle starts tracking
    pub reaction_distance: f32,
    /// 1.0 = no random prediction error
    pub prediction_accuracy: f32,
    /// Error margin before speed and difficulty scaling
    pub base_error_margin: f32,
    /// 0.0 = sloppy, 1.0 = flawless
    #[serde(rename = "difficultySetting")]
    pub difficulty: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_speed: 15.0,
            boundary: 1.6,
            reaction_distance: 12.0,
            prediction_accuracy: 0.9,
            base_error_margin: 0.3,
            difficulty: DifficultyPreset::Normal.difficulty(),
        }
    }
}

impl ControllerConfig {
    /// Default config at a preset difficulty
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        Self {
            difficulty: preset.difficulty(),
            ..Self::default()
        }
    }

    /// Copy with every field forced into its valid range
    ///
    /// Non-finite values are replaced by the default for that field.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            max_speed: clamp_field(
                "maxPaddleSpeed",
                self.max_speed,
                defaults.max_speed,
                0.0,
                f32::MAX,
            ),
            boundary: clamp_field("boundaryX", self.boundary, defaults.boundary, 0.0, f32::MAX),
            reaction_distance: clamp_field(
                "reactionDistance",
                self.reaction_distance,
                defaults.reaction_distance,
                MIN_REACTION_DISTANCE,
                f32::MAX,
            ),
            prediction_accuracy: clamp_field(
                "predictionAccuracy",
                self.prediction_accuracy,
                defaults.prediction_accuracy,
                0.0,
                1.0,
            ),
            base_error_margin: clamp_field(
                "baseErrorMargin",
                self.base_error_margin,
                defaults.base_error_margin,
                0.0,
                f32::MAX,
            ),
            difficulty: clamp_field(
                "difficultySetting",
                self.difficulty,
                defaults.difficulty,
                0.0,
                1.0,
            ),
        }
    }

    /// Parse a JSON config and sanitize it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded controller config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn clamp_field(name: &str, value: f32, default: f32, min: f32, max: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("{name} is not finite ({value}), using default {default}");
        return default;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        log::warn!("{name} out of range ({value}), clamped to {clamped}");
    }
    clamped
}
