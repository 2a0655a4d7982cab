//! Rival Paddle demo entry point
//!
//! Runs a headless proxy match: two controllers play each other until one
//! reaches the win score.

use std::path::PathBuf;

use clap::Parser;

use rival_paddle::sim::{ArenaConfig, ArenaEvent, ProxyMatch, Side};
use rival_paddle::{ControllerConfig, DifficultyPreset};

/// Fixed simulation timestep (120 Hz)
const SIM_DT: f32 = 1.0 / 120.0;

#[derive(Debug, Parser)]
#[command(name = "rival-paddle", about = "Headless proxy match between two paddle controllers")]
struct Cli {
    /// JSON controller config (maxPaddleSpeed, boundaryX, ...)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Difficulty preset for the bottom paddle (overrides the config value)
    #[arg(long, value_parser = parse_preset)]
    bottom: Option<DifficultyPreset>,
    /// Difficulty preset for the top paddle (overrides the config value)
    #[arg(long, value_parser = parse_preset)]
    top: Option<DifficultyPreset>,
    /// Match seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Points needed to win
    #[arg(long, default_value_t = 10)]
    win_score: u32,
    /// Give up after this many simulated seconds
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f32,
}

fn parse_preset(s: &str) -> Result<DifficultyPreset, String> {
    DifficultyPreset::from_str(s).ok_or_else(|| format!("unknown difficulty preset '{s}'"))
}

fn with_preset(config: &ControllerConfig, preset: Option<DifficultyPreset>) -> ControllerConfig {
    match preset {
        Some(preset) => ControllerConfig {
            difficulty: preset.difficulty(),
            ..config.clone()
        },
        None => config.clone(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Rival Paddle proxy match starting (seed {})", cli.seed);

    let base = match &cli.config {
        Some(path) => ControllerConfig::load(path)?,
        None => ControllerConfig::default(),
    };
    let bottom = with_preset(&base, cli.bottom);
    let top = with_preset(&base, cli.top);
    log::info!(
        "Difficulty bottom={:.2} top={:.2}",
        bottom.difficulty,
        top.difficulty
    );

    let arena = ArenaConfig {
        win_score: cli.win_score,
        ..ArenaConfig::default()
    };
    let mut game = ProxyMatch::new(arena, bottom, top, cli.seed)?;

    let mut rallies = 0u32;
    let mut longest = 0u32;
    let mut winner = None;
    while game.time() < cli.max_seconds {
        match game.step(SIM_DT) {
            Some(ArenaEvent::PaddleHit(_)) => rallies += 1,
            Some(ArenaEvent::Scored(_)) => {
                longest = longest.max(rallies);
                rallies = 0;
            }
            Some(ArenaEvent::MatchOver(side)) => {
                longest = longest.max(rallies);
                winner = Some(side);
                break;
            }
            _ => {}
        }
    }

    let score = game.score();
    match winner {
        Some(side) => println!(
            "{} wins {}-{} after {:.1}s (longest rally {})",
            match side {
                Side::Bottom => "Bottom",
                Side::Top => "Top",
            },
            score.bottom,
            score.top,
            game.time(),
            longest
        ),
        None => println!(
            "No winner after {:.1}s: {}-{} (longest rally {})",
            game.time(),
            score.bottom,
            score.top,
            longest
        ),
    }
    Ok(())
}
