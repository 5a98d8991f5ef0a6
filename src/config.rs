/// Command-line options and the runtime configuration they produce.

use std::path::PathBuf;

use clap::Parser;

use crate::collision::CollisionMode;

pub const DEFAULT_FPS: u32 = 60;

#[derive(Parser, Debug)]
#[command(name = "space_war")]
#[command(about = "Single-screen terminal shooter: clear the formation before it wears down your shield")]
pub struct Args {
    /// Target simulation/render rate in frames per second
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: u32,

    /// Hit testing: `mask` (pixel-accurate) or `bbox` (footprint overlap)
    #[arg(long, default_value = "mask")]
    pub collision: CollisionMode,

    /// Seed for the bomb-drop RNG; omit for a random game
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable the terminal bell
    #[arg(long)]
    pub mute: bool,

    /// Write trace output here (the terminal itself is in raw mode)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub fps: u32,
    pub collision: CollisionMode,
    pub seed: Option<u64>,
    pub mute: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            fps: DEFAULT_FPS,
            collision: CollisionMode::Mask,
            seed: None,
            mute: false,
        }
    }
}

impl From<&Args> for GameConfig {
    fn from(args: &Args) -> Self {
        GameConfig {
            fps: args.fps.max(1),
            collision: args.collision,
            seed: args.seed,
            mute: args.mute,
        }
    }
}
