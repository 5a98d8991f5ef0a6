use std::fs::File;
use std::io::{stdout, BufWriter};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::EnvFilter;

use space_war::config::{Args, GameConfig};
use space_war::display::{enter_terminal, leave_terminal, TerminalBell, TerminalRenderer};
use space_war::game::{self, Game};
use space_war::input::TerminalInput;
use space_war::platform::{Audio, FrameClock, Mute};

/// Trace output goes to a file: the terminal is in raw mode while playing.
fn init_logging(args: &Args) -> anyhow::Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;
    let config = GameConfig::from(&args);

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut out = BufWriter::new(stdout());
    let keyboard_enhanced = enter_terminal(&mut out).context("failed to enter raw mode")?;

    let result = play(&config, rng, keyboard_enhanced);

    // Always restore the terminal
    leave_terminal(&mut out, keyboard_enhanced);

    let stage = result?;
    println!("Game over ({stage}).");
    Ok(())
}

fn play(
    config: &GameConfig,
    rng: StdRng,
    keyboard_enhanced: bool,
) -> anyhow::Result<space_war::stage::Stage> {
    let mut renderer = TerminalRenderer::from_terminal(BufWriter::new(stdout()))?;
    let mut input = TerminalInput::spawn(keyboard_enhanced);
    let mut pacer = FrameClock::new();
    let mut audio: Box<dyn Audio> = if config.mute {
        Box::new(Mute)
    } else {
        Box::new(TerminalBell)
    };

    let mut game = Game::new(config, rng);
    let stage = game::run(
        &mut game,
        config,
        &mut input,
        &mut renderer,
        &mut audio,
        &mut pacer,
    )?;
    Ok(stage)
}
