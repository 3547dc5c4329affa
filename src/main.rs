//! Headless runner (default binary).
//!
//! Drives a session the way a front end would, without a terminal: a virtual
//! clock issues `move_down` every `speed_ms`, and a seeded random player issues
//! at most one move or rotation per frame. Nothing sleeps; the run is as fast
//! as the engine.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use blockfall::core::{GameConfig, GameState, RandomSource};
use blockfall::types::{GameCommand, DEFAULT_COLS, DEFAULT_ROWS};

/// Virtual frame length in milliseconds (~60 FPS)
const FRAME_MS: u32 = 16;

#[derive(Debug, Parser)]
#[command(name = "blockfall", about = "Play a headless falling-block session")]
struct Args {
    /// Board height
    #[arg(long, default_value_t = DEFAULT_ROWS)]
    rows: usize,

    /// Board width
    #[arg(long, default_value_t = DEFAULT_COLS)]
    cols: usize,

    /// Seed for piece selection and the player; entropy when omitted
    #[arg(long)]
    seed: Option<u32>,

    /// Stop after this many frames even if the game is still running
    #[arg(long, default_value_t = 200_000)]
    frames: u64,

    /// Print the final grid
    #[arg(long)]
    print: bool,
}

#[derive(Debug, Default)]
struct RunSummary {
    frames: u64,
    locks: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = GameConfig::new(args.rows, args.cols);
    let mut game = match args.seed {
        Some(seed) => GameState::with_seed(config, seed),
        None => GameState::new(config),
    }
    .with_context(|| format!("cannot start a {}x{} session", args.rows, args.cols))?;

    let player_seed = args.seed.map_or_else(rand::random, u64::from);
    let mut player = StdRng::seed_from_u64(player_seed);

    let summary = run(&mut game, &mut player, args.frames);

    info!(
        "finished after {} frames, {} locks: score={} lines={} level={} game_over={}",
        summary.frames,
        summary.locks,
        game.score(),
        game.lines(),
        game.level(),
        game.game_over()
    );

    if args.print {
        print_grid(&game.grid());
    }

    Ok(())
}

fn run<R: RandomSource>(game: &mut GameState<R>, player: &mut StdRng, frames: u64) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut fall_timer_ms: u32 = 0;

    while summary.frames < frames && !game.game_over() {
        summary.frames += 1;

        let command = match player.gen_range(0..6) {
            0 => Some(GameCommand::MoveLeft),
            1 => Some(GameCommand::MoveRight),
            2 => Some(GameCommand::Rotate),
            _ => None,
        };
        if let Some(command) = command {
            game.apply_command(command);
        }

        fall_timer_ms += FRAME_MS;
        if fall_timer_ms >= game.speed_ms() {
            fall_timer_ms = 0;
            game.apply_command(GameCommand::MoveDown);
        }

        if let Some(event) = game.take_last_event() {
            summary.locks += 1;
            debug!(
                "lock #{}: {:?} cleared {} (+{})",
                summary.locks, event.kind, event.lines_cleared, event.score_delta
            );
        }
    }

    summary
}

fn print_grid(grid: &[Vec<u8>]) {
    for row in grid {
        let line: String = row
            .iter()
            .map(|&v| match v {
                0 => '.',
                v => char::from(b'0' + v),
            })
            .collect();
        println!("{line}");
    }
}
