//! Headless runner: plays a session at a fixed timestep and reports the run.
//!
//! Usage:
//!   runner-sim --ticks 3600 --autopilot
//!   RUST_LOG=debug runner-sim --seed 42 --tuning tuning.json --jitter 2.0

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use endless_runner::Tuning;
use endless_runner::consts::SIM_DT;
use endless_runner::sim::{GameEvent, GameSession, PointerAccumulator, TickInput, tick};

#[derive(Parser, Debug)]
#[command(name = "runner-sim")]
#[command(about = "Run the endless runner simulation without a renderer")]
struct Args {
    /// Track seed (overrides the tuning file)
    #[arg(long)]
    seed: Option<u32>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = SIM_DT)]
    dt: f32,

    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Let the autopilot play
    #[arg(long)]
    autopilot: bool,

    /// Max pointer noise per tick (seeded, reproducible)
    #[arg(long, default_value_t = 0.0)]
    jitter: f32,

    /// Keep ticking after game over instead of stopping
    #[arg(long)]
    keep_going: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !(args.dt.is_finite() && args.dt > 0.0) {
        bail!("--dt must be a positive number of seconds, got {}", args.dt);
    }

    let mut tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    if let Some(seed) = args.seed {
        tuning.seed = seed;
    }

    let mut jitter_rng = Pcg32::seed_from_u64(u64::from(tuning.seed));
    let mut pointer = PointerAccumulator::default();
    let mut session = GameSession::new(tuning);

    let mut obstacle_hits = 0u32;
    let mut wall_ticks = 0u64;
    for _ in 0..args.ticks {
        if args.jitter > 0.0 {
            pointer.add(jitter_rng.random_range(-args.jitter..=args.jitter));
        }
        let input = TickInput {
            pointer_dx: pointer.take(),
            autopilot: args.autopilot,
            ..Default::default()
        };

        let events = tick(&mut session, &input, args.dt);
        if events
            .iter()
            .any(|e| matches!(e, GameEvent::WallContact { .. }))
        {
            wall_ticks += 1;
        }
        for event in &events {
            match event {
                GameEvent::ObstacleHit { block_index, kind } => {
                    obstacle_hits += 1;
                    log::info!("Tick {}: hit {:?} on block {}", session.ticks, kind, block_index);
                }
                GameEvent::CoinCollected { .. } => {
                    log::debug!("Tick {}: coin ({} total)", session.ticks, session.coins);
                }
                GameEvent::GameOver => {
                    log::warn!("Game over at tick {}", session.ticks);
                }
                GameEvent::Restarted | GameEvent::WallContact { .. } => {}
            }
        }

        if session.is_game_over() && !args.keep_going {
            break;
        }
    }

    let pos = session.player.pos;
    log::info!(
        "Run finished: {} ticks, {:.1}s, speed {:.2}x",
        session.ticks,
        session.game_time,
        session.game_speed
    );
    println!("=== RUN SUMMARY ===");
    println!("  Seed:          {}", session.tuning.seed);
    println!("  Ticks:         {}", session.ticks);
    println!("  Game time:     {:.2}s", session.game_time);
    println!("  Game speed:    {:.2}x", session.game_speed);
    println!("  Phase:         {:?}", session.phase);
    println!("  HP:            {}", session.hp);
    println!("  Coins:         {}", session.coins);
    println!("  Obstacle hits: {}", obstacle_hits);
    println!("  Wall ticks:    {}", wall_ticks);
    println!(
        "  Block:         {}",
        session
            .player_block
            .map_or_else(|| "off track".to_string(), |b| b.to_string())
    );
    println!(
        "  Position:      ({:.2}, {:.2}, {:.2}) heading {:.0}",
        pos.x, pos.y, pos.z, session.player.yaw
    );
    println!("  Live blocks:   {}", session.window.len());

    Ok(())
}
