//! mBreak headless runner
//!
//! Plays a seeded match between two scripted paddles and logs what happened.
//! Useful for balancing tuning files and for checking determinism by
//! comparing runs with the same seed.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use mbreak::consts::FRAME_MS;
use mbreak::sim::{GameEvent, PaddleInput, PlayerSide, TickInput, World, level, tick};
use mbreak::{QualityPreset, Settings, Tuning};

/// Paddles stop chasing once the ball is this close to their center
const TRACKING_DEAD_ZONE: f32 = 4.0;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a headless mBreak match", long_about = None)]
struct Args {
    /// RNG seed; equal seeds replay identical matches
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// Ticks to simulate (60 per second)
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// Balls served per player at the start
    #[arg(long, default_value_t = 1)]
    balls: u32,
    /// Drop a random power-up every N ticks, 0 disables
    #[arg(long, default_value_t = 600)]
    power_up_interval: u64,
    /// Quality preset (low, medium, high)
    #[arg(long)]
    quality: Option<String>,
    /// JSON tuning table overriding the default balance
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// JSON settings (player names and colors, presentation)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Knock out every block of one player before the first tick
    #[arg(long, value_enum)]
    wipe: Option<Wipe>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Wipe {
    Left,
    Right,
}

impl From<Wipe> for PlayerSide {
    fn from(wipe: Wipe) -> Self {
        match wipe {
            Wipe::Left => PlayerSide::Left,
            Wipe::Right => PlayerSide::Right,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            Settings::from_json(&json).context("parsing settings")?
        }
        None => Settings::default(),
    };
    if let Some(quality) = &args.quality {
        let Some(preset) = QualityPreset::parse(quality) else {
            bail!("unknown quality preset `{quality}` (expected low, medium or high)");
        };
        settings.quality = preset;
    }

    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    log::info!(
        "mBreak: {} vs {}, seed {}, {} ticks, quality {}",
        settings.player_left.name,
        settings.player_right.name,
        args.seed,
        args.ticks,
        settings.quality.as_str()
    );

    let mut world = World::new(args.seed, &settings, tuning);
    level::build(&mut world);
    for _ in 0..args.balls {
        for side in [PlayerSide::Left, PlayerSide::Right] {
            world
                .serve_ball(side)
                .with_context(|| format!("no paddle to serve from for {side:?}"))?;
        }
    }

    if let Some(wipe) = args.wipe {
        let side = PlayerSide::from(wipe);
        let count = world.destroy_blocks_of(side);
        log::info!("Wiped {count} blocks of {}", world.player(side).name);
    }

    let mut tally: BTreeMap<&'static str, u64> = BTreeMap::new();
    for t in 0..args.ticks {
        if args.power_up_interval > 0 && t > 0 && t % args.power_up_interval == 0 {
            world.spawn_random_power_up();
        }

        let input = TickInput {
            left: track_nearest_ball(&world, PlayerSide::Left),
            right: track_nearest_ball(&world, PlayerSide::Right),
        };
        tick(&mut world, &input, FRAME_MS);

        for event in world.drain_events() {
            *tally.entry(event_name(&event)).or_default() += 1;
        }
    }

    for (name, count) in &tally {
        log::info!("{name}: {count}");
    }
    for side in [PlayerSide::Left, PlayerSide::Right] {
        log::info!(
            "{} has {} blocks and {} balls left",
            world.player(side).name,
            world.blocks_owned_by(side).count(),
            world.balls_owned_by(side).count()
        );
    }
    log::info!(
        "Finished after {} ticks with {} particles alive",
        world.time_ticks,
        world.particles.len()
    );

    Ok(())
}

/// Steer a paddle toward the ball closest to it horizontally
fn track_nearest_ball(world: &World, side: PlayerSide) -> PaddleInput {
    let Some(paddle) = world.paddles.iter().find(|p| p.owner == side) else {
        return PaddleInput::default();
    };
    let paddle_x = paddle.rect.center_x() as f32;
    let paddle_y = paddle.rect.center_y() as f32;

    let target = world
        .balls
        .iter()
        .map(|ball| ball.rect.center())
        .min_by(|a, b| {
            let da = (a.x - paddle_x).abs();
            let db = (b.x - paddle_x).abs();
            da.total_cmp(&db)
        });

    match target {
        Some(ball) if ball.y < paddle_y - TRACKING_DEAD_ZONE => PaddleInput {
            up: true,
            down: false,
        },
        Some(ball) if ball.y > paddle_y + TRACKING_DEAD_ZONE => PaddleInput {
            up: false,
            down: true,
        },
        _ => PaddleInput::default(),
    }
}

fn event_name(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::BallSpawned { .. } => "balls spawned",
        GameEvent::BallDestroyed { .. } => "balls destroyed",
        GameEvent::BallHitWall { .. } => "wall hits",
        GameEvent::BallHitPaddle { .. } => "paddle hits",
        GameEvent::BallHitBall { .. } => "ball hits",
        GameEvent::BallHitBlock { .. } => "block hits",
        GameEvent::BlockHalfHealth { .. } => "blocks cracked",
        GameEvent::BlockDestroyed { .. } => "blocks destroyed",
        GameEvent::PowerUpCollected { .. } => "power-ups collected",
        GameEvent::EffectExpired { .. } => "effects expired",
        GameEvent::Sound(_) => "sounds",
    }
}
