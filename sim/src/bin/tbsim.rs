use std::fs;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use tilebrawl::{DEMO_ASSETS, Game, GameConfig};
use tilebrawl_sim::{InputScript, InputSource, SimDevice, run_frames};
use tracing::{Level, info, warn};
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "tbsim")]
#[command(version, about = "Run tilebrawl headless on the simulated console", long_about = None)]
struct Cli {
    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Input script such as "0-29:RIGHT,30:A+UP", or @path to read one from a file
    #[arg(short, long, conflicts_with = "mash")]
    script: Option<String>,

    /// Press random buttons, seeded with this value
    #[arg(long)]
    mash: Option<u64>,

    /// Pacing delay after each frame, in loop units
    #[arg(long)]
    frame_delay: Option<u32>,

    /// Starting health of both fighters
    #[arg(long)]
    health: Option<u8>,

    #[arg(long, default_value = "warn")]
    log_level: Level,
}

fn setup_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .compact()
        .finish()
        .init();
}

fn input_source(cli: &Cli) -> Result<InputSource> {
    if let Some(seed) = cli.mash {
        return Ok(InputSource::mash(seed));
    }
    let Some(script) = &cli.script else {
        return Ok(InputSource::Idle);
    };

    let text = match script.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading script {path}"))?,
        None => script.clone(),
    };
    let script: InputScript = text.parse().context("parsing input script")?;
    if let Some(last) = script.last_frame() {
        if last >= cli.frames {
            warn!("script runs to frame {last}, only {} simulated", cli.frames);
        }
    }
    Ok(InputSource::Script(script))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level);

    let mut config = GameConfig::default();
    if let Some(delay) = cli.frame_delay {
        config.frame_delay = delay;
    }
    if let Some(health) = cli.health {
        ensure!(health > 0, "--health must be at least 1");
        config.starting_health = health;
    }

    let mut device = SimDevice::new(input_source(&cli)?);
    let mut game = Game::new(&DEMO_ASSETS, config);
    game.setup(&mut device);
    info!("running {} frames", cli.frames);

    let summary = run_frames(&mut game, &mut device, cli.frames);
    println!("{summary}");

    if summary.stats.tearing > 0 || summary.stats.double_flushes > 0 {
        warn!("sprite table was not flushed exactly once per vblank");
    }
    Ok(())
}
