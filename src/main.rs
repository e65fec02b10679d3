use std::fs::File;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use grid_snake::config::{config_path, load_config_from_path};
use grid_snake::game::Engine;
use grid_snake::events::Snapshot;
use grid_snake::input::{poll_input, GameInput, HostEvent};
use grid_snake::scheduler::DeadlineScheduler;
use grid_snake::terminal_runtime::{restore_terminal, TerminalSession, TerminalSink};
use tracing_subscriber::EnvFilter;

/// Upper bound on one input wait so the loop stays responsive while paused.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(name = "grid-snake", version, about = "Grid Snake in the terminal")]
struct Cli {
    /// Config file (JSON). Defaults to the platform config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file. The terminal itself is never logged to.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let path = cli.config.clone().unwrap_or_else(config_path);
    let config = load_config_from_path(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    tracing::info!(?config, seed, "starting");

    install_panic_hook();
    let mut session = TerminalSession::enter().context("failed to initialize terminal")?;

    let mut engine = Engine::with_seed(config, DeadlineScheduler::new(), TerminalSink::new(), seed);
    run(&mut session, &mut engine)?;

    match serde_json::to_string(&engine.snapshot()) {
        Ok(state) => tracing::info!(score = engine.score(), %state, "exiting"),
        Err(error) => tracing::warn!(%error, "failed to encode final state"),
    }
    Ok(())
}

fn run(
    session: &mut TerminalSession,
    engine: &mut Engine<DeadlineScheduler, TerminalSink>,
) -> anyhow::Result<()> {
    let mut last_frame: Option<Snapshot> = None;

    loop {
        if let Some(snapshot) = engine.sink_mut().take_frame() {
            session.draw(&snapshot).context("failed to draw frame")?;
            last_frame = Some(snapshot);
        }
        engine.sink_mut().flush_sound();

        let timeout = engine
            .scheduler()
            .time_until_due(Instant::now())
            .map_or(IDLE_POLL_INTERVAL, |remaining| remaining.min(IDLE_POLL_INTERVAL));

        match poll_input(timeout).context("failed to read input")? {
            Some(HostEvent::Input(GameInput::Quit)) => return Ok(()),
            Some(HostEvent::Input(input)) => engine.apply_input(input),
            Some(HostEvent::Resize) => {
                if let Some(snapshot) = &last_frame {
                    session.draw(snapshot).context("failed to redraw frame")?;
                }
            }
            None => {}
        }

        if engine.scheduler().is_due(Instant::now()) {
            let outcome = engine.tick();
            tracing::trace!(?outcome, "tick");
        }
    }
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grid_snake=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}
