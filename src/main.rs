//! Lane Runner entry point
//!
//! Starts the sensor poller on the runtime's worker threads and drives the
//! simulation loop from the main task until a collision or Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use lane_runner::net::CoapClient;
use lane_runner::renderer::{Frontend, HeadlessFrontend, TextFrontend};
use lane_runner::sim::{GameState, RunOutcome, SimulationLoop};
use lane_runner::{ControlSlot, Poller, Settings, input};

#[derive(Parser, Debug)]
#[command(name = "lane-runner", about = "Dodge falling obstacles, steered by a CoAP sensor")]
struct Opts {
    /// JSON settings file (flags below override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings to this file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Sensor host
    #[arg(long)]
    host: Option<String>,

    /// Sensor CoAP port
    #[arg(long)]
    port: Option<u16>,

    /// Resource path on the sensor
    #[arg(long)]
    resource: Option<String>,

    /// Seconds between polls
    #[arg(long)]
    poll_interval: Option<f64>,

    /// Readings below this move left
    #[arg(long, allow_hyphen_values = true)]
    low: Option<i64>,

    /// Readings above this move right
    #[arg(long, allow_hyphen_values = true)]
    high: Option<i64>,

    /// RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Also steer with movement words on stdin (a/left, d/right)
    #[arg(long)]
    keyboard: bool,

    /// Log progress instead of drawing the board
    #[arg(long)]
    headless: bool,
}

impl Opts {
    fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(resource) = &self.resource {
            settings.resource_path = resource.clone();
        }
        if let Some(secs) = self.poll_interval {
            settings.poll_interval_secs = secs;
        }
        if let Some(low) = self.low {
            settings.low_threshold = low;
        }
        if let Some(high) = self.high {
            settings.high_threshold = high;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        settings.keyboard |= self.keyboard;
        settings.headless |= self.headless;
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = Opts::parse();
    let mut settings = match &opts.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    opts.apply(&mut settings);
    settings.validate().context("invalid settings")?;

    if let Some(path) = &opts.save_config {
        settings.save(path)?;
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let outcome = runtime.block_on(run(settings));

    // Abandon anything still in flight (stdin reads, pending requests)
    runtime.shutdown_background();

    let snapshot = outcome.snapshot();
    match &outcome {
        RunOutcome::Collided(_) => log::info!(
            "Collision! Final level {} after {} rounds",
            snapshot.level,
            snapshot.round_count
        ),
        RunOutcome::Cancelled(_) => log::info!("Stopped at level {}", snapshot.level),
    }
    Ok(())
}

async fn run(settings: Settings) -> RunOutcome {
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Lane Runner starting (seed {})", seed);

    let cancel = CancellationToken::new();
    let slot = Arc::new(ControlSlot::new());

    let client = CoapClient::new(settings.endpoint(), settings.request_timeout());
    let poller = Poller::new(
        client,
        Arc::clone(&slot),
        settings.thresholds(),
        settings.poll_interval(),
    );
    let poller_task = tokio::spawn(poller.run(cancel.clone()));

    if settings.keyboard {
        tokio::spawn(input::forward_stdin(Arc::clone(&slot), cancel.clone()));
    }

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::info!("Shutdown requested");
                cancel.cancel();
            }
        });
    }

    let state = GameState::new(seed);
    let outcome = if settings.headless {
        play(state, slot, HeadlessFrontend::default(), &settings, &cancel).await
    } else {
        play(state, slot, TextFrontend::stdout(), &settings, &cancel).await
    };

    // Stop polling whichever way the game ended
    cancel.cancel();
    if let Err(e) = poller_task.await {
        log::warn!("Poller task failed: {}", e);
    }
    outcome
}

async fn play<F: Frontend>(
    state: GameState,
    slot: Arc<ControlSlot>,
    frontend: F,
    settings: &Settings,
    cancel: &CancellationToken,
) -> RunOutcome {
    let mut sim = SimulationLoop::new(state, slot, frontend).with_tick_interval(settings.tick_interval());
    sim.run(cancel.clone()).await
}
