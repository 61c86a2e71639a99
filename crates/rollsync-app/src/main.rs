mod app;
mod commands;
mod config;
mod fps;
mod session;
mod waker;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use eframe::NativeOptions;
use rollsync_engine::{Playback, TransportState};
use rollsync_pianoroll::{Layout, NoteGenerator, Theme, ViewSync};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::RollSyncApp;
use crate::commands::Command;
use crate::config::AppConfig;
use crate::session::Session;
use crate::waker::ChannelWaker;

#[derive(Debug, Parser)]
#[command(author, version, about = "Piano roll that follows a threaded playback clock")]
struct Cli {
    /// Clock cadence in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,

    /// Song length in ticks
    #[arg(long)]
    song_length: Option<i32>,

    /// Initial playback speed (1-10)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    speed: Option<u32>,

    /// Seed for the generated song
    #[arg(long)]
    seed: Option<u64>,

    /// Stop at the end of the song instead of wrapping
    #[arg(long, default_value_t = false)]
    no_loop: bool,

    /// Only scroll when the cursor leaves the visible window
    #[arg(long, default_value_t = false)]
    no_continuous: bool,

    /// Run without a window for the given number of milliseconds
    #[arg(long, value_name = "MS")]
    headless: Option<u64>,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(period) = self.period_ms {
            config.clock_period_ms = period;
        }
        if let Some(length) = self.song_length {
            config.song_length = length;
        }
        if let Some(speed) = self.speed {
            config.initial_speed = speed;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_loop {
            config.looping = false;
        }
        if self.no_continuous {
            config.continuous_scroll = false;
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let args = Cli::parse();
    let mut config = AppConfig::load();
    args.apply(&mut config);
    config
        .engine_config()
        .validate()
        .context("invalid playback settings")?;

    match args.headless {
        Some(ms) => run_headless(&config, Duration::from_millis(ms)),
        None => run_ui(config),
    }
}

fn run_ui(config: AppConfig) -> anyhow::Result<()> {
    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("RollSync")
            .with_inner_size([config.window_width as f32, config.window_height as f32]),
        ..Default::default()
    };

    eframe::run_native(
        "RollSync",
        native_options,
        Box::new(move |cc| match RollSyncApp::new(cc, &config) {
            Ok(app) => Box::new(app),
            Err(err) => {
                eprintln!("Failed to initialise RollSync: {err:?}");
                std::process::exit(1);
            }
        }),
    )
    .map_err(|err| anyhow!(err.to_string()))
}

/// Play for `duration` with a channel standing in for the UI run queue.
fn run_headless(config: &AppConfig, duration: Duration) -> anyhow::Result<()> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let playback = Playback::from_config(&config.engine_config(), Arc::new(ChannelWaker::new(tx)))
        .context("failed to build playback")?;
    playback.set_speed(config.speed());

    let song = NoteGenerator::seeded(config.seed.unwrap_or_default(), config.song_length).song();
    let mut view = ViewSync::new(song, Theme::classic(), Layout::default());
    view.set_ticks_per_step(config.ticks_per_step);
    view.set_continuous_scroll(config.continuous_scroll);
    let mut session = Session::new(playback, view);

    session
        .handle_command(Command::TogglePlayback)
        .context("failed to start playback")?;
    info!(?duration, speed = config.speed().get(), "headless playback started");

    let deadline = Instant::now() + duration;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(()) => {
                session.sync();
                if session.playback().state() == TransportState::Stopped {
                    info!("song finished");
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("run queue disconnected");
                break;
            }
        }
    }

    let last_tick = session.view().current_highlighted_tick();
    session.handle_command(Command::Stop)?;
    info!(
        last_tick,
        refreshes = session.refreshes(),
        "headless playback finished"
    );
    session.shutdown();
    Ok(())
}
