/// Cadence Player - terminal playback front-end
use anyhow::Context;
use cadence_audio_local::LocalEngine;
use cadence_cli::{print_events, App, CliConfig};
use cadence_playback::PlaybackController;
use clap::Parser;
use std::path::PathBuf;
use std::thread;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence Player terminal front-end", long_about = None)]
struct Cli {
    /// Audio files to add to the playlist
    files: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short, long, env = "CADENCE_CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Print controller events as JSON lines
    #[arg(long)]
    json_events: bool,

    /// Start playing the first file immediately
    #[arg(long)]
    autoplay: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = CliConfig::load(cli.config.as_deref())?;
    config.validate()?;

    // Initialize tracing; stderr keeps logs apart from command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Cadence Player");
    tracing::debug!(?config, "configuration loaded");

    let engine = LocalEngine::new(config.engine_config());
    let controller = PlaybackController::new(engine, config.playback_config());
    let dispatcher = controller
        .spawn_event_loop()
        .context("failed to start event dispatcher")?;

    let events = controller.subscribe();
    let json = cli.json_events;
    let printer = thread::Builder::new()
        .name("cadence-events".into())
        .spawn(move || print_events(events, json, std::io::stdout()))
        .context("failed to start event printer")?;

    let mut app = App::new(controller, std::io::stdout());
    app.enqueue(&cli.files);
    if cli.autoplay && !cli.files.is_empty() {
        app.execute(cadence_cli::Command::Play(Some(0)))?;
    }

    let stdin = std::io::stdin();
    app.run(stdin.lock())?;

    app.controller().stop();
    drop(app);

    if printer.join().is_err() {
        tracing::error!("event printer panicked");
    }
    if dispatcher.join().is_err() {
        tracing::error!("event dispatcher panicked");
    }

    tracing::info!("Goodbye");
    Ok(())
}
