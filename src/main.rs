use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tokio::sync::mpsc;
use touch_overlay::config::Orientation;
use touch_overlay::controller::ControllerEvent;
use touch_overlay::overlay::{InputOverlay, Initializing, OverlaySession, ScreenSize};
use touch_overlay::persistence::layout_file::TomlLayoutStore;
use touch_overlay::trace::{replay, InputTrace};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Replays a recorded touch and sensor trace through the overlay.
#[derive(Parser, Debug)]
#[command(name = "touch-overlay", version, about)]
struct Args {
    /// Trace file to replay
    trace: PathBuf,

    /// Layout file, defaults to the user config directory
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Overlay width in pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Overlay height in pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;
    let args = Args::parse();

    let store = match &args.layout {
        Some(path) => TomlLayoutStore::open(path.clone()).await,
        None => TomlLayoutStore::open_default().await,
    }
    .map_err(|e| eyre!("Failed to open layout store: {}", e))?;
    info!("Using layout file {}", store.path().display());

    let trace = InputTrace::load(&args.trace)
        .await
        .map_err(|e| eyre!("Failed to load trace {}: {}", args.trace.display(), e))?;

    let (event_sender, event_receiver) = mpsc::unbounded_channel::<ControllerEvent>();
    let logger = tokio::spawn(log_events(event_receiver));

    let screen = ScreenSize::new(args.width, args.height);
    let overlay = InputOverlay::<Initializing>::create(Box::new(store), Box::new(event_sender))
        .initialize(screen, Orientation::from_screen(args.width, args.height));

    let (session, summary) = replay(OverlaySession::from(overlay), &trace);
    info!(
        "Replay finished: {} touch frames, {} redraws, {} sensor samples, {} gamepad samples",
        summary.touch_frames, summary.redraws, summary.sensor_samples, summary.gamepad_samples
    );

    // closes the channel so the logger can finish
    drop(session);
    let emitted = logger
        .await
        .map_err(|e| eyre!("Event logger task failed: {}", e))?;
    info!("{} controller events emitted", emitted);

    Ok(())
}

async fn log_events(mut receiver: mpsc::UnboundedReceiver<ControllerEvent>) -> usize {
    let mut count = 0;
    while let Some(event) = receiver.recv().await {
        count += 1;
        match &event {
            ControllerEvent::Motion { .. } => debug!("{:?}", event),
            _ => info!("{:?}", event),
        }
    }
    count
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
