//! BoxSync agent: keeps a local model of the device's container tree in sync.
//!
//! Loads configuration, initializes logging, wires the store, transport,
//! sync controller, and event bridge together, and runs until shutdown.

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc, watch};
use tracing_subscriber::{EnvFilter, fmt};

use boxsync_cache::StoreManager;
use boxsync_core::AppError;
use boxsync_core::config::AppConfig;
use boxsync_core::traits::reporter::LogReporter;
use boxsync_realtime::{BridgeInput, EventBridge};
use boxsync_service::{AccessTracker, ContainerEvent, SyncController};
use boxsync_transport::HttpContainerRemote;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "boxsync-agent", version, about = "Container tree sync agent")]
struct Args {
    /// Directory holding default.toml and the environment overlays.
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// Environment overlay to load ({config_dir}/{env}.toml).
    #[arg(long, env = "BOXSYNC_ENV", default_value = "development")]
    env: String,

    /// Read push frames (one JSON message per line) from stdin.
    #[arg(long)]
    push_stdin: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match AppConfig::load(&args.config_dir, &args.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, args.push_stdin).await {
        tracing::error!("Agent error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let logging = &config.logging;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.is_json() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(logging.target)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .pretty()
            .with_env_filter(filter)
            .with_target(logging.target)
            .with_ansi(logging.ansi)
            .init();
    }
}

async fn run(config: AppConfig, push_stdin: bool) -> Result<(), AppError> {
    tracing::info!("Starting BoxSync agent v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Initializing access store (provider: {})...", config.store.provider);
    let store = Arc::new(StoreManager::new(&config.store).await?);
    let access = Arc::new(AccessTracker::new(store, config.store.key.clone()));

    let remote = Arc::new(HttpContainerRemote::new(&config.remote)?);
    tracing::info!("Device endpoint: {}", remote.base_url());

    let controller = SyncController::builder(remote, access)
        .sync_config(config.sync.clone())
        .well_known(config.well_known.clone())
        .reporter(Arc::new(LogReporter))
        .build();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (input_tx, input_rx) = mpsc::channel::<BridgeInput>(64);

    let bridge = EventBridge::new(controller.clone());
    let bridge_handle = tokio::spawn({
        let cancel = shutdown_rx.clone();
        async move { bridge.run(input_rx, cancel).await }
    });

    tokio::spawn(log_events(controller.subscribe()));

    if push_stdin {
        tokio::spawn(read_push_frames(input_tx.clone()));
    }

    controller.start().await;
    tracing::info!("Loaded {} containers", controller.containers().len());

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping...");

    let _ = shutdown_tx.send(true);
    controller.shutdown();
    drop(input_tx);
    if let Err(e) = bridge_handle.await {
        tracing::warn!("Event bridge ended abnormally: {e}");
    }

    tracing::info!("BoxSync agent stopped");
    Ok(())
}

/// Forward stdin lines to the event bridge as push frames.
async fn read_push_frames(tx: mpsc::Sender<BridgeInput>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => {
                if tx.send(BridgeInput::Frame(line)).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Failed to read push frame from stdin: {e}");
                break;
            }
        }
    }
}

/// Log every container event at info level.
async fn log_events(mut events: broadcast::Receiver<ContainerEvent>) {
    loop {
        match events.recv().await {
            Ok(ContainerEvent::LockFailed { id, message }) => {
                tracing::warn!(container_id = %id, "{message}");
            }
            Ok(event) => tracing::info!(event = event.name(), "Container event"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Container event log lagging");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
