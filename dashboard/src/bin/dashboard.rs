//! RushRadar console front end
//!
//! Runs the dashboard against a live backend and prints the board after
//! every selection. Each line read from stdin acts as a click:
//!
//! - a horizon id (`15min`, `1hr`, `2hr`, `3hr`, `nextday`, `weekly`, `monthly`)
//!   selects that horizon
//! - `theme` toggles between light and dark
//! - `quit` exits once in-flight selections finish
//!
//! # Usage
//!
//! ```bash
//! RUSHRADAR_API_URL=http://127.0.0.1:5000 cargo run --bin rushradar
//! cargo run --bin rushradar -- path/to/rushradar.toml
//! ```
//!
//! # Environment Variables
//!
//! - `RUSHRADAR_API_URL`: backend base URL (default: http://127.0.0.1:5000)
//! - `RUSHRADAR_TIMEOUT_SECS`: per-request timeout (default: 10)
//! - `RUSHRADAR_DEFAULT_HORIZON`: horizon loaded at startup (default: 15min)
//! - `RUSHRADAR_THEME_FILE`: where the theme preference is stored
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use rushradar::client::{HttpDirectionsApi, HttpTrafficApi};
use rushradar::surfaces::memory::MemorySurfaces;
use rushradar::{
    BackendClient, DashboardConfig, DashboardOrchestrator, Presenters, SelectionOutcome,
    ThemeStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the board stays readable on stdout
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting RushRadar dashboard");

    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = DashboardConfig::load(config_path.as_deref())?;
    info!(
        api = %config.backend.api_base_url,
        timeout_secs = config.backend.request_timeout_secs,
        "Configuration loaded"
    );

    let timeout = config.request_timeout();
    let api = HttpTrafficApi::new(config.backend.api_base_url.clone(), timeout)?;
    let directions = HttpDirectionsApi::new(config.map.directions_base_url.clone(), timeout)?;
    let client = BackendClient::new(Arc::new(api)).with_timeout(timeout);

    let surfaces = MemorySurfaces::new();
    let presenters =
        Presenters::in_memory(&surfaces).with_peak_hours(config.dashboard.peak_hours.clone());
    let orchestrator = Arc::new(
        DashboardOrchestrator::builder(client, presenters)
            .directions(Arc::new(directions))
            .default_horizon(config.dashboard.default_horizon.clone())
            .build()?,
    );

    let themes = ThemeStore::new(config.dashboard.theme_file.clone());
    orchestrator.apply_theme(themes.load());

    let startup = orchestrator.initialize().await?;
    report(&orchestrator.current_horizon_id(), &startup, &surfaces);

    let horizon_ids: Vec<String> = orchestrator
        .catalog()
        .iter()
        .map(|h| h.id.clone())
        .collect();
    println!("Horizons: {} | theme | quit", horizon_ids.join(", "));

    let mut pending: Vec<JoinHandle<()>> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {}
            "quit" | "exit" => break,
            "theme" => match themes.toggle() {
                Ok(theme) => {
                    orchestrator.apply_theme(theme);
                    println!("{}", surfaces.snapshot());
                }
                Err(e) => warn!("Failed to toggle theme: {}", e),
            },
            id if orchestrator.catalog().contains(id) => {
                let orchestrator = Arc::clone(&orchestrator);
                let surfaces = surfaces.clone();
                let id = id.to_string();
                pending.push(tokio::spawn(async move {
                    match orchestrator.on_selection_changed(&id).await {
                        Ok(outcome) => report(&id, &outcome, &surfaces),
                        Err(e) => warn!("Selection of {} failed: {}", id, e),
                    }
                }));
            }
            other => println!(
                "Unknown command '{}'. Horizons: {} | theme | quit",
                other,
                horizon_ids.join(", ")
            ),
        }
        pending.retain(|handle| !handle.is_finished());
    }

    for result in futures::future::join_all(pending).await {
        if let Err(e) = result {
            warn!("Selection task failed: {}", e);
        }
    }

    info!("RushRadar dashboard stopped");
    Ok(())
}

fn report(horizon_id: &str, outcome: &SelectionOutcome, surfaces: &MemorySurfaces) {
    match outcome {
        SelectionOutcome::Superseded { generation, current } => {
            info!(
                horizon = horizon_id,
                generation = %generation,
                current = %current,
                "Result superseded by a newer selection"
            );
        }
        SelectionOutcome::Failed(err) => {
            warn!(horizon = horizon_id, "{}", err);
            println!("{}", surfaces.snapshot());
        }
        SelectionOutcome::Rendered => println!("{}", surfaces.snapshot()),
    }
}
