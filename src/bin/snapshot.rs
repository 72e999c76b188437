//! Snapshot the current league reports as static JSON files
//!
//! Run before deployment or from cron to refresh the static data:
//!
//! ```text
//! cargo run --bin snapshot [output-dir]
//! ```
//!
//! The output directory defaults to `snapshot.dir` from the configuration.

use league_strength::config::Settings;
use league_strength::core::{normalize, StrengthEngine};
use league_strength::services::{write_snapshot, SnapshotError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .with_target(false)
        .init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&settings.snapshot.dir));

    info!("DATA SNAPSHOT: starting, output directory {}", dir.display());

    match run(&settings, &dir).await {
        Ok(()) => {
            info!("DATA SNAPSHOT: complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("DATA SNAPSHOT FAILED: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &Settings, dir: &std::path::Path) -> Result<(), SnapshotError> {
    let feed = settings.feed.build_source()?;

    let rows = feed.fetch_rows().await?;
    let matches = normalize(&rows)?;
    let engine = StrengthEngine::new((&settings.engine).into());

    let metadata = write_snapshot(dir, &matches, &engine)?;
    info!(
        "Saved {} matches at {}",
        metadata.match_count,
        metadata.snapshot_time.to_rfc3339()
    );
    Ok(())
}
