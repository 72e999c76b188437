use crate::core::{compute_for_against, EngineError, StrengthEngine};
use crate::models::CanonicalMatch;
use crate::services::feed::FeedError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

pub const STRENGTH_FILE: &str = "strength.json";
pub const SCHEDULE_STRENGTH_FILE: &str = "schedule_strength.json";
pub const FOR_AGAINST_FILE: &str = "for_against.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Errors that can occur while writing a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFiles {
    pub strength: String,
    pub schedule_strength: String,
    pub for_against: String,
}

/// Written next to the snapshot files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub snapshot_time: chrono::DateTime<chrono::Utc>,
    pub match_count: usize,
    pub files: SnapshotFiles,
}

/// Compute every report and write them as pretty JSON into `dir`
///
/// An empty match list is refused so a broken feed never overwrites a good
/// snapshot.
pub fn write_snapshot(
    dir: &Path,
    matches: &[CanonicalMatch],
    engine: &StrengthEngine,
) -> Result<SnapshotMetadata, SnapshotError> {
    if matches.is_empty() {
        return Err(EngineError::EmptyInput.into());
    }

    std::fs::create_dir_all(dir)?;

    let strength = engine.compute_strength(matches)?;
    write_json(&dir.join(STRENGTH_FILE), &strength)?;

    let schedule = engine.compute_schedule_strength(matches)?;
    write_json(&dir.join(SCHEDULE_STRENGTH_FILE), &schedule)?;

    let for_against = compute_for_against(matches);
    write_json(&dir.join(FOR_AGAINST_FILE), &for_against)?;

    let metadata = SnapshotMetadata {
        snapshot_time: chrono::Utc::now(),
        match_count: matches.len() / 2,
        files: SnapshotFiles {
            strength: STRENGTH_FILE.to_string(),
            schedule_strength: SCHEDULE_STRENGTH_FILE.to_string(),
            for_against: FOR_AGAINST_FILE.to_string(),
        },
    };
    write_json(&dir.join(METADATA_FILE), &metadata)?;

    tracing::info!(
        "Snapshot written to {} ({} matches, {} teams)",
        dir.display(),
        metadata.match_count,
        strength.teams.len()
    );

    Ok(metadata)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SnapshotError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    tracing::debug!("Saved {}", path.display());
    Ok(())
}
