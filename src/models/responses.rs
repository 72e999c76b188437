use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Keys of a published row that cannot double as a team name
///
/// Opponents are flattened into the same JSON object, so a team with one of
/// these names would emit a duplicate key. The normalizer rejects them.
pub const RESERVED_ROW_KEYS: [&str; 3] = ["team", "strength", "rank"];

/// One team's row of the schedule-adjusted strength matrix
///
/// Opponent deltas are flattened into the row keyed by opponent name, so a
/// serialized row reads `{"team": "A", "B": 0.5, "C": -1, "strength": .., "rank": ..}`.
/// Team names never collide with [`RESERVED_ROW_KEYS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStrengthRow {
    pub team: String,
    #[serde(flatten)]
    pub opponents: BTreeMap<String, f64>,
    pub strength: f64,
    pub rank: i64,
}

/// One team's row of the summed-outcome matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinsRow {
    pub team: String,
    #[serde(flatten)]
    pub opponents: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthMetadata {
    #[serde(rename = "maxWinRate")]
    pub max_win_rate: f64,
    #[serde(rename = "minWinRate")]
    pub min_win_rate: f64,
}

/// Overall strength ranking (mean of schedule-adjusted deltas)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthReport {
    pub teams: Vec<String>,
    pub matrix: Vec<TeamStrengthRow>,
    pub matrix_wins: Vec<WinsRow>,
    pub metadata: StrengthMetadata,
}

/// Schedule strength ranking (sum of schedule-adjusted deltas)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStrengthReport {
    pub teams: Vec<String>,
    pub matrix: Vec<TeamStrengthRow>,
    pub matrix_wins: Vec<WinsRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForAgainstRow {
    pub team: String,
    pub scored_for: f64,
    pub scored_against: f64,
}

/// Points for/against per team with league medians
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForAgainstReport {
    pub rows: Vec<ForAgainstRow>,
    pub median_for: f64,
    pub median_against: f64,
}

/// Root endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_row_flattens_opponents() {
        let row = TeamStrengthRow {
            team: "A".to_string(),
            opponents: BTreeMap::from([("A".to_string(), -1.0), ("B".to_string(), 0.5)]),
            strength: 0.5,
            rank: 1,
        };

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["team"], "A");
        assert_eq!(json["A"], -1.0);
        assert_eq!(json["B"], 0.5);
        assert_eq!(json["rank"], 1);
    }

    #[test]
    fn test_metadata_field_names() {
        let metadata = StrengthMetadata { max_win_rate: 1.5, min_win_rate: 0.0 };
        let json = serde_json::to_value(metadata).unwrap();
        assert_eq!(json["maxWinRate"], 1.5);
        assert_eq!(json["minWinRate"], 0.0);
    }
}
