use std::collections::BTreeMap;

use crate::core::matrix::SENTINEL;
use crate::models::{CanonicalMatch, ForAgainstReport, ForAgainstRow};

/// Points scored for and against each team, with league medians
///
/// Groups the canonical list by `team_a`, so each team's totals cover both
/// orientations of every match it played. Rows come out sorted by team.
pub fn compute_for_against(matches: &[CanonicalMatch]) -> ForAgainstReport {
    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for m in matches {
        let entry = totals.entry(m.team_a.as_str()).or_insert((0.0, 0.0));
        entry.0 += m.score_a;
        entry.1 += m.score_b;
    }

    let rows: Vec<ForAgainstRow> = totals
        .into_iter()
        .map(|(team, (scored_for, scored_against))| ForAgainstRow {
            team: team.to_string(),
            scored_for,
            scored_against,
        })
        .collect();

    let scored_for: Vec<f64> = rows.iter().map(|row| row.scored_for).collect();
    let scored_against: Vec<f64> = rows.iter().map(|row| row.scored_against).collect();

    ForAgainstReport {
        median_for: median(&scored_for).unwrap_or(SENTINEL),
        median_against: median(&scored_against).unwrap_or(SENTINEL),
        rows,
    }
}

/// Standard median: the middle value, or the mean of the two middle values
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[17.0, 13.0, 14.0]), Some(14.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_totals_cover_both_orientations() {
        let matches = vec![
            CanonicalMatch::new(1, "A", 10.0, "B", 8.0),
            CanonicalMatch::new(1, "B", 8.0, "A", 10.0),
        ];

        let report = compute_for_against(&matches);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].team, "A");
        assert_eq!(report.rows[0].scored_for, 10.0);
        assert_eq!(report.rows[0].scored_against, 8.0);
        assert_eq!(report.median_for, 9.0);
    }

    #[test]
    fn test_empty_league_uses_sentinel_medians() {
        let report = compute_for_against(&[]);
        assert!(report.rows.is_empty());
        assert_eq!(report.median_for, SENTINEL);
        assert_eq!(report.median_against, SENTINEL);
    }
}
