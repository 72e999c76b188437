use std::collections::HashMap;

use crate::core::aggregator::aggregate_outcomes;
use crate::core::error::EngineError;
use crate::core::matrix::{PairwiseMatrix, SENTINEL};
use crate::core::outcome::{round_rate, Outcome};
use crate::models::{
    CanonicalMatch, ScheduleStrengthReport, StrengthMetadata, StrengthReport, TeamStrengthRow,
};

/// Rank published for a team whose strength is undefined
pub const UNRANKED: i64 = -1;

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Reject feeds where one MatchId covers more than one match
    pub strict_match_ids: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict_match_ids: true,
        }
    }
}

/// How a team's row of schedule-adjusted deltas collapses into one score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthReducer {
    /// Overall strength: mean of the defined deltas
    Mean,
    /// Schedule strength: sum of the defined deltas
    Sum,
}

impl StrengthReducer {
    fn reduce(self, values: &[f64]) -> Option<f64> {
        match self {
            StrengthReducer::Mean if values.is_empty() => None,
            StrengthReducer::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
            StrengthReducer::Sum => Some(values.iter().sum()),
        }
    }
}

/// "Who scored what in this match", one record per canonical match side
#[derive(Debug, Clone, Copy)]
struct AltRecord<'a> {
    alt_team: &'a str,
    alt_score: f64,
}

/// Per (team, alt team) mean outcome of the team's score against every other
/// side recorded under the same MatchId, rounded to two decimals
///
/// Self comparisons are dropped from the join.
pub(crate) fn alt_win_rates(
    matches: &[CanonicalMatch],
    options: EngineOptions,
) -> Result<PairwiseMatrix, EngineError> {
    // Alt view keyed by MatchId, in canonical order
    let mut alt_view: HashMap<i64, Vec<AltRecord<'_>>> = HashMap::new();
    for m in matches {
        alt_view.entry(m.match_id).or_default().push(AltRecord {
            alt_team: &m.team_a,
            alt_score: m.score_a,
        });
    }

    if options.strict_match_ids {
        check_unique_match_ids(&alt_view)?;
    }

    // Inner self-join on MatchId
    let mut alt_sums = PairwiseMatrix::new();
    let mut game_counts = PairwiseMatrix::new();
    let mut joined = 0usize;
    let mut dropped_self = 0usize;

    for m in matches {
        let Some(sides) = alt_view.get(&m.match_id) else {
            return Err(EngineError::Computation {
                reason: format!("match {} missing from its own alt view", m.match_id),
            });
        };

        for alt in sides {
            joined += 1;
            if m.team_a == alt.alt_team {
                dropped_self += 1;
                continue;
            }

            let alt_win = Outcome::from_scores(m.score_a, alt.alt_score);
            alt_sums.add(&m.team_a, alt.alt_team, alt_win.value());
            game_counts.add(&m.team_a, alt.alt_team, 1.0);
        }
    }

    tracing::debug!(
        "Alt join: joined_rows={}, self_comparisons_removed={}",
        joined,
        dropped_self
    );

    Ok(alt_sums.zip_with(&game_counts, |sum, count| round_rate(sum / count)))
}

/// Shared normalize -> aggregate -> join pipeline behind both rankings
///
/// * `wins`: summed outcomes per (team, opponent)
/// * `diff`: `wins` minus [`alt_win_rates`], aligned on the union of labels
#[derive(Debug, Clone)]
pub(crate) struct StrengthPipeline {
    pub(crate) wins: PairwiseMatrix,
    pub(crate) diff: PairwiseMatrix,
}

impl StrengthPipeline {
    pub(crate) fn run(
        matches: &[CanonicalMatch],
        options: EngineOptions,
    ) -> Result<Self, EngineError> {
        let wins = aggregate_outcomes(matches);
        let alt_rates = alt_win_rates(matches, options)?;
        let diff = wins.subtract(&alt_rates);

        tracing::debug!(
            "Schedule difference matrix: rows={}, cols={}",
            diff.rows().len(),
            diff.columns().len()
        );

        Ok(Self { wins, diff })
    }

    /// Alphabetical team ordering used for matrix columns
    pub(crate) fn teams(&self) -> Vec<String> {
        self.diff.columns().iter().cloned().collect()
    }

    /// Reduce every row of `diff` to a strength score and rank it
    pub(crate) fn ranked_rows(&self, reducer: StrengthReducer) -> Vec<TeamStrengthRow> {
        let teams: Vec<&String> = self.diff.rows().iter().collect();

        let strengths: Vec<Option<f64>> = teams
            .iter()
            .map(|team| {
                let values: Vec<f64> = self.diff.defined_row(team).map(|(_, v)| v).collect();
                reducer.reduce(&values)
            })
            .collect();

        let ranks = rank_descending(&strengths);

        teams
            .into_iter()
            .zip(strengths)
            .zip(ranks)
            .map(|((team, strength), rank)| TeamStrengthRow {
                team: team.clone(),
                opponents: self.diff.filled_row(team),
                strength: strength.unwrap_or(SENTINEL),
                rank: rank.unwrap_or(UNRANKED),
            })
            .collect()
    }
}

/// A MatchId may only be shared by the two orientations of one match
fn check_unique_match_ids(alt_view: &HashMap<i64, Vec<AltRecord<'_>>>) -> Result<(), EngineError> {
    let mut duplicated: Vec<i64> = alt_view
        .iter()
        .filter(|(_, sides)| sides.len() > 2)
        .map(|(match_id, _)| *match_id)
        .collect();

    if duplicated.is_empty() {
        return Ok(());
    }

    duplicated.sort_unstable();
    tracing::error!("MatchId reused across matches: {:?}", duplicated);
    Err(EngineError::Computation {
        reason: format!("MatchId reused across unrelated matches: {:?}", duplicated),
    })
}

/// Rank scores from strongest (1) down
///
/// Tied scores share the average of the positions they occupy, truncated to an
/// integer, so `[3, 2, 2, 1]` ranks as `[1, 2, 2, 4]` and `[1, 1]` as `[1, 1]`.
/// Undefined scores are left unranked.
pub fn rank_descending(values: &[Option<f64>]) -> Vec<Option<i64>> {
    let mut order: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| value.map(|v| (index, v)))
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut ranks = vec![None; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && order[end].1 == order[start].1 {
            end += 1;
        }

        // Positions start+1 ..= end share their mean
        let average = (start + 1 + end) as f64 / 2.0;
        for &(index, _) in &order[start..end] {
            ranks[index] = Some(average as i64);
        }
        start = end;
    }

    ranks
}

/// Pairwise strength engine
///
/// Pure and synchronous: every call works on its own intermediate tables, so a
/// single engine can be shared freely between concurrent callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthEngine {
    options: EngineOptions,
}

impl StrengthEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Overall strength: mean schedule-adjusted delta per team
    pub fn compute_strength(&self, matches: &[CanonicalMatch]) -> Result<StrengthReport, EngineError> {
        let pipeline = StrengthPipeline::run(matches, self.options)?;
        let matrix = pipeline.ranked_rows(StrengthReducer::Mean);

        // Over the published cells, so any unplayed pair pulls the minimum to -1
        let (mut max, mut min) = (None::<f64>, None::<f64>);
        for value in matrix.iter().flat_map(|row| row.opponents.values().copied()) {
            max = Some(max.map_or(value, |m| m.max(value)));
            min = Some(min.map_or(value, |m| m.min(value)));
        }

        tracing::info!("Strength computed for {} teams", matrix.len());

        Ok(StrengthReport {
            teams: pipeline.teams(),
            matrix,
            matrix_wins: pipeline.wins.to_rows(),
            metadata: StrengthMetadata {
                max_win_rate: max.unwrap_or(SENTINEL),
                min_win_rate: min.unwrap_or(SENTINEL),
            },
        })
    }

    /// Schedule strength: summed schedule-adjusted delta per team
    pub fn compute_schedule_strength(
        &self,
        matches: &[CanonicalMatch],
    ) -> Result<ScheduleStrengthReport, EngineError> {
        let pipeline = StrengthPipeline::run(matches, self.options)?;
        let matrix = pipeline.ranked_rows(StrengthReducer::Sum);

        if let (Some(max), Some(min)) = (
            matrix.iter().map(|row| row.strength).reduce(f64::max),
            matrix.iter().map(|row| row.strength).reduce(f64::min),
        ) {
            tracing::info!(
                "Schedule strength computed for {} teams: min={:.3}, max={:.3}",
                matrix.len(),
                min,
                max
            );
        }

        Ok(ScheduleStrengthReport {
            teams: pipeline.teams(),
            matrix,
            matrix_wins: pipeline.wins.to_rows(),
        })
    }
}

/// [`StrengthEngine::compute_strength`] with default options
pub fn compute_strength(matches: &[CanonicalMatch]) -> Result<StrengthReport, EngineError> {
    StrengthEngine::default().compute_strength(matches)
}

/// [`StrengthEngine::compute_schedule_strength`] with default options
pub fn compute_schedule_strength(
    matches: &[CanonicalMatch],
) -> Result<ScheduleStrengthReport, EngineError> {
    StrengthEngine::default().compute_schedule_strength(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::to_canonical;
    use crate::models::MatchRecord;

    fn game(match_id: i64, team1: &str, score1: f64, team2: &str, score2: f64) -> MatchRecord {
        MatchRecord {
            match_id,
            team1: team1.to_string(),
            score1,
            team2: team2.to_string(),
            score2,
            period: None,
            result: None,
            winner: None,
            loser: None,
        }
    }

    fn three_team_league() -> Vec<CanonicalMatch> {
        to_canonical(&[
            game(1, "A", 10.0, "B", 8.0),
            game(2, "B", 5.0, "C", 5.0),
            game(3, "A", 7.0, "C", 9.0),
        ])
    }

    #[test]
    fn test_single_games_cancel_out() {
        let alt_rates = alt_win_rates(&three_team_league(), EngineOptions::default()).unwrap();
        assert_eq!(alt_rates.get("A", "B"), Some(1.0));
        assert_eq!(alt_rates.get("B", "C"), Some(0.5));
        assert_eq!(alt_rates.get("A", "C"), Some(0.0));

        let pipeline = StrengthPipeline::run(&three_team_league(), EngineOptions::default()).unwrap();
        for (_, _, delta) in pipeline.diff.cells() {
            assert_eq!(delta, 0.0);
        }
        assert_eq!(pipeline.diff.get("A", "A"), None);
    }

    #[test]
    fn test_three_way_tie_shares_average_rank() {
        let report = compute_strength(&three_team_league()).unwrap();

        assert_eq!(report.teams, vec!["A", "B", "C"]);
        for row in &report.matrix {
            assert_eq!(row.strength, 0.0);
            assert_eq!(row.rank, 2);
            assert_eq!(row.opponents[&row.team], SENTINEL);
        }
        // Diagonal cells are published as -1
        assert_eq!(report.metadata.max_win_rate, 0.0);
        assert_eq!(report.metadata.min_win_rate, SENTINEL);
    }

    #[test]
    fn test_repeat_wins_raise_strength() {
        let matches = to_canonical(&[
            game(1, "A", 3.0, "B", 1.0),
            game(2, "A", 3.0, "B", 1.0),
            game(3, "B", 2.0, "A", 0.0),
        ]);
        let pipeline = StrengthPipeline::run(&matches, EngineOptions::default()).unwrap();
        let alt_rates = alt_win_rates(&matches, EngineOptions::default()).unwrap();

        assert_eq!(pipeline.wins.get("A", "B"), Some(2.0));
        assert_eq!(alt_rates.get("A", "B"), Some(0.67));
        assert_eq!(alt_rates.get("B", "A"), Some(0.33));
        assert!((pipeline.diff.get("A", "B").unwrap() - 1.33).abs() < 1e-9);
        assert!((pipeline.diff.get("B", "A").unwrap() - 0.67).abs() < 1e-9);

        let rows = pipeline.ranked_rows(StrengthReducer::Mean);
        assert_eq!(rows[0].team, "A");
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 2);
    }

    #[test]
    fn test_mean_and_sum_reducers_differ() {
        let matches = to_canonical(&[
            game(1, "A", 3.0, "B", 1.0),
            game(2, "A", 3.0, "B", 1.0),
            game(3, "A", 3.0, "C", 1.0),
            game(4, "A", 3.0, "C", 1.0),
        ]);

        let strength = compute_strength(&matches).unwrap();
        let schedule = compute_schedule_strength(&matches).unwrap();

        let a_mean = strength.matrix.iter().find(|r| r.team == "A").unwrap().strength;
        let a_sum = schedule.matrix.iter().find(|r| r.team == "A").unwrap().strength;
        assert!((a_mean - 1.0).abs() < 1e-9);
        assert!((a_sum - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_match_id_rejected_when_strict() {
        let matches = to_canonical(&[game(1, "A", 10.0, "B", 8.0), game(1, "C", 3.0, "D", 5.0)]);
        let err = compute_strength(&matches).unwrap_err();
        assert!(matches!(err, EngineError::Computation { .. }));
    }

    #[test]
    fn test_duplicate_match_id_joins_literally_when_lenient() {
        let matches = to_canonical(&[game(1, "A", 10.0, "B", 8.0), game(1, "C", 3.0, "D", 5.0)]);
        let options = EngineOptions { strict_match_ids: false };
        let pipeline = StrengthPipeline::run(&matches, options).unwrap();
        let alt_rates = alt_win_rates(&matches, options).unwrap();

        // A is compared against every other side filed under MatchId 1
        assert_eq!(alt_rates.get("A", "C"), Some(1.0));
        assert_eq!(alt_rates.get("A", "D"), Some(1.0));
        assert_eq!(alt_rates.get("C", "A"), Some(0.0));
        // ...but never played C, so the delta stays undefined
        assert_eq!(pipeline.diff.get("A", "C"), None);

        let rows = pipeline.ranked_rows(StrengthReducer::Mean);
        let a = rows.iter().find(|r| r.team == "A").unwrap();
        assert_eq!(a.opponents["C"], SENTINEL);
    }

    #[test]
    fn test_self_match_has_no_delta() {
        let matches = to_canonical(&[game(1, "A", 2.0, "A", 1.0), game(2, "A", 2.0, "B", 1.0)]);
        let pipeline = StrengthPipeline::run(&matches, EngineOptions::default()).unwrap();

        assert_eq!(pipeline.wins.get("A", "A"), Some(1.0));
        assert_eq!(alt_win_rates(&matches, EngineOptions::default()).unwrap().get("A", "A"), None);
        assert_eq!(pipeline.diff.get("A", "A"), None);
    }

    #[test]
    fn test_reducers_on_empty_row() {
        assert_eq!(StrengthReducer::Mean.reduce(&[]), None);
        assert_eq!(StrengthReducer::Sum.reduce(&[]), Some(0.0));
    }

    #[test]
    fn test_rank_descending_ties_truncate() {
        let ranks = rank_descending(&[Some(3.0), Some(2.0), Some(2.0), Some(1.0)]);
        assert_eq!(ranks, vec![Some(1), Some(2), Some(2), Some(4)]);

        let ranks = rank_descending(&[Some(1.0), Some(1.0)]);
        assert_eq!(ranks, vec![Some(1), Some(1)]);

        let ranks = rank_descending(&[Some(0.5), None, Some(2.0)]);
        assert_eq!(ranks, vec![Some(2), None, Some(1)]);
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        let report = compute_strength(&[]).unwrap();
        assert!(report.teams.is_empty());
        assert!(report.matrix.is_empty());
        assert!(report.matrix_wins.is_empty());
        assert_eq!(report.metadata.max_win_rate, SENTINEL);
        assert_eq!(report.metadata.min_win_rate, SENTINEL);
    }

    #[test]
    fn test_metadata_spans_published_cells() {
        let matches = to_canonical(&[
            game(1, "A", 3.0, "B", 1.0),
            game(2, "A", 3.0, "B", 1.0),
            game(3, "B", 2.0, "A", 0.0),
        ]);
        let report = compute_strength(&matches).unwrap();

        assert!((report.metadata.max_win_rate - 1.33).abs() < 1e-9);
        assert_eq!(report.metadata.min_win_rate, SENTINEL);
    }
}
