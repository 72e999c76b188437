use crate::core::error::EngineError;
use crate::models::{CanonicalMatch, FeedColumn, MatchRecord, RawRow, RESERVED_ROW_KEYS};

/// Validate raw feed rows and turn them into match records
///
/// Rows are read positionally in [`FeedColumn::ALL`] order; the H1/H2/Color
/// columns are never read. Rows without a MatchId are dropped, and so are
/// fixtures with a blank score (not played yet). A MatchId, score or team name
/// that is present but unusable fails the whole run.
pub fn parse_records(rows: &[RawRow]) -> Result<Vec<MatchRecord>, EngineError> {
    let mismatched = rows
        .iter()
        .filter(|row| row.width() != FeedColumn::WIDTH)
        .count();
    if mismatched > 0 {
        tracing::warn!(
            "Column count mismatch: expected {} columns, {} of {} rows differ",
            FeedColumn::WIDTH,
            mismatched,
            rows.len()
        );
    }

    let mut records = Vec::with_capacity(rows.len());
    let mut missing_id = 0usize;
    let mut unplayed = 0usize;

    for (index, row) in rows.iter().enumerate() {
        let line = index + 1;

        let Some(raw_id) = row.get(FeedColumn::MatchId) else {
            missing_id += 1;
            continue;
        };
        let match_id = parse_match_id(line, raw_id)?;

        // A scheduled fixture with blank scores has no result yet. It is left
        // out instead of being scored as a 0-0 game for both sides.
        let (Some(raw_score1), Some(raw_score2)) =
            (row.get(FeedColumn::Score1), row.get(FeedColumn::Score2))
        else {
            unplayed += 1;
            continue;
        };

        records.push(MatchRecord {
            match_id,
            team1: required_text(row, line, FeedColumn::Team1)?,
            score1: parse_score(line, FeedColumn::Score1, raw_score1)?,
            team2: required_text(row, line, FeedColumn::Team2)?,
            score2: parse_score(line, FeedColumn::Score2, raw_score2)?,
            period: optional_text(row, FeedColumn::Period),
            result: optional_text(row, FeedColumn::Result),
            winner: optional_text(row, FeedColumn::Winner),
            loser: optional_text(row, FeedColumn::Loser),
        });
    }

    tracing::debug!(
        "Normalized feed: rows={}, kept={}, missing_match_id={}, unplayed={}",
        rows.len(),
        records.len(),
        missing_id,
        unplayed
    );

    Ok(records)
}

/// Normalize a raw feed into the bidirectional canonical match list
///
/// Every surviving row yields two canonical matches: all rows in their
/// as-recorded orientation first, then all rows swapped. Both orientations share
/// the row's MatchId.
pub fn normalize(rows: &[RawRow]) -> Result<Vec<CanonicalMatch>, EngineError> {
    let records = parse_records(rows)?;
    Ok(to_canonical(&records))
}

/// Expand match records into both orientations
pub fn to_canonical(records: &[MatchRecord]) -> Vec<CanonicalMatch> {
    let mut matches = Vec::with_capacity(records.len() * 2);
    matches.extend(records.iter().map(MatchRecord::forward));
    matches.extend(records.iter().map(MatchRecord::swapped));
    matches
}

/// Coerce a MatchId to an integer
///
/// Integer text is accepted as-is; float text is accepted only when it has no
/// fractional part (sheet exports sometimes write `3.0`).
fn parse_match_id(line: usize, raw: &str) -> Result<i64, EngineError> {
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(id);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
            Ok(value as i64)
        }
        _ => Err(EngineError::malformed(
            line,
            FeedColumn::MatchId.name(),
            raw,
            "not an integer",
        )),
    }
}

fn parse_score(line: usize, column: FeedColumn, raw: &str) -> Result<f64, EngineError> {
    match raw.parse::<f64>() {
        Ok(score) if score.is_finite() => Ok(score),
        _ => Err(EngineError::malformed(line, column.name(), raw, "not a finite number")),
    }
}

fn required_text(row: &RawRow, line: usize, column: FeedColumn) -> Result<String, EngineError> {
    let name = row
        .get(column)
        .ok_or_else(|| EngineError::malformed(line, column.name(), "", "missing team name"))?;

    if RESERVED_ROW_KEYS.contains(&name) {
        return Err(EngineError::malformed(
            line,
            column.name(),
            name,
            "team name is a reserved report key",
        ));
    }

    Ok(name.to_string())
}

fn optional_text(row: &RawRow, column: FeedColumn) -> Option<String> {
    row.get(column).map(str::to_string)
}
