use std::collections::{BTreeMap, BTreeSet};

use crate::models::WinsRow;

/// Marker for "no games played" / "not applicable" in published matrices
pub const SENTINEL: f64 = -1.0;

/// Team x opponent matrix of aggregated values
///
/// Row and column labels are tracked separately from cells: a label can be
/// present while some (or all) of its cells are undefined. Undefined cells are
/// simply absent and only become [`SENTINEL`] when the matrix is published.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairwiseMatrix {
    rows: BTreeSet<String>,
    columns: BTreeSet<String>,
    cells: BTreeMap<String, BTreeMap<String, f64>>,
}

impl PairwiseMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the (team, opponent) cell, defining it if needed
    pub fn add(&mut self, team: &str, opponent: &str, value: f64) {
        self.register(team, opponent);
        *self
            .cells
            .entry(team.to_string())
            .or_default()
            .entry(opponent.to_string())
            .or_insert(0.0) += value;
    }

    /// Set the (team, opponent) cell, replacing any previous value
    pub fn insert(&mut self, team: &str, opponent: &str, value: f64) {
        self.register(team, opponent);
        self.cells
            .entry(team.to_string())
            .or_default()
            .insert(opponent.to_string(), value);
    }

    fn register(&mut self, team: &str, opponent: &str) {
        if !self.rows.contains(team) {
            self.rows.insert(team.to_string());
        }
        if !self.columns.contains(opponent) {
            self.columns.insert(opponent.to_string());
        }
    }

    pub fn get(&self, team: &str, opponent: &str) -> Option<f64> {
        self.cells.get(team).and_then(|row| row.get(opponent)).copied()
    }

    /// Defined cells of one row, keyed by opponent
    pub fn defined_row(&self, team: &str) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.cells
            .get(team)
            .into_iter()
            .flat_map(|row| row.iter().map(|(opponent, value)| (opponent.as_str(), *value)))
    }

    /// Row labels in alphabetical order
    pub fn rows(&self) -> &BTreeSet<String> {
        &self.rows
    }

    /// Column labels in alphabetical order
    pub fn columns(&self) -> &BTreeSet<String> {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    /// Iterate every defined cell as (team, opponent, value)
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.cells.iter().flat_map(|(team, row)| {
            row.iter()
                .map(move |(opponent, value)| (team.as_str(), opponent.as_str(), *value))
        })
    }

    /// Element-wise combination of two matrices aligned on their labels
    ///
    /// The result carries the union of both label sets; a cell is defined only
    /// where both inputs define it.
    pub fn zip_with<F>(&self, other: &PairwiseMatrix, op: F) -> PairwiseMatrix
    where
        F: Fn(f64, f64) -> f64,
    {
        let mut result = PairwiseMatrix {
            rows: self.rows.union(&other.rows).cloned().collect(),
            columns: self.columns.union(&other.columns).cloned().collect(),
            cells: BTreeMap::new(),
        };

        for (team, opponent, left) in self.cells() {
            if let Some(right) = other.get(team, opponent) {
                result
                    .cells
                    .entry(team.to_string())
                    .or_default()
                    .insert(opponent.to_string(), op(left, right));
            }
        }

        result
    }

    /// Element-wise `self - other` with label alignment
    pub fn subtract(&self, other: &PairwiseMatrix) -> PairwiseMatrix {
        self.zip_with(other, |left, right| left - right)
    }

    /// One row over every column label, undefined cells set to [`SENTINEL`]
    pub fn filled_row(&self, team: &str) -> BTreeMap<String, f64> {
        self.columns
            .iter()
            .map(|opponent| {
                let value = self.get(team, opponent).unwrap_or(SENTINEL);
                (opponent.clone(), value)
            })
            .collect()
    }

    /// Publish the matrix as rows sorted by team, sentinel-filled
    pub fn to_rows(&self) -> Vec<WinsRow> {
        self.rows
            .iter()
            .map(|team| WinsRow {
                team: team.clone(),
                opponents: self.filled_row(team),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates() {
        let mut matrix = PairwiseMatrix::new();
        matrix.add("A", "B", 1.0);
        matrix.add("A", "B", 0.5);
        assert_eq!(matrix.get("A", "B"), Some(1.5));
        assert_eq!(matrix.get("B", "A"), None);
    }

    #[test]
    fn test_subtract_aligns_on_union() {
        let mut left = PairwiseMatrix::new();
        left.insert("A", "B", 2.0);
        left.insert("A", "C", 1.0);

        let mut right = PairwiseMatrix::new();
        right.insert("A", "B", 0.5);
        right.insert("D", "A", 0.25);

        let diff = left.subtract(&right);
        assert_eq!(diff.get("A", "B"), Some(1.5));
        assert_eq!(diff.get("A", "C"), None);
        assert_eq!(diff.get("D", "A"), None);
        assert!(diff.rows().contains("D"));
        assert!(diff.columns().contains("A"));
        assert!(diff.columns().contains("C"));
    }

    #[test]
    fn test_filled_rows_use_sentinel() {
        let mut matrix = PairwiseMatrix::new();
        matrix.insert("A", "B", 0.0);
        matrix.insert("B", "A", 1.0);

        let rows = matrix.to_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].team, "A");
        assert_eq!(rows[0].opponents["A"], SENTINEL);
        assert_eq!(rows[0].opponents["B"], 0.0);
        assert_eq!(rows[1].opponents["A"], 1.0);
        assert_eq!(rows[1].opponents["B"], SENTINEL);
    }
}
