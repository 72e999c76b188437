//! League Strength - schedule-adjusted team strength rankings
//!
//! This library turns a league's flat list of match results into a pairwise
//! win matrix, a schedule-adjusted strength ranking and a for/against scoring
//! summary. The engine in [`core`] is pure; [`services`] and [`routes`] wrap
//! it with a match feed, a result cache and an HTTP surface.

pub mod config;
pub mod core;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    aggregate_outcomes, compute_for_against, compute_schedule_strength, compute_strength,
    normalize, EngineError, EngineOptions, StrengthEngine,
};
pub use models::{
    CanonicalMatch, ForAgainstReport, RawRow, ScheduleStrengthReport, StrengthReport,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let rows = vec![RawRow::new(["A", "1", "B", "0", "", "1"])];
        let matches = normalize(&rows).unwrap();
        let report = compute_strength(&matches).unwrap();
        assert_eq!(report.teams, vec!["A", "B"]);
    }
}
