// Core engine exports
pub mod aggregator;
pub mod error;
pub mod for_against;
pub mod matrix;
pub mod normalizer;
pub mod outcome;
pub mod strength;

pub use aggregator::aggregate_outcomes;
pub use error::EngineError;
pub use for_against::{compute_for_against, median};
pub use matrix::{PairwiseMatrix, SENTINEL};
pub use normalizer::{normalize, parse_records, to_canonical};
pub use outcome::{round_rate, Outcome};
pub use strength::{
    compute_schedule_strength, compute_strength, rank_descending, EngineOptions, StrengthEngine,
    StrengthReducer, UNRANKED,
};
