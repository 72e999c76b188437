use thiserror::Error;

/// Errors raised by the strength engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A feed row could not be coerced into a match (1-based data row)
    #[error("Malformed data at row {row}, field {field} = {value:?}: {reason}")]
    MalformedData {
        row: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("No matches left after filtering the feed")]
    EmptyInput,

    #[error("Computation failed: {reason}")]
    Computation { reason: String },
}

impl EngineError {
    pub fn malformed(row: usize, field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedData {
            row,
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
