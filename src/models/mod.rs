// Model exports
pub mod domain;
pub mod responses;

pub use domain::{CanonicalMatch, FeedColumn, MatchRecord, RawRow};
pub use responses::{
    ErrorResponse, ForAgainstReport, ForAgainstRow, HealthResponse, ScheduleStrengthReport,
    ServiceInfo, StrengthMetadata, RESERVED_ROW_KEYS, StrengthReport, TeamStrengthRow, WinsRow,
};
