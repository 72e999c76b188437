// Service exports
pub mod cache;
pub mod feed;
pub mod snapshot;

pub use cache::{CacheEntryStats, CacheKey, CacheStats, ResultCache};
pub use feed::{parse_csv, CsvFileFeed, FeedError, FeedSource, SheetFeed};
pub use snapshot::{write_snapshot, SnapshotError, SnapshotMetadata};
