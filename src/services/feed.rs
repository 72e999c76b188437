use crate::models::RawRow;
use reqwest::Client;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading the match feed
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Feed returned status {0}")]
    Status(u16),

    #[error("Failed to read feed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Parse a CSV match table into raw rows
///
/// The first line is a header and is skipped; column names are not trusted,
/// rows are read positionally. Rows may have any width.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, FeedError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(RawRow::new(record.iter()));
    }

    Ok(rows)
}

/// Published Google Sheets tab, fetched as CSV
///
/// Fetches `{base_url}/spreadsheets/d/{sheet_id}/gviz/tq?tqx=out:csv&sheet={tab}`.
pub struct SheetFeed {
    base_url: String,
    sheet_id: String,
    data_tab: String,
    client: Client,
}

impl SheetFeed {
    /// Create a new sheet feed client
    pub fn new(
        base_url: String,
        sheet_id: String,
        data_tab: String,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            sheet_id,
            data_tab,
            client,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "{}/spreadsheets/d/{}/gviz/tq?tqx=out:csv&sheet={}",
            self.base_url.trim_end_matches('/'),
            self.sheet_id,
            urlencoding::encode(&self.data_tab)
        )
    }

    /// Download and parse the current match table
    pub async fn fetch_rows(&self) -> Result<Vec<RawRow>, FeedError> {
        let url = self.url();
        tracing::info!("Fetching match feed from {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            tracing::error!("Match feed returned {}", response.status());
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let rows = parse_csv(body.as_ref())?;

        tracing::info!("Fetched {} feed rows", rows.len());
        Ok(rows)
    }
}

/// Match table stored as a local CSV file
pub struct CsvFileFeed {
    path: PathBuf,
}

impl CsvFileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn fetch_rows(&self) -> Result<Vec<RawRow>, FeedError> {
        tracing::info!("Loading match feed from {}", self.path.display());
        let contents = tokio::fs::read(&self.path).await?;
        let rows = parse_csv(contents.as_slice())?;
        tracing::info!("Loaded {} feed rows", rows.len());
        Ok(rows)
    }
}

/// Where match rows come from
pub enum FeedSource {
    Sheet(SheetFeed),
    File(CsvFileFeed),
}

impl FeedSource {
    pub async fn fetch_rows(&self) -> Result<Vec<RawRow>, FeedError> {
        match self {
            FeedSource::Sheet(feed) => feed.fetch_rows().await,
            FeedSource::File(feed) => feed.fetch_rows().await,
        }
    }
}
