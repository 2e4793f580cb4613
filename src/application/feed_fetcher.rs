// Fetcher trait for telemetry feed access
use crate::domain::sample::Sample;
use async_trait::async_trait;

/// Identifies one remote feed (channel) and the key used to read it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub channel_id: String,
    pub read_api_key: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Network failure, non-success status or an undecodable body
    #[error("{0}")]
    Transport(String),
    /// Well-formed response without any entries yet
    #[error("feed contains no entries yet")]
    EmptyResult,
}

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch the most recent `count` samples, oldest first
    async fn fetch_latest(&self, source: &FeedSource, count: usize) -> Result<Vec<Sample>, FetchError>;
}
