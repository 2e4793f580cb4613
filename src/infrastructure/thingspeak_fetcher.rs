// ThingSpeak feed fetcher implementation
use crate::application::feed_fetcher::{FeedFetcher, FeedSource, FetchError};
use crate::domain::sample::{Metric, Sample};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ThingSpeakFetcher {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    channel: Option<ChannelInfo>,
    #[serde(default)]
    feeds: Option<Vec<FeedEntry>>,
}

#[derive(Debug, Deserialize)]
struct ChannelInfo {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    #[serde(default)]
    created_at: Option<String>,
    /// `field1`..`field8` plus `entry_id`
    #[serde(flatten)]
    fields: HashMap<String, serde_json::Value>,
}

impl FeedEntry {
    fn raw_reading(&self, metric: Metric) -> Option<&serde_json::Value> {
        self.fields.get(metric.field())
    }

    fn into_sample(self) -> Option<Sample> {
        let timestamp = self
            .created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())?
            .with_timezone(&Utc);

        Some(Metric::ALL.iter().fold(Sample::new(timestamp), |sample, &metric| {
            let value = self.raw_reading(metric).and_then(parse_reading);
            sample.with_reading(metric, value)
        }))
    }
}

/// Readings arrive as strings, numbers or null; only finite numbers count.
pub fn parse_reading(value: &serde_json::Value) -> Option<f64> {
    let parsed = match value {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

impl ThingSpeakFetcher {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_feed_url(&self, source: &FeedSource, count: usize) -> String {
        format!(
            "{}/channels/{}/feeds.json?api_key={}&results={}",
            self.base_url,
            urlencoding::encode(&source.channel_id),
            urlencoding::encode(&source.read_api_key),
            count
        )
    }

    fn parse_feed(response: FeedResponse) -> Result<Vec<Sample>, FetchError> {
        let entries = response.feeds.unwrap_or_default();
        let total = entries.len();

        let samples: Vec<Sample> = entries
            .into_iter()
            .filter_map(FeedEntry::into_sample)
            .collect();

        if samples.len() < total {
            tracing::debug!(
                "Dropped {} feed entries without a valid timestamp",
                total - samples.len()
            );
        }

        if samples.is_empty() {
            return Err(FetchError::EmptyResult);
        }

        Ok(samples)
    }
}

#[async_trait]
impl FeedFetcher for ThingSpeakFetcher {
    async fn fetch_latest(&self, source: &FeedSource, count: usize) -> Result<Vec<Sample>, FetchError> {
        let url = self.build_feed_url(source, count);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to reach feed source: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(FetchError::Transport(format!(
                "Network response was not ok: {}",
                status
            )));
        }

        let data = response
            .json::<FeedResponse>()
            .await
            .map_err(|e| FetchError::Transport(format!("Failed to parse feed response: {}", e)))?;

        if let Some(name) = data.channel.as_ref().and_then(|c| c.name.as_deref()) {
            tracing::debug!("Fetched feed for channel '{}'", name);
        }

        Self::parse_feed(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    fn source() -> FeedSource {
        FeedSource {
            channel_id: "3000045".to_string(),
            read_api_key: "secret key".to_string(),
        }
    }

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetcher(base_url: String) -> ThingSpeakFetcher {
        ThingSpeakFetcher::new(base_url, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_parse_reading() {
        assert_eq!(parse_reading(&json!("21.5")), Some(21.5));
        assert_eq!(parse_reading(&json!(" 0 ")), Some(0.0));
        assert_eq!(parse_reading(&json!(1013)), Some(1013.0));
        assert_eq!(parse_reading(&json!("nan")), None);
        assert_eq!(parse_reading(&json!("n/a")), None);
        assert_eq!(parse_reading(&json!(null)), None);
    }

    #[test]
    fn test_build_feed_url() {
        let fetcher = fetcher("https://api.thingspeak.com/".to_string());

        assert_eq!(
            fetcher.build_feed_url(&source(), 360),
            "https://api.thingspeak.com/channels/3000045/feeds.json?api_key=secret%20key&results=360"
        );
    }

    #[test]
    fn test_entries_without_timestamp_are_dropped() {
        let response: FeedResponse = serde_json::from_value(json!({
            "channel": { "id": 3000045, "name": "Weather" },
            "feeds": [
                { "created_at": "2024-05-01T12:00:00Z", "entry_id": 1, "field1": "20.5", "field2": null, "field3": "1012.8" },
                { "entry_id": 2, "field1": "21.0" },
                { "created_at": "not a date", "field1": "21.0" }
            ]
        }))
        .unwrap();

        let samples = ThingSpeakFetcher::parse_feed(response).unwrap();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].reading(Metric::Temperature), Some(20.5));
        assert_eq!(samples[0].reading(Metric::Humidity), None);
        assert_eq!(samples[0].reading(Metric::Pressure), Some(1012.8));
    }

    #[tokio::test]
    async fn test_fetch_latest_returns_samples_in_order() {
        let router = Router::new().route(
            "/channels/:id/feeds.json",
            get(|| async {
                Json(json!({
                    "feeds": [
                        { "created_at": "2024-05-01T12:00:00Z", "field1": "20.0", "field2": "40", "field3": "1010" },
                        { "created_at": "2024-05-01T12:01:00Z", "field1": "20.5", "field2": "41", "field3": "1011" }
                    ]
                }))
            }),
        );
        let base_url = serve(router).await;

        let samples = fetcher(base_url).fetch_latest(&source(), 2).await.unwrap();

        assert_eq!(samples.len(), 2);
        assert!(samples[0].timestamp < samples[1].timestamp);
        assert_eq!(samples[1].reading(Metric::Humidity), Some(41.0));
    }

    #[tokio::test]
    async fn test_empty_feed_is_reported_as_empty_result() {
        let router = Router::new().route(
            "/channels/:id/feeds.json",
            get(|| async { Json(json!({ "channel": { "name": "Weather" }, "feeds": [] })) }),
        );
        let base_url = serve(router).await;

        let result = fetcher(base_url).fetch_latest(&source(), 360).await;

        assert!(matches!(result, Err(FetchError::EmptyResult)));
    }

    #[tokio::test]
    async fn test_missing_feed_list_is_reported_as_empty_result() {
        let router = Router::new().route(
            "/channels/:id/feeds.json",
            get(|| async { Json(json!({ "channel": { "name": "Weather" } })) }),
        );
        let base_url = serve(router).await;

        let result = fetcher(base_url).fetch_latest(&source(), 360).await;

        assert!(matches!(result, Err(FetchError::EmptyResult)));
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let router = Router::new().route(
            "/channels/:id/feeds.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base_url = serve(router).await;

        let result = fetcher(base_url).fetch_latest(&source(), 360).await;

        match result {
            Err(FetchError::Transport(message)) => assert!(message.contains("500")),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_source_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = fetcher(format!("http://{}", addr)).fetch_latest(&source(), 360).await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
