use std::time::Duration;

use crate::config::YoutubeConfig;
use crate::foundation::error::{CtaError, CtaResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Something that can report a channel's subscriber count.
pub trait SubscriberSource {
    /// Fetch the current subscriber count.
    fn subscriber_count(&self) -> CtaResult<u64>;
}

/// Fixed count, used for offline renders and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticSubscriberCount(pub u64);

impl SubscriberSource for StaticSubscriberCount {
    fn subscriber_count(&self) -> CtaResult<u64> {
        Ok(self.0)
    }
}

/// Blocking client for the YouTube Data API `channels` endpoint.
pub struct YoutubeClient {
    config: YoutubeConfig,
    http: reqwest::blocking::Client,
}

impl YoutubeClient {
    /// Build a client with a request timeout.
    pub fn new(config: YoutubeConfig) -> CtaResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("youtube-cta/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CtaError::metadata(format!("failed to build http client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Configuration this client was built with.
    pub fn config(&self) -> &YoutubeConfig {
        &self.config
    }

    /// Fetch the raw `channels?part=statistics` response body.
    pub fn fetch_statistics(&self) -> CtaResult<serde_json::Value> {
        let resp = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("part", "statistics"),
                ("id", self.config.channel_id.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .map_err(|e| CtaError::metadata(format!("YouTube API request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            // Error bodies are still JSON; parsing reports them below.
            tracing::warn!(%status, "YouTube API returned a non-success status");
        }
        resp.json::<serde_json::Value>().map_err(|e| {
            CtaError::metadata(format!(
                "YouTube API response ({status}) is not valid JSON: {e}"
            ))
        })
    }
}

impl SubscriberSource for YoutubeClient {
    fn subscriber_count(&self) -> CtaResult<u64> {
        let body = self.fetch_statistics()?;
        parse_subscriber_count(&body)
    }
}

/// Extract `items[0].statistics.subscriberCount` as a non-negative integer.
///
/// The API reports the count as a decimal string; plain JSON numbers are accepted too.
pub fn parse_subscriber_count(body: &serde_json::Value) -> CtaResult<u64> {
    body.pointer("/items/0/statistics/subscriberCount")
        .and_then(count_from_json)
        .ok_or_else(|| {
            CtaError::metadata(format!(
                "Could not parse subscriber count from YouTube API response: {body}"
            ))
        })
}

fn count_from_json(v: &serde_json::Value) -> Option<u64> {
    match v {
        serde_json::Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral_u64)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(0);
            }
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_u64))
        }
        _ => None,
    }
}

fn integral_u64(v: f64) -> Option<u64> {
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
        Some(v as u64)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/youtube.rs"]
mod tests;
