//! Environment-driven configuration for the YouTube Data API.
//!
//! Values come from the process environment after a `.env` file (if any) has been loaded.
//! Command-line flags take precedence; see the `youtube-cta` binary.

use std::path::PathBuf;

use crate::foundation::error::{CtaError, CtaResult};

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "YOUTUBE_API_KEY";
/// Environment variable holding the channel id.
pub const CHANNEL_ID_VAR: &str = "YOUTUBE_CHANNEL_ID";
/// Channels endpoint of the YouTube Data API v3.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/channels";

const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Credentials and endpoint used to fetch channel statistics.
#[derive(Clone, PartialEq, Eq)]
pub struct YoutubeConfig {
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    /// Channel whose statistics are requested.
    pub channel_id: String,
    /// Channels endpoint URL.
    pub endpoint: String,
}

impl std::fmt::Debug for YoutubeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeConfig")
            .field("api_key", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl YoutubeConfig {
    /// Validate raw values. Empty strings count as missing.
    pub fn from_values(api_key: Option<String>, channel_id: Option<String>) -> CtaResult<Self> {
        let api_key = api_key
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty() && s != PLACEHOLDER_API_KEY)
            .ok_or_else(|| CtaError::config(format!("{API_KEY_VAR} is not set in .env")))?;
        let channel_id = channel_id
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CtaError::config(format!("{CHANNEL_ID_VAR} is not set in .env")))?;
        Ok(Self {
            api_key,
            channel_id,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
        })
    }

    /// Read both values from the process environment, loading `.env` first.
    pub fn from_env() -> CtaResult<Self> {
        load_dotenv();
        Self::from_values(
            std::env::var(API_KEY_VAR).ok(),
            std::env::var(CHANNEL_ID_VAR).ok(),
        )
    }

    /// Replace the endpoint, e.g. to point at a local mock.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

/// Load `.env` from the working directory or its ancestors, if present.
///
/// Variables already set in the environment win over the file.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env");
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            tracing::warn!("ignoring unreadable .env: {e}");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
