use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Client, StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::UpstreamError;

pub const TMDB_BASE: &str = "https://api.themoviedb.org/3";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_MESSAGE_CHARS: usize = 200;

/// One authenticated GET against TMDB.
#[async_trait]
pub trait TmdbApi: Send + Sync {
    /// Fetches `path` (relative to the API base) with `params` plus the API key.
    async fn get_json(&self, path: &str, params: &[(&str, String)])
        -> Result<Value, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl TmdbClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        read_access_token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = read_access_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .context("TMDB read access token is not a valid header value")?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .user_agent(format!("reelgate/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("Failed to build TMDB HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base.clone(),
            config.api_key.clone(),
            config.read_access_token.as_deref(),
            config.request_timeout,
        )
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, UpstreamError> {
        // Checked on every call so a fixed environment takes effect without caching a failure.
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(UpstreamError::MissingApiKey)?;

        let url = format!("{}{}", self.base_url, path);
        debug!(path, "Calling TMDB");
        let res = self
            .client
            .get(&url)
            .query(params)
            .query(&[("api_key", api_key)])
            .send()
            .await
            // The URL carries the api key; keep it out of error messages.
            .map_err(|e| UpstreamError::Transport(e.without_url()))?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound);
        }
        let text = res
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url()))?;
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                message: provider_message(&text),
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// TMDB error bodies look like `{"status_code": 7, "status_message": "..."}`.
fn provider_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        status_message: String,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.status_message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_MESSAGE_CHARS).collect()
}
