use anyhow::{bail, Context, Result};
use axum::http::HeaderValue;
use std::env;
use std::time::Duration;

use crate::format::IMAGE_BASE;
use crate::tmdb::TMDB_BASE;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, PartialEq)]
pub enum AllowedOrigin {
    Any,
    List(Vec<HeaderValue>),
}

impl AllowedOrigin {
    fn parse(raw: &str) -> Result<Self> {
        if raw.trim() == "*" {
            return Ok(AllowedOrigin::Any);
        }
        let entries: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if entries.contains(&"*") {
            bail!("CORS_ORIGIN cannot mix '*' with explicit origins, got '{raw}'");
        }
        let origins = entries
            .into_iter()
            .map(|s| HeaderValue::from_str(s).with_context(|| format!("Invalid CORS origin '{s}'")))
            .collect::<Result<Vec<_>>>()?;
        if origins.is_empty() {
            return Ok(AllowedOrigin::Any);
        }
        Ok(AllowedOrigin::List(origins))
    }
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub read_access_token: Option<String>,
    pub port: u16,
    pub cors_origin: AllowedOrigin,
    pub api_base: String,
    pub image_base: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // VITE_* names are what the web client's .env already carries.
        let api_key = get("TMDB_API_KEY").or_else(|| get("VITE_TMDB_API_KEY"));
        let read_access_token =
            get("TMDB_READ_ACCESS_TOKEN").or_else(|| get("VITE_TMDB_READ_ACCESS_TOKEN"));

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        let cors_origin = match get("CORS_ORIGIN") {
            Some(raw) => AllowedOrigin::parse(&raw)?,
            None => AllowedOrigin::Any,
        };

        let timeout_secs = match get("TMDB_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .with_context(|| {
                    format!("TMDB_TIMEOUT_SECS must be a positive integer, got '{raw}'")
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            read_access_token,
            port,
            cors_origin,
            api_base: get("TMDB_BASE_URL").unwrap_or_else(|| TMDB_BASE.to_string()),
            image_base: get("TMDB_IMAGE_BASE_URL").unwrap_or_else(|| IMAGE_BASE.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
