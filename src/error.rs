//! Failure kinds and their mapping onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;
use tracing::{error, warn};

/// Failures raised by the TMDB client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("TMDB API key is required. Please set TMDB_API_KEY in your .env file")]
    MissingApiKey,
    #[error("TMDB resource not found")]
    NotFound,
    #[error("TMDB responded with {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("TMDB request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("TMDB returned an unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client input rejected before anything is sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Query parameter is required")]
    MissingQuery,
    #[error("Invalid movie ID")]
    InvalidMovieId,
    #[error("Invalid page parameter")]
    InvalidPage,
}

/// The gateway operation that was running when an upstream call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SearchMovies,
    PopularMovies,
    TopRatedMovies,
    NowPlayingMovies,
    MovieDetails,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::SearchMovies => "search movies",
            Action::PopularMovies => "get popular movies",
            Action::TopRatedMovies => "get top rated movies",
            Action::NowPlayingMovies => "get now playing movies",
            Action::MovieDetails => "get movie details",
        })
    }
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Movie not found")]
    MovieNotFound,
    #[error("Failed to {action}: {source}")]
    Upstream {
        action: Action,
        #[source]
        source: UpstreamError,
    },
}

impl GatewayError {
    pub fn upstream(action: Action, source: UpstreamError) -> Self {
        GatewayError::Upstream { action, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            GatewayError::MovieNotFound => StatusCode::NOT_FOUND,
            GatewayError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Public JSON body. Upstream failures carry the cause under `message`.
    pub fn body(&self) -> serde_json::Value {
        match self {
            GatewayError::Validation(v) => json!({ "error": v.to_string() }),
            GatewayError::MovieNotFound => json!({ "error": "Movie not found" }),
            GatewayError::Upstream { action, source } => json!({
                "error": format!("Failed to {action}"),
                "message": source.to_string(),
            }),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, error = %self, "Upstream call failed");
        } else {
            warn!(status = %status, error = %self, "Rejecting request");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400_with_fixed_bodies() {
        let cases = [
            (ValidationError::MissingQuery, "Query parameter is required"),
            (ValidationError::InvalidMovieId, "Invalid movie ID"),
            (ValidationError::InvalidPage, "Invalid page parameter"),
        ];
        for (kind, message) in cases {
            let err = GatewayError::from(kind);
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert_eq!(err.body(), json!({ "error": message }));
        }
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = GatewayError::MovieNotFound;
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.body(), json!({ "error": "Movie not found" }));
    }

    #[test]
    fn upstream_failure_carries_action_and_cause() {
        let err = GatewayError::upstream(
            Action::TopRatedMovies,
            UpstreamError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                message: "maintenance".into(),
            },
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.body(),
            json!({
                "error": "Failed to get top rated movies",
                "message": "TMDB responded with 503 Service Unavailable: maintenance",
            })
        );
    }

    #[test]
    fn missing_key_is_reported_as_server_error() {
        let err = GatewayError::upstream(Action::SearchMovies, UpstreamError::MissingApiKey);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body()["error"], "Failed to search movies");
        assert!(err.body()["message"]
            .as_str()
            .unwrap()
            .starts_with("TMDB API key is required"));
    }
}
