//! Movie operations exposed over HTTP.
//!
//! Each operation validates its input locally, makes exactly one TMDB call,
//! and rewrites asset paths on the way out. Nothing is cached between calls.

use std::sync::Arc;
use tracing::info;

use crate::error::{Action, GatewayError, UpstreamError, ValidationError};
use crate::models::{Movie, MoviePage};
use crate::tmdb::TmdbApi;

const DEFAULT_PAGE: &str = "1";

#[derive(Clone)]
pub struct MovieService {
    tmdb: Arc<dyn TmdbApi>,
    image_base: Arc<str>,
}

impl MovieService {
    pub fn new(tmdb: Arc<dyn TmdbApi>, image_base: impl Into<String>) -> Self {
        Self {
            tmdb,
            image_base: Arc::from(image_base.into()),
        }
    }

    pub async fn search_movies(
        &self,
        query: Option<&str>,
        page: Option<&str>,
    ) -> Result<MoviePage, GatewayError> {
        let query = query
            .filter(|q| !q.is_empty())
            .ok_or(ValidationError::MissingQuery)?;
        let page = parse_page(page)?;

        let result = self
            .fetch_page(
                Action::SearchMovies,
                "/search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;
        info!(query, page, results = result.results.len(), "Searched movies");
        Ok(result)
    }

    pub async fn popular_movies(&self, page: Option<&str>) -> Result<MoviePage, GatewayError> {
        self.list(Action::PopularMovies, "/movie/popular", page).await
    }

    pub async fn top_rated_movies(&self, page: Option<&str>) -> Result<MoviePage, GatewayError> {
        self.list(Action::TopRatedMovies, "/movie/top_rated", page).await
    }

    pub async fn now_playing_movies(
        &self,
        page: Option<&str>,
    ) -> Result<MoviePage, GatewayError> {
        self.list(Action::NowPlayingMovies, "/movie/now_playing", page)
            .await
    }

    pub async fn movie_details(&self, id: &str) -> Result<Movie, GatewayError> {
        let id = parse_movie_id(id)?;

        let raw = match self.tmdb.get_json(&format!("/movie/{id}"), &[]).await {
            Ok(raw) => raw,
            Err(UpstreamError::NotFound) => return Err(GatewayError::MovieNotFound),
            Err(e) => return Err(GatewayError::upstream(Action::MovieDetails, e)),
        };
        let movie: Movie = serde_json::from_value(raw)
            .map_err(|e| GatewayError::upstream(Action::MovieDetails, e.into()))?;

        info!(id, "Fetched movie details");
        Ok(movie.with_absolute_assets(&self.image_base))
    }

    async fn list(
        &self,
        action: Action,
        path: &str,
        page: Option<&str>,
    ) -> Result<MoviePage, GatewayError> {
        let page = parse_page(page)?;
        let result = self
            .fetch_page(action, path, &[("page", page.to_string())])
            .await?;
        info!(
            action = %action,
            page,
            results = result.results.len(),
            "Listed movies"
        );
        Ok(result)
    }

    async fn fetch_page(
        &self,
        action: Action,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<MoviePage, GatewayError> {
        let raw = self
            .tmdb
            .get_json(path, params)
            .await
            .map_err(|e| GatewayError::upstream(action, e))?;
        let page: MoviePage = serde_json::from_value(raw)
            .map_err(|e| GatewayError::upstream(action, e.into()))?;
        Ok(page.with_absolute_assets(&self.image_base))
    }
}

/// Absent means page 1; anything else must be a positive integer and is
/// forwarded exactly as the caller wrote it.
pub fn parse_page(raw: Option<&str>) -> Result<&str, ValidationError> {
    match raw {
        None => Ok(DEFAULT_PAGE),
        Some(s) => match s.parse::<u32>() {
            Ok(p) if p >= 1 => Ok(s),
            _ => Err(ValidationError::InvalidPage),
        },
    }
}

/// Reads the leading integer of `raw`, ignoring leading whitespace and any
/// trailing text (`"12abc"` is 12). Fails only when no digits lead the value.
pub fn parse_movie_id(raw: &str) -> Result<i64, ValidationError> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Err(ValidationError::InvalidMovieId);
    }
    let id: i64 = rest[..digits]
        .parse()
        .map_err(|_| ValidationError::InvalidMovieId)?;
    Ok(if negative { -id } else { id })
}
