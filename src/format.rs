//! Rewrites TMDB-relative image paths into absolute URLs.

use crate::models::{Movie, MoviePage};

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Joins a relative asset path onto `base`. Missing or empty paths map to `None`.
pub fn absolute_asset_url(base: &str, path: Option<String>) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(|p| format!("{base}{p}"))
}

impl Movie {
    pub fn with_absolute_assets(mut self, base: &str) -> Self {
        self.poster_path = absolute_asset_url(base, self.poster_path.take());
        self.backdrop_path = absolute_asset_url(base, self.backdrop_path.take());
        self
    }
}

impl MoviePage {
    /// Applies [`Movie::with_absolute_assets`] to every result, keeping provider order.
    pub fn with_absolute_assets(mut self, base: &str) -> Self {
        self.results = self
            .results
            .into_iter()
            .map(|m| m.with_absolute_assets(base))
            .collect();
        self
    }
}
