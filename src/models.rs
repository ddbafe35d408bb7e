use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A movie record as returned by TMDB.
///
/// Only the id and the two asset paths are typed; every other provider field
/// is kept in `rest` and passed through untouched. Used both for list entries
/// and for the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Paginated envelope used by search and the curated lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    pub page: u32,
    pub total_results: u64,
    pub total_pages: u64,
    pub results: Vec<Movie>,
    // e.g. the `dates` window on now-playing
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}
