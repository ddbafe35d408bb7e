use crate::config::{AllowedOrigin, Config};
use crate::error::GatewayError;
use crate::format::IMAGE_BASE;
use crate::gateway::MovieService;
use crate::models::{Movie, MoviePage};
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, Method},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub movies: MovieService,
}

impl AppState {
    pub fn new(tmdb: Arc<dyn TmdbApi>) -> Self {
        Self::with_image_base(tmdb, IMAGE_BASE)
    }

    pub fn with_image_base(tmdb: Arc<dyn TmdbApi>, image_base: &str) -> Self {
        Self {
            movies: MovieService::new(tmdb, image_base),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageParams {
    page: Option<String>,
}

pub async fn run_server(config: Config) -> Result<()> {
    if config.api_key.is_none() {
        warn!("TMDB_API_KEY is not set; movie endpoints will fail until it is configured");
    }
    if config.read_access_token.is_none() {
        warn!("TMDB_READ_ACCESS_TOKEN is not set; requests will rely on the API key alone");
    }

    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::from_config(&config)?);
    let state = AppState::with_image_base(tmdb, &config.image_base);
    let app = build_router(state, &config.cors_origin);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState, origin: &AllowedOrigin) -> Router {
    let movies = Router::new()
        .route("/search", get(search_movies))
        .route("/popular", get(popular_movies))
        .route("/top-rated", get(top_rated_movies))
        .route("/now-playing", get(now_playing_movies))
        .route("/:id", get(movie_details));

    Router::new()
        .route("/", get(home))
        .nest("/api/movies", movies)
        .layer(cors_layer(origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &AllowedOrigin) -> CorsLayer {
    let allow_origin = match origin {
        AllowedOrigin::Any => AllowOrigin::any(),
        AllowedOrigin::List(origins) => AllowOrigin::list(origins.clone()),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn home() -> &'static str {
    "Hello World!"
}

async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<MoviePage>, GatewayError> {
    state
        .movies
        .search_movies(params.q.as_deref(), params.page.as_deref())
        .await
        .map(Json)
}

async fn popular_movies(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<MoviePage>, GatewayError> {
    state
        .movies
        .popular_movies(params.page.as_deref())
        .await
        .map(Json)
}

async fn top_rated_movies(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<MoviePage>, GatewayError> {
    state
        .movies
        .top_rated_movies(params.page.as_deref())
        .await
        .map(Json)
}

async fn now_playing_movies(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<MoviePage>, GatewayError> {
    state
        .movies
        .now_playing_movies(params.page.as_deref())
        .await
        .map(Json)
}

async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, GatewayError> {
    state.movies.movie_details(&id).await.map(Json)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
