//! Exercises the real TMDB client against a local stand-in server.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::Router;
use reelgate::error::UpstreamError;
use reelgate::tmdb::{TmdbApi, TmdbClient};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const API_KEY: &str = "secret-key-123";

#[derive(Debug, Clone)]
struct SeenRequest {
    path: String,
    query: HashMap<String, String>,
    authorization: Option<String>,
}

#[derive(Clone, Default)]
struct Seen(Arc<Mutex<Vec<SeenRequest>>>);

impl Seen {
    fn all(&self) -> Vec<SeenRequest> {
        self.0.lock().unwrap().clone()
    }
}

async fn fake_tmdb(
    State(seen): State<Seen>,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    seen.0.lock().unwrap().push(SeenRequest {
        path: path.clone(),
        query,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    match path.as_str() {
        "/3/movie/999" => (
            StatusCode::NOT_FOUND,
            json!({
                "success": false,
                "status_code": 34,
                "status_message": "The resource you requested could not be found."
            })
            .to_string(),
        ),
        "/3/movie/500" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "status_code": 11, "status_message": "Internal error: Something went wrong." })
                .to_string(),
        ),
        "/3/movie/garbled" => (StatusCode::OK, "<html>not json</html>".to_string()),
        "/3/movie/slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, "{}".to_string())
        }
        _ => (
            StatusCode::OK,
            json!({ "page": 1, "results": [], "total_results": 0, "total_pages": 0 }).to_string(),
        ),
    }
}

async fn spawn_fake() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new().fallback(fake_tmdb).with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/3"), seen)
}

fn client(base: &str, api_key: Option<&str>, token: Option<&str>) -> TmdbClient {
    TmdbClient::new(
        base,
        api_key.map(str::to_string),
        token,
        Duration::from_secs(2),
    )
    .unwrap()
}

#[tokio::test]
async fn sends_api_key_params_and_bearer_token() {
    let (base, seen) = spawn_fake().await;
    let tmdb = client(&base, Some(API_KEY), Some("read-token"));

    let body = tmdb
        .get_json(
            "/search/movie",
            &[("query", "the matrix".to_string()), ("page", "2".to_string())],
        )
        .await
        .unwrap();
    assert_eq!(body["page"], 1);

    let requests = seen.all();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.path, "/3/search/movie");
    assert_eq!(req.query.get("query").map(String::as_str), Some("the matrix"));
    assert_eq!(req.query.get("page").map(String::as_str), Some("2"));
    assert_eq!(req.query.get("api_key").map(String::as_str), Some(API_KEY));
    assert_eq!(req.authorization.as_deref(), Some("Bearer read-token"));
}

#[tokio::test]
async fn omits_authorization_without_token() {
    let (base, seen) = spawn_fake().await;
    client(&base, Some(API_KEY), None)
        .get_json("/movie/popular", &[("page", "1".to_string())])
        .await
        .unwrap();
    assert_eq!(seen.all()[0].authorization, None);
}

#[tokio::test]
async fn classifies_404_as_not_found() {
    let (base, _) = spawn_fake().await;
    let err = client(&base, Some(API_KEY), None)
        .get_json("/movie/999", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::NotFound));
}

#[tokio::test]
async fn other_statuses_carry_provider_message() {
    let (base, _) = spawn_fake().await;
    let err = client(&base, Some(API_KEY), None)
        .get_json("/movie/500", &[])
        .await
        .unwrap_err();
    match err {
        UpstreamError::Status { status, message } => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(message, "Internal error: Something went wrong.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let (base, _) = spawn_fake().await;
    let err = client(&base, Some(API_KEY), None)
        .get_json("/movie/garbled", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Decode(_)));
}

#[tokio::test]
async fn missing_api_key_sends_nothing() {
    let (base, seen) = spawn_fake().await;
    let tmdb = client(&base, None, Some("read-token"));
    for _ in 0..3 {
        let err = tmdb.get_json("/movie/popular", &[]).await.unwrap_err();
        assert!(matches!(err, UpstreamError::MissingApiKey));
    }
    assert!(seen.all().is_empty());
}

#[tokio::test]
async fn hung_provider_times_out() {
    let (base, _) = spawn_fake().await;
    let tmdb = TmdbClient::new(
        base,
        Some(API_KEY.to_string()),
        None,
        Duration::from_millis(200),
    )
    .unwrap();
    let err = tmdb.get_json("/movie/slow", &[]).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Transport(_)));
}

#[tokio::test]
async fn transport_errors_do_not_leak_the_api_key() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/3"), Some(API_KEY), None)
        .get_json("/movie/popular", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, UpstreamError::Transport(_)));
    assert!(!err.to_string().contains(API_KEY));
}
