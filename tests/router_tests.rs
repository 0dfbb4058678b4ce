//! End-to-end tests for the recommendation routes.
//!
//! Requests are driven through the full Axum router with `tower::ServiceExt::oneshot`.
//! A throwaway Axum server on 127.0.0.1 stands in for the health records API so the
//! real reqwest client and URL construction are exercised.
//!
//! Run with: cargo test --test router_tests
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use vitals_advisor::config::UpstreamConfig;
use vitals_advisor::error::{DECODE_FAILED, FETCH_FAILED, MISSING_RECORD_ID};
use vitals_advisor::health_record::HttpHealthRecordSource;
use vitals_advisor::recommendations::*;
use vitals_advisor::routes::create_router;
use vitals_advisor::state::AppState;
use vitals_advisor::store::{MemoryRecommendationStore, RecommendationStore};
use vitals_advisor::RecommendationService;

/// Canned reply served by the mock records API
#[derive(Clone)]
struct MockReply {
    status: StatusCode,
    body: &'static str,
}

#[derive(Clone)]
struct MockUpstream {
    reply: MockReply,
    seen: Arc<Mutex<Vec<String>>>,
}

async fn mock_records(State(mock): State<MockUpstream>, uri: Uri) -> Response {
    mock.seen.lock().unwrap().push(uri.path().to_string());
    (mock.reply.status, mock.reply.body).into_response()
}

/// Start a mock records API and return its base URL plus the list of paths it served.
async fn spawn_upstream(reply: MockReply) -> (String, Arc<Mutex<Vec<String>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(mock_records).with_state(MockUpstream {
        reply,
        seen: seen.clone(),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/health-records/", addr), seen)
}

fn build_app(base_url: String, store: Arc<MemoryRecommendationStore>) -> Router {
    let records = HttpHealthRecordSource::new(&UpstreamConfig {
        base_url,
        timeout_seconds: Some(5),
    })
    .unwrap();
    let service = RecommendationService::new(Arc::new(records), store);
    create_router(AppState::new(service))
}

async fn get(app: Router, path: &str) -> (StatusCode, Value, axum::http::HeaderMap) {
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body, headers)
}

#[tokio::test]
async fn test_recommendations_success() {
    let (base_url, seen) = spawn_upstream(MockReply {
        status: StatusCode::OK,
        body: r#"{"weight": 95, "height": 150, "bloodPressure": 140}"#,
    })
    .await;
    let store = Arc::new(MemoryRecommendationStore::new());
    let app = build_app(base_url, store.clone());

    let (status, body, headers) = get(app, "/recommendations/abc123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "weight": WEIGHT_HIGH,
            "height": HEIGHT_LOW,
            "blood_pressure": BLOOD_PRESSURE_HIGH,
        })
    );
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");
    assert!(headers.contains_key("x-request-id"));

    // Record id is appended after an extra slash
    assert_eq!(seen.lock().unwrap().as_slice(), ["/health-records//abc123"]);

    let stored: Value = serde_json::from_str(&store.get("abc123").await.unwrap().unwrap()).unwrap();
    assert_eq!(stored, body);
}

#[tokio::test]
async fn test_missing_record_id_is_rejected_without_upstream_call() {
    let (base_url, seen) = spawn_upstream(MockReply {
        status: StatusCode::OK,
        body: "{}",
    })
    .await;
    let store = Arc::new(MemoryRecommendationStore::new());
    let app = build_app(base_url, store.clone());

    for path in ["/recommendations", "/recommendations/"] {
        let (status, body, _) = get(app.clone(), path).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "path {}", path);
        assert_eq!(body, json!({"error": MISSING_RECORD_ID}));
    }

    assert!(seen.lock().unwrap().is_empty());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_upstream_not_found_passes_through() {
    let (base_url, _) = spawn_upstream(MockReply {
        status: StatusCode::NOT_FOUND,
        body: r#"{"message": "no such record"}"#,
    })
    .await;
    let store = Arc::new(MemoryRecommendationStore::new());
    let app = build_app(base_url, store.clone());

    let (status, body, _) = get(app, "/recommendations/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": FETCH_FAILED}));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_undecodable_upstream_body() {
    let (base_url, _) = spawn_upstream(MockReply {
        status: StatusCode::BAD_GATEWAY,
        body: "upstream exploded",
    })
    .await;
    let app = build_app(base_url, Arc::new(MemoryRecommendationStore::new()));

    let (status, body, _) = get(app, "/recommendations/abc").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": DECODE_FAILED}));
}

#[tokio::test]
async fn test_empty_record_uses_zero_defaults() {
    let (base_url, _) = spawn_upstream(MockReply {
        status: StatusCode::OK,
        body: "{}",
    })
    .await;
    let app = build_app(base_url, Arc::new(MemoryRecommendationStore::new()));

    let (status, body, _) = get(app, "/recommendations/empty").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weight"], WEIGHT_LOW);
    assert_eq!(body["height"], HEIGHT_LOW);
    assert_eq!(body["blood_pressure"], BLOOD_PRESSURE_NORMAL);
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    // Bind and drop a listener to get a port nothing is serving on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = build_app(
        format!("http://{}/health-records/", addr),
        Arc::new(MemoryRecommendationStore::new()),
    );

    let (status, body, _) = get(app, "/recommendations/abc").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": FETCH_FAILED}));
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_app(
        "http://127.0.0.1:9/health-records/".to_string(),
        Arc::new(MemoryRecommendationStore::new()),
    );

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_handlers_receive_request_id() {
    let (base_url, _) = spawn_upstream(MockReply {
        status: StatusCode::OK,
        body: "{}",
    })
    .await;
    let app = build_app(base_url, Arc::new(MemoryRecommendationStore::new()));

    // Both handlers extract the request id; a missing extension would be a 500
    for (path, expected) in [
        ("/recommendations/rec-7", StatusCode::OK),
        ("/recommendations", StatusCode::BAD_REQUEST),
    ] {
        let (status, _, headers) = get(app.clone(), path).await;
        assert_eq!(status, expected, "path {}", path);

        let request_id = headers.get("x-request-id").unwrap().to_str().unwrap();
        assert!(uuid::Uuid::parse_str(request_id).is_ok(), "path {}", path);
    }
}
