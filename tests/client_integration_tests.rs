//! Integration Tests for the GraphQL client
//!
//! Runs the client against a local axum GraphQL endpoint through the real
//! HTTP transport, and against a counting in-memory transport for timing
//! scenarios.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use gql_cache::cache::{self, derive_cache_key, CacheStore};
use gql_cache::{
    Client, ClientConfig, ClientError, MutationOptions, QueryOptions, Result, Transport,
    TransportRequest,
};
use serde_json::{json, Value};

const HERO: &str = "{ hero { name } }";

// == Helper Functions ==

/// Starts a GraphQL endpoint on an ephemeral port and returns its URI.
///
/// The reply depends on the query text:
/// - `hero` answers with Luke
/// - `broken` answers with a GraphQL error
/// - `crash` answers with HTTP 500
/// - `plain` answers with a non-JSON body
/// - `whoami` echoes the `authorization` header
async fn start_server(hits: Arc<AtomicUsize>) -> String {
    let app = Router::new()
        .route("/graphql", post(graphql_handler))
        .with_state(hits);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/graphql", addr)
}

async fn graphql_handler(
    State(hits): State<Arc<AtomicUsize>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    let query = body["query"].as_str().unwrap_or_default();

    if query.contains("crash") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
    }
    if query.contains("plain") {
        return (StatusCode::OK, "definitely not json").into_response();
    }
    if query.contains("broken") {
        return Json(json!({
            "data": null,
            "errors": [{"message": "Cannot query field \"broken\"", "locations": [{"line": 1, "column": 3}]}]
        }))
        .into_response();
    }
    if query.contains("whoami") {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("anonymous");
        return Json(json!({"data": {"whoami": auth}})).into_response();
    }

    let id = body["variables"]["id"].clone();
    Json(json!({"data": {"hero": {"name": "Luke", "id": id}}, "errors": []})).into_response()
}

async fn http_client(hits: Arc<AtomicUsize>) -> Client {
    let uri = start_server(hits).await;
    Client::new(ClientConfig::new(uri)).unwrap()
}

/// Counts calls and always answers with Luke.
#[derive(Default)]
struct CountingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl Transport for CountingTransport {
    async fn send(&self, _request: TransportRequest) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"data": {"hero": {"name": "Luke"}}, "errors": []}))
    }
}

// == HTTP Transport Tests ==

#[tokio::test]
async fn test_http_query_is_cached() {
    let hits = Arc::new(AtomicUsize::new(0));
    let client = http_client(hits.clone()).await;

    let first = client.query(QueryOptions::new(HERO)).await.unwrap();
    let second = client.query(QueryOptions::new(HERO)).await.unwrap();

    assert_eq!(first.data.as_ref().unwrap()["hero"]["name"], "Luke");
    assert!(first.errors.is_none());
    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_http_variables_reach_server() {
    let hits = Arc::new(AtomicUsize::new(0));
    let client = http_client(hits.clone()).await;

    let response = client
        .query(QueryOptions::new("query($id: ID!) { hero(id: $id) { name } }").variables(json!({"id": "1000"})))
        .await
        .unwrap();

    assert_eq!(response.data.unwrap()["hero"]["id"], "1000");
}

#[tokio::test]
async fn test_http_graphql_errors_not_cached() {
    let hits = Arc::new(AtomicUsize::new(0));
    let client = http_client(hits.clone()).await;

    let response = client.query(QueryOptions::new("{ broken }")).await.unwrap();
    assert!(response.has_errors());
    assert!(response.data.is_none());

    client.query(QueryOptions::new("{ broken }")).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert!(client.cache_to_json().await.is_empty());
}

#[tokio::test]
async fn test_http_status_error() {
    let hits = Arc::new(AtomicUsize::new(0));
    let client = http_client(hits.clone()).await;

    let err = client.query(QueryOptions::new("{ crash }")).await.unwrap_err();
    match err {
        ClientError::HttpStatus { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
    assert!(client.cache_to_json().await.is_empty());
}

#[tokio::test]
async fn test_http_non_json_body_is_decode_error() {
    let hits = Arc::new(AtomicUsize::new(0));
    let client = http_client(hits).await;

    let err = client.query(QueryOptions::new("{ plain }")).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_http_headers_are_sent() {
    let hits = Arc::new(AtomicUsize::new(0));
    let uri = start_server(hits).await;
    let client = Client::new(ClientConfig::new(uri).with_header("Authorization", "Bearer token")).unwrap();

    let default_auth = client.mutation(MutationOptions::new("{ whoami }")).await.unwrap();
    assert_eq!(default_auth.data.unwrap()["whoami"], "Bearer token");

    let override_auth = client
        .mutation(MutationOptions::new("{ whoami }").header("authorization", "Bearer other"))
        .await
        .unwrap();
    assert_eq!(override_auth.data.unwrap()["whoami"], "Bearer other");
}

#[tokio::test]
async fn test_http_mutations_always_hit_network() {
    let hits = Arc::new(AtomicUsize::new(0));
    let client = http_client(hits.clone()).await;

    for _ in 0..4 {
        client.mutation(MutationOptions::new(HERO)).await.unwrap();
    }

    assert_eq!(hits.load(Ordering::SeqCst), 4);
    assert!(client.cache_to_json().await.is_empty());
}

// == Cache Lifecycle Tests ==

#[tokio::test]
async fn test_hero_scenario_with_one_second_ttl() {
    let transport = Arc::new(CountingTransport::default());
    let client = Client::new(
        ClientConfig::new("http://localhost/graphql")
            .with_transport(transport.clone())
            .with_cache_duration(Duration::from_millis(1000)),
    )
    .unwrap();

    // t = 0: miss
    let first = client.query(QueryOptions::new(HERO)).await.unwrap();
    assert_eq!(first.data, Some(json!({"hero": {"name": "Luke"}})));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    // t = 500ms: hit
    tokio::time::sleep(Duration::from_millis(500)).await;
    let second = client.query(QueryOptions::new(HERO)).await.unwrap();
    assert_eq!(second.data, Some(json!({"hero": {"name": "Luke"}})));
    assert!(second.errors.is_none());
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    // t = 1500ms: expired, miss again
    tokio::time::sleep(Duration::from_millis(1000)).await;
    client.query(QueryOptions::new(HERO)).await.unwrap();
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_shared_store_between_clients() {
    let shared = cache::shared(CacheStore::new());
    let transport = Arc::new(CountingTransport::default());

    let make_client = || {
        Client::new(
            ClientConfig::new("http://localhost/graphql")
                .with_transport(transport.clone())
                .with_shared_cache(shared.clone()),
        )
        .unwrap()
    };
    let first = make_client();
    let second = make_client();

    first.query(QueryOptions::new(HERO)).await.unwrap();
    second.query(QueryOptions::new(HERO)).await.unwrap();
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    second.clear_cache().await;
    first.query(QueryOptions::new(HERO)).await.unwrap();
    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    assert_eq!(first.cache_stats().await.hits, 1);
}

#[tokio::test]
async fn test_snapshot_roundtrip_through_json_text() {
    let transport = Arc::new(CountingTransport::default());
    let client = Client::new(
        ClientConfig::new("http://localhost/graphql")
            .with_transport(transport.clone())
            .with_cache_duration(Duration::from_secs(60)),
    )
    .unwrap();

    client.query(QueryOptions::new(HERO)).await.unwrap();
    client
        .query(QueryOptions::new(HERO).variables(json!({"id": 7})))
        .await
        .unwrap();

    let text = cache::snapshot_to_string(&client.cache_to_json().await).unwrap();
    let records = cache::snapshot_from_str(&text).unwrap();
    assert_eq!(records.len(), 2);

    let mut restored = CacheStore::from_serializable(records);
    assert_eq!(
        restored.get(derive_cache_key(HERO, None)),
        Some(json!({"hero": {"name": "Luke"}}))
    );
    assert!(restored.get(derive_cache_key(HERO, Some(&json!({"id": 7})))).is_some());
}

#[tokio::test]
async fn test_concurrent_identical_queries_are_not_deduplicated() {
    struct SlowTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for SlowTransport {
        async fn send(&self, _request: TransportRequest) -> Result<Value> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(json!({"data": {"n": n}}))
        }
    }

    let transport = Arc::new(SlowTransport {
        calls: AtomicUsize::new(0),
    });
    let client = Client::new(
        ClientConfig::new("http://localhost/graphql").with_transport(transport.clone()),
    )
    .unwrap();

    let (a, b) = tokio::join!(
        client.query(QueryOptions::new(HERO)),
        client.query(QueryOptions::new(HERO))
    );
    a.unwrap();
    b.unwrap();

    assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    assert_eq!(client.cache_to_json().await.len(), 1);
}
