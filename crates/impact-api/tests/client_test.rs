#![allow(clippy::unwrap_used)]
// Integration tests for `ImpactClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use impact_api::{Error, ImpactClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ImpactClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ImpactClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn entity(identifier: &str, index: u32, total: u64) -> serde_json::Value {
    json!({
        "id": format!("id-{identifier}"),
        "identifier": identifier,
        "index": index,
        "total_metrics": total,
        "created_at": "2024-05-01T10:00:00",
        "last_updated_at": "2024-06-01T12:30:00.250000",
        "url": format!("https://example.com/u/{identifier}")
    })
}

// ── Sites ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sites_wrapped() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/supported-sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [{
                "name": "reddit",
                "description": "Reddit users by upvoted posts",
                "entity_name": "User",
                "metric_name": "upvotes",
                "primary_color": "#ff4500",
                "histogram": [
                    { "bucket_start": 0, "bucket_end": 10, "count": 80, "percentage": 80.0 },
                    { "bucket_start": 10, "bucket_end": 20, "count": 20, "percentage": 20.0 }
                ]
            }]
        })))
        .mount(&server)
        .await;

    let sites = client.list_sites().await.unwrap();
    assert_eq!(sites.len(), 1);
    assert_eq!(sites[0].name, "reddit");
    assert_eq!(sites[0].metric_name.as_deref(), Some("upvotes"));
    assert_eq!(sites[0].histogram.len(), 2);
}

#[tokio::test]
async fn test_list_sites_null_response_is_empty() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/supported-sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": null })))
        .mount(&server)
        .await;

    let sites = client.list_sites().await.unwrap();
    assert!(sites.is_empty());
}

// ── Ranking ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ranking_page() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reddit/ranking/2/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": [entity("alice", 42, 12_000), entity("bob", 40, 9_000)],
            "pagination": { "page": 2, "per_page": 10, "total_items": 120, "total_pages": 12 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client.ranking("reddit", 2, 10).await.unwrap();
    assert_eq!(page.entities.len(), 2);
    assert_eq!(page.entities[0].identifier, "alice");
    assert_eq!(page.entities[0].index, 42);
    assert_eq!(page.pagination.total_pages, 12);
    assert_eq!(page.pagination.total_items, 120);
}

#[tokio::test]
async fn test_ranking_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reddit/ranking/1/10"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let result = client.ranking("reddit", 1, 10).await;
    match result {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("database unavailable"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_ranking_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reddit/ranking/1/10"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.ranking("reddit", 1, 10).await;
    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body.contains("oops")),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Profile ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_profile_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reddit/alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "entity": entity("alice", 42, 12_000), "stats": { "percentile": 99.5 } }
        })))
        .mount(&server)
        .await;

    let profile = client.profile("reddit", "alice").await.unwrap();
    let found = profile.entity.unwrap();
    assert_eq!(found.identifier, "alice");
    assert_eq!(found.total_metrics, 12_000);
    assert_eq!(profile.stats.unwrap().percentile, Some(99.5));
}

#[tokio::test]
async fn test_profile_null_entity() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reddit/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "entity": null, "stats": null }
        })))
        .mount(&server)
        .await;

    let profile = client.profile("reddit", "ghost").await.unwrap();
    assert!(profile.entity.is_none());
    assert!(profile.stats.is_none());
}

#[tokio::test]
async fn test_profile_404() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/reddit/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.profile("reddit", "ghost").await.unwrap_err();
    assert!(err.is_not_found(), "expected not-found, got: {err:?}");
}

// ── Search ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_suggestion_list() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/search/reddit"))
        .and(query_param("q", "ali ce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "identifier": "alice", "index": 42, "url": "https://example.com/u/alice" },
            { "identifier": "alicia", "index": 3 }
        ])))
        .mount(&server)
        .await;

    let hits = client.search("reddit", "ali ce").await.unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[1].identifier, "alicia");
    assert!(hits[1].url.is_none());
}

#[tokio::test]
async fn test_search_page_shaped() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/search/reddit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": [entity("bob", 40, 9_000)],
            "pagination": { "page": 1, "per_page": 10, "total_items": 1, "total_pages": 1 }
        })))
        .mount(&server)
        .await;

    let hits = client.search("reddit", "bo").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].index, 40);
}

// ── Timeouts ────────────────────────────────────────────────────────

async fn slow_sites(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/supported-sites"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(server)
        .await;
}

fn impatient_http() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(100))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_injected_client_timeout_is_timeout_error() {
    let server = MockServer::start().await;
    slow_sites(&server).await;

    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ImpactClient::with_client(impatient_http(), base_url);

    let err = client.list_sites().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_secs: 0 }), "{err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_injected_client_reports_declared_timeout() {
    let server = MockServer::start().await;
    slow_sites(&server).await;

    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ImpactClient::with_client(impatient_http(), base_url)
        .with_timeout(std::time::Duration::from_secs(1));

    let err = client.list_sites().await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_secs: 1 }), "{err:?}");
}
