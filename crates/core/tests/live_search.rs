//! End-to-end tests: widget and HTTP client against a local fake endpoint.

mod helpers;

use badapples_core::client::{HttpSearchClient, SearchBackend, SearchError};
use badapples_core::render::{ERROR_TEXT, NO_PLATE_TEXT, NO_RESULTS_TEXT};
use badapples_core::suggest::{ClickTarget, SearchSuggest, SuggestConfig};
use badapples_core::{Query, SearchOutcome};
use helpers::FakeServer;
use std::time::Duration;
use tokio::time::{sleep, timeout};

fn client(server: &FakeServer) -> HttpSearchClient {
    HttpSearchClient::new(&server.base_url, Duration::from_secs(5)).unwrap()
}

fn query(raw: &str) -> Query {
    Query::parse(raw, 3).unwrap()
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_client_decodes_categorized_results() {
    let server = FakeServer::start().await;
    let result = client(&server).search("smith").await.unwrap();

    assert_eq!(result.officers.len(), 1);
    assert_eq!(result.officers[0].full_name(), "A B");
    assert_eq!(result.incidents[0].incident_type.display(), "Match for smith");
    assert_eq!(result.vehicles[0].license_plate.as_str(), None);
}

#[tokio::test]
async fn test_client_sends_encoded_query() {
    let server = FakeServer::start().await;
    client(&server).search("o'brien & co #5").await.unwrap();
    assert_eq!(server.queries(), vec!["o'brien & co #5"]);
}

#[tokio::test]
async fn test_client_reports_http_status() {
    let server = FakeServer::start().await;
    let err = client(&server).search("boom").await.unwrap_err();
    assert_eq!(err, SearchError::Status(500));
}

#[tokio::test]
async fn test_client_reports_non_json_body() {
    let server = FakeServer::start().await;
    let err = client(&server).search("garbled").await.unwrap_err();
    assert!(matches!(err, SearchError::Decode(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_client_reports_unreachable_endpoint() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpSearchClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = client.search("smith").await.unwrap_err();
    assert!(matches!(err, SearchError::Network(_)), "unexpected error: {err:?}");
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_widget_renders_all_sections() {
    let server = FakeServer::start().await;
    let mut widget = SearchSuggest::new(client(&server), SuggestConfig::default());
    let mut rx = widget.subscribe();

    widget.on_input("  smith ");
    timeout(Duration::from_secs(5), rx.changed()).await.unwrap().unwrap();

    let dropdown = widget.dropdown();
    assert!(dropdown.visible);
    assert_eq!(server.queries(), vec!["smith"]);

    let text = dropdown.text();
    let lines: Vec<&str> = text.lines().collect();
    let vehicle_line = format!("Ford Taurus [{NO_PLATE_TEXT}] -> /officer/1");
    assert_eq!(
        lines,
        vec![
            "Officers",
            "A B [123] -> /officer/1",
            "Incidents",
            "Match for smith A B -> /officer/1",
            "Vehicles",
            vehicle_line.as_str(),
        ]
    );
    assert!(dropdown.html().contains("href=\"/officer/1\""));
}

#[tokio::test]
async fn test_widget_empty_and_failure_placeholders() {
    let server = FakeServer::start().await;
    let widget = SearchSuggest::new(client(&server), SuggestConfig::default());

    widget.on_timer_fire(query("nobody")).await;
    assert_eq!(widget.dropdown().outcome, Some(SearchOutcome::Empty));
    assert_eq!(widget.dropdown().text(), NO_RESULTS_TEXT);

    widget.on_timer_fire(query("boom")).await;
    let dropdown = widget.dropdown();
    assert!(dropdown.visible);
    assert_eq!(dropdown.outcome, Some(SearchOutcome::Failure(SearchError::Status(500))));
    assert_eq!(dropdown.text(), ERROR_TEXT);

    widget.on_timer_fire(query("garbled")).await;
    assert_eq!(widget.dropdown().text(), ERROR_TEXT);
}

#[tokio::test]
async fn test_widget_debounces_rapid_typing() {
    let server = FakeServer::start().await;
    let config = SuggestConfig { debounce: Duration::from_millis(100), min_query_len: 3 };
    let mut widget = SearchSuggest::new(client(&server), config);
    let mut rx = widget.subscribe();

    for partial in ["joh", "john", "johns", "johnso", "johnson"] {
        widget.on_input(partial);
        sleep(Duration::from_millis(20)).await;
    }
    timeout(Duration::from_secs(5), rx.changed()).await.unwrap().unwrap();
    sleep(Duration::from_millis(200)).await;

    assert_eq!(server.queries(), vec!["johnson"]);
    assert_eq!(widget.requests_issued(), 1);
}

#[tokio::test]
async fn test_outside_click_keeps_content() {
    let server = FakeServer::start().await;
    let widget = SearchSuggest::new(client(&server), SuggestConfig::default());
    widget.on_timer_fire(query("smith")).await;
    let rendered = widget.dropdown();

    assert!(widget.on_outside_click(ClickTarget::Outside));
    assert!(!widget.dropdown().visible);
    assert!(widget.show());
    assert_eq!(widget.dropdown(), rendered);
    assert_eq!(server.queries().len(), 1, "re-showing must not query again");
}

/// In-flight requests are never cancelled, so a slow earlier response that resolves
/// after a faster later one replaces it.
#[tokio::test]
async fn test_last_resolved_response_wins() {
    let server = FakeServer::start().await;
    let config = SuggestConfig { debounce: Duration::from_millis(10), min_query_len: 3 };
    let mut widget = SearchSuggest::new(client(&server), config);
    let mut rx = widget.subscribe();

    widget.on_input("slow query");
    sleep(Duration::from_millis(100)).await;
    widget.on_input("fast query");

    timeout(Duration::from_secs(5), rx.changed()).await.unwrap().unwrap();
    assert_eq!(rx.borrow_and_update().query.as_deref(), Some("fast query"));

    timeout(Duration::from_secs(5), rx.changed()).await.unwrap().unwrap();
    assert_eq!(rx.borrow_and_update().query.as_deref(), Some("slow query"));
    assert_eq!(widget.requests_issued(), 2);
}
