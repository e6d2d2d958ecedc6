//! Fake `/api/live_search` backend for integration tests.
//!
//! Serves canned responses on an ephemeral localhost port. Special queries:
//! `boom` answers HTTP 500, `garbled` answers HTML, `nobody` answers empty lists,
//! and queries starting with `slow` are delayed by 300ms.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
struct FakeState {
    queries: Arc<Mutex<Vec<String>>>,
}

pub struct FakeServer {
    pub base_url: String,
    queries: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl FakeServer {
    pub async fn start() -> Self {
        let state = FakeState::default();
        let queries = Arc::clone(&state.queries);

        let app = Router::new().route("/api/live_search", get(live_search)).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind fake server");
        let addr = listener.local_addr().expect("Fake server has no address");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        FakeServer { base_url: format!("http://{addr}"), queries, handle }
    }

    /// Queries received so far, in arrival order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn live_search(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    state.queries.lock().unwrap().push(q.clone());

    if q.starts_with("slow") {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    match q.as_str() {
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable").into_response(),
        "garbled" => {
            ([(header::CONTENT_TYPE, "text/html")], "<html>maintenance</html>").into_response()
        }
        "nobody" => Json(json!({ "officers": [], "incidents": [], "vehicles": [] })).into_response(),
        _ => Json(json!({
            "officers": [
                { "id": 1, "first_name": "A", "last_name": "B", "badge_number": "123" }
            ],
            "incidents": [
                { "officer_id": 1, "incident_type": format!("Match for {q}"), "officer_name": "A B" }
            ],
            "vehicles": [
                { "officer_id": 1, "make": "Ford", "model": "Taurus", "license_plate": null }
            ]
        }))
        .into_response(),
    }
}
