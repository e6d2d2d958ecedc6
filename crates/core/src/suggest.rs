//! Search-suggest widget: debounced live search with a dismissible dropdown.
//!
//! One widget owns one debounce timer and one dropdown. Every input event cancels
//! the pending timer before deciding whether to schedule a new one, so at most one
//! timer is ever pending. When the timer fires the fetch runs in its own task:
//! later keystrokes never abort a request already in flight, and responses are
//! applied in the order they resolve.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::SearchBackend;
use crate::config::Config;
use crate::outcome::SearchOutcome;
use crate::render::render_outcome;
use crate::types::Query;
use crate::view::Node;

// ---------------------------------------------------------------------------
// Configuration and state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestConfig {
    pub debounce: Duration,
    pub min_query_len: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self { debounce: Duration::from_millis(300), min_query_len: 3 }
    }
}

impl From<&Config> for SuggestConfig {
    fn from(config: &Config) -> Self {
        Self { debounce: config.debounce, min_query_len: config.min_query_len }
    }
}

/// Rendered state of the results panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dropdown {
    pub visible: bool,
    /// Query whose response is currently rendered.
    pub query: Option<String>,
    pub outcome: Option<SearchOutcome>,
    pub content: Option<Node>,
}

impl Dropdown {
    pub fn html(&self) -> String {
        self.content.as_ref().map(Node::to_html).unwrap_or_default()
    }

    pub fn text(&self) -> String {
        self.content.as_ref().map(Node::to_text).unwrap_or_default()
    }
}

/// Where a click landed, relative to the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Input,
    Dropdown,
    Outside,
}

/// What an input event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEffect {
    /// Query too short: timer cancelled, dropdown hidden and cleared.
    Cleared,
    /// A request for this query will be issued once the debounce window passes quietly.
    Scheduled(Query),
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Live search widget bound to one input.
///
/// Timer tasks are spawned on the ambient Tokio runtime, so [`SearchSuggest::on_input`]
/// must be called from within one.
pub struct SearchSuggest<B: SearchBackend> {
    backend: Arc<B>,
    config: SuggestConfig,
    pending: Option<JoinHandle<()>>,
    dropdown: Arc<watch::Sender<Dropdown>>,
    requests: Arc<RequestCounts>,
}

#[derive(Debug, Default)]
struct RequestCounts {
    issued: AtomicUsize,
    settled: AtomicUsize,
}

impl<B: SearchBackend> SearchSuggest<B> {
    pub fn new(backend: B, config: SuggestConfig) -> Self {
        Self::with_backend(Arc::new(backend), config)
    }

    pub fn with_backend(backend: Arc<B>, config: SuggestConfig) -> Self {
        let (tx, _rx) = watch::channel(Dropdown::default());
        Self {
            backend,
            config,
            pending: None,
            dropdown: Arc::new(tx),
            requests: Arc::default(),
        }
    }

    pub fn config(&self) -> SuggestConfig {
        self.config
    }

    /// Handle the input's current raw text.
    pub fn on_input(&mut self, raw: &str) -> InputEffect {
        self.cancel_pending();

        let Some(query) = Query::parse(raw, self.config.min_query_len) else {
            self.dropdown.send_if_modified(|d| {
                let changed = d.visible || d.content.is_some();
                *d = Dropdown::default();
                changed
            });
            return InputEffect::Cleared;
        };

        debug!(
            query = query.as_str(),
            delay_ms = self.config.debounce.as_millis() as u64,
            "Scheduling live search"
        );

        let delay = self.config.debounce;
        let backend = Arc::clone(&self.backend);
        let dropdown = Arc::clone(&self.dropdown);
        let requests = Arc::clone(&self.requests);
        let fire = query.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Counted before the timer task ends so the widget never looks idle in between.
            requests.issued.fetch_add(1, Ordering::SeqCst);
            // Detached: cancelling the timer from here on must not abort the fetch.
            tokio::spawn(run_search(backend, dropdown, requests, fire));
        }));

        InputEffect::Scheduled(query)
    }

    /// Issue the request for `query` immediately and apply its outcome.
    pub async fn on_timer_fire(&self, query: Query) {
        self.requests.issued.fetch_add(1, Ordering::SeqCst);
        run_search(
            Arc::clone(&self.backend),
            Arc::clone(&self.dropdown),
            Arc::clone(&self.requests),
            query,
        )
        .await;
    }

    /// Hide the dropdown when the click is outside both the input and the dropdown.
    ///
    /// Returns `true` if the dropdown was hidden by this click.
    pub fn on_outside_click(&self, target: ClickTarget) -> bool {
        if target != ClickTarget::Outside {
            return false;
        }
        self.dropdown.send_if_modified(|d| std::mem::replace(&mut d.visible, false))
    }

    /// Re-show previously rendered content without a new query.
    pub fn show(&self) -> bool {
        self.dropdown.send_if_modified(|d| {
            if d.content.is_none() || d.visible {
                return false;
            }
            d.visible = true;
            true
        })
    }

    pub fn dropdown(&self) -> Dropdown {
        self.dropdown.borrow().clone()
    }

    /// Receiver notified every time the dropdown changes.
    pub fn subscribe(&self) -> watch::Receiver<Dropdown> {
        self.dropdown.subscribe()
    }

    pub fn has_pending_timer(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Number of requests started by this widget.
    pub fn requests_issued(&self) -> usize {
        self.requests.issued.load(Ordering::SeqCst)
    }

    /// Requests issued whose outcome has not been applied yet.
    pub fn requests_in_flight(&self) -> usize {
        let issued = self.requests.issued.load(Ordering::SeqCst);
        issued.saturating_sub(self.requests.settled.load(Ordering::SeqCst))
    }

    /// Whether a timer is pending or a request is still in flight.
    pub fn is_busy(&self) -> bool {
        self.has_pending_timer() || self.requests_in_flight() > 0
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<B: SearchBackend> Drop for SearchSuggest<B> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Fetch and apply one query. The caller has already counted it in `issued`.
async fn run_search<B: SearchBackend>(
    backend: Arc<B>,
    dropdown: Arc<watch::Sender<Dropdown>>,
    requests: Arc<RequestCounts>,
    query: Query,
) {
    debug!(query = query.as_str(), "Issuing live search");

    let response = backend.search(query.as_str()).await;
    if let Err(ref e) = response {
        warn!(query = query.as_str(), error = %e, "Live search failed");
    }

    let outcome = SearchOutcome::from(response);
    let content = render_outcome(&outcome);
    dropdown.send_modify(|d| {
        d.visible = true;
        d.query = Some(query.into_string());
        d.outcome = Some(outcome);
        d.content = Some(content);
    });
    requests.settled.fetch_add(1, Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SearchError;
    use crate::render::{ERROR_TEXT, NO_RESULTS_TEXT};
    use crate::types::{OfficerHit, SearchResult};
    use std::future::Future;
    use std::sync::Mutex;
    use tokio::time::sleep;

    struct StubBackend {
        calls: Mutex<Vec<String>>,
        response: Result<SearchResult, SearchError>,
    }

    impl StubBackend {
        fn returning(response: Result<SearchResult, SearchError>) -> Arc<Self> {
            Arc::new(Self { calls: Mutex::new(Vec::new()), response })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SearchBackend for StubBackend {
        fn search(
            &self,
            query: &str,
        ) -> impl Future<Output = Result<SearchResult, SearchError>> + Send {
            self.calls.lock().unwrap().push(query.to_string());
            let response = self.response.clone();
            async move { response }
        }
    }

    fn one_officer() -> SearchResult {
        SearchResult {
            officers: vec![OfficerHit {
                id: "1".into(),
                first_name: "A".into(),
                last_name: "B".into(),
                badge_number: "123".into(),
            }],
            ..Default::default()
        }
    }

    fn widget(backend: &Arc<StubBackend>) -> SearchSuggest<StubBackend> {
        SearchSuggest::with_backend(Arc::clone(backend), SuggestConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn short_queries_never_issue_requests() {
        let backend = StubBackend::returning(Ok(one_officer()));
        let mut w = widget(&backend);

        for raw in ["", "a", "ab", "  ab  ", "\tab\n"] {
            assert_eq!(w.on_input(raw), InputEffect::Cleared);
        }
        sleep(Duration::from_secs(2)).await;

        assert!(backend.calls().is_empty());
        assert_eq!(w.requests_issued(), 0);
        assert!(!w.dropdown().visible);
    }

    #[tokio::test(start_paused = true)]
    async fn keystrokes_within_window_issue_one_request() {
        let backend = StubBackend::returning(Ok(one_officer()));
        let mut w = widget(&backend);

        w.on_input("smi");
        sleep(Duration::from_millis(200)).await;
        w.on_input("smit");
        sleep(Duration::from_millis(299)).await;
        w.on_input(" smith ");
        assert!(backend.calls().is_empty());
        assert!(w.has_pending_timer());

        sleep(Duration::from_millis(301)).await;
        assert_eq!(backend.calls(), vec!["smith"]);
        assert_eq!(w.requests_issued(), 1);
        assert_eq!(w.requests_in_flight(), 0);
        assert!(!w.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn each_quiet_period_issues_its_own_request() {
        let backend = StubBackend::returning(Ok(one_officer()));
        let mut w = widget(&backend);

        w.on_input("jones");
        sleep(Duration::from_millis(350)).await;
        w.on_input("jonesy");
        sleep(Duration::from_millis(350)).await;

        assert_eq!(backend.calls(), vec!["jones", "jonesy"]);
    }

    #[tokio::test(start_paused = true)]
    async fn shortening_the_query_cancels_the_timer() {
        let backend = StubBackend::returning(Ok(one_officer()));
        let mut w = widget(&backend);

        w.on_input("abc");
        sleep(Duration::from_millis(100)).await;
        w.on_input("ab");
        sleep(Duration::from_secs(1)).await;

        assert!(backend.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn results_render_and_show_dropdown() {
        let backend = StubBackend::returning(Ok(one_officer()));
        let mut w = widget(&backend);
        let mut rx = w.subscribe();

        w.on_input("abc");
        rx.changed().await.unwrap();

        let dropdown = rx.borrow().clone();
        assert!(dropdown.visible);
        assert_eq!(dropdown.query.as_deref(), Some("abc"));
        assert_eq!(dropdown.outcome, Some(SearchOutcome::Results(one_officer())));
        assert_eq!(dropdown.text(), "Officers\nA B [123] -> /officer/1");
    }

    #[tokio::test]
    async fn empty_response_renders_placeholder() {
        let backend = StubBackend::returning(Ok(SearchResult::default()));
        let w = widget(&backend);

        w.on_timer_fire(Query::parse("zzz", 3).unwrap()).await;

        let dropdown = w.dropdown();
        assert!(dropdown.visible);
        assert_eq!(dropdown.outcome, Some(SearchOutcome::Empty));
        assert_eq!(dropdown.text(), NO_RESULTS_TEXT);
    }

    #[tokio::test]
    async fn failed_request_renders_error_row() {
        let backend = StubBackend::returning(Err(SearchError::Network("refused".into())));
        let w = widget(&backend);

        w.on_timer_fire(Query::parse("abc", 3).unwrap()).await;

        let dropdown = w.dropdown();
        assert!(dropdown.visible);
        assert!(dropdown.outcome.as_ref().unwrap().is_failure());
        assert_eq!(dropdown.text(), ERROR_TEXT);
        assert_eq!(backend.calls().len(), 1, "failures are not retried");
    }

    #[tokio::test]
    async fn outside_click_hides_without_clearing() {
        let backend = StubBackend::returning(Ok(one_officer()));
        let w = widget(&backend);
        w.on_timer_fire(Query::parse("abc", 3).unwrap()).await;
        let before = w.dropdown();

        assert!(!w.on_outside_click(ClickTarget::Input));
        assert!(!w.on_outside_click(ClickTarget::Dropdown));
        assert!(w.dropdown().visible);

        assert!(w.on_outside_click(ClickTarget::Outside));
        let hidden = w.dropdown();
        assert!(!hidden.visible);
        assert_eq!(hidden.content, before.content);

        assert!(w.show());
        assert_eq!(w.dropdown(), before);
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn short_input_hides_and_clears() {
        let backend = StubBackend::returning(Ok(one_officer()));
        let mut w = widget(&backend);
        w.on_timer_fire(Query::parse("abc", 3).unwrap()).await;

        w.on_input("a");
        assert_eq!(w.dropdown(), Dropdown::default());
        assert!(!w.show(), "nothing to re-show after clearing");
    }

    struct SlowBackend;

    impl SearchBackend for SlowBackend {
        fn search(
            &self,
            _query: &str,
        ) -> impl Future<Output = Result<SearchResult, SearchError>> + Send {
            async {
                sleep(Duration::from_secs(1)).await;
                Ok(SearchResult::default())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn busy_from_keystroke_until_response_applied() {
        let mut w = SearchSuggest::new(SlowBackend, SuggestConfig::default());

        w.on_input("abc");
        assert!(w.is_busy());
        assert_eq!(w.requests_in_flight(), 0);

        // Timer has fired and finished; the fetch is still sleeping.
        sleep(Duration::from_millis(400)).await;
        assert!(!w.has_pending_timer());
        assert_eq!(w.requests_issued(), 1);
        assert_eq!(w.requests_in_flight(), 1);
        assert!(w.is_busy());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(w.requests_in_flight(), 0);
        assert!(!w.is_busy());
        assert_eq!(w.dropdown().outcome, Some(SearchOutcome::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_widget_cancels_pending_timer() {
        let backend = StubBackend::returning(Ok(one_officer()));
        let mut w = widget(&backend);
        w.on_input("abc");
        drop(w);
        sleep(Duration::from_secs(1)).await;
        assert!(backend.calls().is_empty());
    }
}
