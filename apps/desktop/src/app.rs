//! Root application component — navbar, live search, toasts, status bar.

use badapples_core::outcome::SearchOutcome;
use badapples_core::suggest::{ClickTarget, Dropdown};
use badapples_core::toast::{Toast, ToastLevel, ALERT_AUTO_DISMISS};
use dioxus::prelude::*;

use crate::search::{build_widget, SearchPanel, Widget};
use crate::state::*;

static APP_CSS: Asset = asset!("/assets/styles/app.css");

#[component]
pub fn App() -> Element {
    let widget: Widget = use_context_provider(|| Signal::new(build_widget(&CONFIG.read())));

    // Mirror the widget's dropdown into the DROPDOWN signal.
    use_future(move || async move {
        let Some(mut rx) = widget.read().as_ref().map(|w| w.subscribe()) else {
            return;
        };
        while rx.changed().await.is_ok() {
            let dropdown = rx.borrow_and_update().clone();
            let issued = widget.read().as_ref().map_or(0, |w| w.requests_issued());
            on_dropdown_change(dropdown, issued);
        }
    });

    rsx! {
        document::Stylesheet { href: APP_CSS }

        div {
            class: "app-shell",
            // Any click that reaches the shell landed outside the input and dropdown.
            onclick: move |_| {
                if let Some(w) = widget.read().as_ref() {
                    w.on_outside_click(ClickTarget::Outside);
                }
            },

            nav {
                class: "navbar navbar-dark bg-dark px-3",
                span { class: "navbar-brand", "Bad Apples Database" }
            }

            main {
                class: "container py-4",
                SearchPanel {}
            }

            Toasts {}
            StatusBar {}
        }
    }
}

fn on_dropdown_change(dropdown: Dropdown, issued: usize) {
    *REQUESTS.write() = issued;

    let fresh_failure = match (&dropdown.outcome, &DROPDOWN.read().outcome) {
        (Some(SearchOutcome::Failure(_)), Some(SearchOutcome::Failure(_))) => false,
        (Some(SearchOutcome::Failure(_)), _) => true,
        _ => false,
    };
    if fresh_failure {
        if let Some(SearchOutcome::Failure(e)) = &dropdown.outcome {
            show_toast(Toast::new(format!("Live search failed: {e}"), ToastLevel::Danger));
        }
    }

    *DROPDOWN.write() = dropdown;
}

/// Show a toast and hide it again after [`ALERT_AUTO_DISMISS`].
fn show_toast(toast: Toast) {
    let id = TOASTS.write().show(toast);
    spawn(async move {
        tokio::time::sleep(ALERT_AUTO_DISMISS).await;
        TOASTS.write().dismiss(id);
    });
}

#[component]
fn Toasts() -> Element {
    let toasts = TOASTS.read();
    if toasts.is_empty() {
        return rsx! {};
    }
    let html = toasts.to_node().to_html();
    rsx! {
        div { dangerous_inner_html: "{html}" }
    }
}

/// Status bar at the bottom of the app
#[component]
fn StatusBar() -> Element {
    let config = CONFIG.read();
    let requests = REQUESTS.read();
    let dropdown = DROPDOWN.read();

    let summary = match dropdown.outcome.as_ref() {
        Some(SearchOutcome::Results(result)) => format!("{} matches", result.total()),
        Some(SearchOutcome::Empty) => "no matches".to_string(),
        Some(SearchOutcome::Failure(_)) => "last search failed".to_string(),
        None => String::new(),
    };

    rsx! {
        div {
            class: "statusbar",
            span { class: "statusbar-host", "{config.base_url}" }
            span { class: "statusbar-sep", "|" }
            span { "{requests} requests" }
            if !summary.is_empty() {
                span { class: "statusbar-sep", "|" }
                span { "{summary}" }
            }
        }
    }
}
