//! Results dropdown below the search input.

use badapples_core::render::render_outcome_at;
use badapples_core::suggest::ClickTarget;
use dioxus::prelude::*;

use super::Widget;
use crate::state::{CONFIG, DROPDOWN};

/// Renders the widget's latest outcome. Every server-supplied value in it is escaped
/// by the core renderer.
///
/// Item links point at the configured site, not the webview's own origin; the desktop
/// shell hands external http(s) navigations to the system browser.
#[component]
pub fn SearchDropdown() -> Element {
    let widget: Widget = use_context();
    let dropdown = DROPDOWN.read();

    if !dropdown.visible {
        return rsx! {};
    }
    let Some(outcome) = dropdown.outcome.as_ref() else {
        return rsx! {};
    };

    let html = render_outcome_at(outcome, &CONFIG.read().base_url).to_html();
    rsx! {
        div {
            class: "search-dropdown position-absolute w-100 bg-white border rounded shadow",
            onclick: move |e: Event<MouseData>| {
                e.stop_propagation();
                if let Some(w) = widget.read().as_ref() {
                    w.on_outside_click(ClickTarget::Dropdown);
                }
            },
            dangerous_inner_html: "{html}",
        }
    }
}
