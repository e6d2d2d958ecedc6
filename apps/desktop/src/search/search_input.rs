//! Search input wired to the widget's debounce.

use badapples_core::suggest::{ClickTarget, InputEffect};
use dioxus::prelude::*;

use super::Widget;
use crate::state::*;

#[component]
pub fn SearchInput() -> Element {
    let mut widget: Widget = use_context();
    let query = QUERY.read();
    let min_len = CONFIG.read().min_query_len;

    rsx! {
        div {
            class: "input-group",
            span {
                class: "input-group-text",
                i { class: "fas fa-search" }
            }
            input {
                class: "form-control",
                id: "live-search",
                r#type: "search",
                name: "q",
                autocomplete: "off",
                placeholder: "Search officers, incidents, vehicles...",
                value: "{query}",
                autofocus: true,
                oninput: move |e: Event<FormData>| {
                    let value = e.value();
                    *QUERY.write() = value.clone();
                    if let Some(w) = widget.write().as_mut() {
                        if let InputEffect::Scheduled(q) = w.on_input(&value) {
                            tracing::debug!(query = q.as_str(), "Live search scheduled");
                        }
                    }
                },
                onfocus: move |_| {
                    if let Some(w) = widget.read().as_ref() {
                        w.show();
                    }
                },
                onclick: move |e: Event<MouseData>| {
                    e.stop_propagation();
                    if let Some(w) = widget.read().as_ref() {
                        w.on_outside_click(ClickTarget::Input);
                    }
                },
            }
        }
        div {
            class: "form-text text-muted",
            "Type at least {min_len} characters"
        }
    }
}
