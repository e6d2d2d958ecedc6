//! Search panel — live search input with its results dropdown.

mod dropdown;
mod search_input;

use badapples_core::config::Config;
use badapples_core::suggest::{SearchSuggest, SuggestConfig};
use badapples_core::HttpSearchClient;
use dioxus::prelude::*;
use dropdown::SearchDropdown;
use search_input::SearchInput;

/// The one widget instance, shared through context.
pub type Widget = Signal<Option<SearchSuggest<HttpSearchClient>>>;

/// Build the widget for `config`. `None` when the base URL is unusable.
pub fn build_widget(config: &Config) -> Option<SearchSuggest<HttpSearchClient>> {
    match HttpSearchClient::from_config(config) {
        Ok(client) => Some(SearchSuggest::new(client, SuggestConfig::from(config))),
        Err(e) => {
            tracing::warn!(base_url = config.base_url.as_str(), error = %e, "Live search disabled");
            None
        }
    }
}

#[component]
pub fn SearchPanel() -> Element {
    let widget: Widget = use_context();
    let available = widget.read().is_some();

    rsx! {
        div {
            class: "search-panel position-relative",
            SearchInput {}
            if available {
                SearchDropdown {}
            } else {
                div {
                    class: "p-3 text-danger",
                    "Live search is unavailable: check base_url in .badapples.toml"
                }
            }
        }
    }
}
