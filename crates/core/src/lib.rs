//! Bad Apples client core: live search suggestions, result rendering, and the
//! form helpers used by the record-management front ends.
//!
//! # Modules
//!
//! - [`suggest`] — Search-suggest widget: debounce timer, dropdown state, outside-click dismissal
//! - [`client`] — `/api/live_search` client and the [`client::SearchBackend`] seam
//! - [`types`] — Query and loosely-typed search result records
//! - [`outcome`] — Tagged search outcome (results, empty, failure)
//! - [`view`] — Typed view tree with escaping HTML and plain-text renderers
//! - [`render`] — Dropdown markup for search outcomes
//! - [`autosave`] — Per-form field persistence keyed by `form-field`
//! - [`forms`] — Upload checks, character counter, form validation
//! - [`toast`] — Toast notifications
//! - [`format`] — Currency and date formatting
//! - [`config`] — `.badapples.toml` loading

pub mod autosave;
pub mod client;
pub mod config;
pub mod format;
pub mod forms;
pub mod outcome;
pub mod render;
pub mod suggest;
pub mod toast;
pub mod types;
pub mod view;

use std::path::PathBuf;

pub use client::{HttpSearchClient, SearchBackend, SearchError};
pub use config::{load_config, Config};
pub use outcome::SearchOutcome;
pub use suggest::{ClickTarget, Dropdown, SearchSuggest, SuggestConfig};
pub use types::{Query, SearchResult};

// ---------------------------------------------------------------------------
// Cross-platform path helpers
// ---------------------------------------------------------------------------

/// Platform-aware home directory: `HOME` on Unix, `USERPROFILE` on Windows.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")).ok().map(PathBuf::from)
}

/// Platform-aware config directory: `~/.badapples` on Unix, `%APPDATA%/badapples` on Windows.
pub fn config_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        std::env::var("APPDATA").ok().map(|a| PathBuf::from(a).join("badapples"))
    } else {
        home_dir().map(|h| h.join(".badapples"))
    }
}

/// Platform-aware data directory: `~/.local/share/badapples` on Unix, `%LOCALAPPDATA%/badapples` on Windows.
pub fn data_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        std::env::var("LOCALAPPDATA")
            .or_else(|_| std::env::var("APPDATA"))
            .ok()
            .map(|a| PathBuf::from(a).join("badapples"))
    } else {
        home_dir().map(|h| h.join(".local/share/badapples"))
    }
}
