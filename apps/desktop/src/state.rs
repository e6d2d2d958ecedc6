//! Global application state using Dioxus signals.

use badapples_core::config::Config;
use badapples_core::suggest::Dropdown;
use badapples_core::toast::ToastStack;
use dioxus::prelude::*;

/// Resolved config — taken from [`crate::INITIAL_CONFIG`] on first read
pub static CONFIG: GlobalSignal<Config> = Signal::global(|| {
    crate::INITIAL_CONFIG
        .lock()
        .ok()
        .and_then(|slot| slot.clone())
        .unwrap_or_default()
});

/// Current text of the search input
pub static QUERY: GlobalSignal<String> = Signal::global(String::new);

/// Mirror of the widget's dropdown, updated on every change
pub static DROPDOWN: GlobalSignal<Dropdown> = Signal::global(Dropdown::default);

/// Notifications shown in the top-right corner
pub static TOASTS: GlobalSignal<ToastStack> = Signal::global(ToastStack::new);

/// Requests issued since launch
pub static REQUESTS: GlobalSignal<usize> = Signal::global(|| 0);
