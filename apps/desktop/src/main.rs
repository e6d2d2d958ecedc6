//! Bad Apples Desktop — Dioxus front end for the officer accountability database.

use std::sync::Mutex;

use dioxus::prelude::*;

mod app;
mod search;
mod state;

use app::App;
use badapples_core::config::{load_config, Config};

/// Config resolved before Dioxus launches, read into the `CONFIG` signal on first render.
pub static INITIAL_CONFIG: Mutex<Option<Config>> = Mutex::new(None);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("badapples=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cwd = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    let config = load_config(&cwd);
    tracing::info!(base_url = config.base_url.as_str(), "Starting desktop app");
    if let Ok(mut slot) = INITIAL_CONFIG.lock() {
        *slot = Some(config);
    }

    #[cfg(feature = "desktop")]
    {
        use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

        LaunchBuilder::new()
            .with_cfg(
                Config::default()
                    .with_menu(None)
                    .with_background_color((248, 249, 250, 255))
                    .with_window(
                        WindowBuilder::new()
                            .with_title("Bad Apples Database")
                            .with_inner_size(LogicalSize::new(1100.0, 760.0))
                            .with_min_inner_size(LogicalSize::new(640.0, 420.0))
                            .with_resizable(true),
                    ),
            )
            .launch(App);
    }

    #[cfg(not(feature = "desktop"))]
    {
        dioxus::launch(App);
    }
}
