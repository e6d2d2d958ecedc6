//! `bad-apples suggest`: drive the search-suggest widget from stdin.
//!
//! Each line is the input's full text after a keystroke. Lines starting with `:` are
//! widget events instead. The dropdown is reprinted to stdout whenever it changes.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use badapples_core::config::Config;
use badapples_core::suggest::{ClickTarget, Dropdown, InputEffect, SearchSuggest, SuggestConfig};
use badapples_core::SearchBackend;

const DRAIN_POLL: Duration = Duration::from_millis(20);

enum Event<'a> {
    Input(&'a str),
    Click(ClickTarget),
    Show,
    Quit,
    Unknown(&'a str),
}

fn parse_event(line: &str) -> Event<'_> {
    match line.strip_prefix(':') {
        None => Event::Input(line),
        Some("click-outside") => Event::Click(ClickTarget::Outside),
        Some("click-input") => Event::Click(ClickTarget::Input),
        Some("click-dropdown") => Event::Click(ClickTarget::Dropdown),
        Some("show") => Event::Show,
        Some("quit") => Event::Quit,
        Some(other) => Event::Unknown(other),
    }
}

fn print_dropdown(dropdown: &Dropdown) {
    match (&dropdown.query, dropdown.visible) {
        (_, false) => println!("-- dropdown hidden"),
        (Some(query), true) => println!("-- results for \"{query}\"\n{}", dropdown.text()),
        (None, true) => println!("{}", dropdown.text()),
    }
}

pub async fn run<B: SearchBackend>(backend: B, config: &Config) {
    let mut widget = SearchSuggest::new(backend, SuggestConfig::from(config));
    let mut rx = widget.subscribe();

    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let dropdown = rx.borrow_and_update().clone();
            print_dropdown(&dropdown);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Failed to read stdin: {e}");
                break;
            }
        };

        match parse_event(&line) {
            Event::Input(raw) => {
                if let InputEffect::Scheduled(query) = widget.on_input(raw) {
                    debug!(query = query.as_str(), "Scheduled");
                }
            }
            Event::Click(target) => {
                widget.on_outside_click(target);
            }
            Event::Show => {
                if !widget.show() {
                    eprintln!("Nothing to show");
                }
            }
            Event::Quit => break,
            Event::Unknown(name) => eprintln!("Unknown event ':{name}'"),
        }
    }

    // Let the last keystroke's timer and any request in flight finish.
    let deadline = tokio::time::Instant::now() + config.debounce + config.timeout;
    while widget.is_busy() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL).await;
    }

    // Dropping the last sender ends the printer once it has shown the final state.
    drop(widget);
    if tokio::time::timeout(Duration::from_secs(1), printer).await.is_err() {
        debug!("Printer still waiting on an abandoned request");
    }
}
