//! Bad Apples CLI — live search, form autosave, and upload checks from the terminal.
//!
//! Talks to the record-management site's `/api/live_search` endpoint through
//! `badapples-core`; everything else runs locally.

mod interactive;

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use badapples_core::autosave::{default_store_path, field_id, AutosaveStore, InputKind};
use badapples_core::config::{load_config, load_config_file, Config};
use badapples_core::format::{format_currency, format_date};
use badapples_core::forms::{
    check_upload, is_image, CharCounter, FormValidator, Rule, DELETE_CONFIRMATION,
};
use badapples_core::render::render_outcome_at;
use badapples_core::toast::{Toast, ToastLevel};
use badapples_core::{HttpSearchClient, Query, SearchBackend, SearchOutcome};

/// Bad Apples CLI — live search and form helpers for the record-management site.
#[derive(Parser)]
#[command(name = "bad-apples", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Site origin serving /api/live_search (overrides config and BADAPPLES_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Config file (default: ./.badapples.toml, then ~/.badapples/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one live search and print the dropdown
    Search {
        /// Search query (at least the configured minimum length after trimming)
        query: String,

        /// Print the dropdown markup instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Drive the search-suggest widget from stdin, one input state per line
    ///
    /// Special lines: `:click-outside`, `:click-input`, `:click-dropdown`, `:show`, `:quit`.
    Suggest,
    /// Inspect or edit saved form fields
    Autosave {
        #[command(subcommand)]
        action: AutosaveAction,

        /// Autosave store file (default: data directory)
        #[arg(long, global = true)]
        store: Option<PathBuf>,
    },
    /// Check whether a file may be uploaded as evidence
    CheckUpload {
        /// File to check
        path: PathBuf,

        /// MIME type of the file, to report whether a preview is shown
        #[arg(long)]
        mime: Option<String>,
    },
    /// Show the character counter for a textarea value
    Count {
        /// The textarea's maxlength
        #[arg(long)]
        max: usize,

        text: String,
    },
    /// Validate form values; exits non-zero when submission would be blocked
    Validate {
        /// Field rules as NAME=RULE[,RULE...] with rules required, email, max:<n>
        #[arg(long = "field", value_name = "NAME=RULES", required = true)]
        fields: Vec<String>,

        /// Submitted value as NAME=VALUE
        #[arg(long = "value", value_name = "NAME=VALUE")]
        values: Vec<String>,
    },
    /// Format values the way the site displays them
    Format {
        #[command(subcommand)]
        value: FormatValue,
    },
    /// Render a toast notification as HTML
    Toast {
        message: String,

        /// info, success, warning, or danger
        #[arg(long, default_value = "info")]
        level: String,
    },
}

/// A form field, identified by its `name` or else its `id`.
#[derive(clap::Args)]
struct FieldArgs {
    /// Field name attribute
    #[arg(long)]
    name: Option<String>,

    /// Field id attribute, used when the field has no name
    #[arg(long)]
    id: Option<String>,
}

impl FieldArgs {
    fn resolve(&self) -> Option<&str> {
        field_id(self.name.as_deref(), self.id.as_deref())
    }
}

#[derive(Subcommand)]
enum AutosaveAction {
    /// Print a saved field value
    Get {
        form: String,

        #[command(flatten)]
        field: FieldArgs,
    },
    /// Save a field value
    Set {
        form: String,
        value: String,

        #[command(flatten)]
        field: FieldArgs,

        #[arg(long, value_enum, default_value = "text")]
        kind: KindArg,
    },
    /// Remove every saved field of a form (as after a successful submit)
    Clear {
        form: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List all saved fields
    List,
}

#[derive(Subcommand)]
enum FormatValue {
    /// US dollar amount
    Currency {
        #[arg(allow_hyphen_values = true)]
        amount: f64,
    },
    /// ISO date or timestamp as a US short date
    Date { value: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Text,
    Textarea,
    Select,
    File,
}

impl From<KindArg> for InputKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Text => InputKind::Text,
            KindArg::Textarea => InputKind::TextArea,
            KindArg::Select => InputKind::Select,
            KindArg::File => InputKind::File,
        }
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

/// Split `NAME=REST` at the first `=`.
fn split_pair(arg: &str) -> Result<(&str, &str), String> {
    match arg.split_once('=') {
        Some((name, rest)) if !name.trim().is_empty() => Ok((name.trim(), rest)),
        _ => Err(format!("expected NAME=..., got '{arg}'")),
    }
}

fn build_validator(fields: &[String]) -> Result<FormValidator, String> {
    let mut validator = FormValidator::new();
    for spec in fields {
        let (name, rules) = split_pair(spec)?;
        let rules = rules
            .split(',')
            .filter(|r| !r.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<Rule>, _>>()?;
        validator = validator.field(name, &rules);
    }
    Ok(validator)
}

fn collect_values(values: &[String]) -> Result<BTreeMap<String, String>, String> {
    values
        .iter()
        .map(|v| split_pair(v).map(|(name, value)| (name.to_string(), value.to_string())))
        .collect()
}

/// Ask on stderr and read a y/N answer from stdin.
fn confirm(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn resolve_config(path: Option<&Path>, base_url: Option<String>) -> Config {
    let mut config = match path {
        Some(path) => load_config_file(path).unwrap_or_else(|e| fail(e)),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            load_config(&cwd)
        }
    };
    if let Some(url) = base_url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    debug!(base_url = config.base_url.as_str(), "Resolved config");
    config
}

fn open_store(store: Option<PathBuf>, config: &Config) -> AutosaveStore {
    let path = store
        .or_else(|| config.autosave_path.clone())
        .map(Ok)
        .unwrap_or_else(default_store_path)
        .unwrap_or_else(|e| fail(e));
    AutosaveStore::open(path).unwrap_or_else(|e| fail(e))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("badapples=warn".parse().unwrap()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.base_url);

    match cli.command {
        Commands::Search { query, html } => {
            let query = Query::parse(&query, config.min_query_len).unwrap_or_else(|| {
                fail(format!("Query must be at least {} characters", config.min_query_len))
            });
            let client = HttpSearchClient::from_config(&config).unwrap_or_else(|e| fail(e));
            let outcome = SearchOutcome::from(client.search(query.as_str()).await);

            if cli.json {
                let output = match &outcome {
                    SearchOutcome::Results(result) => serde_json::to_value(result)
                        .unwrap_or_else(|e| fail(e)),
                    SearchOutcome::Empty => {
                        serde_json::json!({ "officers": [], "incidents": [], "vehicles": [] })
                    }
                    SearchOutcome::Failure(e) => serde_json::json!({ "error": e.to_string() }),
                };
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
            } else {
                let node = render_outcome_at(&outcome, &config.base_url);
                if html {
                    println!("{}", node.to_html());
                } else {
                    println!("{}", node.to_text());
                }
                if let SearchOutcome::Results(result) = &outcome {
                    eprintln!("\n{} results", result.total());
                }
            }

            if let SearchOutcome::Failure(e) = outcome {
                fail(format!("Search failed: {e}"));
            }
        }
        Commands::Suggest => {
            let client = HttpSearchClient::from_config(&config).unwrap_or_else(|e| fail(e));
            interactive::run(client, &config).await;
        }
        Commands::Autosave { action, store } => {
            let mut store = open_store(store, &config);
            match action {
                AutosaveAction::Get { form, field } => {
                    let field = field.resolve().unwrap_or_else(|| fail("Field needs --name or --id"));
                    match store.restore(Some(&form), field, InputKind::Text) {
                        Some(value) => println!("{value}"),
                        None => fail(format!("No saved value for {form}/{field}")),
                    }
                }
                AutosaveAction::Set { form, value, field, kind } => {
                    let field = field.resolve().unwrap_or_else(|| fail("Field needs --name or --id"));
                    let saved = store
                        .record(Some(&form), field, kind.into(), &value)
                        .unwrap_or_else(|e| fail(e));
                    if !saved {
                        eprintln!("File inputs are not autosaved");
                    }
                }
                AutosaveAction::Clear { form, yes } => {
                    if !yes && !confirm(DELETE_CONFIRMATION) {
                        fail("Cancelled");
                    }
                    let removed = store.clear_form(Some(&form)).unwrap_or_else(|e| fail(e));
                    eprintln!("Cleared {removed} saved fields");
                }
                AutosaveAction::List => {
                    if cli.json {
                        let map: serde_json::Map<String, serde_json::Value> = store
                            .entries()
                            .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&map).unwrap());
                    } else {
                        for (key, value) in store.entries() {
                            println!("{key:<40} {value}");
                        }
                        eprintln!("\n{} saved fields in {}", store.len(), store.path().display());
                    }
                }
            }
        }
        Commands::CheckUpload { path, mime } => {
            let metadata = std::fs::metadata(&path)
                .unwrap_or_else(|e| fail(format!("Could not read {}: {e}", path.display())));
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("upload");
            match check_upload(name, metadata.len()) {
                Ok(info) => {
                    if cli.json {
                        let output = serde_json::json!({
                            "name": info.name,
                            "size_bytes": info.size_bytes,
                            "size_mb": info.size_mb,
                            "preview": mime.as_deref().is_some_and(is_image),
                        });
                        println!("{}", serde_json::to_string_pretty(&output).unwrap());
                    } else {
                        println!("{}", info.message());
                        if mime.as_deref().is_some_and(is_image) {
                            println!("Image preview available");
                        }
                    }
                }
                Err(e) => fail(e),
            }
        }
        Commands::Count { max, text } => {
            let status = CharCounter::new(max).status(&text);
            if cli.json {
                let output = serde_json::json!({ "text": status.text, "class": status.level.class() });
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
            } else {
                println!("{}\t{}", status.text, status.level.class());
            }
        }
        Commands::Validate { fields, values } => {
            let validator = build_validator(&fields).unwrap_or_else(|e| fail(e));
            let values = collect_values(&values).unwrap_or_else(|e| fail(e));
            let validation = validator.validate(&values);

            if cli.json {
                let errors: Vec<_> = validation
                    .errors
                    .iter()
                    .map(|e| serde_json::json!({ "field": e.field, "message": e.message }))
                    .collect();
                let output = serde_json::json!({
                    "class": validation.form_class(),
                    "submit": validation.allows_submit(),
                    "errors": errors,
                });
                println!("{}", serde_json::to_string_pretty(&output).unwrap());
            } else {
                for error in &validation.errors {
                    println!("{}: {}", error.field, error.message);
                }
            }

            if !validation.allows_submit() {
                fail(format!("{} invalid fields; submission blocked", validation.errors.len()));
            }
            eprintln!("Form is valid");
        }
        Commands::Format { value } => match value {
            FormatValue::Currency { amount } => println!("{}", format_currency(amount)),
            FormatValue::Date { value } => {
                let formatted = format_date(&value)
                    .unwrap_or_else(|e| fail(format!("Invalid date '{value}': {e}")));
                println!("{formatted}");
            }
        },
        Commands::Toast { message, level } => {
            let level: ToastLevel = level.parse().unwrap_or_else(|e: String| fail(e));
            println!("{}", Toast::new(message, level).to_node().to_html());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validator_from_field_specs() {
        let validator = build_validator(&[
            "email=required,email".to_string(),
            "description=required,max:5".to_string(),
        ])
        .unwrap();
        let values =
            collect_values(&["email=a@b.org".to_string(), "description=too long".to_string()])
                .unwrap();

        let validation = validator.validate(&values);
        assert!(!validation.allows_submit());
        assert_eq!(validation.errors.len(), 1);
        assert_eq!(validation.errors[0].field, "description");
    }

    #[test]
    fn values_keep_everything_after_first_equals() {
        let values = collect_values(&["note=a=b".to_string()]).unwrap();
        assert_eq!(values["note"], "a=b");
        assert!(collect_values(&["=x".to_string()]).is_err());
        assert!(build_validator(&["email=phone".to_string()]).is_err());
    }

    #[test]
    fn autosave_field_prefers_name_over_id() {
        let cli = Cli::try_parse_from([
            "bad-apples", "autosave", "set", "report", "Saw it", "--name", "description", "--id",
            "desc",
        ])
        .unwrap();
        let Commands::Autosave { action: AutosaveAction::Set { field, .. }, .. } = cli.command
        else {
            panic!("expected autosave set");
        };
        assert_eq!(field.resolve(), Some("description"));

        let cli = Cli::try_parse_from(["bad-apples", "autosave", "get", "report", "--id", "desc"])
            .unwrap();
        let Commands::Autosave { action: AutosaveAction::Get { field, .. }, .. } = cli.command
        else {
            panic!("expected autosave get");
        };
        assert_eq!(field.resolve(), Some("desc"));
    }

    #[test]
    fn count_and_validate_parse() {
        let cli = Cli::try_parse_from(["bad-apples", "count", "--max", "10", "hello"]).unwrap();
        assert!(matches!(cli.command, Commands::Count { max: 10, .. }));

        // At least one --field is required.
        assert!(Cli::try_parse_from(["bad-apples", "validate"]).is_err());
    }
}
