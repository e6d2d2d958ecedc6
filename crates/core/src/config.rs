//! Client configuration loaded from `.badapples.toml`.
//!
//! Lookup order: `<project>/.badapples.toml`, then `~/.badapples/config.toml`,
//! then built-in defaults. `BADAPPLES_URL` overrides the base URL.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "BADAPPLES_URL";

/// Project-local config file name.
pub const CONFIG_FILE_NAME: &str = ".badapples.toml";

/// Known keys in `.badapples.toml` for config validation.
const KNOWN_CONFIG_KEYS: &[&str] =
    &["base_url", "debounce_ms", "min_query_len", "timeout_secs", "autosave_path"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("`{key}` must be {expected}")]
    InvalidValue { key: &'static str, expected: &'static str },
}

/// Runtime configuration shared by the CLI and desktop front ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Origin serving `/api/live_search`.
    pub base_url: String,
    /// Quiet period before a typed query is sent.
    pub debounce: Duration,
    /// Minimum trimmed query length (in characters) that triggers a request.
    pub min_query_len: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Override for the autosave store location.
    pub autosave_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            debounce: Duration::from_millis(300),
            min_query_len: 3,
            timeout: Duration::from_secs(10),
            autosave_path: None,
        }
    }
}

impl Config {
    /// Parse a config document, starting from defaults.
    ///
    /// Unknown keys are reported with `warn!` (with a typo suggestion when one is close)
    /// and otherwise ignored.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = content.parse()?;
        let mut config = Config::default();

        for key in table.keys() {
            if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
                continue;
            }
            match suggest_key(key) {
                Some(suggestion) => warn!(
                    key = key.as_str(),
                    suggestion,
                    "Unknown key in {CONFIG_FILE_NAME}; closest known key is '{suggestion}'"
                ),
                None => warn!(
                    key = key.as_str(),
                    "Unknown key in {CONFIG_FILE_NAME} (known keys: {})",
                    KNOWN_CONFIG_KEYS.join(", ")
                ),
            }
        }

        if let Some(value) = table.get("base_url") {
            let url = value
                .as_str()
                .ok_or(ConfigError::InvalidValue { key: "base_url", expected: "a string" })?;
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(value) = table.get("debounce_ms") {
            let ms = positive_integer(value, "debounce_ms")?;
            config.debounce = Duration::from_millis(ms);
        }

        if let Some(value) = table.get("min_query_len") {
            config.min_query_len = positive_integer(value, "min_query_len")? as usize;
        }

        if let Some(value) = table.get("timeout_secs") {
            config.timeout = Duration::from_secs(positive_integer(value, "timeout_secs")?);
        }

        if let Some(value) = table.get("autosave_path") {
            let path = value
                .as_str()
                .ok_or(ConfigError::InvalidValue { key: "autosave_path", expected: "a string" })?;
            config.autosave_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Apply `BADAPPLES_URL` if it is set and non-empty.
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                debug!(url, "Base URL overridden from environment");
                self.base_url = url.trim_end_matches('/').to_string();
            }
        }
        self
    }
}

fn positive_integer(value: &toml::Value, key: &'static str) -> Result<u64, ConfigError> {
    match value.as_integer() {
        Some(n) if n > 0 => Ok(n as u64),
        _ => Err(ConfigError::InvalidValue { key, expected: "a positive integer" }),
    }
}

/// Simple Levenshtein edit distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Closest known key within an edit distance of 3, if any.
pub fn suggest_key(key: &str) -> Option<&'static str> {
    KNOWN_CONFIG_KEYS
        .iter()
        .map(|known| (*known, edit_distance(key, known)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 3)
        .map(|(known, _)| known)
}

/// Read an explicit config file. Errors are returned, not defaulted.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    Ok(Config::from_toml_str(&content)?.apply_env())
}

/// Load configuration for the given working directory.
///
/// Falls back to the user config file and then to defaults. A file that cannot be read
/// or parsed is skipped with a warning.
pub fn load_config(project_root: &Path) -> Config {
    let candidates = [
        Some(project_root.join(CONFIG_FILE_NAME)),
        crate::config_dir().map(|d| d.join("config.toml")),
    ];

    for path in candidates.into_iter().flatten() {
        if !path.exists() {
            continue;
        }
        debug!(path = %path.display(), "Loading config");
        match std::fs::read_to_string(&path) {
            Ok(content) => match Config::from_toml_str(&content) {
                Ok(config) => return config.apply_env(),
                Err(e) => warn!(path = %path.display(), error = %e, "Ignoring invalid config file"),
            },
            Err(e) => warn!(path = %path.display(), error = %e, "Could not read config file"),
        }
    }

    Config::default().apply_env()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_widget_contract() {
        let config = Config::default();
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.min_query_len, 3);
    }

    #[test]
    fn parses_all_known_keys() {
        let config = Config::from_toml_str(
            r#"
            base_url = "https://badapples.example.org/"
            debounce_ms = 150
            min_query_len = 2
            timeout_secs = 4
            autosave_path = "/tmp/autosave.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://badapples.example.org");
        assert_eq!(config.debounce, Duration::from_millis(150));
        assert_eq!(config.min_query_len, 2);
        assert_eq!(config.timeout, Duration::from_secs(4));
        assert_eq!(config.autosave_path, Some(PathBuf::from("/tmp/autosave.json")));
    }

    #[test]
    fn rejects_non_positive_debounce() {
        let err = Config::from_toml_str("debounce_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "debounce_ms", .. }));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = Config::from_toml_str("debounce = 10").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn suggests_close_keys_only() {
        assert_eq!(suggest_key("debounce"), Some("debounce_ms"));
        assert_eq!(suggest_key("base_ur"), Some("base_url"));
        assert_eq!(suggest_key("completely_unrelated"), None);
    }

    #[test]
    fn project_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "min_query_len = 4").unwrap();
        let config = load_config(dir.path());
        assert_eq!(config.min_query_len, 4);
    }

    #[test]
    fn explicit_file_errors_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(load_config_file(&missing), Err(ConfigError::Read { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "base_url = ").unwrap();
        assert!(matches!(load_config_file(&broken), Err(ConfigError::Parse(_))));
    }
}
