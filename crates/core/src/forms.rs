//! Form helpers: upload checks, textarea character counter, and client-side validation.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Largest accepted upload, in megabytes.
pub const MAX_UPLOAD_MB: u64 = 16;
pub const MAX_UPLOAD_BYTES: u64 = MAX_UPLOAD_MB * 1024 * 1024;

/// Prompt shown before a destructive action.
pub const DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this item? This action cannot be undone.";

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("File size ({size_mb}MB) exceeds maximum allowed size ({max_mb}MB)")]
    TooLarge { size_mb: String, max_mb: u64 },
}

/// A file accepted for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadInfo {
    pub name: String,
    pub size_bytes: u64,
    pub size_mb: String,
}

impl UploadInfo {
    /// Confirmation shown under the file input.
    pub fn message(&self) -> String {
        format!("Selected: {} ({}MB)", self.name, self.size_mb)
    }
}

/// Size in megabytes with two decimals.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / 1024.0 / 1024.0)
}

pub fn check_upload(name: &str, size_bytes: u64) -> Result<UploadInfo, UploadError> {
    let size_mb = format_megabytes(size_bytes);
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size_mb, max_mb: MAX_UPLOAD_MB });
    }
    Ok(UploadInfo { name: name.to_string(), size_bytes, size_mb })
}

/// Whether a file with this MIME type gets an inline preview.
pub fn is_image(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

// ---------------------------------------------------------------------------
// Character counter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterLevel {
    Muted,
    Warning,
    Danger,
}

impl CounterLevel {
    pub fn class(self) -> &'static str {
        match self {
            CounterLevel::Muted => "form-text text-muted",
            CounterLevel::Warning => "form-text text-warning",
            CounterLevel::Danger => "form-text text-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterStatus {
    pub text: String,
    pub level: CounterLevel,
}

/// Live `n/max characters` counter for a textarea with a `maxlength`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCounter {
    pub max: usize,
}

impl CharCounter {
    pub fn new(max: usize) -> Self {
        Self { max }
    }

    pub fn status(&self, value: &str) -> CounterStatus {
        let len = value.chars().count();
        // Warn above 90% of the limit; integer form of `len > max * 0.9`.
        let level = if len > self.max {
            CounterLevel::Danger
        } else if len * 10 > self.max * 9 {
            CounterLevel::Warning
        } else {
            CounterLevel::Muted
        };
        CounterStatus { text: format!("{len}/{} characters", self.max), level }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    MaxLength(usize),
}

/// Parses `required`, `email`, and `max:<n>`.
impl std::str::FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "required" => Ok(Rule::Required),
            "email" => Ok(Rule::Email),
            _ => match s.strip_prefix("max:") {
                Some(n) => n
                    .parse()
                    .map(Rule::MaxLength)
                    .map_err(|_| format!("invalid length in rule '{s}'")),
                None => Err(format!("unknown rule '{s}' (expected required, email, max:<n>)")),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

/// Result of validating a submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub errors: Vec<FieldError>,
}

impl Validation {
    /// Submission is blocked while any field is invalid.
    pub fn allows_submit(&self) -> bool {
        self.errors.is_empty()
    }

    /// Class added to the form after a submit attempt, valid or not.
    pub fn form_class(&self) -> &'static str {
        "was-validated"
    }

    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Declarative validator for a form's fields.
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    fields: Vec<(String, Vec<Rule>)>,
}

impl FormValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, rules: &[Rule]) -> Self {
        self.fields.push((name.to_string(), rules.to_vec()));
        self
    }

    /// Check `values` against every rule. Missing fields count as empty.
    pub fn validate(&self, values: &BTreeMap<String, String>) -> Validation {
        let mut errors = Vec::new();
        for (name, rules) in &self.fields {
            let value = values.get(name).map(|v| v.trim()).unwrap_or("");
            for rule in rules {
                let message = match *rule {
                    Rule::Required if value.is_empty() => Some("This field is required.".to_string()),
                    Rule::Email if !value.is_empty() && !email_regex().is_match(value) => {
                        Some("Enter a valid email address.".to_string())
                    }
                    Rule::MaxLength(max) if value.chars().count() > max => {
                        Some(format!("Use at most {max} characters."))
                    }
                    _ => None,
                };
                if let Some(message) = message {
                    errors.push(FieldError { field: name.clone(), rule: *rule, message });
                }
            }
        }
        Validation { errors }
    }
}
