//! Query and search result types for `/api/live_search`.
//!
//! The endpoint is owned by the backend; records are deserialized loosely so a
//! number where a string was expected, a `null`, or a missing key never fails the
//! whole response.

use reqwest::Url;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A trimmed query long enough to be sent to the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    /// Trim `raw` and accept it when it has at least `min_len` characters.
    pub fn parse(raw: &str, min_len: usize) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < min_len {
            return None;
        }
        Some(Query(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Loosely-typed field
// ---------------------------------------------------------------------------

/// A scalar record field that may arrive as a string, number, boolean, or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Field(Option<String>);

impl Field {
    pub fn new(value: impl Into<String>) -> Self {
        Field(Some(value.into()))
    }

    pub fn null() -> Self {
        Field(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The value, or an empty string when absent.
    pub fn display(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }

    /// The value when present and non-empty, otherwise `fallback`.
    pub fn or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.0.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => fallback,
        }
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::new(value)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Field(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }))
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfficerHit {
    pub id: Field,
    pub first_name: Field,
    pub last_name: Field,
    pub badge_number: Field,
}

impl OfficerHit {
    /// "First Last", without stray spaces when a part is missing.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.display(), self.last_name.display()).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentHit {
    pub officer_id: Field,
    pub incident_type: Field,
    pub officer_name: Field,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleHit {
    pub officer_id: Field,
    pub make: Field,
    pub model: Field,
    pub license_plate: Field,
}

impl VehicleHit {
    pub fn description(&self) -> String {
        format!("{} {}", self.make.display(), self.model.display()).trim().to_string()
    }
}

/// Categorized matches returned by `/api/live_search`, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub officers: Vec<OfficerHit>,
    pub incidents: Vec<IncidentHit>,
    pub vehicles: Vec<VehicleHit>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.officers.is_empty() && self.incidents.is_empty() && self.vehicles.is_empty()
    }

    pub fn total(&self) -> usize {
        self.officers.len() + self.incidents.len() + self.vehicles.len()
    }
}

/// Detail page for an officer record. The id is percent-encoded as a single path segment.
pub fn officer_path(id: &Field) -> String {
    let mut url = Url::parse("http://localhost/officer").expect("static officer URL");
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(id.display());
    }
    url.path().to_string()
}
