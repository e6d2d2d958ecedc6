//! Form autosave: field values persisted under `form-field` keys until the form is
//! submitted.
//!
//! The store is a flat JSON object on disk. Every mutation rewrites the file through a
//! temporary sibling and a rename, so a crash never leaves a half-written store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Form id used when the form element has none.
pub const DEFAULT_FORM_ID: &str = "default-form";

/// File name of the store inside the data directory.
pub const STORE_FILE_NAME: &str = "autosave.json";

#[derive(Debug, Error)]
pub enum AutosaveError {
    #[error("autosave store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("autosave store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("no data directory available for the autosave store")]
    NoDataDir,
}

/// Kind of form control a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    TextArea,
    Select,
    File,
}

impl InputKind {
    /// File inputs are never saved or restored.
    pub fn is_persistable(self) -> bool {
        self != InputKind::File
    }
}

/// Storage key for a field: `<form_id>-<field_id>`, with [`DEFAULT_FORM_ID`] for anonymous forms.
pub fn storage_key(form_id: Option<&str>, field_id: &str) -> String {
    format!("{}-{field_id}", form_id_or_default(form_id))
}

fn form_id_or_default(form_id: Option<&str>) -> &str {
    match form_id {
        Some(id) if !id.is_empty() => id,
        _ => DEFAULT_FORM_ID,
    }
}

/// A field is identified by its `name`, falling back to its `id`.
pub fn field_id<'a>(name: Option<&'a str>, id: Option<&'a str>) -> Option<&'a str> {
    name.filter(|n| !n.is_empty()).or(id.filter(|i| !i.is_empty()))
}

/// Default store location in the platform data directory.
pub fn default_store_path() -> Result<PathBuf, AutosaveError> {
    crate::data_dir().map(|d| d.join(STORE_FILE_NAME)).ok_or(AutosaveError::NoDataDir)
}

pub struct AutosaveStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl AutosaveStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AutosaveError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "Opened autosave store");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved value to pre-fill a field with. Empty values and file inputs restore nothing.
    pub fn restore(&self, form_id: Option<&str>, field: &str, kind: InputKind) -> Option<&str> {
        if !kind.is_persistable() {
            return None;
        }
        self.entries
            .get(&storage_key(form_id, field))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Save a field's current value. Returns `false` for file inputs, which are skipped.
    pub fn record(
        &mut self,
        form_id: Option<&str>,
        field: &str,
        kind: InputKind,
        value: &str,
    ) -> Result<bool, AutosaveError> {
        if !kind.is_persistable() {
            return Ok(false);
        }
        self.entries.insert(storage_key(form_id, field), value.to_string());
        self.persist()?;
        Ok(true)
    }

    /// Remove every saved field of a form. Returns how many keys were removed.
    pub fn clear_form(&mut self, form_id: Option<&str>) -> Result<usize, AutosaveError> {
        let prefix = format!("{}-", form_id_or_default(form_id));
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(&prefix));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.persist()?;
            info!(form = form_id_or_default(form_id), removed, "Cleared autosaved form");
        }
        Ok(removed)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), AutosaveError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
