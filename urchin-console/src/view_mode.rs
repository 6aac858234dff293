//! Grid/list view preference
//!
//! A single persisted flag living outside the record store: read once at
//! start, written on toggle. Preference I/O failures are logged and never
//! fatal.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Preference key for the catalog view mode.
pub const VIEW_MODE_KEY: &str = "product_view_mode";

/// How the catalog listing is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Grid,
    #[default]
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    /// Parse a stored value; anything unrecognized falls back to `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "grid" => Some(ViewMode::Grid),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// Key-value preference storage outside the record store.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// JSON-file-backed preferences.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePrefs {
    /// Load preferences from `path`; a missing or unreadable file starts
    /// empty.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(values) => values,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "malformed preference file: {e}");
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };
        Self { path, values }
    }

    fn persist(&self) {
        match serde_json::to_string_pretty(&self.values) {
            Ok(text) => {
                if let Err(e) = std::fs::write(&self.path, text) {
                    tracing::warn!(path = %self.path.display(), "failed to write preferences: {e}");
                }
            }
            Err(e) => tracing::warn!("failed to serialize preferences: {e}"),
        }
    }
}

impl PreferenceStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.persist();
    }
}

/// Read the persisted view mode, defaulting to the list view.
pub fn load_view_mode(prefs: &dyn PreferenceStore) -> ViewMode {
    prefs
        .get(VIEW_MODE_KEY)
        .and_then(|v| ViewMode::parse(&v))
        .unwrap_or_default()
}

/// Persist a view-mode change.
pub fn store_view_mode(prefs: &mut dyn PreferenceStore, mode: ViewMode) {
    prefs.set(VIEW_MODE_KEY, mode.as_str());
}
