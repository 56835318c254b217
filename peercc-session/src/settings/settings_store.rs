use crate::error::SettingsError;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Flat key/value store holding the user's persisted settings.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    values: HashMap<String, String>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Settings read from a JSON object on disk.
///
/// String values are returned as-is, anything else (numbers, nested
/// arrays) as its JSON text.
#[derive(Debug, Clone, Default)]
pub struct JsonSettingsStore {
    values: Map<String, Value>,
}

impl JsonSettingsStore {
    pub fn parse(json: &str) -> Result<Self, SettingsError> {
        match serde_json::from_str(json)? {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(SettingsError::NotAnObject),
        }
    }

    pub fn open(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::parse(&content)?;
        info!("Loaded {} settings from {}", store.values.len(), path.display());
        Ok(store)
    }

    /// Like [`open`](Self::open), but a missing or malformed file yields an
    /// empty store so every setting takes its default.
    pub fn open_or_default(path: &Path) -> Self {
        match Self::open(path) {
            Ok(store) => store,
            Err(e) => {
                warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
