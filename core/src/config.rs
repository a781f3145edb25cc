//! Connection settings and the key/value storage they persist to.
//!
//! # Design
//! `ClientConfig` always loads: every key missing from storage falls back to
//! a fixed default, so a fresh install talks to the local development
//! services. Storage sits behind `KeyValueStore` so tests use `MemoryStore`
//! and the console uses a JSON-file `FileStore`.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

pub const WORK_URL_KEY: &str = "work-api-url";
pub const COMMS_URL_KEY: &str = "comms-api-url";
pub const ORG_ID_KEY: &str = "org-id";
pub const USER_ID_KEY: &str = "user-id";

pub const DEFAULT_WORK_URL: &str = "http://localhost:8001/api/v1";
pub const DEFAULT_COMMS_URL: &str = "http://localhost:8002/api/v1";
pub const DEFAULT_ORG_ID: &str = "1";
pub const DEFAULT_USER_ID: &str = "1";

/// String key/value persistence for settings.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError>;
}

/// The four connection parameters shared by every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub work_base_url: String,
    pub comms_base_url: String,
    pub org_id: String,
    pub user_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            work_base_url: DEFAULT_WORK_URL.to_string(),
            comms_base_url: DEFAULT_COMMS_URL.to_string(),
            org_id: DEFAULT_ORG_ID.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(
        work_base_url: impl Into<String>,
        comms_base_url: impl Into<String>,
        org_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            work_base_url: work_base_url.into(),
            comms_base_url: comms_base_url.into(),
            org_id: org_id.into(),
            user_id: user_id.into(),
        }
    }

    /// Read all four settings, substituting defaults for missing keys.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let read = |key: &str, default: &str| store.get(key).unwrap_or_else(|| default.to_string());
        Self {
            work_base_url: read(WORK_URL_KEY, DEFAULT_WORK_URL),
            comms_base_url: read(COMMS_URL_KEY, DEFAULT_COMMS_URL),
            org_id: read(ORG_ID_KEY, DEFAULT_ORG_ID),
            user_id: read(USER_ID_KEY, DEFAULT_USER_ID),
        }
    }

    /// Write all four settings. No validation is applied.
    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), ConfigError> {
        store.set(WORK_URL_KEY, &self.work_base_url)?;
        store.set(COMMS_URL_KEY, &self.comms_base_url)?;
        store.set(ORG_ID_KEY, &self.org_id)?;
        store.set(USER_ID_KEY, &self.user_id)?;
        Ok(())
    }
}

/// In-process store; contents vanish with the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Settings kept as a flat JSON object in a single file.
///
/// The file is read once on open and rewritten in full on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open `path`. A missing file starts empty; an unreadable or corrupt one
    /// is logged and also starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_values(&path);
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_values(path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(path = %path.display(), "cannot read settings file: {e}");
            return BTreeMap::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), "ignoring corrupt settings file: {e}");
        BTreeMap::new()
    })
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&*values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_empty_store_yields_defaults() {
        let config = ClientConfig::load(&MemoryStore::new());
        assert_eq!(config.work_base_url, "http://localhost:8001/api/v1");
        assert_eq!(config.comms_base_url, "http://localhost:8002/api/v1");
        assert_eq!(config.org_id, "1");
        assert_eq!(config.user_id, "1");
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn save_then_load_roundtrips_every_field() {
        let store = MemoryStore::new();
        let config = ClientConfig::new("http://w", "http://c", "org-9", "user-3");
        config.save(&store).unwrap();
        assert_eq!(ClientConfig::load(&store), config);
    }

    #[test]
    fn missing_keys_fall_back_individually() {
        let store = MemoryStore::new();
        store.set(ORG_ID_KEY, "42").unwrap();
        let config = ClientConfig::load(&store);
        assert_eq!(config.org_id, "42");
        assert_eq!(config.work_base_url, DEFAULT_WORK_URL);
        assert_eq!(config.user_id, DEFAULT_USER_ID);
    }

    #[test]
    fn save_accepts_values_without_validation() {
        let store = MemoryStore::new();
        let config = ClientConfig::new("not a url", "", "", "x y");
        config.save(&store).unwrap();
        assert_eq!(ClientConfig::load(&store), config);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let config = ClientConfig::new("http://a/api", "http://b/api", "5", "6");
        config.save(&FileStore::open(&path)).unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.path(), path);
        assert_eq!(ClientConfig::load(&reopened), config);
    }

    #[test]
    fn file_store_writes_persisted_key_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        ClientConfig::default().save(&FileStore::open(&path)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["work-api-url"], DEFAULT_WORK_URL);
        assert_eq!(raw["comms-api-url"], DEFAULT_COMMS_URL);
        assert_eq!(raw["org-id"], "1");
        assert_eq!(raw["user-id"], "1");
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();
        let config = ClientConfig::load(&FileStore::open(&path));
        assert_eq!(config, ClientConfig::default());
    }
}
