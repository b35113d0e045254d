//! Durable storage for the session fields.
//!
//! Three JSON-encoded keys survive an application restart: the bearer
//! credential, the user identity and the current tenant context. Reads
//! never fail: a missing or malformed value is treated as absent. Only
//! the session manager and the switch protocol write these keys.

use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

pub const CREDENTIAL_KEY: &str = "auth.credential";
pub const IDENTITY_KEY: &str = "auth.identity";
pub const TENANT_KEY: &str = "auth.tenant";

/// Synchronous key/value store for the session fields.
pub trait DurableStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Option<String>;
    fn put_raw(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

impl dyn DurableStore + '_ {
    /// Decode a stored value. Malformed JSON is absence, not an error.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_raw(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn put_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.put_raw(key, raw),
            Err(err) => tracing::warn!(key, error = %err, "failed to encode value for storage"),
        }
    }
}

/// File-backed store keeping one `<key>.json` file per key under the
/// profile directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DurableStore for FileStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn put_raw(&self, key: &str, value: String) {
        if let Err(err) = std::fs::create_dir_all(&self.dir) {
            tracing::warn!(key, error = %err, "failed to create profile directory");
            return;
        }
        if let Err(err) = std::fs::write(self.path_for(key), value) {
            tracing::warn!(key, error = %err, "failed to persist value");
        }
    }

    fn remove(&self, key: &str) {
        // Missing file counts as removed.
        let _ = std::fs::remove_file(self.path_for(key));
    }
}

/// In-memory store for tests and ephemeral profiles.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl DurableStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn put_raw(&self, key: &str, value: String) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }
}
