// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value backends.
//!
//! `FileStore` keeps a single JSON object on disk and writes through on
//! every change. `MemoryStore` is the in-process variant used by tests and
//! by UI-local state; `MemoryStore::offline()` fails every call.

use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Asynchronous key-value storage as exposed by the host platform.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the given keys. Missing keys are absent from the result.
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Value>, AppError>;

    /// Write all entries. Last writer wins.
    async fn set_many(&self, entries: HashMap<String, Value>) -> Result<(), AppError>;

    /// Remove the given keys (idempotent).
    async fn remove(&self, keys: &[&str]) -> Result<(), AppError>;
}

/// In-memory store.
#[derive(Default)]
pub struct MemoryStore {
    entries: Option<DashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Some(DashMap::new()),
        }
    }

    /// A store whose backing platform is gone; every call errors.
    pub fn offline() -> Self {
        Self { entries: None }
    }

    fn entries(&self) -> Result<&DashMap<String, Value>, AppError> {
        self.entries
            .as_ref()
            .ok_or_else(|| AppError::StorageUnavailable("storage offline".to_string()))
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Value>, AppError> {
        let entries = self.entries()?;
        Ok(keys
            .iter()
            .filter_map(|k| entries.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set_many(&self, entries: HashMap<String, Value>) -> Result<(), AppError> {
        let map = self.entries()?;
        for (k, v) in entries {
            map.insert(k, v);
        }
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), AppError> {
        let map = self.entries()?;
        for k in keys {
            map.remove(*k);
        }
        Ok(())
    }
}

/// JSON-file store with an in-memory copy of the document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    doc: Mutex<Map<String, Value>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();

        let doc = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.is_empty() => Map::new(),
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => map,
                Ok(_) | Err(_) => {
                    return Err(AppError::StorageUnavailable(format!(
                        "{} is not a JSON object",
                        path.display()
                    )))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Creating new credential store");
                Map::new()
            }
            Err(e) => {
                return Err(AppError::StorageUnavailable(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, doc: &Map<String, Value>) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(doc)
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;

        // Write to a sibling file then rename, so a crash never leaves half a document.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| AppError::StorageUnavailable(format!("Write failed: {}", e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::StorageUnavailable(format!("Rename failed: {}", e)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Value>, AppError> {
        let doc = self.doc.lock().await;
        Ok(keys
            .iter()
            .filter_map(|k| doc.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn set_many(&self, entries: HashMap<String, Value>) -> Result<(), AppError> {
        let mut doc = self.doc.lock().await;
        let mut next = doc.clone();
        next.extend(entries);
        self.flush(&next).await?;
        *doc = next;
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), AppError> {
        let mut doc = self.doc.lock().await;
        let mut next = doc.clone();
        for k in keys {
            next.remove(*k);
        }
        self.flush(&next).await?;
        *doc = next;
        Ok(())
    }
}
