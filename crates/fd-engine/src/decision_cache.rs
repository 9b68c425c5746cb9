//! Reviewer decisions keyed by document pair, backed by a JSON file.
//!
//! The file maps `"<sha1(doc1)>|<sha1(doc2)>"` to
//! `{"value": bool, "doc1": ..., "doc2": ...}`. It is loaded once and
//! rewritten in full after each new decision. Write failures are logged and
//! dropped: losing a decision only means the pair gets asked again.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use fd_core::CacheConfig;
use serde::{Deserialize, Serialize};

use crate::file_store::FileStore;
use crate::hash::sha1_hex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub value: bool,
    pub doc1: String,
    pub doc2: String,
}

#[derive(Debug)]
pub struct DecisionCache {
    store: Option<FileStore>,
    symmetric_keys: bool,
    data: BTreeMap<String, Decision>,
}

impl DecisionCache {
    /// Cache that never touches disk.
    pub fn in_memory(symmetric_keys: bool) -> Self {
        Self { store: None, symmetric_keys, data: BTreeMap::new() }
    }

    /// Load from `path`. A missing or unreadable file starts an empty cache.
    pub fn open(path: impl Into<PathBuf>, symmetric_keys: bool) -> Self {
        let store = FileStore::new(path);
        let data = match store.get() {
            Ok(bytes) => match serde_json::from_slice::<BTreeMap<String, Decision>>(&bytes) {
                Ok(data) => {
                    tracing::info!(path = %store.path().display(), decisions = data.len(), "loaded decision cache");
                    data
                }
                Err(e) => {
                    tracing::warn!(path = %store.path().display(), error = %e, "decision cache is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %store.path().display(), "decision cache not found, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!(path = %store.path().display(), error = %e, "cannot read decision cache, starting empty");
                BTreeMap::new()
            }
        };
        Self { store: Some(store), symmetric_keys, data }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::open(config.path.clone(), config.symmetric_keys)
    }

    /// `hash(doc1)|hash(doc2)`. In symmetric mode the two hashes are sorted
    /// first, so argument order no longer matters.
    pub fn key(&self, doc1: &str, doc2: &str) -> String {
        let (h1, h2) = (sha1_hex(doc1), sha1_hex(doc2));
        if self.symmetric_keys && h2 < h1 {
            format!("{h2}|{h1}")
        } else {
            format!("{h1}|{h2}")
        }
    }

    pub fn get(&self, doc1: &str, doc2: &str) -> Option<bool> {
        self.data.get(&self.key(doc1, doc2)).map(|d| d.value)
    }

    /// Remember a decision and rewrite the backing file.
    pub fn record(&mut self, doc1: &str, doc2: &str, value: bool) {
        let key = self.key(doc1, doc2);
        self.data.insert(
            key,
            Decision { value, doc1: doc1.to_string(), doc2: doc2.to_string() },
        );
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Fire-and-forget: the result is logged, never returned.
    fn persist(&self) {
        let Some(store) = &self.store else { return };
        let written = serde_json::to_vec_pretty(&self.data)
            .map_err(std::io::Error::from)
            .and_then(|bytes| store.put(&bytes));
        if let Err(e) = written {
            tracing::warn!(path = %store.path().display(), error = %e, "failed to persist decision cache");
        }
    }
}
