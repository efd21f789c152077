//! Batch input and output collaborators

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::core::errors::{Result, TranslationError};

/// Supplies the source text of a batch unit
#[async_trait]
pub trait SourceReader: Send + Sync {
    async fn read(&self, id: &str) -> Result<String>;
}

/// Receives the translated text of a batch unit
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn write(&mut self, id: &str, text: &str) -> Result<()>;
}

/// In-memory source and sink, keyed by unit id
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(id.into(), text.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (id, text) in iter {
            store.insert(id, text);
        }
        store
    }
}

#[async_trait]
impl SourceReader for MemoryStore {
    async fn read(&self, id: &str) -> Result<String> {
        self.entries
            .get(id)
            .cloned()
            .ok_or_else(|| TranslationError::file(id, "no such unit"))
    }
}

#[async_trait]
impl OutputSink for MemoryStore {
    async fn write(&mut self, id: &str, text: &str) -> Result<()> {
        self.entries.insert(id.to_string(), text.to_string());
        Ok(())
    }
}
