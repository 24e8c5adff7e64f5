//! The normalized, deduplicated word catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::model::{normalize_word, CatalogEntry, Language};

/// A learnable word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Normalized key, unique within the catalog.
    pub key: String,
    /// Original display string.
    pub display: String,
    /// Identifier inside the source package.
    pub catalog_id: String,
    /// Image variants; never empty.
    pub images: Vec<String>,
}

/// All words of one loaded package.
#[derive(Debug, Clone)]
pub struct WordCatalog {
    language: Language,
    words: HashMap<String, Word>,
    /// Full-catalog key index in load order, used for distractors.
    keys: Vec<String>,
}

impl WordCatalog {
    /// Build a catalog from raw source entries.
    ///
    /// Entries without images or with an empty key are skipped. When two
    /// entries normalize to the same key the first one wins.
    pub fn from_entries(
        entries: Vec<CatalogEntry>,
        language: Language,
    ) -> Result<Self, SessionError> {
        let mut words = HashMap::new();
        let mut keys = Vec::new();

        for entry in entries {
            if entry.images.is_empty() {
                tracing::debug!(id = %entry.catalog_id, "skipping entry without images");
                continue;
            }
            let key = normalize_word(&entry.raw_word, language);
            if key.is_empty() {
                tracing::debug!(id = %entry.catalog_id, "skipping entry with empty word");
                continue;
            }
            if words.contains_key(&key) {
                tracing::warn!(
                    key = %key,
                    id = %entry.catalog_id,
                    "duplicate word after normalization, keeping first occurrence"
                );
                continue;
            }
            keys.push(key.clone());
            words.insert(
                key.clone(),
                Word {
                    key,
                    display: entry.raw_word.trim().to_string(),
                    catalog_id: entry.catalog_id,
                    images: entry.images,
                },
            );
        }

        if keys.is_empty() {
            return Err(SessionError::DataUnavailable(format!(
                "no usable {} words in source",
                language.label()
            )));
        }

        tracing::info!(language = %language, words = keys.len(), "catalog loaded");
        Ok(Self {
            language,
            words,
            keys,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn get(&self, key: &str) -> Option<&Word> {
        self.words.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.words.contains_key(key)
    }

    /// Keys in load order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Remove a word and its key-index entry. Unknown keys return `None`.
    pub fn remove(&mut self, key: &str) -> Option<Word> {
        let word = self.words.remove(key)?;
        self.keys.retain(|k| k != key);
        Some(word)
    }
}
