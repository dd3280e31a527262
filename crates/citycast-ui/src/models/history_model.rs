//! Recent searches, newest first, persisted as a JSON array under one key.

use std::sync::Arc;

use citycast_core::HistoryConfig;

use crate::models::autocomplete_model::Effect;
use crate::render;
use crate::storage::{KeyValueStore, StoreError};

/// What the history panel should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub visible: bool,
    pub html: String,
}

pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
    storage_key: String,
    max_items: usize,
}

impl SearchHistory {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &HistoryConfig) -> Self {
        Self {
            store,
            storage_key: config.storage_key.clone(),
            max_items: config.max_items,
        }
    }

    /// Remembered searches, newest first.
    ///
    /// A value that is not a JSON array of strings is logged and treated as empty.
    pub fn entries(&self) -> Result<Vec<String>, StoreError> {
        let Some(raw) = self.store.get(&self.storage_key)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!("Ignoring unreadable search history: {}", e);
                Ok(Vec::new())
            }
        }
    }

    /// Record a search. Blank text is ignored; an existing entry that differs
    /// only in case is replaced and moved to the front.
    pub fn save(&self, city: &str) -> Result<Vec<String>, StoreError> {
        let city = city.trim();
        if city.is_empty() {
            return self.entries();
        }

        let lowered = city.to_lowercase();
        let mut entries = self.entries()?;
        entries.retain(|item| item.to_lowercase() != lowered);
        entries.insert(0, city.to_string());
        entries.truncate(self.max_items);

        self.persist(&entries)?;
        Ok(entries)
    }

    /// Delete one entry (case-insensitive match).
    pub fn remove(&self, city: &str) -> Result<Vec<String>, StoreError> {
        let lowered = city.trim().to_lowercase();
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|item| item.to_lowercase() != lowered);

        if entries.len() != before {
            self.persist(&entries)?;
        }
        Ok(entries)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(&self.storage_key)
    }

    /// A history row was clicked: fill the search box and submit the form.
    pub fn select(&self, city: &str) -> Vec<Effect> {
        vec![Effect::SetInputValue(city.to_string()), Effect::SubmitForm]
    }

    pub fn render(&self) -> Result<HistoryView, StoreError> {
        let entries = self.entries()?;
        Ok(HistoryView {
            visible: !entries.is_empty(),
            html: render::history_rows(&entries),
        })
    }

    fn persist(&self, entries: &[String]) -> Result<(), StoreError> {
        let json = serde_json::to_string(entries)?;
        self.store.set(&self.storage_key, &json)
    }
}
