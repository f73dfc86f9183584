// src/search/saved.rs

use crate::errors::ServerError;
use crate::search::codec;
use crate::search::query::QueryRepresentation;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Key under which the whole saved-search list is stored.
pub const SAVED_SEARCHES_KEY: &str = "saved_searches";

/// Name given to a saved search when there is no search term.
pub const GENERAL_SEARCH_NAME: &str = "General Search";

/// Small synchronous key/value store owned by one visitor.
pub trait PersistentStore {
    fn read(&self, key: &str) -> Result<Option<String>, ServerError>;
    fn write(&self, key: &str, value: &str) -> Result<(), ServerError>;
}

impl<T: PersistentStore + ?Sized> PersistentStore for &T {
    fn read(&self, key: &str) -> Result<Option<String>, ServerError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), ServerError> {
        (**self).write(key, value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    /// Creation time in milliseconds; unique within one visitor's list.
    pub id: i64,
    pub name: String,
    pub query: QueryRepresentation,
    /// RFC 3339 creation time.
    pub timestamp: String,
    /// Active facet count at save time (display only).
    pub filters: usize,
}

impl SavedSearch {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved(SavedSearch),
    Duplicate,
    NothingToSave,
}

impl SaveOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            SaveOutcome::Saved(_) => Some(Notice::Saved),
            SaveOutcome::Duplicate => Some(Notice::AlreadySaved),
            SaveOutcome::NothingToSave => None,
        }
    }
}

/// One-shot message shown after a save attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Saved,
    AlreadySaved,
}

impl Notice {
    pub fn as_str(self) -> &'static str {
        match self {
            Notice::Saved => "saved",
            Notice::AlreadySaved => "duplicate",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "saved" => Some(Notice::Saved),
            "duplicate" => Some(Notice::AlreadySaved),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Notice::Saved => "Searched results are saved",
            Notice::AlreadySaved => "This search is already saved",
        }
    }
}

/// Saved searches, newest first. The in-memory list mirrors the store and is
/// written through on every change.
pub struct SavedSearchStore<S> {
    store: S,
    entries: Vec<SavedSearch>,
}

impl<S: PersistentStore> SavedSearchStore<S> {
    /// Reads the list once. A missing, unreadable or corrupt entry loads as
    /// an empty list.
    pub fn load(store: S) -> Self {
        let entries = match store.read(SAVED_SEARCHES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "saved searches are not valid JSON; starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read saved searches; starting empty");
                Vec::new()
            }
        };
        Self { store, entries }
    }

    pub fn list(&self) -> &[SavedSearch] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&SavedSearch> {
        self.entries.iter().find(|s| s.id == id)
    }

    /// Saves `query` (minus `page`) at the head of the list.
    ///
    /// Nothing is stored when there is neither a display name nor an active
    /// facet, or when an entry with the same keys and values already exists.
    pub fn save(
        &mut self,
        query: &QueryRepresentation,
        display_name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SaveOutcome, ServerError> {
        let candidate = query.without_page();
        let filters = codec::decode(&candidate).facet_count();
        let display_name = display_name.map(str::trim).filter(|n| !n.is_empty());

        if display_name.is_none() && filters == 0 {
            return Ok(SaveOutcome::NothingToSave);
        }

        if self
            .entries
            .iter()
            .any(|s| s.query.without_page() == candidate)
        {
            return Ok(SaveOutcome::Duplicate);
        }

        let next_free = self.entries.iter().map(|s| s.id + 1).max();
        let id = next_free.map_or(now.timestamp_millis(), |n| n.max(now.timestamp_millis()));

        let saved = SavedSearch {
            id,
            name: display_name.unwrap_or(GENERAL_SEARCH_NAME).to_string(),
            query: candidate,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            filters,
        };

        self.entries.insert(0, saved.clone());
        if let Err(e) = self.persist() {
            self.entries.remove(0);
            return Err(e);
        }
        Ok(SaveOutcome::Saved(saved))
    }

    /// Removes the entry with `id`. Unknown ids are a no-op.
    pub fn delete(&mut self, id: i64) -> Result<(), ServerError> {
        let Some(pos) = self.entries.iter().position(|s| s.id == id) else {
            return Ok(());
        };
        let removed = self.entries.remove(pos);
        if let Err(e) = self.persist() {
            self.entries.insert(pos, removed);
            return Err(e);
        }
        Ok(())
    }

    /// The stored query, verbatim, for the caller to navigate to.
    pub fn apply(&self, id: i64) -> Option<QueryRepresentation> {
        self.get(id).map(|s| s.query.clone())
    }

    fn persist(&self) -> Result<(), ServerError> {
        let json = serde_json::to_string(&self.entries)
            .map_err(|e| ServerError::DbError(format!("encode saved searches failed: {e}")))?;
        self.store.write(SAVED_SEARCHES_KEY, &json)
    }
}
