//! Column preference persistence
//!
//! The visible column order lives in a single durable key as a JSON array
//! of column ids. Anything that cannot be read back (missing key, store
//! failure, malformed JSON) is treated as "nothing stored" and the default
//! set is used instead.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::layout::{DragEnd, VisibleColumns};
use crate::StoreError;

/// Key holding the visible column order
pub const PREFERENCE_KEY: &str = "gantt_visible_columns";

/// A durable string key-value slot (browser local storage, a file, ...)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one entry
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Decode a stored value. `None` for anything that is not a JSON array of
/// strings; unknown ids inside a valid array are dropped.
pub fn decode(raw: &str) -> Option<VisibleColumns> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(ids) => Some(VisibleColumns::from_ids(ids)),
        Err(e) => {
            warn!(error = %e, "ignoring malformed column preferences");
            None
        }
    }
}

/// Encode a list for storage
pub fn encode(columns: &VisibleColumns) -> String {
    // A list of strings always serializes.
    serde_json::to_string(columns.ids()).unwrap_or_else(|_| "[]".to_string())
}

/// Read the stored list, `None` when nothing usable is stored
pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Option<VisibleColumns> {
    match store.get(PREFERENCE_KEY) {
        Ok(Some(raw)) => decode(&raw),
        Ok(None) => None,
        Err(e) => {
            warn!(error = %e, "column preferences unreadable");
            None
        }
    }
}

/// Stored list or the default set
pub fn load_or_default<S: KeyValueStore + ?Sized>(store: &S) -> VisibleColumns {
    load(store).unwrap_or_default()
}

/// Write the list to the store
pub fn save<S: KeyValueStore + ?Sized>(
    store: &mut S,
    columns: &VisibleColumns,
) -> Result<(), StoreError> {
    store.set(PREFERENCE_KEY, &encode(columns))
}

/// Owner of the visible column list.
///
/// Both drag surfaces mutate the list only through this type, and every
/// change is written to the store immediately. A failed write is logged and
/// the in-memory list stays authoritative.
#[derive(Debug)]
pub struct ColumnPreferences<S: KeyValueStore> {
    store: S,
    columns: VisibleColumns,
}

impl<S: KeyValueStore> ColumnPreferences<S> {
    /// Restore from the store. When nothing usable is stored the default
    /// set is written back, so the key always holds a valid list after the
    /// first open.
    pub fn open(mut store: S) -> Self {
        let columns = match load(&store) {
            Some(columns) => {
                debug!(columns = ?columns.ids(), "column preferences loaded");
                columns
            }
            None => {
                let columns = VisibleColumns::default_set();
                if let Err(e) = save(&mut store, &columns) {
                    warn!(error = %e, "failed to seed column preferences");
                } else {
                    debug!(columns = ?columns.ids(), "column preferences seeded");
                }
                columns
            }
        };
        Self { store, columns }
    }

    pub fn columns(&self) -> &VisibleColumns {
        &self.columns
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Show or hide a column. Returns whether the list changed.
    pub fn toggle(&mut self, id: &str) -> bool {
        let next = self.columns.toggle(id);
        self.commit(next)
    }

    /// Move a column. Returns whether the list changed.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let next = self.columns.reorder(from, to);
        self.commit(next)
    }

    /// Apply the end of a drag from either surface
    pub fn apply_drag(&mut self, drag: &DragEnd) -> bool {
        let next = self.columns.apply_drag(drag);
        self.commit(next)
    }

    /// Replace the whole list (normalized)
    pub fn replace<I, T>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.commit(VisibleColumns::from_ids(ids))
    }

    /// Back to the default set
    pub fn reset(&mut self) -> bool {
        self.commit(VisibleColumns::default_set())
    }

    fn commit(&mut self, next: VisibleColumns) -> bool {
        if next == self.columns {
            return false;
        }
        self.columns = next;
        if let Err(e) = save(&mut self.store, &self.columns) {
            warn!(error = %e, "failed to persist column preferences");
        }
        true
    }
}
