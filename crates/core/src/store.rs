//! The credential store contract.
//!
//! A session's credentials persist in a three-slot key-value store that
//! survives page reloads. The store itself is dumb string storage -
//! everything above it goes through [`CredentialStore::read`], which
//! filters out the `"undefined"`/`"null"` tombstones that stringified
//! nullish values leave behind.
//!
//! Storage operations are assumed to always succeed; quota and
//! availability failures are a backend concern no caller handles.

use std::collections::HashMap;

/// Sentinel values that must read as an absent slot, never be parsed.
const TOMBSTONES: [&str; 2] = ["undefined", "null"];

/// String key-value storage for the three credential slots.
///
/// Implementors provide raw slot access; the tombstone guard is a provided
/// method so no backend can bypass it.
pub trait CredentialStore {
    /// Read a slot exactly as stored.
    fn read_raw(&self, key: &str) -> Option<String>;

    /// Write a slot.
    fn write(&mut self, key: &str, value: &str);

    /// Remove a slot. Removing an absent slot is a no-op.
    fn remove(&mut self, key: &str);

    /// Read a slot, treating the literal strings `"undefined"` and `"null"`
    /// as absent.
    fn read(&self, key: &str) -> Option<String> {
        self.read_raw(key)
            .filter(|value| !TOMBSTONES.contains(&value.as_str()))
    }
}

/// In-memory credential store.
///
/// Used by unit tests and anywhere a throwaway store is needed; the web
/// layer adapts its session storage to [`CredentialStore`] instead.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn read_raw(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.slots.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.slots.remove(key);
    }
}
