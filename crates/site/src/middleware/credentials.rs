//! Adapter between the tower session and the core credential store.
//!
//! The core state machine is synchronous; tower-sessions is not. Each
//! request snapshots the three credential slots out of the session, lets
//! the core mutate the snapshot, and writes back only if something changed.
//! The single-threaded-per-session request flow keeps this race-free: only
//! explicit user actions (login, logout, a guard evicting an expired token)
//! mutate the slots.

use std::collections::HashMap;

use tower_sessions::Session;

use trackzone_core::{CredentialStore, session_keys as keys};

const SLOT_KEYS: [&str; 3] = [keys::TOKEN, keys::ROLE, keys::EMPLOYEE];

/// A per-request snapshot of the credential slots.
#[derive(Debug, Default)]
pub struct SessionSlots {
    slots: HashMap<String, String>,
    dirty: bool,
}

impl SessionSlots {
    /// Snapshot the credential slots from the session.
    pub async fn load(session: &Session) -> Self {
        let mut slots = HashMap::new();
        for key in SLOT_KEYS {
            // A slot holding a non-string value reads as absent.
            if let Some(value) = session.get::<String>(key).await.ok().flatten() {
                slots.insert(key.to_owned(), value);
            }
        }
        Self {
            slots,
            dirty: false,
        }
    }

    /// Write the snapshot back to the session, if it was mutated.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn persist(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        if !self.dirty {
            return Ok(());
        }
        for key in SLOT_KEYS {
            match self.slots.get(key) {
                Some(value) => session.insert(key, value).await?,
                None => {
                    session.remove::<String>(key).await?;
                }
            }
        }
        Ok(())
    }
}

impl CredentialStore for SessionSlots {
    fn read_raw(&self, key: &str) -> Option<String> {
        self.slots.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.slots.insert(key.to_owned(), value.to_owned());
        self.dirty = true;
    }

    fn remove(&mut self, key: &str) {
        if self.slots.remove(key).is_some() {
            self.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackzone_core::AuthSession;
    use trackzone_core::Role;

    #[test]
    fn test_slots_back_the_state_machine() {
        let mut slots = SessionSlots::default();
        AuthSession::login(&mut slots, Role::Admin, "t1", None);
        assert!(slots.dirty);
        assert_eq!(slots.read(keys::TOKEN), Some("t1".to_owned()));
        assert_eq!(slots.read(keys::ROLE), Some("admin".to_owned()));
    }

    #[test]
    fn test_untouched_snapshot_is_clean() {
        let mut slots = SessionSlots::default();
        slots.write(keys::TOKEN, "t1");
        slots.write(keys::ROLE, "admin");
        slots.dirty = false;

        // Hydrating a healthy snapshot performs no writes.
        let session = AuthSession::initialize(&mut slots);
        assert!(session.is_authenticated());
        assert!(!slots.dirty);
    }

    #[test]
    fn test_self_repair_marks_dirty() {
        let mut slots = SessionSlots::default();
        slots.write(keys::TOKEN, "t1");
        slots.dirty = false;

        let session = AuthSession::initialize(&mut slots);
        assert!(!session.is_authenticated());
        assert!(slots.dirty);
        assert_eq!(slots.read_raw(keys::TOKEN), None);
    }
}
