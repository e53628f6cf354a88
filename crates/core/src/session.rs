//! The session state machine.
//!
//! A session is either unauthenticated or authenticated as exactly one
//! role; an employee identity can only exist on an employee session. The
//! machine is hydrated from a [`CredentialStore`] at startup and mutated
//! only by [`AuthSession::login`], [`AuthSession::logout`], and the
//! token-expiry eviction - every other combination of persisted state is
//! repaired back to `Unauthenticated` without surfacing an error.

use crate::store::CredentialStore;
use crate::types::{EmployeeProfile, Role};

/// Credential-store slot names.
pub mod keys {
    /// Opaque bearer token presented on every API call.
    pub const TOKEN: &str = "token";

    /// Stored role encoding, `"admin"` or `"employee"`.
    pub const ROLE: &str = "role";

    /// JSON-serialized [`super::EmployeeProfile`], present only for
    /// employee sessions.
    pub const EMPLOYEE: &str = "employee";
}

/// In-memory authentication state for one browser session.
///
/// The variants make invalid combinations unrepresentable: an admin session
/// cannot carry an employee identity, and no identity or token can exist
/// without a role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthSession {
    /// No valid credentials.
    #[default]
    Unauthenticated,
    /// Authenticated administrator.
    Admin {
        /// Bearer token for admin API calls.
        token: String,
    },
    /// Authenticated employee.
    Employee {
        /// Bearer token for employee API calls.
        token: String,
        /// Identity record, absent when the stored record was missing or
        /// unreadable.
        profile: Option<EmployeeProfile>,
    },
}

impl AuthSession {
    /// Hydrate the session from the credential store.
    ///
    /// Both `token` and a parseable `role` must be present; any other
    /// combination (dangling token, dangling role, unknown role string)
    /// clears all three slots and yields `Unauthenticated`. A stored
    /// employee record that fails to parse degrades to an absent profile
    /// rather than an error.
    pub fn initialize(store: &mut impl CredentialStore) -> Self {
        let token = store.read(keys::TOKEN);
        let role = store.read(keys::ROLE).and_then(|raw| Role::parse(&raw));

        match (token, role) {
            (Some(token), Some(Role::Admin)) => Self::Admin { token },
            (Some(token), Some(Role::Employee)) => {
                let profile = store
                    .read(keys::EMPLOYEE)
                    .and_then(|raw| serde_json::from_str(&raw).ok());
                Self::Employee { token, profile }
            }
            _ => {
                clear_slots(store);
                Self::Unauthenticated
            }
        }
    }

    /// Commit a successful login.
    ///
    /// Writes `token`, then `role`, then the `employee` slot (written only
    /// for an employee login carrying a profile, removed otherwise), and
    /// returns the new in-memory state. Admin logins never persist a
    /// profile, whatever the login endpoint returned.
    pub fn login(
        store: &mut impl CredentialStore,
        role: Role,
        token: &str,
        profile: Option<EmployeeProfile>,
    ) -> Self {
        store.write(keys::TOKEN, token);
        store.write(keys::ROLE, role.as_str());

        match role {
            Role::Admin => {
                store.remove(keys::EMPLOYEE);
                Self::Admin {
                    token: token.to_owned(),
                }
            }
            Role::Employee => {
                match profile.as_ref().and_then(|p| serde_json::to_string(p).ok()) {
                    Some(json) => store.write(keys::EMPLOYEE, &json),
                    None => store.remove(keys::EMPLOYEE),
                }
                Self::Employee {
                    token: token.to_owned(),
                    profile,
                }
            }
        }
    }

    /// End the session: remove all three slots and reset to
    /// `Unauthenticated`. Never fails, never calls the network.
    pub fn logout(&mut self, store: &mut impl CredentialStore) {
        clear_slots(store);
        *self = Self::Unauthenticated;
    }

    /// The token-expiry transition.
    ///
    /// Clears every slot, `employee` included, so no stale identity can
    /// outlive its credentials.
    pub fn evict_expired(&mut self, store: &mut impl CredentialStore) {
        self.logout(store);
    }

    /// Whether any valid credentials are held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        !matches!(self, Self::Unauthenticated)
    }

    /// The authenticated role, if any.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        match self {
            Self::Unauthenticated => None,
            Self::Admin { .. } => Some(Role::Admin),
            Self::Employee { .. } => Some(Role::Employee),
        }
    }

    /// The bearer token, if authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Unauthenticated => None,
            Self::Admin { token } | Self::Employee { token, .. } => Some(token),
        }
    }

    /// The employee identity, when this is an employee session that has
    /// one.
    #[must_use]
    pub const fn profile(&self) -> Option<&EmployeeProfile> {
        match self {
            Self::Employee {
                profile: Some(profile),
                ..
            } => Some(profile),
            _ => None,
        }
    }

    /// Whether this session may access routes that require `required`.
    ///
    /// The single role-match check consumed by every route guard.
    #[must_use]
    pub fn authorize(&self, required: Role) -> bool {
        self.role() == Some(required)
    }
}

fn clear_slots(store: &mut impl CredentialStore) {
    store.remove(keys::TOKEN);
    store.remove(keys::ROLE);
    store.remove(keys::EMPLOYEE);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::EmployeeId;

    fn sample_profile() -> EmployeeProfile {
        EmployeeProfile {
            employee_id: EmployeeId::new("E1"),
            name: "Ann".to_owned(),
            email: Some("ann@example.com".to_owned()),
            department: Some("Sales".to_owned()),
            designation: None,
            contact_number: None,
            photo: None,
        }
    }

    #[test]
    fn test_initialize_empty_store_is_unauthenticated() {
        let mut store = MemoryStore::new();
        let session = AuthSession::initialize(&mut store);
        assert_eq!(session, AuthSession::Unauthenticated);
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_employee_login_then_initialize_roundtrip() {
        let mut store = MemoryStore::new();
        let profile = sample_profile();
        let session =
            AuthSession::login(&mut store, Role::Employee, "t1", Some(profile.clone()));
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Employee));

        // Simulated reload.
        let rehydrated = AuthSession::initialize(&mut store);
        assert_eq!(rehydrated, session);
        assert_eq!(rehydrated.profile(), Some(&profile));
        assert_eq!(rehydrated.token(), Some("t1"));
    }

    #[test]
    fn test_employee_login_without_profile() {
        let mut store = MemoryStore::new();
        let session = AuthSession::login(&mut store, Role::Employee, "t1", None);
        assert_eq!(session.profile(), None);
        assert_eq!(store.read(keys::EMPLOYEE), None);
        assert_eq!(AuthSession::initialize(&mut store), session);
    }

    #[test]
    fn test_admin_login_never_persists_profile() {
        let mut store = MemoryStore::new();
        // Stale record from an earlier employee session.
        store.write(keys::EMPLOYEE, r#"{"employeeId":"E9","name":"Old"}"#);

        let session = AuthSession::login(&mut store, Role::Admin, "t2", Some(sample_profile()));
        assert_eq!(session, AuthSession::Admin { token: "t2".to_owned() });
        assert_eq!(session.profile(), None);
        assert_eq!(store.read(keys::EMPLOYEE), None);
    }

    #[test]
    fn test_logout_then_initialize_is_unauthenticated() {
        let mut store = MemoryStore::new();
        let mut session =
            AuthSession::login(&mut store, Role::Employee, "t1", Some(sample_profile()));
        session.logout(&mut store);
        assert_eq!(session, AuthSession::Unauthenticated);
        assert_eq!(AuthSession::initialize(&mut store), AuthSession::Unauthenticated);
        assert_eq!(store.read_raw(keys::TOKEN), None);
        assert_eq!(store.read_raw(keys::ROLE), None);
        assert_eq!(store.read_raw(keys::EMPLOYEE), None);
    }

    #[test]
    fn test_dangling_token_is_self_repaired() {
        let mut store = MemoryStore::new();
        store.write(keys::TOKEN, "t1");

        let session = AuthSession::initialize(&mut store);
        assert_eq!(session, AuthSession::Unauthenticated);
        // The dangling token is gone from the store.
        assert_eq!(store.read_raw(keys::TOKEN), None);
    }

    #[test]
    fn test_dangling_role_is_self_repaired() {
        let mut store = MemoryStore::new();
        store.write(keys::ROLE, "employee");
        store.write(keys::EMPLOYEE, r#"{"employeeId":"E1","name":"Ann"}"#);

        assert_eq!(AuthSession::initialize(&mut store), AuthSession::Unauthenticated);
        assert_eq!(store.read_raw(keys::ROLE), None);
        assert_eq!(store.read_raw(keys::EMPLOYEE), None);
    }

    #[test]
    fn test_unknown_role_is_self_repaired() {
        let mut store = MemoryStore::new();
        store.write(keys::TOKEN, "t1");
        store.write(keys::ROLE, "superuser");

        assert_eq!(AuthSession::initialize(&mut store), AuthSession::Unauthenticated);
        assert_eq!(store.read_raw(keys::TOKEN), None);
    }

    #[test]
    fn test_employee_slot_tombstones_read_as_absent() {
        for tombstone in ["null", "undefined"] {
            let mut store = MemoryStore::new();
            store.write(keys::TOKEN, "t1");
            store.write(keys::ROLE, "employee");
            store.write(keys::EMPLOYEE, tombstone);

            let session = AuthSession::initialize(&mut store);
            assert_eq!(session.role(), Some(Role::Employee));
            assert_eq!(session.profile(), None);
        }
    }

    #[test]
    fn test_malformed_employee_json_degrades_to_absent() {
        let mut store = MemoryStore::new();
        store.write(keys::TOKEN, "t1");
        store.write(keys::ROLE, "employee");
        store.write(keys::EMPLOYEE, "{not json");

        let session = AuthSession::initialize(&mut store);
        assert!(session.is_authenticated());
        assert_eq!(session.profile(), None);
    }

    #[test]
    fn test_stored_employee_scenario() {
        let mut store = MemoryStore::new();
        store.write(keys::TOKEN, "t1");
        store.write(keys::ROLE, "employee");
        store.write(keys::EMPLOYEE, r#"{"employeeId":"E1","name":"Ann"}"#);

        let session = AuthSession::initialize(&mut store);
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Employee));
        let profile = session.profile().unwrap();
        assert_eq!(profile.employee_id, EmployeeId::new("E1"));
        assert_eq!(profile.name, "Ann");
    }

    #[test]
    fn test_evict_expired_clears_every_slot() {
        let mut store = MemoryStore::new();
        let mut session =
            AuthSession::login(&mut store, Role::Employee, "t1", Some(sample_profile()));

        session.evict_expired(&mut store);
        assert_eq!(session, AuthSession::Unauthenticated);
        assert_eq!(store.read_raw(keys::TOKEN), None);
        assert_eq!(store.read_raw(keys::ROLE), None);
        assert_eq!(store.read_raw(keys::EMPLOYEE), None);
    }

    #[test]
    fn test_authorize_matches_role_exactly() {
        let mut store = MemoryStore::new();
        let admin = AuthSession::login(&mut store, Role::Admin, "t1", None);
        assert!(admin.authorize(Role::Admin));
        assert!(!admin.authorize(Role::Employee));

        let employee = AuthSession::login(&mut store, Role::Employee, "t2", None);
        assert!(employee.authorize(Role::Employee));
        assert!(!employee.authorize(Role::Admin));

        assert!(!AuthSession::Unauthenticated.authorize(Role::Admin));
        assert!(!AuthSession::Unauthenticated.authorize(Role::Employee));
    }

    #[test]
    fn test_login_overwrites_previous_session() {
        let mut store = MemoryStore::new();
        AuthSession::login(&mut store, Role::Employee, "t1", Some(sample_profile()));
        let session = AuthSession::login(&mut store, Role::Admin, "t2", None);

        assert_eq!(session.role(), Some(Role::Admin));
        let rehydrated = AuthSession::initialize(&mut store);
        assert_eq!(rehydrated, session);
        assert_eq!(store.read(keys::EMPLOYEE), None);
    }
}
