//! Dashboard roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The role a session is authenticated as.
///
/// Serialized in lowercase to match the wire and credential-store encoding
/// used by the TrackZone API (`"admin"` / `"employee"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// HR administrator: employee directory, task assignment, geofence.
    Admin,
    /// Regular employee: check-in/out, attendance log, assigned tasks.
    Employee,
}

impl Role {
    /// The credential-store encoding of this role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }

    /// Parse a stored role string.
    ///
    /// Anything other than the two known encodings yields `None`; callers
    /// treat an unknown role the same as an absent one.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "employee" => Some(Self::Employee),
            _ => None,
        }
    }

    /// Path of the dashboard this role lands on after login.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin-dashboard",
            Self::Employee => "/employee-dashboard",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("employee"), Some(Role::Employee));
    }

    #[test]
    fn test_parse_unknown_role() {
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn test_as_str_roundtrip() {
        for role in [Role::Admin, Role::Employee] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"employee\"").unwrap();
        assert_eq!(role, Role::Employee);
    }
}
