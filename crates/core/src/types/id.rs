//! Employee ID newtype.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An employee's public identifier as issued by the TrackZone API.
///
/// These are opaque strings (e.g. `"EMP-1042"`), not database integers, so
/// the wrapper carries a `String` and exists purely to keep employee IDs
/// from being mixed up with other string-typed values in handler code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EmployeeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EmployeeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for EmployeeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_transparent() {
        let id = EmployeeId::new("EMP-1042");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"EMP-1042\"");
        let parsed: EmployeeId = serde_json::from_str("\"EMP-1042\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(EmployeeId::new("E1").to_string(), "E1");
    }
}
