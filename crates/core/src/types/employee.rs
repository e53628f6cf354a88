//! Employee identity record.

use serde::{Deserialize, Serialize};

use super::EmployeeId;

/// The identity record returned by the employee login endpoint and held for
/// the lifetime of an employee session.
///
/// Only `employeeId` and `name` are guaranteed by the API; everything else
/// is optional so that a sparse stored record still hydrates. The same
/// camelCase encoding is used on the wire and in the credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    /// Public employee identifier, used in dashboard API paths.
    pub employee_id: EmployeeId,
    /// Display name.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    /// Reference to the employee's photo (a URL or API path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_record_hydrates() {
        let profile: EmployeeProfile =
            serde_json::from_str(r#"{"employeeId":"E1","name":"Ann"}"#).unwrap();
        assert_eq!(profile.employee_id, EmployeeId::new("E1"));
        assert_eq!(profile.name, "Ann");
        assert_eq!(profile.email, None);
        assert_eq!(profile.photo, None);
    }

    #[test]
    fn test_full_record_roundtrip() {
        let profile = EmployeeProfile {
            employee_id: EmployeeId::new("EMP-7"),
            name: "Priya Raman".to_owned(),
            email: Some("priya@example.com".to_owned()),
            department: Some("Engineering".to_owned()),
            designation: Some("Developer".to_owned()),
            contact_number: Some("+91 98400 00000".to_owned()),
            photo: Some("/uploads/emp-7.png".to_owned()),
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"employeeId\":\"EMP-7\""));
        assert!(json.contains("\"contactNumber\""));
        let parsed: EmployeeProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, profile);
    }

    #[test]
    fn test_unknown_fields_tolerated() {
        let profile: EmployeeProfile = serde_json::from_str(
            r#"{"employeeId":"E2","name":"Ben","onLeave":false,"_id":"64ac"}"#,
        )
        .unwrap();
        assert_eq!(profile.name, "Ben");
    }
}
