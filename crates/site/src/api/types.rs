//! Request and response payloads for the TrackZone API.
//!
//! The API speaks camelCase JSON with MongoDB-style `_id` fields; unknown
//! fields are ignored throughout so upstream additions never break
//! deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use trackzone_core::{EmployeeId, EmployeeProfile};

// =============================================================================
// Authentication
// =============================================================================

/// Credentials posted to the admin/employee login endpoints.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Successful login response.
///
/// The admin endpoint uses the same shape; its `employee` field, when
/// present, is ignored by the session core.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub employee: Option<EmployeeProfile>,
}

/// Generic `{ "message": ... }` body used by most mutation responses and
/// error payloads.
#[derive(Debug, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Admin dashboard
// =============================================================================

/// The signed-in administrator's own profile.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

/// Aggregate attendance numbers for the admin overview cards.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub present_today: u32,
    #[serde(default)]
    pub on_leave: u32,
    #[serde(default)]
    pub avg_hours: f64,
}

/// One row of the employee directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    /// Database identifier, used to join against active check-ins.
    #[serde(rename = "_id")]
    pub id: String,
    pub employee_id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub on_leave: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
}

/// Reference to an employee inside a populated check-in record.
#[derive(Debug, Deserialize)]
pub struct EmployeeRef {
    #[serde(rename = "_id")]
    pub id: String,
}

/// An active (or recently closed) check-in, joined onto the directory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCheckin {
    pub employee_id: EmployeeRef,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub check_in_time: Option<DateTime<Utc>>,
}

/// A task as the admin task board sees it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTask {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Populated assignee, absent for unassigned tasks.
    #[serde(default)]
    pub employee_id: Option<Assignee>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Populated assignee reference on a task.
#[derive(Debug, Deserialize)]
pub struct Assignee {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Body for creating or updating a task.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub priority: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Body for the admin notification broadcast.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub title: String,
    pub message: String,
    /// `"all"`, `"department"`, or `"individual"`.
    pub recipients: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub priority: String,
}

/// Body for replacing the office geofence.
#[derive(Debug, Serialize)]
pub struct GeofenceUpdate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: u32,
}

/// A new employee registration, forwarded as multipart form data.
#[derive(Debug)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub password: String,
    pub department: String,
    pub designation: String,
    pub contact_number: String,
    pub photo: Option<PhotoUpload>,
}

/// An uploaded photo attached to a registration.
#[derive(Debug)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

// =============================================================================
// Employee dashboard
// =============================================================================

/// Body for check-in and check-out.
///
/// The coordinates are the office location; the geofence decision is made
/// by the API, not here.
#[derive(Debug, Serialize)]
pub struct CheckRequest {
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Today's check-in/check-out pair for one employee.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinStatus {
    #[serde(default)]
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_out_time: Option<DateTime<Utc>>,
}

impl CheckinStatus {
    /// Checked in and not yet checked out.
    #[must_use]
    pub const fn is_checked_in(&self) -> bool {
        self.check_in_time.is_some() && self.check_out_time.is_none()
    }
}

/// Accumulated hours and leave balance.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkMetrics {
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub leave_count: u32,
}

/// A task as assigned to one employee.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeTask {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// An upcoming meeting on the employee dashboard.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub host: Option<String>,
}

/// One month of attendance, day by day.
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceMonth {
    #[serde(default)]
    pub days: Vec<AttendanceDay>,
}

/// A single day in the attendance log.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDay {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    pub date: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_out_time: Option<DateTime<Utc>>,
}

/// Full task detail, including its comment thread.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<TaskComment>,
}

/// A comment on a task.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for updating a task's status.
#[derive(Debug, Serialize)]
pub struct StatusUpdate<'a> {
    pub status: &'a str,
}

/// Body for posting a task comment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment<'a> {
    pub text: &'a str,
    pub posted_by: &'a str,
    pub user_model: &'static str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_record_from_api_shape() {
        let json = r#"{
            "_id": "64ac01",
            "employeeId": "EMP-1042",
            "name": "Priya Raman",
            "department": "Engineering",
            "photoPath": "/uploads/emp.png",
            "onLeave": true,
            "email": "priya@example.com",
            "location": null
        }"#;
        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "64ac01");
        assert_eq!(record.employee_id, EmployeeId::new("EMP-1042"));
        assert!(record.on_leave);
        assert_eq!(record.position, None);
    }

    #[test]
    fn test_active_checkin_with_populated_employee() {
        let json = r#"{
            "employeeId": {"_id": "64ac01", "name": "Priya"},
            "active": true,
            "checkInTime": "2026-03-02T09:04:00.000Z"
        }"#;
        let checkin: ActiveCheckin = serde_json::from_str(json).unwrap();
        assert_eq!(checkin.employee_id.id, "64ac01");
        assert!(checkin.active);
        assert!(checkin.check_in_time.is_some());
    }

    #[test]
    fn test_admin_task_without_assignee() {
        let json = r#"{"_id": "t1", "title": "File reports", "priority": "High"}"#;
        let task: AdminTask = serde_json::from_str(json).unwrap();
        assert!(task.employee_id.is_none());
        assert_eq!(task.priority.as_deref(), Some("High"));
    }

    #[test]
    fn test_checkin_status_transitions() {
        let open = CheckinStatus {
            check_in_time: Some(Utc::now()),
            check_out_time: None,
        };
        assert!(open.is_checked_in());

        let closed = CheckinStatus {
            check_in_time: Some(Utc::now()),
            check_out_time: Some(Utc::now()),
        };
        assert!(!closed.is_checked_in());
        assert!(!CheckinStatus::default().is_checked_in());
    }

    #[test]
    fn test_login_response_without_employee() {
        let response: LoginResponse = serde_json::from_str(r#"{"token": "t1"}"#).unwrap();
        assert_eq!(response.token, "t1");
        assert!(response.employee.is_none());
    }

    #[test]
    fn test_new_comment_wire_shape() {
        let comment = NewComment {
            text: "On it",
            posted_by: "EMP-1042",
            user_model: "Employee",
        };
        let json = serde_json::to_string(&comment).unwrap();
        assert!(json.contains("\"postedBy\":\"EMP-1042\""));
        assert!(json.contains("\"userModel\":\"Employee\""));
    }
}
