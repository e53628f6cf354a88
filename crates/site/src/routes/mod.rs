//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Marketing home page
//! GET  /health                  - Health check (wired in main)
//!
//! # Auth
//! GET  /login-selector          - Role selection screen (guard redirect target)
//! GET  /admin-login             - Admin login page
//! POST /admin-login             - Admin login action
//! GET  /employee-login          - Employee login page
//! POST /employee-login          - Employee login action
//! POST /logout                  - Logout action
//!
//! # Admin dashboard (requires admin session)
//! GET  /admin-dashboard                    - Overview, directory, tasks
//! GET  /admin-dashboard/add-employee       - Registration form
//! POST /admin-dashboard/add-employee       - Register a new employee
//! GET  /admin-dashboard/tasks              - Task board
//! POST /admin-dashboard/tasks              - Create task
//! POST /admin-dashboard/tasks/{id}         - Update task
//! POST /admin-dashboard/tasks/{id}/delete  - Delete task
//! POST /admin-dashboard/notifications      - Send a notification
//! POST /admin-dashboard/geofence           - Update the office geofence
//!
//! # Employee dashboard (requires employee session)
//! GET  /employee-dashboard                     - Today's status, tasks, meetings
//! POST /employee-dashboard/checkin             - Check in
//! POST /employee-dashboard/checkout            - Check out
//! GET  /employee-dashboard/attendance          - Monthly attendance log
//! GET  /employee-dashboard/tasks               - Assigned tasks
//! GET  /employee-dashboard/tasks/{id}          - Task detail with comments
//! POST /employee-dashboard/tasks/{id}/status   - Update task status
//! POST /employee-dashboard/tasks/{id}/comments - Add a comment
//! ```

pub mod admin;
pub mod auth;
pub mod employee;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use chrono::{DateTime, Utc};

use crate::api::ApiError;
use crate::error::AppError;
use crate::state::AppState;

/// Office headquarters coordinates, the center of the default geofence.
pub(crate) const OFFICE_LATITUDE: f64 = 10.826_198_1;
pub(crate) const OFFICE_LONGITUDE: f64 = 77.060_806_4;
/// Default geofence radius in meters.
pub(crate) const OFFICE_GEOFENCE_RADIUS_M: u32 = 500_000;
pub(crate) const OFFICE_NAME: &str = "Office Headquarters";

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login-selector", get(auth::login_selector))
        .route(
            "/admin-login",
            get(auth::admin_login_page).post(auth::admin_login),
        )
        .route(
            "/employee-login",
            get(auth::employee_login_page).post(auth::employee_login),
        )
        .route("/logout", post(auth::logout))
}

/// Create the admin dashboard router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route(
            "/add-employee",
            get(admin::add_employee_page).post(admin::add_employee),
        )
        .route("/tasks", get(admin::tasks_page).post(admin::create_task))
        .route("/tasks/{id}", post(admin::update_task))
        .route("/tasks/{id}/delete", post(admin::delete_task))
        .route("/notifications", post(admin::send_notification))
        .route("/geofence", post(admin::update_geofence))
}

/// Create the employee dashboard router.
pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(employee::dashboard))
        .route("/checkin", post(employee::checkin))
        .route("/checkout", post(employee::checkout))
        .route("/attendance", get(employee::attendance))
        .route("/tasks", get(employee::tasks_page))
        .route("/tasks/{id}", get(employee::task_detail))
        .route("/tasks/{id}/status", post(employee::update_task_status))
        .route("/tasks/{id}/comments", post(employee::add_comment))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(auth_routes())
        .nest("/admin-dashboard", admin_routes())
        .nest("/employee-dashboard", employee_routes())
}

/// Degrade a remote fetch failure to `None`, collecting a notice for the
/// page, while auth failures propagate and end the session.
pub(crate) fn soften<T>(
    result: Result<T, ApiError>,
    what: &str,
    notices: &mut Vec<String>,
) -> Result<Option<T>, AppError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ApiError::Unauthorized) => Err(AppError::SessionExpired),
        Err(e) => {
            tracing::error!("failed to load {what}: {e}");
            notices.push(format!("Could not load {what}."));
            Ok(None)
        }
    }
}

/// Format a timestamp as a 12-hour clock time, `--:-- --` when absent.
pub(crate) fn format_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "--:-- --".to_owned(),
        |at| at.format("%I:%M %p").to_string(),
    )
}

/// Format a timestamp as a short date, `--` when absent.
pub(crate) fn format_date(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "--".to_owned(), |at| at.format("%b %-d, %Y").to_string())
}
