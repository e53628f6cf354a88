//! Employee dashboard route handlers.
//!
//! Every handler runs behind `RequireEmployee`. A session whose stored
//! identity record was lost renders the dashboard shell with a notice
//! instead of failing - the guard only vouches for token and role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;

use trackzone_core::EmployeeProfile;

use crate::api::types::{CheckRequest, EmployeeTask, Meeting, NewComment, TaskDetail};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireEmployee;
use crate::state::AppState;

use super::{OFFICE_LATITUDE, OFFICE_LONGITUDE, format_date, format_time, soften};

const MISSING_PROFILE_NOTICE: &str =
    "Your employee record is missing from this session. Please sign in again.";

// =============================================================================
// View types
// =============================================================================

/// One row of the assigned-tasks table.
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub priority: String,
    pub status: String,
    pub deadline: String,
}

/// One upcoming meeting.
pub struct MeetingRow {
    pub title: String,
    pub time: String,
    pub host: String,
}

/// One day of the attendance log.
pub struct AttendanceRow {
    pub date: String,
    pub day: String,
    pub status: String,
    pub check_in_time: String,
    pub check_out_time: String,
    pub work_hours: String,
}

/// A task comment in the detail view.
pub struct CommentRow {
    pub text: String,
    pub posted_at: String,
}

fn task_rows(tasks: Vec<EmployeeTask>) -> Vec<TaskRow> {
    tasks
        .into_iter()
        .map(|task| TaskRow {
            id: task.id,
            title: task.title,
            priority: task.priority.unwrap_or_else(|| "Medium".to_owned()),
            status: task.status.unwrap_or_else(|| "To Do".to_owned()),
            deadline: format_date(task.deadline),
        })
        .collect()
}

fn meeting_rows(meetings: Vec<Meeting>) -> Vec<MeetingRow> {
    meetings
        .into_iter()
        .map(|meeting| MeetingRow {
            title: meeting.title,
            time: format_time(meeting.time),
            host: meeting.host.unwrap_or_else(|| "Unknown".to_owned()),
        })
        .collect()
}

/// `6.5` hours -> `"6h 30m"`.
fn format_hours(total_hours: f64) -> String {
    let minutes = (total_hours * 60.0).round().max(0.0);
    let hours = (minutes / 60.0).floor();
    let remainder = minutes - hours * 60.0;
    format!("{hours:.0}h {remainder:.0}m")
}

/// Hours worked between a check-in/check-out pair, `--` when incomplete.
fn worked_between(check_in: Option<DateTime<Utc>>, check_out: Option<DateTime<Utc>>) -> String {
    match (check_in, check_out) {
        (Some(start), Some(end)) if end > start => {
            let minutes = (end - start).num_minutes();
            format!("{}h {}m", minutes / 60, minutes % 60)
        }
        _ => "--".to_owned(),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Employee dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "employee/dashboard.html")]
pub struct EmployeeDashboardTemplate {
    pub name: String,
    pub designation: String,
    pub department: String,
    pub check_in_time: String,
    pub check_out_time: String,
    pub is_checked_in: bool,
    pub total_hours: String,
    pub remaining_leaves: u32,
    pub tasks: Vec<TaskRow>,
    pub meetings: Vec<MeetingRow>,
    pub notices: Vec<String>,
    pub flash_error: Option<String>,
}

impl EmployeeDashboardTemplate {
    /// The shell rendered when the session has no identity record.
    fn without_profile(flash_error: Option<String>) -> Self {
        Self {
            name: "Employee".to_owned(),
            designation: String::new(),
            department: String::new(),
            check_in_time: "--:-- --".to_owned(),
            check_out_time: "--:-- --".to_owned(),
            is_checked_in: false,
            total_hours: "0h 0m".to_owned(),
            remaining_leaves: 0,
            tasks: Vec::new(),
            meetings: Vec::new(),
            notices: vec![MISSING_PROFILE_NOTICE.to_owned()],
            flash_error,
        }
    }
}

/// Attendance log template.
#[derive(Template, WebTemplate)]
#[template(path = "employee/attendance.html")]
pub struct AttendanceTemplate {
    pub month_label: String,
    pub rows: Vec<AttendanceRow>,
    pub notices: Vec<String>,
}

/// Assigned-tasks template.
#[derive(Template, WebTemplate)]
#[template(path = "employee/tasks.html")]
pub struct EmployeeTasksTemplate {
    pub tasks: Vec<TaskRow>,
    pub notices: Vec<String>,
    pub flash_error: Option<String>,
}

/// Task detail template.
#[derive(Template, WebTemplate)]
#[template(path = "employee/task_detail.html")]
pub struct TaskDetailTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub status: String,
    pub deadline: String,
    pub comments: Vec<CommentRow>,
    pub flash_error: Option<String>,
}

impl From<TaskDetail> for TaskDetailTemplate {
    fn from(task: TaskDetail) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description.unwrap_or_default(),
            priority: task.priority.unwrap_or_else(|| "Medium".to_owned()),
            status: task.status.unwrap_or_else(|| "To Do".to_owned()),
            deadline: format_date(task.deadline),
            comments: task
                .comments
                .into_iter()
                .map(|comment| CommentRow {
                    text: comment.text,
                    posted_at: format_date(comment.created_at),
                })
                .collect(),
            flash_error: None,
        }
    }
}

/// Query parameters carrying a flash message through a redirect.
#[derive(Debug, Deserialize)]
pub struct FlashQuery {
    pub error: Option<String>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Display the employee dashboard.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireEmployee(employee): RequireEmployee,
    Query(flash): Query<FlashQuery>,
) -> Result<EmployeeDashboardTemplate, AppError> {
    let Some(profile) = employee.profile else {
        return Ok(EmployeeDashboardTemplate::without_profile(flash.error));
    };

    let api = state.api();
    let (checkin, metrics, tasks, meetings) = tokio::join!(
        api.checkin_status(&employee.token, &profile.employee_id),
        api.work_metrics(&employee.token, &profile.employee_id),
        api.employee_tasks(&employee.token, &profile.employee_id),
        api.meetings(&employee.token, &profile.employee_id),
    );

    let mut notices = Vec::new();
    let checkin = soften(checkin, "today's check-in", &mut notices)?.unwrap_or_default();
    let metrics = soften(metrics, "work metrics", &mut notices)?.unwrap_or_default();
    let tasks = soften(tasks, "your tasks", &mut notices)?.unwrap_or_default();
    let meetings = soften(meetings, "upcoming meetings", &mut notices)?.unwrap_or_default();

    Ok(EmployeeDashboardTemplate {
        name: profile.name.clone(),
        designation: profile.designation.clone().unwrap_or_default(),
        department: profile.department.clone().unwrap_or_default(),
        check_in_time: format_time(checkin.check_in_time),
        check_out_time: format_time(checkin.check_out_time),
        is_checked_in: checkin.is_checked_in(),
        total_hours: format_hours(metrics.total_hours),
        remaining_leaves: metrics.leave_count,
        tasks: task_rows(tasks),
        meetings: meeting_rows(meetings),
        notices,
        flash_error: flash.error,
    })
}

// =============================================================================
// Check-in / check-out
// =============================================================================

fn check_request(profile: &EmployeeProfile) -> Option<CheckRequest> {
    // The office coordinates are submitted as-is; the geofence decision is
    // made by the API.
    profile.email.clone().map(|email| CheckRequest {
        email,
        latitude: OFFICE_LATITUDE,
        longitude: OFFICE_LONGITUDE,
    })
}

/// Check the employee in.
pub async fn checkin(
    State(state): State<AppState>,
    RequireEmployee(employee): RequireEmployee,
) -> Result<Response, AppError> {
    let Some(request) = employee.profile.as_ref().and_then(check_request) else {
        return Ok(
            Redirect::to("/employee-dashboard?error=Your%20profile%20is%20incomplete")
                .into_response(),
        );
    };
    match state.api().checkin(&employee.token, &request).await {
        Ok(_) => Ok(Redirect::to("/employee-dashboard").into_response()),
        Err(crate::api::ApiError::Unauthorized) => Err(AppError::SessionExpired),
        Err(e) => {
            tracing::warn!("check-in failed: {e}");
            Ok(Redirect::to("/employee-dashboard?error=Check-in%20failed").into_response())
        }
    }
}

/// Check the employee out.
pub async fn checkout(
    State(state): State<AppState>,
    RequireEmployee(employee): RequireEmployee,
) -> Result<Response, AppError> {
    let Some(request) = employee.profile.as_ref().and_then(check_request) else {
        return Ok(
            Redirect::to("/employee-dashboard?error=Your%20profile%20is%20incomplete")
                .into_response(),
        );
    };
    match state.api().checkout(&employee.token, &request).await {
        Ok(_) => Ok(Redirect::to("/employee-dashboard").into_response()),
        Err(crate::api::ApiError::Unauthorized) => Err(AppError::SessionExpired),
        Err(e) => {
            tracing::warn!("check-out failed: {e}");
            Ok(Redirect::to("/employee-dashboard?error=Check-out%20failed").into_response())
        }
    }
}

// =============================================================================
// Attendance log
// =============================================================================

/// Month/year selection for the attendance log.
#[derive(Debug, Deserialize)]
pub struct AttendanceQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Display one month of attendance.
pub async fn attendance(
    State(state): State<AppState>,
    RequireEmployee(employee): RequireEmployee,
    Query(query): Query<AttendanceQuery>,
) -> Result<AttendanceTemplate, AppError> {
    let now = Utc::now();
    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.filter(|m| (1..=12).contains(m)).unwrap_or_else(|| now.month());

    let Some(profile) = employee.profile else {
        return Ok(AttendanceTemplate {
            month_label: format!("{year}-{month:02}"),
            rows: Vec::new(),
            notices: vec![MISSING_PROFILE_NOTICE.to_owned()],
        });
    };

    let mut notices = Vec::new();
    let log = soften(
        state
            .api()
            .attendance_month(&employee.token, &profile.employee_id, year, month)
            .await,
        "the attendance log",
        &mut notices,
    )?
    .unwrap_or_default();

    let rows = log
        .days
        .into_iter()
        .map(|day| AttendanceRow {
            date: day.date.format("%b %-d, %Y").to_string(),
            day: day.date.format("%A").to_string(),
            status: day.status,
            check_in_time: format_time(day.check_in_time),
            check_out_time: format_time(day.check_out_time),
            work_hours: worked_between(day.check_in_time, day.check_out_time),
        })
        .collect();

    Ok(AttendanceTemplate {
        month_label: format!("{year}-{month:02}"),
        rows,
        notices,
    })
}

// =============================================================================
// Tasks
// =============================================================================

/// Display the assigned-tasks list.
pub async fn tasks_page(
    State(state): State<AppState>,
    RequireEmployee(employee): RequireEmployee,
    Query(flash): Query<FlashQuery>,
) -> Result<EmployeeTasksTemplate, AppError> {
    let Some(profile) = employee.profile else {
        return Ok(EmployeeTasksTemplate {
            tasks: Vec::new(),
            notices: vec![MISSING_PROFILE_NOTICE.to_owned()],
            flash_error: flash.error,
        });
    };

    let mut notices = Vec::new();
    let tasks = soften(
        state
            .api()
            .employee_tasks(&employee.token, &profile.employee_id)
            .await,
        "your tasks",
        &mut notices,
    )?
    .unwrap_or_default();

    Ok(EmployeeTasksTemplate {
        tasks: task_rows(tasks),
        notices,
        flash_error: flash.error,
    })
}

/// Display one task with its comment thread.
pub async fn task_detail(
    State(state): State<AppState>,
    RequireEmployee(employee): RequireEmployee,
    Path(task_id): Path<String>,
    Query(flash): Query<FlashQuery>,
) -> Result<TaskDetailTemplate, AppError> {
    let task = state.api().task_detail(&employee.token, &task_id).await?;
    let mut template = TaskDetailTemplate::from(task);
    template.flash_error = flash.error;
    Ok(template)
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Update a task's status.
pub async fn update_task_status(
    State(state): State<AppState>,
    RequireEmployee(employee): RequireEmployee,
    Path(task_id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Response, AppError> {
    match state
        .api()
        .update_task_status(&employee.token, &task_id, &form.status)
        .await
    {
        Ok(_) => Ok(Redirect::to(&format!("/employee-dashboard/tasks/{task_id}")).into_response()),
        Err(crate::api::ApiError::Unauthorized) => Err(AppError::SessionExpired),
        Err(e) => {
            tracing::warn!("failed to update task status: {e}");
            Ok(Redirect::to(&format!(
                "/employee-dashboard/tasks/{task_id}?error=The%20status%20could%20not%20be%20saved"
            ))
            .into_response())
        }
    }
}

/// Comment form data.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

/// Add a comment to a task.
pub async fn add_comment(
    State(state): State<AppState>,
    RequireEmployee(employee): RequireEmployee,
    Path(task_id): Path<String>,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    if form.text.trim().is_empty() {
        return Ok(Redirect::to(&format!("/employee-dashboard/tasks/{task_id}")).into_response());
    }
    let Some(profile) = employee.profile else {
        return Ok(Redirect::to(&format!(
            "/employee-dashboard/tasks/{task_id}?error=Your%20profile%20is%20incomplete"
        ))
        .into_response());
    };

    let comment = NewComment {
        text: form.text.trim(),
        posted_by: profile.employee_id.as_str(),
        user_model: "Employee",
    };
    match state
        .api()
        .add_task_comment(&employee.token, &task_id, &comment)
        .await
    {
        Ok(_) => Ok(Redirect::to(&format!("/employee-dashboard/tasks/{task_id}")).into_response()),
        Err(crate::api::ApiError::Unauthorized) => Err(AppError::SessionExpired),
        Err(e) => {
            tracing::warn!("failed to add comment: {e}");
            Ok(Redirect::to(&format!(
                "/employee-dashboard/tasks/{task_id}?error=The%20comment%20could%20not%20be%20saved"
            ))
            .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(0.0), "0h 0m");
        assert_eq!(format_hours(6.5), "6h 30m");
        assert_eq!(format_hours(7.98), "7h 59m");
    }

    #[test]
    fn test_worked_between() {
        let start = "2026-03-02T09:00:00Z".parse().ok();
        let end = "2026-03-02T17:30:00Z".parse().ok();
        assert_eq!(worked_between(start, end), "8h 30m");
        assert_eq!(worked_between(start, None), "--");
        assert_eq!(worked_between(end, start), "--");
    }
}
