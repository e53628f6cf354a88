//! Admin dashboard route handlers.
//!
//! Every handler runs behind `RequireAdmin`; all data comes from the remote
//! API with the session's bearer token. Individual fetch failures degrade
//! to empty sections with a notice instead of taking the whole page down.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::api::types::{
    ActiveCheckin, AdminTask, EmployeeRecord, GeofenceUpdate, NewEmployee, NotificationRequest,
    PhotoUpload, TaskInput,
};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

use super::{
    OFFICE_GEOFENCE_RADIUS_M, OFFICE_LATITUDE, OFFICE_LONGITUDE, OFFICE_NAME, format_date,
    format_time, soften,
};

// =============================================================================
// View types
// =============================================================================

/// Attendance summary cards.
#[derive(Default)]
pub struct SummaryView {
    pub total_employees: u32,
    pub present_today: u32,
    pub on_leave: u32,
    pub average_work_hours: String,
}

/// One row of the employee directory table.
pub struct EmployeeRow {
    pub employee_id: String,
    pub name: String,
    pub position: String,
    pub department: String,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub check_in_time: String,
}

/// One row of the task table.
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub assigned_to: String,
    pub priority: String,
    pub status: String,
    pub due_date: String,
}

/// An employee option in assignment/notification dropdowns.
pub struct AssigneeOption {
    pub id: String,
    pub name: String,
}

fn employee_rows(
    employees: Vec<EmployeeRecord>,
    active: Vec<ActiveCheckin>,
) -> Vec<EmployeeRow> {
    // Active check-ins are keyed by the directory's database id.
    let active_by_id: HashMap<String, ActiveCheckin> = active
        .into_iter()
        .filter(|checkin| checkin.active)
        .map(|checkin| (checkin.employee_id.id.clone(), checkin))
        .collect();

    employees
        .into_iter()
        .map(|employee| {
            let checkin = active_by_id.get(&employee.id);
            let status = if checkin.is_some() {
                "Active".to_owned()
            } else if employee.on_leave {
                "On leave".to_owned()
            } else {
                "Inactive".to_owned()
            };
            EmployeeRow {
                employee_id: employee.employee_id.to_string(),
                name: employee.name,
                position: employee.position.unwrap_or_else(|| "N/A".to_owned()),
                department: employee.department.unwrap_or_else(|| "N/A".to_owned()),
                email: employee.email.unwrap_or_else(|| "N/A".to_owned()),
                phone: employee.contact_number.unwrap_or_else(|| "N/A".to_owned()),
                status,
                check_in_time: checkin
                    .map_or_else(|| "--:-- --".to_owned(), |c| format_time(c.check_in_time)),
            }
        })
        .collect()
}

fn task_rows(tasks: Vec<AdminTask>) -> Vec<TaskRow> {
    tasks
        .into_iter()
        .map(|task| TaskRow {
            id: task.id,
            title: task.title,
            assigned_to: task
                .employee_id
                .and_then(|assignee| assignee.name)
                .unwrap_or_else(|| "Unassigned".to_owned()),
            priority: task.priority.unwrap_or_else(|| "Medium".to_owned()),
            status: task.status.unwrap_or_else(|| "To Do".to_owned()),
            due_date: format_date(task.due_date),
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub admin_name: String,
    pub admin_position: String,
    pub admin_department: String,
    pub last_login: String,
    pub summary: SummaryView,
    pub employees: Vec<EmployeeRow>,
    pub tasks: Vec<TaskRow>,
    pub departments: Vec<String>,
    pub assignees: Vec<AssigneeOption>,
    pub geofence_name: String,
    pub geofence_latitude: f64,
    pub geofence_longitude: f64,
    pub geofence_radius: u32,
    pub notices: Vec<String>,
    pub flash_error: Option<String>,
    pub flash_success: Option<String>,
}

/// Add-employee form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/add_employee.html")]
pub struct AddEmployeeTemplate {
    pub error: Option<String>,
    pub success: bool,
}

/// Task board template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/tasks.html")]
pub struct AdminTasksTemplate {
    pub tasks: Vec<TaskRow>,
    pub assignees: Vec<AssigneeOption>,
    pub notices: Vec<String>,
    pub flash_error: Option<String>,
    pub flash_success: Option<String>,
}

/// Query parameters carrying a flash message through a redirect.
#[derive(Debug, Deserialize)]
pub struct FlashQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Dashboard
// =============================================================================

/// Display the admin dashboard.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(flash): Query<FlashQuery>,
) -> Result<AdminDashboardTemplate, AppError> {
    let api = state.api();
    let (profile, overview, employees, active, tasks) = tokio::join!(
        api.admin_profile(&admin.token),
        api.admin_overview(&admin.token),
        api.employees(&admin.token),
        api.active_checkins(&admin.token),
        api.admin_tasks(&admin.token),
    );

    let mut notices = Vec::new();
    let profile = soften(profile, "your profile", &mut notices)?;
    let overview = soften(overview, "the attendance overview", &mut notices)?;
    let employees = soften(employees, "the employee directory", &mut notices)?.unwrap_or_default();
    let active = soften(active, "active check-ins", &mut notices)?.unwrap_or_default();
    let tasks = soften(tasks, "tasks", &mut notices)?.unwrap_or_default();

    let summary = overview.map(|o| SummaryView {
        total_employees: o.total,
        present_today: o.present_today,
        on_leave: o.on_leave,
        average_work_hours: format!("{:.1}h", o.avg_hours),
    });

    let mut departments: Vec<String> = employees
        .iter()
        .filter_map(|employee| employee.department.clone())
        .collect();
    departments.sort();
    departments.dedup();

    let assignees = employees
        .iter()
        .map(|employee| AssigneeOption {
            id: employee.id.clone(),
            name: employee.name.clone(),
        })
        .collect();

    let (admin_name, admin_position, admin_department, last_login) = profile.map_or_else(
        || {
            (
                "Administrator".to_owned(),
                "HR Administrator".to_owned(),
                "Human Resources".to_owned(),
                "N/A".to_owned(),
            )
        },
        |p| {
            (
                p.name,
                p.position.unwrap_or_else(|| "HR Administrator".to_owned()),
                p.department.unwrap_or_else(|| "Human Resources".to_owned()),
                p.last_login.map_or_else(
                    || "N/A".to_owned(),
                    |at| at.format("%b %-d, %Y %I:%M %p").to_string(),
                ),
            )
        },
    );

    Ok(AdminDashboardTemplate {
        admin_name,
        admin_position,
        admin_department,
        last_login,
        summary: summary.unwrap_or_default(),
        employees: employee_rows(employees, active),
        tasks: task_rows(tasks),
        departments,
        assignees,
        geofence_name: OFFICE_NAME.to_owned(),
        geofence_latitude: OFFICE_LATITUDE,
        geofence_longitude: OFFICE_LONGITUDE,
        geofence_radius: OFFICE_GEOFENCE_RADIUS_M,
        notices,
        flash_error: flash.error,
        flash_success: flash.success,
    })
}

// =============================================================================
// Employee registration
// =============================================================================

/// Display the registration form.
pub async fn add_employee_page(
    RequireAdmin(_admin): RequireAdmin,
    Query(flash): Query<FlashQuery>,
) -> impl IntoResponse {
    AddEmployeeTemplate {
        error: flash.error,
        success: flash.success.is_some(),
    }
}

/// Handle the multipart registration form.
pub async fn add_employee(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == "photo" {
            let file_name = field.file_name().unwrap_or("photo").to_owned();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !bytes.is_empty() {
                photo = Some(PhotoUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            fields.insert(name, value);
        }
    }

    let mut take = |key: &str| fields.remove(key).unwrap_or_default();
    let employee = NewEmployee {
        name: take("name"),
        email: take("email"),
        password: take("password"),
        department: take("department"),
        designation: take("designation"),
        contact_number: take("contactNumber"),
        photo,
    };

    if employee.name.is_empty() || employee.email.is_empty() || employee.password.is_empty() {
        return Ok(Redirect::to("/admin-dashboard/add-employee?error=Name%2C%20email%20and%20password%20are%20required").into_response());
    }

    match state.api().register_employee(employee).await {
        Ok(_) => Ok(Redirect::to("/admin-dashboard/add-employee?success=1").into_response()),
        Err(e) => {
            tracing::warn!("employee registration failed: {e}");
            Ok(
                Redirect::to("/admin-dashboard/add-employee?error=Registration%20failed")
                    .into_response(),
            )
        }
    }
}

// =============================================================================
// Task management
// =============================================================================

/// Task create/update form data.
#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub employee_id: String,
    pub priority: String,
    pub status: String,
    #[serde(default)]
    pub due_date: String,
}

impl TaskForm {
    fn into_input(self) -> TaskInput {
        TaskInput {
            title: self.title,
            description: none_if_empty(self.description),
            employee_id: none_if_empty(self.employee_id),
            priority: self.priority,
            status: self.status,
            due_date: none_if_empty(self.due_date),
        }
    }
}

fn none_if_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

/// Display the task board.
pub async fn tasks_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(flash): Query<FlashQuery>,
) -> Result<AdminTasksTemplate, AppError> {
    let api = state.api();
    let (tasks, employees) = tokio::join!(api.admin_tasks(&admin.token), api.employees(&admin.token));

    let mut notices = Vec::new();
    let tasks = soften(tasks, "tasks", &mut notices)?.unwrap_or_default();
    let employees = soften(employees, "the employee directory", &mut notices)?.unwrap_or_default();

    Ok(AdminTasksTemplate {
        tasks: task_rows(tasks),
        assignees: employees
            .into_iter()
            .map(|employee| AssigneeOption {
                id: employee.id,
                name: employee.name,
            })
            .collect(),
        notices,
        flash_error: flash.error,
        flash_success: flash.success,
    })
}

/// Create a task.
pub async fn create_task(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    axum::Form(form): axum::Form<TaskForm>,
) -> Result<Response, AppError> {
    if form.title.trim().is_empty() {
        return Ok(Redirect::to("/admin-dashboard/tasks?error=A%20title%20is%20required")
            .into_response());
    }
    match state
        .api()
        .create_task(&admin.token, &form.into_input())
        .await
    {
        Ok(_) => Ok(Redirect::to("/admin-dashboard/tasks?success=Task%20created").into_response()),
        Err(e) => Ok(task_mutation_failed("create", &e)),
    }
}

/// Update a task.
pub async fn update_task(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(task_id): Path<String>,
    axum::Form(form): axum::Form<TaskForm>,
) -> Result<Response, AppError> {
    match state
        .api()
        .update_task(&admin.token, &task_id, &form.into_input())
        .await
    {
        Ok(_) => Ok(Redirect::to("/admin-dashboard/tasks?success=Task%20updated").into_response()),
        Err(e) => Ok(task_mutation_failed("update", &e)),
    }
}

/// Delete a task.
pub async fn delete_task(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(task_id): Path<String>,
) -> Result<Response, AppError> {
    match state.api().delete_task(&admin.token, &task_id).await {
        Ok(_) => Ok(Redirect::to("/admin-dashboard/tasks?success=Task%20deleted").into_response()),
        Err(e) => Ok(task_mutation_failed("delete", &e)),
    }
}

fn task_mutation_failed(action: &str, error: &crate::api::ApiError) -> Response {
    tracing::warn!("failed to {action} task: {error}");
    Redirect::to("/admin-dashboard/tasks?error=The%20task%20could%20not%20be%20saved").into_response()
}

// =============================================================================
// Notifications and geofence
// =============================================================================

/// Notification broadcast form data.
#[derive(Debug, Deserialize)]
pub struct NotificationForm {
    pub title: String,
    pub message: String,
    pub recipients: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub employee_id: String,
    pub priority: String,
}

/// Send a notification to all, a department, or one employee.
pub async fn send_notification(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    axum::Form(form): axum::Form<NotificationForm>,
) -> Result<Response, AppError> {
    let request = NotificationRequest {
        title: form.title,
        message: form.message,
        recipients: form.recipients,
        department: none_if_empty(form.department),
        employee_id: none_if_empty(form.employee_id),
        priority: form.priority,
    };
    match state.api().send_notification(&admin.token, &request).await {
        Ok(_) => {
            Ok(Redirect::to("/admin-dashboard?success=Notification%20sent").into_response())
        }
        Err(e) => {
            tracing::warn!("failed to send notification: {e}");
            Ok(
                Redirect::to("/admin-dashboard?error=The%20notification%20could%20not%20be%20sent")
                    .into_response(),
            )
        }
    }
}

/// Geofence update form data.
#[derive(Debug, Deserialize)]
pub struct GeofenceForm {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius: u32,
}

/// Replace the office geofence.
pub async fn update_geofence(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    axum::Form(form): axum::Form<GeofenceForm>,
) -> Result<Response, AppError> {
    let update = GeofenceUpdate {
        name: form.name,
        latitude: form.latitude,
        longitude: form.longitude,
        radius: form.radius,
    };
    match state.api().update_geofence(&admin.token, &update).await {
        Ok(_) => Ok(Redirect::to("/admin-dashboard?success=Geofence%20updated").into_response()),
        Err(e) => {
            tracing::warn!("failed to update geofence: {e}");
            Ok(
                Redirect::to("/admin-dashboard?error=The%20geofence%20could%20not%20be%20updated")
                    .into_response(),
            )
        }
    }
}
