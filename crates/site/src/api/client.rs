//! TrackZone API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use trackzone_core::EmployeeId;

use super::ApiError;
use super::types::{
    ActiveCheckin, AdminProfile, AdminTask, ApiMessage, AttendanceMonth, CheckRequest,
    CheckinStatus, DashboardOverview, EmployeeRecord, EmployeeTask, GeofenceUpdate, LoginRequest,
    LoginResponse, Meeting, NewComment, NewEmployee, NotificationRequest, StatusUpdate, TaskDetail,
    TaskInput, WorkMetrics,
};
use crate::config::SiteConfig;

/// Retry settings for dashboard reads.
///
/// Up to `max_attempts` tries with a linearly growing delay:
/// attempt 1 fails, wait `base_delay`; attempt 2 fails, wait
/// `2 * base_delay`; the final attempt's error is surfaced as-is.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay unit multiplied by the failed attempt number.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Backoff after the given (1-based) failed attempt.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Client for the remote TrackZone REST API.
///
/// Cheap to clone; holds a pooled `reqwest` client internally.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Create a client with the default retry policy.
    #[must_use]
    pub fn new(config: &SiteConfig) -> Self {
        Self::with_retry_policy(config, RetryPolicy::default())
    }

    /// Create a client with an explicit retry policy.
    #[must_use]
    pub fn with_retry_policy(config: &SiteConfig, retry: RetryPolicy) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                retry,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// GET with bearer auth and the retry policy.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let mut attempt = 1;
        loop {
            let result = self.fetch(path, token).await;
            match result {
                Err(err) if err.is_retryable() && attempt < self.inner.retry.max_attempts => {
                    tracing::warn!(
                        path,
                        attempt,
                        max = self.inner.retry.max_attempts,
                        "retrying TrackZone API request: {err}"
                    );
                    tokio::time::sleep(self.inner.retry.delay_after(attempt)).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Send a JSON body. Mutations are not retried.
    async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<T, ApiError> {
        let mut request = self.inner.client.request(method, self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Self::decode(request.send().await?).await
    }

    async fn send_empty<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .request(method, self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            // Error bodies are `{ "message": ... }` when the API had
            // something to say.
            let message = match response.json::<ApiMessage>().await {
                Ok(body) if !body.message.is_empty() => body.message,
                _ => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned(),
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// `POST /admin/login`
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` on bad credentials, or a transport/status
    /// error.
    #[instrument(skip(self, password))]
    pub async fn login_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.send_json(
            Method::POST,
            "/admin/login",
            None,
            &LoginRequest { email, password },
        )
        .await
    }

    /// `POST /employee/login`
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` on bad credentials, or a transport/status
    /// error.
    #[instrument(skip(self, password))]
    pub async fn login_employee(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        self.send_json(
            Method::POST,
            "/employee/login",
            None,
            &LoginRequest { email, password },
        )
        .await
    }

    // =========================================================================
    // Admin dashboard
    // =========================================================================

    /// `GET /admin/dashboardadmin-overview` - the signed-in admin's profile.
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn admin_profile(&self, token: &str) -> Result<AdminProfile, ApiError> {
        self.get_json("/admin/dashboardadmin-overview", token).await
    }

    /// `GET /admin/dashboard-overview` - aggregate attendance numbers.
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn admin_overview(&self, token: &str) -> Result<DashboardOverview, ApiError> {
        self.get_json("/admin/dashboard-overview", token).await
    }

    /// `GET /admin/employees` - the full employee directory.
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn employees(&self, token: &str) -> Result<Vec<EmployeeRecord>, ApiError> {
        self.get_json("/admin/employees", token).await
    }

    /// `GET /admin/dashboard/active` - currently active check-ins.
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn active_checkins(&self, token: &str) -> Result<Vec<ActiveCheckin>, ApiError> {
        self.get_json("/admin/dashboard/active", token).await
    }

    /// `GET /admin/tasks` - every task on the board.
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn admin_tasks(&self, token: &str) -> Result<Vec<AdminTask>, ApiError> {
        self.get_json("/admin/tasks", token).await
    }

    /// `POST /admin/tasks`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn create_task(&self, token: &str, task: &TaskInput) -> Result<AdminTask, ApiError> {
        self.send_json(Method::POST, "/admin/tasks", Some(token), task)
            .await
    }

    /// `PUT /admin/tasks/{id}`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn update_task(
        &self,
        token: &str,
        task_id: &str,
        task: &TaskInput,
    ) -> Result<AdminTask, ApiError> {
        self.send_json(
            Method::PUT,
            &format!("/admin/tasks/{task_id}"),
            Some(token),
            task,
        )
        .await
    }

    /// `DELETE /admin/tasks/{id}`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn delete_task(&self, token: &str, task_id: &str) -> Result<ApiMessage, ApiError> {
        self.send_empty(Method::DELETE, &format!("/admin/tasks/{task_id}"), token)
            .await
    }

    /// `POST /admin/notifications`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn send_notification(
        &self,
        token: &str,
        notification: &NotificationRequest,
    ) -> Result<ApiMessage, ApiError> {
        self.send_json(Method::POST, "/admin/notifications", Some(token), notification)
            .await
    }

    /// `PUT /admin/geofence`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn update_geofence(
        &self,
        token: &str,
        geofence: &GeofenceUpdate,
    ) -> Result<ApiMessage, ApiError> {
        self.send_json(Method::PUT, "/admin/geofence", Some(token), geofence)
            .await
    }

    /// `POST /employee/register` - multipart employee registration.
    ///
    /// The registration endpoint is unauthenticated upstream; access
    /// control for the form lives in this site's admin route guard.
    ///
    /// # Errors
    ///
    /// Transport or status errors from the API, including an invalid photo
    /// content type.
    pub async fn register_employee(&self, employee: NewEmployee) -> Result<ApiMessage, ApiError> {
        let mut form = multipart::Form::new()
            .text("name", employee.name)
            .text("email", employee.email)
            .text("password", employee.password)
            .text("department", employee.department)
            .text("designation", employee.designation)
            .text("contactNumber", employee.contact_number);

        if let Some(photo) = employee.photo {
            let part = multipart::Part::bytes(photo.bytes)
                .file_name(photo.file_name)
                .mime_str(&photo.content_type)?;
            form = form.part("photo", part);
        }

        let response = self
            .inner
            .client
            .post(self.url("/employee/register"))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    // =========================================================================
    // Employee dashboard
    // =========================================================================

    /// `POST /employee/checkin`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API (including geofence
    /// rejections, which come back as status errors).
    pub async fn checkin(&self, token: &str, request: &CheckRequest) -> Result<ApiMessage, ApiError> {
        self.send_json(Method::POST, "/employee/checkin", Some(token), request)
            .await
    }

    /// `POST /employee/checkout`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn checkout(
        &self,
        token: &str,
        request: &CheckRequest,
    ) -> Result<ApiMessage, ApiError> {
        self.send_json(Method::POST, "/employee/checkout", Some(token), request)
            .await
    }

    /// `GET /employee/dashboard/{id}/checkin` - today's check-in state.
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn checkin_status(
        &self,
        token: &str,
        employee_id: &EmployeeId,
    ) -> Result<CheckinStatus, ApiError> {
        self.get_json(&format!("/employee/dashboard/{employee_id}/checkin"), token)
            .await
    }

    /// `GET /employee/dashboard/{id}/work-metrics`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn work_metrics(
        &self,
        token: &str,
        employee_id: &EmployeeId,
    ) -> Result<WorkMetrics, ApiError> {
        self.get_json(
            &format!("/employee/dashboard/{employee_id}/work-metrics"),
            token,
        )
        .await
    }

    /// `GET /employee/dashboard/{id}/tasks`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn employee_tasks(
        &self,
        token: &str,
        employee_id: &EmployeeId,
    ) -> Result<Vec<EmployeeTask>, ApiError> {
        self.get_json(&format!("/employee/dashboard/{employee_id}/tasks"), token)
            .await
    }

    /// `GET /employee/dashboard/{id}/meetings`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn meetings(
        &self,
        token: &str,
        employee_id: &EmployeeId,
    ) -> Result<Vec<Meeting>, ApiError> {
        self.get_json(&format!("/employee/dashboard/{employee_id}/meetings"), token)
            .await
    }

    /// `GET /employee/attendance/{id}/{year}/{month}` - one month of
    /// attendance.
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn attendance_month(
        &self,
        token: &str,
        employee_id: &EmployeeId,
        year: i32,
        month: u32,
    ) -> Result<AttendanceMonth, ApiError> {
        self.get_json(
            &format!("/employee/attendance/{employee_id}/{year}/{month}"),
            token,
        )
        .await
    }

    /// `GET /employee/tasks/{id}` - task detail with comments.
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn task_detail(&self, token: &str, task_id: &str) -> Result<TaskDetail, ApiError> {
        self.get_json(&format!("/employee/tasks/{task_id}"), token)
            .await
    }

    /// `PUT /employee/tasks/{id}/status`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn update_task_status(
        &self,
        token: &str,
        task_id: &str,
        status: &str,
    ) -> Result<EmployeeTask, ApiError> {
        self.send_json(
            Method::PUT,
            &format!("/employee/tasks/{task_id}/status"),
            Some(token),
            &StatusUpdate { status },
        )
        .await
    }

    /// `POST /employee/tasks/{id}/comments`
    ///
    /// # Errors
    ///
    /// Transport, auth, or status errors from the API.
    pub async fn add_task_comment(
        &self,
        token: &str,
        task_id: &str,
        comment: &NewComment<'_>,
    ) -> Result<TaskDetail, ApiError> {
        self.send_json(
            Method::POST,
            &format!("/employee/tasks/{task_id}/comments"),
            Some(token),
            comment,
        )
        .await
    }
}
