//! Authentication route handlers.
//!
//! The login forms are the only collaborators that talk to the remote
//! login endpoints; committing the resulting credentials to the session is
//! the state machine's job via `commit_login`/`commit_logout`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use trackzone_core::Role;

use crate::api::ApiError;
use crate::filters;
use crate::middleware::{CurrentSession, commit_login, commit_logout};
use crate::state::AppState;

// =============================================================================
// Form and query types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Map an error code from the redirect query to user-facing copy.
fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "unavailable" => "The TrackZone service is unreachable right now. Please try again.",
        "session" => "Could not start your session. Please try again.",
        _ => "Login failed. Please try again.",
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Role selection page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/selector.html")]
pub struct SelectorTemplate;

/// Login page template, shared by both roles.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub heading: String,
    pub subtitle: String,
    pub action: String,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the role selection screen.
///
/// This is where every guard denial lands.
pub async fn login_selector() -> impl IntoResponse {
    SelectorTemplate
}

/// Display the admin login page.
///
/// An already-authenticated session is bounced straight to its dashboard.
pub async fn admin_login_page(
    CurrentSession(auth): CurrentSession,
    Query(query): Query<MessageQuery>,
) -> Response {
    if let Some(role) = auth.role() {
        return Redirect::to(role.dashboard_path()).into_response();
    }
    LoginTemplate {
        heading: "Welcome to Trackzone".to_owned(),
        subtitle: "Secure Access to Your World".to_owned(),
        action: "/admin-login".to_owned(),
        error: query.error.as_deref().map(|c| error_message(c).to_owned()),
    }
    .into_response()
}

/// Display the employee login page.
pub async fn employee_login_page(
    CurrentSession(auth): CurrentSession,
    Query(query): Query<MessageQuery>,
) -> Response {
    if let Some(role) = auth.role() {
        return Redirect::to(role.dashboard_path()).into_response();
    }
    LoginTemplate {
        heading: "Employee Login".to_owned(),
        subtitle: "Secure Access for Employees".to_owned(),
        action: "/employee-login".to_owned(),
        error: query.error.as_deref().map(|c| error_message(c).to_owned()),
    }
    .into_response()
}

/// Handle the admin login form.
pub async fn admin_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.api().login_admin(&form.email, &form.password).await {
        Ok(response) => {
            // Admin sessions never carry an employee identity, whatever the
            // endpoint returned alongside the token.
            if let Err(e) = commit_login(&session, Role::Admin, &response.token, None).await {
                tracing::error!("failed to store admin session: {e}");
                return Redirect::to("/admin-login?error=session").into_response();
            }
            Redirect::to(Role::Admin.dashboard_path()).into_response()
        }
        Err(ApiError::Unauthorized) => {
            Redirect::to("/admin-login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::warn!("admin login failed: {e}");
            Redirect::to("/admin-login?error=unavailable").into_response()
        }
    }
}

/// Handle the employee login form.
pub async fn employee_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.api().login_employee(&form.email, &form.password).await {
        Ok(response) => {
            if let Err(e) =
                commit_login(&session, Role::Employee, &response.token, response.employee).await
            {
                tracing::error!("failed to store employee session: {e}");
                return Redirect::to("/employee-login?error=session").into_response();
            }
            Redirect::to(Role::Employee.dashboard_path()).into_response()
        }
        Err(ApiError::Unauthorized) => {
            Redirect::to("/employee-login?error=credentials").into_response()
        }
        Err(e) => {
            tracing::warn!("employee login failed: {e}");
            Redirect::to("/employee-login?error=unavailable").into_response()
        }
    }
}

/// Handle logout: clear the credential slots and return to the selector.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = commit_logout(&session).await {
        tracing::error!("failed to clear session: {e}");
    }
    Redirect::to("/login-selector").into_response()
}
