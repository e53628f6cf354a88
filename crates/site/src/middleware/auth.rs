//! The route guard: authentication extractors for role-scoped dashboards.
//!
//! Each guarded handler declares `RequireAdmin` or `RequireEmployee`. The
//! extractor hydrates the session state machine from the session-backed
//! credential store, runs the opportunistic token-expiry check (evicting a
//! dead token before it reaches the API), persists any self-repair, and
//! authorizes the required role. Denial is always a redirect to the role
//! selector - an HTTP redirect replaces the history entry, so Back cannot
//! return to the guarded page.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use trackzone_core::{AuthSession, EmployeeProfile, Role, token};

use super::credentials::SessionSlots;

/// Where every guard denial lands.
pub const LOGIN_SELECTOR_PATH: &str = "/login-selector";

/// Extractor that requires an admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(
///     RequireAdmin(admin): RequireAdmin,
/// ) -> impl IntoResponse {
///     // admin.token is ready for API calls
/// }
/// ```
pub struct RequireAdmin(pub AdminSession);

/// The admin identity handed to guarded handlers.
pub struct AdminSession {
    /// Bearer token for admin API calls.
    pub token: String,
}

/// Extractor that requires an employee session.
pub struct RequireEmployee(pub EmployeeSession);

/// The employee identity handed to guarded handlers.
pub struct EmployeeSession {
    /// Bearer token for employee API calls.
    pub token: String,
    /// Identity record; absent when the stored record was missing or
    /// unreadable. Handlers degrade rather than reject.
    pub profile: Option<EmployeeProfile>,
}

/// Guard denial: unauthenticated, wrong role, or expired token.
pub struct GuardRejection;

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_SELECTOR_PATH).into_response()
    }
}

/// Hydrate the session state for this request.
///
/// Runs initialize + the expiry check and persists whatever changed
/// (self-repair, eviction) back to the session before anything renders.
async fn resolve_session(session: &Session) -> AuthSession {
    let mut slots = SessionSlots::load(session).await;
    let mut auth = AuthSession::initialize(&mut slots);

    let expired = auth.token().is_some_and(token::is_expired);
    if expired {
        auth.evict_expired(&mut slots);
    }

    if let Err(e) = slots.persist(session).await {
        tracing::error!("failed to persist credential slots: {e}");
    }
    auth
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or(GuardRejection)?;
        let auth = resolve_session(session).await;

        if !auth.authorize(Role::Admin) {
            return Err(GuardRejection);
        }
        let token = auth.token().map(str::to_owned).ok_or(GuardRejection)?;
        Ok(Self(AdminSession { token }))
    }
}

impl<S> FromRequestParts<S> for RequireEmployee
where
    S: Send + Sync,
{
    type Rejection = GuardRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or(GuardRejection)?;
        let auth = resolve_session(session).await;

        if !auth.authorize(Role::Employee) {
            return Err(GuardRejection);
        }
        let token = auth.token().map(str::to_owned).ok_or(GuardRejection)?;
        let profile = auth.profile().cloned();
        Ok(Self(EmployeeSession { token, profile }))
    }
}

/// Extractor that reports the current session without rejecting.
///
/// Used by the login pages to bounce already-authenticated visitors to
/// their dashboard.
pub struct CurrentSession(pub AuthSession);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = match parts.extensions.get::<Session>() {
            Some(session) => resolve_session(session).await,
            None => AuthSession::Unauthenticated,
        };
        Ok(Self(auth))
    }
}

/// Commit a successful login to the session-backed credential store.
///
/// The credential writes and the in-memory state change happen against one
/// snapshot, persisted in a single session update - no request can observe
/// a half-written session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn commit_login(
    session: &Session,
    role: Role,
    token: &str,
    profile: Option<EmployeeProfile>,
) -> Result<(), tower_sessions::session::Error> {
    let mut slots = SessionSlots::load(session).await;
    AuthSession::login(&mut slots, role, token, profile);
    slots.persist(session).await
}

/// Clear the session's credentials (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn commit_logout(session: &Session) -> Result<(), tower_sessions::session::Error> {
    let mut slots = SessionSlots::load(session).await;
    let mut auth = AuthSession::initialize(&mut slots);
    auth.logout(&mut slots);
    slots.persist(session).await
}
