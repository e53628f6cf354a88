//! Integration test harness for TrackZone.
//!
//! Each test spawns two local servers: a stub of the remote TrackZone REST
//! API and the real site router with its session layer. Tests then drive
//! the site over HTTP with a cookie-holding client, so every assertion
//! exercises the same path a browser would: forms, redirects, the session
//! store, and the route guard.
//!
//! ```bash
//! cargo test -p trackzone-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use trackzone_site::api::{ApiClient, RetryPolicy};
use trackzone_site::config::SiteConfig;
use trackzone_site::middleware::create_session_layer;
use trackzone_site::routes::routes;
use trackzone_site::state::AppState;

// =============================================================================
// Test fixtures
// =============================================================================

pub const ADMIN_EMAIL: &str = "maya@trackzone.test";
pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const ADMIN_NAME: &str = "Maya Thomas";

pub const EMPLOYEE_EMAIL: &str = "priya@trackzone.test";
pub const EMPLOYEE_PASSWORD: &str = "employee-pass";
pub const EMPLOYEE_ID: &str = "EMP-1042";
pub const EMPLOYEE_NAME: &str = "Priya Raman";

/// Build a compact three-segment bearer token with the given `exp` claim.
///
/// The site never verifies signatures, so the signature segment is a dummy.
#[must_use]
pub fn token_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{EMPLOYEE_ID}","exp":{exp}}}"#));
    format!("{header}.{payload}.stub-signature")
}

/// A token that stays valid for the lifetime of any test run.
#[must_use]
pub fn future_token() -> String {
    token_with_exp(chrono::Utc::now().timestamp() + 3600)
}

/// A token whose `exp` claim is already in the past.
#[must_use]
pub fn expired_token() -> String {
    token_with_exp(chrono::Utc::now().timestamp() - 3600)
}

/// HTTP client with a cookie store and redirects disabled, so tests can
/// assert on each redirect individually.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build HTTP client")
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

// =============================================================================
// Stub TrackZone API
// =============================================================================

struct StubState {
    admin_token: String,
    employee_token: String,
    /// Status codes to serve from the overview endpoint before succeeding.
    overview_plan: Mutex<Vec<u16>>,
    overview_hits: AtomicU32,
}

/// An in-process stand-in for the remote TrackZone REST API.
///
/// Issues the tokens it was constructed with and serves fixed dashboard
/// data; the overview endpoint can be told to fail with a planned sequence
/// of statuses to exercise the retry policy.
pub struct StubApi {
    state: Arc<StubState>,
    pub base_url: String,
}

impl StubApi {
    /// Spawn the stub with tokens that stay valid for the whole test.
    pub async fn spawn() -> Self {
        Self::spawn_with_tokens(future_token(), future_token()).await
    }

    /// Spawn the stub issuing the given tokens from its login endpoints.
    pub async fn spawn_with_tokens(admin_token: String, employee_token: String) -> Self {
        let state = Arc::new(StubState {
            admin_token,
            employee_token,
            overview_plan: Mutex::new(Vec::new()),
            overview_hits: AtomicU32::new(0),
        });

        let app = Router::new()
            .route("/admin/login", post(admin_login))
            .route("/employee/login", post(employee_login))
            .route("/admin/dashboardadmin-overview", get(admin_profile))
            .route("/admin/dashboard-overview", get(admin_overview))
            .route("/admin/employees", get(admin_employees))
            .route("/admin/dashboard/active", get(active_checkins))
            .route("/admin/tasks", get(admin_tasks))
            .route("/employee/dashboard/{id}/checkin", get(checkin_status))
            .route("/employee/dashboard/{id}/work-metrics", get(work_metrics))
            .route("/employee/dashboard/{id}/tasks", get(employee_tasks))
            .route("/employee/dashboard/{id}/meetings", get(meetings))
            .with_state(Arc::clone(&state));

        let base_url = serve(app).await;
        Self { state, base_url }
    }

    /// Serve the given statuses from the overview endpoint, in order, before
    /// answering normally.
    pub fn fail_overview_with(&self, statuses: &[u16]) {
        self.state
            .overview_plan
            .lock()
            .expect("overview plan lock")
            .extend_from_slice(statuses);
    }

    /// How many times the overview endpoint has been hit.
    #[must_use]
    pub fn overview_hits(&self) -> u32 {
        self.state.overview_hits.load(Ordering::SeqCst)
    }
}

fn bearer_ok(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {expected}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Invalid credentials"})),
    )
        .into_response()
}

async fn admin_login(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    let email = body.get("email").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);
    if email != Some(ADMIN_EMAIL) || password != Some(ADMIN_PASSWORD) {
        return unauthorized();
    }
    Json(json!({"token": state.admin_token})).into_response()
}

async fn employee_login(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    let email = body.get("email").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);
    if email != Some(EMPLOYEE_EMAIL) || password != Some(EMPLOYEE_PASSWORD) {
        return unauthorized();
    }
    Json(json!({
        "token": state.employee_token,
        "employee": {
            "employeeId": EMPLOYEE_ID,
            "name": EMPLOYEE_NAME,
            "email": EMPLOYEE_EMAIL,
            "department": "Engineering",
            "designation": "Developer"
        }
    }))
    .into_response()
}

async fn admin_profile(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers, &state.admin_token) {
        return unauthorized();
    }
    Json(json!({
        "name": ADMIN_NAME,
        "position": "HR Administrator",
        "department": "People Operations",
        "lastLogin": "2026-03-01T08:30:00Z"
    }))
    .into_response()
}

async fn admin_overview(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers, &state.admin_token) {
        return unauthorized();
    }
    state.overview_hits.fetch_add(1, Ordering::SeqCst);

    let planned = {
        let mut plan = state.overview_plan.lock().expect("overview plan lock");
        if plan.is_empty() { None } else { Some(plan.remove(0)) }
    };
    if let Some(status) = planned {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(json!({"message": "planned stub failure"}))).into_response();
    }

    Json(json!({
        "total": 12,
        "presentToday": 9,
        "onLeave": 1,
        "avgHours": 7.4
    }))
    .into_response()
}

async fn admin_employees(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers, &state.admin_token) {
        return unauthorized();
    }
    Json(json!([{
        "_id": "64ac01",
        "employeeId": EMPLOYEE_ID,
        "name": EMPLOYEE_NAME,
        "position": "Developer",
        "department": "Engineering",
        "onLeave": false,
        "email": EMPLOYEE_EMAIL,
        "contactNumber": "+91 98400 00000"
    }]))
    .into_response()
}

async fn active_checkins(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers, &state.admin_token) {
        return unauthorized();
    }
    Json(json!([{
        "employeeId": {"_id": "64ac01"},
        "active": true,
        "checkInTime": "2026-03-02T09:04:00Z"
    }]))
    .into_response()
}

async fn admin_tasks(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers, &state.admin_token) {
        return unauthorized();
    }
    Json(json!([{
        "_id": "t1",
        "title": "File quarterly reports",
        "employeeId": {"_id": "64ac01", "name": EMPLOYEE_NAME},
        "priority": "High",
        "status": "In Progress",
        "dueDate": "2026-03-20T00:00:00Z"
    }]))
    .into_response()
}

async fn checkin_status(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers, &state.employee_token) {
        return unauthorized();
    }
    Json(json!({
        "checkInTime": "2026-03-02T09:04:00Z",
        "checkOutTime": null
    }))
    .into_response()
}

async fn work_metrics(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers, &state.employee_token) {
        return unauthorized();
    }
    Json(json!({"totalHours": 6.5, "leaveCount": 2})).into_response()
}

async fn employee_tasks(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers, &state.employee_token) {
        return unauthorized();
    }
    Json(json!([{
        "_id": "t1",
        "title": "Prepare release demo",
        "priority": "High",
        "status": "To Do",
        "deadline": "2026-03-10T00:00:00Z"
    }]))
    .into_response()
}

async fn meetings(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    if !bearer_ok(&headers, &state.employee_token) {
        return unauthorized();
    }
    Json(json!([{
        "_id": "m1",
        "title": "Sprint standup",
        "time": "2026-03-02T10:00:00Z",
        "host": "Maya"
    }]))
    .into_response()
}

// =============================================================================
// The site under test
// =============================================================================

/// The real site router, served on an ephemeral port against a stub API.
pub struct TestSite {
    pub base_url: String,
}

impl TestSite {
    /// Spawn the site wired to the given stub, with retry delays shrunk so
    /// the retry tests stay fast.
    pub async fn spawn(api: &StubApi) -> Self {
        let config = SiteConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://localhost:0".to_owned(),
            api_base_url: api.base_url.clone(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };
        let api_client = ApiClient::with_retry_policy(
            &config,
            RetryPolicy {
                max_attempts: 3,
                base_delay: Duration::from_millis(5),
            },
        );
        let session_layer = create_session_layer(&config);
        let state = AppState::with_api(config, api_client);

        let app = routes().layer(session_layer).with_state(state);
        let base_url = serve(app).await;
        Self { base_url }
    }

    /// Absolute URL for a site path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Spawn the stub API and the site together, both with valid tokens.
pub async fn spawn_site() -> (StubApi, TestSite) {
    let api = StubApi::spawn().await;
    let site = TestSite::spawn(&api).await;
    (api, site)
}

/// Serve a router on an ephemeral localhost port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has a local address");
    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("test server failed");
    });
    format!("http://{addr}")
}
