//! HTTP middleware stack for the site.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions, backing the credential store)
//! 5. Security headers (CSP, frame options, etc.)
//!
//! The route guard itself is not a layer: `RequireAdmin`/`RequireEmployee`
//! are extractors declared per handler.

pub mod auth;
pub mod credentials;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{CurrentSession, RequireAdmin, RequireEmployee, commit_login, commit_logout};
pub use credentials::SessionSlots;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
