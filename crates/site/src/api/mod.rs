//! Client for the remote TrackZone REST API.
//!
//! Every piece of business logic - authentication, attendance computation,
//! geofence evaluation, task storage - lives behind this API. The site
//! holds no business state of its own: handlers call these methods with the
//! session's bearer token and render whatever comes back.
//!
//! # Retry
//!
//! Dashboard reads go through a single [`RetryPolicy`] (up to 3 attempts,
//! linear backoff) applied to transport errors and 5xx responses only.
//! Mutations are never retried.

mod client;
pub mod types;

pub use client::{ApiClient, RetryPolicy};

use thiserror::Error;

/// Errors that can occur when talking to the TrackZone API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request itself failed (connect, timeout, decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the bearer token. Callers end the session.
    #[error("authentication rejected by the TrackZone API")]
    Unauthorized,

    /// Any other non-success response, with the API's message when it sent
    /// one.
    #[error("TrackZone API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message body from the API, or the canonical status reason.
        message: String,
    },
}

impl ApiError {
    /// Whether retrying the same request can plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Unauthorized => false,
            Self::Status { status, .. } => *status >= 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(!ApiError::Unauthorized.is_retryable());
        assert!(
            ApiError::Status {
                status: 503,
                message: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ApiError::Status {
                status: 404,
                message: String::new()
            }
            .is_retryable()
        );
    }
}
