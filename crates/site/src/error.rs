//! Unified error handling for the site.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::api::ApiError;

/// Application-level error type for route handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// The remote TrackZone API failed.
    #[error("API error: {0}")]
    Api(ApiError),

    /// The API rejected the session's bearer token. The next guarded
    /// request evicts the stale credentials; the response is the silent
    /// redirect back to the role selector, not an error page.
    #[error("session no longer valid")]
    SessionExpired,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => Self::SessionExpired,
            other => Self::Api(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server-side failures with Sentry
        if matches!(self, Self::Api(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Site request error"
            );
        }

        match &self {
            Self::SessionExpired => Redirect::to("/login-selector").into_response(),
            Self::Api(_) => (
                StatusCode::BAD_GATEWAY,
                "The TrackZone service is unavailable right now. Please try again.",
            )
                .into_response(),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            // Don't expose internal error details to clients
            Self::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("task t-9".to_owned());
        assert_eq!(err.to_string(), "Not found: task t-9");

        let err = AppError::BadRequest("missing title".to_owned());
        assert_eq!(err.to_string(), "Bad request: missing title");
    }

    #[test]
    fn test_status_codes() {
        fn status_of(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            status_of(AppError::NotFound("x".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::BadRequest("x".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("x".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unauthorized_api_error_becomes_session_expired_redirect() {
        let err: AppError = ApiError::Unauthorized.into();
        assert!(matches!(err, AppError::SessionExpired));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/login-selector")
        );
    }
}
