use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Failure envelope returned by every endpoint.
///
/// Serializes as `{"success": false, "error": "..."}`, plus `duration` when
/// the failure happened while talking to Semble.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Always `false`.
    pub success: bool,
    /// Client-facing error message.
    pub error: Cow<'a, str>,
    /// Milliseconds spent on the request before it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Error name used in logs (not serialized in JSON)
    #[serde(skip)]
    pub name: &'static str,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new("bad_request", "Invalid request", StatusCode::BAD_REQUEST);
    pub const NOT_FOUND: Self = Self::new("not_found", "Not found", StatusCode::NOT_FOUND);

    // 5xx Server Errors
    pub const AUTHENTICATION: Self = Self::new(
        "authentication",
        "Authentication with Semble failed",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "Internal server error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const REMOTE_OPERATION: Self = Self::new(
        "remote_operation",
        "Failed to create card",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'static str, error: &'a str, status: StatusCode) -> Self {
        Self {
            success: false,
            error: Cow::Borrowed(error),
            duration: None,
            name,
            status,
        }
    }

    /// Replaces the default message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.error = message.into();
        self
    }

    /// Records how long the request ran before failing.
    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
