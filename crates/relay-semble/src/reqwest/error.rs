//! Error types for XRPC calls.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::ErrorKind;

/// Result type alias for reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// XRPC error codes that mean the session or credentials are unusable.
const AUTHENTICATION_CODES: &[&str] = &[
    "AuthenticationRequired",
    "ExpiredToken",
    "InvalidToken",
    "AuthMissing",
    "AccountTakedown",
];

/// XRPC error codes that mean the record does not exist.
const NOT_FOUND_CODES: &[&str] = &["RecordNotFound", "RepoNotFound"];

/// Error body returned by XRPC endpoints on failure.
#[derive(Debug, Default, Clone, Deserialize)]
pub(crate) struct XrpcErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error type for reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The endpoint answered with a non-success status.
    #[error("XRPC error ({status}): {}", code.as_deref().unwrap_or("Unknown"))]
    Xrpc {
        status: StatusCode,
        code: Option<String>,
        message: Option<String>,
    },
}

impl Error {
    /// Builds an XRPC error from a status and a raw response body.
    pub(crate) fn xrpc(status: StatusCode, body: &[u8]) -> Self {
        let body: XrpcErrorBody = serde_json::from_slice(body).unwrap_or_default();
        Self::Xrpc {
            status,
            code: body.error,
            message: body.message,
        }
    }
}

/// Maps an XRPC failure onto an error kind.
///
/// The error code wins over the status, since a PDS answers an expired
/// access token with `400 ExpiredToken`.
pub(crate) fn classify(status: StatusCode, code: Option<&str>) -> ErrorKind {
    if let Some(code) = code {
        if AUTHENTICATION_CODES.contains(&code) {
            return ErrorKind::Authentication;
        }
        if NOT_FOUND_CODES.contains(&code) {
            return ErrorKind::NotFound;
        }
    }

    match status {
        StatusCode::UNAUTHORIZED => ErrorKind::Authentication,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::BAD_REQUEST => ErrorKind::InvalidInput,
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimited,
        s if s.is_server_error() => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::Unknown,
    }
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    crate::Error::timeout()
                        .with_message(e.to_string())
                        .with_source(e)
                } else if e.is_connect() {
                    crate::Error::network_error()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_decode() {
                    crate::Error::serialization()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    crate::Error::network_error()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => crate::Error::serialization()
                .with_message(e.to_string())
                .with_source(e),
            Error::Xrpc {
                status,
                code,
                message,
            } => {
                let kind = classify(status, code.as_deref());
                let message = match (code, message) {
                    (Some(code), Some(message)) => format!("{code}: {message}"),
                    (Some(code), None) => code,
                    (None, Some(message)) => message,
                    (None, None) => format!("Request failed with status {status}"),
                };

                crate::Error::new(kind)
                    .with_message(message)
                    .with_context(format!("status {}", status.as_u16()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_codes_win_over_status() {
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, Some("ExpiredToken")),
            ErrorKind::Authentication
        );
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, Some("InvalidToken")),
            ErrorKind::Authentication
        );
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, Some("AuthenticationRequired")),
            ErrorKind::Authentication
        );
    }

    #[test]
    fn status_fallbacks() {
        assert_eq!(classify(StatusCode::UNAUTHORIZED, None), ErrorKind::Authentication);
        assert_eq!(classify(StatusCode::NOT_FOUND, None), ErrorKind::NotFound);
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, Some("InvalidRequest")),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            classify(StatusCode::TOO_MANY_REQUESTS, None),
            ErrorKind::RateLimited
        );
        assert_eq!(
            classify(StatusCode::BAD_GATEWAY, None),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(classify(StatusCode::FORBIDDEN, None), ErrorKind::Unknown);
    }

    #[test]
    fn record_not_found_code() {
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, Some("RecordNotFound")),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn xrpc_error_converts_with_message() {
        let body = br#"{"error":"ExpiredToken","message":"Token has expired"}"#;
        let error: crate::Error = Error::xrpc(StatusCode::BAD_REQUEST, body).into();

        assert!(error.is_authentication());
        assert_eq!(error.reason(), "ExpiredToken: Token has expired");
        assert_eq!(error.context.as_deref(), Some("status 400"));
    }

    #[test]
    fn xrpc_error_tolerates_non_json_body() {
        let error: crate::Error =
            Error::xrpc(StatusCode::SERVICE_UNAVAILABLE, b"<html>down</html>").into();

        assert_eq!(error.kind, ErrorKind::ServiceUnavailable);
        assert!(error.reason().contains("503"));
    }

    #[test]
    fn auth_wording_is_not_enough() {
        let body = br#"{"error":"InternalServerError","message":"auth backend failed during login"}"#;
        let error: crate::Error = Error::xrpc(StatusCode::INTERNAL_SERVER_ERROR, body).into();

        assert!(!error.is_authentication());
    }
}
