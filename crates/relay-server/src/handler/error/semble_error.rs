//! Conversion of Semble client errors into HTTP errors.

use relay_semble::Error as SembleError;

use crate::handler::{Error, ErrorKind};

impl From<SembleError> for Error<'static> {
    fn from(error: SembleError) -> Self {
        let kind = if error.is_authentication() {
            ErrorKind::Authentication
        } else {
            ErrorKind::RemoteOperation
        };

        let mut http_error = kind
            .with_message(error.reason().to_owned())
            .with_context(error.kind.to_string());

        if let Some(context) = error.context {
            http_error = http_error.with_context(format!("{}: {}", error.kind, context));
        }

        http_error
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use relay_semble::ErrorKind as SembleErrorKind;

    use super::*;

    #[test]
    fn authentication_errors_keep_their_kind() {
        let error = Error::from(SembleError::authentication().with_message("Token has expired"));

        assert_eq!(error.kind(), ErrorKind::Authentication);
        assert_eq!(error.message(), Some("Token has expired"));
        assert_eq!(error.kind().status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn other_errors_are_remote_operation_failures() {
        let error = Error::from(
            SembleError::new(SembleErrorKind::ServiceUnavailable).with_context("status 503"),
        );

        assert_eq!(error.kind(), ErrorKind::RemoteOperation);
        assert_eq!(error.message(), Some("service_unavailable"));
        assert_eq!(error.context(), Some("service_unavailable: status 503"));
    }
}
