//! Recovery middleware for handling panics.
//!
//! No request timeout is imposed here: a relay request runs until the Semble
//! client's own transport timeout gives up.

use std::any::Any;

use axum::Router;
use axum::response::{IntoResponse, Response};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{Error, ErrorKind};

/// Tracing target for panic recovery.
const TRACING_TARGET_PANIC: &str = "relay_server::recovery::panic";

type Panic = Box<dyn Any + Send + 'static>;

/// Extension trait for `axum::`[`Router`] to apply recovery middleware.
pub trait RouterRecoveryExt<S> {
    /// Layers panic recovery, converting a panicking handler into a
    /// `500 Internal server error` response.
    fn with_recovery(self) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self) -> Self {
        let middlewares = ServiceBuilder::new().layer(CatchPanicLayer::custom(catch_panic));
        self.layer(middlewares)
    }
}

fn catch_panic(err: Panic) -> Response {
    if let Some(error) = err.downcast_ref::<Error>() {
        tracing::error!(
            target: TRACING_TARGET_PANIC,
            error = %error,
            "service panic"
        );
        return error.clone().into_response();
    }

    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    tracing::error!(
        target: TRACING_TARGET_PANIC,
        message = %message,
        "service panic"
    );

    ErrorKind::InternalServerError.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::*;

    async fn panicking() -> &'static str {
        panic!("handler exploded")
    }

    #[tokio::test]
    async fn panic_becomes_internal_server_error() -> anyhow::Result<()> {
        let router = Router::new()
            .route("/panic", get(panicking))
            .with_recovery();
        let server = TestServer::new(router)?;

        let response = server.get("/panic").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({ "success": false, "error": "Internal server error" })
        );
        Ok(())
    }
}
