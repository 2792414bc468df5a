//! HTTP server startup and lifecycle management.
//!
//! The relay does not drain in-flight requests: the first SIGINT or SIGTERM
//! stops the listener and the process exits.

mod error;
mod http_server;
mod lifecycle;
mod shutdown;

use axum::Router;
pub use error::{ServerError, ServerResult};
use http_server::serve_http;
use shutdown::shutdown_signal;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;
use crate::config::ServerConfig;

/// Binds the configured address and serves `app` until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if:
/// - Server configuration is invalid
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve(app: Router, config: ServerConfig) -> ServerResult<()> {
    serve_http(app, config).await.inspect_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error_code = err.error_code(),
            suggestion = err.suggestion(),
            "Server stopped with an error"
        );
    })
}
