//! Liveness handler.

use axum::Router;
use axum::extract::State;
use axum::routing::get;

use crate::extract::Json;
use crate::handler::response::HealthResponse;
use crate::service::{ServiceState, SessionManager};

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "relay_server::handler::monitors";

/// Reports liveness and whether a Semble session is held.
#[tracing::instrument(skip_all)]
async fn health_status(State(session): State<SessionManager>) -> Json<HealthResponse> {
    let authenticated = session.is_authenticated().await;

    tracing::debug!(
        target: TRACING_TARGET,
        authenticated,
        "Health status check requested"
    );

    Json(HealthResponse::ok(authenticated))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}
