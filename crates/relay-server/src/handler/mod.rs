//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use relay_server::handler::routes;
//! use relay_server::service::{ServiceConfig, ServiceState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::default();
//! let state = ServiceState::from_config(&config).await?;
//! let app: axum::Router = routes().with_state(state);
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod error;
mod monitors;
mod request;
mod response;
mod webhooks;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::request::RelayRequest;
pub use crate::handler::response::{
    ErrorResponse, HealthResponse, RelayResponse, TestWebhookResponse,
};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and the not-found fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(monitors::routes())
        .merge(webhooks::routes())
        .fallback(handler)
}

#[cfg(test)]
pub(crate) mod test {
    use axum_test::TestServer;
    use relay_semble::mock::MockProvider;
    use relay_semble::{Credentials, DEFAULT_SERVICE};
    use url::Url;

    use crate::handler::routes;
    use crate::middleware::RouterRecoveryExt;
    use crate::service::ServiceState;

    fn credentials() -> Credentials {
        Credentials::new(
            Url::parse(DEFAULT_SERVICE).expect("valid service url"),
            "alice.bsky.social",
            "app-pass",
        )
    }

    /// Returns a state backed by a fresh mock provider, without a session.
    pub fn test_state() -> (ServiceState, MockProvider) {
        let provider = MockProvider::new();
        let state = ServiceState::new(provider.clone().into_service(), credentials());
        (state, provider)
    }

    /// Returns a new [`TestServer`] with the given state.
    pub fn create_test_server_with_state(state: ServiceState) -> anyhow::Result<TestServer> {
        let app = routes().with_recovery().with_state(state);
        TestServer::new(app)
    }

    /// Returns a new [`TestServer`] whose session was opened at startup.
    pub async fn create_test_server() -> anyhow::Result<(TestServer, MockProvider)> {
        let provider = MockProvider::new();
        let state = ServiceState::connect(provider.clone().into_service(), credentials()).await?;
        let server = create_test_server_with_state(state)?;
        Ok((server, provider))
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let (server, _provider) = create_test_server().await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() -> anyhow::Result<()> {
        let (server, _provider) = create_test_server().await?;

        let response = server.get("/nope").await;
        response.assert_status_not_found();
        response.assert_json(&serde_json::json!({
            "success": false,
            "error": "Not found",
        }));
        Ok(())
    }
}
