//! Application state and dependency injection.

mod config;
mod session;

use relay_semble::{Credentials, SembleService};

pub use crate::service::config::ServiceConfig;
pub use crate::service::session::SessionManager;
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Tracing target for state assembly.
const TRACING_TARGET: &str = "relay_server::service";

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone, Debug)]
pub struct ServiceState {
    pub semble: SembleService,
    pub session: SessionManager,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Validates the credentials and opens the Semble session before
    /// returning, so a misconfigured account never reaches the listener.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let credentials = config.credentials()?;
        let semble = config.connect_semble()?;
        Self::connect(semble, credentials).await
    }

    /// Creates the state and opens the session eagerly.
    pub async fn connect(semble: SembleService, credentials: Credentials) -> Result<Self> {
        let state = Self::new(semble, credentials);

        state.session.ensure_session().await.map_err(|e| {
            Error::auth("Failed to authenticate with Semble").with_source(e)
        })?;

        tracing::info!(target: TRACING_TARGET, "Service state initialized");
        Ok(state)
    }

    /// Creates the state without a session.
    ///
    /// The first relay request logs in.
    pub fn new(semble: SembleService, credentials: Credentials) -> Self {
        let session = SessionManager::new(semble.clone(), credentials);
        Self { semble, session }
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(semble: SembleService);
impl_di!(session: SessionManager);

#[cfg(test)]
mod tests {
    use relay_semble::mock::MockProvider;
    use relay_semble::{DEFAULT_SERVICE, ErrorKind as SembleErrorKind};
    use url::Url;

    use super::*;
    use crate::ErrorKind;

    fn credentials() -> Credentials {
        Credentials::new(
            Url::parse(DEFAULT_SERVICE).unwrap(),
            "alice.bsky.social",
            "app-pass",
        )
    }

    #[tokio::test]
    async fn connect_opens_session() {
        let provider = MockProvider::new();
        let state = ServiceState::connect(provider.clone().into_service(), credentials())
            .await
            .unwrap();

        assert!(state.session.is_authenticated().await);
        assert_eq!(provider.login_count(), 1);
    }

    #[tokio::test]
    async fn connect_fails_when_login_fails() {
        let provider = MockProvider::new();
        provider.fail_login(SembleErrorKind::Authentication);

        let error = ServiceState::connect(provider.into_service(), credentials())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Auth);
    }

    #[tokio::test]
    async fn from_config_rejects_missing_credentials() {
        let error = ServiceState::from_config(&ServiceConfig::default())
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }
}
