//! Ownership of the single authenticated Semble session.

use std::fmt;
use std::sync::Arc;

use relay_semble::{AuthSession, Credentials, Error, Result, SembleService};
use tokio::sync::{Mutex, RwLock};

/// Tracing target for session lifecycle events.
const TRACING_TARGET: &str = "relay_server::service::session";

struct SessionManagerInner {
    semble: SembleService,
    credentials: Credentials,
    session: RwLock<Option<AuthSession>>,
    login: Mutex<()>,
}

/// Holder of the process-wide Semble session.
///
/// The session is either absent or present. It is opened by
/// [`ensure_session`] and cleared by [`invalidate`], which callers invoke
/// exactly when a call through the session fails with an authentication error.
/// Concurrent callers that find the session absent share a single login.
///
/// [`ensure_session`]: SessionManager::ensure_session
/// [`invalidate`]: SessionManager::invalidate
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("credentials", &self.inner.credentials)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Creates a manager with no session.
    pub fn new(semble: SembleService, credentials: Credentials) -> Self {
        let inner = SessionManagerInner {
            semble,
            credentials,
            session: RwLock::new(None),
            login: Mutex::new(()),
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Logs in with the configured credentials without storing the result.
    ///
    /// Missing credentials are rejected before any network call. Every
    /// failure, including transport ones, is reported as an authentication
    /// error.
    pub async fn initialize(&self) -> Result<AuthSession> {
        let credentials = &self.inner.credentials;

        if !credentials.is_complete() {
            tracing::error!(
                target: TRACING_TARGET,
                "Semble handle or app password is missing"
            );

            return Err(Error::authentication()
                .with_message("Missing Semble handle or app password"));
        }

        tracing::info!(
            target: TRACING_TARGET,
            handle = %credentials.handle,
            service = %credentials.service,
            "Initializing Semble session"
        );

        match self.inner.semble.login(credentials).await {
            Ok(session) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    did = %session.did,
                    handle = %session.handle,
                    "Authenticated with Semble"
                );
                Ok(session)
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Failed to initialize Semble session"
                );

                if error.is_authentication() {
                    Err(error)
                } else {
                    Err(Error::authentication()
                        .with_message(error.reason().to_owned())
                        .with_source(error))
                }
            }
        }
    }

    /// Returns the current session, logging in first if there is none.
    pub async fn ensure_session(&self) -> Result<AuthSession> {
        if let Some(session) = self.current().await {
            return Ok(session);
        }

        let _login = self.inner.login.lock().await;

        // Another caller may have logged in while this one waited.
        if let Some(session) = self.current().await {
            return Ok(session);
        }

        tracing::debug!(target: TRACING_TARGET, "No Semble session, logging in");

        let session = self.initialize().await?;
        *self.inner.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Clears the current session.
    pub async fn invalidate(&self) {
        let previous = self.inner.session.write().await.take();

        if let Some(session) = previous {
            tracing::warn!(
                target: TRACING_TARGET,
                did = %session.did,
                "Semble session invalidated"
            );
        }
    }

    /// Returns a copy of the current session, if any.
    pub async fn current(&self) -> Option<AuthSession> {
        self.inner.session.read().await.clone()
    }

    /// Returns whether a session is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.session.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use relay_semble::mock::MockProvider;
    use relay_semble::{DEFAULT_SERVICE, ErrorKind};
    use url::Url;

    use super::*;

    fn manager(provider: &MockProvider, handle: &str, password: &str) -> SessionManager {
        let credentials =
            Credentials::new(Url::parse(DEFAULT_SERVICE).unwrap(), handle, password);
        SessionManager::new(provider.clone().into_service(), credentials)
    }

    #[tokio::test]
    async fn ensure_session_logs_in_once() {
        let provider = MockProvider::new();
        let manager = manager(&provider, "alice.bsky.social", "app-pass");
        assert!(!manager.is_authenticated().await);

        manager.ensure_session().await.unwrap();
        manager.ensure_session().await.unwrap();

        assert!(manager.is_authenticated().await);
        assert_eq!(provider.login_count(), 1);
    }

    #[tokio::test]
    async fn missing_credentials_fail_before_login() {
        let provider = MockProvider::new();
        let manager = manager(&provider, "", "app-pass");

        let error = manager.initialize().await.unwrap_err();
        assert!(error.is_authentication());
        assert_eq!(provider.login_count(), 0);
    }

    #[tokio::test]
    async fn login_failures_are_authentication_errors() {
        let provider = MockProvider::new();
        provider.fail_login(ErrorKind::NetworkError);
        let manager = manager(&provider, "alice.bsky.social", "app-pass");

        let error = manager.ensure_session().await.unwrap_err();
        assert!(error.is_authentication());
        assert!(!manager.is_authenticated().await);
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_login() {
        let provider = MockProvider::new();
        let manager = manager(&provider, "alice.bsky.social", "app-pass");

        let first = manager.ensure_session().await.unwrap();
        manager.invalidate().await;
        assert!(!manager.is_authenticated().await);

        let second = manager.ensure_session().await.unwrap();
        assert_ne!(first.access_jwt(), second.access_jwt());
        assert_eq!(provider.login_count(), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_login() {
        let provider = MockProvider::new();
        let manager = manager(&provider, "alice.bsky.social", "app-pass");

        let tasks = (0..8)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.ensure_session().await })
            })
            .collect::<Vec<_>>();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(provider.login_count(), 1);
    }
}
