//! Authenticated session handle.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use url::Url;

/// An authenticated session with a PDS.
///
/// Returned by a successful login and required for every card operation.
/// The tokens are opaque to callers and never shown in `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// DID of the logged-in account; records are written to this repository.
    pub did: String,
    /// Handle reported by the server at login.
    pub handle: String,
    /// Endpoint that issued the session and receives subsequent calls.
    pub service: Url,
    /// When the session was established.
    pub created_at: Timestamp,
    access_jwt: String,
    refresh_jwt: String,
}

impl AuthSession {
    /// Creates a new session from a login response.
    pub fn new(
        did: impl Into<String>,
        handle: impl Into<String>,
        service: Url,
        access_jwt: impl Into<String>,
        refresh_jwt: impl Into<String>,
    ) -> Self {
        Self {
            did: did.into(),
            handle: handle.into(),
            service,
            created_at: Timestamp::now(),
            access_jwt: access_jwt.into(),
            refresh_jwt: refresh_jwt.into(),
        }
    }

    /// Returns the bearer token for authenticated calls.
    #[must_use]
    pub fn access_jwt(&self) -> &str {
        &self.access_jwt
    }

    /// Returns the refresh token issued alongside the access token.
    #[must_use]
    pub fn refresh_jwt(&self) -> &str {
        &self.refresh_jwt
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("did", &self.did)
            .field("handle", &self.handle)
            .field("service", &self.service.as_str())
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}
