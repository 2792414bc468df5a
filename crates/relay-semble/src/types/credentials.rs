//! Account credentials used to open a session.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Default PDS entryway used when no service endpoint is configured.
pub const DEFAULT_SERVICE: &str = "https://bsky.social";

/// Service endpoint, account handle and app password.
///
/// Read once at startup and never mutated afterwards.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Base URL of the PDS (or entryway) that hosts the account.
    pub service: Url,
    /// Account handle or DID used as the login identifier.
    pub handle: String,
    /// App password for the account.
    pub password: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    pub fn new(service: Url, handle: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            service,
            handle: handle.into(),
            password: password.into(),
        }
    }

    /// Returns whether both the handle and the password are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.handle.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("service", &self.service.as_str())
            .field("handle", &self.handle)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> Url {
        Url::parse(DEFAULT_SERVICE).unwrap()
    }

    #[test]
    fn complete_credentials() {
        let credentials = Credentials::new(service(), "alice.bsky.social", "app-pass");
        assert!(credentials.is_complete());
    }

    #[test]
    fn empty_fields_are_incomplete() {
        assert!(!Credentials::new(service(), "", "app-pass").is_complete());
        assert!(!Credentials::new(service(), "   ", "app-pass").is_complete());
        assert!(!Credentials::new(service(), "alice.bsky.social", "").is_complete());
    }

    #[test]
    fn debug_redacts_password() {
        let credentials = Credentials::new(service(), "alice.bsky.social", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("alice.bsky.social"));
        assert!(!debug.contains("hunter2"));
    }
}
