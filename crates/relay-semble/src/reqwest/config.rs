//! Semble client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Credentials, DEFAULT_SERVICE, Error, Result};

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Semble PDS client.
///
/// Holds both the account credentials and the transport settings of the
/// underlying HTTP client.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct SembleConfig {
    /// Base URL of the PDS that hosts the account
    #[cfg_attr(
        feature = "config",
        arg(long = "semble-service", env = "SEMBLE_SERVICE", default_value = DEFAULT_SERVICE)
    )]
    #[serde(default = "default_service")]
    pub service: Url,

    /// Account handle used as the login identifier
    #[cfg_attr(feature = "config", arg(long = "semble-handle", env = "SEMBLE_HANDLE"))]
    #[serde(default)]
    pub handle: Option<String>,

    /// App password for the account
    #[cfg_attr(
        feature = "config",
        arg(long = "semble-app-password", env = "SEMBLE_APP_PASSWORD", hide_env_values = true)
    )]
    #[serde(default)]
    pub app_password: Option<String>,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "semble-http-timeout", env = "SEMBLE_HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "semble-user-agent", env = "SEMBLE_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_service() -> Url {
    Url::parse(DEFAULT_SERVICE).expect("default service is a valid URL")
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for SembleConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            handle: None,
            app_password: None,
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl fmt::Debug for SembleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SembleConfig")
            .field("service", &self.service.as_str())
            .field("handle", &self.handle)
            .field("app_password", &self.app_password.as_ref().map(|_| "<redacted>"))
            .field("http_timeout", &self.http_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl SembleConfig {
    /// Creates a configuration for the given account on the default service.
    pub fn new(handle: impl Into<String>, app_password: impl Into<String>) -> Self {
        Self {
            handle: Some(handle.into()),
            app_password: Some(app_password.into()),
            ..Self::default()
        }
    }

    /// Returns the login credentials.
    ///
    /// Fails when either the handle or the app password is missing or empty.
    pub fn credentials(&self) -> Result<Credentials> {
        let handle = self.handle.as_deref().map(str::trim).unwrap_or_default();
        let password = self.app_password.as_deref().unwrap_or_default();

        if handle.is_empty() || password.is_empty() {
            return Err(Error::configuration().with_message(
                "Missing required environment variables: SEMBLE_HANDLE and SEMBLE_APP_PASSWORD",
            ));
        }

        Ok(Credentials::new(self.service.clone(), handle, password))
    }

    /// Returns the timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            self.timeout()
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("semble-relay/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Set the service endpoint.
    #[must_use]
    pub fn with_service(mut self, service: Url) -> Self {
        self.service = service;
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
