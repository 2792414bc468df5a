//! Service configuration.

#[cfg(feature = "config")]
use clap::Args;
use relay_semble::reqwest::{PdsClient, SembleConfig};
use relay_semble::{Credentials, SembleService};
use serde::{Deserialize, Serialize};

use crate::service::{Error, Result};

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Semble account and client configuration.
    #[cfg_attr(feature = "config", command(flatten))]
    #[serde(flatten)]
    pub semble: SembleConfig,
}

impl ServiceConfig {
    /// Creates a configuration from the Semble settings.
    pub fn new(semble: SembleConfig) -> Self {
        Self { semble }
    }

    /// Returns the login credentials, failing when any is missing.
    pub fn credentials(&self) -> Result<Credentials> {
        Ok(self.semble.credentials()?)
    }

    /// Builds the Semble client.
    pub fn connect_semble(&self) -> Result<SembleService> {
        let client = PdsClient::new(self.semble.clone()).map_err(|e| {
            Error::internal("semble", "Failed to create PDS client").with_source(e)
        })?;

        Ok(client.into_service())
    }
}
