//! Reqwest-based XRPC client for a Semble account's PDS.
//!
//! This module provides a reqwest-based implementation of the [`SembleProvider`]
//! trait. Cards and collection links are written as records in the account's
//! own repository through the `com.atproto.repo.*` endpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use relay_semble::reqwest::{PdsClient, SembleConfig};
//! use relay_semble::SembleService;
//!
//! let config = SembleConfig::default();
//! let credentials = config.credentials()?;
//!
//! let service: SembleService = PdsClient::new(config)?.into_service();
//! let session = service.login(&credentials).await?;
//! ```
//!
//! [`SembleProvider`]: crate::SembleProvider

mod client;
mod config;
mod error;
mod records;

pub use client::PdsClient;
pub use config::{DEFAULT_TIMEOUT_SECS, SembleConfig};
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "relay_semble::reqwest";
