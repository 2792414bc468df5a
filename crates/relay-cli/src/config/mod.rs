//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── server: ServerConfig     # Host, port
//! ├── service: ServiceConfig   # Semble account and client
//! └── log_format: LogFormat    # Text or JSON logs
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! semble-relay --semble-handle alice.bsky.social --port 8080
//!
//! # Or via environment variables
//! SEMBLE_HANDLE=alice.bsky.social SEMBLE_APP_PASSWORD=... PORT=8080 semble-relay
//! ```

mod server;

use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use relay_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::{ServerConfig, log_server_config};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Output format of log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Complete CLI configuration.
///
/// Combines all configuration groups for the relay:
/// - [`ServerConfig`]: Network binding
/// - [`ServiceConfig`]: Semble account and HTTP client
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "semble-relay")]
#[command(about = "Relays Notion webhooks into Semble cards")]
#[command(version)]
pub struct Cli {
    /// Server network configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Semble service configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is read before clap parses arguments so that its values
    /// act as environment defaults. Variables already set in the environment win.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// `RUST_LOG` selects what is logged and defaults to `info`.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        match self.log_format {
            LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json())
                .init(),
        }
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            "Starting semble relay"
        );

        Self::log_build_info();
        log_server_config(&self.server);

        let semble = &self.service.semble;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            service = %semble.service,
            handle = semble.handle.as_deref().unwrap_or_default(),
            app_password_set = semble.app_password.as_deref().is_some_and(|p| !p.is_empty()),
            http_timeout_secs = semble.http_timeout,
            "Semble configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
