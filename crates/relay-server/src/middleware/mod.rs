//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Recovery: panics in handlers become the standard 500 envelope
//! - Observability: request IDs, request spans and sensitive header redaction
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use relay_server::middleware::{RouterObservabilityExt, RouterRecoveryExt};
//!
//! let app: Router = Router::new()
//!     .with_recovery()
//!     .with_observability();
//! ```

mod observability;
mod recovery;

pub use observability::RouterObservabilityExt;
pub use recovery::RouterRecoveryExt;
