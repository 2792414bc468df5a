//! Request types for HTTP handlers.

mod webhooks;

pub use webhooks::RelayRequest;
