//! Response types for HTTP handlers.

mod error_response;
mod monitors;
mod webhooks;

pub use error_response::ErrorResponse;
pub use monitors::HealthResponse;
pub use webhooks::{RelayResponse, TestWebhookResponse};
