//! Webhook response types.

use relay_semble::Card;
use serde::{Deserialize, Serialize};

/// Successful relay of a link into Semble.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayResponse {
    /// Always `true`.
    pub success: bool,
    /// The card that was created.
    pub card: Card,
    /// Milliseconds from receiving the request to responding.
    pub duration: u64,
}

impl RelayResponse {
    pub fn new(card: Card, duration: u64) -> Self {
        Self {
            success: true,
            card,
            duration,
        }
    }
}

/// Echo of a test webhook delivery.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestWebhookResponse {
    /// Always `true`.
    pub success: bool,
    /// The request body, verbatim.
    pub received: serde_json::Value,
    pub message: String,
}

impl TestWebhookResponse {
    pub fn new(received: serde_json::Value) -> Self {
        Self {
            success: true,
            received,
            message: "Test webhook received successfully".to_owned(),
        }
    }
}
