//! Health check response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Liveness report.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Whether a Semble session is currently held.
    pub authenticated: bool,
    /// Time of the check.
    pub timestamp: Timestamp,
}

impl HealthResponse {
    /// Creates a report stamped with the current time.
    pub fn ok(authenticated: bool) -> Self {
        Self {
            status: "ok".to_owned(),
            authenticated,
            timestamp: Timestamp::now(),
        }
    }
}
