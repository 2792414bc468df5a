//! Request extractors with relay-specific rejections.
//!
//! - [`Json`] - JSON deserialization whose failures render as the standard
//!   `{"success": false, "error": ...}` envelope with status 400

mod json;

pub use crate::extract::json::Json;
