//! Webhook request types.

use relay_semble::CardRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::handler::{ErrorKind, Result};

/// Body of a Notion automation webhook.
///
/// Every field is optional at the wire level so that a missing `url` is
/// reported with a precise message instead of a generic deserialization error.
/// Automations send loosely typed bodies, so the handler builds this from a
/// raw [`Value`] instead of deserializing it.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRequest {
    /// Link to save.
    #[serde(default)]
    pub url: Option<String>,
    /// Page title, used as the note when no notes are given.
    #[serde(default)]
    pub title: Option<String>,
    /// Free-form notes attached to the link.
    #[serde(default)]
    pub notes: Option<String>,
    /// Collection to add the card to.
    #[serde(default)]
    pub collection: Option<String>,
}

/// Reads an optional text field, ignoring values of any other type.
fn text_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(Value::as_str).map(str::to_owned)
}

/// Reads the link, keeping any set non-text value so it fails URL parsing.
fn url_field(fields: &Map<String, Value>) -> Option<String> {
    match fields.get("url")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(url) => Some(url.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

impl From<Value> for RelayRequest {
    /// Anything other than a JSON object reads as an empty request.
    fn from(body: Value) -> Self {
        let Value::Object(fields) = body else {
            return Self::default();
        };

        Self {
            url: url_field(&fields),
            title: text_field(&fields, "title"),
            notes: text_field(&fields, "notes"),
            collection: text_field(&fields, "collection"),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl RelayRequest {
    /// Validates the link and builds the card to create.
    ///
    /// The note is `notes` when non-empty, otherwise `title` when non-empty.
    pub fn card_request(&self) -> Result<CardRequest> {
        let Some(url) = non_empty(self.url.as_deref()) else {
            return Err(ErrorKind::BadRequest.with_message("Missing required field: url"));
        };

        let url = Url::parse(url).map_err(|e| {
            ErrorKind::BadRequest
                .with_message("Invalid URL format")
                .with_context(e.to_string())
        })?;

        let request = CardRequest::new(url);
        Ok(match self.note() {
            Some(note) => request.with_note(note),
            None => request,
        })
    }

    /// Returns the note to attach, if any.
    pub fn note(&self) -> Option<&str> {
        non_empty(self.notes.as_deref()).or_else(|| non_empty(self.title.as_deref()))
    }

    /// Returns the collection to add the card to, if any.
    pub fn collection(&self) -> Option<&str> {
        non_empty(self.collection.as_deref())
    }
}
