//! Card and collection types.

use serde::{Deserialize, Serialize};
use url::Url;

use super::AtUri;

/// Request to save a link as a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRequest {
    /// The link being saved.
    pub url: Url,
    /// Optional note attached to the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CardRequest {
    /// Creates a request for a bare link card.
    pub fn new(url: Url) -> Self {
        Self { url, note: None }
    }

    /// Attaches a note to the card.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Content-addressed pointer to a specific version of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrongRef {
    /// `at://` URI of the record.
    pub uri: String,
    /// CID of the record version.
    pub cid: String,
}

impl StrongRef {
    /// Creates a new strong reference.
    pub fn new(uri: impl Into<String>, cid: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            cid: cid.into(),
        }
    }

    /// Parses the record URI.
    pub fn at_uri(&self) -> crate::Result<AtUri> {
        self.uri.parse()
    }
}

/// A saved link, as returned by [`create_card`].
///
/// [`create_card`]: crate::SembleProvider::create_card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// The saved link.
    pub url: Url,
    /// The URL card record.
    pub url_card: StrongRef,
    /// The note card attached to the URL card, if a note was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_card: Option<StrongRef>,
}

/// Link record placing a card in a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLink {
    /// The link record itself.
    pub link: StrongRef,
    /// The collection the card was added to.
    pub collection: StrongRef,
}
