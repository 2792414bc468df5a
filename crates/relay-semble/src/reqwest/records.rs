//! Wire shapes of XRPC inputs, outputs and Semble records.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{CARD_COLLECTION, COLLECTION_LINK_COLLECTION, StrongRef};

/// `com.atproto.server.createSession` input.
#[derive(Debug, Serialize)]
pub(crate) struct CreateSessionInput<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

/// `com.atproto.server.createSession` output.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSessionOutput {
    pub did: String,
    pub handle: String,
    pub access_jwt: String,
    pub refresh_jwt: String,
}

/// `com.atproto.repo.createRecord` input.
#[derive(Debug, Serialize)]
pub(crate) struct CreateRecordInput<'a, R> {
    pub repo: &'a str,
    pub collection: &'a str,
    pub record: &'a R,
}

/// Kind of a card record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum CardType {
    Url,
    Note,
}

/// Typed content of a card record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "$type")]
pub(crate) enum CardContent {
    #[serde(rename = "network.cosmik.card#urlContent")]
    Url { url: String },
    #[serde(rename = "network.cosmik.card#noteContent")]
    Note { text: String },
}

/// A `network.cosmik.card` record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CardRecord<'a> {
    #[serde(rename = "$type")]
    pub record_type: &'static str,
    #[serde(rename = "type")]
    pub card_type: CardType,
    pub content: CardContent,
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_card: Option<&'a StrongRef>,
    pub created_at: Timestamp,
}

impl<'a> CardRecord<'a> {
    /// Card saving a bare link.
    pub fn url(url: &'a Url, created_at: Timestamp) -> Self {
        Self {
            record_type: CARD_COLLECTION,
            card_type: CardType::Url,
            content: CardContent::Url {
                url: url.to_string(),
            },
            url: url.as_str(),
            parent_card: None,
            created_at,
        }
    }

    /// Note card attached to a previously written URL card.
    pub fn note(
        text: impl Into<String>,
        url: &'a Url,
        parent: &'a StrongRef,
        created_at: Timestamp,
    ) -> Self {
        Self {
            record_type: CARD_COLLECTION,
            card_type: CardType::Note,
            content: CardContent::Note { text: text.into() },
            url: url.as_str(),
            parent_card: Some(parent),
            created_at,
        }
    }
}

/// A `network.cosmik.collectionLink` record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionLinkRecord<'a> {
    #[serde(rename = "$type")]
    pub record_type: &'static str,
    pub collection: &'a StrongRef,
    pub card: &'a StrongRef,
    pub added_by: &'a str,
    pub added_at: Timestamp,
    pub created_at: Timestamp,
}

impl<'a> CollectionLinkRecord<'a> {
    pub fn new(
        collection: &'a StrongRef,
        card: &'a StrongRef,
        added_by: &'a str,
        now: Timestamp,
    ) -> Self {
        Self {
            record_type: COLLECTION_LINK_COLLECTION,
            collection,
            card,
            added_by,
            added_at: now,
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://example.com/article").unwrap()
    }

    #[test]
    fn url_card_record_shape() {
        let url = url();
        let record = CardRecord::url(&url, Timestamp::UNIX_EPOCH);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["$type"], "network.cosmik.card");
        assert_eq!(json["type"], "URL");
        assert_eq!(json["content"]["$type"], "network.cosmik.card#urlContent");
        assert_eq!(json["content"]["url"], "https://example.com/article");
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert!(json.get("parentCard").is_none());
    }

    #[test]
    fn note_card_points_at_parent() {
        let url = url();
        let parent = StrongRef::new("at://did:plc:abc/network.cosmik.card/1", "bafy1");
        let record = CardRecord::note("read later", &url, &parent, Timestamp::UNIX_EPOCH);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "NOTE");
        assert_eq!(json["content"]["$type"], "network.cosmik.card#noteContent");
        assert_eq!(json["content"]["text"], "read later");
        assert_eq!(json["parentCard"]["uri"], parent.uri);
        assert_eq!(json["parentCard"]["cid"], "bafy1");
    }

    #[test]
    fn collection_link_record_shape() {
        let collection = StrongRef::new("at://did:plc:abc/network.cosmik.collection/r", "bafyc");
        let card = StrongRef::new("at://did:plc:abc/network.cosmik.card/1", "bafy1");
        let record =
            CollectionLinkRecord::new(&collection, &card, "did:plc:abc", Timestamp::UNIX_EPOCH);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["$type"], "network.cosmik.collectionLink");
        assert_eq!(json["collection"]["cid"], "bafyc");
        assert_eq!(json["card"]["cid"], "bafy1");
        assert_eq!(json["addedBy"], "did:plc:abc");
        assert_eq!(json["addedAt"], json["createdAt"]);
    }

    #[test]
    fn session_output_reads_camel_case() {
        let output: CreateSessionOutput = serde_json::from_str(
            r#"{"did":"did:plc:abc","handle":"alice.bsky.social","accessJwt":"a","refreshJwt":"r","active":true}"#,
        )
        .unwrap();

        assert_eq!(output.did, "did:plc:abc");
        assert_eq!(output.access_jwt, "a");
        assert_eq!(output.refresh_jwt, "r");
    }
}
