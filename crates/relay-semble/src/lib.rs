#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod service;
mod types;

#[cfg(feature = "test-utils")]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use service::SembleService;
pub use types::{
    AtUri, AuthSession, Card, CardRequest, CollectionLink, Credentials, DEFAULT_SERVICE,
    StrongRef,
};

/// Tracing target for Semble operations.
pub const TRACING_TARGET: &str = "relay_semble";

/// Record collection holding cards.
pub const CARD_COLLECTION: &str = "network.cosmik.card";

/// Record collection holding user collections.
pub const COLLECTION_COLLECTION: &str = "network.cosmik.collection";

/// Record collection holding card-to-collection links.
pub const COLLECTION_LINK_COLLECTION: &str = "network.cosmik.collectionLink";

/// Core trait for talking to Semble.
///
/// Implementations are stateless with respect to authentication: the
/// [`AuthSession`] returned by [`login`] is passed back into every card
/// operation, so the caller decides how long a session lives.
///
/// [`login`]: SembleProvider::login
#[async_trait::async_trait]
pub trait SembleProvider: Send + Sync {
    /// Authenticates with the account handle and app password.
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession>;

    /// Saves a link, with an optional note, as a card.
    ///
    /// The URL card and the note card are separate writes. When the note
    /// card fails the URL card is not rolled back, so a retried request
    /// creates a second URL card. The error context names the URL card left
    /// behind.
    async fn create_card(&self, session: &AuthSession, request: &CardRequest) -> Result<Card>;

    /// Adds an existing card to a collection.
    ///
    /// `collection` is either an `at://` URI or the record key of a
    /// collection in the session's own repository.
    async fn add_card_to_collection(
        &self,
        session: &AuthSession,
        card: &Card,
        collection: &str,
    ) -> Result<CollectionLink>;
}
