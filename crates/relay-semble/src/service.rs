//! Semble service wrapper with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    AuthSession, Card, CardRequest, CollectionLink, Credentials, Result, SembleProvider,
    TRACING_TARGET,
};

/// Semble service wrapper with observability.
///
/// This wrapper adds structured logging and timing to any [`SembleProvider`].
/// The inner provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct SembleService {
    inner: Arc<dyn SembleProvider>,
}

impl fmt::Debug for SembleService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SembleService").finish_non_exhaustive()
    }
}

impl SembleService {
    /// Creates a new service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: SembleProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Creates a service from an already shared provider.
    pub fn from_arc(provider: Arc<dyn SembleProvider>) -> Self {
        Self { inner: provider }
    }

    /// Authenticates with the given credentials.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            service = %credentials.service,
            handle = %credentials.handle,
            "Logging in"
        );

        let result = self.inner.login(credentials).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(session) => tracing::debug!(
                target: TRACING_TARGET,
                did = %session.did,
                elapsed_ms = elapsed.as_millis(),
                "Login succeeded"
            ),
            Err(error) => tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                kind = %error.kind,
                elapsed_ms = elapsed.as_millis(),
                "Login failed"
            ),
        }

        result
    }

    /// Saves a link as a card.
    pub async fn create_card(&self, session: &AuthSession, request: &CardRequest) -> Result<Card> {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            url = %request.url,
            has_note = request.note.is_some(),
            "Creating card"
        );

        let result = self.inner.create_card(session, request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(card) => tracing::debug!(
                target: TRACING_TARGET,
                card_uri = %card.url_card.uri,
                elapsed_ms = elapsed.as_millis(),
                "Card created"
            ),
            Err(error) => tracing::error!(
                target: TRACING_TARGET,
                url = %request.url,
                error = %error,
                kind = %error.kind,
                elapsed_ms = elapsed.as_millis(),
                "Card creation failed"
            ),
        }

        result
    }

    /// Adds a card to a collection.
    pub async fn add_card_to_collection(
        &self,
        session: &AuthSession,
        card: &Card,
        collection: &str,
    ) -> Result<CollectionLink> {
        let started_at = Instant::now();

        let result = self
            .inner
            .add_card_to_collection(session, card, collection)
            .await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(link) => tracing::debug!(
                target: TRACING_TARGET,
                card_uri = %card.url_card.uri,
                collection_uri = %link.collection.uri,
                elapsed_ms = elapsed.as_millis(),
                "Card added to collection"
            ),
            Err(error) => tracing::debug!(
                target: TRACING_TARGET,
                card_uri = %card.url_card.uri,
                collection,
                error = %error,
                elapsed_ms = elapsed.as_millis(),
                "Adding card to collection failed"
            ),
        }

        result
    }
}
