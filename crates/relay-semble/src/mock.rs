//! Scriptable in-memory provider for testing.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! relay-semble = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use relay_semble::mock::MockProvider;
//! use relay_semble::ErrorKind;
//!
//! let provider = MockProvider::default();
//! provider.fail_next_card(ErrorKind::Authentication);
//!
//! let service = provider.clone().into_service();
//! // ... drive the service, then inspect `provider.login_count()`.
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    AuthSession, CARD_COLLECTION, COLLECTION_COLLECTION, COLLECTION_LINK_COLLECTION, Card,
    CardRequest, CollectionLink, Credentials, Error, ErrorKind, Result, SembleProvider,
    SembleService, StrongRef,
};

/// DID of the account every mock session belongs to.
pub const MOCK_DID: &str = "did:plc:mock";

#[derive(Debug, Default)]
struct Script {
    login_failure: Option<ErrorKind>,
    card_failures: VecDeque<ErrorKind>,
    collection_failure: Option<ErrorKind>,
    last_card_request: Option<CardRequest>,
    last_collection: Option<String>,
}

#[derive(Debug, Default)]
struct Inner {
    logins: AtomicUsize,
    cards: AtomicUsize,
    collection_links: AtomicUsize,
    script: Mutex<Script>,
}

/// Mock Semble provider.
///
/// Succeeds by default and records every call. Failures are scripted per
/// operation with the [`ErrorKind`] the real client would report. Clones
/// share state, so a test can keep one handle while the service owns another.
#[derive(Clone, Debug, Default)]
pub struct MockProvider {
    inner: Arc<Inner>,
}

impl MockProvider {
    /// Creates a new mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert this provider into a service.
    pub fn into_service(self) -> SembleService {
        SembleService::new(self)
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.inner
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes every following login fail with the given kind.
    pub fn fail_login(&self, kind: ErrorKind) {
        self.script().login_failure = Some(kind);
    }

    /// Lets logins succeed again.
    pub fn succeed_login(&self) {
        self.script().login_failure = None;
    }

    /// Makes the next card creation fail with the given kind.
    ///
    /// Calls queue up: each one scripts one more failing creation.
    pub fn fail_next_card(&self, kind: ErrorKind) {
        self.script().card_failures.push_back(kind);
    }

    /// Makes every following add-to-collection call fail with the given kind.
    pub fn fail_collections(&self, kind: ErrorKind) {
        self.script().collection_failure = Some(kind);
    }

    /// Number of login attempts, successful or not.
    pub fn login_count(&self) -> usize {
        self.inner.logins.load(Ordering::SeqCst)
    }

    /// Number of card creation attempts, successful or not.
    pub fn card_count(&self) -> usize {
        self.inner.cards.load(Ordering::SeqCst)
    }

    /// Number of add-to-collection attempts, successful or not.
    pub fn collection_count(&self) -> usize {
        self.inner.collection_links.load(Ordering::SeqCst)
    }

    /// The most recent card request received.
    pub fn last_card_request(&self) -> Option<CardRequest> {
        self.script().last_card_request.clone()
    }

    /// The most recent collection identifier received.
    pub fn last_collection(&self) -> Option<String> {
        self.script().last_collection.clone()
    }
}

fn scripted(kind: ErrorKind) -> Error {
    Error::new(kind).with_message(format!("Scripted {kind} failure"))
}

fn record_ref(collection: &str, rkey: usize) -> StrongRef {
    StrongRef::new(
        format!("at://{MOCK_DID}/{collection}/{rkey}"),
        format!("bafymock{rkey}"),
    )
}

#[async_trait::async_trait]
impl SembleProvider for MockProvider {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession> {
        let attempt = self.inner.logins.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(kind) = self.script().login_failure {
            return Err(scripted(kind));
        }

        Ok(AuthSession::new(
            MOCK_DID,
            credentials.handle.clone(),
            credentials.service.clone(),
            format!("access-{attempt}"),
            format!("refresh-{attempt}"),
        ))
    }

    async fn create_card(&self, _session: &AuthSession, request: &CardRequest) -> Result<Card> {
        let rkey = self.inner.cards.fetch_add(1, Ordering::SeqCst) + 1;

        let failure = {
            let mut script = self.script();
            script.last_card_request = Some(request.clone());
            script.card_failures.pop_front()
        };

        if let Some(kind) = failure {
            return Err(scripted(kind));
        }

        Ok(Card {
            url: request.url.clone(),
            url_card: record_ref(CARD_COLLECTION, rkey * 2 - 1),
            note_card: request
                .note
                .as_ref()
                .map(|_| record_ref(CARD_COLLECTION, rkey * 2)),
        })
    }

    async fn add_card_to_collection(
        &self,
        _session: &AuthSession,
        _card: &Card,
        collection: &str,
    ) -> Result<CollectionLink> {
        let rkey = self.inner.collection_links.fetch_add(1, Ordering::SeqCst) + 1;

        let failure = {
            let mut script = self.script();
            script.last_collection = Some(collection.to_owned());
            script.collection_failure
        };

        if let Some(kind) = failure {
            return Err(scripted(kind));
        }

        Ok(CollectionLink {
            link: record_ref(COLLECTION_LINK_COLLECTION, rkey),
            collection: StrongRef::new(
                format!("at://{MOCK_DID}/{COLLECTION_COLLECTION}/{collection}"),
                "bafymockcollection",
            ),
        })
    }
}
