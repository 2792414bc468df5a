//! Reqwest-based XRPC client for Semble records.

use std::sync::Arc;

use jiff::Timestamp;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::records::{
    CardRecord, CollectionLinkRecord, CreateRecordInput, CreateSessionInput, CreateSessionOutput,
};
use super::{Error, SembleConfig, TRACING_TARGET};
use crate::{
    AtUri, AuthSession, CARD_COLLECTION, COLLECTION_COLLECTION, COLLECTION_LINK_COLLECTION, Card,
    CardRequest, CollectionLink, Credentials, SembleProvider, SembleService, StrongRef,
};

const CREATE_SESSION: &str = "com.atproto.server.createSession";
const CREATE_RECORD: &str = "com.atproto.repo.createRecord";
const GET_RECORD: &str = "com.atproto.repo.getRecord";

/// Inner client that holds the HTTP client and configuration.
struct PdsClientInner {
    http: Client,
    config: SembleConfig,
}

/// Reqwest-based client writing Semble cards to the account's PDS.
///
/// This client implements the [`SembleProvider`] trait. It keeps no session
/// state of its own: every call takes the [`AuthSession`] to act with.
///
/// # Examples
///
/// ```rust,ignore
/// use relay_semble::reqwest::{PdsClient, SembleConfig};
/// use relay_semble::{CardRequest, SembleProvider};
/// use url::Url;
///
/// let config = SembleConfig::new("alice.bsky.social", "xxxx-xxxx-xxxx-xxxx");
/// let client = PdsClient::new(config.clone())?;
///
/// let session = client.login(&config.credentials()?).await?;
/// let request = CardRequest::new(Url::parse("https://example.com")?);
/// let card = client.create_card(&session, &request).await?;
/// ```
#[derive(Clone)]
pub struct PdsClient {
    inner: Arc<PdsClientInner>,
}

impl std::fmt::Debug for PdsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdsClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl PdsClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: SembleConfig) -> crate::Result<Self> {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            service = %config.service,
            timeout_ms = timeout.as_millis(),
            "Creating PDS client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(|e| {
                crate::Error::configuration()
                    .with_message("Failed to create HTTP client")
                    .with_source(e)
            })?;

        let inner = PdsClientInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &SembleConfig {
        &self.inner.config
    }

    /// Converts this client into a [`SembleService`] for use with dependency injection.
    pub fn into_service(self) -> SembleService {
        SembleService::new(self)
    }

    /// Builds the endpoint URL of an XRPC method on the given service.
    fn xrpc_url(service: &Url, nsid: &str) -> crate::Result<Url> {
        let base = service.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/xrpc/{nsid}"))?)
    }

    /// Resolves a collection identifier to the address of its record.
    ///
    /// Accepts a full `at://` URI, or a record key in the session's own
    /// collection of collections.
    fn resolve_collection(session: &AuthSession, collection: &str) -> crate::Result<AtUri> {
        let collection = collection.trim();

        if collection.starts_with("at://") {
            return collection.parse();
        }

        if collection.is_empty() || collection.contains('/') {
            return Err(crate::Error::invalid_input()
                .with_message("Invalid collection identifier")
                .with_context(collection.to_owned()));
        }

        Ok(AtUri::new(&session.did, COLLECTION_COLLECTION, collection))
    }

    /// Records the URL card that stays behind when its note card is not written.
    fn note_card_failed(error: crate::Error, url_card: &StrongRef) -> crate::Error {
        tracing::warn!(
            target: TRACING_TARGET,
            url_card = %url_card.uri,
            error = %error,
            "URL card written without its note card"
        );

        let context = match error.context.as_deref() {
            Some(context) => format!("{context}; url card {} has no note", url_card.uri),
            None => format!("url card {} has no note", url_card.uri),
        };
        error.with_context(context)
    }

    /// Sends an XRPC request and decodes a successful response.
    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> super::Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(Error::xrpc(status, &body));
        }

        Ok(serde_json::from_slice(&body)?)
    }

    async fn create_record<R: Serialize + Sync>(
        &self,
        session: &AuthSession,
        collection: &str,
        record: &R,
    ) -> crate::Result<StrongRef> {
        let url = Self::xrpc_url(&session.service, CREATE_RECORD)?;
        let input = CreateRecordInput {
            repo: &session.did,
            collection,
            record,
        };

        let request = self
            .inner
            .http
            .post(url)
            .bearer_auth(session.access_jwt())
            .json(&input);

        let created: StrongRef = Self::send(request).await?;

        tracing::trace!(
            target: TRACING_TARGET,
            uri = %created.uri,
            cid = %created.cid,
            "Record created"
        );

        Ok(created)
    }

    async fn get_record(&self, session: &AuthSession, uri: &AtUri) -> crate::Result<StrongRef> {
        let url = Self::xrpc_url(&session.service, GET_RECORD)?;
        let request = self
            .inner
            .http
            .get(url)
            .bearer_auth(session.access_jwt())
            .query(&[
                ("repo", uri.authority.as_str()),
                ("collection", uri.collection.as_str()),
                ("rkey", uri.rkey.as_str()),
            ]);

        Ok(Self::send(request).await?)
    }
}

#[async_trait::async_trait]
impl SembleProvider for PdsClient {
    async fn login(&self, credentials: &Credentials) -> crate::Result<AuthSession> {
        let url = Self::xrpc_url(&credentials.service, CREATE_SESSION)?;
        let input = CreateSessionInput {
            identifier: &credentials.handle,
            password: &credentials.password,
        };

        let request = self.inner.http.post(url).json(&input);
        let output: CreateSessionOutput = Self::send(request).await?;

        tracing::info!(
            target: TRACING_TARGET,
            did = %output.did,
            handle = %output.handle,
            "Session created"
        );

        Ok(AuthSession::new(
            output.did,
            output.handle,
            credentials.service.clone(),
            output.access_jwt,
            output.refresh_jwt,
        ))
    }

    async fn create_card(
        &self,
        session: &AuthSession,
        request: &CardRequest,
    ) -> crate::Result<Card> {
        let now = Timestamp::now();
        let url_card = self
            .create_record(session, CARD_COLLECTION, &CardRecord::url(&request.url, now))
            .await?;

        let note_card = match request.note.as_deref() {
            Some(note) => {
                let record = CardRecord::note(note, &request.url, &url_card, now);
                let note_card = self
                    .create_record(session, CARD_COLLECTION, &record)
                    .await
                    .map_err(|e| Self::note_card_failed(e, &url_card))?;
                Some(note_card)
            }
            None => None,
        };

        Ok(Card {
            url: request.url.clone(),
            url_card,
            note_card,
        })
    }

    async fn add_card_to_collection(
        &self,
        session: &AuthSession,
        card: &Card,
        collection: &str,
    ) -> crate::Result<CollectionLink> {
        let address = Self::resolve_collection(session, collection)?;
        let collection = self.get_record(session, &address).await?;

        let record =
            CollectionLinkRecord::new(&collection, &card.url_card, &session.did, Timestamp::now());
        let link = self
            .create_record(session, COLLECTION_LINK_COLLECTION, &record)
            .await?;

        Ok(CollectionLink { link, collection })
    }
}
