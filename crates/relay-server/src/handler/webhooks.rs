//! Notion webhook handlers.
//!
//! The relay endpoint validates the link, makes sure a Semble session is
//! held, creates the card and, when asked, adds it to a collection. Adding
//! to a collection is best-effort: its failure is logged and the request
//! still succeeds.

use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use relay_semble::{AuthSession, Card, CardRequest, SembleService};

use crate::extract::Json;
use crate::handler::request::RelayRequest;
use crate::handler::response::{RelayResponse, TestWebhookResponse};
use crate::handler::{Error, Result};
use crate::service::{ServiceState, SessionManager};

/// Tracing target for webhook operations.
const TRACING_TARGET: &str = "relay_server::handler::webhooks";

/// Milliseconds elapsed since `started_at`.
fn elapsed_ms(started_at: Instant) -> u64 {
    u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Converts a Semble failure into the response error.
///
/// An authentication failure means the held session is no longer usable, so
/// it is dropped and the next request logs in again.
async fn relay_failure(
    session: &SessionManager,
    error: relay_semble::Error,
    started_at: Instant,
) -> Error<'static> {
    let duration = elapsed_ms(started_at);

    if error.is_authentication() {
        tracing::warn!(
            target: TRACING_TARGET,
            error = %error,
            "Authentication error, resetting Semble session"
        );
        session.invalidate().await;
    }

    tracing::error!(
        target: TRACING_TARGET,
        error = %error,
        kind = %error.kind,
        duration_ms = duration,
        "Failed to relay link to Semble"
    );

    Error::from(error).with_duration(duration)
}

/// Creates the card for a validated request.
async fn create_card(
    semble: &SembleService,
    session: &AuthSession,
    request: &CardRequest,
) -> relay_semble::Result<Card> {
    tracing::info!(
        target: TRACING_TARGET,
        url = %request.url,
        note = request.note.as_deref().unwrap_or_default(),
        "Creating card"
    );

    semble.create_card(session, request).await
}

/// Adds the card to a collection, logging a warning on failure.
async fn add_to_collection(
    semble: &SembleService,
    session: &AuthSession,
    card: &Card,
    collection: &str,
) {
    match semble.add_card_to_collection(session, card, collection).await {
        Ok(_) => tracing::info!(
            target: TRACING_TARGET,
            collection,
            "Card added to collection"
        ),
        Err(error) => tracing::warn!(
            target: TRACING_TARGET,
            collection,
            error = %error,
            "Could not add card to collection"
        ),
    }
}

/// Saves a link from Notion as a Semble card.
///
/// A body that is not JSON, or not a JSON object, is treated as empty.
#[tracing::instrument(skip_all)]
async fn relay_to_semble(
    State(session): State<SessionManager>,
    State(semble): State<SembleService>,
    body: Option<Json<serde_json::Value>>,
) -> Result<Json<RelayResponse>> {
    let started_at = Instant::now();
    let request = RelayRequest::from(body.map(Json::into_inner).unwrap_or_default());

    tracing::info!(
        target: TRACING_TARGET,
        has_url = request.url.is_some(),
        has_title = request.title.is_some(),
        has_notes = request.notes.is_some(),
        collection = request.collection.as_deref().unwrap_or_default(),
        "Received Notion webhook"
    );

    let card_request = request.card_request().inspect_err(|error| {
        tracing::warn!(
            target: TRACING_TARGET,
            error = %error,
            "Rejected Notion webhook"
        );
    })?;

    let auth_session = match session.ensure_session().await {
        Ok(auth_session) => auth_session,
        Err(error) => return Err(relay_failure(&session, error, started_at).await),
    };

    let card = match create_card(&semble, &auth_session, &card_request).await {
        Ok(card) => card,
        Err(error) => return Err(relay_failure(&session, error, started_at).await),
    };

    tracing::info!(
        target: TRACING_TARGET,
        card_uri = %card.url_card.uri,
        duration_ms = elapsed_ms(started_at),
        "Card created"
    );

    if let Some(collection) = request.collection() {
        add_to_collection(&semble, &auth_session, &card, collection).await;
    }

    Ok(Json(RelayResponse::new(card, elapsed_ms(started_at))))
}

/// Echoes a test delivery back to the caller.
#[tracing::instrument(skip_all)]
async fn test_webhook(Json(body): Json<serde_json::Value>) -> Json<TestWebhookResponse> {
    tracing::info!(
        target: TRACING_TARGET,
        body = %body,
        "Test webhook received"
    );

    Json(TestWebhookResponse::new(body))
}

/// Returns a [`Router`] with all related routes.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/webhook/notion-to-semble", post(relay_to_semble))
        .route("/webhook/test", post(test_webhook))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use relay_semble::ErrorKind as SembleErrorKind;
    use serde_json::{Value, json};

    use crate::handler::test::{create_test_server, create_test_server_with_state, test_state};

    const RELAY: &str = "/webhook/notion-to-semble";

    #[tokio::test]
    async fn missing_url_is_rejected() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;

        let response = server.post(RELAY).json(&json!({ "title": "T" })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "success": false,
            "error": "Missing required field: url",
        }));

        assert_eq!(provider.card_count(), 0);
        assert_eq!(provider.login_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn loosely_typed_bodies_get_precise_messages() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;

        let response = server.post(RELAY).json(&json!({ "title": 5 })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "success": false,
            "error": "Missing required field: url",
        }));

        let response = server.post(RELAY).json(&json!({ "url": 42 })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "success": false,
            "error": "Invalid URL format",
        }));

        assert_eq!(provider.card_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn non_json_body_is_missing_url() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;

        let response = server
            .post(RELAY)
            .bytes(axum::body::Bytes::from_static(b"url=https://example.com"))
            .content_type("application/x-www-form-urlencoded")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "success": false,
            "error": "Missing required field: url",
        }));

        assert_eq!(provider.card_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;

        let response = server.post(RELAY).json(&json!({ "url": "not a url" })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "success": false,
            "error": "Invalid URL format",
        }));

        assert_eq!(provider.card_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn notes_become_the_card_note() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;

        let response = server
            .post(RELAY)
            .json(&json!({
                "url": "https://example.com/a",
                "title": "Example",
                "notes": "read later",
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["card"]["url"], "https://example.com/a");
        assert!(body["card"]["urlCard"]["uri"].is_string());
        assert!(body["duration"].as_u64().is_some());

        let request = provider.last_card_request().expect("card request");
        assert_eq!(request.url.as_str(), "https://example.com/a");
        assert_eq!(request.note.as_deref(), Some("read later"));
        Ok(())
    }

    #[tokio::test]
    async fn title_is_the_fallback_note() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;

        let response = server
            .post(RELAY)
            .json(&json!({ "url": "https://example.com/b", "title": "T" }))
            .await;
        response.assert_status_ok();

        let request = provider.last_card_request().expect("card request");
        assert_eq!(request.note.as_deref(), Some("T"));
        Ok(())
    }

    #[tokio::test]
    async fn no_note_without_notes_or_title() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;

        let response = server
            .post(RELAY)
            .json(&json!({ "url": "https://example.com/c", "notes": "" }))
            .await;
        response.assert_status_ok();

        let request = provider.last_card_request().expect("card request");
        assert_eq!(request.note, None);
        assert_eq!(provider.collection_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn collection_failure_is_not_fatal() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;
        provider.fail_collections(SembleErrorKind::NotFound);

        let response = server
            .post(RELAY)
            .json(&json!({ "url": "https://example.com/d", "collection": "reading" }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert!(body["card"].is_object());

        assert_eq!(provider.collection_count(), 1);
        assert_eq!(provider.last_collection().as_deref(), Some("reading"));
        Ok(())
    }

    #[tokio::test]
    async fn card_is_added_to_collection() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;

        let response = server
            .post(RELAY)
            .json(&json!({ "url": "https://example.com/e", "collection": "reading" }))
            .await;
        response.assert_status_ok();

        assert_eq!(provider.collection_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn absent_session_is_opened_before_creating_card() -> anyhow::Result<()> {
        let (state, provider) = test_state();
        let server = create_test_server_with_state(state.clone())?;
        assert!(!state.session.is_authenticated().await);

        let response = server
            .post(RELAY)
            .json(&json!({ "url": "https://example.com/f" }))
            .await;
        response.assert_status_ok();

        assert_eq!(provider.login_count(), 1);
        assert_eq!(provider.card_count(), 1);
        assert!(state.session.is_authenticated().await);
        Ok(())
    }

    #[tokio::test]
    async fn failed_login_leaves_session_absent() -> anyhow::Result<()> {
        let (state, provider) = test_state();
        provider.fail_login(SembleErrorKind::Authentication);
        let server = create_test_server_with_state(state.clone())?;

        let response = server
            .post(RELAY)
            .json(&json!({ "url": "https://example.com/g" }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
        assert!(body["duration"].as_u64().is_some());

        assert_eq!(provider.card_count(), 0);
        assert!(!state.session.is_authenticated().await);

        // The next request tries to log in again.
        provider.succeed_login();
        let response = server
            .post(RELAY)
            .json(&json!({ "url": "https://example.com/g" }))
            .await;
        response.assert_status_ok();
        assert_eq!(provider.login_count(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn authentication_failure_resets_session() -> anyhow::Result<()> {
        let (state, provider) = test_state();
        let server = create_test_server_with_state(state.clone())?;
        state.session.ensure_session().await?;
        provider.fail_next_card(SembleErrorKind::Authentication);

        let response = server
            .post(RELAY)
            .json(&json!({ "url": "https://example.com/h" }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!state.session.is_authenticated().await);

        let response = server
            .post(RELAY)
            .json(&json!({ "url": "https://example.com/h" }))
            .await;
        response.assert_status_ok();

        assert_eq!(provider.login_count(), 2);
        assert!(state.session.is_authenticated().await);
        Ok(())
    }

    #[tokio::test]
    async fn other_failures_keep_session() -> anyhow::Result<()> {
        let (state, provider) = test_state();
        let server = create_test_server_with_state(state.clone())?;
        state.session.ensure_session().await?;
        provider.fail_next_card(SembleErrorKind::ServiceUnavailable);

        let response = server
            .post(RELAY)
            .json(&json!({ "url": "https://example.com/i" }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["duration"].as_u64().is_some());

        assert!(state.session.is_authenticated().await);
        assert_eq!(provider.login_count(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;

        let response = server
            .post(RELAY)
            .bytes(axum::body::Bytes::from_static(b"{\"url\":"))
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(provider.card_count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_webhook_echoes_body() -> anyhow::Result<()> {
        let (server, provider) = create_test_server().await?;
        let payload = json!({
            "url": 42,
            "nested": { "list": [1, "two", null] },
        });

        let response = server.post("/webhook/test").json(&payload).await;
        response.assert_status_ok();
        response.assert_json(&json!({
            "success": true,
            "received": payload,
            "message": "Test webhook received successfully",
        }));

        assert_eq!(provider.card_count(), 0);
        Ok(())
    }
}
