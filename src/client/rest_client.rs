//! HTTP client for the checkers engine REST API.

use super::engine::{CheckersEngine, GameId, MoveAccepted, MoveRequest, SessionStarted};
use super::error::{SessionError, SessionErrorKind};
use crate::games::checkers::{GameSnapshot, Position, RawHint};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// REST client for one engine endpoint.
///
/// Holds only the base URL and connection pool; game state lives on the server.
#[derive(Debug, Clone)]
pub struct RestCheckersClient {
    base_url: String,
    base: Url,
    client: reqwest::Client,
}

impl RestCheckersClient {
    /// Creates a client for an engine rooted at `base_url`, e.g.
    /// `http://localhost:5260/api/checkers`.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, SessionError> {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url).map_err(|e| {
            SessionError::new(SessionErrorKind::SessionCreation(format!(
                "invalid engine URL {:?}: {}",
                base_url, e
            )))
        })?;
        if base.cannot_be_a_base() {
            return Err(SessionError::new(SessionErrorKind::SessionCreation(format!(
                "invalid engine URL {:?}: not a hierarchical URL",
                base_url
            ))));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                SessionError::new(SessionErrorKind::SessionCreation(format!(
                    "failed to build HTTP client: {}",
                    e
                )))
            })?;

        info!("Created engine client");
        Ok(Self {
            base_url,
            base,
            client,
        })
    }

    /// The engine root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base}/{game_id}/{leaf}`, with the id percent-encoded as one segment.
    fn game_url(&self, game_id: &GameId, leaf: &str) -> Url {
        let mut url = self.base.clone();
        // Hierarchical URLs always have segments; checked in `new`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(game_id.as_str()).push(leaf);
        }
        url
    }
}

/// Reads a non-success body for display, falling back to the status line.
async fn error_text(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => body,
        _ => describe_status(status),
    }
}

fn describe_status(status: StatusCode) -> String {
    format!("HTTP {}", status)
}

#[async_trait::async_trait]
impl CheckersEngine for RestCheckersClient {
    #[instrument(skip(self))]
    async fn start_session(
        &self,
        player1: &str,
        player2: &str,
    ) -> Result<SessionStarted, SessionError> {
        info!("Starting game");
        let creation = |msg: String| SessionError::new(SessionErrorKind::SessionCreation(msg));

        let url = Url::parse_with_params(
            &format!("{}/start", self.base_url),
            &[("player1", player1), ("player2", player2)],
        )
        .map_err(|e| creation(e.to_string()))?;

        let response = self.client.post(url).send().await.map_err(|e| {
            warn!(error = %e, "Engine unreachable");
            creation(e.to_string())
        })?;

        if !response.status().is_success() {
            let text = error_text(response).await;
            warn!(error = %text, "Engine refused to start game");
            return Err(creation(text));
        }

        let started: SessionStarted = response
            .json()
            .await
            .map_err(|e| creation(format!("unreadable start response: {}", e)))?;

        info!(game_id = %started.game_id, message = %started.message, "Game started");
        Ok(started)
    }

    #[instrument(skip(self), fields(game_id = %game_id))]
    async fn fetch_snapshot(&self, game_id: &GameId) -> Result<GameSnapshot, SessionError> {
        debug!("Fetching board");
        let fail = |msg: String| SessionError::new(SessionErrorKind::SnapshotFetch(msg));

        let response = self
            .client
            .get(self.game_url(game_id, "board"))
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fail(error_text(response).await));
        }

        let body = response.text().await.map_err(|e| fail(e.to_string()))?;
        let snapshot: GameSnapshot = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Malformed board payload");
            fail(format!("malformed board payload: {}", e))
        })?;

        debug!(
            current_color = %snapshot.current_color,
            status = %snapshot.status,
            double_jump = snapshot.is_double_jump_active,
            "Got board"
        );
        Ok(snapshot)
    }

    #[instrument(skip(self), fields(game_id = %game_id))]
    async fn fetch_hints(&self, game_id: &GameId) -> Result<Vec<RawHint>, SessionError> {
        debug!("Fetching hints");
        let fail = |msg: String| SessionError::new(SessionErrorKind::HintFetch(msg));

        let response = self
            .client
            .get(self.game_url(game_id, "hints"))
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fail(error_text(response).await));
        }

        // An empty body means no legal moves, same as `[]`.
        let body = response.text().await.map_err(|e| fail(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let hints: Vec<RawHint> = serde_json::from_str(&body)
            .map_err(|e| fail(format!("malformed hint list: {}", e)))?;
        debug!(count = hints.len(), "Got hints");
        Ok(hints)
    }

    #[instrument(skip(self), fields(game_id = %game_id, from = %from, to = %to))]
    async fn submit_move(
        &self,
        game_id: &GameId,
        from: Position,
        to: Position,
    ) -> Result<MoveAccepted, SessionError> {
        info!("Submitting move");

        let response = self
            .client
            .post(self.game_url(game_id, "move"))
            .json(&MoveRequest::new(from, to))
            .send()
            .await
            .map_err(|e| SessionError::new(SessionErrorKind::MoveTransport(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let text = error_text(response).await;
            warn!(status = %status, rejection = %text, "Engine rejected move");
            return Err(SessionError::new(SessionErrorKind::IllegalMove(text)));
        }

        // Some engine builds answer 200 with an empty body.
        let body = response.text().await.unwrap_or_default();
        let accepted = if body.trim().is_empty() {
            MoveAccepted::default()
        } else {
            serde_json::from_str(&body).unwrap_or_else(|e| {
                debug!(error = %e, "Move reply was not JSON, using it as the message");
                MoveAccepted { message: body }
            })
        };

        info!(message = %accepted.message, "Move accepted");
        Ok(accepted)
    }
}
