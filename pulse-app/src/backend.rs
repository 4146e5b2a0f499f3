//! LivePulse backend API client
//!
//! Thin typed wrapper over the backend's HTTP endpoints. Every request
//! carries the per-installation identity token; every operation is a
//! single attempt with no retry, backoff, or timeout policy. Retrying
//! is the caller's decision.

use serde::Serialize;
use thiserror::Error;

use pulse_common::model::{Artist, LiveEvent, Range};

/// Header carrying the per-installation identity token
pub const USER_TOKEN_HEADER: &str = "x-user-token";

/// Backend client errors
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure: no response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// Application rejection: the backend answered with a non-success status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Serialize)]
struct AddArtistRequest<'a> {
    name: &'a str,
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct SetMutedRequest {
    muted: bool,
}

#[derive(Debug, Serialize)]
struct RegisterTokenRequest<'a> {
    token: &'a str,
}

/// Typed client for the LivePulse backend
pub struct BackendClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
}

impl BackendClient {
    /// Client for the given base URL, tagging every request with `token`
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, BackendError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http_client,
            base_url,
            token: token.into(),
        })
    }

    /// Fetch events for a range, with an optional server-side keyword filter
    ///
    /// `Recent` returns the backend's near-term window; `All` the full
    /// historical and future set needed for calendar marking.
    pub async fn list_events(
        &self,
        range: Range,
        keyword: Option<&str>,
    ) -> Result<Vec<LiveEvent>, BackendError> {
        let url = format!("{}/live", self.base_url);
        tracing::debug!(range = %range, keyword = ?keyword, "fetching events");

        let mut request = self
            .http_client
            .get(&url)
            .header(USER_TOKEN_HEADER, &self.token)
            .query(&[("range", range.as_str())]);
        if let Some(q) = keyword {
            request = request.query(&[("q", q)]);
        }

        let response = self.check(request.send().await).await?;
        let events: Vec<LiveEvent> = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        tracing::debug!(range = %range, count = events.len(), "fetched events");
        Ok(events)
    }

    /// List the watched artists
    pub async fn list_artists(&self) -> Result<Vec<Artist>, BackendError> {
        let url = format!("{}/artists", self.base_url);
        let request = self
            .http_client
            .get(&url)
            .header(USER_TOKEN_HEADER, &self.token);

        let response = self.check(request.send().await).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Create a watched artist; fails loudly on non-success status
    pub async fn add_artist(&self, name: &str, url: &str) -> Result<Artist, BackendError> {
        let endpoint = format!("{}/artists", self.base_url);
        tracing::info!(name = %name, "adding artist");

        let request = self
            .http_client
            .post(&endpoint)
            .header(USER_TOKEN_HEADER, &self.token)
            .json(&AddArtistRequest { name, url });

        let response = self.check(request.send().await).await?;
        response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))
    }

    /// Remove a watched artist
    ///
    /// Failures are returned, not swallowed; the caller decides whether
    /// best-effort semantics apply.
    pub async fn delete_artist(&self, id: &str) -> Result<(), BackendError> {
        let url = format!("{}/artists/{}", self.base_url, id);
        tracing::info!(artist_id = %id, "deleting artist");

        let request = self
            .http_client
            .delete(&url)
            .header(USER_TOKEN_HEADER, &self.token);

        self.check(request.send().await).await?;
        Ok(())
    }

    /// Update an artist's mute flag; fails loudly on non-success status
    pub async fn set_artist_muted(&self, id: &str, muted: bool) -> Result<(), BackendError> {
        let url = format!("{}/artists/{}/mute", self.base_url, id);
        tracing::info!(artist_id = %id, muted = muted, "updating mute flag");

        let request = self
            .http_client
            .patch(&url)
            .header(USER_TOKEN_HEADER, &self.token)
            .json(&SetMutedRequest { muted });

        self.check(request.send().await).await?;
        Ok(())
    }

    /// Associate a push-notification token with this installation
    ///
    /// Like `delete_artist`, failures are returned and the caller
    /// decides policy.
    pub async fn register_token(&self, push_token: &str) -> Result<(), BackendError> {
        let url = format!("{}/register-token", self.base_url);

        let request = self
            .http_client
            .post(&url)
            .header(USER_TOKEN_HEADER, &self.token)
            .json(&RegisterTokenRequest { token: push_token });

        self.check(request.send().await).await?;
        Ok(())
    }

    /// Triage a response: transport failures and non-success statuses
    /// become typed errors before any body decoding happens.
    async fn check(
        &self,
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<reqwest::Response, BackendError> {
        let response = result.map_err(|e| BackendError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api(status.as_u16(), body));
        }
        Ok(response)
    }
}
