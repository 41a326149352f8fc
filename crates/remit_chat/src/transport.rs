//! Transport adapter for the agent API.
//!
//! Two exchanges drive a conversation: `POST /session/create` and
//! `POST /chat`. Both are single-shot; there is no retry and any non-2xx
//! status is a failure regardless of body.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ChatConfig;
use crate::error::{TransportError, TransportResult};
use crate::types::{AgentReply, SessionId, TransferState};

/// Request/response exchanges the conversation core depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Create a new session on the agent API.
    async fn create_session(&self) -> TransportResult<SessionId>;

    /// Send one user message within a session.
    async fn send_message(&self, session_id: &str, message: &str) -> TransportResult<AgentReply>;
}

/// Health report from `GET /`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// HTTP implementation backed by `reqwest`.
pub struct HttpTransport {
    config: ChatConfig,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport from a validated configuration.
    pub fn new(config: ChatConfig) -> TransportResult<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }

    /// The configuration in use.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Check that the agent API is up.
    pub async fn health(&self) -> TransportResult<HealthStatus> {
        let response = self.client.get(self.config.endpoint("/")).send().await?;
        decode(response).await
    }

    /// Read the server's copy of a session's transfer state.
    pub async fn fetch_state(&self, session_id: &str) -> TransportResult<TransferState> {
        let url = self.state_url(session_id)?;
        let response = self.client.get(url).send().await?;
        let body: StateResponse = decode(response).await?;
        Ok(body.state)
    }
}

impl HttpTransport {
    /// `/session/{id}/state`, with the id percent-encoded as one path segment.
    fn state_url(&self, session_id: &str) -> TransportResult<reqwest::Url> {
        if matches!(session_id, "" | "." | "..") {
            return Err(TransportError::InvalidEndpoint(format!(
                "bad session id '{}'",
                session_id
            )));
        }

        let mut url = reqwest::Url::parse(&self.config.api_base_url)
            .map_err(|e| TransportError::InvalidEndpoint(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| {
                TransportError::InvalidEndpoint(format!(
                    "'{}' cannot be a base URL",
                    self.config.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(["session", session_id, "state"]);
        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn create_session(&self) -> TransportResult<SessionId> {
        let url = self.config.endpoint("/session/create");
        debug!(%url, "creating session");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let body: CreateSessionResponse = decode(response).await?;
        Ok(body.session_id)
    }

    async fn send_message(&self, session_id: &str, message: &str) -> TransportResult<AgentReply> {
        let url = self.config.endpoint("/chat");
        debug!(%url, session_id, chars = message.len(), "sending message");

        let request = ChatRequest {
            session_id,
            message,
        };

        let response = self.client.post(url).json(&request).send().await?;
        let body: ChatResponse = decode(response).await?;

        Ok(AgentReply {
            response_text: body.response,
            transfer_state: body.state,
        })
    }
}

/// Reject non-success statuses, then decode the JSON body.
async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> TransportResult<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "agent API returned an error status");
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

// Agent API wire types
#[derive(Debug, Deserialize)]
struct CreateSessionResponse {
    session_id: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    session_id: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
    #[serde(default)]
    state: Option<TransferState>,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    #[serde(default)]
    state: TransferState,
}
