use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::types::ChatError;

/// Fallback shown when the backend answers 2xx without usable reply text.
pub const EMPTY_REPLY_FALLBACK: &str = "No reply from server.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    reply: Option<String>,
}

/// HTTP client for the remote chatbot endpoint.
///
/// The wire contract is a JSON `{"message"}` POST answered by `{"reply"}`.
/// One request is in flight at a time; the driver awaits each reply before
/// dispatching the next queued event.
#[derive(Debug, Clone)]
pub struct BotClient {
    http: Client,
    endpoint: String,
}

impl BotClient {
    /// Builds a client for `endpoint` with the given request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ChatError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::ConfigError(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    /// Posts one user message and returns the bot's reply text.
    ///
    /// A 2xx response with a missing or empty `reply` field resolves to
    /// [`EMPTY_REPLY_FALLBACK`] rather than an error.
    pub async fn send_message(&self, message: &str) -> Result<String, ChatError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| ChatError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::BackendError(format!("server returned {status}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ChatError::BackendError(e.to_string()))?;

        Ok(body
            .reply
            .filter(|reply| !reply.is_empty())
            .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string()))
    }
}
