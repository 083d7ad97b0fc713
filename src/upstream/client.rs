//! Streaming client for an OpenAI-compatible chat-completions API.
//!
//! One pooled HTTP client serves the whole process; each call to
//! [`CompletionSource::open`] performs one `POST /chat/completions` with
//! `stream: true` and exposes the response as a pull-driven chunk stream.
//! SSE framing is handled by `eventsource-stream`; this module only decides
//! what each event means.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use eventsource_stream::{Event, EventStreamError, Eventsource};
use futures::stream::{self, Stream, StreamExt};
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::upstream::chunk::{ChatChunk, ChatMessage, ChatRequest, CompletionChunk};
use crate::upstream::error::UpstreamError;

/// Payload the upstream sends after the final content chunk.
const DONE_SENTINEL: &str = "[DONE]";

/// A single-use stream of completion chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<CompletionChunk, UpstreamError>> + Send>>;

/// Opens streaming completion sessions.
///
/// The HTTP layer depends on this seam rather than on the concrete network
/// client, so tests can substitute a scripted source.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    /// Open one streaming completion for the given prompt and model.
    ///
    /// The returned stream ends when the upstream closes the connection.
    /// Dropping it abandons the completion.
    async fn open(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
    ) -> Result<ChunkStream, UpstreamError>;
}

/// `CompletionSource` backed by reqwest.
#[derive(Clone)]
pub struct CompletionClient {
    config: UpstreamConfig,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl CompletionClient {
    /// Create a client with an explicit API key (or none).
    ///
    /// Only a connect timeout is set. A total request timeout would cut
    /// long generations short.
    pub fn new(config: UpstreamConfig, api_key: Option<String>) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            config,
            api_key,
            http,
        })
    }

    /// Create a client, resolving the API key from the configured
    /// environment variable.
    pub fn from_env(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let api_key = std::env::var(&config.api_key_env).ok();
        Self::new(config, api_key)
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CompletionSource for CompletionClient {
    async fn open(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
    ) -> Result<ChunkStream, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| UpstreamError::MissingApiKey(self.config.api_key_env.clone()))?;

        let body = ChatRequest {
            model: model.to_string(),
            messages,
            stream: true,
        };

        debug!(url = self.completions_url(), model = model, "Opening completion stream");

        let response = self
            .http
            .post(self.completions_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chunks = response
            .bytes_stream()
            .eventsource()
            .flat_map(|event| stream::iter(convert_event(event)));

        Ok(Box::pin(chunks))
    }
}

/// Map one SSE event to at most one chunk stream item.
///
/// Empty payloads and the `[DONE]` sentinel carry no chunk. Parse failures
/// and transport errors become stream items so they reach the consumer in
/// arrival order.
fn convert_event(
    event: Result<Event, EventStreamError<reqwest::Error>>,
) -> Option<Result<CompletionChunk, UpstreamError>> {
    match event {
        Ok(event) => {
            let data = event.data.trim();
            if data.is_empty() || data == DONE_SENTINEL {
                return None;
            }
            match serde_json::from_str::<ChatChunk>(data) {
                Ok(chunk) => Some(Ok(chunk.into_completion())),
                Err(e) => Some(Err(UpstreamError::Parse(e))),
            }
        }
        Err(e) => Some(Err(UpstreamError::Stream(e.to_string()))),
    }
}
