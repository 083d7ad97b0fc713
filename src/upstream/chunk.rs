//! Wire and domain types for streamed chat completions.
//!
//! The upstream speaks the OpenAI chat-completions protocol: each SSE
//! payload is a JSON chunk carrying zero or more choices, each with a delta
//! that may or may not contain new text. Only the text fragment matters to
//! this service, so wire chunks are reduced to [`CompletionChunk`] at the
//! boundary and everything else is dropped.

use serde::{Deserialize, Serialize};

/// One `{role, content}` message of the upstream prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Build a user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for a streaming chat completion.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

/// A chat-completion chunk as the upstream serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// One choice within a streamed chunk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
}

/// Incremental delta within a choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatChunk {
    /// Reduce the wire chunk to its text fragment.
    pub fn into_completion(self) -> CompletionChunk {
        let text = self.choices.into_iter().next().and_then(|c| c.delta.content);
        CompletionChunk { text }
    }
}

/// The unit consumed by the transcoder: one upstream chunk reduced to its
/// optional text fragment.
///
/// Metadata-only chunks (role announcements, usage frames, chunks without
/// choices) reduce to `text: None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionChunk {
    /// New text produced by this chunk, verbatim. May be `Some("")`.
    pub text: Option<String>,
}

impl CompletionChunk {
    /// A chunk carrying the given text fragment.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// A chunk with no text fragment.
    pub fn absent() -> Self {
        Self { text: None }
    }
}
