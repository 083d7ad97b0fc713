//! idea-stream: streaming business-idea generator backend.
//!
//! Relays a single chat completion from an OpenAI-compatible API to the
//! browser as a `text/event-stream` response: one upstream chunk becomes one
//! SSE record, with newline-split fragments encoded as separate `data:`
//! lines so `EventSource` reassembles them exactly.

pub mod config;
pub mod server;
pub mod upstream;
