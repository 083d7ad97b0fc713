//! HTTP server relaying streamed completions.
//!
//! - [`idea_api`]: Route handlers and shared application state
//! - [`streaming`]: Chunk-to-SSE transcoding for streamed completions

pub mod idea_api;
pub mod streaming;
