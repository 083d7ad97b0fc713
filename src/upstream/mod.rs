//! Upstream completion source: the OpenAI-compatible chat API this service
//! relays from.
//!
//! - [`chunk`]: Wire and domain chunk types
//! - [`client`]: `CompletionSource` trait and the reqwest-backed client
//! - [`error`]: Typed upstream errors

pub mod chunk;
pub mod client;
pub mod error;
