//! Chunk-to-SSE transcoding for streamed completions.
//!
//! Converts the upstream chunk stream into the wire format the browser's
//! `EventSource` reassembles: each chunk's text fragment becomes one SSE
//! record of `data:` lines, one per newline-split substring, closed by a
//! blank line. `EventSource` rejoins the lines of a record with `\n`, so
//! fragments round-trip exactly and Markdown structure survives the relay.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::upstream::chunk::CompletionChunk;
use crate::upstream::error::UpstreamError;

/// Encode one chunk as zero or more wire events.
///
/// The fragment is split on `\n` preserving empty substrings, each substring
/// becomes a `data: <substring>\n` line, and a single blank line terminates
/// the record. Chunks with no fragment, or an empty one, produce nothing at
/// all.
pub fn chunk_events(chunk: &CompletionChunk) -> Vec<Bytes> {
    let Some(text) = chunk.text.as_deref() else {
        return Vec::new();
    };
    if text.is_empty() {
        return Vec::new();
    }

    let mut events: Vec<Bytes> = text
        .split('\n')
        .map(|line| Bytes::from(format!("data: {line}\n")))
        .collect();
    events.push(Bytes::from_static(b"\n"));
    events
}

/// Convert a chunk stream into a lazy SSE event stream.
///
/// Events appear strictly in chunk arrival order and are produced only as
/// the consumer polls; nothing is buffered beyond the events of the chunk
/// currently being encoded. Errors pass through unchanged, and the stream
/// ends when the input ends, with no closing event of its own.
pub fn completion_to_sse_stream<S>(
    chunks: S,
) -> impl Stream<Item = Result<Bytes, UpstreamError>> + Send
where
    S: Stream<Item = Result<CompletionChunk, UpstreamError>> + Send,
{
    chunks
        .map(|item| match item {
            Ok(chunk) => chunk_events(&chunk).into_iter().map(Ok).collect(),
            Err(e) => vec![Err(e)],
        })
        .flat_map(stream::iter)
}
