//! SSE stream decoder for chat completion responses.
//!
//! OpenAI-compatible servers stream completions as a server-sent-events
//! style body: `data: {json}` lines carrying incremental deltas,
//! terminated by a `data: [DONE]` line. The decoder here is an explicit
//! two-state machine (`AwaitingLine` / `Done`) fed one physical line at
//! a time, so termination and skip behavior are testable without any
//! transport.
//!
//! Robustness over strictness: keep-alive comments, blank lines, and
//! malformed JSON payloads are consumed silently; only transport-level
//! failures propagate.

use futures::{Stream, StreamExt};
use serde::Deserialize;
use tracing::trace;
use yuki_core::error::ClientError;
use yuki_core::sink::DeltaSink;

/// Prefix of data-bearing SSE lines.
const DATA_PREFIX: &str = "data:";

/// Payload signaling that no further deltas will arrive.
const STREAM_TERMINATOR: &str = "[DONE]";

/// Where the decoder is in the stream lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Reading lines, emitting deltas as they parse.
    AwaitingLine,
    /// Terminator seen (or stream ended); no further deltas.
    Done,
}

/// Incremental decoder for one streaming response body.
///
/// Feed physical lines with [`push_line`](Self::push_line); each
/// non-empty content delta is forwarded to the sink synchronously and
/// appended to the internal accumulator. [`finish`](Self::finish)
/// returns the accumulated text — the concatenation of every delta
/// emitted, which becomes the assistant message's content.
pub struct StreamDecoder<'a, S: DeltaSink> {
    sink: &'a mut S,
    state: DecoderState,
    accumulated: String,
}

impl<'a, S: DeltaSink> StreamDecoder<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self {
            sink,
            state: DecoderState::AwaitingLine,
            accumulated: String::new(),
        }
    }

    /// Whether the stream terminator has been seen. Once done, further
    /// input is ignored and the caller should stop reading.
    pub fn is_done(&self) -> bool {
        self.state == DecoderState::Done
    }

    /// Consume one physical line (line ending already stripped).
    pub fn push_line(&mut self, line: &str) {
        if self.state == DecoderState::Done {
            return;
        }

        // Blank lines, SSE comments, and anything else without the data
        // prefix are keep-alive noise.
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return;
        };
        let payload = payload.trim();

        if payload == STREAM_TERMINATOR {
            self.state = DecoderState::Done;
            return;
        }

        match serde_json::from_str::<StreamEvent>(payload) {
            Ok(event) => {
                let content = event
                    .choices
                    .first()
                    .and_then(|c| c.delta.content.as_deref())
                    .unwrap_or_default();
                if !content.is_empty() {
                    self.sink.on_delta(content);
                    self.accumulated.push_str(content);
                }
            }
            Err(e) => {
                trace!(data = %payload, error = %e, "Ignoring unparseable SSE chunk");
            }
        }
    }

    /// Finalize and return the accumulated text.
    ///
    /// Valid in either state: a stream that ends without an explicit
    /// terminator is treated as a clean end, since some servers omit
    /// the `[DONE]` line.
    pub fn finish(self) -> String {
        self.accumulated
    }
}

/// Drive a [`StreamDecoder`] over a fallible chunk stream.
///
/// Performs a single incremental pass: chunks are spliced into physical
/// lines (`\n`-delimited, trailing `\r` trimmed) across chunk
/// boundaries, and reading stops as soon as the terminator is seen —
/// any buffered remainder is discarded. A trailing line without a final
/// newline is still processed when the stream ends.
///
/// The buffer holds raw bytes and only complete lines are decoded as
/// UTF-8: the transport may split a multi-byte character across chunks,
/// and decoding per chunk would mangle it.
///
/// A chunk-level read error aborts immediately with
/// [`ClientError::Transport`]; deltas already forwarded to the sink are
/// not retracted.
pub async fn decode_stream<B, C, E, S>(
    mut byte_stream: B,
    sink: &mut S,
) -> Result<String, ClientError>
where
    B: Stream<Item = Result<C, E>> + Unpin,
    C: AsRef<[u8]>,
    E: std::fmt::Display,
    S: DeltaSink,
{
    let mut decoder = StreamDecoder::new(sink);
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = byte_stream.next().await {
        let chunk = chunk.map_err(|e| ClientError::Transport(e.to_string()))?;
        buffer.extend_from_slice(chunk.as_ref());

        while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = buffer.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&line_bytes[..line_end]);

            decoder.push_line(line.trim_end_matches('\r'));
            if decoder.is_done() {
                return Ok(decoder.finish());
            }
        }
    }

    // Stream ended without a terminator: clean end. A final line that
    // never got its newline still counts.
    if !buffer.is_empty() {
        let line = String::from_utf8_lossy(&buffer);
        decoder.push_line(line.trim_end_matches('\r'));
    }
    Ok(decoder.finish())
}

// --- Streaming SSE event types ---

/// A single SSE `data: {...}` event from a streaming response.
#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}
