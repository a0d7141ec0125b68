//! SSE buffering for streamed generation responses.
//!
//! Receive a `reqwest::Response`, buffer body chunks, split on blank lines,
//! extract `data:` payloads and hand each payload to a provider-specific
//! parser that returns `Vec<Result<Chunk>>`.

use crate::util::from_reqwest;
use mx_domain::error::Result;
use mx_domain::stream::{BoxStream, Chunk};

/// Extract complete `data:` payloads from an SSE byte buffer.
///
/// Events are delimited by a blank line (`\n\n`, or `\r\n\r\n` which is
/// normalized on the way in). Only `data:` lines are kept; multi-line data
/// within one event is joined with `\n`.
///
/// The buffer is drained in-place: consumed bytes are removed and any
/// trailing partial event remains for the next call. Bytes are only decoded
/// once their event is complete, so a UTF-8 sequence split across body
/// chunks survives intact.
pub(crate) fn drain_data_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    if buffer.contains(&b'\r') {
        normalize_crlf(buffer);
    }

    let mut payloads = Vec::new();

    while let Some(pos) = buffer.windows(2).position(|w| w == b"\n\n") {
        let event: Vec<u8> = buffer.drain(..pos + 2).collect();
        let block = String::from_utf8_lossy(&event[..pos]);

        let data: Vec<&str> = block
            .lines()
            .filter_map(|line| line.trim().strip_prefix("data:"))
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .collect();
        if !data.is_empty() {
            payloads.push(data.join("\n"));
        }
    }

    payloads
}

/// Collapse every `\r\n` into `\n`. A lone trailing `\r` is kept so it can
/// pair with a `\n` arriving in the next chunk.
fn normalize_crlf(buffer: &mut Vec<u8>) {
    let mut out = Vec::with_capacity(buffer.len());
    let mut bytes = buffer.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        if b == b'\r' && bytes.peek() == Some(&b'\n') {
            continue;
        }
        out.push(b);
    }
    *buffer = out;
}

/// Build a [`BoxStream`] of chunks from an SSE `reqwest::Response` and a
/// provider-specific parser closure.
///
/// The stream flushes a trailing unterminated event when the body closes and
/// ends right after the first transport error.
pub(crate) fn sse_response_stream<F>(
    response: reqwest::Response,
    mut parse_data: F,
) -> BoxStream<'static, Result<Chunk>>
where
    F: FnMut(&str) -> Vec<Result<Chunk>> + Send + 'static,
{
    let stream = async_stream::stream! {
        let mut response = response;
        let mut buffer: Vec<u8> = Vec::new();

        loop {
            match response.chunk().await {
                Ok(Some(bytes)) => {
                    buffer.extend_from_slice(&bytes);
                    for data in drain_data_lines(&mut buffer) {
                        for item in parse_data(&data) {
                            yield item;
                        }
                    }
                }
                Ok(None) => {
                    if !buffer.iter().all(u8::is_ascii_whitespace) {
                        buffer.extend_from_slice(b"\n\n");
                        for data in drain_data_lines(&mut buffer) {
                            for item in parse_data(&data) {
                                yield item;
                            }
                        }
                    }
                    break;
                }
                Err(e) => {
                    yield Err(from_reqwest(e));
                    break;
                }
            }
        }
    };

    Box::pin(stream)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
