//! Server-Sent Events (SSE) parser for streamed tutor answers
//!
//! The backend sends one `data: ` line per event. Each payload is either the
//! literal `[DONE]` or a JSON object carrying a `content` delta (or an
//! `error` message when the server failed mid-stream).

use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::error::ApiError;
use super::models::StreamEvent;

/// Process an SSE body stream
///
/// Buffers bytes across chunk boundaries so that frames split between two
/// reads, including multi-byte characters, are decoded whole. Parsed events
/// go through `tx`; the function returns after `[DONE]`, at the end of the
/// body, or when the receiver goes away.
pub async fn process_stream<S, B>(
    mut stream: S,
    tx: mpsc::Sender<StreamEvent>,
    cancel_token: CancellationToken,
) -> Result<(), ApiError>
where
    S: Stream<Item = Result<B, reqwest::Error>> + Unpin,
    B: AsRef<[u8]>,
{
    let mut buffer: Vec<u8> = Vec::new();

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                return Err(ApiError::Cancelled);
            }

            chunk = stream.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        buffer.extend_from_slice(bytes.as_ref());

                        while let Some(newline_pos) = buffer.iter().position(|b| *b == b'\n') {
                            let line: Vec<u8> = buffer.drain(..=newline_pos).collect();
                            let line = decode_line(&line)?;

                            let Some(event) = parse_frame(line.trim_end()) else {
                                continue;
                            };
                            let done = event == StreamEvent::Done;
                            if tx.send(event).await.is_err() || done {
                                return Ok(());
                            }
                        }
                    }
                    Some(Err(e)) => {
                        return Err(ApiError::RequestError(e));
                    }
                    None => break,
                }
            }
        }
    }

    // A final frame without a trailing newline
    let rest = decode_line(&buffer)?;
    if let Some(event) = parse_frame(rest.trim_end()) {
        let _ = tx.send(event).await;
    }

    Ok(())
}

fn decode_line(bytes: &[u8]) -> Result<&str, ApiError> {
    std::str::from_utf8(bytes)
        .map_err(|e| ApiError::StreamParseError(format!("invalid UTF-8 in stream: {}", e)))
}

/// Parse a single SSE line
///
/// Returns `None` for blank lines, comments, non-data fields and payloads
/// that are not valid frames. Malformed frames are skipped rather than
/// failing the whole answer.
pub fn parse_frame(line: &str) -> Option<StreamEvent> {
    let data = line.strip_prefix("data: ")?;

    if data.trim() == "[DONE]" {
        return Some(StreamEvent::Done);
    }

    let parsed: serde_json::Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("Skipping malformed stream frame: {}", e);
            return None;
        }
    };

    if let Some(content) = parsed["content"].as_str() {
        if content.is_empty() {
            return None;
        }
        return Some(StreamEvent::Delta(content.to_string()));
    }

    if let Some(message) = parsed["error"].as_str() {
        return Some(StreamEvent::Error(message.to_string()));
    }

    tracing::debug!("Stream frame without content: {}", data);
    None
}
