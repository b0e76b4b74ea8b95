// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Naiad-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Naiad and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::VecDeque;
use std::fmt;

use futures::{stream, Stream, StreamExt};

use crate::model::Change;

use super::{ChangeStream, GenerationError};

const DATA_FIELD: &[u8] = b"data:";
const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("event line is not valid UTF-8")]
    Utf8,
    #[error("event payload is not a change: {source}")]
    Json {
        payload: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Splits a byte stream into `data: <json>` lines and decodes each payload as a [`Change`].
///
/// Chunks may split lines anywhere. Blank lines, `:` comments, non-`data` fields and the
/// `[DONE]` sentinel produce nothing.
#[derive(Debug, Default)]
pub struct EventLineDecoder {
    buf: Vec<u8>,
}

impl EventLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<Change, DecodeError>> {
        self.buf.extend_from_slice(chunk);
        let mut out = Vec::new();
        let mut consumed = 0;
        while let Some(pos) = memchr::memchr(b'\n', &self.buf[consumed..]) {
            let line = &self.buf[consumed..consumed + pos];
            if let Some(decoded) = decode_line(line) {
                out.push(decoded);
            }
            consumed += pos + 1;
        }
        self.buf.drain(..consumed);
        out
    }

    /// Flushes a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Option<Result<Change, DecodeError>> {
        let line = std::mem::take(&mut self.buf);
        decode_line(&line)
    }
}

fn decode_line(line: &[u8]) -> Option<Result<Change, DecodeError>> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let payload = line.strip_prefix(DATA_FIELD)?;
    let Ok(payload) = std::str::from_utf8(payload) else {
        return Some(Err(DecodeError::Utf8));
    };
    let payload = payload.trim();
    if payload.is_empty() || payload == DONE_SENTINEL {
        return None;
    }
    Some(serde_json::from_str(payload).map_err(|source| DecodeError::Json {
        payload: payload.to_owned(),
        source,
    }))
}

/// Adapts a chunked byte stream into a [`ChangeStream`]. A transport error ends the stream.
pub fn decode_stream<S, B, E>(bytes: S) -> ChangeStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let state = (bytes.boxed(), EventLineDecoder::new(), VecDeque::new(), false);
    stream::unfold(state, |(mut bytes, mut decoder, mut ready, mut done)| async move {
        loop {
            if let Some(item) = ready.pop_front() {
                return Some((item, (bytes, decoder, ready, done)));
            }
            if done {
                return None;
            }
            match bytes.next().await {
                Some(Ok(chunk)) => ready.extend(
                    decoder.push(chunk.as_ref()).into_iter().map(|r| r.map_err(GenerationError::from)),
                ),
                Some(Err(err)) => {
                    ready.push_back(Err(GenerationError::Transport(err.to_string())));
                    done = true;
                }
                None => {
                    if let Some(last) = decoder.finish() {
                        ready.push_back(last.map_err(GenerationError::from));
                    }
                    done = true;
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use futures::{stream, StreamExt};

    use super::{decode_stream, DecodeError, EventLineDecoder};
    use crate::generate::GenerationError;

    const SHAPE: &str = r#"{"type":"deleteShape","description":"d","shapeId":"shape:a"}"#;

    #[test]
    fn decoder_handles_split_lines_and_ignores_noise() {
        let mut decoder = EventLineDecoder::new();
        let body = format!(": keepalive\n\nevent: change\ndata: {SHAPE}\r\ndata: [DONE]\n");
        let (head, tail) = body.as_bytes().split_at(30);
        let mut decoded = decoder.push(head);
        decoded.extend(decoder.push(tail));
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.remove(0).expect("change").kind(), "deleteShape");
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn decoder_reports_bad_payloads_per_line() {
        let mut decoder = EventLineDecoder::new();
        let decoded = decoder.push(format!("data: {{nope\ndata: {SHAPE}\n").as_bytes());
        assert!(matches!(decoded[0], Err(DecodeError::Json { .. })));
        assert!(decoded[1].is_ok());
    }

    #[test]
    fn decoder_flushes_unterminated_last_line() {
        let mut decoder = EventLineDecoder::new();
        assert!(decoder.push(format!("data: {SHAPE}").as_bytes()).is_empty());
        assert!(decoder.finish().expect("last line").is_ok());
    }

    #[tokio::test]
    async fn stream_yields_changes_then_ends_on_transport_error() {
        let chunks: Vec<Result<Vec<u8>, String>> = vec![
            Ok(format!("data: {SHAPE}\n").into_bytes()),
            Ok(b"data: {\"type\":".to_vec()),
            Err("connection reset".to_owned()),
            Ok(format!("data: {SHAPE}\n").into_bytes()),
        ];
        let items: Vec<_> = decode_stream(stream::iter(chunks)).collect().await;
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(&items[1], Err(GenerationError::Transport(msg)) if msg == "connection reset"));
    }
}
