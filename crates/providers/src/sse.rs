//! Incremental decoder for chat-completions server-sent events.
//!
//! Bytes are buffered until a full line is available, so a frame split
//! across network reads is still decoded once. Deltas are never merged:
//! each decoded frame yields at most one [`Frame::Delta`].

use serde::Deserialize;
use tracing::warn;

/// Prefix of every payload-carrying line.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that terminates the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// A decoded stream frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Delta(String),
    Done,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes; returns every frame completed by them, in order.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<Frame> {
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(frame) = decode_line(&String::from_utf8_lossy(&line)) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Decode whatever is left once the byte stream has ended.
    pub fn finish(&mut self) -> Vec<Frame> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        let line = std::mem::take(&mut self.buffer);
        decode_line(&String::from_utf8_lossy(&line)).into_iter().collect()
    }
}

fn decode_line(line: &str) -> Option<Frame> {
    let line = line.trim_end_matches(['\n', '\r']);
    let data = line.strip_prefix(DATA_PREFIX)?.trim();

    if data == DONE_SENTINEL {
        return Some(Frame::Done);
    }

    match serde_json::from_str::<StreamResponse>(data) {
        Ok(resp) => resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.delta.content)
            .filter(|text| !text.is_empty())
            .map(Frame::Delta),
        Err(e) => {
            warn!(data = %data, error = %e, "Skipping unparseable stream frame");
            None
        }
    }
}

// --- Streaming SSE types ---

/// A single `data: {...}` payload.
#[derive(Debug, Deserialize)]
struct StreamResponse {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_content_deltas_in_order() {
        let mut dec = SseDecoder::new();
        let frames = dec.push(
            b"data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\
              data: {\"choices\":[{\"delta\":{\"content\":\"!\"}}]}\n\
              data: [DONE]\n",
        );
        assert_eq!(
            frames,
            vec![Frame::Delta("Hi".into()), Frame::Delta("!".into()), Frame::Done]
        );
    }

    #[test]
    fn frame_split_across_reads() {
        let mut dec = SseDecoder::new();
        assert!(dec.push(b"data: {\"choices\":[{\"del").is_empty());
        let frames = dec.push(b"ta\":{\"content\":\"joined\"}}]}\r\n");
        assert_eq!(frames, vec![Frame::Delta("joined".into())]);
    }

    #[test]
    fn multibyte_char_split_across_reads() {
        let mut dec = SseDecoder::new();
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"héllo\"}}]}\n".as_bytes();
        let split = line.iter().position(|b| *b == 0xC3).unwrap() + 1;
        assert!(dec.push(&line[..split]).is_empty());
        assert_eq!(dec.push(&line[split..]), vec![Frame::Delta("héllo".into())]);
    }

    #[test]
    fn ignores_other_lines_and_empty_deltas() {
        let mut dec = SseDecoder::new();
        let frames = dec.push(
            b": keep-alive\n\
              event: message\n\
              \n\
              data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\
              data: {\"choices\":[{\"delta\":{\"content\":\"\"},\"finish_reason\":\"stop\"}]}\n\
              data: {\"choices\":[]}\n",
        );
        assert!(frames.is_empty());
    }

    #[test]
    fn malformed_frame_is_skipped() {
        let mut dec = SseDecoder::new();
        let frames = dec.push(
            b"data: {not json\n\
              data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n",
        );
        assert_eq!(frames, vec![Frame::Delta("ok".into())]);
    }

    #[test]
    fn finish_flushes_unterminated_line() {
        let mut dec = SseDecoder::new();
        assert!(dec.push(b"data: [DONE]").is_empty());
        assert_eq!(dec.finish(), vec![Frame::Done]);
        assert!(dec.finish().is_empty());
    }
}
