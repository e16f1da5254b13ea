use crate::decode::{Decoded, decode_chunk};
use bytes::BytesMut;
use serde::{Deserialize, Serialize};

/// How received bytes are split into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// Keep an unterminated trailing line until its newline arrives.
    #[default]
    CarryOver,

    /// Treat every read as an independent batch. A record split across two
    /// reads is decoded as two broken lines.
    PerRead,
}

/// Per-connection line splitter.
#[derive(Debug)]
pub struct LineFramer {
    framing: Framing,
    pending: BytesMut,
    max_line_bytes: usize,
}

impl LineFramer {
    pub fn new(framing: Framing, max_line_bytes: usize) -> Self {
        Self {
            framing,
            pending: BytesMut::new(),
            max_line_bytes,
        }
    }

    /// Feed one received chunk and decode every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Decoded> {
        if self.framing == Framing::PerRead {
            return decode_chunk(chunk);
        }

        self.pending.extend_from_slice(chunk);

        let mut decoded = match self.pending.iter().rposition(|&b| b == b'\n') {
            Some(last_newline) => decode_chunk(&self.pending.split_to(last_newline + 1)),
            None => Vec::new(),
        };

        if self.pending.len() > self.max_line_bytes {
            tracing::warn!(
                pending = self.pending.len(),
                max_line_bytes = self.max_line_bytes,
                "unterminated line exceeds limit, flushing as-is"
            );
            decoded.extend(decode_chunk(&self.pending.split()));
        }

        decoded
    }

    /// Decode whatever is left once the connection ends.
    pub fn finish(&mut self) -> Vec<Decoded> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        decode_chunk(&self.pending.split())
    }

    /// Bytes held back waiting for a newline.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
