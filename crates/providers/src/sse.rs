//! SSE line framing shared by both adapters.
//!
//! Network reads split the event stream at arbitrary byte offsets, so a
//! multi-byte UTF-8 character can straddle two reads. Lines are therefore
//! buffered as raw bytes and decoded only once a full line is present;
//! a `\n` byte never lands inside a multi-byte sequence, so decoding a
//! complete line is always sound.

/// Accumulates raw stream bytes and yields complete lines.
pub(crate) struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Append one network read.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Pop the next complete line, without its terminator. Returns `None`
    /// while the buffer holds only a partial line.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=end).collect();
        line.pop(); // the \n itself
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}
