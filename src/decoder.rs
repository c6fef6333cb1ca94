use tracing::warn;

/// the maximum number of bytes buffered for a single pending line.
/// A pending buffer that fills up without seeing a terminator is discarded.
pub const MAX_LINE_BYTES: usize = 1024;

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Incremental decoder turning a connection's byte stream into sanitized text lines.
///
/// Bytes are buffered until a `\n` terminator arrives; a `\r` immediately before the
/// terminator is dropped. A terminator with no preceding bytes (an empty line) is
/// skipped entirely and never materialized. Completed lines are sanitized by stripping
/// non-printable, non-whitespace characters, and the very first materialized line of
/// the stream additionally has a leading 3-byte UTF-8 byte-order mark removed if
/// present. The identical byte sequence on any later line is left untouched.
#[derive(Debug)]
pub struct LineDecoder {
    buf: Vec<u8>,
    seen_first: bool,
}

impl LineDecoder {
    /// creates a decoder with an empty pending buffer
    pub fn new() -> LineDecoder {
        LineDecoder {
            buf: Vec::new(),
            seen_first: false,
        }
    }

    /// consumes a chunk of received bytes, returning every line completed by this chunk
    /// in arrival order. Incomplete trailing bytes stay buffered for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        for &byte in bytes {
            if byte == b'\n' {
                if let Some(line) = self.complete_line() {
                    lines.push(line);
                }
            } else {
                if self.buf.len() >= MAX_LINE_BYTES {
                    warn!(
                        "pending line exceeded {} bytes with no terminator, discarding buffer",
                        MAX_LINE_BYTES
                    );
                    self.buf.clear();
                }
                self.buf.push(byte);
            }
        }
        lines
    }

    /// finishes the pending buffer into a sanitized line, or `None` for an empty line
    fn complete_line(&mut self) -> Option<String> {
        let mut raw = std::mem::take(&mut self.buf);
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        if raw.is_empty() {
            return None;
        }
        let body = if !self.seen_first {
            raw.strip_prefix(&UTF8_BOM[..]).unwrap_or(&raw[..])
        } else {
            &raw[..]
        };
        self.seen_first = true;
        Some(sanitize(body))
    }
}

impl Default for LineDecoder {
    fn default() -> LineDecoder {
        LineDecoder::new()
    }
}

/// decodes `raw` as UTF-8 (lossily) and strips non-printable, non-whitespace characters
fn sanitize(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect()
}
