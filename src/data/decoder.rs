//! Incremental decoder turning raw stdin bytes into numeric records.
//!
//! Reads arrive in arbitrary fragments, so a token may be split across two
//! chunks. The decoder only tokenizes up to the last whitespace byte it has
//! seen and keeps the remainder for the next chunk. Invalid tokens are
//! dropped without disturbing the tokens around them.

/// Upper bound of the retained, not yet tokenized, byte window.
pub const DECODER_CAPACITY: usize = 4096;

/// One accepted unit of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub v1: f64,
    /// Present only in two-value mode.
    pub v2: Option<f64>,
}

/// How many tokens make up one record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RecordMode {
    #[default]
    Single,
    Pair,
}

#[derive(Debug, Clone)]
pub struct StreamDecoder {
    mode: RecordMode,
    buf: Vec<u8>,
    /// First half of an in-flight pair.
    pending: Option<f64>,
    /// Total bytes thrown away by the garbage policy.
    discarded: u64,
}

#[inline]
fn is_delimiter(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Parse one token as a finite float. Anything else is `None`.
pub fn parse_token(token: &[u8]) -> Option<f64> {
    let s = std::str::from_utf8(token).ok()?;
    let v: f64 = s.parse().ok()?;
    v.is_finite().then_some(v)
}

impl StreamDecoder {
    pub fn new(mode: RecordMode) -> Self {
        Self {
            mode,
            buf: Vec::with_capacity(DECODER_CAPACITY),
            pending: None,
            discarded: 0,
        }
    }

    pub fn mode(&self) -> RecordMode {
        self.mode
    }

    /// Bytes held back because they may be the start of a longer token.
    pub fn retained(&self) -> &[u8] {
        &self.buf
    }

    pub fn pending(&self) -> Option<f64> {
        self.pending
    }

    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// How many bytes the next read may deliver without overflowing.
    ///
    /// Never 0: the garbage policy keeps the retained tail at or below half
    /// the capacity.
    pub fn spare_capacity(&self) -> usize {
        DECODER_CAPACITY - self.buf.len()
    }

    /// Append `chunk` and emit every record that is now complete.
    ///
    /// Returns how many retained bytes were fully processed and released.
    /// Chunks larger than the window are taken in window-sized slices.
    pub fn feed(&mut self, chunk: &[u8], out: &mut Vec<Record>) -> usize {
        let mut consumed = 0;
        let mut rest = chunk;
        while !rest.is_empty() {
            let take = rest.len().min(self.spare_capacity());
            self.append(&rest[..take]);
            rest = &rest[take..];
            consumed += self.decode_complete(out);
            self.enforce_bound();
        }
        consumed
    }

    /// End of stream: the retained tail is final.
    ///
    /// A synthetic delimiter closes the last token. An unmatched first value
    /// of a pair is dropped.
    pub fn finish(&mut self, out: &mut Vec<Record>) -> usize {
        self.buf.push(b'\n');
        let consumed = self.decode_complete(out);
        self.buf.clear();
        if self.pending.take().is_some() {
            log::debug!("dropping unpaired trailing value at end of stream");
        }
        consumed.saturating_sub(1)
    }

    fn append(&mut self, bytes: &[u8]) {
        // NUL bytes count as delimiters so binary noise cannot hide every
        // delimiter in the window.
        self.buf
            .extend(bytes.iter().map(|&b| if b == 0 { b'\n' } else { b }));
    }

    /// Tokenize everything up to and including the last delimiter.
    fn decode_complete(&mut self, out: &mut Vec<Record>) -> usize {
        let Some(last) = self.buf.iter().rposition(|&b| is_delimiter(b)) else {
            return 0;
        };
        let safe = last + 1;
        for token in self.buf[..safe]
            .split(|&b| is_delimiter(b))
            .filter(|t| !t.is_empty())
        {
            if let Some(v) = parse_token(token) {
                match (self.mode, self.pending.take()) {
                    (RecordMode::Single, _) => out.push(Record { v1: v, v2: None }),
                    (RecordMode::Pair, None) => self.pending = Some(v),
                    (RecordMode::Pair, Some(first)) => out.push(Record {
                        v1: first,
                        v2: Some(v),
                    }),
                }
            }
        }
        self.buf.drain(..safe);
        safe
    }

    /// Keep a delimiter-less tail from growing without bound.
    ///
    /// Past half the window, the oldest half of the tail is thrown away and
    /// the newest bytes stay, since they may begin a valid token.
    fn enforce_bound(&mut self) {
        if self.buf.len() <= DECODER_CAPACITY / 2 {
            return;
        }
        let len = self.buf.len();
        let drop = len / 2;
        self.buf.drain(..drop);
        self.discarded += drop as u64;
        log::debug!("no delimiter in {} bytes, discarded {}", len, drop);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_token_accepts_plain_and_scientific() {
        assert_eq!(parse_token(b"42"), Some(42.0));
        assert_eq!(parse_token(b"-1.5"), Some(-1.5));
        assert_eq!(parse_token(b"2e3"), Some(2000.0));
    }

    #[test]
    fn parse_token_rejects_partial_and_non_finite() {
        assert_eq!(parse_token(b"12x3"), None);
        assert_eq!(parse_token(b"inf"), None);
        assert_eq!(parse_token(b"NaN"), None);
        assert_eq!(parse_token(b"1e999"), None);
        assert_eq!(parse_token(&[0xff, b'1']), None);
    }

    #[test]
    fn nul_bytes_become_delimiters() {
        let mut d = StreamDecoder::new(RecordMode::Single);
        let mut out = Vec::new();
        d.feed(b"1\x002\x00", &mut out);
        assert_eq!(out.len(), 2);
        assert!(d.retained().is_empty());
    }
}
