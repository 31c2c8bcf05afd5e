use std::io::BufRead;

use crate::error::IoDataError;

/// Streaming whitespace tokenizer over a buffered reader.
///
/// The stream is consumed strictly forward, one token at a time, with no
/// lookahead beyond the token being read. Any whitespace arrangement is
/// accepted, including the one-token-per-line layout the encoder emits.
pub(crate) struct Tokens<R> {
    reader: R,
}

impl<R: BufRead> Tokens<R> {
    pub(crate) fn new(reader: R) -> Tokens<R> {
        Tokens { reader }
    }

    /// Read the next whitespace-delimited token, failing at end of stream.
    pub(crate) fn next_token(&mut self) -> Result<String, IoDataError> {
        let mut token: Vec<u8> = Vec::new();
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let mut used = 0;
            let mut done = false;
            for &byte in buf {
                used += 1;
                if byte.is_ascii_whitespace() {
                    if token.is_empty() {
                        continue;
                    }
                    done = true;
                    break;
                }
                token.push(byte);
            }
            self.reader.consume(used);
            if done {
                break;
            }
        }
        if token.is_empty() {
            return Err(IoDataError::UnexpectedEof);
        }
        // A token holding invalid UTF-8 cannot parse as any kind anyway, so
        // a lossy conversion is enough to report it.
        Ok(String::from_utf8_lossy(&token).into_owned())
    }
}
