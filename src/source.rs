//! Code-point sources feeding the lexer.
//!
//! [`StrSource`] walks in-memory text. [`Utf8Reader`] decodes a byte stream
//! incrementally, so a large document never has to be resident in memory.

use std::io::{self, BufRead, BufReader, Read};
use std::str::Chars;

use crate::error::{Error, Result};
use crate::seq::{Pull, Terminal};

/// Code points of an in-memory string.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: Chars<'a>,
}

impl<'a> StrSource<'a> {
    /// Create a source over `text`.
    pub fn new(text: &'a str) -> Self {
        Self { chars: text.chars() }
    }
}

impl Pull for StrSource<'_> {
    type Item = char;

    fn pull(&mut self) -> Result<Option<char>> {
        Ok(self.chars.next())
    }
}

/// Code points decoded from a UTF-8 byte stream.
///
/// Rejects invalid lead bytes, bad continuation bytes, truncated sequences,
/// overlong encodings, surrogate code points and values above U+10FFFF.
pub struct Utf8Reader<R> {
    reader: BufReader<R>,
    latch: Terminal,
}

impl<R: Read> Utf8Reader<R> {
    /// Wrap `reader` in a buffered UTF-8 decoder.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            latch: Terminal::new(),
        }
    }

    /// Read one byte, `None` at end of stream.
    fn next_byte(&mut self) -> Result<Option<u8>> {
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            let Some(&b) = buf.first() else {
                return Ok(None);
            };
            self.reader.consume(1);
            return Ok(Some(b));
        }
    }

    /// Decode the next code point.
    fn decode(&mut self) -> Result<Option<char>> {
        let Some(b0) = self.next_byte()? else {
            return Ok(None);
        };

        if b0 <= 0x7F {
            return Ok(Some(b0 as char));
        }

        // Sequence length, payload bits of the lead byte, smallest legal value
        let (len, mut codepoint, min) = if b0 & 0xE0 == 0xC0 {
            (2, (b0 & 0x1F) as u32, 0x80)
        } else if b0 & 0xF0 == 0xE0 {
            (3, (b0 & 0x0F) as u32, 0x800)
        } else if b0 & 0xF8 == 0xF0 {
            (4, (b0 & 0x07) as u32, 0x10000)
        } else {
            return Err(Error::InvalidUtf8(vec![b0]));
        };

        let mut seen = vec![b0];
        for _ in 1..len {
            let b = self
                .next_byte()?
                .ok_or_else(|| Error::InvalidUtf8(seen.clone()))?;
            seen.push(b);
            if b & 0xC0 != 0x80 {
                return Err(Error::InvalidUtf8(seen));
            }
            codepoint = (codepoint << 6) | (b & 0x3F) as u32;
        }

        if codepoint < min {
            return Err(Error::InvalidUtf8(seen));
        }
        // Rejects surrogates and anything above U+10FFFF
        char::from_u32(codepoint)
            .map(Some)
            .ok_or(Error::InvalidUtf8(seen))
    }
}

impl<R: Read> Pull for Utf8Reader<R> {
    type Item = char;

    fn pull(&mut self) -> Result<Option<char>> {
        if let Some(end) = self.latch.replay() {
            return end;
        }
        let result = self.decode();
        self.latch.record(result)
    }
}
