//! JSON lexer/tokenizer.
//!
//! Converts a sequence of code points into a sequence of tokens for the
//! parser. Whitespace between tokens is skipped. String escapes are resolved,
//! including UTF-16 surrogate pairs; number and literal tokens keep their raw
//! text so no digit is lost before the value model sees it.
//!
//! Numbers are matched longest-first and stop at the first character that
//! does not fit the grammar, which is left for the next token. Literals are
//! matched by length alone, so `null1` lexes as `null` followed by `1`.

use std::fmt;

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::seq::{Pull, PushBack, Terminal};

/// Token types produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Left brace `{`
    OpenBrace,
    /// Right brace `}`
    CloseBrace,
    /// Left bracket `[`
    OpenBracket,
    /// Right bracket `]`
    CloseBracket,
    /// Comma `,`
    Comma,
    /// Colon `:`
    Colon,
    /// String value (unescaped)
    String,
    /// Number value (raw literal)
    Number,
    /// `true` or `false`
    Boolean,
    /// `null`
    Null,
}

/// A lexical unit: its kind and its text.
///
/// `text` is the decoded payload for strings and the literal source text for
/// everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// The token's kind.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The decoded or literal text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Take ownership of the text.
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::String => write!(f, "string {:?}", self.text),
            TokenKind::Number => write!(f, "number {}", self.text),
            TokenKind::Boolean | TokenKind::Null => f.write_str(&self.text),
            _ => write!(f, "'{}'", self.text),
        }
    }
}

/// Describe an optional token for error messages.
pub(crate) fn describe(token: Option<&Token>) -> String {
    match token {
        Some(token) => token.to_string(),
        None => "end of input".to_string(),
    }
}

/// JSON lexer over a code-point source.
pub struct Lexer<S: Pull<Item = char>> {
    chars: PushBack<S>,
    limits: Limits,
    latch: Terminal,
}

impl<S: Pull<Item = char>> Lexer<S> {
    /// Create a new lexer for the given source.
    pub fn new(source: S, limits: Limits) -> Self {
        Self {
            chars: PushBack::new(source),
            limits,
            latch: Terminal::new(),
        }
    }

    /// Read the next token, `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.pull()
    }

    fn lex(&mut self) -> Result<Option<Token>> {
        let c = loop {
            match self.chars.pull()? {
                None => return Ok(None),
                Some(' ' | '\t' | '\n' | '\r') => continue,
                Some(c) => break c,
            }
        };

        let token = match c {
            '{' => Token::new(TokenKind::OpenBrace, "{"),
            '}' => Token::new(TokenKind::CloseBrace, "}"),
            '[' => Token::new(TokenKind::OpenBracket, "["),
            ']' => Token::new(TokenKind::CloseBracket, "]"),
            ',' => Token::new(TokenKind::Comma, ","),
            ':' => Token::new(TokenKind::Colon, ":"),
            '"' => self.read_string()?,
            't' | 'f' | 'n' => self.read_literal(c)?,
            '-' | '0'..='9' => self.read_number(c)?,
            other => return Err(Error::InvalidCharacter(other)),
        };

        tracing::trace!(kind = ?token.kind, text = %token.text, "token");
        Ok(Some(token))
    }

    /// Read a string token; the opening quote is already consumed.
    fn read_string(&mut self) -> Result<Token> {
        let mut text = String::new();

        loop {
            match self.chars.pull()? {
                None => return Err(Error::IncompleteString(text)),
                Some('"') => break,
                Some('\\') => {
                    let c = self.read_escape()?;
                    text.push(c);
                }
                Some(c) if (c as u32) < 0x20 => {
                    return Err(Error::ControlCharacter(c as u32));
                }
                Some(c) => text.push(c),
            }

            if text.len() as u64 > self.limits.max_string_length {
                return Err(Error::StringTooLong(
                    text.len() as u64,
                    self.limits.max_string_length,
                ));
            }
        }

        Ok(Token::new(TokenKind::String, text))
    }

    /// Read an escape sequence after a backslash.
    fn read_escape(&mut self) -> Result<char> {
        match self.chars.pull()? {
            None => Err(Error::IncompleteEscape("\\".to_string())),
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some('/') => Ok('/'),
            Some('b') => Ok('\x08'),
            Some('f') => Ok('\x0C'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('u') => self.read_unicode_escape(),
            Some(c) => Err(Error::IllegalEscape(format!("\\{c}"))),
        }
    }

    /// Read the rest of a `\uXXXX` escape, pairing surrogates.
    fn read_unicode_escape(&mut self) -> Result<char> {
        let mut seen = String::from("\\u");
        let unit = self.read_hex4(&mut seen)?;

        match unit {
            0xD800..=0xDBFF => {
                if self.chars.pull()? != Some('\\') {
                    return Err(Error::UnpairedHighSurrogate(seen));
                }
                seen.push('\\');
                match self.chars.pull()? {
                    Some('u') => seen.push('u'),
                    Some(c) => {
                        seen.push(c);
                        return Err(Error::UnpairedHighSurrogate(seen));
                    }
                    None => return Err(Error::IncompleteEscape(seen)),
                }

                let low = self.read_hex4(&mut seen)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(Error::InvalidSurrogatePair(seen));
                }
                let combined = 0x10000 + ((unit as u32 - 0xD800) << 10) + (low as u32 - 0xDC00);
                char::from_u32(combined).ok_or(Error::InvalidSurrogatePair(seen))
            }
            0xDC00..=0xDFFF => Err(Error::UnpairedLowSurrogate(seen)),
            _ => char::from_u32(unit as u32).ok_or(Error::IllegalEscape(seen)),
        }
    }

    /// Read 4 hex digits, appending them to `seen`.
    fn read_hex4(&mut self, seen: &mut String) -> Result<u16> {
        let mut value: u16 = 0;
        for _ in 0..4 {
            let c = match self.chars.pull()? {
                Some(c) => c,
                None => return Err(Error::IncompleteEscape(seen.clone())),
            };
            seen.push(c);
            let digit = c
                .to_digit(16)
                .ok_or_else(|| Error::IllegalEscape(seen.clone()))?;
            value = (value << 4) | digit as u16;
        }
        Ok(value)
    }

    /// Read a number token starting with `first` (a digit or `-`).
    fn read_number(&mut self, first: char) -> Result<Token> {
        let mut text = String::from(first);

        let has_digits = self.take_digits(&mut text)?;
        if first == '-' && !has_digits {
            return Err(Error::InvalidNumber(text));
        }

        // Fraction
        if self.take_if(&mut text, |c| c == '.')? && !self.take_digits(&mut text)? {
            return Err(Error::InvalidNumber(text));
        }

        // Exponent
        if self.take_if(&mut text, |c| c == 'e' || c == 'E')? {
            self.take_if(&mut text, |c| c == '+' || c == '-')?;
            if !self.take_digits(&mut text)? {
                return Err(Error::InvalidNumber(text));
            }
        }

        Ok(Token::new(TokenKind::Number, text))
    }

    /// Consume a run of digits; false if there were none.
    fn take_digits(&mut self, text: &mut String) -> Result<bool> {
        let mut any = false;
        while self.take_if(text, |c| c.is_ascii_digit())? {
            any = true;
        }
        Ok(any)
    }

    /// Consume one character if it matches, otherwise leave it in place.
    fn take_if(&mut self, text: &mut String, accept: impl Fn(char) -> bool) -> Result<bool> {
        match self.chars.pull()? {
            Some(c) if accept(c) => {
                text.push(c);
                Ok(true)
            }
            Some(c) => {
                self.chars.push_back(c);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Read `true`, `false` or `null`, by length only.
    fn read_literal(&mut self, first: char) -> Result<Token> {
        let (expected, kind) = match first {
            't' => ("true", TokenKind::Boolean),
            'f' => ("false", TokenKind::Boolean),
            _ => ("null", TokenKind::Null),
        };

        let mut text = String::from(first);
        for want in expected.chars().skip(1) {
            match self.chars.pull()? {
                Some(c) => {
                    text.push(c);
                    if c != want {
                        return Err(Error::InvalidLiteral(text));
                    }
                }
                None => return Err(Error::InvalidLiteral(text)),
            }
        }

        Ok(Token::new(kind, text))
    }
}

impl<S: Pull<Item = char>> Pull for Lexer<S> {
    type Item = Token;

    fn pull(&mut self) -> Result<Option<Token>> {
        if let Some(end) = self.latch.replay() {
            return end;
        }
        let result = self.lex();
        self.latch.record(result)
    }
}
