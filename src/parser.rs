//! Recursive descent parser.
//!
//! Consumes a token sequence and builds [`Value`] trees. Objects and nested
//! arrays are built eagerly. The top-level array of [`parse_stream`] is
//! exposed as a [`ValueStream`] that parses one element per pull, so the rest
//! of a large array is neither parsed nor held until it is asked for.
//!
//! One token of lookahead is provided by a push-back buffer; the parser never
//! backtracks further than that.
//!
//! # Validation
//!
//! - The document must be a single object or array, with nothing after it
//! - Duplicate object keys are rejected, naming the key
//! - Trailing commas are rejected
//! - Nesting depth, member count and array length are bounded by [`Limits`]

use std::io::Read;

use crate::error::{Error, Result};
use crate::lexer::{describe, Lexer, Token, TokenKind};
use crate::limits::Limits;
use crate::number::Number;
use crate::seq::{Pull, PushBack, Terminal};
use crate::source::{StrSource, Utf8Reader};
use crate::value::{Map, Value};

/// Where an array is in its `[ value (, value)* ]` state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    /// `[` consumed; expecting a value or `]`.
    First,
    /// An element was parsed; expecting `,` or `]`.
    Subsequent,
    /// `]` consumed.
    Done,
}

#[derive(Debug, Clone, Copy)]
struct ArrayCursor {
    state: ArrayState,
    index: u64,
}

impl ArrayCursor {
    fn new() -> Self {
        Self {
            state: ArrayState::First,
            index: 0,
        }
    }
}

/// Parser over a token sequence.
pub struct Parser<S: Pull<Item = Token>> {
    tokens: PushBack<S>,
    limits: Limits,
    depth: u64,
}

impl<S: Pull<Item = Token>> Parser<S> {
    /// Create a parser reading from `tokens`.
    pub fn new(tokens: S, limits: Limits) -> Self {
        Self {
            tokens: PushBack::new(tokens),
            limits,
            depth: 0,
        }
    }

    /// Parse the whole document eagerly.
    pub fn parse_document(mut self) -> Result<Value> {
        tracing::debug!("parsing document");
        let value = match self.tokens.pull()? {
            None => return Err(Error::EmptyDocument),
            Some(token) => match token.kind() {
                TokenKind::OpenBrace => self.parse_object()?,
                TokenKind::OpenBracket => self.parse_array()?,
                _ => {
                    return Err(Error::NotContainer {
                        found: token.to_string(),
                    })
                }
            },
        };
        self.expect_end()?;
        tracing::debug!(kind = value.type_name(), "document parsed");
        Ok(value)
    }

    /// Start a lazy parse of the document.
    ///
    /// The leading token is checked immediately. An object is parsed in full
    /// and becomes the stream's only element; an array yields its elements
    /// one pull at a time.
    pub fn parse_stream(mut self) -> Result<ValueStream<S>> {
        let mode = match self.tokens.pull()? {
            None => return Err(Error::EmptyDocument),
            Some(token) => match token.kind() {
                TokenKind::OpenBrace => StreamMode::Single(Some(self.parse_object()?)),
                TokenKind::OpenBracket => {
                    self.enter()?;
                    StreamMode::Elements(ArrayCursor::new())
                }
                _ => {
                    return Err(Error::NotContainer {
                        found: token.to_string(),
                    })
                }
            },
        };
        tracing::debug!(
            lazy = matches!(mode, StreamMode::Elements(_)),
            "value stream opened"
        );
        Ok(ValueStream {
            parser: self,
            mode,
            latch: Terminal::new(),
        })
    }

    /// Parse one value, or push the token back if it cannot start one.
    fn parse_value(&mut self) -> Result<Option<Value>> {
        let Some(token) = self.tokens.pull()? else {
            return Ok(None);
        };

        let value = match token.kind() {
            TokenKind::OpenBrace => self.parse_object()?,
            TokenKind::OpenBracket => self.parse_array()?,
            TokenKind::String => Value::String(token.into_text()),
            TokenKind::Number => Value::Number(Number::from_literal(
                token.text(),
                self.limits.max_exponent,
            )?),
            TokenKind::Boolean => Value::Boolean(token.text() == "true"),
            TokenKind::Null => Value::Null,
            TokenKind::CloseBrace
            | TokenKind::CloseBracket
            | TokenKind::Comma
            | TokenKind::Colon => {
                self.tokens.push_back(token);
                return Ok(None);
            }
        };
        Ok(Some(value))
    }

    /// Parse a value that the grammar requires at this point.
    fn require_value(&mut self, context: impl FnOnce() -> String) -> Result<Value> {
        if let Some(value) = self.parse_value()? {
            return Ok(value);
        }
        Err(match self.tokens.peek()? {
            None => Error::UnexpectedEnd {
                expected: format!("value for {}", context()),
            },
            Some(token) => Error::ExpectedValue {
                context: context(),
                found: token.to_string(),
            },
        })
    }

    /// Parse an object; the opening brace is already consumed.
    fn parse_object(&mut self) -> Result<Value> {
        self.enter()?;

        let mut map = Map::new();
        let mut after = "'{'".to_string();
        let mut expected = "string key or '}'";

        loop {
            let key = match self.tokens.pull()? {
                Some(token) if token.kind() == TokenKind::String => token.into_text(),
                Some(token) if token.kind() == TokenKind::CloseBrace && map.is_empty() => break,
                Some(token) => {
                    return Err(Error::ExpectedKey {
                        expected,
                        after,
                        found: token.to_string(),
                    })
                }
                None => {
                    return Err(Error::UnexpectedEnd {
                        expected: format!("{expected} after {after}"),
                    })
                }
            };

            if map.contains_key(&key) {
                return Err(Error::DuplicateKey(key));
            }
            let fields = map.len() as u64 + 1;
            if fields > self.limits.max_object_fields {
                return Err(Error::TooManyFields(fields, self.limits.max_object_fields));
            }

            match self.tokens.pull()? {
                Some(token) if token.kind() == TokenKind::Colon => {}
                Some(token) => {
                    return Err(Error::ExpectedColon {
                        key,
                        found: token.to_string(),
                    })
                }
                None => {
                    return Err(Error::UnexpectedEnd {
                        expected: format!("':' after key {key:?}"),
                    })
                }
            }

            let value = self.require_value(|| format!("key {key:?}"))?;

            let close = match self.tokens.pull()? {
                Some(token) if token.kind() == TokenKind::Comma => false,
                Some(token) if token.kind() == TokenKind::CloseBrace => true,
                Some(token) => {
                    return Err(Error::ExpectedCommaOrBrace {
                        key,
                        found: token.to_string(),
                    })
                }
                None => {
                    return Err(Error::UnexpectedEnd {
                        expected: format!("',' or '}}' after value of key {key:?}"),
                    })
                }
            };

            after = format!("key {key:?}");
            expected = "string key";
            map.insert(key, value);
            if close {
                break;
            }
        }

        self.leave();
        Ok(Value::Object(map))
    }

    /// Parse a nested array eagerly; the opening bracket is already consumed.
    fn parse_array(&mut self) -> Result<Value> {
        self.enter()?;

        let mut cursor = ArrayCursor::new();
        let mut items = Vec::new();
        while let Some(item) = self.next_element(&mut cursor)? {
            let len = items.len() as u64 + 1;
            if len > self.limits.max_array_length {
                return Err(Error::ArrayTooLong(len, self.limits.max_array_length));
            }
            items.push(item);
        }

        self.leave();
        Ok(Value::Array(items))
    }

    /// Advance an array by one element, `None` once `]` is consumed.
    fn next_element(&mut self, cursor: &mut ArrayCursor) -> Result<Option<Value>> {
        match cursor.state {
            ArrayState::Done => return Ok(None),
            ArrayState::First => {
                if matches!(self.tokens.peek()?, Some(t) if t.kind() == TokenKind::CloseBracket) {
                    self.tokens.pull()?;
                    cursor.state = ArrayState::Done;
                    return Ok(None);
                }
            }
            ArrayState::Subsequent => {
                let last = cursor.index - 1;
                match self.tokens.pull()? {
                    Some(token) if token.kind() == TokenKind::Comma => {}
                    Some(token) if token.kind() == TokenKind::CloseBracket => {
                        cursor.state = ArrayState::Done;
                        return Ok(None);
                    }
                    Some(token) => {
                        return Err(Error::ExpectedCommaOrBracket {
                            index: last,
                            found: token.to_string(),
                        })
                    }
                    None => {
                        return Err(Error::UnexpectedEnd {
                            expected: format!("',' or ']' after array element {last}"),
                        })
                    }
                }
            }
        }

        let index = cursor.index;
        let value = self.require_value(|| format!("array element {index}"))?;
        cursor.index += 1;
        cursor.state = ArrayState::Subsequent;
        Ok(Some(value))
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.limits.max_nesting_depth {
            return Err(Error::NestingTooDeep(
                self.depth,
                self.limits.max_nesting_depth,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Fail unless the token sequence is exhausted.
    fn expect_end(&mut self) -> Result<()> {
        match self.tokens.pull()? {
            None => Ok(()),
            Some(token) => Err(Error::TrailingContent {
                found: describe(Some(&token)),
            }),
        }
    }
}

enum StreamMode {
    /// A fully parsed object, handed out once.
    Single(Option<Value>),
    /// A top-level array parsed on demand.
    Elements(ArrayCursor),
}

/// Lazily parsed top-level values.
///
/// As a [`Pull`] sequence, end of input and errors are sticky. As an
/// [`Iterator`], an error is yielded once and iteration then stops.
pub struct ValueStream<S: Pull<Item = Token>> {
    parser: Parser<S>,
    mode: StreamMode,
    latch: Terminal,
}

impl<S: Pull<Item = Token>> ValueStream<S> {
    fn advance(&mut self) -> Result<Option<Value>> {
        let next = match &mut self.mode {
            StreamMode::Single(value) => value.take(),
            StreamMode::Elements(cursor) => {
                let element = self.parser.next_element(cursor)?;
                if element.is_some() {
                    tracing::trace!(index = cursor.index - 1, "array element parsed");
                }
                element
            }
        };

        if next.is_none() {
            self.parser.expect_end()?;
            tracing::debug!("value stream finished");
        }
        Ok(next)
    }
}

impl<S: Pull<Item = Token>> Pull for ValueStream<S> {
    type Item = Value;

    fn pull(&mut self) -> Result<Option<Value>> {
        if let Some(end) = self.latch.replay() {
            return end;
        }
        let result = self.advance();
        self.latch.record(result)
    }
}

impl<S: Pull<Item = Token>> Iterator for ValueStream<S> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Result<Value>> {
        if self.latch.is_set() {
            return None;
        }
        self.pull().transpose()
    }
}

/// Parse a whole document from a token sequence.
pub fn parse_document<S: Pull<Item = Token>>(tokens: S, limits: Limits) -> Result<Value> {
    Parser::new(tokens, limits).parse_document()
}

/// Open a lazy value stream over a token sequence.
pub fn parse_stream<S: Pull<Item = Token>>(tokens: S, limits: Limits) -> Result<ValueStream<S>> {
    Parser::new(tokens, limits).parse_stream()
}

/// Parse a whole document from text.
pub fn parse_str(text: &str, limits: Limits) -> Result<Value> {
    parse_document(Lexer::new(StrSource::new(text), limits), limits)
}

/// Parse a whole document from a UTF-8 byte stream.
pub fn parse_reader<R: Read>(reader: R, limits: Limits) -> Result<Value> {
    parse_document(Lexer::new(Utf8Reader::new(reader), limits), limits)
}

/// Open a lazy value stream over text.
pub fn stream_str(text: &str, limits: Limits) -> Result<ValueStream<Lexer<StrSource<'_>>>> {
    parse_stream(Lexer::new(StrSource::new(text), limits), limits)
}

/// Open a lazy value stream over a UTF-8 byte stream.
pub fn stream_reader<R: Read>(
    reader: R,
    limits: Limits,
) -> Result<ValueStream<Lexer<Utf8Reader<R>>>> {
    parse_stream(Lexer::new(Utf8Reader::new(reader), limits), limits)
}
