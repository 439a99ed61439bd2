//! Error handling for the parser.
//!
//! Every failure the crate can report is a variant of [`Error`]. Each variant
//! carries a stable numeric code and name, and belongs to one [`ErrorKind`]:
//!
//! - 1xx `Lexical`: malformed input text, reported with the offending literal
//! - 2xx `Structural`: grammar violations, reported with key/position context
//! - 3xx `Source`: the underlying code-point source failed
//! - 4xx `Limit`: a configured [`Limits`](crate::Limits) bound was exceeded
//! - 5xx `Value`: misuse of the value model (wrong variant, unsupported type)
//!
//! Errors are `Clone` so that exhausted sequences can replay the failure that
//! ended them on every later pull.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input text.
    Lexical,
    /// Grammar violation in a well-formed token sequence.
    Structural,
    /// Failure of the underlying byte or code-point source.
    Source,
    /// A configured parse limit was exceeded.
    Limit,
    /// Misuse of the value model.
    Value,
}

/// All errors produced by lexing, parsing and value access.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A character that cannot start any token (code 100)
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    /// Malformed number literal; carries the text consumed so far (code 101)
    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    /// Neither `true`, `false` nor `null` (code 102)
    #[error("invalid boolean/null literal {0:?}")]
    InvalidLiteral(String),

    /// Raw control character (below U+0020) inside a string (code 103)
    #[error("control character U+{0:04X} in string")]
    ControlCharacter(u32),

    /// End of input before the closing quote; carries the decoded prefix (code 104)
    #[error("incomplete string {0:?}")]
    IncompleteString(String),

    /// Unknown escape or non-hex digit inside `\u` (code 105)
    #[error("illegal escape {0:?}")]
    IllegalEscape(String),

    /// End of input in the middle of an escape (code 106)
    #[error("incomplete escape {0:?}")]
    IncompleteEscape(String),

    /// Low surrogate escape without a preceding high surrogate (code 107)
    #[error("unpaired low surrogate escape {0:?}")]
    UnpairedLowSurrogate(String),

    /// High surrogate escape not followed by a `\u` escape (code 108)
    #[error("high surrogate escape {0:?} must be followed by a low surrogate escape")]
    UnpairedHighSurrogate(String),

    /// High surrogate escape followed by a `\u` escape that is not a low surrogate (code 109)
    #[error("high surrogate escape followed by non-surrogate escape {0:?}")]
    InvalidSurrogatePair(String),

    /// Input ended before any token was read (code 200)
    #[error("empty document")]
    EmptyDocument,

    /// The document does not start with `{` or `[` (code 201)
    #[error("object or array required, found {found}")]
    NotContainer {
        /// Description of the leading token.
        found: String,
    },

    /// Object key appeared twice (code 202)
    #[error("duplicate key {0:?}")]
    DuplicateKey(String),

    /// Expected a string key or `}` (code 203)
    #[error("expected {expected} in object after {after}, found {found}")]
    ExpectedKey {
        /// What the parser accepted at this point.
        expected: &'static str,
        /// Location: the opening brace or the previous key.
        after: String,
        /// Description of the token actually seen.
        found: String,
    },

    /// Expected `:` after a key (code 204)
    #[error("expected ':' after key {key:?}, found {found}")]
    ExpectedColon {
        /// The key being parsed.
        key: String,
        /// Description of the token actually seen.
        found: String,
    },

    /// Expected the start of a value (code 205)
    #[error("expected value for {context}, found {found}")]
    ExpectedValue {
        /// Which key or array position needed the value.
        context: String,
        /// Description of the token actually seen.
        found: String,
    },

    /// Expected `,` or `}` after an object member (code 206)
    #[error("expected ',' or '}}' after value of key {key:?}, found {found}")]
    ExpectedCommaOrBrace {
        /// The key whose value was just parsed.
        key: String,
        /// Description of the token actually seen.
        found: String,
    },

    /// Expected `,` or `]` after an array element (code 207)
    #[error("expected ',' or ']' after array element {index}, found {found}")]
    ExpectedCommaOrBracket {
        /// Zero-based index of the element just parsed.
        index: u64,
        /// Description of the token actually seen.
        found: String,
    },

    /// Tokens ran out inside a container (code 208)
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd {
        /// What the parser was waiting for.
        expected: String,
    },

    /// Tokens after the top-level value (code 209)
    #[error("trailing content after document: {found}")]
    TrailingContent {
        /// Description of the first extra token.
        found: String,
    },

    /// I/O failure of the byte source (code 300)
    #[error("I/O error: {0}")]
    Io(Arc<io::Error>),

    /// Malformed UTF-8 in the byte source (code 301)
    #[error("invalid UTF-8 sequence {0:02X?}")]
    InvalidUtf8(Vec<u8>),

    /// Containers nested deeper than allowed (code 400)
    #[error("nesting depth {0} exceeds limit {1}")]
    NestingTooDeep(u64, u64),

    /// String longer than allowed, in bytes (code 401)
    #[error("string length {0} exceeds limit {1}")]
    StringTooLong(u64, u64),

    /// Object with more members than allowed (code 402)
    #[error("object field count {0} exceeds limit {1}")]
    TooManyFields(u64, u64),

    /// Materialized array longer than allowed (code 403)
    #[error("array length {0} exceeds limit {1}")]
    ArrayTooLong(u64, u64),

    /// Number literal whose decimal scale is out of range (code 404)
    #[error("number {0:?} has a decimal exponent beyond limit {1}")]
    ExponentTooLarge(String, u64),

    /// Accessor used on the wrong variant (code 500)
    #[error("expected {expected}, found {found}")]
    WrongVariant {
        /// Variant the accessor requires.
        expected: &'static str,
        /// Variant the value actually is.
        found: &'static str,
    },

    /// Construction from a type the value model cannot represent (code 501)
    #[error("cannot build a value from {0}")]
    Unsupported(String),

    /// Number does not fit the requested primitive type (code 502)
    #[error("number {0} is out of range for {1}")]
    NumberOutOfRange(String, &'static str),

    /// Free-form failure raised by a `Serialize` implementation (code 503)
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Get the numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidCharacter(_) => 100,
            Error::InvalidNumber(_) => 101,
            Error::InvalidLiteral(_) => 102,
            Error::ControlCharacter(_) => 103,
            Error::IncompleteString(_) => 104,
            Error::IllegalEscape(_) => 105,
            Error::IncompleteEscape(_) => 106,
            Error::UnpairedLowSurrogate(_) => 107,
            Error::UnpairedHighSurrogate(_) => 108,
            Error::InvalidSurrogatePair(_) => 109,
            Error::EmptyDocument => 200,
            Error::NotContainer { .. } => 201,
            Error::DuplicateKey(_) => 202,
            Error::ExpectedKey { .. } => 203,
            Error::ExpectedColon { .. } => 204,
            Error::ExpectedValue { .. } => 205,
            Error::ExpectedCommaOrBrace { .. } => 206,
            Error::ExpectedCommaOrBracket { .. } => 207,
            Error::UnexpectedEnd { .. } => 208,
            Error::TrailingContent { .. } => 209,
            Error::Io(_) => 300,
            Error::InvalidUtf8(_) => 301,
            Error::NestingTooDeep(..) => 400,
            Error::StringTooLong(..) => 401,
            Error::TooManyFields(..) => 402,
            Error::ArrayTooLong(..) => 403,
            Error::ExponentTooLarge(..) => 404,
            Error::WrongVariant { .. } => 500,
            Error::Unsupported(_) => 501,
            Error::NumberOutOfRange(..) => 502,
            Error::Custom(_) => 503,
        }
    }

    /// Get the error name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Error::InvalidCharacter(_) => "InvalidCharacter",
            Error::InvalidNumber(_) => "InvalidNumber",
            Error::InvalidLiteral(_) => "InvalidLiteral",
            Error::ControlCharacter(_) => "ControlCharacter",
            Error::IncompleteString(_) => "IncompleteString",
            Error::IllegalEscape(_) => "IllegalEscape",
            Error::IncompleteEscape(_) => "IncompleteEscape",
            Error::UnpairedLowSurrogate(_) => "UnpairedLowSurrogate",
            Error::UnpairedHighSurrogate(_) => "UnpairedHighSurrogate",
            Error::InvalidSurrogatePair(_) => "InvalidSurrogatePair",
            Error::EmptyDocument => "EmptyDocument",
            Error::NotContainer { .. } => "NotContainer",
            Error::DuplicateKey(_) => "DuplicateKey",
            Error::ExpectedKey { .. } => "ExpectedKey",
            Error::ExpectedColon { .. } => "ExpectedColon",
            Error::ExpectedValue { .. } => "ExpectedValue",
            Error::ExpectedCommaOrBrace { .. } => "ExpectedCommaOrBrace",
            Error::ExpectedCommaOrBracket { .. } => "ExpectedCommaOrBracket",
            Error::UnexpectedEnd { .. } => "UnexpectedEnd",
            Error::TrailingContent { .. } => "TrailingContent",
            Error::Io(_) => "Io",
            Error::InvalidUtf8(_) => "InvalidUtf8",
            Error::NestingTooDeep(..) => "NestingTooDeep",
            Error::StringTooLong(..) => "StringTooLong",
            Error::TooManyFields(..) => "TooManyFields",
            Error::ArrayTooLong(..) => "ArrayTooLong",
            Error::ExponentTooLarge(..) => "ExponentTooLarge",
            Error::WrongVariant { .. } => "WrongVariant",
            Error::Unsupported(_) => "Unsupported",
            Error::NumberOutOfRange(..) => "NumberOutOfRange",
            Error::Custom(_) => "Custom",
        }
    }

    /// Classify the error into the lexical/structural/source taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self.code() / 100 {
            1 => ErrorKind::Lexical,
            2 => ErrorKind::Structural,
            3 => ErrorKind::Source,
            4 => ErrorKind::Limit,
            _ => ErrorKind::Value,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, Error>;
