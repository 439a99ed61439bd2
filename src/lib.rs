//! exact-json - a streaming JSON parser with exact numbers.
//!
//! Turns Unicode text into a strongly typed [`Value`] tree. Numbers are kept
//! as arbitrary-precision rationals, so no digit of a literal is ever lost to
//! floating-point rounding. Large top-level arrays can be consumed one
//! element at a time through [`parse_stream`] without holding the whole
//! array in memory.
//!
//! # Architecture
//!
//! - [`source`] - code points from in-memory text or a UTF-8 byte stream
//! - [`lexer`] - code points to [`Token`]s
//! - [`parser`] - tokens to [`Value`]s, eagerly or as a [`ValueStream`]
//! - [`value`] - the value model, accessors and the `visit` conversion
//! - [`number`] - the exact-rational [`Number`]
//! - [`ser`] - building a [`Value`] from any `serde::Serialize` type
//! - [`seq`] - the pull-sequence contract tying the stages together
//! - [`limits`] - resource bounds for untrusted input
//! - [`error`] - error codes and kinds
//!
//! # Example
//!
//! ```
//! use exact_json::{parse_str, Limits};
//!
//! let doc = parse_str(r#"{"total": 123456789012345678901234567890.5}"#, Limits::default())?;
//! let total = doc.get("total").ok_or(exact_json::Error::EmptyDocument)?;
//! assert_eq!(total.as_displayable_text()?, "123456789012345678901234567890.5");
//! # Ok::<(), exact_json::Error>(())
//! ```

// Library code reports failures through `Result`, never by panicking.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod error;
pub mod lexer;
pub mod limits;
pub mod number;
pub mod parser;
pub mod ser;
pub mod seq;
pub mod source;
pub mod value;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use limits::Limits;
pub use number::Number;
pub use parser::{
    parse_document, parse_reader, parse_str, parse_stream, stream_reader, stream_str, Parser,
    ValueStream,
};
pub use ser::to_value;
pub use seq::{Pull, PushBack};
pub use source::{StrSource, Utf8Reader};
pub use value::{Map, Native, Value};
