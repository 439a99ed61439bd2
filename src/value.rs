//! Parsed document values.
//!
//! [`Value`] is a closed sum over the six JSON node kinds. Values are
//! immutable once built and own their children, so a document is a plain
//! tree. Accessors fail with [`Error::WrongVariant`] instead of coercing.
//!
//! [`Value::visit`] walks the tree and hands every leaf to caller-supplied
//! converters, producing a [`Native`] tree. This keeps parsing separate from
//! deciding how numbers (or strings, or booleans) should be materialized.

use std::collections::BTreeMap;
use std::convert::Infallible;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::error::{Error, Result};
use crate::number::Number;

/// Object members, keyed by their decoded name.
pub type Map = BTreeMap<String, Value>;

/// A JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    /// Object with unique keys
    Object(Map),
    /// Ordered sequence of values
    Array(Vec<Value>),
    /// Decoded string
    String(String),
    /// Exact rational number
    Number(Number),
    /// `true` or `false`
    Boolean(bool),
    /// `null`
    #[default]
    Null,
}

/// Result of [`Value::visit`]: the same tree shape with converted leaves.
#[derive(Debug, Clone, PartialEq)]
pub enum Native<S, N, B> {
    /// Converted object
    Map(BTreeMap<String, Native<S, N, B>>),
    /// Converted array
    Seq(Vec<Native<S, N, B>>),
    /// Converted string leaf
    String(S),
    /// Converted number leaf
    Number(N),
    /// Converted boolean leaf
    Boolean(B),
    /// `null`
    Null,
}

impl Value {
    /// Shared `true`.
    pub const TRUE: Value = Value::Boolean(true);
    /// Shared `false`.
    pub const FALSE: Value = Value::Boolean(false);
    /// Shared `null`.
    pub const NULL: Value = Value::Null;

    /// Build a number value from its literal text, e.g. `"-1.5e3"`.
    pub fn number_from_text(text: &str) -> Result<Value> {
        Ok(Value::Number(text.parse()?))
    }

    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_boolean(&self) -> bool {
        matches!(self, Value::Boolean(_))
    }

    /// Returns true if this is a number value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Returns the type name as a string for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn wrong(&self, expected: &'static str) -> Error {
        Error::WrongVariant {
            expected,
            found: self.type_name(),
        }
    }

    /// The object's members.
    pub fn as_object(&self) -> Result<&Map> {
        match self {
            Value::Object(map) => Ok(map),
            _ => Err(self.wrong("object")),
        }
    }

    /// The array's elements.
    pub fn as_array(&self) -> Result<&[Value]> {
        match self {
            Value::Array(items) => Ok(items),
            _ => Err(self.wrong("array")),
        }
    }

    /// The decoded string.
    pub fn as_string(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(self.wrong("string")),
        }
    }

    /// The exact number.
    pub fn as_number(&self) -> Result<&Number> {
        match self {
            Value::Number(n) => Ok(n),
            _ => Err(self.wrong("number")),
        }
    }

    /// The boolean.
    pub fn as_boolean(&self) -> Result<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            _ => Err(self.wrong("boolean")),
        }
    }

    /// Text form of a string, number or boolean.
    ///
    /// Numbers print in integer form when they have no fractional part and
    /// in decimal form otherwise.
    pub fn as_displayable_text(&self) -> Result<String> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Boolean(b) => Ok(b.to_string()),
            _ => Err(self.wrong("string, number or boolean")),
        }
    }

    /// Take the object's members.
    pub fn into_object(self) -> Result<Map> {
        match self {
            Value::Object(map) => Ok(map),
            other => Err(other.wrong("object")),
        }
    }

    /// Take the array's elements.
    pub fn into_array(self) -> Result<Vec<Value>> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(other.wrong("array")),
        }
    }

    /// Get a value from an object by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Get a value from an array by index.
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }

    /// Convert every leaf with the given converters.
    ///
    /// Objects become [`Native::Map`], arrays [`Native::Seq`], and `null`
    /// stays [`Native::Null`].
    pub fn visit<S, N, B>(
        &self,
        string: impl Fn(&str) -> S,
        number: impl Fn(&Number) -> N,
        boolean: impl Fn(bool) -> B,
    ) -> Native<S, N, B> {
        let converted = self.try_visit(
            |s| Ok::<_, Infallible>(string(s)),
            |n| Ok(number(n)),
            |b| Ok(boolean(b)),
        );
        match converted {
            Ok(native) => native,
            Err(never) => match never {},
        }
    }

    /// Like [`visit`](Self::visit), with converters that may fail.
    ///
    /// Stops at the first failing leaf.
    pub fn try_visit<S, N, B, E>(
        &self,
        string: impl Fn(&str) -> std::result::Result<S, E>,
        number: impl Fn(&Number) -> std::result::Result<N, E>,
        boolean: impl Fn(bool) -> std::result::Result<B, E>,
    ) -> std::result::Result<Native<S, N, B>, E> {
        self.walk(&string, &number, &boolean)
    }

    fn walk<S, N, B, E, FS, FN, FB>(
        &self,
        string: &FS,
        number: &FN,
        boolean: &FB,
    ) -> std::result::Result<Native<S, N, B>, E>
    where
        FS: Fn(&str) -> std::result::Result<S, E>,
        FN: Fn(&Number) -> std::result::Result<N, E>,
        FB: Fn(bool) -> std::result::Result<B, E>,
    {
        Ok(match self {
            Value::Object(map) => Native::Map(
                map.iter()
                    .map(|(k, v)| v.walk(string, number, boolean).map(|n| (k.clone(), n)))
                    .collect::<std::result::Result<_, E>>()?,
            ),
            Value::Array(items) => Native::Seq(
                items
                    .iter()
                    .map(|v| v.walk(string, number, boolean))
                    .collect::<std::result::Result<_, E>>()?,
            ),
            Value::String(s) => Native::String(string(s)?),
            Value::Number(n) => Native::Number(number(n)?),
            Value::Boolean(b) => Native::Boolean(boolean(*b)?),
            Value::Null => Native::Null,
        })
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        if b {
            Value::TRUE
        } else {
            Value::FALSE
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::NULL, Into::into)
    }
}

macro_rules! value_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Number(Number::from(v))
                }
            }
        )*
    };
}

value_from_number!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, BigInt, BigRational
);

impl TryFrom<f64> for Value {
    type Error = Error;

    fn try_from(v: f64) -> Result<Self> {
        Number::try_from(v).map(Value::Number)
    }
}

impl TryFrom<f32> for Value {
    type Error = Error;

    fn try_from(v: f32) -> Result<Self> {
        Number::try_from(v).map(Value::Number)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Value {
    /// Later entries replace earlier ones with the same key.
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
