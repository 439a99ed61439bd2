//! Resource limits for parsing.
//!
//! Bounds how much work and memory a single document may demand, so that
//! hostile input is rejected instead of exhausting the host.
//!
//! The top-level array returned by [`parse_stream`](crate::parse_stream) is
//! exempt from `max_array_length`: its elements are handed out one at a time
//! and never held together.

/// Largest decimal scale accepted by [`Limits::standard`].
pub const DEFAULT_MAX_EXPONENT: u64 = 4096;

/// Resource limits applied by the lexer and parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth for arrays/objects; the top level is depth 1
    pub max_nesting_depth: u64,
    /// Maximum decoded string length in bytes
    pub max_string_length: u64,
    /// Maximum number of members in an object
    pub max_object_fields: u64,
    /// Maximum number of elements in an array held in memory
    pub max_array_length: u64,
    /// Maximum absolute decimal scale of a number literal
    pub max_exponent: u64,
}

impl Limits {
    /// Limits suitable for untrusted input.
    pub const fn standard() -> Self {
        Self {
            max_nesting_depth: 128,
            max_string_length: 16 * 1024 * 1024, // 16 MiB
            max_object_fields: 1_000_000,
            max_array_length: 10_000_000,
            max_exponent: DEFAULT_MAX_EXPONENT,
        }
    }

    /// No limits at all; only for trusted input.
    pub const fn unbounded() -> Self {
        Self {
            max_nesting_depth: u64::MAX,
            max_string_length: u64::MAX,
            max_object_fields: u64::MAX,
            max_array_length: u64::MAX,
            max_exponent: u64::MAX,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_standard() {
        assert_eq!(Limits::default(), Limits::standard());
        assert_eq!(Limits::default().max_exponent, DEFAULT_MAX_EXPONENT);
    }

    #[test]
    fn test_unbounded_exceeds_standard() {
        let standard = Limits::standard();
        let unbounded = Limits::unbounded();
        assert!(unbounded.max_nesting_depth > standard.max_nesting_depth);
        assert!(unbounded.max_string_length > standard.max_string_length);
        assert!(unbounded.max_exponent > standard.max_exponent);
    }
}
