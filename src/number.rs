//! Exact numbers.
//!
//! A [`Number`] is an arbitrary-precision rational built straight from the
//! literal's digits. No floating-point intermediate is ever involved, so a
//! 30-digit literal keeps all 30 digits. Rounding can only happen in the
//! explicit conversion hooks (`to_f64` and friends).

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{Error, Result};
use crate::limits::DEFAULT_MAX_EXPONENT;

/// Fraction digits shown for values without a finite decimal expansion.
pub const DISPLAY_FRACTION_DIGITS: usize = 20;

/// An exact rational number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Number(BigRational);

impl Number {
    /// Parse a literal of the form `-?digits(.digits)?([eE][+-]?digits)?`.
    ///
    /// `max_exponent` bounds the absolute decimal scale of the result.
    pub fn from_literal(text: &str, max_exponent: u64) -> Result<Self> {
        let invalid = || Error::InvalidNumber(text.to_string());
        let too_large = || Error::ExponentTooLarge(text.to_string(), max_exponent);

        let (negative, rest) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (mantissa, exponent) = match rest.find(|c: char| c == 'e' || c == 'E') {
            Some(i) => (&rest[..i], Some(&rest[i + 1..])),
            None => (rest, None),
        };
        let (int_part, frac_part) = match mantissa.split_once('.') {
            Some((int_part, frac_part)) if !frac_part.is_empty() => (int_part, frac_part),
            Some(_) => return Err(invalid()),
            None => (mantissa, ""),
        };
        if !is_digits(int_part) || !(frac_part.is_empty() || is_digits(frac_part)) {
            return Err(invalid());
        }

        let exponent: i128 = match exponent {
            None => 0,
            Some(e) => {
                let (sign, digits) = match e.as_bytes().first() {
                    Some(b'-') => (-1, &e[1..]),
                    Some(b'+') => (1, &e[1..]),
                    _ => (1, e),
                };
                if !is_digits(digits) {
                    return Err(invalid());
                }
                let digits = digits.trim_start_matches('0');
                if digits.len() > 30 {
                    return Err(too_large());
                }
                let magnitude: i128 = if digits.is_empty() {
                    0
                } else {
                    digits.parse().map_err(|_| invalid())?
                };
                sign * magnitude
            }
        };

        let mut coefficient: BigInt = format!("{int_part}{frac_part}")
            .parse()
            .map_err(|_| invalid())?;
        if coefficient.is_zero() {
            return Ok(Self(BigRational::zero()));
        }
        if negative {
            coefficient = -coefficient;
        }

        let scale = exponent - frac_part.len() as i128;
        if scale.unsigned_abs() > u128::from(max_exponent) {
            return Err(too_large());
        }
        let power = pow10(u32::try_from(scale.unsigned_abs()).map_err(|_| too_large())?);

        let ratio = if scale >= 0 {
            BigRational::from_integer(coefficient * power)
        } else {
            BigRational::new(coefficient, power)
        };
        Ok(Self(ratio))
    }

    /// Borrow the underlying rational.
    pub fn as_ratio(&self) -> &BigRational {
        &self.0
    }

    /// Take the underlying rational.
    pub fn into_ratio(self) -> BigRational {
        self.0
    }

    /// Whether the value has no fractional part.
    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    /// Convert to `i64`; fails on fractions and out-of-range values.
    pub fn to_i64(&self) -> Result<i64> {
        self.integer()
            .and_then(|n| n.to_i64())
            .ok_or_else(|| Error::NumberOutOfRange(self.to_string(), "i64"))
    }

    /// Convert to `u64`; fails on fractions and out-of-range values.
    pub fn to_u64(&self) -> Result<u64> {
        self.integer()
            .and_then(|n| n.to_u64())
            .ok_or_else(|| Error::NumberOutOfRange(self.to_string(), "u64"))
    }

    /// Nearest `f64`; fails only when the value overflows to infinity.
    pub fn to_f64(&self) -> Result<f64> {
        self.0
            .to_f64()
            .filter(|f| f.is_finite())
            .ok_or_else(|| Error::NumberOutOfRange(self.to_string(), "f64"))
    }

    fn integer(&self) -> Option<&BigInt> {
        self.0.is_integer().then(|| self.0.numer())
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn pow10(exponent: u32) -> BigInt {
    BigInt::from(10u32).pow(exponent)
}

/// Number of fraction digits in the decimal expansion of `1/denom`, if finite.
fn terminating_digits(denom: &BigInt) -> Option<u32> {
    let mut rest = denom.clone();
    let mut twos = 0;
    while (&rest % 2u32).is_zero() {
        rest /= 2u32;
        twos += 1;
    }
    let mut fives = 0;
    while (&rest % 5u32).is_zero() {
        rest /= 5u32;
        fives += 1;
    }
    rest.is_one().then_some(twos.max(fives))
}

impl fmt::Display for Number {
    /// Integer form when there is no fractional part, decimal form otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            return write!(f, "{}", self.0.numer());
        }

        let (digits, exact) = match terminating_digits(self.0.denom()) {
            Some(digits) => (digits as usize, true),
            None => (DISPLAY_FRACTION_DIGITS, false),
        };
        // Truncates toward zero when the expansion does not terminate
        let scaled = self.0.numer().abs() * pow10(digits as u32) / self.0.denom();
        let mut text = scaled.to_string();
        if text.len() <= digits {
            text.insert_str(0, &"0".repeat(digits + 1 - text.len()));
        }
        let (int_part, frac_part) = text.split_at(text.len() - digits);
        let frac_part = if exact {
            frac_part
        } else {
            frac_part.trim_end_matches('0')
        };

        let shown_zero = int_part.bytes().chain(frac_part.bytes()).all(|b| b == b'0');
        if self.0.is_negative() && !shown_zero {
            f.write_str("-")?;
        }
        if frac_part.is_empty() {
            return f.write_str(int_part);
        }
        write!(f, "{int_part}.{frac_part}")
    }
}

impl FromStr for Number {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_literal(s, DEFAULT_MAX_EXPONENT)
    }
}

macro_rules! number_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Number {
                fn from(v: $t) -> Self {
                    Self(BigRational::from_integer(BigInt::from(v)))
                }
            }
        )*
    };
}

number_from_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Number {
    fn from(v: BigInt) -> Self {
        Self(BigRational::from_integer(v))
    }
}

impl From<BigRational> for Number {
    fn from(v: BigRational) -> Self {
        Self(v)
    }
}

impl TryFrom<f64> for Number {
    type Error = Error;

    /// Exact binary expansion of the float; NaN and infinities are rejected.
    fn try_from(v: f64) -> Result<Self> {
        BigRational::from_float(v)
            .map(Self)
            .ok_or_else(|| Error::Unsupported(format!("non-finite f64 {v}")))
    }
}

impl TryFrom<f32> for Number {
    type Error = Error;

    fn try_from(v: f32) -> Result<Self> {
        BigRational::from_float(v)
            .map(Self)
            .ok_or_else(|| Error::Unsupported(format!("non-finite f32 {v}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(text: &str) -> Number {
        text.parse().unwrap()
    }

    fn ratio(numer: i64, denom: i64) -> Number {
        Number::from(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    #[test]
    fn test_integers() {
        assert_eq!(num("42"), Number::from(42));
        assert_eq!(num("-123"), Number::from(-123));
        assert_eq!(num("-0"), Number::from(0));
        assert_eq!(num("007"), Number::from(7));
    }

    #[test]
    fn test_fractions_are_exact() {
        assert_eq!(num("0.1"), ratio(1, 10));
        assert_eq!(num("-2.50"), ratio(-5, 2));
        assert_eq!(num("1.25e2"), Number::from(125));
        assert_eq!(num("7E-3"), ratio(7, 1000));
        assert_eq!(num("12e+1"), Number::from(120));
    }

    #[test]
    fn test_large_literal_keeps_every_digit() {
        let n = num("123456789012345678901234567890.5");
        let expected: BigInt = "1234567890123456789012345678905".parse().unwrap();
        assert_eq!(
            n.as_ratio(),
            &BigRational::new(expected, BigInt::from(10))
        );
        assert_eq!(n.to_string(), "123456789012345678901234567890.5");
    }

    #[test]
    fn test_thirty_digit_integer() {
        let n = num("123456789012345678901234567890");
        assert!(n.is_integer());
        assert_eq!(n.to_string(), "123456789012345678901234567890");
    }

    #[test]
    fn test_rejects_malformed() {
        for text in ["", "-", "1.", ".5", "1e", "1e+", "1.2.3", "0x10", "1 "] {
            assert!(text.parse::<Number>().is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn test_exponent_limit() {
        assert!(Number::from_literal("1e10", 10).is_ok());
        assert!(matches!(
            Number::from_literal("1e11", 10),
            Err(Error::ExponentTooLarge(_, 10))
        ));
        assert!(matches!(
            Number::from_literal("1.5e-10", 10),
            Err(Error::ExponentTooLarge(..))
        ));
        assert!(num("0e999999999999").as_ratio().is_zero());
        assert!("1e9999999999999999999999999999999999".parse::<Number>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(num("1.50").to_string(), "1.5");
        assert_eq!(num("-0.05").to_string(), "-0.05");
        assert_eq!(num("2.5e1").to_string(), "25");
        assert_eq!(num("1e-3").to_string(), "0.001");
        assert_eq!(ratio(1, 3).to_string(), "0.33333333333333333333");
        assert_eq!(ratio(-2, 3).to_string(), "-0.66666666666666666666");
        assert_eq!(ratio(7, 8).to_string(), "0.875");
    }

    #[test]
    fn test_display_negative_truncated_to_integer() {
        // -(1 + 1/(3*10^25)): every shown fraction digit is zero
        let denom = BigInt::from(3) * pow10(25);
        let n = Number::from(BigRational::new(-(denom.clone() + 1u32), denom.clone()));
        assert_eq!(n.to_string(), "-1");

        // Too small to show any digit
        let tiny = Number::from(BigRational::new(BigInt::from(-1), denom));
        assert_eq!(tiny.to_string(), "0");
    }

    #[test]
    fn test_conversions() {
        assert_eq!(num("42").to_i64().unwrap(), 42);
        assert_eq!(num("-1").to_u64().unwrap_err().code(), 502);
        assert!(num("1.5").to_i64().is_err());
        assert!(num("99999999999999999999").to_i64().is_err());
        assert_eq!(num("0.5").to_f64().unwrap(), 0.5);
        assert_eq!(num("-2.25e2").to_f64().unwrap(), -225.0);
    }

    #[test]
    fn test_from_float_is_exact() {
        let n = Number::try_from(0.1f64).unwrap();
        assert_ne!(n, ratio(1, 10));
        assert_eq!(n.to_f64().unwrap(), 0.1);
        assert_eq!(Number::try_from(0.5f32).unwrap(), ratio(1, 2));
        assert!(Number::try_from(f64::NAN).is_err());
        assert!(Number::try_from(f64::INFINITY).is_err());
    }
}
