//! Arbitrary-precision integer carried by amount fields.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::{BigInt, ParseBigIntError};
use num_traits::ToPrimitive;
use serde::de::{self, Visitor};
use serde::{ser, Deserialize, Deserializer, Serialize, Serializer};

use crate::{is_safe, MAX_SAFE_INTEGER};

/// An integer decoded from (or destined for) the wire.
///
/// Values whose magnitude fits in [`MAX_SAFE_INTEGER`] are held as a plain
/// `i64`; anything larger is kept as a [`BigInt`] so that it can never be
/// rounded. All constructors narrow, so two `Int`s compare equal whenever
/// they denote the same number, whichever variant they were built with.
#[derive(Debug, Clone)]
pub enum Int {
    /// Magnitude within the safe-double-integer range.
    Safe(i64),
    /// Magnitude outside the safe-double-integer range.
    Big(BigInt),
}

impl Int {
    /// Builds an `Int` from a big integer, narrowing to [`Int::Safe`] when possible.
    pub fn from_bigint(value: BigInt) -> Self {
        match value.to_i64() {
            Some(v) if is_safe(i128::from(v)) => Int::Safe(v),
            _ => Int::Big(value),
        }
    }

    /// Returns `true` if the value can travel as a bare JSON number without loss
    /// in every consumer, i.e. its magnitude is at most [`MAX_SAFE_INTEGER`].
    pub fn is_safe(&self) -> bool {
        match self {
            Int::Safe(v) => v.unsigned_abs() <= MAX_SAFE_INTEGER,
            Int::Big(b) => b.to_i128().is_some_and(is_safe),
        }
    }

    /// Returns the value as an `i64` if it is in the safe range.
    pub fn as_safe(&self) -> Option<i64> {
        match self {
            Int::Safe(v) if self.is_safe() => Some(*v),
            _ => None,
        }
    }

    /// Widens to a [`BigInt`].
    pub fn to_bigint(&self) -> BigInt {
        match self {
            Int::Safe(v) => BigInt::from(*v),
            Int::Big(b) => b.clone(),
        }
    }

    /// Converts to `u64` if the value is non-negative and fits.
    pub fn to_u64(&self) -> Option<u64> {
        match self {
            Int::Safe(v) => u64::try_from(*v).ok(),
            Int::Big(b) => b.to_u64(),
        }
    }

    /// Converts to `i64` if the value fits.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Int::Safe(v) => Some(*v),
            Int::Big(b) => b.to_i64(),
        }
    }

    /// Converts to `i128` if the value fits.
    pub fn to_i128(&self) -> Option<i128> {
        match self {
            Int::Safe(v) => Some(i128::from(*v)),
            Int::Big(b) => b.to_i128(),
        }
    }
}

impl From<i64> for Int {
    fn from(value: i64) -> Self {
        if is_safe(i128::from(value)) {
            Int::Safe(value)
        } else {
            Int::Big(BigInt::from(value))
        }
    }
}

impl From<u64> for Int {
    fn from(value: u64) -> Self {
        if value <= MAX_SAFE_INTEGER {
            Int::Safe(value as i64)
        } else {
            Int::Big(BigInt::from(value))
        }
    }
}

impl From<i128> for Int {
    fn from(value: i128) -> Self { Int::from_bigint(BigInt::from(value)) }
}

impl From<u128> for Int {
    fn from(value: u128) -> Self { Int::from_bigint(BigInt::from(value)) }
}

impl From<u32> for Int {
    fn from(value: u32) -> Self { Int::Safe(i64::from(value)) }
}

impl From<BigInt> for Int {
    fn from(value: BigInt) -> Self { Int::from_bigint(value) }
}

impl PartialEq for Int {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Int::Safe(a), Int::Safe(b)) => a == b,
            _ => self.to_bigint() == other.to_bigint(),
        }
    }
}

impl Eq for Int {}

impl PartialEq<u64> for Int {
    fn eq(&self, other: &u64) -> bool { self.to_u64() == Some(*other) }
}

impl PartialEq<i64> for Int {
    fn eq(&self, other: &i64) -> bool { self.to_i64() == Some(*other) }
}

impl Hash for Int {
    fn hash<H: Hasher>(&self, state: &mut H) { self.to_bigint().hash(state) }
}

impl PartialOrd for Int {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Int {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Int::Safe(a), Int::Safe(b)) => a.cmp(b),
            _ => self.to_bigint().cmp(&other.to_bigint()),
        }
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Int::Safe(v) => write!(f, "{}", v),
            Int::Big(b) => write!(f, "{}", b),
        }
    }
}

impl FromStr for Int {
    type Err = ParseBigIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { BigInt::from_str(s).map(Int::from_bigint) }
}

/// Emits the exact integer. Range policy for outgoing requests is enforced
/// separately by [`crate::encode`]; this impl never rounds.
impl Serialize for Int {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Int::Safe(v) => serializer.serialize_i64(*v),
            Int::Big(b) => {
                if let Some(v) = b.to_u64() {
                    serializer.serialize_u64(v)
                } else if let Some(v) = b.to_i64() {
                    serializer.serialize_i64(v)
                } else if let Some(v) = b.to_u128() {
                    serializer.serialize_u128(v)
                } else if let Some(v) = b.to_i128() {
                    serializer.serialize_i128(v)
                } else {
                    Err(ser::Error::custom(format!("integer {} exceeds the 128-bit range", b)))
                }
            }
        }
    }
}

struct IntVisitor;

impl<'de> Visitor<'de> for IntVisitor {
    type Value = Int;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str("an integer") }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Int, E> { Ok(Int::from(v)) }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Int, E> { Ok(Int::from(v)) }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<Int, E> { Ok(Int::from(v)) }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<Int, E> { Ok(Int::from(v)) }
}

impl<'de> Deserialize<'de> for Int {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IntVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_narrows() {
        assert!(matches!(Int::from(MAX_SAFE_INTEGER), Int::Safe(_)));
        assert!(matches!(Int::from(MAX_SAFE_INTEGER + 1), Int::Big(_)));
        assert!(matches!(Int::from(-(MAX_SAFE_INTEGER as i64)), Int::Safe(_)));
        assert!(matches!(Int::from(i64::MIN), Int::Big(_)));
        assert!(matches!(Int::from_bigint(BigInt::from(42)), Int::Safe(42)));
    }

    #[test]
    fn test_equality_ignores_variant() {
        let big = Int::Big(BigInt::from(7));
        assert_eq!(big, Int::Safe(7));
        assert_eq!(Int::from(u64::MAX), u64::MAX);
        assert_ne!(Int::from(u64::MAX), Int::from(u64::MAX - 1));
    }

    #[test]
    fn test_is_safe_boundaries() {
        assert!(Int::from(MAX_SAFE_INTEGER).is_safe());
        assert!(!Int::from(MAX_SAFE_INTEGER + 1).is_safe());
        assert_eq!(Int::from(MAX_SAFE_INTEGER + 1).as_safe(), None);
        assert_eq!(Int::from(12u64).as_safe(), Some(12));
    }

    #[test]
    fn test_display_and_parse() {
        let v: Int = "9223372036854770000".parse().expect("valid integer");
        assert_eq!(v.to_string(), "9223372036854770000");
        assert_eq!(v.to_u64(), Some(9_223_372_036_854_770_000));
        assert!("12ab".parse::<Int>().is_err());
    }

    #[test]
    fn test_ordering() {
        let small = Int::from(1u64);
        let big = Int::from(u64::MAX);
        assert!(small < big);
        assert_eq!(big.cmp(&Int::Big(BigInt::from(u64::MAX))), Ordering::Equal);
    }

    #[test]
    fn test_serialize_exact() {
        let json = serde_json::to_string(&Int::from(u64::MAX)).expect("serialize");
        assert_eq!(json, "18446744073709551615");
        let json = serde_json::to_string(&Int::from(-5i64)).expect("serialize");
        assert_eq!(json, "-5");
    }
}
