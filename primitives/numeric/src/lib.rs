#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `nodewire-numeric` — Precision-Safe JSON Numbers
//!
//! Amount fields in the node API are unsigned 64-bit integers, which many
//! JSON consumers silently round once they pass 2^53. This crate keeps them
//! exact in both directions.
//!
//! ## Decoding
//! [`decode`] parses a response body without routing integers through a
//! double, then narrows each one into an [`Int`]: [`Int::Safe`] inside the
//! safe-double-integer range, [`Int::Big`] outside it. The result is a
//! [`Value`] tree that keeps key and element order. Malformed bodies yield
//! `None` instead of an error; whether that matters is the caller's call.
//!
//! Typed shapes are read out of a [`Value`] with [`from_value`].
//!
//! ## Encoding
//! [`encode`] and [`to_wire`] walk an outgoing body and refuse any integer
//! whose magnitude exceeds [`MAX_SAFE_INTEGER`] with an
//! [`EncodingRangeError`], so a request is never sent with a corrupted
//! amount.
//!
//! ## Example
//! ```
//! use numeric::{decode, Int};
//!
//! let body = decode(r#"{"amount_msat": 9223372036854770000}"#).unwrap();
//! let amount = body.get("amount_msat").and_then(|v| v.as_int()).unwrap();
//! assert_eq!(*amount, Int::from(9_223_372_036_854_770_000u64));
//! assert!(!amount.is_safe());
//! ```

mod codec;
mod de;
mod int;
mod value;

pub use codec::{decode, encode, to_wire, EncodeError, EncodingRangeError};
pub use de::{from_value, ShapeError};
pub use int::Int;
pub use value::{Map, Value};

/// Largest integer a 64-bit float represents exactly: 2^53 − 1.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Returns `true` if `n` lies within ±[`MAX_SAFE_INTEGER`].
pub fn is_safe(n: i128) -> bool { n.unsigned_abs() <= u128::from(MAX_SAFE_INTEGER) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safe() {
        assert!(is_safe(0));
        assert!(is_safe(i128::from(MAX_SAFE_INTEGER)));
        assert!(is_safe(-i128::from(MAX_SAFE_INTEGER)));
        assert!(!is_safe(i128::from(MAX_SAFE_INTEGER) + 1));
        assert!(!is_safe(-i128::from(MAX_SAFE_INTEGER) - 1));
    }
}
