//! Floating-point conversions
//!
//! Single-precision rounding is carried out on the exact binary expansion
//! of a double, without going through a native 32-bit float. The result is
//! always returned as an `f64` that is exactly representable as an `f32`.
//!
//! ## Algorithm
//!
//! 1. `0`, `NaN` and `±Infinity` pass through unchanged.
//! 2. The magnitude is expanded into its significand bits (leading one to
//!    last set bit) and the exponent of the leading bit.
//! 3. Normals keep 24 significand bits. Below 2^-126 the kept length
//!    shrinks so the last kept bit never falls below 2^-149.
//! 4. A longer significand is rounded at the kept length, ties to even.
//! 5. The rounded significand is scaled back by an exact power of two.
//! 6. Magnitudes of 2^128 and up become infinity; the sign is reapplied.

use std::fmt;

use crate::error::{IdlError, IdlResult};
use crate::intrinsics::pow2;
use crate::value::Value;

/// Significand width of a single, hidden bit included
const SIGNIFICAND_BITS: i32 = 24;

/// Exponent of the smallest normal single
const MIN_NORMAL_EXPONENT: i32 = -126;

/// Exponent of the smallest denormal single
const MIN_DENORMAL_EXPONENT: i32 = -149;

/// Magnitudes at or above 2^128 overflow
const OVERFLOW_EXPONENT: i32 = 128;

/// Exact binary expansion of a positive finite double
///
/// `significand` holds the bits from the leading one down to the last set
/// bit; the leading bit carries the weight 2^`exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BinaryExpansion {
    significand: u64,
    exponent: i32,
}

impl BinaryExpansion {
    fn of(magnitude: f64) -> Self {
        debug_assert!(magnitude.is_finite() && magnitude > 0.0);
        let bits = magnitude.to_bits();
        let biased = ((bits >> 52) & 0x7ff) as i32;
        let fraction = bits & ((1 << 52) - 1);
        let (significand, lsb_exponent) = if biased == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1 << 52), biased - 1075)
        };

        let zeros = significand.trailing_zeros();
        let significand = significand >> zeros;
        let len = bit_length(significand);
        BinaryExpansion {
            significand,
            exponent: lsb_exponent + zeros as i32 + len - 1,
        }
    }

    /// Number of significand bits
    fn len(&self) -> i32 {
        bit_length(self.significand)
    }

    /// Weight exponent of the last significand bit
    fn lsb_exponent(&self) -> i32 {
        self.exponent - (self.len() - 1)
    }
}

fn bit_length(n: u64) -> i32 {
    (u64::BITS - n.leading_zeros()) as i32
}

/// Significand bits a single can hold for a leading bit of weight
/// 2^`exponent`. Negative when the value lies below half the smallest
/// denormal.
fn retained_bits(exponent: i32) -> i32 {
    if exponent < MIN_NORMAL_EXPONENT {
        exponent - MIN_DENORMAL_EXPONENT + 1
    } else {
        SIGNIFICAND_BITS
    }
}

/// Round a double to the nearest single-precision value, ties to even
///
/// Magnitudes strictly between 2^-150 and 2^-149 are below the smallest
/// denormal but round up to it; only 2^-150 and smaller become zero.
///
/// ```
/// use webidl_coerce_core::float::round_to_single;
/// assert_eq!(round_to_single(16_777_217.0), 16_777_216.0);
/// assert_eq!(round_to_single(1e40), f64::INFINITY);
/// ```
pub fn round_to_single(x: f64) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let negative = x.is_sign_negative();
    let expansion = BinaryExpansion::of(x.abs());

    let retained = retained_bits(expansion.exponent);
    let magnitude = if retained < 0 {
        0.0
    } else {
        let (significand, lsb_exponent) = round_significand(expansion, retained);
        // significand < 2^25, so the product is exact unless it overflows
        significand as f64 * pow2(lsb_exponent)
    };

    let magnitude = if magnitude >= pow2(OVERFLOW_EXPONENT) {
        f64::INFINITY
    } else {
        magnitude
    };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Round the expansion to `retained` significand bits. Returns the rounded
/// significand and the weight exponent of its last bit.
fn round_significand(expansion: BinaryExpansion, retained: i32) -> (u64, i32) {
    let len = expansion.len();
    if len <= retained {
        return (expansion.significand, expansion.lsb_exponent());
    }

    let dropped = (len - retained).unsigned_abs();
    let kept = expansion.significand >> dropped;
    let tail = expansion.significand & ((1 << dropped) - 1);
    let half = 1 << (dropped - 1);
    let rounded = if tail > half || (tail == half && kept & 1 == 1) {
        kept + 1
    } else {
        kept
    };
    (rounded, expansion.lsb_exponent() + dropped as i32)
}

/// Floating-point target precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    /// Finite single precision
    Float,
    /// Single precision, NaN and infinities allowed
    UnrestrictedFloat,
    /// Finite double precision
    Double,
    /// Double precision, NaN and infinities allowed
    UnrestrictedDouble,
}

impl FloatKind {
    /// Whether NaN and infinite results are rejected
    pub fn is_restricted(self) -> bool {
        matches!(self, FloatKind::Float | FloatKind::Double)
    }

    /// Whether results are rounded to single precision
    pub fn is_single(self) -> bool {
        matches!(self, FloatKind::Float | FloatKind::UnrestrictedFloat)
    }

    /// IDL type name
    pub fn as_str(self) -> &'static str {
        match self {
            FloatKind::Float => "float",
            FloatKind::UnrestrictedFloat => "unrestricted float",
            FloatKind::Double => "double",
            FloatKind::UnrestrictedDouble => "unrestricted double",
        }
    }
}

impl fmt::Display for FloatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a host value to the given floating-point kind
///
/// Restricted kinds check the rounded result, so a finite double that
/// rounds to infinity in single precision is rejected too.
pub fn convert_float(value: &Value, kind: FloatKind) -> IdlResult<f64> {
    let x = value.to_number();
    let y = if kind.is_single() {
        round_to_single(x)
    } else {
        x
    };
    if kind.is_restricted() && !y.is_finite() {
        return Err(IdlError::conversion_error(format!(
            "cannot convert {} to {}",
            x, kind
        )));
    }
    Ok(y)
}

/// Convert to `float`
pub fn to_float(value: &Value) -> IdlResult<f64> {
    convert_float(value, FloatKind::Float)
}

/// Convert to `unrestricted float`
pub fn to_unrestricted_float(value: &Value) -> f64 {
    round_to_single(value.to_number())
}

/// Convert to `double`
pub fn to_double(value: &Value) -> IdlResult<f64> {
    convert_float(value, FloatKind::Double)
}

/// Convert to `unrestricted double`
pub fn to_unrestricted_double(value: &Value) -> f64 {
    value.to_number()
}
