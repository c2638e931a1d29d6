//! Numeric intrinsics
//!
//! Small pure helpers shared by the integer and float conversions.

/// 2^127, the first magnitude an `i128` cannot hold
const I128_LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Sign of `x` as ±1, counting `-0` as negative
#[inline]
pub fn sign(x: f64) -> f64 {
    if x.is_sign_negative() {
        -1.0
    } else {
        1.0
    }
}

/// Truncate toward zero: `sign(x) * floor(abs(x))`
#[inline]
pub fn truncate(x: f64) -> f64 {
    sign(x) * x.abs().floor()
}

/// Round to the nearest integer, ties to even, `-0` normalized to `0`
///
/// ```
/// use webidl_coerce_core::intrinsics::round_half_even;
/// assert_eq!(round_half_even(2.5), 2.0);
/// assert_eq!(round_half_even(3.5), 4.0);
/// assert_eq!(round_half_even(-2.5), -2.0);
/// ```
#[inline]
pub fn round_half_even(x: f64) -> f64 {
    let rounded = x.round_ties_even();
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Floored modulo: `a - n * floor(a / n)`
///
/// Unlike `%`, the result takes the sign of `n`, so for a positive modulus
/// it always lies in `[0, n)`.
#[inline]
pub fn floored_mod(a: i128, n: i128) -> i128 {
    let r = a % n;
    if r != 0 && ((r < 0) != (n < 0)) {
        r + n
    } else {
        r
    }
}

/// An integral double as an exact `i128`
///
/// Returns `None` for non-integral, non-finite, or out-of-range input.
#[inline]
pub fn exact_integer(x: f64) -> Option<i128> {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < I128_LIMIT {
        Some(x as i128)
    } else {
        None
    }
}

/// Exact power of two as a double
///
/// `exp` must lie within the normal double range, `-1022..=1023`.
#[inline]
pub fn pow2(exp: i32) -> f64 {
    debug_assert!((-1022..=1023).contains(&exp), "pow2 exponent {exp} out of range");
    let biased = u64::from((exp + 1023).unsigned_abs());
    f64::from_bits(biased << 52)
}
