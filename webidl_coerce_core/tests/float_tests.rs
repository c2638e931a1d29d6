//! Integration tests for single-precision rounding and the float/double
//! conversions
//!
//! The hardware `f64 as f32` narrowing rounds to nearest, ties to even, and
//! serves as the oracle for the manual algorithm.

use proptest::prelude::*;
use webidl_coerce_core::{
    convert_float, round_to_single, to_double, to_float, to_unrestricted_double,
    to_unrestricted_float, FloatKind, Value,
};

fn oracle(x: f64) -> f64 {
    f64::from(x as f32)
}

fn same_bits(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
}

/// Doubles concentrated around the single-precision edges: denormal
/// range, overflow threshold and rounding ties.
fn arb_edge_double() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-160i32..-120, 1u64..(1 << 30)).prop_map(|(e, m)| m as f64 * 2f64.powi(e - 30)),
        (120i32..130, 1u64..(1 << 30)).prop_map(|(e, m)| m as f64 * 2f64.powi(e - 30)),
        // Exact halfway points between consecutive singles.
        any::<u32>().prop_map(|bits| {
            let f = f32::from_bits(bits & 0x7f7f_ffff);
            let next = f32::from_bits((bits & 0x7f7f_ffff) + 1);
            (f64::from(f) + f64::from(next)) / 2.0
        }),
    ]
}

proptest! {
    /// The manual algorithm agrees bit for bit with hardware rounding.
    #[test]
    fn prop_matches_hardware_rounding(x in any::<f64>()) {
        let got = round_to_single(x);
        prop_assert!(same_bits(got, oracle(x)), "{:e}: got {:e}, expected {:e}", x, got, oracle(x));
    }

    #[test]
    fn prop_matches_hardware_rounding_at_edges(x in arb_edge_double(), negative in any::<bool>()) {
        let x = if negative { -x } else { x };
        let got = round_to_single(x);
        prop_assert!(same_bits(got, oracle(x)), "{:e}: got {:e}, expected {:e}", x, got, oracle(x));
    }

    /// Rounding twice is the same as rounding once.
    #[test]
    fn prop_idempotent(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        let once = to_unrestricted_float(&Value::Number(x));
        let twice = to_unrestricted_float(&Value::Number(once));
        prop_assert!(same_bits(once, twice));
    }

    /// Every single-precision value round-trips unchanged.
    #[test]
    fn prop_singles_are_fixed_points(bits in any::<u32>()) {
        let f = f32::from_bits(bits);
        prop_assume!(!f.is_nan());
        let x = f64::from(f);
        prop_assert!(same_bits(round_to_single(x), x));
    }

    /// The result is always exactly representable in single precision.
    #[test]
    fn prop_result_is_representable(x in any::<f64>()) {
        let y = round_to_single(x);
        prop_assert!(same_bits(f64::from(y as f32), y));
    }

    /// Restricted kinds fail exactly when the unrestricted result is NaN or infinite.
    #[test]
    fn prop_restricted_fails_only_on_non_finite(x in any::<f64>()) {
        let v = Value::Number(x);
        prop_assert_eq!(to_double(&v).is_err(), !to_unrestricted_double(&v).is_finite());
        prop_assert_eq!(to_float(&v).is_err(), !to_unrestricted_float(&v).is_finite());
    }
}

#[test]
fn test_known_rounding_cases() {
    assert_eq!(round_to_single(16_777_217.0), 16_777_216.0);
    assert_eq!(round_to_single(16_777_218.0), 16_777_218.0);
    assert_eq!(to_unrestricted_float(&Value::Number(1e40)), f64::INFINITY);
    assert_eq!(to_unrestricted_float(&Value::Number(-1e40)), f64::NEG_INFINITY);

    let tiny = to_unrestricted_float(&Value::Number(-1e-50));
    assert_eq!(tiny, 0.0);
    assert!(tiny.is_sign_negative());
}

#[test]
fn test_restricted_variants_fail_on_nan_and_infinity() {
    for input in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let v = Value::Number(input);
        assert!(to_float(&v).is_err());
        assert!(to_double(&v).is_err());
        assert!(convert_float(&v, FloatKind::UnrestrictedFloat).is_ok());
        assert!(convert_float(&v, FloatKind::UnrestrictedDouble).is_ok());
    }
    assert_eq!(to_float(&Value::Number(1.5)), Ok(1.5));
    assert_eq!(to_double(&Value::Number(f64::MAX)), Ok(f64::MAX));
}

#[test]
fn test_conversion_error_message() {
    let err = to_double(&Value::from("not a number")).unwrap_err();
    insta::assert_snapshot!(err, @"ConversionError: cannot convert NaN to double");

    let err = to_float(&Value::Number(1e39)).unwrap_err();
    insta::assert_snapshot!(err, @"ConversionError: cannot convert 1000000000000000000000000000000000000000 to float");
}

#[test]
fn test_float_kind_flags() {
    assert!(FloatKind::Float.is_restricted());
    assert!(FloatKind::Float.is_single());
    assert!(!FloatKind::UnrestrictedDouble.is_restricted());
    assert!(!FloatKind::Double.is_single());
    assert_eq!(FloatKind::UnrestrictedFloat.to_string(), "unrestricted float");
}
