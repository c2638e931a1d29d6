//! Integration tests for integer coercion
//!
//! Exercises the public conversion API across all eight kinds and all
//! three policies.

use proptest::prelude::*;
use webidl_coerce_core::{convert_integer, convert_number, IntegerKind, IntegerPolicy, Value};

const POLICIES: [IntegerPolicy; 3] = [
    IntegerPolicy::Default,
    IntegerPolicy::EnforceRange,
    IntegerPolicy::Clamp,
];

fn arb_kind() -> impl Strategy<Value = IntegerKind> {
    prop::sample::select(IntegerKind::ALL.to_vec())
}

fn arb_policy() -> impl Strategy<Value = IntegerPolicy> {
    prop::sample::select(POLICIES.to_vec())
}

/// Doubles weighted toward the interesting regions: small values, halves,
/// width boundaries and non-finite input.
fn arb_number() -> impl Strategy<Value = f64> {
    prop_oneof![
        any::<f64>(),
        (-1000i32..1000).prop_map(|n| f64::from(n) / 2.0),
        (0u32..=64, any::<bool>(), -2i32..=2).prop_map(|(e, neg, d)| {
            let base = 2f64.powi(e as i32) + f64::from(d);
            if neg {
                -base
            } else {
                base
            }
        }),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        Just(-0.0),
    ]
}

// ==================== Testable Properties ====================

proptest! {
    /// Every successful conversion lies within the kind's range.
    #[test]
    fn prop_result_within_range(x in arb_number(), kind in arb_kind(), policy in arb_policy()) {
        if let Ok(n) = convert_number(x, kind, policy) {
            prop_assert!(n >= kind.min() && n <= kind.max(), "{} outside {}", n, kind);
        }
    }

    /// Unsigned 8-bit wraparound on integral input matches ((x mod 256) + 256) mod 256.
    #[test]
    fn prop_octet_wraparound(n in -100_000i64..100_000) {
        let expected = i128::from(((n % 256) + 256) % 256);
        let got = convert_number(n as f64, IntegerKind::Octet, IntegerPolicy::Default);
        prop_assert_eq!(got, Ok(expected));
    }

    /// Wraparound agrees with Rust's own truncating casts for every width.
    #[test]
    fn prop_wraparound_matches_native_casts(n in any::<i64>()) {
        let x = n as f64;
        let t = x as i128;
        let expected = [
            i128::from(t as i8),
            i128::from(t as u8),
            i128::from(t as i16),
            i128::from(t as u16),
            i128::from(t as i32),
            i128::from(t as u32),
            i128::from(t as i64),
            i128::from(t as u64),
        ];
        for (kind, expected) in IntegerKind::ALL.iter().zip(expected) {
            prop_assert_eq!(convert_number(x, *kind, IntegerPolicy::Default), Ok(expected));
        }
    }

    /// Clamp agrees with EnforceRange wherever EnforceRange accepts an integral value.
    #[test]
    fn prop_clamp_agrees_with_enforce_range_on_integers(n in -70_000i32..70_000, kind in arb_kind()) {
        let x = f64::from(n);
        if let Ok(enforced) = convert_number(x, kind, IntegerPolicy::EnforceRange) {
            prop_assert_eq!(convert_number(x, kind, IntegerPolicy::Clamp), Ok(enforced));
        }
    }

    /// Clamp and Default never fail; EnforceRange fails exactly on non-finite or out-of-range input.
    #[test]
    fn prop_enforce_range_failure_condition(x in arb_number(), kind in arb_kind()) {
        prop_assert!(convert_number(x, kind, IntegerPolicy::Clamp).is_ok());
        prop_assert!(convert_number(x, kind, IntegerPolicy::Default).is_ok());
        let truncated = x.trunc();
        let in_range = x.is_finite()
            && truncated >= kind.min() as f64
            && truncated <= kind.max() as f64
            && (truncated as i128) <= kind.max();
        prop_assert_eq!(convert_number(x, kind, IntegerPolicy::EnforceRange).is_ok(), in_range);
    }
}

// ==================== Known Cases ====================

#[test]
fn test_documented_examples() {
    let octet = IntegerKind::new(8, false).unwrap();
    let byte = IntegerKind::new(8, true).unwrap();

    assert_eq!(convert_integer(&Value::from(-1), octet, IntegerPolicy::Default), Ok(255));
    assert_eq!(convert_integer(&Value::from(256), octet, IntegerPolicy::Default), Ok(0));
    assert_eq!(convert_integer(&Value::from(200), byte, IntegerPolicy::Default), Ok(-56));
    assert!(convert_integer(&Value::from(128), byte, IntegerPolicy::EnforceRange).is_err());
    assert_eq!(convert_integer(&Value::from(127), byte, IntegerPolicy::EnforceRange), Ok(127));
    assert_eq!(convert_integer(&Value::from(2.5), byte, IntegerPolicy::Clamp), Ok(2));
    assert_eq!(convert_integer(&Value::from(3.5), byte, IntegerPolicy::Clamp), Ok(4));
}

#[test]
fn test_negative_zero_behaves_as_zero() {
    for kind in IntegerKind::ALL {
        for policy in POLICIES {
            assert_eq!(
                convert_integer(&Value::Number(-0.0), kind, policy),
                Ok(0),
                "{} / {:?}",
                kind,
                policy
            );
        }
    }
}

#[test]
fn test_signed_clamp_reaches_minimum() {
    for kind in IntegerKind::ALL.into_iter().filter(|k| k.is_signed()) {
        let below = -(2f64.powi(kind.bit_width() as i32));
        assert_eq!(
            convert_integer(&Value::Number(below), kind, IntegerPolicy::Clamp),
            Ok(kind.min())
        );
        assert_eq!(
            convert_integer(&Value::Number(kind.min() as f64), kind, IntegerPolicy::Clamp),
            Ok(kind.min())
        );
    }
}

#[test]
fn test_clamp_tie_breaking_near_bounds() {
    let octet = IntegerKind::Octet;
    assert_eq!(convert_number(254.5, octet, IntegerPolicy::Clamp), Ok(254));
    assert_eq!(convert_number(253.5, octet, IntegerPolicy::Clamp), Ok(254));
    assert_eq!(convert_number(255.5, octet, IntegerPolicy::Clamp), Ok(255));
    assert_eq!(convert_number(0.5, octet, IntegerPolicy::Clamp), Ok(0));
    assert_eq!(convert_number(-127.5, IntegerKind::Byte, IntegerPolicy::Clamp), Ok(-128));
    assert_eq!(convert_number(-126.5, IntegerKind::Byte, IntegerPolicy::Clamp), Ok(-126));
}

#[test]
fn test_range_error_messages() {
    let err = convert_number(300.0, IntegerKind::Octet, IntegerPolicy::EnforceRange).unwrap_err();
    insta::assert_snapshot!(err, @"RangeError: 300 is out of range for octet");

    let err = convert_number(f64::NAN, IntegerKind::Long, IntegerPolicy::EnforceRange).unwrap_err();
    insta::assert_snapshot!(err, @"RangeError: cannot enforce range on NaN for long");
}

#[test]
fn test_string_input_uses_to_number() {
    let long = IntegerKind::Long;
    assert_eq!(convert_integer(&Value::from("0x10"), long, IntegerPolicy::Default), Ok(16));
    assert_eq!(convert_integer(&Value::from(" -7.9 "), long, IntegerPolicy::Default), Ok(-7));
    assert_eq!(convert_integer(&Value::from("junk"), long, IntegerPolicy::Clamp), Ok(0));
    assert!(convert_integer(&Value::from("1e10"), long, IntegerPolicy::EnforceRange).is_err());
    assert_eq!(
        convert_integer(&Value::from("1e10"), long, IntegerPolicy::Clamp),
        Ok(i128::from(i32::MAX))
    );
}
