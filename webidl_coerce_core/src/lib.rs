//! WebIDL-style numeric coercion core
//!
//! This crate converts loosely-typed host values into fixed-width numeric
//! representations. It includes:
//!
//! - `Value` enum for host values, with ECMAScript ToNumber
//! - `IdlError` for range and conversion failures
//! - Integer coercion for the eight 8–64 bit kinds under the Default,
//!   EnforceRange and Clamp policies
//! - Single-precision rounding without a native 32-bit float, plus the
//!   restricted/unrestricted float and double conversions
//! - Numeric intrinsics (floored modulo, round-half-to-even)
//!
//! Every conversion is a pure function of its input.

pub mod error;
pub mod float;
pub mod integer;
pub mod intrinsics;
pub mod value;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use webidl_coerce_core::prelude::*;
///
/// let kind = IntegerKind::new(8, false).unwrap();
/// assert_eq!(convert_integer(&Value::Number(-1.0), kind, IntegerPolicy::Default), Ok(255));
/// ```
pub mod prelude {
    pub use super::error::{IdlError, IdlResult};
    pub use super::float::{
        convert_float, round_to_single, to_double, to_float, to_unrestricted_double,
        to_unrestricted_float, FloatKind,
    };
    pub use super::integer::{
        convert_integer, convert_number, to_byte, to_long, to_long_long, to_octet, to_short,
        to_unsigned_long, to_unsigned_long_long, to_unsigned_short, IntegerKind, IntegerPolicy,
    };
    pub use super::value::Value;
}

pub use prelude::*;
