//! Fixed-width integer coercion
//!
//! One parameterized algorithm covers all eight integer kinds. The kind
//! supplies `(bit_width, signed, min, max)`; the policy picks one of three
//! range-handling branches.
//!
//! Once a value has been truncated it is carried as an exact `i128`, so the
//! 64-bit kinds wrap, clamp and range-check exactly rather than through a
//! double-precision intermediate.

use std::fmt;

use crate::error::{IdlError, IdlResult};
use crate::intrinsics::{exact_integer, floored_mod, round_half_even, truncate};
use crate::value::Value;

/// The eight fixed-width integer kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerKind {
    /// Signed 8-bit
    Byte,
    /// Unsigned 8-bit
    Octet,
    /// Signed 16-bit
    Short,
    /// Unsigned 16-bit
    UnsignedShort,
    /// Signed 32-bit
    Long,
    /// Unsigned 32-bit
    UnsignedLong,
    /// Signed 64-bit
    LongLong,
    /// Unsigned 64-bit
    UnsignedLongLong,
}

impl IntegerKind {
    /// All kinds, narrowest first
    pub const ALL: [IntegerKind; 8] = [
        IntegerKind::Byte,
        IntegerKind::Octet,
        IntegerKind::Short,
        IntegerKind::UnsignedShort,
        IntegerKind::Long,
        IntegerKind::UnsignedLong,
        IntegerKind::LongLong,
        IntegerKind::UnsignedLongLong,
    ];

    /// Select a kind from its width descriptor
    pub fn new(bit_width: u32, signed: bool) -> Option<Self> {
        let kind = match (bit_width, signed) {
            (8, true) => IntegerKind::Byte,
            (8, false) => IntegerKind::Octet,
            (16, true) => IntegerKind::Short,
            (16, false) => IntegerKind::UnsignedShort,
            (32, true) => IntegerKind::Long,
            (32, false) => IntegerKind::UnsignedLong,
            (64, true) => IntegerKind::LongLong,
            (64, false) => IntegerKind::UnsignedLongLong,
            _ => return None,
        };
        Some(kind)
    }

    pub fn bit_width(self) -> u32 {
        match self {
            IntegerKind::Byte | IntegerKind::Octet => 8,
            IntegerKind::Short | IntegerKind::UnsignedShort => 16,
            IntegerKind::Long | IntegerKind::UnsignedLong => 32,
            IntegerKind::LongLong | IntegerKind::UnsignedLongLong => 64,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            IntegerKind::Byte | IntegerKind::Short | IntegerKind::Long | IntegerKind::LongLong
        )
    }

    /// Smallest representable value
    pub fn min(self) -> i128 {
        if self.is_signed() {
            -(1_i128 << (self.bit_width() - 1))
        } else {
            0
        }
    }

    /// Largest representable value
    pub fn max(self) -> i128 {
        if self.is_signed() {
            (1_i128 << (self.bit_width() - 1)) - 1
        } else {
            (1_i128 << self.bit_width()) - 1
        }
    }

    /// Whether `n` is representable in this kind
    pub fn contains(self, n: i128) -> bool {
        (self.min()..=self.max()).contains(&n)
    }

    /// IDL type name
    pub fn as_str(self) -> &'static str {
        match self {
            IntegerKind::Byte => "byte",
            IntegerKind::Octet => "octet",
            IntegerKind::Short => "short",
            IntegerKind::UnsignedShort => "unsigned short",
            IntegerKind::Long => "long",
            IntegerKind::UnsignedLong => "unsigned long",
            IntegerKind::LongLong => "long long",
            IntegerKind::UnsignedLongLong => "unsigned long long",
        }
    }
}

impl fmt::Display for IntegerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Range-handling policy for integer conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntegerPolicy {
    /// Reduce modulo 2^bit_width, then re-sign
    #[default]
    Default,
    /// Fail on non-finite or out-of-range input
    EnforceRange,
    /// Saturate at the bounds, rounding ties to even
    Clamp,
}

impl IntegerPolicy {
    /// Build a policy from the `[EnforceRange]` / `[Clamp]` flag pair.
    /// EnforceRange wins when both are set.
    pub fn from_flags(enforce_range: bool, clamp: bool) -> Self {
        if enforce_range {
            IntegerPolicy::EnforceRange
        } else if clamp {
            IntegerPolicy::Clamp
        } else {
            IntegerPolicy::Default
        }
    }
}

/// Convert a host value to an integer of the given kind
pub fn convert_integer(value: &Value, kind: IntegerKind, policy: IntegerPolicy) -> IdlResult<i128> {
    convert_number(value.to_number(), kind, policy)
}

/// Convert an already-normalized number to an integer of the given kind
pub fn convert_number(x: f64, kind: IntegerKind, policy: IntegerPolicy) -> IdlResult<i128> {
    match policy {
        IntegerPolicy::EnforceRange => enforce_range(x, kind),
        IntegerPolicy::Clamp => Ok(clamp(x, kind)),
        IntegerPolicy::Default => Ok(wrap(x, kind)),
    }
}

fn enforce_range(x: f64, kind: IntegerKind) -> IdlResult<i128> {
    if !x.is_finite() {
        return Err(IdlError::range_error(format!(
            "cannot enforce range on {} for {}",
            x, kind
        )));
    }
    let truncated = truncate(x);
    match exact_integer(truncated) {
        Some(n) if kind.contains(n) => Ok(n),
        _ => Err(IdlError::range_error(format!(
            "{} is out of range for {}",
            truncated, kind
        ))),
    }
}

fn clamp(x: f64, kind: IntegerKind) -> i128 {
    if x.is_nan() {
        return 0;
    }
    // Bounds are integers, so rounding first gives the same result.
    let rounded = round_half_even(x);
    match exact_integer(rounded) {
        Some(n) => n.clamp(kind.min(), kind.max()),
        None if rounded > 0.0 => kind.max(),
        None => kind.min(),
    }
}

fn wrap(x: f64, kind: IntegerKind) -> i128 {
    if !x.is_finite() || x == 0.0 {
        return 0;
    }
    let modulus = 1_i128 << kind.bit_width();
    // Integral doubles of magnitude 2^127 and up are multiples of 2^64.
    let reduced = exact_integer(truncate(x)).map_or(0, |n| floored_mod(n, modulus));
    if kind.is_signed() && reduced >= modulus / 2 {
        reduced - modulus
    } else {
        reduced
    }
}

macro_rules! typed_conversion {
    ($(#[$doc:meta])* $name:ident, $kind:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(value: &Value, policy: IntegerPolicy) -> IdlResult<$ty> {
            let n = convert_integer(value, IntegerKind::$kind, policy)?;
            <$ty>::try_from(n).map_err(|_| {
                IdlError::range_error(format!("{} is out of range for {}", n, IntegerKind::$kind))
            })
        }
    };
}

typed_conversion!(
    /// Convert to `byte` (`i8`)
    to_byte, Byte, i8
);
typed_conversion!(
    /// Convert to `octet` (`u8`)
    to_octet, Octet, u8
);
typed_conversion!(
    /// Convert to `short` (`i16`)
    to_short, Short, i16
);
typed_conversion!(
    /// Convert to `unsigned short` (`u16`)
    to_unsigned_short, UnsignedShort, u16
);
typed_conversion!(
    /// Convert to `long` (`i32`)
    to_long, Long, i32
);
typed_conversion!(
    /// Convert to `unsigned long` (`u32`)
    to_unsigned_long, UnsignedLong, u32
);
typed_conversion!(
    /// Convert to `long long` (`i64`)
    to_long_long, LongLong, i64
);
typed_conversion!(
    /// Convert to `unsigned long long` (`u64`)
    to_unsigned_long_long, UnsignedLongLong, u64
);
