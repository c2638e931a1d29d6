//! IDL types, extended attributes and typed results

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use webidl_coerce_core::{FloatKind, IntegerKind, IntegerPolicy, Value};

use crate::error::ConfigError;

/// Conversion target
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum IdlType {
    Any,
    Boolean,
    Integer(IntegerKind),
    Float(FloatKind),
    DomString,
    ByteString,
    Object,
    /// Enumeration or dictionary registered in `Definitions`
    Named(String),
}

impl IdlType {
    /// Builtin type for a name from the type table
    pub fn builtin(name: &str) -> Option<Self> {
        let ty = match name {
            "any" => IdlType::Any,
            "boolean" => IdlType::Boolean,
            "byte" => IdlType::Integer(IntegerKind::Byte),
            "octet" => IdlType::Integer(IntegerKind::Octet),
            "short" => IdlType::Integer(IntegerKind::Short),
            "unsigned short" => IdlType::Integer(IntegerKind::UnsignedShort),
            "long" => IdlType::Integer(IntegerKind::Long),
            "unsigned long" => IdlType::Integer(IntegerKind::UnsignedLong),
            "long long" => IdlType::Integer(IntegerKind::LongLong),
            "unsigned long long" => IdlType::Integer(IntegerKind::UnsignedLongLong),
            "float" => IdlType::Float(FloatKind::Float),
            "unrestricted float" => IdlType::Float(FloatKind::UnrestrictedFloat),
            "double" => IdlType::Float(FloatKind::Double),
            "unrestricted double" => IdlType::Float(FloatKind::UnrestrictedDouble),
            "DOMString" => IdlType::DomString,
            "ByteString" => IdlType::ByteString,
            "object" => IdlType::Object,
            _ => return None,
        };
        Some(ty)
    }

    /// Name of a registered type, if this is one
    pub fn as_named(&self) -> Option<&str> {
        match self {
            IdlType::Named(name) => Some(name),
            _ => None,
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FromStr for IdlType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(ty) = IdlType::builtin(s) {
            Ok(ty)
        } else if is_identifier(s) {
            Ok(IdlType::Named(s.to_string()))
        } else {
            Err(ConfigError::InvalidTypeName(s.to_string()))
        }
    }
}

impl TryFrom<String> for IdlType {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for IdlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdlType::Any => f.write_str("any"),
            IdlType::Boolean => f.write_str("boolean"),
            IdlType::Integer(kind) => write!(f, "{}", kind),
            IdlType::Float(kind) => write!(f, "{}", kind),
            IdlType::DomString => f.write_str("DOMString"),
            IdlType::ByteString => f.write_str("ByteString"),
            IdlType::Object => f.write_str("object"),
            IdlType::Named(name) => f.write_str(name),
        }
    }
}

/// Replacement for an `undefined` nullable input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TreatUndefinedAs {
    /// The empty string
    EmptyString,
    /// Null
    Null,
}

/// Extended attributes attached to a conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct ExtendedAttributes {
    pub enforce_range: bool,
    pub clamp: bool,
    pub treat_undefined_as: Option<TreatUndefinedAs>,
    pub treat_non_callable_as_null: bool,
}

impl ExtendedAttributes {
    /// `[EnforceRange]`
    pub fn enforce_range() -> Self {
        ExtendedAttributes {
            enforce_range: true,
            ..Default::default()
        }
    }

    /// `[Clamp]`
    pub fn clamp() -> Self {
        ExtendedAttributes {
            clamp: true,
            ..Default::default()
        }
    }

    /// `[TreatUndefinedAs=...]`
    pub fn treat_undefined_as(replacement: TreatUndefinedAs) -> Self {
        ExtendedAttributes {
            treat_undefined_as: Some(replacement),
            ..Default::default()
        }
    }

    /// `[TreatNonCallableAsNull]`
    pub fn treat_non_callable_as_null() -> Self {
        ExtendedAttributes {
            treat_non_callable_as_null: true,
            ..Default::default()
        }
    }

    /// Integer policy selected by these attributes; EnforceRange wins over
    /// Clamp.
    pub fn integer_policy(&self) -> IntegerPolicy {
        if self.enforce_range && self.clamp {
            tracing::debug!("both [EnforceRange] and [Clamp] present, applying EnforceRange");
        }
        IntegerPolicy::from_flags(self.enforce_range, self.clamp)
    }
}

/// Typed conversion result
#[derive(Debug, Clone, PartialEq)]
pub enum IdlValue {
    Undefined,
    Null,
    Boolean(bool),
    Byte(i8),
    Octet(u8),
    Short(i16),
    UnsignedShort(u16),
    Long(i32),
    UnsignedLong(u32),
    LongLong(i64),
    UnsignedLongLong(u64),
    Float(f64),
    UnrestrictedFloat(f64),
    Double(f64),
    UnrestrictedDouble(f64),
    DomString(String),
    ByteString(String),
    Object(Value),
    Enumeration(String),
    Dictionary(BTreeMap<String, IdlValue>),
}

impl IdlValue {
    /// Wrap a float result in the variant for its kind
    pub fn from_float(kind: FloatKind, x: f64) -> Self {
        match kind {
            FloatKind::Float => IdlValue::Float(x),
            FloatKind::UnrestrictedFloat => IdlValue::UnrestrictedFloat(x),
            FloatKind::Double => IdlValue::Double(x),
            FloatKind::UnrestrictedDouble => IdlValue::UnrestrictedDouble(x),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, IdlValue::Null)
    }

    /// Integer payload widened to `i128`
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            IdlValue::Byte(n) => Some(i128::from(*n)),
            IdlValue::Octet(n) => Some(i128::from(*n)),
            IdlValue::Short(n) => Some(i128::from(*n)),
            IdlValue::UnsignedShort(n) => Some(i128::from(*n)),
            IdlValue::Long(n) => Some(i128::from(*n)),
            IdlValue::UnsignedLong(n) => Some(i128::from(*n)),
            IdlValue::LongLong(n) => Some(i128::from(*n)),
            IdlValue::UnsignedLongLong(n) => Some(i128::from(*n)),
            _ => None,
        }
    }

    /// Float payload of any of the four float kinds
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            IdlValue::Float(x)
            | IdlValue::UnrestrictedFloat(x)
            | IdlValue::Double(x)
            | IdlValue::UnrestrictedDouble(x) => Some(*x),
            _ => None,
        }
    }

    /// String payload of DOMString, ByteString or enumeration values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            IdlValue::DomString(s) | IdlValue::ByteString(s) | IdlValue::Enumeration(s) => Some(s),
            _ => None,
        }
    }

    /// JSON rendering for handing results back across the boundary.
    /// Non-finite floats and `undefined` become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            IdlValue::Undefined | IdlValue::Null => Json::Null,
            IdlValue::Boolean(b) => Json::Bool(*b),
            IdlValue::Byte(n) => Json::from(*n),
            IdlValue::Octet(n) => Json::from(*n),
            IdlValue::Short(n) => Json::from(*n),
            IdlValue::UnsignedShort(n) => Json::from(*n),
            IdlValue::Long(n) => Json::from(*n),
            IdlValue::UnsignedLong(n) => Json::from(*n),
            IdlValue::LongLong(n) => Json::from(*n),
            IdlValue::UnsignedLongLong(n) => Json::from(*n),
            IdlValue::Float(x)
            | IdlValue::UnrestrictedFloat(x)
            | IdlValue::Double(x)
            | IdlValue::UnrestrictedDouble(x) => Json::from(*x),
            IdlValue::DomString(s) | IdlValue::ByteString(s) | IdlValue::Enumeration(s) => {
                Json::String(s.clone())
            }
            IdlValue::Object(value) => value_to_json(value),
            IdlValue::Dictionary(members) => Json::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    use serde_json::Value as Json;
    match value {
        Value::Undefined | Value::Null | Value::Callable(_) => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(x) => Json::from(*x),
        Value::Str(s) => Json::String(s.clone()),
        Value::Array(elements) => Json::Array(elements.iter().map(value_to_json).collect()),
        Value::Object(props) => Json::Object(
            props
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}
