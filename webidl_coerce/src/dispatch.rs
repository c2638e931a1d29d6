//! Conversion dispatch
//!
//! Maps an [`IdlType`] to the matching coercion and wraps the result in an
//! [`IdlValue`]. Named types are resolved against a [`Definitions`]
//! registry.

use std::collections::BTreeMap;

use webidl_coerce_core::{
    convert_float, to_byte, to_long, to_long_long, to_octet, to_short, to_unsigned_long,
    to_unsigned_long_long, to_unsigned_short, IdlError, IdlResult, IntegerKind, Value,
};

use crate::config::{Definitions, MemberDefinition};
use crate::string::{to_boolean, to_byte_string, to_dom_string};
use crate::types::{ExtendedAttributes, IdlType, IdlValue, TreatUndefinedAs};

/// Stateless converter over a definitions registry
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    definitions: &'a Definitions,
}

impl<'a> Converter<'a> {
    pub fn new(definitions: &'a Definitions) -> Self {
        Converter { definitions }
    }

    pub fn definitions(&self) -> &'a Definitions {
        self.definitions
    }

    /// Convert `value` to `ty` under `attrs`
    pub fn convert(
        &self,
        value: &Value,
        ty: &IdlType,
        attrs: &ExtendedAttributes,
    ) -> IdlResult<IdlValue> {
        let result = self.dispatch(value, ty, attrs);
        if let Err(err) = &result {
            tracing::debug!(target_type = %ty, input = %value, error = %err, "conversion failed");
        }
        result
    }

    fn dispatch(
        &self,
        value: &Value,
        ty: &IdlType,
        attrs: &ExtendedAttributes,
    ) -> IdlResult<IdlValue> {
        match ty {
            IdlType::Any => Ok(self.to_any(value)),
            IdlType::Boolean => Ok(IdlValue::Boolean(to_boolean(value))),
            IdlType::Integer(kind) => {
                let policy = attrs.integer_policy();
                let converted = match kind {
                    IntegerKind::Byte => IdlValue::Byte(to_byte(value, policy)?),
                    IntegerKind::Octet => IdlValue::Octet(to_octet(value, policy)?),
                    IntegerKind::Short => IdlValue::Short(to_short(value, policy)?),
                    IntegerKind::UnsignedShort => {
                        IdlValue::UnsignedShort(to_unsigned_short(value, policy)?)
                    }
                    IntegerKind::Long => IdlValue::Long(to_long(value, policy)?),
                    IntegerKind::UnsignedLong => {
                        IdlValue::UnsignedLong(to_unsigned_long(value, policy)?)
                    }
                    IntegerKind::LongLong => IdlValue::LongLong(to_long_long(value, policy)?),
                    IntegerKind::UnsignedLongLong => {
                        IdlValue::UnsignedLongLong(to_unsigned_long_long(value, policy)?)
                    }
                };
                Ok(converted)
            }
            IdlType::Float(kind) => Ok(IdlValue::from_float(*kind, convert_float(value, *kind)?)),
            IdlType::DomString => Ok(IdlValue::DomString(to_dom_string(value))),
            IdlType::ByteString => Ok(IdlValue::ByteString(to_byte_string(value)?)),
            IdlType::Object => self.to_object(value),
            IdlType::Named(name) => {
                if self.definitions.enumeration(name).is_some() {
                    self.to_enumeration(value, name)
                } else if self.definitions.dictionary(name).is_some() {
                    self.to_dictionary(value, name)
                } else {
                    Err(IdlError::conversion_error(format!("unknown type {}", name)))
                }
            }
        }
    }

    /// `any`: pass the value through under its natural kind
    pub fn to_any(&self, value: &Value) -> IdlValue {
        match value {
            Value::Undefined => IdlValue::Undefined,
            Value::Null => IdlValue::Null,
            Value::Bool(b) => IdlValue::Boolean(*b),
            Value::Number(x) => IdlValue::UnrestrictedDouble(*x),
            Value::Str(s) => IdlValue::DomString(s.clone()),
            Value::Array(_) | Value::Object(_) | Value::Callable(_) => {
                IdlValue::Object(value.clone())
            }
        }
    }

    pub fn to_object(&self, value: &Value) -> IdlResult<IdlValue> {
        if value.is_object() {
            Ok(IdlValue::Object(value.clone()))
        } else {
            Err(IdlError::conversion_error(format!(
                "cannot convert {} to object",
                value.type_name()
            )))
        }
    }

    /// String-coerce `value` and check it against the enumeration `name`
    pub fn to_enumeration(&self, value: &Value, name: &str) -> IdlResult<IdlValue> {
        let definition = self
            .definitions
            .enumeration(name)
            .ok_or_else(|| IdlError::conversion_error(format!("unknown enumeration {}", name)))?;
        let s = to_dom_string(value);
        if definition.contains(&s) {
            Ok(IdlValue::Enumeration(s))
        } else {
            Err(IdlError::conversion_error(format!(
                "{:?} is not a value of enumeration {}",
                s, name
            )))
        }
    }

    /// Nullable wrapper around `inner`
    pub fn to_nullable(
        &self,
        value: &Value,
        inner: &IdlType,
        attrs: &ExtendedAttributes,
    ) -> IdlResult<IdlValue> {
        match (value, attrs.treat_undefined_as) {
            (Value::Undefined, Some(TreatUndefinedAs::EmptyString)) => {
                return Ok(IdlValue::DomString(String::new()))
            }
            (Value::Undefined, Some(TreatUndefinedAs::Null)) => return Ok(IdlValue::Null),
            _ => {}
        }
        if attrs.treat_non_callable_as_null && !value.is_callable() {
            return Ok(IdlValue::Null);
        }
        if value.is_nullish() {
            return Ok(IdlValue::Null);
        }
        self.convert(value, inner, attrs)
    }

    /// Populate the dictionary `name` from the properties of `value`
    ///
    /// Members are visited in lexicographic order. A member counts as present
    /// when the key exists, even if it maps to `undefined`. Defaults are
    /// expected to have passed [`Definitions::validate`], which rejects
    /// defaults that cycle back into their own dictionary.
    pub fn to_dictionary(&self, value: &Value, name: &str) -> IdlResult<IdlValue> {
        let definition = self
            .definitions
            .dictionary(name)
            .ok_or_else(|| IdlError::conversion_error(format!("unknown dictionary {}", name)))?;
        if !(value.is_nullish() || value.is_object()) {
            return Err(IdlError::conversion_error(format!(
                "cannot convert {} to dictionary {}",
                value.type_name(),
                name
            )));
        }

        let mut members = BTreeMap::new();
        for (key, member) in &definition.members {
            if let Some(present) = value.get(key) {
                members.insert(key.clone(), self.convert_member(present, member)?);
            } else if let Some(default) = &member.default {
                tracing::trace!(dictionary = name, member = %key, "applying default");
                members.insert(key.clone(), self.convert_member(&default.to_value(), member)?);
            } else if member.required {
                return Err(IdlError::conversion_error(format!(
                    "required member {} of {} is missing",
                    key, name
                )));
            } else {
                tracing::trace!(dictionary = name, member = %key, "member absent");
            }
        }
        Ok(IdlValue::Dictionary(members))
    }

    /// Convert one dictionary member value under its declaration
    pub fn convert_member(&self, value: &Value, member: &MemberDefinition) -> IdlResult<IdlValue> {
        if member.nullable {
            self.to_nullable(value, &member.ty, &member.attributes)
        } else {
            self.convert(value, &member.ty, &member.attributes)
        }
    }
}
