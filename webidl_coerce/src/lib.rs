//! WebIDL value conversion
//!
//! Dispatch layer over `webidl_coerce_core`: maps IDL type names to the core
//! numeric coercions and adds the string, object, enumeration, nullable and
//! dictionary conversions. Enumerations and dictionaries are declared in
//! TOML and loaded into [`Definitions`].
//!
//! # Example
//! ```
//! use webidl_coerce::{Converter, Definitions, ExtendedAttributes, IdlType, IdlValue, Value};
//!
//! let definitions = Definitions::from_toml_str(
//!     r#"
//!     [enums.ScrollBehavior]
//!     values = ["auto", "instant", "smooth"]
//!
//!     [dictionaries.ScrollOptions.members.behavior]
//!     type = "ScrollBehavior"
//!     default = "auto"
//!     "#,
//! )
//! .unwrap();
//!
//! let converter = Converter::new(&definitions);
//! let ty: IdlType = "ScrollOptions".parse().unwrap();
//! let options = converter
//!     .convert(&Value::Null, &ty, &ExtendedAttributes::default())
//!     .unwrap();
//! assert_eq!(options.to_json(), serde_json::json!({ "behavior": "auto" }));
//!
//! let octet: IdlType = "octet".parse().unwrap();
//! let clamped = webidl_coerce::convert(&Value::Number(300.0), &octet, &ExtendedAttributes::clamp());
//! assert_eq!(clamped, Ok(IdlValue::Octet(255)));
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod string;
pub mod types;

pub use config::{DefaultValue, Definitions, DictionaryDefinition, EnumDefinition, MemberDefinition};
pub use dispatch::Converter;
pub use error::{ConfigError, ConfigResult};
pub use string::{number_to_string, to_boolean, to_byte_string, to_dom_string};
pub use types::{ExtendedAttributes, IdlType, IdlValue, TreatUndefinedAs};
pub use webidl_coerce_core::{IdlError, IdlResult, Value};

/// Convert a value to a builtin type
///
/// Named types always fail here since no definitions are registered.
pub fn convert(value: &Value, ty: &IdlType, attrs: &ExtendedAttributes) -> IdlResult<IdlValue> {
    Converter::new(&Definitions::default()).convert(value, ty, attrs)
}
