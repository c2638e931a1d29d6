//! Enumeration and dictionary definitions
//!
//! Definitions are declared in TOML and validated after parsing:
//!
//! ```toml
//! [enums.ScrollBehavior]
//! values = ["auto", "instant", "smooth"]
//!
//! [dictionaries.ScrollOptions.members.behavior]
//! type = "ScrollBehavior"
//! default = "auto"
//!
//! [dictionaries.ScrollOptions.members.count]
//! type = "octet"
//! nullable = true
//! attributes = { Clamp = true }
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::Deserialize;
use webidl_coerce_core::Value;

use crate::dispatch::Converter;
use crate::error::{ConfigError, ConfigResult};
use crate::types::{ExtendedAttributes, IdlType};

/// Registry of named enumerations and dictionaries
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Definitions {
    #[serde(default)]
    enums: BTreeMap<String, EnumDefinition>,
    #[serde(default)]
    dictionaries: BTreeMap<String, DictionaryDefinition>,
}

/// Set of allowed strings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumDefinition {
    pub values: Vec<String>,
}

impl EnumDefinition {
    pub fn contains(&self, s: &str) -> bool {
        self.values.iter().any(|v| v == s)
    }
}

/// Composite type whose members are converted one by one
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DictionaryDefinition {
    /// Members, kept in lexicographic order
    #[serde(default)]
    pub members: BTreeMap<String, MemberDefinition>,
}

impl DictionaryDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member
    pub fn member(mut self, name: impl Into<String>, member: MemberDefinition) -> Self {
        self.members.insert(name.into(), member);
        self
    }
}

/// One dictionary member
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemberDefinition {
    #[serde(rename = "type")]
    pub ty: IdlType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<DefaultValue>,
    #[serde(default)]
    pub attributes: ExtendedAttributes,
}

impl MemberDefinition {
    pub fn new(ty: IdlType) -> Self {
        MemberDefinition {
            ty,
            nullable: false,
            required: false,
            default: None,
            attributes: ExtendedAttributes::default(),
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_attributes(mut self, attributes: ExtendedAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Declared default for an absent member
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Null,
}

impl DefaultValue {
    /// Host value the default stands for
    pub fn to_value(&self) -> Value {
        match self {
            DefaultValue::Bool(b) => Value::Bool(*b),
            DefaultValue::Integer(n) => Value::Number(*n as f64),
            DefaultValue::Number(x) => Value::Number(*x),
            DefaultValue::String(s) => Value::Str(s.clone()),
            DefaultValue::Null => Value::Null,
        }
    }
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate definitions from TOML
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let definitions: Definitions = toml::from_str(source)?;
        definitions.validate()?;
        tracing::debug!(
            enums = definitions.enums.len(),
            dictionaries = definitions.dictionaries.len(),
            "loaded definitions"
        );
        Ok(definitions)
    }

    /// Read, parse and validate a definitions file
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source)
    }

    /// Register an enumeration
    pub fn add_enum<I, S>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.enums.insert(name.into(), EnumDefinition { values });
        self
    }

    /// Register a dictionary
    pub fn add_dictionary(
        &mut self,
        name: impl Into<String>,
        dictionary: DictionaryDefinition,
    ) -> &mut Self {
        self.dictionaries.insert(name.into(), dictionary);
        self
    }

    pub fn enumeration(&self, name: &str) -> Option<&EnumDefinition> {
        self.enums.get(name)
    }

    pub fn dictionary(&self, name: &str) -> Option<&DictionaryDefinition> {
        self.dictionaries.get(name)
    }

    /// Check the registry for internal consistency
    ///
    /// Enumerations must be non-empty and duplicate-free, names must be
    /// unique across enumerations and dictionaries and must not shadow a
    /// builtin type, every member type must resolve, defaults must not lead
    /// back into the dictionary that declares them, and every declared
    /// default must convert under its member's type.
    pub fn validate(&self) -> ConfigResult<()> {
        for name in self.enums.keys().chain(self.dictionaries.keys()) {
            if IdlType::builtin(name).is_some() {
                return Err(ConfigError::invalid_definition(
                    name,
                    "name is reserved for a builtin type",
                ));
            }
        }

        for (name, definition) in &self.enums {
            if definition.values.is_empty() {
                return Err(ConfigError::invalid_definition(name, "enumeration has no values"));
            }
            let mut seen = BTreeSet::new();
            for value in &definition.values {
                if !seen.insert(value.as_str()) {
                    return Err(ConfigError::invalid_definition(
                        name,
                        format!("duplicate value {:?}", value),
                    ));
                }
            }
            if self.dictionaries.contains_key(name) {
                return Err(ConfigError::invalid_definition(
                    name,
                    "declared as both enumeration and dictionary",
                ));
            }
        }

        let mut finished = BTreeSet::new();
        for name in self.dictionaries.keys() {
            if let Some(cycle) = self.default_cycle(name, &mut Vec::new(), &mut finished) {
                return Err(ConfigError::invalid_definition(
                    cycle,
                    "member defaults refer back to this dictionary",
                ));
            }
        }

        let converter = Converter::new(self);
        for (owner, dictionary) in &self.dictionaries {
            for (member_name, member) in &dictionary.members {
                if let Some(type_name) = member.ty.as_named() {
                    if !self.enums.contains_key(type_name)
                        && !self.dictionaries.contains_key(type_name)
                    {
                        return Err(ConfigError::UnknownType {
                            owner: owner.clone(),
                            member: member_name.clone(),
                            type_name: type_name.to_string(),
                        });
                    }
                }

                let Some(default) = &member.default else {
                    continue;
                };
                if member.required {
                    return Err(ConfigError::invalid_definition(
                        owner,
                        format!("required member {} cannot have a default", member_name),
                    ));
                }
                if let Err(err) = converter.convert_member(&default.to_value(), member) {
                    return Err(ConfigError::invalid_definition(
                        owner,
                        format!("default for {} does not convert: {}", member_name, err),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Depth-first walk over non-nullable dictionary members that carry a
    /// default. Populating an absent member converts its default, so a
    /// cycle on this walk never terminates. Returns the dictionary that
    /// closes the cycle.
    fn default_cycle<'s>(
        &'s self,
        name: &'s str,
        path: &mut Vec<&'s str>,
        finished: &mut BTreeSet<&'s str>,
    ) -> Option<&'s str> {
        if path.contains(&name) {
            return Some(name);
        }
        if finished.contains(name) {
            return None;
        }
        let dictionary = self.dictionaries.get(name)?;
        path.push(name);
        for member in dictionary.members.values() {
            if member.nullable || member.default.is_none() {
                continue;
            }
            if let Some(target) = member.ty.as_named() {
                if let Some(cycle) = self.default_cycle(target, path, finished) {
                    return Some(cycle);
                }
            }
        }
        path.pop();
        finished.insert(name);
        None
    }
}
