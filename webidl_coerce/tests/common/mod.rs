//! Shared helpers for integration tests
#![allow(dead_code)]

use std::collections::BTreeMap;

use webidl_coerce::{Definitions, Value};

/// Enumeration and dictionary fixtures used across test files
pub const SCROLL_DEFINITIONS: &str = r#"
[enums.ScrollBehavior]
values = ["auto", "instant", "smooth"]

[dictionaries.ScrollOptions.members.top]
type = "unrestricted double"

[dictionaries.ScrollOptions.members.left]
type = "double"
default = 0

[dictionaries.ScrollOptions.members.behavior]
type = "ScrollBehavior"
default = "auto"

[dictionaries.ScrollOptions.members.count]
type = "octet"
nullable = true
attributes = { Clamp = true }

[dictionaries.Request.members.id]
type = "unsigned long"
required = true
attributes = { EnforceRange = true }

[dictionaries.Request.members.scroll]
type = "ScrollOptions"

[dictionaries.Request.members.label]
type = "ByteString"
default = "none"
"#;

pub fn scroll_definitions() -> Definitions {
    Definitions::from_toml_str(SCROLL_DEFINITIONS).unwrap()
}

/// Build an object value from key/value pairs
pub fn object<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Object(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    )
}
