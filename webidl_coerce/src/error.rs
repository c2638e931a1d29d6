//! Definition loading errors
//!
//! Conversion failures use `IdlError` from the core crate; this module
//! covers problems with the type names and TOML definitions that drive the
//! dispatch.

use std::path::PathBuf;

use thiserror::Error;

/// Error raised while parsing type names or loading definitions
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed TOML or a field of the wrong shape
    #[error("invalid definitions: {0}")]
    Parse(#[from] toml::de::Error),

    /// Definitions file could not be read
    #[error("cannot read {}: {message}", .path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error text
        message: String,
    },

    /// Type name that is neither a builtin nor an identifier
    #[error("invalid type name {0:?}")]
    InvalidTypeName(String),

    /// Member type that names no builtin, enumeration or dictionary
    #[error("unknown type {type_name} for member {member} of {owner}")]
    UnknownType {
        /// Dictionary declaring the member
        owner: String,
        /// Member name
        member: String,
        /// Unresolved type name
        type_name: String,
    },

    /// Definition that parsed but is not internally consistent
    #[error("invalid definition {name}: {reason}")]
    InvalidDefinition {
        /// Enumeration or dictionary name
        name: String,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    /// Create an invalid definition error
    pub fn invalid_definition<S1: Into<String>, S2: Into<String>>(name: S1, reason: S2) -> Self {
        ConfigError::InvalidDefinition {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for definition loading
pub type ConfigResult<T> = Result<T, ConfigError>;
