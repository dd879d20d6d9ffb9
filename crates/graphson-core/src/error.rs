//! Error types for GraphSON encoding and decoding
//!
//! Every codec failure carries the tag involved (when there is one) and the
//! path of the offending value so callers can point at the exact spot.

use thiserror::Error;

use crate::profile::GraphSONVersion;

/// Result type alias for GraphSON operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for GraphSON operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown type tag '{tag}' for GraphSON {version} at {path}")]
    UnknownTypeTag {
        tag: String,
        version: GraphSONVersion,
        path: String,
    },

    #[error("malformed envelope at {path}: {reason}")]
    MalformedEnvelope { reason: String, path: String },

    #[error("type mismatch at {path}: {tag} expects {expected}, found {found}")]
    TypeMismatch {
        tag: String,
        expected: String,
        found: String,
        path: String,
    },

    #[error("unsupported value {type_name} at {path}")]
    UnsupportedValue { type_name: String, path: String },

    #[error("recursion limit of {limit} exceeded at {path}")]
    RecursionLimitExceeded { limit: usize, path: String },

    #[error("unknown configuration key '{key}' for {strategy} at {path}")]
    UnknownConfigurationKey {
        strategy: String,
        key: String,
        path: String,
    },

    #[error("registration error: {0}")]
    Registration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Path of the value the error refers to, if the error is a codec error.
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::UnknownTypeTag { path, .. }
            | Error::MalformedEnvelope { path, .. }
            | Error::TypeMismatch { path, .. }
            | Error::UnsupportedValue { path, .. }
            | Error::RecursionLimitExceeded { path, .. }
            | Error::UnknownConfigurationKey { path, .. } => Some(path),
            _ => None,
        }
    }
}
