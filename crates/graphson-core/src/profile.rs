//! GraphSON version profiles.
//!
//! A profile is pure data: which version is active, whether registered types
//! are wrapped in `{"@type": ..., "@value": ...}` envelopes, and the MIME type
//! advertised for the format. Which tags exist for a version is decided by the
//! registry built for that version (see [`crate::registry`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wire-format version.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GraphSONVersion {
    /// Untyped: plain JSON, no envelopes.
    V1,
    /// Typed: envelopes for registered types, plain JSON collections.
    V2,
    /// Typed: adds typed collections and extended numeric/temporal tags.
    #[default]
    V3,
}

impl GraphSONVersion {
    pub const ALL: [GraphSONVersion; 3] =
        [GraphSONVersion::V1, GraphSONVersion::V2, GraphSONVersion::V3];

    /// The immutable profile for this version.
    pub fn profile(self) -> Profile {
        match self {
            GraphSONVersion::V1 => Profile {
                version: self,
                envelopes: false,
                mime_type: "application/json",
            },
            GraphSONVersion::V2 => Profile {
                version: self,
                envelopes: true,
                mime_type: "application/vnd.gremlin-v2.0+json",
            },
            GraphSONVersion::V3 => Profile {
                version: self,
                envelopes: true,
                mime_type: "application/vnd.gremlin-v3.0+json",
            },
        }
    }

    pub fn is_typed(self) -> bool {
        self.profile().envelopes
    }
}

impl fmt::Display for GraphSONVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphSONVersion::V1 => f.write_str("v1"),
            GraphSONVersion::V2 => f.write_str("v2"),
            GraphSONVersion::V3 => f.write_str("v3"),
        }
    }
}

impl FromStr for GraphSONVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "v1" | "1" | "1.0" => Ok(GraphSONVersion::V1),
            "v2" | "2" | "2.0" => Ok(GraphSONVersion::V2),
            "v3" | "3" | "3.0" | "latest" => Ok(GraphSONVersion::V3),
            _ => Err(format!(
                "Invalid GraphSON version '{}'. Valid values: v1, v2, v3, latest",
                s
            )),
        }
    }
}

/// Profile selected once per encoder/decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub version: GraphSONVersion,
    /// Whether registered types are wrapped in an envelope.
    pub envelopes: bool,
    pub mime_type: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("v1", GraphSONVersion::V1)]
    #[case("2", GraphSONVersion::V2)]
    #[case("V3", GraphSONVersion::V3)]
    #[case("latest", GraphSONVersion::V3)]
    fn test_parse_version(#[case] input: &str, #[case] expected: GraphSONVersion) {
        assert_eq!(input.parse::<GraphSONVersion>().unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid_version() {
        assert!("v4".parse::<GraphSONVersion>().is_err());
    }

    #[test]
    fn test_only_typed_profiles_emit_envelopes() {
        assert!(!GraphSONVersion::V1.profile().envelopes);
        assert!(GraphSONVersion::V2.profile().envelopes);
        assert!(GraphSONVersion::V3.profile().envelopes);
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(
            GraphSONVersion::V3.profile().mime_type,
            "application/vnd.gremlin-v3.0+json"
        );
        assert_eq!(GraphSONVersion::V1.profile().mime_type, "application/json");
    }
}
