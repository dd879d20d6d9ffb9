//! Codec configuration.
//!
//! Loaded from a TOML file with a `[graphson]` table:
//!
//! ```toml
//! [graphson]
//! version = "v3"
//! max-depth = 100
//! unknown-config-keys = "reject"
//! pretty = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decoder::{DecoderOptions, UnknownKeyPolicy};
use crate::encoder::DEFAULT_MAX_DEPTH;
use crate::error::{Error, Result};
use crate::profile::GraphSONVersion;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GraphSONConfig {
    pub version: GraphSONVersion,
    pub max_depth: usize,
    pub unknown_config_keys: UnknownKeyPolicy,
    /// Pretty-print written JSON.
    pub pretty: bool,
}

impl Default for GraphSONConfig {
    fn default() -> Self {
        Self {
            version: GraphSONVersion::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            unknown_config_keys: UnknownKeyPolicy::default(),
            pretty: false,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    graphson: GraphSONConfig,
}

impl GraphSONConfig {
    /// Parse TOML text; a missing `[graphson]` table yields the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.graphson.validate()?;
        Ok(file.graphson)
    }

    /// Load configuration from a file path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::Config("max-depth must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn decoder_options(&self) -> DecoderOptions {
        DecoderOptions {
            max_depth: self.max_depth,
            unknown_config_keys: self.unknown_config_keys,
        }
    }
}
