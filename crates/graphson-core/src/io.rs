//! JSON text in and out.
//!
//! [`GraphSONWriter`] and [`GraphSONReader`] bind a registry and its options
//! once and run the full pipeline: domain value, tagged value, JSON.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::config::GraphSONConfig;
use crate::decoder::{Decoder, DecoderOptions, IgnoredConfigKey};
use crate::encoder::{DEFAULT_MAX_DEPTH, Encoder};
use crate::error::Result;
use crate::profile::GraphSONVersion;
use crate::registry::TypeRegistry;
use crate::tagged::TaggedValue;
use crate::value::GValue;

#[derive(Debug, Clone)]
pub struct GraphSONWriter {
    registry: Arc<TypeRegistry>,
    max_depth: usize,
    pretty: bool,
}

impl GraphSONWriter {
    pub fn new(version: GraphSONVersion) -> Self {
        Self::with_registry(TypeRegistry::for_version(version))
    }

    /// Writer over a custom registry, e.g. one with extra registrations.
    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
        }
    }

    pub fn from_config(config: &GraphSONConfig) -> Self {
        Self::new(config.version)
            .with_max_depth(config.max_depth)
            .pretty(config.pretty)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn version(&self) -> GraphSONVersion {
        self.registry.version()
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn to_tagged(&self, value: &GValue) -> Result<TaggedValue> {
        Encoder::new(&self.registry)
            .with_max_depth(self.max_depth)
            .encode(value)
    }

    pub fn write_value(&self, value: &GValue) -> Result<Value> {
        Ok(self.to_tagged(value)?.into_json())
    }

    /// Encode `value` to JSON text.
    pub fn write_object(&self, value: &GValue) -> Result<String> {
        let tagged = self.to_tagged(value)?;
        if self.pretty {
            tagged.to_json_string_pretty()
        } else {
            tagged.to_json_string()
        }
    }
}

/// Result of [`GraphSONReader::read_detailed`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutcome {
    pub value: GValue,
    /// Strategy configuration keys dropped under the ignore policy.
    pub ignored_config_keys: Vec<IgnoredConfigKey>,
}

#[derive(Debug, Clone)]
pub struct GraphSONReader {
    registry: Arc<TypeRegistry>,
    options: DecoderOptions,
}

impl GraphSONReader {
    pub fn new(version: GraphSONVersion) -> Self {
        Self::with_registry(TypeRegistry::for_version(version))
    }

    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            options: DecoderOptions::default(),
        }
    }

    pub fn from_config(config: &GraphSONConfig) -> Self {
        Self::new(config.version).with_options(config.decoder_options())
    }

    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn version(&self) -> GraphSONVersion {
        self.registry.version()
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Parse JSON text into the tagged form without resolving tags.
    pub fn read_tagged(&self, text: &str) -> Result<TaggedValue> {
        TaggedValue::parse(
            text,
            self.registry.profile().envelopes,
            self.options.max_depth,
        )
    }

    pub fn read_value(&self, json: Value) -> Result<GValue> {
        let tagged = TaggedValue::from_json(
            json,
            self.registry.profile().envelopes,
            self.options.max_depth,
        )?;
        Decoder::with_options(&self.registry, self.options).decode(&tagged)
    }

    /// Decode JSON text to a domain value.
    pub fn read_object(&self, text: &str) -> Result<GValue> {
        Ok(self.read_detailed(text)?.value)
    }

    /// Read `text` as the natural form of `tag`. Untyped profiles carry no
    /// tags, so this is how a v1 reader recovers bytecode or strategies.
    pub fn read_as(&self, tag: &str, text: &str) -> Result<GValue> {
        let tagged = self.read_tagged(text)?;
        Decoder::with_options(&self.registry, self.options).decode_as(tag, &tagged)
    }

    /// Like [`GraphSONReader::read_object`], also reporting ignored
    /// strategy configuration keys.
    pub fn read_detailed(&self, text: &str) -> Result<ReadOutcome> {
        let tagged = self.read_tagged(text)?;
        let mut decoder = Decoder::with_options(&self.registry, self.options);
        let value = decoder.decode(&tagged)?;
        let ignored_config_keys = decoder.into_ignored_config_keys();
        if !ignored_config_keys.is_empty() {
            debug!(
                version = %self.version(),
                ignored = ignored_config_keys.len(),
                "decoded with ignored strategy configuration keys"
            );
        }
        Ok(ReadOutcome {
            value,
            ignored_config_keys,
        })
    }
}
