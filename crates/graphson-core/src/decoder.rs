//! Decoder: tagged values to domain values.
//!
//! Tagged composites are resolved through the registry; untagged mappings and
//! sequences become plain [`GValue::Map`] and [`GValue::List`] values.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::warn;

use crate::encoder::DEFAULT_MAX_DEPTH;
use crate::error::{Error, Result};
use crate::path::{Segment, ValuePath};
use crate::profile::Profile;
use crate::registry::TypeRegistry;
use crate::tagged::TaggedValue;
use crate::value::{BigDecimal, GValue};

/// What to do with a strategy configuration key the strategy does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Drop the key, log a warning and record it on the decoder.
    #[default]
    Ignore,
    /// Fail with [`Error::UnknownConfigurationKey`].
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderOptions {
    pub max_depth: usize,
    pub unknown_config_keys: UnknownKeyPolicy,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            unknown_config_keys: UnknownKeyPolicy::default(),
        }
    }
}

/// A configuration key dropped under [`UnknownKeyPolicy::Ignore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredConfigKey {
    pub strategy: String,
    pub key: String,
    pub path: String,
}

pub struct Decoder<'r> {
    registry: &'r TypeRegistry,
    options: DecoderOptions,
    depth: usize,
    path: ValuePath,
    ignored: Vec<IgnoredConfigKey>,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self::with_options(registry, DecoderOptions::default())
    }

    pub fn with_options(registry: &'r TypeRegistry, options: DecoderOptions) -> Self {
        Self {
            registry,
            options,
            depth: 0,
            path: ValuePath::new(),
            ignored: Vec::new(),
        }
    }

    pub fn profile(&self) -> &Profile {
        self.registry.profile()
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Keys dropped so far under the ignore policy.
    pub fn ignored_config_keys(&self) -> &[IgnoredConfigKey] {
        &self.ignored
    }

    pub fn into_ignored_config_keys(self) -> Vec<IgnoredConfigKey> {
        self.ignored
    }

    /// Decode `value` and everything nested in it.
    pub fn decode(&mut self, value: &TaggedValue) -> Result<GValue> {
        if self.depth >= self.options.max_depth {
            return Err(Error::RecursionLimitExceeded {
                limit: self.options.max_depth,
                path: self.path.to_string(),
            });
        }
        self.depth += 1;
        let result = self.decode_value(value);
        self.depth -= 1;
        result
    }

    fn decode_value(&mut self, value: &TaggedValue) -> Result<GValue> {
        match value {
            TaggedValue::Null => Ok(GValue::Null),
            TaggedValue::Bool(b) => Ok(GValue::Bool(*b)),
            TaggedValue::Number(n) => Ok(untyped_number(n)),
            TaggedValue::String(s) => Ok(GValue::String(s.clone())),
            TaggedValue::List(items) => Ok(GValue::List(self.decode_sequence(items)?)),
            TaggedValue::Map(entries) => {
                let mut map = Vec::with_capacity(entries.len());
                for (key, item) in entries {
                    let decoded = self.decode_field(key, item)?;
                    map.push((GValue::String(key.clone()), decoded));
                }
                Ok(GValue::Map(map))
            }
            TaggedValue::Tagged { tag, value } => self.decode_as(tag, value),
        }
    }

    /// Apply the entry registered for `tag` to an inner (unwrapped) value.
    /// Untyped callers use this to read a natural form as a specific type.
    pub fn decode_as(&mut self, tag: &str, inner: &TaggedValue) -> Result<GValue> {
        let registry = self.registry;
        let entry = registry
            .lookup_for_decode(tag)
            .ok_or_else(|| Error::UnknownTypeTag {
                tag: tag.to_string(),
                version: registry.version(),
                path: self.path.to_string(),
            })?;
        self.path.push(Segment::Tag(tag.to_string()));
        let result = entry.decode(inner, self);
        self.path.pop();
        result
    }

    pub fn decode_sequence(&mut self, items: &[TaggedValue]) -> Result<Vec<GValue>> {
        let mut list = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            list.push(self.decode_index(index, item)?);
        }
        Ok(list)
    }

    pub fn decode_field(&mut self, key: &str, value: &TaggedValue) -> Result<GValue> {
        self.scoped(Segment::Key(key.to_string()), |decoder| decoder.decode(value))
    }

    pub fn decode_index(&mut self, index: usize, value: &TaggedValue) -> Result<GValue> {
        self.scoped(Segment::Index(index), |decoder| decoder.decode(value))
    }

    /// Run `f` with `segment` appended to the current path.
    pub fn scoped<T>(
        &mut self,
        segment: Segment,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    /// `TypeMismatch` for the current position.
    pub fn mismatch(&self, tag: &str, expected: &str, found: &TaggedValue) -> Error {
        self.mismatch_found(tag, expected, found.describe())
    }

    pub fn mismatch_found(&self, tag: &str, expected: &str, found: impl Into<String>) -> Error {
        Error::TypeMismatch {
            tag: tag.to_string(),
            expected: expected.to_string(),
            found: found.into(),
            path: self.path.to_string(),
        }
    }

    /// Apply the unknown-key policy to `key` of `strategy`.
    pub(crate) fn unknown_config_key(&mut self, strategy: &str, key: &str) -> Result<()> {
        let path = self.path.to_string();
        match self.options.unknown_config_keys {
            UnknownKeyPolicy::Reject => Err(Error::UnknownConfigurationKey {
                strategy: strategy.to_string(),
                key: key.to_string(),
                path,
            }),
            UnknownKeyPolicy::Ignore => {
                warn!(strategy, key, %path, "ignoring unknown strategy configuration key");
                self.ignored.push(IgnoredConfigKey {
                    strategy: strategy.to_string(),
                    key: key.to_string(),
                    path,
                });
                Ok(())
            }
        }
    }
}

/// Number without a tag: Int32 when it fits, then Int64, then BigInteger;
/// anything else is a Double.
fn untyped_number(n: &Number) -> GValue {
    if let Some(i) = n.as_i64() {
        return match i32::try_from(i) {
            Ok(small) => GValue::Int32(small),
            Err(_) => GValue::Int64(i),
        };
    }
    if let Ok(big) = n.to_string().parse::<i128>() {
        return GValue::BigInteger(big);
    }
    match n.as_f64() {
        Some(f) => GValue::Double(f),
        None => GValue::BigDecimal(BigDecimal::from_number(n)),
    }
}
