//! Encoder: domain values to tagged values.
//!
//! Values claimed by a registry entry are converted by the entry and, when
//! the profile emits envelopes, wrapped with the entry's tag. Everything else
//! is written in its natural JSON form, with nested values encoded the same
//! way.

use chrono::SecondsFormat;
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::path::{Segment, ValuePath};
use crate::profile::Profile;
use crate::registry::TypeRegistry;
use crate::tagged::TaggedValue;
use crate::value::GValue;

pub const DEFAULT_MAX_DEPTH: usize = 100;

pub struct Encoder<'r> {
    registry: &'r TypeRegistry,
    max_depth: usize,
    depth: usize,
    path: ValuePath,
}

impl<'r> Encoder<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
            path: ValuePath::new(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn profile(&self) -> &Profile {
        self.registry.profile()
    }

    pub fn registry(&self) -> &TypeRegistry {
        self.registry
    }

    /// Encode `value` and everything nested in it.
    pub fn encode(&mut self, value: &GValue) -> Result<TaggedValue> {
        if self.depth >= self.max_depth {
            return Err(Error::RecursionLimitExceeded {
                limit: self.max_depth,
                path: self.path.to_string(),
            });
        }
        self.depth += 1;
        let result = self.encode_value(value);
        self.depth -= 1;
        result
    }

    fn encode_value(&mut self, value: &GValue) -> Result<TaggedValue> {
        let registry = self.registry;
        match registry.lookup_for_encode(value) {
            Some(entry) => {
                let tag = entry.tag();
                self.path.push(Segment::Tag(tag.to_string()));
                let natural = entry.encode(value, self);
                self.path.pop();
                let natural = natural?;
                if self.profile().envelopes {
                    Ok(TaggedValue::tagged(tag, natural))
                } else {
                    Ok(natural)
                }
            }
            None => self.encode_natural(value),
        }
    }

    /// Natural JSON form of a value the registry does not claim: scalars and
    /// plain containers. Container elements go back through
    /// [`Encoder::encode`], so registered elements still get their tags.
    pub fn encode_natural(&mut self, value: &GValue) -> Result<TaggedValue> {
        match value {
            GValue::Null => Ok(TaggedValue::Null),
            GValue::Bool(b) => Ok(TaggedValue::Bool(*b)),
            GValue::String(s) => Ok(TaggedValue::String(s.clone())),
            GValue::Char(c) => Ok(TaggedValue::String(c.to_string())),
            GValue::Int32(n) => Ok(TaggedValue::int(i64::from(*n))),
            GValue::Int64(n) => Ok(TaggedValue::int(*n)),
            GValue::Byte(n) => Ok(TaggedValue::int(i64::from(*n))),
            GValue::Int16(n) => Ok(TaggedValue::int(i64::from(*n))),
            GValue::Float(f) => self.float(f64::from(*f), value),
            GValue::Double(f) => self.float(*f, value),
            GValue::BigInteger(n) => self.number_text(&n.to_string(), value),
            GValue::BigDecimal(d) => self.number_text(d.as_str(), value),
            GValue::Uuid(u) => Ok(TaggedValue::String(u.hyphenated().to_string())),
            GValue::Date(d) | GValue::Timestamp(d) => Ok(TaggedValue::int(d.timestamp_millis())),
            GValue::Instant(i) => Ok(TaggedValue::String(
                i.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            )),
            GValue::List(items) | GValue::Set(items) => self.encode_sequence(items),
            GValue::Map(entries) => self.encode_string_keyed(entries, value),
            other => Err(self.unsupported(other)),
        }
    }

    /// Encode each item, in order, into a plain sequence.
    pub fn encode_sequence(&mut self, items: &[GValue]) -> Result<TaggedValue> {
        let mut list = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            list.push(self.encode_index(index, item)?);
        }
        Ok(TaggedValue::List(list))
    }

    pub fn encode_field(&mut self, key: &str, value: &GValue) -> Result<TaggedValue> {
        self.scoped(Segment::Key(key.to_string()), |encoder| encoder.encode(value))
    }

    pub fn encode_index(&mut self, index: usize, value: &GValue) -> Result<TaggedValue> {
        self.scoped(Segment::Index(index), |encoder| encoder.encode(value))
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

    /// Non-finite numbers have no plain JSON form; typed entries write them
    /// as strings inside their envelope instead.
    fn float(&self, f: f64, value: &GValue) -> Result<TaggedValue> {
        TaggedValue::float(f).ok_or_else(|| self.unsupported(value))
    }

    fn number_text(&self, text: &str, value: &GValue) -> Result<TaggedValue> {
        TaggedValue::number_text(text).ok_or_else(|| self.unsupported(value))
    }

    fn encode_string_keyed(
        &mut self,
        entries: &[(GValue, GValue)],
        value: &GValue,
    ) -> Result<TaggedValue> {
        let mut map = IndexMap::with_capacity(entries.len());
        for (key, item) in entries {
            let GValue::String(key) = key else {
                return Err(self.unsupported_type(format!(
                    "{} with {} key",
                    value.type_name(),
                    key.type_name()
                )));
            };
            let encoded = self.encode_field(key, item)?;
            map.insert(key.clone(), encoded);
        }
        Ok(TaggedValue::Map(map))
    }

    pub fn unsupported(&self, value: &GValue) -> Error {
        self.unsupported_type(value.type_name())
    }

    pub fn unsupported_type(&self, type_name: impl Into<String>) -> Error {
        Error::UnsupportedValue {
            type_name: type_name.into(),
            path: self.path.to_string(),
        }
    }
}
