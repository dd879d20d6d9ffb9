//! Tagged value model.
//!
//! [`TaggedValue`] is the intermediate form between domain values and JSON
//! text: a JSON-like value that may additionally be a tagged composite. Typed
//! profiles write a composite as `{"@type": tag, "@value": value}`.

use indexmap::IndexMap;
use serde::Deserialize;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Number, Value};
use std::fmt;

use crate::error::{Error, Result};
use crate::path::{Segment, ValuePath};

/// Envelope key holding the type tag.
pub const TYPE_KEY: &str = "@type";
/// Envelope key holding the tagged value.
pub const VALUE_KEY: &str = "@value";

/// Most JSON levels one value level may span: envelope object, `@value`
/// body, a list inside it and a row inside that (bytecode instructions).
pub const JSON_LEVELS_PER_VALUE: usize = 4;

/// JSON nesting allowed for a value depth of `max_depth`. The extra level
/// holds the plain leaves of the deepest value, e.g. an operator name.
pub fn json_depth_limit(max_depth: usize) -> usize {
    max_depth
        .saturating_mul(JSON_LEVELS_PER_VALUE)
        .saturating_add(1)
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaggedValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<TaggedValue>),
    /// Insertion-ordered mapping.
    Map(IndexMap<String, TaggedValue>),
    /// A value whose shape is determined by its tag.
    Tagged {
        tag: String,
        value: Box<TaggedValue>,
    },
}

impl TaggedValue {
    pub fn tagged(tag: impl Into<String>, value: TaggedValue) -> Self {
        TaggedValue::Tagged {
            tag: tag.into(),
            value: Box::new(value),
        }
    }

    pub fn string(s: impl Into<String>) -> Self {
        TaggedValue::String(s.into())
    }

    pub fn int(n: i64) -> Self {
        TaggedValue::Number(Number::from(n))
    }

    /// Number from exact decimal text, e.g. a big integer or decimal.
    pub fn number_text(text: &str) -> Option<Self> {
        serde_json::from_str::<Number>(text)
            .ok()
            .map(TaggedValue::Number)
    }

    pub fn float(f: f64) -> Option<Self> {
        Number::from_f64(f).map(TaggedValue::Number)
    }

    /// Short shape name used in mismatch errors.
    pub fn describe(&self) -> String {
        match self {
            TaggedValue::Null => "null".to_string(),
            TaggedValue::Bool(_) => "boolean".to_string(),
            TaggedValue::Number(_) => "number".to_string(),
            TaggedValue::String(_) => "string".to_string(),
            TaggedValue::List(_) => "sequence".to_string(),
            TaggedValue::Map(_) => "mapping".to_string(),
            TaggedValue::Tagged { tag, .. } => format!("tagged {}", tag),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TaggedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            TaggedValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[TaggedValue]> {
        match self {
            TaggedValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, TaggedValue>> {
        match self {
            TaggedValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            TaggedValue::Tagged { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value`, writing composites as envelopes.
    pub fn into_json(self) -> Value {
        match self {
            TaggedValue::Null => Value::Null,
            TaggedValue::Bool(b) => Value::Bool(b),
            TaggedValue::Number(n) => Value::Number(n),
            TaggedValue::String(s) => Value::String(s),
            TaggedValue::List(items) => {
                Value::Array(items.into_iter().map(TaggedValue::into_json).collect())
            }
            TaggedValue::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into_json()))
                    .collect(),
            ),
            TaggedValue::Tagged { tag, value } => {
                let mut envelope = serde_json::Map::new();
                envelope.insert(TYPE_KEY.to_string(), Value::String(tag));
                envelope.insert(VALUE_KEY.to_string(), value.into_json());
                Value::Object(envelope)
            }
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON value. With `envelopes` set, objects carrying `@type` or
    /// `@value` must be well-formed envelopes and become tagged composites;
    /// without it every object is a plain mapping.
    ///
    /// `max_depth` is a value depth, as counted by the encoder and decoder.
    /// JSON nesting is bounded by [`json_depth_limit`] of it.
    pub fn from_json(value: Value, envelopes: bool, max_depth: usize) -> Result<Self> {
        JsonReader {
            envelopes,
            max_depth,
            limit: json_depth_limit(max_depth),
            depth: 0,
            path: ValuePath::new(),
        }
        .read(value)
    }

    /// Parse JSON text, see [`TaggedValue::from_json`].
    ///
    /// Nesting is checked on the raw text before parsing, so over-deep input
    /// fails with [`Error::RecursionLimitExceeded`] whatever the parser's own
    /// limits.
    pub fn parse(text: &str, envelopes: bool, max_depth: usize) -> Result<Self> {
        if nesting_exceeds(text, json_depth_limit(max_depth)) {
            return Err(Error::RecursionLimitExceeded {
                limit: max_depth,
                path: ValuePath::new().to_string(),
            });
        }
        let mut deserializer = serde_json::Deserializer::from_str(text);
        deserializer.disable_recursion_limit();
        let value = Value::deserialize(&mut deserializer)?;
        deserializer.end()?;
        Self::from_json(value, envelopes, max_depth)
    }
}

impl From<&str> for TaggedValue {
    fn from(s: &str) -> Self {
        TaggedValue::String(s.to_string())
    }
}

impl From<bool> for TaggedValue {
    fn from(b: bool) -> Self {
        TaggedValue::Bool(b)
    }
}

impl From<i64> for TaggedValue {
    fn from(n: i64) -> Self {
        TaggedValue::int(n)
    }
}

impl Serialize for TaggedValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TaggedValue::Null => serializer.serialize_unit(),
            TaggedValue::Bool(b) => serializer.serialize_bool(*b),
            TaggedValue::Number(n) => n.serialize(serializer),
            TaggedValue::String(s) => serializer.serialize_str(s),
            TaggedValue::List(items) => serializer.collect_seq(items),
            TaggedValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            TaggedValue::Tagged { tag, value } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(TYPE_KEY, tag)?;
                map.serialize_entry(VALUE_KEY, value)?;
                map.end()
            }
        }
    }
}

impl fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

/// Whether arrays and objects in `text` nest deeper than `limit`. Brackets
/// inside strings are skipped.
fn nesting_exceeds(text: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

struct JsonReader {
    envelopes: bool,
    /// Value depth reported in errors.
    max_depth: usize,
    /// JSON nesting actually enforced.
    limit: usize,
    depth: usize,
    path: ValuePath,
}

impl JsonReader {
    fn read(&mut self, value: Value) -> Result<TaggedValue> {
        if self.depth >= self.limit {
            return Err(Error::RecursionLimitExceeded {
                limit: self.max_depth,
                path: self.path.to_string(),
            });
        }
        self.depth += 1;
        let result = self.read_inner(value);
        self.depth -= 1;
        result
    }

    fn at<T>(&mut self, segment: Segment, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.path.push(segment);
        let result = f(self);
        self.path.pop();
        result
    }

    fn read_inner(&mut self, value: Value) -> Result<TaggedValue> {
        match value {
            Value::Null => Ok(TaggedValue::Null),
            Value::Bool(b) => Ok(TaggedValue::Bool(b)),
            Value::Number(n) => Ok(TaggedValue::Number(n)),
            Value::String(s) => Ok(TaggedValue::String(s)),
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    list.push(self.at(Segment::Index(index), |r| r.read(item))?);
                }
                Ok(TaggedValue::List(list))
            }
            Value::Object(object) => {
                if self.envelopes
                    && (object.contains_key(TYPE_KEY) || object.contains_key(VALUE_KEY))
                {
                    return self.read_envelope(object);
                }
                let mut map = IndexMap::with_capacity(object.len());
                for (key, item) in object {
                    let decoded = self.at(Segment::Key(key.clone()), |r| r.read(item))?;
                    map.insert(key, decoded);
                }
                Ok(TaggedValue::Map(map))
            }
        }
    }

    fn read_envelope(&mut self, mut object: serde_json::Map<String, Value>) -> Result<TaggedValue> {
        let tag = object.remove(TYPE_KEY);
        let value = object.remove(VALUE_KEY);
        if let Some(extra) = object.keys().next() {
            return Err(self.malformed(format!(
                "unexpected key '{}' beside {} and {}",
                extra, TYPE_KEY, VALUE_KEY
            )));
        }
        match (tag, value) {
            (Some(Value::String(tag)), Some(value)) => {
                let inner = self.at(Segment::Tag(tag.clone()), |r| r.read(value))?;
                Ok(TaggedValue::tagged(tag, inner))
            }
            (Some(Value::String(tag)), None) => Err(self.malformed(format!(
                "{} '{}' without {}",
                TYPE_KEY, tag, VALUE_KEY
            ))),
            (Some(other), _) => Err(self.malformed(format!(
                "{} must be a string, found {}",
                TYPE_KEY, other
            ))),
            (None, _) => Err(self.malformed(format!("{} without {}", VALUE_KEY, TYPE_KEY))),
        }
    }

    fn malformed(&self, reason: String) -> Error {
        Error::MalformedEnvelope {
            reason,
            path: self.path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_is_read_as_tagged_composite() {
        let value = json!({"@type": "g:Int32", "@value": 5});
        let tagged = TaggedValue::from_json(value, true, 16).unwrap();
        assert_eq!(tagged, TaggedValue::tagged("g:Int32", TaggedValue::int(5)));
    }

    #[test]
    fn test_envelope_keys_are_plain_without_envelopes() {
        let value = json!({"@type": "g:Int32", "@value": 5});
        let tagged = TaggedValue::from_json(value, false, 16).unwrap();
        let map = tagged.as_map().unwrap();
        assert_eq!(map.get("@type"), Some(&TaggedValue::from("g:Int32")));
    }

    #[test]
    fn test_tag_without_value_is_malformed() {
        let err = TaggedValue::from_json(json!({"@type": "g:Int32"}), true, 16).unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope { .. }));
    }

    #[test]
    fn test_value_without_tag_is_malformed() {
        let err = TaggedValue::from_json(json!([{"@value": 1}]), true, 16).unwrap_err();
        match err {
            Error::MalformedEnvelope { path, .. } => assert_eq!(path, "$[0]"),
            other => panic!("Expected MalformedEnvelope, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_key_beside_envelope_is_malformed() {
        let value = json!({"@type": "g:Int32", "@value": 1, "extra": true});
        let err = TaggedValue::from_json(value, true, 16).unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope { .. }));
    }

    #[test]
    fn test_non_string_tag_is_malformed() {
        let err = TaggedValue::from_json(json!({"@type": 3, "@value": 1}), true, 16).unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope { .. }));
    }

    #[test]
    fn test_depth_limit() {
        // One value level admits four JSON levels plus a leaf.
        let err = TaggedValue::from_json(json!([[[[[1]]]]]), true, 1).unwrap_err();
        assert!(matches!(
            err,
            Error::RecursionLimitExceeded { limit: 1, .. }
        ));
        assert!(TaggedValue::from_json(json!([[[[1]]]]), true, 1).is_ok());
    }

    #[test]
    fn test_parse_checks_nesting_before_parser_limits() {
        let deep = format!("{}{}", "[".repeat(1000), "]".repeat(1000));
        match TaggedValue::parse(&deep, true, 100).unwrap_err() {
            Error::RecursionLimitExceeded { limit, path } => {
                assert_eq!(limit, 100);
                assert_eq!(path, "$");
            }
            other => panic!("Expected RecursionLimitExceeded, got {:?}", other),
        }

        let nested = format!("{}{}", "[".repeat(200), "]".repeat(200));
        assert!(TaggedValue::parse(&nested, true, 100).is_ok());
    }

    #[test]
    fn test_nesting_scan_skips_brackets_in_strings() {
        assert!(!nesting_exceeds(r#"["[[[[", "\"{{{{"]"#, 1));
        assert!(nesting_exceeds("[[1]]", 1));
    }

    #[test]
    fn test_serialize_preserves_map_order_and_envelope_shape() {
        let mut map = IndexMap::new();
        map.insert("zeta".to_string(), TaggedValue::int(1));
        map.insert("alpha".to_string(), TaggedValue::Null);
        let tagged = TaggedValue::tagged("g:Custom", TaggedValue::Map(map));
        assert_eq!(
            tagged.to_json_string().unwrap(),
            r#"{"@type":"g:Custom","@value":{"zeta":1,"alpha":null}}"#
        );
    }

    #[test]
    fn test_into_json_matches_serialized_text() {
        let tagged = TaggedValue::tagged(
            "g:List",
            TaggedValue::List(vec![TaggedValue::from("a"), TaggedValue::Bool(true)]),
        );
        let text = tagged.to_json_string().unwrap();
        assert_eq!(serde_json::to_string(&tagged.into_json()).unwrap(), text);
    }

    #[test]
    fn test_big_number_text_is_exact() {
        let n = TaggedValue::number_text("123456789012345678901234567890").unwrap();
        assert_eq!(n.to_string(), "123456789012345678901234567890");
    }
}
