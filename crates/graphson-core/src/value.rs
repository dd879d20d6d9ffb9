//! Domain values.
//!
//! [`GValue`] is the closed set of values the codec knows how to carry:
//! scalars, collections, graph elements, traversal program objects and
//! opaque values owned by user registrations.

use chrono::{DateTime, Utc};
use serde_json::Number;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::process::enums::{EnumKind, TraversalEnum};
use crate::process::{Binding, Bytecode, Lambda, Predicate, Strategy, Traverser};
use crate::structure::{Edge, Property, Vertex, VertexProperty};

#[derive(Debug, Clone, PartialEq)]
pub enum GValue {
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Byte(i8),
    Int16(i16),
    BigInteger(i128),
    BigDecimal(BigDecimal),
    Char(char),
    String(String),
    Uuid(Uuid),
    /// Written as epoch milliseconds. Anything finer is truncated on encode,
    /// so a value with sub-millisecond precision reads back as the
    /// millisecond at or before it.
    Date(DateTime<Utc>),
    /// Same millisecond truncation as [`GValue::Date`].
    Timestamp(DateTime<Utc>),
    Instant(DateTime<Utc>),
    List(Vec<GValue>),
    Set(Vec<GValue>),
    /// Insertion-ordered entries; keys may be any value.
    Map(Vec<(GValue, GValue)>),
    Vertex(Vertex),
    Edge(Edge),
    VertexProperty(VertexProperty),
    Property(Property),
    Bytecode(Bytecode),
    Strategy(Strategy),
    P(Predicate),
    TextP(Predicate),
    Enum(TraversalEnum),
    Binding(Binding),
    Lambda(Lambda),
    Traverser(Traverser),
    Custom(CustomValue),
}

/// Discriminant of a [`GValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int32,
    Int64,
    Float,
    Double,
    Byte,
    Int16,
    BigInteger,
    BigDecimal,
    Char,
    String,
    Uuid,
    Date,
    Timestamp,
    Instant,
    List,
    Set,
    Map,
    Vertex,
    Edge,
    VertexProperty,
    Property,
    Bytecode,
    Strategy,
    P,
    TextP,
    Enum,
    Binding,
    Lambda,
    Traverser,
    Custom,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "Null",
            ValueKind::Bool => "Bool",
            ValueKind::Int32 => "Int32",
            ValueKind::Int64 => "Int64",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::Byte => "Byte",
            ValueKind::Int16 => "Int16",
            ValueKind::BigInteger => "BigInteger",
            ValueKind::BigDecimal => "BigDecimal",
            ValueKind::Char => "Char",
            ValueKind::String => "String",
            ValueKind::Uuid => "UUID",
            ValueKind::Date => "Date",
            ValueKind::Timestamp => "Timestamp",
            ValueKind::Instant => "Instant",
            ValueKind::List => "List",
            ValueKind::Set => "Set",
            ValueKind::Map => "Map",
            ValueKind::Vertex => "Vertex",
            ValueKind::Edge => "Edge",
            ValueKind::VertexProperty => "VertexProperty",
            ValueKind::Property => "Property",
            ValueKind::Bytecode => "Bytecode",
            ValueKind::Strategy => "Strategy",
            ValueKind::P => "P",
            ValueKind::TextP => "TextP",
            ValueKind::Enum => "Enum",
            ValueKind::Binding => "Binding",
            ValueKind::Lambda => "Lambda",
            ValueKind::Traverser => "Traverser",
            ValueKind::Custom => "Custom",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact runtime type of a value, used as the registry's encode-side key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Value(ValueKind),
    Enum(EnumKind),
    Strategy(String),
    Custom(String),
}

impl GValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            GValue::Null => ValueKind::Null,
            GValue::Bool(_) => ValueKind::Bool,
            GValue::Int32(_) => ValueKind::Int32,
            GValue::Int64(_) => ValueKind::Int64,
            GValue::Float(_) => ValueKind::Float,
            GValue::Double(_) => ValueKind::Double,
            GValue::Byte(_) => ValueKind::Byte,
            GValue::Int16(_) => ValueKind::Int16,
            GValue::BigInteger(_) => ValueKind::BigInteger,
            GValue::BigDecimal(_) => ValueKind::BigDecimal,
            GValue::Char(_) => ValueKind::Char,
            GValue::String(_) => ValueKind::String,
            GValue::Uuid(_) => ValueKind::Uuid,
            GValue::Date(_) => ValueKind::Date,
            GValue::Timestamp(_) => ValueKind::Timestamp,
            GValue::Instant(_) => ValueKind::Instant,
            GValue::List(_) => ValueKind::List,
            GValue::Set(_) => ValueKind::Set,
            GValue::Map(_) => ValueKind::Map,
            GValue::Vertex(_) => ValueKind::Vertex,
            GValue::Edge(_) => ValueKind::Edge,
            GValue::VertexProperty(_) => ValueKind::VertexProperty,
            GValue::Property(_) => ValueKind::Property,
            GValue::Bytecode(_) => ValueKind::Bytecode,
            GValue::Strategy(_) => ValueKind::Strategy,
            GValue::P(_) => ValueKind::P,
            GValue::TextP(_) => ValueKind::TextP,
            GValue::Enum(_) => ValueKind::Enum,
            GValue::Binding(_) => ValueKind::Binding,
            GValue::Lambda(_) => ValueKind::Lambda,
            GValue::Traverser(_) => ValueKind::Traverser,
            GValue::Custom(_) => ValueKind::Custom,
        }
    }

    pub fn type_key(&self) -> TypeKey {
        match self {
            GValue::Enum(e) => TypeKey::Enum(e.kind()),
            GValue::Strategy(s) => TypeKey::Strategy(s.name().to_string()),
            GValue::Custom(c) => TypeKey::Custom(c.type_name.clone()),
            other => TypeKey::Value(other.kind()),
        }
    }

    /// Human-readable type name for error messages.
    pub fn type_name(&self) -> String {
        match self {
            GValue::Enum(e) => e.kind().name().to_string(),
            GValue::Strategy(s) => s.name().to_string(),
            GValue::Custom(c) => c.type_name.clone(),
            other => other.kind().name().to_string(),
        }
    }

    /// Build a map from ordered entries.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<GValue>,
        V: Into<GValue>,
    {
        GValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral value of any fixed-width integer kind.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GValue::Int32(n) => Some(i64::from(*n)),
            GValue::Int64(n) => Some(*n),
            GValue::Byte(n) => Some(i64::from(*n)),
            GValue::Int16(n) => Some(i64::from(*n)),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[GValue]> {
        match self {
            GValue::List(items) | GValue::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(GValue, GValue)]> {
        match self {
            GValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_bytecode(&self) -> Option<&Bytecode> {
        match self {
            GValue::Bytecode(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_strategy(&self) -> Option<&Strategy> {
        match self {
            GValue::Strategy(s) => Some(s),
            _ => None,
        }
    }
}

/// Arbitrary-precision decimal kept as its exact JSON number text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal(String);

impl BigDecimal {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_number(n: &Number) -> Self {
        BigDecimal(n.to_string())
    }
}

impl FromStr for BigDecimal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number: Number = serde_json::from_str(s.trim())
            .map_err(|_| format!("Invalid decimal '{}'", s))?;
        Ok(BigDecimal::from_number(&number))
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque value handled by a user-registered type entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomValue {
    pub type_name: String,
    pub value: Box<GValue>,
}

impl CustomValue {
    pub fn new(type_name: impl Into<String>, value: impl Into<GValue>) -> Self {
        Self {
            type_name: type_name.into(),
            value: Box::new(value.into()),
        }
    }
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for GValue {
                fn from(value: $source) -> Self {
                    GValue::$variant(value)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i32 => Int32,
    i64 => Int64,
    f32 => Float,
    f64 => Double,
    i8 => Byte,
    i16 => Int16,
    i128 => BigInteger,
    char => Char,
    String => String,
    Uuid => Uuid,
    BigDecimal => BigDecimal,
    Vertex => Vertex,
    Edge => Edge,
    VertexProperty => VertexProperty,
    Property => Property,
    Bytecode => Bytecode,
    Strategy => Strategy,
    Predicate => P,
    TraversalEnum => Enum,
    Binding => Binding,
    Lambda => Lambda,
    Traverser => Traverser,
    CustomValue => Custom,
}

impl From<&str> for GValue {
    fn from(value: &str) -> Self {
        GValue::String(value.to_string())
    }
}

impl From<Vec<GValue>> for GValue {
    fn from(items: Vec<GValue>) -> Self {
        GValue::List(items)
    }
}

impl<T: Into<GValue>> From<Option<T>> for GValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(GValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_key_distinguishes_strategies_by_name() {
        let subgraph = GValue::from(Strategy::new("SubgraphStrategy"));
        let partition = GValue::from(Strategy::new("PartitionStrategy"));
        assert_ne!(subgraph.type_key(), partition.type_key());
        assert_eq!(subgraph.kind(), partition.kind());
    }

    #[test]
    fn test_big_decimal_keeps_exact_text() {
        let d: BigDecimal = "123456789.987654321000".parse().unwrap();
        assert_eq!(d.as_str(), "123456789.987654321000");
    }

    #[test]
    fn test_big_decimal_rejects_non_numbers() {
        assert!("12.3.4".parse::<BigDecimal>().is_err());
        assert!("abc".parse::<BigDecimal>().is_err());
    }

    #[test]
    fn test_map_builder_preserves_order() {
        let map = GValue::map([("b", 1), ("a", 2)]);
        let entries = map.as_map().unwrap();
        assert_eq!(entries[0].0, GValue::from("b"));
        assert_eq!(entries[1].1, GValue::Int32(2));
    }

    #[test]
    fn test_option_into_null() {
        let none: Option<i32> = None;
        assert!(GValue::from(none).is_null());
    }
}
