//! Traversal enumerations (`T`, `Direction`, `Order`, ...).
//!
//! Each kind has its own wire tag and a fixed set of literals.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumKind {
    Barrier,
    Cardinality,
    Column,
    Direction,
    Operator,
    Order,
    Pick,
    Pop,
    Scope,
    T,
}

impl EnumKind {
    pub const ALL: [EnumKind; 10] = [
        EnumKind::Barrier,
        EnumKind::Cardinality,
        EnumKind::Column,
        EnumKind::Direction,
        EnumKind::Operator,
        EnumKind::Order,
        EnumKind::Pick,
        EnumKind::Pop,
        EnumKind::Scope,
        EnumKind::T,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnumKind::Barrier => "Barrier",
            EnumKind::Cardinality => "Cardinality",
            EnumKind::Column => "Column",
            EnumKind::Direction => "Direction",
            EnumKind::Operator => "Operator",
            EnumKind::Order => "Order",
            EnumKind::Pick => "Pick",
            EnumKind::Pop => "Pop",
            EnumKind::Scope => "Scope",
            EnumKind::T => "T",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            EnumKind::Barrier => "g:Barrier",
            EnumKind::Cardinality => "g:Cardinality",
            EnumKind::Column => "g:Column",
            EnumKind::Direction => "g:Direction",
            EnumKind::Operator => "g:Operator",
            EnumKind::Order => "g:Order",
            EnumKind::Pick => "g:Pick",
            EnumKind::Pop => "g:Pop",
            EnumKind::Scope => "g:Scope",
            EnumKind::T => "g:T",
        }
    }

    pub fn literals(self) -> &'static [&'static str] {
        match self {
            EnumKind::Barrier => &["normSack"],
            EnumKind::Cardinality => &["list", "set", "single"],
            EnumKind::Column => &["keys", "values"],
            EnumKind::Direction => &["OUT", "IN", "BOTH"],
            EnumKind::Operator => &[
                "sum", "minus", "mult", "div", "min", "max", "assign", "and", "or", "addAll",
                "sumLong",
            ],
            // incr/decr are the pre-3.3 spellings of asc/desc
            EnumKind::Order => &["asc", "desc", "shuffle", "incr", "decr"],
            EnumKind::Pick => &["any", "none"],
            EnumKind::Pop => &["first", "last", "all", "mixed"],
            EnumKind::Scope => &["global", "local"],
            EnumKind::T => &["id", "label", "key", "value"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraversalEnum {
    kind: EnumKind,
    value: &'static str,
}

impl TraversalEnum {
    /// `None` when `value` is not a literal of `kind`.
    pub fn new(kind: EnumKind, value: &str) -> Option<Self> {
        kind.literals()
            .iter()
            .copied()
            .find(|literal| *literal == value)
            .map(|literal| Self {
                kind,
                value: literal,
            })
    }

    pub fn kind(&self) -> EnumKind {
        self.kind
    }

    pub fn value(&self) -> &'static str {
        self.value
    }
}

impl fmt::Display for TraversalEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind.name(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_literal() {
        let out = TraversalEnum::new(EnumKind::Direction, "OUT").unwrap();
        assert_eq!(out.kind().tag(), "g:Direction");
        assert_eq!(out.to_string(), "Direction.OUT");
    }

    #[test]
    fn test_literal_from_owned_text() {
        let text = String::from("single");
        let single = TraversalEnum::new(EnumKind::Cardinality, &text).unwrap();
        drop(text);
        assert_eq!(single.kind(), EnumKind::Cardinality);
        assert_eq!(single.to_string(), "Cardinality.single");
    }

    #[test]
    fn test_unknown_literal() {
        assert!(TraversalEnum::new(EnumKind::Direction, "out").is_none());
        assert!(TraversalEnum::new(EnumKind::T, "name").is_none());
    }

    #[test]
    fn test_tags_are_unique() {
        let mut tags: Vec<&str> = EnumKind::ALL.iter().map(|k| k.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), EnumKind::ALL.len());
    }
}
