//! Traversal program objects: bytecode, strategies, predicates, enums, and
//! the small carriers that travel inside bytecode or results.

pub mod bytecode;
pub mod enums;
pub mod predicate;
pub mod strategy;

pub use bytecode::{Bytecode, Instruction};
pub use enums::{EnumKind, TraversalEnum};
pub use predicate::Predicate;
pub use strategy::{Strategy, StrategyDefinition, StrategyOption};

use crate::value::GValue;

/// Named variable in a bytecode argument position.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub key: String,
    pub value: Box<GValue>,
}

impl Binding {
    pub fn new(key: impl Into<String>, value: impl Into<GValue>) -> Self {
        Self {
            key: key.into(),
            value: Box::new(value.into()),
        }
    }
}

pub const DEFAULT_LAMBDA_LANGUAGE: &str = "gremlin-groovy";

/// Script lambda. `arguments` is the arity, `-1` when unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub script: String,
    pub language: String,
    pub arguments: i32,
}

impl Lambda {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            language: DEFAULT_LAMBDA_LANGUAGE.to_string(),
            arguments: -1,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_arguments(mut self, arguments: i32) -> Self {
        self.arguments = arguments;
        self
    }
}

/// Result value with its bulk.
#[derive(Debug, Clone, PartialEq)]
pub struct Traverser {
    pub bulk: i64,
    pub value: Box<GValue>,
}

impl Traverser {
    pub fn new(value: impl Into<GValue>, bulk: i64) -> Self {
        Self {
            bulk,
            value: Box::new(value.into()),
        }
    }
}
