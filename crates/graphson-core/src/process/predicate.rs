//! Predicates (`P` and `TextP`).
//!
//! The same shape serves both: an operator name and an argument. Whether a
//! predicate is a `P` or a `TextP` is decided by the [`GValue`] variant that
//! holds it. Connectives (`and`/`or`) hold a list of predicates.

use crate::value::GValue;

pub const AND: &str = "and";
pub const OR: &str = "or";

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    operator: String,
    value: Box<GValue>,
}

impl Predicate {
    pub fn new(operator: impl Into<String>, value: impl Into<GValue>) -> Self {
        Self {
            operator: operator.into(),
            value: Box::new(value.into()),
        }
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn value(&self) -> &GValue {
        &self.value
    }

    pub fn is_connective(&self) -> bool {
        self.operator == AND || self.operator == OR
    }

    pub fn eq(value: impl Into<GValue>) -> Self {
        Self::new("eq", value)
    }

    pub fn neq(value: impl Into<GValue>) -> Self {
        Self::new("neq", value)
    }

    pub fn lt(value: impl Into<GValue>) -> Self {
        Self::new("lt", value)
    }

    pub fn lte(value: impl Into<GValue>) -> Self {
        Self::new("lte", value)
    }

    pub fn gt(value: impl Into<GValue>) -> Self {
        Self::new("gt", value)
    }

    pub fn gte(value: impl Into<GValue>) -> Self {
        Self::new("gte", value)
    }

    pub fn inside(low: impl Into<GValue>, high: impl Into<GValue>) -> Self {
        Self::new("inside", GValue::List(vec![low.into(), high.into()]))
    }

    pub fn outside(low: impl Into<GValue>, high: impl Into<GValue>) -> Self {
        Self::new("outside", GValue::List(vec![low.into(), high.into()]))
    }

    pub fn between(low: impl Into<GValue>, high: impl Into<GValue>) -> Self {
        Self::new("between", GValue::List(vec![low.into(), high.into()]))
    }

    pub fn within(values: impl IntoIterator<Item = GValue>) -> Self {
        Self::new("within", GValue::List(values.into_iter().collect()))
    }

    pub fn without(values: impl IntoIterator<Item = GValue>) -> Self {
        Self::new("without", GValue::List(values.into_iter().collect()))
    }

    pub fn containing(text: impl Into<String>) -> Self {
        Self::new("containing", GValue::String(text.into()))
    }

    pub fn starting_with(text: impl Into<String>) -> Self {
        Self::new("startingWith", GValue::String(text.into()))
    }

    pub fn ending_with(text: impl Into<String>) -> Self {
        Self::new("endingWith", GValue::String(text.into()))
    }

    pub fn not_containing(text: impl Into<String>) -> Self {
        Self::new("notContaining", GValue::String(text.into()))
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::new("regex", GValue::String(pattern.into()))
    }

    pub fn and(self, other: Predicate) -> Self {
        Self::new(AND, GValue::List(vec![GValue::P(self), GValue::P(other)]))
    }

    pub fn or(self, other: Predicate) -> Self {
        Self::new(OR, GValue::List(vec![GValue::P(self), GValue::P(other)]))
    }
}
