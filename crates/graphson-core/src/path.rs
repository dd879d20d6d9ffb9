//! Value paths used for error context.
//!
//! Rendered as `$<g:SubgraphStrategy>.vertices<g:Bytecode>.step[0][1]`: keys
//! with a dot, sequence positions in brackets, tags in angle brackets.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
    Tag(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValuePath {
    segments: Vec<Segment>,
}

impl ValuePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn pop(&mut self) {
        self.segments.pop();
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
                Segment::Tag(tag) => write!(f, "<{}>", tag)?,
            }
        }
        Ok(())
    }
}
