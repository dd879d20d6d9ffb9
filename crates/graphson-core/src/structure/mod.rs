//! Graph element references.
//!
//! Elements travel as references: identity and label, plus the value for
//! properties. Element properties are not carried.

use crate::value::GValue;

pub const DEFAULT_VERTEX_LABEL: &str = "vertex";
pub const DEFAULT_EDGE_LABEL: &str = "edge";

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub id: Box<GValue>,
    pub label: String,
}

impl Vertex {
    pub fn new(id: impl Into<GValue>, label: impl Into<String>) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: Box<GValue>,
    pub label: String,
    pub out_v: Box<GValue>,
    pub out_v_label: String,
    pub in_v: Box<GValue>,
    pub in_v_label: String,
}

impl Edge {
    /// Edge from `out_vertex` to `in_vertex`.
    pub fn new(
        id: impl Into<GValue>,
        label: impl Into<String>,
        out_vertex: &Vertex,
        in_vertex: &Vertex,
    ) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
            out_v: out_vertex.id.clone(),
            out_v_label: out_vertex.label.clone(),
            in_v: in_vertex.id.clone(),
            in_v_label: in_vertex.label.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexProperty {
    pub id: Box<GValue>,
    pub label: String,
    pub value: Box<GValue>,
}

impl VertexProperty {
    pub fn new(id: impl Into<GValue>, label: impl Into<String>, value: impl Into<GValue>) -> Self {
        Self {
            id: Box::new(id.into()),
            label: label.into(),
            value: Box::new(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Box<GValue>,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<GValue>) -> Self {
        Self {
            key: key.into(),
            value: Box::new(value.into()),
        }
    }
}
