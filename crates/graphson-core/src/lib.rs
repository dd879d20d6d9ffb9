//! Versioned GraphSON encoding and decoding.
//!
//! Converts traversal bytecode, strategies, graph elements and scalars to and
//! from the three GraphSON wire profiles. Types are resolved through a
//! per-version [`TypeRegistry`]; [`Encoder`] and [`Decoder`] walk nested
//! values against it, and [`GraphSONWriter`]/[`GraphSONReader`] wrap the
//! whole pipeline down to JSON text.

mod builtins;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod io;
pub mod path;
pub mod process;
pub mod profile;
pub mod registry;
pub mod structure;
pub mod tagged;
pub mod value;

pub use config::GraphSONConfig;
pub use decoder::{Decoder, DecoderOptions, IgnoredConfigKey, UnknownKeyPolicy};
pub use encoder::{DEFAULT_MAX_DEPTH, Encoder};
pub use error::{Error, Result};
pub use io::{GraphSONReader, GraphSONWriter, ReadOutcome};
pub use path::{Segment, ValuePath};
pub use process::{
    Binding, Bytecode, EnumKind, Instruction, Lambda, Predicate, Strategy, StrategyDefinition,
    TraversalEnum, Traverser,
};
pub use profile::{GraphSONVersion, Profile};
pub use registry::{Matcher, RegistryBuilder, TypeEntry, TypeRegistry};
pub use structure::{Edge, Property, Vertex, VertexProperty};
pub use tagged::TaggedValue;
pub use value::{BigDecimal, CustomValue, GValue, TypeKey, ValueKind};
