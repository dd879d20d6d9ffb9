//! Type registry.
//!
//! Maps a value's runtime type to its wire tag and converter pair, and a tag
//! back to its decoder. Registries are assembled with a [`RegistryBuilder`]
//! and immutable once built. The built-in registry of each version is built
//! on first use and shared process-wide.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, trace};

use crate::builtins;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::process::StrategyDefinition;
use crate::profile::{GraphSONVersion, Profile};
use crate::tagged::TaggedValue;
use crate::value::{GValue, TypeKey};

/// Produces the natural (untagged) representation of a value. Nested values
/// are encoded through the encoder so their own tags are applied.
pub type EncodeFn = Arc<dyn Fn(&GValue, &mut Encoder<'_>) -> Result<TaggedValue> + Send + Sync>;

/// Rebuilds a value from the inner (already unwrapped) representation.
pub type DecodeFn = Arc<dyn Fn(&TaggedValue, &mut Decoder<'_>) -> Result<GValue> + Send + Sync>;

type MatchFn = Arc<dyn Fn(&GValue) -> bool + Send + Sync>;

/// Which values an entry claims on encode.
#[derive(Clone)]
pub enum Matcher {
    /// Exactly one runtime type.
    Exact(TypeKey),
    /// Any value accepted by the predicate. Consulted only when no exact
    /// matcher applies, in registration order.
    Structural(MatchFn),
}

impl Matcher {
    pub fn exact(key: TypeKey) -> Self {
        Matcher::Exact(key)
    }

    pub fn structural(test: impl Fn(&GValue) -> bool + Send + Sync + 'static) -> Self {
        Matcher::Structural(Arc::new(test))
    }

    pub fn matches(&self, value: &GValue) -> bool {
        match self {
            Matcher::Exact(key) => value.type_key() == *key,
            Matcher::Structural(test) => test(value),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Exact(key) => f.debug_tuple("Exact").field(key).finish(),
            Matcher::Structural(_) => f.write_str("Structural(..)"),
        }
    }
}

pub struct TypeEntry {
    tag: String,
    matcher: Matcher,
    encode: EncodeFn,
    decode: DecodeFn,
}

impl TypeEntry {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn encode(&self, value: &GValue, encoder: &mut Encoder<'_>) -> Result<TaggedValue> {
        (self.encode)(value, encoder)
    }

    pub fn decode(&self, inner: &TaggedValue, decoder: &mut Decoder<'_>) -> Result<GValue> {
        (self.decode)(inner, decoder)
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("tag", &self.tag)
            .field("matcher", &self.matcher)
            .finish()
    }
}

#[derive(Debug)]
pub struct TypeRegistry {
    profile: Profile,
    entries: Vec<TypeEntry>,
    by_tag: HashMap<String, usize>,
    by_key: HashMap<TypeKey, usize>,
    structural: Vec<usize>,
}

static V1_REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
static V2_REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
static V3_REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

impl TypeRegistry {
    /// Shared built-in registry for `version`.
    pub fn for_version(version: GraphSONVersion) -> Arc<TypeRegistry> {
        let slot = match version {
            GraphSONVersion::V1 => &V1_REGISTRY,
            GraphSONVersion::V2 => &V2_REGISTRY,
            GraphSONVersion::V3 => &V3_REGISTRY,
        };
        slot.get_or_init(|| Arc::new(RegistryBuilder::with_builtins(version).build()))
            .clone()
    }

    pub fn builder(version: GraphSONVersion) -> RegistryBuilder {
        RegistryBuilder::with_builtins(version)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn version(&self) -> GraphSONVersion {
        self.profile.version
    }

    /// Entry claiming `value`; exact matches win over structural ones.
    /// `None` means the value is encoded in its natural form.
    pub fn lookup_for_encode(&self, value: &GValue) -> Option<&TypeEntry> {
        if let Some(index) = self.by_key.get(&value.type_key()) {
            return Some(&self.entries[*index]);
        }
        self.structural
            .iter()
            .map(|index| &self.entries[*index])
            .find(|entry| entry.matcher.matches(value))
    }

    pub fn lookup_for_decode(&self, tag: &str) -> Option<&TypeEntry> {
        let entry = self.by_tag.get(tag).map(|index| &self.entries[*index]);
        trace!(tag, found = entry.is_some(), "resolved type tag");
        entry
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.by_tag.contains_key(tag)
    }

    /// Registered tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(TypeEntry::tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct RegistryBuilder {
    profile: Profile,
    entries: Vec<TypeEntry>,
    by_tag: HashMap<String, usize>,
    by_key: HashMap<TypeKey, usize>,
    structural: Vec<usize>,
}

impl RegistryBuilder {
    /// Empty builder; nothing is tagged until registered.
    pub fn new(version: GraphSONVersion) -> Self {
        Self {
            profile: version.profile(),
            entries: Vec::new(),
            by_tag: HashMap::new(),
            by_key: HashMap::new(),
            structural: Vec::new(),
        }
    }

    /// Builder preloaded with the built-in vocabulary of `version`.
    pub fn with_builtins(version: GraphSONVersion) -> Self {
        let mut builder = Self::new(version);
        builtins::register_builtins(&mut builder);
        builder
    }

    pub fn version(&self) -> GraphSONVersion {
        self.profile.version
    }

    /// Add an entry. Fails when the tag, or the exact type it matches, is
    /// already registered.
    pub fn register<E, D>(
        &mut self,
        matcher: Matcher,
        tag: impl Into<String>,
        encode: E,
        decode: D,
    ) -> Result<&mut Self>
    where
        E: Fn(&GValue, &mut Encoder<'_>) -> Result<TaggedValue> + Send + Sync + 'static,
        D: Fn(&TaggedValue, &mut Decoder<'_>) -> Result<GValue> + Send + Sync + 'static,
    {
        let tag = tag.into();
        if self.by_tag.contains_key(&tag) {
            return Err(Error::Registration(format!(
                "tag '{}' is already registered for GraphSON {}",
                tag, self.profile.version
            )));
        }
        if let Matcher::Exact(key) = &matcher {
            if self.by_key.contains_key(key) {
                return Err(Error::Registration(format!(
                    "{:?} is already claimed by another tag",
                    key
                )));
            }
        }
        self.insert(matcher, tag, encode, decode);
        Ok(self)
    }

    /// Register a strategy definition under `g:<Name>`.
    pub fn register_strategy(&mut self, definition: StrategyDefinition) -> Result<&mut Self> {
        let tag = definition.tag();
        if self.by_tag.contains_key(&tag) {
            return Err(Error::Registration(format!(
                "strategy tag '{}' is already registered",
                tag
            )));
        }
        builtins::insert_strategy(self, definition);
        Ok(self)
    }

    /// Infallible insert for built-ins, whose tags are unique by construction.
    pub(crate) fn insert<E, D>(&mut self, matcher: Matcher, tag: String, encode: E, decode: D)
    where
        E: Fn(&GValue, &mut Encoder<'_>) -> Result<TaggedValue> + Send + Sync + 'static,
        D: Fn(&TaggedValue, &mut Decoder<'_>) -> Result<GValue> + Send + Sync + 'static,
    {
        let encode: EncodeFn = Arc::new(encode);
        let decode: DecodeFn = Arc::new(decode);
        debug_assert!(!self.by_tag.contains_key(&tag), "duplicate tag {}", tag);
        let index = self.entries.len();
        match &matcher {
            Matcher::Exact(key) => {
                self.by_key.insert(key.clone(), index);
            }
            Matcher::Structural(_) => self.structural.push(index),
        }
        self.by_tag.insert(tag.clone(), index);
        self.entries.push(TypeEntry {
            tag,
            matcher,
            encode,
            decode,
        });
    }

    pub fn build(self) -> TypeRegistry {
        debug!(
            version = %self.profile.version,
            entries = self.entries.len(),
            "built GraphSON type registry"
        );
        TypeRegistry {
            profile: self.profile,
            entries: self.entries,
            by_tag: self.by_tag,
            by_key: self.by_key,
            structural: self.structural,
        }
    }
}
