//! Traversal strategy descriptors.
//!
//! A [`Strategy`] is a name plus ordered configuration. A
//! [`StrategyDefinition`] describes which configuration keys a strategy
//! understands and their defaults; keys holding their default value are
//! left out of the wire form.

use indexmap::IndexMap;

use crate::value::GValue;

pub const SUBGRAPH_STRATEGY: &str = "SubgraphStrategy";
pub const PARTITION_STRATEGY: &str = "PartitionStrategy";
pub const READ_ONLY_STRATEGY: &str = "ReadOnlyStrategy";
pub const OPTIONS_STRATEGY: &str = "OptionsStrategy";

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    name: String,
    configuration: IndexMap<String, GValue>,
}

impl Strategy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            configuration: IndexMap::new(),
        }
    }

    pub fn subgraph() -> Self {
        Self::new(SUBGRAPH_STRATEGY)
    }

    pub fn partition() -> Self {
        Self::new(PARTITION_STRATEGY)
    }

    pub fn read_only() -> Self {
        Self::new(READ_ONLY_STRATEGY)
    }

    pub fn options() -> Self {
        Self::new(OPTIONS_STRATEGY)
    }

    /// Builder form of [`Strategy::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<GValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<GValue>) -> &mut Self {
        self.configuration.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&GValue> {
        self.configuration.get(key)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wire tag, e.g. `g:SubgraphStrategy`.
    pub fn tag(&self) -> String {
        strategy_tag(&self.name)
    }

    pub fn configuration(&self) -> &IndexMap<String, GValue> {
        &self.configuration
    }
}

pub fn strategy_tag(name: &str) -> String {
    format!("g:{}", name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyOption {
    pub name: String,
    pub default: Option<GValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyDefinition {
    name: String,
    options: Vec<StrategyOption>,
    open: bool,
}

impl StrategyDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
            open: false,
        }
    }

    /// Configuration key without a default: omitted only when absent.
    pub fn option(mut self, name: impl Into<String>) -> Self {
        self.options.push(StrategyOption {
            name: name.into(),
            default: None,
        });
        self
    }

    pub fn option_with_default(mut self, name: impl Into<String>, default: impl Into<GValue>) -> Self {
        self.options.push(StrategyOption {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    /// Accept any configuration key.
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> String {
        strategy_tag(&self.name)
    }

    pub fn options(&self) -> &[StrategyOption] {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn accepts(&self, key: &str) -> bool {
        self.open || self.options.iter().any(|o| o.name == key)
    }

    /// Whether `value` is the default for `key` and can be left out.
    pub fn is_default(&self, key: &str, value: &GValue) -> bool {
        self.options
            .iter()
            .find(|o| o.name == key)
            .and_then(|o| o.default.as_ref())
            .is_some_and(|default| default == value)
    }

    /// Strategies known to every registry.
    pub fn builtins() -> Vec<StrategyDefinition> {
        let plain = |name: &str| StrategyDefinition::new(name);
        vec![
            StrategyDefinition::new(SUBGRAPH_STRATEGY)
                .option("vertices")
                .option("edges")
                .option("vertexProperties")
                .option_with_default("checkAdjacentVertices", true),
            StrategyDefinition::new(PARTITION_STRATEGY)
                .option("partitionKey")
                .option("writePartition")
                .option("readPartitions")
                .option_with_default("includeMetaProperties", false),
            StrategyDefinition::new("ElementIdStrategy")
                .option_with_default("idPropertyKey", "__id"),
            StrategyDefinition::new("HaltedTraverserStrategy").option("haltedTraverserFactory"),
            StrategyDefinition::new(OPTIONS_STRATEGY).open(),
            StrategyDefinition::new("SeedStrategy").option("seed"),
            StrategyDefinition::new("ProductiveByStrategy").option("productiveKeys"),
            StrategyDefinition::new("MatchAlgorithmStrategy").option("matchAlgorithm"),
            StrategyDefinition::new("EdgeLabelVerificationStrategy")
                .option_with_default("logWarning", false)
                .option_with_default("throwException", false),
            StrategyDefinition::new("ReservedKeysVerificationStrategy")
                .option_with_default("logWarning", false)
                .option_with_default("throwException", false)
                .option("keys"),
            StrategyDefinition::new("VertexProgramStrategy")
                .option("graphComputer")
                .option("workers")
                .option("persist")
                .option("result")
                .option("vertices")
                .option("edges"),
            plain(READ_ONLY_STRATEGY),
            plain("LambdaRestrictionStrategy"),
            plain("AdjacentToIncidentStrategy"),
            plain("ByModulatorOptimizationStrategy"),
            plain("CountStrategy"),
            plain("EarlyLimitStrategy"),
            plain("FilterRankingStrategy"),
            plain("IdentityRemovalStrategy"),
            plain("IncidentToAdjacentStrategy"),
            plain("InlineFilterStrategy"),
            plain("LazyBarrierStrategy"),
            plain("MatchPredicateStrategy"),
            plain("OrderLimitStrategy"),
            plain("PathProcessorStrategy"),
            plain("PathRetractionStrategy"),
            plain("RepeatUnrollStrategy"),
            plain("ComputerVerificationStrategy"),
            plain("StandardVerificationStrategy"),
        ]
    }
}
