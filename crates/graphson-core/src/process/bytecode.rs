//! Traversal bytecode.
//!
//! A traversal program is two ordered instruction lists: source instructions
//! (configuring the traversal source, e.g. `withStrategies`) and step
//! instructions (`V`, `has`, `out`, ...). Order is the program and is never
//! changed by the codec.

use indexmap::IndexMap;

use crate::value::GValue;

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    operator: String,
    arguments: Vec<GValue>,
}

impl Instruction {
    pub fn new(operator: impl Into<String>, arguments: impl IntoIterator<Item = GValue>) -> Self {
        Self {
            operator: operator.into(),
            arguments: arguments.into_iter().collect(),
        }
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn arguments(&self) -> &[GValue] {
        &self.arguments
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bytecode {
    source_instructions: Vec<Instruction>,
    step_instructions: Vec<Instruction>,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(
        &mut self,
        operator: impl Into<String>,
        arguments: impl IntoIterator<Item = GValue>,
    ) -> &mut Self {
        self.source_instructions
            .push(Instruction::new(operator, arguments));
        self
    }

    pub fn add_step(
        &mut self,
        operator: impl Into<String>,
        arguments: impl IntoIterator<Item = GValue>,
    ) -> &mut Self {
        self.step_instructions
            .push(Instruction::new(operator, arguments));
        self
    }

    /// Builder form of [`Bytecode::add_source`].
    pub fn with_source(
        mut self,
        operator: impl Into<String>,
        arguments: impl IntoIterator<Item = GValue>,
    ) -> Self {
        self.add_source(operator, arguments);
        self
    }

    /// Builder form of [`Bytecode::add_step`].
    pub fn with_step(
        mut self,
        operator: impl Into<String>,
        arguments: impl IntoIterator<Item = GValue>,
    ) -> Self {
        self.add_step(operator, arguments);
        self
    }

    pub fn source_instructions(&self) -> &[Instruction] {
        &self.source_instructions
    }

    pub fn step_instructions(&self) -> &[Instruction] {
        &self.step_instructions
    }

    pub fn is_empty(&self) -> bool {
        self.source_instructions.is_empty() && self.step_instructions.is_empty()
    }

    /// Variable bindings used anywhere in the program, nested bytecode
    /// included. The first binding of a key wins.
    pub fn bindings(&self) -> IndexMap<String, GValue> {
        let mut bindings = IndexMap::new();
        self.collect_bindings(&mut bindings);
        bindings
    }

    fn collect_bindings(&self, bindings: &mut IndexMap<String, GValue>) {
        let instructions = self
            .source_instructions
            .iter()
            .chain(self.step_instructions.iter());
        for instruction in instructions {
            for argument in instruction.arguments() {
                collect_argument_bindings(argument, bindings);
            }
        }
    }
}

fn collect_argument_bindings(argument: &GValue, bindings: &mut IndexMap<String, GValue>) {
    match argument {
        GValue::Binding(binding) => {
            bindings
                .entry(binding.key.clone())
                .or_insert_with(|| (*binding.value).clone());
        }
        GValue::Bytecode(nested) => nested.collect_bindings(bindings),
        GValue::List(items) | GValue::Set(items) => {
            for item in items {
                collect_argument_bindings(item, bindings);
            }
        }
        _ => {}
    }
}
