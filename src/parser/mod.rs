use crate::config::ParserConfig;
use crate::evaluator::{self, EvalFault};
use crate::registry::{FunctionDef, OperatorDef};
use std::fmt;
use std::sync::Arc;

mod compiler;
mod tokenizer;

pub use compiler::{compile, Compiler};

/// The element of an expression a [`ParseError`] refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Unknown function name in front of `(`.
    Function,
    /// Unknown identifier.
    Variable,
    /// Numeric-looking word that does not parse as a number.
    Number,
    /// Function name used as a value.
    FunctionVariable,
    /// Brackets, separators or operators in an invalid arrangement.
    Other,
    /// No error.
    None,
}

/// The single error reported by a failed compilation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{}", self.message())]
pub struct ParseError {
    pub target_type: TargetType,
    pub target: String,
}

impl ParseError {
    pub fn new(target_type: TargetType, target: impl Into<String>) -> Self {
        Self {
            target_type,
            target: target.into(),
        }
    }

    pub fn function(name: &str) -> Self {
        Self::new(TargetType::Function, name)
    }

    pub fn variable(name: &str) -> Self {
        Self::new(TargetType::Variable, name)
    }

    pub fn number(word: &str) -> Self {
        Self::new(TargetType::Number, word)
    }

    pub fn function_variable(name: &str) -> Self {
        Self::new(TargetType::FunctionVariable, name)
    }

    pub fn other() -> Self {
        Self::new(TargetType::Other, String::new())
    }

    /// The "no error" value used by request/response style APIs.
    pub fn none() -> Self {
        Self::new(TargetType::None, String::new())
    }

    pub fn is_none(&self) -> bool {
        self.target_type == TargetType::None
    }

    pub fn message(&self) -> String {
        match self.target_type {
            TargetType::Function => format!("Unknown function '{}'", self.target),
            TargetType::Variable => format!("Unknown variable '{}'", self.target),
            TargetType::Number => format!("Invalid number '{}'", self.target),
            TargetType::FunctionVariable => {
                format!("Function '{}' is used without arguments", self.target)
            }
            TargetType::Other => "Malformed expression".to_string(),
            TargetType::None => "No error".to_string(),
        }
    }
}

/// One element of a compiled program.
#[derive(Clone)]
pub enum Item {
    Literal(f64),
    Operator(Arc<OperatorDef>),
    Function(Arc<FunctionDef>),
}

impl Item {
    /// Number of items this one consumes when evaluated.
    pub fn arity(&self) -> usize {
        match self {
            Item::Literal(_) => 0,
            Item::Operator(_) => 2,
            Item::Function(function) => function.arity(),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Literal(value) => write!(f, "{}", value),
            Item::Operator(operator) => write!(f, "{}", operator.symbol()),
            Item::Function(function) => write!(f, "{}", function.name()),
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Item::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Item::Operator(operator) => f.debug_tuple("Operator").field(&operator.symbol()).finish(),
            Item::Function(function) => f.debug_tuple("Function").field(&function.name()).finish(),
        }
    }
}

/// Items in push order; the last item is the first one evaluated and the
/// operators pull their operands from the items below them.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    items: Vec<Item>,
    config: ParserConfig,
}

impl CompiledProgram {
    pub(crate) fn new(items: Vec<Item>, config: ParserConfig) -> Self {
        Self { items, config }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Evaluates the program, consuming it.
    pub fn evaluate(self) -> Result<f64, EvalFault> {
        self.evaluate_ref()
    }

    /// Evaluates the program without consuming it; each run starts again from
    /// the top of the item array.
    pub fn evaluate_ref(&self) -> Result<f64, EvalFault> {
        evaluator::evaluate(&self.items, &self.config)
    }
}

impl fmt::Display for CompiledProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}
