use crate::evaluator::{EvalCursor, EvalFault};
use crate::functions;
use log::error;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Evaluation rule shared by operators and functions. A rule pulls its
/// operands from the cursor, right-most operand first.
pub type Rule = Arc<dyn Fn(&mut EvalCursor<'_>) -> Result<f64, EvalFault> + Send + Sync>;

/// Ordering used by the compiler to decide when operators are moved from the
/// operator stack to the output. `OpenBracket` and `Function` only ever mark
/// operator stack entries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    OpenBracket,
    Add,
    Multiply,
    Exponential,
    Function,
}

impl Precedence {
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Precedence::OpenBracket | Precedence::Function)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("operator '{0}' is already registered")]
    DuplicateOperator(char),
    #[error("function '{0}' is already registered")]
    DuplicateFunction(String),
    #[error("variable '{0}' is already defined")]
    DuplicateVariable(String),
    #[error("'{0}' cannot be used as an operator symbol")]
    ReservedSymbol(char),
    #[error("operator '{0}' cannot use a bracket or function precedence")]
    SentinelPrecedence(char),
}

/// A binary infix operator. Every operator pulls exactly two operands.
pub struct OperatorDef {
    symbol: char,
    precedence: Precedence,
    usage: String,
    rule: Rule,
}

impl OperatorDef {
    pub fn new<F>(symbol: char, precedence: Precedence, usage: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&mut EvalCursor<'_>) -> Result<f64, EvalFault> + Send + Sync + 'static,
    {
        Self {
            symbol,
            precedence,
            usage: usage.into(),
            rule: Arc::new(rule),
        }
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub(crate) fn apply(&self, cursor: &mut EvalCursor<'_>) -> Result<f64, EvalFault> {
        (self.rule)(cursor)
    }
}

impl fmt::Debug for OperatorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorDef")
            .field("symbol", &self.symbol)
            .field("precedence", &self.precedence)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// A named function called as `name(arg, ...)`.
pub struct FunctionDef {
    name: String,
    arity: usize,
    usage: String,
    rule: Rule,
}

impl FunctionDef {
    pub fn new<F>(name: impl Into<String>, arity: usize, usage: impl Into<String>, rule: F) -> Self
    where
        F: Fn(&mut EvalCursor<'_>) -> Result<f64, EvalFault> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            usage: usage.into(),
            rule: Arc::new(rule),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub(crate) fn apply(&self, cursor: &mut EvalCursor<'_>) -> Result<f64, EvalFault> {
        (self.rule)(cursor)
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Operators, functions and variables known to the compiler.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    operators: HashMap<char, Arc<OperatorDef>>,
    functions: HashMap<String, Arc<FunctionDef>>,
    variables: HashMap<String, f64>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in operators, functions and the
    /// `PI` and `E` constants.
    pub fn try_with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        functions::register_builtins(&mut registry)?;
        Ok(registry)
    }

    /// Like [`Registry::try_with_builtins`]. The catalog is fixed, so a
    /// failure is a bug: it panics in debug builds and is logged otherwise.
    pub fn with_builtins() -> Self {
        Self::try_with_builtins().unwrap_or_else(|err| {
            error!("Built-in catalog is inconsistent: {}", err);
            if cfg!(debug_assertions) {
                panic!("built-in catalog is inconsistent: {err}");
            }
            Self::new()
        })
    }

    pub fn register_operator(&mut self, operator: OperatorDef) -> Result<(), RegistryError> {
        let symbol = operator.symbol();
        if is_reserved(symbol) {
            return Err(RegistryError::ReservedSymbol(symbol));
        }
        if operator.precedence().is_sentinel() {
            return Err(RegistryError::SentinelPrecedence(symbol));
        }
        if self.operators.contains_key(&symbol) {
            return Err(RegistryError::DuplicateOperator(symbol));
        }

        self.operators.insert(symbol, Arc::new(operator));
        Ok(())
    }

    pub fn register_function(&mut self, function: FunctionDef) -> Result<(), RegistryError> {
        if self.functions.contains_key(function.name()) {
            return Err(RegistryError::DuplicateFunction(function.name().to_string()));
        }

        self.functions
            .insert(function.name().to_string(), Arc::new(function));
        Ok(())
    }

    /// Adds a variable, failing if the name is already taken.
    pub fn define_variable(&mut self, name: impl Into<String>, value: f64) -> Result<(), RegistryError> {
        let name = name.into();
        if self.variables.contains_key(&name) {
            return Err(RegistryError::DuplicateVariable(name));
        }

        self.variables.insert(name, value);
        Ok(())
    }

    /// Adds or overwrites a variable.
    pub fn bind_variable(&mut self, name: impl Into<String>, value: f64) {
        self.variables.insert(name.into(), value);
    }

    pub fn is_operator(&self, symbol: char) -> bool {
        self.operators.contains_key(&symbol)
    }

    pub fn operator(&self, symbol: char) -> Option<&Arc<OperatorDef>> {
        self.operators.get(&symbol)
    }

    pub fn function(&self, name: &str) -> Option<&Arc<FunctionDef>> {
        self.functions.get(name)
    }

    pub fn variable(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    pub fn operators(&self) -> impl Iterator<Item = &OperatorDef> {
        self.operators.values().map(|operator| operator.as_ref())
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.functions.values().map(|function| function.as_ref())
    }

    pub fn variables(&self) -> impl Iterator<Item = (&str, f64)> {
        self.variables
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }
}

/// Characters the compiler gives a fixed meaning, or that would make numeric
/// literals ambiguous.
fn is_reserved(symbol: char) -> bool {
    matches!(symbol, '(' | ')' | ',' | '.') || symbol.is_numeric() || symbol.is_whitespace()
}
