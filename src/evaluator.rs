use crate::config::ParserConfig;
use crate::parser::Item;
use log::{debug, trace};

/// Internal failure while evaluating a program. The compiler only accepts
/// programs that cannot produce these, so seeing one points at a bug in the
/// compiler or in a custom operator/function rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalFault {
    #[error("Stack underflow: an operand was pulled from an exhausted program")]
    StackUnderflow,
    #[error("{0} item(s) left on the stack after evaluation")]
    TrailingItems(usize),
    #[error("Expression nests deeper than {0} levels")]
    DepthExceeded(usize),
    #[error("'{name}' expects {expected} operand(s) but pulled {pulled}")]
    ArityMismatch {
        name: String,
        expected: usize,
        pulled: usize,
    },
}

/// Read position over a compiled item array.
///
/// Items are taken from the end of the array towards the start. Operators and
/// functions receive the cursor and call [`EvalCursor::pull`] for each of
/// their operands, which evaluates the next item down, recursively when that
/// item is itself an operator or function.
pub struct EvalCursor<'a> {
    items: &'a [Item],
    next: usize,
    /// Operands pulled so far by each active operator/function, innermost last.
    frames: Vec<usize>,
    max_depth: usize,
}

impl<'a> EvalCursor<'a> {
    pub fn new(items: &'a [Item], config: &ParserConfig) -> Self {
        Self {
            items,
            next: items.len(),
            frames: Vec::new(),
            max_depth: config.max_depth,
        }
    }

    /// Items not consumed yet.
    pub fn remaining(&self) -> usize {
        self.next
    }

    /// Number of operators/functions currently being evaluated.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Takes the next item and returns its value.
    ///
    /// For binary operators the first pull yields the right-hand operand and
    /// the second the left-hand one.
    pub fn pull(&mut self) -> Result<f64, EvalFault> {
        let items = self.items;
        let index = self.next.checked_sub(1).ok_or(EvalFault::StackUnderflow)?;
        self.next = index;

        if let Some(pulled) = self.frames.last_mut() {
            *pulled += 1;
        }

        match &items[index] {
            Item::Literal(value) => Ok(*value),
            item => self.invoke(item),
        }
    }

    fn invoke(&mut self, item: &Item) -> Result<f64, EvalFault> {
        if self.frames.len() >= self.max_depth {
            return Err(EvalFault::DepthExceeded(self.max_depth));
        }

        self.frames.push(0);
        let value = match item {
            Item::Literal(value) => Ok(*value),
            Item::Operator(operator) => operator.apply(self),
            Item::Function(function) => function.apply(self),
        };
        let pulled = self.frames.pop().unwrap_or_default();
        let value = value?;

        let expected = item.arity();
        if pulled != expected {
            return Err(EvalFault::ArityMismatch {
                name: item.to_string(),
                expected,
                pulled,
            });
        }

        trace!("{} => {}", item, value);
        Ok(value)
    }
}

/// Evaluates a whole item array; every item must be consumed exactly once.
pub fn evaluate(items: &[Item], config: &ParserConfig) -> Result<f64, EvalFault> {
    let mut cursor = EvalCursor::new(items, config);
    let value = cursor.pull()?;

    match cursor.remaining() {
        0 => {
            debug!("Evaluated {} items to {}", items.len(), value);
            Ok(value)
        }
        left => Err(EvalFault::TrailingItems(left)),
    }
}
