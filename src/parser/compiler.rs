use crate::config::ParserConfig;
use crate::parser::tokenizer::{
    classify, is_bracket_or_separator, Lookahead, Word, ARGUMENT_SEPARATOR, CLOSE_BRACKET, OPEN_BRACKET,
};
use crate::parser::{CompiledProgram, Item, ParseError};
use crate::registry::{FunctionDef, OperatorDef, Precedence, Registry};
use log::{debug, trace};
use std::sync::Arc;

/// Entry of the transient operator stack.
enum StackEntry {
    OpenBracket,
    Operator(Arc<OperatorDef>),
    Function(Arc<FunctionDef>),
}

impl StackEntry {
    fn precedence(&self) -> Precedence {
        match self {
            StackEntry::OpenBracket => Precedence::OpenBracket,
            StackEntry::Operator(operator) => operator.precedence(),
            StackEntry::Function(_) => Precedence::Function,
        }
    }

    /// The output item for this entry; brackets never reach the output.
    fn into_item(self) -> Option<Item> {
        match self {
            StackEntry::OpenBracket => None,
            StackEntry::Operator(operator) => Some(Item::Operator(operator)),
            StackEntry::Function(function) => Some(Item::Function(function)),
        }
    }
}

/// Shunting-yard compiler turning an infix expression into a [`CompiledProgram`].
pub struct Compiler<'r> {
    registry: &'r Registry,
    config: ParserConfig,
}

impl<'r> Compiler<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            config: ParserConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Compiles `expression`, stopping at the first error.
    ///
    /// Whitespace anywhere in the expression is ignored.
    pub fn compile(&self, expression: &str) -> Result<CompiledProgram, ParseError> {
        let expression: String = expression.chars().filter(|c| !c.is_whitespace()).collect();
        debug!("Compiling expression: {}", expression);

        let mut state = CompileState::new(self.registry);
        for (index, c) in expression.chars().enumerate() {
            state.feed(index, c)?;
        }
        let items = state.finish()?;

        validate_shape(&items, &self.config)?;

        let program = CompiledProgram::new(items, self.config);
        debug!("Compiled program: {}", program);
        Ok(program)
    }
}

/// Compiles `expression` against `registry` with the default config.
pub fn compile(expression: &str, registry: &Registry) -> Result<CompiledProgram, ParseError> {
    Compiler::new(registry).compile(expression)
}

struct CompileState<'r> {
    registry: &'r Registry,
    word: String,
    /// Set after a binary operator or `(`; a following operator symbol is a sign.
    was_operator: bool,
    /// Consecutive operators and open brackets since the last word or `,`/`)`.
    operator_count: usize,
    operators: Vec<StackEntry>,
    output: Vec<Item>,
}

impl<'r> CompileState<'r> {
    fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            word: String::new(),
            was_operator: false,
            operator_count: 0,
            operators: Vec::new(),
            output: Vec::new(),
        }
    }

    fn feed(&mut self, index: usize, c: char) -> Result<(), ParseError> {
        let mut operator = self.registry.operator(c).cloned();

        if operator.is_some() && (self.was_operator || index == 0) {
            if self.operator_count > 1 {
                debug!("Too many consecutive operators at position {}", index);
                return Err(ParseError::other());
            }
            trace!("'{}' at {} is a sign", c, index);
            operator = None;
        }

        if operator.is_none() && !is_bracket_or_separator(c) {
            self.word.push(c);
            self.was_operator = false;
            self.operator_count = 0;
            return Ok(());
        }

        self.flush_word(Lookahead::Char(c))?;

        match operator {
            Some(operator) => {
                self.push_operator(operator);
                self.was_operator = true;
                self.operator_count += 1;
            }
            None if c == OPEN_BRACKET => {
                self.operators.push(StackEntry::OpenBracket);
                self.was_operator = true;
                self.operator_count += 1;
            }
            None => {
                self.reduce_to_bracket(c == CLOSE_BRACKET)?;
                self.was_operator = false;
                self.operator_count = 0;
            }
        }

        Ok(())
    }

    fn flush_word(&mut self, lookahead: Lookahead) -> Result<(), ParseError> {
        if self.word.is_empty() {
            return Ok(());
        }

        let word = std::mem::take(&mut self.word);
        match classify(&word, lookahead, self.registry)? {
            Word::Function(function) => self.operators.push(StackEntry::Function(function)),
            Word::Value(value) => self.output.push(Item::Literal(value)),
        }
        self.was_operator = false;
        self.operator_count = 0;
        Ok(())
    }

    /// Moves every operator that binds at least as tightly as `operator` to
    /// the output, stopping at an open bracket, then stacks `operator`.
    fn push_operator(&mut self, operator: Arc<OperatorDef>) {
        while let Some(top) = self.operators.last() {
            if matches!(top, StackEntry::OpenBracket) || top.precedence() < operator.precedence() {
                break;
            }
            if let Some(item) = self.operators.pop().and_then(StackEntry::into_item) {
                self.output.push(item);
            }
        }
        self.operators.push(StackEntry::Operator(operator));
    }

    /// Handles `,` and `)`: everything above the innermost open bracket goes
    /// to the output. The bracket itself is dropped only for `)`.
    fn reduce_to_bracket(&mut self, close: bool) -> Result<(), ParseError> {
        loop {
            match self.operators.pop() {
                None => {
                    let c = if close { CLOSE_BRACKET } else { ARGUMENT_SEPARATOR };
                    debug!("No open bracket matches '{}'", c);
                    return Err(ParseError::other());
                }
                Some(StackEntry::OpenBracket) => {
                    if !close {
                        self.operators.push(StackEntry::OpenBracket);
                    }
                    return Ok(());
                }
                Some(entry) => {
                    if let Some(item) = entry.into_item() {
                        self.output.push(item);
                    }
                }
            }
        }
    }

    fn finish(mut self) -> Result<Vec<Item>, ParseError> {
        if !self.word.is_empty() {
            let word = std::mem::take(&mut self.word);
            match classify(&word, Lookahead::End, self.registry)? {
                Word::Value(value) => self.output.push(Item::Literal(value)),
                Word::Function(_) => return Err(ParseError::function_variable(&word)),
            }
        }

        while let Some(entry) = self.operators.pop() {
            match entry.into_item() {
                Some(item) => self.output.push(item),
                None => {
                    debug!("Unclosed open bracket");
                    return Err(ParseError::other());
                }
            }
        }

        Ok(self.output)
    }
}

/// Walks the output from the top the way the evaluator will, making sure
/// every operator and function finds its operands, nothing is left over and
/// the nesting stays within `config.max_depth`.
fn validate_shape(items: &[Item], config: &ParserConfig) -> Result<(), ParseError> {
    // Operands still owed at each open level; the bottom level is the
    // expression itself.
    let mut pending: Vec<usize> = vec![1];

    for item in items.iter().rev() {
        let Some(needed) = pending.last_mut() else {
            debug!("Items left over after the outermost expression");
            return Err(ParseError::other());
        };
        *needed -= 1;

        if !matches!(item, Item::Literal(_)) {
            if pending.len() > config.max_depth {
                debug!("Expression nests deeper than {} levels", config.max_depth);
                return Err(ParseError::other());
            }
            pending.push(item.arity());
        }

        while pending.last() == Some(&0) {
            pending.pop();
        }
    }

    if !pending.is_empty() {
        debug!("Program of {} items is missing operands", items.len());
        return Err(ParseError::other());
    }

    Ok(())
}
