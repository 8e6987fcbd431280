use crate::parser::ParseError;
use crate::registry::{FunctionDef, Registry};
use log::trace;
use std::sync::Arc;

pub(crate) const OPEN_BRACKET: char = '(';
pub(crate) const CLOSE_BRACKET: char = ')';
pub(crate) const ARGUMENT_SEPARATOR: char = ',';

/// The character that ended a word.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Lookahead {
    Char(char),
    End,
}

#[derive(Debug)]
pub(crate) enum Word {
    Value(f64),
    Function(Arc<FunctionDef>),
}

pub(crate) fn is_bracket_or_separator(c: char) -> bool {
    matches!(c, OPEN_BRACKET | CLOSE_BRACKET | ARGUMENT_SEPARATOR)
}

/// Words made only of digits, dots and operator symbols are numbers; the
/// operator symbols let a leading sign be part of the literal. Any Unicode
/// digit counts, so a run like `٣` is reported as a bad number.
fn is_number(word: &str, registry: &Registry) -> bool {
    word.chars()
        .all(|c| c.is_numeric() || c == '.' || registry.is_operator(c))
}

/// Decides whether `word` names a function, a number or a variable.
pub(crate) fn classify(
    word: &str,
    lookahead: Lookahead,
    registry: &Registry,
) -> Result<Word, ParseError> {
    if lookahead == Lookahead::Char(OPEN_BRACKET) {
        return registry
            .function(word)
            .cloned()
            .map(Word::Function)
            .ok_or_else(|| ParseError::function(word));
    }

    if is_number(word, registry) {
        trace!("'{}' is a number", word);
        return word
            .parse::<f64>()
            .map(Word::Value)
            .map_err(|_| ParseError::number(word));
    }

    if let Some(value) = registry.variable(word) {
        trace!("'{}' is a variable = {}", word, value);
        return Ok(Word::Value(value));
    }

    if lookahead == Lookahead::End && registry.function(word).is_some() {
        return Err(ParseError::function_variable(word));
    }

    Err(ParseError::variable(word))
}
