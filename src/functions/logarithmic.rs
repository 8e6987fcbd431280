use crate::evaluator::{EvalCursor, EvalFault};
use crate::registry::{FunctionDef, Registry, RegistryError};
use mathparser_macros::math_fn;

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_function(FunctionDef::new("log", LOG_ARITY, "log(x, base)", log))?;
    registry.register_function(FunctionDef::new("ln", LN_ARITY, "ln(x)", ln))?;
    registry.register_function(FunctionDef::new("log10", LOG10_ARITY, "log10(x)", log10))?;
    Ok(())
}

/// Logarithm of `x` in an arbitrary `base`; `base` is pulled first.
#[math_fn]
pub fn log(x: f64, base: f64) -> f64 {
    x.log(base)
}

#[math_fn]
pub fn ln(x: f64) -> f64 {
    x.ln()
}

#[math_fn]
pub fn log10(x: f64) -> f64 {
    x.log10()
}
