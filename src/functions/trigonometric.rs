use crate::evaluator::{EvalCursor, EvalFault};
use crate::registry::{FunctionDef, Registry, RegistryError};
use mathparser_macros::math_fn;

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_function(FunctionDef::new("sin", SIN_ARITY, "sin(x)", sin))?;
    registry.register_function(FunctionDef::new("cos", COS_ARITY, "cos(x)", cos))?;
    registry.register_function(FunctionDef::new("tan", TAN_ARITY, "tan(x)", tan))?;
    registry.register_function(FunctionDef::new("atan", ATAN_ARITY, "atan(x)", atan))?;
    Ok(())
}

/// Angles are in radians.
#[math_fn]
pub fn sin(x: f64) -> f64 {
    x.sin()
}

#[math_fn]
pub fn cos(x: f64) -> f64 {
    x.cos()
}

#[math_fn]
pub fn tan(x: f64) -> f64 {
    x.tan()
}

#[math_fn]
pub fn atan(x: f64) -> f64 {
    x.atan()
}
