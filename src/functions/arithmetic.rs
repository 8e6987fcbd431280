use crate::evaluator::{EvalCursor, EvalFault};
use crate::registry::{OperatorDef, Precedence, Registry, RegistryError};
use mathparser_macros::math_fn;

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_operator(OperatorDef::new('+', Precedence::Add, "val1 + val2", add))?;
    registry.register_operator(OperatorDef::new('-', Precedence::Add, "val1 - val2", subtract))?;
    registry.register_operator(OperatorDef::new('*', Precedence::Multiply, "val1 * val2", multiply))?;
    registry.register_operator(OperatorDef::new('/', Precedence::Multiply, "val1 / val2", divide))?;
    registry.register_operator(OperatorDef::new('^', Precedence::Exponential, "val1 ^ val2", power))?;
    Ok(())
}

#[math_fn]
pub fn add(left: f64, right: f64) -> f64 {
    left + right
}

#[math_fn]
pub fn subtract(left: f64, right: f64) -> f64 {
    left - right
}

#[math_fn]
pub fn multiply(left: f64, right: f64) -> f64 {
    left * right
}

/// IEEE division; dividing by zero gives an infinity or NaN.
#[math_fn]
pub fn divide(left: f64, right: f64) -> f64 {
    left / right
}

#[math_fn]
pub fn power(base: f64, exponent: f64) -> f64 {
    base.powf(exponent)
}
