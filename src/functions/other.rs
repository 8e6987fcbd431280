use crate::evaluator::{EvalCursor, EvalFault};
use crate::registry::{FunctionDef, Registry, RegistryError};
use mathparser_macros::math_fn;

pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    registry.register_function(FunctionDef::new("abs", ABS_ARITY, "abs(x)", abs))?;
    registry.register_function(FunctionDef::new("min", MIN_ARITY, "min(x,y)", min))?;
    registry.register_function(FunctionDef::new("max", MAX_ARITY, "max(x,y)", max))?;
    registry.register_function(FunctionDef::new("sqrt", SQRT_ARITY, "sqrt(x)", sqrt))?;
    registry.register_function(FunctionDef::new("sign", SIGN_ARITY, "sign(x)", sign))?;
    registry.register_function(FunctionDef::new("ceil", CEIL_ARITY, "ceil(x)", ceil))?;
    registry.register_function(FunctionDef::new("floor", FLOOR_ARITY, "floor(x)", floor))?;
    Ok(())
}

#[math_fn]
pub fn abs(x: f64) -> f64 {
    x.abs()
}

#[math_fn]
pub fn min(x: f64, y: f64) -> f64 {
    x.min(y)
}

#[math_fn]
pub fn max(x: f64, y: f64) -> f64 {
    x.max(y)
}

#[math_fn]
pub fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

/// -1, 0 or 1. Unlike `f64::signum`, zero maps to 0.
#[math_fn]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else if x == 0.0 {
        0.0
    } else {
        f64::NAN
    }
}

#[math_fn]
pub fn ceil(x: f64) -> f64 {
    x.ceil()
}

#[math_fn]
pub fn floor(x: f64) -> f64 {
    x.floor()
}

#[cfg(test)]
mod tests {
    use crate::parser::compile;
    use crate::registry::Registry;

    fn eval(expression: &str) -> f64 {
        compile(expression, &Registry::with_builtins())
            .unwrap()
            .evaluate()
            .unwrap()
    }

    #[test]
    fn test_rounding() {
        assert_eq!(eval("ceil(1.2)"), 2.0);
        assert_eq!(eval("floor(1.8)"), 1.0);
        assert_eq!(eval("floor(-1.2)"), -2.0);
        assert_eq!(eval("abs(-3.5)"), 3.5);
    }

    #[test]
    fn test_sign() {
        assert_eq!(eval("sign(-4)"), -1.0);
        assert_eq!(eval("sign(0)"), 0.0);
        assert_eq!(eval("sign(0.1)"), 1.0);
        assert!(eval("sign(0/0)").is_nan());
    }

    #[test]
    fn test_min_max() {
        assert_eq!(eval("min(5,2)"), 2.0);
        assert_eq!(eval("max(5,2)"), 5.0);
        assert_eq!(eval("min(-1, max(2, 3))"), -1.0);
        assert_eq!(eval("sqrt(max(16, 9))"), 4.0);
    }
}
