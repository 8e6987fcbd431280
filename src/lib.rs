pub mod config;
pub mod evaluator;
pub mod functions;
pub mod parser;
pub mod registry;
pub mod service;

pub use config::ParserConfig;
pub use evaluator::{EvalCursor, EvalFault};
pub use parser::{compile, CompiledProgram, Compiler, Item, ParseError, TargetType};
pub use registry::{FunctionDef, OperatorDef, Precedence, Registry, RegistryError};
pub use service::{Evaluation, EvaluationRequest, ParserService, VariableInfo};

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalFault),
}

/// Compiles and evaluates `expression` in one go, with the built-in catalog
/// plus `variables`.
pub fn evaluate_expression(expression: &str, variables: &HashMap<String, f64>) -> Result<f64, Error> {
    let mut registry = Registry::with_builtins();
    for (name, value) in variables {
        registry.bind_variable(name.as_str(), *value);
    }

    let program = compile(expression, &registry)?;
    Ok(program.evaluate()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn eval(expression: &str) -> Result<f64, Error> {
        evaluate_expression(expression, &HashMap::new())
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return a.is_nan() && b.is_nan();
        }
        if a.is_infinite() || b.is_infinite() {
            return a == b;
        }
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_readme_expressions() {
        assert_eq!(eval("2+3*4"), Ok(14.0));
        assert_eq!(eval("(2+3)*4"), Ok(20.0));
        assert_eq!(eval("2^3^2"), Ok(64.0));
        assert_eq!(eval("log(8,2)"), Ok(3.0));
        assert_eq!(eval("max(min(1,2),3)"), Ok(3.0));
        assert_eq!(eval("-2+3"), Ok(1.0));
        assert_eq!(eval("2*-3"), Ok(-6.0));
        assert_eq!(eval("(2)-3"), Ok(-1.0));
        assert_eq!(eval("sin(0)"), Ok(0.0));
    }

    #[test]
    fn test_context_variables() {
        let mut variables = HashMap::new();
        variables.insert("price".to_string(), 20.0);
        variables.insert("PI".to_string(), 3.0);

        assert_eq!(evaluate_expression("price * 2", &variables), Ok(40.0));
        assert_eq!(evaluate_expression("PI", &variables), Ok(3.0));
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval("2+foo"), Err(Error::Parse(ParseError::variable("foo"))));
        assert_eq!(eval("foo(1)"), Err(Error::Parse(ParseError::function("foo"))));
        assert_eq!(eval("1..2"), Err(Error::Parse(ParseError::number("1..2"))));
        assert_eq!(eval("sin"), Err(Error::Parse(ParseError::function_variable("sin"))));
        assert_eq!(eval("(1"), Err(Error::Parse(ParseError::other())));
        assert_eq!(eval("2*(-3)"), Err(Error::Parse(ParseError::other())));
    }

    #[test]
    fn test_ieee_results_are_values() {
        assert_eq!(eval("1/0"), Ok(f64::INFINITY));
        assert_eq!(eval("-1/0"), Ok(f64::NEG_INFINITY));
        assert!(eval("sqrt(-1)").unwrap().is_nan());
        assert!(eval("0/0").unwrap().is_nan());
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 200;
        let expression = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(eval(&expression), Ok(1.0));

        let chain = vec!["1"; 600].join("+");
        assert_eq!(eval(&chain), Err(Error::Parse(ParseError::other())));
    }

    fn random_expression(rng: &mut StdRng, depth: usize) -> String {
        if depth == 0 || rng.random_bool(0.3) {
            return rng.random_range(1..=9).to_string();
        }
        let operator = ['+', '-', '*', '/'][rng.random_range(0..4)];
        let left = random_expression(rng, depth - 1);
        let right = random_expression(rng, depth - 1);
        format!("({}{}{})", left, operator, right)
    }

    #[test]
    fn test_matches_meval_on_random_expressions() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let expression = random_expression(&mut rng, 5);
            let ours = eval(&expression).expect("Evaluation failed");
            let reference = meval::eval_str(&expression).expect("meval failed");
            assert!(
                approx_eq(ours, reference),
                "{} => {} (meval: {})",
                expression,
                ours,
                reference
            );
        }
    }

    #[test]
    fn test_unbracketed_chains_match_meval() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let mut expression = rng.random_range(1..=9).to_string();
            for _ in 0..rng.random_range(1..8) {
                let operator = ['+', '-', '*', '/'][rng.random_range(0..4)];
                expression.push(operator);
                expression.push_str(&rng.random_range(1..=9).to_string());
            }

            let ours = eval(&expression).expect("Evaluation failed");
            let reference = meval::eval_str(&expression).expect("meval failed");
            assert!(approx_eq(ours, reference), "{} => {} (meval: {})", expression, ours, reference);
        }
    }
}
