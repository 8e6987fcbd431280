use crate::config::ParserConfig;
use crate::parser::{Compiler, ParseError};
use crate::registry::Registry;
use log::{debug, error};
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    pub name: String,
    pub value: f64,
}

impl VariableInfo {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorInfo {
    pub symbol: char,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRequest {
    pub expression: String,
    pub variables: Vec<VariableInfo>,
}

impl EvaluationRequest {
    pub fn new(expression: impl Into<String>, variables: Vec<VariableInfo>) -> Self {
        Self {
            expression: expression.into(),
            variables,
        }
    }
}

/// Outcome of one request. `error.target_type` is `TargetType::None` when
/// `result` holds the value of the expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub error: ParseError,
    pub result: f64,
}

impl Evaluation {
    fn success(result: f64) -> Self {
        Self {
            error: ParseError::none(),
            result,
        }
    }

    fn failure(error: ParseError) -> Self {
        Self { error, result: 0.0 }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<f64, ParseError> {
        if self.is_ok() {
            Ok(self.result)
        } else {
            Err(self.error)
        }
    }
}

/// Request/response front end over the compiler. Every request gets its own
/// registry, so requests never share mutable state.
#[derive(Debug, Clone, Default)]
pub struct ParserService {
    config: ParserConfig,
}

impl ParserService {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(ParserConfig::from_env())
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Built-ins plus the caller's variables; a caller variable named like a
    /// constant replaces it.
    fn build_registry(&self, variables: &[VariableInfo]) -> Registry {
        let mut registry = Registry::with_builtins();
        for variable in variables {
            registry.bind_variable(variable.name.as_str(), variable.value);
        }
        registry
    }

    pub fn evaluate_expression(&self, expression: &str, variables: &[VariableInfo]) -> Evaluation {
        let registry = self.build_registry(variables);

        let program = match Compiler::new(&registry)
            .with_config(self.config)
            .compile(expression)
        {
            Ok(program) => program,
            Err(err) => {
                debug!("Rejected {:?}: {}", expression, err);
                return Evaluation::failure(err);
            }
        };

        match program.evaluate() {
            Ok(result) => Evaluation::success(result),
            Err(fault) => {
                error!("Internal fault while evaluating {:?}: {}", expression, fault);
                Evaluation::failure(ParseError::other())
            }
        }
    }

    /// Evaluates independent requests in parallel; results keep the request
    /// order.
    pub fn evaluate_batch(&self, requests: &[EvaluationRequest]) -> Vec<Evaluation> {
        requests
            .par_iter()
            .map(|request| self.evaluate_expression(&request.expression, &request.variables))
            .collect()
    }

    pub fn available_variables(&self) -> Vec<VariableInfo> {
        let registry = Registry::with_builtins();
        let mut variables: Vec<VariableInfo> = registry
            .variables()
            .map(|(name, value)| VariableInfo::new(name, value))
            .collect();
        variables.sort_by(|a, b| a.name.cmp(&b.name));
        variables
    }

    pub fn available_functions(&self) -> Vec<FunctionInfo> {
        let registry = Registry::with_builtins();
        let mut functions: Vec<FunctionInfo> = registry
            .functions()
            .map(|function| FunctionInfo {
                name: function.name().to_string(),
                usage: function.usage().to_string(),
            })
            .collect();
        functions.sort_by(|a, b| a.name.cmp(&b.name));
        functions
    }

    pub fn available_operators(&self) -> Vec<OperatorInfo> {
        let registry = Registry::with_builtins();
        let mut operators: Vec<OperatorInfo> = registry
            .operators()
            .map(|operator| OperatorInfo {
                symbol: operator.symbol(),
                usage: operator.usage().to_string(),
            })
            .collect();
        operators.sort_by_key(|operator| operator.symbol);
        operators
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::TargetType;

    #[test]
    fn test_successful_evaluation() {
        let service = ParserService::default();
        let evaluation = service.evaluate_expression("2 + 3 * 4", &[]);
        assert!(evaluation.is_ok());
        assert_eq!(evaluation.error.target_type, TargetType::None);
        assert_eq!(evaluation.result, 14.0);
    }

    #[test]
    fn test_user_variables() {
        let service = ParserService::default();
        let variables = vec![VariableInfo::new("price", 20.0), VariableInfo::new("volume", 50.0)];
        let evaluation = service.evaluate_expression("(price + 10) * (volume - 5)", &variables);
        assert_eq!(evaluation.into_result(), Ok(1350.0));
    }

    #[test]
    fn test_user_variable_overrides_constant() {
        let service = ParserService::default();
        let evaluation = service.evaluate_expression("PI * 2", &[VariableInfo::new("PI", 3.0)]);
        assert_eq!(evaluation.into_result(), Ok(6.0));
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let service = ParserService::default();

        let evaluation = service.evaluate_expression("2+foo", &[]);
        assert!(!evaluation.is_ok());
        assert_eq!(evaluation.error, ParseError::variable("foo"));

        let evaluation = service.evaluate_expression("(2+3", &[]);
        assert_eq!(evaluation.into_result(), Err(ParseError::other()));
    }

    #[test]
    fn test_requests_do_not_share_variables() {
        let service = ParserService::default();
        let first = service.evaluate_expression("x", &[VariableInfo::new("x", 1.0)]);
        let second = service.evaluate_expression("x", &[]);
        assert_eq!(first.into_result(), Ok(1.0));
        assert_eq!(second.into_result(), Err(ParseError::variable("x")));
    }

    #[test]
    fn test_batch_keeps_order() {
        let service = ParserService::default();
        let requests: Vec<EvaluationRequest> = (0..64)
            .map(|i| EvaluationRequest::new("x * 2 + 1", vec![VariableInfo::new("x", i as f64)]))
            .chain(std::iter::once(EvaluationRequest::new("sin", vec![])))
            .collect();

        let evaluations = service.evaluate_batch(&requests);
        assert_eq!(evaluations.len(), 65);
        for (i, evaluation) in evaluations.iter().take(64).enumerate() {
            assert_eq!(evaluation.result, i as f64 * 2.0 + 1.0);
        }
        assert_eq!(
            evaluations[64].error,
            ParseError::function_variable("sin")
        );
    }

    #[test]
    fn test_depth_limit_from_config() {
        let service = ParserService::new(ParserConfig::new(2));
        assert!(service.evaluate_expression("1+2+3", &[]).is_ok());
        assert_eq!(
            service.evaluate_expression("1+2+3+4", &[]).error,
            ParseError::other()
        );
    }

    #[test]
    fn test_introspection() {
        let service = ParserService::default();

        let variables = service.available_variables();
        assert_eq!(
            variables,
            vec![
                VariableInfo::new("E", std::f64::consts::E),
                VariableInfo::new("PI", std::f64::consts::PI),
            ]
        );

        let functions = service.available_functions();
        assert_eq!(functions.len(), 14);
        assert_eq!(functions[0].name, "abs");
        assert!(functions
            .iter()
            .any(|f| f.name == "log" && f.usage == "log(x, base)"));

        let operators = service.available_operators();
        let symbols: Vec<char> = operators.iter().map(|op| op.symbol).collect();
        assert_eq!(symbols, vec!['*', '+', '-', '/', '^']);
        assert_eq!(operators[0].usage, "val1 * val2");
    }
}
