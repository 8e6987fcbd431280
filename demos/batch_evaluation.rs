use mathparser_rs::{EvaluationRequest, ParserService, VariableInfo};

fn main() {
    pretty_env_logger::init();

    let service = ParserService::from_env();

    let expression = "(price + 10) * (volume - 5) / max(price, 1)";
    let requests = vec![
        EvaluationRequest::new(
            expression,
            vec![VariableInfo::new("price", 120.0), VariableInfo::new("volume", 3000.0)],
        ),
        EvaluationRequest::new(
            expression,
            vec![VariableInfo::new("price", 80.0), VariableInfo::new("volume", 6000.0)],
        ),
        EvaluationRequest::new(expression, vec![VariableInfo::new("price", 80.0)]),
    ];

    for (i, evaluation) in service.evaluate_batch(&requests).into_iter().enumerate() {
        match evaluation.into_result() {
            Ok(result) => println!("Result {}: {}", i, result),
            Err(err) => println!("Result {}: error: {}", i, err),
        }
    }

    println!("Functions:");
    for function in service.available_functions() {
        println!("  {:<8} {}", function.name, function.usage);
    }
}
