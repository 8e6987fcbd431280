use mathparser_rs::{compile, Registry};

fn main() {
    pretty_env_logger::init();

    let mut registry = Registry::with_builtins();
    registry.bind_variable("price", 120.0);
    registry.bind_variable("volume", 3000.0);

    let expression = "max(price, 50) * log(volume, 10) - 2^3";
    let program = match compile(expression, &registry) {
        Ok(program) => program,
        Err(err) => {
            println!("Error: {}", err);
            return;
        }
    };

    println!("Postfix: {}", program);
    match program.evaluate() {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }
}
