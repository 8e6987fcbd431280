pub mod arithmetic;
pub mod logarithmic;
pub mod other;
pub mod trigonometric;

use crate::registry::{Registry, RegistryError};
use std::f64::consts;

/// Constants every registry built by [`Registry::with_builtins`] knows.
pub const CONSTANTS: [(&str, f64); 2] = [("PI", consts::PI), ("E", consts::E)];

/// Adds the built-in operators, functions and constants to `registry`.
pub fn register_builtins(registry: &mut Registry) -> Result<(), RegistryError> {
    arithmetic::register(registry)?;
    trigonometric::register(registry)?;
    logarithmic::register(registry)?;
    other::register(registry)?;

    for (name, value) in CONSTANTS {
        registry.define_variable(name, value)?;
    }
    Ok(())
}
