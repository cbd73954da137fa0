//! Evaluates flat strings of parenthesized arithmetic over complex numbers.
//!
//! ```
//! use complex_calc::{Complex64, Environment, bind, evaluate};
//!
//! let mut env = Environment::new();
//! bind("a", Complex64::new(1.0, 0.0), &mut env);
//! assert_eq!(evaluate("2 + 3 * a", &env).unwrap(), Complex64::new(5.0, 0.0));
//! ```

pub mod decompose;
pub mod error;
pub mod eval;
pub mod lex;
pub mod literal;
pub mod parse;
pub mod session;

pub use error::EvalError;
pub use eval::Environment;
pub use num_complex::Complex64;
pub use parse::Expression;
pub use session::Session;

/// Nesting limit used when the caller does not pick one.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Deepest parenthesis nesting accepted before evaluation gives up.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Drops all whitespace. Error spans index into this form of the input.
pub fn compact(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

pub fn evaluate(expression: &str, env: &Environment) -> Result<Complex64, EvalError> {
    evaluate_with(expression, env, Limits::default())
}

pub fn evaluate_with(
    expression: &str,
    env: &Environment,
    limits: Limits,
) -> Result<Complex64, EvalError> {
    let whole = compact(expression);
    Expression::parse(&whole, env, limits)?.evaluate()
}

/// Binds `name` for every later evaluation against `env`.
///
/// Callers check the name themselves; see [`Session`] for the usual rules.
pub fn bind(name: impl Into<String>, value: Complex64, env: &mut Environment) {
    env.define(name, value);
}
