//! Line-at-a-time driver: assignments, evaluations, and quitting.

use std::fmt::Display;

use miette::{Diagnostic, LabeledSpan, SourceCode};
use num_complex::Complex64;
use thiserror::Error;

use crate::{EvalError, Environment, Limits, bind, compact, evaluate_with};

/// What one line did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Quit,
    Empty,
    Assigned { name: String, value: Complex64 },
    Value(Complex64),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Quit => write!(f, "exit"),
            Outcome::Empty => Ok(()),
            Outcome::Assigned { name, value } => write!(f, "{name} = {value}"),
            Outcome::Value(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("an assignment takes exactly one `=`, got `{line}`")]
    ChainedAssignment { line: String },

    #[error("`{name}` is not a valid name")]
    InvalidName { name: String },

    #[error("{error}")]
    Eval {
        /// The compacted expression the error's span points into.
        whole: String,
        error: EvalError,
    },
}

impl SessionError {
    pub fn eval_error(&self) -> Option<&EvalError> {
        match self {
            SessionError::Eval { error, .. } => Some(error),
            _ => None,
        }
    }
}

fn message<'a>(text: &'static str) -> Option<Box<dyn Display + 'a>> {
    let boxed: Box<dyn Display + 'a> = Box::new(text);
    Some(boxed)
}

impl Diagnostic for SessionError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        match self {
            SessionError::ChainedAssignment { .. } => message("complex_calc::chained_assignment"),
            SessionError::InvalidName { .. } => message("complex_calc::invalid_name"),
            SessionError::Eval { error, .. } => error.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        match self {
            SessionError::ChainedAssignment { .. } => {
                message("bind one name per line, e.g. `x = 1 + 2i`")
            }
            SessionError::InvalidName { .. } => message("names may only contain letters"),
            SessionError::Eval { error, .. } => error.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        match self {
            SessionError::Eval { whole, .. } => Some(whole as &dyn SourceCode),
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            SessionError::Eval { error, .. } => error.labels(),
            _ => None,
        }
    }
}

/// One run of the driver and the bindings it has made so far.
#[derive(Debug, Default)]
pub struct Session {
    environment: Environment,
    limits: Limits,
}

impl Session {
    pub fn new(limits: Limits) -> Self {
        Session {
            environment: Environment::new(),
            limits,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Runs one input line.
    ///
    /// `q` quits, `name = expression` binds, anything else is evaluated.
    /// A failed line leaves the bindings untouched.
    pub fn execute(&mut self, line: &str) -> Result<Outcome, SessionError> {
        let line = line.trim();
        if line == "q" {
            return Ok(Outcome::Quit);
        }
        if line.is_empty() {
            return Ok(Outcome::Empty);
        }

        let Some((name, expression)) = line.split_once('=') else {
            return self.evaluate(line).map(Outcome::Value);
        };
        if expression.contains('=') {
            return Err(SessionError::ChainedAssignment {
                line: line.to_string(),
            });
        }

        let name = compact(name);
        if name.is_empty() || !name.chars().all(char::is_alphabetic) {
            return Err(SessionError::InvalidName { name });
        }

        let value = self.evaluate(expression)?;
        bind(name.clone(), value, &mut self.environment);
        Ok(Outcome::Assigned { name, value })
    }

    fn evaluate(&self, expression: &str) -> Result<Complex64, SessionError> {
        evaluate_with(expression, &self.environment, self.limits).map_err(|error| {
            SessionError::Eval {
                whole: compact(expression),
                error,
            }
        })
    }
}
