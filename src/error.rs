use std::fmt::Display;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Ways a scope can fail its structural check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    EmptyScope,
    LeadingOperator,
    TrailingOperator,
    ConsecutiveOperators,
    MissingOperator,
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::EmptyScope => write!(f, "empty expression"),
            Shape::LeadingOperator => write!(f, "expression starts with an operator"),
            Shape::TrailingOperator => write!(f, "expression ends with an operator"),
            Shape::ConsecutiveOperators => write!(f, "two operators in a row"),
            Shape::MissingOperator => write!(f, "missing operator between two terms"),
        }
    }
}

/// Every failure `evaluate` can report.
///
/// Spans index into the whitespace-compacted expression, see [`crate::compact`].
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum EvalError {
    #[error("unbalanced parentheses in `{fragment}`")]
    #[diagnostic(
        code(complex_calc::malformed_parentheses),
        help("every `(` needs a matching `)` after it")
    )]
    MalformedParentheses {
        fragment: String,
        #[label("unmatched parenthesis here")]
        span: SourceSpan,
    },

    #[error("symbol '{symbol}' is not accepted in `{term}`")]
    #[diagnostic(
        code(complex_calc::invalid_symbol),
        help("terms are numbers like `2.5`, imaginaries like `3i`, or names made of letters")
    )]
    InvalidSymbol {
        symbol: char,
        term: String,
        #[label("this symbol")]
        span: SourceSpan,
    },

    #[error("invalid literal `{literal}`: {reason}")]
    #[diagnostic(code(complex_calc::invalid_literal))]
    InvalidLiteral {
        literal: String,
        reason: &'static str,
        #[label("this literal")]
        span: SourceSpan,
    },

    #[error("malformed expression: {shape}")]
    #[diagnostic(code(complex_calc::malformed_expression))]
    MalformedExpression {
        shape: Shape,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("undefined variable `{name}`")]
    #[diagnostic(
        code(complex_calc::undefined_variable),
        help("assign it first with `name = expression`")
    )]
    UndefinedVariable {
        name: String,
        #[label("not defined")]
        span: SourceSpan,
    },

    #[error("parentheses nested deeper than {limit} levels")]
    #[diagnostic(code(complex_calc::nesting_too_deep))]
    NestingTooDeep {
        limit: usize,
        #[label("too deep")]
        span: SourceSpan,
    },

    #[error("could not reduce every term, {remaining} left")]
    #[diagnostic(
        code(complex_calc::reduction),
        help("this is a bug in the evaluator, not in the input")
    )]
    ReductionError { remaining: usize },
}

impl EvalError {
    /// Location of the offending text, when there is one.
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            EvalError::MalformedParentheses { span, .. }
            | EvalError::InvalidSymbol { span, .. }
            | EvalError::InvalidLiteral { span, .. }
            | EvalError::MalformedExpression { span, .. }
            | EvalError::UndefinedVariable { span, .. }
            | EvalError::NestingTooDeep { span, .. } => Some(*span),
            EvalError::ReductionError { .. } => None,
        }
    }
}
