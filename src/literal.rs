use miette::SourceSpan;
use num_complex::Complex64;

use crate::{EvalError, eval::Environment};

fn is_numeric(c: char) -> bool {
    c.is_ascii_digit() || c == '.' || c == 'i'
}

/// Resolves a raw term into a value.
///
/// Numeric literals take priority over names, so a bare `i` is always the
/// imaginary unit even if a variable called `i` was bound.
pub fn resolve(term: &str, offset: usize, env: &Environment) -> Result<Complex64, EvalError> {
    if term.chars().all(is_numeric) {
        return read_number(term, offset);
    }

    if term.chars().all(char::is_alphabetic) {
        return env
            .get(term)
            .copied()
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: term.to_string(),
                span: SourceSpan::from(offset..offset + term.len()),
            });
    }

    // Prefer a symbol that fits neither alphabet; for mixes like `2a` blame
    // the first character that breaks the number.
    let (at, symbol) = term
        .char_indices()
        .find(|&(_, c)| !is_numeric(c) && !c.is_alphabetic())
        .or_else(|| term.char_indices().find(|&(_, c)| !is_numeric(c)))
        .unwrap_or((0, '?'));

    Err(EvalError::InvalidSymbol {
        symbol,
        term: term.to_string(),
        span: SourceSpan::from(offset + at..offset + at + symbol.len_utf8()),
    })
}

/// Reads `2`, `2.5`, `i`, or `2.5i`.
fn read_number(literal: &str, offset: usize) -> Result<Complex64, EvalError> {
    match literal.split_once('i') {
        None => read_real(literal, literal, offset).map(|re| Complex64::new(re, 0.0)),
        Some(("", "")) => Ok(Complex64::i()),
        Some((magnitude, "")) => {
            read_real(magnitude, literal, offset).map(|im| Complex64::new(0.0, im))
        }
        Some(_) => Err(EvalError::InvalidLiteral {
            literal: literal.to_string(),
            reason: "an imaginary literal takes one trailing `i`",
            span: SourceSpan::from(offset..offset + literal.len()),
        }),
    }
}

fn read_real(digits: &str, literal: &str, offset: usize) -> Result<f64, EvalError> {
    let invalid = |reason: &'static str| EvalError::InvalidLiteral {
        literal: literal.to_string(),
        reason,
        span: SourceSpan::from(offset..offset + literal.len()),
    };

    if digits.matches('.').count() > 1 {
        return Err(invalid("more than one decimal point"));
    }
    digits.parse().map_err(|_| invalid("not a number"))
}
