use std::fmt::Display;

use miette::SourceSpan;
use num_complex::Complex64;

use crate::{
    EvalError, Limits,
    decompose::{Segment, decompose_within},
    error::Shape,
    eval::Environment,
    lex::{Token, TokenKind, tokenize},
    literal::resolve,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Plus,
    Star,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Op(Op),
    Value(Complex64),
    Group(Expression),
}

/// One scope of a fully resolved expression: the whole input, or the inside
/// of one pair of parentheses.
///
/// A constructed expression always alternates value, operator, value, ...,
/// value, and holds no unresolved names.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub(crate) terms: Vec<Term>,
}

/// A term mid-construction, before names and literals are resolved.
enum Slot<'de> {
    Token(Token<'de>),
    Group(Expression),
}

impl Slot<'_> {
    fn is_operator(&self) -> bool {
        matches!(self, Slot::Token(token) if token.is_operator())
    }
}

impl Expression {
    /// Builds the tree for an already compacted expression.
    pub fn parse(whole: &str, env: &Environment, limits: Limits) -> Result<Self, EvalError> {
        let segments = decompose_within(whole, limits.max_depth)?;
        Self::from_segments(&segments, SourceSpan::from(0..whole.len()), env)
    }

    fn from_segments(
        segments: &[Segment<'_>],
        scope: SourceSpan,
        env: &Environment,
    ) -> Result<Self, EvalError> {
        let mut slots = Vec::new();
        for segment in segments {
            match segment {
                Segment::Text { text, offset } => {
                    slots.extend(tokenize(text, *offset).into_iter().map(Slot::Token));
                }
                Segment::Group { span, children } => {
                    slots.push(Slot::Group(Self::from_segments(children, *span, env)?));
                }
            }
        }

        check_shape(&slots, scope)?;

        let terms = slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Group(expression) => Ok(Term::Group(expression)),
                Slot::Token(token) => match token.kind {
                    TokenKind::Plus => Ok(Term::Op(Op::Plus)),
                    TokenKind::Star => Ok(Term::Op(Op::Star)),
                    TokenKind::NegativeOne => Ok(Term::Value(Complex64::new(-1.0, 0.0))),
                    TokenKind::Term => resolve(token.literal, token.offset, env).map(Term::Value),
                },
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Expression { terms })
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }
}

fn check_shape(slots: &[Slot<'_>], scope: SourceSpan) -> Result<(), EvalError> {
    let malformed = |shape, span| EvalError::MalformedExpression { shape, span };
    let token_span =
        |token: &Token<'_>| SourceSpan::from(token.offset..token.offset + token.literal.len());

    if slots.is_empty() {
        return Err(malformed(Shape::EmptyScope, scope));
    }
    for slot in slots {
        if let Slot::Token(token @ Token { kind: TokenKind::Term, literal: "", .. }) = slot {
            let span = if slots.len() == 1 { scope } else { token_span(token) };
            return Err(malformed(Shape::EmptyScope, span));
        }
    }

    if let Some(Slot::Token(token)) = slots.first().filter(|slot| slot.is_operator()) {
        return Err(malformed(Shape::LeadingOperator, token_span(token)));
    }
    if let Some(Slot::Token(token)) = slots.last().filter(|slot| slot.is_operator()) {
        return Err(malformed(Shape::TrailingOperator, token_span(token)));
    }

    for pair in slots.windows(2) {
        let (before, after) = (&pair[0], &pair[1]);
        match (before.is_operator(), after.is_operator()) {
            (true, true) => {
                let span = match after {
                    Slot::Token(token) => token_span(token),
                    Slot::Group(_) => scope,
                };
                return Err(malformed(Shape::ConsecutiveOperators, span));
            }
            (false, false) => {
                let span = match (before, after) {
                    (Slot::Token(token), _) | (_, Slot::Token(token)) => token_span(token),
                    _ => scope,
                };
                return Err(malformed(Shape::MissingOperator, span));
            }
            _ => {}
        }
    }
    Ok(())
}

impl Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::Plus => write!(f, "+"),
            Op::Star => write!(f, "*"),
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Op(op) => write!(f, "{op}"),
            Term::Value(value) => write!(f, "[{value}]"),
            Term::Group(expression) => write!(f, "({expression})"),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(whole: &str) -> Result<Expression, EvalError> {
        Expression::parse(whole, &Environment::default(), Limits::default())
    }

    fn shape_of(whole: &str) -> Shape {
        match parse(whole) {
            Err(EvalError::MalformedExpression { shape, .. }) => shape,
            other => panic!("expected a malformed expression for `{whole}`, got {other:?}"),
        }
    }

    #[test]
    fn alternates_values_and_operators() {
        let expression = parse("1+2*(3)").unwrap();
        assert!(matches!(
            expression.terms(),
            [Term::Value(_), Term::Op(Op::Plus), Term::Value(_), Term::Op(Op::Star), Term::Group(_)]
        ));
    }

    #[test]
    fn subtraction_inside_groups_is_rewritten_per_scope() {
        let expression = parse("1-(3-2)").unwrap();
        let [_, Term::Op(Op::Plus), Term::Value(minus_one), Term::Op(Op::Star), Term::Group(inner)] =
            expression.terms()
        else {
            panic!("unexpected shape: {expression}");
        };
        assert_eq!(*minus_one, Complex64::new(-1.0, 0.0));
        assert_eq!(inner.terms().len(), 5);
    }

    #[test]
    fn structural_failures() {
        assert_eq!(shape_of(""), Shape::EmptyScope);
        assert_eq!(shape_of("1+()"), Shape::EmptyScope);
        assert_eq!(shape_of("+1"), Shape::LeadingOperator);
        assert_eq!(shape_of("-1"), Shape::LeadingOperator);
        assert_eq!(shape_of("1*"), Shape::TrailingOperator);
        assert_eq!(shape_of("1++2"), Shape::ConsecutiveOperators);
        assert_eq!(shape_of("2*-3"), Shape::ConsecutiveOperators);
        assert_eq!(shape_of("2(3)"), Shape::MissingOperator);
        assert_eq!(shape_of("(1)(2)"), Shape::MissingOperator);
    }

    #[test]
    fn empty_group_points_at_the_parentheses() {
        let err = parse("1+()").unwrap_err();
        assert_eq!(err.span(), Some(SourceSpan::from(2..4)));
    }

    #[test]
    fn inner_errors_surface_first() {
        assert!(matches!(
            parse("+(1.2.3)"),
            Err(EvalError::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn display() {
        let expression = parse("2*(i+1)").unwrap();
        assert_eq!(expression.to_string(), "[2+0i] * ([0+1i] + [1+0i])");
    }
}
