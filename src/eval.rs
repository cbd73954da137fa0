use std::collections::HashMap;

use num_complex::Complex64;

use crate::{
    EvalError,
    parse::{Expression, Op, Term},
};

/// Named values shared by every evaluation in one session.
///
/// Bindings are only ever added or overwritten, never removed.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    values: HashMap<String, Complex64>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Complex64> {
        self.values.get(name)
    }

    pub fn define(&mut self, name: impl Into<String>, value: Complex64) {
        self.values.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bindings sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Complex64)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}

impl Expression {
    /// Reduces the tree to one value.
    ///
    /// Groups are reduced first, then every `*` left to right, then every `+`.
    pub fn evaluate(&self) -> Result<Complex64, EvalError> {
        let terms = self
            .terms
            .iter()
            .map(|term| match term {
                Term::Group(expression) => expression.evaluate().map(Term::Value),
                Term::Op(op) => Ok(Term::Op(*op)),
                Term::Value(value) => Ok(Term::Value(*value)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let terms = apply(terms, Op::Star, |lhs, rhs| lhs * rhs)?;
        let terms = apply(terms, Op::Plus, |lhs, rhs| lhs + rhs)?;

        match terms.as_slice() {
            [Term::Value(value)] => Ok(*value),
            rest => Err(EvalError::ReductionError {
                remaining: rest.len(),
            }),
        }
    }
}

/// Collapses every `lhs <target> rhs` triple into one value, left to right.
fn apply(
    terms: Vec<Term>,
    target: Op,
    combine: impl Fn(Complex64, Complex64) -> Complex64,
) -> Result<Vec<Term>, EvalError> {
    let remaining = terms.len();
    let mut reduced = Vec::with_capacity(terms.len());
    let mut terms = terms.into_iter();

    while let Some(term) = terms.next() {
        match term {
            Term::Op(op) if op == target => match (reduced.pop(), terms.next()) {
                (Some(Term::Value(lhs)), Some(Term::Value(rhs))) => {
                    reduced.push(Term::Value(combine(lhs, rhs)));
                }
                _ => return Err(EvalError::ReductionError { remaining }),
            },
            term => reduced.push(term),
        }
    }
    Ok(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Limits;

    fn value(re: f64, im: f64) -> Term {
        Term::Value(Complex64::new(re, im))
    }

    fn evaluate(whole: &str) -> Complex64 {
        Expression::parse(whole, &Environment::new(), Limits::default())
            .and_then(|expression| expression.evaluate())
            .unwrap()
    }

    #[test]
    fn multiplication_binds_tighter() {
        assert_eq!(evaluate("2+3*4"), Complex64::new(14.0, 0.0));
        assert_eq!(evaluate("2*3+4"), Complex64::new(10.0, 0.0));
    }

    #[test]
    fn groups_bind_tightest() {
        assert_eq!(evaluate("(2+3)*4"), Complex64::new(20.0, 0.0));
        assert_eq!(evaluate("((((7))))"), Complex64::new(7.0, 0.0));
    }

    #[test]
    fn complex_products() {
        assert_eq!(evaluate("i*i"), Complex64::new(-1.0, 0.0));
        assert_eq!(evaluate("i+3i*5*(1+(3+6i))"), Complex64::new(-90.0, 61.0));
    }

    #[test]
    fn apply_collapses_chains() {
        let terms = vec![
            value(2.0, 0.0),
            Term::Op(Op::Star),
            value(3.0, 0.0),
            Term::Op(Op::Star),
            value(0.0, 1.0),
            Term::Op(Op::Plus),
            value(1.0, 0.0),
        ];
        let terms = apply(terms, Op::Star, |lhs, rhs| lhs * rhs).unwrap();
        assert_eq!(terms, vec![value(0.0, 6.0), Term::Op(Op::Plus), value(1.0, 0.0)]);
    }

    #[test]
    fn leftover_terms_are_a_reduction_error() {
        let broken = Expression {
            terms: vec![value(1.0, 0.0), value(2.0, 0.0)],
        };
        assert!(matches!(
            broken.evaluate(),
            Err(EvalError::ReductionError { remaining: 2 })
        ));

        let dangling = Expression {
            terms: vec![value(1.0, 0.0), Term::Op(Op::Star)],
        };
        assert!(matches!(
            dangling.evaluate(),
            Err(EvalError::ReductionError { .. })
        ));
    }

    #[test]
    fn environment_overwrites() {
        let mut env = Environment::new();
        assert!(env.is_empty());
        env.define("x", Complex64::new(1.0, 0.0));
        env.define("x", Complex64::new(2.0, 0.0));
        env.define("a", Complex64::new(3.0, 0.0));
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("x"), Some(&Complex64::new(2.0, 0.0)));
        let names: Vec<_> = env.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "x"]);
    }
}
