//! Turns one parenthesis-free run of text into value and operator tokens.
//!
//! Subtraction is rewritten first: every `-` becomes `+ (-1) *`, so the
//! rest of the pipeline only ever sees `+` and `*`.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Plus,
    Star,
    /// The `-1` factor a `-` expands into.
    NegativeOne,
    /// A literal or variable name, not yet resolved.
    Term,
}

impl Token<'_> {
    pub fn is_operator(&self) -> bool {
        matches!(self.kind, TokenKind::Plus | TokenKind::Star)
    }
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        match self.kind {
            TokenKind::Plus => write!(f, "PLUS {lit} null"),
            TokenKind::Star => write!(f, "STAR {lit} null"),
            TokenKind::NegativeOne => write!(f, "NEGATIVE_ONE {lit} -1"),
            TokenKind::Term => write!(f, "TERM {lit} null"),
        }
    }
}

/// Rewrites subtraction, then isolates the remaining operators.
pub fn tokenize(text: &str, offset: usize) -> Vec<Token<'_>> {
    rewrite_subtraction(text, offset)
        .into_iter()
        .flat_map(|token| match token.kind {
            TokenKind::Term => split_operators(token.literal, token.offset),
            _ => vec![token],
        })
        .collect()
}

/// Replaces each `-` with `+`, `-1`, `*`, leaving everything else as raw terms.
///
/// Text before a `-` is kept only when non-empty, so a leading `-` expands to
/// a leading `+`. Only an input that is empty to begin with yields an empty term.
pub fn rewrite_subtraction(text: &str, offset: usize) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = text;
    let mut at = offset;

    while let Some(minus) = rest.find('-') {
        if minus > 0 {
            tokens.push(Token {
                kind: TokenKind::Term,
                literal: &rest[..minus],
                offset: at,
            });
        }
        let literal = &rest[minus..minus + 1];
        for kind in [TokenKind::Plus, TokenKind::NegativeOne, TokenKind::Star] {
            tokens.push(Token {
                kind,
                literal,
                offset: at + minus,
            });
        }
        rest = &rest[minus + 1..];
        at += minus + 1;
    }

    if !rest.is_empty() || tokens.is_empty() {
        tokens.push(Token {
            kind: TokenKind::Term,
            literal: rest,
            offset: at,
        });
    }
    tokens
}

/// Splits `3*5+2` into `3`, `*`, `5`, `+`, `2`.
pub fn split_operators(text: &str, offset: usize) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        let kind = match c {
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            _ => continue,
        };
        if start < i {
            tokens.push(Token {
                kind: TokenKind::Term,
                literal: &text[start..i],
                offset: offset + start,
            });
        }
        tokens.push(Token {
            kind,
            literal: &text[i..i + 1],
            offset: offset + i,
        });
        start = i + 1;
    }

    if start < text.len() || tokens.is_empty() {
        tokens.push(Token {
            kind: TokenKind::Term,
            literal: &text[start..],
            offset: offset + start,
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token<'_>]) -> Vec<TokenKind> {
        tokens.iter().map(|token| token.kind).collect()
    }

    fn literals<'de>(tokens: &[Token<'de>]) -> Vec<&'de str> {
        tokens.iter().map(|token| token.literal).collect()
    }

    #[test]
    fn no_minus_is_unchanged() {
        let tokens = rewrite_subtraction("3*5", 4);
        assert_eq!(
            tokens,
            vec![Token {
                kind: TokenKind::Term,
                literal: "3*5",
                offset: 4
            }]
        );
    }

    #[test]
    fn binary_minus() {
        use TokenKind::*;
        let tokens = rewrite_subtraction("a-3", 0);
        assert_eq!(kinds(&tokens), vec![Term, Plus, NegativeOne, Star, Term]);
        assert_eq!(tokens[4].literal, "3");
        assert_eq!(tokens[4].offset, 2);
    }

    #[test]
    fn leading_minus_becomes_leading_plus() {
        use TokenKind::*;
        let tokens = rewrite_subtraction("-3", 0);
        assert_eq!(kinds(&tokens), vec![Plus, NegativeOne, Star, Term]);
    }

    #[test]
    fn trailing_minus_drops_the_empty_tail() {
        use TokenKind::*;
        let tokens = rewrite_subtraction("a-", 0);
        assert_eq!(kinds(&tokens), vec![Term, Plus, NegativeOne, Star]);
    }

    #[test]
    fn repeated_minus() {
        use TokenKind::*;
        let tokens = rewrite_subtraction("1-2-3", 0);
        assert_eq!(
            kinds(&tokens),
            vec![Term, Plus, NegativeOne, Star, Term, Plus, NegativeOne, Star, Term]
        );
        assert_eq!(tokens[8].offset, 4);
    }

    #[test]
    fn split_keeps_order_and_offsets() {
        let tokens = split_operators("3*5+2", 10);
        assert_eq!(literals(&tokens), vec!["3", "*", "5", "+", "2"]);
        assert_eq!(
            tokens.iter().map(|t| t.offset).collect::<Vec<_>>(),
            vec![10, 11, 12, 13, 14]
        );
    }

    #[test]
    fn split_edges() {
        assert_eq!(literals(&split_operators("+3", 0)), vec!["+", "3"]);
        assert_eq!(literals(&split_operators("3*", 0)), vec!["3", "*"]);
        assert_eq!(literals(&split_operators("*", 0)), vec!["*"]);
        assert_eq!(literals(&split_operators("", 0)), vec![""]);
        assert_eq!(literals(&split_operators("1++2", 0)), vec!["1", "+", "+", "2"]);
    }

    #[test]
    fn tokenize_combines_both_passes() {
        use TokenKind::*;
        let tokens = tokenize("a-0.01*b", 0);
        assert_eq!(
            kinds(&tokens),
            vec![Term, Plus, NegativeOne, Star, Term, Star, Term]
        );
        assert_eq!(literals(&tokens)[4], "0.01");
        assert!(tokens[1].is_operator());
        assert!(!tokens[2].is_operator());
    }
}
