//! Splits a flat expression into plain text runs and parenthesized groups.

use std::fmt::Display;

use miette::SourceSpan;

use crate::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'de> {
    /// A run of text with no parentheses in it.
    Text { text: &'de str, offset: usize },
    /// One matched `(...)` span. `span` covers both parentheses.
    Group {
        span: SourceSpan,
        children: Vec<Segment<'de>>,
    },
}

impl Display for Segment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Text { text, .. } => write!(f, "{text}"),
            Segment::Group { children, .. } => {
                write!(f, "(")?;
                for child in children {
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Re-joins decomposed segments into the text they came from.
pub fn flatten(segments: &[Segment<'_>]) -> String {
    segments.iter().map(ToString::to_string).collect()
}

/// Decomposes `input` with no limit on nesting.
pub fn decompose(input: &str) -> Result<Vec<Segment<'_>>, EvalError> {
    decompose_within(input, usize::MAX)
}

/// Decomposes `input`, failing once groups nest deeper than `max_depth`.
pub fn decompose_within(input: &str, max_depth: usize) -> Result<Vec<Segment<'_>>, EvalError> {
    decompose_at(input, 0, 0, max_depth)
}

fn decompose_at<'de>(
    input: &'de str,
    base: usize,
    depth: usize,
    max_depth: usize,
) -> Result<Vec<Segment<'de>>, EvalError> {
    let opened = input.matches('(').count();
    let closed = input.matches(')').count();
    if opened != closed {
        return Err(EvalError::MalformedParentheses {
            fragment: input.to_string(),
            span: SourceSpan::from(base..base + input.len()),
        });
    }

    let mut segments = Vec::new();
    let mut rest = input;
    let mut at = base;

    loop {
        let Some(open) = rest.find('(') else {
            if !rest.is_empty() || segments.is_empty() {
                segments.push(Segment::Text {
                    text: rest,
                    offset: at,
                });
            }
            return Ok(segments);
        };

        if let Some(stray) = rest[..open].find(')') {
            return Err(EvalError::MalformedParentheses {
                fragment: rest.to_string(),
                span: SourceSpan::from(at + stray..at + stray + 1),
            });
        }

        let close = matching_close(rest, open).ok_or_else(|| EvalError::MalformedParentheses {
            fragment: rest.to_string(),
            span: SourceSpan::from(at + open..at + open + 1),
        })?;

        if depth + 1 > max_depth {
            return Err(EvalError::NestingTooDeep {
                limit: max_depth,
                span: SourceSpan::from(at + open..at + close + 1),
            });
        }

        if open > 0 {
            segments.push(Segment::Text {
                text: &rest[..open],
                offset: at,
            });
        }
        segments.push(Segment::Group {
            span: SourceSpan::from(at + open..at + close + 1),
            children: decompose_at(&rest[open + 1..close], at + open + 1, depth + 1, max_depth)?,
        });

        rest = &rest[close + 1..];
        at += close + 1;
        if rest.is_empty() {
            return Ok(segments);
        }
    }
}

/// Byte index of the `)` closing the `(` at `open`.
fn matching_close(input: &str, open: usize) -> Option<usize> {
    let mut nested = 0usize;
    for (i, c) in input[open + 1..].char_indices() {
        match c {
            '(' => nested += 1,
            ')' if nested > 0 => nested -= 1,
            ')' => return Some(open + 1 + i),
            _ => {}
        }
    }
    None
}
