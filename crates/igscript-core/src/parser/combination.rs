//! Combination detection — finding `(left [OP] right)` spans and their levels
//!
//! Scans a string once per pass with a stack of open spans. Each span
//! records the first operator seen directly inside it; the span is a
//! complete combination if it closes with one operator and non-empty
//! operands on both sides.
//!
//! Repeating the same operator inside one span (`(a [AND] b [AND] c)`)
//! rewrites the input into left-associative form (`((a [AND] b) [AND] c)`)
//! and restarts detection on the rewritten text, so callers must use
//! [`Detection::input`] for all offsets.
//!
//! In brace mode, operators inside parentheses belong to component
//! content and are skipped, and braces preceded by a component tag
//! (`Cac{...}`) are opaque nested statements rather than spans.
//!
//! Guarantees:
//! - Deterministic: same input always produces same levels
//! - Mixed operators on one level are rejected, never guessed
//! - Offsets in every [`Boundary`] index into [`Detection::input`]

use std::collections::BTreeMap;

use crate::error::{ParseError, Result};
use crate::parser::ast::LogicalOperator;
use crate::parser::boundary::header_before;
use crate::parser::scanner::{check_balance, tokenize, Span, Token};

/// Which delimiter pair scopes combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiters {
    /// Inside component content: `I((a [AND] b))`
    Parentheses,
    /// Across statement fragments: `{I(a) [XOR] I(b)}`
    Braces,
}

impl Delimiters {
    pub const fn open(&self) -> char {
        match self {
            Delimiters::Parentheses => '(',
            Delimiters::Braces => '{',
        }
    }

    pub const fn close(&self) -> char {
        match self {
            Delimiters::Parentheses => ')',
            Delimiters::Braces => '}',
        }
    }

    fn opens(&self, token: &Token) -> bool {
        matches!(
            (self, token),
            (Delimiters::Parentheses, Token::LParen) | (Delimiters::Braces, Token::LBrace)
        )
    }

    fn closes(&self, token: &Token) -> bool {
        matches!(
            (self, token),
            (Delimiters::Parentheses, Token::RParen) | (Delimiters::Braces, Token::RBrace)
        )
    }
}

/// One delimited span at one nesting level
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Offset of the opening delimiter
    pub left: usize,
    /// Offset of the closing delimiter
    pub right: usize,
    pub operator: Option<LogicalOperator>,
    /// Byte range of the operator token; both zero without operator
    pub operator_start: usize,
    pub operator_end: usize,
    /// Exactly one operator with non-empty operands on both sides
    pub complete: bool,
}

impl Boundary {
    /// Whether `other` lies strictly inside this span
    pub fn contains(&self, other: &Boundary) -> bool {
        self.left < other.left && other.right < self.right
    }
}

/// Result of detection over one (possibly rewritten) string
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Input after left-associative rewriting
    pub input: String,
    /// Spans by level (1 = outermost), each level in textual order
    pub levels: BTreeMap<usize, Vec<Boundary>>,
    /// Runs of text outside any span, trimmed, in textual order
    pub non_shared: Vec<String>,
}

impl Detection {
    /// Lowest level holding a complete combination
    pub fn first_complete_level(&self) -> Option<usize> {
        self.levels
            .iter()
            .find(|(_, spans)| spans.iter().any(|b| b.complete))
            .map(|(level, _)| *level)
    }

    pub fn complete_at(&self, level: usize) -> Vec<&Boundary> {
        self.levels
            .get(&level)
            .map(|spans| spans.iter().filter(|b| b.complete).collect())
            .unwrap_or_default()
    }

    /// Span one level up that contains `boundary`
    pub fn enclosing(&self, level: usize, boundary: &Boundary) -> Option<&Boundary> {
        let parent_level = level.checked_sub(1)?;
        self.levels
            .get(&parent_level)?
            .iter()
            .find(|candidate| candidate.contains(boundary))
    }
}

// ── Scanning ──────────────────────────────────────────────

/// Span opened but not yet closed during one pass
#[derive(Debug)]
struct OpenSpan {
    left: usize,
    level: usize,
    operator: Option<(LogicalOperator, usize, usize)>,
}

enum Pass {
    Done(Detection),
    Rewritten(String),
}

/// Detect combinations in `text` under the given delimiter mode
pub fn detect(text: &str, delimiters: Delimiters) -> Result<Detection> {
    check_balance(text)?;
    let mut input = text.to_string();
    loop {
        match scan(&input, delimiters)? {
            Pass::Done(detection) => {
                tracing::trace!(
                    levels = detection.levels.len(),
                    input = %detection.input,
                    "Combination detection finished"
                );
                return Ok(detection);
            }
            Pass::Rewritten(rewritten) => {
                tracing::trace!(input = %rewritten, "Rewrote repeated operator");
                input = rewritten;
            }
        }
    }
}

fn scan(text: &str, delimiters: Delimiters) -> Result<Pass> {
    let mut stack: Vec<OpenSpan> = Vec::new();
    let mut levels: BTreeMap<usize, Vec<Boundary>> = BTreeMap::new();
    let mut non_shared = Vec::new();
    let mut run = String::new();
    // Parentheses nesting while in brace mode
    let mut content_depth = 0usize;
    // Depth inside a tagged brace block while in brace mode
    let mut opaque_depth = 0usize;

    for st in tokenize(text) {
        let offset = st.span.offset;
        let raw = &text[offset..st.end];

        if opaque_depth > 0 {
            match st.token {
                Token::LBrace => opaque_depth += 1,
                Token::RBrace => opaque_depth -= 1,
                _ => {}
            }
            if stack.is_empty() {
                run.push_str(raw);
            }
            continue;
        }

        if delimiters == Delimiters::Braces {
            match st.token {
                Token::LParen => content_depth += 1,
                Token::RParen => content_depth = content_depth.saturating_sub(1),
                _ => {}
            }
            if content_depth > 0 || matches!(st.token, Token::RParen) {
                if stack.is_empty() {
                    run.push_str(raw);
                }
                continue;
            }
            if st.token == Token::LBrace && header_before(text, offset).is_some() {
                opaque_depth = 1;
                if stack.is_empty() {
                    run.push_str(raw);
                }
                continue;
            }
        }

        if delimiters.opens(&st.token) {
            if stack.is_empty() {
                flush(&mut run, &mut non_shared);
            }
            stack.push(OpenSpan {
                left: offset,
                level: stack.len() + 1,
                operator: None,
            });
        } else if delimiters.closes(&st.token) {
            let span = stack.pop().ok_or(ParseError::MisorderedDelimiter {
                delimiter: delimiters.close(),
                span: st.span,
            })?;
            let boundary = close_span(text, span, offset)?;
            levels.entry(boundary.0).or_default().push(boundary.1);
        } else if let Token::Operator(op) = st.token {
            let Some(top) = stack.last_mut() else {
                return Err(ParseError::OperatorOutsideCombination {
                    operator: op.token().to_string(),
                    span: st.span,
                });
            };
            let operand_start = top.operator.map(|(_, _, end)| end).unwrap_or(top.left + 1);
            if text[operand_start..offset].trim().is_empty() {
                return Err(ParseError::EmptyOperand {
                    context: text[top.left..st.end].to_string(),
                    span: st.span,
                });
            }
            match top.operator {
                None => top.operator = Some((op, offset, st.end)),
                Some((first, _, _)) if first == op => {
                    return Ok(Pass::Rewritten(associate_left(
                        text,
                        top.left,
                        offset,
                        delimiters,
                    )));
                }
                Some((first, _, _)) => {
                    return Err(ParseError::MixedOperators {
                        first: first.token().to_string(),
                        second: op.token().to_string(),
                        span: st.span,
                    });
                }
            }
        } else if stack.is_empty() {
            run.push_str(raw);
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::ImbalancedDelimiters {
            open: delimiters.open(),
            close: delimiters.close(),
            opened: stack.len(),
            closed: 0,
        });
    }
    flush(&mut run, &mut non_shared);

    Ok(Pass::Done(Detection {
        input: text.to_string(),
        levels,
        non_shared,
    }))
}

fn close_span(text: &str, span: OpenSpan, right: usize) -> Result<(usize, Boundary)> {
    let (operator, operator_start, operator_end, complete) = match span.operator {
        Some((op, start, end)) => {
            if text[end..right].trim().is_empty() {
                return Err(ParseError::EmptyOperand {
                    context: text[span.left..=right].to_string(),
                    span: Span::at(text, start),
                });
            }
            (Some(op), start, end, true)
        }
        None => (None, 0, 0, false),
    };
    Ok((
        span.level,
        Boundary {
            left: span.left,
            right,
            operator,
            operator_start,
            operator_end,
            complete,
        },
    ))
}

/// Wrap everything between the span opening at `left` and the operator at
/// `operator` in its own delimiter pair
fn associate_left(text: &str, left: usize, operator: usize, delimiters: Delimiters) -> String {
    let mut rewritten = String::with_capacity(text.len() + 2);
    rewritten.push_str(&text[..=left]);
    rewritten.push(delimiters.open());
    rewritten.push_str(text[left + 1..operator].trim_end());
    rewritten.push(delimiters.close());
    rewritten.push(' ');
    rewritten.push_str(&text[operator..]);
    rewritten
}

fn flush(run: &mut String, out: &mut Vec<String>) {
    let trimmed = run.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paren(text: &str) -> Detection {
        detect(text, Delimiters::Parentheses).unwrap()
    }

    // ── Levels ─────────────────────────────────────────

    #[test]
    fn test_simple_combination() {
        let d = paren("(a [AND] b)");
        assert_eq!(d.first_complete_level(), Some(1));
        let b = &d.complete_at(1)[0];
        assert_eq!((b.left, b.right), (0, 10));
        assert_eq!(b.operator, Some(LogicalOperator::And));
        assert_eq!(&d.input[b.operator_start..b.operator_end], "[AND]");
    }

    #[test]
    fn test_plain_content_is_incomplete() {
        let d = paren("(inspect)");
        assert_eq!(d.first_complete_level(), None);
        assert_eq!(d.levels[&1].len(), 1);
    }

    #[test]
    fn test_nested_levels() {
        let d = paren("((a [XOR] b) [OR] c)");
        assert_eq!(d.first_complete_level(), Some(1));
        assert_eq!(d.complete_at(2).len(), 1);
        assert_eq!(d.complete_at(1)[0].operator, Some(LogicalOperator::Or));
    }

    #[test]
    fn test_shared_text_level() {
        let d = paren("(shared (left [XOR] right))");
        assert_eq!(d.first_complete_level(), Some(2));
        let inner = d.complete_at(2)[0];
        let outer = d.enclosing(2, inner).unwrap();
        assert_eq!((outer.left, outer.right), (0, 26));
    }

    #[test]
    fn test_non_shared_runs() {
        let d = paren("before (a [OR] b) between (c) after");
        assert_eq!(d.non_shared, vec!["before", "between", "after"]);
    }

    // ── Rewriting ──────────────────────────────────────

    #[test]
    fn test_repeated_operator_associates_left() {
        let d = paren("(a [AND] b [AND] c)");
        assert_eq!(d.input, "((a [AND] b) [AND] c)");
        assert_eq!(d.complete_at(1).len(), 1);
        assert_eq!(d.complete_at(2).len(), 1);
    }

    #[test]
    fn test_four_operands_associate_left() {
        let d = paren("(a [OR] b [OR] c [OR] d)");
        assert_eq!(d.input, "(((a [OR] b) [OR] c) [OR] d)");
    }

    // ── Errors ─────────────────────────────────────────

    #[test]
    fn test_mixed_operators() {
        let err = detect("(a [AND] b [OR] c)", Delimiters::Parentheses).unwrap_err();
        assert!(matches!(err, ParseError::MixedOperators { .. }));
    }

    #[test]
    fn test_empty_left_operand() {
        let err = detect("( [AND] b)", Delimiters::Parentheses).unwrap_err();
        assert!(matches!(err, ParseError::EmptyOperand { .. }));
    }

    #[test]
    fn test_empty_right_operand() {
        let err = detect("(a [AND] )", Delimiters::Parentheses).unwrap_err();
        assert!(matches!(err, ParseError::EmptyOperand { .. }));
    }

    #[test]
    fn test_operator_outside_span() {
        let err = detect("a [AND] b", Delimiters::Parentheses).unwrap_err();
        assert!(matches!(err, ParseError::OperatorOutsideCombination { .. }));
    }

    #[test]
    fn test_imbalance_reported_before_scanning() {
        let err = detect("((a [AND] b)", Delimiters::Parentheses).unwrap_err();
        assert!(matches!(err, ParseError::ImbalancedDelimiters { .. }));
    }

    // ── Brace mode ─────────────────────────────────────

    #[test]
    fn test_brace_mode_skips_component_content() {
        let d = detect(
            "{I((a [AND] b)) Bdir(x) [XOR] I(c) Bdir(y)}",
            Delimiters::Braces,
        )
        .unwrap();
        let b = d.complete_at(1)[0];
        assert_eq!(b.operator, Some(LogicalOperator::Xor));
    }

    #[test]
    fn test_brace_mode_tagged_block_is_opaque() {
        let d = detect("{Cac{A(x) {I(a) [OR] I(b)}} [AND] Cac{A(y)}}", Delimiters::Braces)
            .unwrap();
        assert_eq!(d.first_complete_level(), Some(1));
        assert!(d.levels.get(&2).is_none());
    }

    #[test]
    fn test_brace_mode_without_operator() {
        let d = detect("{I(a) Bdir(b) and I(c)}", Delimiters::Braces).unwrap();
        assert_eq!(d.first_complete_level(), None);
    }

    #[test]
    fn test_detect_determinism_100_iterations() {
        let input = "((a [AND] b [AND] c) [OR] (d [XOR] e))";
        let first = paren(input);
        for i in 0..100 {
            assert_eq!(first, paren(input), "Determinism failure at iteration {}", i);
        }
    }
}
