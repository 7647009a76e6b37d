//! Tree building — turning detected combinations into binary node trees
//!
//! Picks the outermost level that holds a complete combination, builds
//! each combination there from its two operands (recursively), and joins
//! several combinations on that level with synthetic AND in textual order.
//! Text around a combination inside its enclosing scope is kept as
//! shared text on the combination node.

use crate::error::{ParseError, Result};
use crate::parser::ast::{LogicalOperator, Node};
use crate::parser::boundary::matching_close;
use crate::parser::combination::{detect, Boundary, Delimiters, Detection};
use crate::parser::scanner::Span;

/// Builds node trees for one delimiter mode
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    delimiters: Delimiters,
    max_depth: usize,
}

impl TreeBuilder {
    pub fn new(delimiters: Delimiters, max_depth: usize) -> Self {
        TreeBuilder {
            delimiters,
            max_depth,
        }
    }

    /// Build the tree for `text`; text without combinations becomes one leaf
    pub fn build(&self, text: &str) -> Result<Node> {
        self.build_at(text, 0)
    }

    fn build_at(&self, text: &str, depth: usize) -> Result<Node> {
        if depth > self.max_depth {
            return Err(ParseError::NestingTooDeep(self.max_depth));
        }
        let detection = detect(text, self.delimiters)?;
        let Some(level) = detection.first_complete_level() else {
            return self.leaf(&detection.input);
        };

        let input = detection.input.as_str();
        let boundaries = detection.complete_at(level);
        let mut nodes = Vec::with_capacity(boundaries.len());

        for (i, boundary) in boundaries.iter().enumerate() {
            let Some(operator) = boundary.operator else {
                continue;
            };
            let left = self.build_at(&input[boundary.left + 1..boundary.operator_start], depth + 1)?;
            let right = self.build_at(&input[boundary.operator_end..boundary.right], depth + 1)?;
            let mut node = Node::combine(left, right, operator)?;

            let scope = region(&detection, level, boundary);
            let in_scope = |other: &&&Boundary| region(&detection, level, other) == scope;
            let previous_end = boundaries[..i]
                .iter()
                .rev()
                .find(in_scope)
                .map(|b| b.right + 1)
                .unwrap_or(scope.0);
            let is_last = !boundaries[i + 1..].iter().any(|b| in_scope(&b));

            node.shared_left.extend(shared_text(&input[previous_end..boundary.left]));
            if is_last {
                node.shared_right.extend(shared_text(&input[boundary.right + 1..scope.1]));
            }
            nodes.push(node);
        }

        tracing::trace!(
            level,
            combinations = nodes.len(),
            delimiters = ?self.delimiters,
            "Built combination level"
        );
        Node::fold(nodes, LogicalOperator::SyntheticAnd)?
            .map_or_else(|| self.leaf(input), Ok)
    }

    /// Leaf for text without combinations; one enclosing delimiter pair is dropped
    fn leaf(&self, text: &str) -> Result<Node> {
        let mut value = text.trim();
        if value.starts_with(self.delimiters.open())
            && matching_close(value, 0, self.delimiters) == Some(value.len() - 1)
        {
            value = value[1..value.len() - 1].trim();
        }
        if value.is_empty() {
            return Err(ParseError::EmptyOperand {
                context: text.to_string(),
                span: Span::at(text, 0),
            });
        }
        Ok(Node::text(value))
    }
}

/// Byte range of the scope a boundary sits in: the interior of the
/// enclosing span, or the whole input on the outermost level
fn region(detection: &Detection, level: usize, boundary: &Boundary) -> (usize, usize) {
    match detection.enclosing(level, boundary) {
        Some(outer) => (outer.left + 1, outer.right),
        None => (0, detection.input.len()),
    }
}

// Stray delimiters are dropped; balanced component text like `A(actor)` stays intact
fn shared_text(text: &str) -> Option<String> {
    let cleaned = text
        .trim()
        .trim_start_matches([')', '}'])
        .trim_end_matches(['(', '{'])
        .trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_NESTING_DEPTH;

    fn paren() -> TreeBuilder {
        TreeBuilder::new(Delimiters::Parentheses, MAX_NESTING_DEPTH)
    }

    #[test]
    fn test_plain_content_is_leaf() {
        let node = paren().build("(inspect)").unwrap();
        assert_eq!(node.text_value(), Some("inspect"));
    }

    #[test]
    fn test_only_one_pair_is_stripped() {
        let node = paren().build("((inspect))").unwrap();
        assert_eq!(node.text_value(), Some("(inspect)"));
    }

    #[test]
    fn test_empty_content_is_an_error() {
        let err = paren().build("(  )").unwrap_err();
        assert!(matches!(err, ParseError::EmptyOperand { .. }));
    }

    #[test]
    fn test_binary_combination() {
        let node = paren().build("(inspect [AND] audit)").unwrap();
        assert_eq!(node.operator(), Some(LogicalOperator::And));
        assert_eq!(node.left().and_then(Node::text_value), Some("inspect"));
        assert_eq!(node.right().and_then(Node::text_value), Some("audit"));
    }

    #[test]
    fn test_nested_operands() {
        let node = paren().build("((a [XOR] b) [OR] c)").unwrap();
        assert_eq!(node.stringify(), "((a [XOR] b) [OR] c)");
    }

    #[test]
    fn test_repeated_operator_is_left_associative() {
        let node = paren().build("(a [AND] b [AND] c)").unwrap();
        assert_eq!(node.stringify(), "((a [AND] b) [AND] c)");
    }

    #[test]
    fn test_shared_left_text() {
        let node = paren().build("(shared (left [XOR] right))").unwrap();
        assert_eq!(node.shared_left, vec!["shared"]);
        assert!(node.shared_right.is_empty());
        assert_eq!(node.stringify(), "shared (left [XOR] right)");
    }

    #[test]
    fn test_sibling_combinations_join_with_synthetic_and() {
        let node = paren().build("(x (a [AND] b) y (c [OR] d) z)").unwrap();
        assert_eq!(node.operator(), Some(LogicalOperator::SyntheticAnd));
        let first = node.left().unwrap();
        let second = node.right().unwrap();
        assert_eq!(first.shared_left, vec!["x"]);
        assert!(first.shared_right.is_empty());
        assert_eq!(second.shared_left, vec!["y"]);
        assert_eq!(second.shared_right, vec!["z"]);
    }

    #[test]
    fn test_brace_mode_fragments() {
        let builder = TreeBuilder::new(Delimiters::Braces, MAX_NESTING_DEPTH);
        let node = builder
            .build("{I(enforce) Bdir(rule1) [XOR] I(monitor) Bdir(rule2)}")
            .unwrap();
        assert_eq!(node.operator(), Some(LogicalOperator::Xor));
        assert_eq!(
            node.left().and_then(Node::text_value),
            Some("I(enforce) Bdir(rule1)")
        );
    }

    #[test]
    fn test_depth_guard() {
        let builder = TreeBuilder::new(Delimiters::Parentheses, 1);
        let err = builder.build("(((a [AND] b) [OR] c) [XOR] d)").unwrap_err();
        assert_eq!(err, ParseError::NestingTooDeep(1));
    }

    #[test]
    fn test_errors_propagate() {
        let err = paren().build("(a [AND] b [OR] c)").unwrap_err();
        assert!(matches!(err, ParseError::MixedOperators { .. }));
    }
}
