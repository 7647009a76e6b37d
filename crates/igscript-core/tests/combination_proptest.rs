//! Property-based tests for logical combinations and component pairs
//!
//! These tests check invariants that must hold for any operand text:
//! - A written combination keeps its operator and trimmed operands
//! - Repeated operators always associate to the left
//! - Leaf order survives tree building
//! - Unbalanced delimiters never parse
//! - A component pair with N leaves yields N statements

use igscript_core::{parse_statement, LogicalOperator, Node, ParseError};
use proptest::prelude::*;

/// Lowercase operand text; never forms a component tag
fn operand_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,10}",
        "[a-z]{1,6} [a-z]{1,6}",
        " [a-z]{1,8} ",
    ]
}

fn operator_strategy() -> impl Strategy<Value = LogicalOperator> {
    prop_oneof![
        Just(LogicalOperator::And),
        Just(LogicalOperator::Or),
        Just(LogicalOperator::Xor),
    ]
}

fn aim(input: &str) -> Node {
    let parsed = parse_statement(input).expect("statement should parse");
    parsed.statements()[0].aim.clone().expect("aim present")
}

proptest! {
    #[test]
    fn test_binary_combination_keeps_operands(
        left in operand_strategy(),
        right in operand_strategy(),
        op in operator_strategy(),
    ) {
        let node = aim(&format!("A(actor) I({} {} {})", left, op.token(), right));
        prop_assert_eq!(node.operator(), Some(op));
        prop_assert_eq!(node.left().and_then(Node::text_value), Some(left.trim()));
        prop_assert_eq!(node.right().and_then(Node::text_value), Some(right.trim()));
    }

    #[test]
    fn test_repeated_operator_associates_left(
        a in "[a-z]{1,8}",
        b in "[a-z]{1,8}",
        c in "[a-z]{1,8}",
        op in operator_strategy(),
    ) {
        let token = op.token();
        let node = aim(&format!("A(actor) I({} {} {} {} {})", a, token, b, token, c));
        prop_assert_eq!(
            node.stringify(),
            format!("(({} {} {}) {} {})", a, token, b, token, c)
        );
    }

    #[test]
    fn test_leaf_order_is_preserved(
        words in prop::collection::vec("[a-z]{1,8}", 2..6),
        op in operator_strategy(),
    ) {
        let joined = words.join(&format!(" {} ", op.token()));
        let node = aim(&format!("A(actor) I({})", joined));
        let leaves: Vec<String> = node
            .leaf_paths()
            .iter()
            .filter_map(|path| node.get(path))
            .filter_map(|leaf| leaf.text_value().map(String::from))
            .collect();
        prop_assert_eq!(leaves, words);
    }

    #[test]
    fn test_unbalanced_parentheses_never_parse(
        word in "[a-z]{1,8}",
        extra in 1usize..4,
    ) {
        let input = format!("A{}{}) I(act)", "(".repeat(extra + 1), word);
        let failure = parse_statement(&input).unwrap_err();
        let is_imbalance = matches!(failure.error, ParseError::ImbalancedDelimiters { .. });
        prop_assert!(is_imbalance);
        prop_assert!(failure.partial.is_none());
    }

    #[test]
    fn test_pair_yields_one_statement_per_leaf(
        aims in prop::collection::vec("[a-z]{1,8}", 2..5),
    ) {
        let pair = aims
            .iter()
            .map(|a| format!("I({})", a))
            .collect::<Vec<_>>()
            .join(" [XOR] ");
        let parsed = parse_statement(&format!("A(actor) D(must) {{{}}}", pair)).unwrap();
        let statements = parsed.statements();
        prop_assert_eq!(statements.len(), aims.len());
        for (statement, expected) in statements.iter().zip(&aims) {
            prop_assert_eq!(
                statement.aim.as_ref().and_then(Node::text_value),
                Some(expected.as_str())
            );
            prop_assert_eq!(
                statement.attributes.as_ref().and_then(Node::text_value),
                Some("actor")
            );
            prop_assert_eq!(
                statement.deontic.as_ref().and_then(Node::text_value),
                Some("must")
            );
        }
    }
}
