//! IG-Script parser — scanner, combination trees, components and statement assembly
//!
//! Converts one IG-Script coded statement into a tree of [`Statement`]s.

pub mod assembler;
pub mod ast;
pub mod boundary;
pub mod builder;
pub mod combination;
pub mod component;
pub mod linkage;
pub mod scanner;

use thiserror::Error;

use crate::config::ParseOptions;
use crate::error::ParseError;
use crate::parser::assembler::Assembler;
use crate::parser::ast::{flatten, Node};
use crate::statement::Statement;

/// Successful parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    /// A nested-statement leaf, or a combination of them when a component
    /// pair expanded the input into several statements
    pub tree: Node,
    /// Soft errors; currently only [`ParseError::IgnoredElements`]
    pub warnings: Vec<ParseError>,
}

impl ParsedStatement {
    /// Output statements in textual order
    pub fn statements(&self) -> Vec<&Statement> {
        flatten(self.tree.leaf_nodes(true))
            .into_iter()
            .filter_map(Node::statement)
            .collect()
    }

    /// Brace blocks that were dropped during parsing
    pub fn ignored_elements(&self) -> Vec<&str> {
        self.warnings
            .iter()
            .flat_map(|w| w.ignored_elements())
            .map(String::as_str)
            .collect()
    }
}

/// Failed parse with the best available partial result
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct ParseFailure {
    pub error: ParseError,
    /// Top-level statement as far as it was assembled before the failure
    pub partial: Option<Node>,
    pub warnings: Vec<ParseError>,
}

/// Parse an IG-Script statement with default options
///
/// # Guarantees
/// - Deterministic: same input always produces same tree
/// - Fatal errors abort the parse; ignored brace blocks are reported as warnings
///
/// # Example
/// ```
/// let parsed = igscript_core::parse_statement("A(actor) D(must) I(inspect [AND] audit)").unwrap();
/// assert_eq!(parsed.statements().len(), 1);
/// ```
pub fn parse_statement(text: &str) -> Result<ParsedStatement, ParseFailure> {
    parse_statement_with(text, &ParseOptions::default())
}

/// Parse an IG-Script statement with explicit options
pub fn parse_statement_with(
    text: &str,
    options: &ParseOptions,
) -> Result<ParsedStatement, ParseFailure> {
    let span = tracing::debug_span!("parse_statement", len = text.len());
    let _guard = span.enter();

    let mut assembler = Assembler::new(options);
    let outcome = assembler.assemble(text);
    let ignored = assembler.take_ignored();
    let warnings = if ignored.is_empty() {
        Vec::new()
    } else {
        vec![ParseError::IgnoredElements { elements: ignored }]
    };

    match outcome {
        Ok(tree) => {
            tracing::debug!(
                statements = tree.leaf_paths().len(),
                warnings = warnings.len(),
                "Parsed statement"
            );
            Ok(ParsedStatement { tree, warnings })
        }
        Err(error) => {
            tracing::debug!(code = %error.code(), error = %error, "Statement parse failed");
            Err(ParseFailure {
                error,
                partial: assembler.take_partial().map(Node::nested),
                warnings,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_atomic_statement() {
        let parsed = parse_statement("A(actor) D(must) I(inspect [AND] audit) Bdir(site)").unwrap();
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.statements().len(), 1);
    }

    #[test]
    fn test_parse_empty_input() {
        let failure = parse_statement("   ").unwrap_err();
        assert_eq!(failure.error, ParseError::EmptyStatement);
        assert_eq!(failure.error.code(), ErrorCode::EmptyStatement);
    }

    #[test]
    fn test_failure_carries_partial_tree() {
        let failure = parse_statement("A(actor) I(a [AND] b [OR] c)").unwrap_err();
        assert!(matches!(failure.error, ParseError::MixedOperators { .. }));
        assert!(failure.partial.is_none());

        let failure = parse_statement("A(actor) {I(a) [OR] I(b)} {I(c) [OR] I(d)}").unwrap_err();
        let partial = failure.partial.unwrap();
        let statement = partial.statement().unwrap();
        assert!(statement.attributes.is_some());
    }

    #[test]
    fn test_ignored_elements_are_warnings() {
        let parsed = parse_statement("A(actor) {I(act1) Bdir(obj1) and I(act2) Bdir(obj2)}").unwrap();
        assert_eq!(
            parsed.ignored_elements(),
            vec!["{I(act1) Bdir(obj1) and I(act2) Bdir(obj2)}"]
        );
    }

    #[test]
    fn test_failure_display_is_error_message() {
        let failure = parse_statement("A(actor").unwrap_err();
        assert_eq!(failure.to_string(), failure.error.to_string());
    }

    #[test]
    fn test_parse_determinism_100_iterations() {
        let input = "A(actor) D(must) I((inspect [AND] audit) [OR] review) Cac{A(x) I(y)}";
        let first = parse_statement(input).unwrap();
        for i in 0..100 {
            assert_eq!(first, parse_statement(input).unwrap(), "Determinism failure at iteration {}", i);
        }
    }
}
