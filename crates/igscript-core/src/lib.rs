//! IG-Script Core - parser for Institutional Grammar coded statements
//!
//! Turns annotated institutional statements such as
//! `A(inspector) D(must) I(inspect [AND] audit) Bdir(site) Cac{A(site) I(opens)}`
//! into a typed tree of IG components.
//!
//! # Architecture
//!
//! ```text
//! Statement Text → Assembler ─→ Boundary Extractor → Component Parser
//!                      │                                   ↓
//!                      │            Combination Detector → Tree Builder
//!                      ↓
//!                  Nested Statements / Component Pairs (recursive)
//!                      ↓
//!                  Linkage Resolver → Node tree of Statements
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: Same input always produces identical output
//! - **Exclusive ownership**: Trees are acyclic; parents are addressed by path
//! - **Bounded**: Recursion is capped by a configurable nesting depth
//! - **Explicit**: Ambiguous input is rejected with a typed error, never guessed

pub mod component;
pub mod config;
pub mod error;
pub mod parser;
pub mod statement;

pub use component::ComponentType;
pub use config::ParseOptions;
pub use error::{ErrorCategory, ErrorCode, ParseError, Result};
pub use parser::ast::{Entry, LogicalOperator, Node, NodeKind, NodePath, Side};
pub use parser::{parse_statement, parse_statement_with, ParseFailure, ParsedStatement};
pub use statement::{SlotKind, Statement};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_reexports_parse() {
        let parsed = parse_statement("A(actor) I(inspect)").unwrap();
        let statement = parsed.statements()[0];
        assert_eq!(
            statement.simple(ComponentType::Aim).and_then(Node::text_value),
            Some("inspect")
        );
    }

    #[test]
    fn test_statement_serializes() {
        let parsed = parse_statement("A(actor) D(must) I(inspect)").unwrap();
        let json = serde_json::to_value(parsed.statements()[0]).unwrap();
        assert!(json.get("attributes").is_some());
        assert!(json.get("or_else_simple").is_none());
    }
}
