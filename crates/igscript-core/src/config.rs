//! Grammar constants and caller-facing parse options
//!
//! The constants describe the fixed parts of the IG-Script notation.
//! [`ParseOptions`] carries the few choices a caller can make per call;
//! there is no process-wide mutable configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};
use crate::parser::ast::LogicalOperator;

/// Segment of a component suffix that marks the property variant (`A,p`).
pub const PROPERTY_MARKER: &str = "p";

/// Separator between suffix segments; the first segment is the linkage key.
pub const SUFFIX_SEPARATOR: char = ',';

/// Delimiters of an annotation preceding a component's content.
pub const ANNOTATION_OPEN: char = '[';
pub const ANNOTATION_CLOSE: char = ']';

/// Written operator tokens, in scanning order.
pub const OPERATOR_TOKENS: [(&str, LogicalOperator); 3] = [
    ("[AND]", LogicalOperator::And),
    ("[OR]", LogicalOperator::Or),
    ("[XOR]", LogicalOperator::Xor),
];

/// Default guard against runaway recursion on pathological nesting.
///
/// Statement-scale inputs rarely nest beyond four or five levels;
/// the guard only turns a stack overflow into a structural error.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Per-call parse options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Operator joining multiple plain nested statements of one component.
    /// `None` detects it from the statement text.
    pub nested_operator: Option<LogicalOperator>,
    /// Move suffix-matched property nodes into their owner's private links.
    pub resolve_private_links: bool,
    /// Maximum combination/statement nesting depth.
    pub max_nesting_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            nested_operator: None,
            resolve_private_links: true,
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Read options from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: ParseOptions =
            serde_json::from_str(json).map_err(|e| ParseError::InvalidOptions(e.to_string()))?;
        if options.max_nesting_depth == 0 {
            return Err(ParseError::InvalidOptions(
                "max_nesting_depth must be at least 1".into(),
            ));
        }
        if options.nested_operator == Some(LogicalOperator::SyntheticAnd) {
            return Err(ParseError::InvalidOptions(
                "nested_operator must be an explicit operator".into(),
            ));
        }
        Ok(options)
    }
}
