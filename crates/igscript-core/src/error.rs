//! Error types for the IG-Script parser
//!
//! All fallible operations return `Result<T, ParseError>`.
//! Every variant carries a stable [`ErrorCode`] and belongs to one
//! [`ErrorCategory`] so callers can decide how to react without
//! matching on message text.

use thiserror::Error;

use crate::parser::scanner::Span;

/// Parse error for IG-Script statements
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Opening and closing delimiters do not net to zero
    #[error("Imbalanced delimiters: {opened} '{open}' vs. {closed} '{close}'")]
    ImbalancedDelimiters {
        open: char,
        close: char,
        opened: usize,
        closed: usize,
    },

    /// A closing delimiter appeared before its opening counterpart
    #[error("Unexpected closing delimiter '{delimiter}' at {span}")]
    MisorderedDelimiter { delimiter: char, span: Span },

    /// A logical operator was found outside of any combination scope
    #[error("Logical operator {operator} at {span} is not enclosed in a combination")]
    OperatorOutsideCombination { operator: String, span: Span },

    /// Two distinct operators share one combination level
    #[error("Mixed operators {first} and {second} at {span}, use parentheses to disambiguate")]
    MixedOperators {
        first: String,
        second: String,
        span: Span,
    },

    /// Nothing (or only whitespace) on one side of a logical operator
    #[error("Empty operand near {span}: '{context}'")]
    EmptyOperand { context: String, span: Span },

    /// Component header was found but its delimiter never closes
    #[error("Unterminated component '{component}' starting at {span}")]
    UnterminatedComponent { component: String, span: Span },

    /// Requested component does not occur in the input
    #[error("Component {0} not found")]
    ComponentNotFound(String),

    /// The same component entry occurs twice verbatim
    #[error("Duplicate component entry '{0}'")]
    DuplicateComponent(String),

    /// More than one component-pair combination on the same level
    #[error("Multiple component pair combinations on one level: {}", .pairs.join(", "))]
    MultipleComponentPairs { pairs: Vec<String> },

    /// Two trees with different component types were combined
    #[error("Cannot combine component types {left} and {right}")]
    MismatchedComponentTypes { left: String, right: String },

    /// Leaves of a nested statement combination disagree on their component
    #[error("Invalid nested combination '{text}': {reason}")]
    InvalidNestedCombination { text: String, reason: String },

    /// Logical operator token outside the known set
    #[error("Unknown logical operator '{0}'")]
    UnknownOperator(String),

    /// Nested statement attached to a component without a complex slot
    #[error("Component {0} does not support nested statements")]
    UnsupportedNesting(String),

    /// Outer statement and an extrapolated pair leaf both populate a field
    #[error("Component {component} populated both outside and inside component pair '{pair}'")]
    ConflictingPairField { component: String, pair: String },

    /// Component pair without leaves or with an un-combined operator
    #[error("Invalid component pair '{text}': {reason}")]
    InvalidComponentPair { text: String, reason: String },

    /// Input contained no recognizable IG-Script coding
    #[error("Empty statement: no IG-Script components found")]
    EmptyStatement,

    /// Nesting exceeds the configured guard
    #[error("Nesting depth exceeds limit of {0}")]
    NestingTooDeep(usize),

    /// Elements that could not be attached to any component were dropped.
    ///
    /// Each element is the dropped block verbatim, braces and any tag
    /// included (`{I(a) and I(b)}`, `D{A(y)}`), so callers can find it in
    /// the input with a plain substring search.
    #[error("Ignored elements: {}", .elements.join(", "))]
    IgnoredElements { elements: Vec<String> },

    /// Parse options could not be read
    #[error("Invalid parse options: {0}")]
    InvalidOptions(String),

    /// Tree address does not point at a node
    #[error("Invalid node path {0}")]
    InvalidNodePath(String),
}

/// Stable error code, independent of message wording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ImbalancedDelimiters,
    MisorderedDelimiter,
    OperatorOutsideCombination,
    MixedOperators,
    EmptyOperand,
    UnterminatedComponent,
    ComponentNotFound,
    DuplicateComponent,
    MultipleComponentPairs,
    MismatchedComponentTypes,
    InvalidNestedCombination,
    UnknownOperator,
    UnsupportedNesting,
    ConflictingPairField,
    InvalidComponentPair,
    EmptyStatement,
    NestingTooDeep,
    IgnoredElements,
    InvalidOptions,
    InvalidNodePath,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ImbalancedDelimiters => "IMBALANCED_DELIMITERS",
            ErrorCode::MisorderedDelimiter => "MISORDERED_DELIMITER",
            ErrorCode::OperatorOutsideCombination => "OPERATOR_OUTSIDE_COMBINATION",
            ErrorCode::MixedOperators => "MIXED_OPERATORS",
            ErrorCode::EmptyOperand => "EMPTY_OPERAND",
            ErrorCode::UnterminatedComponent => "UNTERMINATED_COMPONENT",
            ErrorCode::ComponentNotFound => "COMPONENT_NOT_FOUND",
            ErrorCode::DuplicateComponent => "DUPLICATE_COMPONENT",
            ErrorCode::MultipleComponentPairs => "MULTIPLE_COMPONENT_PAIRS",
            ErrorCode::MismatchedComponentTypes => "MISMATCHED_COMPONENT_TYPES",
            ErrorCode::InvalidNestedCombination => "INVALID_NESTED_COMBINATION",
            ErrorCode::UnknownOperator => "UNKNOWN_OPERATOR",
            ErrorCode::UnsupportedNesting => "UNSUPPORTED_NESTING",
            ErrorCode::ConflictingPairField => "CONFLICTING_PAIR_FIELD",
            ErrorCode::InvalidComponentPair => "INVALID_COMPONENT_PAIR",
            ErrorCode::EmptyStatement => "EMPTY_STATEMENT",
            ErrorCode::NestingTooDeep => "NESTING_TOO_DEEP",
            ErrorCode::IgnoredElements => "IGNORED_ELEMENTS",
            ErrorCode::InvalidOptions => "INVALID_OPTIONS",
            ErrorCode::InvalidNodePath => "INVALID_NODE_PATH",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad error class, used to decide whether a failure aborts parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Delimiter, operator and operand shape violations
    Structural,
    /// Requested component is absent
    Lookup,
    /// Input admits more than one reading
    Ambiguity,
    /// Trees or operators cannot be merged
    Composition,
    /// Nothing usable was coded
    Completeness,
    /// Reported alongside a result, never aborts
    Soft,
}

impl ParseError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::ImbalancedDelimiters { .. } => ErrorCode::ImbalancedDelimiters,
            ParseError::MisorderedDelimiter { .. } => ErrorCode::MisorderedDelimiter,
            ParseError::OperatorOutsideCombination { .. } => ErrorCode::OperatorOutsideCombination,
            ParseError::MixedOperators { .. } => ErrorCode::MixedOperators,
            ParseError::EmptyOperand { .. } => ErrorCode::EmptyOperand,
            ParseError::UnterminatedComponent { .. } => ErrorCode::UnterminatedComponent,
            ParseError::ComponentNotFound(_) => ErrorCode::ComponentNotFound,
            ParseError::DuplicateComponent(_) => ErrorCode::DuplicateComponent,
            ParseError::MultipleComponentPairs { .. } => ErrorCode::MultipleComponentPairs,
            ParseError::MismatchedComponentTypes { .. } => ErrorCode::MismatchedComponentTypes,
            ParseError::InvalidNestedCombination { .. } => ErrorCode::InvalidNestedCombination,
            ParseError::UnknownOperator(_) => ErrorCode::UnknownOperator,
            ParseError::UnsupportedNesting(_) => ErrorCode::UnsupportedNesting,
            ParseError::ConflictingPairField { .. } => ErrorCode::ConflictingPairField,
            ParseError::InvalidComponentPair { .. } => ErrorCode::InvalidComponentPair,
            ParseError::EmptyStatement => ErrorCode::EmptyStatement,
            ParseError::NestingTooDeep(_) => ErrorCode::NestingTooDeep,
            ParseError::IgnoredElements { .. } => ErrorCode::IgnoredElements,
            ParseError::InvalidOptions(_) => ErrorCode::InvalidOptions,
            ParseError::InvalidNodePath(_) => ErrorCode::InvalidNodePath,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ParseError::ImbalancedDelimiters { .. }
            | ParseError::MisorderedDelimiter { .. }
            | ParseError::OperatorOutsideCombination { .. }
            | ParseError::MixedOperators { .. }
            | ParseError::EmptyOperand { .. }
            | ParseError::UnterminatedComponent { .. }
            | ParseError::NestingTooDeep(_) => ErrorCategory::Structural,
            ParseError::ComponentNotFound(_) => ErrorCategory::Lookup,
            ParseError::DuplicateComponent(_)
            | ParseError::MultipleComponentPairs { .. }
            | ParseError::MismatchedComponentTypes { .. }
            | ParseError::InvalidNestedCombination { .. }
            | ParseError::ConflictingPairField { .. } => ErrorCategory::Ambiguity,
            ParseError::UnknownOperator(_)
            | ParseError::UnsupportedNesting(_)
            | ParseError::InvalidOptions(_)
            | ParseError::InvalidNodePath(_) => ErrorCategory::Composition,
            ParseError::InvalidComponentPair { .. } | ParseError::EmptyStatement => {
                ErrorCategory::Completeness
            }
            ParseError::IgnoredElements { .. } => ErrorCategory::Soft,
        }
    }

    /// Input fragments the error refers to, for highlighting
    pub fn ignored_elements(&self) -> &[String] {
        match self {
            ParseError::IgnoredElements { elements } => elements,
            ParseError::MultipleComponentPairs { pairs } => pairs,
            _ => &[],
        }
    }

    /// True if the error must abort the enclosing parse
    pub fn is_fatal(&self) -> bool {
        !matches!(self.category(), ErrorCategory::Lookup | ErrorCategory::Soft)
    }
}

/// Result type alias for IG-Script operations
pub type Result<T> = std::result::Result<T, ParseError>;
