//! Component parsing — one component type out of atomic statement text
//!
//! Every occurrence of the component becomes its own tree; several
//! occurrences are joined with synthetic AND in textual order. Each
//! occurrence root carries the component type, suffix and annotation
//! from its header.

use crate::component::ComponentType;
use crate::error::{ParseError, Result};
use crate::parser::ast::{LogicalOperator, Node};
use crate::parser::boundary::extract_components;
use crate::parser::builder::TreeBuilder;
use crate::parser::combination::Delimiters;

/// Parse every `component` occurrence in `text`.
///
/// `builder` must work on parentheses. Returns
/// [`ParseError::ComponentNotFound`] if the component does not occur.
pub fn parse_component(
    text: &str,
    component: ComponentType,
    builder: &TreeBuilder,
) -> Result<Node> {
    let occurrences = extract_components(text, component, Delimiters::Parentheses)?;
    if occurrences.is_empty() {
        return Err(ParseError::ComponentNotFound(component.symbol()));
    }

    let mut seen: Vec<&str> = Vec::with_capacity(occurrences.len());
    let mut nodes = Vec::with_capacity(occurrences.len());
    for occurrence in &occurrences {
        if seen.contains(&occurrence.raw.as_str()) {
            return Err(ParseError::DuplicateComponent(occurrence.raw.clone()));
        }
        seen.push(&occurrence.raw);

        let mut node = builder.build(&occurrence.body)?;
        node.component_type = Some(component);
        node.suffix = occurrence.header.suffix.clone();
        node.annotation = occurrence.header.annotation.clone();
        nodes.push(node);
    }

    tracing::debug!(component = %component, occurrences = nodes.len(), "Parsed component");
    let root = Node::fold(nodes, LogicalOperator::SyntheticAnd)?
        .ok_or_else(|| ParseError::ComponentNotFound(component.symbol()))?;
    Ok(root.with_component_type(component))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_NESTING_DEPTH;

    fn parse(text: &str, component: ComponentType) -> Result<Node> {
        let builder = TreeBuilder::new(Delimiters::Parentheses, MAX_NESTING_DEPTH);
        parse_component(text, component, &builder)
    }

    #[test]
    fn test_single_occurrence() {
        let node = parse("A(actor) D(must) I(inspect)", ComponentType::Aim).unwrap();
        assert_eq!(node.text_value(), Some("inspect"));
        assert_eq!(node.component_type, Some(ComponentType::Aim));
    }

    #[test]
    fn test_combination_content() {
        let node = parse("I(inspect [AND] audit)", ComponentType::Aim).unwrap();
        assert_eq!(node.stringify(), "(inspect [AND] audit)");
        assert_eq!(node.component_type, Some(ComponentType::Aim));
    }

    #[test]
    fn test_multiple_occurrences_join_with_synthetic_and() {
        let node = parse("Bdir1(report) Bdir2(log)", ComponentType::DirectObject).unwrap();
        assert_eq!(node.operator(), Some(LogicalOperator::SyntheticAnd));
        assert_eq!(node.left().and_then(|n| n.suffix.as_deref()), Some("1"));
        assert_eq!(node.right().and_then(|n| n.suffix.as_deref()), Some("2"));
        assert_eq!(node.component_type, Some(ComponentType::DirectObject));
    }

    #[test]
    fn test_annotation_is_kept() {
        let node = parse("Cac[time](at night)", ComponentType::ActivationCondition).unwrap();
        assert_eq!(node.annotation.as_deref(), Some("[time]"));
        assert_eq!(node.text_value(), Some("at night"));
    }

    #[test]
    fn test_absent_component() {
        let err = parse("A(actor)", ComponentType::Deontic).unwrap_err();
        assert_eq!(err, ParseError::ComponentNotFound("D".into()));
    }

    #[test]
    fn test_property_not_confused_with_plain() {
        let err = parse("Bdir(site)", ComponentType::DirectObjectProperty).unwrap_err();
        assert_eq!(err, ParseError::ComponentNotFound("Bdir,p".into()));
    }

    #[test]
    fn test_duplicate_entry() {
        let err = parse("I(inspect) I(inspect)", ComponentType::Aim).unwrap_err();
        assert!(matches!(err, ParseError::DuplicateComponent(_)));
    }
}
