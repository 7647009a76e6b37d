//! Statement record — one slot per IG component
//!
//! Every primitive component has a *simple* slot holding an atomic
//! (possibly combined) node tree. Components that admit nesting also
//! have a *complex* slot holding nested statements, wrapped in nodes
//! whose entry is [`Entry::Nested`](crate::parser::ast::Entry::Nested).

use serde::{Deserialize, Serialize};

use crate::component::ComponentType;
use crate::error::{ParseError, Result};
use crate::parser::ast::Node;

/// Which of a component's two slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    Simple,
    Complex,
}

/// Parsed Institutional Grammar statement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statement {
    // Regulative components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_property_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_property_complex: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deontic: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aim: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_object_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_object_complex: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_object_property_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_object_property_complex: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indirect_object_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indirect_object_complex: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indirect_object_property_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indirect_object_property_complex: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_condition_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_condition_complex: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_constraint_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_constraint_complex: Option<Node>,

    // Constitutive components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constituted_entity: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constituted_entity_property_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constituted_entity_property_complex: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constitutive_function: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constituting_properties_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constituting_properties_complex: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constituting_properties_property_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constituting_properties_property_complex: Option<Node>,

    // Shared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub or_else_simple: Option<Node>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub or_else_complex: Option<Node>,
}

impl Statement {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Slot access ────────────────────────────────────────

    pub fn simple(&self, component: ComponentType) -> Option<&Node> {
        self.slot(component, SlotKind::Simple)
    }

    pub fn complex(&self, component: ComponentType) -> Option<&Node> {
        self.slot(component, SlotKind::Complex)
    }

    pub fn slot(&self, component: ComponentType, kind: SlotKind) -> Option<&Node> {
        let slot = match kind {
            SlotKind::Simple => Some(self.simple_ref(component)),
            SlotKind::Complex => self.complex_ref(component),
        };
        slot.and_then(Option::as_ref)
    }

    /// Simple slot of `component`; every component has one
    pub fn simple_mut(&mut self, component: ComponentType) -> &mut Option<Node> {
        match component {
            ComponentType::Attributes => &mut self.attributes,
            ComponentType::AttributesProperty => &mut self.attributes_property_simple,
            ComponentType::Deontic => &mut self.deontic,
            ComponentType::Aim => &mut self.aim,
            ComponentType::DirectObject => &mut self.direct_object_simple,
            ComponentType::DirectObjectProperty => &mut self.direct_object_property_simple,
            ComponentType::IndirectObject => &mut self.indirect_object_simple,
            ComponentType::IndirectObjectProperty => &mut self.indirect_object_property_simple,
            ComponentType::ActivationCondition => &mut self.activation_condition_simple,
            ComponentType::ExecutionConstraint => &mut self.execution_constraint_simple,
            ComponentType::ConstitutedEntity => &mut self.constituted_entity,
            ComponentType::ConstitutedEntityProperty => {
                &mut self.constituted_entity_property_simple
            }
            ComponentType::Modal => &mut self.modal,
            ComponentType::ConstitutiveFunction => &mut self.constitutive_function,
            ComponentType::ConstitutingProperties => &mut self.constituting_properties_simple,
            ComponentType::ConstitutingPropertiesProperty => {
                &mut self.constituting_properties_property_simple
            }
            ComponentType::OrElse => &mut self.or_else_simple,
        }
    }

    /// Complex slot of `component`; `None` if it cannot hold nested statements
    pub fn complex_mut(&mut self, component: ComponentType) -> Option<&mut Option<Node>> {
        match component {
            ComponentType::AttributesProperty => Some(&mut self.attributes_property_complex),
            ComponentType::DirectObject => Some(&mut self.direct_object_complex),
            ComponentType::DirectObjectProperty => Some(&mut self.direct_object_property_complex),
            ComponentType::IndirectObject => Some(&mut self.indirect_object_complex),
            ComponentType::IndirectObjectProperty => {
                Some(&mut self.indirect_object_property_complex)
            }
            ComponentType::ActivationCondition => Some(&mut self.activation_condition_complex),
            ComponentType::ExecutionConstraint => Some(&mut self.execution_constraint_complex),
            ComponentType::ConstitutedEntityProperty => {
                Some(&mut self.constituted_entity_property_complex)
            }
            ComponentType::ConstitutingProperties => Some(&mut self.constituting_properties_complex),
            ComponentType::ConstitutingPropertiesProperty => {
                Some(&mut self.constituting_properties_property_complex)
            }
            ComponentType::OrElse => Some(&mut self.or_else_complex),
            _ => None,
        }
    }

    pub fn slot_mut(&mut self, component: ComponentType, kind: SlotKind) -> Option<&mut Option<Node>> {
        match kind {
            SlotKind::Simple => Some(self.simple_mut(component)),
            SlotKind::Complex => self.complex_mut(component),
        }
    }

    fn simple_ref(&self, component: ComponentType) -> &Option<Node> {
        match component {
            ComponentType::Attributes => &self.attributes,
            ComponentType::AttributesProperty => &self.attributes_property_simple,
            ComponentType::Deontic => &self.deontic,
            ComponentType::Aim => &self.aim,
            ComponentType::DirectObject => &self.direct_object_simple,
            ComponentType::DirectObjectProperty => &self.direct_object_property_simple,
            ComponentType::IndirectObject => &self.indirect_object_simple,
            ComponentType::IndirectObjectProperty => &self.indirect_object_property_simple,
            ComponentType::ActivationCondition => &self.activation_condition_simple,
            ComponentType::ExecutionConstraint => &self.execution_constraint_simple,
            ComponentType::ConstitutedEntity => &self.constituted_entity,
            ComponentType::ConstitutedEntityProperty => &self.constituted_entity_property_simple,
            ComponentType::Modal => &self.modal,
            ComponentType::ConstitutiveFunction => &self.constitutive_function,
            ComponentType::ConstitutingProperties => &self.constituting_properties_simple,
            ComponentType::ConstitutingPropertiesProperty => {
                &self.constituting_properties_property_simple
            }
            ComponentType::OrElse => &self.or_else_simple,
        }
    }

    fn complex_ref(&self, component: ComponentType) -> Option<&Option<Node>> {
        match component {
            ComponentType::AttributesProperty => Some(&self.attributes_property_complex),
            ComponentType::DirectObject => Some(&self.direct_object_complex),
            ComponentType::DirectObjectProperty => Some(&self.direct_object_property_complex),
            ComponentType::IndirectObject => Some(&self.indirect_object_complex),
            ComponentType::IndirectObjectProperty => Some(&self.indirect_object_property_complex),
            ComponentType::ActivationCondition => Some(&self.activation_condition_complex),
            ComponentType::ExecutionConstraint => Some(&self.execution_constraint_complex),
            ComponentType::ConstitutedEntityProperty => {
                Some(&self.constituted_entity_property_complex)
            }
            ComponentType::ConstitutingProperties => Some(&self.constituting_properties_complex),
            ComponentType::ConstitutingPropertiesProperty => {
                Some(&self.constituting_properties_property_complex)
            }
            ComponentType::OrElse => Some(&self.or_else_complex),
            _ => None,
        }
    }

    // ── Whole-statement views ──────────────────────────────

    /// Populated slots in component order, simple before complex
    pub fn populated(&self) -> Vec<(ComponentType, SlotKind, &Node)> {
        let mut out = Vec::new();
        for component in ComponentType::ALL {
            for kind in [SlotKind::Simple, SlotKind::Complex] {
                if let Some(node) = self.slot(component, kind) {
                    out.push((component, kind, node));
                }
            }
        }
        out
    }

    /// True if every slot is absent
    pub fn is_empty(&self) -> bool {
        self.populated().is_empty()
    }

    /// Copy every slot populated in `outer` into this statement.
    ///
    /// A slot populated on both sides must hold identical trees;
    /// otherwise the result would depend on an arbitrary precedence.
    pub fn inherit_from(&mut self, outer: &Statement, context: &str) -> Result<()> {
        for (component, kind, node) in outer.populated() {
            let Some(slot) = self.slot_mut(component, kind) else {
                continue;
            };
            match slot {
                None => *slot = Some(node.clone()),
                Some(existing) if *existing == *node => {}
                Some(_) => {
                    return Err(ParseError::ConflictingPairField {
                        component: component.to_string(),
                        pair: context.to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Render back to IG-Script-like text
    pub fn stringify(&self) -> String {
        self.populated()
            .into_iter()
            .map(|(component, kind, node)| match kind {
                SlotKind::Simple => format!("{}({})", component, node.stringify()),
                SlotKind::Complex => format!("{}{}", component, node.stringify()),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_statement_is_empty() {
        let statement = Statement::new();
        assert!(statement.is_empty());
        assert_eq!(statement.stringify(), "");
    }

    #[test]
    fn test_simple_slot_roundtrip() {
        let mut statement = Statement::new();
        *statement.simple_mut(ComponentType::Aim) = Some(Node::text("inspect"));
        assert_eq!(
            statement.simple(ComponentType::Aim).and_then(Node::text_value),
            Some("inspect")
        );
        assert!(statement.aim.is_some());
        assert!(!statement.is_empty());
    }

    #[test]
    fn test_every_component_has_a_simple_slot() {
        for component in ComponentType::ALL {
            let mut statement = Statement::new();
            *statement.simple_mut(component) = Some(Node::text("x"));
            assert_eq!(statement.populated().len(), 1, "{}", component);
        }
    }

    #[test]
    fn test_complex_slots_match_nesting_support() {
        let mut statement = Statement::new();
        for component in ComponentType::ALL {
            assert_eq!(
                statement.complex_mut(component).is_some(),
                component.supports_nesting(),
                "{}",
                component
            );
        }
    }

    #[test]
    fn test_populated_order() {
        let mut statement = Statement::new();
        statement.direct_object_simple = Some(Node::text("site"));
        statement.attributes = Some(Node::text("actor"));
        statement.activation_condition_complex = Some(Node::nested(Statement::new()));
        let order: Vec<_> = statement
            .populated()
            .into_iter()
            .map(|(c, k, _)| (c, k))
            .collect();
        assert_eq!(
            order,
            vec![
                (ComponentType::Attributes, SlotKind::Simple),
                (ComponentType::DirectObject, SlotKind::Simple),
                (ComponentType::ActivationCondition, SlotKind::Complex),
            ]
        );
    }

    #[test]
    fn test_inherit_from_fills_absent_slots() {
        let mut outer = Statement::new();
        outer.attributes = Some(Node::text("actor"));
        outer.deontic = Some(Node::text("must"));
        let mut leaf = Statement::new();
        leaf.aim = Some(Node::text("enforce"));
        leaf.deontic = Some(Node::text("must"));
        leaf.inherit_from(&outer, "{...}").unwrap();
        assert_eq!(leaf.attributes.as_ref().and_then(Node::text_value), Some("actor"));
        assert_eq!(leaf.populated().len(), 3);
    }

    #[test]
    fn test_inherit_from_rejects_conflicts() {
        let mut outer = Statement::new();
        outer.aim = Some(Node::text("monitor"));
        let mut leaf = Statement::new();
        leaf.aim = Some(Node::text("enforce"));
        let err = leaf.inherit_from(&outer, "{pair}").unwrap_err();
        assert!(matches!(err, ParseError::ConflictingPairField { .. }));
    }

    #[test]
    fn test_stringify() {
        let mut statement = Statement::new();
        statement.attributes = Some(Node::text("actor"));
        statement.deontic = Some(Node::text("must"));
        assert_eq!(statement.stringify(), "A(actor) D(must)");
    }

    #[test]
    fn test_serialize_skips_absent_slots() {
        let mut statement = Statement::new();
        statement.aim = Some(Node::text("inspect"));
        let json = serde_json::to_value(&statement).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("aim"));
        let back: Statement = serde_json::from_value(json).unwrap();
        assert_eq!(back, statement);
    }
}
