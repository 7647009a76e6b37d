//! IG component identifiers
//!
//! The closed set of component types an IG-Script statement can code,
//! with their written symbols (`A`, `Bdir,p`, `Cac`, ...).

use serde::{Deserialize, Serialize};

/// One of the fixed Institutional Grammar components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentType {
    Attributes,
    AttributesProperty,
    Deontic,
    Aim,
    DirectObject,
    DirectObjectProperty,
    IndirectObject,
    IndirectObjectProperty,
    ActivationCondition,
    ExecutionConstraint,
    ConstitutedEntity,
    ConstitutedEntityProperty,
    Modal,
    ConstitutiveFunction,
    ConstitutingProperties,
    ConstitutingPropertiesProperty,
    OrElse,
}

impl ComponentType {
    /// Every component, in statement field order
    pub const ALL: [ComponentType; 17] = [
        ComponentType::Attributes,
        ComponentType::AttributesProperty,
        ComponentType::Deontic,
        ComponentType::Aim,
        ComponentType::DirectObject,
        ComponentType::DirectObjectProperty,
        ComponentType::IndirectObject,
        ComponentType::IndirectObjectProperty,
        ComponentType::ActivationCondition,
        ComponentType::ExecutionConstraint,
        ComponentType::ConstitutedEntity,
        ComponentType::ConstitutedEntityProperty,
        ComponentType::Modal,
        ComponentType::ConstitutiveFunction,
        ComponentType::ConstitutingProperties,
        ComponentType::ConstitutingPropertiesProperty,
        ComponentType::OrElse,
    ];

    /// Bare symbol without property marker (`Bdir` for `Bdir,p`)
    pub fn base_symbol(&self) -> &'static str {
        match self {
            ComponentType::Attributes | ComponentType::AttributesProperty => "A",
            ComponentType::Deontic => "D",
            ComponentType::Aim => "I",
            ComponentType::DirectObject | ComponentType::DirectObjectProperty => "Bdir",
            ComponentType::IndirectObject | ComponentType::IndirectObjectProperty => "Bind",
            ComponentType::ActivationCondition => "Cac",
            ComponentType::ExecutionConstraint => "Cex",
            ComponentType::ConstitutedEntity | ComponentType::ConstitutedEntityProperty => "E",
            ComponentType::Modal => "M",
            ComponentType::ConstitutiveFunction => "F",
            ComponentType::ConstitutingProperties
            | ComponentType::ConstitutingPropertiesProperty => "P",
            ComponentType::OrElse => "O",
        }
    }

    /// Written symbol including property marker
    pub fn symbol(&self) -> String {
        if self.is_property() {
            format!("{},{}", self.base_symbol(), crate::config::PROPERTY_MARKER)
        } else {
            self.base_symbol().to_string()
        }
    }

    pub fn is_property(&self) -> bool {
        matches!(
            self,
            ComponentType::AttributesProperty
                | ComponentType::DirectObjectProperty
                | ComponentType::IndirectObjectProperty
                | ComponentType::ConstitutedEntityProperty
                | ComponentType::ConstitutingPropertiesProperty
        )
    }

    /// Whether the component can hold nested statements (`Cac{...}`)
    pub fn supports_nesting(&self) -> bool {
        matches!(
            self,
            ComponentType::AttributesProperty
                | ComponentType::DirectObject
                | ComponentType::DirectObjectProperty
                | ComponentType::IndirectObject
                | ComponentType::IndirectObjectProperty
                | ComponentType::ActivationCondition
                | ComponentType::ExecutionConstraint
                | ComponentType::ConstitutedEntityProperty
                | ComponentType::ConstitutingProperties
                | ComponentType::ConstitutingPropertiesProperty
                | ComponentType::OrElse
        )
    }

    /// Property variant describing this component, if any
    pub fn property(&self) -> Option<ComponentType> {
        match self {
            ComponentType::Attributes => Some(ComponentType::AttributesProperty),
            ComponentType::DirectObject => Some(ComponentType::DirectObjectProperty),
            ComponentType::IndirectObject => Some(ComponentType::IndirectObjectProperty),
            ComponentType::ConstitutedEntity => Some(ComponentType::ConstitutedEntityProperty),
            ComponentType::ConstitutingProperties => {
                Some(ComponentType::ConstitutingPropertiesProperty)
            }
            _ => None,
        }
    }

    /// Resolve a bare symbol plus property flag
    pub fn from_symbol(base: &str, property: bool) -> Option<ComponentType> {
        ComponentType::ALL
            .into_iter()
            .find(|c| c.base_symbol() == base && c.is_property() == property)
    }

    /// All distinct bare symbols, longest first so alternations prefer `Bdir` over shorter tags
    pub fn base_symbols() -> Vec<&'static str> {
        let mut symbols: Vec<&'static str> =
            ComponentType::ALL.iter().map(|c| c.base_symbol()).collect();
        symbols.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        symbols.dedup();
        symbols
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.symbol())
    }
}
