//! Private property linkage
//!
//! A property written with the same suffix as a component instance
//! (`A1(inspector) A1,p(certified)`) describes that instance only. The
//! resolver moves such property leaves out of the statement's property
//! slot and into the owning leaf's `private_nodes`. Property leaves
//! without a matching owner stay where they are.
//!
//! Keys are the first suffix segment. Multi-segment suffixes (`A1,55`)
//! are matched on that first segment only and logged.

use tracing::{debug, warn};

use crate::component::ComponentType;
use crate::config::SUFFIX_SEPARATOR;
use crate::error::Result;
use crate::parser::ast::{flatten, Node, NodePath};
use crate::statement::{SlotKind, Statement};

/// Owner leaf and property leaf matched on their suffix key
#[derive(Debug, Clone)]
struct Link {
    owner_slot: SlotKind,
    owner: NodePath,
    property: NodePath,
}

/// Resolve private links for every component with a property variant.
///
/// `kind` selects which property slot is searched: atomic properties in
/// the simple pass, nested property statements in the complex pass.
/// Owners are looked up in both slots of the component. Returns the
/// number of links made.
pub fn resolve_private_links(statement: &mut Statement, kind: SlotKind) -> Result<usize> {
    let mut linked = 0;
    for component in ComponentType::ALL {
        if let Some(property) = component.property() {
            linked += link_component(statement, component, property, kind)?;
        }
    }
    Ok(linked)
}

fn link_component(
    statement: &mut Statement,
    component: ComponentType,
    property: ComponentType,
    kind: SlotKind,
) -> Result<usize> {
    let Some(targets) = statement.slot(property, kind) else {
        return Ok(0);
    };
    let keyed: Vec<(NodePath, String)> = flatten(targets.leaf_path_groups(false))
        .into_iter()
        .filter_map(|path| {
            let key = targets.effective_suffix_key(&path)?.to_string();
            Some((path, key))
        })
        .collect();
    if keyed.is_empty() {
        return Ok(0);
    }

    let mut links = Vec::new();
    for owner_slot in [SlotKind::Simple, SlotKind::Complex] {
        let Some(owners) = statement.slot(component, owner_slot) else {
            continue;
        };
        for owner in flatten(owners.leaf_path_groups(false)) {
            let Some(key) = owners.effective_suffix_key(&owner) else {
                continue;
            };
            if let Some(full) = owners.effective_suffix(&owner) {
                if full.contains(SUFFIX_SEPARATOR) {
                    warn!(
                        component = %component,
                        suffix = full,
                        key,
                        "Linking multi-segment suffix on its first segment only"
                    );
                }
            }
            for (target, target_key) in &keyed {
                if target_key == key {
                    links.push(Link {
                        owner_slot,
                        owner: owner.clone(),
                        property: target.clone(),
                    });
                }
            }
        }
    }
    if links.is_empty() {
        return Ok(0);
    }

    let Some(mut tree) = statement.slot_mut(property, kind).and_then(Option::take) else {
        return Ok(0);
    };

    for link in &links {
        let Some(found) = tree.get(&link.property) else {
            continue;
        };
        let mut private = found.clone();
        private.component_type = tree.effective_component_type(&link.property);
        if private.suffix.is_none() {
            private.suffix = tree.effective_suffix(&link.property).map(String::from);
        }
        let owner = statement
            .slot_mut(component, link.owner_slot)
            .and_then(|slot| slot.as_mut())
            .and_then(|owners| owners.get_mut(&link.owner));
        if let Some(owner) = owner {
            owner.private_nodes.push(private);
        }
    }

    let emptied = detach(&mut tree, links.iter().map(|link| link.property.clone()))?;
    if let Some(slot) = statement.slot_mut(property, kind) {
        *slot = (!emptied).then_some(tree);
    }
    debug!(
        component = %component,
        property = %property,
        links = links.len(),
        emptied,
        "Resolved private links"
    );
    Ok(links.len())
}

/// Suffix keys per component, read from the owner slots or, with
/// `properties`, from the property slots. First occurrence order.
pub fn linkage_keys(statement: &Statement, properties: bool) -> Vec<(ComponentType, String)> {
    let mut keys: Vec<(ComponentType, String)> = Vec::new();
    for component in ComponentType::ALL {
        let Some(property) = component.property() else {
            continue;
        };
        let searched = if properties { property } else { component };
        for kind in [SlotKind::Simple, SlotKind::Complex] {
            let Some(tree) = statement.slot(searched, kind) else {
                continue;
            };
            for path in flatten(tree.leaf_path_groups(false)) {
                if let Some(key) = tree.effective_suffix_key(&path) {
                    if !keys.iter().any(|(c, k)| *c == component && k == key) {
                        keys.push((component, key.to_string()));
                    }
                }
            }
        }
    }
    keys
}

/// Remove property leaves whose suffix key is in `keys` from both
/// property slots. Returns the number of leaves removed.
pub fn drop_keyed_properties(
    statement: &mut Statement,
    keys: &[(ComponentType, String)],
) -> Result<usize> {
    let mut dropped = 0;
    for (component, key) in keys {
        let Some(property) = component.property() else {
            continue;
        };
        for kind in [SlotKind::Simple, SlotKind::Complex] {
            let Some(mut tree) = statement.slot_mut(property, kind).and_then(Option::take) else {
                continue;
            };
            let doomed: Vec<NodePath> = flatten(tree.leaf_path_groups(false))
                .into_iter()
                .filter(|path| tree.effective_suffix_key(path) == Some(key.as_str()))
                .collect();
            dropped += doomed.len();
            let emptied = !doomed.is_empty() && detach(&mut tree, doomed)?;
            if let Some(slot) = statement.slot_mut(property, kind) {
                *slot = (!emptied).then_some(tree);
            }
        }
    }
    if dropped > 0 {
        debug!(dropped, "Dropped properties owned by another statement");
    }
    Ok(dropped)
}

/// Remove each path once, in order. Returns true when the tree became empty.
fn detach(tree: &mut Node, paths: impl IntoIterator<Item = NodePath>) -> Result<bool> {
    let mut pending: Vec<NodePath> = Vec::new();
    for path in paths {
        if !pending.contains(&path) {
            pending.push(path);
        }
    }
    while !pending.is_empty() {
        let removed = pending.remove(0);
        if tree.remove(&removed)? {
            return Ok(true);
        }
        for path in pending.iter_mut() {
            path.rebase_after_removal(&removed);
        }
    }
    Ok(false)
}
