//! IG-Script tree types — nodes, entries and logical operators
//!
//! Every parsed component is a [`Node`]: either a leaf holding an
//! [`Entry`] or a binary combination of two owned children under a
//! [`LogicalOperator`].
//!
//! Children are exclusively owned (`Box`), so the tree is acyclic.
//! The parent relation is expressed through [`NodePath`] addresses
//! (the side taken at each level from the root) instead of stored
//! back-pointers; `path.parent()` is the parent's address.

use serde::{Deserialize, Serialize};

use crate::component::ComponentType;
use crate::config::SUFFIX_SEPARATOR;
use crate::error::{ParseError, Result};
use crate::statement::Statement;

// ── Logical operators ─────────────────────────────────────

/// Operator joining the two children of a combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
    Xor,
    /// Inferred when components co-occur without an author-written operator
    SyntheticAnd,
}

impl LogicalOperator {
    /// Written token; the synthetic operator is never written and uses its name
    pub const fn token(&self) -> &'static str {
        match self {
            LogicalOperator::And => "[AND]",
            LogicalOperator::Or => "[OR]",
            LogicalOperator::Xor => "[XOR]",
            LogicalOperator::SyntheticAnd => "bAND",
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Xor => "XOR",
            LogicalOperator::SyntheticAnd => "bAND",
        }
    }

    /// Accepts both the bare name (`OR`) and the written token (`[OR]`)
    pub fn from_token(token: &str) -> Result<LogicalOperator> {
        let bare = token
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']');
        match bare {
            "AND" => Ok(LogicalOperator::And),
            "OR" => Ok(LogicalOperator::Or),
            "XOR" => Ok(LogicalOperator::Xor),
            "bAND" => Ok(LogicalOperator::SyntheticAnd),
            _ => Err(ParseError::UnknownOperator(token.to_string())),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, LogicalOperator::SyntheticAnd)
    }
}

impl std::fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── Node content ──────────────────────────────────────────

/// Leaf payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entry {
    Empty,
    /// Trimmed component text
    Text(String),
    /// Statement nested inside a component (`Cac{...}`)
    Nested(Box<Statement>),
    /// Ordered group of nodes kept together under one leaf
    Group(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Leaf(Entry),
    Combination {
        operator: LogicalOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Universal tree unit produced by parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<ComponentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    /// Text preceding a combination inside its enclosing scope
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_left: Vec<String>,
    /// Text following a combination inside its enclosing scope
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_right: Vec<String>,
    /// Instance-specific property nodes owned by this node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private_nodes: Vec<Node>,
}

// ── Addressing ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Address of a node relative to a tree root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<Side>);

impl NodePath {
    pub fn root() -> NodePath {
        NodePath(Vec::new())
    }

    pub fn child(&self, side: Side) -> NodePath {
        let mut steps = self.0.clone();
        steps.push(side);
        NodePath(steps)
    }

    /// Address of the parent node; `None` for the root
    pub fn parent(&self) -> Option<NodePath> {
        if self.0.is_empty() {
            None
        } else {
            Some(NodePath(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn last(&self) -> Option<Side> {
        self.0.last().copied()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn steps(&self) -> &[Side] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &NodePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Adjust this address after `removed` was detached with [`Node::remove`].
    ///
    /// Removal replaces the parent by the sibling subtree, so addresses
    /// below the sibling lose one step.
    pub fn rebase_after_removal(&mut self, removed: &NodePath) {
        let (Some(parent), Some(side)) = (removed.parent(), removed.last()) else {
            return;
        };
        let sibling = parent.child(side.opposite());
        if self.starts_with(&sibling) {
            let mut steps = parent.0;
            steps.extend_from_slice(&self.0[sibling.0.len()..]);
            self.0 = steps;
        }
    }
}

/// Concatenate leaf groups into one ordered sequence
pub fn flatten<T>(groups: Vec<Vec<T>>) -> Vec<T> {
    groups.into_iter().flatten().collect()
}

// ── Construction ──────────────────────────────────────────

impl Node {
    fn with_kind(kind: NodeKind) -> Node {
        Node {
            kind,
            component_type: None,
            suffix: None,
            annotation: None,
            shared_left: Vec::new(),
            shared_right: Vec::new(),
            private_nodes: Vec::new(),
        }
    }

    pub fn empty() -> Node {
        Node::with_kind(NodeKind::Leaf(Entry::Empty))
    }

    /// Leaf with trimmed text value
    pub fn text(value: &str) -> Node {
        Node::with_kind(NodeKind::Leaf(Entry::Text(value.trim().to_string())))
    }

    pub fn nested(statement: Statement) -> Node {
        Node::with_kind(NodeKind::Leaf(Entry::Nested(Box::new(statement))))
    }

    pub fn group(nodes: Vec<Node>) -> Node {
        Node::with_kind(NodeKind::Leaf(Entry::Group(nodes)))
    }

    /// Combine two trees under `operator`.
    ///
    /// Fails if both sides carry a component type and the types differ.
    /// The new root takes the common component type.
    pub fn combine(left: Node, right: Node, operator: LogicalOperator) -> Result<Node> {
        let component_type = match (left.component_type, right.component_type) {
            (Some(l), Some(r)) if l != r => {
                return Err(ParseError::MismatchedComponentTypes {
                    left: l.to_string(),
                    right: r.to_string(),
                })
            }
            (l, r) => l.or(r),
        };
        let mut node = Node::with_kind(NodeKind::Combination {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        });
        node.component_type = component_type;
        Ok(node)
    }

    /// Left-fold `nodes` under one operator, in order; `None` for no nodes
    pub fn fold(nodes: Vec<Node>, operator: LogicalOperator) -> Result<Option<Node>> {
        let mut iter = nodes.into_iter();
        let Some(mut acc) = iter.next() else {
            return Ok(None);
        };
        for next in iter {
            acc = Node::combine(acc, next, operator)?;
        }
        Ok(Some(acc))
    }

    pub fn with_component_type(mut self, component_type: ComponentType) -> Node {
        self.component_type = Some(component_type);
        self
    }

    // ── Inspection ─────────────────────────────────────────

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn is_combination(&self) -> bool {
        matches!(self.kind, NodeKind::Combination { .. })
    }

    /// No value, no children and no private links
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(Entry::Empty)) && self.private_nodes.is_empty()
    }

    pub fn entry(&self) -> Option<&Entry> {
        match &self.kind {
            NodeKind::Leaf(entry) => Some(entry),
            NodeKind::Combination { .. } => None,
        }
    }

    pub fn text_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf(Entry::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn statement(&self) -> Option<&Statement> {
        match &self.kind {
            NodeKind::Leaf(Entry::Nested(statement)) => Some(statement),
            _ => None,
        }
    }

    pub fn operator(&self) -> Option<LogicalOperator> {
        match &self.kind {
            NodeKind::Combination { operator, .. } => Some(*operator),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn left(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::Combination { left, .. } => Some(left),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn right(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::Combination { right, .. } => Some(right),
            NodeKind::Leaf(_) => None,
        }
    }

    /// First comma-separated segment of the suffix, used as linkage key
    pub fn suffix_key(&self) -> Option<&str> {
        self.suffix
            .as_deref()
            .and_then(|s| s.split(SUFFIX_SEPARATOR).next())
            .filter(|key| !key.is_empty())
    }

    pub fn child(&self, side: Side) -> Option<&Node> {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }

    fn child_mut(&mut self, side: Side) -> Option<&mut Node> {
        match &mut self.kind {
            NodeKind::Combination { left, right, .. } => match side {
                Side::Left => Some(left),
                Side::Right => Some(right),
            },
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn get(&self, path: &NodePath) -> Option<&Node> {
        path.steps()
            .iter()
            .try_fold(self, |node, side| node.child(*side))
    }

    pub fn get_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let mut node = self;
        for side in path.steps() {
            node = node.child_mut(*side)?;
        }
        Some(node)
    }

    /// Component type of the node at `path`, inherited from the closest typed ancestor
    pub fn effective_component_type(&self, path: &NodePath) -> Option<ComponentType> {
        let mut node = self;
        let mut inherited = self.component_type;
        for side in path.steps() {
            node = node.child(*side)?;
            if node.component_type.is_some() {
                inherited = node.component_type;
            }
        }
        inherited
    }

    /// Linkage key of the node at `path`, inherited from the closest suffixed ancestor
    pub fn effective_suffix_key(&self, path: &NodePath) -> Option<&str> {
        let mut node = self;
        let mut inherited = self.suffix_key();
        for side in path.steps() {
            node = node.child(*side)?;
            if let Some(key) = node.suffix_key() {
                inherited = Some(key);
            }
        }
        inherited
    }

    /// Full suffix of the node at `path`, inherited like [`Node::effective_suffix_key`]
    pub fn effective_suffix(&self, path: &NodePath) -> Option<&str> {
        let mut node = self;
        let mut inherited = self.suffix.as_deref();
        for side in path.steps() {
            node = node.child(*side)?;
            if node.suffix.is_some() {
                inherited = node.suffix.as_deref();
            }
        }
        inherited
    }

    // ── Leaf enumeration ───────────────────────────────────

    /// Addresses of all leaves, in textual order
    pub fn leaf_paths(&self) -> Vec<NodePath> {
        let mut paths = Vec::new();
        self.collect_leaf_paths(NodePath::root(), &mut paths);
        paths
    }

    fn collect_leaf_paths(&self, here: NodePath, out: &mut Vec<NodePath>) {
        match &self.kind {
            NodeKind::Leaf(_) => out.push(here),
            NodeKind::Combination { left, right, .. } => {
                left.collect_leaf_paths(here.child(Side::Left), out);
                right.collect_leaf_paths(here.child(Side::Right), out);
            }
        }
    }

    /// Leaf addresses partitioned into groups.
    ///
    /// Without aggregation, each operand of a synthetic AND forms its own
    /// group; with aggregation all leaves form one group.
    pub fn leaf_path_groups(&self, aggregate_implicit_links: bool) -> Vec<Vec<NodePath>> {
        if aggregate_implicit_links {
            return vec![self.leaf_paths()];
        }
        let mut groups = Vec::new();
        self.collect_groups(NodePath::root(), &mut groups);
        groups
    }

    fn collect_groups(&self, here: NodePath, out: &mut Vec<Vec<NodePath>>) {
        match &self.kind {
            NodeKind::Combination {
                operator: LogicalOperator::SyntheticAnd,
                left,
                right,
            } => {
                left.collect_groups(here.child(Side::Left), out);
                right.collect_groups(here.child(Side::Right), out);
            }
            _ => {
                let mut group = Vec::new();
                self.collect_leaf_paths(here, &mut group);
                out.push(group);
            }
        }
    }

    /// Leaf nodes partitioned like [`Node::leaf_path_groups`]
    pub fn leaf_nodes(&self, aggregate_implicit_links: bool) -> Vec<Vec<&Node>> {
        self.leaf_path_groups(aggregate_implicit_links)
            .into_iter()
            .map(|group| group.iter().filter_map(|p| self.get(p)).collect())
            .collect()
    }

    // ── Mutation ───────────────────────────────────────────

    /// Detach the node at `path`.
    ///
    /// The parent combination is replaced by the remaining sibling, which
    /// inherits the parent's component type, suffix, annotation and shared
    /// text where it has none of its own. Returns `true` if the tree became
    /// empty (the removed node was the root).
    pub fn remove(&mut self, path: &NodePath) -> Result<bool> {
        let Some(parent_path) = path.parent() else {
            *self = Node::empty();
            return Ok(true);
        };
        let side = path.last().unwrap_or(Side::Left);
        let parent = self
            .get_mut(&parent_path)
            .ok_or_else(|| ParseError::InvalidNodePath(format!("{:?}", path.steps())))?;
        if parent.child(side).is_none() {
            return Err(ParseError::InvalidNodePath(format!("{:?}", path.steps())));
        }
        let old = std::mem::replace(parent, Node::empty());
        let Node {
            kind,
            component_type,
            suffix,
            annotation,
            shared_left,
            shared_right,
            private_nodes,
        } = old;
        if let NodeKind::Combination { left, right, .. } = kind {
            let mut sibling = match side {
                Side::Left => *right,
                Side::Right => *left,
            };
            if sibling.component_type.is_none() {
                sibling.component_type = component_type;
            }
            if sibling.suffix.is_none() {
                sibling.suffix = suffix;
            }
            if sibling.annotation.is_none() {
                sibling.annotation = annotation;
            }
            let mut merged_left = shared_left;
            merged_left.append(&mut sibling.shared_left);
            sibling.shared_left = merged_left;
            sibling.shared_right.extend(shared_right);
            sibling.private_nodes.extend(private_nodes);
            *parent = sibling;
        }
        Ok(false)
    }

    /// Apply `visitor` to every leaf in textual order, stopping at the first error.
    ///
    /// Leaves may be replaced wholesale (e.g. a text leaf by a subtree).
    pub fn try_for_each_leaf_mut<F>(&mut self, visitor: &mut F) -> Result<()>
    where
        F: FnMut(&mut Node) -> Result<()>,
    {
        if self.is_leaf() {
            return visitor(self);
        }
        if let NodeKind::Combination { left, right, .. } = &mut self.kind {
            left.try_for_each_leaf_mut(visitor)?;
            right.try_for_each_leaf_mut(visitor)?;
        }
        Ok(())
    }

    // ── Rendering ──────────────────────────────────────────

    /// Render back to IG-Script-like text
    pub fn stringify(&self) -> String {
        let core = match &self.kind {
            NodeKind::Leaf(Entry::Empty) => String::new(),
            NodeKind::Leaf(Entry::Text(value)) => value.clone(),
            NodeKind::Leaf(Entry::Nested(statement)) => format!("{{{}}}", statement.stringify()),
            NodeKind::Leaf(Entry::Group(nodes)) => nodes
                .iter()
                .map(Node::stringify)
                .collect::<Vec<_>>()
                .join(" "),
            NodeKind::Combination {
                operator,
                left,
                right,
            } => format!("({} {} {})", left.stringify(), operator.token(), right.stringify()),
        };
        let mut parts: Vec<&str> = self.shared_left.iter().map(String::as_str).collect();
        parts.push(&core);
        parts.extend(self.shared_right.iter().map(String::as_str));
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn and(l: Node, r: Node) -> Node {
        Node::combine(l, r, LogicalOperator::And).unwrap()
    }

    fn sand(l: Node, r: Node) -> Node {
        Node::combine(l, r, LogicalOperator::SyntheticAnd).unwrap()
    }

    fn values(node: &Node) -> Vec<String> {
        flatten(node.leaf_nodes(true))
            .into_iter()
            .filter_map(|n| n.text_value().map(String::from))
            .collect()
    }

    // ── Operators ──────────────────────────────────────

    #[test]
    fn test_operator_tokens() {
        assert_eq!(LogicalOperator::from_token("[XOR]").unwrap(), LogicalOperator::Xor);
        assert_eq!(LogicalOperator::from_token("OR").unwrap(), LogicalOperator::Or);
        assert_eq!(LogicalOperator::SyntheticAnd.to_string(), "bAND");
        assert!(LogicalOperator::SyntheticAnd.is_synthetic());
    }

    #[test]
    fn test_unknown_operator() {
        let err = LogicalOperator::from_token("[NAND]").unwrap_err();
        assert_eq!(err, ParseError::UnknownOperator("[NAND]".into()));
    }

    // ── Construction ───────────────────────────────────

    #[test]
    fn test_text_leaf_is_trimmed() {
        let node = Node::text("  inspect ");
        assert_eq!(node.text_value(), Some("inspect"));
        assert!(node.is_leaf());
        assert!(!node.is_empty());
    }

    #[test]
    fn test_empty_node() {
        let mut node = Node::empty();
        assert!(node.is_empty());
        node.private_nodes.push(Node::text("x"));
        assert!(!node.is_empty());
    }

    #[test]
    fn test_combine_takes_common_type() {
        let l = Node::text("a").with_component_type(ComponentType::Aim);
        let r = Node::text("b");
        let node = Node::combine(l, r, LogicalOperator::Or).unwrap();
        assert_eq!(node.component_type, Some(ComponentType::Aim));
        assert_eq!(node.operator(), Some(LogicalOperator::Or));
    }

    #[test]
    fn test_combine_rejects_mismatched_types() {
        let l = Node::text("a").with_component_type(ComponentType::Aim);
        let r = Node::text("b").with_component_type(ComponentType::Deontic);
        let err = Node::combine(l, r, LogicalOperator::And).unwrap_err();
        assert!(matches!(err, ParseError::MismatchedComponentTypes { .. }));
    }

    #[test]
    fn test_fold_left_associative() {
        let node = Node::fold(
            vec![Node::text("a"), Node::text("b"), Node::text("c")],
            LogicalOperator::SyntheticAnd,
        )
        .unwrap()
        .unwrap();
        assert_eq!(node.stringify(), "((a bAND b) bAND c)");
        assert!(Node::fold(Vec::new(), LogicalOperator::And).unwrap().is_none());
    }

    // ── Addressing ─────────────────────────────────────

    #[test]
    fn test_get_and_parent() {
        let tree = and(Node::text("a"), and(Node::text("b"), Node::text("c")));
        let path = NodePath::root().child(Side::Right).child(Side::Left);
        assert_eq!(tree.get(&path).and_then(Node::text_value), Some("b"));
        let parent = path.parent().unwrap();
        assert_eq!(tree.get(&parent).and_then(Node::operator), Some(LogicalOperator::And));
        assert!(NodePath::root().parent().is_none());
    }

    #[test]
    fn test_effective_component_type_inherits() {
        let tree = and(Node::text("a"), Node::text("b")).with_component_type(ComponentType::Aim);
        let path = NodePath::root().child(Side::Left);
        assert_eq!(tree.effective_component_type(&path), Some(ComponentType::Aim));
    }

    #[test]
    fn test_suffix_key_first_segment() {
        let mut node = Node::text("x");
        node.suffix = Some("1,55".into());
        assert_eq!(node.suffix_key(), Some("1"));
        node.suffix = None;
        assert_eq!(node.suffix_key(), None);
    }

    // ── Leaf groups ────────────────────────────────────

    #[test]
    fn test_leaf_groups_split_on_synthetic_and() {
        let tree = sand(and(Node::text("a"), Node::text("b")), Node::text("c"));
        let groups = tree.leaf_nodes(false);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1][0].text_value(), Some("c"));

        let aggregated = tree.leaf_nodes(true);
        assert_eq!(aggregated.len(), 1);
        assert_eq!(values(&tree), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_leaf_groups_single_leaf() {
        let tree = Node::text("solo");
        assert_eq!(tree.leaf_path_groups(false), vec![vec![NodePath::root()]]);
    }

    // ── Removal ────────────────────────────────────────

    #[test]
    fn test_remove_rebalances_parent() {
        let mut tree = and(Node::text("a"), and(Node::text("b"), Node::text("c")))
            .with_component_type(ComponentType::Aim);
        let became_empty = tree
            .remove(&NodePath::root().child(Side::Right).child(Side::Left))
            .unwrap();
        assert!(!became_empty);
        assert_eq!(tree.stringify(), "(a [AND] c)");
    }

    #[test]
    fn test_remove_last_leaf_empties_tree() {
        let mut tree = Node::text("only");
        assert!(tree.remove(&NodePath::root()).unwrap());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_sibling_inherits_type() {
        let mut tree = and(Node::text("a"), Node::text("b"))
            .with_component_type(ComponentType::DirectObjectProperty);
        tree.remove(&NodePath::root().child(Side::Left)).unwrap();
        assert_eq!(tree.text_value(), Some("b"));
        assert_eq!(tree.component_type, Some(ComponentType::DirectObjectProperty));
    }

    #[test]
    fn test_remove_invalid_path() {
        let mut tree = Node::text("a");
        let err = tree.remove(&NodePath::root().child(Side::Left)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNodePath(_)));
    }

    #[test]
    fn test_rebase_after_removal() {
        let mut tree = and(Node::text("a"), and(Node::text("b"), Node::text("c")));
        let removed = NodePath::root().child(Side::Left);
        let mut c_path = NodePath::root().child(Side::Right).child(Side::Right);
        tree.remove(&removed).unwrap();
        c_path.rebase_after_removal(&removed);
        assert_eq!(c_path, NodePath::root().child(Side::Right));
        assert_eq!(tree.get(&c_path).and_then(Node::text_value), Some("c"));
    }

    // ── Visiting ───────────────────────────────────────

    #[test]
    fn test_visitor_replaces_leaves() {
        let mut tree = and(Node::text("a"), Node::text("b"));
        tree.try_for_each_leaf_mut(&mut |leaf| {
            let upper = leaf.text_value().unwrap_or_default().to_uppercase();
            *leaf = Node::text(&upper);
            Ok(())
        })
        .unwrap();
        assert_eq!(tree.stringify(), "(A [AND] B)");
    }

    #[test]
    fn test_visitor_short_circuits() {
        let mut tree = and(Node::text("a"), Node::text("b"));
        let mut seen = 0;
        let result = tree.try_for_each_leaf_mut(&mut |_| {
            seen += 1;
            Err(ParseError::EmptyStatement)
        });
        assert!(result.is_err());
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_stringify_with_shared_text() {
        let mut tree = Node::combine(Node::text("left"), Node::text("right"), LogicalOperator::Xor)
            .unwrap();
        tree.shared_left.push("shared".into());
        assert_eq!(tree.stringify(), "shared (left [XOR] right)");
    }

    #[test]
    fn test_serialize_node() {
        let tree = and(Node::text("a"), Node::text("b")).with_component_type(ComponentType::Aim);
        let json = serde_json::to_string(&tree).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(tree, back);
    }
}
