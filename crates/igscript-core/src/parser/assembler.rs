//! Statement assembly — the recursive driver of a parse
//!
//! One assembly pass over a statement string:
//!
//! ```text
//! text ─→ balance check ─→ top-level brace blocks ─┬─ tagged:   nested statement
//!                                                  │            (or nested combination)
//!                                                  ├─ untagged: component pair
//!                                                  │            (or ignored element)
//!                                                  └─ rest:     atomic components
//! ```
//!
//! Atomic components fill the simple slots, nested statements fill the
//! complex slots, and a component pair expands the statement into one
//! statement per pair leaf, each inheriting the components written
//! outside the pair. Nested statements and pair leaves are assembled by
//! the same procedure one level deeper.
//!
//! Guarantees:
//! - Deterministic: same input always produces same tree
//! - Top-level blocks never overlap, so a block is only ever read once
//! - Recursion is bounded by [`ParseOptions::max_nesting_depth`]

use tracing::{debug, trace, warn};

use crate::component::ComponentType;
use crate::config::ParseOptions;
use crate::error::{ParseError, Result};
use crate::parser::ast::{flatten, Entry, LogicalOperator, Node, NodeKind};
use crate::parser::boundary::{header_before, tagged_block, Header};
use crate::parser::builder::TreeBuilder;
use crate::parser::combination::Delimiters;
use crate::parser::component::parse_component;
use crate::parser::linkage::{drop_keyed_properties, linkage_keys, resolve_private_links};
use crate::parser::scanner::{check_balance, tokenize, top_level_operators, Token};
use crate::statement::{SlotKind, Statement};

/// Top-level brace block of one statement string
#[derive(Debug, Clone)]
struct Block {
    /// Offset of the tag (tagged) or opening brace (untagged)
    start: usize,
    /// Offset one past the closing brace
    end: usize,
    raw: String,
    kind: BlockKind,
}

#[derive(Debug, Clone)]
enum BlockKind {
    /// `Cac{A(x) I(y)}`
    Nested { header: Header, inner: String },
    /// `Cac{Cac{...} [OR] Cac{...}}`
    NestedCombination { header: Header, tree: Node },
    /// `{I(a) Bdir(b) [XOR] I(c) Bdir(d)}`
    Pair { tree: Node },
    /// Braces with nothing we can attach
    Ignored,
}

/// Plain nested statement waiting to be grouped by component
type NestedBlock = (Header, String, (usize, usize));

/// Statement string split into its top-level blocks and the atomic rest
#[derive(Debug)]
struct Layout {
    /// Input with every block blanked out
    atomic: String,
    blocks: Vec<Block>,
}

/// Assembles one statement string into a node tree
pub struct Assembler<'o> {
    options: &'o ParseOptions,
    atomic: TreeBuilder,
    fragments: TreeBuilder,
    ignored: Vec<String>,
    partial: Option<Statement>,
}

impl<'o> Assembler<'o> {
    pub fn new(options: &'o ParseOptions) -> Self {
        Assembler {
            options,
            atomic: TreeBuilder::new(Delimiters::Parentheses, options.max_nesting_depth),
            fragments: TreeBuilder::new(Delimiters::Braces, options.max_nesting_depth),
            ignored: Vec::new(),
            partial: None,
        }
    }

    /// Assemble a whole statement.
    ///
    /// The result is a nested-statement leaf, or a combination of them if
    /// the statement contains a component pair.
    pub fn assemble(&mut self, text: &str) -> Result<Node> {
        self.assemble_at(text, 0)
    }

    /// Outermost statement as far as it was built, for failure reports
    pub fn take_partial(&mut self) -> Option<Statement> {
        self.partial.take()
    }

    /// Brace blocks dropped so far, in encounter order
    pub fn take_ignored(&mut self) -> Vec<String> {
        std::mem::take(&mut self.ignored)
    }

    fn assemble_at(&mut self, text: &str, depth: usize) -> Result<Node> {
        if depth > self.options.max_nesting_depth {
            return Err(ParseError::NestingTooDeep(self.options.max_nesting_depth));
        }
        check_balance(text)?;
        let layout = self.layout(text)?;
        trace!(depth, blocks = layout.blocks.len(), "Statement layout");

        let mut statement = Statement::new();
        self.parse_atomic(&layout.atomic, &mut statement)?;
        if self.options.resolve_private_links {
            resolve_private_links(&mut statement, SlotKind::Simple)?;
        }
        if depth == 0 {
            self.partial = Some(statement.clone());
        }

        let mut nested = Vec::new();
        let mut pairs = Vec::new();
        for Block {
            start,
            end,
            raw,
            kind,
        } in layout.blocks
        {
            match kind {
                BlockKind::Ignored => {
                    warn!(element = %raw, "Ignoring brace block without component or operator");
                    self.ignored.push(raw);
                }
                BlockKind::NestedCombination { header, tree } => {
                    self.attach_nested_combination(&mut statement, &raw, header, tree, depth)?;
                }
                BlockKind::Nested { header, inner } => nested.push((header, inner, (start, end))),
                BlockKind::Pair { tree } => pairs.push((raw, tree)),
            }
        }
        if !nested.is_empty() {
            self.attach_nested_statements(&mut statement, nested, &layout.atomic, depth)?;
        }

        if self.options.resolve_private_links {
            resolve_private_links(&mut statement, SlotKind::Complex)?;
        }
        if depth == 0 {
            self.partial = Some(statement.clone());
        }

        match pairs.len() {
            0 if statement.is_empty() => Err(ParseError::EmptyStatement),
            0 => Ok(Node::nested(statement)),
            1 => {
                let (raw, tree) = pairs.remove(0);
                self.expand_pair(statement, &raw, tree, depth)
            }
            _ => Err(ParseError::MultipleComponentPairs {
                pairs: pairs.into_iter().map(|(raw, _)| raw).collect(),
            }),
        }
    }

    // ── Layout ─────────────────────────────────────────────

    fn layout(&self, text: &str) -> Result<Layout> {
        let mut blocks = Vec::new();
        let mut paren_depth = 0usize;
        let mut brace_depth = 0usize;
        let mut block_open = None;

        for st in tokenize(text) {
            match st.token {
                Token::LParen if brace_depth == 0 => paren_depth += 1,
                Token::RParen if brace_depth == 0 => paren_depth = paren_depth.saturating_sub(1),
                Token::LBrace if paren_depth == 0 => {
                    if brace_depth == 0 {
                        block_open = Some(st.span.offset);
                    }
                    brace_depth += 1;
                }
                Token::RBrace if paren_depth == 0 => {
                    brace_depth = brace_depth.saturating_sub(1);
                    if brace_depth == 0 {
                        if let Some(open) = block_open.take() {
                            blocks.push(self.classify_block(text, open, st.span.offset)?);
                        }
                    }
                }
                _ => {}
            }
        }

        let mut atomic = String::with_capacity(text.len());
        let mut cursor = 0;
        for block in &blocks {
            atomic.push_str(&text[cursor..block.start]);
            atomic.push_str(&" ".repeat(block.end - block.start));
            cursor = block.end;
        }
        atomic.push_str(&text[cursor..]);

        Ok(Layout { atomic, blocks })
    }

    fn classify_block(&self, text: &str, open: usize, close: usize) -> Result<Block> {
        let inner = &text[open + 1..close];

        if let Some(header) = header_before(text, open) {
            let start = header.start;
            let raw = text[start..=close].to_string();
            let kind = if !header.component.supports_nesting() {
                BlockKind::Ignored
            } else if let Some(tree) = self.nested_combination(&text[open..=close]) {
                BlockKind::NestedCombination { header, tree }
            } else {
                BlockKind::Nested {
                    header,
                    inner: inner.to_string(),
                }
            };
            return Ok(Block {
                start,
                end: close + 1,
                raw,
                kind,
            });
        }

        let raw = text[open..=close].to_string();
        let kind = if inner.trim().is_empty() {
            BlockKind::Ignored
        } else {
            let tree = self.fragments.build(&raw)?;
            let pairs = pair_combinations(&tree);
            if pairs.len() > 1 {
                return Err(ParseError::MultipleComponentPairs {
                    pairs: pairs.iter().map(|pair| pair.stringify()).collect(),
                });
            }
            if tree.is_combination() {
                BlockKind::Pair { tree }
            } else {
                BlockKind::Ignored
            }
        };
        Ok(Block {
            start: open,
            end: close + 1,
            raw,
            kind,
        })
    }

    /// Combination tree if `braced` is a combination of tagged nested statements only
    fn nested_combination(&self, braced: &str) -> Option<Node> {
        let tree = match self.fragments.build(braced) {
            Ok(tree) => tree,
            Err(e) => {
                debug!(error = %e, "Not a nested combination");
                return None;
            }
        };
        if !tree.is_combination() || carries_shared_text(&tree) {
            return None;
        }
        let all_tagged = tree
            .leaf_paths()
            .iter()
            .filter_map(|path| tree.get(path))
            .all(|leaf| leaf.text_value().and_then(tagged_block).is_some());
        all_tagged.then_some(tree)
    }

    // ── Atomic components ──────────────────────────────────

    fn parse_atomic(&self, text: &str, statement: &mut Statement) -> Result<()> {
        for component in ComponentType::ALL {
            match parse_component(text, component, &self.atomic) {
                Ok(node) => *statement.simple_mut(component) = Some(node),
                Err(ParseError::ComponentNotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    // ── Nested statements ──────────────────────────────────

    fn attach_nested_combination(
        &mut self,
        statement: &mut Statement,
        raw: &str,
        header: Header,
        mut tree: Node,
        depth: usize,
    ) -> Result<()> {
        let mut tag: Option<ComponentType> = None;
        tree.try_for_each_leaf_mut(&mut |leaf| {
            let text = leaf.text_value().unwrap_or_default().to_string();
            let Some((leaf_header, inner)) = tagged_block(&text) else {
                return Err(ParseError::InvalidNestedCombination {
                    text: raw.to_string(),
                    reason: format!("'{}' is not a tagged nested statement", text),
                });
            };
            match tag {
                Some(existing) if existing != leaf_header.component => {
                    return Err(ParseError::InvalidNestedCombination {
                        text: raw.to_string(),
                        reason: format!(
                            "mixed component types {} and {}",
                            existing, leaf_header.component
                        ),
                    });
                }
                _ => tag = Some(leaf_header.component),
            }
            let mut node = self.assemble_at(inner, depth + 1)?;
            stamp(&mut node, &leaf_header);
            *leaf = node;
            Ok(())
        })?;

        let component = tag.unwrap_or(header.component);
        if component != header.component {
            return Err(ParseError::InvalidNestedCombination {
                text: raw.to_string(),
                reason: format!("{} statements combined inside {}", component, header.component),
            });
        }
        stamp(&mut tree, &header);
        debug!(component = %component, "Attached nested statement combination");
        attach_complex(statement, component, tree)
    }

    fn attach_nested_statements(
        &mut self,
        statement: &mut Statement,
        nested: Vec<NestedBlock>,
        atomic: &str,
        depth: usize,
    ) -> Result<()> {
        // Per component: nodes in textual order and the range from the
        // first block's start to the last block's end
        let mut groups: Vec<(ComponentType, Vec<Node>, (usize, usize))> = Vec::new();
        for (header, inner, (start, end)) in nested {
            let mut node = self.assemble_at(&inner, depth + 1)?;
            stamp(&mut node, &header);
            match groups.iter_mut().find(|(c, _, _)| *c == header.component) {
                Some((_, nodes, range)) => {
                    nodes.push(node);
                    range.1 = end;
                }
                None => groups.push((header.component, vec![node], (start, end))),
            }
        }

        for (component, nodes, range) in groups {
            let operator = if nodes.len() > 1 {
                self.nested_operator(atomic, range)?
            } else {
                LogicalOperator::SyntheticAnd
            };
            debug!(
                component = %component,
                count = nodes.len(),
                operator = %operator,
                "Attached nested statements"
            );
            if let Some(tree) = Node::fold(nodes, operator)? {
                attach_complex(statement, component, tree)?;
            }
        }
        Ok(())
    }

    /// Operator joining several plain nested statements of one component,
    /// read from the atomic text between the first and last of them
    fn nested_operator(&self, atomic: &str, range: (usize, usize)) -> Result<LogicalOperator> {
        if let Some(operator) = self.options.nested_operator {
            return Ok(operator);
        }
        let mut distinct: Vec<(LogicalOperator, _)> = Vec::new();
        for (operator, span) in top_level_operators(atomic) {
            if span.offset < range.0 || span.offset >= range.1 {
                continue;
            }
            if !distinct.iter().any(|(seen, _)| *seen == operator) {
                distinct.push((operator, span));
            }
        }
        match distinct.as_slice() {
            [] => Ok(LogicalOperator::SyntheticAnd),
            [(operator, _)] => Ok(*operator),
            [(first, _), (second, span), ..] => Err(ParseError::MixedOperators {
                first: first.token().to_string(),
                second: second.token().to_string(),
                span: *span,
            }),
        }
    }

    // ── Component pairs ────────────────────────────────────

    /// One statement per pair leaf, each inheriting `outer`'s components
    fn expand_pair(
        &mut self,
        outer: Statement,
        raw: &str,
        mut tree: Node,
        depth: usize,
    ) -> Result<Node> {
        let link = self.options.resolve_private_links;
        // Outer properties still waiting for an owner
        let unowned = if link { linkage_keys(&outer, true) } else { Vec::new() };

        distribute_shared(&mut tree, &[], &[]);
        tree.try_for_each_leaf_mut(&mut |leaf| {
            let fragment = leaf.text_value().unwrap_or_default().to_string();
            if fragment.is_empty() {
                return Err(ParseError::InvalidComponentPair {
                    text: raw.to_string(),
                    reason: "empty pair element".into(),
                });
            }
            if let Some((operator, _)) = top_level_operators(&fragment).first() {
                return Err(ParseError::InvalidComponentPair {
                    text: raw.to_string(),
                    reason: format!("un-combined operator {} in '{}'", operator.token(), fragment),
                });
            }
            let mut expanded = self.assemble_at(&fragment, depth + 1)?;
            expanded.try_for_each_leaf_mut(&mut |node| {
                if let NodeKind::Leaf(Entry::Nested(inner)) = &mut node.kind {
                    let statement: &mut Statement = inner;
                    statement.inherit_from(&outer, raw)?;
                    if link {
                        resolve_private_links(statement, SlotKind::Simple)?;
                        resolve_private_links(statement, SlotKind::Complex)?;
                    }
                }
                Ok(())
            })?;
            *leaf = expanded;
            Ok(())
        })?;
        if !unowned.is_empty() {
            drop_foreign_properties(&mut tree, &unowned)?;
        }
        debug!(pair = raw, leaves = tree.leaf_paths().len(), "Expanded component pair");
        Ok(tree)
    }
}

// ── Helpers ───────────────────────────────────────────────

fn stamp(node: &mut Node, header: &Header) {
    node.component_type = Some(header.component);
    node.suffix = header.suffix.clone();
    node.annotation = header.annotation.clone();
}

/// Add `node` to the complex slot of `component`, behind existing content
fn attach_complex(statement: &mut Statement, component: ComponentType, node: Node) -> Result<()> {
    let slot = statement
        .complex_mut(component)
        .ok_or_else(|| ParseError::UnsupportedNesting(component.symbol()))?;
    *slot = Some(match slot.take() {
        Some(existing) => Node::combine(existing, node, LogicalOperator::SyntheticAnd)?,
        None => node,
    });
    Ok(())
}

/// Author-written combinations joined by synthetic AND at the top of `node`
fn pair_combinations(node: &Node) -> Vec<&Node> {
    match &node.kind {
        NodeKind::Combination {
            operator: LogicalOperator::SyntheticAnd,
            left,
            right,
        } => {
            let mut found = pair_combinations(left);
            found.extend(pair_combinations(right));
            found
        }
        NodeKind::Combination { .. } => vec![node],
        NodeKind::Leaf(_) => Vec::new(),
    }
}

/// Drop inherited properties from expanded statements when their owner
/// sits in a different statement of the same pair
fn drop_foreign_properties(tree: &mut Node, unowned: &[(ComponentType, String)]) -> Result<()> {
    let owned: Vec<(ComponentType, String)> = flatten(tree.leaf_nodes(true))
        .into_iter()
        .filter_map(Node::statement)
        .flat_map(|statement| linkage_keys(statement, false))
        .collect();
    let claimed: Vec<(ComponentType, String)> = unowned
        .iter()
        .filter(|&key| owned.contains(key))
        .cloned()
        .collect();
    if claimed.is_empty() {
        return Ok(());
    }
    tree.try_for_each_leaf_mut(&mut |node| {
        if let NodeKind::Leaf(Entry::Nested(inner)) = &mut node.kind {
            let statement: &mut Statement = inner;
            let own = linkage_keys(statement, false);
            let foreign: Vec<(ComponentType, String)> = claimed
                .iter()
                .filter(|&key| !own.contains(key))
                .cloned()
                .collect();
            drop_keyed_properties(statement, &foreign)?;
        }
        Ok(())
    })
}

fn carries_shared_text(node: &Node) -> bool {
    if !node.shared_left.is_empty() || !node.shared_right.is_empty() {
        return true;
    }
    match &node.kind {
        NodeKind::Combination { left, right, .. } => {
            carries_shared_text(left) || carries_shared_text(right)
        }
        NodeKind::Leaf(_) => false,
    }
}

/// Move shared text from combinations into the text of every leaf below
fn distribute_shared(node: &mut Node, prefix: &[String], suffix: &[String]) {
    match &mut node.kind {
        NodeKind::Combination { left, right, .. } => {
            let mut before = prefix.to_vec();
            before.append(&mut node.shared_left);
            let mut after = std::mem::take(&mut node.shared_right);
            after.extend_from_slice(suffix);
            distribute_shared(left, &before, &after);
            distribute_shared(right, &before, &after);
        }
        NodeKind::Leaf(Entry::Text(value)) if !prefix.is_empty() || !suffix.is_empty() => {
            let joined = prefix
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(value.as_str()))
                .chain(suffix.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ");
            *value = joined;
        }
        NodeKind::Leaf(_) => {}
    }
}
