//! Path Evaluator
//!
//! Applies a parsed [`LocationPath`] to a document. Steps are evaluated per
//! context node so positional predicates count among the candidates of
//! one parent, as in XPath: `/a/b[2]` is the second `b` below each `a`.

use super::parser::{Axis, LocationPath, NodeTest, Predicate, Step};
use crate::dom::{Document, NamespaceTable, NodeId, NodeKind, DOCUMENT_NODE};
use std::collections::HashSet;

/// One node selected by a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Element, text or other tree node
    Node(NodeId),
    /// Attribute of an element, by position in its attribute list
    Attribute(NodeId, usize),
}

impl Target {
    /// The tree node, or the owning element of an attribute
    pub fn node(self) -> NodeId {
        match self {
            Target::Node(id) | Target::Attribute(id, _) => id,
        }
    }

    pub fn is_attribute(self) -> bool {
        matches!(self, Target::Attribute(..))
    }
}

/// Evaluate `path` against `doc`; relative paths start at the document node
pub fn evaluate(doc: &Document, namespaces: &NamespaceTable, path: &LocationPath) -> Vec<Target> {
    let mut context = vec![Target::Node(DOCUMENT_NODE)];

    for step in &path.steps {
        let mut next = Vec::new();
        for &ctx in &context {
            let Target::Node(node) = ctx else { continue };
            let candidates = apply_axis(doc, namespaces, node, step);
            next.extend(apply_predicates(doc, step, candidates));
        }
        context = if needs_ordering(&context) {
            in_document_order(doc, next)
        } else {
            next
        };
        if context.is_empty() {
            break;
        }
    }

    context
}

/// Results from several contexts can interleave or repeat
fn needs_ordering(context: &[Target]) -> bool {
    context.len() > 1
}

fn apply_axis(doc: &Document, namespaces: &NamespaceTable, node: NodeId, step: &Step) -> Vec<Target> {
    match step.axis {
        Axis::Child => doc
            .children(node)
            .filter(|&c| node_matches(doc, namespaces, c, &step.test))
            .map(Target::Node)
            .collect(),
        Axis::DescendantOrSelf => std::iter::once(node)
            .chain(doc.descendants(node))
            .filter(|&c| node_matches(doc, namespaces, c, &step.test))
            .map(Target::Node)
            .collect(),
        Axis::SelfNode => vec![Target::Node(node)],
        Axis::Parent => doc.parent(node).map(Target::Node).into_iter().collect(),
        Axis::Attribute => {
            let Some(element) = doc.node(node).filter(|n| n.is_element()) else {
                return Vec::new();
            };
            element
                .attributes
                .iter()
                .enumerate()
                .filter(|(_, attr)| {
                    let name = doc.names().get(attr.name_id);
                    attribute_matches(name, &step.test)
                })
                .map(|(i, _)| Target::Attribute(node, i))
                .collect()
        }
    }
}

fn node_matches(doc: &Document, namespaces: &NamespaceTable, id: NodeId, test: &NodeTest) -> bool {
    let Some(kind) = doc.kind(id) else {
        return false;
    };
    match test {
        NodeTest::Node => true,
        NodeTest::Text => matches!(kind, NodeKind::Text | NodeKind::CData),
        NodeTest::Comment => kind == NodeKind::Comment,
        NodeTest::Any => kind == NodeKind::Element,
        NodeTest::Name { prefix, local } => {
            kind == NodeKind::Element && element_name_matches(doc, namespaces, id, prefix.as_deref(), local)
        }
    }
}

/// A registered prefix matches by namespace URI; an unregistered one
/// matches the literal qualified name.
fn element_name_matches(
    doc: &Document,
    namespaces: &NamespaceTable,
    id: NodeId,
    prefix: Option<&str>,
    local: &str,
) -> bool {
    match prefix {
        None => doc.name(id) == local,
        Some(prefix) => match namespaces.resolve(prefix) {
            Some(uri) => doc.local_name(id) == local && doc.namespace_uri(id) == Some(uri),
            None => doc.name(id).split_once(':') == Some((prefix, local)),
        },
    }
}

fn attribute_matches(name: &str, test: &NodeTest) -> bool {
    match test {
        NodeTest::Any | NodeTest::Node => name != "xmlns" && !name.starts_with("xmlns:"),
        NodeTest::Name { prefix: None, local } => name == local,
        NodeTest::Name {
            prefix: Some(prefix),
            local,
        } => name.split_once(':') == Some((prefix.as_str(), local.as_str())),
        NodeTest::Text | NodeTest::Comment => false,
    }
}

fn apply_predicates(doc: &Document, step: &Step, mut candidates: Vec<Target>) -> Vec<Target> {
    for predicate in &step.predicates {
        let size = candidates.len();
        candidates = candidates
            .into_iter()
            .enumerate()
            .filter(|&(i, target)| predicate_holds(doc, predicate, target, i + 1, size))
            .map(|(_, target)| target)
            .collect();
    }
    candidates
}

fn predicate_holds(doc: &Document, predicate: &Predicate, target: Target, position: usize, size: usize) -> bool {
    let node = target.node();
    match predicate {
        Predicate::Position(n) => position == *n,
        Predicate::Last => position == size,
        Predicate::HasAttribute(name) => doc.has_attribute(node, name),
        Predicate::Attribute(name, op, literal) => doc
            .attribute(node, name)
            .is_some_and(|value| literal.compare(*op, value)),
        Predicate::HasChild(name) => doc.named_children(node, name).next().is_some(),
        Predicate::Child(name, op, literal) => doc
            .named_children(node, name)
            .any(|child| literal.compare(*op, &doc.text(child))),
        Predicate::Text(op, literal) => literal.compare(*op, &doc.text(node)),
    }
}

/// Sort targets into document order and drop duplicates
fn in_document_order(doc: &Document, targets: Vec<Target>) -> Vec<Target> {
    if targets.len() < 2 {
        return targets;
    }

    let mut rank = vec![usize::MAX; doc.arena_len()];
    rank[DOCUMENT_NODE as usize] = 0;
    for (i, id) in doc.descendants(DOCUMENT_NODE).enumerate() {
        if let Some(slot) = rank.get_mut(id as usize) {
            *slot = i + 1;
        }
    }

    let mut seen = HashSet::with_capacity(targets.len());
    let mut unique: Vec<Target> = targets.into_iter().filter(|t| seen.insert(*t)).collect();
    unique.sort_by_key(|t| {
        let node_rank = rank.get(t.node() as usize).copied().unwrap_or(usize::MAX);
        match *t {
            Target::Node(_) => (node_rank, 0),
            Target::Attribute(_, i) => (node_rank, i + 1),
        }
    });
    unique
}
