//! Mutable arena document
//!
//! All nodes live in one `Vec`; links between them are `NodeId`s. Removing a
//! subtree returns its slots to a free list that later insertions draw from,
//! so ids inside a removed subtree must not be used again. Names are
//! interned in a per-document [`NamePool`].

use super::namespace::{declaration_attribute, ns};
use super::node::{NodeId, NodeKind, XmlAttribute, XmlNode};
use super::strings::NamePool;
use crate::core::names::split_qname;
use crate::reader::{ParseError, SliceReader, StartElement, XmlEvent};

/// Id of the document node in every arena
pub const DOCUMENT_NODE: NodeId = 0;

/// In-memory XML tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<XmlNode>,
    /// Released slots, reused before the arena grows
    free: Vec<NodeId>,
    names: NamePool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document holding only the document node
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(XmlNode::document());
        Document {
            nodes,
            free: Vec::new(),
            names: NamePool::new(),
        }
    }

    /// Document with a single empty root element
    pub fn with_root(name: &str) -> Self {
        let mut doc = Self::new();
        doc.append_element(DOCUMENT_NODE, name);
        doc
    }

    /// Parse document text in strict mode
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        Self::parse_with(input, true)
    }

    /// Parse document text; lenient mode salvages malformed input.
    ///
    /// Whitespace-only text is dropped so that the tree can be pretty
    /// printed again without accumulating indentation.
    pub fn parse_with(input: &str, strict: bool) -> Result<Self, ParseError> {
        let mut reader = SliceReader::with_mode(input, strict);
        let mut doc = Document::new();
        let mut stack: Vec<NodeId> = vec![DOCUMENT_NODE];

        while let Some(event) = reader.next_event()? {
            let parent = stack.last().copied().unwrap_or(DOCUMENT_NODE);
            match event {
                XmlEvent::StartElement(start) => {
                    let id = doc.append_parsed(parent, &start);
                    stack.push(id);
                }
                XmlEvent::EmptyElement(start) => {
                    doc.append_parsed(parent, &start);
                }
                XmlEvent::EndElement(name) => {
                    while stack.len() > 1 {
                        let Some(top) = stack.pop() else { break };
                        if doc.name(top) == name {
                            break;
                        }
                    }
                }
                XmlEvent::Text(text) => {
                    if !text.trim().is_empty() {
                        doc.append_text(parent, &text);
                    }
                }
                XmlEvent::CData(data) => {
                    doc.append_node(parent, XmlNode::cdata(data));
                }
                XmlEvent::Comment(comment) => {
                    doc.append_node(parent, XmlNode::comment(comment));
                }
                XmlEvent::ProcessingInstruction { target, data } => {
                    let target_id = doc.names.intern(target);
                    doc.append_node(parent, XmlNode::processing_instruction(target_id, data));
                }
                XmlEvent::XmlDeclaration(_) | XmlEvent::DocType(_) => {}
            }
        }

        Ok(doc)
    }

    fn append_parsed(&mut self, parent: NodeId, start: &StartElement<'_>) -> NodeId {
        let id = self.append_element(parent, start.name);
        for attr in &start.attributes {
            let name_id = self.names.intern(attr.name);
            self.nodes[id as usize].attributes.push(XmlAttribute {
                name_id,
                value: attr.value.to_string(),
            });
        }
        id
    }

    // ========================================================================
    // Read access
    // ========================================================================

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&XmlNode> {
        self.nodes.get(id as usize)
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    #[inline]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(XmlNode::is_element)
    }

    pub fn names(&self) -> &NamePool {
        &self.names
    }

    /// First element child of the document node
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(DOCUMENT_NODE).find(|&c| self.is_element(c))
    }

    /// Qualified name of an element or PI target, empty otherwise
    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).map(|n| self.names.get(n.name_id)).unwrap_or("")
    }

    /// Name without its prefix
    pub fn local_name(&self, id: NodeId) -> &str {
        split_qname(self.name(id)).1
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    #[inline]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.next_sibling)
    }

    #[inline]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.prev_sibling)
    }

    /// Direct children in document order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).and_then(|n| n.first_child),
        }
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(move |&c| self.is_element(c))
    }

    /// Element children with the given qualified name
    pub fn named_children<'a>(&'a self, id: NodeId, name: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.element_children(id).filter(move |&c| self.name(c) == name)
    }

    /// All nodes below `id` in document order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            root: id,
            next: self.node(id).and_then(|n| n.first_child),
        }
    }

    /// Attributes of an element as (name, value) pairs
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.node(id)
            .map(|n| n.attributes.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|a| (self.names.get(a.name_id), a.value.as_str()))
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let name_id = self.names.lookup(name)?;
        self.node(id)?
            .attributes
            .iter()
            .find(|a| a.name_id == name_id)
            .map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Raw character data of a text, CDATA, comment or PI node
    pub fn content(&self, id: NodeId) -> &str {
        self.node(id).map(|n| n.content.as_str()).unwrap_or("")
    }

    /// Text value of a node: its own content for character data, the
    /// concatenated text and CDATA children for an element
    pub fn text(&self, id: NodeId) -> String {
        match self.node(id) {
            Some(n) if n.is_character_data() => n.content.clone(),
            Some(_) => self
                .children(id)
                .filter_map(|c| self.node(c))
                .filter(|n| n.is_character_data())
                .map(|n| n.content.as_str())
                .collect(),
            None => String::new(),
        }
    }

    /// Namespace URI bound to `prefix` in scope at `id` (`None` prefix is the
    /// default namespace)
    pub fn lookup_namespace(&self, id: NodeId, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some(ns::XML);
        }
        let attr = declaration_attribute(prefix);
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(uri) = self.attribute(node, &attr) {
                return (!uri.is_empty()).then_some(uri);
            }
            current = self.parent(node);
        }
        None
    }

    /// Namespace URI of an element, from its own prefix
    pub fn namespace_uri(&self, id: NodeId) -> Option<&str> {
        let (prefix, _) = split_qname(self.name(id));
        self.lookup_namespace(id, prefix)
    }

    /// Every `xmlns:prefix` declaration in document order
    pub fn namespace_declarations(&self) -> Vec<(String, String)> {
        let mut found = Vec::new();
        for id in self.descendants(DOCUMENT_NODE) {
            for (name, value) in self.attributes(id) {
                if let Some(prefix) = name.strip_prefix("xmlns:") {
                    found.push((prefix.to_string(), value.to_string()));
                }
            }
        }
        found
    }

    /// 1-based position among same-named element siblings, and whether any
    /// such sibling exists
    pub fn sibling_position(&self, id: NodeId) -> (usize, bool) {
        let Some(node) = self.node(id) else {
            return (1, false);
        };
        let name_id = node.name_id;
        let same = |n: NodeId| self.node(n).is_some_and(|s| s.is_element() && s.name_id == name_id);

        let mut position = 1;
        let mut cursor = node.prev_sibling;
        while let Some(prev) = cursor {
            if same(prev) {
                position += 1;
            }
            cursor = self.prev_sibling(prev);
        }

        let mut has_later = false;
        let mut cursor = node.next_sibling;
        while let Some(next) = cursor {
            if same(next) {
                has_later = true;
                break;
            }
            cursor = self.next_sibling(next);
        }

        (position, position > 1 || has_later)
    }

    /// Canonical absolute path of a node, e.g. `/plane/wings/wing[2]`.
    ///
    /// A positional index is added only where same-named siblings exist.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut steps = Vec::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else { break };
            match node.kind {
                NodeKind::Document => break,
                NodeKind::Element => {
                    let (position, indexed) = self.sibling_position(node_id);
                    let name = self.names.get(node.name_id);
                    steps.push(if indexed {
                        format!("{name}[{position}]")
                    } else {
                        name.to_string()
                    });
                }
                NodeKind::Text | NodeKind::CData => steps.push("text()".to_string()),
                NodeKind::Comment => steps.push("comment()".to_string()),
                NodeKind::ProcessingInstruction => {
                    steps.push("processing-instruction()".to_string())
                }
            }
            current = node.parent;
        }

        if steps.is_empty() {
            return "/".to_string();
        }
        steps.reverse();
        let mut path = String::new();
        for step in steps {
            path.push('/');
            path.push_str(&step);
        }
        path
    }

    /// Number of slots in the arena, including released ones
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of slots holding nodes
    pub fn live_len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    fn push(&mut self, node: XmlNode) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id as usize] = node;
            return id;
        }
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    /// Link a detached node as the last child of `parent`
    fn append_node(&mut self, parent: NodeId, node: XmlNode) -> NodeId {
        let id = self.push(node);
        self.link_last(parent, id);
        id
    }

    fn link_last(&mut self, parent: NodeId, id: NodeId) {
        let last = self.nodes[parent as usize].last_child;
        {
            let child = &mut self.nodes[id as usize];
            child.parent = Some(parent);
            child.prev_sibling = last;
            child.next_sibling = None;
        }
        match last {
            Some(last) => self.nodes[last as usize].next_sibling = Some(id),
            None => self.nodes[parent as usize].first_child = Some(id),
        }
        self.nodes[parent as usize].last_child = Some(id);
    }

    fn link_before(&mut self, reference: NodeId, id: NodeId) {
        let (parent, prev) = {
            let r = &self.nodes[reference as usize];
            (r.parent, r.prev_sibling)
        };
        {
            let child = &mut self.nodes[id as usize];
            child.parent = parent;
            child.prev_sibling = prev;
            child.next_sibling = Some(reference);
        }
        self.nodes[reference as usize].prev_sibling = Some(id);
        match prev {
            Some(prev) => self.nodes[prev as usize].next_sibling = Some(id),
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent as usize].first_child = Some(id);
                }
            }
        }
    }

    /// Append a new element as last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        let name_id = self.names.intern(name);
        self.append_node(parent, XmlNode::element(name_id))
    }

    /// Insert a new element before the `index`-th (1-based) element child of
    /// `parent`. An index below 1 or past the last element child appends.
    pub fn insert_element_at(&mut self, parent: NodeId, name: &str, index: i64) -> NodeId {
        let reference = usize::try_from(index)
            .ok()
            .filter(|&i| i >= 1)
            .and_then(|i| self.element_children(parent).nth(i - 1));

        let name_id = self.names.intern(name);
        let id = self.push(XmlNode::element(name_id));
        match reference {
            Some(reference) => self.link_before(reference, id),
            None => self.link_last(parent, id),
        }
        id
    }

    /// Append a text node
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append_node(parent, XmlNode::text(text))
    }

    /// Replace the character data of an element, keeping element children.
    ///
    /// The first text child is reused so the text keeps its place among
    /// mixed content; an empty value leaves no text node behind.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let text_children: Vec<NodeId> = self
            .children(id)
            .filter(|&c| self.node(c).is_some_and(XmlNode::is_character_data))
            .collect();

        match text_children.split_first() {
            Some((&first, rest)) if !text.is_empty() => {
                let node = &mut self.nodes[first as usize];
                node.kind = NodeKind::Text;
                node.content = text.to_string();
                for &extra in rest {
                    self.remove(extra);
                }
            }
            _ => {
                for &child in &text_children {
                    self.remove(child);
                }
                if !text.is_empty() {
                    self.append_text(id, text);
                }
            }
        }
    }

    /// Set or replace an attribute, keeping its position when it exists
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let name_id = self.names.intern(name);
        let Some(node) = self.nodes.get_mut(id as usize) else {
            return;
        };
        match node.attributes.iter_mut().find(|a| a.name_id == name_id) {
            Some(attr) => attr.value = value.to_string(),
            None => node.attributes.push(XmlAttribute {
                name_id,
                value: value.to_string(),
            }),
        }
    }

    /// Remove an attribute, returning whether it existed
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let Some(name_id) = self.names.lookup(name) else {
            return false;
        };
        let Some(node) = self.nodes.get_mut(id as usize) else {
            return false;
        };
        let before = node.attributes.len();
        node.attributes.retain(|a| a.name_id != name_id);
        node.attributes.len() != before
    }

    pub fn rename(&mut self, id: NodeId, name: &str) {
        let name_id = self.names.intern(name);
        if let Some(node) = self.nodes.get_mut(id as usize) {
            node.name_id = name_id;
        }
    }

    /// Whether `ancestor` lies on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Exchange the positions of two linked nodes, subtrees included.
    ///
    /// Returns false, leaving the tree untouched, when either node is
    /// unlinked or one contains the other.
    pub fn swap(&mut self, a: NodeId, b: NodeId) -> bool {
        let linked = |id: NodeId| id != DOCUMENT_NODE && self.parent(id).is_some();
        if !linked(a) || !linked(b) || self.is_ancestor(a, b) || self.is_ancestor(b, a) {
            return false;
        }
        if a == b {
            return true;
        }

        // a marker keeps a's old place while a moves next to b
        let marker = self.push(XmlNode::released());
        self.link_before(a, marker);
        self.unlink(a);
        self.link_before(b, a);
        self.unlink(b);
        self.link_before(marker, b);
        self.unlink(marker);
        self.nodes[marker as usize] = XmlNode::released();
        self.free.push(marker);
        true
    }

    /// Detach a node from its parent and siblings, keeping its subtree
    fn unlink(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id as usize];
            (node.parent, node.prev_sibling, node.next_sibling)
        };

        match prev {
            Some(prev) => self.nodes[prev as usize].next_sibling = next,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent as usize].first_child = next;
                }
            }
        }
        match next {
            Some(next) => self.nodes[next as usize].prev_sibling = prev,
            None => {
                if let Some(parent) = parent {
                    self.nodes[parent as usize].last_child = prev;
                }
            }
        }

        let node = &mut self.nodes[id as usize];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Unlink a node from its parent and release the slots of its whole
    /// subtree. The document node and nodes already removed are ignored.
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id as usize) else {
            return;
        };
        if id == DOCUMENT_NODE || node.parent.is_none() {
            return;
        }
        self.unlink(id);

        let released: Vec<NodeId> = std::iter::once(id).chain(self.descendants(id)).collect();
        for slot in released {
            self.nodes[slot as usize] = XmlNode::released();
            self.free.push(slot);
        }
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.next_sibling(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree, excluding its root
pub struct Descendants<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        let node = self.doc.node(current)?;

        self.next = match node.first_child {
            Some(child) => Some(child),
            None => {
                let mut cursor = current;
                loop {
                    if cursor == self.root {
                        break None;
                    }
                    if let Some(sibling) = self.doc.next_sibling(cursor) {
                        break Some(sibling);
                    }
                    match self.doc.parent(cursor) {
                        Some(parent) if parent != self.root => cursor = parent,
                        _ => break None,
                    }
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLANE: &str = r#"<?xml version="1.0"?>
<plane name="demo">
  <wings>
    <wing uID="w1"><span>10.5</span></wing>
    <wing uID="w2"><span>12</span></wing>
  </wings>
  <!-- note -->
  <fuselage/>
</plane>"#;

    #[test]
    fn test_parse_structure() {
        let doc = Document::parse(PLANE).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(doc.name(root), "plane");
        assert_eq!(doc.attribute(root, "name"), Some("demo"));

        let names: Vec<&str> = doc.element_children(root).map(|c| doc.name(c)).collect();
        assert_eq!(names, ["wings", "fuselage"]);

        let wings = doc.element_children(root).next().unwrap();
        assert_eq!(doc.named_children(wings, "wing").count(), 2);
    }

    #[test]
    fn test_whitespace_text_dropped() {
        let doc = Document::parse("<a>\n  <b> x </b>\n</a>").unwrap();
        let a = doc.root_element().unwrap();
        assert_eq!(doc.children(a).count(), 1);
        let b = doc.element_children(a).next().unwrap();
        assert_eq!(doc.text(b), " x ");
    }

    #[test]
    fn test_descendants_order() {
        let doc = Document::parse("<a><b><c/></b><d/></a>").unwrap();
        let a = doc.root_element().unwrap();
        let names: Vec<&str> = doc.descendants(a).map(|n| doc.name(n)).collect();
        assert_eq!(names, ["b", "c", "d"]);
    }

    #[test]
    fn test_path_of() {
        let doc = Document::parse(PLANE).unwrap();
        let spans: Vec<NodeId> = doc
            .descendants(DOCUMENT_NODE)
            .filter(|&n| doc.name(n) == "span")
            .collect();
        assert_eq!(doc.path_of(spans[0]), "/plane/wings/wing[1]/span");
        assert_eq!(doc.path_of(spans[1]), "/plane/wings/wing[2]/span");
        let root = doc.root_element().unwrap();
        assert_eq!(doc.path_of(root), "/plane");
    }

    #[test]
    fn test_insert_element_at() {
        let mut doc = Document::parse("<r><a/><b/></r>").unwrap();
        let r = doc.root_element().unwrap();
        doc.insert_element_at(r, "first", 1);
        doc.insert_element_at(r, "mid", 3);
        doc.insert_element_at(r, "last", 0);
        doc.insert_element_at(r, "end", 42);
        let names: Vec<&str> = doc.element_children(r).map(|c| doc.name(c)).collect();
        assert_eq!(names, ["first", "a", "mid", "b", "last", "end"]);
    }

    #[test]
    fn test_remove_relinks_siblings() {
        let mut doc = Document::parse("<r><a/><b/><c/></r>").unwrap();
        let r = doc.root_element().unwrap();
        let b = doc.element_children(r).nth(1).unwrap();
        doc.remove(b);
        let names: Vec<&str> = doc.element_children(r).map(|c| doc.name(c)).collect();
        assert_eq!(names, ["a", "c"]);

        let a = doc.element_children(r).next().unwrap();
        let c = doc.element_children(r).nth(1).unwrap();
        doc.remove(a);
        doc.remove(c);
        assert_eq!(doc.children(r).count(), 0);
        assert!(doc.node(r).is_some_and(|n| n.last_child.is_none()));
    }

    #[test]
    fn test_removed_slots_are_reused() {
        let mut doc = Document::parse("<r><a><b>x</b><c/></a></r>").unwrap();
        let r = doc.root_element().unwrap();
        let slots = doc.arena_len();
        let a = doc.element_children(r).next().unwrap();

        doc.remove(a);
        assert_eq!(doc.live_len(), 2);
        doc.remove(a);
        assert_eq!(doc.live_len(), 2);

        for name in ["d", "e", "f", "g"] {
            doc.append_element(r, name);
        }
        assert_eq!(doc.arena_len(), slots);
        let names: Vec<&str> = doc.element_children(r).map(|c| doc.name(c)).collect();
        assert_eq!(names, ["d", "e", "f", "g"]);
        assert_eq!(doc.descendants(r).count(), 4);
    }

    #[test]
    fn test_swap_moves_subtrees() {
        let mut doc = Document::parse("<r><a><x/></a><b/><c><d/></c></r>").unwrap();
        let r = doc.root_element().unwrap();
        let kids: Vec<NodeId> = doc.element_children(r).collect();
        let (a, b, c) = (kids[0], kids[1], kids[2]);
        let d = doc.element_children(c).next().unwrap();

        assert!(doc.swap(a, b));
        let names: Vec<&str> = doc.element_children(r).map(|n| doc.name(n)).collect();
        assert_eq!(names, ["b", "a", "c"]);
        let slots = doc.arena_len();

        assert!(doc.swap(a, d));
        assert_eq!(doc.path_of(d), "/r/d");
        assert_eq!(doc.path_of(a), "/r/c/a");
        assert_eq!(doc.element_children(a).count(), 1);
        assert_eq!(doc.arena_len(), slots);

        assert!(!doc.swap(c, a));
        assert!(!doc.swap(r, DOCUMENT_NODE));
        assert!(doc.is_ancestor(r, a));
    }

    #[test]
    fn test_set_text_keeps_elements() {
        let mut doc = Document::parse("<r>old<k/>tail</r>").unwrap();
        let r = doc.root_element().unwrap();
        doc.set_text(r, "new");
        assert_eq!(doc.text(r), "new");
        assert_eq!(doc.element_children(r).count(), 1);

        doc.set_text(r, "");
        assert_eq!(doc.children(r).count(), 1);
    }

    #[test]
    fn test_attributes() {
        let mut doc = Document::with_root("r");
        let r = doc.root_element().unwrap();
        doc.set_attribute(r, "a", "1");
        doc.set_attribute(r, "b", "2");
        doc.set_attribute(r, "a", "3");
        let attrs: Vec<(&str, &str)> = doc.attributes(r).collect();
        assert_eq!(attrs, [("a", "3"), ("b", "2")]);
        assert!(doc.remove_attribute(r, "a"));
        assert!(!doc.remove_attribute(r, "a"));
        assert!(!doc.remove_attribute(r, "never"));
    }

    #[test]
    fn test_namespaces() {
        let doc = Document::parse(
            r#"<c:root xmlns:c="urn:cpacs" xmlns="urn:default"><c:wing/><plain/></c:root>"#,
        )
        .unwrap();
        let root = doc.root_element().unwrap();
        let wing = doc.element_children(root).next().unwrap();
        let plain = doc.element_children(root).nth(1).unwrap();
        assert_eq!(doc.namespace_uri(wing), Some("urn:cpacs"));
        assert_eq!(doc.namespace_uri(plain), Some("urn:default"));
        assert_eq!(doc.local_name(wing), "wing");
        assert_eq!(
            doc.namespace_declarations(),
            vec![("c".to_string(), "urn:cpacs".to_string())]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(Document::parse("<a><b></a>").is_err());
        assert!(Document::parse_with("<a><b></a>", false).is_ok());
    }
}
