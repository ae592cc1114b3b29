//! XML Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references. Nodes are
//! doubly linked to their siblings so insertion and removal never shift
//! other ids.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

impl NodeKind {
    /// DOM node type constant name, e.g. `ELEMENT_NODE`
    pub fn dom_name(self) -> &'static str {
        match self {
            NodeKind::Document => "DOCUMENT_NODE",
            NodeKind::Element => "ELEMENT_NODE",
            NodeKind::Text => "TEXT_NODE",
            NodeKind::CData => "CDATA_SECTION_NODE",
            NodeKind::Comment => "COMMENT_NODE",
            NodeKind::ProcessingInstruction => "PROCESSING_INSTRUCTION_NODE",
        }
    }
}

/// Attribute stored inline on its element
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    /// Index into the name pool
    pub name_id: u32,
    pub value: String,
}

/// An XML node in the arena
#[derive(Debug, Clone)]
pub struct XmlNode {
    pub kind: NodeKind,
    /// Parent node (None for the document node and detached nodes)
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    /// Name pool index for element names and PI targets, 0 otherwise
    pub name_id: u32,
    /// Character data of text, CDATA, comment and PI nodes
    pub content: String,
    /// Element attributes in document order
    pub attributes: Vec<XmlAttribute>,
}

impl XmlNode {
    fn blank(kind: NodeKind, name_id: u32, content: String) -> Self {
        XmlNode {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name_id,
            content,
            attributes: Vec::new(),
        }
    }

    pub fn document() -> Self {
        Self::blank(NodeKind::Document, 0, String::new())
    }

    pub fn element(name_id: u32) -> Self {
        Self::blank(NodeKind::Element, name_id, String::new())
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::blank(NodeKind::Text, 0, content.into())
    }

    pub fn cdata(content: impl Into<String>) -> Self {
        Self::blank(NodeKind::CData, 0, content.into())
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Self::blank(NodeKind::Comment, 0, content.into())
    }

    pub fn processing_instruction(target_id: u32, data: impl Into<String>) -> Self {
        Self::blank(NodeKind::ProcessingInstruction, target_id, data.into())
    }

    /// Placeholder left in a slot on the free list
    pub fn released() -> Self {
        Self::blank(NodeKind::Text, 0, String::new())
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Text or CDATA
    #[inline]
    pub fn is_character_data(&self) -> bool {
        matches!(self.kind, NodeKind::Text | NodeKind::CData)
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}
