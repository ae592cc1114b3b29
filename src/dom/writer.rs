//! Document serialization
//!
//! Pretty printing indents element-only content by two spaces. Elements
//! holding text or CDATA are written inline, and so is everything below
//! them, so character data never gains whitespace it did not have.

use super::document::{Document, DOCUMENT_NODE};
use super::node::{NodeId, NodeKind};
use crate::core::entities::{escape_attribute, escape_text};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Indentation stops growing past this depth, keeping pretty output
/// linear in the size of deeply nested documents
pub const MAX_INDENT_DEPTH: usize = 32;

/// Serialize the whole document with an XML declaration
pub fn write_document(doc: &Document, pretty: bool) -> String {
    let mut out = String::with_capacity(doc.live_len() * 32);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    for child in doc.children(DOCUMENT_NODE) {
        write_node(doc, child, pretty, &mut out);
        out.push('\n');
    }
    out
}

/// Serialize a single subtree without declaration
pub fn write_subtree(doc: &Document, id: NodeId, pretty: bool) -> String {
    let mut out = String::new();
    write_node(doc, id, pretty, &mut out);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth.min(MAX_INDENT_DEPTH) {
        out.push_str("  ");
    }
}

/// Pending work of the serializer
enum Frame {
    /// Write a node; `indented` puts it on its own line first
    Open {
        id: NodeId,
        depth: usize,
        pretty: bool,
        indented: bool,
    },
    /// Close an element opened earlier
    Close { id: NodeId, depth: usize, block: bool },
}

/// Serialize `root` with an explicit stack so nesting depth is bounded
/// only by memory
fn write_node(doc: &Document, root: NodeId, pretty: bool, out: &mut String) {
    let mut stack = vec![Frame::Open {
        id: root,
        depth: 0,
        pretty,
        indented: false,
    }];

    while let Some(frame) = stack.pop() {
        let (id, depth, pretty) = match frame {
            Frame::Close { id, depth, block } => {
                if block {
                    out.push('\n');
                    indent(out, depth);
                }
                out.push_str("</");
                out.push_str(doc.name(id));
                out.push('>');
                continue;
            }
            Frame::Open {
                id,
                depth,
                pretty,
                indented,
            } => {
                if indented {
                    out.push('\n');
                    indent(out, depth);
                }
                (id, depth, pretty)
            }
        };
        let Some(node) = doc.node(id) else {
            continue;
        };

        match node.kind {
            NodeKind::Element => {
                out.push('<');
                out.push_str(doc.name(id));
                for (attr, value) in doc.attributes(id) {
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }

                if !node.has_children() {
                    out.push_str("/>");
                    continue;
                }
                out.push('>');

                let block = pretty
                    && doc
                        .children(id)
                        .all(|c| doc.node(c).is_some_and(|n| !n.is_character_data()));
                stack.push(Frame::Close { id, depth, block });
                let children: Vec<NodeId> = doc.children(id).collect();
                stack.extend(children.into_iter().rev().map(|child| Frame::Open {
                    id: child,
                    depth: depth + 1,
                    pretty: block,
                    indented: block,
                }));
            }
            NodeKind::Text => out.push_str(&escape_text(&node.content)),
            NodeKind::CData => {
                out.push_str("<![CDATA[");
                out.push_str(&node.content);
                out.push_str("]]>");
            }
            NodeKind::Comment => {
                out.push_str("<!--");
                out.push_str(&node.content);
                out.push_str("-->");
            }
            NodeKind::ProcessingInstruction => {
                out.push_str("<?");
                out.push_str(doc.name(id));
                if !node.content.is_empty() {
                    out.push(' ');
                    out.push_str(&node.content);
                }
                out.push_str("?>");
            }
            NodeKind::Document => {
                let children: Vec<NodeId> = doc.children(id).collect();
                stack.extend(children.into_iter().rev().map(|child| Frame::Open {
                    id: child,
                    depth,
                    pretty,
                    indented: false,
                }));
            }
        }
    }
}
