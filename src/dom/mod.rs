//! DOM Module - Arena-based mutable XML Document
//!
//! Implements the tree every session owns:
//! - Arena allocation for nodes
//! - NodeId (u32) indices with sibling links for cheap insert and remove
//! - String interning for element/attribute names
//! - Namespace prefix table for prefixed path steps
//! - Serializer with optional pretty printing

pub mod document;
pub mod namespace;
pub mod node;
pub mod strings;
pub mod writer;

pub use document::{Document, DOCUMENT_NODE};
pub use namespace::NamespaceTable;
pub use node::{NodeId, NodeKind, XmlAttribute, XmlNode};
pub use strings::NamePool;
pub use writer::{write_document, write_subtree};
