//! Document session
//!
//! A session owns one tree plus its flags. All typed engines are
//! implemented as methods on [`Session`] in the `access` modules; this file
//! holds lifecycle state and path resolution.

use super::handle::Handle;
use crate::config::Config;
use crate::dom::{write_document, Document, NamespaceTable, NodeId, DOCUMENT_NODE};
use crate::error::{Error, Result};
use crate::path::{self, PathCache, Target};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Freshly created, opened or imported
    Open,
    /// Written out; further mutation is refused
    Saved,
}

/// One open document and its session flags
#[derive(Debug)]
pub struct Session {
    handle: Handle,
    document: Document,
    origin: Option<PathBuf>,
    status: Status,
    pretty_print: bool,
    namespaces: NamespaceTable,
    real_format: Option<String>,
    integer_format: String,
    cache: Arc<PathCache>,
}

impl Session {
    pub(crate) fn new(
        handle: Handle,
        document: Document,
        origin: Option<PathBuf>,
        config: &Config,
        cache: Arc<PathCache>,
    ) -> Self {
        Session {
            handle,
            document,
            origin,
            status: Status::Open,
            pretty_print: config.pretty_print,
            namespaces: NamespaceTable::new(),
            real_format: config.real_format.clone(),
            integer_format: config.integer_format.clone(),
            cache,
        }
    }

    /// Standalone session outside any registry, mostly for codecs and tests
    pub fn detached(document: Document) -> Self {
        let config = Config::default();
        Self::new(
            Handle::INVALID,
            document,
            None,
            &config,
            Arc::new(PathCache::new(config.path_cache_capacity)),
        )
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_saved(&self) -> bool {
        self.status == Status::Saved
    }

    /// File the document was opened from or last saved to
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    pub fn pretty_print(&self) -> bool {
        self.pretty_print
    }

    pub fn set_pretty_print(&mut self, enabled: bool) {
        self.pretty_print = enabled;
    }

    pub fn real_format(&self) -> Option<&str> {
        self.real_format.as_deref()
    }

    pub fn integer_format(&self) -> &str {
        &self.integer_format
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn register_namespace(&mut self, prefix: &str, uri: &str) -> Result<()> {
        self.namespaces.register(prefix, uri)
    }

    /// Bind every `xmlns:` prefix declared in the document
    pub fn register_namespaces_from_document(&mut self) -> Result<usize> {
        self.namespaces.register_from_document(&self.document)
    }

    /// Serialize with the session's pretty-print flag
    pub fn to_text(&self) -> String {
        write_document(&self.document, self.pretty_print)
    }

    pub(crate) fn mark_saved(&mut self, destination: &Path) {
        self.status = Status::Saved;
        self.origin = Some(destination.to_path_buf());
    }

    /// Mutable tree access, refused once the session was saved
    pub(crate) fn document_mut(&mut self) -> Result<&mut Document> {
        self.ensure_writable()?;
        Ok(&mut self.document)
    }

    pub(crate) fn ensure_writable(&self) -> Result<()> {
        match self.status {
            Status::Open => Ok(()),
            Status::Saved => Err(Error::AlreadySaved(self.handle)),
        }
    }

    // ========================================================================
    // Path resolution
    // ========================================================================

    /// All nodes and attributes selected by `path`
    pub fn resolve(&self, path: &str) -> Result<Vec<Target>> {
        let compiled = self.cache.compile(path)?;
        Ok(path::evaluate(&self.document, &self.namespaces, &compiled))
    }

    /// The single node selected by `path`, `None` when nothing matches
    pub fn resolve_single(&self, path: &str) -> Result<Option<Target>> {
        let targets = self.resolve(path)?;
        match targets.as_slice() {
            [] => Ok(None),
            [one] => Ok(Some(*one)),
            many => Err(Error::ElementPathNotUnique {
                path: path.to_string(),
                count: many.len(),
            }),
        }
    }

    /// The single element selected by `path`
    pub fn resolve_element(&self, path: &str) -> Result<NodeId> {
        let path = path::trim_trailing_slash(path);
        match self.resolve_single(path)? {
            None => Err(Error::ElementNotFound(path.to_string())),
            Some(Target::Node(id)) if self.document.is_element(id) => Ok(id),
            Some(_) => Err(Error::NotAnElement(path.to_string())),
        }
    }

    /// Element or, for an empty path, the document node
    pub(crate) fn resolve_parent(&self, parent: &str) -> Result<NodeId> {
        if parent.is_empty() {
            Ok(DOCUMENT_NODE)
        } else {
            self.resolve_element(parent)
        }
    }

    /// Number of nodes matching `path`
    pub fn count(&self, path: &str) -> Result<usize> {
        Ok(self.resolve(path)?.len())
    }

    /// The `index`-th (1-based) match of `path`
    fn nth_match(&self, path: &str, index: usize) -> Result<Target> {
        let targets = self.resolve(path)?;
        index
            .checked_sub(1)
            .and_then(|i| targets.get(i).copied())
            .ok_or_else(|| Error::IndexOutOfRange {
                path: path.to_string(),
                index: index as i64,
            })
    }

    /// Canonical path of the `index`-th (1-based) match of `path`
    pub fn path_of_match(&self, path: &str, index: usize) -> Result<String> {
        Ok(self.location_of(self.nth_match(path, index)?))
    }

    /// Text of the `index`-th (1-based) match of `path`: element text,
    /// attribute value or character data
    pub fn text_of_match(&self, path: &str, index: usize) -> Result<String> {
        Ok(self.target_text(self.nth_match(path, index)?))
    }

    /// Canonical paths of every match, in document order
    pub fn resolve_paths(&self, path: &str) -> Result<Vec<String>> {
        Ok(self
            .resolve(path)?
            .into_iter()
            .map(|target| self.location_of(target))
            .collect())
    }

    /// Canonical path of a node or `element/@name` for an attribute
    pub fn location_of(&self, target: Target) -> String {
        match target {
            Target::Node(id) => self.document.path_of(id),
            Target::Attribute(id, i) => {
                let name = self
                    .document
                    .node(id)
                    .and_then(|n| n.attributes.get(i))
                    .map(|a| self.document.names().get(a.name_id))
                    .unwrap_or("");
                format!("{}/@{name}", self.document.path_of(id))
            }
        }
    }

    /// Count matches of many paths at once using Rayon
    pub fn count_parallel(&self, paths: &[&str]) -> Vec<Result<usize>> {
        path::count_parallel(&self.document, &self.namespaces, &self.cache, paths)
    }

    /// Text of a selected node: attribute value, element text or
    /// character data
    pub(crate) fn target_text(&self, target: Target) -> String {
        match target {
            Target::Node(id) => self.document.text(id),
            Target::Attribute(id, i) => self
                .document
                .node(id)
                .and_then(|n| n.attributes.get(i))
                .map(|a| a.value.clone())
                .unwrap_or_default(),
        }
    }
}
