//! Scalar access engine
//!
//! Typed get and upsert of element text and attribute values, plus the
//! structural helpers built on the same resolution rules:
//!
//! - reads require exactly one match (`ElementNotFound`, `ElementPathNotUnique`)
//! - writes update in place when the target exists, otherwise the path is
//!   split into (parent, step) and a new element is created under the
//!   parent, directly after any same-named siblings
//! - ancestors are only created by [`Session::ensure_ancestors_exist`]
//! - namespace-qualified creation declares `xmlns` on the new element only
//!   when the binding is not already in scope

use super::value::{Scalar, ValueKind};
use crate::core::names::{is_valid_qname, split_qname};
use crate::dom::namespace::{check_binding, declaration_attribute};
use crate::dom::{Document, NodeId, NodeKind, DOCUMENT_NODE};
use crate::error::{Error, Result};
use crate::path::{self, Target};
use crate::session::Session;
use tracing::debug;

pub(crate) fn check_attribute_name(name: &str) -> Result<()> {
    if name.is_empty() {
        Err(Error::NoAttributeName)
    } else if !is_valid_qname(name) {
        Err(Error::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

pub(crate) fn check_element_name(name: &str) -> Result<()> {
    if name.is_empty() {
        Err(Error::NoElementName)
    } else if !is_valid_qname(name) {
        Err(Error::InvalidName(name.to_string()))
    } else {
        Ok(())
    }
}

impl Session {
    /// Encode a value with an explicit format or the session default for
    /// its kind
    pub(crate) fn render<T: Scalar>(&self, value: &T, format: Option<&str>) -> Result<String> {
        let format = format.or(match value.kind() {
            ValueKind::Integer => Some(self.integer_format()),
            ValueKind::Real => self.real_format(),
            ValueKind::Text | ValueKind::Boolean => None,
        });
        value.to_text(format)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Typed value of the node selected by `path`.
    ///
    /// Elements yield their text, attribute steps their value.
    pub fn get_element<T: Scalar>(&self, path: &str) -> Result<T> {
        let path = path::trim_trailing_slash(path);
        let target = self
            .resolve_single(path)?
            .ok_or_else(|| Error::ElementNotFound(path.to_string()))?;
        T::from_text(path, &self.target_text(target))
    }

    pub fn get_text(&self, path: &str) -> Result<String> {
        self.get_element(path)
    }

    /// Typed value of attribute `name` on the element at `path`
    pub fn get_attribute<T: Scalar>(&self, path: &str, name: &str) -> Result<T> {
        if name.is_empty() {
            return Err(Error::NoAttributeName);
        }
        let id = self.resolve_element(path)?;
        let value = self
            .document()
            .attribute(id, name)
            .ok_or_else(|| Error::AttributeNotFound {
                path: path.to_string(),
                name: name.to_string(),
            })?;
        T::from_text(path, value)
    }

    /// Whether `path` selects exactly one element
    pub fn check_element(&self, path: &str) -> Result<bool> {
        let path = path::trim_trailing_slash(path);
        match self.resolve_single(path)? {
            None => Ok(false),
            Some(Target::Node(id)) if self.document().is_element(id) => Ok(true),
            Some(_) => Err(Error::NotAnElement(path.to_string())),
        }
    }

    pub fn check_attribute(&self, path: &str, name: &str) -> Result<bool> {
        if name.is_empty() {
            return Err(Error::NoAttributeName);
        }
        let id = self.resolve_element(path)?;
        Ok(self.document().has_attribute(id, name))
    }

    /// Number of `name` children below the element at `path`; zero when
    /// there are none
    pub fn named_children_count(&self, path: &str, name: &str) -> Result<usize> {
        if name.is_empty() {
            return Err(Error::NoElementName);
        }
        let id = self.resolve_element(path)?;
        Ok(self.document().named_children(id, name).count())
    }

    /// Number of child nodes of any kind
    pub fn child_count(&self, path: &str) -> Result<usize> {
        let id = self.resolve_element(path)?;
        Ok(self.document().children(id).count())
    }

    /// Name of the `index`-th (1-based) child node. Character data and
    /// comments report `#text`, `#cdata-section` and `#comment`.
    pub fn child_name(&self, path: &str, index: usize) -> Result<String> {
        let id = self.resolve_element(path)?;
        let doc = self.document();
        let child = index
            .checked_sub(1)
            .and_then(|i| doc.children(id).nth(i))
            .ok_or_else(|| Error::IndexOutOfRange {
                path: path.to_string(),
                index: index as i64,
            })?;
        Ok(match doc.kind(child) {
            Some(NodeKind::Text) => "#text".to_string(),
            Some(NodeKind::CData) => "#cdata-section".to_string(),
            Some(NodeKind::Comment) => "#comment".to_string(),
            _ => doc.name(child).to_string(),
        })
    }

    /// Attribute names in document order
    pub fn attribute_names(&self, path: &str) -> Result<Vec<String>> {
        let id = self.resolve_element(path)?;
        Ok(self
            .document()
            .attributes(id)
            .map(|(name, _)| name.to_string())
            .collect())
    }

    // ========================================================================
    // Upserts
    // ========================================================================

    /// Store `value` at `path`, updating the node when it exists and creating
    /// it under an existing parent otherwise
    pub fn save_element<T: Scalar>(&mut self, path: &str, value: &T, format: Option<&str>) -> Result<()> {
        self.ensure_writable()?;
        let path = path::trim_trailing_slash(path);
        let text = self.render(value, format)?;

        match self.resolve_single(path)? {
            Some(Target::Node(id)) if self.document().is_element(id) => {
                self.document_mut()?.set_text(id, &text);
            }
            Some(Target::Attribute(id, index)) => {
                let name = self
                    .document()
                    .attributes(id)
                    .nth(index)
                    .map(|(name, _)| name.to_string())
                    .ok_or_else(|| Error::invalid_path(path, "attribute vanished"))?;
                self.document_mut()?.set_attribute(id, &name, &text);
            }
            Some(Target::Node(_)) => return Err(Error::NotAnElement(path.to_string())),
            None if path::split(path).1.starts_with('@') => {
                let (parent, step) = path::split(path);
                let name = &step[1..];
                check_attribute_name(name)?;
                let id = self.resolve_element(parent)?;
                self.document_mut()?.set_attribute(id, name, &text);
            }
            None => {
                let id = self.create_node(path).map_err(|e| match e {
                    Error::ElementNotFound(_)
                    | Error::ElementPathNotUnique { .. }
                    | Error::NotAnElement(_)
                    | Error::Failed(_) => Error::failed_at(path, &e),
                    other => other,
                })?;
                self.document_mut()?.set_text(id, &text);
            }
        }
        Ok(())
    }

    /// Store `value` in attribute `name` of the element at `path`
    pub fn save_attribute<T: Scalar>(
        &mut self,
        path: &str,
        name: &str,
        value: &T,
        format: Option<&str>,
    ) -> Result<()> {
        self.ensure_writable()?;
        check_attribute_name(name)?;
        let text = self.render(value, format)?;
        let id = self.resolve_element(path)?;
        self.document_mut()?.set_attribute(id, name, &text);
        Ok(())
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Create the element named by the last step of `path` under its
    /// existing parent and return it.
    ///
    /// `name[n]` is accepted when at most `n - 1` such siblings exist.
    pub(crate) fn create_node(&mut self, path: &str) -> Result<NodeId> {
        self.ensure_writable()?;
        let path = path::trim_trailing_slash(path);
        let (parent_path, step) = path::split(path);
        let (name, index) = path::creatable_step(path, step)?;
        let parent = self.resolve_parent(parent_path)?;

        let doc = self.document();
        if parent == DOCUMENT_NODE && doc.root_element().is_some() {
            return Err(Error::Failed(format!(
                "`{path}` would add a second root element"
            )));
        }

        let siblings = doc.named_children(parent, &name).count();
        if let Some(n) = index {
            if n > siblings + 1 {
                return Err(Error::IndexOutOfRange {
                    path: path.to_string(),
                    index: n as i64,
                });
            }
        }

        // 1-based element position just past the last same-named sibling
        let insert_at = doc
            .element_children(parent)
            .enumerate()
            .filter(|&(_, c)| doc.name(c) == name)
            .last()
            .map(|(i, _)| i as i64 + 2)
            .unwrap_or(0);

        let id = self.document_mut()?.insert_element_at(parent, &name, insert_at);
        debug!(handle = self.handle().raw(), path, "element created");
        Ok(id)
    }

    /// Create the element named by the last step of `path`
    pub fn create_element(&mut self, path: &str) -> Result<()> {
        self.create_node(path).map(|_| ())
    }

    fn insert_child(&mut self, parent: &str, name: &str, index: i64) -> Result<NodeId> {
        self.ensure_writable()?;
        check_element_name(name)?;
        let parent_id = self.resolve_parent(parent)?;
        if parent_id == DOCUMENT_NODE && self.document().root_element().is_some() {
            return Err(Error::Failed(format!("`{name}` would add a second root element")));
        }
        Ok(self.document_mut()?.insert_element_at(parent_id, name, index))
    }

    /// Insert element `name` before the `index`-th element child of
    /// `parent`; an index below 1 or past the end appends
    pub fn create_element_at(&mut self, parent: &str, name: &str, index: i64) -> Result<()> {
        self.insert_child(parent, name, index).map(|_| ())
    }

    /// Create `path` unless it exists; returns whether it was created
    pub fn create_element_if_not_exists(&mut self, path: &str) -> Result<bool> {
        if self.check_element(path)? {
            return Ok(false);
        }
        self.create_node(path)?;
        Ok(true)
    }

    /// Create every missing element along `path`, root first, the final
    /// step included. Idempotent.
    pub fn ensure_ancestors_exist(&mut self, path: &str) -> Result<()> {
        self.ensure_writable()?;
        let mut created = 0usize;
        for prefix in path::prefix_chain(path) {
            if !self.check_element(prefix)? {
                self.create_node(prefix)?;
                created += 1;
            }
        }
        if created > 0 {
            debug!(handle = self.handle().raw(), path, created, "ancestors created");
        }
        Ok(())
    }

    /// Remove the element at `path` and its subtree
    pub fn remove_element(&mut self, path: &str) -> Result<()> {
        self.ensure_writable()?;
        let id = self.resolve_element(path)?;
        self.document_mut()?.remove(id);
        Ok(())
    }

    pub fn remove_attribute(&mut self, path: &str, name: &str) -> Result<()> {
        self.ensure_writable()?;
        if name.is_empty() {
            return Err(Error::NoAttributeName);
        }
        let id = self.resolve_element(path)?;
        if self.document_mut()?.remove_attribute(id, name) {
            Ok(())
        } else {
            Err(Error::AttributeNotFound {
                path: path.to_string(),
                name: name.to_string(),
            })
        }
    }

    pub fn rename_element(&mut self, path: &str, new_name: &str) -> Result<()> {
        self.ensure_writable()?;
        check_element_name(new_name)?;
        let id = self.resolve_element(path)?;
        self.document_mut()?.rename(id, new_name);
        Ok(())
    }

    /// Exchange two elements together with their subtrees. Fails when one
    /// element contains the other.
    pub fn swap_elements(&mut self, first: &str, second: &str) -> Result<()> {
        self.ensure_writable()?;
        let a = self.resolve_element(first)?;
        let b = self.resolve_element(second)?;
        if self.document_mut()?.swap(a, b) {
            Ok(())
        } else {
            Err(Error::Failed(format!("`{first}` and `{second}` are nested")))
        }
    }

    /// DOM node type of the single node `path` selects, e.g. `ELEMENT_NODE`
    /// or `ATTRIBUTE_NODE`
    pub fn node_type(&self, path: &str) -> Result<&'static str> {
        let path = path::trim_trailing_slash(path);
        match self.resolve_single(path)? {
            Some(Target::Attribute(..)) => Ok("ATTRIBUTE_NODE"),
            Some(Target::Node(id)) => self
                .document()
                .kind(id)
                .map(NodeKind::dom_name)
                .ok_or_else(|| Error::ElementNotFound(path.to_string())),
            None => Err(Error::ElementNotFound(path.to_string())),
        }
    }

    // ========================================================================
    // Namespaces
    // ========================================================================

    /// Declare `prefix` on `id` unless `uri` is already bound to it there
    fn bind_namespace(&mut self, id: NodeId, prefix: Option<&str>, uri: &str) -> Result<()> {
        if self.document().lookup_namespace(id, prefix) == Some(uri) {
            return Ok(());
        }
        self.document_mut()?.set_attribute(id, &declaration_attribute(prefix), uri);
        Ok(())
    }

    fn insert_child_ns(&mut self, parent: &str, qname: &str, uri: &str, index: i64) -> Result<NodeId> {
        check_element_name(qname)?;
        let (prefix, _) = split_qname(qname);
        check_binding(prefix, uri)?;
        let id = self.insert_child(parent, qname, index)?;
        self.bind_namespace(id, prefix, uri)?;
        Ok(id)
    }

    /// Append element `qname` in namespace `uri` to `parent`. A prefix in
    /// `qname` is declared for the new subtree, otherwise `uri` becomes its
    /// default namespace.
    pub fn create_element_ns(&mut self, parent: &str, qname: &str, uri: &str) -> Result<()> {
        self.insert_child_ns(parent, qname, uri, 0).map(|_| ())
    }

    /// [`Session::create_element_ns`] before the `index`-th element child
    pub fn create_element_ns_at(&mut self, parent: &str, qname: &str, uri: &str, index: i64) -> Result<()> {
        self.insert_child_ns(parent, qname, uri, index).map(|_| ())
    }

    /// Append element `qname` in namespace `uri` holding `value`. Same-named
    /// siblings are never updated.
    pub fn add_element_ns<T: Scalar>(
        &mut self,
        parent: &str,
        qname: &str,
        uri: &str,
        value: &T,
        format: Option<&str>,
    ) -> Result<()> {
        let text = self.render(value, format)?;
        let id = self.insert_child_ns(parent, qname, uri, 0)?;
        self.document_mut()?.set_text(id, &text);
        Ok(())
    }

    /// Move the element at `path` into namespace `uri`, renaming it to
    /// `prefix:local`, or to its local name for the default namespace
    pub fn set_element_namespace(&mut self, path: &str, uri: &str, prefix: Option<&str>) -> Result<()> {
        self.ensure_writable()?;
        check_binding(prefix, uri)?;
        let id = self.resolve_element(path)?;
        let local = self.document().local_name(id).to_string();
        let name = match prefix {
            Some(p) => format!("{p}:{local}"),
            None => local,
        };
        self.document_mut()?.rename(id, &name);
        self.bind_namespace(id, prefix, uri)
    }

    /// Add an `xmlns:prefix` declaration to the element at `path` without
    /// changing the element's own namespace
    pub fn declare_namespace(&mut self, path: &str, uri: &str, prefix: &str) -> Result<()> {
        self.ensure_writable()?;
        check_binding(Some(prefix), uri)?;
        let id = self.resolve_element(path)?;
        self.document_mut()?.set_attribute(id, &declaration_attribute(Some(prefix)), uri);
        Ok(())
    }

    // ========================================================================
    // Headers
    // ========================================================================

    /// Append a new `header` element to the root and return it
    fn append_header(&mut self) -> Result<NodeId> {
        self.ensure_writable()?;
        let root = self
            .document()
            .root_element()
            .ok_or_else(|| Error::Failed("document has no root element".to_string()))?;
        Ok(self.document_mut()?.append_element(root, HEADER_ELEMENT))
    }

    /// Append a `header` naming the producing tool, its version, the author
    /// and the current local time
    pub fn add_header(&mut self, tool_name: &str, version: &str, author: &str) -> Result<()> {
        let header = self.append_header()?;
        let doc = self.document_mut()?;
        let tool = doc.append_element(header, "tool");
        append_text_element(doc, tool, "toolName", tool_name);
        append_text_element(doc, tool, "version", version);
        append_text_element(doc, header, "author", author);
        append_text_element(doc, header, "timestamp", &timestamp());
        debug!(handle = self.handle().raw(), tool_name, "header added");
        Ok(())
    }

    /// Append a data-set `header`: name, version, cpacsVersion, creator,
    /// description and the current local time
    pub fn add_cpacs_header(
        &mut self,
        name: &str,
        creator: &str,
        version: &str,
        description: &str,
        cpacs_version: &str,
    ) -> Result<()> {
        let header = self.append_header()?;
        let doc = self.document_mut()?;
        append_text_element(doc, header, "name", name);
        append_text_element(doc, header, "version", version);
        append_text_element(doc, header, "cpacsVersion", cpacs_version);
        append_text_element(doc, header, "creator", creator);
        append_text_element(doc, header, "description", description);
        append_text_element(doc, header, "timestamp", &timestamp());
        debug!(handle = self.handle().raw(), name, "data set header added");
        Ok(())
    }
}

/// Name of the element written by the header helpers
pub const HEADER_ELEMENT: &str = "header";

/// Local time as `YYYY-MM-DDThh:mm:ss`
fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Append `<name>text</name>`; empty text leaves an empty element
fn append_text_element(doc: &mut Document, parent: NodeId, name: &str, text: &str) {
    let id = doc.append_element(parent, name);
    doc.set_text(id, text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{write_subtree, Document};
    use pretty_assertions::assert_eq;

    fn session(xml: &str) -> Session {
        Session::detached(Document::parse(xml).unwrap())
    }

    fn compact(s: &Session) -> String {
        let root = s.document().root_element().unwrap();
        write_subtree(s.document(), root, false)
    }

    #[test]
    fn test_typed_reads() {
        let s = session(r#"<a n="3" f="yes"><i>42</i><r>2.5</r><b>True</b><t>hi</t></a>"#);
        assert_eq!(s.get_element::<i32>("/a/i").unwrap(), 42);
        assert_eq!(s.get_element::<f64>("/a/r").unwrap(), 2.5);
        assert!(s.get_element::<bool>("/a/b").unwrap());
        assert_eq!(s.get_text("/a/t").unwrap(), "hi");
        assert_eq!(s.get_attribute::<i64>("/a", "n").unwrap(), 3);
        assert_eq!(s.get_element::<i32>("/a/@n").unwrap(), 3);
        assert!(matches!(s.get_attribute::<bool>("/a", "f"), Err(Error::InvalidValue { .. })));
        assert!(matches!(s.get_element::<i32>("/a/t"), Err(Error::NoNumber { .. })));
    }

    #[test]
    fn test_oversized_format_width_is_rejected() {
        let mut s = session("<a/>");
        assert!(matches!(
            s.save_element("/a/x", &1i64, Some("%99999999999999999999999d")),
            Err(Error::Failed(_))
        ));
        assert!(!s.check_element("/a/x").unwrap());
        s.save_element("/a/x", &1i64, Some("%3d")).unwrap();
        assert_eq!(s.get_text("/a/x").unwrap(), "  1");
    }

    #[test]
    fn test_read_errors() {
        let s = session("<a><b/><b/></a>");
        assert_eq!(s.get_text("/a/c"), Err(Error::ElementNotFound("/a/c".into())));
        assert!(matches!(
            s.get_text("/a/b"),
            Err(Error::ElementPathNotUnique { count: 2, .. })
        ));
        assert_eq!(s.get_attribute::<String>("/a", ""), Err(Error::NoAttributeName));
        assert_eq!(
            s.get_attribute::<String>("/a", "x"),
            Err(Error::AttributeNotFound {
                path: "/a".into(),
                name: "x".into()
            })
        );
    }

    #[test]
    fn test_save_element_updates_in_place() {
        let mut s = session(r#"<a><b k="v">old</b><c/></a>"#);
        s.save_element("/a/b", &"new".to_string(), None).unwrap();
        assert_eq!(compact(&s), r#"<a><b k="v">new</b><c/></a>"#);
    }

    #[test]
    fn test_save_element_creates_after_same_named_siblings() {
        let mut s = session("<a><w>1</w><w>2</w><f/></a>");
        s.save_element("/a/w[3]", &3i32, None).unwrap();
        assert_eq!(compact(&s), "<a><w>1</w><w>2</w><w>3</w><f/></a>");
        s.save_element("/a/x", &true, None).unwrap();
        assert_eq!(compact(&s), "<a><w>1</w><w>2</w><w>3</w><f/><x>true</x></a>");
    }

    #[test]
    fn test_save_element_needs_parent() {
        let mut s = session("<a/>");
        let err = s.save_element("/a/b/c", &1i32, None).unwrap_err();
        assert_eq!(err.code(), 1);
        assert!(err.to_string().contains("/a/b/c"));
        assert_eq!(s.save_element("/a/", &1i32, None), Ok(()));
        assert_eq!(s.get_element::<i32>("/a").unwrap(), 1);
    }

    #[test]
    fn test_save_element_round_trip() {
        let mut s = session("<a/>");
        s.save_element("/a/r", &0.1f64, None).unwrap();
        assert_eq!(s.get_element::<f64>("/a/r").unwrap(), 0.1);
        s.save_element("/a/r", &3.14159f64, Some("%.2f")).unwrap();
        assert_eq!(s.get_text("/a/r").unwrap(), "3.14");
        s.save_element("/a/@u", &7i64, None).unwrap();
        assert_eq!(s.get_attribute::<i64>("/a", "u").unwrap(), 7);
        assert!(s.save_element("/a/@", &7i64, None).is_err());
    }

    #[test]
    fn test_save_attribute() {
        let mut s = session("<a/>");
        s.save_attribute("/a", "x", &1.5f64, None).unwrap();
        s.save_attribute("/a", "flag", &false, None).unwrap();
        assert_eq!(compact(&s), r#"<a x="1.5" flag="false"/>"#);
        s.save_attribute("/a", "x", &2i32, Some("%03d")).unwrap();
        assert_eq!(s.get_attribute::<String>("/a", "x").unwrap(), "002");
        assert_eq!(s.save_attribute("/a", "", &1i32, None), Err(Error::NoAttributeName));
        assert_eq!(
            s.save_attribute("/a", "1x", &1i32, None),
            Err(Error::InvalidName("1x".into()))
        );
        assert!(matches!(
            s.save_attribute("/a/missing", "x", &1i32, None),
            Err(Error::ElementNotFound(_))
        ));
    }

    #[test]
    fn test_existing_attribute_step_is_updated() {
        let mut s = session(r#"<a u="1"/>"#);
        s.save_element("/a/@u", &9i32, None).unwrap();
        assert_eq!(compact(&s), r#"<a u="9"/>"#);
    }

    #[test]
    fn test_checks_and_counts() {
        let s = session(r#"<a x="1" y="2"><w/><w/>t<!--c--><v/></a>"#);
        assert!(s.check_element("/a/v/").unwrap());
        assert!(!s.check_element("/a/z").unwrap());
        assert!(s.check_element("/a/w").is_err());
        assert!(s.check_attribute("/a", "y").unwrap());
        assert!(!s.check_attribute("/a", "z").unwrap());
        assert_eq!(s.named_children_count("/a", "w").unwrap(), 2);
        assert_eq!(s.named_children_count("/a", "q").unwrap(), 0);
        assert_eq!(s.named_children_count("/a", ""), Err(Error::NoElementName));
        assert!(matches!(s.named_children_count("/b", "w"), Err(Error::ElementNotFound(_))));
        assert_eq!(s.child_count("/a").unwrap(), 5);
        assert_eq!(s.child_name("/a", 3).unwrap(), "#text");
        assert_eq!(s.child_name("/a", 4).unwrap(), "#comment");
        assert_eq!(s.child_name("/a", 5).unwrap(), "v");
        assert!(matches!(s.child_name("/a", 6), Err(Error::IndexOutOfRange { .. })));
        assert_eq!(s.attribute_names("/a").unwrap(), ["x", "y"]);
    }

    #[test]
    fn test_create_element_variants() {
        let mut s = session("<a><b/><c/></a>");
        s.create_element("/a/b").unwrap();
        assert_eq!(compact(&s), "<a><b/><b/><c/></a>");
        assert!(matches!(s.create_element("/a/c[3]"), Err(Error::IndexOutOfRange { .. })));
        s.create_element_at("/a", "first", 1).unwrap();
        s.create_element_at("/a", "last", 0).unwrap();
        assert_eq!(compact(&s), "<a><first/><b/><b/><c/><last/></a>");
        assert!(!s.create_element_if_not_exists("/a/c").unwrap());
        assert!(s.create_element_if_not_exists("/a/d").unwrap());
        assert!(matches!(s.create_element("/root2"), Err(Error::Failed(_))));
        assert_eq!(s.create_element(""), Err(Error::NoElementName));
        assert_eq!(s.create_element_at("/a", "", 1), Err(Error::NoElementName));
    }

    #[test]
    fn test_ensure_ancestors_exist_is_idempotent() {
        let mut s = session("<plane/>");
        s.ensure_ancestors_exist("/plane/wings/wing/sections").unwrap();
        let once = compact(&s);
        s.ensure_ancestors_exist("/plane/wings/wing/sections").unwrap();
        assert_eq!(compact(&s), once);
        assert_eq!(once, "<plane><wings><wing><sections/></wing></wings></plane>");
    }

    #[test]
    fn test_ensure_ancestors_with_indices() {
        let mut s = session("<a><b/></a>");
        s.ensure_ancestors_exist("/a/b[2]/c").unwrap();
        assert_eq!(compact(&s), "<a><b/><b><c/></b></a>");
    }

    #[test]
    fn test_remove_and_rename() {
        let mut s = session(r#"<a k="1"><b/><c/></a>"#);
        s.remove_element("/a/b").unwrap();
        s.rename_element("/a/c", "d").unwrap();
        s.remove_attribute("/a", "k").unwrap();
        assert_eq!(compact(&s), "<a><d/></a>");
        assert!(matches!(s.remove_attribute("/a", "k"), Err(Error::AttributeNotFound { .. })));
        assert!(matches!(s.remove_element("/a/b"), Err(Error::ElementNotFound(_))));
        assert_eq!(s.rename_element("/a/d", "1"), Err(Error::InvalidName("1".into())));
    }

    #[test]
    fn test_swap_elements() {
        let mut s = session("<a><b>1</b><c><d>2</d></c></a>");
        s.swap_elements("/a/b", "/a/c/d").unwrap();
        assert_eq!(compact(&s), "<a><d>2</d><c><b>1</b></c></a>");
        assert!(matches!(s.swap_elements("/a", "/a/c"), Err(Error::Failed(_))));
        assert!(matches!(s.swap_elements("/a/c", "/a/x"), Err(Error::ElementNotFound(_))));
        assert_eq!(compact(&s), "<a><d>2</d><c><b>1</b></c></a>");
    }

    #[test]
    fn test_node_type() {
        let s = session(r#"<a k="v"><b>t</b><!--c--></a>"#);
        assert_eq!(s.node_type("/a").unwrap(), "ELEMENT_NODE");
        assert_eq!(s.node_type("/a/@k").unwrap(), "ATTRIBUTE_NODE");
        assert_eq!(s.node_type("/a/b/text()").unwrap(), "TEXT_NODE");
        assert_eq!(s.node_type("/a/comment()").unwrap(), "COMMENT_NODE");
        assert!(matches!(s.node_type("/a/z"), Err(Error::ElementNotFound(_))));
    }

    #[test]
    fn test_create_element_ns() {
        let mut s = session("<a/>");
        s.create_element_ns("/a", "p:b", "urn:p").unwrap();
        s.create_element_ns("/a/p:b", "p:c", "urn:p").unwrap();
        s.create_element_ns_at("/a", "d", "urn:d", 1).unwrap();
        assert_eq!(
            compact(&s),
            r#"<a><d xmlns="urn:d"/><p:b xmlns:p="urn:p"><p:c/></p:b></a>"#
        );

        s.register_namespace("q", "urn:p").unwrap();
        assert_eq!(s.count("/a/q:b/q:c").unwrap(), 1);
        assert_eq!(
            s.create_element_ns("/a", "e", " "),
            Err(Error::InvalidNamespaceUri(" ".into()))
        );
        assert_eq!(s.create_element_ns("/a", "1e", "urn:e"), Err(Error::InvalidName("1e".into())));
    }

    #[test]
    fn test_add_element_ns_always_appends() {
        let mut s = session(r#"<a xmlns:p="urn:p"/>"#);
        s.add_element_ns("/a", "p:v", "urn:p", &1.5f64, None).unwrap();
        s.add_element_ns("/a", "p:v", "urn:p", &2i64, None).unwrap();
        assert_eq!(compact(&s), r#"<a xmlns:p="urn:p"><p:v>1.5</p:v><p:v>2</p:v></a>"#);
    }

    #[test]
    fn test_set_and_declare_namespace() {
        let mut s = session("<a><b/></a>");
        s.declare_namespace("/a", "urn:x", "x").unwrap();
        s.set_element_namespace("/a/b", "urn:x", Some("x")).unwrap();
        s.set_element_namespace("/a", "urn:d", None).unwrap();
        assert_eq!(compact(&s), r#"<a xmlns:x="urn:x" xmlns="urn:d"><x:b/></a>"#);
        assert_eq!(
            s.declare_namespace("/a", "urn:x", ""),
            Err(Error::InvalidNamespacePrefix(String::new()))
        );
        assert!(matches!(
            s.set_element_namespace("/a/x:b", "", Some("x")),
            Err(Error::InvalidNamespaceUri(_))
        ));
    }

    #[test]
    fn test_headers() {
        let mut s = session("<a/>");
        s.add_header("tool", "1.0", "").unwrap();
        assert_eq!(s.get_text("/a/header/tool/toolName").unwrap(), "tool");
        assert_eq!(s.get_text("/a/header/tool/version").unwrap(), "1.0");
        assert_eq!(s.get_text("/a/header/author").unwrap(), "");
        let stamp = s.get_text("/a/header/timestamp").unwrap();
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[10..11], "T");

        s.add_cpacs_header("set", "me", "2", "", "3.0").unwrap();
        assert_eq!(s.count("/a/header").unwrap(), 2);
        let names: Vec<String> = (1..=6).map(|i| s.child_name("/a/header[2]", i).unwrap()).collect();
        assert_eq!(
            names,
            ["name", "version", "cpacsVersion", "creator", "description", "timestamp"]
        );
        assert_eq!(s.get_text("/a/header[2]/cpacsVersion").unwrap(), "3.0");
    }

    #[test]
    fn test_saved_session_refuses_writes() {
        let mut s = session("<a/>");
        s.mark_saved(std::path::Path::new("x.xml"));
        assert!(matches!(
            s.save_element("/a/b", &1i32, None),
            Err(Error::AlreadySaved(_))
        ));
        assert!(matches!(s.create_element("/a/b"), Err(Error::AlreadySaved(_))));
        assert!(matches!(s.add_header("t", "1", "me"), Err(Error::AlreadySaved(_))));
        assert!(s.check_element("/a").unwrap());
    }
}
