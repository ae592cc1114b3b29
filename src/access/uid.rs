//! UID registry and links
//!
//! Elements carry a document-wide identifier in the `uID` attribute. An
//! element referring to another one by identifier carries the target uid in
//! its `isLink` attribute. The index is rebuilt from the live tree on every
//! query, so it can never disagree with the document.

use crate::dom::{NodeId, DOCUMENT_NODE};
use crate::error::{Error, Result};
use crate::session::Session;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Attribute holding an element's unique identifier
pub const UID_ATTRIBUTE: &str = "uID";

/// Attribute holding the uid a link element points to
pub const LINK_ATTRIBUTE: &str = "isLink";

/// Snapshot of uid → element assignments in document order
#[derive(Debug, Clone, Default)]
pub struct UidIndex {
    order: Vec<String>,
    nodes: HashMap<String, Vec<NodeId>>,
}

impl UidIndex {
    fn insert(&mut self, uid: &str, id: NodeId) {
        match self.nodes.get_mut(uid) {
            Some(ids) => ids.push(id),
            None => {
                self.order.push(uid.to_string());
                self.nodes.insert(uid.to_string(), vec![id]);
            }
        }
    }

    /// Number of distinct uids
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.nodes.contains_key(uid)
    }

    /// Elements carrying `uid`
    pub fn get(&self, uid: &str) -> &[NodeId] {
        self.nodes.get(uid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct uids in order of first appearance
    pub fn uids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Uids assigned to more than one element, each listed once
    pub fn duplicates(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|uid| self.get(uid).len() > 1)
            .cloned()
            .collect()
    }
}

/// Result of the duplicate scan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UidReport {
    pub duplicates: Vec<String>,
}

impl UidReport {
    pub fn is_ok(&self) -> bool {
        self.duplicates.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(Error::UidNotUnique(self.duplicates))
        }
    }
}

/// A link whose target uid does not exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenLink {
    /// Path of the linking element
    pub path: String,
    /// Missing target
    pub uid: String,
}

/// Result of the link scan; every broken link is listed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkReport {
    pub checked: usize,
    pub broken: Vec<BrokenLink>,
}

impl LinkReport {
    pub fn is_ok(&self) -> bool {
        self.broken.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_ok() {
            return Ok(());
        }
        let mut uids: Vec<String> = Vec::with_capacity(self.broken.len());
        for link in self.broken {
            if !uids.contains(&link.uid) {
                uids.push(link.uid);
            }
        }
        Err(Error::UidLinkBroken(uids))
    }
}

impl Session {
    /// Scan the tree for `uID` attributes. Empty values are skipped.
    pub fn uid_index(&self) -> UidIndex {
        let doc = self.document();
        let mut index = UidIndex::default();
        for id in doc.descendants(DOCUMENT_NODE) {
            match doc.attribute(id, UID_ATTRIBUTE) {
                Some("") => warn!(path = %doc.path_of(id), "empty uid ignored"),
                Some(uid) => index.insert(uid, id),
                None => {}
            }
        }
        index
    }

    /// Non-fatal duplicate check
    pub fn check_duplicate_uids(&self) -> UidReport {
        let duplicates = self.uid_index().duplicates();
        for uid in &duplicates {
            warn!(handle = self.handle().raw(), uid = uid.as_str(), "duplicate uid");
        }
        UidReport { duplicates }
    }

    pub fn uid_exists(&self, uid: &str) -> bool {
        self.uid_index().contains(uid)
    }

    /// The element carrying `uid`
    pub fn resolve_uid(&self, uid: &str) -> Result<NodeId> {
        match self.uid_index().get(uid) {
            [] => Err(Error::UidNotFound(uid.to_string())),
            [id] => Ok(*id),
            _ => Err(Error::UidNotUnique(vec![uid.to_string()])),
        }
    }

    /// Canonical path of the element carrying `uid`
    pub fn uid_path(&self, uid: &str) -> Result<String> {
        let id = self.resolve_uid(uid)?;
        Ok(self.document().path_of(id))
    }

    /// Assign `uid` to the element at `path`. Fails when another element
    /// already carries it.
    pub fn set_uid(&mut self, path: &str, uid: &str) -> Result<()> {
        self.ensure_writable()?;
        if uid.is_empty() {
            return Err(Error::Failed(format!("empty uid for `{path}`")));
        }
        let id = self.resolve_element(path)?;
        if self.uid_index().get(uid).iter().any(|&other| other != id) {
            return Err(Error::UidNotUnique(vec![uid.to_string()]));
        }
        self.document_mut()?.set_attribute(id, UID_ATTRIBUTE, uid);
        Ok(())
    }

    /// Make the element at `path` link to `uid`, which must already exist
    pub fn set_reference(&mut self, path: &str, uid: &str) -> Result<()> {
        self.ensure_writable()?;
        if !self.uid_exists(uid) {
            return Err(Error::UidNotFound(uid.to_string()));
        }
        let id = self.resolve_element(path)?;
        self.document_mut()?.set_attribute(id, LINK_ATTRIBUTE, uid);
        debug!(handle = self.handle().raw(), path, uid, "link set");
        Ok(())
    }

    /// Verify every link target; all broken links are collected
    pub fn check_links(&self) -> LinkReport {
        let doc = self.document();
        let index = self.uid_index();
        let mut report = LinkReport::default();

        for id in doc.descendants(DOCUMENT_NODE) {
            let Some(target) = doc.attribute(id, LINK_ATTRIBUTE) else {
                continue;
            };
            report.checked += 1;
            if !index.contains(target) {
                let path = doc.path_of(id);
                warn!(path = path.as_str(), uid = target, "broken link");
                report.broken.push(BrokenLink {
                    path,
                    uid: target.to_string(),
                });
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn session(xml: &str) -> Session {
        Session::detached(Document::parse(xml).unwrap())
    }

    #[test]
    fn test_index_and_paths() {
        let s = session(r#"<a uID="root"><w uID="w1"/><w uID="w2"><s uID=""/></w></a>"#);
        let index = s.uid_index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.uids().collect::<Vec<_>>(), ["root", "w1", "w2"]);
        assert_eq!(s.uid_path("w2").unwrap(), "/a/w[2]");
        assert_eq!(s.uid_path("root").unwrap(), "/a");
        assert_eq!(s.uid_path("nope"), Err(Error::UidNotFound("nope".into())));
        assert!(s.uid_exists("w1"));
        assert!(!s.uid_exists(""));
    }

    #[test]
    fn test_duplicates_are_reported_once() {
        let s = session(r#"<a><b uID="x"/><c uID="x"/><d uID="x"/><e uID="y"/></a>"#);
        let report = s.check_duplicate_uids();
        assert!(!report.is_ok());
        assert_eq!(report.duplicates, ["x"]);
        assert_eq!(report.into_result(), Err(Error::UidNotUnique(vec!["x".into()])));
        assert_eq!(s.uid_path("x"), Err(Error::UidNotUnique(vec!["x".into()])));

        let clean = session(r#"<a><b uID="x"/><c uID="y"/></a>"#);
        assert!(clean.check_duplicate_uids().into_result().is_ok());
    }

    #[test]
    fn test_reference_requires_existing_uid() {
        let mut s = session("<a><target/><source/></a>");
        assert_eq!(
            s.set_reference("/a/source", "X"),
            Err(Error::UidNotFound("X".into()))
        );
        s.set_uid("/a/target", "X").unwrap();
        s.set_reference("/a/source", "X").unwrap();
        assert_eq!(s.uid_path("X").unwrap(), "/a/target");
        assert_eq!(s.get_attribute::<String>("/a/source", LINK_ATTRIBUTE).unwrap(), "X");
        assert!(s.check_links().is_ok());
    }

    #[test]
    fn test_set_uid_conflicts() {
        let mut s = session(r#"<a><b uID="u"/><c/></a>"#);
        assert_eq!(s.set_uid("/a/c", "u"), Err(Error::UidNotUnique(vec!["u".into()])));
        s.set_uid("/a/b", "u").unwrap();
        assert!(s.set_uid("/a/c", "").is_err());
    }

    #[test]
    fn test_broken_links_are_aggregated() {
        let s = session(
            r#"<a uID="ok"><l isLink="ok"/><l isLink="gone"/><l isLink="lost"/><m isLink="gone"/></a>"#,
        );
        let report = s.check_links();
        assert_eq!(report.checked, 4);
        assert_eq!(report.broken.len(), 3);
        assert_eq!(report.broken[0].path, "/a/l[2]");
        assert_eq!(
            report.into_result(),
            Err(Error::UidLinkBroken(vec!["gone".into(), "lost".into()]))
        );
    }
}
