//! Namespace prefix table
//!
//! Path expressions may use `prefix:name` steps. The prefixes are bound per
//! session, either explicitly or by harvesting the `xmlns:` declarations of
//! the document, and matched against element namespace URIs during
//! evaluation.

use super::document::Document;
use crate::core::names::is_valid_name;
use crate::error::{Error, Result};

/// Well-known namespace URIs
pub mod ns {
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
    pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
}

/// Validate a prefix and URI pair; `None` stands for the default namespace
pub fn check_binding(prefix: Option<&str>, uri: &str) -> Result<()> {
    if let Some(prefix) = prefix {
        if prefix.is_empty() || prefix.contains(':') || !is_valid_name(prefix) {
            return Err(Error::InvalidNamespacePrefix(prefix.to_string()));
        }
    }
    if uri.trim().is_empty() {
        return Err(Error::InvalidNamespaceUri(uri.to_string()));
    }
    Ok(())
}

/// Name of the attribute declaring `prefix`, plain `xmlns` for the default
/// namespace
pub fn declaration_attribute(prefix: Option<&str>) -> String {
    match prefix {
        Some(p) => format!("xmlns:{p}"),
        None => "xmlns".to_string(),
    }
}

/// Prefix to URI bindings used when resolving path expressions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamespaceTable {
    bindings: Vec<(String, String)>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `uri`, replacing an earlier binding of the prefix
    pub fn register(&mut self, prefix: &str, uri: &str) -> Result<()> {
        check_binding(Some(prefix), uri)?;

        match self.bindings.iter_mut().find(|(p, _)| p == prefix) {
            Some(binding) => binding.1 = uri.to_string(),
            None => self.bindings.push((prefix.to_string(), uri.to_string())),
        }
        Ok(())
    }

    /// Bind every prefix declared anywhere in `doc`. Returns how many
    /// declarations were registered.
    pub fn register_from_document(&mut self, doc: &Document) -> Result<usize> {
        let declarations = doc.namespace_declarations();
        for (prefix, uri) in &declarations {
            self.register(prefix, uri)?;
        }
        Ok(declarations.len())
    }

    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(ns::XML);
        }
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(p, u)| (p.as_str(), u.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut table = NamespaceTable::new();
        table.register("c", "urn:one").unwrap();
        table.register("c", "urn:two").unwrap();
        assert_eq!(table.resolve("c"), Some("urn:two"));
        assert_eq!(table.resolve("xml"), Some(ns::XML));
        assert_eq!(table.resolve("missing"), None);
        assert_eq!(table.iter().count(), 1);
    }

    #[test]
    fn test_invalid_bindings() {
        let mut table = NamespaceTable::new();
        assert_eq!(
            table.register("", "urn:x"),
            Err(Error::InvalidNamespacePrefix(String::new()))
        );
        assert!(matches!(
            table.register("a:b", "urn:x"),
            Err(Error::InvalidNamespacePrefix(_))
        ));
        assert!(matches!(
            table.register("p", " "),
            Err(Error::InvalidNamespaceUri(_))
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_check_binding() {
        assert_eq!(check_binding(None, "urn:x"), Ok(()));
        assert_eq!(check_binding(Some("p"), "urn:x"), Ok(()));
        assert!(matches!(check_binding(Some("1p"), "urn:x"), Err(Error::InvalidNamespacePrefix(_))));
        assert!(matches!(check_binding(None, ""), Err(Error::InvalidNamespaceUri(_))));
        assert_eq!(declaration_attribute(Some("p")), "xmlns:p");
        assert_eq!(declaration_attribute(None), "xmlns");
    }

    #[test]
    fn test_register_from_document() {
        let doc = Document::parse(r#"<a xmlns:x="urn:x"><b xmlns:y="urn:y"/></a>"#).unwrap();
        let mut table = NamespaceTable::new();
        assert_eq!(table.register_from_document(&doc).unwrap(), 2);
        assert_eq!(table.resolve("y"), Some("urn:y"));
    }
}
