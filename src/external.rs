//! Caller-supplied collaborators
//!
//! Stylesheet transformation and schema validation are not implemented in
//! this crate. Callers plug an engine in through these traits and the
//! registry routes documents to it by handle.

use crate::error::{Error, Result};
use crate::session::{Handle, Registry};
use std::path::Path;
use tracing::debug;

/// Turns one document into another through a stylesheet
pub trait Transform {
    /// Transform serialized document text; returns the serialized result
    fn apply(&self, document: &str, stylesheet: &str) -> Result<String>;
}

/// Checks a document against a schema
pub trait Validator {
    /// `Err(Error::NotSchemaCompliant(..))` when the document does not validate
    fn validate(&self, document: &str, schema: &str) -> Result<()>;
}

impl<F> Transform for F
where
    F: Fn(&str, &str) -> Result<String>,
{
    fn apply(&self, document: &str, stylesheet: &str) -> Result<String> {
        self(document, stylesheet)
    }
}

impl<F> Validator for F
where
    F: Fn(&str, &str) -> Result<()>,
{
    fn validate(&self, document: &str, schema: &str) -> Result<()> {
        self(document, schema)
    }
}

impl Registry {
    /// Transform a document and open the result under a new handle
    pub fn transform_to_handle(
        &self,
        handle: Handle,
        transform: &dyn Transform,
        stylesheet: &str,
    ) -> Result<Handle> {
        let source = self.export_as_text(handle)?;
        let output = transform.apply(&source, stylesheet)?;
        let result = self.import_from_text(&output)?;
        debug!(source = handle.raw(), result = result.raw(), "document transformed");
        Ok(result)
    }

    /// Transform a document and write the result to `destination`
    pub fn transform_to_file(
        &self,
        handle: Handle,
        transform: &dyn Transform,
        stylesheet: &str,
        destination: impl AsRef<Path>,
    ) -> Result<()> {
        let destination = destination.as_ref();
        let source = self.export_as_text(handle)?;
        let output = transform.apply(&source, stylesheet)?;
        std::fs::write(destination, output).map_err(|e| Error::Io {
            path: destination.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Validate a document with a caller-supplied validator
    pub fn validate(&self, handle: Handle, validator: &dyn Validator, schema: &str) -> Result<()> {
        let text = self.export_as_text(handle)?;
        validator.validate(&text, schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RootNameValidator;

    impl Validator for RootNameValidator {
        fn validate(&self, document: &str, schema: &str) -> Result<()> {
            if document.contains(&format!("<{schema}")) {
                Ok(())
            } else {
                Err(Error::NotSchemaCompliant(format!("root is not `{schema}`")))
            }
        }
    }

    #[test]
    fn test_transform_to_handle() {
        let registry = Registry::default();
        let h = registry.import_from_text("<a><b>1</b></a>").unwrap();
        let rename = |doc: &str, to: &str| -> Result<String> {
            Ok(doc
                .replace("<a>", &format!("<{to}>"))
                .replace("</a>", &format!("</{to}>")))
        };
        let out = registry.transform_to_handle(h, &rename, "z").unwrap();
        assert_ne!(out, h);
        assert_eq!(
            registry.with_session(out, |s| s.get_element::<i32>("/z/b")).unwrap(),
            1
        );
    }

    #[test]
    fn test_transform_errors_propagate() {
        let registry = Registry::default();
        let h = registry.import_from_text("<a/>").unwrap();
        let broken = |_: &str, _: &str| -> Result<String> { Ok("<a>".to_string()) };
        assert!(matches!(
            registry.transform_to_handle(h, &broken, ""),
            Err(Error::NotWellFormed { .. })
        ));
        let failing =
            |_: &str, _: &str| -> Result<String> { Err(Error::Failed("no stylesheet".into())) };
        assert!(matches!(registry.transform_to_handle(h, &failing, ""), Err(Error::Failed(_))));
    }

    #[test]
    fn test_transform_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out.xml");
        let registry = Registry::default();
        let h = registry.import_from_text("<a/>").unwrap();
        let identity = |doc: &str, _: &str| -> Result<String> { Ok(doc.to_string()) };
        registry.transform_to_file(h, &identity, "", &file).unwrap();
        let reopened = registry.open(&file).unwrap();
        assert_eq!(registry.with_session(reopened, |s| s.count("/a")).unwrap(), 1);
    }

    #[test]
    fn test_validate_with_closure() {
        let registry = Registry::default();
        let h = registry.import_from_text("<plane/>").unwrap();
        let non_empty = |document: &str, _: &str| -> Result<()> {
            if document.contains("<plane/>") {
                Ok(())
            } else {
                Err(Error::NotSchemaCompliant("empty".into()))
            }
        };
        registry.validate(h, &non_empty, "").unwrap();
        let reject = |_: &str, schema: &str| -> Result<()> { Err(Error::NotSchemaCompliant(schema.to_string())) };
        assert_eq!(
            registry.validate(h, &reject, "plane.xsd"),
            Err(Error::NotSchemaCompliant("plane.xsd".into()))
        );
    }

    #[test]
    fn test_validate() {
        let registry = Registry::default();
        let h = registry.import_from_text("<plane/>").unwrap();
        registry.validate(h, &RootNameValidator, "plane").unwrap();
        assert_eq!(
            registry.validate(h, &RootNameValidator, "ship").unwrap_err().code(),
            Error::NotSchemaCompliant(String::new()).code()
        );
    }
}
