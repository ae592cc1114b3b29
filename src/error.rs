//! Error taxonomy
//!
//! Every public operation returns [`Result`]. Each variant maps to a stable
//! numeric return code through [`Error::code`], which the foreign bindings
//! hand to callers unchanged.

use crate::session::Handle;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric code reported for a successful call.
pub const SUCCESS: i32 = 0;

/// Errors raised by sessions and the typed access engines
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Catch-all for failures with no more specific kind
    #[error("operation failed: {0}")]
    Failed(String),

    #[error("invalid XML name `{0}`")]
    InvalidName(String),

    #[error("document is not well formed: {message} (at byte {position})")]
    NotWellFormed { message: String, position: usize },

    #[error("document does not validate: {0}")]
    NotSchemaCompliant(String),

    #[error("invalid document handle {0}")]
    InvalidHandle(Handle),

    #[error("invalid path expression `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("element `{0}` not found")]
    ElementNotFound(String),

    #[error("index {index} out of range for `{path}`")]
    IndexOutOfRange { path: String, index: i64 },

    #[error("no point found at `{0}`")]
    NoPointFound(String),

    #[error("`{0}` does not select an element")]
    NotAnElement(String),

    #[error("attribute `{name}` not found on `{path}`")]
    AttributeNotFound { path: String, name: String },

    #[error("cannot open `{source_name}`: {reason}")]
    OpenFailed { source_name: String, reason: String },

    #[error("cannot write `{path}`: {reason}")]
    Io { path: String, reason: String },

    #[error("document {0} was already saved")]
    AlreadySaved(Handle),

    #[error("path `{path}` matches {count} nodes")]
    ElementPathNotUnique { path: String, count: usize },

    #[error("no element name given")]
    NoElementName,

    #[error("no attribute name given")]
    NoAttributeName,

    #[error("cannot release document {0}")]
    DeallocationFailed(Handle),

    #[error("`{text}` at `{path}` is not a number")]
    NoNumber { path: String, text: String },

    #[error("`{text}` at `{path}` is not a valid {expected}")]
    InvalidValue {
        path: String,
        text: String,
        expected: &'static str,
    },

    #[error("expected element `{expected}` but found `{found}`")]
    NonMatchingName { expected: String, found: String },

    #[error("expected {expected} entries but found {found}")]
    NonMatchingSize { expected: usize, found: usize },

    #[error("invalid dimension size {size} for `{name}`")]
    MatrixDimensionError { name: String, size: i64 },

    #[error("coordinate `{coordinate}` missing below `{path}`")]
    CoordinateNotFound { path: String, coordinate: String },

    #[error("unknown storage mode {0}")]
    UnknownStorageMode(i32),

    #[error("duplicate uids: {}", .0.join(", "))]
    UidNotUnique(Vec<String>),

    #[error("uid `{0}` does not exist")]
    UidNotFound(String),

    #[error("broken links to: {}", .0.join(", "))]
    UidLinkBroken(Vec<String>),

    #[error("invalid namespace uri `{0}`")]
    InvalidNamespaceUri(String),

    #[error("invalid namespace prefix `{0}`")]
    InvalidNamespacePrefix(String),
}

impl Error {
    /// Stable numeric code for foreign callers.
    ///
    /// The numbering is part of the persisted contract: never renumber.
    pub fn code(&self) -> i32 {
        match self {
            Error::Failed(_) | Error::Io { .. } | Error::InvalidValue { .. } => 1,
            Error::InvalidName(_) => 2,
            Error::NotWellFormed { .. } => 3,
            Error::NotSchemaCompliant(_) => 4,
            Error::InvalidHandle(_) => 6,
            Error::InvalidPath { .. } => 7,
            Error::ElementNotFound(_) => 8,
            Error::IndexOutOfRange { .. } => 9,
            Error::NoPointFound(_) => 10,
            Error::NotAnElement(_) => 11,
            Error::AttributeNotFound { .. } => 12,
            Error::OpenFailed { .. } => 13,
            Error::AlreadySaved(_) => 17,
            Error::ElementPathNotUnique { .. } => 18,
            Error::NoElementName => 19,
            Error::DeallocationFailed(_) => 23,
            Error::NoNumber { .. } => 24,
            Error::NoAttributeName => 25,
            Error::NonMatchingName { .. } => 27,
            Error::NonMatchingSize { .. } => 28,
            Error::MatrixDimensionError { .. } => 29,
            Error::CoordinateNotFound { .. } => 30,
            Error::UnknownStorageMode(_) => 31,
            Error::UidNotUnique(_) => 32,
            Error::UidNotFound(_) => 33,
            Error::UidLinkBroken(_) => 34,
            Error::InvalidNamespaceUri(_) => 35,
            Error::InvalidNamespacePrefix(_) => 36,
        }
    }

    /// Short symbolic name of the error kind, used as the atom in NIF results.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Failed(_) | Error::Io { .. } | Error::InvalidValue { .. } => "failed",
            Error::InvalidName(_) => "invalid_xml_name",
            Error::NotWellFormed { .. } => "not_well_formed",
            Error::NotSchemaCompliant(_) => "not_schema_compliant",
            Error::InvalidHandle(_) => "invalid_handle",
            Error::InvalidPath { .. } => "invalid_xpath",
            Error::ElementNotFound(_) => "element_not_found",
            Error::IndexOutOfRange { .. } => "index_out_of_range",
            Error::NoPointFound(_) => "no_point_found",
            Error::NotAnElement(_) => "not_an_element",
            Error::AttributeNotFound { .. } => "attribute_not_found",
            Error::OpenFailed { .. } => "open_failed",
            Error::AlreadySaved(_) => "already_saved",
            Error::ElementPathNotUnique { .. } => "element_path_not_unique",
            Error::NoElementName => "no_element_name",
            Error::DeallocationFailed(_) => "deallocation_failed",
            Error::NoNumber { .. } => "no_number",
            Error::NoAttributeName => "no_attribute_name",
            Error::NonMatchingName { .. } => "non_matching_name",
            Error::NonMatchingSize { .. } => "non_matching_size",
            Error::MatrixDimensionError { .. } => "matrix_dimension_error",
            Error::CoordinateNotFound { .. } => "coordinate_not_found",
            Error::UnknownStorageMode(_) => "unknown_storage_mode",
            Error::UidNotUnique(_) => "uid_not_unique",
            Error::UidNotFound(_) => "uid_dont_exists",
            Error::UidLinkBroken(_) => "uid_link_broken",
            Error::InvalidNamespaceUri(_) => "invalid_namespace_uri",
            Error::InvalidNamespacePrefix(_) => "invalid_namespace_prefix",
        }
    }

    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Wrap a structural failure of an upsert so the path appears in context.
    pub(crate) fn failed_at(path: &str, cause: &Error) -> Self {
        Error::Failed(format!("cannot save `{path}`: {cause}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(Error::Failed(String::new()).code(), 1);
        assert_eq!(Error::InvalidHandle(Handle::INVALID).code(), 6);
        assert_eq!(Error::ElementNotFound("/a".into()).code(), 8);
        assert_eq!(
            Error::ElementPathNotUnique {
                path: "/a".into(),
                count: 2
            }
            .code(),
            18
        );
        assert_eq!(Error::UidNotFound("x".into()).code(), 33);
        assert_eq!(Error::InvalidNamespacePrefix(String::new()).code(), 36);
    }

    #[test]
    fn test_failed_at_keeps_path() {
        let err = Error::failed_at("/a/b", &Error::ElementNotFound("/a".into()));
        assert_eq!(err.code(), 1);
        assert!(err.to_string().contains("/a/b"));
    }

    #[test]
    fn test_uid_list_display() {
        let err = Error::UidNotUnique(vec!["w1".into(), "w2".into()]);
        assert_eq!(err.to_string(), "duplicate uids: w1, w2");
    }
}
