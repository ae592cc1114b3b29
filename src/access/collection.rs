//! Collection reconciler
//!
//! Writes an ordered list of values to the repeated children `name[1..n]`
//! under a parent, reusing existing siblings by position:
//!
//! 1. value `i` is written to `name[i]`, creating that sibling first when
//!    only `i - 1` exist
//! 2. siblings past `n` are removed by deleting `name[n + 1]` until none
//!    remain
//!
//! Reused siblings are updated through the codec, so attributes the codec
//! does not touch survive.

use super::value::Scalar;
use crate::dom::DOCUMENT_NODE;
use crate::error::{Error, Result};
use crate::path;
use crate::session::Session;
use tracing::{debug, warn};

/// Decode/encode strategy for one child value
pub trait ChildCodec<T> {
    fn decode(&self, session: &Session, path: &str) -> Result<T>;
    fn encode(&self, session: &mut Session, path: &str, value: &T) -> Result<()>;
}

/// Leaf children stored as element text
#[derive(Debug, Clone, Default)]
pub struct PrimitiveCodec {
    format: Option<String>,
}

impl PrimitiveCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode numbers through a printf-style format
    pub fn with_format(format: impl Into<String>) -> Self {
        PrimitiveCodec {
            format: Some(format.into()),
        }
    }
}

impl<T: Scalar> ChildCodec<T> for PrimitiveCodec {
    fn decode(&self, session: &Session, path: &str) -> Result<T> {
        session.get_element(path)
    }

    fn encode(&self, session: &mut Session, path: &str, value: &T) -> Result<()> {
        session.save_element(path, value, self.format.as_deref())
    }
}

/// A composite record that reads and writes itself below one element
pub trait Structured: Sized {
    fn read(session: &Session, path: &str) -> Result<Self>;
    fn write(&self, session: &mut Session, path: &str) -> Result<()>;
}

/// Codec for any [`Structured`] child
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredCodec;

impl<T: Structured> ChildCodec<T> for StructuredCodec {
    fn decode(&self, session: &Session, path: &str) -> Result<T> {
        T::read(session, path)
    }

    fn encode(&self, session: &mut Session, path: &str, value: &T) -> Result<()> {
        value.write(session, path)
    }
}

/// Codec built from a decode and an encode closure
pub struct FnCodec<D, E> {
    decode: D,
    encode: E,
}

impl<D, E> FnCodec<D, E> {
    pub fn new(decode: D, encode: E) -> Self {
        FnCodec { decode, encode }
    }
}

impl<T, D, E> ChildCodec<T> for FnCodec<D, E>
where
    D: Fn(&Session, &str) -> Result<T>,
    E: Fn(&mut Session, &str, &T) -> Result<()>,
{
    fn decode(&self, session: &Session, path: &str) -> Result<T> {
        (self.decode)(session, path)
    }

    fn encode(&self, session: &mut Session, path: &str, value: &T) -> Result<()> {
        (self.encode)(session, path, value)
    }
}

// ============================================================================
// Occurrence checks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    Within,
    TooFew,
    TooMany,
}

/// Outcome of a min/max occurrence check. Never an error by itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceReport {
    pub count: usize,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub occurrence: Occurrence,
}

impl OccurrenceReport {
    pub fn is_ok(&self) -> bool {
        self.occurrence == Occurrence::Within
    }
}

pub fn check_occurrences(count: usize, min: Option<usize>, max: Option<usize>) -> OccurrenceReport {
    let occurrence = match (min, max) {
        (Some(min), _) if count < min => Occurrence::TooFew,
        (_, Some(max)) if count > max => Occurrence::TooMany,
        _ => Occurrence::Within,
    };
    OccurrenceReport {
        count,
        min,
        max,
        occurrence,
    }
}

// ============================================================================
// Reconciliation
// ============================================================================

impl Session {
    /// Current number of repeated children at `path`, `None` when their
    /// parent is missing
    fn collection_len(&self, path: &str) -> Result<Option<usize>> {
        let (parent, step) = path::split(path);
        let (name, index) = path::creatable_step(path, step)?;
        if index.is_some() {
            return Err(Error::invalid_path(path, "collection path must not carry an index"));
        }

        if parent.is_empty() {
            let doc = self.document();
            Ok(Some(doc.named_children(DOCUMENT_NODE, &name).count()))
        } else if self.check_element(parent)? {
            Ok(Some(self.named_children_count(parent, &name)?))
        } else {
            Ok(None)
        }
    }

    /// Decode every `path[i]` child in order; a missing parent reads as empty
    pub fn read_children<T>(&self, path: &str, codec: &impl ChildCodec<T>) -> Result<Vec<T>> {
        let path = path::trim_trailing_slash(path);
        let count = self.collection_len(path)?;
        (1..=count.unwrap_or(0))
            .map(|i| codec.decode(self, &path::indexed(path, i)))
            .collect()
    }

    /// [`read_children`](Self::read_children) plus an occurrence check that
    /// is reported, not enforced
    pub fn read_children_checked<T>(
        &self,
        path: &str,
        codec: &impl ChildCodec<T>,
        min: Option<usize>,
        max: Option<usize>,
    ) -> Result<(Vec<T>, OccurrenceReport)> {
        let values = self.read_children(path, codec)?;
        let report = check_occurrences(values.len(), min, max);
        if !report.is_ok() {
            warn!(
                path,
                count = report.count,
                min = ?report.min,
                max = ?report.max,
                "child count outside allowed occurrences"
            );
        }
        Ok((values, report))
    }

    /// Make the children at `path` match `values` by position
    pub fn sync_children<T>(&mut self, path: &str, values: &[T], codec: &impl ChildCodec<T>) -> Result<()> {
        self.ensure_writable()?;
        let path = path::trim_trailing_slash(path);
        let existing = self.collection_len(path)?;

        let existing = match existing {
            Some(count) => count,
            None if values.is_empty() => return Ok(()),
            None => {
                self.ensure_ancestors_exist(path::split(path).0)?;
                0
            }
        };

        for (i, value) in values.iter().enumerate() {
            let child = path::indexed(path, i + 1);
            if i >= existing {
                self.create_node(&child)?;
            }
            codec.encode(self, &child, value)?;
        }

        let excess = existing.saturating_sub(values.len());
        if excess > 0 {
            let first_excess = path::indexed(path, values.len() + 1);
            for _ in 0..excess {
                self.remove_element(&first_excess)?;
            }
        }

        debug!(
            handle = self.handle().raw(),
            path,
            written = values.len(),
            removed = excess,
            "children synchronized"
        );
        Ok(())
    }
}
