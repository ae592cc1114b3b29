//! Access Module - typed engines over a session's tree
//!
//! - Value and Format: leaf codec and printf-style number rendering
//! - Scalar: get/upsert of element and attribute values
//! - Collection: ordered child reconciliation
//! - Uid: identifier index and link checks
//! - Array and Point: numeric shapes stored as nested elements
//!
//! Every engine is a set of methods on [`Session`](crate::Session).

pub mod array;
pub mod collection;
pub mod format;
pub mod point;
pub mod scalar;
pub mod uid;
pub mod value;

pub use array::{
    array_value, element_count, flat_index, ArrayDescriptor, Dimension, Matrix, Parameter, StorageMode,
};
pub use collection::{
    check_occurrences, ChildCodec, FnCodec, Occurrence, OccurrenceReport, PrimitiveCodec,
    Structured, StructuredCodec,
};
pub use point::Point;
pub use uid::{BrokenLink, LinkReport, UidIndex, UidReport, LINK_ATTRIBUTE, UID_ATTRIBUTE};
pub use value::{Scalar, Value, ValueKind, FALSE_LITERALS, TRUE_LITERALS};
