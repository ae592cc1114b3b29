//! xmlaccess - typed, path-addressed access to XML documents
//!
//! Layers:
//! - Session registry: integer handles over independently locked documents
//! - Path resolver: XPath 1.0 location paths compiled once and cached
//! - Scalar engine: typed get/upsert of element text and attributes
//! - Collection reconciler: make `parent/name[1..n]` match a list
//! - Uid registry: `uID` index and `isLink` checks
//! - Array codec: vectors, multi-dimensional arrays, matrices and points
//!
//! ```
//! use xmlaccess::Registry;
//!
//! let registry = Registry::default();
//! let h = registry.create("plane").unwrap();
//! registry.save_element(h, "/plane/span", &12.5f64, None).unwrap();
//! assert_eq!(registry.get_element::<f64>(h, "/plane/span").unwrap(), 12.5);
//! ```
//!
//! With the `nif` feature the registry is also exposed to the BEAM as
//! `XmlAccess.Native`.

pub mod access;
pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod external;
pub mod path;
pub mod reader;
pub mod session;

#[cfg(feature = "nif")]
mod nif;
#[cfg(feature = "nif")]
mod resource;
#[cfg(feature = "nif")]
mod term;

pub use access::{
    ArrayDescriptor, ChildCodec, Dimension, FnCodec, LinkReport, Matrix, Parameter, Point,
    PrimitiveCodec, Scalar, StorageMode, Structured, StructuredCodec, UidReport, Value, ValueKind,
};
pub use config::Config;
pub use error::{Error, Result, SUCCESS};
pub use external::{Transform, Validator};
pub use session::{Handle, Registry, Session, Status};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
