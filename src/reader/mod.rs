//! XML Reader Module
//!
//! Pull parser feeding the document builder:
//! - SliceReader: parser over borrowed document text
//! - Events: XML event types for pull parsing

pub mod events;
pub mod slice;

pub use events::{StartElement, XmlEvent};
pub use slice::{ParseError, SliceReader};
