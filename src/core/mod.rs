//! Core XML parsing primitives
//!
//! Building blocks shared by the reader and the tree:
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Entities: entity decoding with Cow (zero-copy when possible) and escaping
//! - Attributes: attribute list parsing
//! - Names: validation of caller-supplied element and attribute names

pub mod attributes;
pub mod entities;
pub mod names;
pub mod scanner;
