//! XML name validation
//!
//! Element and attribute names supplied by callers are checked against the
//! `Name` production before they reach the tree.

use super::scanner::{is_name_byte, is_name_start_byte};

/// True if `name` is a valid XML `Name` (prefixed names allowed)
pub fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    match bytes.first() {
        Some(&first) if is_name_start_byte(first) => bytes[1..].iter().all(|&b| is_name_byte(b)),
        _ => false,
    }
}

/// True if `name` is valid and carries at most one prefix separator with
/// non-empty parts on both sides
pub fn is_valid_qname(name: &str) -> bool {
    if !is_valid_name(name) {
        return false;
    }
    match name.split_once(':') {
        None => true,
        Some((prefix, local)) => {
            !prefix.is_empty() && !local.is_empty() && !local.contains(':') && is_valid_name(local)
        }
    }
}

/// Split `prefix:local` into its parts
#[inline]
pub fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}
