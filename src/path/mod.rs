//! Path Module - addressing nodes by location path
//!
//! - Lexer and Parser: path text to [`LocationPath`]
//! - Compiler: LRU cache of parsed paths
//! - Eval: selection of nodes and attributes
//! - Parallel: Rayon batch evaluation
//!
//! The helpers here work on the path text itself: splitting off the last
//! step, building the ancestor chain and forming indexed sibling paths.

pub mod compiler;
pub mod eval;
pub mod lexer;
pub mod parallel;
pub mod parser;

pub use compiler::PathCache;
pub use eval::{evaluate, Target};
pub use parallel::{count_parallel, evaluate_parallel};
pub use parser::{parse, LocationPath};

use crate::error::{Error, Result};

/// Byte offsets of every `/` outside predicates and string literals
fn separators(path: &str) -> Vec<usize> {
    let mut found = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    for (i, b) in path.bytes().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'[') => depth += 1,
            (None, b']') => depth = depth.saturating_sub(1),
            (None, b'/') if depth == 0 => found.push(i),
            _ => {}
        }
    }
    found
}

/// Split a path at its last separator into (parent, final step).
///
/// Without a separator the parent is empty and the step is the whole path.
pub fn split(path: &str) -> (&str, &str) {
    match separators(path).last() {
        Some(&i) => (&path[..i], &path[i + 1..]),
        None => ("", path),
    }
}

/// Every ancestor-or-self prefix of `path`, root first.
///
/// `/a/b[2]/c` yields `/a`, `/a/b[2]`, `/a/b[2]/c`.
pub fn prefix_chain(path: &str) -> Vec<&str> {
    let mut chain: Vec<&str> = separators(path)
        .into_iter()
        .filter(|&i| i > 0)
        .map(|i| &path[..i])
        .filter(|prefix| !prefix.ends_with('/'))
        .collect();
    if !path.is_empty() && !path.ends_with('/') {
        chain.push(path);
    }
    chain
}

/// Remove trailing separators, keeping a lone `/`
pub fn trim_trailing_slash(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && !path.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// `path[index]`
pub fn indexed(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

/// `parent/step`
pub fn join(parent: &str, step: &str) -> String {
    format!("{}/{step}", parent.trim_end_matches('/'))
}

/// Element name and optional position of a step that is to be created.
///
/// Only `name` and `name[n]` can be created; anything else selects
/// rather than names a node.
pub fn creatable_step(path: &str, step: &str) -> Result<(String, Option<usize>)> {
    if step.is_empty() {
        return Err(Error::NoElementName);
    }
    let (name, index) = match step.split_once('[') {
        None => (step, None),
        Some((name, rest)) => {
            let digits = rest
                .strip_suffix(']')
                .ok_or_else(|| Error::invalid_path(path, "unterminated predicate"))?;
            let index = digits
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n >= 1)
                .ok_or_else(|| Error::invalid_path(path, "only a positional index can be created"))?;
            (name, Some(index))
        }
    };

    if !crate::core::names::is_valid_qname(name) {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok((name.to_string(), index))
}
