//! Parallel path evaluation
//!
//! Uses Rayon to evaluate many independent expressions against one
//! document. The document is only read, so no locking is involved.

use super::compiler::PathCache;
use super::eval::{evaluate, Target};
use crate::dom::{Document, NamespaceTable};
use crate::error::Result;
use rayon::prelude::*;

/// Evaluate multiple paths in parallel, one result per path
pub fn evaluate_parallel(
    doc: &Document,
    namespaces: &NamespaceTable,
    cache: &PathCache,
    paths: &[&str],
) -> Vec<Result<Vec<Target>>> {
    paths
        .par_iter()
        .map(|path| {
            let compiled = cache.compile(path)?;
            Ok(evaluate(doc, namespaces, &compiled))
        })
        .collect()
}

/// Count matches of multiple paths in parallel
pub fn count_parallel(
    doc: &Document,
    namespaces: &NamespaceTable,
    cache: &PathCache,
    paths: &[&str],
) -> Vec<Result<usize>> {
    evaluate_parallel(doc, namespaces, cache, paths)
        .into_iter()
        .map(|r| r.map(|targets| targets.len()))
        .collect()
}
