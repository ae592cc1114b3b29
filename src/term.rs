//! Elixir Term Conversion Utilities
//!
//! Results become `{:ok, value}` or `{:error, {code, message}}`; calls that
//! return nothing become `:ok`.

use crate::access::{LinkReport, UidReport};
use crate::error::{Error, Result};
use rustler::{Encoder, Env, Term};

rustler::atoms! {
    ok,
    error,
    broken_link,
}

pub fn error_to_term<'a>(env: Env<'a>, err: &Error) -> Term<'a> {
    (error(), (err.code(), err.to_string())).encode(env)
}

/// `{:ok, value}` or the error tuple
pub fn result_to_term<'a, T: Encoder>(env: Env<'a>, result: Result<T>) -> Term<'a> {
    match result {
        Ok(value) => (ok(), value).encode(env),
        Err(e) => error_to_term(env, &e),
    }
}

/// `:ok` or the error tuple
pub fn status_to_term<'a>(env: Env<'a>, result: Result<()>) -> Term<'a> {
    match result {
        Ok(()) => ok().encode(env),
        Err(e) => error_to_term(env, &e),
    }
}

/// One result per element, in input order
pub fn results_to_list<'a, T: Encoder>(env: Env<'a>, results: Vec<Result<T>>) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for result in results.into_iter().rev() {
        list = list.list_prepend(result_to_term(env, result));
    }
    list
}

/// `{:ok, duplicate_uids}`
pub fn uid_report_to_term<'a>(env: Env<'a>, report: Result<UidReport>) -> Term<'a> {
    result_to_term(env, report.map(|r| r.duplicates))
}

/// `{:ok, [{:broken_link, path, uid}, ...]}`
pub fn link_report_to_term<'a>(env: Env<'a>, report: Result<LinkReport>) -> Term<'a> {
    match report {
        Ok(report) => {
            let mut list = Term::list_new_empty(env);
            for link in report.broken.iter().rev() {
                list = list.list_prepend((broken_link(), link.path.as_str(), link.uid.as_str()).encode(env));
            }
            (ok(), list).encode(env)
        }
        Err(e) => error_to_term(env, &e),
    }
}
