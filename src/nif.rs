//! Erlang NIF entry points
//!
//! Every function takes the registry resource first and a raw integer
//! handle second. Results come back as `{:ok, value}`, `:ok` or
//! `{:error, {code, message}}`.

use crate::access::{Matrix, Point, PrimitiveCodec, StorageMode};
use crate::config::Config;
use crate::error::Result;
use crate::resource::{RegistryRef, RegistryResource};
use crate::session::{Handle, Registry};
use crate::term::{
    link_report_to_term, result_to_term, results_to_list, status_to_term, uid_report_to_term,
};
use rustler::{Env, ResourceArc, Term};

fn handle_term<'a>(env: Env<'a>, result: Result<Handle>) -> Term<'a> {
    result_to_term(env, result.map(Handle::raw))
}

fn registry(resource: &RegistryRef) -> &Registry {
    &resource.inner
}

// ============================================================================
// Registry lifecycle
// ============================================================================

/// Create a registry; `real_format` of nil keeps shortest round-trip output
#[rustler::nif]
fn new(pretty_print: bool, real_format: Option<String>) -> RegistryRef {
    let mut config = Config::new().with_pretty_print(pretty_print);
    if let Some(format) = real_format {
        config = config.with_real_format(format);
    }
    ResourceArc::new(RegistryResource::new(config))
}

#[rustler::nif]
fn create<'a>(env: Env<'a>, resource: RegistryRef, root_name: String) -> Term<'a> {
    handle_term(env, registry(&resource).create(&root_name))
}

#[rustler::nif(schedule = "DirtyIo")]
fn open<'a>(env: Env<'a>, resource: RegistryRef, path: String) -> Term<'a> {
    handle_term(env, registry(&resource).open(&path))
}

#[rustler::nif(schedule = "DirtyCpu")]
fn import_from_text<'a>(env: Env<'a>, resource: RegistryRef, text: String) -> Term<'a> {
    handle_term(env, registry(&resource).import_from_text(&text))
}

#[rustler::nif]
fn export_as_text<'a>(env: Env<'a>, resource: RegistryRef, handle: i32) -> Term<'a> {
    result_to_term(env, registry(&resource).export_as_text(Handle::from_raw(handle)))
}

#[rustler::nif(schedule = "DirtyIo")]
fn save<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    status_to_term(env, registry(&resource).save(Handle::from_raw(handle), &path))
}

#[rustler::nif(schedule = "DirtyIo")]
fn save_and_remove<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    status_to_term(env, registry(&resource).save_and_remove(Handle::from_raw(handle), &path))
}

#[rustler::nif]
fn close<'a>(env: Env<'a>, resource: RegistryRef, handle: i32) -> Term<'a> {
    status_to_term(env, registry(&resource).close(Handle::from_raw(handle)))
}

#[rustler::nif]
fn close_all<'a>(env: Env<'a>, resource: RegistryRef) -> Term<'a> {
    result_to_term(env, registry(&resource).close_all())
}

#[rustler::nif]
fn copy_document<'a>(env: Env<'a>, resource: RegistryRef, handle: i32) -> Term<'a> {
    handle_term(env, registry(&resource).copy_document(Handle::from_raw(handle)))
}

#[rustler::nif]
fn check_handle<'a>(env: Env<'a>, resource: RegistryRef, handle: i32) -> Term<'a> {
    status_to_term(env, registry(&resource).check_handle(Handle::from_raw(handle)))
}

// ============================================================================
// Paths
// ============================================================================

#[rustler::nif]
fn resolve<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    result_to_term(env, registry(&resource).resolve(Handle::from_raw(handle), &path))
}

#[rustler::nif]
fn count<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    result_to_term(env, registry(&resource).count(Handle::from_raw(handle), &path))
}

/// Count several paths at once; one result per path
#[rustler::nif(schedule = "DirtyCpu")]
fn count_parallel<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, paths: Vec<String>) -> Term<'a> {
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    match registry(&resource).count_parallel(Handle::from_raw(handle), &refs) {
        Ok(results) => results_to_list(env, results),
        Err(e) => crate::term::error_to_term(env, &e),
    }
}

#[rustler::nif]
fn register_namespace<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    prefix: String,
    uri: String,
) -> Term<'a> {
    status_to_term(env, registry(&resource).register_namespace(Handle::from_raw(handle), &prefix, &uri))
}

#[rustler::nif]
fn text_of_match<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String, index: usize) -> Term<'a> {
    result_to_term(env, registry(&resource).text_of_match(Handle::from_raw(handle), &path, index))
}

#[rustler::nif]
fn node_type<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    result_to_term(env, registry(&resource).node_type(Handle::from_raw(handle), &path))
}

#[rustler::nif]
fn declare_namespace<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    uri: String,
    prefix: String,
) -> Term<'a> {
    status_to_term(
        env,
        registry(&resource).declare_namespace(Handle::from_raw(handle), &path, &uri, &prefix),
    )
}

#[rustler::nif]
fn swap_elements<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, first: String, second: String) -> Term<'a> {
    status_to_term(
        env,
        registry(&resource).swap_elements(Handle::from_raw(handle), &first, &second),
    )
}

// ============================================================================
// Scalars
// ============================================================================

#[rustler::nif]
fn get_text<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    result_to_term(env, registry(&resource).get_element::<String>(Handle::from_raw(handle), &path))
}

#[rustler::nif]
fn get_integer<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    result_to_term(env, registry(&resource).get_element::<i64>(Handle::from_raw(handle), &path))
}

#[rustler::nif]
fn get_real<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    result_to_term(env, registry(&resource).get_element::<f64>(Handle::from_raw(handle), &path))
}

#[rustler::nif]
fn get_boolean<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    result_to_term(env, registry(&resource).get_element::<bool>(Handle::from_raw(handle), &path))
}

#[rustler::nif]
fn get_attribute<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    name: String,
) -> Term<'a> {
    result_to_term(
        env,
        registry(&resource).get_attribute::<String>(Handle::from_raw(handle), &path, &name),
    )
}

#[rustler::nif]
fn save_text<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String, value: String) -> Term<'a> {
    status_to_term(
        env,
        registry(&resource).save_element(Handle::from_raw(handle), &path, &value, None),
    )
}

#[rustler::nif]
fn save_integer<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    value: i64,
    format: Option<String>,
) -> Term<'a> {
    status_to_term(
        env,
        registry(&resource).save_element(Handle::from_raw(handle), &path, &value, format.as_deref()),
    )
}

#[rustler::nif]
fn save_real<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    value: f64,
    format: Option<String>,
) -> Term<'a> {
    status_to_term(
        env,
        registry(&resource).save_element(Handle::from_raw(handle), &path, &value, format.as_deref()),
    )
}

#[rustler::nif]
fn save_boolean<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String, value: bool) -> Term<'a> {
    status_to_term(
        env,
        registry(&resource).save_element(Handle::from_raw(handle), &path, &value, None),
    )
}

#[rustler::nif]
fn save_attribute<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    name: String,
    value: String,
) -> Term<'a> {
    status_to_term(
        env,
        registry(&resource).save_attribute(Handle::from_raw(handle), &path, &name, &value, None),
    )
}

#[rustler::nif]
fn check_element<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    result_to_term(env, registry(&resource).check_element(Handle::from_raw(handle), &path))
}

#[rustler::nif]
fn named_children_count<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    name: String,
) -> Term<'a> {
    result_to_term(
        env,
        registry(&resource).named_children_count(Handle::from_raw(handle), &path, &name),
    )
}

#[rustler::nif]
fn ensure_ancestors_exist<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    status_to_term(env, registry(&resource).ensure_ancestors_exist(Handle::from_raw(handle), &path))
}

#[rustler::nif]
fn remove_element<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    status_to_term(env, registry(&resource).remove_element(Handle::from_raw(handle), &path))
}

// ============================================================================
// Collections
// ============================================================================

/// Reconcile `path[1..n]` with a list of strings
#[rustler::nif]
fn sync_texts<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    values: Vec<String>,
) -> Term<'a> {
    status_to_term(
        env,
        registry(&resource).sync_children(Handle::from_raw(handle), &path, &values, &PrimitiveCodec::new()),
    )
}

#[rustler::nif]
fn read_texts<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    let values: Result<Vec<String>> =
        registry(&resource).read_children(Handle::from_raw(handle), &path, &PrimitiveCodec::new());
    result_to_term(env, values)
}

// ============================================================================
// Uids
// ============================================================================

#[rustler::nif]
fn check_duplicate_uids<'a>(env: Env<'a>, resource: RegistryRef, handle: i32) -> Term<'a> {
    uid_report_to_term(env, registry(&resource).check_duplicate_uids(Handle::from_raw(handle)))
}

#[rustler::nif]
fn check_links<'a>(env: Env<'a>, resource: RegistryRef, handle: i32) -> Term<'a> {
    link_report_to_term(env, registry(&resource).check_links(Handle::from_raw(handle)))
}

#[rustler::nif]
fn uid_path<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, uid: String) -> Term<'a> {
    result_to_term(env, registry(&resource).uid_path(Handle::from_raw(handle), &uid))
}

#[rustler::nif]
fn set_reference<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String, uid: String) -> Term<'a> {
    status_to_term(env, registry(&resource).set_reference(Handle::from_raw(handle), &path, &uid))
}

// ============================================================================
// Arrays, matrices and points
// ============================================================================

#[rustler::nif]
fn write_vector<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    values: Vec<f64>,
    format: Option<String>,
) -> Term<'a> {
    status_to_term(
        env,
        registry(&resource).write_vector(Handle::from_raw(handle), &path, &values, format.as_deref()),
    )
}

#[rustler::nif]
fn read_vector<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    result_to_term(env, registry(&resource).read_vector(Handle::from_raw(handle), &path))
}

/// `data` is laid out according to `storage_mode` (0 row-wise, 1 column-wise)
#[rustler::nif]
#[allow(clippy::too_many_arguments)]
fn write_matrix<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    names: (String, String),
    shape: (usize, usize),
    data: Vec<f64>,
    storage_mode: i32,
) -> Term<'a> {
    let result = StorageMode::from_code(storage_mode)
        .and_then(|mode| Matrix::new(shape.0, shape.1, data, mode))
        .and_then(|matrix| {
            registry(&resource).write_matrix(Handle::from_raw(handle), &path, &names.0, &names.1, &matrix, None)
        });
    status_to_term(env, result)
}

/// `{:ok, {rows, cols, storage_mode, data}}`
#[rustler::nif]
fn read_matrix<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    names: (String, String),
) -> Term<'a> {
    let result = registry(&resource)
        .read_matrix(Handle::from_raw(handle), &path, &names.0, &names.1)
        .map(|m| (m.rows(), m.cols(), m.mode().code(), m.as_slice().to_vec()));
    result_to_term(env, result)
}

#[rustler::nif]
fn add_point<'a>(
    env: Env<'a>,
    resource: RegistryRef,
    handle: i32,
    path: String,
    coordinates: (f64, f64, f64),
) -> Term<'a> {
    let (x, y, z) = coordinates;
    status_to_term(
        env,
        registry(&resource).add_point(Handle::from_raw(handle), &path, Point::new(x, y, z), None),
    )
}

#[rustler::nif]
fn get_point<'a>(env: Env<'a>, resource: RegistryRef, handle: i32, path: String) -> Term<'a> {
    result_to_term(
        env,
        registry(&resource).get_point(Handle::from_raw(handle), &path).map(|p| (p.x, p.y, p.z)),
    )
}

rustler::init!("Elixir.XmlAccess.Native");
