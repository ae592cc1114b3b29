//! Handle-first entry points
//!
//! Each method validates the handle, locks that session alone and forwards
//! to the engine method of the same name on [`Session`].

use super::handle::Handle;
use super::registry::Registry;
use crate::access::{
    ArrayDescriptor, ChildCodec, LinkReport, Matrix, Point, Scalar, UidReport,
};
use crate::error::Result;

impl Registry {
    // ========================================================================
    // Paths
    // ========================================================================

    /// Canonical paths of every node `path` selects
    pub fn resolve(&self, handle: Handle, path: &str) -> Result<Vec<String>> {
        self.with_session(handle, |s| s.resolve_paths(path))
    }

    pub fn count(&self, handle: Handle, path: &str) -> Result<usize> {
        self.with_session(handle, |s| s.count(path))
    }

    pub fn path_of_match(&self, handle: Handle, path: &str, index: usize) -> Result<String> {
        self.with_session(handle, |s| s.path_of_match(path, index))
    }

    pub fn text_of_match(&self, handle: Handle, path: &str, index: usize) -> Result<String> {
        self.with_session(handle, |s| s.text_of_match(path, index))
    }

    pub fn count_parallel(&self, handle: Handle, paths: &[&str]) -> Result<Vec<Result<usize>>> {
        self.with_session(handle, |s| Ok(s.count_parallel(paths)))
    }

    pub fn register_namespace(&self, handle: Handle, prefix: &str, uri: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.register_namespace(prefix, uri))
    }

    pub fn register_namespaces_from_document(&self, handle: Handle) -> Result<usize> {
        self.with_session_mut(handle, |s| s.register_namespaces_from_document())
    }

    // ========================================================================
    // Scalars and structure
    // ========================================================================

    pub fn get_element<T: Scalar>(&self, handle: Handle, path: &str) -> Result<T> {
        self.with_session(handle, |s| s.get_element(path))
    }

    pub fn get_attribute<T: Scalar>(&self, handle: Handle, path: &str, name: &str) -> Result<T> {
        self.with_session(handle, |s| s.get_attribute(path, name))
    }

    pub fn save_element<T: Scalar>(
        &self,
        handle: Handle,
        path: &str,
        value: &T,
        format: Option<&str>,
    ) -> Result<()> {
        self.with_session_mut(handle, |s| s.save_element(path, value, format))
    }

    pub fn save_attribute<T: Scalar>(
        &self,
        handle: Handle,
        path: &str,
        name: &str,
        value: &T,
        format: Option<&str>,
    ) -> Result<()> {
        self.with_session_mut(handle, |s| s.save_attribute(path, name, value, format))
    }

    pub fn check_element(&self, handle: Handle, path: &str) -> Result<bool> {
        self.with_session(handle, |s| s.check_element(path))
    }

    pub fn check_attribute(&self, handle: Handle, path: &str, name: &str) -> Result<bool> {
        self.with_session(handle, |s| s.check_attribute(path, name))
    }

    pub fn named_children_count(&self, handle: Handle, path: &str, name: &str) -> Result<usize> {
        self.with_session(handle, |s| s.named_children_count(path, name))
    }

    pub fn ensure_ancestors_exist(&self, handle: Handle, path: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.ensure_ancestors_exist(path))
    }

    pub fn create_element(&self, handle: Handle, path: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.create_element(path))
    }

    pub fn create_element_at(&self, handle: Handle, parent: &str, name: &str, index: i64) -> Result<()> {
        self.with_session_mut(handle, |s| s.create_element_at(parent, name, index))
    }

    pub fn remove_element(&self, handle: Handle, path: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.remove_element(path))
    }

    pub fn remove_attribute(&self, handle: Handle, path: &str, name: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.remove_attribute(path, name))
    }

    pub fn rename_element(&self, handle: Handle, path: &str, new_name: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.rename_element(path, new_name))
    }

    pub fn swap_elements(&self, handle: Handle, first: &str, second: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.swap_elements(first, second))
    }

    pub fn node_type(&self, handle: Handle, path: &str) -> Result<&'static str> {
        self.with_session(handle, |s| s.node_type(path))
    }

    pub fn add_header(&self, handle: Handle, tool_name: &str, version: &str, author: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.add_header(tool_name, version, author))
    }

    pub fn add_cpacs_header(
        &self,
        handle: Handle,
        name: &str,
        creator: &str,
        version: &str,
        description: &str,
        cpacs_version: &str,
    ) -> Result<()> {
        self.with_session_mut(handle, |s| {
            s.add_cpacs_header(name, creator, version, description, cpacs_version)
        })
    }

    // ========================================================================
    // Namespaces
    // ========================================================================

    pub fn create_element_ns(&self, handle: Handle, parent: &str, qname: &str, uri: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.create_element_ns(parent, qname, uri))
    }

    pub fn create_element_ns_at(
        &self,
        handle: Handle,
        parent: &str,
        qname: &str,
        uri: &str,
        index: i64,
    ) -> Result<()> {
        self.with_session_mut(handle, |s| s.create_element_ns_at(parent, qname, uri, index))
    }

    pub fn set_element_namespace(
        &self,
        handle: Handle,
        path: &str,
        uri: &str,
        prefix: Option<&str>,
    ) -> Result<()> {
        self.with_session_mut(handle, |s| s.set_element_namespace(path, uri, prefix))
    }

    pub fn declare_namespace(&self, handle: Handle, path: &str, uri: &str, prefix: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.declare_namespace(path, uri, prefix))
    }

    // ========================================================================
    // Collections
    // ========================================================================

    pub fn sync_children<T>(
        &self,
        handle: Handle,
        path: &str,
        values: &[T],
        codec: &impl ChildCodec<T>,
    ) -> Result<()> {
        self.with_session_mut(handle, |s| s.sync_children(path, values, codec))
    }

    pub fn read_children<T>(&self, handle: Handle, path: &str, codec: &impl ChildCodec<T>) -> Result<Vec<T>> {
        self.with_session(handle, |s| s.read_children(path, codec))
    }

    // ========================================================================
    // Uids
    // ========================================================================

    pub fn check_duplicate_uids(&self, handle: Handle) -> Result<UidReport> {
        self.with_session(handle, |s| Ok(s.check_duplicate_uids()))
    }

    pub fn uid_exists(&self, handle: Handle, uid: &str) -> Result<bool> {
        self.with_session(handle, |s| Ok(s.uid_exists(uid)))
    }

    pub fn uid_path(&self, handle: Handle, uid: &str) -> Result<String> {
        self.with_session(handle, |s| s.uid_path(uid))
    }

    pub fn set_uid(&self, handle: Handle, path: &str, uid: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.set_uid(path, uid))
    }

    pub fn set_reference(&self, handle: Handle, path: &str, uid: &str) -> Result<()> {
        self.with_session_mut(handle, |s| s.set_reference(path, uid))
    }

    pub fn check_links(&self, handle: Handle) -> Result<LinkReport> {
        self.with_session(handle, |s| Ok(s.check_links()))
    }

    // ========================================================================
    // Arrays, matrices and points
    // ========================================================================

    pub fn write_array(
        &self,
        handle: Handle,
        path: &str,
        array: &ArrayDescriptor,
        format: Option<&str>,
    ) -> Result<()> {
        self.with_session_mut(handle, |s| s.write_array(path, array, format))
    }

    pub fn read_array(&self, handle: Handle, path: &str) -> Result<ArrayDescriptor> {
        self.with_session(handle, |s| s.read_array(path))
    }

    pub fn write_vector(&self, handle: Handle, path: &str, values: &[f64], format: Option<&str>) -> Result<()> {
        self.with_session_mut(handle, |s| s.write_vector(path, values, format))
    }

    pub fn read_vector(&self, handle: Handle, path: &str) -> Result<Vec<f64>> {
        self.with_session(handle, |s| s.read_vector(path))
    }

    pub fn write_matrix(
        &self,
        handle: Handle,
        path: &str,
        row_name: &str,
        col_name: &str,
        matrix: &Matrix,
        format: Option<&str>,
    ) -> Result<()> {
        self.with_session_mut(handle, |s| s.write_matrix(path, row_name, col_name, matrix, format))
    }

    pub fn read_matrix(&self, handle: Handle, path: &str, row_name: &str, col_name: &str) -> Result<Matrix> {
        self.with_session(handle, |s| s.read_matrix(path, row_name, col_name))
    }

    pub fn add_point(&self, handle: Handle, path: &str, point: Point, format: Option<&str>) -> Result<()> {
        self.with_session_mut(handle, |s| s.add_point(path, point, format))
    }

    pub fn get_point(&self, handle: Handle, path: &str) -> Result<Point> {
        self.with_session(handle, |s| s.get_point(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::PrimitiveCodec;
    use crate::error::Error;

    #[test]
    fn test_every_route_checks_the_handle() {
        let registry = Registry::default();
        let h = registry.create("root").unwrap();
        registry.close(h).unwrap();

        let invalid = Err::<(), _>(Error::InvalidHandle(h));
        assert_eq!(registry.get_element::<String>(h, "/root").map(|_| ()), invalid);
        assert_eq!(registry.save_element(h, "/root", &1i32, None), invalid);
        assert_eq!(registry.count(h, "/root").map(|_| ()), invalid);
        assert_eq!(registry.check_links(h).map(|_| ()), invalid);
        assert_eq!(
            registry.sync_children(h, "/root/v", &[1i32], &PrimitiveCodec::new()),
            invalid
        );
        assert_eq!(registry.read_array(h, "/root").map(|_| ()), invalid);
        assert_eq!(registry.swap_elements(h, "/root", "/root"), invalid);
        assert_eq!(registry.declare_namespace(h, "/root", "urn:x", "x"), invalid);
    }

    #[test]
    fn test_structure_and_namespace_routes() {
        let registry = Registry::default();
        let h = registry.import_from_text("<doc><a>1</a><b>2</b></doc>").unwrap();

        registry.swap_elements(h, "/doc/a", "/doc/b").unwrap();
        assert_eq!(registry.text_of_match(h, "/doc/*", 1).unwrap(), "2");
        assert_eq!(registry.node_type(h, "/doc/a").unwrap(), "ELEMENT_NODE");

        registry.create_element_ns(h, "/doc", "x:c", "urn:x").unwrap();
        registry.register_namespace(h, "y", "urn:x").unwrap();
        assert_eq!(registry.count(h, "/doc/y:c").unwrap(), 1);

        registry.add_header(h, "tool", "1.0", "me").unwrap();
        assert_eq!(registry.get_element::<String>(h, "/doc/header/author").unwrap(), "me");
    }

    #[test]
    fn test_routes_reach_the_right_document() {
        let registry = Registry::default();
        let a = registry.import_from_text("<doc><v>a</v></doc>").unwrap();
        let b = registry.import_from_text("<doc><v>b</v></doc>").unwrap();

        registry.save_element(a, "/doc/w", &1i32, None).unwrap();
        assert_eq!(registry.get_element::<String>(a, "/doc/v").unwrap(), "a");
        assert_eq!(registry.get_element::<String>(b, "/doc/v").unwrap(), "b");
        assert!(registry.check_element(a, "/doc/w").unwrap());
        assert!(!registry.check_element(b, "/doc/w").unwrap());
        assert_eq!(registry.resolve(a, "/doc/*").unwrap(), ["/doc/v", "/doc/w"]);
    }
}
