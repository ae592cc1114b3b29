//! ResourceArc Wrappers
//!
//! The registry lives in a resource so every BEAM process holding the
//! reference shares one handle table.

use crate::config::Config;
use crate::session::Registry;
use rustler::ResourceArc;

/// Wrapper for Registry that can be stored in a ResourceArc
pub struct RegistryResource {
    pub inner: Registry,
}

impl RegistryResource {
    pub fn new(config: Config) -> Self {
        RegistryResource {
            inner: Registry::new(config),
        }
    }
}

#[rustler::resource_impl]
impl rustler::Resource for RegistryResource {}

impl Default for RegistryResource {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Type alias for the ResourceArc
pub type RegistryRef = ResourceArc<RegistryResource>;
