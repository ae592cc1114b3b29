//! Session Module - handle-addressed document sessions
//!
//! - Handle: opaque integer identifying an open document
//! - State: one tree plus its flags and path resolution
//! - Registry: the handle table and document lifecycle
//! - Routes: handle-first entry points for every access engine

pub mod handle;
pub mod registry;
pub mod routes;
pub mod state;

pub use handle::Handle;
pub use registry::Registry;
pub use state::{Session, Status};
