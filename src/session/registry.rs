//! Session registry
//!
//! Owns every open [`Session`] keyed by [`Handle`]. The table mutex is held
//! only while a handle is allocated, looked up or released; work on a
//! session happens under that session's own lock, so distinct handles never
//! wait on each other.

use super::handle::Handle;
use super::state::Session;
use crate::config::Config;
use crate::core::names::is_valid_qname;
use crate::dom::Document;
use crate::error::{Error, Result};
use crate::path::PathCache;
use crate::reader::ParseError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

type SessionRef = Arc<Mutex<Session>>;

#[derive(Debug, Default)]
struct Table {
    next: i32,
    sessions: HashMap<Handle, SessionRef>,
}

/// Handle table for open documents
#[derive(Debug)]
pub struct Registry {
    config: Config,
    cache: Arc<PathCache>,
    table: Mutex<Table>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn not_well_formed(err: ParseError) -> Error {
    Error::NotWellFormed {
        message: err.message,
        position: err.position,
    }
}

impl Registry {
    pub fn new(config: Config) -> Self {
        let cache = Arc::new(PathCache::new(config.path_cache_capacity));
        Registry {
            config,
            cache,
            table: Mutex::new(Table::default()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn table(&self) -> Result<std::sync::MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|_| Error::Failed("session table lock poisoned".to_string()))
    }

    /// Store a document under a fresh handle
    fn insert(&self, document: Document, origin: Option<PathBuf>) -> Result<Handle> {
        let mut table = self.table()?;
        let raw = table.next;
        table.next = raw
            .checked_add(1)
            .ok_or_else(|| Error::Failed("handle space exhausted".to_string()))?;
        let handle = Handle::from_raw(raw);

        let session = Session::new(handle, document, origin, &self.config, Arc::clone(&self.cache));
        table.sessions.insert(handle, Arc::new(Mutex::new(session)));
        debug!(handle = raw, open = table.sessions.len(), "session opened");
        Ok(handle)
    }

    fn lookup(&self, handle: Handle) -> Result<SessionRef> {
        self.table()?
            .sessions
            .get(&handle)
            .cloned()
            .ok_or(Error::InvalidHandle(handle))
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// New document holding a single empty root element
    pub fn create(&self, root_name: &str) -> Result<Handle> {
        if !is_valid_qname(root_name) {
            return Err(Error::InvalidName(root_name.to_string()));
        }
        self.insert(Document::with_root(root_name), None)
    }

    /// Read and parse a document file
    pub fn open(&self, source: impl AsRef<Path>) -> Result<Handle> {
        let source = source.as_ref();
        let text = std::fs::read_to_string(source).map_err(|e| Error::OpenFailed {
            source_name: source.display().to_string(),
            reason: e.to_string(),
        })?;
        let document = Document::parse_with(&text, self.config.strict).map_err(not_well_formed)?;
        self.insert(document, Some(source.to_path_buf()))
    }

    /// Parse a document held in memory
    pub fn import_from_text(&self, text: &str) -> Result<Handle> {
        let document = Document::parse_with(text, self.config.strict).map_err(not_well_formed)?;
        self.insert(document, None)
    }

    /// Serialized document text
    pub fn export_as_text(&self, handle: Handle) -> Result<String> {
        self.with_session(handle, |s| Ok(s.to_text()))
    }

    /// Write the document to `destination`. The session stays open but
    /// refuses further mutation.
    pub fn save(&self, handle: Handle, destination: impl AsRef<Path>) -> Result<()> {
        let destination = destination.as_ref();
        self.with_session_mut(handle, |s| {
            std::fs::write(destination, s.to_text()).map_err(|e| Error::Io {
                path: destination.display().to_string(),
                reason: e.to_string(),
            })?;
            s.mark_saved(destination);
            debug!(handle = handle.raw(), path = %destination.display(), "session saved");
            Ok(())
        })
    }

    /// Save, then close the handle
    pub fn save_and_remove(&self, handle: Handle, destination: impl AsRef<Path>) -> Result<()> {
        self.save(handle, destination)?;
        self.close(handle)
    }

    /// Release a handle. Later operations on it return `InvalidHandle`.
    pub fn close(&self, handle: Handle) -> Result<()> {
        let removed = self
            .table
            .lock()
            .map_err(|_| Error::DeallocationFailed(handle))?
            .sessions
            .remove(&handle);
        match removed {
            Some(_) => {
                debug!(handle = handle.raw(), "session closed");
                Ok(())
            }
            None => Err(Error::InvalidHandle(handle)),
        }
    }

    /// Release every handle, returning how many were open
    pub fn close_all(&self) -> Result<usize> {
        let mut table = self.table()?;
        let count = table.sessions.len();
        table.sessions.clear();
        debug!(count, "all sessions closed");
        Ok(count)
    }

    pub fn check_handle(&self, handle: Handle) -> Result<()> {
        self.lookup(handle).map(|_| ())
    }

    /// Independent copy of a document under a new handle
    pub fn copy_document(&self, handle: Handle) -> Result<Handle> {
        let (document, pretty) = self.with_session(handle, |s| Ok((s.document().clone(), s.pretty_print())))?;
        let copy = self.insert(document, None)?;
        self.with_session_mut(copy, |s| {
            s.set_pretty_print(pretty);
            Ok(())
        })?;
        Ok(copy)
    }

    pub fn set_pretty_print(&self, handle: Handle, enabled: bool) -> Result<()> {
        self.with_session_mut(handle, |s| {
            s.set_pretty_print(enabled);
            Ok(())
        })
    }

    /// File the document came from or was last saved to
    pub fn document_path(&self, handle: Handle) -> Result<Option<PathBuf>> {
        self.with_session(handle, |s| Ok(s.origin().map(Path::to_path_buf)))
    }

    pub fn open_count(&self) -> usize {
        self.table().map(|t| t.sessions.len()).unwrap_or(0)
    }

    /// Shared reference to a session for callers that hold it across calls
    pub fn session(&self, handle: Handle) -> Result<Arc<Mutex<Session>>> {
        self.lookup(handle)
    }

    /// Run `f` against a validated session
    pub fn with_session<R>(&self, handle: Handle, f: impl FnOnce(&Session) -> Result<R>) -> Result<R> {
        let session = self.lookup(handle)?;
        let guard = session.lock().map_err(|_| {
            warn!(handle = handle.raw(), "session lock poisoned");
            Error::Failed(format!("session {handle} is poisoned"))
        })?;
        f(&guard)
    }

    /// Run `f` against a validated session with write access
    pub fn with_session_mut<R>(
        &self,
        handle: Handle,
        f: impl FnOnce(&mut Session) -> Result<R>,
    ) -> Result<R> {
        let session = self.lookup(handle)?;
        let mut guard = session.lock().map_err(|_| {
            warn!(handle = handle.raw(), "session lock poisoned");
            Error::Failed(format!("session {handle} is poisoned"))
        })?;
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique_and_monotonic() {
        let registry = Registry::default();
        let a = registry.create("a").unwrap();
        let b = registry.import_from_text("<b/>").unwrap();
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        registry.close(a).unwrap();
        let c = registry.create("c").unwrap();
        assert_eq!(c.raw(), 2);
        assert_eq!(registry.open_count(), 2);
    }

    #[test]
    fn test_create_rejects_bad_names() {
        let registry = Registry::default();
        assert_eq!(registry.create("1root"), Err(Error::InvalidName("1root".into())));
        assert_eq!(registry.create(""), Err(Error::InvalidName(String::new())));
    }

    #[test]
    fn test_closed_handle_is_invalid() {
        let registry = Registry::default();
        let h = registry.create("root").unwrap();
        registry.check_handle(h).unwrap();
        registry.close(h).unwrap();
        assert_eq!(registry.check_handle(h), Err(Error::InvalidHandle(h)));
        assert_eq!(registry.close(h), Err(Error::InvalidHandle(h)));
        assert_eq!(registry.export_as_text(h), Err(Error::InvalidHandle(h)));
        assert_eq!(
            registry.check_handle(Handle::INVALID),
            Err(Error::InvalidHandle(Handle::INVALID))
        );
    }

    #[test]
    fn test_import_errors() {
        let registry = Registry::default();
        assert!(matches!(
            registry.import_from_text("<a><b></a>"),
            Err(Error::NotWellFormed { .. })
        ));
        let lenient = Registry::new(Config::default().with_strict(false));
        let h = lenient.import_from_text("<a><b>").unwrap();
        assert_eq!(lenient.with_session(h, |s| s.count("/a/b")).unwrap(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        let registry = Registry::default();
        assert!(matches!(
            registry.open("/definitely/not/here.xml"),
            Err(Error::OpenFailed { .. })
        ));
    }

    #[test]
    fn test_save_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.xml");
        let registry = Registry::default();

        let h = registry.import_from_text("<root><a>1</a></root>").unwrap();
        registry.save(h, &file).unwrap();
        assert_eq!(registry.document_path(h).unwrap(), Some(file.clone()));
        assert!(registry.with_session(h, |s| Ok(s.is_saved())).unwrap());

        let reopened = registry.open(&file).unwrap();
        assert_eq!(
            registry.export_as_text(reopened).unwrap(),
            registry.export_as_text(h).unwrap()
        );
    }

    #[test]
    fn test_save_and_remove_closes() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::default();
        let h = registry.create("root").unwrap();
        registry.save_and_remove(h, dir.path().join("x.xml")).unwrap();
        assert_eq!(registry.check_handle(h), Err(Error::InvalidHandle(h)));
    }

    #[test]
    fn test_save_to_bad_location() {
        let registry = Registry::default();
        let h = registry.create("root").unwrap();
        assert!(matches!(
            registry.save(h, "/definitely/not/here/out.xml"),
            Err(Error::Io { .. })
        ));
        assert!(!registry.with_session(h, |s| Ok(s.is_saved())).unwrap());
    }

    #[test]
    fn test_export_deeply_nested_document() {
        let depth = 50_000;
        let xml = format!("{}{}", "<n>".repeat(depth), "</n>".repeat(depth));
        let registry = Registry::default();
        let h = registry.import_from_text(&xml).unwrap();

        let text = registry.export_as_text(h).unwrap();
        let reimported = registry.import_from_text(&text).unwrap();
        let copy = registry.copy_document(h).unwrap();
        assert_eq!(registry.count(reimported, "//n").unwrap(), depth);
        assert_eq!(registry.count(copy, "//n").unwrap(), depth);
    }

    #[test]
    fn test_copy_is_independent() {
        let registry = Registry::new(Config::default().with_pretty_print(false));
        let h = registry.import_from_text("<root/>").unwrap();
        let copy = registry.copy_document(h).unwrap();
        assert_ne!(h, copy);
        registry.close(h).unwrap();
        assert_eq!(
            registry.export_as_text(copy).unwrap(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<root/>\n"
        );
    }

    #[test]
    fn test_close_all() {
        let registry = Registry::default();
        registry.create("a").unwrap();
        registry.create("b").unwrap();
        assert_eq!(registry.close_all().unwrap(), 2);
        assert_eq!(registry.open_count(), 0);
    }

    #[test]
    fn test_concurrent_open_close() {
        let registry = Arc::new(Registry::default());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|_| {
                            let h = registry.create("r").unwrap();
                            registry.close(h).unwrap();
                            h.raw()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen: Vec<i32> = workers.into_iter().flat_map(|w| w.join().unwrap()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 400);
        assert_eq!(registry.open_count(), 0);
    }
}
