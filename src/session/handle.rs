//! Document handles

use std::fmt;

/// Opaque identifier of an open document session.
///
/// Valid handles are non-negative; [`Handle::INVALID`] is the sentinel
/// foreign callers receive when no document could be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(i32);

impl Handle {
    pub const INVALID: Handle = Handle(-1);

    pub const fn from_raw(raw: i32) -> Self {
        Handle(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    /// True unless the handle is negative
    pub const fn is_valid(self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Handle> for i32 {
    fn from(handle: Handle) -> i32 {
        handle.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel() {
        assert!(!Handle::INVALID.is_valid());
        assert!(Handle::from_raw(0).is_valid());
        assert_eq!(i32::from(Handle::from_raw(7)), 7);
        assert_eq!(Handle::from_raw(3).to_string(), "3");
    }
}
