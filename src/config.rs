//! Registry configuration
//!
//! Defaults applied to every session a [`Registry`](crate::Registry) opens.

use std::num::NonZeroUsize;

/// Default number of compiled path expressions kept per registry.
pub const DEFAULT_PATH_CACHE_CAPACITY: usize = 128;

/// Default printf-style format for integers.
pub const DEFAULT_INTEGER_FORMAT: &str = "%d";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Indent serialized output
    pub pretty_print: bool,
    /// Format for reals; `None` writes the shortest text that parses back exactly
    pub real_format: Option<String>,
    /// Format for integers
    pub integer_format: String,
    /// Reject documents that are not well formed instead of salvaging them
    pub strict: bool,
    /// Capacity of the compiled-path LRU cache
    pub path_cache_capacity: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pretty_print: true,
            real_format: None,
            integer_format: DEFAULT_INTEGER_FORMAT.to_string(),
            strict: true,
            path_cache_capacity: NonZeroUsize::new(DEFAULT_PATH_CACHE_CAPACITY)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pretty_print(mut self, enabled: bool) -> Self {
        self.pretty_print = enabled;
        self
    }

    pub fn with_real_format(mut self, format: impl Into<String>) -> Self {
        self.real_format = Some(format.into());
        self
    }

    pub fn with_integer_format(mut self, format: impl Into<String>) -> Self {
        self.integer_format = format.into();
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// A capacity of zero is clamped to one.
    pub fn with_path_cache_capacity(mut self, capacity: usize) -> Self {
        self.path_cache_capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.pretty_print);
        assert!(config.strict);
        assert_eq!(config.real_format, None);
        assert_eq!(config.integer_format, "%d");
        assert_eq!(config.path_cache_capacity.get(), DEFAULT_PATH_CACHE_CAPACITY);
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .with_pretty_print(false)
            .with_real_format("%.3f")
            .with_path_cache_capacity(0);
        assert!(!config.pretty_print);
        assert_eq!(config.real_format.as_deref(), Some("%.3f"));
        assert_eq!(config.path_cache_capacity.get(), 1);
    }
}
