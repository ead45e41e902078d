//! Configuration options for the Brisk engine.

use std::time::Duration;

/// Engine configuration, applied once at construction.
///
/// # Example
///
/// ```
/// use brisk_core::api::Config;
/// use std::time::Duration;
///
/// let config = Config::default()
///     .with_strict_mode(true)
///     .with_timeout(Duration::from_millis(250));
/// assert_eq!(config.max_depth, 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum nesting of parentheses, call arguments and prefix operators.
    ///
    /// Default: 10
    pub max_depth: usize,

    /// Deadline for a whole `evaluate` call. Zero disables it.
    ///
    /// Default: 5 seconds
    pub timeout: Duration,

    /// Whether `register_function`/`register_operator` accept new entries.
    ///
    /// Default: true
    pub allow_custom: bool,

    /// Enables the strict token-sequence check and makes cache store
    /// failures fatal.
    ///
    /// Default: false
    pub strict_mode: bool,

    /// Default: true
    pub cache_enabled: bool,

    /// Cache capacity in approximate bytes.
    ///
    /// Default: 1 MiB
    pub cache_size: usize,

    /// Default: 1 hour
    pub cache_ttl: Duration,

    /// Maximum expression length in bytes.
    ///
    /// Default: 10 000
    pub max_string_length: usize,

    /// Maximum number of elements in an array variable.
    ///
    /// Default: 10 000
    pub max_array_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 10,
            timeout: Duration::from_millis(5000),
            allow_custom: true,
            strict_mode: false,
            cache_enabled: true,
            cache_size: 1024 * 1024,
            cache_ttl: Duration::from_secs(60 * 60),
            max_string_length: 10_000,
            max_array_length: 10_000,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_allow_custom(mut self, allow_custom: bool) -> Self {
        self.allow_custom = allow_custom;
        self
    }

    #[must_use]
    pub fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    #[must_use]
    pub fn with_cache_enabled(mut self, cache_enabled: bool) -> Self {
        self.cache_enabled = cache_enabled;
        self
    }

    #[must_use]
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    #[must_use]
    pub fn with_cache_ttl(mut self, cache_ttl: Duration) -> Self {
        self.cache_ttl = cache_ttl;
        self
    }

    #[must_use]
    pub fn with_max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }

    #[must_use]
    pub fn with_max_array_length(mut self, max_array_length: usize) -> Self {
        self.max_array_length = max_array_length;
        self
    }

    /// The deadline duration, if one is configured.
    pub fn deadline(&self) -> Option<Duration> {
        (!self.timeout.is_zero()).then_some(self.timeout)
    }
}
