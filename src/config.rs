//! Store configuration

use std::fmt;
use std::sync::Arc;

use crate::serializer::{JsonSerializer, Serializer};
use crate::session::SessionData;

/// Default key prefix, same as connect-redis
pub const DEFAULT_PREFIX: &str = "sess:";

/// Default TTL in seconds (1 day)
pub const DEFAULT_TTL: i64 = 86400;

/// Default SCAN count hint
pub const DEFAULT_SCAN_COUNT: usize = 100;

/// Fallback TTL used when a record carries no cookie expiry
#[derive(Clone)]
pub enum Ttl {
    /// Fixed number of seconds
    Fixed(i64),
    /// Seconds computed from the full record; the value is used as-is
    Computed(Arc<dyn Fn(&SessionData) -> i64 + Send + Sync>),
}

impl Ttl {
    /// Resolve the fallback TTL for a record
    pub fn resolve(&self, record: &SessionData) -> i64 {
        match self {
            Ttl::Fixed(secs) => *secs,
            Ttl::Computed(f) => f(record),
        }
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Ttl::Fixed(DEFAULT_TTL)
    }
}

impl fmt::Debug for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Fixed(secs) => f.debug_tuple("Fixed").field(secs).finish(),
            Ttl::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Configuration for the session store
#[derive(Clone)]
pub struct StoreConfig {
    /// Session key prefix in store (default: "sess:")
    pub prefix: String,

    /// Fallback TTL (default: 86400 seconds)
    pub ttl: Ttl,

    /// Store sessions without expiry; also disables touch (default: false)
    pub disable_ttl: bool,

    /// Make `touch` a no-op (default: false)
    pub disable_touch: bool,

    /// COUNT hint passed to SCAN (default: 100)
    pub scan_count: usize,

    /// Log failures through `tracing` (default: true)
    pub log_errors: bool,

    /// Record codec (default: JSON)
    pub serializer: Arc<dyn Serializer>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            ttl: Ttl::default(),
            disable_ttl: false,
            disable_touch: false,
            scan_count: DEFAULT_SCAN_COUNT,
            log_errors: true,
            serializer: Arc::new(JsonSerializer),
        }
    }
}

impl StoreConfig {
    /// Create a configuration with connect-redis defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session key prefix in store (default: "sess:")
    pub fn with_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set a fixed fallback TTL in seconds (default: 86400)
    pub fn with_ttl(mut self, secs: i64) -> Self {
        self.ttl = Ttl::Fixed(secs);
        self
    }

    /// Compute the fallback TTL from each record
    pub fn with_ttl_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&SessionData) -> i64 + Send + Sync + 'static,
    {
        self.ttl = Ttl::Computed(Arc::new(f));
        self
    }

    /// Store sessions without expiry (default: false)
    pub fn with_disable_ttl(mut self, disable: bool) -> Self {
        self.disable_ttl = disable;
        self
    }

    /// Turn `touch` into a no-op (default: false)
    pub fn with_disable_touch(mut self, disable: bool) -> Self {
        self.disable_touch = disable;
        self
    }

    /// Set the SCAN count hint (default: 100, minimum 1)
    pub fn with_scan_count(mut self, count: usize) -> Self {
        self.scan_count = count.max(1);
        self
    }

    /// Log failures through `tracing` (default: true)
    pub fn with_log_errors(mut self, log: bool) -> Self {
        self.log_errors = log;
        self
    }

    /// Replace the record codec
    pub fn with_serializer<S: Serializer>(mut self, serializer: S) -> Self {
        self.serializer = Arc::new(serializer);
        self
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("prefix", &self.prefix)
            .field("ttl", &self.ttl)
            .field("disable_ttl", &self.disable_ttl)
            .field("disable_touch", &self.disable_touch)
            .field("scan_count", &self.scan_count)
            .field("log_errors", &self.log_errors)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.prefix, "sess:");
        assert!(matches!(config.ttl, Ttl::Fixed(86400)));
        assert!(!config.disable_ttl);
        assert!(!config.disable_touch);
        assert_eq!(config.scan_count, 100);
        assert!(config.log_errors);
    }

    #[test]
    fn test_builder() {
        let config = StoreConfig::new()
            .with_prefix("t:")
            .with_ttl_fn(|record| record.get::<i64>("ttl").unwrap_or(10))
            .with_scan_count(0)
            .with_log_errors(false);

        assert_eq!(config.prefix, "t:");
        assert_eq!(config.scan_count, 1);
        assert!(!config.log_errors);

        let mut record = SessionData::default();
        assert_eq!(config.ttl.resolve(&record), 10);
        record.set("ttl", 42);
        assert_eq!(config.ttl.resolve(&record), 42);
        assert!(format!("{:?}", config).contains("Computed(..)"));
    }
}
