//! TTL derivation from session cookie metadata

use chrono::{DateTime, Utc};

use crate::config::{StoreConfig, Ttl};
use crate::session::SessionData;

/// Derives the expiry, in seconds, that a record should be stored with.
#[derive(Debug, Clone)]
pub struct TtlCalculator {
    fallback: Ttl,
    disabled: bool,
}

impl TtlCalculator {
    pub fn new(fallback: Ttl, disabled: bool) -> Self {
        Self { fallback, disabled }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.ttl.clone(), config.disable_ttl)
    }

    /// TTL for `record` against the current time.
    ///
    /// `None` means the record must be stored without an expiry.
    pub fn ttl(&self, record: &SessionData) -> Option<i64> {
        self.ttl_at(record, Utc::now())
    }

    /// TTL for `record` against a fixed `now`.
    ///
    /// Precedence: disabled, then `cookie.expires` (clamped at zero), then
    /// `cookie.maxAge` (not clamped), then the configured fallback.
    pub fn ttl_at(&self, record: &SessionData, now: DateTime<Utc>) -> Option<i64> {
        if self.disabled {
            return None;
        }
        if let Some(expires) = record.cookie.expires {
            let remaining_ms = (expires - now).num_milliseconds();
            return Some(remaining_ms.div_euclid(1000).max(0));
        }
        if let Some(max_age) = record.cookie.max_age {
            return Some(max_age.div_euclid(1000));
        }
        Some(self.fallback.resolve(record))
    }
}
