//! Session record compatible with express-session/connect-redis

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Cookie metadata embedded in a session record.
///
/// Only `expires` and `maxAge` are interpreted (for TTL derivation). Every
/// other attribute express-session writes (`originalMaxAge`, `path`,
/// `httpOnly`, ...) is kept as-is in [`SessionCookie::attributes`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionCookie {
    /// Absolute expiration time
    #[serde(
        default,
        with = "expires_format",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<DateTime<Utc>>,

    /// Relative lifetime in milliseconds
    #[serde(rename = "maxAge", default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,

    /// Remaining cookie attributes
    #[serde(flatten)]
    pub attributes: HashMap<String, Value>,
}

impl SessionCookie {
    /// Cookie that expires at the given instant
    pub fn expiring_at(expires: DateTime<Utc>) -> Self {
        Self {
            expires: Some(expires),
            ..Default::default()
        }
    }

    /// Cookie with a relative max age in milliseconds
    pub fn with_max_age(max_age_ms: i64) -> Self {
        Self {
            max_age: Some(max_age_ms),
            ..Default::default()
        }
    }
}

/// Session data structure compatible with express-session/connect-redis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    /// Cookie information; `null` or a non-object reads as no metadata
    #[serde(default, deserialize_with = "lenient_cookie")]
    pub cookie: SessionCookie,

    /// Additional session data (flattened at same level as cookie)
    #[serde(flatten)]
    pub data: HashMap<String, Value>,
}

impl SessionData {
    /// Create an empty record with the given cookie
    pub fn new(cookie: SessionCookie) -> Self {
        Self {
            cookie,
            data: HashMap::new(),
        }
    }

    /// Get a value from session data
    pub fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Set a value in session data
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.data.insert(key.to_string(), v);
        }
    }
}

fn lenient_cookie<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SessionCookie, D::Error> {
    match Value::deserialize(deserializer)? {
        raw @ Value::Object(_) => serde_json::from_value(raw).map_err(D::Error::custom),
        _ => Ok(SessionCookie::default()),
    }
}

/// `expires` is accepted as a date string (RFC 3339, then RFC 2822) or as
/// epoch milliseconds, and written back as RFC 3339.
mod expires_format {
    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawExpires {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<RawExpires>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawExpires::Millis(ms)) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("expires out of range: {}", ms))),
            Some(RawExpires::Text(text)) => DateTime::parse_from_rfc3339(&text)
                .or_else(|_| DateTime::parse_from_rfc2822(&text))
                .map(|at| Some(at.with_timezone(&Utc)))
                .map_err(|e| D::Error::custom(format!("invalid expires {:?}: {}", text, e))),
        }
    }
}
