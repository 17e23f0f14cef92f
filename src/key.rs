//! Session ID validation and key namespacing

use crate::error::SessionError;

/// Longest accepted session ID, in characters
pub const MAX_SID_LEN: usize = 255;

/// Turns session IDs into storage keys under one prefix.
///
/// ```
/// use connect_session_redis::KeyCodec;
///
/// let codec = KeyCodec::new("sess:");
/// assert_eq!(codec.key("abc").unwrap(), "sess:abc");
/// assert!(codec.key("").is_err());
/// assert_eq!(codec.scan_pattern(), "sess:*");
/// ```
#[derive(Debug, Clone)]
pub struct KeyCodec {
    prefix: String,
}

impl KeyCodec {
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Validate `sid` and build its storage key
    pub fn key(&self, sid: &str) -> Result<String, SessionError> {
        validate_sid(sid)?;
        Ok(format!("{}{}", self.prefix, sid))
    }

    /// Strip the prefix from a storage key
    pub fn sid_of<'a>(&self, key: &'a str) -> &'a str {
        key.strip_prefix(self.prefix.as_str()).unwrap_or(key)
    }

    /// SCAN MATCH pattern selecting every key under the prefix
    pub fn scan_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.prefix.len() + 1);
        for c in self.prefix.chars() {
            if matches!(c, '*' | '?' | '[' | ']' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('*');
        pattern
    }
}

/// Reject session IDs that are empty, oversized or carry control characters
pub fn validate_sid(sid: &str) -> Result<(), SessionError> {
    if sid.is_empty() {
        return Err(SessionError::InvalidSessionId(
            "session ID must not be empty".to_string(),
        ));
    }
    let len = sid.chars().count();
    if len > MAX_SID_LEN {
        return Err(SessionError::InvalidSessionId(format!(
            "session ID is {} characters, limit is {}",
            len, MAX_SID_LEN
        )));
    }
    if sid.contains(['\0', '\n', '\r']) {
        return Err(SessionError::InvalidSessionId(
            "session ID contains control characters".to_string(),
        ));
    }
    Ok(())
}
