//! Pluggable record codecs

use async_trait::async_trait;

use crate::error::SessionError;
use crate::session::SessionData;

/// Encodes records for storage and decodes them back.
///
/// `decode` is async so codecs that need to await (decryption services,
/// remote schema lookups) plug in the same way as synchronous ones.
#[async_trait]
pub trait Serializer: Send + Sync + 'static {
    /// Encode a record into the stored string form
    fn encode(&self, record: &SessionData) -> Result<String, SessionError>;

    /// Decode a stored string back into a record
    async fn decode(&self, raw: &str) -> Result<SessionData, SessionError>;
}

/// JSON codec, the connect-redis default
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

#[async_trait]
impl Serializer for JsonSerializer {
    fn encode(&self, record: &SessionData) -> Result<String, SessionError> {
        Ok(serde_json::to_string(record)?)
    }

    async fn decode(&self, raw: &str) -> Result<SessionData, SessionError> {
        Ok(serde_json::from_str(raw)?)
    }
}
