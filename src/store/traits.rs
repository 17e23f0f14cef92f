//! Session store trait

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::StoreResult;
use crate::session::SessionData;

/// Trait for session storage backends
///
/// This trait mirrors the express-session store interface. Every method is
/// the deferred form of an operation: the returned future resolves to the
/// result or the error. For the callback form see
/// [`SessionStoreCallbackExt`](super::SessionStoreCallbackExt).
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Get a session by ID
    ///
    /// Returns None if session doesn't exist
    async fn get(&self, sid: &str) -> StoreResult<Option<SessionData>>;

    /// Set/update a session
    ///
    /// The expiry is derived from the session cookie; a session whose
    /// derived TTL is already zero or negative is deleted instead.
    async fn set(&self, sid: &str, session: &SessionData) -> StoreResult<()>;

    /// Destroy/delete a session
    async fn destroy(&self, sid: &str) -> StoreResult<()>;

    /// Touch a session - update its TTL without modifying data
    async fn touch(&self, sid: &str, session: &SessionData) -> StoreResult<()>;

    /// All sessions, keyed by session ID
    async fn all(&self) -> StoreResult<HashMap<String, SessionData>>;

    /// Get the count of all sessions
    async fn length(&self) -> StoreResult<usize>;

    /// Get all session IDs
    async fn ids(&self) -> StoreResult<Vec<String>>;

    /// Clear all sessions
    async fn clear(&self) -> StoreResult<()>;

    /// Load a session for the middleware; same as [`SessionStore::get`]
    async fn load(&self, sid: &str) -> StoreResult<Option<SessionData>> {
        self.get(sid).await
    }
}
