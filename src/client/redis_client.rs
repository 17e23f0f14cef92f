//! Single-node Redis client
//!
//! Commands are issued over a [`ConnectionManager`], which reconnects on its
//! own; this layer adds no retries.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{KvClient, Topology};
use crate::error::{SessionError, StoreResult};

/// Redis client for a single node (or a proxy that presents as one)
///
/// # Example
///
/// ```rust,ignore
/// use connect_session_redis::RedisClient;
///
/// let client = RedisClient::from_url("redis://127.0.0.1/").await?;
/// ```
#[derive(Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
}

impl RedisClient {
    /// Connect with a managed connection
    pub async fn new(client: redis::Client) -> Result<Self, SessionError> {
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    /// Connect from a connection string
    pub async fn from_url(url: &str) -> Result<Self, SessionError> {
        let client = redis::Client::open(url).map_err(|e| {
            SessionError::StoreError(format!("Failed to create Redis client: {}", e))
        })?;
        Self::new(client).await
    }

    /// Wrap an existing connection manager
    pub fn from_connection_manager(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl KvClient for RedisClient {
    fn topology(&self) -> Topology {
        Topology::Single
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        match ttl_secs {
            // Set with expiration (EX = seconds)
            Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl).await?,
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> StoreResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.conn.clone();
        let removed: u64 = redis::cmd("DEL").arg(keys).query_async(&mut conn).await?;
        Ok(removed)
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        Ok(conn.expire(key, ttl_secs).await?)
    }

    async fn mget(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        // Explicit MGET: a one-key mget would otherwise be sent as GET.
        let values: Vec<Option<String>> =
            redis::cmd("MGET").arg(keys).query_async(&mut conn).await?;
        Ok(values)
    }

    async fn scan(
        &self,
        _node: Option<&str>,
        cursor: &str,
        pattern: &str,
        count: usize,
    ) -> StoreResult<(String, Vec<String>)> {
        let mut conn = self.conn.clone();
        let (next, keys): (String, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count)
            .query_async(&mut conn)
            .await?;
        Ok((next, keys))
    }
}
