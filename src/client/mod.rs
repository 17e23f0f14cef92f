//! Key-value client abstraction the store runs on
//!
//! A [`KvClient`] exposes the handful of primitives a connect-redis style
//! store needs: GET, SET with optional expiry, DEL, EXPIRE, MGET and a
//! cursor-driven SCAN. Clients report their [`Topology`] so the scan engine
//! can pick the matching cursor type.

use async_trait::async_trait;

use crate::error::StoreResult;

mod memory;

pub use memory::MemoryClient;

#[cfg(feature = "redis-store")]
mod redis_client;

#[cfg(feature = "redis-store")]
pub use redis_client::RedisClient;

#[cfg(feature = "redis-cluster")]
mod cluster;

#[cfg(feature = "redis-cluster")]
pub use cluster::RedisClusterClient;

/// Deployment shape of the key-value database, as far as scanning cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// One node; a single cursor walks the whole keyspace
    Single,
    /// Several nodes; each one is scanned in turn
    Sharded,
}

/// Primitives required from the underlying key-value client.
///
/// The client is owned by the caller; the store never opens or closes
/// connections.
#[async_trait]
pub trait KvClient: Send + Sync + 'static {
    /// Topology this client talks to
    fn topology(&self) -> Topology;

    /// GET
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// SET, with `EX ttl_secs` when given
    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> StoreResult<()>;

    /// DEL of a batch of keys, returning how many existed
    async fn del(&self, keys: &[String]) -> StoreResult<u64>;

    /// EXPIRE, returning whether the key existed
    async fn expire(&self, key: &str, ttl_secs: i64) -> StoreResult<bool>;

    /// MGET; the result lines up with `keys`
    async fn mget(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>>;

    /// Nodes to visit when scanning a sharded topology
    async fn scan_nodes(&self) -> StoreResult<Vec<String>> {
        Ok(Vec::new())
    }

    /// One SCAN step: `SCAN cursor MATCH pattern COUNT count`, sent to `node`
    /// on sharded topologies. Returns the next cursor and the matched keys.
    async fn scan(
        &self,
        node: Option<&str>,
        cursor: &str,
        pattern: &str,
        count: usize,
    ) -> StoreResult<(String, Vec<String>)>;
}
