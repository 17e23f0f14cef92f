//! In-memory key-value client
//!
//! This is primarily for development and testing.
//! For production, use RedisClient or RedisClusterClient.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{KvClient, Topology};
use crate::error::{SessionError, StoreResult};

struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn is_live(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(exp) => exp > now,
            None => true,
        }
    }
}

type Shard = RwLock<BTreeMap<String, StoredValue>>;

struct Shared {
    shards: Vec<Shard>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

/// In-memory key-value client with Redis-like semantics
///
/// Keys expire lazily. With [`MemoryClient::sharded`] keys are spread over
/// several shards and the client reports [`Topology::Sharded`], each shard
/// acting as one node during scans.
///
/// Clones share the same data, so a test can hand one clone to a store and
/// inspect the other.
///
/// Warning: This client is not suitable for production use because:
/// - Data is lost on restart
/// - Data is not shared across processes
/// - Memory usage grows with number of sessions
#[derive(Clone)]
pub struct MemoryClient {
    inner: Arc<Shared>,
    topology: Topology,
}

impl MemoryClient {
    /// Create a single-node memory client
    pub fn new() -> Self {
        Self::with_shards(1, Topology::Single)
    }

    /// Create a memory client that behaves like a cluster of `shards` nodes
    pub fn sharded(shards: usize) -> Self {
        Self::with_shards(shards.max(1), Topology::Sharded)
    }

    fn with_shards(count: usize, topology: Topology) -> Self {
        Self {
            inner: Arc::new(Shared {
                shards: (0..count).map(|_| RwLock::new(BTreeMap::new())).collect(),
                calls: AtomicUsize::new(0),
                failing: AtomicBool::new(false),
            }),
            topology,
        }
    }

    /// Number of primitive calls issued so far
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent primitive fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    /// Store a raw value without going through a store, and without counting
    /// as a call
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.shard_for(key).write().insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at: None,
            },
        );
    }

    /// Remaining lifetime of a key, like Redis `TTL`: `None` when the key is
    /// missing, `Some(-1)` when it never expires
    pub fn ttl_of(&self, key: &str) -> Option<i64> {
        let now = Instant::now();
        let shard = self.shard_for(key).read();
        let stored = shard.get(key).filter(|s| s.is_live(now))?;
        Some(match stored.expires_at {
            Some(exp) => exp.duration_since(now).as_secs() as i64,
            None => -1,
        })
    }

    /// Number of live keys across all shards
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.inner
            .shards
            .iter()
            .map(|shard| shard.read().values().filter(|s| s.is_live(now)).count())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record_call(&self) -> StoreResult<()> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(SessionError::StoreError("memory client is failing".to_string()));
        }
        Ok(())
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % self.inner.shards.len() as u64) as usize
    }

    fn shard_for(&self, key: &str) -> &Shard {
        &self.inner.shards[self.shard_index(key)]
    }

    fn node_shard(&self, node: Option<&str>) -> StoreResult<&Shard> {
        let index = match (self.topology, node) {
            (Topology::Single, _) => 0,
            (Topology::Sharded, Some(name)) => name
                .strip_prefix("memory-")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| *n < self.inner.shards.len())
                .ok_or_else(|| SessionError::StoreError(format!("unknown node {}", name)))?,
            (Topology::Sharded, None) => {
                return Err(SessionError::StoreError(
                    "sharded scan requires a node".to_string(),
                ))
            }
        };
        Ok(&self.inner.shards[index])
    }

    fn read_live(&self, key: &str, now: Instant) -> Option<String> {
        self.shard_for(key)
            .read()
            .get(key)
            .filter(|s| s.is_live(now))
            .map(|s| s.value.clone())
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvClient for MemoryClient {
    fn topology(&self) -> Topology {
        self.topology
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.record_call()?;
        Ok(self.read_live(key, Instant::now()))
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> StoreResult<()> {
        self.record_call()?;
        if ttl_secs == Some(0) {
            return Err(SessionError::StoreError(
                "invalid expire time in 'set' command".to_string(),
            ));
        }
        let expires_at = ttl_secs.map(|secs| Instant::now() + Duration::from_secs(secs));
        self.shard_for(key).write().insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> StoreResult<u64> {
        self.record_call()?;
        let now = Instant::now();
        let mut removed = 0;
        for key in keys {
            if let Some(stored) = self.shard_for(key).write().remove(key) {
                if stored.is_live(now) {
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> StoreResult<bool> {
        self.record_call()?;
        let now = Instant::now();
        let mut shard = self.shard_for(key).write();
        if !shard.get(key).is_some_and(|s| s.is_live(now)) {
            return Ok(false);
        }
        // Like Redis, a non-positive expiry deletes the key.
        if ttl_secs <= 0 {
            shard.remove(key);
        } else if let Some(stored) = shard.get_mut(key) {
            stored.expires_at = Some(now + Duration::from_secs(ttl_secs as u64));
        }
        Ok(true)
    }

    async fn mget(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>> {
        self.record_call()?;
        let now = Instant::now();
        Ok(keys.iter().map(|key| self.read_live(key, now)).collect())
    }

    async fn scan_nodes(&self) -> StoreResult<Vec<String>> {
        self.record_call()?;
        Ok(match self.topology {
            Topology::Single => Vec::new(),
            Topology::Sharded => (0..self.inner.shards.len())
                .map(|i| format!("memory-{}", i))
                .collect(),
        })
    }

    async fn scan(
        &self,
        node: Option<&str>,
        cursor: &str,
        pattern: &str,
        count: usize,
    ) -> StoreResult<(String, Vec<String>)> {
        self.record_call()?;
        let offset: usize = cursor
            .parse()
            .map_err(|_| SessionError::StoreError(format!("invalid cursor {:?}", cursor)))?;
        let now = Instant::now();
        let shard = self.node_shard(node)?.read();

        // The cursor is a position in key order; COUNT bounds how many keys
        // one step examines, not how many it returns.
        let examined: Vec<(&String, &StoredValue)> =
            shard.iter().skip(offset).take(count.max(1)).collect();
        let next = offset + examined.len();
        let keys = examined
            .into_iter()
            .filter(|(key, stored)| stored.is_live(now) && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();

        let next_cursor = if next >= shard.len() {
            "0".to_string()
        } else {
            next.to_string()
        };
        Ok((next_cursor, keys))
    }
}

/// Redis-style MATCH: `*`, `?` and backslash escapes
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_from(&pattern, &text)
}

fn glob_match_from(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('*', rest)) => (0..=text.len()).any(|skip| glob_match_from(rest, &text[skip..])),
        Some(('?', rest)) => !text.is_empty() && glob_match_from(rest, &text[1..]),
        Some(('\\', rest)) if !rest.is_empty() => {
            text.first() == Some(&rest[0]) && glob_match_from(&rest[1..], &text[1..])
        }
        Some((c, rest)) => text.first() == Some(c) && glob_match_from(rest, &text[1..]),
    }
}
