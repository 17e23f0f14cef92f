//! Cursor-driven key enumeration
//!
//! SCAN walks the keyspace in steps so large stores are never blocked by a
//! single KEYS call. On a single node one cursor covers everything and the
//! walk ends when the server hands back `"0"`. On a sharded deployment each
//! node has its own cursor; a node's cursor returning to `"0"` only moves the
//! walk on to the next node, and the walk ends once every node is done.

use std::collections::HashSet;
use std::future::Future;

use crate::client::{KvClient, Topology};
use crate::error::StoreResult;

/// Cursor value that starts and ends a SCAN walk
pub const SCAN_START: &str = "0";

/// Position of a multi-node scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardedCursor {
    nodes: Vec<String>,
    position: usize,
    node_cursor: String,
}

impl ShardedCursor {
    pub fn new(nodes: Vec<String>) -> Self {
        Self {
            nodes,
            position: 0,
            node_cursor: SCAN_START.to_string(),
        }
    }

    /// True once every node has been scanned to completion
    pub fn is_finished(&self) -> bool {
        self.position >= self.nodes.len()
    }

    /// Node currently being scanned
    pub fn current_node(&self) -> Option<&str> {
        self.nodes.get(self.position).map(String::as_str)
    }

    fn advance(&mut self, next: String) {
        if next == SCAN_START {
            self.position += 1;
            self.node_cursor = SCAN_START.to_string();
        } else {
            self.node_cursor = next;
        }
    }
}

/// SCAN continuation state for either topology
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanCursor {
    /// Single-node cursor; `"0"` after the first step means done
    Simple(String),
    /// Per-node cursors over a sharded deployment
    Sharded(ShardedCursor),
}

impl ScanCursor {
    /// Fresh cursor for the client's topology
    pub async fn open<C: KvClient + ?Sized>(client: &C) -> StoreResult<Self> {
        Ok(match client.topology() {
            Topology::Single => ScanCursor::Simple(SCAN_START.to_string()),
            Topology::Sharded => ScanCursor::Sharded(ShardedCursor::new(client.scan_nodes().await?)),
        })
    }

    /// Whether the walk is complete. Only meaningful after at least one step,
    /// since a fresh single-node cursor is also `"0"`.
    pub fn is_done(&self) -> bool {
        match self {
            ScanCursor::Simple(token) => token == SCAN_START,
            ScanCursor::Sharded(cursor) => cursor.is_finished(),
        }
    }

    /// Issue one SCAN step and move the cursor forward
    async fn step<C: KvClient + ?Sized>(
        &mut self,
        client: &C,
        pattern: &str,
        count: usize,
    ) -> StoreResult<Vec<String>> {
        match self {
            ScanCursor::Simple(token) => {
                let (next, keys) = client.scan(None, token, pattern, count).await?;
                *token = next;
                Ok(keys)
            }
            ScanCursor::Sharded(cursor) => {
                let Some(node) = cursor.current_node() else {
                    return Ok(Vec::new());
                };
                let (next, keys) = client
                    .scan(Some(node), &cursor.node_cursor, pattern, count)
                    .await?;
                if next == SCAN_START {
                    tracing::debug!(node, "node scan complete");
                }
                cursor.advance(next);
                Ok(keys)
            }
        }
    }
}

/// A SCAN walk in progress, yielding one batch per step
pub struct KeyScan<'a, C: ?Sized> {
    client: &'a C,
    pattern: String,
    count: usize,
    cursor: ScanCursor,
    done: bool,
}

impl<'a, C: KvClient + ?Sized> KeyScan<'a, C> {
    pub async fn start(client: &'a C, pattern: &str, count: usize) -> StoreResult<Self> {
        Ok(Self {
            client,
            pattern: pattern.to_string(),
            count,
            cursor: ScanCursor::open(client).await?,
            done: false,
        })
    }

    /// Keys from the next step, or `None` once the walk is complete.
    /// Batches may be empty.
    pub async fn next_batch(&mut self) -> StoreResult<Option<Vec<String>>> {
        if self.done {
            return Ok(None);
        }
        let keys = self
            .cursor
            .step(self.client, &self.pattern, self.count)
            .await?;
        self.done = self.cursor.is_done();
        Ok(Some(keys))
    }
}

/// Enumerates keys matching a pattern
pub struct ScanEngine<'a, C: ?Sized> {
    client: &'a C,
    count: usize,
}

impl<'a, C: KvClient + ?Sized> ScanEngine<'a, C> {
    pub fn new(client: &'a C, count: usize) -> Self {
        Self {
            client,
            count: count.max(1),
        }
    }

    /// Every key matching `pattern`, each reported once.
    ///
    /// Nothing is returned if any step fails.
    pub async fn scan_keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let mut scan = KeyScan::start(self.client, pattern, self.count).await?;
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        while let Some(batch) = scan.next_batch().await? {
            for key in batch {
                if seen.insert(key.clone()) {
                    keys.push(key);
                }
            }
        }
        tracing::debug!(pattern, keys = keys.len(), "scan complete");
        Ok(keys)
    }

    /// Feed each non-empty batch of matching keys to `handler`, threading
    /// `init` through as an accumulator.
    ///
    /// A failing step or handler stops the walk and its error is returned.
    pub async fn scan_and_process_keys<A, F, Fut>(
        &self,
        pattern: &str,
        init: A,
        mut handler: F,
    ) -> StoreResult<A>
    where
        F: FnMut(A, Vec<String>) -> Fut,
        Fut: Future<Output = StoreResult<A>>,
    {
        let mut scan = KeyScan::start(self.client, pattern, self.count).await?;
        let mut acc = init;
        while let Some(batch) = scan.next_batch().await? {
            if batch.is_empty() {
                continue;
            }
            tracing::debug!(pattern, batch = batch.len(), "processing scan batch");
            acc = handler(acc, batch).await?;
        }
        Ok(acc)
    }
}
