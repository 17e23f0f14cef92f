//! Redis Cluster client
//!
//! SCAN is node-local in a cluster, so enumeration visits every primary in
//! turn. Multi-key commands are split into per-key commands because keys
//! under one prefix hash to different slots.

use async_trait::async_trait;
use futures::future::try_join_all;
use redis::cluster::ClusterClient;
use redis::cluster_async::ClusterConnection;
use redis::cluster_routing::{RoutingInfo, SingleNodeRoutingInfo};
use redis::AsyncCommands;

use super::{KvClient, Topology};
use crate::error::{SessionError, StoreResult};

/// Redis Cluster client
///
/// ```rust,ignore
/// use connect_session_redis::RedisClusterClient;
///
/// let client = RedisClusterClient::from_urls(["redis://10.0.0.1:7000", "redis://10.0.0.2:7000"]).await?;
/// ```
#[derive(Clone)]
pub struct RedisClusterClient {
    conn: ClusterConnection,
}

impl RedisClusterClient {
    /// Connect using a configured cluster client
    pub async fn new(client: ClusterClient) -> Result<Self, SessionError> {
        let conn = client.get_async_connection().await?;
        Ok(Self { conn })
    }

    /// Connect from a list of seed node URLs
    pub async fn from_urls<I, S>(urls: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let urls: Vec<String> = urls.into_iter().map(|u| u.as_ref().to_string()).collect();
        let client = ClusterClient::new(urls).map_err(|e| {
            SessionError::StoreError(format!("Failed to create Redis cluster client: {}", e))
        })?;
        Self::new(client).await
    }

    /// Wrap an existing cluster connection
    pub fn from_connection(conn: ClusterConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl KvClient for RedisClusterClient {
    fn topology(&self) -> Topology {
        Topology::Sharded
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        match ttl_secs {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl).await?,
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn del(&self, keys: &[String]) -> StoreResult<u64> {
        let removed = try_join_all(keys.iter().map(|key| {
            let mut conn = self.conn.clone();
            async move { conn.del::<_, u64>(key).await }
        }))
        .await?;
        Ok(removed.into_iter().sum())
    }

    async fn expire(&self, key: &str, ttl_secs: i64) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        Ok(conn.expire(key, ttl_secs).await?)
    }

    async fn mget(&self, keys: &[String]) -> StoreResult<Vec<Option<String>>> {
        let values = try_join_all(keys.iter().map(|key| {
            let mut conn = self.conn.clone();
            async move { conn.get::<_, Option<String>>(key).await }
        }))
        .await?;
        Ok(values)
    }

    async fn scan_nodes(&self) -> StoreResult<Vec<String>> {
        let mut cmd = redis::cmd("CLUSTER");
        cmd.arg("NODES");

        let mut conn = self.conn.clone();
        let reply = conn
            .route_command(
                &cmd,
                RoutingInfo::SingleNode(SingleNodeRoutingInfo::Random),
            )
            .await?;
        let text: String = redis::from_redis_value(&reply)?;
        let nodes = parse_primaries(&text)?;
        tracing::debug!(nodes = nodes.len(), "discovered cluster primaries");
        Ok(nodes)
    }

    async fn scan(
        &self,
        node: Option<&str>,
        cursor: &str,
        pattern: &str,
        count: usize,
    ) -> StoreResult<(String, Vec<String>)> {
        let node = node.ok_or_else(|| {
            SessionError::StoreError("cluster scan requires a node address".to_string())
        })?;
        let (host, port) = split_address(node)?;

        let mut cmd = redis::cmd("SCAN");
        cmd.arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count);

        let mut conn = self.conn.clone();
        let reply = conn
            .route_command(
                &cmd,
                RoutingInfo::SingleNode(SingleNodeRoutingInfo::ByAddress { host, port }),
            )
            .await?;
        let (next, keys): (String, Vec<String>) = redis::from_redis_value(&reply)?;
        Ok((next, keys))
    }
}

/// Addresses (`host:port`) of the healthy primaries in a `CLUSTER NODES` reply
fn parse_primaries(text: &str) -> StoreResult<Vec<String>> {
    let mut nodes = Vec::new();
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(SessionError::StoreError(format!(
                "malformed CLUSTER NODES line: {:?}",
                line
            )));
        }
        let flags: Vec<&str> = fields[2].split(',').collect();
        let usable = flags.contains(&"master")
            && !flags
                .iter()
                .any(|f| matches!(*f, "fail" | "noaddr" | "handshake"));
        if !usable {
            continue;
        }
        // ip:port@cport[,hostname]
        let address = fields[1].split('@').next().unwrap_or_default();
        if address.starts_with(':') {
            continue;
        }
        nodes.push(address.to_string());
    }
    nodes.sort();
    nodes.dedup();
    Ok(nodes)
}

fn split_address(node: &str) -> StoreResult<(String, u16)> {
    let (host, port) = node
        .rsplit_once(':')
        .ok_or_else(|| SessionError::StoreError(format!("invalid node address {:?}", node)))?;
    let port = port
        .parse::<u16>()
        .map_err(|_| SessionError::StoreError(format!("invalid node port in {:?}", node)))?;
    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODES: &str = "\
07c37dfeb235213a872192d90877d0cd55635b91 127.0.0.1:30004@31004,host-a slave e7d1eecce10fd6bb5eb35b9f99a514335d9ba9ca 0 1426238317239 4 connected
67ed2db8d677e59ec4a4cefb06858cf2a1a89fa1 127.0.0.1:30002@31002 master - 0 1426238316232 2 connected 5461-10922
292f8b365bb7edb5e285caf0b7e6ddc7265d2f4f 127.0.0.1:30003@31003 master - 0 1426238318243 3 connected 10923-16383
e7d1eecce10fd6bb5eb35b9f99a514335d9ba9ca 127.0.0.1:30001@31001 myself,master - 0 0 1 connected 0-5460
6ec23923021cf3ffec47632106199cb7f496ce01 127.0.0.1:30005@31005 master,fail - 1426238316232 0 5 disconnected
";

    #[test]
    fn test_parse_primaries() {
        let nodes = parse_primaries(NODES).unwrap();
        assert_eq!(
            nodes,
            vec!["127.0.0.1:30001", "127.0.0.1:30002", "127.0.0.1:30003"]
        );
    }

    #[test]
    fn test_parse_primaries_rejects_garbage() {
        assert!(parse_primaries("nonsense\n").is_err());
        assert!(parse_primaries("").unwrap().is_empty());
    }

    #[test]
    fn test_split_address() {
        assert_eq!(
            split_address("10.0.0.1:7000").unwrap(),
            ("10.0.0.1".to_string(), 7000)
        );
        assert!(split_address("10.0.0.1").is_err());
        assert!(split_address("10.0.0.1:port").is_err());
    }
}
