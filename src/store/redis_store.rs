//! Session store compatible with connect-redis
//!
//! This store uses the same storage format as connect-redis:
//! - Key: `prefix + session_id` (default prefix: "sess:")
//! - Value: JSON serialized session data (or the configured serializer)
//! - TTL: Based on session cookie expiration, falling back to the configured TTL

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::SessionStore;
use crate::client::KvClient;
use crate::config::StoreConfig;
use crate::error::{SessionError, StoreResult};
use crate::events::ErrorEvents;
use crate::key::KeyCodec;
use crate::scan::ScanEngine;
use crate::session::SessionData;
use crate::ttl::TtlCalculator;

struct Inner<C> {
    client: C,
    config: StoreConfig,
    keys: KeyCodec,
    ttl: TtlCalculator,
    events: ErrorEvents,
}

/// Session store compatible with connect-redis
///
/// This store uses the same format as the Node.js connect-redis package,
/// allowing seamless session sharing between Rust and Node.js applications.
/// It runs on any [`KvClient`]: a single Redis node, a Redis Cluster, or the
/// in-memory client.
///
/// Every failure is logged (when `log_errors` is set), passed to the
/// listeners registered with [`RedisStore::on_error`], and returned to the
/// caller. Both channels fire for the same error.
///
/// # Example
///
/// ```rust,ignore
/// use connect_session_redis::{RedisClient, RedisStore, StoreConfig};
///
/// let client = RedisClient::from_url("redis://127.0.0.1/").await?;
/// let store = RedisStore::new(client, StoreConfig::new().with_prefix("myapp:"));
/// ```
pub struct RedisStore<C> {
    inner: Arc<Inner<C>>,
}

impl<C: KvClient> RedisStore<C> {
    /// Create a store over a caller-owned client
    pub fn new(client: C, config: StoreConfig) -> Self {
        let keys = KeyCodec::new(config.prefix.clone());
        let ttl = TtlCalculator::from_config(&config);
        Self {
            inner: Arc::new(Inner {
                client,
                config,
                keys,
                ttl,
                events: ErrorEvents::new(),
            }),
        }
    }

    /// The underlying client
    pub fn client(&self) -> &C {
        &self.inner.client
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Register a listener for every error this store surfaces
    pub fn on_error<F>(&self, listener: F)
    where
        F: Fn(&SessionError) + Send + Sync + 'static,
    {
        self.inner.events.on_error(listener);
    }

    /// TTL a record would be stored with right now; `None` when TTLs are
    /// disabled
    pub fn ttl_for(&self, session: &SessionData) -> Option<i64> {
        self.inner.ttl.ttl(session)
    }

    fn scanner(&self) -> ScanEngine<'_, C> {
        ScanEngine::new(&self.inner.client, self.inner.config.scan_count)
    }

    /// Single exit point for every operation result
    fn report<T>(&self, operation: &'static str, result: StoreResult<T>) -> StoreResult<T> {
        if let Err(err) = &result {
            if self.inner.config.log_errors {
                tracing::error!(operation, error = %err, "session store operation failed");
            }
            self.inner.events.emit(err);
        }
        result
    }

    async fn get_record(&self, sid: &str) -> StoreResult<Option<SessionData>> {
        let key = self.inner.keys.key(sid)?;
        match self.inner.client.get(&key).await? {
            Some(raw) => Ok(Some(self.inner.config.serializer.decode(&raw).await?)),
            None => Ok(None),
        }
    }

    async fn set_record(&self, sid: &str, session: &SessionData) -> StoreResult<()> {
        let key = self.inner.keys.key(sid)?;
        match self.inner.ttl.ttl(session) {
            // Already expired: make sure no live copy remains
            Some(ttl) if ttl <= 0 => {
                tracing::debug!(sid, ttl, "session expired on write, deleting");
                self.inner.client.del(&[key]).await?;
            }
            ttl => {
                let value = self.inner.config.serializer.encode(session)?;
                let ttl = ttl.map(|secs| secs as u64);
                self.inner.client.set(&key, &value, ttl).await?;
            }
        }
        Ok(())
    }

    async fn destroy_record(&self, sid: &str) -> StoreResult<()> {
        let key = self.inner.keys.key(sid)?;
        self.inner.client.del(&[key]).await?;
        Ok(())
    }

    async fn touch_record(&self, sid: &str, session: &SessionData) -> StoreResult<()> {
        let key = self.inner.keys.key(sid)?;
        if self.inner.config.disable_touch {
            return Ok(());
        }
        let Some(ttl) = self.inner.ttl.ttl(session) else {
            return Ok(());
        };
        // A missing key is fine; connect-redis ignores EXPIRE's reply too.
        self.inner.client.expire(&key, ttl).await?;
        Ok(())
    }

    async fn scan_all_keys(&self) -> StoreResult<Vec<String>> {
        self.scanner()
            .scan_keys(&self.inner.keys.scan_pattern())
            .await
    }

    async fn all_records(&self) -> StoreResult<HashMap<String, SessionData>> {
        let pattern = self.inner.keys.scan_pattern();
        let init = HashMap::<String, SessionData>::new();
        self.scanner()
            .scan_and_process_keys(&pattern, init, |mut sessions, keys| async move {
                let values = self.inner.client.mget(&keys).await?;
                for (key, raw) in keys.iter().zip(values) {
                    // Expired or deleted between SCAN and MGET
                    let Some(raw) = raw else { continue };
                    match self.inner.config.serializer.decode(&raw).await {
                        Ok(session) => {
                            sessions.insert(self.inner.keys.sid_of(key).to_string(), session);
                        }
                        Err(err) => {
                            if self.inner.config.log_errors {
                                tracing::warn!(key = %key, error = %err, "skipping unreadable session");
                            }
                        }
                    }
                }
                Ok(sessions)
            })
            .await
    }

    async fn clear_records(&self) -> StoreResult<()> {
        let keys = self.scan_all_keys().await?;
        if keys.is_empty() {
            return Ok(());
        }
        self.inner.client.del(&keys).await?;
        Ok(())
    }
}

#[cfg(feature = "redis-store")]
impl RedisStore<crate::client::RedisClient> {
    /// Create a store from a Redis connection string
    pub async fn from_url(url: &str, config: StoreConfig) -> Result<Self, SessionError> {
        let client = crate::client::RedisClient::from_url(url).await?;
        Ok(Self::new(client, config))
    }
}

#[cfg(feature = "redis-cluster")]
impl RedisStore<crate::client::RedisClusterClient> {
    /// Create a store over a Redis Cluster, given seed node URLs
    pub async fn cluster<I, S>(urls: I, config: StoreConfig) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let client = crate::client::RedisClusterClient::from_urls(urls).await?;
        Ok(Self::new(client, config))
    }
}

impl<C> Clone for RedisStore<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> std::fmt::Debug for RedisStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("config", &self.inner.config)
            .field("events", &self.inner.events)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C: KvClient> SessionStore for RedisStore<C> {
    async fn get(&self, sid: &str) -> StoreResult<Option<SessionData>> {
        self.report("get", self.get_record(sid).await)
    }

    async fn set(&self, sid: &str, session: &SessionData) -> StoreResult<()> {
        self.report("set", self.set_record(sid, session).await)
    }

    async fn destroy(&self, sid: &str) -> StoreResult<()> {
        self.report("destroy", self.destroy_record(sid).await)
    }

    async fn touch(&self, sid: &str, session: &SessionData) -> StoreResult<()> {
        self.report("touch", self.touch_record(sid, session).await)
    }

    async fn all(&self) -> StoreResult<HashMap<String, SessionData>> {
        self.report("all", self.all_records().await)
    }

    async fn length(&self) -> StoreResult<usize> {
        let result = self.scan_all_keys().await.map(|keys| keys.len());
        self.report("length", result)
    }

    async fn ids(&self) -> StoreResult<Vec<String>> {
        let result = self.scan_all_keys().await.map(|keys| {
            keys.iter()
                .map(|key| self.inner.keys.sid_of(key).to_string())
                .collect()
        });
        self.report("ids", result)
    }

    async fn clear(&self) -> StoreResult<()> {
        self.report("clear", self.clear_records().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryClient;
    use crate::error::ErrorKind;
    use crate::serializer::Serializer;
    use crate::session::SessionCookie;
    use crate::store::SessionStoreCallbackExt;
    use chrono::{Duration, Utc};
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;
    use tokio_test::{assert_err, assert_ok};

    fn store_with(client: &MemoryClient, config: StoreConfig) -> RedisStore<MemoryClient> {
        RedisStore::new(client.clone(), config)
    }

    fn record(value: serde_json::Value) -> SessionData {
        serde_json::from_value(value).unwrap()
    }

    fn count_errors(store: &RedisStore<MemoryClient>) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        store.on_error(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[tokio::test]
    async fn test_prefixed_round_trip_with_default_ttl() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new().with_prefix("t:").with_ttl(86400));

        let session = record(json!({"foo": "bar", "cookie": {}}));
        store.set("123", &session).await.unwrap();

        let loaded = store.get("123").await.unwrap();
        assert_eq!(loaded, Some(session));

        let ttl = client.ttl_of("t:123").unwrap();
        assert!((86399..=86400).contains(&ttl), "ttl was {}", ttl);
    }

    #[tokio::test]
    async fn test_destroy() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new());

        let session = record(json!({"user": "alice", "cookie": {}}));
        store.set("abc", &session).await.unwrap();
        store.destroy("abc").await.unwrap();
        assert_eq!(store.get("abc").await.unwrap(), None);

        // Destroying again is not an error
        assert_ok!(store.destroy("abc").await);
        assert_ok!(store.destroy("never-existed").await);
    }

    #[tokio::test]
    async fn test_expired_cookie_deletes_instead_of_writing() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new());

        let live = SessionData::new(SessionCookie::expiring_at(Utc::now() + Duration::hours(1)));
        store.set("s1", &live).await.unwrap();
        assert!(client.ttl_of("sess:s1").is_some());

        let expired = SessionData::new(SessionCookie::expiring_at(Utc::now() - Duration::hours(1)));
        store.set("s1", &expired).await.unwrap();
        assert_eq!(store.get("s1").await.unwrap(), None);
        assert_eq!(client.ttl_of("sess:s1"), None);
    }

    #[tokio::test]
    async fn test_non_positive_max_age_deletes() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new());

        store.set("s1", &SessionData::default()).await.unwrap();
        store
            .set("s1", &SessionData::new(SessionCookie::with_max_age(500)))
            .await
            .unwrap();
        assert!(client.is_empty());
    }

    #[tokio::test]
    async fn test_cookie_expiry_drives_key_ttl() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new());

        let session = SessionData::new(SessionCookie::expiring_at(
            Utc::now() + Duration::seconds(600),
        ));
        store.set("s1", &session).await.unwrap();
        let ttl = client.ttl_of("sess:s1").unwrap();
        assert!((598..=600).contains(&ttl), "ttl was {}", ttl);
    }

    #[tokio::test]
    async fn test_disable_ttl_stores_without_expiry() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new().with_disable_ttl(true));

        let expired = SessionData::new(SessionCookie::expiring_at(Utc::now() - Duration::hours(1)));
        store.set("s1", &expired).await.unwrap();
        assert_eq!(client.ttl_of("sess:s1"), Some(-1));
        assert_eq!(store.get("s1").await.unwrap(), Some(expired.clone()));

        // Touch does nothing without TTLs
        let calls = client.calls();
        store.touch("s1", &expired).await.unwrap();
        assert_eq!(client.calls(), calls);
    }

    #[tokio::test]
    async fn test_touch_resets_expiry_only() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new().with_ttl(100));

        let session = record(json!({"n": 1, "cookie": {}}));
        store.set("s1", &session).await.unwrap();

        let touched = record(json!({"n": 2, "cookie": {"maxAge": 500000}}));
        store.touch("s1", &touched).await.unwrap();

        let ttl = client.ttl_of("sess:s1").unwrap();
        assert!((499..=500).contains(&ttl), "ttl was {}", ttl);
        assert_eq!(store.get("s1").await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_disable_touch() {
        let client = MemoryClient::new();
        let store = store_with(
            &client,
            StoreConfig::new().with_ttl(100).with_disable_touch(true),
        );

        store.set("s1", &SessionData::default()).await.unwrap();
        let calls = client.calls();
        store
            .touch("s1", &SessionData::new(SessionCookie::with_max_age(500_000)))
            .await
            .unwrap();
        assert_eq!(client.calls(), calls);
        assert!(client.ttl_of("sess:s1").unwrap() <= 100);
    }

    #[tokio::test]
    async fn test_ttl_fn_fallback() {
        let client = MemoryClient::new();
        let store = store_with(
            &client,
            StoreConfig::new().with_ttl_fn(|session| session.get::<i64>("ttl").unwrap_or(0)),
        );

        store.set("keep", &record(json!({"ttl": 30}))).await.unwrap();
        store.set("drop", &record(json!({"ttl": 0}))).await.unwrap();

        let ttl = client.ttl_of("sess:keep").unwrap();
        assert!((29..=30).contains(&ttl));
        assert_eq!(client.ttl_of("sess:drop"), None);
        assert_eq!(store.ttl_for(&record(json!({"ttl": 7}))), Some(7));
    }

    async fn check_enumeration(client: MemoryClient) {
        let store = store_with(&client, StoreConfig::new().with_scan_count(3));
        client.insert_raw("other:1", "{}");

        let sids: HashSet<String> = (0..25).map(|_| uuid::Uuid::new_v4().to_string()).collect();
        for sid in &sids {
            let mut session = SessionData::default();
            session.set("sid", sid);
            store.set(sid, &session).await.unwrap();
        }

        assert_eq!(store.length().await.unwrap(), sids.len());

        let ids: HashSet<String> = store.ids().await.unwrap().into_iter().collect();
        assert_eq!(ids, sids);

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), sids.len());
        for (sid, session) in &all {
            assert_eq!(session.get::<String>("sid").as_ref(), Some(sid));
        }

        store.clear().await.unwrap();
        assert_eq!(store.length().await.unwrap(), 0);
        assert!(store.all().await.unwrap().is_empty());
        assert_eq!(client.len(), 1, "keys outside the prefix survive clear");
    }

    #[tokio::test]
    async fn test_enumeration_single_node() {
        check_enumeration(MemoryClient::new()).await;
    }

    #[tokio::test]
    async fn test_enumeration_sharded() {
        check_enumeration(MemoryClient::sharded(4)).await;
    }

    #[tokio::test]
    async fn test_clear_on_empty_store_issues_no_delete() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new());

        store.clear().await.unwrap();
        // A single SCAN step, no DEL
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_stores_with_disjoint_prefixes_share_a_client() {
        let client = MemoryClient::new();
        let a = store_with(&client, StoreConfig::new().with_prefix("a:"));
        let b = store_with(&client, StoreConfig::new().with_prefix("b:"));

        a.set("1", &SessionData::default()).await.unwrap();
        b.set("1", &SessionData::default()).await.unwrap();
        b.set("2", &SessionData::default()).await.unwrap();

        a.clear().await.unwrap();
        assert_eq!(a.length().await.unwrap(), 0);
        assert_eq!(b.length().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_all_skips_unreadable_entries() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new());
        let errors = count_errors(&store);

        store.set("good", &record(json!({"ok": true}))).await.unwrap();
        client.insert_raw("sess:bad", "{not json");

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all.contains_key("good"));
        assert_eq!(errors.load(Ordering::SeqCst), 0);

        // The corrupt entry still counts as a key
        assert_eq!(store.length().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_null_cookie_is_a_readable_record() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new());
        let errors = count_errors(&store);

        client.insert_raw("sess:n", r#"{"foo":1,"cookie":null}"#);

        let session = store.get("n").await.unwrap().unwrap();
        assert_eq!(session.get::<i32>("foo"), Some(1));
        assert_eq!(session.cookie, SessionCookie::default());

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.get("n"), Some(&session));
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_get_reports_unreadable_entry() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new().with_log_errors(false));
        let errors = count_errors(&store);

        client.insert_raw("sess:bad", "{not json");
        let err = store.get("bad").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_ids_do_no_io() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new());
        let errors = count_errors(&store);

        let long = "a".repeat(256);
        for sid in ["", long.as_str(), "bad\0id", "bad\nid"] {
            let err = store.get(sid).await.unwrap_err();
            assert!(err.is_validation());
            assert_err!(store.set(sid, &SessionData::default()).await);
            assert_err!(store.destroy(sid).await);
            assert_err!(store.touch(sid, &SessionData::default()).await);
            assert_err!(store.load(sid).await);
        }

        assert_eq!(client.calls(), 0);
        assert_eq!(errors.load(Ordering::SeqCst), 20);
    }

    #[tokio::test]
    async fn test_client_failure_is_returned_and_emitted() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new());
        let errors = count_errors(&store);

        client.set_failing(true);
        assert_eq!(store.get("s1").await.unwrap_err().kind(), ErrorKind::Store);
        assert_err!(store.set("s1", &SessionData::default()).await);
        assert_err!(store.all().await);
        assert_err!(store.clear().await);
        assert_eq!(errors.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_load_is_get() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new());

        let session = record(json!({"user": "bob"}));
        store.set("s1", &session).await.unwrap();
        assert_eq!(store.load("s1").await.unwrap(), Some(session));
        assert_eq!(store.load("missing").await.unwrap(), None);
    }

    /// Callback that forwards its result to the returned receiver
    fn capture<T: Send + 'static>() -> (
        impl FnOnce(StoreResult<T>) + Send + 'static,
        oneshot::Receiver<StoreResult<T>>,
    ) {
        let (tx, rx) = oneshot::channel();
        (
            move |result: StoreResult<T>| {
                let _ = tx.send(result);
            },
            rx,
        )
    }

    #[tokio::test]
    async fn test_callback_matches_deferred_result() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new().with_ttl(60));
        let session = record(json!({"foo": "bar", "cookie": {}}));

        let (cb, rx) = capture::<()>();
        store.set_with("cb", session.clone(), cb).await.unwrap();
        assert_ok!(rx.await.unwrap());

        let (cb, rx) = capture::<Option<SessionData>>();
        store.get_with("cb", cb);
        let from_callback = rx.await.unwrap().unwrap();
        assert_eq!(from_callback, store.get("cb").await.unwrap());
        assert_eq!(from_callback, Some(session.clone()));

        let (cb, rx) = capture::<Option<SessionData>>();
        store.load_with("cb", cb);
        assert_eq!(rx.await.unwrap().unwrap(), store.load("cb").await.unwrap());

        client.expire("sess:cb", 5).await.unwrap();
        let (cb, rx) = capture::<()>();
        store.touch_with("cb", session.clone(), cb);
        assert_ok!(rx.await.unwrap());
        let ttl = client.ttl_of("sess:cb").unwrap();
        assert!((59..=60).contains(&ttl), "ttl was {}", ttl);
        assert_ok!(store.touch("cb", &session).await);

        let (cb, rx) = capture::<HashMap<String, SessionData>>();
        store.all_with(cb);
        let all = rx.await.unwrap().unwrap();
        assert_eq!(all, store.all().await.unwrap());
        assert_eq!(all.get("cb"), Some(&session));

        let (cb, rx) = capture::<usize>();
        store.length_with(cb);
        assert_eq!(rx.await.unwrap().unwrap(), store.length().await.unwrap());

        let (cb, rx) = capture::<Vec<String>>();
        store.ids_with(cb);
        assert_eq!(rx.await.unwrap().unwrap(), store.ids().await.unwrap());

        let (cb, rx) = capture::<()>();
        store.destroy_with("cb", cb);
        assert_ok!(rx.await.unwrap());
        assert_eq!(store.get("cb").await.unwrap(), None);
        assert_ok!(store.destroy("cb").await);

        store.set("a", &session).await.unwrap();
        store.set("b", &session).await.unwrap();
        let (cb, rx) = capture::<()>();
        store.clear_with(cb);
        assert_ok!(rx.await.unwrap());
        assert_eq!(store.length().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_callback_errors_match_and_emit() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new().with_log_errors(false));
        let errors = count_errors(&store);

        let (cb, rx) = capture::<Option<SessionData>>();
        store.get_with("", cb).await.unwrap();
        let callback_err = rx.await.unwrap().unwrap_err();
        let deferred_err = store.get("").await.unwrap_err();
        assert_eq!(callback_err.kind(), deferred_err.kind());
        assert_eq!(errors.load(Ordering::SeqCst), 2);

        let (cb, rx) = capture::<()>();
        store.touch_with("bad\nid", SessionData::default(), cb);
        let callback_err = rx.await.unwrap().unwrap_err();
        let deferred_err = store.touch("bad\nid", &SessionData::default()).await.unwrap_err();
        assert!(callback_err.is_validation());
        assert_eq!(callback_err.kind(), deferred_err.kind());
        assert_eq!(errors.load(Ordering::SeqCst), 4);
        assert_eq!(client.calls(), 0);

        client.set_failing(true);
        let (cb, rx) = capture::<HashMap<String, SessionData>>();
        store.all_with(cb);
        let callback_err = rx.await.unwrap().unwrap_err();
        let deferred_err = store.all().await.unwrap_err();
        assert_eq!(callback_err.kind(), ErrorKind::Store);
        assert_eq!(callback_err.kind(), deferred_err.kind());
        assert_eq!(errors.load(Ordering::SeqCst), 6);

        let (cb, rx) = capture::<()>();
        store.clear_with(cb).await.unwrap();
        assert_eq!(rx.await.unwrap().unwrap_err().kind(), ErrorKind::Store);
        assert_eq!(errors.load(Ordering::SeqCst), 7);
    }

    /// Stores records as reversed JSON and yields before decoding
    struct ReversedJson;

    #[async_trait]
    impl Serializer for ReversedJson {
        fn encode(&self, record: &SessionData) -> Result<String, SessionError> {
            Ok(serde_json::to_string(record)?.chars().rev().collect())
        }

        async fn decode(&self, raw: &str) -> Result<SessionData, SessionError> {
            tokio::task::yield_now().await;
            let json: String = raw.chars().rev().collect();
            Ok(serde_json::from_str(&json)?)
        }
    }

    #[tokio::test]
    async fn test_custom_serializer() {
        let client = MemoryClient::new();
        let store = store_with(&client, StoreConfig::new().with_serializer(ReversedJson));

        let session = record(json!({"user": "carol", "cookie": {}}));
        store.set("s1", &session).await.unwrap();

        let raw = client.get("sess:s1").await.unwrap().unwrap();
        assert!(raw.starts_with('}'));
        assert_eq!(store.get("s1").await.unwrap(), Some(session.clone()));
        assert_eq!(store.all().await.unwrap().get("s1"), Some(&session));
    }

    #[cfg(feature = "redis-store")]
    #[tokio::test]
    #[ignore]
    async fn test_redis_store_basic() {
        // Requires a running Redis instance
        let store = RedisStore::from_url(
            "redis://127.0.0.1/",
            StoreConfig::new().with_prefix("connect-session-redis-test:"),
        )
        .await
        .unwrap();
        store.clear().await.unwrap();

        let mut data = SessionData::new(SessionCookie::with_max_age(3_600_000));
        data.set("user", "alice");

        store.set("test-id", &data).await.unwrap();
        let retrieved = store.get("test-id").await.unwrap().unwrap();
        assert_eq!(retrieved.get::<String>("user"), Some("alice".to_string()));

        store.touch("test-id", &data).await.unwrap();
        assert_eq!(store.length().await.unwrap(), 1);
        assert_eq!(store.ids().await.unwrap(), vec!["test-id".to_string()]);

        store.destroy("test-id").await.unwrap();
        assert!(store.get("test-id").await.unwrap().is_none());
    }
}
