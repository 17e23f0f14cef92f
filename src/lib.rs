//! # connect-session-redis
//!
//! connect-redis compatible session store for Rust.
//!
//! Sessions are stored under the same key layout, value format and TTL rules
//! as Node.js connect-redis, so Rust and Node.js services can share one
//! session database.
//!
//! ## Features
//!
//! - **Connect-redis compatible storage**: `prefix + sid` keys, JSON values, TTL from the session cookie
//! - **Non-blocking enumeration**: `all`, `ids`, `length` and `clear` walk the keyspace with SCAN
//! - **Single node or cluster**: cluster scans visit every primary before finishing
//! - **Async or callback**: every operation is an async method, with callback variants on top
//! - **Error events**: listeners see every failure, whichever way the operation was called
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use connect_session_redis::{RedisStore, SessionData, SessionStore, StoreConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = RedisStore::from_url(
//!         "redis://127.0.0.1/",
//!         StoreConfig::new().with_prefix("myapp:").with_ttl(3600),
//!     )
//!     .await?;
//!
//!     store.on_error(|err| eprintln!("session store error: {}", err));
//!
//!     let mut session = SessionData::default();
//!     session.set("views", 1);
//!     store.set("some-session-id", &session).await?;
//!
//!     let loaded = store.get("some-session-id").await?;
//!     assert_eq!(loaded, Some(session));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod key;
pub mod scan;
pub mod serializer;
pub mod session;
pub mod store;
pub mod ttl;

pub use client::{KvClient, MemoryClient, Topology};
pub use config::{StoreConfig, Ttl};
pub use error::{ErrorKind, SessionError, StoreResult};
pub use key::KeyCodec;
pub use scan::{ScanCursor, ScanEngine, ShardedCursor};
pub use serializer::{JsonSerializer, Serializer};
pub use session::{SessionCookie, SessionData};
pub use store::{RedisStore, SessionStore, SessionStoreCallbackExt};
pub use ttl::TtlCalculator;

#[cfg(feature = "redis-store")]
pub use client::RedisClient;

#[cfg(feature = "redis-cluster")]
pub use client::RedisClusterClient;
