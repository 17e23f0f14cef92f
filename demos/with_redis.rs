//! Redis session store example compatible with connect-redis
//!
//! Writes a few sessions the way connect-redis would, lists them, and clears
//! them again. Sessions written here can be read by a Node.js application
//! using express-session + connect-redis with the same prefix, and vice versa.
//!
//! Run with: cargo run --example with_redis
//! Set REDIS_URL to point at another server (default: redis://127.0.0.1/).

use connect_session_redis::{
    RedisStore, SessionCookie, SessionData, SessionStore, SessionStoreCallbackExt, StoreConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let redis_url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());
    let store = RedisStore::from_url(
        &redis_url,
        StoreConfig::new().with_prefix("demo:").with_scan_count(50),
    )
    .await?;

    store.on_error(|err| eprintln!("store error event: {}", err));

    for (sid, user) in [("alice-session", "alice"), ("bob-session", "bob")] {
        let mut session = SessionData::new(SessionCookie::with_max_age(3_600_000));
        session.set("user", user);
        store.set(sid, &session).await?;
    }

    println!("sessions stored: {}", store.length().await?);
    for (sid, session) in store.all().await? {
        println!(
            "  {} -> user={:?}",
            sid,
            session.get::<String>("user").unwrap_or_default()
        );
    }

    // Callback style, as a Node.js caller would write it
    store
        .ids_with(|result| match result {
            Ok(ids) => println!("ids via callback: {:?}", ids),
            Err(err) => eprintln!("ids failed: {}", err),
        })
        .await?;

    // Rejected before reaching Redis; also reported to the error listener
    if let Err(err) = store.get("bad\nid").await {
        println!("invalid session id rejected: {}", err);
    }

    store.clear().await?;
    println!("after clear: {}", store.length().await?);
    Ok(())
}
