//! Session store implementations

mod callback;
mod redis_store;
mod traits;

pub use callback::SessionStoreCallbackExt;
pub use redis_store::RedisStore;
pub use traits::SessionStore;
