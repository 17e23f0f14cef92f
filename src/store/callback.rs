//! Callback-style invocation of store operations
//!
//! Each method spawns the matching [`SessionStore`] future on the Tokio
//! runtime and hands its result to an error-first callback. The operation
//! logic is not duplicated: errors have already been logged and emitted by
//! the store by the time the callback sees them.

use std::collections::HashMap;
use std::future::Future;
use tokio::task::JoinHandle;

use super::SessionStore;
use crate::error::StoreResult;
use crate::session::SessionData;

fn dispatch<T, Fut, F>(operation: Fut, callback: F) -> JoinHandle<()>
where
    T: Send + 'static,
    Fut: Future<Output = StoreResult<T>> + Send + 'static,
    F: FnOnce(StoreResult<T>) + Send + 'static,
{
    tokio::spawn(async move { callback(operation.await) })
}

/// Callback variants of every [`SessionStore`] operation.
///
/// Must be called from within a Tokio runtime. The returned handle can be
/// awaited to know the callback has run; dropping it does not cancel the
/// operation.
pub trait SessionStoreCallbackExt: SessionStore + Clone {
    fn get_with<F>(&self, sid: impl Into<String>, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(StoreResult<Option<SessionData>>) + Send + 'static,
    {
        let store = self.clone();
        let sid = sid.into();
        dispatch(async move { store.get(&sid).await }, callback)
    }

    fn set_with<F>(&self, sid: impl Into<String>, session: SessionData, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(StoreResult<()>) + Send + 'static,
    {
        let store = self.clone();
        let sid = sid.into();
        dispatch(async move { store.set(&sid, &session).await }, callback)
    }

    fn destroy_with<F>(&self, sid: impl Into<String>, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(StoreResult<()>) + Send + 'static,
    {
        let store = self.clone();
        let sid = sid.into();
        dispatch(async move { store.destroy(&sid).await }, callback)
    }

    fn touch_with<F>(&self, sid: impl Into<String>, session: SessionData, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(StoreResult<()>) + Send + 'static,
    {
        let store = self.clone();
        let sid = sid.into();
        dispatch(async move { store.touch(&sid, &session).await }, callback)
    }

    fn all_with<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(StoreResult<HashMap<String, SessionData>>) + Send + 'static,
    {
        let store = self.clone();
        dispatch(async move { store.all().await }, callback)
    }

    fn length_with<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(StoreResult<usize>) + Send + 'static,
    {
        let store = self.clone();
        dispatch(async move { store.length().await }, callback)
    }

    fn ids_with<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(StoreResult<Vec<String>>) + Send + 'static,
    {
        let store = self.clone();
        dispatch(async move { store.ids().await }, callback)
    }

    fn clear_with<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(StoreResult<()>) + Send + 'static,
    {
        let store = self.clone();
        dispatch(async move { store.clear().await }, callback)
    }

    fn load_with<F>(&self, sid: impl Into<String>, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(StoreResult<Option<SessionData>>) + Send + 'static,
    {
        let store = self.clone();
        let sid = sid.into();
        dispatch(async move { store.load(&sid).await }, callback)
    }
}

impl<S: SessionStore + Clone> SessionStoreCallbackExt for S {}
