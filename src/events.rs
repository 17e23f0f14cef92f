//! Error listeners attached to a store

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::SessionError;

/// Callback invoked for every error a store operation surfaces
pub type ErrorListener = Arc<dyn Fn(&SessionError) + Send + Sync>;

/// Registry of error listeners.
///
/// Listeners fire in addition to the error being returned to the caller, so
/// code that only watches events still sees failures of operations whose
/// results were dropped.
#[derive(Clone, Default)]
pub struct ErrorEvents {
    listeners: Arc<RwLock<Vec<ErrorListener>>>,
}

impl ErrorEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn on_error<F>(&self, listener: F)
    where
        F: Fn(&SessionError) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Notify every listener
    pub fn emit(&self, err: &SessionError) {
        // Snapshot so a listener may register further listeners.
        let listeners: Vec<ErrorListener> = self.listeners.read().clone();
        for listener in listeners {
            listener(err);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl std::fmt::Debug for ErrorEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorEvents")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_emit_reaches_every_listener() {
        let events = ErrorEvents::new();
        let hits = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let hits = Arc::clone(&hits);
            events.on_error(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        events.emit(&SessionError::StoreError("down".into()));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(events.listener_count(), 2);
    }

    #[test]
    fn test_emit_without_listeners() {
        ErrorEvents::new().emit(&SessionError::StoreError("ignored".into()));
    }
}
