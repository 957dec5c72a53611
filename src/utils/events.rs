use std::sync::{Arc, Mutex, Weak};

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Listeners<E> {
    next_id: u64,
    entries: Vec<(u64, Handler<E>)>,
}

/// A broadcast point for UI events. Clones share the same listener list.
///
/// Listeners are only reachable through the [`Subscription`] returned by
/// [`EventBus::subscribe`]; dropping it deregisters the listener.
pub struct EventBus<E> {
    inner: Arc<Mutex<Listeners<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        EventBus {
            inner: self.inner.clone(),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        EventBus {
            inner: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`. It runs on every `emit` until the returned guard is dropped.
    #[must_use = "dropping the subscription immediately deregisters the handler"]
    pub fn subscribe<F>(&self, handler: F) -> Subscription<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let mut listeners = lock(&self.inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(handler)));
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Dispatch to the handlers registered when the call starts. The list is
    /// unlocked during dispatch, so a handler may subscribe, unsubscribe or emit.
    pub fn emit(&self, event: &E) {
        let handlers: Vec<Handler<E>> = lock(&self.inner)
            .entries
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner).entries.len()
    }
}

/// Guard for a registered handler. Deregisters on drop.
pub struct Subscription<E> {
    id: u64,
    bus: Weak<Mutex<Listeners<E>>>,
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        if let Some(inner) = self.bus.upgrade() {
            lock(&inner).entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl<E> std::fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

// A handler that panicked leaves the list itself intact, so a poisoned lock is still usable.
fn lock<E>(inner: &Mutex<Listeners<E>>) -> std::sync::MutexGuard<'_, Listeners<E>> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
