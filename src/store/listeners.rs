//! Change listeners and the handles that remove them.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tracing::error;

type Callback = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Registered callbacks, keyed by registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<BTreeMap<u64, Callback>>,
}

/// Outcome of one notification round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

impl Listeners {
    pub(crate) fn register<F>(self: &Arc<Self>, callback: F) -> Subscription
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(id, Arc::new(callback));
        Subscription {
            id,
            registry: Arc::downgrade(self),
        }
    }

    fn remove(&self, id: u64) -> bool {
        self.lock().remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    /// Call every listener once. A listener that errors or panics is logged
    /// and skipped; the rest still run.
    pub(crate) fn notify(&self) -> Delivery {
        // callbacks may subscribe or unsubscribe, so run them unlocked
        let callbacks: Vec<(u64, Callback)> = self
            .lock()
            .iter()
            .map(|(id, cb)| (*id, Arc::clone(cb)))
            .collect();

        let mut delivery = Delivery::default();
        for (id, callback) in callbacks {
            match catch_unwind(AssertUnwindSafe(|| callback())) {
                Ok(Ok(())) => delivery.delivered += 1,
                Ok(Err(e)) => {
                    delivery.failed += 1;
                    error!(listener = id, error = %e, "Change listener failed");
                }
                Err(panic) => {
                    delivery.failed += 1;
                    error!(
                        listener = id,
                        panic = panic_message(panic.as_ref()),
                        "Change listener panicked"
                    );
                }
            }
        }
        delivery
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<u64, Callback>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// Handle returned by `CollectionStore::subscribe`.
///
/// Dropping it keeps the listener registered; call `unsubscribe` to stop
/// notifications. Calling it more than once is harmless.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<Listeners>,
}

impl Subscription {
    /// Returns true if this call removed the listener.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(listeners) => listeners.remove(self.id),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|listeners| listeners.lock().contains_key(&self.id))
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter(listeners: &Arc<Listeners>) -> (Arc<AtomicUsize>, Subscription) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let sub = listeners.register(move || {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        (hits, sub)
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let listeners = Arc::new(Listeners::default());
        let (hits, sub) = counter(&listeners);

        assert!(sub.is_active());
        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert!(!sub.clone().unsubscribe());

        listeners.notify();
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn failing_listeners_do_not_block_others() {
        let listeners = Arc::new(Listeners::default());
        let _err = listeners.register(|| Err(anyhow::anyhow!("render failed")));
        let _panic = listeners.register(|| panic!("listener blew up"));
        let (hits, _sub) = counter(&listeners);

        let delivery = listeners.notify();

        assert_eq!(delivery, Delivery { delivered: 1, failed: 2 });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_notify() {
        let listeners = Arc::new(Listeners::default());
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);
        let sub = listeners.register(move || {
            if let Some(sub) = inner.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
            Ok(())
        });
        *slot.lock().unwrap() = Some(sub);

        assert_eq!(listeners.notify().delivered, 1);
        assert_eq!(listeners.notify().delivered, 0);
    }

    #[test]
    fn handle_outliving_registry_is_inert() {
        let listeners = Arc::new(Listeners::default());
        let (_hits, sub) = counter(&listeners);
        drop(listeners);

        assert!(!sub.is_active());
        assert!(!sub.unsubscribe());
    }
}
