//! In-process change bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, mpsc};

use thiserror::Error;

use crate::bus::{ChangeBus, Observer, ObserverId, Subscription};

#[derive(Debug, Error)]
pub enum InMemoryBusError {
    /// Publish failed due to internal lock poisoning.
    #[error("change bus lock poisoned")]
    Poisoned,
}

/// In-memory pub/sub bus.
///
/// - No IO / no async
/// - Fan-out to channel subscriptions first, then observer callbacks
/// - Observers run outside the lock, so a callback may subscribe or unobserve
pub struct InMemoryChangeBus<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
    observers: Mutex<Vec<(ObserverId, Observer<M>)>>,
    next_observer: AtomicU64,
}

impl<M> InMemoryChangeBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered observer callbacks.
    pub fn observer_count(&self) -> usize {
        self.observers.lock().map(|o| o.len()).unwrap_or(0)
    }
}

impl<M> Default for InMemoryChangeBus<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            observers: Mutex::new(Vec::new()),
            next_observer: AtomicU64::new(1),
        }
    }
}

impl<M> core::fmt::Debug for InMemoryChangeBus<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryChangeBus")
            .field("observers", &self.observer_count())
            .finish_non_exhaustive()
    }
}

impl<M> ChangeBus<M> for InMemoryChangeBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        {
            let mut subs = self
                .subscribers
                .lock()
                .map_err(|_| InMemoryBusError::Poisoned)?;

            // Drop any dead subscribers while publishing.
            subs.retain(|tx| tx.send(message.clone()).is_ok());
        }

        let observers: Vec<Observer<M>> = self
            .observers
            .lock()
            .map_err(|_| InMemoryBusError::Poisoned)?
            .iter()
            .map(|(_, cb)| cb.clone())
            .collect();

        tracing::trace!(observers = observers.len(), "publishing change notice");
        for observer in observers {
            observer(&message);
        }

        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // A poisoned lock still yields a subscription; it just never receives.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }

    fn observe(&self, observer: Observer<M>) -> ObserverId {
        let id = ObserverId(self.next_observer.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut observers) = self.observers.lock() {
            observers.push((id, observer));
        }
        id
    }

    fn unobserve(&self, id: ObserverId) -> bool {
        match self.observers.lock() {
            Ok(mut observers) => {
                let before = observers.len();
                observers.retain(|(existing, _)| *existing != id);
                observers.len() != before
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn every_subscription_gets_a_copy() {
        let bus = InMemoryChangeBus::<u32>::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(7).unwrap();

        assert_eq!(a.try_recv().unwrap(), 7);
        assert_eq!(b.try_recv().unwrap(), 7);
        assert!(a.try_recv().is_err());
    }

    #[test]
    fn dropped_subscription_is_pruned() {
        let bus = InMemoryChangeBus::<u32>::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(1).unwrap();
        bus.publish(2).unwrap();

        assert_eq!(kept.drain(), vec![1, 2]);
        assert_eq!(bus.subscribers.lock().unwrap().len(), 1);
    }

    #[test]
    fn observers_fire_until_unobserved() {
        let bus = InMemoryChangeBus::<u32>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        let observer: Observer<u32> = Arc::new(move |_msg: &u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let id = bus.observe(observer);

        bus.publish(1).unwrap();
        assert!(bus.unobserve(id));
        bus.publish(2).unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!bus.unobserve(id));
        assert_eq!(bus.observer_count(), 0);
    }

    #[test]
    fn observer_may_touch_the_bus_while_handling() {
        let bus = Arc::new(InMemoryChangeBus::<u32>::new());
        let inner = bus.clone();

        let observer: Observer<u32> = Arc::new(move |_msg: &u32| {
            // Would deadlock if callbacks ran under the observer lock.
            let _ = inner.observer_count();
        });
        bus.observe(observer);

        bus.publish(3).unwrap();
    }
}
