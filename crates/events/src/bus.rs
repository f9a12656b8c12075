//! Change publishing/subscription abstraction (mechanics only).
//!
//! A store publishes one message per mutating call. Consumers either hold a
//! [`Subscription`] (channel-backed, polled at their own pace) or register an
//! [`Observer`] callback that runs synchronously on the publishing task.
//!
//! The bus is scoped to whoever owns it. There is no process-wide broadcast.

use std::sync::Arc;
use std::sync::mpsc::Receiver;

/// A subscription to a change stream.
///
/// Each subscription receives a copy of every message published after it was
/// created. Dropping it unsubscribes; the bus prunes the dead sender on the
/// next publish.
///
/// ```ignore
/// let subscription = bus.subscribe();
/// while let Ok(notice) = subscription.try_recv() {
///     refresh(notice);
/// }
/// ```
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain every message that is already queued.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Handle returned by [`ChangeBus::observe`], used to unregister a callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u64);

/// Callback invoked for every published message.
pub type Observer<M> = Arc<dyn Fn(&M) + Send + Sync>;

/// Publish/subscribe contract for change notices.
///
/// Implementations must be `Send + Sync`; the owning store may publish from
/// any task.
pub trait ChangeBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    /// Deliver `message` to every live subscription and observer.
    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;

    /// Register a callback. Returns an id for [`ChangeBus::unobserve`].
    fn observe(&self, observer: Observer<M>) -> ObserverId;

    /// Unregister a callback. Returns `false` if the id was unknown.
    fn unobserve(&self, id: ObserverId) -> bool;
}

impl<M, B> ChangeBus<M> for Arc<B>
where
    B: ChangeBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }

    fn observe(&self, observer: Observer<M>) -> ObserverId {
        (**self).observe(observer)
    }

    fn unobserve(&self, id: ObserverId) -> bool {
        (**self).unobserve(id)
    }
}
