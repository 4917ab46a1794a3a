use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// A safe default for the notification buffer. Form edits arrive one at a
/// time from the UI event loop, so 128 leaves plenty of slack.
const DEFAULT_CAPACITY: usize = 128;

/// Marker trait for types that can be carried across a [`ChangeBus`].
///
/// Any type that is `Send + Sync + 'static` automatically implements it.
pub trait Event: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Event for T {}

/// A typed broadcast bus for model change notifications.
///
/// Publishing is synchronous and never blocks; subscribers observe events
/// in publish order. Events published while nobody listens are dropped,
/// which is the correct behavior for notifications about state that can be
/// re-read from the model at any time.
#[derive(Debug)]
pub struct ChangeBus<T> {
    sender: broadcast::Sender<Arc<T>>,
}

impl<T: Event> ChangeBus<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Registers a new subscriber. Subscribers only observe events
    /// published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<T>> {
        self.sender.subscribe()
    }

    /// Publishes a change notification, returning the number of
    /// subscribers it reached (zero when the event was dropped).
    pub fn publish(&self, event: T) -> usize {
        match self.sender.send(Arc::new(event)) {
            Ok(count) => {
                trace!(event = std::any::type_name::<T>(), count, "change dispatched");
                count
            },
            Err(_) => {
                trace!(event = std::any::type_name::<T>(), "change dropped: no subscribers");
                0
            },
        }
    }
}

impl<T> Clone for ChangeBus<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: Event> Default for ChangeBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives the next change, skipping over lagged gaps.
///
/// A subscriber that falls behind the buffer continues from the fresh tail
/// instead of erroring out; returns `None` once the bus is closed.
pub async fn recv_change<T: Event>(
    receiver: &mut broadcast::Receiver<Arc<T>>,
) -> Option<Arc<T>> {
    loop {
        match receiver.recv().await {
            Ok(event) => return Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                debug!(
                    event = std::any::type_name::<T>(),
                    skipped, "change subscriber lagged; continuing from latest"
                );
            },
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}
