use crate::bus::{Event, recv_change};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tracing::trace;

/// Debounces a change subscription with a quiescence window.
///
/// Every arriving value re-arms the window; values superseded before it
/// fires are discarded (last-value-wins). The latest value is forwarded
/// once the input has been stable for `window`, at most once per quiescent
/// period. A pending value is flushed when the bus closes.
///
/// The pending timer is implicitly canceled by the next arrival; no
/// explicit cancellation token exists beyond "latest value wins".
/// Must be called from within a tokio runtime.
pub fn debounce<T: Event>(
    receiver: broadcast::Receiver<Arc<T>>,
    window: Duration,
) -> mpsc::UnboundedReceiver<Arc<T>> {
    debounce_filtered(receiver, window, |_| true)
}

/// Like [`debounce`], but only values matching `predicate` participate.
/// Non-matching values neither re-arm nor cancel the window.
pub fn debounce_filtered<T, P>(
    mut receiver: broadcast::Receiver<Arc<T>>,
    window: Duration,
    predicate: P,
) -> mpsc::UnboundedReceiver<Arc<T>>
where
    T: Event,
    P: Fn(&T) -> bool + Send + 'static,
{
    let (tx, out) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut pending: Option<Arc<T>> = None;
        let mut deadline = Instant::now();
        loop {
            if let Some(latest) = pending.take() {
                tokio::select! {
                    received = recv_change(&mut receiver) => match received {
                        Some(event) if predicate(&event) => {
                            trace!(event = std::any::type_name::<T>(), "debounce re-armed");
                            deadline = Instant::now() + window;
                            pending = Some(event);
                        },
                        Some(_) => pending = Some(latest),
                        None => {
                            // Bus closed with a value in flight: flush it.
                            let _ = tx.send(latest);
                            break;
                        },
                    },
                    () = tokio::time::sleep_until(deadline) => {
                        trace!(event = std::any::type_name::<T>(), "debounce fired");
                        if tx.send(latest).is_err() {
                            break;
                        }
                    },
                }
            } else {
                match recv_change(&mut receiver).await {
                    Some(event) if predicate(&event) => {
                        deadline = Instant::now() + window;
                        pending = Some(event);
                    },
                    Some(_) => {},
                    None => break,
                }
            }
        }
    });
    out
}
