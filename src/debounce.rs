//! Debouncing of search input and discarding of stale responses

use log::trace;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Emits a value only after `delay` has passed without a newer one.
///
/// At most one timer is pending; each `push` aborts the previous timer.
/// Settled values are read from the receiver returned by [`Debouncer::new`].
/// Must be used inside a tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                delay,
                tx,
                pending: None,
            },
            rx,
        )
    }

    /// Restart the quiet period with `value`
    pub fn push(&mut self, value: T) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means nobody is listening any more.
            let _ = tx.send(value);
        }));
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            trace!("Cancelling pending debounce timer");
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

/// Hands out increasing tickets so only the newest request's result is applied
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    latest: Arc<AtomicU64>,
}

/// Proof of which request a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request, superseding every earlier ticket
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer request has started since `ticket`
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Supersede all outstanding tickets, e.g. when the view goes away
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{advance, Instant};

    #[tokio::test(start_paused = true)]
    async fn test_only_last_keystroke_fires() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();

        debouncer.push("a");
        advance(Duration::from_millis(100)).await;
        debouncer.push("ab");
        advance(Duration::from_millis(50)).await;
        debouncer.push("abc");

        let value = rx.recv().await.unwrap();
        assert_eq!(value, "abc");
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(450), "fired early: {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(452), "fired late: {:?}", elapsed);

        advance(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let (mut debouncer, mut rx) = Debouncer::new(Duration::from_millis(300));
        debouncer.push(1);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        advance(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_sequence_supersedes() {
        let seq = RequestSequence::new();
        let first = seq.begin();
        assert!(seq.is_current(first));
        let second = seq.begin();
        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
        seq.invalidate();
        assert!(!seq.is_current(second));
    }
}
