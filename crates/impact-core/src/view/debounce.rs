// ── Debounced delivery ──
//
// Delays a value by a fixed interval and delivers it on an mpsc channel.
// Scheduling a new value cancels the pending one, so a burst of input
// produces a single delivery after the burst goes quiet. Dropping the
// debouncer cancels whatever is still pending.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Option<CancellationToken>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Deliver `value` after the delay unless another value (or a cancel)
    /// arrives first. Must be called from within a tokio runtime.
    pub fn schedule(&mut self, value: T) {
        self.cancel();

        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        let tx = self.tx.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    // Receiver gone means the consumer shut down.
                    let _ = tx.send(value);
                }
            }
        });
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn burst_delivers_only_last_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.schedule("a");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule("ab");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule("abc");

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err(), "fired before the pause elapsed");

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv().ok(), Some("abc"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err(), "earlier values must never fire");
    }

    #[tokio::test(start_paused = true)]
    async fn separate_pauses_deliver_each_value() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.schedule(1);
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.schedule(2);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(rx.try_recv().ok(), Some(1));
        assert_eq!(rx.try_recv().ok(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_discard_pending() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(DELAY, tx);

        debouncer.schedule("cancelled");
        debouncer.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());

        debouncer.schedule("dropped");
        drop(debouncer);
        assert_eq!(rx.recv().await, None);
    }
}
