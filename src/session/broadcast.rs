//! Subscriber registry
//!
//! A single-threaded publish/subscribe primitive. Every subscriber owns an
//! unbounded queue, so values are delivered in emission order and none are
//! skipped. Dropped subscriptions are pruned on the next emission.

use futures_util::Stream;
use std::cell::RefCell;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Registry of subscribers for one stream of values.
#[derive(Debug)]
pub struct Broadcaster<T> {
    subscribers: RefCell<Vec<UnboundedSender<T>>>,
}

impl<T> Default for Broadcaster<T> {
    fn default() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
        }
    }
}

impl<T: Clone> Broadcaster<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber that receives every value emitted from now on.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.borrow_mut().push(tx);
        Subscription { rx }
    }

    /// Registers a subscriber whose first element is `initial`.
    pub fn subscribe_with(&self, initial: T) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        // The receiver is alive, so this send cannot fail.
        let _ = tx.send(initial);
        self.subscribers.borrow_mut().push(tx);
        Subscription { rx }
    }

    /// Delivers `value` to every live subscriber, in subscription order.
    pub fn emit(&self, value: &T) {
        self.subscribers
            .borrow_mut()
            .retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Number of subscribers still registered. Dropped ones are only
    /// removed on the next emission.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

/// Receiving side of a [`Broadcaster`]. Infinite while the broadcaster lives.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Waits for the next value. Returns `None` once the broadcaster is gone.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Returns the next value if one is already queued.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Takes every value queued so far.
    pub fn drain(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn test_no_replay_before_subscription() {
        let broadcaster = Broadcaster::new();
        broadcaster.emit(&1);

        let mut sub = broadcaster.subscribe();
        broadcaster.emit(&2);
        broadcaster.emit(&3);

        assert_eq!(sub.drain(), vec![2, 3]);
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn test_every_subscriber_gets_every_value() {
        let broadcaster = Broadcaster::new();
        let mut first = broadcaster.subscribe();
        let mut second = broadcaster.subscribe_with(0);

        broadcaster.emit(&1);

        assert_eq!(first.drain(), vec![1]);
        assert_eq!(second.drain(), vec![0, 1]);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let broadcaster = Broadcaster::new();
        let kept = broadcaster.subscribe();
        let dropped = broadcaster.subscribe();
        assert_eq!(broadcaster.subscriber_count(), 2);

        drop(dropped);
        broadcaster.emit(&"x");
        assert_eq!(broadcaster.subscriber_count(), 1);
        drop(kept);
    }

    #[tokio::test]
    async fn test_subscription_is_a_stream() {
        let broadcaster = Broadcaster::new();
        let mut sub = broadcaster.subscribe();
        broadcaster.emit(&"a".to_string());
        broadcaster.emit(&"b".to_string());

        assert_eq!(sub.next().await.as_deref(), Some("a"));
        assert_eq!(sub.recv().await.as_deref(), Some("b"));

        drop(broadcaster);
        assert_eq!(sub.next().await, None);
    }
}
