//! In-memory notification sink for tests/dev.

use std::sync::{Mutex, mpsc};

use serde_json::Value as JsonValue;

use crate::sink::{Notification, NotificationSink, PublishError, Subscription};

/// In-memory fan-out sink.
///
/// - No IO / no async
/// - Best-effort fan-out, dead subscribers are dropped on publish
/// - Subscribers only see notifications published after they subscribed
#[derive(Debug, Default)]
pub struct InMemoryNotificationSink {
    subscribers: Mutex<Vec<mpsc::Sender<Notification>>>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned, we still return a subscription;
        // it just won't receive notifications until the process restarts.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn publish(&self, topic: &str, payload: JsonValue) -> Result<(), PublishError> {
        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| PublishError::Unavailable("subscriber lock poisoned".into()))?;

        let notification = Notification::new(topic, payload);

        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(notification.clone()).is_ok());

        Ok(())
    }
}
