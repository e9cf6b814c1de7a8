//! Notification publishing/subscription abstraction (mechanics only).
//!
//! The sink is the **outbound edge** of the service: workflow code publishes
//! a topic plus a JSON payload and moves on. It is intentionally lightweight
//! and makes minimal assumptions:
//!
//! - **Transport-agnostic**: works with in-memory channels, a log stream, or
//!   a real broker client behind the trait.
//! - **Fire-and-forget**: publishers never wait on delivery; a lost
//!   notification is acceptable because the order store remains the source
//!   of truth.
//! - **No ordering guarantees**: notifications may arrive out of order
//!   (unless an implementation provides ordering).
//! - **No persistence**: the sink distributes, it does not store.

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use serde_json::Value as JsonValue;
use thiserror::Error;

/// A published notification: stable topic name plus JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub topic: String,
    pub payload: JsonValue,
}

impl Notification {
    pub fn new(topic: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}

/// Publish failure surfaced to the caller.
///
/// Callers decide policy; the workflow layer logs and continues, since the
/// triggering operation has already been persisted.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The sink could not accept the notification.
    #[error("notification sink unavailable: {0}")]
    Unavailable(String),
}

/// A subscription to the notification stream.
///
/// Each subscription gets a copy of every notification published after it
/// was created (broadcast semantics). Designed for single-threaded
/// consumption, one subscription per consumer.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<Notification>,
}

impl Subscription {
    pub fn new(receiver: Receiver<Notification>) -> Self {
        Self { receiver }
    }

    /// Block until the next notification is available.
    pub fn recv(&self) -> Result<Notification, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a notification without blocking.
    pub fn try_recv(&self) -> Result<Notification, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a notification.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Notification, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Outbound notification sink.
///
/// `publish()` can fail (sink full, transport down). Failures surface to the
/// caller, which for the order workflow means: log at warn, never fail the
/// request. The trait requires `Send + Sync` so one sink instance can be
/// shared across request tasks.
pub trait NotificationSink: Send + Sync {
    fn publish(&self, topic: &str, payload: JsonValue) -> Result<(), PublishError>;
}

impl<S> NotificationSink for Arc<S>
where
    S: NotificationSink + ?Sized,
{
    fn publish(&self, topic: &str, payload: JsonValue) -> Result<(), PublishError> {
        (**self).publish(topic, payload)
    }
}
