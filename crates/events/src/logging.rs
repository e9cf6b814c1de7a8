//! Log-backed notification sink.

use serde_json::Value as JsonValue;

use crate::sink::{NotificationSink, PublishError};

/// Sink that writes every notification to the tracing log at info level.
///
/// This is the production default until a real transport is wired in: the
/// notification stream is observable without any broker running, and
/// swapping in a broker-backed sink is a construction-time change only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl TracingNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingNotificationSink {
    fn publish(&self, topic: &str, payload: JsonValue) -> Result<(), PublishError> {
        tracing::info!(topic = %topic, payload = %payload, "notification published");
        Ok(())
    }
}
