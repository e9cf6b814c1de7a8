use chrono::{DateTime, Utc};
use serde::Serialize;

/// A typed notification payload.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - named by a **stable topic** external consumers subscribe to
pub trait DomainEvent: Clone + core::fmt::Debug + Serialize + Send + Sync + 'static {
    /// Stable topic name (e.g. "order.created").
    fn topic(&self) -> &'static str;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
