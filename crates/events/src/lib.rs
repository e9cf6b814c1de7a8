//! `orderflow-events` — notification publishing (mechanics only).
//!
//! Order workflow operations announce what happened through a
//! [`NotificationSink`]; this crate owns the sink contract and the provided
//! implementations. No broker protocol lives here: downstream transports are
//! an integration concern behind the trait.

pub mod event;
pub mod logging;
pub mod memory;
pub mod sink;

pub use event::DomainEvent;
pub use logging::TracingNotificationSink;
pub use memory::InMemoryNotificationSink;
pub use sink::{Notification, NotificationSink, PublishError, Subscription};
