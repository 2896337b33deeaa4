use chrono::{DateTime, Utc};

/// A published update notification.
///
/// Notifications are facts about committed mutations: immutable once
/// published, named by a stable wire string, and versioned so consumers can
/// survive payload evolution.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable wire name (e.g. "bookingCreated").
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32;

    /// Business time of the underlying mutation.
    fn occurred_at(&self) -> DateTime<Utc>;
}
