//! Cross-cutting session events.

/// Capacity of the session event channel.
pub(crate) const EVENT_CAPACITY: usize = 16;

/// Emitted by the task client when the server stops honouring the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A task endpoint answered 401. Stored credentials are already cleared.
    Unauthorized,
}
