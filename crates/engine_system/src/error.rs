//! Scheduler error types.

/// Errors raised by registration, activation, execution, and snapshot
/// handling.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// Two system types were registered under the same name.
    #[error("duplicate system name: {0}")]
    DuplicateSystem(String),

    /// No system type is registered under this name.
    #[error("unknown system: {0}")]
    UnknownSystem(String),

    /// The system's shared handle was already borrowed when the scheduler
    /// tried to run it.
    #[error("system {0} is borrowed elsewhere and cannot run")]
    SystemBorrowed(String),

    /// A snapshot document did not have the expected shape.
    #[error("malformed snapshot document: {0}")]
    Document(#[from] serde_json::Error),

    /// Failed to encode a snapshot to MessagePack.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode a snapshot from MessagePack.
    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}
