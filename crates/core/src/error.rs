//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere. Every
/// variant is recoverable at the caller boundary; none is fatal to the process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, start after end).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The venue already has a confirmed or actively-held booking whose
    /// interval intersects the requested one.
    #[error("booking conflict: {0}")]
    Conflict(String),

    /// A requested booking/seat/venue/activity was not found.
    #[error("not found")]
    NotFound,

    /// A requested seat is not available for holding or selling.
    #[error("seat unavailable: {0}")]
    SeatUnavailable(String),

    /// A group hold asked for more seats than the group path allows.
    #[error("group size exceeded: requested {requested}, maximum {max}")]
    GroupSizeExceeded { requested: usize, max: usize },

    /// An illegal seat or hold state transition was attempted.
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Confirm/cancel attempted on a hold that already reached a terminal state.
    #[error("hold already resolved: {0}")]
    AlreadyResolved(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The persistence collaborator rejected a write.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn seat_unavailable(msg: impl Into<String>) -> Self {
        Self::SeatUnavailable(msg.into())
    }

    pub fn group_size_exceeded(requested: usize, max: usize) -> Self {
        Self::GroupSizeExceeded { requested, max }
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    pub fn already_resolved(msg: impl Into<String>) -> Self {
        Self::AlreadyResolved(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
