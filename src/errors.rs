// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for event store operations

use thiserror::Error;

use crate::domain::GroupChatId;

/// Errors that can occur at the event store boundary.
///
/// [`OptimisticLock`](EventStoreError::OptimisticLock) is deliberately
/// distinct from the domain's validation errors: a conflict means another
/// writer committed first and the caller may re-read and resubmit, while a
/// validation error is a permanent rejection of the command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventStoreError {
    /// The expected-version check failed; another writer committed first
    #[error(
        "optimistic lock failed for {aggregate_id}: expected version {expected}, current {actual}"
    )]
    OptimisticLock {
        aggregate_id: GroupChatId,
        expected: u64,
        actual: u64,
    },

    /// No event stream exists for the aggregate id
    #[error("no event stream recorded for {0}")]
    UnknownAggregate(GroupChatId),

    /// The stored log violates its own ordering guarantees (gap or
    /// duplicate sequence number)
    #[error("event log integrity violation for {aggregate_id}: {details}")]
    IntegrityViolation {
        aggregate_id: GroupChatId,
        details: String,
    },

    /// Event or snapshot could not be encoded/decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for event store operations
pub type EventStoreResult<T> = Result<T, EventStoreError>;

impl From<serde_json::Error> for EventStoreError {
    fn from(err: serde_json::Error) -> Self {
        EventStoreError::Serialization(err.to_string())
    }
}
