// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Store Abstraction
//!
//! The persistence contract the command processor depends on. The core is
//! agnostic to the storage engine as long as it provides:
//!
//! 1. **Append-only** event streams, totally ordered per aggregate
//! 2. **Conditional append**: the stored version must equal the expected
//!    version, then advances — the optimistic concurrency check
//! 3. **Snapshots**: the latest materialized aggregate state, a cache
//!    bounding replay cost (events remain the source of truth)
//! 4. **Bounded range reads**: all events from a sequence number on,
//!    strictly increasing and contiguous
//!
//! ```text
//! Command → GroupChat → Event → EventStore → Persistent Storage
//!                                   ↓
//!                          Downstream consumers
//! ```
//!
//! There is no ordering guarantee across different aggregate ids, and no
//! delivery guarantee to downstream stream consumers.

use async_trait::async_trait;

use crate::aggregate::GroupChat;
use crate::domain::GroupChatId;
use crate::errors::EventStoreResult;
use crate::events::GroupChatEvent;

pub mod memory;

pub use memory::InMemoryEventStore;

/// Event store contract for the group chat aggregate.
///
/// Implementations must make the version check and the write a single
/// atomic step; correctness of the non-atomic load→decide→persist span
/// depends entirely on it.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append one event, conditioned on the aggregate's stored version
    /// equalling `expected_version`. On success the stored version
    /// advances by one.
    ///
    /// # Errors
    ///
    /// - [`EventStoreError::OptimisticLock`](crate::errors::EventStoreError::OptimisticLock)
    ///   if another writer committed first
    /// - [`EventStoreError::UnknownAggregate`](crate::errors::EventStoreError::UnknownAggregate)
    ///   if no stream exists for the event's aggregate id
    async fn persist_event(
        &self,
        event: &GroupChatEvent,
        expected_version: u64,
    ) -> EventStoreResult<()>;

    /// Append one event and (over)write the latest snapshot in the same
    /// atomic step, conditioned on `snapshot.version()`.
    ///
    /// The creation event inserts a fresh stream; a second creation for
    /// the same id is a concurrency conflict.
    async fn persist_event_and_snapshot(
        &self,
        event: &GroupChatEvent,
        snapshot: &GroupChat,
    ) -> EventStoreResult<()>;

    /// The most recent snapshot for the aggregate, stamped with the
    /// store's current version, or `None` if the aggregate was never
    /// created.
    async fn get_latest_snapshot_by_id(
        &self,
        id: &GroupChatId,
    ) -> EventStoreResult<Option<GroupChat>>;

    /// All events for `id` with `seq_nr >= from_seq_nr`, strictly
    /// increasing and contiguous. A gap or duplicate is reported as an
    /// integrity violation, never silently returned.
    async fn get_events_by_id_since_seq_nr(
        &self,
        id: &GroupChatId,
        from_seq_nr: u64,
    ) -> EventStoreResult<Vec<GroupChatEvent>>;
}
