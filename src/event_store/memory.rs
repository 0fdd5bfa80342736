// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory event store.
//!
//! Reference implementation of the [`EventStore`] contract backed by a
//! process-local map. Used by the crate's own tests and suitable for
//! embedding where durability is not required. The whole record map sits
//! behind one mutex, which makes the version-check-then-append step
//! trivially atomic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::aggregate::GroupChat;
use crate::domain::GroupChatId;
use crate::errors::{EventStoreError, EventStoreResult};
use crate::event_store::EventStore;
use crate::events::GroupChatEvent;

/// Per-aggregate stream: version counter, full event log, latest snapshot.
#[derive(Debug)]
struct StreamRecord {
    version: u64,
    events: Vec<GroupChatEvent>,
    snapshot: GroupChat,
}

/// In-memory [`EventStore`] implementation.
///
/// Cloning is cheap and clones share the same underlying storage, so two
/// processors handed clones of one store contend on the same version
/// counters — exactly the optimistic concurrency semantics of a shared
/// durable store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    records: Arc<Mutex<HashMap<GroupChatId, StreamRecord>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<GroupChatId, StreamRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn append_checked(
        record: &mut StreamRecord,
        event: &GroupChatEvent,
        expected_version: u64,
    ) -> EventStoreResult<()> {
        let aggregate_id = *event.aggregate_id();
        if record.version != expected_version {
            return Err(EventStoreError::OptimisticLock {
                aggregate_id,
                expected: expected_version,
                actual: record.version,
            });
        }

        let last_seq_nr = record.events.last().map_or(0, GroupChatEvent::seq_nr);
        if event.seq_nr() != last_seq_nr + 1 {
            return Err(EventStoreError::IntegrityViolation {
                aggregate_id,
                details: format!(
                    "appended event carries seq_nr {}, log ends at {}",
                    event.seq_nr(),
                    last_seq_nr
                ),
            });
        }

        record.events.push(event.clone());
        record.version += 1;
        Ok(())
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn persist_event(
        &self,
        event: &GroupChatEvent,
        expected_version: u64,
    ) -> EventStoreResult<()> {
        let aggregate_id = *event.aggregate_id();
        let mut records = self.lock();
        let record = records
            .get_mut(&aggregate_id)
            .ok_or(EventStoreError::UnknownAggregate(aggregate_id))?;

        Self::append_checked(record, event, expected_version)?;
        debug!(
            %aggregate_id,
            seq_nr = event.seq_nr(),
            version = record.version,
            event_type = event.event_type_name(),
            "appended event"
        );
        Ok(())
    }

    async fn persist_event_and_snapshot(
        &self,
        event: &GroupChatEvent,
        snapshot: &GroupChat,
    ) -> EventStoreResult<()> {
        let aggregate_id = *event.aggregate_id();
        let mut records = self.lock();

        if event.is_created() {
            if let Some(existing) = records.get(&aggregate_id) {
                return Err(EventStoreError::OptimisticLock {
                    aggregate_id,
                    expected: 0,
                    actual: existing.version,
                });
            }
            records.insert(
                aggregate_id,
                StreamRecord {
                    version: snapshot.version(),
                    events: vec![event.clone()],
                    snapshot: snapshot.clone(),
                },
            );
            debug!(%aggregate_id, "created stream with initial snapshot");
            return Ok(());
        }

        let record = records
            .get_mut(&aggregate_id)
            .ok_or(EventStoreError::UnknownAggregate(aggregate_id))?;
        Self::append_checked(record, event, snapshot.version())?;
        record.snapshot = snapshot.clone();
        debug!(
            %aggregate_id,
            seq_nr = event.seq_nr(),
            version = record.version,
            "appended event and refreshed snapshot"
        );
        Ok(())
    }

    async fn get_latest_snapshot_by_id(
        &self,
        id: &GroupChatId,
    ) -> EventStoreResult<Option<GroupChat>> {
        let records = self.lock();
        Ok(records
            .get(id)
            .map(|record| record.snapshot.clone().with_version(record.version)))
    }

    async fn get_events_by_id_since_seq_nr(
        &self,
        id: &GroupChatId,
        from_seq_nr: u64,
    ) -> EventStoreResult<Vec<GroupChatEvent>> {
        let records = self.lock();
        let Some(record) = records.get(id) else {
            return Ok(Vec::new());
        };

        let events: Vec<GroupChatEvent> = record
            .events
            .iter()
            .filter(|e| e.seq_nr() >= from_seq_nr)
            .cloned()
            .collect();

        // The contract promises strictly increasing, contiguous sequence
        // numbers; anything else must surface, not be silently returned.
        for pair in events.windows(2) {
            if pair[1].seq_nr() != pair[0].seq_nr() + 1 {
                return Err(EventStoreError::IntegrityViolation {
                    aggregate_id: *id,
                    details: format!(
                        "non-contiguous log: seq_nr {} followed by {}",
                        pair[0].seq_nr(),
                        pair[1].seq_nr()
                    ),
                });
            }
        }

        Ok(events)
    }
}
