// Copyright (c) 2025 - Cowboy AI, Inc.
//! Group Chat Command Processor
//!
//! Orchestrates every exposed command as one load → decide → persist span:
//!
//! 1. Load the current state (latest snapshot + events since it)
//! 2. Invoke the aggregate's command method — pure, no I/O
//! 3. Persist the produced event, conditioned on the loaded version;
//!    a snapshot policy decides whether the snapshot is refreshed in the
//!    same atomic write
//!
//! The span is non-atomic: a second writer may commit between load and
//! persist, in which case the store's conditional append fails with a
//! conflict. The processor makes exactly one persistence attempt per
//! invocation and never retries; the caller re-reads and resubmits.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::aggregate::{CorruptReplayError, GroupChat, GroupChatError};
use crate::domain::{
    GroupChatId, GroupChatName, IdGenerator, MemberRole, Message, MessageId, UserAccountId,
};
use crate::errors::EventStoreError;
use crate::event_store::EventStore;
use crate::events::GroupChatEvent;

/// Command processor errors.
///
/// Domain failures pass through unchanged; conflicts are kept apart from
/// them so callers can retry with a fresh read instead of treating the
/// rejection as permanent.
#[derive(Debug, Error)]
pub enum CommandProcessorError {
    /// No history recorded for the target aggregate id
    #[error("group chat not found: {0}")]
    NotFound(GroupChatId),

    /// A domain invariant rejected the command
    #[error(transparent)]
    Domain(#[from] GroupChatError),

    /// Another writer committed between load and persist
    #[error("concurrent modification of {id}")]
    Conflict {
        id: GroupChatId,
        #[source]
        source: EventStoreError,
    },

    /// The stored history failed to replay; fatal, surfaced loudly
    #[error("corrupt event history for {id}")]
    CorruptReplay {
        id: GroupChatId,
        #[source]
        source: CorruptReplayError,
    },

    /// Any other event store failure
    #[error(transparent)]
    Store(#[from] EventStoreError),
}

/// Decides whether an accepted event warrants refreshing the snapshot in
/// the same atomic write.
///
/// Fewer snapshots mean longer replays after recovery; more snapshots mean
/// more write volume.
pub trait SnapshotPolicy: Send + Sync {
    fn should_snapshot(&self, event: &GroupChatEvent, snapshot: &GroupChat) -> bool;
}

/// Snapshot at every Nth sequence number.
#[derive(Debug, Clone, Copy)]
pub struct EveryNEvents {
    interval: u64,
}

impl EveryNEvents {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl SnapshotPolicy for EveryNEvents {
    fn should_snapshot(&self, event: &GroupChatEvent, _snapshot: &GroupChat) -> bool {
        event.seq_nr() % self.interval == 0
    }
}

/// Never snapshot beyond the mandatory creation write.
#[derive(Debug, Clone, Copy)]
pub struct Never;

impl SnapshotPolicy for Never {
    fn should_snapshot(&self, _event: &GroupChatEvent, _snapshot: &GroupChat) -> bool {
        false
    }
}

/// Event-sourced command processor for the group chat aggregate.
///
/// The only component performing I/O against the aggregate's storage.
pub struct GroupChatCommandProcessor<S: EventStore> {
    event_store: S,
    snapshot_policy: Box<dyn SnapshotPolicy>,
    id_generator: Arc<IdGenerator>,
}

impl<S: EventStore> GroupChatCommandProcessor<S> {
    /// Snapshot interval of the stock policy.
    pub const DEFAULT_SNAPSHOT_INTERVAL: u64 = 10;

    pub fn new(event_store: S, id_generator: Arc<IdGenerator>) -> Self {
        Self {
            event_store,
            snapshot_policy: Box::new(EveryNEvents::new(Self::DEFAULT_SNAPSHOT_INTERVAL)),
            id_generator,
        }
    }

    /// Replace the snapshot policy.
    pub fn with_snapshot_policy(mut self, policy: Box<dyn SnapshotPolicy>) -> Self {
        self.snapshot_policy = policy;
        self
    }

    /// Create a new group chat. Always writes event and snapshot together.
    #[instrument(skip(self, name))]
    pub async fn create_group_chat(
        &self,
        name: GroupChatName,
        executor_id: UserAccountId,
    ) -> Result<GroupChatEvent, CommandProcessorError> {
        let id = GroupChatId::generate(&self.id_generator);
        let (state, event) = GroupChat::create(id, name, executor_id, &self.id_generator);

        self.event_store
            .persist_event_and_snapshot(&event, &state)
            .await
            .map_err(|source| Self::classify(id, source))?;
        debug!(%id, "group chat created");
        Ok(event)
    }

    /// Rename a group chat.
    #[instrument(skip(self, name))]
    pub async fn rename_group_chat(
        &self,
        id: &GroupChatId,
        name: GroupChatName,
        executor_id: UserAccountId,
    ) -> Result<GroupChatEvent, CommandProcessorError> {
        let state = self.find_by_id(id).await?;
        let (new_state, event) = state.rename(name, executor_id, &self.id_generator)?;
        self.persist(&new_state, &event).await?;
        Ok(event)
    }

    /// Add a member.
    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        id: &GroupChatId,
        user_account_id: UserAccountId,
        role: MemberRole,
        executor_id: UserAccountId,
    ) -> Result<GroupChatEvent, CommandProcessorError> {
        let state = self.find_by_id(id).await?;
        let (new_state, event) =
            state.add_member(user_account_id, role, executor_id, &self.id_generator)?;
        self.persist(&new_state, &event).await?;
        Ok(event)
    }

    /// Remove a member by user account id.
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        id: &GroupChatId,
        user_account_id: UserAccountId,
        executor_id: UserAccountId,
    ) -> Result<GroupChatEvent, CommandProcessorError> {
        let state = self.find_by_id(id).await?;
        let (new_state, event) =
            state.remove_member_by_id(user_account_id, executor_id, &self.id_generator)?;
        self.persist(&new_state, &event).await?;
        Ok(event)
    }

    /// Post a message.
    #[instrument(skip(self, message))]
    pub async fn post_message(
        &self,
        id: &GroupChatId,
        message: Message,
        executor_id: UserAccountId,
    ) -> Result<GroupChatEvent, CommandProcessorError> {
        let state = self.find_by_id(id).await?;
        let (new_state, event) = state.post_message(message, executor_id, &self.id_generator)?;
        self.persist(&new_state, &event).await?;
        Ok(event)
    }

    /// Delete a message.
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        id: &GroupChatId,
        message_id: MessageId,
        executor_id: UserAccountId,
    ) -> Result<GroupChatEvent, CommandProcessorError> {
        let state = self.find_by_id(id).await?;
        let (new_state, event) =
            state.delete_message(message_id, executor_id, &self.id_generator)?;
        self.persist(&new_state, &event).await?;
        Ok(event)
    }

    /// Logically delete a group chat.
    #[instrument(skip(self))]
    pub async fn delete_group_chat(
        &self,
        id: &GroupChatId,
        executor_id: UserAccountId,
    ) -> Result<GroupChatEvent, CommandProcessorError> {
        let state = self.find_by_id(id).await?;
        let (new_state, event) = state.delete(executor_id, &self.id_generator)?;
        self.persist(&new_state, &event).await?;
        Ok(event)
    }

    /// Load the current aggregate state: latest snapshot plus the events
    /// recorded after it, replayed.
    pub async fn find_by_id(
        &self,
        id: &GroupChatId,
    ) -> Result<GroupChat, CommandProcessorError> {
        let snapshot = self
            .event_store
            .get_latest_snapshot_by_id(id)
            .await?
            .ok_or(CommandProcessorError::NotFound(*id))?;

        let events = self
            .event_store
            .get_events_by_id_since_seq_nr(id, snapshot.seq_nr() + 1)
            .await?;
        debug!(%id, snapshot_seq_nr = snapshot.seq_nr(), replayed = events.len(), "loaded aggregate");

        GroupChat::replay(&events, snapshot, &self.id_generator)
            .map_err(|source| CommandProcessorError::CorruptReplay { id: *id, source })
    }

    /// Exactly one persistence attempt: event+snapshot when the policy
    /// says so, event alone against the loaded version otherwise.
    async fn persist(
        &self,
        state: &GroupChat,
        event: &GroupChatEvent,
    ) -> Result<(), CommandProcessorError> {
        let result = if self.snapshot_policy.should_snapshot(event, state) {
            self.event_store
                .persist_event_and_snapshot(event, state)
                .await
        } else {
            self.event_store.persist_event(event, state.version()).await
        };
        result.map_err(|source| Self::classify(*state.id(), source))
    }

    fn classify(id: GroupChatId, source: EventStoreError) -> CommandProcessorError {
        match source {
            conflict @ EventStoreError::OptimisticLock { .. } => CommandProcessorError::Conflict {
                id,
                source: conflict,
            },
            other => CommandProcessorError::Store(other),
        }
    }
}
