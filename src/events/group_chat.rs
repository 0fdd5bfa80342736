// Copyright (c) 2025 - Cowboy AI, Inc.
//! Group Chat Domain Events
//!
//! All state changes to `GroupChat` aggregates are represented as immutable
//! events — the only artifacts ever durably appended. Events follow event
//! sourcing practice:
//! - Immutable facts, past tense naming (`GroupChatRenamed`, not `Rename`)
//! - Per-aggregate sequence number, monotonically increasing from 1
//! - Time-sortable ULID event ids
//! - Serializable for persistence
//!
//! # Wire shape
//!
//! ```json
//! { "type": "GroupChatRenamed", "data": { "aggregateId": {...}, "seqNr": 2, ... } }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::domain::{
    GroupChatId, GroupChatName, IdGenerator, Member, Members, Message, UserAccountId,
};

/// Group Chat Domain Events
///
/// Each variant corresponds to a specific state change in the `GroupChat`
/// aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GroupChatEvent {
    /// Group chat was created
    #[serde(rename = "GroupChatCreated")]
    Created(GroupChatCreated),

    /// Group chat was renamed
    #[serde(rename = "GroupChatRenamed")]
    Renamed(GroupChatRenamed),

    /// A member joined the group chat
    #[serde(rename = "GroupChatMemberAdded")]
    MemberAdded(GroupChatMemberAdded),

    /// A member left or was removed from the group chat
    #[serde(rename = "GroupChatMemberRemoved")]
    MemberRemoved(GroupChatMemberRemoved),

    /// A message was posted
    #[serde(rename = "GroupChatMessagePosted")]
    MessagePosted(GroupChatMessagePosted),

    /// A message was deleted
    #[serde(rename = "GroupChatMessageDeleted")]
    MessageDeleted(GroupChatMessageDeleted),

    /// Group chat was logically deleted (terminal)
    #[serde(rename = "GroupChatDeleted")]
    Deleted(GroupChatDeleted),
}

/// Group chat was created with its initial member set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChatCreated {
    /// Unique event identifier (ULID, time-ordered)
    pub id: Ulid,

    /// Group chat aggregate id
    pub aggregate_id: GroupChatId,

    /// Per-aggregate sequence number (always 1 for creation)
    pub seq_nr: u64,

    /// Name given at creation
    pub name: GroupChatName,

    /// Initial member set: exactly the creating administrator
    pub members: Members,

    /// Who issued the triggering command
    pub executor_id: UserAccountId,

    /// When this event was captured
    pub occurred_at: DateTime<Utc>,
}

/// Group chat was renamed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChatRenamed {
    pub id: Ulid,
    pub aggregate_id: GroupChatId,
    pub seq_nr: u64,
    /// The new name
    pub name: GroupChatName,
    pub executor_id: UserAccountId,
    pub occurred_at: DateTime<Utc>,
}

/// A member was added to the group chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChatMemberAdded {
    pub id: Ulid,
    pub aggregate_id: GroupChatId,
    pub seq_nr: u64,
    /// The added member
    pub member: Member,
    pub executor_id: UserAccountId,
    pub occurred_at: DateTime<Utc>,
}

/// A member was removed from the group chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChatMemberRemoved {
    pub id: Ulid,
    pub aggregate_id: GroupChatId,
    pub seq_nr: u64,
    /// The removed member
    pub member: Member,
    pub executor_id: UserAccountId,
    pub occurred_at: DateTime<Utc>,
}

/// A message was posted to the group chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChatMessagePosted {
    pub id: Ulid,
    pub aggregate_id: GroupChatId,
    pub seq_nr: u64,
    /// The posted message
    pub message: Message,
    pub executor_id: UserAccountId,
    pub occurred_at: DateTime<Utc>,
}

/// A message was deleted from the group chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChatMessageDeleted {
    pub id: Ulid,
    pub aggregate_id: GroupChatId,
    pub seq_nr: u64,
    /// The removed message
    pub message: Message,
    pub executor_id: UserAccountId,
    pub occurred_at: DateTime<Utc>,
}

/// Group chat was logically deleted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChatDeleted {
    pub id: Ulid,
    pub aggregate_id: GroupChatId,
    pub seq_nr: u64,
    pub executor_id: UserAccountId,
    pub occurred_at: DateTime<Utc>,
}

impl GroupChatCreated {
    pub fn new(
        generator: &IdGenerator,
        aggregate_id: GroupChatId,
        seq_nr: u64,
        name: GroupChatName,
        members: Members,
        executor_id: UserAccountId,
    ) -> Self {
        Self {
            id: generator.generate(),
            aggregate_id,
            seq_nr,
            name,
            members,
            executor_id,
            occurred_at: Utc::now(),
        }
    }
}

impl GroupChatRenamed {
    pub fn new(
        generator: &IdGenerator,
        aggregate_id: GroupChatId,
        seq_nr: u64,
        name: GroupChatName,
        executor_id: UserAccountId,
    ) -> Self {
        Self {
            id: generator.generate(),
            aggregate_id,
            seq_nr,
            name,
            executor_id,
            occurred_at: Utc::now(),
        }
    }
}

impl GroupChatMemberAdded {
    pub fn new(
        generator: &IdGenerator,
        aggregate_id: GroupChatId,
        seq_nr: u64,
        member: Member,
        executor_id: UserAccountId,
    ) -> Self {
        Self {
            id: generator.generate(),
            aggregate_id,
            seq_nr,
            member,
            executor_id,
            occurred_at: Utc::now(),
        }
    }
}

impl GroupChatMemberRemoved {
    pub fn new(
        generator: &IdGenerator,
        aggregate_id: GroupChatId,
        seq_nr: u64,
        member: Member,
        executor_id: UserAccountId,
    ) -> Self {
        Self {
            id: generator.generate(),
            aggregate_id,
            seq_nr,
            member,
            executor_id,
            occurred_at: Utc::now(),
        }
    }
}

impl GroupChatMessagePosted {
    pub fn new(
        generator: &IdGenerator,
        aggregate_id: GroupChatId,
        seq_nr: u64,
        message: Message,
        executor_id: UserAccountId,
    ) -> Self {
        Self {
            id: generator.generate(),
            aggregate_id,
            seq_nr,
            message,
            executor_id,
            occurred_at: Utc::now(),
        }
    }
}

impl GroupChatMessageDeleted {
    pub fn new(
        generator: &IdGenerator,
        aggregate_id: GroupChatId,
        seq_nr: u64,
        message: Message,
        executor_id: UserAccountId,
    ) -> Self {
        Self {
            id: generator.generate(),
            aggregate_id,
            seq_nr,
            message,
            executor_id,
            occurred_at: Utc::now(),
        }
    }
}

impl GroupChatDeleted {
    pub fn new(
        generator: &IdGenerator,
        aggregate_id: GroupChatId,
        seq_nr: u64,
        executor_id: UserAccountId,
    ) -> Self {
        Self {
            id: generator.generate(),
            aggregate_id,
            seq_nr,
            executor_id,
            occurred_at: Utc::now(),
        }
    }
}

impl GroupChatEvent {
    /// Event identifier.
    pub fn id(&self) -> Ulid {
        use GroupChatEvent::*;

        match self {
            Created(e) => e.id,
            Renamed(e) => e.id,
            MemberAdded(e) => e.id,
            MemberRemoved(e) => e.id,
            MessagePosted(e) => e.id,
            MessageDeleted(e) => e.id,
            Deleted(e) => e.id,
        }
    }

    /// Aggregate this event belongs to.
    pub fn aggregate_id(&self) -> &GroupChatId {
        use GroupChatEvent::*;

        match self {
            Created(e) => &e.aggregate_id,
            Renamed(e) => &e.aggregate_id,
            MemberAdded(e) => &e.aggregate_id,
            MemberRemoved(e) => &e.aggregate_id,
            MessagePosted(e) => &e.aggregate_id,
            MessageDeleted(e) => &e.aggregate_id,
            Deleted(e) => &e.aggregate_id,
        }
    }

    /// Who issued the triggering command.
    pub fn executor_id(&self) -> &UserAccountId {
        use GroupChatEvent::*;

        match self {
            Created(e) => &e.executor_id,
            Renamed(e) => &e.executor_id,
            MemberAdded(e) => &e.executor_id,
            MemberRemoved(e) => &e.executor_id,
            MessagePosted(e) => &e.executor_id,
            MessageDeleted(e) => &e.executor_id,
            Deleted(e) => &e.executor_id,
        }
    }

    /// Per-aggregate sequence number.
    pub fn seq_nr(&self) -> u64 {
        use GroupChatEvent::*;

        match self {
            Created(e) => e.seq_nr,
            Renamed(e) => e.seq_nr,
            MemberAdded(e) => e.seq_nr,
            MemberRemoved(e) => e.seq_nr,
            MessagePosted(e) => e.seq_nr,
            MessageDeleted(e) => e.seq_nr,
            Deleted(e) => e.seq_nr,
        }
    }

    /// When this event was captured.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        use GroupChatEvent::*;

        match self {
            Created(e) => e.occurred_at,
            Renamed(e) => e.occurred_at,
            MemberAdded(e) => e.occurred_at,
            MemberRemoved(e) => e.occurred_at,
            MessagePosted(e) => e.occurred_at,
            MessageDeleted(e) => e.occurred_at,
            Deleted(e) => e.occurred_at,
        }
    }

    /// True only for the creation event.
    pub fn is_created(&self) -> bool {
        matches!(self, GroupChatEvent::Created(_))
    }

    /// Human-readable event type name, identical to the wire `type` tag.
    pub fn event_type_name(&self) -> &'static str {
        use GroupChatEvent::*;

        match self {
            Created(_) => "GroupChatCreated",
            Renamed(_) => "GroupChatRenamed",
            MemberAdded(_) => "GroupChatMemberAdded",
            MemberRemoved(_) => "GroupChatMemberRemoved",
            MessagePosted(_) => "GroupChatMessagePosted",
            MessageDeleted(_) => "GroupChatMessageDeleted",
            Deleted(_) => "GroupChatDeleted",
        }
    }
}
