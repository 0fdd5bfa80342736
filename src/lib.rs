// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event-sourced group chat command core.
//!
//! Every state change is derived from a strictly ordered, appended event
//! log; current state is a replay of that log (snapshots are a cache).
//! The crate provides the identifier and value object types, the event
//! taxonomy, the pure [`GroupChat`] aggregate, the
//! [`GroupChatCommandProcessor`] orchestrating load → decide → persist,
//! and the [`EventStore`] contract with optimistic concurrency.
//!
//! ```text
//! caller → CommandProcessor.find_by_id → GroupChat.command(...)
//!        → CommandProcessor.persist(event, expected version) → EventStore
//! ```

pub mod aggregate;
pub mod domain;
pub mod errors;
pub mod event_store;
pub mod events;
pub mod service;

// Re-export commonly used types
pub use aggregate::{CorruptReplayError, GroupChat, GroupChatError};
pub use domain::{
    GroupChatId, GroupChatName, GroupChatNameError, IdGenerator, Member, MemberId, MemberRole,
    Members, Message, MessageId, Messages, UserAccountId,
};
pub use errors::{EventStoreError, EventStoreResult};
pub use event_store::{EventStore, InMemoryEventStore};
pub use events::GroupChatEvent;
pub use service::{
    CommandProcessorError, EveryNEvents, GroupChatCommandProcessor, Never, SnapshotPolicy,
};
