// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Aggregate
//!
//! The event sourcing pattern for the group chat aggregate:
//! - Command methods are pure: `State → Args → Result<(State, Event), Error>`
//! - State reconstruction via event folding: `[Event] → State`
//! - No mutations, no I/O; all state changes represented as events
//!
//! ```text
//! Command → GroupChat → Event → Event Store
//!    ↓          ↓         ↓
//! Intent   Validation   Fact
//! ```
//!
//! Commands can fail; events cannot. A stored event failing validation on
//! replay is a corrupt history, reported as [`CorruptReplayError`].

pub mod group_chat;

pub use group_chat::{CorruptReplayError, GroupChat, GroupChatError};
