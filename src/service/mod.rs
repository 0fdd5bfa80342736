// Copyright (c) 2025 - Cowboy AI, Inc.
//! Command processor layer.

pub mod group_chat;

pub use group_chat::{
    CommandProcessorError, EveryNEvents, GroupChatCommandProcessor, Never, SnapshotPolicy,
};
