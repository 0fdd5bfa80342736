// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain event taxonomy.

pub mod group_chat;

pub use group_chat::{
    GroupChatCreated, GroupChatDeleted, GroupChatEvent, GroupChatMemberAdded,
    GroupChatMemberRemoved, GroupChatMessageDeleted, GroupChatMessagePosted, GroupChatRenamed,
};
