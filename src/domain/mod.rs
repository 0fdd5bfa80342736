// Copyright (c) 2025 - Cowboy AI, Inc.
//! Group Chat Domain Models
//!
//! Identifiers and value objects with validation invariants:
//!
//! - [`GroupChatId`], [`UserAccountId`], [`MemberId`], [`MessageId`] —
//!   prefixed, time-sortable ULID identifiers
//! - [`IdGenerator`] — injectable monotonic ULID factory
//! - [`GroupChatName`] — non-empty, ≤ 100 characters
//! - [`Member`] / [`Members`] — membership keyed by user account
//! - [`Message`] / [`Messages`] — posted messages keyed by message id

pub mod group_chat_name;
pub mod id;
pub mod id_generator;
pub mod member;
pub mod message;

pub use group_chat_name::{GroupChatName, GroupChatNameError};
pub use id::{GroupChatId, IdError, MemberId, MessageId, UserAccountId};
pub use id_generator::IdGenerator;
pub use member::{Member, MemberRole, Members};
pub use message::{Message, Messages};
