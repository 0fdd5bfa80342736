// Copyright (c) 2025 - Cowboy AI, Inc.
//! Message value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{MessageId, UserAccountId};

/// A message posted to a group chat.
///
/// Plain value: equality by all fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub sender_id: UserAccountId,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        id: MessageId,
        content: impl Into<String>,
        sender_id: UserAccountId,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            sender_id,
            sent_at,
        }
    }
}

/// The messages of a group chat, keyed by message id.
///
/// Keys are unique; insertion order is preserved for display. Immutable:
/// mutating operations return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Messages {
    entries: Vec<Message>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `message` appended. The caller is responsible
    /// for checking [`contains`](Self::contains) first; duplicate ids are
    /// rejected at the aggregate boundary.
    pub fn add(&self, message: Message) -> Self {
        let mut entries = self.entries.clone();
        entries.push(message);
        Self { entries }
    }

    /// Return a copy without the given message id, together with the
    /// removed message. `None` if the id is unknown.
    pub fn remove_by_id(&self, id: &MessageId) -> Option<(Self, Message)> {
        let index = self.entries.iter().position(|m| m.id == *id)?;
        let mut entries = self.entries.clone();
        let removed = entries.remove(index);
        Some((Self { entries }, removed))
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.entries.iter().any(|m| m.id == *id)
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.entries.iter().find(|m| m.id == *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }
}
