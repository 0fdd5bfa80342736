// Copyright (c) 2025 - Cowboy AI, Inc.
//! Group chat name value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Group chat name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GroupChatNameError {
    #[error("Group chat name is empty")]
    Empty,

    #[error("Group chat name exceeds maximum length of 100 characters: {0}")]
    TooLong(usize),
}

/// Validated group chat name.
///
/// Invariants enforced at construction:
/// - Non-empty
/// - Length ≤ 100 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupChatName(String);

impl GroupChatName {
    /// Maximum length in characters.
    pub const MAX_LENGTH: usize = 100;

    /// Create a new name with validation.
    pub fn new(name: impl Into<String>) -> Result<Self, GroupChatNameError> {
        let name = name.into();

        if name.is_empty() {
            return Err(GroupChatNameError::Empty);
        }

        let length = name.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(GroupChatNameError::TooLong(length));
        }

        Ok(Self(name))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupChatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for GroupChatName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GroupChatName {
    type Error = GroupChatNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for GroupChatName {
    type Error = GroupChatNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
