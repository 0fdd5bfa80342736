// Copyright (c) 2025 - Cowboy AI, Inc.
//! Membership value objects.
//!
//! A [`Member`] ties a user account to a group chat with a role. Two
//! members are the same member when they refer to the same user account,
//! regardless of the membership entry id. [`Members`] keeps at most one
//! entry per user account.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::domain::{MemberId, UserAccountId};

/// Role of a member within a group chat.
///
/// Administrators hold the elevated permissions: rename, add member,
/// delete the group chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Administrator,
    Member,
}

/// A user account's membership in a group chat.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub user_account_id: UserAccountId,
    pub role: MemberRole,
}

impl Member {
    pub fn new(id: MemberId, user_account_id: UserAccountId, role: MemberRole) -> Self {
        Self {
            id,
            user_account_id,
            role,
        }
    }

    pub fn is_administrator(&self) -> bool {
        self.role == MemberRole::Administrator
    }
}

// Identity is the user account, not the membership entry id.
impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.user_account_id == other.user_account_id
    }
}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.user_account_id.hash(state);
    }
}

/// The member set of a group chat, keyed by user account id.
///
/// Immutable: mutating operations return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Member>", into = "Vec<Member>")]
pub struct Members {
    entries: BTreeMap<UserAccountId, Member>,
}

impl Members {
    /// Create the initial member set of a fresh group chat: exactly the
    /// creating administrator.
    pub fn new(administrator: Member) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(administrator.user_account_id, administrator);
        Self { entries }
    }

    /// Return a copy with `member` inserted, replacing any entry for the
    /// same user account.
    pub fn add(&self, member: Member) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(member.user_account_id, member);
        Self { entries }
    }

    /// Return a copy without the given user account, together with the
    /// removed member. `None` if the account is not a member.
    pub fn remove_by_id(&self, user_account_id: &UserAccountId) -> Option<(Self, Member)> {
        let mut entries = self.entries.clone();
        let removed = entries.remove(user_account_id)?;
        Some((Self { entries }, removed))
    }

    pub fn contains(&self, user_account_id: &UserAccountId) -> bool {
        self.entries.contains_key(user_account_id)
    }

    pub fn is_member(&self, user_account_id: &UserAccountId) -> bool {
        self.contains(user_account_id)
    }

    pub fn is_administrator(&self, user_account_id: &UserAccountId) -> bool {
        self.entries
            .get(user_account_id)
            .is_some_and(Member::is_administrator)
    }

    pub fn get(&self, user_account_id: &UserAccountId) -> Option<&Member> {
        self.entries.get(user_account_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.entries.values()
    }
}

impl From<Vec<Member>> for Members {
    fn from(members: Vec<Member>) -> Self {
        let entries = members
            .into_iter()
            .map(|m| (m.user_account_id, m))
            .collect();
        Self { entries }
    }
}

impl From<Members> for Vec<Member> {
    fn from(members: Members) -> Self {
        members.entries.into_values().collect()
    }
}
