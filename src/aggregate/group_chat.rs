// Copyright (c) 2025 - Cowboy AI, Inc.
//! The `GroupChat` aggregate: a pure state machine over its event history.
//!
//! Every command method is a pure function
//! `(current state, arguments) → Result<(new state, event), GroupChatError>`.
//! Nothing is mutated in place; a successful command returns a fresh
//! aggregate value with `seq_nr` advanced by exactly one, plus the event
//! that records the change. The persistence `version` is owned by the
//! repository and only ever moved via [`GroupChat::with_version`].
//!
//! State is reconstructed by folding events onto a base snapshot:
//!
//! ```text
//! state = fold(events, snapshot, apply_event)
//! ```
//!
//! Replay routes each event back through the command method that produced
//! it. If a stored event fails validation during replay, the log and the
//! rules have diverged — that is a [`CorruptReplayError`], surfaced loudly
//! and never repaired.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    GroupChatId, GroupChatName, IdGenerator, Member, MemberId, MemberRole, Members, Message,
    MessageId, Messages, UserAccountId,
};
use crate::events::{
    GroupChatCreated, GroupChatDeleted, GroupChatEvent, GroupChatMemberAdded,
    GroupChatMemberRemoved, GroupChatMessageDeleted, GroupChatMessagePosted, GroupChatRenamed,
};

/// Domain invariant violation: a command is not valid against the current
/// state. Returned as a typed value, never panicked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupChatError {
    /// The aggregate is in its terminal deleted state
    #[error("the group chat is deleted: {0}")]
    AlreadyDeleted(GroupChatId),

    /// The user account is not the member of the group chat
    #[error("{0} is not the member of the group chat")]
    NotMember(UserAccountId),

    /// The user account is not the administrator of the group chat
    #[error("{0} is not the administrator of the group chat")]
    NotAdministrator(UserAccountId),

    /// The user account is already the member of the group chat
    #[error("{0} is already the member of the group chat")]
    AlreadyMember(UserAccountId),

    /// Renaming to the current name is rejected, not treated as idempotent
    #[error("the name is the same as the current name: {0}")]
    SameName(GroupChatName),

    /// The sender id is not the member of the group chat
    #[error("sender id {0} is not the member of the group chat")]
    SenderNotMember(UserAccountId),

    /// A message with this id already exists
    #[error("the message id already exists: {0}")]
    DuplicateMessageId(MessageId),

    /// No message with this id exists
    #[error("the message is not found: {0}")]
    MessageNotFound(MessageId),
}

/// The stored event log disagrees with the rules that produced it.
///
/// Fatal: replay never repairs history.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptReplayError {
    /// A stored event re-triggered a validation failure on replay
    #[error("stored event at sequence number {seq_nr} violates its own rules: {source}")]
    Rejected {
        seq_nr: u64,
        source: GroupChatError,
    },

    /// A stored event's sequence number does not follow the state it
    /// applies to (gap or duplicate in the log)
    #[error("sequence number mismatch on replay: expected {expected}, event carries {actual}")]
    SequenceMismatch { expected: u64, actual: u64 },

    /// A creation event arrived on an already created aggregate
    #[error("creation event at sequence number {seq_nr} on an already created group chat")]
    UnexpectedCreation { seq_nr: u64 },

    /// Full-history replay did not begin with a creation event
    #[error("event history does not begin with a creation event")]
    MissingCreation,
}

/// Immutable group chat aggregate state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupChat {
    id: GroupChatId,
    deleted: bool,
    name: GroupChatName,
    members: Members,
    messages: Messages,
    /// Count of applied events, starting at 1 at creation
    seq_nr: u64,
    /// Persistence revision for optimistic concurrency; advanced by the
    /// repository, never by the aggregate itself
    version: u64,
}

impl GroupChat {
    /// Create a new group chat. Unconditional: never fails.
    ///
    /// The resulting state has `seq_nr = 1` and exactly the executor as
    /// administrator.
    pub fn create(
        id: GroupChatId,
        name: GroupChatName,
        executor_id: UserAccountId,
        generator: &IdGenerator,
    ) -> (GroupChat, GroupChatEvent) {
        let members = Members::new(Member::new(
            MemberId::generate(generator),
            executor_id,
            MemberRole::Administrator,
        ));
        let state = GroupChat {
            id,
            deleted: false,
            name: name.clone(),
            members: members.clone(),
            messages: Messages::new(),
            seq_nr: 1,
            version: 1,
        };
        let event = GroupChatEvent::Created(GroupChatCreated::new(
            generator,
            id,
            state.seq_nr,
            name,
            members,
            executor_id,
        ));
        (state, event)
    }

    /// Rename the group chat.
    ///
    /// Fails if deleted, if the executor is not an administrator, or if
    /// the name equals the current one.
    pub fn rename(
        &self,
        name: GroupChatName,
        executor_id: UserAccountId,
        generator: &IdGenerator,
    ) -> Result<(GroupChat, GroupChatEvent), GroupChatError> {
        self.ensure_not_deleted()?;
        if !self.members.is_member(&executor_id) {
            return Err(GroupChatError::NotMember(executor_id));
        }
        if !self.members.is_administrator(&executor_id) {
            return Err(GroupChatError::NotAdministrator(executor_id));
        }
        if self.name == name {
            return Err(GroupChatError::SameName(name));
        }

        let state = GroupChat {
            name: name.clone(),
            seq_nr: self.seq_nr + 1,
            ..self.clone()
        };
        let event = GroupChatEvent::Renamed(GroupChatRenamed::new(
            generator,
            self.id,
            state.seq_nr,
            name,
            executor_id,
        ));
        Ok((state, event))
    }

    /// Add a member with the given role.
    ///
    /// Fails if deleted, if the account is already a member, or if the
    /// executor is not an administrator. A fresh `MemberId` is generated.
    pub fn add_member(
        &self,
        user_account_id: UserAccountId,
        role: MemberRole,
        executor_id: UserAccountId,
        generator: &IdGenerator,
    ) -> Result<(GroupChat, GroupChatEvent), GroupChatError> {
        self.ensure_not_deleted()?;
        if self.members.is_member(&user_account_id) {
            return Err(GroupChatError::AlreadyMember(user_account_id));
        }
        if !self.members.is_administrator(&executor_id) {
            return Err(GroupChatError::NotAdministrator(executor_id));
        }

        let member = Member::new(MemberId::generate(generator), user_account_id, role);
        let state = GroupChat {
            members: self.members.add(member.clone()),
            seq_nr: self.seq_nr + 1,
            ..self.clone()
        };
        let event = GroupChatEvent::MemberAdded(GroupChatMemberAdded::new(
            generator,
            self.id,
            state.seq_nr,
            member,
            executor_id,
        ));
        Ok((state, event))
    }

    /// Remove the member for the given user account.
    ///
    /// Fails if deleted or if the account is not a member. The executor is
    /// deliberately not required to be an administrator.
    pub fn remove_member_by_id(
        &self,
        user_account_id: UserAccountId,
        executor_id: UserAccountId,
        generator: &IdGenerator,
    ) -> Result<(GroupChat, GroupChatEvent), GroupChatError> {
        self.ensure_not_deleted()?;
        let (members, removed) = self
            .members
            .remove_by_id(&user_account_id)
            .ok_or(GroupChatError::NotMember(user_account_id))?;

        let state = GroupChat {
            members,
            seq_nr: self.seq_nr + 1,
            ..self.clone()
        };
        let event = GroupChatEvent::MemberRemoved(GroupChatMemberRemoved::new(
            generator,
            self.id,
            state.seq_nr,
            removed,
            executor_id,
        ));
        Ok((state, event))
    }

    /// Post a message.
    ///
    /// Fails if deleted, if the executor or the message's sender is not a
    /// member, or if the message id already exists.
    pub fn post_message(
        &self,
        message: Message,
        executor_id: UserAccountId,
        generator: &IdGenerator,
    ) -> Result<(GroupChat, GroupChatEvent), GroupChatError> {
        self.ensure_not_deleted()?;
        if !self.members.is_member(&executor_id) {
            return Err(GroupChatError::NotMember(executor_id));
        }
        if !self.members.is_member(&message.sender_id) {
            return Err(GroupChatError::SenderNotMember(message.sender_id));
        }
        if self.messages.contains(&message.id) {
            return Err(GroupChatError::DuplicateMessageId(message.id));
        }

        let state = GroupChat {
            messages: self.messages.add(message.clone()),
            seq_nr: self.seq_nr + 1,
            ..self.clone()
        };
        let event = GroupChatEvent::MessagePosted(GroupChatMessagePosted::new(
            generator,
            self.id,
            state.seq_nr,
            message,
            executor_id,
        ));
        Ok((state, event))
    }

    /// Delete a message by id.
    ///
    /// Fails if deleted, if the executor is not a member, or if the
    /// message does not exist. Any member may delete any message; the
    /// executor is deliberately not required to be the sender.
    pub fn delete_message(
        &self,
        message_id: MessageId,
        executor_id: UserAccountId,
        generator: &IdGenerator,
    ) -> Result<(GroupChat, GroupChatEvent), GroupChatError> {
        self.ensure_not_deleted()?;
        if !self.members.is_member(&executor_id) {
            return Err(GroupChatError::NotMember(executor_id));
        }
        let (messages, removed) = self
            .messages
            .remove_by_id(&message_id)
            .ok_or(GroupChatError::MessageNotFound(message_id))?;

        let state = GroupChat {
            messages,
            seq_nr: self.seq_nr + 1,
            ..self.clone()
        };
        let event = GroupChatEvent::MessageDeleted(GroupChatMessageDeleted::new(
            generator,
            self.id,
            state.seq_nr,
            removed,
            executor_id,
        ));
        Ok((state, event))
    }

    /// Logically delete the group chat. Terminal: every later command is
    /// rejected by the deletion guard.
    ///
    /// Fails if already deleted or if the executor is not an administrator.
    pub fn delete(
        &self,
        executor_id: UserAccountId,
        generator: &IdGenerator,
    ) -> Result<(GroupChat, GroupChatEvent), GroupChatError> {
        self.ensure_not_deleted()?;
        if !self.members.is_administrator(&executor_id) {
            return Err(GroupChatError::NotAdministrator(executor_id));
        }

        let state = GroupChat {
            deleted: true,
            seq_nr: self.seq_nr + 1,
            ..self.clone()
        };
        let event = GroupChatEvent::Deleted(GroupChatDeleted::new(
            generator,
            self.id,
            state.seq_nr,
            executor_id,
        ));
        Ok((state, event))
    }

    /// Apply a stored event by routing it back through the command method
    /// that produced it. The re-derived event is discarded; the stored
    /// event is authoritative.
    ///
    /// A validation failure here means the log and the rules have
    /// diverged.
    pub fn apply_event(
        &self,
        event: &GroupChatEvent,
        generator: &IdGenerator,
    ) -> Result<GroupChat, CorruptReplayError> {
        let seq_nr = event.seq_nr();
        let applied = match event {
            GroupChatEvent::Created(_) => {
                return Err(CorruptReplayError::UnexpectedCreation { seq_nr });
            }
            GroupChatEvent::Renamed(e) => {
                self.rename(e.name.clone(), e.executor_id, generator)
            }
            GroupChatEvent::MemberAdded(e) => self.add_member(
                e.member.user_account_id,
                e.member.role,
                e.executor_id,
                generator,
            ),
            GroupChatEvent::MemberRemoved(e) => {
                self.remove_member_by_id(e.member.user_account_id, e.executor_id, generator)
            }
            GroupChatEvent::MessagePosted(e) => {
                self.post_message(e.message.clone(), e.executor_id, generator)
            }
            GroupChatEvent::MessageDeleted(e) => {
                self.delete_message(e.message.id, e.executor_id, generator)
            }
            GroupChatEvent::Deleted(e) => self.delete(e.executor_id, generator),
        };

        let (state, _) =
            applied.map_err(|source| CorruptReplayError::Rejected { seq_nr, source })?;
        if state.seq_nr != seq_nr {
            return Err(CorruptReplayError::SequenceMismatch {
                expected: state.seq_nr,
                actual: seq_nr,
            });
        }
        Ok(state)
    }

    /// Fold an ordered event sequence onto a base snapshot.
    pub fn replay(
        events: &[GroupChatEvent],
        snapshot: GroupChat,
        generator: &IdGenerator,
    ) -> Result<GroupChat, CorruptReplayError> {
        events.iter().try_fold(snapshot, |state, event| {
            state.apply_event(event, generator)
        })
    }

    /// Reconstruct an aggregate from its full event history, which must
    /// begin with the creation event.
    pub fn from_events(
        events: &[GroupChatEvent],
        generator: &IdGenerator,
    ) -> Result<GroupChat, CorruptReplayError> {
        let (first, rest) = events
            .split_first()
            .ok_or(CorruptReplayError::MissingCreation)?;
        let GroupChatEvent::Created(created) = first else {
            return Err(CorruptReplayError::MissingCreation);
        };
        Self::replay(rest, Self::from_created(created), generator)
    }

    /// Base state reconstructed from a creation event payload.
    fn from_created(event: &GroupChatCreated) -> GroupChat {
        GroupChat {
            id: event.aggregate_id,
            deleted: false,
            name: event.name.clone(),
            members: event.members.clone(),
            messages: Messages::new(),
            seq_nr: event.seq_nr,
            version: 1,
        }
    }

    fn ensure_not_deleted(&self) -> Result<(), GroupChatError> {
        if self.deleted {
            return Err(GroupChatError::AlreadyDeleted(self.id));
        }
        Ok(())
    }

    pub fn id(&self) -> &GroupChatId {
        &self.id
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn name(&self) -> &GroupChatName {
        &self.name
    }

    pub fn members(&self) -> &Members {
        &self.members
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    pub fn seq_nr(&self) -> u64 {
        self.seq_nr
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Copy with the persistence revision set. Repository use only.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn name(s: &str) -> GroupChatName {
        GroupChatName::new(s).unwrap()
    }

    fn message(generator: &IdGenerator, sender_id: UserAccountId, content: &str) -> Message {
        Message::new(
            MessageId::generate(generator),
            content,
            sender_id,
            Utc::now(),
        )
    }

    /// Scenario: creation yields seq_nr 1 and exactly the creator as
    /// administrator.
    #[test]
    fn test_create() {
        let generator = IdGenerator::new();
        let id = GroupChatId::generate(&generator);
        let creator = UserAccountId::generate(&generator);

        let (chat, event) = GroupChat::create(id, name("Team A"), creator, &generator);

        assert_eq!(chat.seq_nr(), 1);
        assert_eq!(chat.name(), &name("Team A"));
        assert_eq!(chat.members().len(), 1);
        assert!(chat.members().is_administrator(&creator));
        assert!(chat.messages().is_empty());
        assert!(!chat.is_deleted());

        assert!(event.is_created());
        assert_eq!(event.seq_nr(), 1);
        assert_eq!(event.aggregate_id(), &id);
        assert_eq!(event.executor_id(), &creator);
    }

    #[test]
    fn test_rename() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );

        let (renamed, event) = chat.rename(name("Team B"), creator, &generator).unwrap();

        assert_eq!(renamed.name(), &name("Team B"));
        assert_eq!(renamed.seq_nr(), 2);
        assert_eq!(event.seq_nr(), 2);
        // Original value untouched
        assert_eq!(chat.name(), &name("Team A"));
    }

    /// Scenario: rename by a non-member fails with "not the member".
    #[test]
    fn test_rename_by_non_member() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let stranger = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );

        let result = chat.rename(name("x"), stranger, &generator);

        assert_eq!(result.unwrap_err(), GroupChatError::NotMember(stranger));
        assert_eq!(chat.name(), &name("Team A"));
        assert_eq!(chat.seq_nr(), 1);
    }

    #[test]
    fn test_rename_by_plain_member() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let member = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let (chat, _) = chat
            .add_member(member, MemberRole::Member, creator, &generator)
            .unwrap();

        let result = chat.rename(name("Team B"), member, &generator);

        assert_eq!(result.unwrap_err(), GroupChatError::NotAdministrator(member));
    }

    #[test]
    fn test_rename_to_same_name() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );

        let result = chat.rename(name("Team A"), creator, &generator);

        assert_eq!(
            result.unwrap_err(),
            GroupChatError::SameName(name("Team A"))
        );
    }

    #[test]
    fn test_add_member() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let newcomer = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );

        let (chat, event) = chat
            .add_member(newcomer, MemberRole::Member, creator, &generator)
            .unwrap();

        assert_eq!(chat.seq_nr(), 2);
        assert!(chat.members().is_member(&newcomer));
        assert!(!chat.members().is_administrator(&newcomer));
        match event {
            GroupChatEvent::MemberAdded(e) => {
                assert_eq!(e.member.user_account_id, newcomer);
                assert_eq!(e.member.role, MemberRole::Member);
            }
            other => panic!("expected MemberAdded, got {other:?}"),
        }
    }

    #[test]
    fn test_add_member_twice() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let newcomer = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let (chat, _) = chat
            .add_member(newcomer, MemberRole::Member, creator, &generator)
            .unwrap();

        let result = chat.add_member(newcomer, MemberRole::Member, creator, &generator);

        assert_eq!(result.unwrap_err(), GroupChatError::AlreadyMember(newcomer));
    }

    #[test]
    fn test_add_member_by_non_administrator() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let member = UserAccountId::generate(&generator);
        let newcomer = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let (chat, _) = chat
            .add_member(member, MemberRole::Member, creator, &generator)
            .unwrap();

        let result = chat.add_member(newcomer, MemberRole::Member, member, &generator);

        assert_eq!(result.unwrap_err(), GroupChatError::NotAdministrator(member));
    }

    /// Scenario: a plain member may remove themselves; removal requires no
    /// administrator role.
    #[test]
    fn test_member_removes_self() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let member = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let (chat, _) = chat
            .add_member(member, MemberRole::Member, creator, &generator)
            .unwrap();

        let (chat, event) = chat
            .remove_member_by_id(member, member, &generator)
            .unwrap();

        assert!(!chat.members().contains(&member));
        assert_eq!(chat.seq_nr(), 3);
        match event {
            GroupChatEvent::MemberRemoved(e) => {
                assert_eq!(e.member.user_account_id, member);
            }
            other => panic!("expected MemberRemoved, got {other:?}"),
        }
    }

    #[test]
    fn test_remove_unknown_member() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let stranger = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );

        let result = chat.remove_member_by_id(stranger, creator, &generator);

        assert_eq!(result.unwrap_err(), GroupChatError::NotMember(stranger));
    }

    #[test]
    fn test_post_message() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );

        let msg = message(&generator, creator, "hello");
        let (chat, event) = chat.post_message(msg.clone(), creator, &generator).unwrap();

        assert_eq!(chat.messages().len(), 1);
        assert_eq!(chat.messages().get(&msg.id), Some(&msg));
        assert_eq!(event.seq_nr(), 2);
    }

    /// Scenario: posting on behalf of a non-member sender fails even when
    /// the executor is a member.
    #[test]
    fn test_post_message_with_foreign_sender() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let outsider = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );

        let msg = message(&generator, outsider, "hi");
        let result = chat.post_message(msg, creator, &generator);

        assert_eq!(
            result.unwrap_err(),
            GroupChatError::SenderNotMember(outsider)
        );
    }

    #[test]
    fn test_post_duplicate_message_id() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let msg = message(&generator, creator, "hello");
        let (chat, _) = chat.post_message(msg.clone(), creator, &generator).unwrap();

        let result = chat.post_message(msg.clone(), creator, &generator);

        assert_eq!(
            result.unwrap_err(),
            GroupChatError::DuplicateMessageId(msg.id)
        );
    }

    /// Any member may delete any message; the deleter need not be the
    /// sender.
    #[test]
    fn test_delete_message_by_other_member() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let member = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let (chat, _) = chat
            .add_member(member, MemberRole::Member, creator, &generator)
            .unwrap();
        let msg = message(&generator, creator, "hello");
        let (chat, _) = chat.post_message(msg.clone(), creator, &generator).unwrap();

        let (chat, event) = chat.delete_message(msg.id, member, &generator).unwrap();

        assert!(chat.messages().is_empty());
        match event {
            GroupChatEvent::MessageDeleted(e) => assert_eq!(e.message, msg),
            other => panic!("expected MessageDeleted, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_unknown_message() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let unknown = MessageId::generate(&generator);

        let result = chat.delete_message(unknown, creator, &generator);

        assert_eq!(result.unwrap_err(), GroupChatError::MessageNotFound(unknown));
    }

    /// Scenario: once deleted, every command is rejected by the deletion
    /// guard and the state stays unchanged.
    #[test]
    fn test_deleted_is_terminal() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let other = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let (chat, _) = chat.delete(creator, &generator).unwrap();
        assert!(chat.is_deleted());
        assert_eq!(chat.seq_nr(), 2);

        let expected = GroupChatError::AlreadyDeleted(*chat.id());
        let msg = message(&generator, creator, "too late");

        assert_eq!(
            chat.rename(name("x"), creator, &generator).unwrap_err(),
            expected
        );
        assert_eq!(
            chat.add_member(other, MemberRole::Member, creator, &generator)
                .unwrap_err(),
            expected
        );
        assert_eq!(
            chat.remove_member_by_id(creator, creator, &generator)
                .unwrap_err(),
            expected
        );
        assert_eq!(
            chat.post_message(msg.clone(), creator, &generator)
                .unwrap_err(),
            expected
        );
        assert_eq!(
            chat.delete_message(msg.id, creator, &generator).unwrap_err(),
            expected
        );
        assert_eq!(chat.delete(creator, &generator).unwrap_err(), expected);

        assert_eq!(chat.seq_nr(), 2);
    }

    #[test]
    fn test_delete_by_non_administrator() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let member = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let (chat, _) = chat
            .add_member(member, MemberRole::Member, creator, &generator)
            .unwrap();

        let result = chat.delete(member, &generator);

        assert_eq!(result.unwrap_err(), GroupChatError::NotAdministrator(member));
    }

    #[test]
    fn test_from_events_reproduces_state() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let member = UserAccountId::generate(&generator);

        let (chat, created) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let (chat, added) = chat
            .add_member(member, MemberRole::Member, creator, &generator)
            .unwrap();
        let msg = message(&generator, member, "hello");
        let (chat, posted) = chat.post_message(msg, member, &generator).unwrap();
        let (chat, renamed) = chat.rename(name("Team B"), creator, &generator).unwrap();

        let replayed =
            GroupChat::from_events(&[created, added, posted, renamed], &generator).unwrap();

        assert_eq!(replayed, chat.clone().with_version(replayed.version()));
        assert_eq!(replayed.seq_nr(), 4);
    }

    #[test]
    fn test_replay_from_snapshot() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let member = UserAccountId::generate(&generator);

        let (snapshot, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let (expected, added) = snapshot
            .add_member(member, MemberRole::Member, creator, &generator)
            .unwrap();

        let replayed = GroupChat::replay(&[added], snapshot, &generator).unwrap();

        assert_eq!(replayed, expected);
    }

    /// A log that disagrees with the rules must fail loudly, not be
    /// absorbed.
    #[test]
    fn test_replay_of_invalid_history_is_corrupt() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let outsider = UserAccountId::generate(&generator);

        let (snapshot, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );

        // Forged event: a rename issued by a non-member.
        let forged = GroupChatEvent::Renamed(GroupChatRenamed::new(
            &generator,
            *snapshot.id(),
            2,
            name("Team B"),
            outsider,
        ));

        let result = GroupChat::replay(&[forged], snapshot, &generator);

        assert_eq!(
            result.unwrap_err(),
            CorruptReplayError::Rejected {
                seq_nr: 2,
                source: GroupChatError::NotMember(outsider),
            }
        );
    }

    #[test]
    fn test_replay_detects_sequence_gap() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let (snapshot, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );

        // seq_nr 5 on a state at seq_nr 1: a gap in the log.
        let gapped = GroupChatEvent::Renamed(GroupChatRenamed::new(
            &generator,
            *snapshot.id(),
            5,
            name("Team B"),
            creator,
        ));

        let result = GroupChat::replay(&[gapped], snapshot, &generator);

        assert_eq!(
            result.unwrap_err(),
            CorruptReplayError::SequenceMismatch {
                expected: 2,
                actual: 5,
            }
        );
    }

    #[test]
    fn test_history_must_start_with_creation() {
        let generator = IdGenerator::new();
        let creator = UserAccountId::generate(&generator);
        let (chat, _) = GroupChat::create(
            GroupChatId::generate(&generator),
            name("Team A"),
            creator,
            &generator,
        );
        let (_, renamed) = chat.rename(name("Team B"), creator, &generator).unwrap();

        assert_eq!(
            GroupChat::from_events(&[], &generator).unwrap_err(),
            CorruptReplayError::MissingCreation
        );
        assert_eq!(
            GroupChat::from_events(&[renamed], &generator).unwrap_err(),
            CorruptReplayError::MissingCreation
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Abstract command applied against a small pool of user accounts.
        #[derive(Debug, Clone)]
        enum Op {
            Rename(u8),
            AddMember(u8),
            RemoveMember(u8),
            PostMessage(u8, u8),
            Delete,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u8..50).prop_map(Op::Rename),
                (0u8..6).prop_map(Op::AddMember),
                (0u8..6).prop_map(Op::RemoveMember),
                ((0u8..6), (0u8..50)).prop_map(|(s, c)| Op::PostMessage(s, c)),
                // Deletion is rare so most sequences keep making progress
                Just(Op::Delete),
            ]
        }

        fn apply(
            chat: &GroupChat,
            op: &Op,
            accounts: &[UserAccountId],
            creator: UserAccountId,
            generator: &IdGenerator,
        ) -> Result<(GroupChat, GroupChatEvent), GroupChatError> {
            match op {
                Op::Rename(n) => chat.rename(
                    GroupChatName::new(format!("name-{n}")).unwrap(),
                    creator,
                    generator,
                ),
                Op::AddMember(i) => chat.add_member(
                    accounts[*i as usize],
                    MemberRole::Member,
                    creator,
                    generator,
                ),
                Op::RemoveMember(i) => {
                    chat.remove_member_by_id(accounts[*i as usize], creator, generator)
                }
                Op::PostMessage(i, c) => {
                    let sender = accounts[*i as usize];
                    let msg = Message::new(
                        MessageId::generate(generator),
                        format!("message-{c}"),
                        sender,
                        Utc::now(),
                    );
                    chat.post_message(msg, sender, generator)
                }
                Op::Delete => chat.delete(creator, generator),
            }
        }

        proptest! {
            /// Every accepted command advances seq_nr by exactly one,
            /// every rejected command leaves the state untouched, and the
            /// accumulated event log replays to the same state.
            #[test]
            fn prop_seq_nr_and_replay(ops in prop::collection::vec(op(), 0..40)) {
                let generator = IdGenerator::new();
                let creator = UserAccountId::generate(&generator);
                let accounts: Vec<UserAccountId> =
                    (0..6).map(|_| UserAccountId::generate(&generator)).collect();

                let (mut chat, created) = GroupChat::create(
                    GroupChatId::generate(&generator),
                    GroupChatName::new("origin").unwrap(),
                    creator,
                    &generator,
                );
                let mut log = vec![created];

                for op in &ops {
                    let before = chat.seq_nr();
                    match apply(&chat, op, &accounts, creator, &generator) {
                        Ok((next, event)) => {
                            prop_assert_eq!(next.seq_nr(), before + 1);
                            prop_assert_eq!(event.seq_nr(), before + 1);
                            log.push(event);
                            chat = next;
                        }
                        Err(_) => {
                            prop_assert_eq!(chat.seq_nr(), before);
                        }
                    }
                }

                let replayed = GroupChat::from_events(&log, &generator).unwrap();
                prop_assert_eq!(replayed.seq_nr(), chat.seq_nr());
                let version = replayed.version();
                prop_assert_eq!(replayed, chat.with_version(version));
            }
        }
    }
}
