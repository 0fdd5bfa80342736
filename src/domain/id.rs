// Copyright (c) 2025 - Cowboy AI, Inc.
//! Strongly-typed, prefixed ULID identifiers for the group chat domain.
//!
//! Every identifier renders as `"<TypeName>-<ulid>"` and parses from either
//! the bare ULID or the prefixed form. Generated values are time-sortable,
//! so identifiers order by creation time.

use core::str::FromStr;
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use ulid::Ulid;

use crate::domain::IdGenerator;

/// Identifier parse/validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Value is neither a bare ULID nor a correctly prefixed ULID
    #[error("{type_name} id is not a valid ULID: {input}")]
    MalformedUlid {
        type_name: &'static str,
        input: String,
    },
}

/// Identifier of a group chat aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupChatId(Ulid);

/// Identifier of a user account (actor identity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserAccountId(Ulid);

/// Identifier of a membership entry within a group chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MemberId(Ulid);

/// Identifier of a posted message.
///
/// Message ids are supplied by the caller when posting, so construction
/// from external input validates the ULID syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(Ulid);

macro_rules! impl_ulid_id {
    ($t:ty, $type_name:literal) => {
        impl $t {
            /// Type name used as the rendering prefix.
            pub const TYPE_NAME: &'static str = $type_name;

            /// Wrap an existing ULID.
            pub fn from_ulid(value: Ulid) -> Self {
                Self(value)
            }

            /// Generate a fresh, time-sortable identifier.
            pub fn generate(generator: &IdGenerator) -> Self {
                Self(generator.generate())
            }

            /// The underlying ULID value.
            pub fn value(&self) -> Ulid {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}-{}", Self::TYPE_NAME, self.0)
            }
        }

        impl From<Ulid> for $t {
            fn from(value: Ulid) -> Self {
                Self(value)
            }
        }

        impl FromStr for $t {
            type Err = IdError;

            /// Accepts a bare ULID or a `"<TypeName>-"`-prefixed ULID.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bare = s
                    .strip_prefix(concat!($type_name, "-"))
                    .unwrap_or(s);
                Ulid::from_string(bare)
                    .map(Self)
                    .map_err(|_| IdError::MalformedUlid {
                        type_name: Self::TYPE_NAME,
                        input: s.to_string(),
                    })
            }
        }

        impl TryFrom<&str> for $t {
            type Error = IdError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        // Wire shape: identifiers serialize as `{"value": "<ulid>"}`;
        // deserialization also accepts the prefixed string.
        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut state = serializer.serialize_struct(stringify!($t), 1)?;
                state.serialize_field("value", &self.0)?;
                state.end()
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                #[derive(Deserialize)]
                struct Raw {
                    value: String,
                }

                let raw = Raw::deserialize(deserializer)?;
                raw.value.parse().map_err(D::Error::custom)
            }
        }
    };
}

impl_ulid_id!(GroupChatId, "GroupChat");
impl_ulid_id!(UserAccountId, "UserAccount");
impl_ulid_id!(MemberId, "Member");
impl_ulid_id!(MessageId, "Message");
