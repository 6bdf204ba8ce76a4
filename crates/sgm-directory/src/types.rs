//! Entity and id types for the remote object directory

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Id of a role in the remote store
    RoleId
);
id_type!(
    /// Id of a category in the remote store
    CategoryId
);
id_type!(
    /// Id of a channel in the remote store
    ChannelId
);
id_type!(
    /// Id of a message in the remote store
    MessageId
);
id_type!(
    /// Id of a guild member (or the bot itself)
    ActorId
);
id_type!(
    /// Id of the guild the event originated from
    GuildId
);

/// Role display colors supported by the remote store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoleColor {
    /// No explicit color
    #[default]
    Default,
    Blue,
    Green,
    Red,
    Purple,
}

/// Creation parameters for a role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSpec {
    /// Display name, unique only by convention
    pub name: String,
    /// Display color
    pub color: RoleColor,
    /// Whether members are listed separately under this role
    pub hoist: bool,
}

impl RoleSpec {
    /// Spec with the given name, default color, not hoisted
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: RoleColor::Default,
            hoist: false,
        }
    }

    /// Set the display color
    #[must_use]
    pub fn color(mut self, color: RoleColor) -> Self {
        self.color = color;
        self
    }

    /// Hoist members holding this role
    #[must_use]
    pub fn hoisted(mut self) -> Self {
        self.hoist = true;
        self
    }
}

/// A role as the remote store reports it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub color: RoleColor,
    pub hoist: bool,
}

/// Principal a permission overwrite applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// The guild-wide default principal
    Everyone,
    /// A specific role
    Role(RoleId),
}

/// Permission overwrite entry on a category or channel
///
/// `None` leaves the permission inherited; `Some(bool)` grants or denies it
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionOverwrite {
    pub principal: Principal,
    pub view_channel: Option<bool>,
    pub send_messages: Option<bool>,
}

impl PermissionOverwrite {
    /// Deny view access for the principal
    #[must_use]
    pub fn deny_view(principal: Principal) -> Self {
        Self {
            principal,
            view_channel: Some(false),
            send_messages: None,
        }
    }

    /// Grant view access for the principal
    #[must_use]
    pub fn allow_view(principal: Principal) -> Self {
        Self {
            principal,
            view_channel: Some(true),
            send_messages: None,
        }
    }

    /// Grant view and send access for the principal
    #[must_use]
    pub fn allow_view_and_send(principal: Principal) -> Self {
        Self {
            principal,
            view_channel: Some(true),
            send_messages: Some(true),
        }
    }
}

/// Creation parameters for a category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpec {
    pub name: String,
    pub overwrites: Vec<PermissionOverwrite>,
}

impl CategorySpec {
    /// Spec with the given name and no overwrites
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overwrites: Vec::new(),
        }
    }

    /// Attach permission overwrites
    #[must_use]
    pub fn overwrites(mut self, overwrites: Vec<PermissionOverwrite>) -> Self {
        self.overwrites = overwrites;
        self
    }
}

/// A category as the remote store reports it
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub overwrites: Vec<PermissionOverwrite>,
}

/// Kind of channel the remote store supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelKind {
    #[default]
    Text,
    Forum,
}

/// Creation parameters for a channel
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSpec {
    pub name: String,
    pub kind: ChannelKind,
    pub category: Option<CategoryId>,
    pub overwrites: Vec<PermissionOverwrite>,
}

impl ChannelSpec {
    /// Text channel with the given name, no category, no overwrites
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ChannelKind::Text,
            category: None,
            overwrites: Vec::new(),
        }
    }

    /// Forum channel with the given name
    #[must_use]
    pub fn forum(name: impl Into<String>) -> Self {
        Self {
            kind: ChannelKind::Forum,
            ..Self::text(name)
        }
    }

    /// Place the channel inside a category
    #[must_use]
    pub fn in_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    /// Attach permission overwrites
    #[must_use]
    pub fn overwrites(mut self, overwrites: Vec<PermissionOverwrite>) -> Self {
        self.overwrites = overwrites;
        self
    }
}

/// A channel as the remote store reports it
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelKind,
    pub category: Option<CategoryId>,
    pub overwrites: Vec<PermissionOverwrite>,
}

/// A message as the remote store reports it
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub channel: ChannelId,
    pub author: ActorId,
    pub content: String,
    /// Emoji attached as reactions, in attachment order
    pub reactions: Vec<String>,
}

/// Kind of directory entity, used in error and report text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Role,
    Category,
    Channel,
    Message,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Role => "role",
            EntityKind::Category => "category",
            EntityKind::Channel => "channel",
            EntityKind::Message => "message",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_builders() {
        let deny = PermissionOverwrite::deny_view(Principal::Everyone);
        assert_eq!(deny.view_channel, Some(false));
        assert_eq!(deny.send_messages, None);

        let allow = PermissionOverwrite::allow_view_and_send(Principal::Role(RoleId(1)));
        assert_eq!(allow.view_channel, Some(true));
        assert_eq!(allow.send_messages, Some(true));
    }

    #[test]
    fn channel_spec_builder() {
        let spec = ChannelSpec::forum("ログ-文化祭")
            .in_category(CategoryId(7))
            .overwrites(vec![PermissionOverwrite::deny_view(Principal::Everyone)]);
        assert_eq!(spec.kind, ChannelKind::Forum);
        assert_eq!(spec.category, Some(CategoryId(7)));
        assert_eq!(spec.overwrites.len(), 1);
    }
}
