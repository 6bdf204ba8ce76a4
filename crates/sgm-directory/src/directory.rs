//! The [`Directory`] trait: CRUD over the remote object graph

use crate::error::DirectoryError;
use crate::types::{
    ActorId, Category, CategoryId, CategorySpec, Channel, ChannelId, ChannelSpec, Message,
    MessageId, Role, RoleId, RoleSpec,
};
use async_trait::async_trait;

/// Remote object store the guild's structure lives in
///
/// Implementations wrap the live chat platform (or an in-memory fake for
/// tests). Every method is a remote call: slow, independently fallible, and
/// racing concurrent mutation by humans and other processes. The store is
/// the source of truth; callers must not trust a local cache over it.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Create a role
    async fn create_role(&self, spec: RoleSpec) -> Result<Role, DirectoryError>;

    /// Delete a role by id
    async fn delete_role(&self, id: RoleId) -> Result<(), DirectoryError>;

    /// All roles currently in the guild
    async fn roles(&self) -> Result<Vec<Role>, DirectoryError>;

    /// Create a category
    async fn create_category(&self, spec: CategorySpec) -> Result<Category, DirectoryError>;

    /// Delete a category by id; contained channels are not deleted
    async fn delete_category(&self, id: CategoryId) -> Result<(), DirectoryError>;

    /// All categories currently in the guild
    async fn categories(&self) -> Result<Vec<Category>, DirectoryError>;

    /// Create a channel
    async fn create_channel(&self, spec: ChannelSpec) -> Result<Channel, DirectoryError>;

    /// Delete a channel by id
    async fn delete_channel(&self, id: ChannelId) -> Result<(), DirectoryError>;

    /// Rename a channel in place
    async fn rename_channel(&self, id: ChannelId, name: &str) -> Result<(), DirectoryError>;

    /// All channels currently in the guild
    async fn channels(&self) -> Result<Vec<Channel>, DirectoryError>;

    /// Post a message to a channel, as the bot
    async fn send_message(
        &self,
        channel: ChannelId,
        content: &str,
    ) -> Result<Message, DirectoryError>;

    /// Delete a message
    async fn delete_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> Result<(), DirectoryError>;

    /// Attach a reaction to a message, as the bot
    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &str,
    ) -> Result<(), DirectoryError>;

    /// Most recent messages in a channel, newest first, at most `limit`
    async fn recent_messages(
        &self,
        channel: ChannelId,
        limit: usize,
    ) -> Result<Vec<Message>, DirectoryError>;

    /// Members currently holding a role
    async fn members_with_role(&self, role: RoleId) -> Result<Vec<ActorId>, DirectoryError>;

    /// Roles currently held by a member
    async fn member_roles(&self, member: ActorId) -> Result<Vec<RoleId>, DirectoryError>;

    /// Grant a role to a member
    async fn add_member_role(&self, member: ActorId, role: RoleId) -> Result<(), DirectoryError>;

    /// Revoke a role from a member
    async fn remove_member_role(&self, member: ActorId, role: RoleId)
        -> Result<(), DirectoryError>;

    /// Display name of a member, for audit text
    async fn member_name(&self, member: ActorId) -> Result<String, DirectoryError>;
}
