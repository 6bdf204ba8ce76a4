//! In-memory remote directory fake

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use sgm_directory::{
    ActorId, Category, CategoryId, CategorySpec, Channel, ChannelId, ChannelSpec, Directory,
    DirectoryError, Message, MessageId, Role, RoleId, RoleSpec,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory [`Directory`] with failure injection
///
/// Ids are allocated from one counter across all entity kinds. Mutating
/// calls whose target name contains an injected fragment fail with
/// `DirectoryError::Network`, which lets tests break one object out of a
/// batch. Every mutation is appended to an operation log so tests can
/// assert call ordering.
pub struct MemoryDirectory {
    next_id: AtomicU64,
    bot_id: ActorId,
    roles: DashMap<RoleId, Role>,
    categories: DashMap<CategoryId, Category>,
    channels: DashMap<ChannelId, Channel>,
    messages: RwLock<Vec<Message>>,
    member_roles: DashMap<ActorId, Vec<RoleId>>,
    member_names: DashMap<ActorId, String>,
    failures: RwLock<Vec<String>>,
    op_log: RwLock<Vec<String>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(100),
            bot_id: ActorId(1),
            roles: DashMap::new(),
            categories: DashMap::new(),
            channels: DashMap::new(),
            messages: RwLock::new(Vec::new()),
            member_roles: DashMap::new(),
            member_names: DashMap::new(),
            failures: RwLock::new(Vec::new()),
            op_log: RwLock::new(Vec::new()),
        }
    }

    /// Actor id the fake uses as the bot's own identity
    pub fn bot_id(&self) -> ActorId {
        self.bot_id
    }

    /// Register a guild member and return its id
    pub fn add_member(&self, name: &str) -> ActorId {
        let id = ActorId(self.alloc());
        self.member_names.insert(id, name.to_string());
        self.member_roles.insert(id, Vec::new());
        id
    }

    /// Make every mutating call targeting a name containing `fragment` fail
    pub fn inject_failure(&self, fragment: &str) {
        self.failures.write().push(fragment.to_string());
    }

    /// Clear all injected failures
    pub fn clear_failures(&self) {
        self.failures.write().clear();
    }

    /// Recorded mutations, oldest first
    pub fn ops(&self) -> Vec<String> {
        self.op_log.read().clone()
    }

    /// Role by exact name, if present
    pub fn role_named(&self, name: &str) -> Option<Role> {
        self.roles
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.clone())
    }

    /// Category by exact name, if present
    pub fn category_named(&self, name: &str) -> Option<Category> {
        self.categories
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.clone())
    }

    /// Channel by exact name, if present
    pub fn channel_named(&self, name: &str) -> Option<Channel> {
        self.channels
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.clone())
    }

    /// Names of the roles a member currently holds, sorted
    pub fn member_role_names(&self, member: ActorId) -> Vec<String> {
        let Some(held) = self.member_roles.get(&member) else {
            return Vec::new();
        };
        let mut names: Vec<String> = held
            .iter()
            .filter_map(|id| self.roles.get(id).map(|r| r.name.clone()))
            .collect();
        names.sort();
        names
    }

    /// All messages posted to a channel, oldest first
    pub fn messages_in(&self, channel: ChannelId) -> Vec<Message> {
        self.messages
            .read()
            .iter()
            .filter(|m| m.channel == channel)
            .cloned()
            .collect()
    }

    /// Directly seed a message from an arbitrary author (out-of-band chatter)
    pub fn seed_message(&self, channel: ChannelId, author: ActorId, content: &str) -> MessageId {
        let id = MessageId(self.alloc());
        self.messages.write().push(Message {
            id,
            channel,
            author,
            content: content.to_string(),
            reactions: Vec::new(),
        });
        id
    }

    fn alloc(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn check(&self, op: &str, target: &str) -> Result<(), DirectoryError> {
        if self
            .failures
            .read()
            .iter()
            .any(|fragment| target.contains(fragment.as_str()))
        {
            return Err(DirectoryError::Network(format!(
                "injected failure: {op} {target}"
            )));
        }
        self.op_log.write().push(format!("{op}:{target}"));
        Ok(())
    }

    fn role_name(&self, id: RoleId) -> String {
        self.roles
            .get(&id)
            .map_or_else(|| id.to_string(), |r| r.name.clone())
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn create_role(&self, spec: RoleSpec) -> Result<Role, DirectoryError> {
        self.check("create_role", &spec.name)?;
        let role = Role {
            id: RoleId(self.alloc()),
            name: spec.name,
            color: spec.color,
            hoist: spec.hoist,
        };
        self.roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn delete_role(&self, id: RoleId) -> Result<(), DirectoryError> {
        self.check("delete_role", &self.role_name(id))?;
        self.roles
            .remove(&id)
            .ok_or_else(|| DirectoryError::NotFound(format!("role {id}")))?;
        for mut held in self.member_roles.iter_mut() {
            held.retain(|r| *r != id);
        }
        Ok(())
    }

    async fn roles(&self) -> Result<Vec<Role>, DirectoryError> {
        Ok(self.roles.iter().map(|entry| entry.clone()).collect())
    }

    async fn create_category(&self, spec: CategorySpec) -> Result<Category, DirectoryError> {
        self.check("create_category", &spec.name)?;
        let category = Category {
            id: CategoryId(self.alloc()),
            name: spec.name,
            overwrites: spec.overwrites,
        };
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), DirectoryError> {
        let name = self
            .categories
            .get(&id)
            .map_or_else(|| id.to_string(), |c| c.name.clone());
        self.check("delete_category", &name)?;
        self.categories
            .remove(&id)
            .ok_or_else(|| DirectoryError::NotFound(format!("category {id}")))?;
        Ok(())
    }

    async fn categories(&self) -> Result<Vec<Category>, DirectoryError> {
        Ok(self.categories.iter().map(|entry| entry.clone()).collect())
    }

    async fn create_channel(&self, spec: ChannelSpec) -> Result<Channel, DirectoryError> {
        self.check("create_channel", &spec.name)?;
        if let Some(category) = spec.category {
            if !self.categories.contains_key(&category) {
                return Err(DirectoryError::NotFound(format!("category {category}")));
            }
        }
        let channel = Channel {
            id: ChannelId(self.alloc()),
            name: spec.name,
            kind: spec.kind,
            category: spec.category,
            overwrites: spec.overwrites,
        };
        self.channels.insert(channel.id, channel.clone());
        Ok(channel)
    }

    async fn delete_channel(&self, id: ChannelId) -> Result<(), DirectoryError> {
        let name = self
            .channels
            .get(&id)
            .map_or_else(|| id.to_string(), |c| c.name.clone());
        self.check("delete_channel", &name)?;
        self.channels
            .remove(&id)
            .ok_or_else(|| DirectoryError::NotFound(format!("channel {id}")))?;
        self.messages.write().retain(|m| m.channel != id);
        Ok(())
    }

    async fn rename_channel(&self, id: ChannelId, name: &str) -> Result<(), DirectoryError> {
        let current = self
            .channels
            .get(&id)
            .map(|c| c.name.clone())
            .ok_or_else(|| DirectoryError::NotFound(format!("channel {id}")))?;
        self.check("rename_channel", &current)?;
        if let Some(mut channel) = self.channels.get_mut(&id) {
            channel.name = name.to_string();
        }
        Ok(())
    }

    async fn channels(&self) -> Result<Vec<Channel>, DirectoryError> {
        Ok(self.channels.iter().map(|entry| entry.clone()).collect())
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        content: &str,
    ) -> Result<Message, DirectoryError> {
        let channel_name = self
            .channels
            .get(&channel)
            .map(|c| c.name.clone())
            .ok_or_else(|| DirectoryError::NotFound(format!("channel {channel}")))?;
        self.check("send_message", &channel_name)?;
        let message = Message {
            id: MessageId(self.alloc()),
            channel,
            author: self.bot_id,
            content: content.to_string(),
            reactions: Vec::new(),
        };
        self.messages.write().push(message.clone());
        Ok(message)
    }

    async fn delete_message(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> Result<(), DirectoryError> {
        self.check("delete_message", &message.to_string())?;
        let mut messages = self.messages.write();
        let before = messages.len();
        messages.retain(|m| !(m.channel == channel && m.id == message));
        if messages.len() == before {
            return Err(DirectoryError::NotFound(format!("message {message}")));
        }
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &str,
    ) -> Result<(), DirectoryError> {
        self.check("add_reaction", emoji)?;
        let mut messages = self.messages.write();
        let found = messages
            .iter_mut()
            .find(|m| m.channel == channel && m.id == message)
            .ok_or_else(|| DirectoryError::NotFound(format!("message {message}")))?;
        found.reactions.push(emoji.to_string());
        Ok(())
    }

    async fn recent_messages(
        &self,
        channel: ChannelId,
        limit: usize,
    ) -> Result<Vec<Message>, DirectoryError> {
        if !self.channels.contains_key(&channel) {
            return Err(DirectoryError::NotFound(format!("channel {channel}")));
        }
        Ok(self
            .messages
            .read()
            .iter()
            .filter(|m| m.channel == channel)
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn members_with_role(&self, role: RoleId) -> Result<Vec<ActorId>, DirectoryError> {
        if !self.roles.contains_key(&role) {
            return Err(DirectoryError::NotFound(format!("role {role}")));
        }
        let mut members: Vec<ActorId> = self
            .member_roles
            .iter()
            .filter(|entry| entry.value().contains(&role))
            .map(|entry| *entry.key())
            .collect();
        members.sort();
        Ok(members)
    }

    async fn member_roles(&self, member: ActorId) -> Result<Vec<RoleId>, DirectoryError> {
        self.member_roles
            .get(&member)
            .map(|held| held.clone())
            .ok_or_else(|| DirectoryError::NotFound(format!("member {member}")))
    }

    async fn add_member_role(&self, member: ActorId, role: RoleId) -> Result<(), DirectoryError> {
        if !self.roles.contains_key(&role) {
            return Err(DirectoryError::NotFound(format!("role {role}")));
        }
        self.check("add_member_role", &self.role_name(role))?;
        let mut held = self
            .member_roles
            .get_mut(&member)
            .ok_or_else(|| DirectoryError::NotFound(format!("member {member}")))?;
        if !held.contains(&role) {
            held.push(role);
        }
        Ok(())
    }

    async fn remove_member_role(
        &self,
        member: ActorId,
        role: RoleId,
    ) -> Result<(), DirectoryError> {
        if !self.roles.contains_key(&role) {
            return Err(DirectoryError::NotFound(format!("role {role}")));
        }
        self.check("remove_member_role", &self.role_name(role))?;
        let mut held = self
            .member_roles
            .get_mut(&member)
            .ok_or_else(|| DirectoryError::NotFound(format!("member {member}")))?;
        held.retain(|r| *r != role);
        Ok(())
    }

    async fn member_name(&self, member: ActorId) -> Result<String, DirectoryError> {
        self.member_names
            .get(&member)
            .map(|name| name.clone())
            .ok_or_else(|| DirectoryError::NotFound(format!("member {member}")))
    }
}
