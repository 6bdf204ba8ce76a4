//! The registry itself: menu lifecycle and reaction handling

use crate::binding::{BindingKind, ReactionMenu, RoleBinding};
use crate::error::RegistryError;
use crate::store;
use parking_lot::RwLock;
use sgm_directory::{
    ActorId, ChannelId, Directory, DirectoryError, MessageId, ReactionEvent, RoleId,
};
use sgm_naming::NameResolver;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Identity and side-channel configuration for the registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// The bot's own actor id; its reactions never trigger grants
    pub self_id: ActorId,
    /// Marker role revoked on grant and re-granted on revoke, if configured
    pub unassigned_role: Option<String>,
    /// Name fragment of the audit channel, if configured
    pub audit_channel: Option<String>,
}

/// What handling a reaction event amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionOutcome {
    /// The actor is the bot itself (initial reaction attachment)
    SelfReaction,
    /// The message controls no menu
    UnknownMessage,
    /// The menu has no binding for this emoji
    UnknownEmoji,
    /// The bound role was deleted out-of-band; nothing granted
    RoleVanished { role: String },
    /// The binding was applied
    Applied {
        role: String,
        parent: Option<String>,
    },
}

/// Persistent mapping from message identity to role bindings
///
/// Owns the snapshot file exclusively. The map lock is never held across a
/// remote call; the write gate serializes mutation + persist pairs so the
/// snapshot on disk always reflects some prefix of the mutation order.
pub struct Registry {
    directory: Arc<dyn Directory>,
    config: RegistryConfig,
    store_path: PathBuf,
    menus: RwLock<HashMap<MessageId, ReactionMenu>>,
    write_gate: Mutex<()>,
}

impl Registry {
    /// Empty registry persisting to `store_path`
    #[must_use]
    pub fn new(
        directory: Arc<dyn Directory>,
        config: RegistryConfig,
        store_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            directory,
            config,
            store_path: store_path.into(),
            menus: RwLock::new(HashMap::new()),
            write_gate: Mutex::new(()),
        }
    }

    /// Rebuild the registry from the snapshot file
    ///
    /// Each stored role id is re-resolved against the live directory;
    /// bindings whose role no longer exists are dropped, and a menu left
    /// without bindings is dropped entirely. Returns the registry and the
    /// number of dropped menus. An absent snapshot file is an empty
    /// registry.
    ///
    /// # Errors
    /// Propagates snapshot decode failures and the role-listing call.
    pub async fn load(
        directory: Arc<dyn Directory>,
        config: RegistryConfig,
        store_path: impl Into<PathBuf>,
    ) -> Result<(Self, usize), RegistryError> {
        let store_path = store_path.into();
        let Some(snapshot) = store::read(&store_path)? else {
            tracing::info!("no reaction-role snapshot found; starting empty");
            return Ok((Self::new(directory, config, store_path), 0));
        };

        let live_roles = directory.roles().await?;
        let live: HashMap<u64, &sgm_directory::Role> =
            live_roles.iter().map(|role| (role.id.0, role)).collect();

        let mut menus = HashMap::new();
        let mut dropped = 0usize;
        for (message_key, stored) in snapshot.menus {
            let Ok(message_id) = message_key.parse::<u64>() else {
                dropped += 1;
                continue;
            };
            let mut bindings = Vec::new();
            for (index, (emoji, role_name)) in stored.emojis.iter().enumerate() {
                let Some(role_id) = stored.roles.get(index) else {
                    continue;
                };
                match live.get(role_id) {
                    Some(role) => bindings.push(RoleBinding::new(role, emoji.clone())),
                    None => {
                        tracing::warn!(role = %role_name, "stored role no longer resolves; binding dropped");
                    }
                }
            }
            if bindings.is_empty() {
                dropped += 1;
                continue;
            }
            menus.insert(
                MessageId(message_id),
                ReactionMenu {
                    message: MessageId(message_id),
                    channel: ChannelId(stored.channel),
                    cohort: stored.cohort,
                    bindings,
                },
            );
        }
        tracing::info!(loaded = menus.len(), dropped, "reaction-role snapshot loaded");
        Ok((
            Self {
                directory,
                config,
                store_path,
                menus: RwLock::new(menus),
                write_gate: Mutex::new(()),
            },
            dropped,
        ))
    }

    /// All registered menus
    #[must_use]
    pub fn menus(&self) -> Vec<ReactionMenu> {
        self.menus.read().values().cloned().collect()
    }

    /// Whether a message controls a registered menu
    #[must_use]
    pub fn is_registered(&self, message: MessageId) -> bool {
        self.menus.read().contains_key(&message)
    }

    /// Post a menu message, attach its reactions, register and persist it
    ///
    /// Reactions are attached in binding declaration order. The snapshot is
    /// written synchronously before returning: a success implies the menu
    /// is durable.
    ///
    /// # Errors
    /// - `DuplicateEmoji` before any remote call if two bindings share a
    ///   trigger
    /// - remote failures from posting or reacting
    /// - `Persistence` if the snapshot write fails (the message exists
    ///   remotely in that case, but creation must not report success)
    pub async fn create_menu(
        &self,
        channel: ChannelId,
        cohort: u32,
        bindings: Vec<RoleBinding>,
        content: &str,
    ) -> Result<ReactionMenu, RegistryError> {
        for (index, binding) in bindings.iter().enumerate() {
            if bindings[..index].iter().any(|b| b.emoji == binding.emoji) {
                return Err(RegistryError::DuplicateEmoji {
                    emoji: binding.emoji.clone(),
                });
            }
        }

        let message = self.directory.send_message(channel, content).await?;
        for binding in &bindings {
            self.directory
                .add_reaction(channel, message.id, &binding.emoji)
                .await?;
        }

        let menu = ReactionMenu {
            message: message.id,
            channel,
            cohort,
            bindings,
        };
        let _gate = self.write_gate.lock().await;
        self.menus.write().insert(menu.message, menu.clone());
        self.persist()?;
        tracing::info!(message = %menu.message, cohort, "reaction menu registered");
        Ok(menu)
    }

    /// Remove a menu whose backing message is gone, and persist
    ///
    /// Returns whether the menu was registered.
    pub async fn purge(&self, message: MessageId) -> Result<bool, RegistryError> {
        let _gate = self.write_gate.lock().await;
        let removed = self.menus.write().remove(&message).is_some();
        if removed {
            self.persist()?;
            tracing::info!(%message, "reaction menu purged");
        }
        Ok(removed)
    }

    /// Handle a reaction-add event: grant the bound role and its parent
    ///
    /// The primary grant happens before the parent grant, so an observer
    /// never sees the parent role without the primary having been granted
    /// first. The configured unassigned marker role is revoked afterwards.
    ///
    /// # Errors
    /// Remote failures other than the bound role having vanished.
    pub async fn handle_reaction_added(
        &self,
        event: &ReactionEvent,
    ) -> Result<ReactionOutcome, RegistryError> {
        let Some(binding) = self.match_event(event) else {
            return Ok(self.unmatched_outcome(event));
        };

        match self
            .directory
            .add_member_role(event.actor_id, binding.role)
            .await
        {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::warn!(role = %binding.role_name, "bound role vanished; grant skipped");
                return Ok(ReactionOutcome::RoleVanished {
                    role: binding.role_name,
                });
            }
            Err(err) => return Err(err.into()),
        }

        let parent = self.propagate(&binding, event.actor_id, true).await?;
        self.toggle_unassigned(event.actor_id, true).await?;
        self.audit(event.actor_id, &binding.role_name, true).await;
        Ok(ReactionOutcome::Applied {
            role: binding.role_name,
            parent,
        })
    }

    /// Handle a reaction-remove event: revoke the bound role and its parent
    ///
    /// Symmetric inverse of [`Registry::handle_reaction_added`]; the
    /// unassigned marker role is re-granted afterwards.
    ///
    /// # Errors
    /// Remote failures other than the bound role having vanished.
    pub async fn handle_reaction_removed(
        &self,
        event: &ReactionEvent,
    ) -> Result<ReactionOutcome, RegistryError> {
        let Some(binding) = self.match_event(event) else {
            return Ok(self.unmatched_outcome(event));
        };

        match self
            .directory
            .remove_member_role(event.actor_id, binding.role)
            .await
        {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                tracing::warn!(role = %binding.role_name, "bound role vanished; revoke skipped");
                return Ok(ReactionOutcome::RoleVanished {
                    role: binding.role_name,
                });
            }
            Err(err) => return Err(err.into()),
        }

        let parent = self.propagate(&binding, event.actor_id, false).await?;
        self.toggle_unassigned(event.actor_id, false).await?;
        self.audit(event.actor_id, &binding.role_name, false).await;
        Ok(ReactionOutcome::Applied {
            role: binding.role_name,
            parent,
        })
    }

    /// Write the full snapshot; idempotent
    fn persist(&self) -> Result<(), RegistryError> {
        let menus = self.menus.read();
        store::save(&self.store_path, &menus)?;
        Ok(())
    }

    fn match_event(&self, event: &ReactionEvent) -> Option<RoleBinding> {
        if event.actor_id == self.config.self_id {
            return None;
        }
        let menus = self.menus.read();
        menus
            .get(&event.message_id)
            .and_then(|menu| menu.binding_for(&event.emoji))
            .cloned()
    }

    fn unmatched_outcome(&self, event: &ReactionEvent) -> ReactionOutcome {
        if event.actor_id == self.config.self_id {
            ReactionOutcome::SelfReaction
        } else if self.is_registered(event.message_id) {
            ReactionOutcome::UnknownEmoji
        } else {
            ReactionOutcome::UnknownMessage
        }
    }

    /// Grant or revoke the cohort-wide parent role derived from the binding
    async fn propagate(
        &self,
        binding: &RoleBinding,
        actor: ActorId,
        grant: bool,
    ) -> Result<Option<String>, RegistryError> {
        if binding.kind == BindingKind::Other {
            return Ok(None);
        }
        let Some(parent_name) = binding.parent_role_name() else {
            return Ok(None);
        };
        let Some(parent) = NameResolver::role(self.directory.as_ref(), &parent_name).await? else {
            tracing::warn!(role = %parent_name, "parent role does not resolve; propagation skipped");
            return Ok(None);
        };
        self.apply_role(actor, parent.id, grant).await?;
        Ok(Some(parent_name))
    }

    /// Revoke (on grant) or re-grant (on revoke) the unassigned marker role
    async fn toggle_unassigned(&self, actor: ActorId, granting: bool) -> Result<(), RegistryError> {
        let Some(marker_name) = self.config.unassigned_role.as_deref() else {
            return Ok(());
        };
        let Some(marker) = NameResolver::role(self.directory.as_ref(), marker_name).await? else {
            return Ok(());
        };
        let held = self.directory.member_roles(actor).await?;
        if granting && held.contains(&marker.id) {
            self.apply_role(actor, marker.id, false).await?;
        } else if !granting && !held.contains(&marker.id) {
            self.apply_role(actor, marker.id, true).await?;
        }
        Ok(())
    }

    async fn apply_role(
        &self,
        actor: ActorId,
        role: RoleId,
        grant: bool,
    ) -> Result<(), DirectoryError> {
        if grant {
            self.directory.add_member_role(actor, role).await
        } else {
            self.directory.remove_member_role(actor, role).await
        }
    }

    /// Best-effort audit notification; a missing channel is skipped silently
    async fn audit(&self, actor: ActorId, role_name: &str, granted: bool) {
        let Some(fragment) = self.config.audit_channel.as_deref() else {
            return;
        };
        let channel =
            match NameResolver::channel_containing(self.directory.as_ref(), fragment).await {
                Ok(Some(channel)) => channel,
                Ok(None) | Err(_) => return,
            };
        let actor_name = self
            .directory
            .member_name(actor)
            .await
            .unwrap_or_else(|_| actor.to_string());
        let text = if granted {
            format!("`{actor_name}` に `{role_name}` ロールを付与しました。")
        } else {
            format!("`{actor_name}` から `{role_name}` ロールを削除しました。")
        };
        if let Err(err) = self.directory.send_message(channel.id, &text).await {
            tracing::debug!(%err, "audit notification failed");
        }
    }
}
