//! Menu and binding types

use sgm_directory::{ChannelId, MessageId, Role, RoleId};
use sgm_naming::{parse_class_role, ClassRoleKind};

/// Semantic kind of a binding's role, driving parent-role propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// A per-class student role; grants also the cohort-wide student role
    StudentClass,
    /// A per-class staff role; grants also the cohort-wide staff role
    StaffClass,
    /// Anything else; no propagation
    Other,
}

impl BindingKind {
    /// Classify a role by its name against the class-role templates
    #[must_use]
    pub fn of_role_name(name: &str) -> Self {
        match parse_class_role(name).map(|class_role| class_role.kind) {
            Some(ClassRoleKind::Student) => BindingKind::StudentClass,
            Some(ClassRoleKind::Staff) => BindingKind::StaffClass,
            None => BindingKind::Other,
        }
    }
}

/// One (role, trigger-emoji) pair inside a menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleBinding {
    pub role: RoleId,
    pub role_name: String,
    pub emoji: String,
    pub kind: BindingKind,
}

impl RoleBinding {
    /// Binding for a live role, kind derived from the role name
    #[must_use]
    pub fn new(role: &Role, emoji: impl Into<String>) -> Self {
        Self {
            role: role.id,
            role_name: role.name.clone(),
            emoji: emoji.into(),
            kind: BindingKind::of_role_name(&role.name),
        }
    }

    /// Name of the cohort-wide role this binding propagates to, if any
    #[must_use]
    pub fn parent_role_name(&self) -> Option<String> {
        match self.kind {
            BindingKind::Other => None,
            BindingKind::StudentClass | BindingKind::StaffClass => {
                parse_class_role(&self.role_name).map(|class_role| class_role.parent_role_name())
            }
        }
    }
}

/// A registered reaction menu
///
/// Bindings are fixed at creation; the message id is the registry's primary
/// key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionMenu {
    pub message: MessageId,
    pub channel: ChannelId,
    pub cohort: u32,
    pub bindings: Vec<RoleBinding>,
}

impl ReactionMenu {
    /// Binding triggered by `emoji`, if the menu has one
    #[must_use]
    pub fn binding_for(&self, emoji: &str) -> Option<&RoleBinding> {
        self.bindings.iter().find(|binding| binding.emoji == emoji)
    }
}
