//! Authorization predicates for operator commands
//!
//! Three independent checks composed with AND semantics: the restricted
//! channel, the staff role, and elevated permission. Each denial names the
//! unmet predicate so the operator knows which gate rejected them.

use crate::settings::Settings;

/// The invoking command's context, as the platform surface reports it
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Name of the channel the command was issued in
    pub channel_name: String,
    /// Role names the invoking member holds
    pub actor_roles: Vec<String>,
    /// Whether the invoking member has elevated (administrator) permission
    pub is_administrator: bool,
}

/// Denial of an operator command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("このコマンドは「{0}」チャンネルでのみ使用できます。")]
    WrongChannel(String),

    #[error("このコマンドは「{0}」ロールを持つユーザーのみが使用できます。")]
    MissingRole(String),

    #[error("このコマンドは管理者権限が必要です。")]
    NotAdministrator,
}

/// Check all three predicates
///
/// # Errors
/// The first unmet predicate, in channel → role → permission order.
pub fn authorize(settings: &Settings, context: &CommandContext) -> Result<(), AuthError> {
    if !context.channel_name.starts_with(&settings.admin_channel) {
        return Err(AuthError::WrongChannel(settings.admin_channel.clone()));
    }
    if !context.actor_roles.iter().any(|r| r == &settings.staff_role) {
        return Err(AuthError::MissingRole(settings.staff_role.clone()));
    }
    if !context.is_administrator {
        return Err(AuthError::NotAdministrator);
    }
    Ok(())
}
