//! Workflow error taxonomy

use sgm_directory::DirectoryError;
use sgm_provision::ProvisionError;
use sgm_registry::RegistryError;

/// Failure of an orchestrated workflow
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// A provisioning stage failed
    #[error(transparent)]
    Provision(#[from] ProvisionError),

    /// A reaction-role registry operation failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A direct remote call failed
    #[error(transparent)]
    Remote(#[from] DirectoryError),

    /// A required entity does not resolve
    #[error("「{what}」が見つかりません。")]
    NotFound { what: String },

    /// The deletion plan for the requested range is empty
    #[error("{start}期から{end}期の削除対象が見つかりませんでした。")]
    NothingToDelete { start: u32, end: u32 },

    /// Retiring the first cohort twice: a member already holds the alumni role
    #[error("{cohort}期生のメンバーは既にOBロールを持っています。")]
    AlreadyRetired { cohort: u32 },

    /// The operator cancelled the proposal
    #[error("操作をキャンセルしました。")]
    Cancelled,

    /// The proposal expired with no response
    #[error("確認がタイムアウトしました。")]
    Expired,

    /// The command was issued outside an event role-assignment channel
    #[error("このコマンドは「{prefix}」で始まるチャンネルでのみ使用できます。")]
    NotAssignChannel { prefix: String },

    /// The member already holds the role
    #[error("既に「{role}」ロールを持っています。")]
    RoleAlreadyHeld { role: String },

    /// The member does not hold the role
    #[error("「{role}」ロールを持っていません。")]
    RoleNotHeld { role: String },
}

impl WorkflowError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}
