//! Provisioning error taxonomy

use sgm_directory::{DirectoryError, EntityKind};

/// Failure of a provisioning operation
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The target already resolves remotely; creating it again would shadow
    /// the existing object
    #[error("{kind} 「{name}」 already exists")]
    AlreadyExists { kind: EntityKind, name: String },

    /// A required predecessor entity does not resolve
    #[error("missing dependency: 「{name}」 does not resolve (required for {required_for})")]
    MissingDependency { name: String, required_for: String },

    /// The remote call itself failed
    #[error(transparent)]
    Remote(#[from] DirectoryError),
}

impl ProvisionError {
    pub(crate) fn already_exists(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn missing(name: impl Into<String>, required_for: impl Into<String>) -> Self {
        Self::MissingDependency {
            name: name.into(),
            required_for: required_for.into(),
        }
    }
}
