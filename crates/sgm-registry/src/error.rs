//! Registry error taxonomy

use sgm_directory::DirectoryError;

/// Failure reading or writing the durable snapshot
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Failure of a registry operation
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A menu's emojis must be unique; the same trigger twice is a caller bug
    #[error("duplicate trigger emoji {emoji} in menu")]
    DuplicateEmoji { emoji: String },

    /// The remote call failed
    #[error(transparent)]
    Remote(#[from] DirectoryError),

    /// The durable snapshot could not be read or written
    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}
