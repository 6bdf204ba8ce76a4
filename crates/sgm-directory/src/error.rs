//! Error type for remote directory calls

/// Failure of a single remote directory call
///
/// The remote store offers no transactions: a multi-object logical operation
/// that fails partway leaves the earlier objects in place. Callers must
/// treat each call as independently fallible.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DirectoryError {
    /// The addressed object does not exist remotely
    #[error("not found: {0}")]
    NotFound(String),

    /// The bot lacks permission for the operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The remote store is throttling the bot
    #[error("rate limited")]
    RateLimited,

    /// Transport-level failure
    #[error("network failure: {0}")]
    Network(String),
}

impl DirectoryError {
    /// Whether the failure means the target is simply absent
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, DirectoryError::NotFound(_))
    }
}
