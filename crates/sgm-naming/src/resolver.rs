//! Name-based lookup against the remote directory
//!
//! Lookup tries the exact requested name first, then each alternate
//! normalization form. If both forms exist remotely the exact match wins,
//! but the inconsistency is logged: two clients created overlapping objects
//! and an operator should reconcile them.

use crate::emoji::alternates;
use sgm_directory::{Category, Channel, Directory, DirectoryError, Role};

/// Name lookup tolerant of compound-emoji normalization differences
#[derive(Debug, Clone, Copy, Default)]
pub struct NameResolver;

impl NameResolver {
    /// Resolve a role by name
    pub async fn role(
        directory: &dyn Directory,
        name: &str,
    ) -> Result<Option<Role>, DirectoryError> {
        let pool = directory.roles().await?;
        Ok(pick(name, pool, |r| &r.name, "role"))
    }

    /// Resolve a category by name
    pub async fn category(
        directory: &dyn Directory,
        name: &str,
    ) -> Result<Option<Category>, DirectoryError> {
        let pool = directory.categories().await?;
        Ok(pick(name, pool, |c| &c.name, "category"))
    }

    /// Resolve a channel by exact name
    pub async fn channel(
        directory: &dyn Directory,
        name: &str,
    ) -> Result<Option<Channel>, DirectoryError> {
        let pool = directory.channels().await?;
        Ok(pick(name, pool, |c| &c.name, "channel"))
    }

    /// First channel whose name contains `fragment`
    ///
    /// The menu and audit channels are configured as name fragments, not
    /// full names, so they are located by containment.
    pub async fn channel_containing(
        directory: &dyn Directory,
        fragment: &str,
    ) -> Result<Option<Channel>, DirectoryError> {
        let pool = directory.channels().await?;
        Ok(pool.into_iter().find(|c| c.name.contains(fragment)))
    }
}

fn pick<T>(requested: &str, pool: Vec<T>, name_of: impl Fn(&T) -> &str, kind: &str) -> Option<T> {
    let alternate_forms = alternates(requested);
    let mut exact = None;
    let mut alternate = None;
    for item in pool {
        let name = name_of(&item);
        if name == requested {
            if exact.is_none() {
                exact = Some(item);
            }
        } else if alternate_forms.iter().any(|form| form == name) && alternate.is_none() {
            alternate = Some(item);
        }
    }
    match (exact, alternate) {
        (Some(found), Some(other)) => {
            tracing::warn!(
                kind,
                requested,
                other = name_of(&other),
                "both normalization forms exist remotely; resolving to the exact match"
            );
            Some(found)
        }
        (Some(found), None) => Some(found),
        (None, Some(found)) => Some(found),
        (None, None) => None,
    }
}
