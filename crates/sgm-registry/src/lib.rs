//! Reaction-role registry
//!
//! The stateful core of the system: a durable mapping from message identity
//! to the set of (role, trigger-emoji) bindings it controls. A menu is
//! created once, never mutated, and purged when its backing message goes
//! away. Every mutation persists the full registry snapshot synchronously
//! before reporting success; reload at startup re-resolves each stored role
//! against the live directory and drops entries whose roles vanished.
//!
//! Reaction events arrive concurrently with provisioning workflows; the
//! in-memory map and the snapshot file are the only shared state, guarded
//! by a read-write lock (map) and a write gate (mutation + persist pairs).

mod binding;
mod error;
mod registry;
mod store;

pub use binding::{BindingKind, ReactionMenu, RoleBinding};
pub use error::{PersistenceError, RegistryError};
pub use registry::{ReactionOutcome, Registry, RegistryConfig};
