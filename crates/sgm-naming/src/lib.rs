//! Name derivation and lookup for cohort and event entities
//!
//! The remote store addresses everything by display name, and names are the
//! only durable reference this system keeps for roles, categories and
//! channels. This crate centralizes:
//! - The fixed name templates for a cohort ("semester") and its classes
//! - The fixed name templates for ad-hoc event spaces
//! - Alternate Unicode forms of compound (ZWJ) emoji sequences, because the
//!   remote store may hold either form depending on the creating client
//! - Name-based lookup against a [`Directory`](sgm_directory::Directory)
//!   that tolerates both forms
//!
//! Derivation is pure and total; only the resolver does I/O.

pub mod class_role;
pub mod cohort;
pub mod emoji;
pub mod event_space;
pub mod resolver;

pub use class_role::{parse_class_role, ClassRole, ClassRoleKind};
pub use cohort::{Cohort, ACTIVE_GLYPH, RETIRED_GLYPH};
pub use emoji::{alternates, keycap};
pub use event_space::EventSpace;
pub use resolver::NameResolver;
