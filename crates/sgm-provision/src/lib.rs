//! Provisioning engine
//!
//! Executes the ordered creation sequences for a cohort (roles, then
//! categories, then channels) and for ad-hoc event spaces. Each operation
//! is idempotency-checked up front: it fails fast with `AlreadyExists` when
//! the target already resolves, and with `MissingDependency` when a required
//! predecessor does not. A failure partway through a fan-out leaves the
//! already-created objects in place; the engine neither retries nor rolls
//! back, the orchestrator reports the failure point.

mod engine;
mod error;

pub use engine::{Engine, EventSpaceObjects};
pub use error::ProvisionError;
