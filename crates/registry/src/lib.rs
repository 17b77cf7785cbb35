//! File-store registry engine.
//!
//! This crate owns the lifecycle rules for file stores:
//! - [`Registry`]: create, update, query and delete with per-tenant invariants
//! - [`AdminGate`]: admin-membership check for mutating operations
//! - [`EventSink`] and [`GroupResolver`]: seams to external collaborators

pub mod engine;
pub mod error;
pub mod events;
pub mod gate;
pub mod metrics;

pub use engine::Registry;
pub use error::{RegistryError, RegistryResult};
pub use events::{EventBridgeSink, EventSink, LogEventSink};
pub use gate::{ADMIN_GROUP, AdminGate, GroupResolver, HttpGroupResolver, StaticGroupResolver};
