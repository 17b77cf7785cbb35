//! Core domain types for the file-store registry.
//!
//! This crate defines the canonical data model shared by every other crate:
//! - File stores, their store type and modification info
//! - The fixed file-class table and accepted file formats
//! - Caller identity as resolved by the boundary layer
//! - Domain events emitted on creation
//! - Configuration types

pub mod config;
pub mod error;
pub mod events;
pub mod file_class;
pub mod file_store;
pub mod identity;

pub use error::{Error, Result};
pub use events::{FileStoreCreated, FileStoreCreatedData};
pub use file_class::{FileClass, FileFormat};
pub use file_store::{
    FileStore, FileStoreDraft, FileStoreId, FileStoreState, Metadata, ModificationInfo, StoreType,
};
pub use identity::Identity;

/// Maximum length of a file-store name.
pub const MAX_NAME_LEN: usize = 255;
