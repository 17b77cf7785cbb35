//! Repository traits for metadata operations.

pub mod file_stores;
pub mod tenant;

pub use file_stores::FileStoreRepo;
pub use tenant::TenantTable;
