//! HTTP request handlers.

pub mod file_stores;
pub mod health;
pub mod invoke;

pub use file_stores::*;
pub use health::*;
pub use invoke::invoke;
