//! Channel provider backends.

pub mod memory;
pub mod sns;
