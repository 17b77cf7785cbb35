//! Prometheus counters for file-store lifecycle events.
//!
//! Counters are created here and registered by the binary that exposes them.

use prometheus::IntCounter;
use prometheus::core::Collector;
use std::sync::LazyLock;

pub static STORES_CREATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "filestore_stores_created_total",
        "Total number of file stores created",
    )
    .expect("metric creation failed")
});

pub static STORES_UPDATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "filestore_stores_updated_total",
        "Total number of file stores updated",
    )
    .expect("metric creation failed")
});

pub static STORES_DELETED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "filestore_stores_deleted_total",
        "Total number of file stores deleted",
    )
    .expect("metric creation failed")
});

pub static CHANNELS_CREATED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "filestore_channels_created_total",
        "Total number of notification channels created",
    )
    .expect("metric creation failed")
});

pub static TEARDOWN_FAILURES_SWALLOWED: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "filestore_channel_teardown_failures_swallowed_total",
        "Non-fatal channel teardown failures logged and ignored during delete",
    )
    .expect("metric creation failed")
});

/// Every collector defined in this module, for registration.
pub fn collectors() -> Vec<Box<dyn Collector>> {
    vec![
        Box::new(STORES_CREATED.clone()),
        Box::new(STORES_UPDATED.clone()),
        Box::new(STORES_DELETED.clone()),
        Box::new(CHANNELS_CREATED.clone()),
        Box::new(TEARDOWN_FAILURES_SWALLOWED.clone()),
    ]
}
