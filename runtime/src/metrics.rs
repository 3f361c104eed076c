//! Metric names and descriptions.
//!
//! Containers record through the `metrics` facade; nothing is collected until
//! the application installs a recorder.
//!
//! # Example
//!
//! ```ignore
//! // After installing a recorder of your choice:
//! bridged_store_runtime::metrics::describe();
//! ```

use metrics::{Unit, describe_counter};

/// Actions dispatched to a mounted provider
pub const DISPATCH_TOTAL: &str = "container.dispatch.total";

/// Actions rejected by the reducer
pub const DISPATCH_FAILED: &str = "container.dispatch.failed";

/// Messages delivered to a devtools session (`init` and `send`)
pub const DEVTOOLS_MESSAGES: &str = "devtools.messages.total";

/// Devtools operations that failed and were skipped
pub const DEVTOOLS_FAILED: &str = "devtools.failed.total";

/// Register descriptions for every metric emitted by this crate
pub fn describe() {
    describe_counter!(
        DISPATCH_TOTAL,
        Unit::Count,
        "Actions dispatched to a mounted provider"
    );
    describe_counter!(
        DISPATCH_FAILED,
        Unit::Count,
        "Actions rejected by the reducer"
    );
    describe_counter!(
        DEVTOOLS_MESSAGES,
        Unit::Count,
        "Messages delivered to a devtools session"
    );
    describe_counter!(
        DEVTOOLS_FAILED,
        Unit::Count,
        "Devtools operations that failed and were skipped"
    );
}
