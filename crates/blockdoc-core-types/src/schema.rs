//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_BLOCK_ID: &str = "block_id";
pub const FIELD_BLOCKS: &str = "blocks";

// Structural bookkeeping, emitted at debug level as literal `tracing` keys
pub const FIELD_ANCESTORS: &str = "ancestors";
pub const FIELD_REMOVED: &str = "removed";
pub const FIELD_COPIED: &str = "copied";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
