//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Query identifiers
pub const FIELD_ENTITY: &str = "entity";
pub const FIELD_ENTITY_ID: &str = "entity_id";
pub const FIELD_RESULT_SET_ID: &str = "result_set_id";

// Collection sizes
pub const FIELD_SNAPSHOT_LEN: &str = "snapshot_len";
pub const FIELD_BATCH_LEN: &str = "batch_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
