//! Structured logging field names.
//!
//! All crates use these constants for consistent structured logging fields
//! so log queries work the same way across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Request failed because of a storage or internal fault |
//! | WARN  | Recoverable issue, e.g. attachment cleanup failure |
//! | INFO  | Lifecycle events (startup, shutdown), write completions |
//! | DEBUG | Decision points, filter composition, config choices |
//! | TRACE | Per-item iteration |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "db", "core", "attachments", "client"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "charts", "strategies", "pool", "lifecycle", "feed"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list", "insert", "delete", "cleanup"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Chart entry id being operated on.
pub const CHART_ID: &str = "chart_id";

/// Strategy UUID being operated on.
pub const STRATEGY_ID: &str = "strategy_id";

/// Key of a hosted attachment file.
pub const FILE_KEY: &str = "file_key";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of rows returned by a listing.
pub const RESULT_COUNT: &str = "result_count";

/// Number of images stored on a chart entry.
pub const IMAGE_COUNT: &str = "image_count";

/// Number of hosted attachments deleted.
pub const DELETED_COUNT: &str = "deleted_count";

/// Number of attachment deletions that failed.
pub const FAILED_COUNT: &str = "failed_count";

/// Number of attachments not attempted (no file key, or cleanup disabled).
pub const SKIPPED_COUNT: &str = "skipped_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
