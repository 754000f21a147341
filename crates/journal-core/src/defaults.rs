//! Centralized default constants shared by the server and the client.

use std::time::Duration;

// =============================================================================
// FILTERS
// =============================================================================

/// Filter value that imposes no constraint on its field.
pub const FILTER_ALL: &str = "all";

/// Quiescence window after the last filter change before a refetch runs.
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(300);

/// Delay before the single automatic retry of a failed listing fetch.
pub const FETCH_RETRY_DELAY: Duration = Duration::from_secs(5);

// =============================================================================
// CHART FORM
// =============================================================================

/// Strategy preselected on a fresh chart form.
pub const DEFAULT_STRATEGY: &str = "price_action";

/// Largest image accepted by the upload route (4 MiB).
pub const MAX_IMAGE_BYTES: u64 = 4 * 1024 * 1024;

// =============================================================================
// STRATEGY TAXONOMY
// =============================================================================

/// Initial strategy registry as `(value, label)` pairs.
pub const DEFAULT_STRATEGIES: &[(&str, &str)] = &[
    ("momentum", "Momentum Trading"),
    ("price_action", "Price Action"),
    ("swing", "Swing Trading"),
    ("scalping", "Scalping"),
    ("breakout", "Breakout Trading"),
    ("trend_following", "Trend Following"),
    ("reversal", "Reversal Trading"),
    ("support_resistance", "Support & Resistance"),
    ("channel", "Channel Trading"),
    ("gap", "Gap Trading"),
    ("vwap", "VWAP Trading"),
    ("other", "Other"),
];

// =============================================================================
// ATTACHMENTS
// =============================================================================

/// Base URL of the hosted upload service API.
pub const UPLOADTHING_API_URL: &str = "https://api.uploadthing.com";

/// Per-request timeout for attachment deletion calls.
pub const ATTACHMENT_TIMEOUT_SECS: u64 = 10;
