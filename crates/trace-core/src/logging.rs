//! Structured logging field name constants for Trace.
//!
//! Both crates use these constants for consistent structured logging fields,
//! so log tooling can query by the same names across subsystems.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (config loaded, deferred task start/stop) |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Component within the core.
/// Examples: "sort", "group", "filter", "location_tree", "deferred_filter"
pub const COMPONENT: &str = "component";

/// Entry UUID being operated on.
pub const ENTRY_ID: &str = "entry_id";

// ─── View fields ───────────────────────────────────────────────────────────

/// Sort mode applied to an entry list.
pub const SORT_MODE: &str = "sort_mode";

/// Grouping mode applied to an entry list.
pub const GROUP_MODE: &str = "group_mode";

/// Rating grouping display mode ("stars" or "10base").
pub const RATING_MODE: &str = "rating_mode";

/// Generation counter of a deferred recomputation.
pub const GENERATION: &str = "generation";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of entries fed into an operation.
pub const INPUT_COUNT: &str = "input_count";

/// Number of entries (or nodes) produced by an operation.
pub const RESULT_COUNT: &str = "result_count";

/// Number of sections produced by a grouping.
pub const SECTION_COUNT: &str = "section_count";

/// Number of entries extracted into the pinned section.
pub const PINNED_COUNT: &str = "pinned_count";
