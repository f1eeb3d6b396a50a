//! # trace-views
//!
//! Derived views over Trace entry lists.
//!
//! This crate provides:
//! - Multi-key entry sorting with pinned-first ordering
//! - Section grouping by status, type, stream, due date, priority, or rating
//! - Composable entry filters with search text and debounced recomputation
//! - The location browser tree built from aggregation rows
//!
//! ## Example
//!
//! ```
//! use trace_views::{group_entries, sort_entries, Clock, Entry, GroupMode, SortMode, SortOrder};
//! use uuid::Uuid;
//!
//! let entries = vec![
//!     Entry::new(Uuid::nil(), "low").with_priority(1),
//!     Entry::new(Uuid::nil(), "none"),
//!     Entry::new(Uuid::nil(), "high").with_priority(5),
//! ];
//!
//! let sorted = sort_entries(&entries, SortMode::Priority, None, SortOrder::Desc, true);
//! assert_eq!(sorted[0].content, "high");
//!
//! let sections = group_entries(
//!     &entries,
//!     GroupMode::Priority,
//!     None,
//!     SortOrder::Desc,
//!     true,
//!     &Clock::system(),
//! );
//! assert_eq!(sections.len(), 2);
//! assert_eq!(sections[1].title, "No Priority");
//! ```

pub mod deferred;
pub mod filter;
pub mod group;
pub mod location;
pub mod sort;

// Re-export core types
pub use trace_core::*;

// Re-export view operations
pub use deferred::{DeferredEntryFilter, FilteredSnapshot};
pub use filter::{
    filter_by_search, filter_entries, filter_sections, matches_search, DueDatePreset, EntryFilter,
};
pub use group::{
    group_entries, group_entries_by_due_date, group_entries_by_priority, group_entries_by_rating,
    group_entries_by_status, group_entries_by_stream, group_entries_by_type, DueBucket,
    RatingGroupMode,
};
pub use location::{
    build_location_tree, find_location_node, flatten_location_tree, get_location_tree_total_count,
};
pub use sort::{compare_entries, sort_entries};
