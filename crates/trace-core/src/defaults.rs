//! Centralized default constants for Trace views.
//!
//! Every crate references these constants instead of defining its own magic
//! numbers or labels.

// =============================================================================
// RATING
// =============================================================================

/// Upper bound of the canonical rating storage scale.
pub const RATING_MAX: f64 = 10.0;

/// Lower bound of the canonical rating storage scale (0 = unrated).
pub const RATING_MIN: f64 = 0.0;

/// Number of stars on the star display scale.
pub const STAR_COUNT: u8 = 5;

/// Glyph used by icon-style rating displays.
pub const STAR_GLYPH: &str = "★";

// =============================================================================
// SECTION TITLES
// =============================================================================

/// Title of the section holding pinned entries.
pub const PINNED_SECTION_TITLE: &str = "Pinned";

/// Title of the type section for entries without a type.
pub const NO_TYPE_TITLE: &str = "No Type";

/// Title of the stream section for unassigned entries.
pub const NO_STREAM_TITLE: &str = "No Stream";

/// Title of the priority section for entries with priority 0.
pub const NO_PRIORITY_TITLE: &str = "No Priority";

/// Title of the rating section for unrated entries.
pub const NO_RATING_TITLE: &str = "No Rating";

/// Title of the due-date section for entries without a due date.
pub const NO_DUE_DATE_TITLE: &str = "No Due Date";

// =============================================================================
// LOCATION TREE
// =============================================================================

/// Display name of synthetic nodes holding entries that stop at their parent.
pub const UNNAMED_LOCATION_LABEL: &str = "<unnamed>";

/// Display name of the root node for entries without any location.
pub const NO_LOCATION_LABEL: &str = "No Location";

// =============================================================================
// TEXT
// =============================================================================

/// Default maximum length of a display title derived from content.
pub const DISPLAY_TITLE_MAX_LEN: usize = 80;

/// Fallback display title for entries with no title and no text content.
pub const UNTITLED_ENTRY: &str = "Untitled";

// =============================================================================
// VIEWS
// =============================================================================

/// Default delay before a deferred filter recomputation runs.
pub const FILTER_DEBOUNCE_MS: u64 = 150;

/// Largest accepted deferred filter delay.
pub const FILTER_DEBOUNCE_MAX_MS: u64 = 5_000;

/// Whether pinned entries float to the top by default.
pub const PINNED_FIRST: bool = true;

/// Whether archived entries are shown by default.
pub const SHOW_ARCHIVED: bool = false;

/// Length of the forward window used by "due this week" checks, in days.
pub const DUE_THIS_WEEK_DAYS: i64 = 7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds_ordered() {
        assert!(RATING_MIN < RATING_MAX);
        assert_eq!(RATING_MAX, STAR_COUNT as f64 * 2.0);
    }

    #[test]
    fn test_debounce_default_within_bounds() {
        assert!(FILTER_DEBOUNCE_MS > 0);
        assert!(FILTER_DEBOUNCE_MS <= FILTER_DEBOUNCE_MAX_MS);
    }
}
