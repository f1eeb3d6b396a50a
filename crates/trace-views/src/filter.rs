//! Composable entry filtering.
//!
//! [`EntryFilter`] combines independently toggleable criteria that must all
//! pass. Search text is a separate step applied after the criteria.
//!
//! # Example
//!
//! ```
//! use trace_core::{Clock, Entry, EntryStatus};
//! use trace_views::filter::{filter_entries, DueDatePreset, EntryFilter};
//! use uuid::Uuid;
//!
//! let filter = EntryFilter::new()
//!     .with_statuses([EntryStatus::Todo])
//!     .with_due_date(DueDatePreset::NoDueDate);
//!
//! let entries = vec![
//!     Entry::new(Uuid::nil(), "call the plumber").with_status(EntryStatus::Todo),
//!     Entry::new(Uuid::nil(), "journal"),
//! ];
//! let visible = filter_entries(&entries, &filter, "plumber", &Clock::system());
//! assert_eq!(visible.len(), 1);
//! assert_eq!(filter.active_criteria_count(), 2);
//! ```

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use trace_core::logging;
use trace_core::text::{count_photo_tags, strip_html};
use trace_core::{Clock, Entry, EntrySection, EntryStatus};

// =============================================================================
// DUE DATE PRESET
// =============================================================================

/// Calendar window an entry's due date must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DueDatePreset {
    #[default]
    All,
    Overdue,
    Today,
    ThisWeek,
    NextWeek,
    HasDueDate,
    NoDueDate,
    /// Inclusive bounds from `due_date_start` / `due_date_end`.
    Custom,
}

impl DueDatePreset {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Overdue => "overdue",
            Self::Today => "today",
            Self::ThisWeek => "this_week",
            Self::NextWeek => "next_week",
            Self::HasDueDate => "has_due_date",
            Self::NoDueDate => "no_due_date",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for DueDatePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DueDatePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "overdue" => Ok(Self::Overdue),
            "today" => Ok(Self::Today),
            "this_week" => Ok(Self::ThisWeek),
            "next_week" => Ok(Self::NextWeek),
            "has_due_date" => Ok(Self::HasDueDate),
            "no_due_date" => Ok(Self::NoDueDate),
            "custom" => Ok(Self::Custom),
            _ => Err(format!("Invalid due date preset: {}", s)),
        }
    }
}

// =============================================================================
// ENTRY FILTER
// =============================================================================

/// Filter state for entry lists. The default matches every non-archived entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryFilter {
    /// Include archived entries.
    pub show_archived: bool,

    /// Allowed statuses (empty = any).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<EntryStatus>,

    /// Allowed priorities (empty = any).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub priorities: Vec<u32>,

    /// Allowed types (empty = any). Untyped entries never match a non-empty set.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_min: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_max: Option<f64>,

    /// `Some(true)` keeps entries with photos, `Some(false)` entries without.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_photos: Option<bool>,

    pub due_date: DueDatePreset,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_start: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date_end: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_date_start: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_date_end: Option<NaiveDate>,
}

impl EntryFilter {
    /// Create a new filter matching every non-archived entry.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // BUILDER METHODS
    // =========================================================================

    pub fn show_archived(mut self, show: bool) -> Self {
        self.show_archived = show;
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = EntryStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn with_priorities(mut self, priorities: impl IntoIterator<Item = u32>) -> Self {
        self.priorities = priorities.into_iter().collect();
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Inclusive rating bounds; `None` leaves that side open.
    pub fn with_rating_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.rating_min = min;
        self.rating_max = max;
        self
    }

    pub fn with_photos(mut self, has_photos: bool) -> Self {
        self.has_photos = Some(has_photos);
        self
    }

    pub fn with_due_date(mut self, preset: DueDatePreset) -> Self {
        self.due_date = preset;
        self
    }

    /// Switch to the custom due-date preset with inclusive day bounds.
    pub fn with_due_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.due_date = DueDatePreset::Custom;
        self.due_date_start = start;
        self.due_date_end = end;
        self
    }

    pub fn with_entry_date_range(
        mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        self.entry_date_start = start;
        self.entry_date_end = end;
        self
    }

    // =========================================================================
    // CONSTRAINT CHECKS
    // =========================================================================

    /// True when every criterion is at its default: archived entries hidden
    /// and nothing else narrowed. `show_archived = true` counts as a change.
    pub fn is_empty(&self) -> bool {
        self.active_criteria_count() == 0
    }

    /// Number of criteria that narrow the list. Each range counts once.
    pub fn active_criteria_count(&self) -> usize {
        [
            self.show_archived,
            !self.statuses.is_empty(),
            !self.priorities.is_empty(),
            !self.types.is_empty(),
            self.rating_min.is_some() || self.rating_max.is_some(),
            self.has_photos.is_some(),
            self.due_date != DueDatePreset::All,
            self.entry_date_start.is_some() || self.entry_date_end.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    // =========================================================================
    // MATCHING
    // =========================================================================

    /// Whether `entry` passes every criterion.
    pub fn matches(&self, entry: &Entry, clock: &Clock) -> bool {
        if entry.is_archived && !self.show_archived {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&entry.status) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&entry.priority) {
            return false;
        }
        if !self.types.is_empty() {
            let Some(entry_type) = entry.entry_type.as_deref() else {
                return false;
            };
            if !self.types.iter().any(|t| t == entry_type) {
                return false;
            }
        }
        if self.rating_min.is_some_and(|min| entry.rating < min)
            || self.rating_max.is_some_and(|max| entry.rating > max)
        {
            return false;
        }
        if let Some(wanted) = self.has_photos {
            if has_photos(entry) != wanted {
                return false;
            }
        }
        self.matches_due_date(entry.due_date.as_ref(), clock)
            && within_days(
                entry.entry_date.as_ref(),
                self.entry_date_start,
                self.entry_date_end,
                clock,
            )
    }

    fn matches_due_date(&self, due: Option<&DateTime<Utc>>, clock: &Clock) -> bool {
        let today = clock.today();
        let due_day = due.map(|d| clock.day_of(d));
        match self.due_date {
            DueDatePreset::All => true,
            DueDatePreset::HasDueDate => due.is_some(),
            DueDatePreset::NoDueDate => due.is_none(),
            DueDatePreset::Overdue => due_day.is_some_and(|day| day < today),
            DueDatePreset::Today => due_day == Some(today),
            DueDatePreset::ThisWeek => {
                let end = clock.end_of_week();
                due_day.is_some_and(|day| day >= today && day <= end)
            }
            DueDatePreset::NextWeek => {
                let start = clock.end_of_week() + Duration::days(1);
                let end = start + Duration::days(6);
                due_day.is_some_and(|day| day >= start && day <= end)
            }
            DueDatePreset::Custom => {
                within_days(due, self.due_date_start, self.due_date_end, clock)
            }
        }
    }
}

/// Photo presence from the stored count, else from `<img>` tags in content.
pub fn has_photos(entry: &Entry) -> bool {
    match entry.photo_count {
        Some(count) => count > 0,
        None => count_photo_tags(&entry.content) > 0,
    }
}

/// Inclusive day-range check. A missing timestamp passes only when both
/// bounds are open.
fn within_days(
    ts: Option<&DateTime<Utc>>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    clock: &Clock,
) -> bool {
    if start.is_none() && end.is_none() {
        return true;
    }
    let Some(ts) = ts else {
        return false;
    };
    let day = clock.day_of(ts);
    start.map_or(true, |s| day >= s) && end.map_or(true, |e| day <= e)
}

// =============================================================================
// SEARCH
// =============================================================================

/// Case-insensitive substring match on title or tag-stripped content.
/// A blank query matches everything.
pub fn matches_search(entry: &Entry, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    matches_normalized(entry, &query)
}

fn matches_normalized(entry: &Entry, query: &str) -> bool {
    entry
        .title
        .as_deref()
        .is_some_and(|t| t.to_lowercase().contains(query))
        || strip_html(&entry.content).to_lowercase().contains(query)
}

/// Keep entries matching `query`, in order.
pub fn filter_by_search(entries: &[Entry], query: &str) -> Vec<Entry> {
    let query = query.trim().to_lowercase();
    entries
        .iter()
        .filter(|e| query.is_empty() || matches_normalized(e, &query))
        .cloned()
        .collect()
}

// =============================================================================
// APPLICATION
// =============================================================================

/// Apply `filter` then `search` to a flat list, preserving order.
pub fn filter_entries(
    entries: &[Entry],
    filter: &EntryFilter,
    search: &str,
    clock: &Clock,
) -> Vec<Entry> {
    let query = search.trim().to_lowercase();
    let result: Vec<Entry> = entries
        .iter()
        .filter(|e| {
            let keep = filter.matches(e, clock) && (query.is_empty() || matches_normalized(e, &query));
            if !keep {
                trace!({ logging::ENTRY_ID } = %e.entry_id, "Entry filtered out");
            }
            keep
        })
        .cloned()
        .collect();

    debug!(
        { logging::COMPONENT } = "filter",
        { logging::INPUT_COUNT } = entries.len(),
        { logging::RESULT_COUNT } = result.len(),
        active_criteria = filter.active_criteria_count(),
        has_search = !query.is_empty(),
        "Entries filtered"
    );
    result
}

/// Filter each section's entries. Sections left empty are dropped and counts
/// are recomputed.
pub fn filter_sections(
    sections: &[EntrySection],
    filter: &EntryFilter,
    search: &str,
    clock: &Clock,
) -> Vec<EntrySection> {
    sections
        .iter()
        .filter_map(|section| {
            let data = filter_entries(&section.data, filter, search, clock);
            (!data.is_empty()).then(|| EntrySection::new(section.title.clone(), data))
        })
        .collect()
}
