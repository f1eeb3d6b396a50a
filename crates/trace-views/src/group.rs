//! Section grouping of entry lists.
//!
//! Every grouping follows the same steps:
//!
//! 1. With `pinned_first`, pinned entries are pulled into a leading
//!    `"Pinned"` section (newest first) and the rest is grouped without pin
//!    preference, so no entry appears twice.
//! 2. The remaining entries are sorted with the matching [`SortMode`].
//! 3. Entries are bucketed by key, keeping their sorted relative order.
//! 4. Non-empty buckets are emitted in the grouping's key order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;
use uuid::Uuid;

use trace_core::defaults::{
    NO_DUE_DATE_TITLE, NO_PRIORITY_TITLE, NO_RATING_TITLE, NO_STREAM_TITLE, NO_TYPE_TITLE,
    PINNED_SECTION_TITLE,
};
use trace_core::logging;
use trace_core::rating::{decimal_to_stars, whole_rating};
use trace_core::stream::entry_stream;
use trace_core::{
    Clock, Entry, EntrySection, EntryStatus, GroupMode, SortMode, SortOrder, StreamMap,
};

use crate::sort::sort_entries;

// =============================================================================
// DISPATCH
// =============================================================================

/// Group `entries` by `mode`. `GroupMode::None` yields one untitled section
/// sorted by entry date (after the pinned section, if any).
pub fn group_entries(
    entries: &[Entry],
    mode: GroupMode,
    streams: Option<&StreamMap>,
    order: SortOrder,
    pinned_first: bool,
    clock: &Clock,
) -> Vec<EntrySection> {
    match mode {
        GroupMode::None => {
            let (pinned, remaining) = split_pinned(entries, pinned_first);
            let sorted = sort_entries(&remaining, SortMode::EntryDate, streams, order, false);
            let sections = if sorted.is_empty() {
                Vec::new()
            } else {
                vec![EntrySection::new("", sorted)]
            };
            finish(GroupMode::None, pinned, sections)
        }
        GroupMode::Status => group_entries_by_status(entries, order, pinned_first),
        GroupMode::Type => group_entries_by_type(entries, order, pinned_first),
        GroupMode::Stream => group_entries_by_stream(entries, streams, order, pinned_first),
        GroupMode::DueDate => group_entries_by_due_date(entries, order, pinned_first, clock),
        GroupMode::Priority => group_entries_by_priority(entries, order, pinned_first),
        GroupMode::Rating => group_entries_by_rating(entries, streams, order, pinned_first),
    }
}

// =============================================================================
// SHARED STEPS
// =============================================================================

/// Extract pinned entries into their own section when requested.
fn split_pinned(entries: &[Entry], pinned_first: bool) -> (Option<EntrySection>, Vec<Entry>) {
    if !pinned_first {
        return (None, entries.to_vec());
    }
    let (pinned, remaining): (Vec<Entry>, Vec<Entry>) =
        entries.iter().cloned().partition(|e| e.is_pinned);
    if pinned.is_empty() {
        return (None, remaining);
    }
    let pinned = sort_entries(&pinned, SortMode::EntryDate, None, SortOrder::Desc, false);
    (Some(EntrySection::new(PINNED_SECTION_TITLE, pinned)), remaining)
}

/// Bucket sorted entries by key, recording keys in order of first appearance.
fn bucket_by<K, F>(sorted: Vec<Entry>, key_of: F) -> (Vec<K>, HashMap<K, Vec<Entry>>)
where
    K: Eq + Hash + Clone,
    F: Fn(&Entry) -> K,
{
    let mut order = Vec::new();
    let mut buckets: HashMap<K, Vec<Entry>> = HashMap::new();
    for entry in sorted {
        let key = key_of(&entry);
        buckets
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(entry);
    }
    (order, buckets)
}

/// Emit non-empty buckets in `keys` order.
fn emit<K, T>(keys: &[K], mut buckets: HashMap<K, Vec<Entry>>, title_of: T) -> Vec<EntrySection>
where
    K: Eq + Hash,
    T: Fn(&K) -> String,
{
    keys.iter()
        .filter_map(|key| {
            buckets
                .remove(key)
                .filter(|data| !data.is_empty())
                .map(|data| EntrySection::new(title_of(key), data))
        })
        .collect()
}

fn finish(
    mode: GroupMode,
    pinned: Option<EntrySection>,
    sections: Vec<EntrySection>,
) -> Vec<EntrySection> {
    let pinned_count = pinned.as_ref().map_or(0, |p| p.count);
    let mut result = Vec::with_capacity(sections.len() + 1);
    result.extend(pinned);
    result.extend(sections);
    debug!(
        { logging::COMPONENT } = "group",
        { logging::GROUP_MODE } = %mode,
        { logging::PINNED_COUNT } = pinned_count,
        { logging::SECTION_COUNT } = result.len(),
        "Entries grouped"
    );
    result
}

// =============================================================================
// STATUS / TYPE / STREAM
// =============================================================================

/// One section per status, in workflow order (reversed for `asc`).
pub fn group_entries_by_status(
    entries: &[Entry],
    order: SortOrder,
    pinned_first: bool,
) -> Vec<EntrySection> {
    let (pinned, remaining) = split_pinned(entries, pinned_first);
    let sorted = sort_entries(&remaining, SortMode::Status, None, order, false);
    let (_, buckets) = bucket_by(sorted, |e| e.status);

    let mut keys = EntryStatus::ALL.to_vec();
    if order.is_asc() {
        keys.reverse();
    }
    let sections = emit(&keys, buckets, |status| status.label().to_string());
    finish(GroupMode::Status, pinned, sections)
}

/// One section per type, alphabetical (reversed for `asc`), `"No Type"` last.
pub fn group_entries_by_type(
    entries: &[Entry],
    order: SortOrder,
    pinned_first: bool,
) -> Vec<EntrySection> {
    let (pinned, remaining) = split_pinned(entries, pinned_first);
    let sorted = sort_entries(&remaining, SortMode::Type, None, order, false);
    let (keys, buckets) = bucket_by(sorted, |e| e.type_name().map(str::to_string));
    let sections = emit(&keys, buckets, |key| {
        key.clone().unwrap_or_else(|| NO_TYPE_TITLE.to_string())
    });
    finish(GroupMode::Type, pinned, sections)
}

/// One section per stream, by name (reversed for `asc`), `"No Stream"` last.
///
/// Entries whose stream is missing from `streams` land in `"No Stream"`.
pub fn group_entries_by_stream(
    entries: &[Entry],
    streams: Option<&StreamMap>,
    order: SortOrder,
    pinned_first: bool,
) -> Vec<EntrySection> {
    let (pinned, remaining) = split_pinned(entries, pinned_first);
    let sorted = sort_entries(&remaining, SortMode::Stream, streams, order, false);
    let (keys, buckets) = bucket_by(sorted, |e| -> Option<Uuid> {
        entry_stream(e, streams).map(|s| s.stream_id)
    });
    let sections = emit(&keys, buckets, |key| {
        key.and_then(|id| streams.and_then(|m| m.get(&id)))
            .map(|s| s.name.clone())
            .unwrap_or_else(|| NO_STREAM_TITLE.to_string())
    });
    finish(GroupMode::Stream, pinned, sections)
}

// =============================================================================
// DUE DATE
// =============================================================================

/// Calendar bucket of a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueBucket {
    Overdue,
    Today,
    ThisWeek,
    NextWeek,
    ThisMonth,
    NextMonth,
    Later,
    NoDate,
}

impl DueBucket {
    /// The dated buckets, soonest first.
    pub const DATED: [DueBucket; 7] = [
        Self::Overdue,
        Self::Today,
        Self::ThisWeek,
        Self::NextWeek,
        Self::ThisMonth,
        Self::NextMonth,
        Self::Later,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Overdue => "Overdue",
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::NextWeek => "Next Week",
            Self::ThisMonth => "This Month",
            Self::NextMonth => "Next Month",
            Self::Later => "Later",
            Self::NoDate => NO_DUE_DATE_TITLE,
        }
    }

    /// Bucket for `entry`'s due date relative to `clock`'s today.
    ///
    /// Buckets depend on the date alone: a completed entry with a past due
    /// date still lands in `Overdue`.
    pub fn for_entry(entry: &Entry, clock: &Clock) -> Self {
        let Some(due) = entry.due_date.as_ref() else {
            return Self::NoDate;
        };
        let day = clock.day_of(due);
        let today = clock.today();
        let end_of_week = clock.end_of_week();

        if day < today {
            Self::Overdue
        } else if day == today {
            Self::Today
        } else if day <= end_of_week {
            Self::ThisWeek
        } else if day <= end_of_week + chrono::Duration::days(7) {
            Self::NextWeek
        } else if day <= clock.end_of_month() {
            Self::ThisMonth
        } else if day <= clock.end_of_next_month() {
            Self::NextMonth
        } else {
            Self::Later
        }
    }
}

/// Sections by due-date bucket. Dated buckets reverse for `asc`;
/// `"No Due Date"` is always last.
pub fn group_entries_by_due_date(
    entries: &[Entry],
    order: SortOrder,
    pinned_first: bool,
    clock: &Clock,
) -> Vec<EntrySection> {
    let (pinned, remaining) = split_pinned(entries, pinned_first);
    let sorted = sort_entries(&remaining, SortMode::DueDate, None, order, false);
    let (_, buckets) = bucket_by(sorted, |e| DueBucket::for_entry(e, clock));

    let mut keys = DueBucket::DATED.to_vec();
    if order.is_asc() {
        keys.reverse();
    }
    keys.push(DueBucket::NoDate);
    let sections = emit(&keys, buckets, |bucket| bucket.label().to_string());
    finish(GroupMode::DueDate, pinned, sections)
}

// =============================================================================
// PRIORITY
// =============================================================================

/// Two sections: prioritized entries (untitled, by priority) then
/// `"No Priority"` (by entry date).
pub fn group_entries_by_priority(
    entries: &[Entry],
    order: SortOrder,
    pinned_first: bool,
) -> Vec<EntrySection> {
    let (pinned, remaining) = split_pinned(entries, pinned_first);
    let (prioritized, unprioritized): (Vec<Entry>, Vec<Entry>) =
        remaining.into_iter().partition(|e| e.priority > 0);

    let mut sections = Vec::with_capacity(2);
    if !prioritized.is_empty() {
        let sorted = sort_entries(&prioritized, SortMode::Priority, None, order, false);
        sections.push(EntrySection::new("", sorted));
    }
    if !unprioritized.is_empty() {
        let sorted = sort_entries(&unprioritized, SortMode::EntryDate, None, order, false);
        sections.push(EntrySection::new(NO_PRIORITY_TITLE, sorted));
    }
    finish(GroupMode::Priority, pinned, sections)
}

// =============================================================================
// RATING
// =============================================================================

/// Scale used to bucket ratings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingGroupMode {
    /// 1–5 star buckets.
    #[serde(rename = "stars")]
    Stars,
    /// Whole numbers 1–10.
    #[serde(rename = "10base")]
    TenBase,
}

impl RatingGroupMode {
    /// `TenBase` when any entry's stream displays out of 10.
    pub fn detect(entries: &[Entry], streams: Option<&StreamMap>) -> Self {
        let ten_base = entries.iter().any(|e| {
            entry_stream(e, streams).is_some_and(|s| s.entry_rating_type.is_ten_base())
        });
        if ten_base {
            Self::TenBase
        } else {
            Self::Stars
        }
    }

    fn key(self, rating: f64) -> u8 {
        match self {
            Self::TenBase => whole_rating(rating),
            Self::Stars => decimal_to_stars(rating),
        }
    }

    fn max_key(self) -> u8 {
        match self {
            Self::TenBase => 10,
            Self::Stars => 5,
        }
    }

    fn title(self, key: u8) -> String {
        match (self, key) {
            (_, 0) => NO_RATING_TITLE.to_string(),
            (Self::TenBase, n) => format!("{}/10", n),
            (Self::Stars, 1) => "1 Star".to_string(),
            (Self::Stars, n) => format!("{} Stars", n),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::TenBase => "10base",
        }
    }
}

/// Sections by rating, highest first (reversed for `asc`), `"No Rating"` last.
///
/// The scale is chosen once for the whole list from the non-pinned entries'
/// streams.
pub fn group_entries_by_rating(
    entries: &[Entry],
    streams: Option<&StreamMap>,
    order: SortOrder,
    pinned_first: bool,
) -> Vec<EntrySection> {
    let (pinned, remaining) = split_pinned(entries, pinned_first);
    let mode = RatingGroupMode::detect(&remaining, streams);
    debug!(
        { logging::RATING_MODE } = mode.as_str(),
        { logging::INPUT_COUNT } = remaining.len(),
        "Rating grouping scale chosen"
    );

    let sorted = sort_entries(&remaining, SortMode::Rating, streams, order, false);
    let (_, buckets) = bucket_by(sorted, |e| mode.key(e.rating));

    let mut keys: Vec<u8> = (1..=mode.max_key()).rev().collect();
    if order.is_asc() {
        keys.reverse();
    }
    keys.push(0);
    let sections = emit(&keys, buckets, |key| mode.title(*key));
    finish(GroupMode::Rating, pinned, sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trace_core::models::parse_timestamp;
    use trace_core::stream::stream_map;
    use trace_core::{RatingType, Stream};
    use chrono::NaiveDate;

    fn entry(content: &str, entry_date: &str) -> Entry {
        Entry::new(Uuid::nil(), content)
            .with_created_at(parse_timestamp("2023-06-01").unwrap())
            .with_entry_date(parse_timestamp(entry_date).unwrap())
    }

    fn titles(sections: &[EntrySection]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    fn contents(section: &EntrySection) -> Vec<&str> {
        section.data.iter().map(|e| e.content.as_str()).collect()
    }

    fn clock() -> Clock {
        // Wednesday
        Clock::at_date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
    }

    #[test]
    fn test_priority_grouping_two_sections() {
        let xs = vec![
            entry("p3", "2024-01-01").with_priority(3),
            entry("p0", "2024-01-01"),
            entry("p5", "2024-01-01").with_priority(5),
        ];
        let sections = group_entries_by_priority(&xs, SortOrder::Desc, false);
        assert_eq!(titles(&sections), vec!["", "No Priority"]);
        assert_eq!(contents(&sections[0]), vec!["p5", "p3"]);
        assert_eq!(contents(&sections[1]), vec!["p0"]);
        assert_eq!(sections[0].count, 2);
    }

    #[test]
    fn test_pinned_section_extracted_once() {
        let xs = vec![
            entry("todo", "2024-01-02").with_status(EntryStatus::Todo),
            entry("pinned-done", "2024-01-03").with_status(EntryStatus::Done).pinned(),
            entry("pinned-todo", "2024-01-01").with_status(EntryStatus::Todo).pinned(),
        ];
        let sections = group_entries_by_status(&xs, SortOrder::Desc, true);
        assert_eq!(titles(&sections), vec!["Pinned", "To Do"]);
        assert_eq!(contents(&sections[0]), vec!["pinned-done", "pinned-todo"]);
        assert_eq!(contents(&sections[1]), vec!["todo"]);

        let sections = group_entries_by_status(&xs, SortOrder::Desc, false);
        assert_eq!(titles(&sections), vec!["To Do", "Done"]);
        assert_eq!(contents(&sections[0]), vec!["todo", "pinned-todo"]);
    }

    #[test]
    fn test_status_grouping_reverses_for_asc() {
        let xs = vec![
            entry("new", "2024-01-01").with_status(EntryStatus::New),
            entry("note", "2024-01-01"),
            entry("closed", "2024-01-01").with_status(EntryStatus::Closed),
        ];
        let desc = group_entries_by_status(&xs, SortOrder::Desc, false);
        assert_eq!(titles(&desc), vec!["New", "Closed", "None"]);
        let asc = group_entries_by_status(&xs, SortOrder::Asc, false);
        assert_eq!(titles(&asc), vec!["None", "Closed", "New"]);
    }

    #[test]
    fn test_type_grouping_no_type_last() {
        let xs = vec![
            entry("plain", "2024-01-01"),
            entry("idea", "2024-01-01").with_type("idea"),
            entry("bug", "2024-01-01").with_type("bug"),
        ];
        let sections = group_entries_by_type(&xs, SortOrder::Desc, false);
        assert_eq!(titles(&sections), vec!["bug", "idea", "No Type"]);
        let sections = group_entries_by_type(&xs, SortOrder::Asc, false);
        assert_eq!(titles(&sections), vec!["idea", "bug", "No Type"]);
    }

    #[test]
    fn test_stream_grouping_resolves_names() {
        let work = Stream::new("Work");
        let home = Stream::new("Home");
        let map = stream_map(&[work.clone(), home.clone()]);
        let xs = vec![
            entry("w", "2024-01-01").with_stream(work.stream_id),
            entry("orphan", "2024-01-01").with_stream(Uuid::new_v4()),
            entry("h", "2024-01-01").with_stream(home.stream_id),
            entry("loose", "2024-01-01"),
        ];
        let sections = group_entries_by_stream(&xs, Some(&map), SortOrder::Desc, false);
        assert_eq!(titles(&sections), vec!["Home", "Work", "No Stream"]);
        assert_eq!(contents(&sections[2]), vec!["orphan", "loose"]);
    }

    #[test]
    fn test_due_buckets() {
        let c = clock();
        let due = |s: &str| entry(s, "2024-01-01").with_due_date(parse_timestamp(s).unwrap());
        assert_eq!(DueBucket::for_entry(&due("2024-01-09"), &c), DueBucket::Overdue);
        assert_eq!(DueBucket::for_entry(&due("2024-01-10"), &c), DueBucket::Today);
        assert_eq!(DueBucket::for_entry(&due("2024-01-13"), &c), DueBucket::ThisWeek);
        assert_eq!(DueBucket::for_entry(&due("2024-01-14"), &c), DueBucket::NextWeek);
        assert_eq!(DueBucket::for_entry(&due("2024-01-20"), &c), DueBucket::NextWeek);
        assert_eq!(DueBucket::for_entry(&due("2024-01-21"), &c), DueBucket::ThisMonth);
        assert_eq!(DueBucket::for_entry(&due("2024-02-29"), &c), DueBucket::NextMonth);
        assert_eq!(DueBucket::for_entry(&due("2024-03-01"), &c), DueBucket::Later);
        assert_eq!(
            DueBucket::for_entry(&entry("x", "2024-01-01"), &c),
            DueBucket::NoDate
        );
    }

    #[test]
    fn test_due_date_grouping_order() {
        let c = clock();
        let due = |s: &str| entry(s, "2024-01-01").with_due_date(parse_timestamp(s).unwrap());
        let xs = vec![
            due("2024-03-05"),
            entry("undated", "2024-01-01"),
            due("2024-01-10"),
            due("2024-01-02"),
        ];
        let desc = group_entries_by_due_date(&xs, SortOrder::Desc, false, &c);
        assert_eq!(titles(&desc), vec!["Overdue", "Today", "Later", "No Due Date"]);
        let asc = group_entries_by_due_date(&xs, SortOrder::Asc, false, &c);
        assert_eq!(titles(&asc), vec!["Later", "Today", "Overdue", "No Due Date"]);
    }

    #[test]
    fn test_rating_grouping_stars() {
        let xs = vec![
            entry("r6", "2024-01-01").with_rating(6.0),
            entry("r0", "2024-01-01"),
            entry("r2", "2024-01-01").with_rating(2.0),
            entry("r10", "2024-01-01").with_rating(10.0),
            entry("r5.5", "2024-01-01").with_rating(5.5),
        ];
        let sections = group_entries_by_rating(&xs, None, SortOrder::Desc, false);
        assert_eq!(titles(&sections), vec!["5 Stars", "3 Stars", "1 Star", "No Rating"]);
        assert_eq!(contents(&sections[1]), vec!["r6", "r5.5"]);
    }

    #[test]
    fn test_rating_grouping_switches_to_ten_base() {
        let films = Stream::new("Films").with_rating_type(RatingType::DecimalWhole);
        let map = stream_map(&[films.clone()]);
        let xs = vec![
            entry("r7.6", "2024-01-01").with_rating(7.6).with_stream(films.stream_id),
            entry("r8", "2024-01-01").with_rating(8.0),
            entry("r3", "2024-01-01").with_rating(3.0),
        ];
        let sections = group_entries_by_rating(&xs, Some(&map), SortOrder::Desc, false);
        assert_eq!(titles(&sections), vec!["8/10", "3/10"]);
        assert_eq!(contents(&sections[0]), vec!["r8", "r7.6"]);
    }

    #[test]
    fn test_rating_mode_ignores_pinned_streams() {
        let films = Stream::new("Films").with_rating_type(RatingType::Decimal);
        let map = stream_map(&[films.clone()]);
        let xs = vec![
            entry("pinned", "2024-01-01").with_rating(7.0).with_stream(films.stream_id).pinned(),
            entry("loose", "2024-01-01").with_rating(7.0),
        ];
        let sections = group_entries_by_rating(&xs, Some(&map), SortOrder::Desc, true);
        assert_eq!(titles(&sections), vec!["Pinned", "4 Stars"]);
    }

    #[test]
    fn test_group_mode_none_single_section() {
        let xs = vec![entry("a", "2024-01-01"), entry("b", "2024-02-01").pinned()];
        let sections = group_entries(&xs, GroupMode::None, None, SortOrder::Desc, true, &clock());
        assert_eq!(titles(&sections), vec!["Pinned", ""]);
        assert!(group_entries(&[], GroupMode::None, None, SortOrder::Desc, true, &clock()).is_empty());
    }
}
