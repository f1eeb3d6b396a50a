//! End-to-end checks for sorting, grouping and filtering over a shared
//! fixture of entries and streams.
//!
//! The fixture is generated deterministically so every mode sees pinned,
//! archived, undated, untyped and unassigned entries.

use chrono::{Duration, NaiveDate};
use serde_json::json;
use uuid::Uuid;

use trace_views::group::DueBucket;
use trace_views::stream::stream_map;
use trace_views::{
    decimal_to_stars, filter_entries, filter_sections, format_due_date, format_rating_display,
    group_entries, group_entries_by_priority, is_due_today, is_task_overdue, sort_entries,
    stars_to_decimal, Clock, Entry, EntryFilter, EntryStatus, GroupMode, RatingType, SortMode,
    SortOrder, Stream, StreamMap,
};

const ALL_GROUP_MODES: [GroupMode; 7] = [
    GroupMode::None,
    GroupMode::Status,
    GroupMode::Type,
    GroupMode::Stream,
    GroupMode::DueDate,
    GroupMode::Priority,
    GroupMode::Rating,
];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn clock() -> Clock {
    Clock::at_date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
}

fn streams() -> Vec<Stream> {
    let mut work = Stream::new("Work").with_types(["bug", "feature"]);
    work.stream_id = Uuid::from_u128(1);
    let mut films = Stream::new("Films").with_rating_type(RatingType::Decimal);
    films.stream_id = Uuid::from_u128(2);
    let mut home = Stream::new("Home");
    home.stream_id = Uuid::from_u128(3);
    vec![work, films, home]
}

fn fixture() -> Vec<Entry> {
    let base = clock().now().with_timezone(&chrono::Utc);
    let stream_ids = [
        Some(Uuid::from_u128(1)),
        Some(Uuid::from_u128(3)),
        None,
        Some(Uuid::from_u128(99)),
    ];
    let types = [Some("bug"), Some("feature"), None, Some("")];

    (0..48u32)
        .map(|i| {
            let mut entry = Entry::new(Uuid::nil(), format!("<p>entry {}</p>", i))
                .with_created_at(base - Duration::days(i64::from(i % 13) + 30))
                .with_status(EntryStatus::ALL[(i as usize * 7) % EntryStatus::ALL.len()])
                .with_priority(i % 4)
                .with_rating(f64::from(i % 11));
            entry.entry_id = Uuid::from_u128(1000 + u128::from(i));
            if i % 3 != 0 {
                entry = entry.with_entry_date(base - Duration::days(i64::from(i % 9)));
            }
            if i % 2 == 0 {
                entry = entry.with_due_date(base + Duration::days(i64::from(i) - 20));
            }
            if let Some(stream_id) = stream_ids[i as usize % stream_ids.len()] {
                entry = entry.with_stream(stream_id);
            }
            if let Some(t) = types[i as usize % types.len()] {
                entry = entry.with_type(t);
            }
            if i % 5 == 0 {
                entry = entry.pinned();
            }
            if i % 7 == 0 {
                entry = entry.archived();
            }
            if i % 4 == 1 {
                entry = entry.with_title(format!("Title {}", 47 - i));
            }
            entry
        })
        .collect()
}

fn ids(entries: &[Entry]) -> Vec<Uuid> {
    entries.iter().map(|e| e.entry_id).collect()
}

#[test]
fn test_sort_is_idempotent_for_every_mode() {
    init_tracing();
    let entries = fixture();
    let map: StreamMap = stream_map(&streams());

    for mode in SortMode::ALL {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            for pinned_first in [true, false] {
                let once = sort_entries(&entries, mode, Some(&map), order, pinned_first);
                let twice = sort_entries(&once, mode, Some(&map), order, pinned_first);
                assert_eq!(
                    ids(&once),
                    ids(&twice),
                    "sort not idempotent for {} {} pinned_first={}",
                    mode,
                    order,
                    pinned_first
                );
                assert_eq!(once.len(), entries.len());
            }
        }
    }
}

#[test]
fn test_grouping_conserves_entries() {
    let entries = fixture();
    let map = stream_map(&streams());

    for mode in ALL_GROUP_MODES {
        for order in [SortOrder::Asc, SortOrder::Desc] {
            for pinned_first in [true, false] {
                let sections = group_entries(&entries, mode, Some(&map), order, pinned_first, &clock());
                let total: usize = sections.iter().map(|s| s.count).sum();
                assert_eq!(total, entries.len(), "{} lost entries", mode);

                let mut seen: Vec<Uuid> = sections.iter().flat_map(|s| ids(&s.data)).collect();
                seen.sort();
                seen.dedup();
                assert_eq!(seen.len(), entries.len(), "{} duplicated entries", mode);

                for section in &sections {
                    assert_eq!(section.count, section.data.len());
                    assert!(section.count > 0, "{} emitted empty section {}", mode, section.title);
                }
                if pinned_first {
                    assert_eq!(sections[0].title, "Pinned");
                    assert!(sections[0].data.iter().all(|e| e.is_pinned));
                    assert!(sections[1..].iter().all(|s| s.data.iter().all(|e| !e.is_pinned)));
                }
            }
        }
    }
}

#[test]
fn test_due_buckets_partition_and_agree_with_predicates() {
    let c = clock();
    for entry in fixture() {
        let bucket = DueBucket::for_entry(&entry, &c);
        match entry.due_date.as_ref() {
            None => assert_eq!(bucket, DueBucket::NoDate),
            Some(due) => {
                assert!(DueBucket::DATED.contains(&bucket));
                if is_task_overdue(entry.status, Some(due), &c) {
                    assert_eq!(bucket, DueBucket::Overdue);
                }
                if is_due_today(Some(due), &c) {
                    assert_eq!(bucket, DueBucket::Today);
                }
            }
        }
    }
}

#[test]
fn test_rating_scenario() {
    assert_eq!(stars_to_decimal(3.0), 6.0);
    assert_eq!(decimal_to_stars(6.0), 3);
    assert_eq!(format_rating_display(6.0, RatingType::Stars), "3/5");
}

#[test]
fn test_status_sort_scenario() {
    let rows = json!([
        {"entry_id": Uuid::from_u128(1), "user_id": Uuid::nil(), "content": "a",
         "status": "done", "entry_date": "2024-01-01",
         "created_at": "2024-01-01 00:00:00+00", "updated_at": "2024-01-01 00:00:00+00"},
        {"entry_id": Uuid::from_u128(2), "user_id": Uuid::nil(), "content": "b",
         "status": "todo", "entry_date": "2024-02-01",
         "created_at": "2024-02-01 00:00:00+00", "updated_at": "2024-02-01 00:00:00+00"}
    ]);
    let entries: Vec<Entry> = serde_json::from_value(rows).unwrap();
    let sorted = sort_entries(&entries, SortMode::Status, None, SortOrder::Desc, false);
    assert_eq!(sorted[0].status, EntryStatus::Todo);
    assert_eq!(sorted[1].status, EntryStatus::Done);
}

#[test]
fn test_priority_grouping_scenario() {
    let entries: Vec<Entry> = [3, 0, 5]
        .into_iter()
        .map(|p| Entry::new(Uuid::nil(), format!("p{}", p)).with_priority(p))
        .collect();
    let sections = group_entries_by_priority(&entries, SortOrder::Desc, false);
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "");
    assert_eq!(
        sections[0].data.iter().map(|e| e.priority).collect::<Vec<_>>(),
        vec![5, 3]
    );
    assert_eq!(sections[1].title, "No Priority");
    assert_eq!(sections[1].data[0].priority, 0);
}

#[test]
fn test_overdue_label_scenario() {
    let c = Clock::at_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    let due = trace_views::models::parse_timestamp("2024-01-01").unwrap();
    assert_eq!(format_due_date(Some(&due), EntryStatus::Todo, &c), "Overdue by 4 days");
}

#[test]
fn test_archived_never_visible_by_default() -> anyhow::Result<()> {
    let entries = fixture();
    let filter: EntryFilter = serde_json::from_value(json!({ "show_archived": false }))?;
    let visible = filter_entries(&entries, &filter, "", &clock());
    assert!(!visible.is_empty());
    assert!(visible.iter().all(|e| !e.is_archived));
    assert_eq!(
        visible.len(),
        entries.iter().filter(|e| !e.is_archived).count()
    );
    Ok(())
}

#[test]
fn test_filtered_sections_match_flat_filter() {
    let entries = fixture();
    let map = stream_map(&streams());
    let filter = EntryFilter::new()
        .with_statuses([EntryStatus::Todo, EntryStatus::New, EntryStatus::Done])
        .with_rating_range(Some(2.0), None);
    let c = clock();

    let sections = group_entries(&entries, GroupMode::Stream, Some(&map), SortOrder::Desc, true, &c);
    let filtered = filter_sections(&sections, &filter, "entry", &c);
    let flat = filter_entries(&entries, &filter, "entry", &c);

    let mut from_sections: Vec<Uuid> = filtered.iter().flat_map(|s| ids(&s.data)).collect();
    let mut from_flat = ids(&flat);
    from_sections.sort();
    from_flat.sort();
    assert_eq!(from_sections, from_flat);
    assert!(filtered.iter().all(|s| s.count == s.data.len() && s.count > 0));
}
