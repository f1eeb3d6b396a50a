//! Total-order sorting of entry lists.
//!
//! Every comparator is written "descending-natural" (newest, highest, or
//! earliest workflow state first) and multiplied by [`SortOrder::multiplier`],
//! so the default `desc` order always reads top-down the way lists are shown.
//! Two exceptions keep their own direction rules: titles sort A→Z on `asc`,
//! and missing due dates, stream names and types always sink to the bottom.

use std::cmp::Ordering;
use tracing::debug;

use trace_core::logging;
use trace_core::stream::stream_name;
use trace_core::{Entry, SortMode, SortOrder, StreamMap};

/// Sort a copy of `entries`.
///
/// With `pinned_first`, pin state is the primary key and `mode` decides the
/// order within pinned and unpinned entries. The sort is stable.
pub fn sort_entries(
    entries: &[Entry],
    mode: SortMode,
    streams: Option<&StreamMap>,
    order: SortOrder,
    pinned_first: bool,
) -> Vec<Entry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        if pinned_first {
            let pins = b.is_pinned.cmp(&a.is_pinned);
            if pins != Ordering::Equal {
                return pins;
            }
        }
        compare_entries(a, b, mode, streams, order)
    });

    debug!(
        { logging::COMPONENT } = "sort",
        { logging::SORT_MODE } = %mode,
        order = %order,
        pinned_first,
        { logging::RESULT_COUNT } = sorted.len(),
        "Entries sorted"
    );
    sorted
}

/// Comparator for a single mode, without pin preference.
pub fn compare_entries(
    a: &Entry,
    b: &Entry,
    mode: SortMode,
    streams: Option<&StreamMap>,
    order: SortOrder,
) -> Ordering {
    match mode {
        SortMode::Title => {
            let natural = title_key(a).cmp(&title_key(b));
            match order {
                SortOrder::Asc => natural,
                SortOrder::Desc => natural.reverse(),
            }
        }
        SortMode::Stream => {
            let name_a = stream_name(streams, a.stream_id.as_ref());
            let name_b = stream_name(streams, b.stream_id.as_ref());
            compare_present_last(name_a, name_b, order)
                .then_with(|| compare_sort_dates(a, b, order))
        }
        SortMode::EntryDate => compare_sort_dates(a, b, order),
        SortMode::CreatedDate => apply(b.created_at.cmp(&a.created_at), order),
        SortMode::UpdatedDate => apply(b.updated_at.cmp(&a.updated_at), order),
        SortMode::DueDate => match (a.due_date, b.due_date) {
            (Some(due_a), Some(due_b)) => apply(due_a.cmp(&due_b), order),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortMode::Priority => apply(b.priority.cmp(&a.priority), order),
        SortMode::Rating => apply(b.rating.total_cmp(&a.rating), order),
        SortMode::Status => {
            let by_index = a.status.workflow_index().cmp(&b.status.workflow_index());
            apply(by_index, order).then_with(|| compare_sort_dates(a, b, order))
        }
        SortMode::Type => compare_present_last(a.type_name(), b.type_name(), order)
            .then_with(|| compare_sort_dates(a, b, order)),
    }
}

/// Flip a descending-natural ordering for ascending lists.
fn apply(ordering: Ordering, order: SortOrder) -> Ordering {
    if order.multiplier() < 0 {
        ordering.reverse()
    } else {
        ordering
    }
}

/// `entry_date || created_at`, newest first on `desc`.
pub(crate) fn compare_sort_dates(a: &Entry, b: &Entry, order: SortOrder) -> Ordering {
    apply(b.sort_date().cmp(&a.sort_date()), order)
}

/// Lexical compare (A→Z on `desc`) with absent values always last.
fn compare_present_last(a: Option<&str>, b: Option<&str>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => apply(a.cmp(b), order),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn title_key(entry: &Entry) -> String {
    entry
        .title_text()
        .unwrap_or(entry.content.as_str())
        .to_lowercase()
}
