//! Stream lookups: display names, rating display modes, attribute toggles.
//!
//! Streams are read-only lookup data here. Callers build a [`StreamMap`] once
//! per stream list and memoize it however they like.

use uuid::Uuid;

use crate::models::{Entry, RatingType, Stream, StreamMap};

/// Build the id → stream lookup table.
pub fn stream_map(streams: &[Stream]) -> StreamMap {
    streams
        .iter()
        .map(|stream| (stream.stream_id, stream.clone()))
        .collect()
}

/// Stream of an entry, if assigned and known.
pub fn entry_stream<'a>(entry: &Entry, streams: Option<&'a StreamMap>) -> Option<&'a Stream> {
    let id = entry.stream_id?;
    streams?.get(&id)
}

/// Resolved display name of a stream id.
pub fn stream_name<'a>(streams: Option<&'a StreamMap>, stream_id: Option<&Uuid>) -> Option<&'a str> {
    let id = stream_id?;
    streams?.get(id).map(|s| s.name.as_str())
}

/// Rating display mode for an entry: its stream's, else stars.
pub fn entry_rating_type(entry: &Entry, streams: Option<&StreamMap>) -> RatingType {
    entry_stream(entry, streams)
        .map(|s| s.entry_rating_type)
        .unwrap_or_default()
}

/// Optional metadata fields a stream can switch on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryAttribute {
    Rating,
    Priority,
    Status,
    DueDate,
    Location,
    Photos,
    Type,
}

/// Whether `attribute` is shown for entries of `stream`.
///
/// Entries without a stream show every attribute. Types additionally need at
/// least one configured type.
pub fn is_attribute_enabled(stream: Option<&Stream>, attribute: EntryAttribute) -> bool {
    let Some(stream) = stream else {
        return true;
    };
    match attribute {
        EntryAttribute::Rating => stream.entry_use_rating,
        EntryAttribute::Priority => stream.entry_use_priority,
        EntryAttribute::Status => stream.entry_use_status,
        EntryAttribute::DueDate => stream.entry_use_duedates,
        EntryAttribute::Location => stream.entry_use_location,
        EntryAttribute::Photos => stream.entry_use_photos,
        EntryAttribute::Type => stream.entry_use_type && !stream.entry_types.is_empty(),
    }
}

/// Union of the types configured on `streams`, sorted, for the type filter.
pub fn available_types(streams: &[Stream]) -> Vec<String> {
    let mut types: Vec<String> = streams
        .iter()
        .filter(|s| s.entry_use_type)
        .flat_map(|s| s.entry_types.iter().cloned())
        .collect();
    types.sort();
    types.dedup();
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_map_and_name_lookup() {
        let work = Stream::new("Work");
        let home = Stream::new("Home");
        let map = stream_map(&[work.clone(), home]);
        assert_eq!(map.len(), 2);
        assert_eq!(stream_name(Some(&map), Some(&work.stream_id)), Some("Work"));
        assert_eq!(stream_name(Some(&map), Some(&Uuid::new_v4())), None);
        assert_eq!(stream_name(None, Some(&work.stream_id)), None);
        assert_eq!(stream_name(Some(&map), None), None);
    }

    #[test]
    fn test_entry_rating_type_defaults_to_stars() {
        let films = Stream::new("Films").with_rating_type(RatingType::Decimal);
        let map = stream_map(&[films.clone()]);
        let user = Uuid::new_v4();
        let rated = Entry::new(user, "Heat").with_stream(films.stream_id);
        let loose = Entry::new(user, "Note");
        assert_eq!(entry_rating_type(&rated, Some(&map)), RatingType::Decimal);
        assert_eq!(entry_rating_type(&loose, Some(&map)), RatingType::Stars);
        assert_eq!(entry_rating_type(&rated, None), RatingType::Stars);
    }

    #[test]
    fn test_attribute_toggles() {
        assert!(is_attribute_enabled(None, EntryAttribute::Rating));
        let plain = Stream::new("Plain");
        assert!(!is_attribute_enabled(Some(&plain), EntryAttribute::Rating));
        assert!(is_attribute_enabled(Some(&plain), EntryAttribute::Status));
        assert!(!is_attribute_enabled(Some(&plain), EntryAttribute::Type));
        let typed = Stream::new("Typed").with_types(["bug", "idea"]);
        assert!(is_attribute_enabled(Some(&typed), EntryAttribute::Type));
    }

    #[test]
    fn test_available_types_union() {
        let a = Stream::new("A").with_types(["idea", "bug"]);
        let b = Stream::new("B").with_types(["bug", "chore"]);
        let c = Stream::new("C");
        assert_eq!(available_types(&[a, b, c]), vec!["bug", "chore", "idea"]);
    }
}
