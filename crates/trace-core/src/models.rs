//! Core data models for Trace.
//!
//! These types are shared by both crates and mirror the records returned by
//! the hosted database, plus the derived view shapes (sections, location
//! trees) produced from them.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// TIMESTAMP PARSING
// =============================================================================

/// Parse a timestamp as stored by the database or typed by a client.
///
/// Accepts RFC 3339 (`2024-01-05T10:00:00Z`), Postgres text output
/// (`2024-01-05 10:00:00+00`), naive date-times (treated as UTC), and bare
/// dates (`2024-01-05`, UTC midnight).
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw))),
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// ENTRY STATUS
// =============================================================================

/// Workflow status of an entry.
///
/// Variants are declared in workflow order; [`EntryStatus::workflow_index`]
/// relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    New,
    Todo,
    InProgress,
    InReview,
    Waiting,
    OnHold,
    Done,
    Closed,
    Cancelled,
    /// No active workflow: a plain note.
    #[default]
    None,
}

impl EntryStatus {
    /// All statuses in workflow order.
    pub const ALL: [EntryStatus; 10] = [
        Self::New,
        Self::Todo,
        Self::InProgress,
        Self::InReview,
        Self::Waiting,
        Self::OnHold,
        Self::Done,
        Self::Closed,
        Self::Cancelled,
        Self::None,
    ];

    /// Position in the workflow order (`new` = 0, `none` = 9).
    pub fn workflow_index(self) -> usize {
        self as usize
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::InReview => "In Review",
            Self::Waiting => "Waiting",
            Self::OnHold => "On Hold",
            Self::Done => "Done",
            Self::Closed => "Closed",
            Self::Cancelled => "Cancelled",
            Self::None => "None",
        }
    }

    /// Wire value as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::InReview => "in_review",
            Self::Waiting => "waiting",
            Self::OnHold => "on_hold",
            Self::Done => "done",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
            Self::None => "none",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Invalid entry status: {}", s))
    }
}

impl<'de> Deserialize<'de> for EntryStatus {
    /// Unknown or null statuses collapse to `none` so a record written by a
    /// newer client still loads.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
    }
}

// =============================================================================
// RATING TYPE
// =============================================================================

/// How a stream displays ratings. Storage is always the 0–10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RatingType {
    /// 1–5 stars.
    #[default]
    Stars,
    /// Whole numbers out of 10.
    DecimalWhole,
    /// One decimal place out of 10.
    Decimal,
}

impl RatingType {
    pub const ALL: [RatingType; 3] = [Self::Stars, Self::DecimalWhole, Self::Decimal];

    /// Parse a stored rating type, falling back to stars for unknown values.
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "decimal_whole" => Self::DecimalWhole,
            "decimal" => Self::Decimal,
            _ => Self::Stars,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::DecimalWhole => "decimal_whole",
            Self::Decimal => "decimal",
        }
    }

    /// Label shown in the stream settings picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Stars => "Stars (1-5)",
            Self::DecimalWhole => "10-Base (0-10)",
            Self::Decimal => "10-Base with Decimals",
        }
    }

    /// True for the two out-of-10 display modes.
    pub fn is_ten_base(self) -> bool {
        matches!(self, Self::DecimalWhole | Self::Decimal)
    }
}

impl fmt::Display for RatingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RatingType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Self::parse_lossy(&s)).unwrap_or_default())
    }
}

// =============================================================================
// ENTRY
// =============================================================================

/// A single captured note or task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub entry_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub title: Option<String>,
    /// HTML body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub stream_id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: u32,
    /// Canonical 0–10 rating, 0 = unrated.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_pinned: bool,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub entry_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_archived: bool,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    /// Attachment count joined in by list queries; content is scanned when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_count: Option<u32>,
}

impl Entry {
    /// Create a fresh entry for `user_id` with the given HTML content.
    pub fn new(user_id: Uuid, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            entry_id: Uuid::new_v4(),
            user_id,
            title: None,
            content: content.into(),
            stream_id: None,
            tags: Vec::new(),
            mentions: Vec::new(),
            status: EntryStatus::None,
            entry_type: None,
            priority: 0,
            rating: 0.0,
            is_pinned: false,
            due_date: None,
            entry_date: None,
            created_at: now,
            updated_at: now,
            is_archived: false,
            location_id: None,
            photo_count: None,
        }
    }

    /// `entry_date`, falling back to `created_at`.
    pub fn sort_date(&self) -> DateTime<Utc> {
        self.entry_date.unwrap_or(self.created_at)
    }

    /// Title when present and non-empty.
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Type when present and non-empty.
    pub fn type_name(&self) -> Option<&str> {
        self.entry_type.as_deref().filter(|t| !t.is_empty())
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_type(mut self, entry_type: impl Into<String>) -> Self {
        self.entry_type = Some(entry_type.into());
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_stream(mut self, stream_id: Uuid) -> Self {
        self.stream_id = Some(stream_id);
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_entry_date(mut self, entry_date: DateTime<Utc>) -> Self {
        self.entry_date = Some(entry_date);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn with_location(mut self, location_id: Uuid) -> Self {
        self.location_id = Some(location_id);
        self
    }

    pub fn with_photo_count(mut self, count: u32) -> Self {
        self.photo_count = Some(count);
        self
    }

    pub fn pinned(mut self) -> Self {
        self.is_pinned = true;
        self
    }

    pub fn archived(mut self) -> Self {
        self.is_archived = true;
        self
    }
}

// =============================================================================
// STREAM
// =============================================================================

fn default_true() -> bool {
    true
}

/// A user-defined category with per-stream feature toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    pub stream_id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub entry_use_rating: bool,
    #[serde(default)]
    pub entry_use_priority: bool,
    #[serde(default = "default_true")]
    pub entry_use_status: bool,
    #[serde(default)]
    pub entry_use_duedates: bool,
    #[serde(default = "default_true")]
    pub entry_use_location: bool,
    #[serde(default = "default_true")]
    pub entry_use_photos: bool,
    #[serde(default)]
    pub entry_use_type: bool,
    /// Types offered for entries in this stream.
    #[serde(default, deserialize_with = "null_as_default")]
    pub entry_types: Vec<String>,
    #[serde(default)]
    pub entry_rating_type: RatingType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entry_count: u32,
}

impl Stream {
    /// Create a stream with default toggles.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            stream_id: Uuid::new_v4(),
            user_id: None,
            name: name.into(),
            entry_use_rating: false,
            entry_use_priority: false,
            entry_use_status: true,
            entry_use_duedates: false,
            entry_use_location: true,
            entry_use_photos: true,
            entry_use_type: false,
            entry_types: Vec::new(),
            entry_rating_type: RatingType::Stars,
            entry_count: 0,
        }
    }

    pub fn with_rating_type(mut self, rating_type: RatingType) -> Self {
        self.entry_use_rating = true;
        self.entry_rating_type = rating_type;
        self
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.entry_use_type = true;
        self.entry_types = types.into_iter().map(Into::into).collect();
        self
    }
}

/// Lookup table from stream id to stream.
pub type StreamMap = HashMap<Uuid, Stream>;

// =============================================================================
// VIEW MODES
// =============================================================================

/// Key an entry list is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    Title,
    Stream,
    #[default]
    EntryDate,
    CreatedDate,
    UpdatedDate,
    DueDate,
    Priority,
    Rating,
    Status,
    Type,
}

impl SortMode {
    pub const ALL: [SortMode; 10] = [
        Self::Title,
        Self::Stream,
        Self::EntryDate,
        Self::CreatedDate,
        Self::UpdatedDate,
        Self::DueDate,
        Self::Priority,
        Self::Rating,
        Self::Status,
        Self::Type,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Stream => "stream",
            Self::EntryDate => "entry_date",
            Self::CreatedDate => "created_date",
            Self::UpdatedDate => "updated_date",
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::Rating => "rating",
            Self::Status => "status",
            Self::Type => "type",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| format!("Invalid sort mode: {}", s))
    }
}

/// Sort direction. `Desc` means newest/highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `-1` for ascending, `1` for descending, applied to descending-natural
    /// comparators.
    pub fn multiplier(self) -> i32 {
        match self {
            Self::Asc => -1,
            Self::Desc => 1,
        }
    }

    pub fn is_asc(self) -> bool {
        self == Self::Asc
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Invalid sort order: {}", s)),
        }
    }
}

/// Attribute an entry list is sectioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupMode {
    #[default]
    None,
    Status,
    Type,
    Stream,
    DueDate,
    Priority,
    Rating,
}

impl GroupMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Status => "status",
            Self::Type => "type",
            Self::Stream => "stream",
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::Rating => "rating",
        }
    }
}

impl fmt::Display for GroupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(Self::None),
            "status" => Ok(Self::Status),
            "type" => Ok(Self::Type),
            "stream" => Ok(Self::Stream),
            "due_date" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "rating" => Ok(Self::Rating),
            _ => Err(format!("Invalid group mode: {}", s)),
        }
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

/// A titled slice of an entry list, produced fresh by every grouping call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySection {
    pub title: String,
    pub count: usize,
    pub data: Vec<Entry>,
}

impl EntrySection {
    pub fn new(title: impl Into<String>, data: Vec<Entry>) -> Self {
        Self {
            title: title.into(),
            count: data.len(),
            data,
        }
    }
}

// =============================================================================
// LOCATION HIERARCHY
// =============================================================================

/// One row of the location aggregation query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationHierarchyRow {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub place_name: Option<String>,
    #[serde(default)]
    pub location_id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entry_count: u64,
}

impl LocationHierarchyRow {
    pub fn new(entry_count: u64) -> Self {
        Self {
            entry_count,
            ..Self::default()
        }
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn place(mut self, place_name: impl Into<String>, location_id: Option<Uuid>) -> Self {
        self.place_name = Some(place_name.into());
        self.location_id = location_id;
        self
    }
}

/// Level of a node in the location tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationNodeType {
    Country,
    Region,
    City,
    Place,
    NoLocation,
}

impl LocationNodeType {
    /// The level below this one; places and the no-location bucket are leaves.
    pub fn child_type(self) -> Option<Self> {
        match self {
            Self::Country => Some(Self::Region),
            Self::Region => Some(Self::City),
            Self::City => Some(Self::Place),
            Self::Place | Self::NoLocation => None,
        }
    }
}

/// A node of the derived location tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationTreeNode {
    #[serde(rename = "type")]
    pub node_type: LocationNodeType,
    /// `None` for synthetic nodes.
    pub value: Option<String>,
    pub display_name: String,
    pub entry_count: u64,
    pub children: Vec<LocationTreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_city: Option<String>,
}

impl LocationTreeNode {
    /// True for the synthetic `<unnamed>` placeholder.
    pub fn is_unnamed(&self) -> bool {
        self.value.is_none() && self.node_type != LocationNodeType::NoLocation
    }
}
