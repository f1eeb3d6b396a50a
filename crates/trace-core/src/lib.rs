//! # trace-core
//!
//! Core types and primitives for Trace entry views.
//!
//! This crate provides the entry/stream data model, the rating scale, status
//! and due-date predicates, and the text helpers that the view crate builds
//! its sorting, grouping and filtering on.

pub mod calendar;
pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod predicates;
pub mod rating;
pub mod stream;
pub mod text;

// Re-export commonly used types at crate root
pub use calendar::Clock;
pub use config::{ConfigError, ViewConfig};
pub use error::{Error, Result};
pub use models::*;
pub use predicates::{
    format_due_date, is_actionable_status, is_completed_status, is_due_this_week, is_due_today,
    is_task, is_task_overdue,
};
pub use rating::{
    clamp_rating, decimal_to_stars, format_rating_display, format_rating_with_icon,
    get_min_rating, stars_to_decimal,
};
pub use stream::{entry_rating_type, is_attribute_enabled, stream_map, stream_name, EntryAttribute};
pub use text::{display_title, extract_mentions, extract_tags, strip_html};
