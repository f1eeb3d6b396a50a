//! Rating scale conversion.
//!
//! Ratings are stored on a canonical 0–10 scale with one decimal place, where
//! 0 means "unrated". Streams choose one of three display projections
//! ([`RatingType`]): 1–5 stars, whole numbers out of 10, or one decimal out
//! of 10.
//!
//! The star thresholds are deliberately uneven: the first star covers
//! `(0, 2.5]` and every following star spans 2.0.

use crate::defaults::{RATING_MAX, RATING_MIN, STAR_COUNT, STAR_GLYPH};
use crate::models::RatingType;

/// Clamp to `[0, 10]` and round to the nearest 0.1. Non-finite input is 0.
pub fn clamp_rating(value: f64) -> f64 {
    if !value.is_finite() {
        return RATING_MIN;
    }
    let clamped = value.clamp(RATING_MIN, RATING_MAX);
    // half-up on value*10; clamped is non-negative so `round` agrees
    (clamped * 10.0).round() / 10.0
}

/// Map a star count onto the storage scale (1★ = 2, 5★ = 10).
pub fn stars_to_decimal(stars: f64) -> f64 {
    if stars <= 0.0 || stars.is_nan() {
        return RATING_MIN;
    }
    if stars > f64::from(STAR_COUNT) {
        return RATING_MAX;
    }
    stars * 2.0
}

/// Bucket a storage value into 0–5 stars.
pub fn decimal_to_stars(decimal: f64) -> u8 {
    if decimal <= 0.0 || decimal.is_nan() {
        0
    } else if decimal <= 2.5 {
        1
    } else if decimal <= 4.5 {
        2
    } else if decimal <= 6.5 {
        3
    } else if decimal <= 8.5 {
        4
    } else {
        5
    }
}

/// Whole-number projection used by `decimal_whole` displays and 10-base
/// grouping.
pub fn whole_rating(decimal: f64) -> u8 {
    if !decimal.is_finite() {
        return 0;
    }
    decimal.clamp(RATING_MIN, RATING_MAX).round() as u8
}

/// Text such as `"3/5"`, `"8/10"` or `"7.5/10"`; empty when unrated.
pub fn format_rating_display(rating: f64, rating_type: RatingType) -> String {
    if rating <= 0.0 || rating.is_nan() {
        return String::new();
    }
    match rating_type {
        RatingType::Decimal => format!("{:.1}/10", rating),
        RatingType::DecimalWhole => format!("{}/10", whole_rating(rating)),
        RatingType::Stars => format!("{}/{}", decimal_to_stars(rating), STAR_COUNT),
    }
}

/// Icon variant of [`format_rating_display`]: repeated stars for the star
/// scale, a single star prefix for 10-base scales.
pub fn format_rating_with_icon(rating: f64, rating_type: RatingType) -> String {
    if rating <= 0.0 || rating.is_nan() {
        return String::new();
    }
    match rating_type {
        RatingType::Decimal => format!("{} {:.1}", STAR_GLYPH, rating),
        RatingType::DecimalWhole => format!("{} {}", STAR_GLYPH, whole_rating(rating)),
        RatingType::Stars => STAR_GLYPH.repeat(usize::from(decimal_to_stars(rating))),
    }
}

/// Smallest nonzero storage value a display mode can express.
pub fn get_min_rating(rating_type: RatingType) -> f64 {
    match rating_type {
        RatingType::Decimal => 0.1,
        RatingType::DecimalWhole => 1.0,
        RatingType::Stars => 2.0,
    }
}

/// Storage increment of one step of a rating input control.
pub fn rating_step(rating_type: RatingType) -> f64 {
    get_min_rating(rating_type)
}

/// Picker label for a stored rating type string; unknown types use the stars label.
pub fn rating_type_label(rating_type: &str) -> &'static str {
    RatingType::parse_lossy(rating_type).label()
}

/// Convert a value typed on a display scale into canonical storage.
pub fn normalize_display_input(value: f64, rating_type: RatingType) -> f64 {
    match rating_type {
        RatingType::Stars => clamp_rating(stars_to_decimal(value.round())),
        RatingType::DecimalWhole => clamp_rating(value.round()),
        RatingType::Decimal => clamp_rating(value),
    }
}
