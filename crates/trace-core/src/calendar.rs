//! Calendar-day arithmetic for due dates and date buckets.
//!
//! Every "is this due today" style decision compares whole calendar days in
//! the user's time zone. [`Clock`] pins both "now" and the zone so the same
//! inputs always produce the same buckets.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, Months, NaiveDate, Utc};

/// A reference point in time plus the offset used to turn timestamps into
/// calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: DateTime<FixedOffset>,
}

impl Clock {
    /// The current local time.
    pub fn system() -> Self {
        Self {
            now: Local::now().fixed_offset(),
        }
    }

    /// A fixed point in time; days are computed in `now`'s offset.
    pub fn fixed(now: DateTime<FixedOffset>) -> Self {
        Self { now }
    }

    /// Noon UTC on `date`.
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date
            .and_hms_opt(12, 0, 0)
            .unwrap_or_default()
            .and_utc()
            .fixed_offset();
        Self { now: noon }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    /// Today's calendar day.
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Calendar day of `ts` in the clock's offset (time truncated to 00:00).
    pub fn day_of(&self, ts: &DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(self.now.offset()).date_naive()
    }

    /// Whole days from today to the day of `ts` (negative when in the past).
    pub fn days_until(&self, ts: &DateTime<Utc>) -> i64 {
        (self.day_of(ts) - self.today()).num_days()
    }

    /// Saturday closing the current Sunday-start week.
    pub fn end_of_week(&self) -> NaiveDate {
        end_of_week(self.today())
    }

    /// Last day of the current month.
    pub fn end_of_month(&self) -> NaiveDate {
        end_of_month(self.today())
    }

    /// Last day of next month.
    pub fn end_of_next_month(&self) -> NaiveDate {
        let first = first_of_month(self.today());
        first
            .checked_add_months(Months::new(1))
            .map(end_of_month)
            .unwrap_or(NaiveDate::MAX)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::system()
    }
}

/// Saturday of the Sunday-start week containing `day`.
pub fn end_of_week(day: NaiveDate) -> NaiveDate {
    let days_since_sunday = i64::from(day.weekday().num_days_from_sunday());
    day + Duration::days(6 - days_since_sunday)
}

/// Sunday opening the week containing `day`.
pub fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(i64::from(day.weekday().num_days_from_sunday()))
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Last day of the month containing `day`.
pub fn end_of_month(day: NaiveDate) -> NaiveDate {
    first_of_month(day)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}
