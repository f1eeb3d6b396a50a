//! Status and due-date classification of entries.

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::calendar::Clock;
use crate::defaults::DUE_THIS_WEEK_DAYS;
use crate::models::EntryStatus;

/// Statuses with open work.
pub const ACTIONABLE_STATUSES: [EntryStatus; 6] = [
    EntryStatus::New,
    EntryStatus::Todo,
    EntryStatus::InProgress,
    EntryStatus::InReview,
    EntryStatus::Waiting,
    EntryStatus::OnHold,
];

/// Statuses that end a workflow.
pub const COMPLETED_STATUSES: [EntryStatus; 3] =
    [EntryStatus::Done, EntryStatus::Closed, EntryStatus::Cancelled];

pub fn is_actionable_status(status: EntryStatus) -> bool {
    ACTIONABLE_STATUSES.contains(&status)
}

pub fn is_completed_status(status: EntryStatus) -> bool {
    COMPLETED_STATUSES.contains(&status)
}

/// Any status other than `none` makes an entry a task.
pub fn is_task(status: EntryStatus) -> bool {
    status != EntryStatus::None
}

/// Open work whose due day is strictly before today.
pub fn is_task_overdue(status: EntryStatus, due_date: Option<&DateTime<Utc>>, clock: &Clock) -> bool {
    if !is_actionable_status(status) {
        return false;
    }
    due_date.is_some_and(|due| clock.day_of(due) < clock.today())
}

pub fn is_due_today(due_date: Option<&DateTime<Utc>>, clock: &Clock) -> bool {
    due_date.is_some_and(|due| clock.day_of(due) == clock.today())
}

/// Due within today and the following seven days, inclusive.
pub fn is_due_this_week(due_date: Option<&DateTime<Utc>>, clock: &Clock) -> bool {
    due_date.is_some_and(|due| {
        let day = clock.day_of(due);
        let today = clock.today();
        day >= today && day <= today + Duration::days(DUE_THIS_WEEK_DAYS)
    })
}

/// Short relative label for a due date, e.g. `"Tomorrow"` or
/// `"Overdue by 4 days"`. Empty when there is no due date.
pub fn format_due_date(due_date: Option<&DateTime<Utc>>, status: EntryStatus, clock: &Clock) -> String {
    let Some(due) = due_date else {
        return String::new();
    };
    let delta = clock.days_until(due);
    let day = clock.day_of(due);

    if delta < 0 && is_actionable_status(status) {
        let overdue = -delta;
        return if overdue == 1 {
            "Overdue by 1 day".to_string()
        } else {
            format!("Overdue by {} days", overdue)
        };
    }

    match delta {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        2..=7 => day.format("%a, %b %-d").to_string(),
        _ if day.year() != clock.today().year() => day.format("%b %-d, %Y").to_string(),
        _ => day.format("%b %-d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;
    use chrono::NaiveDate;

    fn clock() -> Clock {
        Clock::at_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap())
    }

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_status_tables_are_disjoint() {
        for status in EntryStatus::ALL {
            assert!(!(is_actionable_status(status) && is_completed_status(status)));
        }
        assert!(!is_actionable_status(EntryStatus::None));
        assert!(!is_completed_status(EntryStatus::None));
        assert!(!is_task(EntryStatus::None));
        assert!(is_task(EntryStatus::Done));
    }

    #[test]
    fn test_overdue_requires_actionable_status() {
        let past = ts("2024-01-01");
        assert!(is_task_overdue(EntryStatus::Todo, Some(&past), &clock()));
        assert!(!is_task_overdue(EntryStatus::Done, Some(&past), &clock()));
        assert!(!is_task_overdue(EntryStatus::None, Some(&past), &clock()));
        assert!(!is_task_overdue(EntryStatus::Todo, None, &clock()));
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let today = ts("2024-01-05T00:00:00Z");
        assert!(!is_task_overdue(EntryStatus::Todo, Some(&today), &clock()));
        assert!(is_due_today(Some(&today), &clock()));
    }

    #[test]
    fn test_due_this_week_window() {
        assert!(is_due_this_week(Some(&ts("2024-01-05")), &clock()));
        assert!(is_due_this_week(Some(&ts("2024-01-12")), &clock()));
        assert!(!is_due_this_week(Some(&ts("2024-01-13")), &clock()));
        assert!(!is_due_this_week(Some(&ts("2024-01-04")), &clock()));
        assert!(!is_due_this_week(None, &clock()));
    }

    #[test]
    fn test_format_due_date() {
        let c = clock();
        assert_eq!(format_due_date(None, EntryStatus::Todo, &c), "");
        assert_eq!(
            format_due_date(Some(&ts("2024-01-01")), EntryStatus::Todo, &c),
            "Overdue by 4 days"
        );
        assert_eq!(
            format_due_date(Some(&ts("2024-01-04")), EntryStatus::InProgress, &c),
            "Overdue by 1 day"
        );
        assert_eq!(format_due_date(Some(&ts("2024-01-05")), EntryStatus::Todo, &c), "Today");
        assert_eq!(format_due_date(Some(&ts("2024-01-06")), EntryStatus::Todo, &c), "Tomorrow");
        assert_eq!(
            format_due_date(Some(&ts("2024-01-10")), EntryStatus::Todo, &c),
            "Wed, Jan 10"
        );
        assert_eq!(format_due_date(Some(&ts("2024-03-02")), EntryStatus::Todo, &c), "Mar 2");
        assert_eq!(
            format_due_date(Some(&ts("2023-12-20")), EntryStatus::Done, &c),
            "Dec 20, 2023"
        );
    }
}
