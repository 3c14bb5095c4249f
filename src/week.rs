// File: ./src/week.rs
// The seven-day, Sunday-first window the planner navigates in. The window is
// always derived from a single reference date; moving by a day or a week just
// moves the reference and re-derives.
use chrono::{Datelike, Days, NaiveDate};

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Previous,
    Next,
}

/// The Sunday-first week containing `reference`. The reference date itself is
/// always one of the seven returned dates.
pub fn week_window(reference: NaiveDate) -> [NaiveDate; 7] {
    let offset = reference.weekday().num_days_from_sunday() as u64;
    let sunday = reference - Days::new(offset);
    std::array::from_fn(|i| sunday + Days::new(i as u64))
}

/// The Sunday starting the week that contains `reference`.
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    week_window(reference)[0]
}

pub fn shift_day(reference: NaiveDate, direction: NavDirection) -> NaiveDate {
    match direction {
        NavDirection::Previous => reference - Days::new(1),
        NavDirection::Next => reference + Days::new(1),
    }
}

pub fn shift_week(reference: NaiveDate, direction: NavDirection) -> NaiveDate {
    match direction {
        NavDirection::Previous => reference - Days::new(7),
        NavDirection::Next => reference + Days::new(7),
    }
}

/// Header text for a week window, e.g. "Mar 10 - 16" within one month or
/// "Mar 31 - Apr 6" across a month boundary.
pub fn format_range(window: &[NaiveDate; 7]) -> String {
    let first = window[0];
    let last = window[6];
    if first.month() == last.month() {
        format!("{} {} - {}", first.format("%b"), first.day(), last.day())
    } else {
        format!(
            "{} {} - {} {}",
            first.format("%b"),
            first.day(),
            last.format("%b"),
            last.day()
        )
    }
}
