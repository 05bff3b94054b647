//! Temporal policy: pure, deterministic calendar decisions.
//!
//! Everything here takes an injected "now" in the fixed Caracas
//! timezone. The single source of truth for converting a UTC instant
//! into the operating timezone is [`now_in_caracas`].

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::constants::VENEZUELA_TZ;
use crate::models::ScheduleConfig;

/// Converts a UTC instant into Caracas time.
pub fn now_in_caracas(instant: DateTime<Utc>) -> DateTime<Tz> {
    instant.with_timezone(&VENEZUELA_TZ)
}

/// True iff the date falls on a Saturday or Sunday.
///
/// Rest days are decided from the date in the fixed timezone, never
/// from server-local time.
pub fn is_rest_day(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn minutes_since_midnight(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// The calendar date whose rate is authoritative at `now`.
///
/// Before the apply cut-over the previous day's rate is still the
/// active one: a rate scanned on Monday evening serves through to
/// Tuesday 00:30 (with the default schedule).
pub fn active_target_date<T: TimeZone>(now: DateTime<T>, schedule: &ScheduleConfig) -> NaiveDate {
    let today = now.date_naive();
    if minutes_since_midnight(now.time()) < minutes_since_midnight(schedule.apply_time) {
        today.pred_opt().unwrap_or(today)
    } else {
        today
    }
}

/// The calendar date a fetch performed at `now` is scanning for.
///
/// Dual of [`active_target_date`]: the scanned rate becomes active at
/// the next apply cut-over, so an evening scan (at or after the apply
/// time-of-day) targets tomorrow, while an early-morning scan still
/// targets today.
pub fn scan_target_date<T: TimeZone>(now: DateTime<T>, schedule: &ScheduleConfig) -> NaiveDate {
    let today = now.date_naive();
    if minutes_since_midnight(now.time()) >= minutes_since_midnight(schedule.apply_time) {
        today.succ_opt().unwrap_or(today)
    } else {
        today
    }
}

/// Count of weekdays (Mon-Fri) in `(start, end]`.
///
/// Clamped to zero when `end` does not follow `start`. Used only to
/// decide whether staleness has persisted for at least one business
/// day.
pub fn business_days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if end <= start {
        return 0;
    }
    let mut count = 0;
    let mut current = start;
    while current < end {
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
        if !is_rest_day(current) {
            count += 1;
        }
    }
    count
}
