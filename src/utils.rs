//! Common utility functions: token casting and calendar provider operations.
use crate::field::ValueType;
use chrono::{
    DateTime, Days, FixedOffset, Local, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Timelike,
};
use chrono_tz::Tz;
use std::cmp::Ordering;

const DAYS_OF_WEEK: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Minimal length of the weekday name prefix.
const WEEKDAY_PREFIX_LEN: usize = 3;

/// Converts string of decimal digits into unsigned number.
pub(crate) fn parse_digital_value(input: &str) -> Option<ValueType> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        None
    } else {
        input.parse::<ValueType>().ok()
    }
}

/// Converts weekday name (full or abbreviated, case-insensitive) into its index, Sunday is 0.
pub(crate) fn parse_weekday(input: &str) -> Option<ValueType> {
    if input.len() < WEEKDAY_PREFIX_LEN || !input.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    let input = input.to_ascii_lowercase();
    DAYS_OF_WEEK
        .iter()
        .position(|name| name.starts_with(&input))
        .map(|i| i as ValueType)
}

/// Returns `true` if provided year is leap.
#[inline]
pub(crate) fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns number of days in specified month.
pub(crate) fn days_in_month(year: i32, month: u32) -> ValueType {
    if month == 0 || month > 12 {
        panic!("Invalid month: {month}");
    }

    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => unreachable!(),
    }
}

/// Timezone of the running process.
///
/// Uses `TZ` environment variable if it contains known zone name, then the system zone name.
/// Falls back to a fixed `Etc/GMT±N` zone with the current local offset (whole hours only), and then to UTC.
pub(crate) fn local_timezone() -> Tz {
    let system = iana_time_zone::get_timezone().ok();
    resolve_timezone(
        std::env::var("TZ").ok().as_deref(),
        system.as_deref(),
        Local::now().offset().local_minus_utc(),
    )
}

fn resolve_timezone(env: Option<&str>, system: Option<&str>, offset: i32) -> Tz {
    let named = env
        .and_then(|name| name.trim_start_matches(':').parse::<Tz>().ok())
        .or_else(|| system.and_then(|name| name.parse::<Tz>().ok()));
    if let Some(tz) = named {
        return tz;
    }

    if offset % 3600 == 0 {
        // Etc/GMT zones have inverted sign.
        let hours = offset / 3600;
        let name = match hours.cmp(&0) {
            Ordering::Equal => "Etc/GMT".to_owned(),
            Ordering::Greater => format!("Etc/GMT-{hours}"),
            Ordering::Less => format!("Etc/GMT+{}", -hours),
        };
        if let Ok(tz) = name.parse::<Tz>() {
            return tz;
        }
    }

    chrono_tz::UTC
}

#[inline]
fn offset_of(dt: &DateTime<Tz>) -> FixedOffset {
    dt.offset().fix()
}

/// Maps local civil time into the instant in `tz`.
///
/// Ambiguous time resolves to the earliest instant,
/// non-existent time is shifted forward by the length of the gap.
pub(crate) fn resolve_local(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _latest) => earliest,
        LocalResult::None => {
            let before = tz.offset_from_utc_datetime(&(local - TimeDelta::days(1))).fix();
            tz.from_utc_datetime(&(local - TimeDelta::seconds(before.local_minus_utc() as i64)))
        }
    }
}

/// Returns `true` if `dt` is the later occurrence of the repeated local time.
pub(crate) fn is_repeated_occurrence(dt: &DateTime<Tz>) -> bool {
    resolve_local(&dt.timezone(), dt.naive_local()) != *dt
}

/// Returns `true` if UTC offset changes during the local day of `context`.
pub(crate) fn has_offset_change(context: &DateTime<Tz>) -> bool {
    let tz = context.timezone();
    let date = context.date_naive();
    let Some(next_date) = date.checked_add_days(Days::new(1)) else {
        return false;
    };

    let first = resolve_local(&tz, date.and_time(NaiveTime::MIN));
    let last = resolve_local(&tz, next_date.and_time(NaiveTime::MIN)) - TimeDelta::seconds(1);
    let before = first - TimeDelta::seconds(1);

    offset_of(&before) != offset_of(&first) || offset_of(&first) != offset_of(&last)
}

/// Hours which really happen during the local day of `context`, in chronological order.
///
/// Returns `None` if the day has no offset change, so all 24 hours are present.
pub(crate) fn day_hours(context: &DateTime<Tz>) -> Option<Vec<ValueType>> {
    if !has_offset_change(context) {
        return None;
    }

    let date = context.date_naive();
    let mut cursor = resolve_local(&context.timezone(), date.and_time(NaiveTime::MIN));
    let mut hours = Vec::with_capacity(25);
    while cursor.date_naive() == date {
        hours.push(cursor.hour() as ValueType);
        cursor += TimeDelta::hours(1);
    }

    Some(hours)
}

/// Minutes which really happen during the local hour of `context`, in chronological order.
///
/// Returns `None` if the day has no offset change, so all 60 minutes are present.
pub(crate) fn hour_minutes(context: &DateTime<Tz>) -> Option<Vec<ValueType>> {
    if !has_offset_change(context) {
        return None;
    }

    let hour = context.hour();
    let offset = offset_of(context);
    let same_run = |dt: &DateTime<Tz>| dt.hour() == hour && offset_of(dt) == offset;

    let mut cursor = start_of_minute(context);
    loop {
        let prev = cursor - TimeDelta::minutes(1);
        if !same_run(&prev) {
            break;
        }
        cursor = prev;
    }

    let mut minutes = Vec::with_capacity(60);
    while same_run(&cursor) {
        minutes.push(cursor.minute() as ValueType);
        cursor += TimeDelta::minutes(1);
    }

    Some(minutes)
}

/// Truncates seconds (and fractions) of the instant.
#[inline]
pub(crate) fn start_of_minute(dt: &DateTime<Tz>) -> DateTime<Tz> {
    *dt - TimeDelta::seconds(dt.second() as i64) - TimeDelta::nanoseconds(dt.nanosecond() as i64)
}

/// The first instant of the local hour of `dt` with the same UTC offset.
pub(crate) fn start_of_hour(dt: &DateTime<Tz>) -> DateTime<Tz> {
    let minute_start = start_of_minute(dt);
    let truncated = minute_start - TimeDelta::minutes(dt.minute() as i64);
    if truncated.hour() == dt.hour() && truncated.minute() == 0 {
        return truncated;
    }

    // The hour has started at an offset change.
    let offset = offset_of(dt);
    let mut cursor = minute_start;
    loop {
        let prev = cursor - TimeDelta::minutes(1);
        if prev.hour() != dt.hour() || offset_of(&prev) != offset {
            return cursor;
        }
        cursor = prev;
    }
}
