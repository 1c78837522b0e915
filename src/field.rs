use crate::{utils, CalendarError};
use chrono::{DateTime, Datelike, Timelike};
use chrono_tz::Tz;
use std::fmt::Display;

/// Minimum valid year.
pub const MIN_YEAR: ValueType = 1970;
/// Maximum valid year.
pub const MAX_YEAR: ValueType = 2200;

/// Type of the field values.
pub type ValueType = u16;

/// Calendar fields of the expression, in the significance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Year, 1970..2200, two-digit values are expanded.
    Year,
    /// Month, 1..12.
    Month,
    /// Day of month, 1..31 (narrowed to the real month length during the search).
    DayOfMonth,
    /// Day of week, 0..6, Sunday is 0.
    DayOfWeek,
    /// Hour, 0..23.
    Hour,
    /// Minute, 0..59.
    Minute,
    /// Second, 0..59.
    Second,
}

impl Field {
    /// All fields in the significance order.
    pub const ALL: [Field; 7] = [
        Field::Year,
        Field::Month,
        Field::DayOfMonth,
        Field::DayOfWeek,
        Field::Hour,
        Field::Minute,
        Field::Second,
    ];

    /// Default (context-free) interval of valid values, inclusive.
    pub fn interval(&self) -> (ValueType, ValueType) {
        match self {
            Field::Year => (MIN_YEAR, MAX_YEAR),
            Field::Month => (1, 12),
            Field::DayOfMonth => (1, 31),
            Field::DayOfWeek => (0, 6),
            Field::Hour => (0, 23),
            Field::Minute => (0, 59),
            Field::Second => (0, 59),
        }
    }

    /// Bounds used to split wrapped ranges like `Fri..Mon`, only days of week allow them.
    pub(crate) fn wrap_bounds(&self) -> Option<(ValueType, ValueType)> {
        match self {
            Field::DayOfWeek => Some(self.interval()),
            _ => None,
        }
    }

    /// Returns `true` if value is inside the default interval.
    #[inline]
    pub(crate) fn contains(&self, value: ValueType) -> bool {
        let (min, max) = self.interval();
        value >= min && value <= max
    }

    /// Raw value adjustment applied before validation: short years become full.
    pub(crate) fn normalize(&self, value: ValueType) -> ValueType {
        match (self, value) {
            (Field::Year, 0..=69) => value + 2000,
            (Field::Year, 70..=99) => value + 1900,
            _ => value,
        }
    }

    /// Ordered sequence of values which are valid for the field.
    ///
    /// With `context`, days of month are limited by the real month length,
    /// hours and minutes reflect offset changes of that day (skipped or repeated values).
    pub(crate) fn sequence(&self, context: Option<&DateTime<Tz>>) -> Vec<ValueType> {
        let (min, max) = self.interval();
        let adjusted = context.and_then(|context| match self {
            Field::DayOfMonth => Some((min..=utils::days_in_month(context.year(), context.month())).collect()),
            Field::Hour => utils::day_hours(context),
            Field::Minute => utils::hour_minutes(context),
            _ => None,
        });

        adjusted.unwrap_or_else(|| (min..=max).collect())
    }

    /// Value of the field in the local time of `dt`.
    pub(crate) fn value_of(&self, dt: &DateTime<Tz>) -> ValueType {
        match self {
            // Years beyond ValueType can't match any condition anyway.
            Field::Year => ValueType::try_from(dt.year()).unwrap_or(ValueType::MAX),
            Field::Month => dt.month() as ValueType,
            Field::DayOfMonth => dt.day() as ValueType,
            Field::DayOfWeek => dt.weekday().num_days_from_sunday() as ValueType,
            Field::Hour => dt.hour() as ValueType,
            Field::Minute => dt.minute() as ValueType,
            Field::Second => dt.second() as ValueType,
        }
    }

    /// Field specific error for invalid condition.
    pub(crate) fn error(&self, message: String) -> CalendarError {
        match self {
            Field::Year => CalendarError::InvalidYearValue(message),
            Field::Month => CalendarError::InvalidMonthValue(message),
            Field::DayOfMonth => CalendarError::InvalidDayOfMonthValue(message),
            Field::DayOfWeek => CalendarError::InvalidDayOfWeekValue(message),
            Field::Hour => CalendarError::InvalidHourValue(message),
            Field::Minute => CalendarError::InvalidMinuteValue(message),
            Field::Second => CalendarError::InvalidSecondValue(message),
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::DayOfMonth => "day of month",
            Field::DayOfWeek => "day of week",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Australia::Sydney;
    use rstest::rstest;

    fn zoned(rfc3339: &str, tz: Tz) -> DateTime<Tz> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&tz)
    }

    #[rstest]
    #[case(0, 2000)]
    #[case(12, 2012)]
    #[case(69, 2069)]
    #[case(70, 1970)]
    #[case(82, 1982)]
    #[case(99, 1999)]
    #[case(100, 100)]
    #[case(1970, 1970)]
    #[case(2100, 2100)]
    fn test_normalize_year(#[case] value: ValueType, #[case] expected: ValueType) {
        assert_eq!(Field::Year.normalize(value), expected);
    }

    #[rstest]
    #[case(Field::Month)]
    #[case(Field::DayOfMonth)]
    #[case(Field::DayOfWeek)]
    #[case(Field::Hour)]
    #[case(Field::Minute)]
    #[case(Field::Second)]
    fn test_normalize_other_fields(#[case] field: Field) {
        for value in [0, 5, 69, 70, 99] {
            assert_eq!(field.normalize(value), value, "field = {field}");
        }
    }

    #[test]
    fn test_wrap_bounds() {
        for field in Field::ALL {
            if field == Field::DayOfWeek {
                assert_eq!(field.wrap_bounds(), Some((0, 6)));
            } else {
                assert_eq!(field.wrap_bounds(), None, "field = {field}");
            }
        }
    }

    #[rstest]
    #[case("2000-01-15T10:00:00+00:00", 31)]
    #[case("2000-04-15T10:00:00+00:00", 30)]
    #[case("2000-02-15T10:00:00+00:00", 29)]
    #[case("2001-02-15T10:00:00+00:00", 28)]
    fn test_days_of_month_sequence(#[case] context: &str, #[case] days: ValueType) {
        let context = zoned(context, chrono_tz::UTC);

        assert_eq!(Field::DayOfMonth.sequence(None), (1..=31).collect::<Vec<_>>());
        assert_eq!(
            Field::DayOfMonth.sequence(Some(&context)),
            (1..=days).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_hours_sequence() {
        let regular = zoned("2025-06-01T00:00:00+10:00", Sydney);
        let forward = zoned("2025-10-05T00:00:00+10:00", Sydney);
        let backward = zoned("2025-04-06T00:00:00+11:00", Sydney);

        assert_eq!(Field::Hour.sequence(Some(&regular)), (0..=23).collect::<Vec<_>>());
        assert_eq!(Field::Hour.sequence(Some(&forward)).len(), 23);
        assert_eq!(Field::Hour.sequence(Some(&backward)).len(), 25);
    }

    #[test]
    fn test_context_free_sequences() {
        let context = zoned("2025-10-05T00:00:00+10:00", Sydney);

        assert_eq!(Field::Year.sequence(Some(&context)).len(), 231);
        assert_eq!(Field::Month.sequence(Some(&context)), (1..=12).collect::<Vec<_>>());
        assert_eq!(Field::DayOfWeek.sequence(Some(&context)), (0..=6).collect::<Vec<_>>());
        assert_eq!(Field::Second.sequence(Some(&context)), (0..=59).collect::<Vec<_>>());
    }

    #[test]
    fn test_value_of() {
        // Saturday
        let dt = zoned("2000-01-01T12:34:56+00:00", chrono_tz::UTC);
        let values: Vec<ValueType> = Field::ALL.iter().map(|f| f.value_of(&dt)).collect();

        assert_eq!(values, vec![2000, 1, 1, 6, 12, 34, 56]);
    }
}
