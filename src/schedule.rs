use crate::{
    condition::Condition,
    engine::{self, TraceStep, MAX_ITERATIONS},
    field::{Field, ValueType},
    segment, utils, CalendarError, Result,
};
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use std::{fmt::Display, iter::FusedIterator, str::FromStr};
use tracing::debug;

const TIME_SEP: char = ':';
const DATE_SEP: char = '-';
const DATETIME_SEP: char = 'T';
const WILDCARD: &str = "*";
const DEFAULT_TIME: &str = "00:00:00";
const DEFAULT_SECONDS: &str = "00";

/// Well-known aliases and their canonical expressions.
const SPECIAL_EXPRESSIONS: [(&str, &str); 8] = [
    ("minutely", "*-*-* *:*:00"),
    ("hourly", "*-*-* *:00:00"),
    ("daily", "*-*-* 00:00:00"),
    ("monthly", "*-*-01 00:00:00"),
    ("weekly", "Mon *-*-* 00:00:00"),
    ("yearly", "*-01-01 00:00:00"),
    ("quarterly", "*-01,04,07,10-01 00:00:00"),
    ("semiannually", "*-01,07-01 00:00:00"),
];

/// Compiled calendar expression with its methods.
///
/// For expression format and usage examples, please refer to the [crate documentation](crate).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
#[cfg_attr(feature = "serde", serde(into = "String"))]
pub struct Schedule {
    years: Vec<Condition>,
    months: Vec<Condition>,
    days_of_month: Vec<Condition>,
    days_of_week: Vec<Condition>,
    hours: Vec<Condition>,
    minutes: Vec<Condition>,
    seconds: Vec<Condition>,
    timezone: Tz,
}

impl Schedule {
    /// Parses and validates provided `expression` and constructs [`Schedule`] instance.
    ///
    /// If expression has no trailing timezone name, timezone of the running process is used.
    /// Alternative way to construct [`Schedule`] is to use one of `try_from` or `from_str` methods.
    ///
    /// Returns [`CalendarError`] in a case provided expression is unparsable or has format errors.
    pub fn new(expression: impl Into<String>) -> Result<Self> {
        Self::compile(&expression.into(), None)
    }

    /// The same as [`new()`](Schedule::new), but `timezone` is used if expression has no explicit timezone.
    pub fn with_default_timezone(expression: impl Into<String>, timezone: Tz) -> Result<Self> {
        Self::compile(&expression.into(), Some(timezone))
    }

    fn compile(expression: &str, default_timezone: Option<Tz>) -> Result<Self> {
        let mut segments: Vec<&str> = expression.split_whitespace().collect();
        if segments.is_empty() {
            return Err(CalendarError::InvalidExpression("expression is empty".to_owned()));
        }

        // Trailing timezone
        let explicit = segments.last().and_then(|last| Tz::from_str(last).ok());
        let timezone = match explicit {
            Some(timezone) => {
                segments.pop();
                timezone
            }
            None => default_timezone.unwrap_or_else(utils::local_timezone),
        };
        if segments.is_empty() {
            return Err(CalendarError::InvalidExpression(format!(
                "expression has timezone only: {expression}"
            )));
        }

        if segments.len() == 1 {
            let single = segments[0];
            if let Some((_, canonical)) = SPECIAL_EXPRESSIONS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(single))
            {
                segments = canonical.split_whitespace().collect();
            }
        }

        // Date and time glued with `T`
        if let Some((date, time)) = segments.last().copied().and_then(split_datetime) {
            segments.pop();
            segments.push(date);
            segments.push(time);
        }

        let time = if segments.last().is_some_and(|last| last.contains(TIME_SEP)) {
            segments.pop()
        } else {
            None
        };
        let [hours, minutes, seconds] = parse_time(time.unwrap_or(DEFAULT_TIME))?;

        let date = if segments.last().is_some_and(|last| is_date(last)) {
            segments.pop()
        } else {
            None
        };
        let [years, months, days_of_month] = match date {
            Some(date) => parse_date(date)?,
            None => [WILDCARD; 3],
        };

        let days_of_week = segments.pop().unwrap_or(WILDCARD);

        if !segments.is_empty() {
            return Err(CalendarError::UnparsedParts(segments.join(" ")));
        }

        let schedule = Self {
            years: build_conditions(Field::Year, years)?,
            months: build_conditions(Field::Month, months)?,
            days_of_month: build_conditions(Field::DayOfMonth, days_of_month)?,
            days_of_week: build_conditions(Field::DayOfWeek, days_of_week)?,
            hours: build_conditions(Field::Hour, hours)?,
            minutes: build_conditions(Field::Minute, minutes)?,
            seconds: build_conditions(Field::Second, seconds)?,
            timezone,
        };
        debug!(expression, %timezone, "calendar expression compiled");

        Ok(schedule)
    }

    /// Conditions of the year.
    pub fn years(&self) -> &[Condition] {
        &self.years
    }

    /// Conditions of the month.
    pub fn months(&self) -> &[Condition] {
        &self.months
    }

    /// Conditions of the day of month.
    pub fn days_of_month(&self) -> &[Condition] {
        &self.days_of_month
    }

    /// Conditions of the day of week.
    pub fn days_of_week(&self) -> &[Condition] {
        &self.days_of_week
    }

    /// Conditions of the hour.
    pub fn hours(&self) -> &[Condition] {
        &self.hours
    }

    /// Conditions of the minute.
    pub fn minutes(&self) -> &[Condition] {
        &self.minutes
    }

    /// Conditions of the second.
    pub fn seconds(&self) -> &[Condition] {
        &self.seconds
    }

    /// Conditions of the `field`, never empty.
    pub fn conditions(&self, field: Field) -> &[Condition] {
        match field {
            Field::Year => &self.years,
            Field::Month => &self.months,
            Field::DayOfMonth => &self.days_of_month,
            Field::DayOfWeek => &self.days_of_week,
            Field::Hour => &self.hours,
            Field::Minute => &self.minutes,
            Field::Second => &self.seconds,
        }
    }

    /// Timezone of the schedule, all occurrences are computed in it.
    pub fn timezone(&self) -> &Tz {
        &self.timezone
    }

    /// Returns `true` if `value` matches any condition of the `field`.
    pub fn matches(&self, field: Field, value: ValueType) -> bool {
        self.conditions(field).iter().any(|condition| condition.matches(value))
    }

    /// Returns up to `count` consecutive occurrences, strictly after `reference`.
    ///
    /// `reference` is converted into the schedule timezone first, results are in the schedule timezone too.
    /// Search stops at the first occurrence which can't be found,
    /// and `None` is returned if there is no occurrence at all.
    ///
    /// Returns [`CalendarError::TooManyIterations`] if the expression looks contradictory,
    /// so the search can't make a decision in [`MAX_ITERATIONS`] steps.
    pub fn next<T: TimeZone>(&self, count: usize, reference: &DateTime<T>) -> Result<Option<Vec<DateTime<Tz>>>> {
        engine::next(self, count, reference, None)
    }

    /// The same as [`next()`](Schedule::next), but returns all refinement steps of the search as well.
    pub fn next_with_trace<T: TimeZone>(
        &self,
        count: usize,
        reference: &DateTime<T>,
    ) -> Result<(Option<Vec<DateTime<Tz>>>, Vec<TraceStep>)> {
        let mut steps = Vec::new();
        let found = engine::next(self, count, reference, Some(&mut steps))?;
        Ok((found, steps))
    }

    /// Returns the next occurrence strictly after `reference`.
    pub fn upcoming<T: TimeZone>(&self, reference: &DateTime<T>) -> Result<Option<DateTime<Tz>>> {
        let found = engine::next(self, 1, reference, None)?;
        Ok(found.and_then(|found| found.into_iter().next()))
    }

    /// Returns iterator of occurrences strictly after `reference`.
    ///
    /// Iterator ends when there are no more occurrences, or right after the first error.
    #[inline]
    pub fn iter<T: TimeZone>(&self, reference: &DateTime<T>) -> impl Iterator<Item = Result<DateTime<Tz>>> {
        ScheduleIterator {
            candidate: Some(engine::first_candidate(reference, &self.timezone)),
            schedule: self.clone(),
        }
    }

    /// Consumes [`Schedule`] and returns iterator of occurrences strictly after `reference`.
    #[inline]
    pub fn into_iter<T: TimeZone>(self, reference: &DateTime<T>) -> impl Iterator<Item = Result<DateTime<Tz>>> {
        let candidate = Some(engine::first_candidate(reference, &self.timezone));
        ScheduleIterator {
            schedule: self,
            candidate,
        }
    }
}

/// Contains iterator state.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScheduleIterator {
    schedule: Schedule,
    candidate: Option<Result<DateTime<Tz>>>,
}

impl Iterator for ScheduleIterator {
    type Item = Result<DateTime<Tz>>;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = match self.candidate.take()? {
            Ok(candidate) => candidate,
            Err(err) => return Some(Err(err)),
        };

        match engine::iterate(&self.schedule, candidate, MAX_ITERATIONS, None) {
            Ok(Some(found)) => {
                self.candidate = Some(engine::following(&found));
                Some(Ok(found))
            }
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

impl FusedIterator for ScheduleIterator {}

/// Splits `dateTtime` if `T` is surrounded by digits or wildcards.
fn split_datetime(segment: &str) -> Option<(&str, &str)> {
    let bytes = segment.as_bytes();
    let adjoining = |b: u8| b.is_ascii_digit() || b == b'*';

    (1..bytes.len().saturating_sub(1))
        .find(|&i| bytes[i] == DATETIME_SEP as u8 && adjoining(bytes[i - 1]) && adjoining(bytes[i + 1]))
        .map(|i| (&segment[..i], &segment[i + 1..]))
}

fn is_date(segment: &str) -> bool {
    segment.contains(DATE_SEP) && segment.starts_with(|c: char| c.is_ascii_digit() || c == '*')
}

/// `hour:minute[:second]` into three field expressions.
fn parse_time(segment: &str) -> Result<[&str; 3]> {
    let parts: Vec<&str> = segment.split(TIME_SEP).collect();
    match parts[..] {
        [hours, minutes] if !hours.is_empty() && !minutes.is_empty() => Ok([hours, minutes, DEFAULT_SECONDS]),
        [hours, minutes, seconds] if parts.iter().all(|p| !p.is_empty()) => Ok([hours, minutes, seconds]),
        _ => Err(CalendarError::InvalidExpression(format!(
            "time component is malformed: {segment}"
        ))),
    }
}

/// `[year-]month-day` into three field expressions.
fn parse_date(segment: &str) -> Result<[&str; 3]> {
    let parts: Vec<&str> = segment.split(DATE_SEP).collect();
    match parts[..] {
        [months, days] if !months.is_empty() && !days.is_empty() => Ok([WILDCARD, months, days]),
        [years, months, days] if parts.iter().all(|p| !p.is_empty()) => Ok([years, months, days]),
        _ => Err(CalendarError::InvalidExpression(format!(
            "date component is malformed: {segment}"
        ))),
    }
}

/// Wildcard condition if the field isn't constrained, otherwise condition per each descriptor.
fn build_conditions(field: Field, expression: &str) -> Result<Vec<Condition>> {
    match segment::parse(expression, field.wrap_bounds())? {
        None => Ok(vec![Condition::wildcard(field)]),
        Some(descriptors) => descriptors
            .into_iter()
            .map(|descriptor| Condition::from_descriptor(field, descriptor))
            .collect(),
    }
}

struct ConditionList<'a>(&'a [Condition]);

impl Display for ConditionList<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, condition) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}

impl Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.days_of_week.iter().all(Condition::is_wildcard) {
            write!(f, "{} ", ConditionList(&self.days_of_week))?;
        }
        write!(
            f,
            "{}-{}-{} {}:{}:{} {}",
            ConditionList(&self.years),
            ConditionList(&self.months),
            ConditionList(&self.days_of_month),
            ConditionList(&self.hours),
            ConditionList(&self.minutes),
            ConditionList(&self.seconds),
            self.timezone
        )
    }
}

impl From<Schedule> for String {
    fn from(value: Schedule) -> Self {
        value.to_string()
    }
}

impl From<&Schedule> for String {
    fn from(value: &Schedule) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Schedule {
    type Error = CalendarError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&String> for Schedule {
    type Error = CalendarError;

    fn try_from(value: &String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Schedule {
    type Error = CalendarError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Schedule {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
