use crate::{field::Field, schedule::Schedule, utils, CalendarError, Result};
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;
use std::fmt::Display;
use tracing::{debug, trace};

/// Maximum number of refinement steps of the single search pass.
pub const MAX_ITERATIONS: usize = 4000;

/// Single refinement step of the search, see [`Schedule::next_with_trace`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceStep {
    /// Step number inside the search pass, starting from 1.
    pub iteration: usize,
    /// Candidate after the step.
    pub candidate: DateTime<Tz>,
    /// Field which didn't match the candidate.
    pub field: Field,
    /// Number of field units the candidate was advanced by,
    /// `None` if there is no way to satisfy the field, so the pass was finished with no result.
    pub distance: Option<u32>,
}

impl Display for TraceStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.distance {
            Some(distance) => write!(f, "{:>4} {} {} +{distance}", self.iteration, self.candidate, self.field),
            None => write!(f, "{:>4} {} {} impossible", self.iteration, self.candidate, self.field),
        }
    }
}

/// Converts `reference` into the schedule's timezone and moves it to the next whole second.
pub(crate) fn first_candidate<T: TimeZone>(reference: &DateTime<T>, tz: &Tz) -> Result<DateTime<Tz>> {
    // Local time of a repeated hour is ambiguous, so truncate the instant rather than its local fields.
    let reference = reference.with_timezone(tz);
    (reference - TimeDelta::nanoseconds(reference.nanosecond().into()))
        .checked_add_signed(TimeDelta::seconds(1))
        .ok_or_else(|| CalendarError::InvalidLocalTime(reference.to_string()))
}

/// Candidate to continue the search right after the found occurrence.
pub(crate) fn following(found: &DateTime<Tz>) -> Result<DateTime<Tz>> {
    found
        .checked_add_signed(TimeDelta::seconds(1))
        .ok_or_else(|| CalendarError::InvalidLocalTime(found.to_string()))
}

/// Up to `count` consecutive occurrences strictly after `reference`.
///
/// Stops at the first pass without result, `None` is returned if nothing was found.
pub(crate) fn next<T: TimeZone>(
    schedule: &Schedule,
    count: usize,
    reference: &DateTime<T>,
    mut steps: Option<&mut Vec<TraceStep>>,
) -> Result<Option<Vec<DateTime<Tz>>>> {
    let mut candidate = first_candidate(reference, schedule.timezone())?;
    let mut found = Vec::with_capacity(count.min(MAX_ITERATIONS));

    for _ in 0..count {
        let Some(occurrence) = iterate(schedule, candidate, MAX_ITERATIONS, steps.as_deref_mut())? else {
            break;
        };
        found.push(occurrence);
        candidate = following(&occurrence)?;
    }

    Ok(if found.is_empty() { None } else { Some(found) })
}

/// Single search pass: the first instant starting from `candidate` (inclusively) which satisfies all fields.
///
/// Returns `None` if the schedule can't be satisfied anymore,
/// or error if `limit` refinement steps weren't enough to make a decision.
pub(crate) fn iterate(
    schedule: &Schedule,
    mut candidate: DateTime<Tz>,
    limit: usize,
    mut steps: Option<&mut Vec<TraceStep>>,
) -> Result<Option<DateTime<Tz>>> {
    let mut iteration = 0;

    loop {
        if iteration >= limit {
            return Err(CalendarError::TooManyIterations(limit));
        }
        iteration += 1;

        let mismatch = Field::ALL
            .into_iter()
            .map(|field| (field, field.value_of(&candidate)))
            .find(|(field, value)| !schedule.matches(*field, *value));
        let Some((field, value)) = mismatch else {
            return Ok(Some(candidate));
        };

        let distance = schedule
            .conditions(field)
            .iter()
            .filter_map(|condition| condition.distance_to_next(value, Some(&candidate)))
            .min();

        let Some(distance) = distance else {
            debug!(iteration, %candidate, %field, value, "schedule can't be satisfied");
            if let Some(steps) = steps.as_deref_mut() {
                steps.push(TraceStep {
                    iteration,
                    candidate,
                    field,
                    distance: None,
                });
            }
            return Ok(None);
        };

        candidate = advance(&candidate, field, distance)?;
        trace!(iteration, %candidate, %field, distance, "candidate advanced");
        if let Some(steps) = steps.as_deref_mut() {
            steps.push(TraceStep {
                iteration,
                candidate,
                field,
                distance: Some(distance),
            });
        }
    }
}

/// Moves `candidate` forward by `distance` units of `field` and resets all finer fields to their minimums.
fn advance(candidate: &DateTime<Tz>, field: Field, distance: u32) -> Result<DateTime<Tz>> {
    let tz = candidate.timezone();
    let date = candidate.date_naive();
    let midnight = |date: NaiveDate| utils::resolve_local(&tz, date.and_time(NaiveTime::MIN));

    let advanced = match field {
        Field::Year => candidate
            .year()
            .checked_add_unsigned(distance)
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .map(midnight),
        Field::Month => date
            .with_day(1)
            .and_then(|date| date.checked_add_months(Months::new(distance)))
            .map(midnight),
        Field::DayOfMonth | Field::DayOfWeek => date.checked_add_days(Days::new(distance.into())).map(midnight),
        Field::Hour => candidate
            .checked_add_signed(TimeDelta::hours(distance.into()))
            .map(|dt| utils::start_of_hour(&dt)),
        Field::Minute => candidate
            .checked_add_signed(TimeDelta::minutes(distance.into()))
            .map(|dt| utils::start_of_minute(&dt)),
        Field::Second => candidate.checked_add_signed(TimeDelta::seconds(distance.into())),
    };

    advanced.ok_or_else(|| CalendarError::InvalidLocalTime(format!("{candidate} + {distance} of {field}")))
}
