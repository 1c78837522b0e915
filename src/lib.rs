//! Calendar expressions (systemd `OnCalendar` style) parser and next occurrences calculator.
#![deny(unsafe_code, warnings, missing_docs)]

//! This is a tiny crate, intended to:
//! - parse calendar event expressions like `Mon..Fri *-*-* 09:00:00 Europe/Kyiv`;
//! - calculate the next instants which satisfy the expression, with respect to its timezone.
//!
//! It's built on top of [chrono](https://crates.io/crates/chrono) and [chrono-tz](https://crates.io/crates/chrono-tz).
//!
//! _This is not a jobs scheduler or runner._ It's a pure function from the expression and the reference instant
//! to the next matching instant(s).
//!
//! ## Expression format
//!
//! Expression consists of up to four whitespace separated parts, each of them is optional:
//!
//! ```text
//! [DayOfWeek] [[Year-]Month-Day] [Hour:Minute[:Second]] [Timezone]
//! ```
//!
//! - if _day of week_ is omitted, any day matches;
//! - if _date_ is omitted, `*-*-*` is used, if _year_ is omitted, `*` is used;
//! - if _time_ is omitted, `00:00:00` is used, if _seconds_ are omitted, `00` is used;
//! - if _timezone_ is omitted, timezone of the running process (or explicitly provided default) is used;
//! - date and time may be glued with `T`: `2025-01-01T10:00`.
//!
//! The table below describes valid values of each field:
//!
//! | Field        | Allowed values              |
//! |--------------|-----------------------------|
//! | Day of Week  | 0-6 (Sunday is 0) or names  |
//! | Year         | 1970-2200, or 0-99          |
//! | Month        | 1-12                        |
//! | Day of Month | 1-31                        |
//! | Hour         | 0-23                        |
//! | Minute       | 0-59                        |
//! | Second       | 0-59                        |
//!
//! Each field accepts the same patterns:
//! - `*` - each possible value;
//! - `,` - list of values or patterns, i.e. `1,7,12`, `Sat,Sun`;
//! - `..` - range of values, i.e. `0..15`, `Mon..Fri`;
//!   days of week ranges may wrap around the end of the week, i.e. `Fri..Mon`;
//! - `/` - repeating values, i.e. `*/12`, `10/5`, `30..59/2`.
//!
//! Two-digit years are expanded: `0..69` become `2000..2069`, `70..99` become `1970..1999`.
//! Weekday names are case-insensitive and may be shortened to three or more first letters: `mon`, `Thur`, `Sunday`.
//!
//! Day of month and day of week are both applied: `Fri *-*-13` means Friday which is the 13th day of month.
//!
//! Also, short aliases for well-known expressions are allowed (case-insensitive, may be followed by timezone):
//!
//! | Alias          | Expression                  |
//! |----------------|-----------------------------|
//! | `minutely`     | `*-*-* *:*:00`              |
//! | `hourly`       | `*-*-* *:00:00`             |
//! | `daily`        | `*-*-* 00:00:00`            |
//! | `monthly`      | `*-*-01 00:00:00`           |
//! | `weekly`       | `Mon *-*-* 00:00:00`        |
//! | `yearly`       | `*-01-01 00:00:00`          |
//! | `quarterly`    | `*-01,04,07,10-01 00:00:00` |
//! | `semiannually` | `*-01,07-01 00:00:00`       |
//!
//! ### Timezone
//! Trailing part of the expression is treated as [IANA timezone name](https://www.iana.org/time-zones)
//! if it's known to `chrono-tz` (names are case-sensitive), for example:
//! - `Mon *-*-* 00:00:00 Europe/Paris`
//! - `daily America/New_York`
//!
//! All calculations are made in the schedule timezone: days with DST changes have skipped or repeated hours,
//! and results are always real instants of that day.
//!
//! ## How to use
//!
//! The main entity of the crate is a [`Schedule`] structure, which has a few basic methods:
//! - [new()](Schedule::new): constructor to parse and validate provided expression;
//! - [next()](Schedule::next): returns up to `count` next occurrences, strictly after the provided instant;
//! - [upcoming()](Schedule::upcoming): returns the single next occurrence;
//! - [iter()](Schedule::iter): returns an `Iterator` which produces a series of occurrences.
//!
//! ### Example with `next`
//! ```rust
//! use chrono::Utc;
//! use on_calendar::{Result, Schedule};
//!
//! fn next() -> Result<()> {
//!     let schedule = Schedule::new("Mon..Fri *-*-* 09:00:00 Europe/Kyiv")?;
//!     let now = Utc::now();
//!
//!     // Get the next 3 working days mornings starting from now
//!     let next = schedule.next(3, &now)?;
//!     assert_eq!(next.map(|n| n.len()), Some(3));
//!
//!     Ok(())
//! }
//! # next().unwrap();
//! ```
//!
//! ### Example with `iter`
//! ```rust
//! use chrono::Utc;
//! use on_calendar::{Result, Schedule};
//!
//! fn iterator() -> Result<()> {
//!     let schedule = Schedule::new("quarterly UTC")?;
//!     let now = Utc::now();
//!
//!     // Print the next 10 occurrences starting from now
//!     for next in schedule.iter(&now).take(10) {
//!         println!("next: {}", next?);
//!     }
//!
//!     Ok(())
//! }
//! # iterator().unwrap();
//! ```
//!
//! ## Errors
//!
//! Malformed expressions are rejected by the constructor. Search may fail with
//! [`CalendarError::TooManyIterations`] if the expression is contradictory in a way which can't be detected quickly,
//! i.e. `*-02-30`; this is distinct from `Ok(None)`, which means that there are no more occurrences.
//!
//! # Feature flags
//! * `serde`: adds [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html) and [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html) trait implementation for [`Schedule`].

/// Single constraint of the calendar field.
pub mod condition;
mod engine;
/// Crate specific Error implementation.
pub mod error;
/// Calendar fields and their valid values.
pub mod field;
/// Calendar expression parser and next occurrences generator.
pub mod schedule;
pub mod segment;
mod series;
mod utils;

// Re-export of public entities.
pub use condition::Condition;
pub use engine::{TraceStep, MAX_ITERATIONS};
pub use error::CalendarError;
pub use field::Field;
pub use schedule::Schedule;
pub use segment::{Base, Descriptor};

/// Convenient alias for `Result`.
pub type Result<T, E = CalendarError> = std::result::Result<T, E>;
