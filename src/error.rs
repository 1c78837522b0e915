use thiserror::Error;

/// Crate specific Errors implementation.
///
/// Variants up to [`UnparsedParts`](CalendarError::UnparsedParts) are returned while an expression is compiled,
/// the rest are returned while the next occurrences are computed.
#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CalendarError {
    /// Error parsing the whole calendar expression.
    #[error("invalid calendar expression: {0}")]
    InvalidExpression(String),
    /// Segment token is neither a number nor a weekday name.
    #[error("invalid segment value: {0}")]
    InvalidSegmentValue(String),
    /// Invalid range value specified.
    #[error("invalid range value: {0}")]
    InvalidRangeValue(String),
    /// Invalid repeating pattern specified.
    #[error("invalid repeating pattern: {0}")]
    InvalidRepeatingPattern(String),
    /// Invalid year value specified.
    #[error("invalid year value: {0}")]
    InvalidYearValue(String),
    /// Invalid month value specified.
    #[error("invalid month value: {0}")]
    InvalidMonthValue(String),
    /// Invalid day of month value specified.
    #[error("invalid day of month value: {0}")]
    InvalidDayOfMonthValue(String),
    /// Invalid day of week value specified.
    #[error("invalid day of week value: {0}")]
    InvalidDayOfWeekValue(String),
    /// Invalid hour value specified.
    #[error("invalid hour value: {0}")]
    InvalidHourValue(String),
    /// Invalid minute value specified.
    #[error("invalid minute value: {0}")]
    InvalidMinuteValue(String),
    /// Invalid second value specified.
    #[error("invalid second value: {0}")]
    InvalidSecondValue(String),
    /// Some parts of the expression weren't consumed by any field.
    #[error("expression parts not parsed: {0}")]
    UnparsedParts(String),
    /// Search for the next occurrence didn't converge.
    #[error("too many iterations: {0}, expression looks malformed")]
    TooManyIterations(usize),
    /// Calendar arithmetic went out of the representable time range.
    #[error("invalid local time: {0}")]
    InvalidLocalTime(String),
}
