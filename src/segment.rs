//! Parser of a single field expression like `Mon..Fri`, `*/15` or `1,5,9..12/2`.
use crate::{field::ValueType, utils, CalendarError, Result};
use std::fmt::Display;

const WILDCARD: &str = "*";
const LIST_SEP: char = ',';
const RANGE_SEP: &str = "..";
const STEP_SEP: char = '/';

/// Base value of the constraint: single value or inclusive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Base {
    /// Single value.
    Value(ValueType),
    /// start..end, both inclusive.
    Range(ValueType, ValueType),
}

impl Base {
    /// Collapses single-element range into the value.
    fn collapsed(start: ValueType, end: ValueType) -> Self {
        if start == end {
            Self::Value(start)
        } else {
            Self::Range(start, end)
        }
    }
}

impl Display for Base {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Base::Value(value) => write!(f, "{value}"),
            Base::Range(start, end) => write!(f, "{start}{RANGE_SEP}{end}"),
        }
    }
}

/// Single parsed constraint of the field: base and optional step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Descriptor {
    /// Value or range.
    pub base: Base,
    /// Repeating step.
    pub step: Option<ValueType>,
}

/// Parses field expression into the list of descriptors, in the order of appearance.
///
/// Returns `None` if expression is empty or wildcard, i.e. any value is acceptable.
///
/// `bounds` is `(min, max)` of the field and allows wrapped ranges like `Fri..Mon`,
/// which are split into `Fri..max` and `min..Mon`.
pub fn parse(expression: &str, bounds: Option<(ValueType, ValueType)>) -> Result<Option<Vec<Descriptor>>> {
    if expression.is_empty() || expression == WILDCARD {
        return Ok(None);
    }

    let mut descriptors = Vec::new();
    for item in expression.split(LIST_SEP) {
        let (base, step) = parse_step(item)?;
        let bases = if base.contains(RANGE_SEP) {
            parse_range(base, bounds)?
        } else if base == WILDCARD && step.is_some() {
            vec![Base::Value(0)]
        } else {
            vec![Base::Value(cast(base)?)]
        };

        descriptors.extend(bases.into_iter().map(|base| Descriptor { base, step }));
    }

    Ok(Some(descriptors))
}

/// Weekday name to its index, otherwise decimal number.
pub(crate) fn cast(token: &str) -> Result<ValueType> {
    utils::parse_weekday(token)
        .or_else(|| utils::parse_digital_value(token))
        .ok_or_else(|| CalendarError::InvalidSegmentValue(token.to_owned()))
}

/// Splits `base/step` into the base part and step value.
fn parse_step(item: &str) -> Result<(&str, Option<ValueType>)> {
    match item.split_once(STEP_SEP) {
        None => Ok((item, None)),
        Some((base, step)) => {
            let step = utils::parse_digital_value(step)
                .ok_or_else(|| CalendarError::InvalidRepeatingPattern(item.to_owned()))?;
            Ok((base, Some(step)))
        }
    }
}

/// Parses `start..end`, wrapped range is split into two parts if field bounds are known.
fn parse_range(item: &str, bounds: Option<(ValueType, ValueType)>) -> Result<Vec<Base>> {
    let (start, end) = item
        .split_once(RANGE_SEP)
        .ok_or_else(|| CalendarError::InvalidRangeValue(item.to_owned()))?;
    if end.contains(RANGE_SEP) {
        return Err(CalendarError::InvalidRangeValue(item.to_owned()));
    }

    let start = cast(start)?;
    let end = cast(end)?;
    if start <= end {
        return Ok(vec![Base::Range(start, end)]);
    }

    match bounds {
        Some((min, max)) => Ok(vec![Base::collapsed(start, max), Base::collapsed(min, end)]),
        None => Err(CalendarError::InvalidRangeValue(item.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DOW_BOUNDS: Option<(ValueType, ValueType)> = Some((0, 6));

    fn value(base: ValueType, step: Option<ValueType>) -> Descriptor {
        Descriptor {
            base: Base::Value(base),
            step,
        }
    }

    fn range(start: ValueType, end: ValueType, step: Option<ValueType>) -> Descriptor {
        Descriptor {
            base: Base::Range(start, end),
            step,
        }
    }

    #[rstest]
    #[case("")]
    #[case("*")]
    fn test_parse_wildcard(#[case] input: &str) {
        assert_eq!(parse(input, None).unwrap(), None);
        assert_eq!(parse(input, DOW_BOUNDS).unwrap(), None);
    }

    #[rstest]
    #[case("5", vec![value(5, None)])]
    #[case("05", vec![value(5, None)])]
    #[case("9999", vec![value(9999, None)])]
    #[case("00", vec![value(0, None)])]
    #[case("*/15", vec![value(0, Some(15))])]
    #[case("0/5", vec![value(0, Some(5))])]
    #[case("874/564", vec![value(874, Some(564))])]
    #[case("1..10", vec![range(1, 10, None)])]
    #[case("9..10", vec![range(9, 10, None)])]
    #[case("1..1", vec![range(1, 1, None)])]
    #[case("1..8585/555", vec![range(1, 8585, Some(555))])]
    #[case("1,2,3", vec![value(1, None), value(2, None), value(3, None)])]
    #[case("1..20,0..1/2", vec![range(1, 20, None), range(0, 1, Some(2))])]
    #[case("*/5,59/89", vec![value(0, Some(5)), value(59, Some(89))])]
    #[case(
        "99,99..101,99/1,*/99,1..88/2",
        vec![value(99, None), range(99, 101, None), value(99, Some(1)), value(0, Some(99)), range(1, 88, Some(2))]
    )]
    fn test_parse_valid(#[case] input: &str, #[case] expected: Vec<Descriptor>) {
        assert_eq!(parse(input, None).unwrap(), Some(expected), "input = '{input}'");
    }

    #[rstest]
    #[case("Sun", vec![value(0, None)])]
    #[case("Sun/2,Wed/5", vec![value(0, Some(2)), value(3, Some(5))])]
    #[case("Mon..Fri", vec![range(1, 5, None)])]
    #[case("Sat..Sun", vec![value(6, None), value(0, None)])]
    #[case("Wed..Sun", vec![range(3, 6, None), value(0, None)])]
    #[case("Wed..Mon", vec![range(3, 6, None), range(0, 1, None)])]
    #[case("Fri..Mon", vec![range(5, 6, None), range(0, 1, None)])]
    #[case("Sat..Wed", vec![value(6, None), range(0, 3, None)])]
    #[case("Wed..Sat,Tue", vec![range(3, 6, None), value(2, None)])]
    fn test_parse_weekdays(#[case] input: &str, #[case] expected: Vec<Descriptor>) {
        assert_eq!(parse(input, DOW_BOUNDS).unwrap(), Some(expected), "input = '{input}'");
    }

    #[test]
    fn test_parse_wrapped_range_with_other_bounds() {
        assert_eq!(
            parse("15..5", Some((1, 20))).unwrap(),
            Some(vec![range(15, 20, None), range(1, 5, None)])
        );
        assert_eq!(
            parse("15..1", Some((1, 20))).unwrap(),
            Some(vec![range(15, 20, None), value(1, None)])
        );
        assert_eq!(
            parse("20..10", Some((1, 20))).unwrap(),
            Some(vec![value(20, None), range(1, 10, None)])
        );
        assert_eq!(
            parse("20..1", Some((1, 20))).unwrap(),
            Some(vec![value(20, None), value(1, None)])
        );
    }

    #[rstest]
    #[case("20..1")]
    #[case("Fri..Mon")]
    fn test_parse_wrapped_range_without_bounds(#[case] input: &str) {
        assert!(matches!(
            parse(input, None),
            Err(CalendarError::InvalidRangeValue(e)) if e == input
        ));
    }

    #[rstest]
    #[case("1, 2")]
    #[case("-1")]
    #[case("a")]
    #[case("Mon@@")]
    #[case("99.9")]
    #[case(" 1")]
    #[case("1  ")]
    #[case("-1..-10")]
    #[case("..10")]
    #[case("1..")]
    #[case("1..99.9")]
    #[case("1 .. 1")]
    #[case("1.1")]
    #[case("1.. 2")]
    #[case("1..*")]
    #[case("M..F")]
    #[case("-1/5")]
    #[case(" /1")]
    #[case("9/99.0")]
    #[case("*/*")]
    #[case("5/-44")]
    #[case("5/")]
    #[case("1/2/3")]
    #[case("1..2..3")]
    #[case(",1")]
    #[case("1,,2")]
    #[case("*,1")]
    #[case(" ")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(parse(input, None).is_err(), "input = '{input}'");
        assert!(parse(input, DOW_BOUNDS).is_err(), "input = '{input}'");
    }

    #[rstest]
    #[case("44", 44)]
    #[case("0", 0)]
    #[case("Sunday", 0)]
    #[case("monday", 1)]
    #[case("TUESDAY", 2)]
    #[case("Wed", 3)]
    #[case("thu", 4)]
    #[case("FRI", 5)]
    #[case("Sat", 6)]
    fn test_cast_valid(#[case] input: &str, #[case] expected: ValueType) {
        assert_eq!(cast(input).unwrap(), expected);
    }

    #[rstest]
    #[case("-1")]
    #[case("@")]
    #[case(" ")]
    #[case("M")]
    #[case("!")]
    #[case("#")]
    #[case("+")]
    #[case("Mon Fri")]
    fn test_cast_invalid(#[case] input: &str) {
        assert!(matches!(cast(input), Err(CalendarError::InvalidSegmentValue(e)) if e == input));
    }

    #[test]
    fn test_base_display() {
        assert_eq!(Base::Value(5).to_string(), "5");
        assert_eq!(Base::Range(1, 10).to_string(), "1..10");
    }
}
