use crate::{
    field::{Field, ValueType},
    segment::{Base, Descriptor},
    series::SeriesWithStep,
    utils, Result,
};
use chrono::DateTime;
use chrono_tz::Tz;
use std::fmt::Display;

/// Single normalized constraint of the calendar field.
///
/// It's either a wildcard (any value), or a value/range base with an optional repeating step.
/// Conditions are immutable: calendar context is passed explicitly to each query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Condition {
    field: Field,
    kind: ConditionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum ConditionKind {
    Wildcard,
    Constrained { base: Base, step: Option<ValueType> },
}

impl Condition {
    /// Condition which matches any value of the field.
    pub fn wildcard(field: Field) -> Self {
        Self {
            field,
            kind: ConditionKind::Wildcard,
        }
    }

    /// Constructs and validates condition of the `field`.
    ///
    /// Year values are normalized before validation: `0..69` become `2000..2069`, `70..99` become `1970..1999`;
    /// reversed year range is reordered after normalization.
    ///
    /// Returns error if base is outside the field's default interval,
    /// or step is zero or greater than the field's maximum.
    pub fn new(field: Field, base: Base, step: Option<ValueType>) -> Result<Self> {
        let base = match base {
            Base::Value(value) => Base::Value(field.normalize(value)),
            Base::Range(start, end) => {
                let (start, end) = (field.normalize(start), field.normalize(end));
                if field == Field::Year && start > end {
                    Base::Range(end, start)
                } else {
                    Base::Range(start, end)
                }
            }
        };

        let valid = match base {
            Base::Value(value) => field.contains(value),
            Base::Range(start, end) => start <= end && field.contains(start) && field.contains(end),
        };
        if !valid {
            let (min, max) = field.interval();
            return Err(field.error(format!("base {base} is outside of allowed range {min}..{max}")));
        }

        if let Some(step) = step {
            let (_min, max) = field.interval();
            if step == 0 || step > max {
                return Err(field.error(format!("step {step} must be > 0 and <= {max}")));
            }
        }

        Ok(Self {
            field,
            kind: ConditionKind::Constrained { base, step },
        })
    }

    /// Constructs condition from the parsed segment descriptor.
    #[inline]
    pub fn from_descriptor(field: Field, descriptor: Descriptor) -> Result<Self> {
        Self::new(field, descriptor.base, descriptor.step)
    }

    /// Field of the condition.
    pub fn field(&self) -> Field {
        self.field
    }

    /// Base of the condition, `None` for the wildcard.
    pub fn base(&self) -> Option<Base> {
        match self.kind {
            ConditionKind::Wildcard => None,
            ConditionKind::Constrained { base, .. } => Some(base),
        }
    }

    /// Step of the condition.
    pub fn step(&self) -> Option<ValueType> {
        match self.kind {
            ConditionKind::Wildcard => None,
            ConditionKind::Constrained { step, .. } => step,
        }
    }

    /// Returns `true` if the condition matches any value.
    pub fn is_wildcard(&self) -> bool {
        self.kind == ConditionKind::Wildcard
    }

    /// Returns `true` if `value` satisfies the condition.
    pub fn matches(&self, value: ValueType) -> bool {
        let ConditionKind::Constrained { base, step } = self.kind else {
            return true;
        };

        match (base, step) {
            (Base::Value(base), None) => base == value,
            (Base::Range(start, end), None) => start <= value && value <= end,
            (Base::Value(base), Some(step)) => {
                let (_min, max) = self.field.interval();
                SeriesWithStep::new(base, max, step).any(|v| v == value)
            }
            (Base::Range(start, end), Some(step)) => SeriesWithStep::new(start, end, step).any(|v| v == value),
        }
    }

    /// Validates `value` (or the base, if value is `None`) against the field's default interval.
    ///
    /// This check isn't context-aware, so day 31 is valid even for 30-days months.
    pub fn valid(&self, value: Option<ValueType>) -> bool {
        match (value, self.kind) {
            (Some(value), _) => self.field.contains(value),
            (None, ConditionKind::Wildcard) => true,
            (None, ConditionKind::Constrained { base, .. }) => match base {
                Base::Value(value) => self.field.contains(value),
                Base::Range(start, end) => self.field.contains(start) && self.field.contains(end),
            },
        }
    }

    /// Number of field units from `current` to the next value which may satisfy the condition.
    ///
    /// `context` narrows valid values of the field to the real calendar: month length, hours and minutes
    /// present on the day with offset change.
    ///
    /// If the next value is behind `current` in the sequence of valid values,
    /// the distance to the end of the sequence is returned instead,
    /// so the caller has to re-check all more significant fields after wrapping.
    ///
    /// Returns `None` if `current` isn't valid value of the field.
    pub fn distance_to_next(&self, current: ValueType, context: Option<&DateTime<Tz>>) -> Option<u32> {
        if !self.valid(Some(current)) {
            return None;
        }
        let ConditionKind::Constrained { base, step } = self.kind else {
            return Some(1);
        };

        let sequence = self.field.sequence(context);
        let position = |value: ValueType| sequence.iter().position(|v| *v == value);
        let needle = if self.field == Field::Hour && context.is_some_and(utils::is_repeated_occurrence) {
            sequence.iter().rposition(|v| *v == current)?
        } else {
            position(current)?
        };

        let target = match (base, step) {
            (Base::Value(base), None) => position(base),
            (Base::Range(start, end), None) => {
                let following = sequence.get(needle + 1).copied();
                let inside = |v: ValueType| start <= v && v <= end;
                if inside(current) && following.is_some_and(inside) {
                    Some(needle + 1)
                } else {
                    position(start)
                }
            }
            (Base::Value(base), Some(step)) => {
                let max = sequence.iter().copied().max().unwrap_or(base);
                let next = SeriesWithStep::new(base, max, step).find(|v| *v > current);
                next.and_then(position)
            }
            (Base::Range(start, end), Some(step)) => {
                let next = SeriesWithStep::new(start, end, step)
                    .find(|v| *v > current)
                    .unwrap_or(start);
                position(next)
            }
        };

        let distance = match target {
            Some(target) if target > needle => target - needle,
            _ => sequence.len() - needle,
        };

        Some(distance as u32)
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ConditionKind::Constrained { base, step } = self.kind else {
            return write!(f, "*");
        };

        match base {
            Base::Value(value) => self.fmt_value(f, value)?,
            Base::Range(start, end) => {
                self.fmt_value(f, start)?;
                write!(f, "..")?;
                self.fmt_value(f, end)?;
            }
        }

        if let Some(step) = step {
            write!(f, "/{step}")?;
        }

        Ok(())
    }
}

impl Condition {
    fn fmt_value(&self, f: &mut std::fmt::Formatter<'_>, value: ValueType) -> std::fmt::Result {
        match self.field {
            Field::Year => write!(f, "{value:04}"),
            Field::DayOfWeek => write!(f, "{}", WEEKDAYS[value as usize % WEEKDAYS.len()]),
            _ => write!(f, "{value:02}"),
        }
    }
}

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
