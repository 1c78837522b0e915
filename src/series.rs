//! Stepped progressions of numbers.
use std::ops::{Add, AddAssign};

/// Generator (iterator) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SeriesWithStep<T: Copy> {
    max: T,
    step: T,
    next: T,
}

impl<T> SeriesWithStep<T>
where
    T: Copy + Add + AddAssign + PartialOrd,
    <T as Add>::Output: PartialOrd<T>,
{
    /// Series `start, start + step, ...` bounded by `max` (inclusively).
    /// It's empty if `start` is greater than `max`.
    ///
    /// Caller is responsible to ensure that
    /// maximum serial value (max+step) isn't greater than type's maximum.
    ///
    /// Panics if step is zero.
    #[inline]
    pub(crate) fn new(start: T, max: T, step: T) -> Self {
        if start + step == start {
            panic!("step value is 0");
        }

        Self { next: start, max, step }
    }
}

impl<T> Iterator for SeriesWithStep<T>
where
    T: Copy + Add + AddAssign + PartialOrd,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.max {
            None
        } else {
            let current = self.next;
            self.next += self.step;
            Some(current)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rstest_reuse::{apply, template};

    #[template]
    #[rstest]
    #[case(0, 5, 1, vec![0, 1, 2, 3, 4, 5])]
    #[case(0, 5, 2, vec![0, 2, 4])]
    #[case(0, 5, 5, vec![0, 5])]
    #[case(0, 5, 6, vec![0])]
    #[case(1, 20, 4, vec![1, 5, 9, 13, 17])]
    #[case(5, 15, 4, vec![5, 9, 13])]
    #[case(10, 39, 20, vec![10, 30])]
    #[case(40, 40, 30, vec![40])]
    #[case(31, 28, 2, vec![])]
    fn series_with_step<T>(#[case] start: T, #[case] max: T, #[case] step: T, #[case] expected: Vec<T>) {}

    #[apply(series_with_step)]
    fn series_with_step_u8(start: u8, max: u8, step: u8, expected: Vec<u8>) {
        assert_eq!(SeriesWithStep::<u8>::new(start, max, step).collect::<Vec<u8>>(), expected);
    }

    #[apply(series_with_step)]
    fn series_with_step_u16(start: u16, max: u16, step: u16, expected: Vec<u16>) {
        assert_eq!(SeriesWithStep::<u16>::new(start, max, step).collect::<Vec<u16>>(), expected);
    }

    #[test]
    #[should_panic(expected = "step value is 0")]
    fn series_should_panic_with_zero_step() {
        SeriesWithStep::<u16>::new(1, 10, 0);
    }
}
