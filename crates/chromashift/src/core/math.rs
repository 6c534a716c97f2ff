use crate::Float;

/// Per-precision constants for comparing floating point numbers.
pub(crate) trait FloatExt {
    /// The scale applied before rounding away noise. Powers of ten keep a
    /// fixed number of decimal digits.
    const ROUNDING_FACTOR: Self;

    /// The relative error tolerated in results of chained computations.
    /// Quantities below it, such as the cosine of a nearly vertical angle,
    /// count as zero.
    const TOLERANCE: Self;
}

impl FloatExt for f64 {
    const ROUNDING_FACTOR: f64 = 1e9;
    const TOLERANCE: f64 = 1e-9;
}

impl FloatExt for f32 {
    const ROUNDING_FACTOR: f32 = 1e4;
    const TOLERANCE: f32 = 1e-4;
}

/// Determine whether two numbers agree within [`FloatExt::TOLERANCE`],
/// relative to the larger magnitude but no less than absolutely.
#[cfg(test)]
pub(crate) fn is_close(left: Float, right: Float) -> bool {
    let scale = left.abs().max(right.abs()).max(1.0);
    (left - right).abs() <= <Float as FloatExt>::TOLERANCE * scale
}

// --------------------------------------------------------------------------------------------------------------------

/// A compensated running sum with a count.
///
/// Adding many scores or distances of mixed magnitude with plain `+` loses
/// the small ones. The accumulator tracks the lost low-order bits separately,
/// following [Neumaier's variant of Kahan
/// summation](https://en.wikipedia.org/wiki/Kahan_summation_algorithm), so
/// that means come out the same regardless of summation order.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    sum: Float,
    compensation: Float,
    count: usize,
}

impl Accumulator {
    /// Get the sum including the compensation.
    #[inline]
    pub fn total(&self) -> Float {
        self.sum + self.compensation
    }

    /// Get the number of accumulated values.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Get the arithmetic mean or zero if nothing has been accumulated.
    pub fn mean(&self) -> Float {
        if self.count == 0 {
            0.0
        } else {
            self.total() / self.count as Float
        }
    }
}

impl std::ops::Add<Float> for Accumulator {
    type Output = Self;

    /// Consume the accumulator and return it with the value added, as
    /// [`Iterator::fold`] expects.
    fn add(mut self, value: Float) -> Self::Output {
        self += value;
        self
    }
}

impl std::ops::AddAssign<Float> for Accumulator {
    fn add_assign(&mut self, value: Float) {
        let next = self.sum + value;
        let (large, small) = if self.sum.abs() >= value.abs() {
            (self.sum, value)
        } else {
            (value, self.sum)
        };
        self.compensation += (large - next) + small;
        self.sum = next;
        self.count += 1;
    }
}

impl std::iter::FromIterator<Float> for Accumulator {
    fn from_iter<I: IntoIterator<Item = Float>>(iter: I) -> Self {
        iter.into_iter().fold(Accumulator::default(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod test {
    use super::Accumulator;
    use crate::Float;

    #[test]
    fn test_accumulator() {
        let values: [Float; 4] = [1.0, 1e30, 1.0, -1e30];
        let naive: Float = values.iter().sum();
        let acc: Accumulator = values.into_iter().collect();

        assert_eq!(naive, 0.0);
        assert_eq!(acc.total(), 2.0);
        assert_eq!(acc.count(), 4);
        assert_eq!(acc.mean(), 0.5);
    }

    #[test]
    fn test_is_close() {
        assert!(super::is_close(1.0, 1.0));
        assert!(super::is_close(1e6, 1e6 * (1.0 + 1e-12)));
        assert!(!super::is_close(1.0, 1.001));
        assert!(!super::is_close(0.0, 1e-3));
    }

    #[test]
    fn test_empty_mean() {
        assert_eq!(Accumulator::default().mean(), 0.0);
    }
}
