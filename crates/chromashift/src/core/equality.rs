use crate::core::FloatExt;
use crate::{Bits, Float};

/// Assert that two floating point numbers agree after normalization with
/// [`to_eq_bits`].
///
/// # Panics
///
/// If the normalized numbers differ. The message prints both on lines of
/// their own.
#[macro_export]
macro_rules! assert_close_enough {
    ($left:expr, $right:expr $(,)?) => {
        let (left, right) = ($left, $right);
        assert_eq!(
            $crate::to_eq_bits(left),
            $crate::to_eq_bits(right),
            "numbers differ:\n{:?}\n{:?}",
            left,
            right
        );
    };
}

/// Assert that two coordinate triples agree after normalizing each
/// coordinate.
///
/// # Panics
///
/// If any normalized coordinate differs.
#[cfg(test)]
macro_rules! assert_same_coordinates {
    ($left:expr, $right:expr $(,)?) => {
        let (left, right) = ($left, $right);
        assert_eq!(
            $crate::core::to_eq_coordinates(left),
            $crate::core::to_eq_coordinates(right),
            "colors differ:\n{:?}\n{:?}",
            left,
            right
        );
    };
}

#[cfg(test)]
pub(crate) use assert_same_coordinates;

// --------------------------------------------------------------------------------------------------------------------

/// Normalize a single quantity by replacing not-a-number with zero.
///
/// Degenerate colors, notably black with its zero denominators in the LUV
/// formulae, produce not-a-number intermediates. They collapse to zero here
/// instead of poisoning every downstream computation.
#[inline]
pub(crate) fn zero_nan(value: Float) -> Float {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

/// Normalize the color coordinates by replacing not-a-numbers with zero.
#[inline]
pub(crate) fn normalize(coordinates: &[Float; 3]) -> [Float; 3] {
    let [c1, c2, c3] = *coordinates;
    [zero_nan(c1), zero_nan(c2), zero_nan(c3)]
}

/// Determine whether any of the coordinates is not-a-number.
#[inline]
pub(crate) fn has_nan(coordinates: &[Float; 3]) -> bool {
    coordinates.iter().any(|c| c.is_nan())
}

/// Normalize coordinates into hashable, comparable bits.
#[must_use]
pub(crate) fn to_eq_coordinates(coordinates: &[Float; 3]) -> [Bits; 3] {
    coordinates.map(to_eq_bits)
}

/// Normalize a number into bits for equality tests and hashing.
///
/// Not-a-number becomes zero, digits beyond the rounding factor are rounded
/// away, and negative zero becomes zero. Public only for
/// [`assert_close_enough`].
#[doc(hidden)]
#[inline]
pub fn to_eq_bits(value: Float) -> Bits {
    let rounded = (<Float as FloatExt>::ROUNDING_FACTOR * zero_nan(value)).round();
    // -0.0 == 0.0, so this also clears the sign.
    if rounded == 0.0 {
        (0.0 as Float).to_bits()
    } else {
        rounded.to_bits()
    }
}
