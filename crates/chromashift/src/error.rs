//! Utility module with chromashift's errors.

#[cfg(feature = "pyffi")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// An invalid confusion geometry.
///
/// [`ConfusionModel::new`](crate::ConfusionModel::new) validates its ellipse and
/// luminance band upfront, so that differentiation scores never divide by zero
/// or infinity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryError {
    /// An ellipse center with a coordinate that is not finite.
    NonFiniteCenter,
    /// An ellipse width that is zero, negative, or not finite.
    InvalidWidth,
    /// An ellipse height that is zero, negative, or not finite.
    InvalidHeight,
    /// An ellipse orientation that is not finite.
    NonFiniteOrientation,
    /// A luminance band whose top does not exceed its bottom.
    EmptyLuminanceBand,
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use GeometryError::*;

        let s = match self {
            NonFiniteCenter => "ellipse center must have finite coordinates",
            InvalidWidth => "ellipse width must be positive and finite",
            InvalidHeight => "ellipse height must be positive and finite",
            NonFiniteOrientation => "ellipse orientation must be finite",
            EmptyLuminanceBand => "luminance band must have top above bottom",
        };

        f.write_str(s)
    }
}

impl std::error::Error for GeometryError {}

#[cfg(feature = "pyffi")]
impl From<GeometryError> for PyErr {
    fn from(value: GeometryError) -> Self {
        PyValueError::new_err(value.to_string())
    }
}

// ====================================================================================================================

/// Malformed inputs to the pixel projector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectionError {
    /// The number of labels differs from the number of pixels.
    LabelCountMismatch { pixels: usize, labels: usize },
    /// A label does not index into the palette's centers.
    LabelOutOfBounds { label: usize, centers: usize },
}

impl std::fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Self::LabelCountMismatch { pixels, labels } => f.write_fmt(format_args!(
                "{} labels do not match {} pixels",
                labels, pixels
            )),
            Self::LabelOutOfBounds { label, centers } => f.write_fmt(format_args!(
                "label {} does not fit into range 0..{}",
                label, centers
            )),
        }
    }
}

impl std::error::Error for ProjectionError {}

#[cfg(feature = "pyffi")]
impl From<ProjectionError> for PyErr {
    fn from(value: ProjectionError) -> Self {
        PyValueError::new_err(value.to_string())
    }
}

// ====================================================================================================================

/// A failure to derive confusion points from an ellipse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationError {
    /// The ellipse's major axis is vertical, so that its slope is undefined.
    DegenerateSlope,
    /// The line through the ellipse's major axis misses the reference circle.
    NoIntersection,
}

impl std::fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Self::DegenerateSlope => "confusion line is vertical",
            Self::NoIntersection => "confusion line does not intersect reference circle",
        };

        f.write_str(s)
    }
}

impl std::error::Error for CalibrationError {}

#[cfg(feature = "pyffi")]
impl From<CalibrationError> for PyErr {
    fn from(value: CalibrationError) -> Self {
        PyValueError::new_err(value.to_string())
    }
}

// ====================================================================================================================

/// A mismatch between the lengths of two images being compared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LengthMismatchError {
    /// The number of pixels in the original image.
    pub expected: usize,
    /// The number of pixels in the recolored image.
    pub actual: usize,
}

impl std::fmt::Display for LengthMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "image with {} pixels cannot be compared to image with {} pixels",
            self.actual, self.expected
        ))
    }
}

impl std::error::Error for LengthMismatchError {}

#[cfg(feature = "pyffi")]
impl From<LengthMismatchError> for PyErr {
    fn from(value: LengthMismatchError) -> Self {
        PyValueError::new_err(value.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            GeometryError::InvalidWidth.to_string(),
            "ellipse width must be positive and finite"
        );
        assert_eq!(
            ProjectionError::LabelOutOfBounds { label: 7, centers: 3 }.to_string(),
            "label 7 does not fit into range 0..3"
        );
        assert_eq!(
            ProjectionError::LabelCountMismatch { pixels: 4, labels: 2 }.to_string(),
            "2 labels do not match 4 pixels"
        );
        assert_eq!(
            CalibrationError::NoIntersection.to_string(),
            "confusion line does not intersect reference circle"
        );
    }
}
