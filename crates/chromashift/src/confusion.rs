//! The geometry of color confusion.
//!
//! A color-vision deficiency collapses colors along characteristic confusion
//! lines. Calibration for an individual observer yields an [`Ellipse`] in the
//! `u, v` plane of LUV that bounds the colors the observer cannot tell apart
//! from its center. Extruding that ellipse along lightness by half a
//! [`LuminanceBand`] gives an ellipsoid. A [`ConfusionModel`] centers that
//! ellipsoid on one color and measures how far another color lies relative to
//! its boundary.

#[cfg(feature = "pyffi")]
use pyo3::prelude::*;

use crate::core::Accumulator;
use crate::error::GeometryError;
use crate::Float;

/// A confusion ellipse in the `u, v` plane.
///
/// The ellipse is fitted externally, typically by least squares over
/// calibration points, and is immutable thereafter. Its `width` and `height`
/// are the semi-axes and `phi` is the orientation in radians.
#[cfg_attr(
    feature = "pyffi",
    pyclass(eq, frozen, module = "chromashift")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    center: [Float; 2],
    width: Float,
    height: Float,
    phi: Float,
}

#[cfg_attr(feature = "pyffi", pymethods)]
impl Ellipse {
    /// Create a new ellipse.
    #[cfg(feature = "pyffi")]
    #[new]
    pub const fn new(center: [Float; 2], width: Float, height: Float, phi: Float) -> Self {
        Self {
            center,
            width,
            height,
            phi,
        }
    }

    /// Create a new ellipse.
    #[cfg(not(feature = "pyffi"))]
    pub const fn new(center: [Float; 2], width: Float, height: Float, phi: Float) -> Self {
        Self {
            center,
            width,
            height,
            phi,
        }
    }

    /// Get the center.
    pub const fn center(&self) -> [Float; 2] {
        self.center
    }

    /// Get the semi-axis along the rotated `u` axis.
    pub const fn width(&self) -> Float {
        self.width
    }

    /// Get the semi-axis along the rotated `v` axis.
    pub const fn height(&self) -> Float {
        self.height
    }

    /// Get the orientation in radians.
    pub const fn phi(&self) -> Float {
        self.phi
    }

    /// Create a debug representation. <i class=python-only>Python only!</i>
    #[cfg(feature = "pyffi")]
    pub fn __repr__(&self) -> String {
        format!("{:?}", self)
    }
}

/// A band of lightness values.
///
/// Only its half-span matters for scoring. It determines the ellipsoid's
/// extent along lightness as well as the lightness gap beyond which two colors
/// are trivially distinguishable.
#[cfg_attr(
    feature = "pyffi",
    pyclass(eq, frozen, module = "chromashift")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LuminanceBand {
    top: Float,
    bottom: Float,
}

#[cfg_attr(feature = "pyffi", pymethods)]
impl LuminanceBand {
    /// Create a new luminance band.
    #[cfg(feature = "pyffi")]
    #[new]
    pub const fn new(top: Float, bottom: Float) -> Self {
        Self { top, bottom }
    }

    /// Create a new luminance band.
    #[cfg(not(feature = "pyffi"))]
    pub const fn new(top: Float, bottom: Float) -> Self {
        Self { top, bottom }
    }

    /// Get the top.
    pub const fn top(&self) -> Float {
        self.top
    }

    /// Get the bottom.
    pub const fn bottom(&self) -> Float {
        self.bottom
    }

    /// Get half the distance between top and bottom.
    pub fn half_span(&self) -> Float {
        (self.top - self.bottom) / 2.0
    }

    /// Create a debug representation. <i class=python-only>Python only!</i>
    #[cfg(feature = "pyffi")]
    pub fn __repr__(&self) -> String {
        format!("{:?}", self)
    }
}

// ====================================================================================================================

/// A validated confusion geometry for scoring pairs of `[L, u, v]` colors.
#[derive(Clone, Debug)]
pub struct ConfusionModel {
    ellipse: Ellipse,
    confusion_point: [Float; 2],
    band: LuminanceBand,
    half_span: Float,
    cos: Float,
    sin: Float,
}

impl ConfusionModel {
    /// Create a new confusion model.
    ///
    /// This method validates the geometry, rejecting non-finite centers and
    /// orientations, non-positive or non-finite semi-axes, and luminance
    /// bands without extent.
    pub fn new(
        ellipse: Ellipse,
        confusion_point: [Float; 2],
        band: LuminanceBand,
    ) -> Result<Self, GeometryError> {
        if !ellipse.center.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::NonFiniteCenter);
        } else if !ellipse.width.is_finite() || ellipse.width <= 0.0 {
            return Err(GeometryError::InvalidWidth);
        } else if !ellipse.height.is_finite() || ellipse.height <= 0.0 {
            return Err(GeometryError::InvalidHeight);
        } else if !ellipse.phi.is_finite() {
            return Err(GeometryError::NonFiniteOrientation);
        }

        let half_span = band.half_span();
        if !half_span.is_finite() || half_span <= 0.0 {
            return Err(GeometryError::EmptyLuminanceBand);
        }

        let angle = std::f64::consts::FRAC_PI_2 as Float - ellipse.phi;
        Ok(Self {
            ellipse,
            confusion_point,
            band,
            half_span,
            cos: angle.cos(),
            sin: angle.sin(),
        })
    }

    /// Get the ellipse.
    pub fn ellipse(&self) -> &Ellipse {
        &self.ellipse
    }

    /// Get the confusion point.
    pub fn confusion_point(&self) -> [Float; 2] {
        self.confusion_point
    }

    /// Get the luminance band.
    pub fn band(&self) -> &LuminanceBand {
        &self.band
    }

    /// Translate the second color into a frame centered on the first color,
    /// with `u, v` rotated to the ellipse's axes.
    fn translate(&self, origin: &[Float; 3], color: &[Float; 3]) -> [Float; 3] {
        let dl = color[0] - origin[0];
        let du = color[1] - origin[1];
        let dv = color[2] - origin[2];

        [
            dl,
            du * self.cos - dv * self.sin,
            du * self.sin + dv * self.cos,
        ]
    }

    /// Score how distinguishable the second color is from the first.
    ///
    /// If the two colors' lightness differs by more than the band's half-span,
    /// the score is that gap divided by the half-span. Otherwise, the score is
    /// the distance to the second color divided by the distance to the
    /// confusion ellipsoid's boundary in the same direction. Either way, a
    /// score below one means confusable, a score of one or more means
    /// distinguishable, and identical colors score zero.
    pub fn differentiation(&self, color1: &[Float; 3], color2: &[Float; 3]) -> Float {
        let gap = (color1[0] - color2[0]).abs();
        if gap > self.half_span {
            return gap / self.half_span;
        }

        let [l, u, v] = self.translate(color1, color2);
        if l == 0.0 && u == 0.0 && v == 0.0 {
            return 0.0;
        }

        let (a, b, c) = (self.ellipse.width, self.ellipse.height, self.half_span);
        let t = 1.0 / ((u * u) / (a * a) + (v * v) / (b * b) + (l * l) / (c * c)).sqrt();

        let distance = (l * l + u * u + v * v).sqrt();
        let (bl, bu, bv) = (t * l, t * u, t * v);
        let boundary = (bl * bl + bu * bu + bv * bv).sqrt();

        distance / boundary
    }

    /// Determine whether the color is distinguishable from every other color,
    /// i.e., scores strictly above one. This holds trivially for no others.
    pub fn differentiation_all<'c, C>(&self, color: &[Float; 3], others: C) -> bool
    where
        C: IntoIterator<Item = &'c [Float; 3]>,
    {
        others
            .into_iter()
            .all(|other| self.differentiation(color, other) > 1.0)
    }

    /// Compute the mean differentiation score between the color and the
    /// others, or zero for no others.
    pub fn differentiation_mean<'c, C>(&self, color: &[Float; 3], others: C) -> Float
    where
        C: IntoIterator<Item = &'c [Float; 3]>,
    {
        others
            .into_iter()
            .map(|other| self.differentiation(color, other))
            .collect::<Accumulator>()
            .mean()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assert_close_enough;
    use crate::core::is_close;

    fn model(phi: Float) -> ConfusionModel {
        ConfusionModel::new(
            Ellipse::new([0.0, 0.0], 10.0, 5.0, phi),
            [0.0, 0.0],
            LuminanceBand::new(60.0, 40.0),
        )
        .expect("geometry is valid")
    }

    #[test]
    fn test_invalid_geometry() {
        let band = LuminanceBand::new(60.0, 40.0);
        let check = |ellipse, band| ConfusionModel::new(ellipse, [0.0, 0.0], band).err();

        assert_eq!(
            check(Ellipse::new([0.0, 0.0], 0.0, 5.0, 0.0), band),
            Some(GeometryError::InvalidWidth)
        );
        assert_eq!(
            check(Ellipse::new([0.0, 0.0], 10.0, -5.0, 0.0), band),
            Some(GeometryError::InvalidHeight)
        );
        assert_eq!(
            check(Ellipse::new([0.0, 0.0], Float::INFINITY, 5.0, 0.0), band),
            Some(GeometryError::InvalidWidth)
        );
        assert_eq!(
            check(Ellipse::new([Float::NAN, 0.0], 10.0, 5.0, 0.0), band),
            Some(GeometryError::NonFiniteCenter)
        );
        assert_eq!(
            check(Ellipse::new([0.0, 0.0], 10.0, 5.0, Float::NAN), band),
            Some(GeometryError::NonFiniteOrientation)
        );
        assert_eq!(
            check(
                Ellipse::new([0.0, 0.0], 10.0, 5.0, 0.0),
                LuminanceBand::new(40.0, 40.0)
            ),
            Some(GeometryError::EmptyLuminanceBand)
        );
    }

    #[test]
    fn test_identity() {
        let model = model(0.3);
        for color in [[0.0, 0.0, 0.0], [50.0, 12.0, -7.0], [99.0, 80.0, 80.0]] {
            assert_eq!(model.differentiation(&color, &color), 0.0);
        }
    }

    #[test]
    fn test_scenario() {
        // phi = 0 rotates by a quarter turn, so that u shifts land on height.
        let model = model(0.0);
        let a = [50.0, 0.0, 0.0];
        let b = [50.0, 3.0, 0.0];
        let c = [50.0, 12.0, 0.0];

        let ab = model.differentiation(&a, &b);
        let ac = model.differentiation(&a, &c);
        assert!(ab < 1.0, "{}", ab);
        assert!(ac > 1.0, "{}", ac);
        assert_close_enough!(ab, 0.6);
        assert_close_enough!(ac, 2.4);
    }

    #[test]
    fn test_boundary() {
        // phi = pi/2 leaves the axes unrotated.
        let model = model(std::f64::consts::FRAC_PI_2 as Float);
        let origin = [50.0, 0.0, 0.0];

        let boundary = [
            [50.0, 10.0, 0.0],
            [50.0, 0.0, -5.0],
            [60.0, 0.0, 0.0],
            [50.0 + (48.0 as Float).sqrt(), 6.0, 2.0],
        ];
        for point in boundary {
            let score = model.differentiation(&origin, &point);
            assert!(is_close(score, 1.0), "{:?} scores {}", point, score);
        }

        assert!(model.differentiation(&origin, &[50.0, 9.0, 0.0]) < 1.0);
        assert!(model.differentiation(&origin, &[52.0, 3.0, 3.0]) < 1.0);
        assert!(model.differentiation(&origin, &[50.0, 0.0, 5.5]) > 1.0);
        assert!(model.differentiation(&origin, &[55.0, 8.0, 3.0]) > 1.0);
    }

    #[test]
    fn test_boundary_is_not_distinguishable() {
        let model = model(std::f64::consts::FRAC_PI_2 as Float);
        let origin = [50.0, 0.0, 0.0];
        let boundary = [50.0, 0.0, 5.0];

        // Exactly on the boundary: confusable for edges, not acceptable as
        // a replacement.
        assert_eq!(model.differentiation(&origin, &boundary), 1.0);
        assert!(!model.differentiation_all(&origin, &[boundary]));
        assert!(model.differentiation_all(&origin, &[[50.0, 0.0, 5.001]]));
    }

    #[test]
    fn test_luminance_short_circuit() {
        let model = model(0.0);
        let score = model.differentiation(&[20.0, 0.0, 0.0], &[50.0, 0.0, 0.0]);
        assert_close_enough!(score, 3.0);

        // Way off in chroma but still the lightness gap counts.
        let score = model.differentiation(&[20.0, 0.0, 0.0], &[35.0, 90.0, 90.0]);
        assert_close_enough!(score, 1.5);
    }

    #[test]
    fn test_aggregates() {
        let model = model(0.0);
        let a = [50.0, 0.0, 0.0];
        let others = [[50.0, 12.0, 0.0], [50.0, 3.0, 0.0]];

        assert!(!model.differentiation_all(&a, &others));
        assert!(model.differentiation_all(&a, &others[..1]));
        let none: [[Float; 3]; 0] = [];
        assert!(model.differentiation_all(&a, &none));
        assert_close_enough!(model.differentiation_mean(&a, &others), 1.5);
        assert_eq!(model.differentiation_mean(&a, &none), 0.0);
    }
}
