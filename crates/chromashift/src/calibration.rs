//! Helpers for calibrating a confusion model.
//!
//! Calibration starts with the chromaticities an observer confuses. After
//! [`project_calibration_points`] maps them into the `u, v` plane, an external
//! least-squares fit produces the [`Ellipse`]. [`confusion_points`] then
//! extends the ellipse's axis to the reference gamut boundary.

use crate::core::{luv_chroma_to_luv_gama, FloatExt};
use crate::error::CalibrationError;
use crate::{Ellipse, Float};

/// The center of the circle approximating the gamut boundary.
pub const BOUNDARY_CENTER: [Float; 2] = [-284.2029539, 244.51808];

/// The squared radius of the circle approximating the gamut boundary.
pub const BOUNDARY_RADIUS_SQUARED: Float = 405439.059617;

/// The lightness at which calibration points are projected.
const CALIBRATION_LIGHTNESS: Float = 50.0;

/// Compute the two confusion points for the ellipse.
///
/// The confusion points are the intersections of the line through the
/// ellipse's center, at a quarter turn from its orientation, with the circle
/// approximating the gamut boundary. The first point has the larger `x`
/// coordinate.
///
/// # Errors
///
/// This function fails if the line misses the circle or is vertical, i.e.,
/// its direction's cosine is below the tolerance for the floating point
/// precision in use.
pub fn confusion_points(ellipse: &Ellipse) -> Result<[[Float; 2]; 2], CalibrationError> {
    let [cx, cy] = ellipse.center();
    let [bx, by] = BOUNDARY_CENTER;

    let (sin, cos) = (ellipse.phi() + std::f64::consts::FRAC_PI_2 as Float).sin_cos();
    if cos.is_nan() || cos.abs() < <Float as FloatExt>::TOLERANCE {
        return Err(CalibrationError::DegenerateSlope);
    }
    let slope = sin / cos;
    let intercept = cy - slope * cx;

    // Substituting the line into the circle yields a*x² + b*x + c = 0.
    let shift = by - intercept;
    let a = 1.0 + slope * slope;
    let b = -2.0 * bx - 2.0 * slope * shift;
    let c = bx * bx + shift * shift - BOUNDARY_RADIUS_SQUARED;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Err(CalibrationError::NoIntersection);
    }

    let root = discriminant.sqrt();
    let x1 = (-b + root) / (2.0 * a);
    let x2 = (-b - root) / (2.0 * a);

    Ok([
        [x1, slope * x1 + intercept],
        [x2, slope * x2 + intercept],
    ])
}

/// Project chromaticity coordinates into the `u, v` plane.
///
/// Each point `(u', v')` is taken at a fixed mid-range lightness and converted
/// to its lightness-scaled coordinates, which are what the ellipse fitter
/// consumes.
pub fn project_calibration_points(points: &[[Float; 2]]) -> Vec<[Float; 2]> {
    points
        .iter()
        .map(|[up, vp]| {
            let [_, u, v] = luv_chroma_to_luv_gama(&[CALIBRATION_LIGHTNESS, *up, *vp]);
            [u, v]
        })
        .collect()
}
