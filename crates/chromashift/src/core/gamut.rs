use super::conversion::{luv_chroma_to_xyz, luv_gama_to_xyz, WHITE};
use crate::Float;

/// The slack allowed beyond the reference white.
///
/// The sRGB to XYZ matrix rows sum to the white point only up to their seventh
/// decimal, so that pure sRGB white lands a hair above the reference
/// luminance.
const TOLERANCE: Float = 1e-4;

/// Determine whether XYZ coordinates are visible, i.e., each lies between zero
/// and the corresponding coordinate of the reference white.
#[inline]
pub(crate) fn is_visible_xyz(xyz: &[Float; 3]) -> bool {
    xyz.iter()
        .zip(WHITE.iter())
        .all(|(c, w)| -TOLERANCE <= *c && *c <= *w + TOLERANCE)
}

/// Determine whether the `[L, u, v]` color is visible.
pub fn is_visible_luv_gama(luv: &[Float; 3]) -> bool {
    is_visible_xyz(&luv_gama_to_xyz(luv))
}

/// Determine whether the `[L, u', v']` color is visible.
pub fn is_visible_luv_chroma(luv: &[Float; 3]) -> bool {
    is_visible_xyz(&luv_chroma_to_xyz(luv))
}
