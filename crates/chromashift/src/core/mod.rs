//! The color science underlying recoloring.
//!
//! This module converts between 24-bit pixels, sRGB, XYZ, and the two LUV
//! flavors, tests colors for visibility, and measures color differences. All
//! coordinates are `[Float; 3]` arrays. sRGB coordinates range over `0..=255`
//! and XYZ coordinates are scaled so that the reference white has a luminance
//! of 100.

mod conversion;
mod difference;
mod equality;
mod gamut;
mod math;

// conversion
pub use conversion::{
    from_pixel, luv_chroma_to_luv_gama, luv_chroma_to_rgb, luv_chroma_to_xyz,
    luv_gama_to_luv_chroma, luv_gama_to_pixel, luv_gama_to_rgb, luv_gama_to_xyz,
    pixel_to_luv_gama, rgb_to_luv_chroma, rgb_to_luv_gama, rgb_to_xyz, to_pixel,
    xyz_to_luv_chroma, xyz_to_rgb, WHITE,
};

// difference
pub use difference::color_distance;
pub(crate) use difference::find_closest;

// equality
#[cfg(test)]
pub(crate) use equality::assert_same_coordinates;
pub use equality::to_eq_bits;
pub(crate) use equality::{has_nan, normalize, to_eq_coordinates, zero_nan};

// gamut
pub use gamut::{is_visible_luv_chroma, is_visible_luv_gama};

// math
pub(crate) use math::{Accumulator, FloatExt};
#[cfg(test)]
pub(crate) use math::is_close;
