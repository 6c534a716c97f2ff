use super::{normalize, zero_nan};
use crate::Float;

/// The D65 reference white in XYZ, scaled to `0..=100`.
pub const WHITE: [Float; 3] = [95.047, 100.0, 108.883];

/// The CIE threshold between the linear and cube-root segments of lightness.
const EPSILON: Float = 0.008856;

/// The CIE slope of the linear lightness segment.
const KAPPA: Float = 903.3;

/// Convert a 24-bit pixel to floating point RGB coordinates in `0..=255`.
#[inline]
pub fn from_pixel(pixel: &[u8; 3]) -> [Float; 3] {
    [pixel[0] as Float, pixel[1] as Float, pixel[2] as Float]
}

/// Convert floating point RGB coordinates in `0..=255` to a 24-bit pixel.
///
/// This function zeroes out not-a-numbers, clamps each coordinate to
/// `0..=255`, and rounds to the nearest integer.
pub fn to_pixel(rgb: &[Float; 3]) -> [u8; 3] {
    let [r, g, b] = normalize(rgb);
    [
        r.clamp(0.0, 255.0).round() as u8,
        g.clamp(0.0, 255.0).round() as u8,
        b.clamp(0.0, 255.0).round() as u8,
    ]
}

// --------------------------------------------------------------------------------------------------------------------

/// Multiply the 3 by 3 matrix and 3-element vector with each other, producing a
/// new 3-element vector.
#[inline]
fn multiply(matrix: &[[Float; 3]; 3], vector: &[Float; 3]) -> [Float; 3] {
    let [row1, row2, row3] = matrix;

    [
        row1[0].mul_add(vector[0], row1[1].mul_add(vector[1], row1[2] * vector[2])),
        row2[0].mul_add(vector[0], row2[1].mul_add(vector[1], row2[2] * vector[2])),
        row3[0].mul_add(vector[0], row3[1].mul_add(vector[1], row3[2] * vector[2])),
    ]
}

// http://www.brucelindbloom.com/index.html?Eqn_RGB_XYZ_Matrix.html

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const LINEAR_SRGB_TO_XYZ: [[Float; 3]; 3] = [
    [ 0.4124564, 0.3575761, 0.1804375 ],
    [ 0.2126729, 0.7151522, 0.0721750 ],
    [ 0.0193339, 0.1191920, 0.9503041 ],
];

#[rustfmt::skip]
#[allow(clippy::excessive_precision)]
const XYZ_TO_LINEAR_SRGB: [[Float; 3]; 3] = [
    [  3.2404542, -1.5371385, -0.4985314 ],
    [ -0.9692660,  1.8760108,  0.0415560 ],
    [  0.0556434, -0.2040259,  1.0572252 ],
];

/// Convert sRGB coordinates in `0..=255` to XYZ coordinates scaled to the
/// [`WHITE`] reference.
pub fn rgb_to_xyz(rgb: &[Float; 3]) -> [Float; 3] {
    #[inline]
    fn linearize(value: Float) -> Float {
        let value = value / 255.0;
        if value > 0.04045 {
            ((value + 0.055) / 1.055).powf(2.4)
        } else {
            value / 12.92
        }
    }

    let linear = [linearize(rgb[0]), linearize(rgb[1]), linearize(rgb[2])];
    let [x, y, z] = multiply(&LINEAR_SRGB_TO_XYZ, &linear);
    [x * 100.0, y * 100.0, z * 100.0]
}

/// Convert XYZ coordinates scaled to the [`WHITE`] reference to sRGB
/// coordinates in `0..=255`.
///
/// Out-of-gamut results are clamped to the unit range before scaling. That
/// loses information for colors outside the sRGB gamut.
pub fn xyz_to_rgb(xyz: &[Float; 3]) -> [Float; 3] {
    #[inline]
    fn compand(value: Float) -> Float {
        let value = if value > 0.0031308 {
            value.powf(1.0 / 2.4).mul_add(1.055, -0.055)
        } else {
            value * 12.92
        };
        zero_nan(value).clamp(0.0, 1.0) * 255.0
    }

    let scaled = [xyz[0] / 100.0, xyz[1] / 100.0, xyz[2] / 100.0];
    let [r, g, b] = multiply(&XYZ_TO_LINEAR_SRGB, &scaled);
    [compand(r), compand(g), compand(b)]
}

// --------------------------------------------------------------------------------------------------------------------

/// Compute the CIE 1976 chromaticity coordinates u', v' for the XYZ
/// coordinates. A black denominator yields zero for both.
#[inline]
fn chromaticity(xyz: &[Float; 3]) -> (Float, Float) {
    let [x, y, z] = *xyz;
    let denominator = x + 15.0 * y + 3.0 * z;
    if denominator != 0.0 {
        (4.0 * x / denominator, 9.0 * y / denominator)
    } else {
        (0.0, 0.0)
    }
}

/// Get the chromaticity coordinates u', v' of the [`WHITE`] reference.
#[inline]
pub(crate) fn white_chromaticity() -> (Float, Float) {
    chromaticity(&WHITE)
}

/// Convert XYZ coordinates to LUV with chromaticity coordinates, i.e., to
/// `[L, u', v']`.
pub fn xyz_to_luv_chroma(xyz: &[Float; 3]) -> [Float; 3] {
    let yr = xyz[1] / WHITE[1];
    let (up, vp) = chromaticity(xyz);

    let lightness = if yr > EPSILON {
        116.0 * yr.cbrt() - 16.0
    } else {
        KAPPA * yr
    };

    [zero_nan(lightness), up, vp]
}

/// Convert LUV with chromaticity coordinates `[L, u', v']` to LUV with
/// lightness-scaled coordinates `[L, u, v]`.
pub fn luv_chroma_to_luv_gama(luv: &[Float; 3]) -> [Float; 3] {
    let [lightness, up, vp] = *luv;
    let (upr, vpr) = white_chromaticity();

    [
        lightness,
        13.0 * lightness * (up - upr),
        13.0 * lightness * (vp - vpr),
    ]
}

/// Convert LUV with lightness-scaled coordinates `[L, u, v]` back to LUV with
/// chromaticity coordinates `[L, u', v']`.
///
/// Zero lightness carries no chromaticity and maps to black's `[0, 0, 0]`.
pub fn luv_gama_to_luv_chroma(luv: &[Float; 3]) -> [Float; 3] {
    let [lightness, u, v] = *luv;
    if lightness == 0.0 {
        return [0.0, 0.0, 0.0];
    }

    let (upr, vpr) = white_chromaticity();
    normalize(&[
        lightness,
        u / (13.0 * lightness) + upr,
        v / (13.0 * lightness) + vpr,
    ])
}

/// Convert LUV with lightness-scaled coordinates `[L, u, v]` to XYZ.
///
/// Degenerate intermediates, as produced for zero lightness, collapse to zero.
pub fn luv_gama_to_xyz(luv: &[Float; 3]) -> [Float; 3] {
    let [lightness, u, v] = *luv;
    let (upr, vpr) = white_chromaticity();

    let y = zero_nan(if lightness > KAPPA * EPSILON {
        ((lightness + 16.0) / 116.0).powi(3)
    } else {
        lightness / KAPPA
    });

    let a = ((52.0 * lightness) / (u + 13.0 * lightness * upr) - 1.0) / 3.0;
    let b = -5.0 * y;
    let c = -1.0 / 3.0;
    let d = y * ((39.0 * lightness) / (v + 13.0 * lightness * vpr) - 5.0);

    let x = zero_nan((d - b) / (a - c));
    let z = zero_nan(x.mul_add(a, b));

    [x * 100.0, y * 100.0, z * 100.0]
}

/// Convert LUV with chromaticity coordinates `[L, u', v']` to XYZ.
#[inline]
pub fn luv_chroma_to_xyz(luv: &[Float; 3]) -> [Float; 3] {
    luv_gama_to_xyz(&luv_chroma_to_luv_gama(luv))
}

// --------------------------------------------------------------------------------------------------------------------

/// Convert sRGB coordinates in `0..=255` to `[L, u', v']`. This is a two-hop
/// conversion.
#[inline]
pub fn rgb_to_luv_chroma(rgb: &[Float; 3]) -> [Float; 3] {
    xyz_to_luv_chroma(&rgb_to_xyz(rgb))
}

/// Convert sRGB coordinates in `0..=255` to `[L, u, v]`. This is a three-hop
/// conversion.
#[inline]
pub fn rgb_to_luv_gama(rgb: &[Float; 3]) -> [Float; 3] {
    luv_chroma_to_luv_gama(&rgb_to_luv_chroma(rgb))
}

/// Convert `[L, u', v']` to sRGB coordinates in `0..=255`. This is a two-hop
/// conversion.
#[inline]
pub fn luv_chroma_to_rgb(luv: &[Float; 3]) -> [Float; 3] {
    xyz_to_rgb(&luv_chroma_to_xyz(luv))
}

/// Convert `[L, u, v]` to sRGB coordinates in `0..=255`. This is a two-hop
/// conversion.
#[inline]
pub fn luv_gama_to_rgb(luv: &[Float; 3]) -> [Float; 3] {
    xyz_to_rgb(&luv_gama_to_xyz(luv))
}

/// Convert a 24-bit pixel to `[L, u, v]`.
#[inline]
pub fn pixel_to_luv_gama(pixel: &[u8; 3]) -> [Float; 3] {
    rgb_to_luv_gama(&from_pixel(pixel))
}

/// Convert `[L, u, v]` to a 24-bit pixel, clamping and rounding as needed.
#[inline]
pub fn luv_gama_to_pixel(luv: &[Float; 3]) -> [u8; 3] {
    to_pixel(&luv_gama_to_rgb(luv))
}
