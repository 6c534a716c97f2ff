//! Propagating palette edits back onto pixels.

use rayon::prelude::*;

use crate::core::{luv_gama_to_pixel, pixel_to_luv_gama};
use crate::error::ProjectionError;
use crate::{Float, ReplacementMap};

/// Recolor the pixels by shifting each one as its cluster center was shifted.
///
/// Each pixel is converted to `[L, u, v]`, translated by the difference
/// between its center's replacement and the center, and converted back with
/// clamping and rounding. Pixels of centers without replacement, or with an
/// identical replacement, are returned as is.
///
/// # Errors
///
/// This function fails if the number of labels differs from the number of
/// pixels or a label does not index into the centers.
pub fn project(
    pixels: &[[u8; 3]],
    labels: &[usize],
    centers: &[[Float; 3]],
    replacements: &ReplacementMap,
) -> Result<Vec<[u8; 3]>, ProjectionError> {
    if pixels.len() != labels.len() {
        return Err(ProjectionError::LabelCountMismatch {
            pixels: pixels.len(),
            labels: labels.len(),
        });
    }
    if let Some(label) = labels.iter().find(|label| centers.len() <= **label) {
        return Err(ProjectionError::LabelOutOfBounds {
            label: *label,
            centers: centers.len(),
        });
    }

    let offsets: Vec<Option<[Float; 3]>> = centers
        .iter()
        .map(|center| {
            let target = replacements.get(center)?;
            let offset = [
                target[0] - center[0],
                target[1] - center[1],
                target[2] - center[2],
            ];
            if offset == [0.0; 3] {
                None
            } else {
                Some(offset)
            }
        })
        .collect();

    Ok(pixels
        .par_iter()
        .zip(labels.par_iter())
        .map(|(pixel, label)| match offsets[*label] {
            None => *pixel,
            Some([dl, du, dv]) => {
                let [l, u, v] = pixel_to_luv_gama(pixel);
                luv_gama_to_pixel(&[l + dl, u + du, v + dv])
            }
        })
        .collect())
}
