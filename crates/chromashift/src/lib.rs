//! # Chromashift
//!
//! Chromashift recolors images so that colors confusable under a
//! color-vision deficiency become distinguishable again, while disturbing the
//! original palette as little as possible.
#![cfg_attr(
    not(feature = "pyffi"),
    doc = " This version of the API documentation **covers native Rust interfaces
only**. Building with the `pyffi` feature adds a Python extension module."
)]
#![cfg_attr(
    feature = "pyffi",
    doc = " This version of the API documentation **covers both Rust and Python
interfaces**."
)]
//!
//!
//! ## 1. Overview
//!
//! Recoloring proceeds in four stages:
//!
//!   * [`palette::extract_palette`] reduces the image to a handful of
//!     `[L, u, v]` cluster centers, ranked by the number of pixels they cover.
//!   * [`build_confusion_graph`] connects every pair of palette colors that the
//!     [`ConfusionModel`] scores as confusable.
//!   * [`resolve`] picks the most conflicted color again and again, searching
//!     for a replacement with the chosen [`Strategy`], until no conflicts
//!     remain.
//!   * [`project`] shifts every pixel by its cluster center's displacement.
//!
//! [`Recolorer`] chains all four. The [`calibration`] module helps derive a
//! model's inputs, the [`measure`] module helps evaluate the results, and
//! [`opt::Options`] configures everything.
//!
//!
//! ## 2. Color Representations
//!
//! All stages operate on CIE LUV relative to the D65 white point, in two
//! flavors. *LUV-chroma* `[L, u', v']` carries the raw chromaticity
//! coordinates, whereas *LUV-gamma* `[L, u, v]` scales them by lightness. The
//! latter is the working representation. Its Euclidean distance is the CIE
//! 1976 color difference. Conversions never return not-a-number. Degenerate
//! intermediates, notably for black, collapse to zero instead.
//!
//!
//! ## 3. Scoring Confusion
//!
//! An observer's confusion [`Ellipse`] in the `u, v` plane, extruded along
//! lightness by half a [`LuminanceBand`], yields an ellipsoid. Centered on one
//! color, the ellipsoid's boundary marks where another color just becomes
//! distinguishable. [`ConfusionModel::differentiation`] scores a color pair as
//! the ratio of their distance to the distance of the boundary in the same
//! direction. Scores below one are confusable.
//!
//! ```
//! # use chromashift::{ConfusionModel, Ellipse, LuminanceBand};
//! let model = ConfusionModel::new(
//!     Ellipse::new([0.0, 0.0], 10.0, 5.0, 0.0),
//!     [0.0, 0.0],
//!     LuminanceBand::new(60.0, 40.0),
//! )?;
//!
//! let gray = [50.0, 0.0, 0.0];
//! assert!(model.differentiation(&gray, &[50.0, 3.0, 0.0]) < 1.0);
//! assert!(model.differentiation(&gray, &[50.0, 12.0, 0.0]) > 1.0);
//! # Ok::<(), chromashift::error::GeometryError>(())
//! ```

/// The floating point type in use.
#[cfg(feature = "f64")]
pub type Float = f64;
/// The floating point type in use.
#[cfg(not(feature = "f64"))]
pub type Float = f32;

/// [`Float`]'s bits.
#[cfg(feature = "f64")]
pub type Bits = u64;
/// [`Float`]'s bits.
#[cfg(not(feature = "f64"))]
pub type Bits = u32;

pub mod calibration;
mod confusion;
pub mod core;
pub mod error;
mod graph;
pub mod measure;
pub mod opt;
pub mod palette;
mod pipeline;
mod project;
pub mod resolve;

#[doc(hidden)]
pub use core::to_eq_bits;

pub use confusion::{ConfusionModel, Ellipse, LuminanceBand};
pub use graph::{build_confusion_graph, ConfusionGraph};
pub use pipeline::{Recoloring, Recolorer};
pub use project::project;
pub use resolve::{resolve, ConflictScope, ReplacementMap, Strategy};

#[cfg(feature = "pyffi")]
use pyo3::prelude::*;

/// Recolor an image given as a list of `(r, g, b)` pixels. <i
/// class=python-only>Python only!</i>
#[cfg(feature = "pyffi")]
#[pyfunction]
#[pyo3(name = "recolor", signature = (pixels, ellipse, confusion_point, band, strategy = Strategy::Evolutionary, seed = 1))]
fn py_recolor(
    py: Python<'_>,
    pixels: Vec<[u8; 3]>,
    ellipse: Ellipse,
    confusion_point: [Float; 2],
    band: LuminanceBand,
    strategy: Strategy,
    seed: u64,
) -> PyResult<Vec<[u8; 3]>> {
    let model = ConfusionModel::new(ellipse, confusion_point, band)?;
    let options = opt::Options::builder().strategy(strategy).seed(seed).build();
    let recolorer = Recolorer::new(model, options);
    let recoloring = py.allow_threads(|| recolorer.recolor(&pixels))?;
    Ok(recoloring.pixels)
}

/// Compute the two confusion points for the ellipse. <i
/// class=python-only>Python only!</i>
#[cfg(feature = "pyffi")]
#[pyfunction]
#[pyo3(name = "confusion_points")]
fn py_confusion_points(ellipse: Ellipse) -> PyResult<[[Float; 2]; 2]> {
    Ok(calibration::confusion_points(&ellipse)?)
}

/// Project chromaticity coordinates into the `u, v` plane. <i
/// class=python-only>Python only!</i>
#[cfg(feature = "pyffi")]
#[pyfunction]
#[pyo3(name = "project_calibration_points")]
fn py_project_calibration_points(points: Vec<[Float; 2]>) -> Vec<[Float; 2]> {
    calibration::project_calibration_points(&points)
}

#[doc(hidden)]
#[cfg(feature = "pyffi")]
#[pymodule]
pub fn chromashift(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Ellipse>()?;
    m.add_class::<LuminanceBand>()?;
    m.add_class::<Strategy>()?;

    m.add_function(wrap_pyfunction!(py_recolor, m)?)?;
    m.add_function(wrap_pyfunction!(py_confusion_points, m)?)?;
    m.add_function(wrap_pyfunction!(py_project_calibration_points, m)?)?;

    Ok(())
}
