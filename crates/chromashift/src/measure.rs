//! Measures for evaluating a recoloring.
//!
//! A good recoloring keeps [`distance_summary`] between original and
//! recolored pixels small while pushing [`differentiation_summary`] across the
//! recolored palette up.

use rayon::prelude::*;

use crate::core::{color_distance, pixel_to_luv_gama, Accumulator};
use crate::error::LengthMismatchError;
use crate::{ConfusionModel, Float};

/// Summary statistics over a sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Summary {
    /// The number of values.
    pub count: usize,
    /// The arithmetic mean.
    pub mean: Float,
    /// The median, i.e., the middle value or the mean of the two middle values.
    pub median: Float,
    /// The population standard deviation.
    pub deviation: Float,
}

impl Summary {
    /// Summarize the values. An empty sample summarizes as all zeros.
    pub fn of(mut values: Vec<Float>) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let sum: Accumulator = values.iter().copied().collect();
        let (count, mean) = (sum.count(), sum.mean());
        let variance = values
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .collect::<Accumulator>()
            .mean();

        values.sort_by(|a, b| a.total_cmp(b));
        let median = if count % 2 == 1 {
            values[count / 2]
        } else {
            (values[count / 2 - 1] + values[count / 2]) / 2.0
        };

        Self {
            count,
            mean,
            median,
            deviation: variance.sqrt(),
        }
    }
}

/// Summarize the `[L, u, v]` distances between corresponding pixels.
///
/// # Errors
///
/// This function fails if the two images have different numbers of pixels.
pub fn distance_summary(
    original: &[[u8; 3]],
    recolored: &[[u8; 3]],
) -> Result<Summary, LengthMismatchError> {
    if original.len() != recolored.len() {
        return Err(LengthMismatchError {
            expected: original.len(),
            actual: recolored.len(),
        });
    }

    let distances = original
        .par_iter()
        .zip(recolored.par_iter())
        .map(|(p1, p2)| color_distance(&pixel_to_luv_gama(p1), &pixel_to_luv_gama(p2)))
        .collect();

    Ok(Summary::of(distances))
}

/// Summarize the differentiation scores between all pairs of colors.
pub fn differentiation_summary(colors: &[[Float; 3]], model: &ConfusionModel) -> Summary {
    let n = colors.len();
    let scores = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| (i + 1..n).map(move |j| model.differentiation(&colors[i], &colors[j])))
        .collect();

    Summary::of(scores)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{assert_close_enough, Ellipse, LuminanceBand};

    #[test]
    fn test_summary() {
        let summary = Summary::of(vec![4.0, 1.0, 3.0, 2.0]);
        assert_eq!(summary.count, 4);
        assert_close_enough!(summary.mean, 2.5);
        assert_close_enough!(summary.median, 2.5);
        assert_close_enough!(summary.deviation, (1.25 as Float).sqrt());

        let summary = Summary::of(vec![7.0, 1.0, 4.0]);
        assert_close_enough!(summary.median, 4.0);
        assert_eq!(Summary::of(Vec::new()), Summary::default());
    }

    #[test]
    fn test_distance_summary() -> Result<(), LengthMismatchError> {
        let pixels = [[10, 20, 30], [200, 100, 0]];
        let same = distance_summary(&pixels, &pixels)?;
        assert_eq!(same.count, 2);
        assert_eq!(same.mean, 0.0);
        assert_eq!(same.deviation, 0.0);

        let other = distance_summary(&pixels, &[[10, 20, 30], [0, 0, 0]])?;
        let expected = color_distance(&pixel_to_luv_gama(&[200, 100, 0]), &[0.0, 0.0, 0.0]);
        assert_close_enough!(other.mean, expected / 2.0);
        assert_close_enough!(other.median, expected / 2.0);

        assert_eq!(
            distance_summary(&pixels, &[[0, 0, 0]]),
            Err(LengthMismatchError {
                expected: 2,
                actual: 1
            })
        );
        Ok(())
    }

    #[test]
    fn test_differentiation_summary() {
        let model = ConfusionModel::new(
            Ellipse::new([0.0, 0.0], 10.0, 5.0, 0.0),
            [0.0, 0.0],
            LuminanceBand::new(60.0, 40.0),
        )
        .expect("geometry is valid");

        let colors = [[50.0, 0.0, 0.0], [50.0, 3.0, 0.0], [50.0, 12.0, 0.0]];
        let summary = differentiation_summary(&colors, &model);

        // Scores are 0.6, 2.4, and 1.8.
        assert_eq!(summary.count, 3);
        assert_close_enough!(summary.mean, 1.6);
        assert_close_enough!(summary.median, 1.8);
    }
}
