use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::is_visible_luv_gama;
use crate::opt::Options;
use crate::{ConfusionModel, Float};

/// The maximum number of draws for finding a single visible color.
const VISIBILITY_ATTEMPTS: usize = 1_000;

/// Draw a color uniformly from the bounding box, resampling until it is
/// visible.
fn sample_visible(bounds: &[[Float; 2]; 3], rng: &mut ChaCha8Rng) -> Option<[Float; 3]> {
    for _ in 0..VISIBILITY_ATTEMPTS {
        let candidate = bounds.map(|[low, high]| rng.random_range(low..=high));
        if is_visible_luv_gama(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Search for a visible color that is distinguishable from all others by
/// drawing at most as many candidates as the options allow.
pub(super) fn search(
    model: &ConfusionModel,
    others: &[[Float; 3]],
    options: &Options,
    rng: &mut ChaCha8Rng,
) -> Option<[Float; 3]> {
    let bounds = options.sample_bounds();

    for step in 0..options.max_steps() {
        let Some(candidate) = sample_visible(&bounds, rng) else {
            debug!("sampling bounds {:?} yield no visible colors", bounds);
            return None;
        };

        if model.differentiation_all(&candidate, others) {
            debug!("accepted {:?} after {} steps", candidate, step + 1);
            return Some(candidate);
        }
    }

    None
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Ellipse, LuminanceBand};
    use rand::SeedableRng;

    fn model() -> ConfusionModel {
        ConfusionModel::new(
            Ellipse::new([0.0, 0.0], 10.0, 5.0, 0.0),
            [0.0, 0.0],
            LuminanceBand::new(60.0, 40.0),
        )
        .expect("geometry is valid")
    }

    #[test]
    fn test_samples_are_visible() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let bounds = Options::default().sample_bounds();
        for _ in 0..200 {
            let color =
                sample_visible(&bounds, &mut rng).expect("default bounds hold visible colors");
            assert!(is_visible_luv_gama(&color));
            for (c, [low, high]) in color.iter().zip(bounds.iter()) {
                assert!(low <= c && c <= high);
            }
        }
    }

    #[test]
    fn test_invisible_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let bounds = [[150.0, 160.0], [0.0, 1.0], [0.0, 1.0]];
        assert_eq!(sample_visible(&bounds, &mut rng), None);

        let options = Options::builder().sample_bounds(bounds).build();
        assert_eq!(search(&model(), &[], &options, &mut rng), None);
    }

    #[test]
    fn test_search() {
        let model = model();
        let others = [[50.0, 0.0, 0.0], [30.0, 20.0, 10.0], [70.0, -20.0, 10.0]];
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let found = search(&model, &others, &Options::default(), &mut rng)
            .expect("search finds a distinguishable color");
        assert!(is_visible_luv_gama(&found));
        assert!(model.differentiation_all(&found, &others));
    }
}
