use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::{Clusterer, Clustering};
use crate::core::{color_distance, find_closest};
use crate::Float;

/// Weighted k-means clustering.
///
/// This clusterer seeds centers with k-means++, drawing each new center with
/// probability proportional to a point's weight times its squared distance
/// from the nearest existing center, and then runs Lloyd iterations with
/// weighted means. It stops after `max_iterations` or once no center moves by
/// more than `tolerance`. The same seed always yields the same clustering.
#[derive(Clone, Debug)]
pub struct KMeans {
    seed: u64,
    max_iterations: usize,
    tolerance: Float,
}

impl Default for KMeans {
    fn default() -> Self {
        Self::new(1, 300, 1e-4)
    }
}

impl KMeans {
    /// Create a new k-means clusterer.
    pub fn new(seed: u64, max_iterations: usize, tolerance: Float) -> Self {
        Self {
            seed,
            max_iterations: max_iterations.max(1),
            tolerance,
        }
    }

    /// Pick up to `k` initial centers with k-means++.
    fn seed_centers(
        &self,
        points: &[[Float; 3]],
        weights: &[Float],
        k: usize,
        rng: &mut ChaCha8Rng,
    ) -> Vec<[Float; 3]> {
        let mut centers = Vec::with_capacity(k);
        let mut scores: Vec<Float> = weights.to_vec();

        while centers.len() < k {
            let total: Float = scores.iter().sum();
            if total <= 0.0 {
                // All remaining points coincide with existing centers.
                break;
            }

            let mut target = rng.random::<Float>() * total;
            let mut chosen = scores.iter().rposition(|s| *s > 0.0).unwrap_or(0);
            for (index, score) in scores.iter().enumerate() {
                if target < *score {
                    chosen = index;
                    break;
                }
                target -= score;
            }

            let center = points[chosen];
            centers.push(center);

            for ((score, point), weight) in scores.iter_mut().zip(points).zip(weights) {
                let distance = color_distance(point, &center);
                let candidate = weight * distance * distance;
                if centers.len() == 1 || candidate < *score {
                    *score = candidate;
                }
            }
        }

        centers
    }
}

/// Label each point with its closest center.
fn assign(points: &[[Float; 3]], centers: &[[Float; 3]]) -> Vec<usize> {
    points
        .par_iter()
        .map(|point| find_closest(point, centers).unwrap_or(0))
        .collect()
}

impl Clusterer for KMeans {
    fn fit(&self, points: &[[Float; 3]], weights: &[Float], k: usize) -> Clustering {
        if points.is_empty() || k == 0 {
            return Clustering::default();
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut centers = self.seed_centers(points, weights, k.min(points.len()), &mut rng);
        let mut labels = assign(points, &centers);

        for _ in 0..self.max_iterations {
            let mut sums = vec![[0.0 as Float; 3]; centers.len()];
            let mut totals = vec![0.0 as Float; centers.len()];
            for ((point, weight), label) in points.iter().zip(weights).zip(&labels) {
                let sum = &mut sums[*label];
                sum[0] += weight * point[0];
                sum[1] += weight * point[1];
                sum[2] += weight * point[2];
                totals[*label] += weight;
            }

            let mut shift: Float = 0.0;
            for ((center, sum), total) in centers.iter_mut().zip(&sums).zip(&totals) {
                // An empty cluster keeps its center.
                if *total > 0.0 {
                    let next = [sum[0] / total, sum[1] / total, sum[2] / total];
                    shift = shift.max(color_distance(center, &next));
                    *center = next;
                }
            }

            labels = assign(points, &centers);
            if shift <= self.tolerance {
                break;
            }
        }

        Clustering { centers, labels }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn blobs() -> (Vec<[Float; 3]>, Vec<Float>) {
        let mut points = Vec::new();
        for offset in [-1.0, 0.0, 1.0] {
            points.push([20.0 + offset, 10.0, 10.0]);
            points.push([80.0, -40.0 + offset, 30.0]);
            points.push([50.0, 60.0, -70.0 + offset]);
        }
        let weights = vec![1.0; points.len()];
        (points, weights)
    }

    #[test]
    fn test_separates_blobs() {
        let (points, weights) = blobs();
        let clustering = KMeans::default().fit(&points, &weights, 3);

        assert_eq!(clustering.centers.len(), 3);
        assert_eq!(clustering.labels.len(), points.len());
        for blob in 0..3 {
            let label = clustering.labels[blob];
            assert_eq!(clustering.labels[blob + 3], label);
            assert_eq!(clustering.labels[blob + 6], label);
        }

        let mut centers = clustering.centers.clone();
        centers.sort_by(|a, b| a[0].total_cmp(&b[0]));
        for (actual, expected) in centers.iter().zip([
            [20.0, 10.0, 10.0],
            [50.0, 60.0, -70.0],
            [80.0, -40.0, 30.0],
        ]) {
            assert!(color_distance(actual, &expected) < 1e-9, "{:?}", actual);
        }
    }

    #[test]
    fn test_deterministic() {
        let (points, weights) = blobs();
        let one = KMeans::new(7, 50, 1e-6).fit(&points, &weights, 2);
        let two = KMeans::new(7, 50, 1e-6).fit(&points, &weights, 2);
        assert_eq!(one.centers, two.centers);
        assert_eq!(one.labels, two.labels);
    }

    #[test]
    fn test_weights_pull_centers() {
        let points = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]];
        let clustering = KMeans::default().fit(&points, &[3.0, 1.0], 1);
        assert_eq!(clustering.centers.len(), 1);
        assert!(color_distance(&clustering.centers[0], &[2.5, 0.0, 0.0]) < 1e-9);
        assert_eq!(clustering.predict(&[9.0, 0.0, 0.0]), 0);
    }

    #[test]
    fn test_fewer_distinct_points_than_clusters() {
        let points = [[5.0, 5.0, 5.0], [5.0, 5.0, 5.0]];
        let clustering = KMeans::default().fit(&points, &[1.0, 1.0], 2);
        assert_eq!(clustering.centers, vec![[5.0, 5.0, 5.0]]);
        assert_eq!(clustering.labels, vec![0, 0]);
    }
}
