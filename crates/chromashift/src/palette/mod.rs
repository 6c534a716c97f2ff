//! Reducing an image to a tractable palette.
//!
//! [`extract_palette`] counts an image's distinct colors, projects the most
//! frequent ones into `[L, u, v]`, and clusters them with a [`Clusterer`]. The
//! resulting [`Palette`] ranks cluster centers by the number of pixels they
//! cover and labels every pixel with its center.

mod kmeans;

use std::collections::HashMap;

use log::debug;
use rayon::prelude::*;

use crate::core::{
    find_closest, has_nan, is_visible_luv_gama, pixel_to_luv_gama, to_eq_coordinates,
};
use crate::{Bits, Float};

pub use kmeans::KMeans;

/// The policy for the number of palette colors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteSize {
    /// The natural logarithm of the number of pixels, rounded down.
    #[default]
    Logarithmic,
    /// A fixed number of colors.
    Fixed(usize),
}

impl PaletteSize {
    /// Determine the number of clusters for an image with the given number of
    /// pixels. The result is at least one.
    pub fn clusters(&self, pixel_count: usize) -> usize {
        let k = match *self {
            Self::Logarithmic => (pixel_count as Float).ln().floor() as usize,
            Self::Fixed(k) => k,
        };
        k.max(1)
    }
}

// --------------------------------------------------------------------------------------------------------------------

/// The result of clustering points.
#[derive(Clone, Debug, Default)]
pub struct Clustering {
    /// The cluster centers.
    pub centers: Vec<[Float; 3]>,
    /// For each clustered point, the index of its center.
    pub labels: Vec<usize>,
}

impl Clustering {
    /// Determine the label of the center closest to the point. An empty
    /// clustering labels every point zero.
    pub fn predict(&self, point: &[Float; 3]) -> usize {
        find_closest(point, &self.centers).unwrap_or(0)
    }
}

/// A clustering capability.
pub trait Clusterer {
    /// Partition the weighted points into at most `k` clusters.
    ///
    /// Implementations must return one label per point, with every label
    /// indexing into the returned centers.
    fn fit(&self, points: &[[Float; 3]], weights: &[Float], k: usize) -> Clustering;
}

// --------------------------------------------------------------------------------------------------------------------

/// A palette color and the number of pixels it stands for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteEntry {
    color: [Float; 3],
    weight: usize,
}

impl PaletteEntry {
    /// Get the `[L, u, v]` color.
    pub fn color(&self) -> &[Float; 3] {
        &self.color
    }

    /// Get the number of pixels.
    pub fn weight(&self) -> usize {
        self.weight
    }
}

/// An image's palette.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
    labels: Vec<usize>,
}

impl Palette {
    /// Get the entries, ranked by weight from heaviest to lightest.
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Get the per-pixel labels, indexing into the entries.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Get the palette colors in rank order.
    pub fn colors(&self) -> Vec<[Float; 3]> {
        self.entries.iter().map(|e| e.color).collect()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Determine whether the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count the distinct colors, ordered by count and then color, both
/// descending.
fn count_colors(pixels: &[[u8; 3]]) -> Vec<([u8; 3], usize)> {
    let mut counts: HashMap<[u8; 3], usize> = HashMap::new();
    for pixel in pixels {
        *counts.entry(*pixel).or_insert(0) += 1;
    }

    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_unstable_by(|(c1, n1), (c2, n2)| n2.cmp(n1).then_with(|| c2.cmp(c1)));
    counts
}

/// Extract the palette of the pixels.
///
/// This function considers at most `max_colors` distinct colors, preferring
/// more frequent ones. Colors whose `[L, u, v]` projection is not-a-number or
/// invisible are dropped. The remaining colors, weighted by their pixel counts,
/// are clustered into as many clusters as `size` calls for, but no more than
/// there are colors. Numerically identical centers and centers without pixels
/// are folded away. Every pixel is labeled, with dropped colors taking the
/// label of their closest center.
pub fn extract_palette<C: Clusterer + ?Sized>(
    pixels: &[[u8; 3]],
    size: PaletteSize,
    max_colors: usize,
    clusterer: &C,
) -> Palette {
    if pixels.is_empty() {
        return Palette::default();
    }

    let mut counts = count_colors(pixels);
    let distinct = counts.len();
    counts.truncate(max_colors.max(1));

    let projected: Vec<_> = counts
        .par_iter()
        .map(|(pixel, count)| (*pixel, *count, pixel_to_luv_gama(pixel)))
        .collect();
    let before = projected.len();
    let projected: Vec<_> = projected
        .into_iter()
        .filter(|(_, _, luv)| !has_nan(luv) && is_visible_luv_gama(luv))
        .collect();
    if projected.len() < before {
        debug!(
            "dropped {} colors with degenerate or invisible projections",
            before - projected.len()
        );
    }
    if projected.is_empty() {
        return Palette::default();
    }

    let points: Vec<_> = projected.iter().map(|(_, _, luv)| *luv).collect();
    let weights: Vec<_> = projected.iter().map(|(_, n, _)| *n as Float).collect();
    let k = size.clusters(pixels.len()).min(points.len());
    debug!(
        "clustering {} of {} distinct colors into {} clusters",
        points.len(),
        distinct,
        k
    );

    let clustering = clusterer.fit(&points, &weights, k);

    // Merge identical centers and tally pixels per merged center.
    let mut merged: Vec<([Float; 3], usize)> = Vec::new();
    let mut index_of: HashMap<[Bits; 3], usize> = HashMap::new();
    let mut remap = Vec::with_capacity(clustering.centers.len());
    for center in &clustering.centers {
        let index = *index_of
            .entry(to_eq_coordinates(center))
            .or_insert_with(|| {
                merged.push((*center, 0));
                merged.len() - 1
            });
        remap.push(index);
    }
    for ((_, count, _), label) in projected.iter().zip(clustering.labels.iter()) {
        if let Some(index) = remap.get(*label) {
            merged[*index].1 += count;
        }
    }

    // Rank by weight, drop empty clusters.
    let mut order: Vec<_> = (0..merged.len()).filter(|i| merged[*i].1 > 0).collect();
    order.sort_by(|i, j| merged[*j].1.cmp(&merged[*i].1).then(i.cmp(j)));
    let mut rank_of = vec![usize::MAX; merged.len()];
    for (rank, index) in order.iter().enumerate() {
        rank_of[*index] = rank;
    }
    let entries: Vec<_> = order
        .iter()
        .map(|i| PaletteEntry {
            color: merged[*i].0,
            weight: merged[*i].1,
        })
        .collect();

    // Label every distinct color, then every pixel.
    let mut label_of: HashMap<[u8; 3], usize> = HashMap::with_capacity(distinct);
    for ((pixel, _, _), label) in projected.iter().zip(clustering.labels.iter()) {
        if let Some(rank) = remap.get(*label).map(|i| rank_of[*i]) {
            if rank != usize::MAX {
                label_of.insert(*pixel, rank);
            }
        }
    }

    let colors: Vec<_> = entries.iter().map(|e| e.color).collect();
    let labels = pixels
        .iter()
        .map(|pixel| {
            *label_of.entry(*pixel).or_insert_with(|| {
                find_closest(&pixel_to_luv_gama(pixel), &colors).unwrap_or(0)
            })
        })
        .collect();

    debug!("extracted palette with {} colors", entries.len());
    Palette { entries, labels }
}

#[cfg(test)]
mod test {
    use super::*;

    /// A clusterer that makes every point its own cluster.
    struct Identity;

    impl Clusterer for Identity {
        fn fit(&self, points: &[[Float; 3]], _weights: &[Float], _k: usize) -> Clustering {
            Clustering {
                centers: points.to_vec(),
                labels: (0..points.len()).collect(),
            }
        }
    }

    #[test]
    fn test_palette_size() {
        assert_eq!(PaletteSize::Logarithmic.clusters(1), 1);
        assert_eq!(PaletteSize::Logarithmic.clusters(0), 1);
        assert_eq!(PaletteSize::Logarithmic.clusters(100), 4);
        assert_eq!(PaletteSize::Logarithmic.clusters(640 * 480), 12);
        assert_eq!(PaletteSize::Fixed(0).clusters(100), 1);
        assert_eq!(PaletteSize::Fixed(7).clusters(100), 7);
    }

    #[test]
    fn test_count_colors() {
        let pixels = [[1, 1, 1], [9, 9, 9], [1, 1, 1], [5, 5, 5], [9, 9, 9]];
        let counts = count_colors(&pixels);
        assert_eq!(counts, vec![([9, 9, 9], 2), ([1, 1, 1], 2), ([5, 5, 5], 1)]);
    }

    #[test]
    fn test_extract_ranks_by_weight() {
        let mut pixels = vec![[255, 0, 0]; 5];
        pixels.extend(vec![[0, 0, 255]; 9]);
        pixels.extend(vec![[0, 255, 0]; 2]);

        let palette = extract_palette(&pixels, PaletteSize::Fixed(3), 100, &Identity);
        assert_eq!(palette.len(), 3);

        let weights: Vec<_> = palette.entries().iter().map(|e| e.weight()).collect();
        assert_eq!(weights, vec![9, 5, 2]);
        assert_eq!(palette.entries()[0].color(), &pixel_to_luv_gama(&[0, 0, 255]));

        assert_eq!(palette.labels().len(), pixels.len());
        assert_eq!(palette.labels()[0], 1);
        assert_eq!(palette.labels()[5], 0);
        assert_eq!(palette.labels()[15], 2);
    }

    #[test]
    fn test_truncated_colors_are_labeled() {
        let mut pixels = vec![[250, 0, 0]; 4];
        pixels.extend(vec![[0, 0, 250]; 3]);
        pixels.push([240, 10, 10]);

        let palette = extract_palette(&pixels, PaletteSize::Fixed(5), 2, &Identity);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.labels().len(), 8);
        // The reddish outlier maps onto the red entry.
        assert_eq!(palette.labels()[7], palette.labels()[0]);
    }

    #[test]
    fn test_duplicate_centers_merge() {
        struct Collapse;

        impl Clusterer for Collapse {
            fn fit(&self, points: &[[Float; 3]], _weights: &[Float], _k: usize) -> Clustering {
                Clustering {
                    centers: vec![[50.0, 0.0, 0.0], [50.0, 0.0, 0.0], [70.0, 0.0, 0.0]],
                    labels: (0..points.len()).map(|i| i % 2).collect(),
                }
            }
        }

        let pixels = [[10, 10, 10], [20, 20, 20], [30, 30, 30]];
        let palette = extract_palette(&pixels, PaletteSize::Fixed(3), 100, &Collapse);

        assert_eq!(palette.len(), 1);
        assert_eq!(palette.entries()[0].weight(), 3);
        assert_eq!(palette.labels(), &[0, 0, 0]);
    }

    #[test]
    fn test_empty() {
        let palette = extract_palette(&[], PaletteSize::Logarithmic, 100, &Identity);
        assert!(palette.is_empty());
        assert!(palette.labels().is_empty());
    }
}
