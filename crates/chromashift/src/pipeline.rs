//! The end-to-end recoloring pipeline.

use log::info;

use crate::error::ProjectionError;
use crate::opt::Options;
use crate::palette::{extract_palette, Clusterer, KMeans, Palette};
use crate::{build_confusion_graph, project, resolve, ConfusionModel, ReplacementMap};

/// The result of recoloring an image.
#[derive(Clone, Debug)]
pub struct Recoloring {
    /// The recolored pixels.
    pub pixels: Vec<[u8; 3]>,
    /// The original image's palette.
    pub palette: Palette,
    /// The number of confusable palette pairs before resolution.
    pub conflicts: usize,
    /// The palette's replacement colors.
    pub replacements: ReplacementMap,
}

/// A recolorer.
///
/// A recolorer drives an image through palette extraction, conflict
/// detection, conflict resolution, and pixel projection, in that order. Each
/// stage consumes the previous stage's complete output.
///
/// # Example
///
/// ```
/// # use chromashift::{ConfusionModel, Ellipse, LuminanceBand, Recolorer, Strategy};
/// # use chromashift::opt::Options;
/// let model = ConfusionModel::new(
///     Ellipse::new([0.0, 0.0], 30.0, 8.0, 0.5),
///     [0.0, 0.0],
///     LuminanceBand::new(70.0, 30.0),
/// )?;
/// let options = Options::builder().strategy(Strategy::Stochastic).build();
///
/// let pixels = vec![[200, 40, 40], [40, 160, 40], [200, 40, 40], [40, 40, 200]];
/// let recoloring = Recolorer::new(model, options).recolor(&pixels)?;
/// assert_eq!(recoloring.pixels.len(), pixels.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Recolorer {
    model: ConfusionModel,
    options: Options,
}

impl Recolorer {
    /// Create a new recolorer.
    pub fn new(model: ConfusionModel, options: Options) -> Self {
        Self { model, options }
    }

    /// Get the confusion model.
    pub fn model(&self) -> &ConfusionModel {
        &self.model
    }

    /// Get the options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Recolor the pixels, clustering with k-means.
    pub fn recolor(&self, pixels: &[[u8; 3]]) -> Result<Recoloring, ProjectionError> {
        let clusterer = KMeans::new(
            self.options.seed(),
            self.options.kmeans_iterations(),
            self.options.kmeans_tolerance(),
        );
        self.recolor_with(pixels, &clusterer)
    }

    /// Recolor the pixels, clustering with the given clusterer.
    pub fn recolor_with<C: Clusterer + ?Sized>(
        &self,
        pixels: &[[u8; 3]],
        clusterer: &C,
    ) -> Result<Recoloring, ProjectionError> {
        let palette = extract_palette(
            pixels,
            self.options.palette_size(),
            self.options.max_colors(),
            clusterer,
        );
        let colors = palette.colors();

        let graph = build_confusion_graph(&colors, &self.model);
        let conflicts = graph.edge_count();
        let replacements = resolve(&graph, &self.model, &self.options);
        let pixels = project(pixels, palette.labels(), &colors, &replacements)?;

        info!(
            "recolored {} pixels with {} palette colors and {} conflicts",
            pixels.len(),
            colors.len(),
            conflicts
        );

        Ok(Recoloring {
            pixels,
            palette,
            conflicts,
            replacements,
        })
    }
}
