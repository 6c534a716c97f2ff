//! Helper module with the options for recoloring.
//!
//! This module provides the options for the recoloring pipeline and the
//! corresponding builder. By default, recoloring uses a logarithmically sized
//! palette of at most 20,000 distinct colors, checks conflicts against the
//! entire palette, and runs an evolutionary search with 20 candidates over
//! 1,000 generations.
//!
//!
//! # Example
//!
//! ```
//! # use chromashift::opt::Options;
//! # use chromashift::Strategy;
//! let options = Options::builder()
//!     .strategy(Strategy::Stochastic)
//!     .seed(665)
//!     .build();
//!
//! assert_eq!(options.strategy(), Strategy::Stochastic);
//! assert_eq!(options.seed(), 665);
//! ```

use crate::palette::PaletteSize;
use crate::resolve::{ConflictScope, Strategy};
use crate::Float;

#[derive(Clone, Debug)]
struct OptionData {
    strategy: Strategy,
    seed: u64,
    palette_size: PaletteSize,
    max_colors: usize,
    scope: ConflictScope,
    max_steps: usize,
    sample_bounds: [[Float; 2]; 3],
    generations: usize,
    population: usize,
    parents: usize,
    kept_parents: usize,
    alpha: Float,
    penalty: Float,
    gene_bounds: [[Float; 2]; 3],
    kmeans_iterations: usize,
    kmeans_tolerance: Float,
}

impl OptionData {
    pub const fn new() -> Self {
        Self {
            strategy: Strategy::Evolutionary,
            seed: 1,
            palette_size: PaletteSize::Logarithmic,
            max_colors: 20_000,
            scope: ConflictScope::Palette,
            max_steps: 10_000,
            sample_bounds: [[0.0, 100.0], [-84.0, 176.0], [-135.0, 108.0]],
            generations: 1_000,
            population: 20,
            parents: 4,
            kept_parents: 1,
            alpha: 0.5,
            penalty: -10_000_000.0,
            gene_bounds: [[0.0, 100.0], [0.0, 0.7], [0.0, 0.6]],
            kmeans_iterations: 300,
            kmeans_tolerance: 1e-4,
        }
    }
}

/// Order the bounds so that the lower bound comes first.
fn ordered(bounds: [[Float; 2]; 3]) -> [[Float; 2]; 3] {
    bounds.map(|[low, high]| if high < low { [high, low] } else { [low, high] })
}

/// A builder of options objects.
#[derive(Debug)]
pub struct OptionBuilder(OptionData);

impl OptionBuilder {
    /// Set the resolution strategy.
    pub fn strategy(&mut self, strategy: Strategy) -> &mut Self {
        self.0.strategy = strategy;
        self
    }

    /// Set the seed for all random number generators.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.0.seed = seed;
        self
    }

    /// Set the palette size policy.
    pub fn palette_size(&mut self, size: PaletteSize) -> &mut Self {
        self.0.palette_size = size;
        self
    }

    /// Set the maximum number of distinct colors considered for clustering.
    ///
    /// This method ensures that at least one color is considered.
    pub fn max_colors(&mut self, max_colors: usize) -> &mut Self {
        self.0.max_colors = max_colors.max(1);
        self
    }

    /// Set the colors a replacement must be distinguishable from.
    pub fn scope(&mut self, scope: ConflictScope) -> &mut Self {
        self.0.scope = scope;
        self
    }

    /// Set the maximum number of candidates drawn by the stochastic search.
    pub fn max_steps(&mut self, steps: usize) -> &mut Self {
        self.0.max_steps = steps;
        self
    }

    /// Set the `L, u, v` bounding box sampled by the stochastic search.
    pub fn sample_bounds(&mut self, bounds: [[Float; 2]; 3]) -> &mut Self {
        self.0.sample_bounds = ordered(bounds);
        self
    }

    /// Set the number of generations for the evolutionary search.
    pub fn generations(&mut self, generations: usize) -> &mut Self {
        self.0.generations = generations;
        self
    }

    /// Set the population size for the evolutionary search.
    ///
    /// This method ensures that the population has at least two members.
    pub fn population(&mut self, population: usize) -> &mut Self {
        self.0.population = population.max(2);
        self
    }

    /// Set the number of parents selected for mating.
    pub fn parents(&mut self, parents: usize) -> &mut Self {
        self.0.parents = parents;
        self
    }

    /// Set the number of parents carried over into the next generation.
    pub fn kept_parents(&mut self, kept: usize) -> &mut Self {
        self.0.kept_parents = kept;
        self
    }

    /// Set the weight of differentiation versus displacement in the fitness.
    ///
    /// This method clamps the weight to the unit range.
    pub fn alpha(&mut self, alpha: Float) -> &mut Self {
        self.0.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    /// Set the fitness penalty for invisible candidates.
    pub fn penalty(&mut self, penalty: Float) -> &mut Self {
        self.0.penalty = penalty;
        self
    }

    /// Set the per-gene `L, u, v` bounds for the evolutionary search.
    pub fn gene_bounds(&mut self, bounds: [[Float; 2]; 3]) -> &mut Self {
        self.0.gene_bounds = ordered(bounds);
        self
    }

    /// Set the maximum number of k-means iterations.
    pub fn kmeans_iterations(&mut self, iterations: usize) -> &mut Self {
        self.0.kmeans_iterations = iterations.max(1);
        self
    }

    /// Set the k-means convergence tolerance.
    pub fn kmeans_tolerance(&mut self, tolerance: Float) -> &mut Self {
        self.0.kmeans_tolerance = tolerance.max(0.0);
        self
    }

    /// Instantiate the options.
    ///
    /// The number of parents is capped by the population and the number of
    /// kept parents by the number of parents.
    pub fn build(&self) -> Options {
        let mut data = self.0.clone();
        data.parents = data.parents.clamp(1, data.population);
        data.kept_parents = data.kept_parents.min(data.parents);
        Options(data)
    }
}

/// An options object.
#[derive(Clone, Debug)]
pub struct Options(OptionData);

impl Default for Options {
    fn default() -> Self {
        Options(OptionData::new())
    }
}

impl Options {
    /// Create a new builder with the default option values.
    pub fn builder() -> OptionBuilder {
        OptionBuilder(OptionData::new())
    }

    /// Get the resolution strategy.
    pub fn strategy(&self) -> Strategy {
        self.0.strategy
    }

    /// Get the seed.
    pub fn seed(&self) -> u64 {
        self.0.seed
    }

    /// Get the palette size policy.
    pub fn palette_size(&self) -> PaletteSize {
        self.0.palette_size
    }

    /// Get the maximum number of distinct colors.
    pub fn max_colors(&self) -> usize {
        self.0.max_colors
    }

    /// Get the conflict scope.
    pub fn scope(&self) -> ConflictScope {
        self.0.scope
    }

    /// Get the maximum number of stochastic candidates.
    pub fn max_steps(&self) -> usize {
        self.0.max_steps
    }

    /// Get the stochastic sampling bounds.
    pub fn sample_bounds(&self) -> [[Float; 2]; 3] {
        self.0.sample_bounds
    }

    /// Get the number of generations.
    pub fn generations(&self) -> usize {
        self.0.generations
    }

    /// Get the population size.
    pub fn population(&self) -> usize {
        self.0.population
    }

    /// Get the number of parents.
    pub fn parents(&self) -> usize {
        self.0.parents
    }

    /// Get the number of kept parents.
    pub fn kept_parents(&self) -> usize {
        self.0.kept_parents
    }

    /// Get the fitness weight.
    pub fn alpha(&self) -> Float {
        self.0.alpha
    }

    /// Get the invisibility penalty.
    pub fn penalty(&self) -> Float {
        self.0.penalty
    }

    /// Get the gene bounds.
    pub fn gene_bounds(&self) -> [[Float; 2]; 3] {
        self.0.gene_bounds
    }

    /// Get the maximum number of k-means iterations.
    pub fn kmeans_iterations(&self) -> usize {
        self.0.kmeans_iterations
    }

    /// Get the k-means tolerance.
    pub fn kmeans_tolerance(&self) -> Float {
        self.0.kmeans_tolerance
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.strategy(), Strategy::Evolutionary);
        assert_eq!(options.max_colors(), 20_000);
        assert_eq!(options.scope(), ConflictScope::Palette);
        assert_eq!(options.generations(), 1_000);
        assert_eq!(options.population(), 20);
        assert_eq!(options.parents(), 4);
        assert_eq!(options.kept_parents(), 1);
        assert_eq!(options.alpha(), 0.5);
        assert_eq!(options.gene_bounds()[1], [0.0, 0.7]);
    }

    #[test]
    fn test_normalization() {
        let options = Options::builder()
            .population(0)
            .parents(9)
            .kept_parents(5)
            .alpha(3.0)
            .max_colors(0)
            .sample_bounds([[100.0, 0.0], [-1.0, 1.0], [2.0, -2.0]])
            .build();

        assert_eq!(options.population(), 2);
        assert_eq!(options.parents(), 2);
        assert_eq!(options.kept_parents(), 2);
        assert_eq!(options.alpha(), 1.0);
        assert_eq!(options.max_colors(), 1);
        assert_eq!(
            options.sample_bounds(),
            [[0.0, 100.0], [-1.0, 1.0], [-2.0, 2.0]]
        );
    }
}
