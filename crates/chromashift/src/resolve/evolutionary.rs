use log::debug;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::core::{color_distance, is_visible_luv_gama};
use crate::opt::Options;
use crate::{ConfusionModel, Float};

/// The number of genes replaced by mutation.
const MUTATED_GENES: usize = 3;

type Genes = [Float; 3];

/// Draw a single gene uniformly from its bounds.
#[inline]
fn sample_gene(bounds: &[Float; 2], rng: &mut ChaCha8Rng) -> Float {
    rng.random_range(bounds[0]..=bounds[1])
}

/// The objective being maximized.
struct Fitness<'a> {
    model: &'a ConfusionModel,
    original: &'a [Float; 3],
    others: &'a [[Float; 3]],
    alpha: Float,
    penalty: Float,
}

impl Fitness<'_> {
    fn evaluate(&self, genes: &Genes) -> Float {
        let differentiation = self.model.differentiation_mean(genes, self.others);
        let distance = color_distance(self.original, genes);
        let penalty = if is_visible_luv_gama(genes) {
            0.0
        } else {
            self.penalty
        };

        self.alpha * differentiation + (1.0 - self.alpha) * -distance + penalty
    }
}

/// Search for a replacement color with a steady-state genetic algorithm.
///
/// Each generation, the fittest individuals become parents, the very fittest
/// survive unchanged, and the rest of the population is bred by single-point
/// crossover of cyclically paired parents followed by mutation. The fittest
/// individual seen in any generation is the result.
pub(super) fn search(
    model: &ConfusionModel,
    original: &[Float; 3],
    others: &[[Float; 3]],
    options: &Options,
    rng: &mut ChaCha8Rng,
) -> Option<[Float; 3]> {
    let bounds = options.gene_bounds();
    let size = options.population();
    let parent_count = options.parents();
    let kept = options.kept_parents().min(size);
    let fitness = Fitness {
        model,
        original,
        others,
        alpha: options.alpha(),
        penalty: options.penalty(),
    };

    let mut population: Vec<Genes> = (0..size)
        .map(|_| [0, 1, 2].map(|gene| sample_gene(&bounds[gene], rng)))
        .collect();
    let mut best: Option<(Genes, Float)> = None;

    for generation in 0..=options.generations() {
        let scores: Vec<Float> = population
            .par_iter()
            .map(|genes| fitness.evaluate(genes))
            .collect();

        // Rank by descending fitness, earlier individuals first on ties.
        let mut ranking: Vec<usize> = (0..population.len()).collect();
        ranking.sort_by(|i, j| scores[*j].total_cmp(&scores[*i]));

        let leader = ranking[0];
        if best.map_or(true, |(_, score)| score < scores[leader]) {
            best = Some((population[leader], scores[leader]));
        }

        if generation == options.generations() {
            break;
        }

        let parents: Vec<Genes> = ranking
            .iter()
            .take(parent_count)
            .map(|index| population[*index])
            .collect();

        let mut next = Vec::with_capacity(size);
        next.extend(parents.iter().take(kept).copied());
        for k in 0..size - next.len() {
            let first = &parents[k % parents.len()];
            let second = &parents[(k + 1) % parents.len()];

            let point = rng.random_range(0..3);
            let mut child: Genes = [0.0; 3];
            child[..point].copy_from_slice(&first[..point]);
            child[point..].copy_from_slice(&second[point..]);

            let mut genes = [0, 1, 2];
            for index in 0..MUTATED_GENES {
                let other = rng.random_range(index..3);
                genes.swap(index, other);
                let gene = genes[index];
                child[gene] = sample_gene(&bounds[gene], rng);
            }

            next.push(child);
        }

        population = next;
    }

    let (genes, score) = best?;
    debug!("best candidate {:?} has fitness {}", genes, score);
    Some(genes)
}
