//! Resolving the conflicts in a confusability graph.
//!
//! [`resolve`] repeatedly picks the vertex with the most live conflicts,
//! searches for a replacement color that is distinguishable from the vertex's
//! comparison set, and then retires the vertex's edges whether the search
//! succeeded or not. The search is one of two [`Strategy`] variants. Both are
//! seeded, both are bounded, and neither fails. A vertex without an acceptable
//! replacement keeps its original color.

mod evolutionary;
mod stochastic;

#[cfg(feature = "pyffi")]
use pyo3::prelude::*;

use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::is_visible_luv_gama;
use crate::opt::Options;
use crate::{ConfusionGraph, ConfusionModel, Float};

/// The search for replacement colors.
#[cfg_attr(
    feature = "pyffi",
    pyclass(eq, eq_int, frozen, hash, module = "chromashift")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Draw random visible colors until one is distinguishable from every
    /// color in the comparison set.
    Stochastic,
    /// Evolve a population of colors, trading mean differentiation from the
    /// comparison set against distance from the original color.
    Evolutionary,
}

/// The colors a replacement must be distinguishable from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictScope {
    /// All other palette colors.
    #[default]
    Palette,
    /// Only the colors still connected by live edges.
    Neighbors,
}

// --------------------------------------------------------------------------------------------------------------------

/// The fate of a palette color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The color had no live conflicts when its turn came, or never had a
    /// turn, and is kept.
    Clear,
    /// The color was replaced.
    Resolved,
    /// No acceptable replacement was found and the color is kept.
    Unresolved,
}

/// An original palette color, its replacement, and the outcome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Replacement {
    /// The palette color as extracted.
    pub original: [Float; 3],
    /// The color to use instead, identical to the original unless resolved.
    pub replacement: [Float; 3],
    /// How the color fared.
    pub outcome: Outcome,
}

/// A summary of a resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The number of colors without live conflicts at their turn.
    pub clear: usize,
    /// The number of replaced colors.
    pub resolved: usize,
    /// The number of colors kept for lack of an acceptable replacement.
    pub unresolved: usize,
}

/// A total mapping from original palette colors to replacement colors.
///
/// The map has one entry per vertex of the graph it was computed for, in
/// vertex order. Unresolved and unconflicted colors map to themselves.
#[derive(Clone, Debug, Default)]
pub struct ReplacementMap {
    entries: Vec<Replacement>,
}

impl ReplacementMap {
    /// Create the identity map for the colors.
    pub fn identity(colors: &[[Float; 3]]) -> Self {
        Self {
            entries: colors
                .iter()
                .map(|color| Replacement {
                    original: *color,
                    replacement: *color,
                    outcome: Outcome::Clear,
                })
                .collect(),
        }
    }

    /// Create a map from pairs of original and replacement colors.
    ///
    /// Pairs with distinct colors count as resolved, all others as clear.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = ([Float; 3], [Float; 3])>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(original, replacement)| Replacement {
                    original,
                    replacement,
                    outcome: if original == replacement {
                        Outcome::Clear
                    } else {
                        Outcome::Resolved
                    },
                })
                .collect(),
        }
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Determine whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the entries in vertex order.
    pub fn entries(&self) -> &[Replacement] {
        &self.entries
    }

    fn find(&self, color: &[Float; 3]) -> Option<&Replacement> {
        self.entries.iter().find(|entry| entry.original == *color)
    }

    /// Look up the replacement for the original color.
    pub fn get(&self, color: &[Float; 3]) -> Option<&[Float; 3]> {
        self.find(color).map(|entry| &entry.replacement)
    }

    /// Look up the outcome for the original color.
    pub fn outcome(&self, color: &[Float; 3]) -> Option<Outcome> {
        self.find(color).map(|entry| entry.outcome)
    }

    /// Determine whether the original color is free of unresolved conflicts.
    /// Unknown colors are not.
    pub fn is_resolved(&self, color: &[Float; 3]) -> bool {
        matches!(
            self.outcome(color),
            Some(Outcome::Clear | Outcome::Resolved)
        )
    }

    /// Get the original colors whose conflicts remain unresolved.
    pub fn unresolved(&self) -> impl Iterator<Item = &[Float; 3]> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.outcome == Outcome::Unresolved)
            .map(|entry| &entry.original)
    }

    /// Summarize the outcomes.
    pub fn resolution(&self) -> Resolution {
        self.entries
            .iter()
            .fold(Resolution::default(), |mut summary, entry| {
                match entry.outcome {
                    Outcome::Clear => summary.clear += 1,
                    Outcome::Resolved => summary.resolved += 1,
                    Outcome::Unresolved => summary.unresolved += 1,
                }
                summary
            })
    }
}

// --------------------------------------------------------------------------------------------------------------------

/// Resolve the graph's conflicts.
///
/// The graph itself is left untouched. Each vertex's comparison set is
/// captured when the vertex is picked and contains original palette colors
/// only. Replacements chosen earlier are not revisited when later vertices are
/// resolved.
pub fn resolve(
    graph: &ConfusionGraph,
    model: &ConfusionModel,
    options: &Options,
) -> ReplacementMap {
    let mut graph = graph.clone();
    let mut map = ReplacementMap::identity(graph.colors());
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed());

    while let Some(vertex) = graph.max_degree_vertex() {
        let original = *graph.color(vertex);
        let others: Vec<[Float; 3]> = match options.scope() {
            ConflictScope::Palette => graph
                .colors()
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != vertex)
                .map(|(_, color)| *color)
                .collect(),
            ConflictScope::Neighbors => graph
                .neighbors(vertex)
                .map(|neighbor| *graph.color(neighbor))
                .collect(),
        };

        debug!(
            "resolving {:?} with {} conflicts against {} colors",
            original,
            graph.degree(vertex),
            others.len()
        );

        let candidate = match options.strategy() {
            Strategy::Stochastic => stochastic::search(model, &others, options, &mut rng),
            Strategy::Evolutionary => {
                evolutionary::search(model, &original, &others, options, &mut rng)
            }
        };

        let entry = &mut map.entries[vertex];
        match candidate {
            Some(color) if is_visible_luv_gama(&color) => {
                debug!("replacing {:?} with {:?}", original, color);
                entry.replacement = color;
                entry.outcome = Outcome::Resolved;
            }
            _ => {
                warn!("could not find replacement for {:?}", original);
                entry.outcome = Outcome::Unresolved;
            }
        }

        graph.retire(vertex);
    }

    let summary = map.resolution();
    info!(
        "resolved {} and left {} of {} colors unresolved, {} had no conflicts",
        summary.resolved,
        summary.unresolved,
        map.len(),
        summary.clear
    );

    map
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{build_confusion_graph, Ellipse, LuminanceBand};

    fn model() -> ConfusionModel {
        ConfusionModel::new(
            Ellipse::new([0.0, 0.0], 10.0, 5.0, 0.0),
            [0.0, 0.0],
            LuminanceBand::new(60.0, 40.0),
        )
        .expect("geometry is valid")
    }

    fn colors() -> Vec<[Float; 3]> {
        vec![
            [50.0, 0.0, 0.0],
            [50.0, 3.0, 0.0],
            [52.0, 0.0, 2.0],
            [90.0, 0.0, 0.0],
        ]
    }

    fn check_totality(strategy: Strategy, options: Options) {
        let model = model();
        let colors = colors();
        let graph = build_confusion_graph(&colors, &model);
        assert!(graph.has_conflicts());

        let map = resolve(&graph, &model, &options);
        assert_eq!(map.len(), graph.len(), "{:?}", strategy);
        for (entry, color) in map.entries().iter().zip(&colors) {
            assert_eq!(&entry.original, color);
            assert!(map.get(color).is_some());
            if entry.outcome != Outcome::Resolved {
                assert_eq!(entry.replacement, entry.original);
            } else {
                assert!(is_visible_luv_gama(&entry.replacement));
            }
        }

        // The isolated light color never conflicts.
        assert_eq!(map.outcome(&colors[3]), Some(Outcome::Clear));
        assert!(graph.has_conflicts(), "resolve must not mutate its input");
    }

    #[test]
    fn test_totality() {
        let stochastic = Options::builder()
            .strategy(Strategy::Stochastic)
            .seed(3)
            .build();
        check_totality(Strategy::Stochastic, stochastic);

        let evolutionary = Options::builder()
            .strategy(Strategy::Evolutionary)
            .generations(50)
            .seed(3)
            .build();
        check_totality(Strategy::Evolutionary, evolutionary);
    }

    #[test]
    fn test_stochastic_safety() {
        let model = model();
        let colors = colors();
        let graph = build_confusion_graph(&colors, &model);
        let options = Options::builder()
            .strategy(Strategy::Stochastic)
            .seed(42)
            .build();

        let map = resolve(&graph, &model, &options);
        assert!(map.resolution().resolved > 0);
        for (index, entry) in map.entries().iter().enumerate() {
            if entry.outcome == Outcome::Resolved {
                let others = colors
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, c)| c);
                assert!(model.differentiation_all(&entry.replacement, others));
            }
        }
    }

    #[test]
    fn test_neighbor_scope_safety() {
        let model = model();
        let colors = colors();
        let graph = build_confusion_graph(&colors, &model);

        // Replay the pick order to recover each vertex's neighbors at pick time.
        let mut replay = graph.clone();
        let mut snapshots = vec![Vec::new(); graph.len()];
        while let Some(vertex) = replay.max_degree_vertex() {
            snapshots[vertex] = replay
                .neighbors(vertex)
                .map(|neighbor| *replay.color(neighbor))
                .collect::<Vec<_>>();
            replay.retire(vertex);
        }

        let options = Options::builder()
            .strategy(Strategy::Stochastic)
            .scope(ConflictScope::Neighbors)
            .seed(17)
            .build();
        let map = resolve(&graph, &model, &options);

        assert_eq!(map.len(), colors.len());
        assert!(map.resolution().resolved > 0);
        for (entry, snapshot) in map.entries().iter().zip(&snapshots) {
            match entry.outcome {
                Outcome::Resolved => {
                    assert!(!snapshot.is_empty());
                    assert!(is_visible_luv_gama(&entry.replacement));
                    assert!(model.differentiation_all(&entry.replacement, snapshot));
                }
                _ => assert_eq!(entry.replacement, entry.original),
            }
        }
    }

    #[test]
    fn test_exhausted_search_keeps_original() {
        let model = model();
        let colors = colors();
        let graph = build_confusion_graph(&colors, &model);
        let options = Options::builder()
            .strategy(Strategy::Stochastic)
            .max_steps(0)
            .build();

        let map = resolve(&graph, &model, &options);
        assert_eq!(map.resolution().resolved, 0);
        assert!(map.unresolved().count() > 0);
        for entry in map.entries() {
            assert_eq!(entry.replacement, entry.original);
        }
        assert!(!map.is_resolved(&colors[0]));
        assert!(map.is_resolved(&colors[3]));
        assert!(!map.is_resolved(&[1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_deterministic() {
        let model = model();
        let graph = build_confusion_graph(&colors(), &model);
        let options = Options::builder()
            .strategy(Strategy::Evolutionary)
            .generations(20)
            .seed(9)
            .build();

        let one = resolve(&graph, &model, &options);
        let two = resolve(&graph, &model, &options);
        assert_eq!(one.entries(), two.entries());
    }
}
