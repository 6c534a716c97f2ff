//! The confusability graph over a palette.

use std::collections::HashSet;

use log::debug;
use rayon::prelude::*;

use crate::core::to_eq_coordinates;
use crate::{ConfusionModel, Float};

#[derive(Clone, Copy, Debug)]
struct Edge {
    source: usize,
    target: usize,
    retired: bool,
}

/// A graph with one vertex per palette color and one edge per confusable pair.
///
/// Edges are never removed. Instead, [`ConfusionGraph::retire`] marks all live
/// edges of a vertex as retired, which keeps vertex indices and edge lists
/// stable while the resolver works its way through the conflicts. Degrees only
/// count live edges.
#[derive(Clone, Debug)]
pub struct ConfusionGraph {
    colors: Vec<[Float; 3]>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<usize>>,
    degrees: Vec<usize>,
}

impl ConfusionGraph {
    /// Get the number of vertices.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Determine whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the colors of all vertices.
    pub fn colors(&self) -> &[[Float; 3]] {
        &self.colors
    }

    /// Get the color of the vertex.
    ///
    /// # Panics
    ///
    /// If the vertex is out of bounds.
    pub fn color(&self, vertex: usize) -> &[Float; 3] {
        &self.colors[vertex]
    }

    /// Get the number of live edges of the vertex.
    ///
    /// # Panics
    ///
    /// If the vertex is out of bounds.
    pub fn degree(&self, vertex: usize) -> usize {
        self.degrees[vertex]
    }

    /// Get the vertices still connected to the vertex by live edges.
    ///
    /// # Panics
    ///
    /// If the vertex is out of bounds.
    pub fn neighbors(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[vertex].iter().filter_map(move |index| {
            let edge = &self.edges[*index];
            if edge.retired {
                None
            } else if edge.source == vertex {
                Some(edge.target)
            } else {
                Some(edge.source)
            }
        })
    }

    /// Get the live edges as vertex pairs with the smaller index first.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges
            .iter()
            .filter(|edge| !edge.retired)
            .map(|edge| (edge.source, edge.target))
    }

    /// Get the number of live edges.
    pub fn edge_count(&self) -> usize {
        self.degrees.iter().sum::<usize>() / 2
    }

    /// Find the vertex with the highest positive degree, preferring earlier
    /// vertices on ties.
    pub fn max_degree_vertex(&self) -> Option<usize> {
        let mut max = 0;
        let mut vertex = None;
        for (index, degree) in self.degrees.iter().enumerate() {
            if *degree > max {
                max = *degree;
                vertex = Some(index);
            }
        }
        vertex
    }

    /// Retire all live edges of the vertex.
    ///
    /// # Panics
    ///
    /// If the vertex is out of bounds.
    pub fn retire(&mut self, vertex: usize) {
        for index in &self.adjacency[vertex] {
            let edge = &mut self.edges[*index];
            if !edge.retired {
                edge.retired = true;
                self.degrees[edge.source] -= 1;
                self.degrees[edge.target] -= 1;
            }
        }
    }

    /// Determine whether any live edges remain.
    pub fn has_conflicts(&self) -> bool {
        self.degrees.iter().any(|d| *d > 0)
    }
}

/// Build the confusability graph for the colors.
///
/// Numerically identical colors collapse into the first vertex with that
/// color. Two vertices are connected if their differentiation score is at most
/// one. The pairwise scores are computed in parallel.
pub fn build_confusion_graph(colors: &[[Float; 3]], model: &ConfusionModel) -> ConfusionGraph {
    let mut seen = HashSet::with_capacity(colors.len());
    let colors: Vec<_> = colors
        .iter()
        .filter(|color| seen.insert(to_eq_coordinates(color)))
        .copied()
        .collect();

    let n = colors.len();
    let edges: Vec<_> = (0..n)
        .into_par_iter()
        .flat_map_iter(|source| {
            let colors = &colors;
            (source + 1..n).filter_map(move |target| {
                if model.differentiation(&colors[source], &colors[target]) <= 1.0 {
                    Some(Edge {
                        source,
                        target,
                        retired: false,
                    })
                } else {
                    None
                }
            })
        })
        .collect();

    let mut adjacency = vec![Vec::new(); n];
    let mut degrees = vec![0; n];
    for (index, edge) in edges.iter().enumerate() {
        adjacency[edge.source].push(index);
        adjacency[edge.target].push(index);
        degrees[edge.source] += 1;
        degrees[edge.target] += 1;
    }

    debug!(
        "built confusion graph with {} vertices and {} edges",
        n,
        edges.len()
    );

    ConfusionGraph {
        colors,
        edges,
        adjacency,
        degrees,
    }
}
