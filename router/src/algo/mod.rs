pub mod astar;
pub mod cost;
pub mod dijkstra;
pub mod heuristic;

use crate::graph::Graph;
use groute_common::util::config::SearchAlgorithm;
use heuristic::PitchHeuristic;

/// Distance sentinel for vertices the search never reached.
pub const INF: u64 = u64::MAX >> 4;

/// Output of a single-source search.
#[derive(Clone, Debug)]
pub struct ShortestPaths {
    pub dist: Vec<u64>,
    pub prev: Vec<Option<usize>>,
}

impl ShortestPaths {
    pub(crate) fn new(num_vertices: usize) -> Self {
        Self {
            dist: vec![INF; num_vertices],
            prev: vec![None; num_vertices],
        }
    }

    pub fn reached(&self, target: usize) -> bool {
        self.dist.get(target).is_some_and(|&d| d < INF)
    }
}

/// Point-to-point search with the configured engine.
pub fn search(
    algorithm: SearchAlgorithm,
    graph: &Graph,
    heuristic: &PitchHeuristic,
    source: usize,
    target: usize,
    vertex_cost: &[u64],
) -> ShortestPaths {
    match algorithm {
        SearchAlgorithm::Astar => astar::astar(graph, heuristic, source, target, vertex_cost),
        SearchAlgorithm::Dijkstra => dijkstra::dijkstra(graph, source, Some(target), vertex_cost),
    }
}
