use super::heuristic::PitchHeuristic;
use super::{INF, ShortestPaths};
use crate::graph::Graph;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    f_score: u64,
    g_score: u64,
    index: usize,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* from `source` to `target` with the same relaxation rule as
/// [`super::dijkstra::dijkstra`]. Stops as soon as `target` is popped.
///
/// Only `dist[target]` is guaranteed final; other entries are upper bounds.
pub fn astar(
    graph: &Graph,
    heuristic: &PitchHeuristic,
    source: usize,
    target: usize,
    vertex_cost: &[u64],
) -> ShortestPaths {
    let mut paths = ShortestPaths::new(graph.num_vertices());
    let mut heap = BinaryHeap::new();

    paths.dist[source] = 0;
    heap.push(State {
        f_score: heuristic.estimate(source, target),
        g_score: 0,
        index: source,
    });

    while let Some(State { g_score, index, .. }) = heap.pop() {
        if g_score > paths.dist[index] {
            continue;
        }
        if index == target {
            break;
        }

        for e in graph.adj(index) {
            let tentative_g = g_score
                .saturating_add(e.base_cost)
                .saturating_add(vertex_cost[e.to]);
            if tentative_g < paths.dist[e.to] && tentative_g < INF {
                paths.dist[e.to] = tentative_g;
                paths.prev[e.to] = Some(index);
                heap.push(State {
                    f_score: tentative_g + heuristic.estimate(e.to, target),
                    g_score: tentative_g,
                    index: e.to,
                });
            }
        }
    }

    paths
}
