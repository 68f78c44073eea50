use super::{INF, ShortestPaths};
use crate::graph::Graph;
use priority_queue::PriorityQueue;
use std::cmp::Reverse;

/// Single-source shortest paths. Relaxing `u -> v` costs the edge's base cost
/// plus `vertex_cost[v]`. With a `target` the search stops once it is settled.
pub fn dijkstra(
    graph: &Graph,
    source: usize,
    target: Option<usize>,
    vertex_cost: &[u64],
) -> ShortestPaths {
    let mut paths = ShortestPaths::new(graph.num_vertices());
    // Decrease-key queue: a vertex is queued at most once.
    let mut queue: PriorityQueue<usize, Reverse<u64>> = PriorityQueue::new();

    paths.dist[source] = 0;
    queue.push(source, Reverse(0));

    while let Some((u, Reverse(d))) = queue.pop() {
        if Some(u) == target {
            break;
        }
        for e in graph.adj(u) {
            let candidate = d.saturating_add(e.base_cost).saturating_add(vertex_cost[e.to]);
            if candidate < paths.dist[e.to] && candidate < INF {
                paths.dist[e.to] = candidate;
                paths.prev[e.to] = Some(u);
                queue.push_increase(e.to, Reverse(candidate));
            }
        }
    }

    paths
}
