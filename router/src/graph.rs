use crate::grid::RoutingGrid;
use groute_common::db::core::LayerDirection;
use groute_common::geom::coord::Coord3D;

/// Directed edge with a static cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Edge {
    pub to: usize,
    pub base_cost: u64,
}

/// Adjacency list over GCell indices. Only geometry goes in here; congestion
/// is supplied per query as a vertex cost array.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    adj: Vec<Vec<Edge>>,
}

impl Graph {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            adj: vec![Vec::new(); num_vertices],
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.adj.len()
    }

    pub fn num_edges(&self) -> usize {
        self.adj.iter().map(|a| a.len()).sum()
    }

    pub fn add_edge(&mut self, u: usize, v: usize, base_cost: u64) {
        self.adj[u].push(Edge { to: v, base_cost });
    }

    pub fn add_bidirectional(&mut self, u: usize, v: usize, base_cost: u64) {
        self.add_edge(u, v, base_cost);
        self.add_edge(v, u, base_cost);
    }

    #[inline(always)]
    pub fn adj(&self, u: usize) -> &[Edge] {
        &self.adj[u]
    }
}

/// Builds wire edges along each layer's preferred direction plus via edges
/// between vertically adjacent layers.
pub fn build_graph_from_grid<G: RoutingGrid + ?Sized>(grid: &G) -> Graph {
    let mut g = Graph::new(grid.num_gcells());
    let layers = grid.num_layers();
    let x_size = grid.x_size();
    let y_size = grid.y_size();

    for layer in 0..layers {
        match grid.layer_info(layer).direction {
            LayerDirection::Horizontal => {
                for row in 0..y_size {
                    for col in 0..x_size.saturating_sub(1) {
                        let u = grid.gcell_index(Coord3D::new(layer, col, row));
                        let v = grid.gcell_index(Coord3D::new(layer, col + 1, row));
                        g.add_bidirectional(u, v, grid.horizontal_dist(col));
                    }
                }
            }
            LayerDirection::Vertical => {
                for row in 0..y_size.saturating_sub(1) {
                    for col in 0..x_size {
                        let u = grid.gcell_index(Coord3D::new(layer, col, row));
                        let v = grid.gcell_index(Coord3D::new(layer, col, row + 1));
                        g.add_bidirectional(u, v, grid.vertical_dist(row));
                    }
                }
            }
        }

        if layer + 1 < layers {
            let via = grid.wl_via_cost();
            for row in 0..y_size {
                for col in 0..x_size {
                    let u = grid.gcell_index(Coord3D::new(layer, col, row));
                    let v = grid.gcell_index(Coord3D::new(layer + 1, col, row));
                    g.add_bidirectional(u, v, via);
                }
            }
        }
    }

    log::debug!(
        "Routing graph: {} vertices, {} directed edges",
        g.num_vertices(),
        g.num_edges()
    );
    g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DenseGrid;
    use crate::grid::testing::{HV, uniform_grid};
    use groute_common::db::benchmark::{GridSpec, LayerSpec};
    use std::collections::HashSet;

    #[test]
    fn edges_follow_preferred_direction() {
        let grid = uniform_grid(&HV, 3, 3, 7, 3, 1);
        let g = build_graph_from_grid(&grid);

        // layer 0: 3 rows * 2 pairs, layer 1: 3 cols * 2 pairs, vias: 9
        assert_eq!(g.num_edges(), 2 * (6 + 6 + 9));

        let center0 = grid.gcell_index(Coord3D::new(0, 1, 1));
        let targets: HashSet<Coord3D> = g
            .adj(center0)
            .iter()
            .map(|e| grid.from_index(e.to))
            .collect();
        let expected: HashSet<Coord3D> = [
            Coord3D::new(0, 0, 1),
            Coord3D::new(0, 2, 1),
            Coord3D::new(1, 1, 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn costs_come_from_pitches_and_vias() {
        let spec = GridSpec {
            layers: vec![
                LayerSpec {
                    direction: LayerDirection::Horizontal,
                    capacity: 1,
                },
                LayerSpec {
                    direction: LayerDirection::Vertical,
                    capacity: 1,
                },
            ],
            columns: 3,
            rows: 3,
            horizontal_dist: vec![10, 20, 0],
            vertical_dist: vec![30, 40, 0],
            via_cost: 9,
            capacity_overrides: Vec::new(),
        };
        let grid = DenseGrid::new(&spec).unwrap();
        let g = build_graph_from_grid(&grid);
        for u in 0..g.num_vertices() {
            let cu = grid.from_index(u);
            for e in g.adj(u) {
                let cv = grid.from_index(e.to);
                assert_ne!(u, e.to);
                assert!(cu.is_adjacent(&cv));
                let expected = if cu.layer != cv.layer {
                    9
                } else if cu.col != cv.col {
                    spec.horizontal_dist[cu.col.min(cv.col) as usize]
                } else {
                    spec.vertical_dist[cu.row.min(cv.row) as usize]
                };
                assert_eq!(e.base_cost, expected);
            }
        }
    }

    #[test]
    fn no_duplicate_edges() {
        let grid = uniform_grid(&HV, 4, 4, 2, 2, 1);
        let g = build_graph_from_grid(&grid);
        for u in 0..g.num_vertices() {
            let mut seen = HashSet::new();
            for e in g.adj(u) {
                assert!(seen.insert(e.to));
            }
        }
    }
}
