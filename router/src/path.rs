use crate::algo::ShortestPaths;
use crate::grid::RoutingGrid;
use groute_common::db::core::{LayerDirection, Net};
use groute_common::geom::coord::Coord3D;

/// Why a search result could not be turned into a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("vertex {to} is unreachable from vertex {from}")]
    Unreachable { from: usize, to: usize },
    #[error("predecessor {index} is outside the {len}-vertex graph")]
    PredecessorOutOfRange { index: usize, len: usize },
    #[error("predecessor chain does not terminate after {steps} steps")]
    PredecessorCycle { steps: usize },
    #[error("predecessor chain stops at vertex {vertex} before reaching the source")]
    BrokenChain { vertex: usize },
}

impl PathError {
    /// Chain defects point at a search bug rather than a disconnected graph.
    pub fn is_malformed_chain(&self) -> bool {
        !matches!(self, PathError::Unreachable { .. })
    }
}

/// Walks `prev` back from `target` and returns the GCells from `source` to
/// `target` inclusive.
pub fn reconstruct_path<G: RoutingGrid + ?Sized>(
    grid: &G,
    source: usize,
    target: usize,
    prev: &[Option<usize>],
) -> Result<Vec<Coord3D>, PathError> {
    let len = prev.len();
    for index in [source, target] {
        if index >= len {
            return Err(PathError::PredecessorOutOfRange { index, len });
        }
    }

    let mut path = Vec::new();
    let mut cur = target;
    while cur != source {
        if path.len() >= len {
            return Err(PathError::PredecessorCycle { steps: path.len() });
        }
        path.push(grid.from_index(cur));
        cur = match prev[cur] {
            None => return Err(PathError::BrokenChain { vertex: cur }),
            Some(p) if p >= len => return Err(PathError::PredecessorOutOfRange { index: p, len }),
            Some(p) => p,
        };
    }
    path.push(grid.from_index(source));
    path.reverse();
    Ok(path)
}

/// Checks reachability, then reconstructs.
pub fn extract_path<G: RoutingGrid + ?Sized>(
    grid: &G,
    paths: &ShortestPaths,
    source: usize,
    target: usize,
) -> Result<Vec<Coord3D>, PathError> {
    if !paths.reached(target) {
        return Err(PathError::Unreachable {
            from: source,
            to: target,
        });
    }
    reconstruct_path(grid, source, target, &paths.prev)
}

fn nearest_layer<G: RoutingGrid + ?Sized>(grid: &G, from: u8, dir: LayerDirection) -> Option<u8> {
    let layers = grid.num_layers();
    (1..layers).find_map(|d| {
        let below = from.checked_sub(d).filter(|&l| grid.layer_info(l).direction == dir);
        let above = from
            .checked_add(d)
            .filter(|&l| l < layers && grid.layer_info(l).direction == dir);
        below.or(above)
    })
}

fn step_layer_to(cur: &mut Coord3D, layer: u8, path: &mut Vec<Coord3D>) {
    while cur.layer != layer {
        if cur.layer < layer {
            cur.layer += 1;
        } else {
            cur.layer -= 1;
        }
        path.push(*cur);
    }
}

fn align_layer<G: RoutingGrid + ?Sized>(
    grid: &G,
    cur: &mut Coord3D,
    dir: LayerDirection,
    path: &mut Vec<Coord3D>,
) {
    if grid.layer_info(cur.layer).direction == dir {
        return;
    }
    if let Some(layer) = nearest_layer(grid, cur.layer, dir) {
        step_layer_to(cur, layer, path);
    }
}

/// Congestion-blind route: columns first on a horizontal layer, then rows on
/// a vertical layer, then vias to the target layer. Every step moves along a
/// single axis by one. Without a layer of the needed direction it moves on
/// the current layer.
pub fn fallback_path<G: RoutingGrid + ?Sized>(grid: &G, net: &Net) -> Vec<Coord3D> {
    let target = net.pin2;
    let mut cur = net.pin1;
    let mut path = vec![cur];

    while cur.col != target.col {
        align_layer(grid, &mut cur, LayerDirection::Horizontal, &mut path);
        if cur.col < target.col {
            cur.col += 1;
        } else {
            cur.col -= 1;
        }
        path.push(cur);
    }

    while cur.row != target.row {
        align_layer(grid, &mut cur, LayerDirection::Vertical, &mut path);
        if cur.row < target.row {
            cur.row += 1;
        } else {
            cur.row -= 1;
        }
        path.push(cur);
    }

    step_layer_to(&mut cur, target.layer, &mut path);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::astar::astar;
    use crate::algo::heuristic::PitchHeuristic;
    use crate::graph::Graph;
    use crate::grid::testing::{HV, uniform_grid};
    use groute_common::db::core::RoutedNet;

    fn c(layer: u8, col: u32, row: u32) -> Coord3D {
        Coord3D::new(layer, col, row)
    }

    fn assert_walk(path: &[Coord3D], net: &Net) {
        assert_eq!(path.first(), Some(&net.pin1));
        assert_eq!(path.last(), Some(&net.pin2));
        for w in path.windows(2) {
            assert!(w[0].is_adjacent(&w[1]), "{} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn reconstructs_in_traversal_order() {
        let grid = uniform_grid(&HV, 3, 1, 1, 1, 1);
        // vertices 0,1,2 on layer 0 row 0
        let mut prev = vec![None; grid.num_gcells()];
        prev[1] = Some(0);
        prev[2] = Some(1);
        let path = reconstruct_path(&grid, 0, 2, &prev).unwrap();
        assert_eq!(path, vec![c(0, 0, 0), c(0, 1, 0), c(0, 2, 0)]);
    }

    #[test]
    fn degenerate_source_is_single_cell() {
        let grid = uniform_grid(&HV, 2, 2, 1, 1, 1);
        let prev = vec![None; grid.num_gcells()];
        let path = reconstruct_path(&grid, 5, 5, &prev).unwrap();
        assert_eq!(path, vec![grid.from_index(5)]);
    }

    #[test]
    fn detects_malformed_chains() {
        let grid = uniform_grid(&HV, 2, 2, 1, 1, 1);
        let n = grid.num_gcells();

        let mut cyclic = vec![None; n];
        cyclic[2] = Some(3);
        cyclic[3] = Some(2);
        let err = reconstruct_path(&grid, 0, 3, &cyclic).unwrap_err();
        assert!(matches!(err, PathError::PredecessorCycle { .. }));
        assert!(err.is_malformed_chain());

        let mut out_of_range = vec![None; n];
        out_of_range[3] = Some(99);
        assert!(matches!(
            reconstruct_path(&grid, 0, 3, &out_of_range),
            Err(PathError::PredecessorOutOfRange { index: 99, .. })
        ));

        let mut broken = vec![None; n];
        broken[3] = Some(1);
        assert_eq!(
            reconstruct_path(&grid, 0, 3, &broken),
            Err(PathError::BrokenChain { vertex: 1 })
        );

        assert!(matches!(
            reconstruct_path(&grid, 0, n, &broken),
            Err(PathError::PredecessorOutOfRange { .. })
        ));
    }

    #[test]
    fn fallback_connects_pins() {
        let grid = uniform_grid(&HV, 5, 4, 1, 1, 1);
        let nets = [
            Net::new("a", c(0, 0, 0), c(0, 4, 3)),
            Net::new("b", c(1, 4, 3), c(0, 0, 0)),
            Net::new("c", c(1, 2, 0), c(1, 2, 3)),
            Net::new("d", c(0, 3, 1), c(1, 3, 1)),
            Net::new("e", c(1, 1, 1), c(1, 1, 1)),
        ];
        for net in &nets {
            let path = fallback_path(&grid, net);
            assert!(!path.is_empty());
            assert_walk(&path, net);
            for w in path.windows(2) {
                if w[0].layer == w[1].layer && w[0].col != w[1].col {
                    assert_eq!(grid.layer_info(w[0].layer).direction, LayerDirection::Horizontal);
                }
                if w[0].layer == w[1].layer && w[0].row != w[1].row {
                    assert_eq!(grid.layer_info(w[0].layer).direction, LayerDirection::Vertical);
                }
            }
        }
    }

    #[test]
    fn fallback_walks_through_intermediate_layers() {
        let dirs = [
            LayerDirection::Vertical,
            LayerDirection::Vertical,
            LayerDirection::Horizontal,
        ];
        let grid = uniform_grid(&dirs, 3, 3, 1, 1, 1);
        let net = Net::new("deep", c(0, 0, 0), c(0, 2, 2));
        let path = fallback_path(&grid, &net);
        assert_walk(&path, &net);
        assert!(path.iter().any(|p| p.layer == 2));
    }

    #[test]
    fn disconnected_layers_fall_back_with_one_via() {
        let grid = uniform_grid(&HV, 3, 3, 1, 1, 1);
        // Planar edges only.
        let mut g = Graph::new(grid.num_gcells());
        for row in 0..3 {
            for col in 0..2 {
                g.add_bidirectional(
                    grid.gcell_index(c(0, col, row)),
                    grid.gcell_index(c(0, col + 1, row)),
                    1,
                );
            }
        }
        for row in 0..2 {
            for col in 0..3 {
                g.add_bidirectional(
                    grid.gcell_index(c(1, col, row)),
                    grid.gcell_index(c(1, col, row + 1)),
                    1,
                );
            }
        }

        let net = Net::new("cross", c(0, 0, 0), c(1, 0, 2));
        let source = grid.gcell_index(net.pin1);
        let target = grid.gcell_index(net.pin2);
        let h = PitchHeuristic::new(&grid);
        let result = astar(&g, &h, source, target, &vec![0; grid.num_gcells()]);
        assert!(!result.reached(target));
        assert_eq!(
            extract_path(&grid, &result, source, target),
            Err(PathError::Unreachable {
                from: source,
                to: target
            })
        );

        let path = fallback_path(&grid, &net);
        assert_walk(&path, &net);
        let routed = RoutedNet::from_path("cross", &path);
        assert_eq!(routed.num_vias(), 1);
    }
}
