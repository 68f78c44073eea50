use crate::grid::RoutingGrid;
use groute_common::db::core::{RoutedNet, RoutingResult, Segment};

/// Physical length of a segment: pitches crossed, or the via cost.
pub fn segment_cost<G: RoutingGrid + ?Sized>(grid: &G, seg: &Segment) -> u64 {
    if seg.is_via() {
        return grid.wl_via_cost() * seg.from.layer.abs_diff(seg.to.layer) as u64;
    }
    let mut cost = 0;
    if seg.from.col != seg.to.col {
        for col in seg.from.col.min(seg.to.col)..seg.from.col.max(seg.to.col) {
            cost += grid.horizontal_dist(col);
        }
    } else if seg.from.row != seg.to.row {
        for row in seg.from.row.min(seg.to.row)..seg.from.row.max(seg.to.row) {
            cost += grid.vertical_dist(row);
        }
    }
    cost
}

pub fn net_cost<G: RoutingGrid + ?Sized>(grid: &G, net: &RoutedNet) -> u64 {
    net.segments.iter().map(|s| segment_cost(grid, s)).sum()
}

pub fn total_cost<G: RoutingGrid + ?Sized>(grid: &G, result: &RoutingResult) -> u64 {
    result.nets.iter().map(|n| net_cost(grid, n)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::DenseGrid;
    use groute_common::db::benchmark::{GridSpec, LayerSpec};
    use groute_common::db::core::LayerDirection;
    use groute_common::geom::coord::Coord3D;

    #[test]
    fn sums_pitches_and_vias() {
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
            horizontal_dist: vec![5, 7, 0],
            vertical_dist: vec![11, 13, 0],
            via_cost: 100,
            capacity_overrides: Vec::new(),
        };
        let grid = DenseGrid::new(&spec).unwrap();
        let path = [
            Coord3D::new(0, 2, 0),
            Coord3D::new(0, 1, 0),
            Coord3D::new(0, 0, 0),
            Coord3D::new(1, 0, 0),
            Coord3D::new(1, 0, 1),
            Coord3D::new(1, 0, 2),
        ];
        let routed = RoutedNet::from_path("n", &path);
        assert_eq!(net_cost(&grid, &routed), 12 + 100 + 24);

        let result = RoutingResult {
            nets: vec![routed, RoutedNet::from_path("dot", &[Coord3D::new(1, 1, 1)])],
        };
        assert_eq!(total_cost(&grid, &result), 136);
    }
}
