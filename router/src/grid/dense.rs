use super::RoutingGrid;
use crate::error::{Result, RouterError};
use groute_common::db::benchmark::GridSpec;
use groute_common::db::core::LayerInfo;
use groute_common::db::indices::NetId;
use groute_common::geom::coord::Coord3D;
use std::collections::HashMap;

/// Flat-array grid: `index = layer * X * Y + row * X + col`.
pub struct DenseGrid {
    layers: Vec<LayerInfo>,
    x_size: u32,
    y_size: u32,
    horizontal_dist: Vec<u64>,
    vertical_dist: Vec<u64>,
    via_cost: u64,
    capacity: Vec<u32>,
    demand: Vec<u32>,
    // Per-net occupancy, so that rip-up removes exactly what the net added.
    net_usage: HashMap<NetId, HashMap<usize, u32>>,
}

impl DenseGrid {
    pub fn new(spec: &GridSpec) -> Result<Self> {
        if spec.layers.is_empty() || spec.columns == 0 || spec.rows == 0 {
            return Err(RouterError::EmptyGrid);
        }
        if spec.layers.len() > u8::MAX as usize {
            return Err(RouterError::InvalidGrid(format!(
                "{} layers exceeds the supported maximum of {}",
                spec.layers.len(),
                u8::MAX
            )));
        }
        let needed_cols = spec.columns as usize - 1;
        if spec.horizontal_dist.len() < needed_cols {
            return Err(RouterError::InvalidGrid(format!(
                "{} columns need at least {} horizontal distances, got {}",
                spec.columns,
                needed_cols,
                spec.horizontal_dist.len()
            )));
        }
        let needed_rows = spec.rows as usize - 1;
        if spec.vertical_dist.len() < needed_rows {
            return Err(RouterError::InvalidGrid(format!(
                "{} rows need at least {} vertical distances, got {}",
                spec.rows,
                needed_rows,
                spec.vertical_dist.len()
            )));
        }

        let plane = spec.columns as usize * spec.rows as usize;
        let size = plane * spec.layers.len();
        if size > 200_000_000 {
            log::warn!(
                "Allocating large DenseGrid: {} GCells. Ensure sufficient RAM.",
                size
            );
        }

        let mut capacity = Vec::with_capacity(size);
        for layer in &spec.layers {
            capacity.extend(std::iter::repeat_n(layer.capacity, plane));
        }

        let mut grid = Self {
            layers: spec
                .layers
                .iter()
                .map(|l| LayerInfo {
                    direction: l.direction,
                })
                .collect(),
            x_size: spec.columns,
            y_size: spec.rows,
            horizontal_dist: spec.horizontal_dist.clone(),
            vertical_dist: spec.vertical_dist.clone(),
            via_cost: spec.via_cost,
            capacity,
            demand: vec![0; size],
            net_usage: HashMap::new(),
        };

        for ov in &spec.capacity_overrides {
            if !grid.contains(ov.cell) {
                return Err(RouterError::InvalidGrid(format!(
                    "capacity override at {} is outside the grid",
                    ov.cell
                )));
            }
            let idx = grid.index(ov.cell);
            grid.capacity[idx] = ov.capacity;
        }

        Ok(grid)
    }

    /// GCells currently held by `net`, with multiplicity.
    pub fn net_occupancy(&self, net: NetId) -> usize {
        self.net_usage
            .get(&net)
            .map(|cells| cells.values().map(|&n| n as usize).sum())
            .unwrap_or(0)
    }

    #[inline(always)]
    fn index(&self, coord: Coord3D) -> usize {
        (coord.layer as usize) * (self.x_size as usize) * (self.y_size as usize)
            + (coord.row as usize) * (self.x_size as usize)
            + (coord.col as usize)
    }
}

impl RoutingGrid for DenseGrid {
    fn num_layers(&self) -> u8 {
        self.layers.len() as u8
    }
    fn x_size(&self) -> u32 {
        self.x_size
    }
    fn y_size(&self) -> u32 {
        self.y_size
    }

    fn layer_info(&self, layer: u8) -> LayerInfo {
        self.layers[layer as usize]
    }

    #[inline(always)]
    fn gcell_index(&self, coord: Coord3D) -> usize {
        self.index(coord)
    }

    #[inline(always)]
    fn from_index(&self, index: usize) -> Coord3D {
        let plane = (self.x_size as usize) * (self.y_size as usize);
        let layer = index / plane;
        let rem = index % plane;
        Coord3D::new(
            layer as u8,
            (rem % self.x_size as usize) as u32,
            (rem / self.x_size as usize) as u32,
        )
    }

    fn horizontal_dist(&self, col: u32) -> u64 {
        self.horizontal_dist[col as usize]
    }

    fn vertical_dist(&self, row: u32) -> u64 {
        self.vertical_dist[row as usize]
    }

    fn wl_via_cost(&self) -> u64 {
        self.via_cost
    }

    #[inline(always)]
    fn demand_by_index(&self, index: usize) -> u32 {
        self.demand[index]
    }

    #[inline(always)]
    fn capacity_by_index(&self, index: usize) -> u32 {
        self.capacity[index]
    }

    fn add_demand_for_net_gcell(&mut self, net: NetId, coord: Coord3D) {
        let idx = self.index(coord);
        self.demand[idx] += 1;
        *self.net_usage.entry(net).or_default().entry(idx).or_insert(0) += 1;
    }

    fn remove_demand_for_net_gcell(&mut self, net: NetId, coord: Coord3D) -> Result<()> {
        let idx = self.index(coord);
        let cells = self
            .net_usage
            .get_mut(&net)
            .ok_or(RouterError::DemandUnderflow { net, cell: coord })?;
        let count = cells
            .get_mut(&idx)
            .ok_or(RouterError::DemandUnderflow { net, cell: coord })?;
        *count -= 1;
        if *count == 0 {
            cells.remove(&idx);
            if cells.is_empty() {
                self.net_usage.remove(&net);
            }
        }
        self.demand[idx] -= 1;
        Ok(())
    }

    fn reset_demand(&mut self) {
        self.demand.fill(0);
        self.net_usage.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::testing::{HV, uniform_grid};
    use groute_common::db::benchmark::{CapacityOverride, LayerSpec};
    use groute_common::db::core::LayerDirection;

    #[test]
    fn index_round_trips_every_gcell() {
        let grid = uniform_grid(&HV, 4, 3, 10, 5, 1);
        assert_eq!(grid.num_gcells(), 24);
        for i in 0..grid.num_gcells() {
            assert_eq!(grid.gcell_index(grid.from_index(i)), i);
        }
        assert_eq!(grid.gcell_index(Coord3D::new(1, 2, 1)), 12 + 4 + 2);
    }

    #[test]
    fn net_demand_is_reversible() {
        let mut grid = uniform_grid(&HV, 3, 3, 10, 5, 1);
        let a = NetId::new(0);
        let b = NetId::new(1);
        let cell = Coord3D::new(0, 1, 1);

        grid.add_demand_for_net_gcell(a, cell);
        grid.add_demand_for_net_gcell(b, cell);
        assert_eq!(grid.demand(cell), 2);
        assert!(grid.is_overfull(cell));
        assert_eq!(grid.total_overflow(), 1);

        grid.remove_demand_for_net_gcell(a, cell).unwrap();
        assert_eq!(grid.demand(cell), 1);
        assert_eq!(grid.net_occupancy(a), 0);
        assert_eq!(grid.net_occupancy(b), 1);
        assert_eq!(grid.total_overflow(), 0);
    }

    #[test]
    fn removing_foreign_demand_fails() {
        let mut grid = uniform_grid(&HV, 3, 3, 10, 5, 1);
        let cell = Coord3D::new(0, 0, 0);
        grid.add_demand_for_net_gcell(NetId::new(0), cell);
        let err = grid
            .remove_demand_for_net_gcell(NetId::new(1), cell)
            .unwrap_err();
        assert!(matches!(err, RouterError::DemandUnderflow { .. }));
        assert_eq!(grid.demand(cell), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut grid = uniform_grid(&HV, 2, 2, 10, 5, 1);
        grid.add_demand_for_net_gcell(NetId::new(3), Coord3D::new(1, 1, 1));
        grid.reset_demand();
        assert_eq!(grid.demand(Coord3D::new(1, 1, 1)), 0);
        assert_eq!(grid.net_occupancy(NetId::new(3)), 0);
    }

    #[test]
    fn spec_validation() {
        let mut spec = GridSpec {
            layers: vec![LayerSpec {
                direction: LayerDirection::Horizontal,
                capacity: 2,
            }],
            columns: 3,
            rows: 2,
            horizontal_dist: vec![1],
            vertical_dist: vec![1],
            via_cost: 1,
            capacity_overrides: Vec::new(),
        };
        assert!(matches!(
            DenseGrid::new(&spec),
            Err(RouterError::InvalidGrid(_))
        ));

        spec.horizontal_dist = vec![1, 1];
        spec.capacity_overrides.push(CapacityOverride {
            cell: Coord3D::new(0, 2, 1),
            capacity: 0,
        });
        let grid = DenseGrid::new(&spec).unwrap();
        assert_eq!(grid.capacity(Coord3D::new(0, 2, 1)), 0);
        assert_eq!(grid.capacity(Coord3D::new(0, 1, 1)), 2);

        spec.layers.clear();
        assert!(matches!(DenseGrid::new(&spec), Err(RouterError::EmptyGrid)));
    }
}
