pub mod dense;

pub use dense::DenseGrid;

use crate::error::Result;
use groute_common::db::core::LayerInfo;
use groute_common::db::indices::NetId;
use groute_common::geom::coord::Coord3D;

/// Geometry and congestion state of a 3D GCell grid.
///
/// Vertex ids handed to the graph are the linear indices produced by
/// [`RoutingGrid::gcell_index`]; [`RoutingGrid::from_index`] is its inverse.
pub trait RoutingGrid {
    fn num_layers(&self) -> u8;
    fn x_size(&self) -> u32;
    fn y_size(&self) -> u32;

    fn layer_info(&self, layer: u8) -> LayerInfo;

    fn gcell_index(&self, coord: Coord3D) -> usize;
    fn from_index(&self, index: usize) -> Coord3D;

    /// Pitch between column `col` and `col + 1`.
    fn horizontal_dist(&self, col: u32) -> u64;
    /// Pitch between row `row` and `row + 1`.
    fn vertical_dist(&self, row: u32) -> u64;
    fn wl_via_cost(&self) -> u64;

    fn demand_by_index(&self, index: usize) -> u32;
    fn capacity_by_index(&self, index: usize) -> u32;

    fn add_demand_for_net_gcell(&mut self, net: NetId, coord: Coord3D);
    /// Exact inverse of [`RoutingGrid::add_demand_for_net_gcell`].
    fn remove_demand_for_net_gcell(&mut self, net: NetId, coord: Coord3D) -> Result<()>;
    fn reset_demand(&mut self);

    fn num_gcells(&self) -> usize {
        self.num_layers() as usize * self.x_size() as usize * self.y_size() as usize
    }

    fn contains(&self, coord: Coord3D) -> bool {
        coord.layer < self.num_layers() && coord.col < self.x_size() && coord.row < self.y_size()
    }

    fn demand(&self, coord: Coord3D) -> u32 {
        self.demand_by_index(self.gcell_index(coord))
    }

    fn capacity(&self, coord: Coord3D) -> u32 {
        self.capacity_by_index(self.gcell_index(coord))
    }

    fn overflow_by_index(&self, index: usize) -> u32 {
        self.demand_by_index(index)
            .saturating_sub(self.capacity_by_index(index))
    }

    fn is_overfull(&self, coord: Coord3D) -> bool {
        self.demand(coord) > self.capacity(coord)
    }

    fn total_overflow(&self) -> u64 {
        (0..self.num_gcells())
            .map(|i| self.overflow_by_index(i) as u64)
            .sum()
    }
}
