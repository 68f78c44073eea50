use crate::grid::RoutingGrid;
use groute_common::geom::coord::Coord3D;

/// Physical Manhattan lower bound on the remaining cost to a target.
///
/// Column and row pitches are turned into prefix sums once, so an estimate
/// is two subtractions and a layer check. Congestion is ignored, which keeps
/// the bound admissible; it is also consistent because every edge changes
/// it by at most its base cost.
pub struct PitchHeuristic {
    col_offset: Vec<u64>,
    row_offset: Vec<u64>,
    via_cost: u64,
    coords: Vec<Coord3D>,
}

impl PitchHeuristic {
    pub fn new<G: RoutingGrid + ?Sized>(grid: &G) -> Self {
        let mut col_offset = Vec::with_capacity(grid.x_size() as usize);
        let mut acc = 0u64;
        for col in 0..grid.x_size() {
            col_offset.push(acc);
            if col + 1 < grid.x_size() {
                acc += grid.horizontal_dist(col);
            }
        }

        let mut row_offset = Vec::with_capacity(grid.y_size() as usize);
        acc = 0;
        for row in 0..grid.y_size() {
            row_offset.push(acc);
            if row + 1 < grid.y_size() {
                acc += grid.vertical_dist(row);
            }
        }

        Self {
            col_offset,
            row_offset,
            via_cost: grid.wl_via_cost(),
            coords: (0..grid.num_gcells()).map(|i| grid.from_index(i)).collect(),
        }
    }

    #[inline(always)]
    pub fn estimate(&self, from: usize, to: usize) -> u64 {
        let a = self.coords[from];
        let b = self.coords[to];
        let dx = self.col_offset[a.col as usize].abs_diff(self.col_offset[b.col as usize]);
        let dy = self.row_offset[a.row as usize].abs_diff(self.row_offset[b.row as usize]);
        let via = if a.layer != b.layer { self.via_cost } else { 0 };
        dx + dy + via
    }
}
