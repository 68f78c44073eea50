use serde::{Deserialize, Serialize};
use std::fmt;

/// A GCell address: `(layer, column, row)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord3D {
    pub layer: u8,
    pub col: u32,
    pub row: u32,
}

impl Coord3D {
    pub fn new(layer: u8, col: u32, row: u32) -> Self {
        Self { layer, col, row }
    }

    /// Column plus row distance, ignoring layers.
    pub fn planar_distance(&self, other: &Coord3D) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }

    /// True when `other` is exactly one column, one row or one layer away.
    pub fn is_adjacent(&self, other: &Coord3D) -> bool {
        let dl = self.layer.abs_diff(other.layer) as u32;
        let dc = self.col.abs_diff(other.col);
        let dr = self.row.abs_diff(other.row);
        dl + dc + dr == 1
    }
}

impl fmt::Display for Coord3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.layer, self.col, self.row)
    }
}
