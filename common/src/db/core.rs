use crate::db::indices::NetId;
use crate::geom::coord::Coord3D;
use serde::{Deserialize, Serialize};

/// Preferred wiring direction of a routing layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerDirection {
    #[serde(rename = "H")]
    Horizontal,
    #[serde(rename = "V")]
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerInfo {
    pub direction: LayerDirection,
}

/// A two-pin net.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Net {
    pub name: String,
    pub pin1: Coord3D,
    pub pin2: Coord3D,
}

impl Net {
    pub fn new(name: impl Into<String>, pin1: Coord3D, pin2: Coord3D) -> Self {
        Self {
            name: name.into(),
            pin1,
            pin2,
        }
    }

    /// Planar Manhattan span between the two pins, in GCells.
    pub fn span(&self) -> u32 {
        self.pin1.planar_distance(&self.pin2)
    }
}

/// A straight wire between two GCells, or a via between adjacent layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub from: Coord3D,
    pub to: Coord3D,
}

impl Segment {
    pub fn new(from: Coord3D, to: Coord3D) -> Self {
        Self { from, to }
    }

    pub fn is_via(&self) -> bool {
        self.from.layer != self.to.layer
    }

    /// Planar segments run along one row or one column of a single layer.
    /// Vias connect adjacent layers at the same column and row.
    pub fn is_well_formed(&self) -> bool {
        if self.is_via() {
            self.from.col == self.to.col
                && self.from.row == self.to.row
                && self.from.layer.abs_diff(self.to.layer) == 1
        } else {
            self.from.col == self.to.col || self.from.row == self.to.row
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    Layer,
    Col,
    Row,
}

fn step_axis(a: Coord3D, b: Coord3D) -> Axis {
    if a.layer != b.layer {
        Axis::Layer
    } else if a.col != b.col {
        Axis::Col
    } else {
        Axis::Row
    }
}

/// The committed route of one net.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutedNet {
    pub name: String,
    pub segments: Vec<Segment>,
}

impl RoutedNet {
    /// Builds segments from a GCell walk. Consecutive steps along the same
    /// planar axis collapse into one segment; every layer change is a via.
    pub fn from_path(name: impl Into<String>, path: &[Coord3D]) -> Self {
        let mut segments = Vec::new();
        if path.len() >= 2 {
            let mut start = path[0];
            let mut axis = step_axis(path[0], path[1]);
            for w in path.windows(2).skip(1) {
                let next_axis = step_axis(w[0], w[1]);
                if next_axis != axis || axis == Axis::Layer {
                    segments.push(Segment::new(start, w[0]));
                    start = w[0];
                    axis = next_axis;
                }
            }
            segments.push(Segment::new(start, path[path.len() - 1]));
        }
        Self {
            name: name.into(),
            segments,
        }
    }

    pub fn num_vias(&self) -> usize {
        self.segments.iter().filter(|s| s.is_via()).count()
    }
}

/// Routed nets indexed by net position in the input list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoutingResult {
    pub nets: Vec<RoutedNet>,
}

impl RoutingResult {
    pub fn with_nets(count: usize) -> Self {
        Self {
            nets: vec![RoutedNet::default(); count],
        }
    }

    pub fn set(&mut self, id: NetId, routed: RoutedNet) {
        self.nets[id.index()] = routed;
    }

    pub fn total_segments(&self) -> usize {
        self.nets.iter().map(|n| n.segments.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(layer: u8, col: u32, row: u32) -> Coord3D {
        Coord3D::new(layer, col, row)
    }

    #[test]
    fn collinear_steps_merge() {
        let path = [c(0, 0, 0), c(0, 1, 0), c(0, 2, 0), c(1, 2, 0), c(1, 2, 1), c(1, 2, 2)];
        let routed = RoutedNet::from_path("n0", &path);
        assert_eq!(
            routed.segments,
            vec![
                Segment::new(c(0, 0, 0), c(0, 2, 0)),
                Segment::new(c(0, 2, 0), c(1, 2, 0)),
                Segment::new(c(1, 2, 0), c(1, 2, 2)),
            ]
        );
        assert_eq!(routed.num_vias(), 1);
        assert!(routed.segments.iter().all(|s| s.is_well_formed()));
    }

    #[test]
    fn via_stack_keeps_one_segment_per_layer() {
        let path = [c(0, 3, 3), c(1, 3, 3), c(2, 3, 3)];
        let routed = RoutedNet::from_path("stack", &path);
        assert_eq!(routed.segments.len(), 2);
        assert_eq!(routed.num_vias(), 2);
    }

    #[test]
    fn single_cell_path_has_no_segments() {
        let routed = RoutedNet::from_path("dot", &[c(0, 1, 1)]);
        assert!(routed.segments.is_empty());
    }
}
