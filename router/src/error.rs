use groute_common::db::indices::NetId;
use groute_common::geom::coord::Coord3D;

pub type Result<T> = std::result::Result<T, RouterError>;

/// Conditions the router cannot recover from.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("net '{net}' has pin {pin} outside the {layers}x{columns}x{rows} grid")]
    PinOutOfBounds {
        net: String,
        pin: Coord3D,
        layers: u8,
        columns: u32,
        rows: u32,
    },
    #[error("invalid grid: {0}")]
    InvalidGrid(String),
    #[error("grid has no GCells")]
    EmptyGrid,
    #[error("{net:?} does not occupy GCell {cell}")]
    DemandUnderflow { net: NetId, cell: Coord3D },
}
