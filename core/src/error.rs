use crate::codec::CodecError;
use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("grid size {grid_size} exceeds the maximum of {max}")]
    GridTooLarge { grid_size: u32, max: u32 },
    #[error("piece size must be a positive finite number, got {0}")]
    InvalidPieceSize(f32),
    #[error("{name} must be a finite number, got {value}")]
    InvalidThreshold { name: &'static str, value: f32 },
    #[error("cell ({x}, {y}) is outside a {grid_size}x{grid_size} grid")]
    CellOutOfRange { x: u32, y: u32, grid_size: u32 },
    #[error("cell ({x}, {y}) appears in more than one group")]
    DuplicateCell { x: u32, y: u32 },
    #[error("group {index} has no pieces")]
    EmptyGroup { index: usize },
    #[error("{count} of {total} pieces are not assigned to any group")]
    MissingPieces { count: usize, total: usize },
    #[error("tray layout covers {found} pieces, expected {expected}")]
    LayoutMismatch { expected: usize, found: usize },
    #[error("unsupported snapshot version {found}, expected {expected}")]
    SnapshotVersion { expected: u32, found: u32 },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}
