//! Error types for derm-rhombus.

use derm_topology::GlobalIndex;
use thiserror::Error;

/// Result type for derm-rhombus operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while filling rhombi or reading lookup tables.
#[derive(Debug, Error)]
pub enum Error {
    #[error("topology error: {0}")]
    Topology(#[from] derm_topology::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("root rhombus number {0} out of range")]
    InvalidRootNumber(u32),

    /// The file does not start with the lookup table magic.
    #[error("bad lookup table magic")]
    BadMagic,

    #[error("unsupported lookup table version {0}")]
    UnsupportedVersion(u32),

    /// The file ended before the announced payload.
    #[error("lookup table file is truncated")]
    Truncated,

    /// The payload length does not match the table shape.
    #[error("lookup table length mismatch: expected {expected} bytes, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Tiles are still outstanding.
    #[error("filler is waiting for {0} tile(s)")]
    NotReady(usize),

    /// The tile was never requested by this filler.
    #[error("tile '{0}' was not requested")]
    UnknownTile(GlobalIndex),

    /// No requested tile covers the cell.
    #[error("no tile covers cell '{0}'")]
    MissingCell(GlobalIndex),
}
