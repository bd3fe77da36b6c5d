//! Error types for derm-topology.

use thiserror::Error;

/// Result type for derm-topology operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or manipulating grid indices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A character outside '0'..='6' appeared in a digit string.
    #[error("invalid digit '{digit}' in index '{input}'")]
    InvalidDigit { digit: char, input: String },

    /// Two non-zero digits appeared next to each other.
    #[error("invalid consecutive non-zero digits in index '{0}'")]
    ConsecutiveNonZeroDigits(String),

    /// The digit string does not fit in a sub-index.
    #[error("too many digits: {0}")]
    TooManyDigits(usize),

    /// The face/vertex token is not one of 1..=12 or 'A'..='T'.
    #[error("invalid primary resolution '{0}'")]
    InvalidPrimary(String),

    /// The index is well formed but addresses no cell (pentagon gap, bad face child).
    #[error("invalid index '{0}'")]
    InvalidIndex(String),

    /// A direction value outside 1..=6.
    #[error("invalid direction {0}")]
    InvalidDirection(i32),

    /// The requested resolution is outside the supported range.
    #[error("invalid resolution {0}")]
    InvalidResolution(i32),

    /// An addition carried past the allowed resolution.
    #[error("index resolution has increased past {0}")]
    ResolutionOverflow(i32),

    /// The resolution cannot be reduced any further.
    #[error("cannot reduce resolution below {0}")]
    ResolutionUnderflow(i32),

    /// The operation needs a non-null index.
    #[error("null index")]
    NullIndex,

    /// The child does not descend from the given parent.
    #[error("'{child}' is not a descendant of '{parent}'")]
    NotDescendant { parent: String, child: String },

    /// The position is past the last descendant of the root.
    #[error("position {position} out of range for '{root}' at resolution {resolution}")]
    PositionOutOfRange {
        root: String,
        resolution: i32,
        position: u64,
    },
}
