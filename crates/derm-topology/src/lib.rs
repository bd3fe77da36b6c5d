//! DERM Grid Topology
//!
//! Addressing and navigation on the Discrete Earth Reference Model: an
//! aperture-3 hexagonal grid wrapped around an icosahedron.
//!
//! # Addressing
//!
//! Every cell is named by a [`GlobalIndex`]: one of the 12 icosahedron
//! vertices (`1`..`12`) or 20 faces (`A`..`T`), followed by a
//! [`SubIndex`] of base-7 digits. Digit 0 selects the centroid child,
//! digits 1..6 the vertex children in the six [`HexDirection`]s.
//! Resolutions alternate between two orientations ([`HexClass`]).
//!
//! # Navigation
//!
//! [`move_index`] steps to a neighbour across face and vertex boundaries,
//! reporting the rotation of the local frame. [`Cursor`] builds a turtle on
//! top of it. The 12 vertex cells are pentagons with one missing direction.
//!
//! # Enumeration
//!
//! Cells of a resolution have a dense depth-first position
//! ([`cell_position`], [`index_at_position`]) and can be walked with
//! [`CellIter`].

mod cursor;
mod direction;
mod error;
pub mod hex_math;
pub mod icos_math;
mod index;
mod iter;
mod sub_index;
mod tables;

pub use cursor::{gap_correction, Cursor};
pub use direction::{rotate_delta, HexClass, HexDirection, Rotation};
pub use error::{Error, Result};
pub use icos_math::{
    calc_ancestor, calc_descendant, cell_count, cell_position, children, face_owner,
    global_cell_position, index_at_position, is_valid_direction, move_index, neighbour,
    neighbour_direction, neighbours, parent, rotate_direction, subtree_cell_count,
};
pub use index::{GlobalIndex, Primary, MAX_RESOLUTION, NULL_LABEL};
pub use iter::CellIter;
pub use sub_index::{SubIndex, MAX_DIGITS};

/// Vertex cells of the icosahedron.
pub const NUM_VERTICES: usize = 12;

/// Face cells of the icosahedron.
pub const NUM_FACES: usize = 20;

/// Primary (resolution 1) cells.
pub const NUM_PRIMARIES: usize = 32;

const _: () = assert!(NUM_VERTICES + NUM_FACES == NUM_PRIMARIES);
