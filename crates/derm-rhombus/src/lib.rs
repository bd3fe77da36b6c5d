//! DERM Rhombus Tiling
//!
//! Rhombic patches of the DERM grid, parameterised by UV coordinates, and
//! the machinery to fill them with per-cell values.
//!
//! # Rhombi
//!
//! A [`Rhombus`] is spanned by four adjacent cells. Cells an even number of
//! resolutions below the corners have integer UV coordinates; every two
//! resolutions a rhombus splits into nine sub-rhombi. The 90 root rhombi of
//! resolution 2 cover the sphere.
//!
//! # Filling
//!
//! A [`RhombusFiller`] asks for the [`Tile`]s covering its rhombus, accepts
//! them as [`ValueTile`]s and walks the rhombus in UV order. A [`Lut`]
//! caches the walk for every rhombus of the same shape; [`LutCache`] keeps
//! tables in memory and on disk.

mod cache;
mod config;
mod error;
mod filler;
pub mod lut;
mod rhombus;
mod tile;
mod uv_cursor;

pub use cache::LutCache;
pub use config::{LutConfig, DEFAULT_MAX_ENTRIES};
pub use error::{Error, Result};
pub use filler::{FillerIter, Lookup, LutIter, RhombusFiller, UvValue};
pub use lut::{fingerprint, Lut};
pub use rhombus::{Rhombus, NUM_ROOT_RHOMBI};
pub use tile::{MemoryTile, Tile, ValueTile};
pub use uv_cursor::{RhombusCursor, UvCell};
