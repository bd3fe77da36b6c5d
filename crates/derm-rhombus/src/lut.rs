//! Rhombus lookup tables.
//!
//! A [`Lut`] maps every `(u, v, offset)` slot of a rhombus walk to the
//! corner whose subtree holds the cell and the cell's position in that
//! subtree. Rhombi with the same shape (hemisphere, pentagon or hexagon,
//! class, centroid or vertex, direction for each corner) share a table, so
//! tables are keyed by a [`fingerprint`] and persisted to disk.
//!
//! # File format
//!
//! ```text
//! "RLT\0"            magic
//! u32 LE             version (1)
//! u64 LE             uncompressed payload length
//! u64 LE             compressed payload length
//! [u8]               zlib stream
//! ```
//!
//! The payload holds one corner byte per slot ([`EMPTY_SLOT`] when no cell
//! maps there) followed by one little-endian `i32` position per slot.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use derm_topology::cell_position;

use crate::error::{Error, Result};
use crate::rhombus::Rhombus;
use crate::uv_cursor::RhombusCursor;

pub const LUT_MAGIC: [u8; 4] = *b"RLT\0";
pub const LUT_VERSION: u32 = 1;
pub const LUT_EXTENSION: &str = "rlut";

/// Corner byte of a slot no cell maps to.
pub const EMPTY_SLOT: u8 = 0xFF;

/// Deepest walk a table is built for.
pub const MAX_LUT_DEPTH: i32 = 12;

const HEADER_LEN: usize = 4 + 4 + 8 + 8;

/// Shape key shared by every rhombus whose table is identical.
pub fn fingerprint(rhombus: &Rhombus, depth: i32) -> String {
    let corners: Vec<String> = (0..4)
        .map(|corner| {
            let index = rhombus.corner(corner);
            format!(
                "{}{}{}{}{}",
                if index.is_northern() { 'N' } else { 'S' },
                if index.is_hexagon() { 'H' } else { 'P' },
                index.class().number(),
                if index.is_major() { 'C' } else { 'V' },
                rhombus.direction(corner),
            )
        })
        .collect();
    format!("{depth}_{}", corners.join("_"))
}

/// Slot table of one rhombus shape at one depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    key: String,
    depth: i32,
    max_uv: i32,
    odd: bool,
    corners: Vec<u8>,
    positions: Vec<i32>,
}

impl Lut {
    /// Walk `rhombus` at `depth` and record where every cell lives.
    pub fn generate(rhombus: &Rhombus, depth: i32) -> Result<Self> {
        if !(0..=MAX_LUT_DEPTH).contains(&depth) {
            return Err(derm_topology::Error::InvalidResolution(depth).into());
        }
        let key = fingerprint(rhombus, depth);
        let cursor = RhombusCursor::new(rhombus, depth)?;
        let mut lut = Self::empty(key, depth);
        debug_assert_eq!(lut.len(), cursor.slot_count());

        let mut filled = 0usize;
        for cell in cursor {
            let owner = rhombus.corners().iter().position(|c| c.is_ancestor_of(&cell.index));
            let Some(corner) = owner else {
                tracing::debug!(index = %cell.index, "cell outside every corner subtree");
                continue;
            };
            let position = cell_position(rhombus.corner(corner), &cell.index)?;
            let slot = lut.slot(cell.u, cell.v, cell.offset);
            lut.corners[slot] = corner as u8;
            lut.positions[slot] = position as i32;
            filled += 1;
        }

        tracing::debug!(key = %lut.key, slots = lut.len(), filled, "generated lookup table");
        Ok(lut)
    }

    fn empty(key: String, depth: i32) -> Self {
        let odd = depth % 2 != 0;
        let max_uv = Rhombus::uv_max(depth);
        let side = (max_uv + 1) as usize;
        let len = side * side * if odd { 3 } else { 1 };
        Self {
            key,
            depth,
            max_uv,
            odd,
            corners: vec![EMPTY_SLOT; len],
            positions: vec![0; len],
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn max_uv(&self) -> i32 {
        self.max_uv
    }

    pub fn is_odd_depth(&self) -> bool {
        self.odd
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.corners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_empty()
    }

    /// Number of slots a cell maps to.
    pub fn filled(&self) -> usize {
        self.corners.iter().filter(|&&c| c != EMPTY_SLOT).count()
    }

    /// Largest slot offset: 2 at odd depths, 0 otherwise.
    pub fn max_offset(&self) -> i32 {
        if self.odd {
            2
        } else {
            0
        }
    }

    /// # Panics
    ///
    /// Panics if the coordinates are out of range.
    pub fn slot(&self, u: i32, v: i32, offset: i32) -> usize {
        assert!(
            (0..=self.max_uv).contains(&u)
                && (0..=self.max_uv).contains(&v)
                && (0..=self.max_offset()).contains(&offset),
            "slot ({u}, {v}, {offset}) out of range"
        );
        let side = (self.max_uv + 1) as usize;
        side * v as usize + u as usize + side * side * offset as usize
    }

    /// Corner and position of the cell at `(u, v, offset)`, if any.
    pub fn entry(&self, u: i32, v: i32, offset: i32) -> Option<(usize, u64)> {
        let slot = self.slot(u, v, offset);
        match self.corners[slot] {
            EMPTY_SLOT => None,
            corner => Some((corner as usize, self.positions[slot] as u64)),
        }
    }

    /// Serialize to the on-disk format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut payload = Vec::with_capacity(self.len() * 5);
        payload.extend_from_slice(&self.corners);
        for position in &self.positions {
            payload.extend_from_slice(&position.to_le_bytes());
        }

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload)?;
        let compressed = encoder.finish()?;

        let mut out = Vec::with_capacity(HEADER_LEN + compressed.len());
        out.extend_from_slice(&LUT_MAGIC);
        out.extend_from_slice(&LUT_VERSION.to_le_bytes());
        out.extend_from_slice(&(payload.len() as u64).to_le_bytes());
        out.extend_from_slice(&(compressed.len() as u64).to_le_bytes());
        out.extend_from_slice(&compressed);
        Ok(out)
    }

    /// Parse a table for `key` at `depth` from the on-disk format.
    pub fn decode(key: impl Into<String>, depth: i32, bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(if bytes.len() >= 4 && bytes[..4] != LUT_MAGIC {
                Error::BadMagic
            } else {
                Error::Truncated
            });
        }
        let (header, body) = bytes.split_at(HEADER_LEN);
        if header[..4] != LUT_MAGIC {
            return Err(Error::BadMagic);
        }
        let version = u32::from_le_bytes(le_array(&header[4..8]));
        if version != LUT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let uncompressed = u64::from_le_bytes(le_array(&header[8..16])) as usize;
        let compressed = u64::from_le_bytes(le_array(&header[16..24])) as usize;
        if body.len() < compressed {
            return Err(Error::Truncated);
        }

        let mut lut = Self::empty(key.into(), depth);
        let expected = lut.len() * 5;
        if uncompressed != expected {
            return Err(Error::LengthMismatch {
                expected,
                found: uncompressed,
            });
        }

        let mut payload = Vec::with_capacity(expected);
        ZlibDecoder::new(&body[..compressed])
            .take(expected as u64 + 1)
            .read_to_end(&mut payload)?;
        if payload.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                found: payload.len(),
            });
        }

        let (corners, positions) = payload.split_at(lut.len());
        lut.corners.copy_from_slice(corners);
        for (slot, chunk) in lut.positions.iter_mut().zip(positions.chunks_exact(4)) {
            *slot = i32::from_le_bytes(le_array(chunk));
        }
        Ok(lut)
    }
}

fn le_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}
