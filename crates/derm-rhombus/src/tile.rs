//! Tiles of per-cell values.
//!
//! A [`Tile`] names every cell `depth` resolutions below a root cell. Values
//! are supplied from outside through the [`ValueTile`] trait, addressed
//! either by cell or by the cell's depth-first position under the root.

use std::fmt;
use std::sync::Arc;

use derm_topology::{cell_position, subtree_cell_count, CellIter, GlobalIndex};

use crate::error::Result;

/// The cells `depth` resolutions below `root`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    root: GlobalIndex,
    depth: i32,
}

impl Tile {
    pub fn new(root: GlobalIndex, depth: i32) -> Self {
        Self { root, depth }
    }

    pub fn root(&self) -> &GlobalIndex {
        &self.root
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Resolution of the cells in the tile.
    pub fn cell_resolution(&self) -> i32 {
        self.root.resolution() + self.depth
    }

    pub fn cell_count(&self) -> Result<u64> {
        Ok(subtree_cell_count(&self.root, self.cell_resolution())?)
    }

    pub fn contains(&self, index: &GlobalIndex) -> bool {
        index.resolution() == self.cell_resolution() && self.root.is_ancestor_of(index)
    }

    /// Cells of the tile in position order.
    pub fn cells(&self) -> Result<CellIter> {
        Ok(CellIter::descendants(&self.root, self.cell_resolution())?)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.root, self.depth)
    }
}

/// Source of per-cell values for one tile.
///
/// `None` means the cell has no value on that channel.
pub trait ValueTile {
    type Value;

    fn tile(&self) -> &Tile;

    fn value_at(&self, position: u64, channel: usize) -> Option<Self::Value>;

    fn value(&self, index: &GlobalIndex, channel: usize) -> Option<Self::Value> {
        let position = cell_position(self.tile().root(), index).ok()?;
        self.value_at(position, channel)
    }
}

impl<T: ValueTile + ?Sized> ValueTile for Arc<T> {
    type Value = T::Value;

    fn tile(&self) -> &Tile {
        (**self).tile()
    }

    fn value_at(&self, position: u64, channel: usize) -> Option<T::Value> {
        (**self).value_at(position, channel)
    }

    fn value(&self, index: &GlobalIndex, channel: usize) -> Option<T::Value> {
        (**self).value(index, channel)
    }
}

/// Dense in-memory value tile, one slot per cell and channel.
#[derive(Debug, Clone)]
pub struct MemoryTile<V> {
    tile: Tile,
    channels: Vec<Vec<Option<V>>>,
}

impl<V: Clone> MemoryTile<V> {
    /// A tile with `channels` channels and no values.
    pub fn new(tile: Tile, channels: usize) -> Result<Self> {
        let cells = tile.cell_count()? as usize;
        Ok(Self {
            tile,
            channels: vec![vec![None; cells]; channels],
        })
    }

    /// A single-channel tile filled cell by cell.
    pub fn from_fn(tile: Tile, mut f: impl FnMut(&GlobalIndex) -> Option<V>) -> Result<Self> {
        let values = tile.cells()?.map(|index| f(&index)).collect();
        Ok(Self {
            tile,
            channels: vec![values],
        })
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// # Panics
    ///
    /// Panics if `channel` or `position` is out of range.
    pub fn set_at(&mut self, position: u64, channel: usize, value: Option<V>) {
        self.channels[channel][position as usize] = value;
    }

    pub fn set(&mut self, index: &GlobalIndex, channel: usize, value: Option<V>) -> Result<()> {
        let position = cell_position(self.tile.root(), index)?;
        self.set_at(position, channel, value);
        Ok(())
    }
}

impl<V: Clone> ValueTile for MemoryTile<V> {
    type Value = V;

    fn tile(&self) -> &Tile {
        &self.tile
    }

    fn value_at(&self, position: u64, channel: usize) -> Option<V> {
        self.channels
            .get(channel)?
            .get(usize::try_from(position).ok()?)?
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gi(s: &str) -> GlobalIndex {
        s.parse().unwrap()
    }

    #[test]
    fn tile_covers_descendants_at_its_depth() {
        let tile = Tile::new(gi("A-0"), 2);
        assert_eq!(tile.cell_resolution(), 4);
        assert_eq!(tile.cell_count().unwrap(), 13);
        assert!(tile.contains(&gi("A-000")));
        assert!(!tile.contains(&gi("A-00")));
        assert!(!tile.contains(&gi("B-000")));
        assert_eq!(tile.cells().unwrap().count(), 13);
        assert_eq!(tile.to_string(), "A-0+2");
    }

    #[test]
    fn memory_tile_answers_by_cell_and_position() {
        let tile = Tile::new(gi("A-0"), 2);
        let mut mem = MemoryTile::from_fn(tile, |index| Some(index.to_string())).unwrap();
        assert_eq!(mem.value(&gi("A-000"), 0).as_deref(), Some("A-000"));
        assert_eq!(mem.value_at(0, 0).as_deref(), Some("A-000"));
        assert_eq!(mem.value(&gi("B-000"), 0), None);
        assert_eq!(mem.value_at(0, 1), None);
        assert_eq!(mem.value_at(99, 0), None);

        mem.set(&gi("A-000"), 0, None).unwrap();
        assert_eq!(mem.value(&gi("A-000"), 0), None);
    }

    #[test]
    fn arc_tiles_delegate() {
        let tile = Tile::new(gi("3-0"), 1);
        let mut mem = MemoryTile::new(tile.clone(), 2).unwrap();
        mem.set_at(1, 1, Some(7u8));
        let shared = Arc::new(mem);
        assert_eq!(shared.tile(), &tile);
        assert_eq!(shared.value_at(1, 1), Some(7));
        assert_eq!(shared.channel_count(), 2);
    }
}
