//! Fill a rhombus with values from externally supplied tiles.
//!
//! A [`RhombusFiller`] works pull-style. It lists the tiles it needs, the
//! caller fetches them from wherever they live and hands them back with
//! [`RhombusFiller::add_tile`], passing `None` for a tile known to have no
//! data. Once every tile has been answered the rhombus can be read cell by
//! cell, walked in UV order, or walked through a cached [`Lut`].

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use derm_topology::{cell_position, GlobalIndex};

use crate::cache::LutCache;
use crate::error::{Error, Result};
use crate::lut::{fingerprint, Lut};
use crate::rhombus::Rhombus;
use crate::tile::{Tile, ValueTile};
use crate::uv_cursor::{RhombusCursor, UvCell};

/// Outcome of a value lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    Value(V),
    /// The tile or the cell has no value.
    Absent,
}

impl<V> Lookup<V> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Lookup::Value(v) => Some(v),
            Lookup::Absent => None,
        }
    }

    pub fn into_option(self) -> Option<V> {
        match self {
            Lookup::Value(v) => Some(v),
            Lookup::Absent => None,
        }
    }
}

impl<V> From<Option<V>> for Lookup<V> {
    fn from(value: Option<V>) -> Self {
        value.map_or(Lookup::Absent, Lookup::Value)
    }
}

/// A value read through a lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UvValue<V> {
    pub u: i32,
    pub v: i32,
    pub offset: i32,
    pub value: Lookup<V>,
}

#[derive(Debug)]
pub struct RhombusFiller<T> {
    rhombus: Rhombus,
    depth: i32,
    tile_depth: i32,
    tiles: BTreeMap<GlobalIndex, Option<T>>,
    needed: Vec<GlobalIndex>,
}

impl<T: ValueTile> RhombusFiller<T> {
    /// Fill `rhombus` at `depth` from one tile per corner.
    pub fn new(rhombus: Rhombus, depth: i32) -> Self {
        let roots: BTreeSet<GlobalIndex> = rhombus.corners().iter().cloned().collect();
        Self::with_roots(rhombus, depth, depth, roots)
    }

    /// Fill `rhombus` at `depth` from tiles `tile_depth` deep.
    ///
    /// Tile roots are the corners' ancestors at the matching resolution,
    /// kept between resolution 2 and the corners' own resolution.
    pub fn with_tile_depth(rhombus: Rhombus, depth: i32, tile_depth: i32) -> Result<Self> {
        let corner_res = rhombus.resolution();
        let root_res = (corner_res + depth - tile_depth).clamp(2.min(corner_res), corner_res);
        let roots = rhombus
            .corners()
            .iter()
            .map(|corner| {
                let mut root = corner.clone();
                root.set_resolution(root_res)?;
                Ok(root)
            })
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self::with_roots(rhombus, depth, corner_res + depth - root_res, roots))
    }

    fn with_roots(
        rhombus: Rhombus,
        depth: i32,
        tile_depth: i32,
        roots: BTreeSet<GlobalIndex>,
    ) -> Self {
        tracing::debug!(%rhombus, depth, tile_depth, tiles = roots.len(), "new rhombus filler");
        Self {
            rhombus,
            depth,
            tile_depth,
            needed: roots.iter().cloned().collect(),
            tiles: roots.into_iter().map(|root| (root, None)).collect(),
        }
    }

    pub fn rhombus(&self) -> &Rhombus {
        &self.rhombus
    }

    /// Resolutions between the corners and the filled cells.
    pub fn resolution_depth(&self) -> i32 {
        self.depth
    }

    pub fn tile_depth(&self) -> i32 {
        self.tile_depth
    }

    /// Resolution of the filled cells.
    pub fn cell_resolution(&self) -> i32 {
        self.rhombus.resolution() + self.depth
    }

    pub fn is_ready(&self) -> bool {
        self.needed.is_empty()
    }

    pub fn needed_tile(&self) -> Option<Tile> {
        self.needed
            .first()
            .map(|root| Tile::new(root.clone(), self.tile_depth))
    }

    pub fn needed_tiles(&self) -> Vec<Tile> {
        self.needed
            .iter()
            .map(|root| Tile::new(root.clone(), self.tile_depth))
            .collect()
    }

    /// Answer a tile request. `None` records that the tile has no data.
    pub fn add_tile(&mut self, tile: &Tile, value: Option<T>) -> Result<()> {
        if tile.depth() != self.tile_depth || !self.tiles.contains_key(tile.root()) {
            return Err(Error::UnknownTile(tile.root().clone()));
        }
        if let Some(value) = &value {
            debug_assert_eq!(value.tile(), tile, "value tile does not match its request");
        }
        self.tiles.insert(tile.root().clone(), value);
        self.needed.retain(|root| root != tile.root());
        tracing::debug!(%tile, remaining = self.needed.len(), "tile added");
        Ok(())
    }

    /// True when every answered tile came back empty.
    pub fn all_tiles_absent(&self) -> bool {
        self.tiles.values().all(Option::is_none)
    }

    /// Value of `index` on `channel`.
    pub fn value(&self, index: &GlobalIndex, channel: usize) -> Result<Lookup<T::Value>> {
        self.ensure_ready()?;
        match self.tiles.iter().find(|(root, _)| root.is_ancestor_of(index)) {
            Some((_, Some(tile))) => Ok(tile.value(index, channel).into()),
            Some((_, None)) => Ok(Lookup::Absent),
            None => Err(Error::MissingCell(index.clone())),
        }
    }

    /// Walk the rhombus in UV order, reading `channel`.
    pub fn iter(&self, channel: usize) -> Result<FillerIter<'_, T>> {
        self.ensure_ready()?;
        Ok(FillerIter {
            filler: self,
            channel,
            cursor: RhombusCursor::new(&self.rhombus, self.depth)?,
        })
    }

    /// Walk the rhombus through its lookup table from `cache`.
    pub fn lut_iter(&self, channel: usize, cache: &LutCache) -> Result<LutIter<'_, T>> {
        self.ensure_ready()?;
        let lut = cache.get(&self.rhombus, self.depth)?;
        self.lut_iter_with(channel, lut)
    }

    /// Walk the rhombus through `lut`.
    ///
    /// # Panics
    ///
    /// Panics if `lut` was built for a different shape or depth.
    pub fn lut_iter_with(&self, channel: usize, lut: Arc<Lut>) -> Result<LutIter<'_, T>> {
        self.ensure_ready()?;
        assert_eq!(
            lut.key(),
            fingerprint(&self.rhombus, self.depth),
            "lookup table built for another rhombus shape"
        );

        let mut corners = Vec::with_capacity(4);
        for corner in self.rhombus.corners() {
            let (root, tile) = self
                .tiles
                .iter()
                .find(|(root, _)| root.is_ancestor_of(corner))
                .ok_or_else(|| Error::MissingCell(corner.clone()))?;
            let mut first = corner.clone();
            first.set_resolution(self.cell_resolution())?;
            corners.push((tile.as_ref(), cell_position(root, &first)?));
        }

        Ok(LutIter {
            corners,
            lut,
            channel,
            u: 0,
            v: 0,
            offset: 0,
            done: false,
        })
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(Error::NotReady(self.needed.len()))
        }
    }
}

/// UV walk over a ready filler. See [`RhombusFiller::iter`].
#[derive(Debug)]
pub struct FillerIter<'a, T> {
    filler: &'a RhombusFiller<T>,
    channel: usize,
    cursor: RhombusCursor,
}

impl<T: ValueTile> Iterator for FillerIter<'_, T> {
    type Item = Result<(UvCell, Lookup<T::Value>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let cell = self.cursor.next()?;
        Some(
            self.filler
                .value(&cell.index, self.channel)
                .map(|value| (cell, value)),
        )
    }
}

/// Lookup-table walk over a ready filler. See [`RhombusFiller::lut_iter`].
///
/// Slots no cell maps to are skipped.
#[derive(Debug)]
pub struct LutIter<'a, T> {
    corners: Vec<(Option<&'a T>, u64)>,
    lut: Arc<Lut>,
    channel: usize,
    u: i32,
    v: i32,
    offset: i32,
    done: bool,
}

impl<T> LutIter<'_, T> {
    fn step(&mut self) {
        let max = self.lut.max_uv();
        if self.u < max {
            self.u += 1;
        } else if self.v < max {
            self.u = 0;
            self.v += 1;
        } else if self.offset < self.lut.max_offset() {
            self.u = 0;
            self.v = 0;
            self.offset += 1;
        } else {
            self.done = true;
        }
    }
}

impl<T: ValueTile> Iterator for LutIter<'_, T> {
    type Item = UvValue<T::Value>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let (u, v, offset) = (self.u, self.v, self.offset);
            self.step();
            let Some((corner, position)) = self.lut.entry(u, v, offset) else {
                continue;
            };
            let (tile, first) = self.corners[corner];
            let value = match tile {
                Some(tile) => tile.value_at(first + position, self.channel).into(),
                None => Lookup::Absent,
            };
            return Some(UvValue {
                u,
                v,
                offset,
                value,
            });
        }
        None
    }
}
