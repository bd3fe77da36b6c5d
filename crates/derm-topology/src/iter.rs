//! Depth-first enumeration of the cells of one resolution.

use std::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::icos_math::{children, subtree_cell_count};
use crate::index::{GlobalIndex, Primary, MAX_RESOLUTION};

/// Iterator over cells at a fixed resolution in cell-position order.
///
/// Built either over the whole sphere ([`CellIter::global`]) or over the
/// descendants of one root ([`CellIter::descendants`]).
#[derive(Debug, Clone)]
pub struct CellIter {
    resolution: i32,
    stack: Vec<GlobalIndex>,
    remaining: u64,
}

impl CellIter {
    /// Every cell of `resolution`, starting with vertex 1.
    pub fn global(resolution: i32) -> Result<Self> {
        if !(1..=MAX_RESOLUTION).contains(&resolution) {
            return Err(Error::InvalidResolution(resolution));
        }
        let roots: Vec<GlobalIndex> = Primary::all().map(GlobalIndex::from_primary).collect();
        let mut remaining = 0u64;
        for root in &roots {
            remaining = remaining.saturating_add(subtree_cell_count(root, resolution)?);
        }
        tracing::debug!(resolution, cells = remaining, "iterating every cell");
        Ok(Self {
            resolution,
            stack: roots.into_iter().rev().collect(),
            remaining,
        })
    }

    /// Descendants of `root` at `resolution`, the root itself when the
    /// resolutions match.
    pub fn descendants(root: &GlobalIndex, resolution: i32) -> Result<Self> {
        let remaining = subtree_cell_count(root, resolution)?;
        Ok(Self {
            resolution,
            stack: vec![root.clone()],
            remaining,
        })
    }

    pub fn resolution(&self) -> i32 {
        self.resolution
    }
}

impl Iterator for CellIter {
    type Item = GlobalIndex;

    fn next(&mut self) -> Option<GlobalIndex> {
        while let Some(index) = self.stack.pop() {
            if index.resolution() >= self.resolution {
                self.remaining = self.remaining.saturating_sub(1);
                return Some(index);
            }
            self.stack.extend(children(&index).into_iter().rev());
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for CellIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use crate::direction::{HexClass, HexDirection};
    use crate::icos_math::{cell_count, global_cell_position};

    fn gi(s: &str) -> GlobalIndex {
        s.parse().unwrap()
    }

    #[test]
    fn global_iteration_matches_cell_counts() {
        for resolution in 1..=5 {
            let it = CellIter::global(resolution).unwrap();
            let expected = cell_count(resolution).unwrap();
            assert_eq!(it.size_hint().0 as u64, expected);
            assert_eq!(it.count() as u64, expected);
        }
        assert!(CellIter::global(0).is_err());
    }

    #[test]
    fn global_iteration_is_in_position_order() {
        for (n, index) in CellIter::global(2).unwrap().enumerate() {
            assert_eq!(global_cell_position(&index).unwrap(), n as u64, "{index}");
        }
    }

    #[test]
    fn descendants_are_unique_and_valid() {
        let mut cells: Vec<GlobalIndex> = CellIter::descendants(&gi("A-0"), 5).unwrap().collect();
        assert_eq!(cells.len(), 55);
        assert!(cells.iter().all(|c| c.is_valid() && c.resolution() == 5));
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 55);
    }

    #[test]
    fn root_at_target_resolution_yields_itself() {
        let cells: Vec<GlobalIndex> = CellIter::descendants(&gi("3-20"), 3).unwrap().collect();
        assert_eq!(cells, [gi("3-20")]);
    }

    /// Walk once around every cell of a resolution and check the cursor
    /// comes back to where it started.
    fn walk_around_every_cell(resolution: i32) {
        let pentagon_turn = i32::from(HexClass::of(resolution) == HexClass::ClassII);
        for index in CellIter::global(resolution).unwrap() {
            let mut c = Cursor::new(index.clone(), HexDirection::Two);
            for neighbour in 0..index.num_sides() {
                c.forward();
                if c.index().is_pentagon() {
                    c.left_n(pentagon_turn);
                } else {
                    c.left();
                }
                if neighbour == 0 {
                    c.left();
                }
            }
            c.left();
            c.forward();
            assert_eq!(c.index(), &index, "walk around {index}");
        }
    }

    #[test]
    fn cursor_circles_every_cell_at_resolution_2() {
        walk_around_every_cell(2);
    }
}
