//! Walks a rhombus row by row in UV order.
//!
//! Two grid cursors move in lockstep: one along the V edge of the rhombus,
//! one along the current row. At odd depths the walk runs at the next even
//! depth and keeps the centroid cells, which stand in for their parents.

use std::iter::FusedIterator;

use derm_topology::{Cursor, GlobalIndex};

use crate::error::Result;
use crate::rhombus::Rhombus;

/// A cell reached by [`RhombusCursor`] and its coordinates.
///
/// At odd depths `u` and `v` are in units of the coarser lattice and
/// `offset` in `0..3` tells the three cells of one lattice point apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UvCell {
    pub u: i32,
    pub v: i32,
    pub offset: i32,
    pub index: GlobalIndex,
}

#[derive(Debug, Clone)]
pub struct RhombusCursor {
    u_cursor: Cursor,
    v_cursor: Cursor,
    index: GlobalIndex,
    depth: i32,
    odd: bool,
    max: i32,
    u: i32,
    v: i32,
    done: bool,
}

impl RhombusCursor {
    pub fn new(rhombus: &Rhombus, depth: i32) -> Result<Self> {
        let odd = depth % 2 != 0;
        let steps = if odd { depth + 1 } else { depth };

        let mut u_cursor = Cursor::new(rhombus.corner(0).clone(), rhombus.direction(0));
        for _ in 0..steps {
            u_cursor.zoom_in()?;
        }
        let mut v_cursor = u_cursor.clone();
        v_cursor.left();

        let mut cursor = Self {
            index: GlobalIndex::null(),
            u_cursor,
            v_cursor,
            depth,
            odd,
            max: Rhombus::uv_max(steps),
            u: 0,
            v: 0,
            done: false,
        };
        cursor.sync_index();
        Ok(cursor)
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn is_odd_depth(&self) -> bool {
        self.odd
    }

    /// Largest reported coordinate.
    pub fn max_uv(&self) -> i32 {
        if self.odd {
            self.max / 3
        } else {
            self.max
        }
    }

    /// Number of distinct `(u, v, offset)` triples.
    pub fn slot_count(&self) -> usize {
        let side = (self.max_uv() + 1) as usize;
        side * side * if self.odd { 3 } else { 1 }
    }

    /// The current cell, `None` once the walk is over.
    pub fn current(&self) -> Option<UvCell> {
        if self.done {
            return None;
        }
        let (u, v, offset) = if self.odd {
            (self.u / 3, self.v / 3, self.v % 3)
        } else {
            (self.u, self.v, 0)
        };
        Some(UvCell {
            u,
            v,
            offset,
            index: self.index.clone(),
        })
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Step to the next cell of the walk.
    pub fn advance(&mut self) {
        loop {
            if self.u == self.max && self.v == self.max {
                self.done = true;
                return;
            }
            if self.u == self.max {
                self.v += 1;
                self.v_cursor.forward();
                self.u_cursor = self.v_cursor.clone();
                self.u_cursor.right();
                self.u = 0;
            } else {
                self.u_cursor.forward();
                self.u += 1;
            }
            if !self.odd || self.u_cursor.index().has_vertex_children() {
                break;
            }
        }
        self.sync_index();
    }

    fn sync_index(&mut self) {
        self.index = self.u_cursor.index().clone();
        if self.odd {
            // Centroid child to parent.
            self.index.sub_index_mut().strip_right();
        }
    }
}

impl Iterator for RhombusCursor {
    type Item = UvCell;

    fn next(&mut self) -> Option<UvCell> {
        let cell = self.current()?;
        self.advance();
        Some(cell)
    }
}

impl FusedIterator for RhombusCursor {}

#[cfg(test)]
mod tests {
    use super::*;
    use derm_topology::HexDirection;
    use std::collections::HashSet;

    fn rhombus(s: &str, dir: HexDirection) -> Rhombus {
        Rhombus::new(s.parse().unwrap(), dir)
    }

    fn zoomed(index: &GlobalIndex, levels: i32) -> GlobalIndex {
        let mut index = index.clone();
        index.set_resolution(index.resolution() + levels).unwrap();
        index
    }

    #[test]
    fn even_depth_visits_the_whole_lattice() {
        let r = rhombus("3-205", HexDirection::Four);
        let cursor = RhombusCursor::new(&r, 2).unwrap();
        assert_eq!(cursor.max_uv(), 3);
        assert_eq!(cursor.slot_count(), 16);

        let cells: Vec<UvCell> = cursor.collect();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0].index, zoomed(r.corner(0), 2));
        assert_eq!((cells[1].u, cells[1].v), (1, 0));
        assert_eq!((cells[4].u, cells[4].v), (0, 1));
        let last = cells.last().unwrap();
        assert_eq!((last.u, last.v, last.offset), (3, 3, 0));

        let unique: HashSet<_> = cells.iter().map(|c| c.index.clone()).collect();
        assert_eq!(unique.len(), 16);
        for cell in &cells {
            assert_eq!(cell.index.resolution(), r.resolution() + 2);
        }
    }

    #[test]
    fn odd_depth_reports_parents_with_offsets() {
        let r = rhombus("3-205", HexDirection::Four);
        let cursor = RhombusCursor::new(&r, 1).unwrap();
        assert!(cursor.is_odd_depth());
        assert_eq!(cursor.max_uv(), 1);
        assert_eq!(cursor.slot_count(), 12);

        let cells: Vec<UvCell> = cursor.collect();
        assert!(!cells.is_empty());
        let mut slots = HashSet::new();
        let mut indices = HashSet::new();
        for cell in &cells {
            assert!((0..=1).contains(&cell.u) && (0..=1).contains(&cell.v));
            assert!((0..3).contains(&cell.offset));
            assert_eq!(cell.index.resolution(), r.resolution() + 1);
            assert!(slots.insert((cell.u, cell.v, cell.offset)), "{cell:?}");
            assert!(indices.insert(cell.index.clone()), "{cell:?}");
        }
        assert_eq!(cells[0].index, zoomed(r.corner(0), 1));
    }

    #[test]
    fn every_root_rhombus_walks_distinct_slots() {
        for number in 0..crate::rhombus::NUM_ROOT_RHOMBI {
            let r = Rhombus::from_root_number(number).unwrap();
            for depth in 0..=4 {
                let cursor = RhombusCursor::new(&r, depth).unwrap();
                let (max, slots) = (cursor.max_uv(), cursor.slot_count());
                let mut seen = HashSet::new();
                for cell in cursor {
                    assert!((0..=max).contains(&cell.u), "{r} depth {depth}: {cell:?}");
                    assert!((0..=max).contains(&cell.v), "{r} depth {depth}: {cell:?}");
                    assert!(
                        seen.insert((cell.u, cell.v, cell.offset)),
                        "{r} depth {depth}: {cell:?} repeated"
                    );
                }
                if depth % 2 == 0 {
                    assert_eq!(seen.len(), slots, "{r} depth {depth}");
                } else {
                    assert!(seen.len() <= slots, "{r} depth {depth}");
                }
            }
        }
    }

    #[test]
    fn walk_ends_and_stays_ended() {
        let r = rhombus("A-040", HexDirection::Four);
        let mut cursor = RhombusCursor::new(&r, 0).unwrap();
        assert_eq!(cursor.by_ref().count(), 4);
        assert!(cursor.is_done());
        assert_eq!(cursor.next(), None);
    }
}
