//! Turtle-style navigation over the grid.
//!
//! A [`Cursor`] sits on a cell, faces a direction and remembers how far that
//! direction has been rotated since it was last reset. Moving across a
//! face boundary re-orients the local frame, so the cursor's direction is
//! rotated along with the sub-index to keep "straight ahead" straight.
//!
//! # Pentagons
//!
//! A pentagon has no cell in its gap direction. Facing the gap, or the two
//! directions beside it that lead into a distorted neighbourhood, the cursor
//! turns one step. Class I and class II resolutions turn in opposite senses
//! so that a walk around a pentagon closes. The rule lives in
//! [`gap_correction`].

use std::fmt;

use crate::direction::{rotate_delta, HexClass, HexDirection};
use crate::error::Result;
use crate::icos_math::{is_valid_direction, move_index, rotate_direction};
use crate::index::GlobalIndex;

/// Pentagon turn for `dir` on `index`, or `None` when no turn is needed.
///
/// `flip` is the class whose turn is clockwise; it differs between the
/// backward step and direction resolution.
pub fn gap_correction(index: &GlobalIndex, dir: HexDirection, flip: HexClass) -> Option<i32> {
    if !index.is_pentagon() {
        return None;
    }
    let gap = match index.primary() {
        Some(p) if p.vertex_number().is_some_and(|v| v <= 6) => 1,
        _ => 4,
    };
    let mut test = i32::from(dir.digit()) - gap;
    let mut delta = 1;
    if index.class() == flip {
        delta = -1;
        test = (test + 2) % 6;
    }
    (0..=2).contains(&test).then_some(delta)
}

/// A cell, a heading and the rotation accumulated since the last reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    index: GlobalIndex,
    dir: HexDirection,
    rotation: i32,
    initial_dir: HexDirection,
}

impl Cursor {
    /// Place a cursor on `index` facing `dir`, turning out of a pentagon gap.
    pub fn new(index: GlobalIndex, dir: HexDirection) -> Self {
        let mut cursor = Self {
            index,
            dir,
            rotation: 0,
            initial_dir: dir,
        };
        cursor.reset_frame();
        cursor
    }

    /// A cursor facing direction one.
    pub fn at(index: GlobalIndex) -> Self {
        Self::new(index, HexDirection::One)
    }

    pub fn index(&self) -> &GlobalIndex {
        &self.index
    }

    pub fn dir(&self) -> HexDirection {
        self.dir
    }

    /// Rotation accumulated since the last reset, in `0..6`.
    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    /// Heading at the last reset, expressed in the current frame.
    pub fn initial_dir(&self) -> HexDirection {
        self.initial_dir
    }

    pub fn reset(&mut self, index: GlobalIndex, dir: HexDirection) {
        self.index = index;
        self.dir = dir;
        self.reset_frame();
    }

    pub fn set_index(&mut self, index: GlobalIndex) {
        self.index = index;
        self.reset_frame();
    }

    pub fn set_dir(&mut self, dir: HexDirection) {
        self.dir = dir;
        self.reset_frame();
    }

    fn reset_frame(&mut self) {
        if !is_valid_direction(&self.index, self.dir) {
            self.resolve_direction();
        }
        self.initial_dir = self.dir;
        self.rotation = 0;
        self.check_invariant();
    }

    /// Step one cell ahead.
    pub fn forward(&mut self) {
        let before = self.rotation;
        move_index(&mut self.index, self.dir, &mut self.rotation);
        if self.rotation != before {
            self.dir = self.dir.rotate(self.rotation - before);
        }
        self.resolve_direction();
        self.check_invariant();
    }

    /// Step `count` cells ahead; negative counts step backwards.
    pub fn forward_n(&mut self, count: i32) {
        if count < 0 {
            self.backward_n(-count);
        }
        for _ in 0..count {
            self.forward();
        }
    }

    /// Step one cell back, keeping the heading.
    pub fn backward(&mut self) {
        let mut back = self.dir.negate();
        if let Some(delta) = gap_correction(&self.index, back, HexClass::ClassI) {
            self.dir = self.dir.rotate(delta);
            self.rotation = rotate_delta(self.rotation, delta);
            back = self.dir.negate();
        }

        let before = self.rotation;
        move_index(&mut self.index, back, &mut self.rotation);
        if self.rotation != before {
            self.dir = self.dir.rotate(self.rotation - before);
        }
        self.check_invariant();
    }

    /// Step `count` cells back; negative counts step ahead.
    pub fn backward_n(&mut self, count: i32) {
        if count < 0 {
            self.forward_n(-count);
        }
        for _ in 0..count {
            self.backward();
        }
    }

    /// The direction [`backward`](Self::backward) would step in.
    pub fn back_dir(&self) -> HexDirection {
        let back = self.dir.negate();
        match gap_correction(&self.index, back, HexClass::ClassII) {
            Some(delta) => back.rotate(delta),
            None => back,
        }
    }

    /// Turn one step counter-clockwise.
    pub fn left(&mut self) {
        self.left_n(1);
    }

    /// Turn `count` steps counter-clockwise, skipping a pentagon's gap.
    pub fn left_n(&mut self, count: i32) {
        self.turn(count);
    }

    /// Turn one step clockwise.
    pub fn right(&mut self) {
        self.right_n(1);
    }

    /// Turn `count` steps clockwise, skipping a pentagon's gap.
    pub fn right_n(&mut self, count: i32) {
        self.turn(-count);
    }

    fn turn(&mut self, count: i32) {
        let before = self.dir;
        self.dir = rotate_direction(&self.index, self.dir, count);
        if self.dir != before {
            let delta = i32::from(self.dir.digit()) - i32::from(before.digit());
            self.rotation = rotate_delta(self.rotation, delta);
        }
        self.check_invariant();
    }

    /// Descend to the centroid child. The heading is kept as is.
    pub fn zoom_in(&mut self) -> Result<()> {
        self.index.increment_resolution()?;
        self.check_invariant();
        Ok(())
    }

    /// Ascend to the parent cell, turning out of a pentagon gap if needed.
    pub fn zoom_out(&mut self) -> Result<()> {
        self.index.decrement_resolution()?;
        self.resolve_direction();
        self.check_invariant();
        Ok(())
    }

    fn resolve_direction(&mut self) {
        if let Some(delta) = gap_correction(&self.index, self.dir, HexClass::ClassII) {
            self.dir = rotate_direction(&self.index, self.dir, delta);
            self.rotation = rotate_delta(self.rotation, delta);
        }
    }

    #[inline]
    fn check_invariant(&self) {
        debug_assert_eq!(
            self.initial_dir,
            self.dir.rotate(-self.rotation),
            "cursor {self} lost track of its initial direction"
        );
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {} {}}}", self.index, self.dir, self.rotation)
    }
}
