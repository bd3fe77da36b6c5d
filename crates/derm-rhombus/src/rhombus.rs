//! Four-cornered patches of the grid with UV coordinates.
//!
//! A [`Rhombus`] is spanned by four mutually adjacent cells. Corner 0 is
//! the origin, corner 1 lies along the U axis, corner 3 along the V axis and
//! corner 2 opposite the origin. Each corner remembers the direction that
//! leads to the next corner counter-clockwise and the direction that leads
//! back, which together name the two axes of the local frame.
//!
//! # UV coordinates
//!
//! Every two resolution steps triple the number of cells along an edge, so
//! a cell `depth` levels below the corners (`depth` even) has integer
//! coordinates in `0..=uv_max(depth)`. Pentagon corners miss one
//! direction, and the axis factorisation turns around the gap.

use std::fmt;

use derm_topology::hex_math::factor_uv;
use derm_topology::{is_valid_direction, Cursor, GlobalIndex, HexDirection, SubIndex};

use crate::error::{Error, Result};

/// Rhombi covering the sphere at resolution 2: ten icosahedral rhombi,
/// each split three by three.
pub const NUM_ROOT_RHOMBI: u32 = 90;

/// Patch of the grid spanned by four adjacent cells.
///
/// Equality compares the corners only.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rhombus {
    corners: [GlobalIndex; 4],
    directions: [HexDirection; 4],
    rev_directions: [HexDirection; 4],
}

impl Rhombus {
    /// Walk the rhombus whose origin is `index` and whose U axis is `dir`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is null.
    pub fn new(index: GlobalIndex, dir: HexDirection) -> Self {
        let mut c = Cursor::new(index, dir);
        let mut corners: [GlobalIndex; 4] = Default::default();
        let mut directions = [HexDirection::One; 4];
        let mut rev_directions = [HexDirection::One; 4];

        corners[0] = c.index().clone();
        directions[0] = c.dir();
        for corner in 1..4 {
            c.forward();
            if corner == 2 {
                c.left();
            }
            corners[corner] = c.index().clone();
            if corners[corner].is_hexagon() {
                c.left();
            }
            directions[corner] = c.dir();
        }
        c.forward();
        debug_assert_eq!(c.index(), &corners[0], "rhombus walk did not close");

        c.set_dir(dir);
        c.left();
        rev_directions[0] = c.dir();
        for corner in [3, 2, 1] {
            c.forward();
            if corner == 2 {
                c.right();
            }
            debug_assert_eq!(c.index(), &corners[corner], "reverse walk diverged");
            c.right();
            rev_directions[corner] = c.dir();
        }
        c.forward();
        debug_assert_eq!(c.index(), &corners[0], "reverse walk did not close");

        Self {
            corners,
            directions,
            rev_directions,
        }
    }

    /// The rhombus with its origin under the cursor, along the cursor's heading.
    pub fn from_cursor(cursor: &Cursor) -> Self {
        Self::new(cursor.index().clone(), cursor.dir())
    }

    /// One of the 90 rhombi tiling resolution 2.
    ///
    /// Numbers `0..45` fan out from the north pole `1-0`, `45..90` from the
    /// south pole `12-0`. Within an icosahedral rhombus the number runs
    /// along U first.
    pub fn from_root_number(number: u32) -> Result<Self> {
        if number >= NUM_ROOT_RHOMBI {
            return Err(Error::InvalidRootNumber(number));
        }
        let icosahedral = number / 9;
        let offset = number % 9;
        let v = (offset / 3) as i32;
        let u = (offset % 3) as i32;
        let (pole, nth) = if icosahedral < 5 {
            ("1-0", icosahedral)
        } else {
            ("12-0", icosahedral - 5)
        };
        let pole: GlobalIndex = pole.parse()?;

        let dir = HexDirection::ALL
            .into_iter()
            .filter(|&d| is_valid_direction(&pole, d))
            .nth(nth as usize)
            .ok_or(Error::InvalidRootNumber(number))?;

        let mut c = Cursor::new(pole, dir);
        c.left();
        c.forward_n(v);
        c.right();
        c.forward_n(u);
        Ok(Self::from_cursor(&c))
    }

    /// Largest coordinate `depth` levels below the corners.
    pub fn uv_max(depth: i32) -> i32 {
        3i32.saturating_pow((depth.max(0) / 2) as u32)
    }

    pub fn corners(&self) -> &[GlobalIndex; 4] {
        &self.corners
    }

    /// # Panics
    ///
    /// Panics if `corner > 3`.
    pub fn corner(&self, corner: usize) -> &GlobalIndex {
        &self.corners[corner]
    }

    /// Direction from `corner` towards the next corner.
    pub fn direction(&self, corner: usize) -> HexDirection {
        self.directions[corner]
    }

    /// Direction from `corner` towards the previous corner.
    pub fn rev_direction(&self, corner: usize) -> HexDirection {
        self.rev_directions[corner]
    }

    /// Resolution of the corners.
    pub fn resolution(&self) -> i32 {
        self.corners[0].resolution()
    }

    /// The cell at `(u, v)`, `depth` levels below the corners.
    ///
    /// # Panics
    ///
    /// Panics if a coordinate is outside `0..=uv_max(depth)`.
    pub fn sub_index(&self, u: i32, v: i32, depth: i32) -> Result<GlobalIndex> {
        let max = Self::uv_max(depth);
        assert!(
            (0..=max).contains(&u) && (0..=max).contains(&v),
            "uv ({u}, {v}) out of range 0..={max}"
        );
        let mut c = Cursor::new(self.corners[0].clone(), self.directions[0]);
        for _ in 0..depth {
            c.zoom_in()?;
        }
        c.forward_n(u);
        c.left();
        c.forward_n(v);
        Ok(c.index().clone())
    }

    /// One of the nine rhombi two resolutions down, `u` and `v` in `0..3`.
    ///
    /// # Panics
    ///
    /// Panics if a coordinate is outside `0..3`.
    pub fn sub_rhombus(&self, u: i32, v: i32) -> Result<Rhombus> {
        assert!(
            (0..3).contains(&u) && (0..3).contains(&v),
            "sub-rhombus ({u}, {v}) out of range"
        );
        let mut c = Cursor::new(self.corners[0].clone(), self.directions[0]);
        c.zoom_in()?;
        c.zoom_in()?;
        c.forward_n(u);
        c.left();
        c.forward_n(v);
        c.right();
        Ok(Self::from_cursor(&c))
    }

    /// Sub-rhombus number `n` in `0..9`, U running fastest.
    pub fn sub_rhombus_at(&self, n: i32) -> Result<Rhombus> {
        self.sub_rhombus(n % 3, n / 3)
    }

    /// All nine sub-rhombi in [`sub_rhombus_at`](Self::sub_rhombus_at) order.
    pub fn sub_rhombi(&self) -> Result<Vec<Rhombus>> {
        (0..9).map(|n| self.sub_rhombus_at(n)).collect()
    }

    /// True when `index` shares a branch of the hierarchy with a corner.
    pub fn intersects(&self, index: &GlobalIndex) -> bool {
        self.corners
            .iter()
            .any(|c| c.is_ancestor_of(index) || index.is_ancestor_of(c))
    }

    pub fn is_inside(&self, index: &GlobalIndex) -> bool {
        self.is_inside_uv(index).is_some()
    }

    /// Coordinates of `index` within the rhombus, scaled to `0.0..=1.0`.
    pub fn is_inside_normalized(&self, index: &GlobalIndex) -> Option<(f64, f64)> {
        let (u, v) = self.is_inside_uv(index)?;
        let max = f64::from(Self::uv_max(index.resolution() - self.resolution()));
        Some((f64::from(u) / max, f64::from(v) / max))
    }

    /// Integer coordinates of `index` within the rhombus.
    ///
    /// `index` must be an even number of resolutions below the corners;
    /// anything else is reported as outside.
    pub fn is_inside_uv(&self, index: &GlobalIndex) -> Option<(i32, i32)> {
        let depth = index.resolution() - self.resolution();
        if depth < 0 || depth % 2 != 0 {
            return None;
        }
        let corner = self.corners.iter().position(|c| c.is_ancestor_of(index))?;
        self.uv_from_corner(corner, index)
    }

    fn uv_from_corner(&self, corner: usize, index: &GlobalIndex) -> Option<(i32, i32)> {
        let root = &self.corners[corner];
        let mut sub = index.sub_index().tail(root.sub_index().digit_count());
        sub.prepend(0).ok()?;
        let depth = sub.digit_count() as i32;
        let axes = (self.directions[corner], self.rev_directions[corner]);

        if root.is_pentagon() {
            use HexDirection::*;
            // (split, skew, side, detour)
            let (split, skew, side, detour) = if root.is_northern() {
                ((Five, Two), (Six, Two), Two, (Five, One))
            } else {
                ((Two, Five), (Three, Five), Five, (Two, Four))
            };
            let on_side = sub.most_significant().map(|(d, _)| d) == Some(side);

            if axes == split {
                let along = if on_side { skew } else { detour };
                if let Some((u, v)) = factor(along, &sub) {
                    return within(normalize_uv(corner, depth, u, v), depth);
                }
            } else if axes == skew {
                if let Some((u, v)) = factor(skew, &sub) {
                    let (mut u, mut v) = normalize_uv(corner, depth, u, v);
                    if on_side {
                        v -= u;
                    } else {
                        u -= v;
                    }
                    return within((u, v), depth);
                }
            }
        }

        let (u, v) = factor(axes, &sub)?;
        within(normalize_uv(corner, depth, u, v), depth)
    }
}

/// Express the offset of `sub` as steps along two directions.
fn factor((first, second): (HexDirection, HexDirection), sub: &SubIndex) -> Option<(i32, i32)> {
    let (mut move2, mut move6) = factor_uv(sub);
    let mut a = 0;
    let mut b = 0;
    let mut rounds = 0;
    while (move2 != 0 || move6 != 0) && rounds < 5 {
        rounds += 1;
        a += take_along(first, &mut move2, &mut move6);
        b += take_along(second, &mut move2, &mut move6);
    }
    (move2 == 0 && move6 == 0).then_some((a, b))
}

/// Consume what can be walked along `dir` from the (2, 6) factors.
fn take_along(dir: HexDirection, move2: &mut i32, move6: &mut i32) -> i32 {
    match dir {
        HexDirection::One => {
            if *move6 == 0 {
                let steps = std::mem::take(move2);
                *move6 -= steps;
                steps
            } else {
                let steps = std::mem::take(move6);
                *move2 -= steps;
                steps
            }
        }
        HexDirection::Two => std::mem::take(move2),
        HexDirection::Three => -std::mem::take(move6),
        HexDirection::Four => -take_along(HexDirection::One, move2, move6),
        HexDirection::Five => -std::mem::take(move2),
        HexDirection::Six => std::mem::take(move6),
    }
}

/// Rotate corner-relative coordinates into the frame of corner 0.
fn normalize_uv(corner: usize, depth: i32, u: i32, v: i32) -> (i32, i32) {
    let max = Rhombus::uv_max(depth);
    match corner {
        0 => (u, v),
        1 => (max - v, u),
        2 => (max - u, max - v),
        _ => (v, max - u),
    }
}

fn within((u, v): (i32, i32), depth: i32) -> Option<(i32, i32)> {
    let max = Rhombus::uv_max(depth);
    ((0..=max).contains(&u) && (0..=max).contains(&v)).then_some((u, v))
}

impl PartialEq for Rhombus {
    fn eq(&self, other: &Self) -> bool {
        self.corners == other.corners
    }
}

impl Eq for Rhombus {}

impl fmt::Display for Rhombus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, (corner, dir)) in self.corners.iter().zip(self.directions).enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{corner} {dir}")?;
        }
        write!(f, "]")
    }
}
