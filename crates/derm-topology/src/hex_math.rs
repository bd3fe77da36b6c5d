//! Aperture-3 hexagonal arithmetic on sub-indices.
//!
//! Two consecutive digits (one class I and one class II resolution) form a
//! "pair" that maps onto a small integer lattice vector. Addition sums the
//! lattice vectors pair by pair and carries by dividing by three, which
//! is what moving three cells at one resolution amounts to one cell at the
//! resolution two levels coarser.
//!
//! # Lattice
//!
//! ```text
//! 00 -> ( 0, 0)
//! 01 -> ( 2, 0)   10 -> ( 3, 1)
//! 02 -> ( 1, 1)   20 -> ( 0, 2)
//! 03 -> (-1, 1)   30 -> (-3, 1)
//! 04 -> (-2, 0)   40 -> (-3,-1)
//! 05 -> (-1,-1)   50 -> ( 0,-2)
//! 06 -> ( 1,-1)   60 -> ( 3,-1)
//! ```

use std::ops::{Add, Neg, Sub};

use crate::direction::{HexClass, HexDirection};
use crate::error::{Error, Result};
use crate::sub_index::{SubIndex, MAX_DIGITS};

/// Lattice vector of a packed digit pair. Unknown pairs map to the origin.
pub fn pair_to_integers(pair: u8) -> (i32, i32) {
    match pair {
        0x01 => (2, 0),
        0x02 => (1, 1),
        0x03 => (-1, 1),
        0x04 => (-2, 0),
        0x05 => (-1, -1),
        0x06 => (1, -1),
        0x10 => (3, 1),
        0x20 => (0, 2),
        0x30 => (-3, 1),
        0x40 => (-3, -1),
        0x50 => (0, -2),
        0x60 => (3, -1),
        _ => (0, 0),
    }
}

/// Packed digit pair of a lattice vector, if it is one of the thirteen.
pub fn integers_to_pair(a: i32, b: i32) -> Option<u8> {
    let pair = match (a, b) {
        (0, 0) => 0x00,
        (2, 0) => 0x01,
        (1, 1) => 0x02,
        (-1, 1) => 0x03,
        (-2, 0) => 0x04,
        (-1, -1) => 0x05,
        (1, -1) => 0x06,
        (3, 1) => 0x10,
        (0, 2) => 0x20,
        (-3, 1) => 0x30,
        (-3, -1) => 0x40,
        (0, -2) => 0x50,
        (3, -1) => 0x60,
        _ => return None,
    };
    Some(pair)
}

/// Divide a lattice vector by three in place and return the remainder,
/// chosen so that it is itself a valid lattice vector.
pub fn divide_by_three(a: &mut i32, b: &mut i32) -> (i32, i32) {
    let na = a.div_euclid(3);
    let nb = b.div_euclid(3);
    let mut r = *a - na * 3;
    let mut s = *b - nb * 3;
    *a = na;
    *b = nb;

    if s == r + 1 {
        s -= 3;
        *b += 1;
    } else if s == r - 1 {
        r -= 3;
        *a += 1;
    } else if r == 2 && s == 2 {
        r = -1;
        s = -1;
        *a += 1;
        *b += 1;
    }
    (r, s)
}

fn strip_pair_vector(index: &mut SubIndex) -> (i32, i32) {
    pair_to_integers(index.strip_right_pair())
}

/// Add two sub-indices on a grid of the given class. The result keeps the
/// larger operand resolution when possible and grows otherwise.
pub fn add_with_class(first: &SubIndex, second: &SubIndex, class: HexClass) -> Result<SubIndex> {
    let mut first = first.clone();
    let mut second = second.clone();
    let max_resolution = first.resolution().max(second.resolution());

    if class == HexClass::ClassII {
        first.append(0)?;
        second.append(0)?;
    }

    let (fa, fb) = strip_pair_vector(&mut first);
    let (sa, sb) = strip_pair_vector(&mut second);
    let mut a1 = fa + sa;
    let mut b1 = fb + sb;

    // Digits collected least significant first.
    let mut reversed: Vec<u8> = Vec::with_capacity(2 * (max_resolution.max(0) as usize + 2));
    let mut prefix = SubIndex::null();

    let num_pairs = max_resolution / 2;
    let mut k = 0;
    while k <= num_pairs || a1 != 0 || b1 != 0 {
        if a1 == 0 && b1 == 0 {
            if first.is_null() {
                second.append_pair(0)?;
                prefix = second;
                break;
            }
            if second.is_null() {
                first.append_pair(0)?;
                prefix = first;
                break;
            }
        }

        k += 1;

        let (r1, s1) = divide_by_three(&mut a1, &mut b1);

        let (fa, fb) = strip_pair_vector(&mut first);
        let (sa, sb) = strip_pair_vector(&mut second);
        a1 += fa + sa;
        b1 += fb + sb;

        let (mut ta, mut tb) = (a1, b1);
        let (r2, _) = divide_by_three(&mut ta, &mut tb);

        let (lo, hi) = match (s1, r2) {
            (2, 1 | -2) => {
                a1 -= 1;
                b1 += 1;
                (0, 6)
            }
            (2, 2 | -1) => {
                a1 += 1;
                b1 += 1;
                (0, 4)
            }
            (-2, 1 | -2) => {
                a1 -= 1;
                b1 -= 1;
                (0, 1)
            }
            (-2, 2 | -1) => {
                a1 += 1;
                b1 -= 1;
                (0, 3)
            }
            _ => {
                let pair = integers_to_pair(r1, s1).ok_or_else(|| {
                    Error::InvalidIndex(format!("lattice remainder ({r1}, {s1})"))
                })?;
                (pair & 0xF, pair >> 4)
            }
        };
        reversed.push(lo);
        reversed.push(hi);
    }

    let mut digits = prefix.digits().to_vec();
    digits.extend(reversed.iter().rev());
    let mut sum = SubIndex::from_vec_unchecked(digits);

    if class == HexClass::ClassII {
        sum.strip_right();
    }

    sum.adjust_resolution_left(max_resolution.max(0))?;
    if sum.digit_count() > MAX_DIGITS {
        return Err(Error::TooManyDigits(sum.digit_count()));
    }
    Ok(sum)
}

/// Add two sub-indices on the grid of `resolution`.
///
/// Leading zeros are removed until the sum is back at `resolution`. When a
/// non-zero digit remains the sum has left the grid, which is an error
/// unless `grow` is set.
pub fn add(first: &SubIndex, second: &SubIndex, resolution: i32, grow: bool) -> Result<SubIndex> {
    let mut sum = add_with_class(first, second, HexClass::of(resolution))?;
    while sum.resolution() > resolution {
        if sum.digit(0) == 0 {
            sum.strip_left();
        } else if !grow {
            return Err(Error::ResolutionOverflow(resolution));
        } else {
            break;
        }
    }
    Ok(sum)
}

/// Subtract `second` from `first` on the grid of `resolution`.
pub fn subtract(first: &SubIndex, second: &SubIndex, resolution: i32) -> Result<SubIndex> {
    add(first, &second.negated(), resolution, false)
}

/// Move one cell in `dir` at the resolution of `start`. The result may
/// gain leading digits when the move leaves the current patch.
pub fn move_index(start: &SubIndex, dir: HexDirection) -> Result<SubIndex> {
    add_with_class(start, &SubIndex::single(dir.digit()), HexClass::of(start.resolution()))
}

/// Sum at the larger of the two resolutions, growing if needed.
impl Add for &SubIndex {
    type Output = Result<SubIndex>;

    fn add(self, rhs: &SubIndex) -> Result<SubIndex> {
        add(self, rhs, self.resolution().max(rhs.resolution()), true)
    }
}

/// Difference at the resolution of the left operand.
impl Sub for &SubIndex {
    type Output = Result<SubIndex>;

    fn sub(self, rhs: &SubIndex) -> Result<SubIndex> {
        subtract(self, rhs, self.resolution())
    }
}

impl Neg for &SubIndex {
    type Output = SubIndex;

    fn neg(self) -> SubIndex {
        self.negated()
    }
}

/// Reduce three axis factors so that at least one of them is zero while
/// describing the same offset.
pub fn reduce_factors(d1: &mut i32, d2: &mut i32, d3: &mut i32) {
    if d1.abs() <= d2.abs() && d1.abs() <= d3.abs() {
        *d2 += *d1;
        *d3 -= *d1;
        *d1 = 0;
    } else if d2.abs() <= d1.abs() && d2.abs() <= d3.abs() {
        *d1 += *d2;
        *d3 += *d2;
        *d2 = 0;
    } else {
        *d1 -= *d3;
        *d2 += *d3;
        *d3 = 0;
    }
}

/// Factor the offset of `index` from its origin into moves along two
/// directions. The first direction carries the larger move, ties going to
/// the lower direction.
pub fn factor_axes(index: &SubIndex) -> (HexDirection, i32, HexDirection, i32) {
    let mut factors = [0i32; 12];
    let mut alt = false;
    let mut distance = 1;
    for &digit in index.digits().iter().rev() {
        if alt {
            if digit != 0 {
                factors[digit as usize - 1 + 6] += distance;
            }
            distance *= 3;
        } else if digit != 0 {
            factors[digit as usize - 1] += distance;
        }
        alt = !alt;
    }

    let mut d1 = factors[0] - factors[3];
    let mut d2 = factors[1] - factors[4];
    let mut d3 = factors[2] - factors[5];

    let da1 = factors[6] - factors[9];
    let da2 = factors[7] - factors[10];
    let da3 = factors[8] - factors[11];

    match HexClass::of(index.resolution()) {
        HexClass::ClassI => {
            d1 += da1;
            d2 += da1 + da2;
            d3 += da2 + da3;
            d1 -= da3;
        }
        HexClass::ClassII => {
            d3 -= da1;
            d1 += da1 + da2;
            d2 += da2 + da3;
            d3 += da3;
        }
    }

    reduce_factors(&mut d1, &mut d2, &mut d3);

    let mut dir1 = 1u8;
    let mut dir2 = 2u8;
    if d3 != 0 {
        if d2 != 0 {
            d1 = d3;
            dir1 = 3;
        } else {
            d2 = d3;
            dir2 = 3;
        }
    }

    if d1 < 0 {
        d1 = -d1;
        dir1 += 3;
    }
    if d2 < 0 {
        d2 = -d2;
        dir2 += 3;
    }

    if d1 < d2 || (d1 == d2 && dir2 < dir1) {
        std::mem::swap(&mut d1, &mut d2);
        std::mem::swap(&mut dir1, &mut dir2);
    }

    // dir1 and dir2 are always in 1..=6 here.
    let to_dir = |d: u8| HexDirection::ALL[(d as usize - 1) % 6];
    (to_dir(dir1), d1, to_dir(dir2), d2)
}

/// Factor the offset of `index` into moves along directions two and six.
pub fn factor_uv(index: &SubIndex) -> (i32, i32) {
    let (dir_a, steps_a, dir_b, steps_b) = factor_axes(index);
    let mut move2 = 0;
    let mut move6 = 0;
    for (dir, steps) in [(dir_a, steps_a), (dir_b, steps_b)] {
        match dir {
            HexDirection::One => {
                move2 += steps;
                move6 += steps;
            }
            HexDirection::Two => move2 += steps,
            HexDirection::Three => move6 -= steps,
            HexDirection::Four => {
                move2 -= steps;
                move6 -= steps;
            }
            HexDirection::Five => move2 -= steps,
            HexDirection::Six => move6 += steps,
        }
    }
    (move2, move6)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn si(s: &str) -> SubIndex {
        s.parse().unwrap()
    }

    #[test]
    fn pair_table_is_invertible() {
        for pair in [
            0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60,
        ] {
            let (a, b) = pair_to_integers(pair);
            assert_eq!(integers_to_pair(a, b), Some(pair));
        }
        assert_eq!(integers_to_pair(5, 5), None);
    }

    #[test]
    fn divide_by_three_leaves_lattice_remainder() {
        for a in -12..=12 {
            for b in -12..=12 {
                if (a + b) % 2 != 0 {
                    continue;
                }
                let (mut qa, mut qb) = (a, b);
                let (r, s) = divide_by_three(&mut qa, &mut qb);
                assert_eq!(qa * 3 + r, a);
                assert_eq!(qb * 3 + s, b);
                assert!(integers_to_pair(r, s).is_some(), "({a}, {b}) -> ({r}, {s})");
            }
        }
    }

    #[test]
    fn addition_examples() {
        assert_eq!((&si("50601") + &si("10203")).unwrap().to_string(), "60102");
        assert_eq!((&si("402") + &si("403")).unwrap().to_string(), "3040");
        assert_eq!((&si("404") - &si("403")).unwrap().to_string(), "005");
        assert_eq!(-&si("0102"), si("0405"));
    }

    #[test]
    fn addition_respects_grow_flag() {
        assert!(matches!(
            add(&si("403"), &si("404"), 3, false),
            Err(Error::ResolutionOverflow(3))
        ));
        assert!(add(&si("403"), &si("404"), 3, true).is_ok());
    }

    #[test]
    fn zero_is_identity() {
        let index = si("0102030");
        let zero = si("0000000");
        assert_eq!((&index + &zero).unwrap(), index);
        assert_eq!((&index - &zero).unwrap(), index);
    }

    #[test]
    fn move_from_origin() {
        let origin = si("00");
        for dir in HexDirection::ALL {
            let moved = move_index(&origin, dir).unwrap();
            assert_eq!(moved.resolution(), 1);
            assert_ne!(moved, origin);
        }
    }

    #[test]
    fn factor_axes_example() {
        assert_eq!(
            factor_axes(&si("6020")),
            (HexDirection::Six, 4, HexDirection::Five, 1)
        );
        assert_eq!(factor_axes(&si("000")).1, 0);
    }

    #[test]
    fn factor_uv_of_single_steps() {
        assert_eq!(factor_uv(&si("02")), (1, 0));
        assert_eq!(factor_uv(&si("05")), (-1, 0));
        assert_eq!(factor_uv(&si("06")), (0, 1));
        assert_eq!(factor_uv(&si("03")), (0, -1));
    }

    #[test]
    fn subtraction_undoes_addition() {
        let sum = (&si("50601") + &si("10203")).unwrap();
        assert_eq!((&sum - &si("10203")).unwrap().to_string(), "50601");
    }
}
