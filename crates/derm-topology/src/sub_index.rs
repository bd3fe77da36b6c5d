//! Digit-sequence sub-index.
//!
//! A [`SubIndex`] is a path of base-7 digits from the centre of a primary
//! cell down through successive children. Digit 0 is the centroid child,
//! digits 1..=6 name the vertex child in that hexagonal direction.
//!
//! # Invariants
//!
//! - Every digit is in `0..=6`.
//! - At most [`MAX_DIGITS`] digits.
//! - Parsed strings never contain two consecutive non-zero digits.
//!
//! The empty sequence is the null index and has resolution -1.

use std::fmt;
use std::str::FromStr;

use crate::direction::{HexDirection, Rotation};
use crate::error::{Error, Result};

/// Maximum number of digits in a sub-index.
pub const MAX_DIGITS: usize = 40;

/// Digit replacement applied by [`SubIndex::negate`].
const NEGATE: [u8; 7] = [0, 4, 5, 6, 1, 2, 3];

/// A sequence of base-7 digits.
///
/// Ordering is lexicographic on the digits, with a prefix ordered before
/// any of its extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct SubIndex {
    digits: Vec<u8>,
}

impl SubIndex {
    /// The null index.
    pub const fn null() -> Self {
        Self { digits: Vec::new() }
    }

    /// Build from raw digit values. Only range and length are checked.
    pub fn from_digits(digits: &[u8]) -> Result<Self> {
        if digits.len() > MAX_DIGITS {
            return Err(Error::TooManyDigits(digits.len()));
        }
        if let Some(&bad) = digits.iter().find(|&&d| d > 6) {
            return Err(Error::InvalidDigit {
                digit: char::from(b'0' + bad.min(9)),
                input: format!("{digits:?}"),
            });
        }
        Ok(Self {
            digits: digits.to_vec(),
        })
    }

    /// Wrap digits produced by arithmetic. Capacity is checked by the caller.
    pub(crate) fn from_vec_unchecked(digits: Vec<u8>) -> Self {
        debug_assert!(digits.iter().all(|&d| d <= 6));
        Self { digits }
    }

    /// A single-digit index.
    pub fn single(digit: u8) -> Self {
        debug_assert!(digit <= 6);
        Self {
            digits: vec![digit],
        }
    }

    pub fn is_null(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    pub fn digit_count(&self) -> usize {
        self.digits.len()
    }

    /// Digit count minus one. The null index has resolution -1.
    pub fn resolution(&self) -> i32 {
        self.digits.len() as i32 - 1
    }

    /// Digit at `pos`, counted from the most significant digit.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is past the last digit.
    pub fn digit(&self, pos: usize) -> u8 {
        self.digits[pos]
    }

    pub fn last_digit(&self) -> Option<u8> {
        self.digits.last().copied()
    }

    /// Overwrite the digit at `pos`.
    pub fn set_digit(&mut self, pos: usize, digit: u8) -> Result<()> {
        if digit > 6 {
            return Err(Error::InvalidDigit {
                digit: char::from(b'0' + digit.min(9)),
                input: self.to_string(),
            });
        }
        match self.digits.get_mut(pos) {
            Some(slot) => {
                *slot = digit;
                Ok(())
            }
            None => Err(Error::InvalidResolution(pos as i32)),
        }
    }

    /// Truncate or zero-pad on the right to reach `resolution`.
    pub fn set_resolution(&mut self, resolution: i32) -> Result<()> {
        let count = resolution + 1;
        if count < 0 || count as usize > MAX_DIGITS {
            return Err(Error::InvalidResolution(resolution));
        }
        self.digits.resize(count as usize, 0);
        Ok(())
    }

    /// Digits `pos..pos + len`, clamped to the end of the index.
    pub fn subseq(&self, pos: usize, len: usize) -> Self {
        debug_assert!(pos <= self.digits.len());
        let end = pos.saturating_add(len).min(self.digits.len());
        Self {
            digits: self.digits[pos.min(end)..end].to_vec(),
        }
    }

    /// Digits from `pos` to the end.
    pub fn tail(&self, pos: usize) -> Self {
        self.subseq(pos, usize::MAX)
    }

    fn check_room(&self, extra: usize) -> Result<()> {
        if self.digits.len() + extra > MAX_DIGITS {
            Err(Error::TooManyDigits(self.digits.len() + extra))
        } else {
            Ok(())
        }
    }

    pub fn append(&mut self, digit: u8) -> Result<()> {
        self.check_room(1)?;
        debug_assert!(digit <= 6);
        self.digits.push(digit);
        Ok(())
    }

    /// Append two digits packed as `hi << 4 | lo`.
    pub fn append_pair(&mut self, pair: u8) -> Result<()> {
        self.check_room(2)?;
        self.digits.push(pair >> 4);
        self.digits.push(pair & 0xF);
        Ok(())
    }

    /// Append every digit of `other`.
    pub fn extend(&mut self, other: &SubIndex) -> Result<()> {
        self.check_room(other.digits.len())?;
        self.digits.extend_from_slice(&other.digits);
        Ok(())
    }

    pub fn prepend(&mut self, digit: u8) -> Result<()> {
        self.check_room(1)?;
        debug_assert!(digit <= 6);
        self.digits.insert(0, digit);
        Ok(())
    }

    /// Prepend two digits packed as `hi << 4 | lo`.
    pub fn prepend_pair(&mut self, pair: u8) -> Result<()> {
        self.check_room(2)?;
        self.digits.splice(0..0, [pair >> 4, pair & 0xF]);
        Ok(())
    }

    /// Remove and return the least significant digit, or 0 when null.
    pub fn strip_right(&mut self) -> u8 {
        self.digits.pop().unwrap_or(0)
    }

    /// Remove the two least significant digits, returned as `hi << 4 | lo`.
    /// With a single digit left only that digit is returned.
    pub fn strip_right_pair(&mut self) -> u8 {
        let lo = self.strip_right();
        let hi = self.strip_right();
        (hi << 4) | lo
    }

    /// Remove and return the most significant digit, or 0 when null.
    pub fn strip_left(&mut self) -> u8 {
        if self.digits.is_empty() {
            0
        } else {
            self.digits.remove(0)
        }
    }

    /// Remove `count` leading digits. Counts that would empty the index are ignored.
    pub fn strip_left_count(&mut self, count: usize) {
        if count < self.digits.len() {
            self.digits.drain(..count);
        }
    }

    /// The first non-zero digit and its position counted from the least
    /// significant digit. `None` when every digit is zero.
    pub fn most_significant(&self) -> Option<(HexDirection, usize)> {
        let n = self.digits.len();
        self.digits
            .iter()
            .enumerate()
            .find(|(_, &d)| d != 0)
            .and_then(|(i, &d)| HexDirection::from_digit(d).map(|dir| (dir, n - 1 - i)))
    }

    /// The hexagonal sector the index lies in, 0 at the origin.
    pub fn hex_sector(&self) -> u8 {
        self.most_significant().map_or(0, |(d, _)| d.digit())
    }

    /// Add leading zeros, or remove leading zeros up to the first non-zero
    /// digit, to approach `target` resolution.
    pub fn adjust_resolution_left(&mut self, target: i32) -> Result<()> {
        if target < 0 || target as usize >= MAX_DIGITS {
            return Err(Error::InvalidResolution(target));
        }
        let resolution = self.resolution();
        if resolution < target {
            let pad = (target - resolution) as usize;
            self.digits.splice(0..0, std::iter::repeat(0).take(pad));
        } else if resolution > target {
            let excess = (resolution - target) as usize;
            let zeros = self.digits.iter().take(excess).take_while(|&&d| d == 0).count();
            self.digits.drain(..zeros);
        }
        Ok(())
    }

    /// True for a non-null index whose digits are all zero.
    pub fn is_at_origin(&self) -> bool {
        !self.is_null() && self.digits.iter().all(|&d| d == 0)
    }

    /// True when the first `count` digits are all zero. Counts past the end
    /// are clamped; a zero count is never at the origin.
    pub fn is_at_origin_prefix(&self, count: usize) -> bool {
        let count = count.min(self.digits.len());
        count > 0 && self.digits[..count].iter().all(|&d| d == 0)
    }

    /// True when the last digit is the centroid digit.
    pub fn has_vertex_children(&self) -> bool {
        self.digits.last() == Some(&0)
    }

    /// Prefix test. The null index is related to nothing.
    pub fn is_ancestor_of(&self, other: &SubIndex) -> bool {
        !self.is_null() && !other.is_null() && other.digits.starts_with(&self.digits)
    }

    pub fn is_descendant_of(&self, other: &SubIndex) -> bool {
        other.is_ancestor_of(self)
    }

    /// Replace every digit with the digit of the opposite direction.
    pub fn negate(&mut self) {
        for d in &mut self.digits {
            *d = NEGATE[*d as usize];
        }
    }

    pub fn negated(&self) -> Self {
        let mut out = self.clone();
        out.negate();
        out
    }

    /// Rotate every non-zero digit by `count` sixty-degree steps.
    pub fn rotate(&mut self, count: u32, sense: Rotation) {
        let count = (count % 6) as u8;
        let step = match sense {
            Rotation::CounterClockwise => count,
            Rotation::Clockwise => (6 - count) % 6,
        };
        if step == 0 {
            return;
        }
        for d in self.digits.iter_mut().filter(|d| **d != 0) {
            *d = (*d - 1 + step) % 6 + 1;
        }
    }

    /// Longest common prefix of two indices.
    pub fn calc_ancestor(a: &SubIndex, b: &SubIndex) -> SubIndex {
        let common = a
            .digits
            .iter()
            .zip(&b.digits)
            .take_while(|(x, y)| x == y)
            .count();
        a.subseq(0, common)
    }

    /// The digits of `child` below `parent`.
    pub fn calc_descendant(parent: &SubIndex, child: &SubIndex) -> Result<SubIndex> {
        if parent.digit_count() >= child.digit_count() || !parent.is_ancestor_of(child) {
            return Err(Error::NotDescendant {
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }
        Ok(child.tail(parent.digit_count()))
    }

    /// The index one resolution coarser.
    pub fn parent(&self) -> Result<SubIndex> {
        if self.resolution() <= 0 {
            return Err(Error::ResolutionUnderflow(self.resolution()));
        }
        let mut out = self.clone();
        out.strip_right();
        Ok(out)
    }

    /// Descend one resolution. Cells with vertex children step towards
    /// `dir`, others can only reach their centroid child.
    pub fn zoom_in(&mut self, dir: Option<HexDirection>) -> Result<()> {
        let digit = match dir {
            Some(d) if self.has_vertex_children() => d.digit(),
            _ => 0,
        };
        self.append(digit)
    }

    pub fn zoom_out(&mut self) -> Result<()> {
        if self.is_null() {
            return Err(Error::NullIndex);
        }
        self.strip_right();
        Ok(())
    }
}

impl fmt::Display for SubIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.digits {
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl FromStr for SubIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_DIGITS {
            return Err(Error::TooManyDigits(s.len()));
        }
        let mut digits = Vec::with_capacity(s.len());
        let mut last_zero = true;
        for c in s.chars() {
            let d = match c {
                '0'..='6' => c as u8 - b'0',
                _ => {
                    return Err(Error::InvalidDigit {
                        digit: c,
                        input: s.to_string(),
                    })
                }
            };
            if d != 0 && !last_zero {
                return Err(Error::ConsecutiveNonZeroDigits(s.to_string()));
            }
            last_zero = d == 0;
            digits.push(d);
        }
        Ok(Self { digits })
    }
}

impl TryFrom<String> for SubIndex {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<SubIndex> for String {
    fn from(index: SubIndex) -> Self {
        index.to_string()
    }
}
