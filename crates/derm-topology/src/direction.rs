//! Hexagonal direction algebra.
//!
//! Six directions are numbered counter-clockwise from `One` to `Six`.
//! The "zero" direction (staying on the centroid) is represented by
//! `Option<HexDirection>::None` wherever it can occur.
//!
//! # Classes
//!
//! Resolutions alternate between two structural classes. Class I cells
//! (even resolution) have their vertex children on the edges of the parent,
//! class II cells (odd resolution) are rotated by thirty degrees.

use std::fmt;

/// One of the six hexagonal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HexDirection {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
}

impl HexDirection {
    /// All directions in counter-clockwise order.
    pub const ALL: [Self; 6] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
    ];

    /// Direction for a digit value 1..=6. Zero and anything larger map to `None`.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1..=6 => Some(Self::ALL[(digit - 1) as usize]),
            _ => None,
        }
    }

    /// The digit value 1..=6 of this direction.
    #[inline]
    pub const fn digit(self) -> u8 {
        self as u8
    }

    /// Zero-based position in [`HexDirection::ALL`].
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize - 1
    }

    /// Rotate by `count` steps, positive counter-clockwise. Any amount is
    /// normalised into the six-direction range.
    pub fn rotate(self, count: i32) -> Self {
        let idx = (self.ordinal() as i32 + count).rem_euclid(6);
        Self::ALL[idx as usize]
    }

    /// The opposite direction.
    #[inline]
    pub fn negate(self) -> Self {
        self.rotate(3)
    }

    /// Signed number of steps needed to rotate `self` into `other`,
    /// normalised into `0..6`.
    pub fn steps_to(self, other: Self) -> i32 {
        (other.ordinal() as i32 - self.ordinal() as i32).rem_euclid(6)
    }
}

impl fmt::Display for HexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digit())
    }
}

impl TryFrom<i32> for HexDirection {
    type Error = crate::Error;

    fn try_from(value: i32) -> crate::Result<Self> {
        u8::try_from(value)
            .ok()
            .and_then(Self::from_digit)
            .ok_or(crate::Error::InvalidDirection(value))
    }
}

/// Sense of a rotation applied to every digit of a sub-index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Structural class of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HexClass {
    ClassI = 1,
    ClassII = 2,
}

impl HexClass {
    /// Class of a resolution: even resolutions are class I, odd are class II.
    pub fn of(resolution: i32) -> Self {
        if resolution.rem_euclid(2) == 0 {
            Self::ClassI
        } else {
            Self::ClassII
        }
    }

    /// 1 for class I, 2 for class II.
    pub const fn number(self) -> u8 {
        self as u8
    }
}

/// Add a delta to a rotation accumulator, keeping it in `0..6`.
#[inline]
pub fn rotate_delta(rotation: i32, delta: i32) -> i32 {
    (rotation + delta).rem_euclid(6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_wraps_both_ways() {
        assert_eq!(HexDirection::One.rotate(-11), HexDirection::Two);
        assert_eq!(HexDirection::One.rotate(11), HexDirection::Six);
        assert_eq!(HexDirection::Five.rotate(2), HexDirection::One);
        assert_eq!(HexDirection::Three.rotate(0), HexDirection::Three);
        assert_eq!(HexDirection::Three.rotate(-6), HexDirection::Three);
    }

    #[test]
    fn negate_is_half_turn() {
        for dir in HexDirection::ALL {
            assert_eq!(dir.negate(), dir.rotate(3));
            assert_eq!(dir.negate().negate(), dir);
        }
        assert_eq!(HexDirection::One.negate(), HexDirection::Four);
        assert_eq!(HexDirection::Five.negate(), HexDirection::Two);
    }

    #[test]
    fn digits_round_trip() {
        for dir in HexDirection::ALL {
            assert_eq!(HexDirection::from_digit(dir.digit()), Some(dir));
        }
        assert_eq!(HexDirection::from_digit(0), None);
        assert_eq!(HexDirection::from_digit(7), None);
        assert!(HexDirection::try_from(9).is_err());
        assert_eq!(HexDirection::try_from(4).unwrap(), HexDirection::Four);
    }

    #[test]
    fn steps_to_is_modular() {
        assert_eq!(HexDirection::One.steps_to(HexDirection::Six), 5);
        assert_eq!(HexDirection::Six.steps_to(HexDirection::One), 1);
        assert_eq!(HexDirection::Two.steps_to(HexDirection::Two), 0);
    }

    #[test]
    fn class_alternates_with_resolution() {
        assert_eq!(HexClass::of(0), HexClass::ClassI);
        assert_eq!(HexClass::of(1), HexClass::ClassII);
        assert_eq!(HexClass::of(2), HexClass::ClassI);
        assert_eq!(HexClass::of(-1), HexClass::ClassII);
    }

    #[test]
    fn rotation_accumulator_stays_in_range() {
        assert_eq!(rotate_delta(0, -1), 5);
        assert_eq!(rotate_delta(5, 2), 1);
        assert_eq!(rotate_delta(3, 0), 3);
    }
}
