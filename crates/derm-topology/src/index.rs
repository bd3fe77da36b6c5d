//! Face/vertex qualified global index.
//!
//! A [`GlobalIndex`] roots a [`SubIndex`] on one of the twelve icosahedron
//! vertices or twenty faces. The primary cell alone is resolution 1, each
//! sub-index digit adds one resolution.
//!
//! # Text form
//!
//! `<primary>[-<digits>]`, where the primary is `1`..`12` or `A`..`T`:
//! `"A"`, `"12"`, `"1-0"`, `"A-0102"`. The null index is `"NULL"`.

use std::fmt;
use std::str::FromStr;

use crate::direction::{HexClass, HexDirection};
use crate::error::{Error, Result};
use crate::sub_index::{SubIndex, MAX_DIGITS};
use crate::tables::GAP_DIRECTION;

/// Highest resolution a global index can reach.
pub const MAX_RESOLUTION: i32 = MAX_DIGITS as i32;

/// Text form of the null index.
pub const NULL_LABEL: &str = "NULL";

/// Vertex or face a global index is rooted on.
///
/// Holds a vertex number `1..=12` or a face letter `b'A'..=b'T'`; the two
/// ranges are disjoint, so vertices order before faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Primary(u8);

impl Primary {
    pub const FIRST_VERTEX: u8 = 1;
    pub const LAST_VERTEX: u8 = 12;
    pub const FIRST_FACE: u8 = b'A';
    pub const LAST_FACE: u8 = b'T';

    pub fn vertex(n: u8) -> Result<Self> {
        if (Self::FIRST_VERTEX..=Self::LAST_VERTEX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(Error::InvalidPrimary(n.to_string()))
        }
    }

    pub fn face(c: u8) -> Result<Self> {
        if (Self::FIRST_FACE..=Self::LAST_FACE).contains(&c) {
            Ok(Self(c))
        } else {
            Err(Error::InvalidPrimary(char::from(c).to_string()))
        }
    }

    /// Table entries are checked by the tables' own tests.
    pub(crate) const fn vertex_unchecked(n: u8) -> Self {
        Self(n)
    }

    pub(crate) const fn face_unchecked(c: u8) -> Self {
        Self(c)
    }

    /// All 32 primaries: vertices first, then faces.
    pub fn all() -> impl Iterator<Item = Primary> {
        (Self::FIRST_VERTEX..=Self::LAST_VERTEX)
            .chain(Self::FIRST_FACE..=Self::LAST_FACE)
            .map(Primary)
    }

    pub fn is_vertex(self) -> bool {
        self.0 <= Self::LAST_VERTEX
    }

    pub fn is_face(self) -> bool {
        !self.is_vertex()
    }

    /// Vertex number `1..=12`, `None` for faces.
    pub fn vertex_number(self) -> Option<u8> {
        self.is_vertex().then_some(self.0)
    }

    /// Face letter `b'A'..=b'T'`, `None` for vertices.
    pub fn face_letter(self) -> Option<u8> {
        self.is_face().then_some(self.0)
    }

    /// Zero-based position of a vertex.
    pub(crate) fn vertex_offset(self) -> Option<usize> {
        self.vertex_number().map(|n| (n - Self::FIRST_VERTEX) as usize)
    }

    /// Zero-based position of a face, `None` for vertices.
    pub(crate) fn face_offset(self) -> Option<usize> {
        self.face_letter().map(|c| (c - Self::FIRST_FACE) as usize)
    }

    /// The missing direction when this is a vertex.
    pub fn gap_direction(self) -> Option<HexDirection> {
        self.vertex_offset().map(|v| GAP_DIRECTION[v])
    }

    /// Vertices 1-6 and faces A-J lie in the northern hemisphere.
    pub fn is_northern(self) -> bool {
        match self.vertex_number() {
            Some(n) => n <= 6,
            None => self.0 <= b'J',
        }
    }
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vertex_number() {
            Some(n) => write!(f, "{n}"),
            None => write!(f, "{}", char::from(self.0)),
        }
    }
}

impl FromStr for Primary {
    type Err = Error;

    /// Accepts the canonical forms only: `1`..`12` without sign or leading
    /// zero, or a single face letter.
    fn from_str(s: &str) -> Result<Self> {
        match s.as_bytes() {
            [c] if c.is_ascii_alphabetic() => Self::face(*c),
            [b'1'..=b'9', rest @ ..] if rest.iter().all(u8::is_ascii_digit) => s
                .parse::<u8>()
                .map_err(|_| Error::InvalidPrimary(s.to_string()))
                .and_then(Self::vertex),
            _ => Err(Error::InvalidPrimary(s.to_string())),
        }
    }
}

/// A cell address on the icosahedral grid.
///
/// Ordering is by primary, then by sub-index; the null index sorts first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct GlobalIndex {
    primary: Option<Primary>,
    sub: SubIndex,
}

impl GlobalIndex {
    /// The null index.
    pub const fn null() -> Self {
        Self {
            primary: None,
            sub: SubIndex::null(),
        }
    }

    /// A resolution 1 index.
    pub fn from_primary(primary: Primary) -> Self {
        Self {
            primary: Some(primary),
            sub: SubIndex::null(),
        }
    }

    /// Combine a primary and a sub-index, validating the pair.
    pub fn new(primary: Primary, sub: SubIndex) -> Result<Self> {
        let index = Self {
            primary: Some(primary),
            sub,
        };
        if index.is_valid() {
            Ok(index)
        } else {
            Err(Error::InvalidIndex(index.to_string()))
        }
    }

    pub(crate) fn from_parts_unchecked(primary: Primary, sub: SubIndex) -> Self {
        Self {
            primary: Some(primary),
            sub,
        }
    }

    pub fn is_null(&self) -> bool {
        self.primary.is_none()
    }

    pub fn primary(&self) -> Option<Primary> {
        self.primary
    }

    pub fn set_primary(&mut self, primary: Primary) {
        self.primary = Some(primary);
    }

    pub fn sub_index(&self) -> &SubIndex {
        &self.sub
    }

    pub fn sub_index_mut(&mut self) -> &mut SubIndex {
        &mut self.sub
    }

    pub fn is_vertex(&self) -> bool {
        self.primary.is_some_and(Primary::is_vertex)
    }

    pub fn is_face(&self) -> bool {
        self.primary.is_some_and(Primary::is_face)
    }

    /// Resolution of the index, or -1 for the null index.
    pub fn resolution(&self) -> i32 {
        match self.primary {
            None => -1,
            Some(_) if self.sub.is_null() => 1,
            Some(_) => self.sub.digit_count() as i32 + 1,
        }
    }

    pub fn class(&self) -> HexClass {
        HexClass::of(self.resolution())
    }

    /// Truncate or extend the index with centroid digits.
    pub fn set_resolution(&mut self, resolution: i32) -> Result<()> {
        if self.is_null() {
            return Err(Error::NullIndex);
        }
        match resolution {
            1 => {
                self.sub = SubIndex::null();
                Ok(())
            }
            r if r < 1 || r > MAX_RESOLUTION => Err(Error::InvalidResolution(r)),
            r => self.sub.set_resolution(r - 2),
        }
    }

    /// Append a centroid digit.
    pub fn increment_resolution(&mut self) -> Result<()> {
        if self.is_null() {
            return Err(Error::NullIndex);
        }
        if self.sub.digit_count() + 1 >= MAX_DIGITS {
            return Err(Error::InvalidResolution(self.resolution() + 1));
        }
        self.sub.append(0)
    }

    /// Remove the last digit.
    pub fn decrement_resolution(&mut self) -> Result<()> {
        if self.is_null() {
            return Err(Error::NullIndex);
        }
        if self.sub.is_null() {
            return Err(Error::ResolutionUnderflow(self.resolution()));
        }
        self.sub.strip_right();
        Ok(())
    }

    /// True when the cell is centred on an icosahedron vertex.
    pub fn is_pentagon(&self) -> bool {
        self.is_vertex() && (self.sub.is_null() || self.sub.is_at_origin())
    }

    /// True when the first `count` sub-index digits stay on the vertex.
    pub fn is_pentagon_prefix(&self, count: usize) -> bool {
        self.is_vertex()
            && (self.sub.is_null() || count == 0 || self.sub.is_at_origin_prefix(count))
    }

    pub fn is_hexagon(&self) -> bool {
        !self.is_null() && !self.is_pentagon()
    }

    pub fn num_sides(&self) -> usize {
        if self.is_pentagon() {
            5
        } else {
            6
        }
    }

    /// True for centroid cells, whose children include vertex children.
    pub fn has_vertex_children(&self) -> bool {
        match self.primary {
            None => false,
            Some(_) if !self.sub.is_null() => self.sub.has_vertex_children(),
            Some(p) => p.is_vertex(),
        }
    }

    /// Major cells are the centroid cells of their parent.
    pub fn is_major(&self) -> bool {
        self.has_vertex_children()
    }

    pub fn is_northern(&self) -> bool {
        self.primary.is_some_and(Primary::is_northern)
    }

    /// Same primary and a sub-index prefix. The null index relates to nothing.
    pub fn is_ancestor_of(&self, other: &GlobalIndex) -> bool {
        match (self.primary, other.primary) {
            (Some(a), Some(b)) if a == b => {
                self.sub.is_null() || self.sub.is_ancestor_of(&other.sub)
            }
            _ => false,
        }
    }

    pub fn is_descendant_of(&self, other: &GlobalIndex) -> bool {
        other.is_ancestor_of(self)
    }

    /// Number of children of the cell described by the first `count`
    /// sub-index digits.
    pub fn max_child_count(&self, count: usize) -> usize {
        let count = count.min(self.sub.digit_count());
        if count == 0 {
            return if self.is_vertex() { 6 } else { 1 };
        }
        if self.sub.digit(count - 1) != 0 {
            1
        } else if self.is_pentagon_prefix(count) {
            6
        } else {
            7
        }
    }

    /// Checks that a vertex sub-index avoids the gap sector and that a face
    /// sub-index starts on the face centroid.
    pub fn is_valid(&self) -> bool {
        let Some(primary) = self.primary else {
            return self.sub.is_null();
        };
        if self.sub.is_null() {
            return true;
        }
        if primary.is_vertex() {
            HexDirection::from_digit(self.sub.hex_sector()) != primary.gap_direction()
        } else {
            self.sub.digit(0) == 0
        }
    }
}

impl fmt::Display for GlobalIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primary {
            None => f.write_str(NULL_LABEL),
            Some(p) if self.sub.is_null() => write!(f, "{p}"),
            Some(p) => write!(f, "{p}-{}", self.sub),
        }
    }
}

impl FromStr for GlobalIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s == NULL_LABEL {
            return Ok(Self::null());
        }
        let (primary, sub) = match s.split_once('-') {
            Some((p, digits)) => (p, Some(digits)),
            None => (s, None),
        };
        let primary: Primary = primary.parse()?;
        let sub = match sub {
            Some("") => return Err(Error::InvalidIndex(s.to_string())),
            Some(digits) => digits.parse()?,
            None => SubIndex::null(),
        };
        let index = Self::from_parts_unchecked(primary, sub);
        if index.resolution() <= MAX_RESOLUTION && index.is_valid() {
            Ok(index)
        } else {
            Err(Error::InvalidIndex(s.to_string()))
        }
    }
}

impl TryFrom<String> for GlobalIndex {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<GlobalIndex> for String {
    fn from(index: GlobalIndex) -> Self {
        index.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gi(s: &str) -> GlobalIndex {
        s.parse().unwrap()
    }

    #[test]
    fn parse_forms() {
        assert_eq!(gi("A").primary(), Some(Primary::face(b'A').unwrap()));
        assert_eq!(gi("12").primary(), Some(Primary::vertex(12).unwrap()));
        assert_eq!(gi("1-0").to_string(), "1-0");
        assert_eq!(gi("A-0102").to_string(), "A-0102");
        assert!(gi("").is_null());
        assert!(gi("NULL").is_null());
        assert_eq!(GlobalIndex::null().to_string(), "NULL");
    }

    #[test]
    fn parse_rejects_invalid() {
        for bad in [
            "X", "15", "0", "A-20", "1-1", "7-04", "AB-0", "A-07", "-010", "+5-0", "05-0", "01",
            "A-", "1-",
        ] {
            assert!(bad.parse::<GlobalIndex>().is_err(), "{bad} parsed");
        }
        assert!("1-20".parse::<GlobalIndex>().is_ok());
        assert!("7-1".parse::<GlobalIndex>().is_ok());
    }

    #[test]
    fn resolution_counts_primary_as_one() {
        assert_eq!(GlobalIndex::null().resolution(), -1);
        assert_eq!(gi("A").resolution(), 1);
        assert_eq!(gi("A-0").resolution(), 2);
        assert_eq!(gi("1-00000").resolution(), 6);
    }

    #[test]
    fn parse_stops_at_max_resolution() {
        let deepest = format!("A-{}", "0".repeat(MAX_RESOLUTION as usize - 1));
        assert_eq!(gi(&deepest).resolution(), MAX_RESOLUTION);

        let too_deep = format!("A-{}", "0".repeat(MAX_RESOLUTION as usize));
        assert!(matches!(
            too_deep.parse::<GlobalIndex>(),
            Err(Error::InvalidIndex(_))
        ));
    }

    #[test]
    fn canonical_strings_round_trip() {
        for s in ["5-0", "10-02", "A", "12", "T-0304"] {
            assert_eq!(gi(s).to_string(), s);
        }
        for primary in Primary::all() {
            assert_eq!(primary.to_string().parse::<Primary>().unwrap(), primary);
        }
    }

    #[test]
    fn primary_constructors_validate() {
        assert!(Primary::vertex(0).is_err());
        assert!(Primary::vertex(13).is_err());
        assert!(Primary::face(b'U').is_err());
        let seven = Primary::vertex(7).unwrap();
        assert_eq!(seven.vertex_number(), Some(7));
        assert_eq!(seven.face_letter(), None);
        let k = Primary::face(b'K').unwrap();
        assert_eq!(k.face_letter(), Some(b'K'));
        assert!(!k.is_northern());
        assert!(seven < k);
    }

    #[test]
    fn set_resolution_bounds() {
        let mut index = gi("A-0102");
        index.set_resolution(3).unwrap();
        assert_eq!(index.to_string(), "A-01");
        index.set_resolution(1).unwrap();
        assert_eq!(index.to_string(), "A");
        index.set_resolution(4).unwrap();
        assert_eq!(index.to_string(), "A-000");
        assert!(index.set_resolution(0).is_err());
        assert!(index.set_resolution(MAX_RESOLUTION + 1).is_err());
        assert!(GlobalIndex::null().set_resolution(3).is_err());
    }

    #[test]
    fn decrement_stops_at_primary() {
        let mut index = gi("R-02003");
        for _ in 0..5 {
            index.decrement_resolution().unwrap();
        }
        assert_eq!(index.to_string(), "R");
        assert!(index.decrement_resolution().is_err());
    }

    #[test]
    fn increment_stops_at_max() {
        let mut index = gi("1");
        while index.increment_resolution().is_ok() {}
        assert_eq!(index.resolution(), MAX_RESOLUTION);
        assert!(index.is_pentagon());
    }

    #[test]
    fn ordering_puts_vertices_first() {
        let mut list = vec![gi("B-0"), gi("12"), gi("A"), gi("1-0"), gi("1"), GlobalIndex::null()];
        list.sort();
        let names: Vec<String> = list.iter().map(|i| i.to_string()).collect();
        assert_eq!(names, ["NULL", "1", "1-0", "12", "A", "B-0"]);
    }

    #[test]
    fn pentagon_detection() {
        assert!(gi("1").is_pentagon());
        assert!(gi("1-000").is_pentagon());
        assert!(!gi("1-020").is_pentagon());
        assert!(!gi("A-0").is_pentagon());
        assert_eq!(gi("3-00").num_sides(), 5);
        assert_eq!(gi("3-02").num_sides(), 6);
        assert!(gi("1-020").is_pentagon_prefix(1));
        assert!(!gi("1-020").is_pentagon_prefix(2));
        assert!(gi("1-020").is_pentagon_prefix(0));
    }

    #[test]
    fn vertex_children() {
        assert!(gi("1").has_vertex_children());
        assert!(!gi("A").has_vertex_children());
        assert!(gi("A-0").has_vertex_children());
        assert!(!gi("A-03").has_vertex_children());
        assert!(!GlobalIndex::null().has_vertex_children());
    }

    #[test]
    fn child_counts() {
        assert_eq!(gi("1-0").max_child_count(0), 6);
        assert_eq!(gi("A-0").max_child_count(0), 1);
        assert_eq!(gi("1-0").max_child_count(1), 6);
        assert_eq!(gi("A-0").max_child_count(1), 7);
        assert_eq!(gi("A-03").max_child_count(2), 1);
    }

    #[test]
    fn ancestry_needs_same_primary() {
        assert!(gi("A").is_ancestor_of(&gi("A-0102")));
        assert!(gi("A-01").is_ancestor_of(&gi("A-0102")));
        assert!(!gi("B").is_ancestor_of(&gi("A-0102")));
        assert!(!GlobalIndex::null().is_ancestor_of(&gi("A")));
        assert!(gi("A-0102").is_descendant_of(&gi("A-0")));
    }

    #[test]
    fn hemisphere() {
        assert!(gi("1").is_northern());
        assert!(gi("J-0").is_northern());
        assert!(!gi("K-0").is_northern());
        assert!(!gi("12").is_northern());
    }

    proptest! {
        #[test]
        fn face_strings_round_trip(face in 0u8..20, digits in "(0[1-6]?){0,8}") {
            let text = format!("{}-0{}", char::from(b'A' + face), digits);
            let index: GlobalIndex = text.parse().unwrap();
            prop_assert_eq!(index.to_string(), text);
        }

        #[test]
        fn vertex_strings_round_trip(vertex in 1u8..=12, digits in "(0[2356]?){0,8}") {
            let text = format!("{vertex}-0{digits}");
            let index: GlobalIndex = text.parse().unwrap();
            prop_assert_eq!(index.to_string(), text);
        }
    }
}
