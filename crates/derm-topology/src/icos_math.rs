//! Topology-aware movement over the icosahedral grid.
//!
//! Moving one cell normally adds a unit step to the sub-index. Two cases
//! need the icosahedron itself:
//!
//! - **Overflow**: the addition grows the sub-index past its resolution,
//!   meaning the step left the current face or vertex patch. The extra
//!   leading digits name the direction taken at the coarser resolution and
//!   the connection tables give the primary entered and the rotation that
//!   re-orients the sub-index into its frame.
//! - **Gap**: a vertex patch has only five sectors. A step that lands in
//!   the missing sector is rotated one step towards the sector it came from.
//!
//! Every rotation applied to the sub-index is also added to the caller's
//! rotation accumulator so that relative directions stay consistent across
//! boundaries.
//!
//! # Cell positions
//!
//! Cells are ordered depth first: primaries in [`Primary::all`] order, then
//! children in the order [`children`] returns them. [`cell_position`] and
//! [`index_at_position`] convert between an index and its rank among the
//! descendants of a root at one resolution.

use crate::direction::{rotate_delta, HexDirection, Rotation};
use crate::error::{Error, Result};
use crate::hex_math;
use crate::index::{GlobalIndex, Primary, MAX_RESOLUTION};
use crate::sub_index::SubIndex;
use crate::tables::{
    FACE_OWNER, RES0_CONNECT, RES1_FACE_CONNECT, RES1_VERTEX_CONNECT, RES2_FACE_CONNECT,
};

/// Lowest resolution at which moves are plain sub-index additions.
pub const MIN_SUB_RESOLUTION: i32 = 2;

/// Number of vertices on the icosahedron.
const NUM_VERTICES: u64 = 12;

/// Number of faces on the icosahedron.
const NUM_FACES: u64 = 20;

// ============================================================================
// Movement
// ============================================================================

/// Move `index` one cell towards `dir`, adding any re-orientation to
/// `rotation` (kept in `0..6`).
///
/// Returns `false` and leaves the index untouched when `dir` points into
/// the gap of a pentagon.
///
/// # Panics
///
/// Panics on a null index, or when the sub-index addition overflows by
/// more than the icosahedron allows. Both are caller bugs.
pub fn move_index(index: &mut GlobalIndex, dir: HexDirection, rotation: &mut i32) -> bool {
    assert!(!index.is_null(), "cannot move the null index");

    let resolution = index.resolution();
    if resolution >= MIN_SUB_RESOLUTION {
        if !is_valid_direction(index, dir) {
            return false;
        }
        let start = index.clone();
        let sub = hex_math::move_index(start.sub_index(), dir)
            .unwrap_or_else(|err| panic!("moving {start} towards {dir}: {err}"));
        *index.sub_index_mut() = sub;
        overflow_correct(index, resolution, rotation);
        gap_correct(&start, index, rotation);
        true
    } else {
        resolution1_move(index, dir, rotation)
    }
}

/// The neighbour of `start` towards `dir`, or `None` across a pentagon gap.
pub fn neighbour(start: &GlobalIndex, dir: HexDirection) -> Option<GlobalIndex> {
    if !is_valid_direction(start, dir) {
        return None;
    }
    let mut index = start.clone();
    let mut rotation = 0;
    move_index(&mut index, dir, &mut rotation).then_some(index)
}

/// Neighbours of `index` in counter-clockwise order, paired with the
/// direction that reaches each. Pentagons yield five entries.
pub fn neighbours(index: &GlobalIndex) -> Vec<(HexDirection, GlobalIndex)> {
    HexDirection::ALL
        .into_iter()
        .filter_map(|dir| neighbour(index, dir).map(|n| (dir, n)))
        .collect()
}

/// The direction that moves `from` onto `to`, if they are neighbours.
pub fn neighbour_direction(from: &GlobalIndex, to: &GlobalIndex) -> Option<HexDirection> {
    HexDirection::ALL
        .into_iter()
        .find(|&dir| neighbour(from, dir).as_ref() == Some(to))
}

/// False for the null index and for the gap direction of a pentagon.
pub fn is_valid_direction(index: &GlobalIndex, dir: HexDirection) -> bool {
    match index.primary() {
        None => false,
        Some(p) if p.is_vertex() && index.is_pentagon() => {
            p.vertex_offset().is_some_and(|v| RES0_CONNECT[v][dir.ordinal()].is_some())
        }
        Some(_) => true,
    }
}

/// Rotate `dir` by `count` steps (positive counter-clockwise). On a
/// pentagon the gap direction is skipped, so five steps make a full turn.
pub fn rotate_direction(index: &GlobalIndex, dir: HexDirection, count: i32) -> HexDirection {
    if !index.is_pentagon() {
        return dir.rotate(count);
    }
    let step = count.signum();
    let mut remaining = count;
    let mut out = dir;
    while remaining != 0 {
        out = out.rotate(step);
        if is_valid_direction(index, out) {
            remaining -= step;
        }
    }
    out
}

/// Rotate the whole sub-index by `count` steps, negative for clockwise.
pub fn rotate_index(index: &mut GlobalIndex, count: i32) {
    let sense = if count < 0 {
        Rotation::Clockwise
    } else {
        Rotation::CounterClockwise
    };
    index.sub_index_mut().rotate(count.unsigned_abs(), sense);
}

/// Step between vertices at resolution 0. Returns `false` towards the gap.
///
/// # Panics
///
/// Panics when `index` is not rooted on a vertex.
pub fn resolution0_move(index: &mut GlobalIndex, dir: HexDirection, rotation: &mut i32) -> bool {
    let Some(v) = index.primary().and_then(Primary::vertex_offset) else {
        panic!("resolution 0 move from non-vertex {index}");
    };
    match RES0_CONNECT[v][dir.ordinal()] {
        Some((next, rot)) => {
            index.set_primary(Primary::vertex_unchecked(next));
            if rot > 0 {
                rotate_index(index, rot);
            }
            *rotation = rotate_delta(*rotation, rot);
            true
        }
        None => false,
    }
}

/// Step between primaries at resolution 1. A vertex stepping into its gap
/// takes the next clockwise direction instead and rotates one step back.
pub fn resolution1_move(index: &mut GlobalIndex, dir: HexDirection, rotation: &mut i32) -> bool {
    let Some(primary) = index.primary() else {
        panic!("cannot move the null index");
    };
    let connection = match primary.vertex_offset() {
        Some(v) => RES1_VERTEX_CONNECT[v][dir.ordinal()]
            .map(|(face, rot)| (Primary::face_unchecked(face), rot)),
        None => primary
            .face_offset()
            .map(|f| RES1_FACE_CONNECT[f][dir.ordinal()]),
    };

    let delta = match connection {
        Some((primary, rot)) => {
            index.set_primary(primary);
            if rot > 0 {
                rotate_index(index, rot);
            }
            rot
        }
        None => {
            resolution1_move(index, dir.rotate(-1), rotation);
            rotate_index(index, -1);
            -1
        }
    };
    *rotation = rotate_delta(*rotation, delta);
    true
}

/// Step off a face at resolution 2, onto the vertex patch named by the
/// table and the first sub-index digit it supplies.
fn resolution2_move(index: &mut GlobalIndex, dir: HexDirection, rotation: &mut i32) {
    let Some(face) = index.primary().and_then(Primary::face_offset) else {
        panic!("resolution 2 move from non-face {index}");
    };
    let (vertex, digit, rot) = RES2_FACE_CONNECT[face][dir.ordinal()];
    index.set_primary(Primary::vertex_unchecked(vertex));
    if let Err(err) = index.sub_index_mut().set_digit(0, digit) {
        panic!("resolution 2 move from {index}: {err}");
    }
    if rot > 0 {
        rotate_index(index, rot);
    }
    *rotation = rotate_delta(*rotation, rot);
}

/// Re-root an index whose sub-index addition grew by `index.resolution() -
/// resolution` digits, or that left a face through its first digit.
fn overflow_correct(index: &mut GlobalIndex, resolution: i32, rotation: &mut i32) {
    match index.resolution() - resolution {
        0 => {
            if index.is_face() {
                if let Some(dir) = HexDirection::from_digit(index.sub_index().digit(0)) {
                    resolution2_move(index, dir, rotation);
                }
            }
        }
        1 => {
            let overflow = index.sub_index_mut().strip_left();
            if let Some(dir) = HexDirection::from_digit(overflow) {
                resolution1_move(index, dir, rotation);
            }
        }
        2 => {
            debug_assert!(index.is_vertex(), "double overflow off a face: {index}");
            let overflow = index.sub_index_mut().strip_left();
            index.sub_index_mut().strip_left();
            if let Some(dir) = HexDirection::from_digit(overflow) {
                resolution0_move(index, dir, rotation);
            }
        }
        grown => panic!("sub-index of {index} overflowed by {grown} digits"),
    }
}

/// Turn a vertex result out of the gap sector, one step towards the sector
/// the move started from. Returns whether a rotation was applied.
fn gap_correct(start: &GlobalIndex, result: &mut GlobalIndex, rotation: &mut i32) -> bool {
    if result.resolution() < MIN_SUB_RESOLUTION {
        return false;
    }
    let Some(v) = result.primary().and_then(Primary::vertex_offset) else {
        return false;
    };
    let sector = result.sub_index().hex_sector();
    match HexDirection::from_digit(sector) {
        Some(d) if RES0_CONNECT[v][d.ordinal()].is_none() => {}
        _ => return false,
    }

    let mut start_offset = start.sub_index().hex_sector() + 1;
    if start_offset > 6 {
        start_offset = 1;
    }
    let (sense, delta) = if start_offset > sector {
        (Rotation::Clockwise, -1)
    } else {
        (Rotation::CounterClockwise, 1)
    };
    result.sub_index_mut().rotate(1, sense);
    *rotation = rotate_delta(*rotation, delta);
    true
}

// ============================================================================
// Hierarchy
// ============================================================================

/// Deepest common ancestor, or the null index when the primaries differ.
pub fn calc_ancestor(a: &GlobalIndex, b: &GlobalIndex) -> GlobalIndex {
    match (a.primary(), b.primary()) {
        (Some(pa), Some(pb)) if pa == pb => GlobalIndex::from_parts_unchecked(
            pa,
            SubIndex::calc_ancestor(a.sub_index(), b.sub_index()),
        ),
        _ => GlobalIndex::null(),
    }
}

/// The sub-index digits of `child` below `parent`.
pub fn calc_descendant(parent: &GlobalIndex, child: &GlobalIndex) -> Result<SubIndex> {
    let not_descendant = || Error::NotDescendant {
        parent: parent.to_string(),
        child: child.to_string(),
    };
    let Some(primary) = parent.primary() else {
        return Err(Error::NullIndex);
    };
    if child.primary() != Some(primary) {
        return Err(not_descendant());
    }
    if parent.sub_index().is_null() {
        if child.sub_index().is_null() {
            return Err(not_descendant());
        }
        return Ok(child.sub_index().clone());
    }
    SubIndex::calc_descendant(parent.sub_index(), child.sub_index()).map_err(|_| not_descendant())
}

/// The cell one resolution coarser.
pub fn parent(index: &GlobalIndex) -> Result<GlobalIndex> {
    let resolution = index.resolution();
    let mut out = index.clone();
    if resolution > MIN_SUB_RESOLUTION {
        out.sub_index_mut().strip_right();
    } else if resolution == MIN_SUB_RESOLUTION {
        out.set_resolution(1)?;
    } else {
        return Err(Error::ResolutionUnderflow(resolution));
    }
    Ok(out)
}

/// Children one resolution finer: the centroid child first, then vertex
/// children counter-clockwise, skipping a pentagon's gap.
pub fn children(index: &GlobalIndex) -> Vec<GlobalIndex> {
    let Some(primary) = index.primary() else {
        return Vec::new();
    };
    if index.resolution() >= MAX_RESOLUTION {
        return Vec::new();
    }

    let digits: Vec<u8> = if index.has_vertex_children() {
        let gap = index.is_pentagon().then(|| primary.gap_direction()).flatten();
        std::iter::once(0)
            .chain(
                HexDirection::ALL
                    .into_iter()
                    .filter(|&d| Some(d) != gap)
                    .map(HexDirection::digit),
            )
            .collect()
    } else {
        vec![0]
    };

    digits
        .into_iter()
        .filter_map(|digit| {
            let mut child = index.clone();
            child.sub_index_mut().append(digit).ok().map(|_| child)
        })
        .collect()
}

/// Vertex owning a face, used to assign each face's shared cells once.
pub fn face_owner(face: Primary) -> Option<u8> {
    face.face_offset().map(|f| FACE_OWNER[f])
}

// ============================================================================
// Cell counting and positions
// ============================================================================

/// Shape of a subtree, which fixes how many descendants it has.
#[derive(Clone, Copy)]
enum Subtree {
    /// A centroid on a vertex: five vertex children.
    Pentagon = 0,
    /// A centroid elsewhere: six vertex children.
    Hexagon = 1,
    /// A vertex child: a single centroid child.
    Vertex = 2,
}

const COUNT_DEPTHS: usize = MAX_RESOLUTION as usize + 1;

/// Descendant counts per subtree shape and relative depth.
const SUBTREE_COUNTS: [[u64; 3]; COUNT_DEPTHS] = build_subtree_counts();

const fn build_subtree_counts() -> [[u64; 3]; COUNT_DEPTHS] {
    let mut table = [[1u64; 3]; COUNT_DEPTHS];
    let mut k = 1;
    while k < COUNT_DEPTHS {
        let [p, h, w] = table[k - 1];
        table[k] = [
            p.saturating_add(w.saturating_mul(5)),
            h.saturating_add(w.saturating_mul(6)),
            h,
        ];
        k += 1;
    }
    table
}

fn subtree_shape(index: &GlobalIndex) -> Subtree {
    if index.is_pentagon() {
        Subtree::Pentagon
    } else if index.has_vertex_children() {
        Subtree::Hexagon
    } else {
        Subtree::Vertex
    }
}

/// Number of cells covering the sphere at `resolution`: `10 * 3^r + 2`.
pub fn cell_count(resolution: i32) -> Result<u64> {
    if resolution == 0 {
        return Ok(NUM_VERTICES);
    }
    if !(1..=MAX_RESOLUTION).contains(&resolution) {
        return Err(Error::InvalidResolution(resolution));
    }
    let [p, _, w] = SUBTREE_COUNTS[(resolution - 1) as usize];
    Ok(p
        .saturating_mul(NUM_VERTICES)
        .saturating_add(w.saturating_mul(NUM_FACES)))
}

/// Number of descendants of `root` at `resolution`, the root included when
/// the resolutions match.
pub fn subtree_cell_count(root: &GlobalIndex, resolution: i32) -> Result<u64> {
    if root.is_null() {
        return Err(Error::NullIndex);
    }
    if resolution < root.resolution() || resolution > MAX_RESOLUTION {
        return Err(Error::InvalidResolution(resolution));
    }
    let depth = (resolution - root.resolution()) as usize;
    Ok(SUBTREE_COUNTS[depth][subtree_shape(root) as usize])
}

/// Depth-first rank of `index` among the descendants of `root` at the
/// resolution of `index`.
pub fn cell_position(root: &GlobalIndex, index: &GlobalIndex) -> Result<u64> {
    if root.is_null() || index.is_null() {
        return Err(Error::NullIndex);
    }
    if !root.is_ancestor_of(index) && root != index {
        return Err(Error::NotDescendant {
            parent: root.to_string(),
            child: index.to_string(),
        });
    }

    let resolution = index.resolution();
    let mut position = 0u64;
    let mut current = root.clone();
    while current.resolution() < resolution {
        let mut target = index.clone();
        target.set_resolution(current.resolution() + 1)?;
        for child in children(&current) {
            if child == target {
                break;
            }
            position = position.saturating_add(subtree_cell_count(&child, resolution)?);
        }
        current = target;
    }
    Ok(position)
}

/// Depth-first rank of `index` among all cells of its resolution.
pub fn global_cell_position(index: &GlobalIndex) -> Result<u64> {
    let Some(primary) = index.primary() else {
        return Err(Error::NullIndex);
    };
    let resolution = index.resolution();
    let mut position = 0u64;
    for earlier in Primary::all().take_while(|&p| p != primary) {
        position = position
            .saturating_add(subtree_cell_count(&GlobalIndex::from_primary(earlier), resolution)?);
    }
    let root = GlobalIndex::from_primary(primary);
    Ok(position.saturating_add(cell_position(&root, index)?))
}

/// The descendant of `root` at `resolution` with depth-first rank `position`.
pub fn index_at_position(
    root: &GlobalIndex,
    resolution: i32,
    position: u64,
) -> Result<GlobalIndex> {
    let total = subtree_cell_count(root, resolution)?;
    if position >= total {
        return Err(Error::PositionOutOfRange {
            root: root.to_string(),
            resolution,
            position,
        });
    }

    let mut remaining = position;
    let mut current = root.clone();
    while current.resolution() < resolution {
        let mut next = None;
        for child in children(&current) {
            let count = subtree_cell_count(&child, resolution)?;
            if remaining < count {
                next = Some(child);
                break;
            }
            remaining -= count;
        }
        current = next.ok_or_else(|| Error::PositionOutOfRange {
            root: root.to_string(),
            resolution,
            position,
        })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gi(s: &str) -> GlobalIndex {
        s.parse().unwrap()
    }

    fn dir(n: i32) -> HexDirection {
        HexDirection::try_from(n).unwrap()
    }

    fn step(from: &str, d: i32) -> String {
        neighbour(&gi(from), dir(d)).unwrap().to_string()
    }

    fn step_rotation(from: &str, d: i32) -> i32 {
        let mut index = gi(from);
        let mut rotation = 0;
        assert!(move_index(&mut index, dir(d), &mut rotation));
        rotation
    }

    #[test]
    fn step_across_gap() {
        assert_eq!(step("3-00201", 6), "3-06030");
        assert_eq!(step("3-06030", 2), "3-00201");
        assert_eq!(step("1-206", 6), "1-602");
    }

    #[test]
    fn step_vertex_to_vertex() {
        assert_eq!(step("3-40404", 4), "7-10101");
        assert_eq!(step("7-10101", 1), "3-40404");
    }

    #[test]
    fn step_face_to_face() {
        assert_eq!(step("K-020202", 2), "F-050505");
        assert_eq!(step("F-050505", 5), "K-020202");
    }

    #[test]
    fn step_vertex_to_face() {
        assert_eq!(step("3-4020", 2), "F-0606");
        assert_eq!(step("F-0606", 5), "3-4020");
    }

    #[test]
    fn step_on_and_off_poles() {
        assert_eq!(step("1-60501", 6), "D-06010");
        assert_eq!(step("D-06010", 2), "1-60501");
        assert_eq!(step("1-605006", 6), "D-060102");
        assert_eq!(step("D-060102", 2), "1-605006");
    }

    #[test]
    fn step_across_gap_with_overflow() {
        assert_eq!(step("3-201", 6), "B-030");
        assert_eq!(step("B-030", 2), "3-201");
        assert_eq!(step("3-201", 1), "B-003");
        assert_eq!(step("B-003", 3), "3-201");
        assert_eq!(step("3-201", 2), "B-020");
        assert_eq!(step("B-020", 4), "3-201");
        assert_eq!(step("B-020", 3), "3-202");
        assert_eq!(step("3-202", 1), "B-020");
        assert_eq!(step("B-020", 2), "1-303");
        assert_eq!(step("1-303", 4), "B-020");
    }

    #[test]
    fn rotation_accumulates_across_boundaries() {
        assert_eq!(step_rotation("A-01", 1), 4);
        assert_eq!(step_rotation("A-02", 2), 1);
        assert_eq!(step_rotation("A-06", 6), 5);
        assert_eq!(step_rotation("1-6", 2), 1);
        assert_eq!(step_rotation("1-2", 6), 5);
    }

    #[test]
    fn resolution1_moves() {
        let mut index = gi("1");
        let mut rotation = 0;
        assert!(resolution1_move(&mut index, HexDirection::Six, &mut rotation));
        assert_eq!(index, gi("E"));
        assert!(resolution1_move(&mut index, HexDirection::Three, &mut rotation));
        assert_eq!(index, gi("6"));
    }

    #[test]
    fn resolution0_moves() {
        let mut index = gi("1");
        let mut rotation = 0;
        assert!(resolution0_move(&mut index, HexDirection::Four, &mut rotation));
        assert_eq!(index.primary(), Primary::vertex(4).ok());
        assert!(!resolution0_move(&mut index, HexDirection::One, &mut rotation));
    }

    #[test]
    #[should_panic]
    fn moving_null_panics() {
        let mut index = GlobalIndex::null();
        let mut rotation = 0;
        move_index(&mut index, HexDirection::One, &mut rotation);
    }

    #[test]
    fn gap_direction_is_invalid_on_pentagons_only() {
        for d in HexDirection::ALL {
            assert_eq!(is_valid_direction(&gi("1-0"), d), d != HexDirection::One);
            assert!(is_valid_direction(&gi("1-2"), d));
        }
        assert!(!is_valid_direction(&GlobalIndex::null(), HexDirection::Two));
        assert!(neighbour(&gi("1-0"), HexDirection::One).is_none());
    }

    #[test]
    fn pentagon_rotation_skips_gap() {
        let pole = gi("1");
        assert_eq!(rotate_direction(&pole, HexDirection::One, 1), HexDirection::Two);
        assert_eq!(rotate_direction(&pole, HexDirection::One, -1), HexDirection::Six);
        assert_eq!(rotate_direction(&pole, HexDirection::Two, 1), HexDirection::Three);
        assert_eq!(rotate_direction(&pole, HexDirection::Two, -1), HexDirection::Six);
        assert_eq!(rotate_direction(&pole, HexDirection::Four, 1), HexDirection::Five);
        assert_eq!(rotate_direction(&pole, HexDirection::Four, -1), HexDirection::Three);

        let face = gi("A");
        assert_eq!(rotate_direction(&face, HexDirection::Two, -1), HexDirection::One);
        assert_eq!(rotate_direction(&face, HexDirection::Four, -1), HexDirection::Three);
    }

    #[test]
    fn neighbour_directions() {
        assert_eq!(neighbour_direction(&gi("1-0"), &gi("2-0")), None);
        for d in 2..=6 {
            assert_eq!(neighbour_direction(&gi("1-0"), &gi(&format!("1-{d}"))), Some(dir(d)));
        }
        for d in 1..=6 {
            assert_eq!(neighbour_direction(&gi("A-00"), &gi(&format!("A-0{d}"))), Some(dir(d)));
        }
    }

    #[test]
    fn neighbour_counts_match_sides() {
        for s in ["1", "7", "A", "1-0", "12-00", "A-0", "A-010", "3-20", "K-0203"] {
            let index = gi(s);
            let found = neighbours(&index);
            assert_eq!(found.len(), index.num_sides(), "{s}");
            let mut distinct: Vec<_> = found.into_iter().map(|(_, n)| n).collect();
            distinct.sort();
            distinct.dedup();
            assert_eq!(distinct.len(), index.num_sides(), "{s}");
        }
    }

    #[test]
    fn moves_are_reversible() {
        for s in ["A-010", "3-0040", "12-0305", "T-00020", "5-0", "B-0"] {
            let start = gi(s);
            for (d, n) in neighbours(&start) {
                assert!(neighbour_direction(&n, &start).is_some(), "{s} towards {d}");
            }
        }
    }

    #[test]
    fn ancestors() {
        let a = gi("A-010203");
        assert_eq!(calc_ancestor(&a, &gi("A")), gi("A"));
        assert_eq!(calc_ancestor(&a, &gi("A-0102")), gi("A-0102"));
        assert_eq!(calc_ancestor(&a, &gi("A-01020304")), a);
        assert_eq!(calc_ancestor(&a, &gi("A-010204")), gi("A-01020"));
        assert_eq!(calc_ancestor(&a, &gi("A-020304")), gi("A-0"));
        assert_eq!(calc_ancestor(&gi("1-020304"), &gi("1-20304")), gi("1"));
        assert!(calc_ancestor(&a, &gi("B-010203")).is_null());
        assert!(calc_ancestor(&a, &GlobalIndex::null()).is_null());
        assert!(calc_ancestor(&GlobalIndex::null(), &GlobalIndex::null()).is_null());
    }

    #[test]
    fn descendants() {
        let parent = gi("1-2010304");
        assert!(calc_descendant(&parent, &gi("2-201030405")).is_err());
        assert_eq!(
            calc_descendant(&parent, &gi("1-20103040506")).unwrap().to_string(),
            "0506"
        );
        assert_eq!(calc_descendant(&gi("A"), &gi("A-01")).unwrap().to_string(), "01");
        assert_eq!(
            calc_descendant(&GlobalIndex::null(), &gi("A-01")),
            Err(Error::NullIndex)
        );
    }

    #[test]
    fn parents() {
        assert_eq!(parent(&gi("1-4030")).unwrap(), gi("1-403"));
        assert_eq!(parent(&gi("A-0")).unwrap(), gi("A"));
        assert!(parent(&gi("A")).is_err());
    }

    #[test]
    fn children_of_each_shape() {
        let names = |s: &str| -> Vec<String> {
            children(&gi(s)).iter().map(ToString::to_string).collect()
        };
        assert_eq!(names("1"), ["1-0", "1-2", "1-3", "1-4", "1-5", "1-6"]);
        assert_eq!(names("A"), ["A-0"]);
        assert_eq!(names("1-0"), ["1-00", "1-02", "1-03", "1-04", "1-05", "1-06"]);
        assert_eq!(names("12-0"), ["12-00", "12-01", "12-02", "12-03", "12-05", "12-06"]);
        assert_eq!(
            names("A-0"),
            ["A-00", "A-01", "A-02", "A-03", "A-04", "A-05", "A-06"]
        );
        assert_eq!(names("1-2"), ["1-20"]);
        assert!(children(&GlobalIndex::null()).is_empty());
    }

    #[test]
    fn every_face_has_an_owner() {
        for face in Primary::all().filter(|p| p.is_face()) {
            let owner = face_owner(face).unwrap();
            assert!((1..=12).contains(&owner));
        }
        assert_eq!(face_owner(Primary::vertex(1).unwrap()), None);
    }

    #[test]
    fn global_cell_counts() {
        assert_eq!(cell_count(0).unwrap(), 12);
        assert_eq!(cell_count(1).unwrap(), 32);
        assert_eq!(cell_count(2).unwrap(), 92);
        assert_eq!(cell_count(3).unwrap(), 272);
        assert_eq!(cell_count(12).unwrap(), 5_314_412);
        for r in 1..10u32 {
            assert_eq!(cell_count(r as i32).unwrap(), 10 * 3u64.pow(r) + 2);
        }
        assert!(cell_count(-1).is_err());
    }

    #[test]
    fn subtree_counts() {
        let count = |s: &str, r| subtree_cell_count(&gi(s), r).unwrap();
        assert_eq!([count("01", 1), count("01", 2), count("01", 3)], [1, 6, 11]);
        assert_eq!([count("01-2", 2), count("01-2", 3), count("01-2", 4)], [1, 1, 7]);
        assert_eq!([count("A", 1), count("A", 2), count("A", 3)], [1, 1, 7]);
        assert_eq!([count("A-0", 2), count("A-0", 3), count("A-0", 4)], [1, 7, 13]);
        assert!(subtree_cell_count(&gi("A-0"), 1).is_err());
    }

    #[test]
    fn positions_follow_child_order() {
        let root = gi("1");
        assert_eq!(cell_position(&root, &gi("1-00")).unwrap(), 0);
        assert_eq!(cell_position(&root, &gi("1-02")).unwrap(), 1);
        assert_eq!(cell_position(&root, &gi("1-06")).unwrap(), 5);
        assert_eq!(cell_position(&root, &gi("1-20")).unwrap(), 6);
        assert_eq!(cell_position(&root, &gi("1-60")).unwrap(), 10);
        assert!(cell_position(&gi("A-0"), &gi("B-00")).is_err());
    }

    #[test]
    fn positions_round_trip() {
        for (root, resolution) in [("M-0", 6), ("3-20", 7), ("12", 5), ("A", 4)] {
            let root = gi(root);
            let total = subtree_cell_count(&root, resolution).unwrap();
            for position in 0..total {
                let index = index_at_position(&root, resolution, position).unwrap();
                assert_eq!(index.resolution(), resolution);
                assert_eq!(cell_position(&root, &index).unwrap(), position);
            }
            assert!(matches!(
                index_at_position(&root, resolution, total),
                Err(Error::PositionOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn global_positions_are_dense() {
        assert_eq!(global_cell_position(&gi("1")).unwrap(), 0);
        assert_eq!(global_cell_position(&gi("A")).unwrap(), 12);
        assert_eq!(global_cell_position(&gi("T")).unwrap(), 31);
        assert_eq!(global_cell_position(&gi("2-0")).unwrap(), 6);
        assert_eq!(global_cell_position(&gi("T-0")).unwrap(), 91);
    }
}
