//! Icosahedron connection tables.
//!
//! Rotations are counter-clockwise sixty-degree steps that re-orient a
//! sub-index from the frame of the cell being left into the frame of the
//! cell being entered.

use crate::direction::HexDirection;
use crate::index::Primary;

const fn v(n: u8) -> Primary {
    Primary::vertex_unchecked(n)
}

const fn f(c: u8) -> Primary {
    Primary::face_unchecked(c)
}

/// Missing direction of each vertex pentagon, indexed by vertex - 1.
pub(crate) const GAP_DIRECTION: [HexDirection; 12] = [
    HexDirection::One,
    HexDirection::One,
    HexDirection::One,
    HexDirection::One,
    HexDirection::One,
    HexDirection::One,
    HexDirection::Four,
    HexDirection::Four,
    HexDirection::Four,
    HexDirection::Four,
    HexDirection::Four,
    HexDirection::Four,
];

/// Vertex reached from a vertex at resolution 0, with the rotation to apply.
/// `None` marks the gap direction.
#[rustfmt::skip]
pub(crate) const RES0_CONNECT: [[Option<(u8, i32)>; 6]; 12] = [
    // 1
    [None, Some((2, 3)), Some((3, 2)), Some((4, 1)), Some((5, 0)), Some((6, 5))],
    // 2
    [None, Some((1, 3)), Some((6, 0)), Some((11, 0)), Some((7, 0)), Some((3, 0))],
    // 3
    [None, Some((1, 4)), Some((2, 0)), Some((7, 0)), Some((8, 0)), Some((4, 0))],
    // 4
    [None, Some((1, 5)), Some((3, 0)), Some((8, 0)), Some((9, 0)), Some((5, 0))],
    // 5
    [None, Some((1, 0)), Some((4, 0)), Some((9, 0)), Some((10, 0)), Some((6, 0))],
    // 6
    [None, Some((1, 1)), Some((5, 0)), Some((10, 0)), Some((11, 0)), Some((2, 0))],
    // 7
    [Some((3, 0)), Some((2, 0)), Some((11, 0)), None, Some((12, 1)), Some((8, 0))],
    // 8
    [Some((4, 0)), Some((3, 0)), Some((7, 0)), None, Some((12, 0)), Some((9, 0))],
    // 9
    [Some((5, 0)), Some((4, 0)), Some((8, 0)), None, Some((12, 5)), Some((10, 0))],
    // 10
    [Some((6, 0)), Some((5, 0)), Some((9, 0)), None, Some((12, 4)), Some((11, 0))],
    // 11
    [Some((2, 0)), Some((6, 0)), Some((10, 0)), None, Some((12, 3)), Some((7, 0))],
    // 12
    [Some((9, 1)), Some((8, 0)), Some((7, 5)), None, Some((11, 3)), Some((10, 2))],
];

/// Face reached from a vertex at resolution 1.
#[rustfmt::skip]
pub(crate) const RES1_VERTEX_CONNECT: [[Option<(u8, i32)>; 6]; 12] = [
    // 1
    [None, Some((b'A', 2)), Some((b'B', 1)), Some((b'C', 0)), Some((b'D', 5)), Some((b'E', 4))],
    // 2
    [None, Some((b'E', 0)), Some((b'J', 0)), Some((b'O', 0)), Some((b'F', 0)), Some((b'A', 0))],
    // 3
    [None, Some((b'A', 0)), Some((b'F', 0)), Some((b'K', 0)), Some((b'G', 0)), Some((b'B', 0))],
    // 4
    [None, Some((b'B', 0)), Some((b'G', 0)), Some((b'L', 0)), Some((b'H', 0)), Some((b'C', 0))],
    // 5
    [None, Some((b'C', 0)), Some((b'H', 0)), Some((b'M', 0)), Some((b'I', 0)), Some((b'D', 0))],
    // 6
    [None, Some((b'D', 0)), Some((b'I', 0)), Some((b'N', 0)), Some((b'J', 0)), Some((b'E', 0))],
    // 7
    [Some((b'F', 0)), Some((b'O', 0)), Some((b'T', 0)), None, Some((b'P', 0)), Some((b'K', 0))],
    // 8
    [Some((b'G', 0)), Some((b'K', 0)), Some((b'P', 0)), None, Some((b'Q', 0)), Some((b'L', 0))],
    // 9
    [Some((b'H', 0)), Some((b'L', 0)), Some((b'Q', 0)), None, Some((b'R', 0)), Some((b'M', 0))],
    // 10
    [Some((b'I', 0)), Some((b'M', 0)), Some((b'R', 0)), None, Some((b'S', 0)), Some((b'N', 0))],
    // 11
    [Some((b'J', 0)), Some((b'N', 0)), Some((b'S', 0)), None, Some((b'T', 0)), Some((b'O', 0))],
    // 12
    [Some((b'Q', 0)), Some((b'P', 5)), Some((b'T', 4)), None, Some((b'S', 2)), Some((b'R', 1))],
];

/// Cell reached from a face at resolution 1.
#[rustfmt::skip]
pub(crate) const RES1_FACE_CONNECT: [[(Primary, i32); 6]; 20] = [
    // A
    [(v(1), 4), (f(b'E'), 1), (v(2), 0), (f(b'F'), 0), (v(3), 0), (f(b'B'), 5)],
    // B
    [(v(1), 5), (f(b'A'), 1), (v(3), 0), (f(b'G'), 0), (v(4), 0), (f(b'C'), 5)],
    // C
    [(v(1), 0), (f(b'B'), 1), (v(4), 0), (f(b'H'), 0), (v(5), 0), (f(b'D'), 5)],
    // D
    [(v(1), 1), (f(b'C'), 1), (v(5), 0), (f(b'I'), 0), (v(6), 0), (f(b'E'), 5)],
    // E
    [(v(1), 2), (f(b'D'), 1), (v(6), 0), (f(b'J'), 0), (v(2), 0), (f(b'A'), 5)],
    // F
    [(f(b'A'), 0), (v(2), 0), (f(b'O'), 0), (v(7), 0), (f(b'K'), 0), (v(3), 0)],
    // G
    [(f(b'B'), 0), (v(3), 0), (f(b'K'), 0), (v(8), 0), (f(b'L'), 0), (v(4), 0)],
    // H
    [(f(b'C'), 0), (v(4), 0), (f(b'L'), 0), (v(9), 0), (f(b'M'), 0), (v(5), 0)],
    // I
    [(f(b'D'), 0), (v(5), 0), (f(b'M'), 0), (v(10), 0), (f(b'N'), 0), (v(6), 0)],
    // J
    [(f(b'E'), 0), (v(6), 0), (f(b'N'), 0), (v(11), 0), (f(b'O'), 0), (v(2), 0)],
    // K
    [(v(3), 0), (f(b'F'), 0), (v(7), 0), (f(b'P'), 0), (v(8), 0), (f(b'G'), 0)],
    // L
    [(v(4), 0), (f(b'G'), 0), (v(8), 0), (f(b'Q'), 0), (v(9), 0), (f(b'H'), 0)],
    // M
    [(v(5), 0), (f(b'H'), 0), (v(9), 0), (f(b'R'), 0), (v(10), 0), (f(b'I'), 0)],
    // N
    [(v(6), 0), (f(b'I'), 0), (v(10), 0), (f(b'S'), 0), (v(11), 0), (f(b'J'), 0)],
    // O
    [(v(2), 0), (f(b'J'), 0), (v(11), 0), (f(b'T'), 0), (v(7), 0), (f(b'F'), 0)],
    // P
    [(f(b'K'), 0), (v(7), 0), (f(b'T'), 5), (v(12), 1), (f(b'Q'), 1), (v(8), 0)],
    // Q
    [(f(b'L'), 0), (v(8), 0), (f(b'P'), 5), (v(12), 0), (f(b'R'), 1), (v(9), 0)],
    // R
    [(f(b'M'), 0), (v(9), 0), (f(b'Q'), 5), (v(12), 5), (f(b'S'), 1), (v(10), 0)],
    // S
    [(f(b'N'), 0), (v(10), 0), (f(b'R'), 5), (v(12), 4), (f(b'T'), 1), (v(11), 0)],
    // T
    [(f(b'O'), 0), (v(11), 0), (f(b'S'), 5), (v(12), 2), (f(b'P'), 1), (v(7), 0)],
];

/// Vertex and first sub-index digit reached when a move past resolution 1
/// leaves a face.
#[rustfmt::skip]
pub(crate) const RES2_FACE_CONNECT: [[(u8, u8, i32); 6]; 20] = [
    // A
    [(1, 5, 4), (1, 4, 4), (2, 1, 1), (2, 6, 0), (3, 3, 0), (3, 2, 0)],
    // B
    [(1, 5, 5), (1, 4, 5), (3, 1, 1), (3, 6, 0), (4, 3, 0), (4, 2, 0)],
    // C
    [(1, 5, 0), (1, 4, 0), (4, 1, 1), (4, 6, 0), (5, 3, 0), (5, 2, 0)],
    // D
    [(1, 5, 1), (1, 4, 1), (5, 1, 1), (5, 6, 0), (6, 3, 0), (6, 2, 0)],
    // E
    [(1, 5, 3), (1, 4, 2), (6, 1, 1), (6, 6, 0), (2, 3, 0), (2, 2, 0)],
    // F
    [(3, 3, 0), (2, 6, 0), (2, 5, 0), (7, 2, 0), (7, 1, 0), (3, 4, 0)],
    // G
    [(4, 3, 0), (3, 6, 0), (3, 5, 0), (8, 2, 0), (8, 1, 0), (4, 4, 0)],
    // H
    [(5, 3, 0), (4, 6, 0), (4, 5, 0), (9, 2, 0), (9, 1, 0), (5, 4, 0)],
    // I
    [(6, 3, 0), (5, 6, 0), (5, 5, 0), (10, 2, 0), (10, 1, 0), (6, 4, 0)],
    // J
    [(2, 3, 0), (6, 6, 0), (6, 5, 0), (11, 2, 0), (11, 1, 0), (2, 4, 0)],
    // K
    [(3, 5, 0), (3, 4, 0), (7, 1, 0), (7, 6, 0), (8, 3, 0), (8, 2, 0)],
    // L
    [(4, 5, 0), (4, 4, 0), (8, 1, 0), (8, 6, 0), (9, 3, 0), (9, 2, 0)],
    // M
    [(5, 5, 0), (5, 4, 0), (9, 1, 0), (9, 6, 0), (10, 3, 0), (10, 2, 0)],
    // N
    [(6, 5, 0), (6, 4, 0), (10, 1, 0), (10, 6, 0), (11, 3, 0), (11, 2, 0)],
    // O
    [(2, 5, 0), (2, 4, 0), (11, 1, 0), (11, 6, 0), (7, 3, 0), (7, 2, 0)],
    // P
    [(8, 3, 0), (7, 6, 0), (7, 5, 0), (12, 2, 1), (12, 1, 1), (8, 4, 1)],
    // Q
    [(9, 3, 0), (8, 6, 0), (8, 5, 0), (12, 2, 0), (12, 1, 0), (9, 4, 1)],
    // R
    [(10, 3, 0), (9, 6, 0), (9, 5, 0), (12, 2, 5), (12, 1, 5), (10, 4, 1)],
    // S
    [(11, 3, 0), (10, 6, 0), (10, 5, 0), (12, 2, 4), (12, 1, 4), (11, 4, 1)],
    // T
    [(7, 3, 0), (11, 6, 0), (11, 5, 0), (12, 2, 3), (12, 1, 2), (7, 4, 1)],
];

/// Vertex owning each face, used to visit every cell exactly once.
pub(crate) const FACE_OWNER: [u8; 20] = [
    3, 4, 5, 6, 2, 3, 3, 4, 5, 6, 7, 8, 9, 10, 11, 7, 8, 9, 10, 11,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaps_match_resolution0_table() {
        for (vertex, row) in RES0_CONNECT.iter().enumerate() {
            let gap = GAP_DIRECTION[vertex];
            for dir in HexDirection::ALL {
                assert_eq!(row[dir.ordinal()].is_none(), dir == gap);
                assert_eq!(RES1_VERTEX_CONNECT[vertex][dir.ordinal()].is_none(), dir == gap);
            }
        }
    }

    #[test]
    fn resolution0_links_are_symmetric() {
        for (from, row) in RES0_CONNECT.iter().enumerate() {
            for (to, _) in row.iter().flatten() {
                let back = &RES0_CONNECT[*to as usize - 1];
                assert!(
                    back.iter().flatten().any(|(v, _)| *v as usize == from + 1),
                    "vertex {} -> {to} has no way back",
                    from + 1
                );
            }
        }
    }

    #[test]
    fn every_face_is_reached_from_its_owner() {
        for (face, owner) in FACE_OWNER.iter().enumerate() {
            let letter = b'A' + face as u8;
            let row = &RES1_VERTEX_CONNECT[*owner as usize - 1];
            assert!(row.iter().flatten().any(|(c, _)| *c == letter));
        }
    }
}
