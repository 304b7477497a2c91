//! Attack generation.
//!
//! Sliding pieces use obstruction-difference masking: each square keeps two
//! precomputed half-rays per line direction, and a query masks each half-ray
//! down to the nearest blocker (inclusive, so captures stay representable).

mod tables;

pub(crate) use tables::{
    castling_blockers_kingside, castling_blockers_queenside, castling_pieces_kingside,
    castling_pieces_queenside, queenside_castle_danger_exempt, DOUBLE_PUSH_RANKS,
    KINGS_ROOK_MASKS, KING_ATTACKS, KING_INITIAL_SQUARES, KNIGHT_ATTACKS, PROMOTING_PAWN_RANKS,
    QUEENS_ROOK_MASKS,
};

use once_cell::sync::Lazy;

use super::types::{Bitboard, Color, Piece, Square};

/// Two half-rays of one line through a square: `down` runs toward
/// decreasing square indices, `up` toward increasing ones.
struct LineAttackMask {
    down: Bitboard,
    up: Bitboard,
}

/// The four line directions, each identified by the (file, rank) step of its
/// decreasing-index half-ray.
const DIRECTION_STEPS: [(i8, i8); 4] = [
    (-1, 0),  // horizontal
    (0, -1),  // vertical
    (1, -1),  // diagonal (a1-h8)
    (-1, -1), // anti-diagonal (h1-a8)
];

const HORIZONTAL: usize = 0;
const VERTICAL: usize = 1;
const DIAGONAL: usize = 2;
const ANTI_DIAGONAL: usize = 3;

fn ray(sq: usize, df: i8, dr: i8) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    let mut file = (sq % 8) as i8 + df;
    let mut rank = (sq / 8) as i8 + dr;
    while (0..8).contains(&file) && (0..8).contains(&rank) {
        bb.set(Square::from_coords(rank as u8, file as u8));
        file += df;
        rank += dr;
    }
    bb
}

/// Indexed by `direction * 64 + square`
static LINE_MASKS: Lazy<Vec<LineAttackMask>> = Lazy::new(|| {
    let mut masks = Vec::with_capacity(4 * 64);
    for &(df, dr) in &DIRECTION_STEPS {
        for sq in 0..64 {
            masks.push(LineAttackMask {
                down: ray(sq, df, dr),
                up: ray(sq, -df, -dr),
            });
        }
    }
    masks
});

/// Obstruction-difference lookup for one line. Each half-ray either passes
/// unobstructed or is cut at its nearest blocker, keeping the blocker square.
#[inline]
fn line_attacks(occupied: Bitboard, mask: &LineAttackMask) -> Bitboard {
    let down_occupied = occupied.and(mask.down);
    let down_slide = if down_occupied.is_empty() {
        mask.down
    } else {
        // Nearest blocker going down is the highest set bit
        down_occupied.isolate_msb().subtract_one().not().and(mask.down)
    };

    let up_occupied = occupied.and(mask.up);
    let up_slide = if up_occupied.is_empty() {
        mask.up
    } else {
        // Nearest blocker going up is the lowest set bit
        up_occupied.isolate_lsb().shl(1).subtract_one().and(mask.up)
    };

    down_slide.or(up_slide)
}

#[inline]
fn masks_for(direction: usize, sq: Square) -> &'static LineAttackMask {
    &LINE_MASKS[direction * 64 + sq.as_usize()]
}

/// Rook attacks from a square given full-board occupancy
#[inline]
pub(crate) fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    line_attacks(occupied, masks_for(HORIZONTAL, sq))
        .or(line_attacks(occupied, masks_for(VERTICAL, sq)))
}

/// Bishop attacks from a square given full-board occupancy
#[inline]
pub(crate) fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    line_attacks(occupied, masks_for(DIAGONAL, sq))
        .or(line_attacks(occupied, masks_for(ANTI_DIAGONAL, sq)))
}

/// Queen attacks from a square given full-board occupancy
#[inline]
pub(crate) fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied).or(bishop_attacks(sq, occupied))
}

/// Knight attack pattern for a square
#[inline]
pub(crate) fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.as_usize()]
}

/// King attack pattern for a square
#[inline]
pub(crate) fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.as_usize()]
}

/// Attack pattern dispatch by piece type; pawns are handled by the
/// direction-specific helpers below and yield the empty set here.
pub(crate) fn piece_attacks(piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    match piece {
        Piece::Knight => knight_attacks(sq),
        Piece::Bishop => bishop_attacks(sq, occupied),
        Piece::Rook => rook_attacks(sq, occupied),
        Piece::Queen => queen_attacks(sq, occupied),
        Piece::King => king_attacks(sq),
        Piece::Pawn => Bitboard::EMPTY,
    }
}

/// Squares strictly between two aligned squares (empty if unaligned)
#[inline]
pub(crate) fn between(a: Square, b: Square) -> Bitboard {
    BETWEEN[a.as_usize()][b.as_usize()]
}

/// The full line through two aligned squares (empty if unaligned)
#[inline]
pub(crate) fn line(a: Square, b: Square) -> Bitboard {
    LINE[a.as_usize()][b.as_usize()]
}

static BETWEEN: Lazy<Box<[[Bitboard; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for a in 0..64u8 {
        for b in 0..64u8 {
            let (sq_a, sq_b) = (Square(a), Square(b));
            let endpoints = Bitboard::from_square(sq_a).or(Bitboard::from_square(sq_b));
            if sq_a.rank() == sq_b.rank() || sq_a.file() == sq_b.file() {
                table[a as usize][b as usize] =
                    rook_attacks(sq_a, endpoints).and(rook_attacks(sq_b, endpoints));
            } else if sq_a.diagonal() == sq_b.diagonal()
                || sq_a.anti_diagonal() == sq_b.anti_diagonal()
            {
                table[a as usize][b as usize] =
                    bishop_attacks(sq_a, endpoints).and(bishop_attacks(sq_b, endpoints));
            }
        }
    }
    table
});

static LINE: Lazy<Box<[[Bitboard; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for a in 0..64u8 {
        for b in 0..64u8 {
            let (sq_a, sq_b) = (Square(a), Square(b));
            if sq_a.rank() == sq_b.rank() || sq_a.file() == sq_b.file() {
                table[a as usize][b as usize] = rook_attacks(sq_a, Bitboard::EMPTY)
                    .and(rook_attacks(sq_b, Bitboard::EMPTY));
            } else if sq_a.diagonal() == sq_b.diagonal()
                || sq_a.anti_diagonal() == sq_b.anti_diagonal()
            {
                table[a as usize][b as usize] = bishop_attacks(sq_a, Bitboard::EMPTY)
                    .and(bishop_attacks(sq_b, Bitboard::EMPTY));
            }
        }
    }
    table
});

// Pawn attacks as whole-set shifts, masking off the edge file that would
// wrap before shifting.

/// Captures toward the a-file (from White's perspective); offset 7 for
/// White, -7 for Black
#[inline]
pub(crate) fn pawn_left_attacks(pawns: Bitboard, side: Color) -> Bitboard {
    match side {
        Color::White => pawns.and_not(Bitboard::FILE_A).shl(7),
        Color::Black => pawns.and_not(Bitboard::FILE_H).shr(7),
    }
}

/// Captures toward the h-file (from White's perspective); offset 9 for
/// White, -9 for Black
#[inline]
pub(crate) fn pawn_right_attacks(pawns: Bitboard, side: Color) -> Bitboard {
    match side {
        Color::White => pawns.and_not(Bitboard::FILE_H).shl(9),
        Color::Black => pawns.and_not(Bitboard::FILE_A).shr(9),
    }
}

/// All squares attacked by a set of pawns of the given side
#[inline]
pub(crate) fn pawn_attacks(pawns: Bitboard, side: Color) -> Bitboard {
    pawn_left_attacks(pawns, side).or(pawn_right_attacks(pawns, side))
}

/// Squares attacked by a single pawn of the given side
#[inline]
pub(crate) fn pawn_attacks_from(sq: Square, side: Color) -> Bitboard {
    pawn_attacks(Bitboard::from_square(sq), side)
}

/// One-rank pawn advance for the given side
#[inline]
pub(crate) fn pawn_push(pawns: Bitboard, side: Color) -> Bitboard {
    match side {
        Color::White => pawns.shl(8),
        Color::Black => pawns.shr(8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rook_attacks_empty_board() {
        // Rook on e4: whole rank 4 and file e minus the square itself
        let attacks = rook_attacks(Square(28), Bitboard::EMPTY);
        let expected = Bitboard(0x1010_1010_EF10_1010);
        assert_eq!(attacks, expected);
    }

    #[test]
    fn test_rook_attacks_include_blockers() {
        // Blockers on e6 and c4 stay in the attack set; squares beyond drop out
        let blockers = Bitboard(1 << 44 | 1 << 26);
        let attacks = rook_attacks(Square(28), blockers);
        assert!(attacks.contains(Square(44))); // e6 capturable
        assert!(!attacks.contains(Square(52))); // e7 shadowed
        assert!(attacks.contains(Square(26))); // c4 capturable
        assert!(!attacks.contains(Square(25))); // b4 shadowed
    }

    #[test]
    fn test_bishop_attacks_both_diagonals() {
        let attacks = bishop_attacks(Square(28), Bitboard::EMPTY);
        assert!(attacks.contains(Square(1))); // b1
        assert!(attacks.contains(Square(55))); // h7
        assert!(attacks.contains(Square(7))); // h1
        assert!(attacks.contains(Square(56))); // a8
        assert!(!attacks.contains(Square(28)));
    }

    #[test]
    fn test_bishop_blocker_shadowing() {
        let blockers = Bitboard(1 << 46); // g6
        let attacks = bishop_attacks(Square(28), blockers);
        assert!(attacks.contains(Square(46)));
        assert!(!attacks.contains(Square(55))); // h7 behind the blocker
    }

    #[test]
    fn test_queen_is_rook_plus_bishop() {
        for sq in [0u8, 7, 28, 35, 63] {
            let occ = Bitboard(0x0000_1200_0450_0000);
            assert_eq!(
                queen_attacks(Square(sq), occ),
                rook_attacks(Square(sq), occ).or(bishop_attacks(Square(sq), occ))
            );
        }
    }

    #[test]
    fn test_slider_attacks_match_walked_rays() {
        // Obstruction-difference result must agree with a naive ray walk
        fn walked(sq: usize, occ: Bitboard, steps: &[(i8, i8)]) -> Bitboard {
            let mut result = Bitboard::EMPTY;
            for &(df, dr) in steps {
                let mut file = (sq % 8) as i8 + df;
                let mut rank = (sq / 8) as i8 + dr;
                while (0..8).contains(&file) && (0..8).contains(&rank) {
                    let s = Square::from_coords(rank as u8, file as u8);
                    result.set(s);
                    if occ.contains(s) {
                        break;
                    }
                    file += df;
                    rank += dr;
                }
            }
            result
        }

        let occupancies = [
            Bitboard::EMPTY,
            Bitboard(0xFF00_0000_0000_FF00),
            Bitboard(0x0055_AA00_55AA_0000),
            Bitboard::ALL,
        ];
        for sq in 0..64 {
            for occ in occupancies {
                assert_eq!(
                    rook_attacks(Square(sq as u8), occ),
                    walked(sq, occ, &[(1, 0), (-1, 0), (0, 1), (0, -1)]),
                    "rook mismatch on square {sq}"
                );
                assert_eq!(
                    bishop_attacks(Square(sq as u8), occ),
                    walked(sq, occ, &[(1, 1), (1, -1), (-1, 1), (-1, -1)]),
                    "bishop mismatch on square {sq}"
                );
            }
        }
    }

    #[test]
    fn test_between_and_line() {
        // e1 to e8: between is e2-e7, line is the whole e-file
        let b = between(Square::E1, Square::E8);
        assert_eq!(b.popcount(), 6);
        assert!(b.contains(Square(12)));
        let l = line(Square::E1, Square::E8);
        assert_eq!(l.popcount(), 8);

        // Unaligned squares give the empty set
        assert!(between(Square::A1, Square(10)).is_empty());
        assert!(line(Square::A1, Square(12)).is_empty());

        // Adjacent aligned squares have nothing between them
        assert!(between(Square::A1, Square::B1).is_empty());
    }

    #[test]
    fn test_pawn_attacks_edges() {
        // White pawn on a2 attacks only b3
        let a2 = Bitboard(1 << 8);
        assert_eq!(pawn_attacks(a2, Color::White), Bitboard(1 << 17));
        // White pawn on h2 attacks only g3
        let h2 = Bitboard(1 << 15);
        assert_eq!(pawn_attacks(h2, Color::White), Bitboard(1 << 22));
        // Black pawn on a7 attacks only b6
        let a7 = Bitboard(1 << 48);
        assert_eq!(pawn_attacks(a7, Color::Black), Bitboard(1 << 41));
    }

    #[test]
    fn test_pawn_push() {
        assert_eq!(pawn_push(Bitboard::RANK_2, Color::White), Bitboard::RANK_3);
        assert_eq!(pawn_push(Bitboard::RANK_7, Color::Black), Bitboard::RANK_6);
    }
}
