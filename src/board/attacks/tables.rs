//! Precomputed leaper attacks and static board patterns.

use once_cell::sync::Lazy;

use crate::board::types::{Bitboard, Color, Square};

/// Landing offsets as (file delta, rank delta); offsets that leave the board
/// are discarded per square using file/rank arithmetic, never index wraps.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (2, -1),
    (2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

fn leaper_attacks(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for (sq, entry) in table.iter_mut().enumerate() {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        for &(df, dr) in offsets {
            let (f, r) = (file + df, rank + dr);
            if (0..8).contains(&f) && (0..8).contains(&r) {
                entry.set(Square::from_coords(r as u8, f as u8));
            }
        }
    }
    table
}

pub(crate) static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> =
    Lazy::new(|| leaper_attacks(&KNIGHT_OFFSETS));

pub(crate) static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| leaper_attacks(&KING_OFFSETS));

// Ranks that single-push targets must sit on for a double push to follow
pub(crate) const DOUBLE_PUSH_RANKS: [Bitboard; 2] = [Bitboard::RANK_3, Bitboard::RANK_6];

// Ranks holding pawns that promote on their next push
pub(crate) const PROMOTING_PAWN_RANKS: [Bitboard; 2] = [Bitboard::RANK_7, Bitboard::RANK_2];

// Castling patterns, White variants; Black is the same pattern shifted to
// the eighth rank.
const WHITE_OO_PIECES: Bitboard = Bitboard(0x0000_0000_0000_0090); // e1, h1
const WHITE_OOO_PIECES: Bitboard = Bitboard(0x0000_0000_0000_0011); // e1, a1
const WHITE_OO_BLOCKERS: Bitboard = Bitboard(0x0000_0000_0000_0060); // f1, g1
const WHITE_OOO_BLOCKERS: Bitboard = Bitboard(0x0000_0000_0000_000E); // b1, c1, d1
const WHITE_OOO_DANGER: Bitboard = Bitboard(0x0000_0000_0000_0002); // b1

const BLACK_OO_PIECES: Bitboard = Bitboard(WHITE_OO_PIECES.0 << 56);
const BLACK_OOO_PIECES: Bitboard = Bitboard(WHITE_OOO_PIECES.0 << 56);
const BLACK_OO_BLOCKERS: Bitboard = Bitboard(WHITE_OO_BLOCKERS.0 << 56);
const BLACK_OOO_BLOCKERS: Bitboard = Bitboard(WHITE_OOO_BLOCKERS.0 << 56);
const BLACK_OOO_DANGER: Bitboard = Bitboard(WHITE_OOO_DANGER.0 << 56);

pub(crate) const KINGS_ROOK_MASKS: [Bitboard; 2] = [
    Bitboard(0x0000_0000_0000_0080), // h1
    Bitboard(0x8000_0000_0000_0000), // h8
];

pub(crate) const QUEENS_ROOK_MASKS: [Bitboard; 2] = [
    Bitboard(0x0000_0000_0000_0001), // a1
    Bitboard(0x0100_0000_0000_0000), // a8
];

pub(crate) const KING_INITIAL_SQUARES: [Square; 2] = [Square::E1, Square::E8];

/// King and rook origin squares whose movement forfeits kingside castling
#[inline]
pub(crate) fn castling_pieces_kingside(side: Color) -> Bitboard {
    match side {
        Color::White => WHITE_OO_PIECES,
        Color::Black => BLACK_OO_PIECES,
    }
}

/// King and rook origin squares whose movement forfeits queenside castling
#[inline]
pub(crate) fn castling_pieces_queenside(side: Color) -> Bitboard {
    match side {
        Color::White => WHITE_OOO_PIECES,
        Color::Black => BLACK_OOO_PIECES,
    }
}

/// Squares that must be empty and unattacked for kingside castling
#[inline]
pub(crate) fn castling_blockers_kingside(side: Color) -> Bitboard {
    match side {
        Color::White => WHITE_OO_BLOCKERS,
        Color::Black => BLACK_OO_BLOCKERS,
    }
}

/// Squares that must be empty for queenside castling; all but the
/// knight-adjacent square must also be unattacked
#[inline]
pub(crate) fn castling_blockers_queenside(side: Color) -> Bitboard {
    match side {
        Color::White => WHITE_OOO_BLOCKERS,
        Color::Black => BLACK_OOO_BLOCKERS,
    }
}

/// The queenside square whose attack status is ignored by the castling test
#[inline]
pub(crate) fn queenside_castle_danger_exempt(side: Color) -> Bitboard {
    match side {
        Color::White => WHITE_OOO_DANGER,
        Color::Black => BLACK_OOO_DANGER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knight_attacks_corner_and_center() {
        // a1 knight reaches only b3 and c2
        let a1 = KNIGHT_ATTACKS[0];
        assert_eq!(a1.popcount(), 2);
        assert!(a1.contains(Square::from_coords(2, 1)));
        assert!(a1.contains(Square::from_coords(1, 2)));

        // e4 knight has the full 8 targets
        assert_eq!(KNIGHT_ATTACKS[28].popcount(), 8);
    }

    #[test]
    fn test_king_attacks_edges() {
        assert_eq!(KING_ATTACKS[0].popcount(), 3); // a1
        assert_eq!(KING_ATTACKS[28].popcount(), 8); // e4
        assert_eq!(KING_ATTACKS[7].popcount(), 3); // h1
    }

    #[test]
    fn test_castling_patterns() {
        assert!(castling_pieces_kingside(Color::White).contains(Square::E1));
        assert!(castling_pieces_kingside(Color::White).contains(Square::H1));
        assert!(castling_blockers_queenside(Color::Black).contains(Square::C8));
        assert_eq!(
            queenside_castle_danger_exempt(Color::White),
            Bitboard::from_square(Square::B1)
        );
    }
}
