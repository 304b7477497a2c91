//! Move ordering for the search loops.
//!
//! The transposition table's recorded best move goes first; everything else
//! is ranked by the midgame material-and-square delta the move produces,
//! seen from the side to move.

use crate::board::pst::{MATERIAL_MG, PST_MG};
use crate::board::types::{Color, MoveList, Piece, ScoredMoveList, Square};
use crate::board::Board;
use crate::tt::TranspositionTable;

pub(crate) const HASH_MOVE_SCORE: i32 = 10_000;

/// Midgame worth of `piece` of `color` standing on `sq`, positive for White
fn signed_mg(color: Color, piece: Piece, sq: Square) -> i32 {
    let rel = match color {
        Color::White => sq.as_usize(),
        Color::Black => sq.as_usize() ^ 56,
    };
    color.sign() * (MATERIAL_MG[piece.index()] + PST_MG[piece.index()][rel])
}

fn occupant_mg(board: &Board, sq: Square) -> i32 {
    board
        .piece_at(sq)
        .map_or(0, |(color, piece)| signed_mg(color, piece, sq))
}

/// Score every move for best-first iteration.
pub(crate) fn order_moves(
    board: &Board,
    moves: &MoveList,
    tt: &TranspositionTable,
) -> ScoredMoveList {
    let hash_move = tt.probe(board.hash()).map(|entry| entry.best_move);
    let us = board.side_to_move();

    let mut scored = ScoredMoveList::new();
    for &mv in moves {
        let bonus = if hash_move == Some(mv) {
            HASH_MOVE_SCORE
        } else {
            0
        };

        let (from, to) = (mv.from(), mv.to());
        let delta = if let Some(promoted) = mv.promotion() {
            let gained = signed_mg(us, promoted, to) - occupant_mg(board, from);
            if mv.is_capture() {
                gained - occupant_mg(board, to)
            } else {
                gained
            }
        } else if mv.flag() == crate::board::types::moves::FLAG_CAPTURE {
            let mover = occupant_mg(board, from);
            let moved = board
                .piece_at(from)
                .map_or(0, |(color, piece)| signed_mg(color, piece, to));
            moved - mover - occupant_mg(board, to)
        } else {
            // Quiet moves, double pushes, castling, en passant: the plain
            // square-to-square delta
            let mover = occupant_mg(board, from);
            let moved = board
                .piece_at(from)
                .map_or(0, |(color, piece)| signed_mg(color, piece, to));
            moved - mover
        };

        scored.push(mv, bonus + delta * us.sign());
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_move_ranks_first() {
        let board = Board::new();
        let moves = board.generate_legal_moves();
        let tt = TranspositionTable::new(1);
        let target = board.parse_uci_move("a2a3").unwrap();
        tt.set(board.hash(), 0, 1, crate::tt::Bound::Exact, target);

        let mut scored = order_moves(&board, &moves, &tt);
        assert_eq!(scored.pick_best(0), Some(target));
    }

    #[test]
    fn test_winning_capture_outranks_quiet_shuffle() {
        // White can take the d5 queen with the e4 pawn
        let board = Board::from_fen("3qk3/8/8/3q4/4P3/8/7P/4K3 w - - 0 1");
        let moves = board.generate_legal_moves();
        let tt = TranspositionTable::new(1);
        let mut scored = order_moves(&board, &moves, &tt);
        let first = scored.pick_best(0).unwrap();
        assert_eq!(first.to(), Square(35)); // exd5
        assert!(first.is_capture());
    }

    #[test]
    fn test_ordering_is_symmetric_for_black() {
        // Mirrored position: black takes the e4 queen with the d5 pawn
        let board = Board::from_fen("3q2k1/7p/8/3p4/4Q3/8/8/3QK3 b - - 0 1");
        let moves = board.generate_legal_moves();
        let tt = TranspositionTable::new(1);
        let mut scored = order_moves(&board, &moves, &tt);
        let first = scored.pick_best(0).unwrap();
        assert_eq!(first.to(), Square(28)); // dxe4
        assert!(first.is_capture());
    }
}
