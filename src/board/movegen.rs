//! Legal move generation.
//!
//! Generation is staged: opponent attack map (with the moving king lifted
//! off the board), checker and pin detection, then either evasions or full
//! generation with pinned pieces restricted to their pin line. The returned
//! list is fully legality-filtered; callers never re-check legality.

use super::attacks;
use super::types::bitboard::pop_lsb;
use super::types::moves::{FLAG_CAPTURE, FLAG_DOUBLE_PUSH, FLAG_EN_PASSANT, FLAG_QUIET};
use super::types::{Bitboard, Color, Move, MoveList, Piece, Square};
use super::Board;

impl Board {
    /// Every legal move in this position.
    #[must_use]
    pub fn generate_legal_moves(&self) -> MoveList {
        self.generate_legal_internal(false)
    }

    /// The tactical subset for quiescence search: captures, promotions, and
    /// en passant (which doubles as a check evasion). Quiet non-captures,
    /// castling included, are left out.
    #[must_use]
    pub fn generate_legal_quiescence(&self) -> MoveList {
        self.generate_legal_internal(true)
    }

    /// True if the side to move's king is attacked by the opponent.
    #[must_use]
    pub fn is_king_attacked(&self) -> bool {
        let us = self.side_to_move;
        let them = us.opponent();
        let king = self.king_square(us);

        if !attacks::pawn_attacks_from(king, us)
            .and(self.side_pieces(them, Piece::Pawn))
            .is_empty()
        {
            return true;
        }
        if !attacks::knight_attacks(king)
            .and(self.side_pieces(them, Piece::Knight))
            .is_empty()
        {
            return true;
        }

        let occupied = self.occupied();
        if !attacks::rook_attacks(king, occupied)
            .and(self.orthogonal_sliders(them))
            .is_empty()
        {
            return true;
        }
        !attacks::bishop_attacks(king, occupied)
            .and(self.diagonal_sliders(them))
            .is_empty()
    }

    /// True iff the side to move has no legal move.
    ///
    /// An empty move list with the king *not* attacked is stalemate, not
    /// checkmate; callers that need the distinction must also consult
    /// [`Self::is_king_attacked`]. This two-step contract is deliberate.
    #[must_use]
    pub fn is_in_checkmate(&self) -> bool {
        self.generate_legal_moves().is_empty()
    }

    /// Node count of the legal move tree to the given depth.
    #[must_use]
    pub fn perft(&self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for &mv in &moves {
            nodes += self.do_move(mv).perft(depth - 1);
        }
        nodes
    }

    #[allow(clippy::too_many_lines)]
    fn generate_legal_internal(&self, quiescence_only: bool) -> MoveList {
        let mut moves = MoveList::new();
        let us = self.side_to_move;
        let them = us.opponent();

        let us_bb = self.all_pieces(us);
        let them_bb = self.all_pieces(them);
        let all = us_bb.or(them_bb);

        let our_king = self.king_square(us);
        let their_king = self.king_square(them);

        let our_diagonals = self.diagonal_sliders(us);
        let their_diagonals = self.diagonal_sliders(them);
        let our_orthogonals = self.orthogonal_sliders(us);
        let their_orthogonals = self.orthogonal_sliders(them);

        // Opponent attack map, computed with our king off the board so a
        // slider's ray continues through the king square and the king cannot
        // retreat along its own attack line.
        let occ_without_king = all.xor(Bitboard::from_square(our_king));
        let mut under_attack = attacks::pawn_attacks(self.side_pieces(them, Piece::Pawn), them)
            .or(attacks::king_attacks(their_king));
        for sq in self.side_pieces(them, Piece::Knight).iter() {
            under_attack = under_attack.or(attacks::knight_attacks(sq));
        }
        for sq in their_diagonals.iter() {
            under_attack = under_attack.or(attacks::bishop_attacks(sq, occ_without_king));
        }
        for sq in their_orthogonals.iter() {
            under_attack = under_attack.or(attacks::rook_attacks(sq, occ_without_king));
        }

        // King steps to squares neither owned nor attacked
        let king_targets = attacks::king_attacks(our_king).and_not(us_bb.or(under_attack));
        if !quiescence_only {
            moves.push_targets(our_king, king_targets.and_not(them_bb), FLAG_QUIET);
        }
        moves.push_targets(our_king, king_targets.and(them_bb), FLAG_CAPTURE);

        // Knight and pawn checkers come from direct lookups; slider checkers
        // are probed outward from the king against enemy-only occupancy so
        // our own blockers can be counted per candidate.
        let mut checkers = attacks::knight_attacks(our_king)
            .and(self.side_pieces(them, Piece::Knight))
            .or(attacks::pawn_attacks_from(our_king, us).and(self.side_pieces(them, Piece::Pawn)));

        let mut candidates = attacks::rook_attacks(our_king, them_bb)
            .and(their_orthogonals)
            .or(attacks::bishop_attacks(our_king, them_bb).and(their_diagonals));

        let mut pinned = Bitboard::EMPTY;
        while !candidates.is_empty() {
            let attacker = pop_lsb(&mut candidates);
            let own_between = attacks::between(our_king, attacker).and(us_bb);
            match own_between.popcount() {
                // Nothing of ours between: a real checker
                0 => checkers = checkers.xor(Bitboard::from_square(attacker)),
                // Exactly one: that piece is pinned to the king
                1 => pinned = pinned.or(own_between),
                _ => {}
            }
        }
        let not_pinned = pinned.not();

        let capture_mask: Bitboard;
        let quiet_mask: Bitboard;

        match checkers.popcount() {
            // Double check: only king moves can be legal
            2 => return moves,

            1 => {
                let checker_sq = checkers.lsb();
                let checker_piece = self.piece_type_at(checker_sq);
                match checker_piece {
                    Some(Piece::Pawn) | Some(Piece::Knight) => {
                        // A checking pawn that just double-pushed can also be
                        // taken en passant
                        if checker_piece == Some(Piece::Pawn)
                            && !self.en_passant.is_empty()
                            && checkers == attacks::pawn_push(self.en_passant, them)
                        {
                            let ep_square = self.en_passant.lsb();
                            let mut capturers = attacks::pawn_attacks(self.en_passant, them)
                                .and(self.side_pieces(us, Piece::Pawn))
                                .and(not_pinned);
                            while !capturers.is_empty() {
                                let from = pop_lsb(&mut capturers);
                                moves.push(Move::with_flag(from, ep_square, FLAG_EN_PASSANT));
                            }
                        }

                        // Otherwise the checker must be captured outright;
                        // blocking a contact check is impossible
                        let mut capturers =
                            self.attackers_from(checker_sq, all, us).and(not_pinned);
                        while !capturers.is_empty() {
                            let from = pop_lsb(&mut capturers);
                            if self.piece_type_at(from) == Some(Piece::Pawn)
                                && attacks::PROMOTING_PAWN_RANKS[us.index()]
                                    .contains(from)
                            {
                                moves.push_promotion_captures(
                                    from,
                                    Bitboard::from_square(checker_sq),
                                );
                            } else {
                                moves.push(Move::with_flag(from, checker_sq, FLAG_CAPTURE));
                            }
                        }
                        return moves;
                    }
                    // Slider check: capture the checker or block the ray
                    _ => {
                        capture_mask = checkers;
                        quiet_mask = attacks::between(our_king, checker_sq);
                    }
                }
            }

            _ => {
                capture_mask = them_bb;
                quiet_mask = all.not();

                // En passant, legality-checked by simulating the removal of
                // both pawns and probing for a freshly exposed slider
                if !self.en_passant.is_empty() {
                    let ep_square = self.en_passant.lsb();
                    let captured_pawn = attacks::pawn_push(self.en_passant, them);
                    let mut capturers = attacks::pawn_attacks(self.en_passant, them)
                        .and(self.side_pieces(us, Piece::Pawn))
                        .and(not_pinned);
                    while !capturers.is_empty() {
                        let from = pop_lsb(&mut capturers);
                        let them_after = them_bb.xor(captured_pawn);
                        let us_after = us_bb
                            .xor(Bitboard::from_square(from))
                            .xor(self.en_passant);
                        let occ_after = them_after.or(us_after);
                        let exposed = attacks::rook_attacks(our_king, occ_after)
                            .and(their_orthogonals)
                            .or(attacks::bishop_attacks(our_king, occ_after)
                                .and(their_diagonals));
                        if exposed.is_empty() {
                            moves.push(Move::with_flag(from, ep_square, FLAG_EN_PASSANT));
                        }
                    }
                }

                if !quiescence_only {
                    self.generate_castling(&mut moves, us, all, under_attack);
                }

                // Pinned sliders stay on the king-attacker line
                let mut pinned_sliders = pinned.and(our_diagonals.or(our_orthogonals));
                while !pinned_sliders.is_empty() {
                    let from = pop_lsb(&mut pinned_sliders);
                    let piece = self
                        .piece_type_at(from)
                        .expect("pinned slider square is occupied");
                    let on_line = attacks::piece_attacks(piece, from, all)
                        .and(attacks::line(our_king, from));
                    if !quiescence_only {
                        moves.push_targets(from, on_line.and(quiet_mask), FLAG_QUIET);
                    }
                    moves.push_targets(from, on_line.and(capture_mask), FLAG_CAPTURE);
                }

                // Pinned pawns likewise; pinned knights never move
                let mut pinned_pawns = pinned.and(self.side_pieces(us, Piece::Pawn));
                while !pinned_pawns.is_empty() {
                    let from = pop_lsb(&mut pinned_pawns);
                    let pin_line = attacks::line(our_king, from);
                    let from_bb = Bitboard::from_square(from);

                    if attacks::PROMOTING_PAWN_RANKS[us.index()].contains(from) {
                        let targets = attacks::pawn_attacks_from(from, us)
                            .and(capture_mask)
                            .and(pin_line);
                        moves.push_promotion_captures(from, targets);
                    } else {
                        let captures = attacks::pawn_attacks_from(from, us)
                            .and(them_bb)
                            .and(pin_line);
                        moves.push_targets(from, captures, FLAG_CAPTURE);

                        if !quiescence_only {
                            let single = attacks::pawn_push(from_bb, us)
                                .and_not(all)
                                .and(pin_line);
                            let double = attacks::pawn_push(
                                single.and(attacks::DOUBLE_PUSH_RANKS[us.index()]),
                                us,
                            )
                            .and_not(all)
                            .and(pin_line);
                            moves.push_targets(from, single, FLAG_QUIET);
                            moves.push_targets(from, double, FLAG_DOUBLE_PUSH);
                        }
                    }
                }
            }
        }

        // Common generation for unpinned pieces, masked to the capture and
        // quiet targets established above.

        let mut knights = self.side_pieces(us, Piece::Knight).and(not_pinned);
        while !knights.is_empty() {
            let from = pop_lsb(&mut knights);
            let targets = attacks::knight_attacks(from);
            moves.push_targets(from, targets.and(capture_mask), FLAG_CAPTURE);
            if !quiescence_only {
                moves.push_targets(from, targets.and(quiet_mask), FLAG_QUIET);
            }
        }

        let mut diagonals = our_diagonals.and(not_pinned);
        while !diagonals.is_empty() {
            let from = pop_lsb(&mut diagonals);
            let targets = attacks::bishop_attacks(from, all);
            moves.push_targets(from, targets.and(capture_mask), FLAG_CAPTURE);
            if !quiescence_only {
                moves.push_targets(from, targets.and(quiet_mask), FLAG_QUIET);
            }
        }

        let mut orthogonals = our_orthogonals.and(not_pinned);
        while !orthogonals.is_empty() {
            let from = pop_lsb(&mut orthogonals);
            let targets = attacks::rook_attacks(from, all);
            moves.push_targets(from, targets.and(capture_mask), FLAG_CAPTURE);
            if !quiescence_only {
                moves.push_targets(from, targets.and(quiet_mask), FLAG_QUIET);
            }
        }

        // Pawns below the promotion rank
        let pawns = self
            .side_pieces(us, Piece::Pawn)
            .and(not_pinned)
            .and_not(attacks::PROMOTING_PAWN_RANKS[us.index()]);

        if !quiescence_only {
            // Double pushes are derived from the unmasked single pushes so a
            // check can still be blocked on the fourth rank
            let single_unmasked = attacks::pawn_push(pawns, us).and_not(all);
            let double = attacks::pawn_push(
                single_unmasked.and(attacks::DOUBLE_PUSH_RANKS[us.index()]),
                us,
            )
            .and(quiet_mask);
            let single = single_unmasked.and(quiet_mask);

            for to in single.iter() {
                moves.push(Move::with_flag(
                    to.offset(-us.forward()),
                    to,
                    FLAG_QUIET,
                ));
            }
            for to in double.iter() {
                moves.push(Move::with_flag(
                    to.offset(-2 * us.forward()),
                    to,
                    FLAG_DOUBLE_PUSH,
                ));
            }
        }

        let left_captures = attacks::pawn_left_attacks(pawns, us).and(capture_mask);
        for to in left_captures.iter() {
            moves.push(Move::with_flag(
                to.offset(-us.relative(7)),
                to,
                FLAG_CAPTURE,
            ));
        }
        let right_captures = attacks::pawn_right_attacks(pawns, us).and(capture_mask);
        for to in right_captures.iter() {
            moves.push(Move::with_flag(
                to.offset(-us.relative(9)),
                to,
                FLAG_CAPTURE,
            ));
        }

        // Pawns on the promotion rank
        let promoting = self
            .side_pieces(us, Piece::Pawn)
            .and(not_pinned)
            .and(attacks::PROMOTING_PAWN_RANKS[us.index()]);

        if !promoting.is_empty() {
            let pushes = attacks::pawn_push(promoting, us).and(quiet_mask);
            for to in pushes.iter() {
                moves.push_promotions(to.offset(-us.forward()), Bitboard::from_square(to));
            }

            let left = attacks::pawn_left_attacks(promoting, us).and(capture_mask);
            for to in left.iter() {
                moves.push_promotion_captures(
                    to.offset(-us.relative(7)),
                    Bitboard::from_square(to),
                );
            }
            let right = attacks::pawn_right_attacks(promoting, us).and(capture_mask);
            for to in right.iter() {
                moves.push_promotion_captures(
                    to.offset(-us.relative(9)),
                    Bitboard::from_square(to),
                );
            }
        }

        moves
    }

    fn generate_castling(
        &self,
        moves: &mut MoveList,
        us: Color,
        all: Bitboard,
        under_attack: Bitboard,
    ) {
        use super::types::moves::{FLAG_CASTLE_KINGSIDE, FLAG_CASTLE_QUEENSIDE};

        // Kingside: king and rook unmoved, path empty and unattacked
        if self
            .movements
            .and(attacks::castling_pieces_kingside(us))
            .is_empty()
            && all
                .or(under_attack)
                .and(attacks::castling_blockers_kingside(us))
                .is_empty()
        {
            let (from, to) = match us {
                Color::White => (Square::E1, Square::G1),
                Color::Black => (Square::E8, Square::G8),
            };
            moves.push(Move::with_flag(from, to, FLAG_CASTLE_KINGSIDE));
        }

        // Queenside: as above, except the knight-adjacent square may be
        // attacked (the rook passes it, the king does not)
        if self
            .movements
            .and(attacks::castling_pieces_queenside(us))
            .is_empty()
            && all
                .or(under_attack.and_not(attacks::queenside_castle_danger_exempt(us)))
                .and(attacks::castling_blockers_queenside(us))
                .is_empty()
        {
            let (from, to) = match us {
                Color::White => (Square::E1, Square::C1),
                Color::Black => (Square::E8, Square::C8),
            };
            moves.push(Move::with_flag(from, to, FLAG_CASTLE_QUEENSIDE));
        }
    }
}
