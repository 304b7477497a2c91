//! Quiescence search: resolve captures and promotions before trusting the
//! static evaluation at the search frontier.

use super::move_order::order_moves;
use super::Search;
use crate::board::types::Piece;
use crate::board::Board;

impl Search<'_> {
    pub(super) fn quiescence(
        &mut self,
        state: &Board,
        depth: i32,
        ply: i32,
        mut alpha: i32,
        beta: i32,
    ) -> i32 {
        if self.check_limits() {
            return 0;
        }

        self.sel_depth = self.sel_depth.max(ply);
        self.stats.qnodes += 1;

        // Stand pat: the side to move may decline every capture
        let stand_pat = state.evaluate();
        if stand_pat >= beta {
            self.stats.qleafs += 1;
            return beta;
        }
        if alpha < stand_pat {
            alpha = stand_pat;
        }

        let moves = state.generate_legal_quiescence();
        let mut scored = order_moves(state, &moves, self.tt);
        let mut idx = 0;
        while let Some(mv) = scored.pick_best(idx) {
            idx += 1;

            // Only queen promotions are explored here
            if mv.is_promotion() && mv.promotion() != Some(Piece::Queen) {
                continue;
            }

            let next = state.do_move(mv);
            let value = -self.quiescence(&next, depth - 1, ply + 1, -beta, -alpha);
            if self.stopped {
                return 0;
            }

            if value > alpha {
                if value >= beta {
                    self.stats.qbeta_cutoffs += 1;
                    return beta;
                }
                alpha = value;
            }
        }

        alpha
    }
}
