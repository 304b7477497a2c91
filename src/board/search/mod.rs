//! Iterative-deepening negamax with alpha-beta pruning.
//!
//! Features: aspiration windows, transposition-table cutoffs, null-move
//! pruning, late-move reductions, and a capture/promotion quiescence
//! search. Cancellation is cooperative: a shared stop flag plus a periodic
//! deadline check, and a cancelled search keeps the result of the last
//! fully completed depth.

mod move_order;
mod quiescence;
mod statistics;

pub use statistics::Statistics;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use once_cell::sync::Lazy;

use super::types::moves::FLAG_QUIET;
use super::types::Move;
use super::Board;
use crate::tt::{Bound, TranspositionTable};
use move_order::order_moves;

/// Score ceiling; mates are encoded as `INF - ply`
pub const INF: i32 = 999_999;

const NULL_MIN_DEPTH: i32 = 2;
const LMR_MIN_DEPTH: i32 = 2;
const LMR_MOVES_WO_REDUCTION: usize = 1;
const ASPIRATION_WINDOW: i32 = 25;
/// Negamax calls between two deadline reads
const LIMIT_CHECK_INTERVAL: u32 = 4096;

/// Reduction by (depth, move index), `0.75 + ln(depth) * ln(index) / 2.25`
static LMR_TABLE: Lazy<[[i32; 64]; 64]> = Lazy::new(|| {
    let mut table = [[0i32; 64]; 64];
    for depth in 1..64 {
        for index in 1..64 {
            let value = 0.75 + (depth as f64).ln() * (index as f64).ln() / 2.25;
            table[depth][index] = value.floor() as i32;
        }
    }
    table
});

/// Outcome of one search: the move to play and its score in centipawns
#[derive(Clone, Copy, Debug)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
}

/// Everything reported after a completed deepening iteration
#[derive(Clone, Debug)]
pub struct SearchIterationInfo {
    pub depth: i32,
    pub seldepth: i32,
    pub score_cp: i32,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub hashfull: u32,
    pub best_move: Option<Move>,
    pub pv: String,
}

/// Per-iteration progress consumer
pub type SearchInfoCallback = Box<dyn Fn(&SearchIterationInfo) + Send>;

/// One search instance over a shared transposition table.
pub struct Search<'a> {
    tt: &'a TranspositionTable,
    stop: Arc<AtomicBool>,
    deadline: Option<Instant>,
    info_callback: Option<SearchInfoCallback>,
    start_time: Instant,
    limit_countdown: u32,
    stopped: bool,
    sel_depth: i32,
    stats: Statistics,
}

impl<'a> Search<'a> {
    #[must_use]
    pub fn new(tt: &'a TranspositionTable) -> Self {
        Search {
            tt,
            stop: Arc::new(AtomicBool::new(false)),
            deadline: None,
            info_callback: None,
            start_time: Instant::now(),
            limit_countdown: LIMIT_CHECK_INTERVAL,
            stopped: false,
            sel_depth: 0,
            stats: Statistics::default(),
        }
    }

    /// Abort the search once this instant passes (checked every
    /// `LIMIT_CHECK_INTERVAL` nodes).
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Receive a report after every completed iteration.
    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }

    /// Shared flag a host can set to cancel the search from outside.
    #[must_use]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Node counters of the most recent iteration.
    #[must_use]
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// True for scores that encode a forced mate.
    #[must_use]
    pub fn is_mate_score(score: i32) -> bool {
        score.abs() >= INF / 2
    }

    /// Search with increasing depth up to `max_depth`.
    ///
    /// Each depth runs inside an aspiration window around the previous
    /// score; a fail outside the window re-searches the same depth with
    /// that side of the window opened. Cancellation returns the best result
    /// of the last fully completed depth.
    pub fn iterative_deepening(&mut self, position: &Board, max_depth: i32) -> SearchResult {
        self.start_time = Instant::now();
        self.sel_depth = 0;
        self.stopped = false;
        self.stop.store(false, Ordering::Relaxed);
        self.stats.reset();

        // Terminal positions never enter the deepening loop
        if position.generate_legal_moves().is_empty() {
            return SearchResult {
                best_move: None,
                score: if position.is_king_attacked() { -INF } else { 0 },
            };
        }

        let mut alpha = -INF;
        let mut beta = INF;
        let mut depth = 1;
        let mut result = SearchResult {
            best_move: None,
            score: 0,
        };

        while depth <= max_depth {
            let iteration = self.negamax_root(position, depth, alpha, beta);
            if self.stopped {
                break;
            }

            if iteration.score <= alpha {
                // Fail low: reopen the lower side and repeat this depth
                alpha = -INF;
            } else if iteration.score >= beta {
                beta = INF;
            } else {
                result = iteration;
                self.report_iteration(position, &result, depth);
                alpha = iteration.score - ASPIRATION_WINDOW;
                beta = iteration.score + ASPIRATION_WINDOW;
                depth += 1;
                self.stats.reset();
            }
        }

        result
    }

    fn negamax_root(
        &mut self,
        state: &Board,
        depth: i32,
        mut alpha: i32,
        beta: i32,
    ) -> SearchResult {
        let moves = state.generate_legal_moves();
        let mut best_move = None;

        let mut scored = order_moves(state, &moves, self.tt);
        let mut idx = 0;
        while let Some(mv) = scored.pick_best(idx) {
            idx += 1;
            let next = state.do_move(mv);
            let value = -self.negamax(&next, depth - 1, 1, -beta, -alpha, true);
            if self.stopped {
                break;
            }

            if value > alpha {
                best_move = Some(mv);
                if value >= beta {
                    self.tt.set(state.hash(), beta, depth, Bound::Lower, mv);
                    return SearchResult {
                        best_move,
                        score: beta,
                    };
                }
                alpha = value;
                self.tt.set(state.hash(), alpha, depth, Bound::Upper, mv);
            }
        }

        SearchResult {
            best_move,
            score: alpha,
        }
    }

    fn negamax(
        &mut self,
        state: &Board,
        depth: i32,
        ply: i32,
        mut alpha: i32,
        mut beta: i32,
        can_apply_null: bool,
    ) -> i32 {
        let mate_value = INF - ply;
        let mut tt_flag = Bound::Upper;

        if self.check_limits() {
            return 0;
        }

        let in_check = state.is_king_attacked();
        if depth <= 0 && !in_check {
            return self.quiescence(state, depth, ply, alpha, beta);
        }

        self.stats.nodes += 1;

        if let Some(entry) = self.tt.probe(state.hash()) {
            if entry.depth >= depth {
                self.stats.tt_hits += 1;
                match entry.bound {
                    Bound::Exact => {
                        self.stats.leafs += 1;
                        return entry.score;
                    }
                    Bound::Lower => alpha = alpha.max(entry.score),
                    Bound::Upper => beta = beta.min(entry.score),
                }
                if alpha >= beta {
                    self.stats.leafs += 1;
                    return entry.score;
                }
            }
        }

        // Null move: hand the opponent a free shot; if the reduced search
        // still clears beta, the position is good enough to cut
        if can_apply_null && Self::null_move_allowed(state, depth, beta, in_check) {
            let reduction = if depth > 6 { 3 } else { 2 };
            let nulled = state.do_null_move();
            let value = -self.negamax(&nulled, depth - reduction - 1, ply, -beta, -beta + 1, false);
            if self.stopped {
                return 0;
            }
            if value >= beta {
                self.stats.beta_cutoffs += 1;
                return beta;
            }
        }

        let moves = state.generate_legal_moves();
        let mut best_move = Move::NULL;

        let mut scored = order_moves(state, &moves, self.tt);
        let mut idx = 0;
        while let Some(mv) = scored.pick_best(idx) {
            let mut reduced_depth = depth;
            if Self::lmr_allowed(depth, mv, idx) {
                reduced_depth -= LMR_TABLE[depth.min(63) as usize][(idx + 1).min(63)];
            }
            idx += 1;

            if in_check {
                reduced_depth += 1;
            }

            let next = state.do_move(mv);
            let value = -self.negamax(&next, reduced_depth - 1, ply + 1, -beta, -alpha, true);
            if self.stopped {
                return 0;
            }

            if value > alpha {
                best_move = mv;
                if value >= beta {
                    self.stats.beta_cutoffs += 1;
                    tt_flag = Bound::Lower;
                    alpha = beta;
                    break;
                }
                tt_flag = Bound::Exact;
                alpha = value;
            }
        }

        if moves.is_empty() {
            alpha = if in_check { -mate_value } else { 0 };
        }

        if !best_move.is_null() && !self.stopped {
            self.tt.set(state.hash(), alpha, depth, tt_flag, best_move);
        }

        alpha
    }

    fn null_move_allowed(state: &Board, depth: i32, beta: i32, in_check: bool) -> bool {
        !in_check
            && depth >= NULL_MIN_DEPTH
            && state.has_non_pawn_material(state.side_to_move())
            && state.evaluate() >= beta
    }

    fn lmr_allowed(depth: i32, mv: Move, move_index: usize) -> bool {
        depth > LMR_MIN_DEPTH && move_index > LMR_MOVES_WO_REDUCTION && mv.flag() == FLAG_QUIET
    }

    /// Cooperative cancellation: the shared flag is read every call, the
    /// deadline only every `LIMIT_CHECK_INTERVAL` calls.
    fn check_limits(&mut self) -> bool {
        if self.stopped || self.stop.load(Ordering::Relaxed) {
            self.stopped = true;
            return true;
        }

        self.limit_countdown -= 1;
        if self.limit_countdown == 0 {
            self.limit_countdown = LIMIT_CHECK_INTERVAL;
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.stop.store(true, Ordering::Relaxed);
                    self.stopped = true;
                    return true;
                }
            }
        }

        false
    }

    /// Walk transposition-table best moves from a position. Every step is
    /// legality-checked and repeated positions end the walk.
    #[must_use]
    pub fn principal_variation(&self, position: &Board, max_len: usize) -> Vec<Move> {
        let mut pv = Vec::with_capacity(max_len);
        let mut seen = Vec::with_capacity(max_len);
        let mut state = position.clone();

        while pv.len() < max_len {
            if seen.contains(&state.hash()) {
                break;
            }
            seen.push(state.hash());

            let Some(entry) = self.tt.probe(state.hash()) else {
                break;
            };
            let mv = entry.best_move;
            if mv.is_null() || !state.generate_legal_moves().contains(mv) {
                break;
            }
            pv.push(mv);
            state = state.do_move(mv);
        }

        pv
    }

    fn report_iteration(&mut self, position: &Board, result: &SearchResult, depth: i32) {
        #[cfg(feature = "logging")]
        log::debug!(
            "depth {} score {} nodes {}",
            depth,
            result.score,
            self.stats.total_nodes()
        );

        if self.info_callback.is_none() {
            return;
        }

        let elapsed = self.start_time.elapsed().as_millis() as u64;
        let nodes = self.stats.total_nodes();
        let pv = self
            .principal_variation(position, depth.max(1) as usize)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let info = SearchIterationInfo {
            depth,
            seldepth: self.sel_depth,
            score_cp: result.score,
            nodes,
            nps: if elapsed > 0 { nodes * 1000 / elapsed } else { 0 },
            time_ms: elapsed,
            hashfull: self.tt.hashfull_per_mille(),
            best_move: result.best_move,
            pv,
        };
        if let Some(callback) = &self.info_callback {
            callback(&info);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tt::DEFAULT_TT_MB;

    fn search_to_depth(fen: &str, depth: i32) -> SearchResult {
        let tt = TranspositionTable::new(DEFAULT_TT_MB.min(16));
        let board = Board::from_fen(fen);
        Search::new(&tt).iterative_deepening(&board, depth)
    }

    #[test]
    fn test_finds_mate_in_one() {
        // Back-rank mate with Ra8
        let result = search_to_depth("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1", 3);
        assert_eq!(result.best_move.unwrap().to_string(), "a1a8");
        assert!(Search::is_mate_score(result.score));
        assert_eq!(result.score, INF - 1);
    }

    #[test]
    fn test_finds_mate_in_two() {
        // Rook ladder: 1.Ra7 boxes the king in, 2.Rb8# finishes
        let result = search_to_depth("4k3/8/8/8/8/8/8/RR4K1 w - - 0 1", 5);
        assert!(
            Search::is_mate_score(result.score),
            "expected mate score, got {}",
            result.score
        );
        assert!(result.score > 0);
        // No mate in one exists here, so the mate is at least 3 plies deep
        assert!(result.score <= INF - 3);
    }

    #[test]
    fn test_prefers_hanging_queen_capture() {
        // A queen en prise to a pawn
        let result = search_to_depth("3q2k1/8/8/3q4/4P3/8/6PP/6K1 w - - 0 1", 4);
        assert_eq!(result.best_move.unwrap().to_string(), "e4d5");
    }

    #[test]
    fn test_search_is_deterministic() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let a = search_to_depth(fen, 4);
        let b = search_to_depth(fen, 4);
        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn test_expired_deadline_still_yields_a_completed_depth() {
        let tt = TranspositionTable::new(8);
        let board = Board::new();
        let mut search = Search::new(&tt).with_deadline(Instant::now());
        let stop = search.stop_handle();

        let result = search.iterative_deepening(&board, 64);
        // The deadline fires at the first periodic check, well before depth
        // 64; the shallower completed depths still produced a move
        assert!(result.best_move.is_some());
        assert!(stop.load(Ordering::Relaxed));
        assert!(board.generate_legal_moves().contains(result.best_move.unwrap()));
    }

    #[test]
    fn test_stalemate_scores_zero() {
        let result = search_to_depth("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", 3);
        assert_eq!(result.score, 0);
        assert!(result.best_move.is_none());
    }

    #[test]
    fn test_mate_distance_prefers_shorter_mate() {
        // Mate in one is scored INF - 1, strictly above any longer mate
        let result = search_to_depth("6k1/5ppp/8/8/8/8/8/R3K3 w - - 0 1", 5);
        assert_eq!(result.score, INF - 1);
    }

    #[test]
    fn test_lmr_table_matches_formula() {
        assert_eq!(LMR_TABLE[1][1], 0); // ln(1) terms vanish
        let expected = (0.75 + (8f64).ln() * (20f64).ln() / 2.25).floor() as i32;
        assert_eq!(LMR_TABLE[8][20], expected);
        assert!(LMR_TABLE[63][63] >= LMR_TABLE[8][20]);
    }
}
