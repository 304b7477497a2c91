//! Line-oriented search progress reports.
//!
//! One line per completed deepening iteration, in the shape a UCI front end
//! consumes.

use crate::board::search::{SearchInfoCallback, SearchIterationInfo, Search};

/// Render one iteration as a UCI `info` line.
#[must_use]
pub fn format_info_line(info: &SearchIterationInfo) -> String {
    let score = if Search::is_mate_score(info.score_cp) {
        let plies = crate::board::search::INF - info.score_cp.abs();
        let mate_in = (plies + 1) / 2;
        if info.score_cp > 0 {
            format!("mate {mate_in}")
        } else {
            format!("mate -{mate_in}")
        }
    } else {
        format!("cp {}", info.score_cp)
    };

    let currmove = info
        .best_move
        .map_or_else(|| "(none)".to_string(), |m| m.to_string());

    format!(
        "info currmove {} depth {} seldepth {} score {} nodes {} nps {} hashfull {} time {} pv {}",
        currmove,
        info.depth,
        info.seldepth,
        score,
        info.nodes,
        info.nps,
        info.hashfull,
        info.time_ms,
        info.pv
    )
}

/// A callback that prints each iteration to stdout.
#[must_use]
pub fn stdout_reporter() -> SearchInfoCallback {
    Box::new(|info| println!("{}", format_info_line(info)))
}

/// Print the final move choice.
pub fn print_bestmove(best_move: Option<&crate::board::Move>) {
    match best_move {
        Some(mv) => println!("bestmove {mv}"),
        None => println!("bestmove (none)"),
    }
}
