//! Round trips between UCI move strings, SAN, and FEN over real game play.

use ferrofish::Board;

const SCANDINAVIAN_UCI: &[&str] = &[
    "e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5", "d1e2", "g8f6", "g1f3", "e7e6", "e2b5",
    "a5b5", "c3b5",
];

const SCANDINAVIAN_SAN: &[&str] = &[
    "e4", "d5", "exd5", "Qxd5", "Nc3", "Qa5", "Qe2", "Nf6", "Nf3", "e6", "Qb5+", "Qxb5", "Nxb5",
];

#[test]
fn test_uci_to_san_reference_game() {
    let mut board = Board::new();
    for (uci, san) in SCANDINAVIAN_UCI.iter().zip(SCANDINAVIAN_SAN) {
        let mv = board.parse_uci_move(uci).unwrap();
        assert_eq!(board.move_to_san(mv), *san, "at move {uci}");
        board = board.do_move(mv);
    }
}

#[test]
fn test_san_to_uci_reference_game() {
    let mut board = Board::new();
    for (san, uci) in SCANDINAVIAN_SAN.iter().zip(SCANDINAVIAN_UCI) {
        let mv = board.parse_san(san).unwrap();
        assert_eq!(mv.to_string(), *uci, "at move {san}");
        board = board.do_move(mv);
    }
}

#[test]
fn test_uci_san_uci_round_trip_preserves_sequence() {
    // UCI -> SAN -> UCI reproduces the original sequence exactly
    let mut board = Board::new();
    let mut san_tokens = Vec::new();
    for uci in SCANDINAVIAN_UCI {
        let mv = board.parse_uci_move(uci).unwrap();
        san_tokens.push(board.move_to_san(mv));
        board = board.do_move(mv);
    }

    let mut board = Board::new();
    let mut recovered = Vec::new();
    for san in &san_tokens {
        let mv = board.parse_san(san).unwrap();
        recovered.push(mv.to_string());
        board = board.do_move(mv);
    }
    assert_eq!(recovered, SCANDINAVIAN_UCI);
}

#[test]
fn test_fen_round_trips_through_game_play() {
    let mut board = Board::new();
    for uci in SCANDINAVIAN_UCI {
        board = board.do_uci_move(uci).unwrap();
        let fen = board.to_fen();
        let reparsed = Board::try_from_fen(&fen).unwrap();
        assert_eq!(reparsed.to_fen(), fen, "after {uci}");
        assert_eq!(reparsed.hash(), board.hash(), "after {uci}");
        // The reparsed position generates the identical move set
        let mut ours: Vec<String> = board
            .generate_legal_moves()
            .iter()
            .map(ToString::to_string)
            .collect();
        let mut theirs: Vec<String> = reparsed
            .generate_legal_moves()
            .iter()
            .map(ToString::to_string)
            .collect();
        ours.sort();
        theirs.sort();
        assert_eq!(ours, theirs, "after {uci}");
    }
}

#[test]
fn test_halfmove_clock_tracks_pawn_moves_and_captures() {
    let mut board = Board::new();
    for (uci, expected_clock) in [
        ("g1f3", 1u32), // knight move ticks the clock
        ("g8f6", 2),
        ("e2e4", 0), // pawn move resets
        ("f6e4", 0), // capture resets
    ] {
        board = board.do_uci_move(uci).unwrap();
        assert_eq!(board.halfmove_clock(), expected_clock, "after {uci}");
    }
}
