//! FEN parsing and printing, plus UCI move resolution.

use std::str::FromStr;

use super::attacks::{
    castling_pieces_kingside, castling_pieces_queenside, KINGS_ROOK_MASKS, KING_INITIAL_SQUARES,
    QUEENS_ROOK_MASKS,
};
use super::error::{FenError, MoveParseError};
use super::types::{Color, Move, Piece, Square};
use super::Board;

impl Board {
    /// Parse a position from the 6-field FEN notation.
    ///
    /// Fields five and six (the move clocks) may be omitted. Any malformed
    /// field is a distinct error and no partially filled board escapes.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(FenError::TooFewFields {
                found: fields.len(),
            });
        }

        let mut board = Self::blank();

        // Piece placement, rank 8 first
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as u8;
                } else {
                    let piece =
                        Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    if file >= 8 {
                        return Err(FenError::BadFileCount {
                            rank: rank_idx,
                            files: file as usize + 1,
                        });
                    }
                    board.set_piece(color, piece, Square::from_coords(rank, file));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadFileCount {
                    rank: rank_idx,
                    files: file as usize,
                });
            }
        }

        // Side to move
        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };
        if board.side_to_move == Color::Black {
            board.hash ^= crate::zobrist::ZOBRIST.side();
        }

        // Castling rights, recorded as pre-moved squares in `movements`
        for c in fields[2].chars() {
            if !matches!(c, 'K' | 'Q' | 'k' | 'q' | '-') {
                return Err(FenError::InvalidCastling { char: c });
            }
        }
        for side in Color::BOTH {
            let s = side.index();
            let (king_flag, queen_flag) = match side {
                Color::White => ('K', 'Q'),
                Color::Black => ('k', 'q'),
            };
            let king_home = board.piece_at(KING_INITIAL_SQUARES[s])
                == Some((side, Piece::King));
            let kings_rook_home =
                board.piece_at(KINGS_ROOK_MASKS[s].lsb()) == Some((side, Piece::Rook));
            let queens_rook_home =
                board.piece_at(QUEENS_ROOK_MASKS[s].lsb()) == Some((side, Piece::Rook));
            if !fields[2].contains(king_flag) || !king_home || !kings_rook_home {
                board.movements = board.movements.or(KINGS_ROOK_MASKS[s]);
            }
            if !fields[2].contains(queen_flag) || !king_home || !queens_rook_home {
                board.movements = board.movements.or(QUEENS_ROOK_MASKS[s]);
            }
        }

        // En passant target
        if fields[3] != "-" {
            let sq = Square::from_str(fields[3]).map_err(|_| FenError::InvalidEnPassant {
                found: fields[3].to_string(),
            })?;
            if sq.rank() != 2 && sq.rank() != 5 {
                return Err(FenError::InvalidEnPassant {
                    found: fields[3].to_string(),
                });
            }
            board.set_en_passant(sq);
        }

        // Move clocks
        board.halfmove_clock = match fields.get(4) {
            Some(text) => text.parse().map_err(|_| FenError::InvalidClock {
                found: (*text).to_string(),
            })?,
            None => 0,
        };
        let fullmove: u32 = match fields.get(5) {
            Some(text) => text.parse().map_err(|_| FenError::InvalidClock {
                found: (*text).to_string(),
            })?,
            None => 1,
        };
        board.fullmove_normalized = (fullmove.max(1) - 1) * 2
            + u32::from(board.side_to_move == Color::Black);

        debug_assert_eq!(board.hash, board.compute_hash_from_scratch());
        Ok(board)
    }

    /// Parse a position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use [`Self::try_from_fen`] for
    /// fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("invalid FEN string")
    }

    /// Print the position as FEN. Round-trips exactly through
    /// [`Self::try_from_fen`] for any reachable position.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(8);
        for rank in (0..8u8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8u8 {
                match self.piece_at(Square::from_coords(rank, file)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            row.push_str(&empty.to_string());
                            empty = 0;
                        }
                        row.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let mut rights = String::new();
        for (side, kingside_char, queenside_char) in
            [(Color::White, 'K', 'Q'), (Color::Black, 'k', 'q')]
        {
            if castling_pieces_kingside(side).and(self.movements).is_empty() {
                rights.push(kingside_char);
            }
            if castling_pieces_queenside(side).and(self.movements).is_empty() {
                rights.push(queenside_char);
            }
        }
        if rights.is_empty() {
            rights.push('-');
        }

        let ep = self
            .en_passant_target()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            rows.join("/"),
            match self.side_to_move {
                Color::White => "w",
                Color::Black => "b",
            },
            rights,
            ep,
            self.halfmove_clock,
            self.fullmove_number()
        )
    }

    /// Resolve a UCI move string ("e2e4", "e7e8q") against the legal moves
    /// of this position.
    ///
    /// A string that does not match a legal move is an error, never a
    /// silently constructed move.
    pub fn parse_uci_move(&self, uci: &str) -> Result<Move, MoveParseError> {
        if uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }

        let from = Square::from_str(&uci[0..2]).map_err(|_| MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        })?;
        let to = Square::from_str(&uci[2..4]).map_err(|_| MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        })?;

        let promotion = match uci.chars().nth(4) {
            None => None,
            Some(c) => {
                let piece =
                    Piece::from_char(c).ok_or(MoveParseError::InvalidPromotion { char: c })?;
                if matches!(piece, Piece::Pawn | Piece::King) {
                    return Err(MoveParseError::InvalidPromotion { char: c });
                }
                Some(piece)
            }
        };

        self.generate_legal_moves()
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to && m.promotion() == promotion)
            .ok_or(MoveParseError::IllegalMove {
                notation: uci.to_string(),
            })
    }

    /// Resolve a UCI move and apply it in one call.
    pub fn do_uci_move(&self, uci: &str) -> Result<Self, MoveParseError> {
        Ok(self.do_move(self.parse_uci_move(uci)?))
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_fen(s)
    }
}
