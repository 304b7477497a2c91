//! Standard Algebraic Notation.
//!
//! Layered above move generation: formatting needs the legal move list for
//! disambiguation, parsing matches against it. Nothing in the core calls
//! back into this module.

use super::error::SanError;
use super::types::{Move, Piece, Square};
use super::Board;

impl Board {
    /// Format a legal move in SAN: "e4", "Nf3", "Bxc6+", "O-O-O", "e8=Q#".
    #[must_use]
    pub fn move_to_san(&self, mv: Move) -> String {
        let mut san = String::new();

        if mv.is_castle_kingside() {
            san.push_str("O-O");
        } else if mv.is_castle_queenside() {
            san.push_str("O-O-O");
        } else {
            let piece = self.piece_type_at(mv.from());

            match piece {
                Some(Piece::Pawn) | None => {
                    if mv.is_capture() {
                        san.push((b'a' + mv.from().file()) as char);
                    }
                }
                Some(p) => {
                    san.push(p.to_char().to_ascii_uppercase());
                    let (file, rank) = self.disambiguation(mv, p);
                    if file {
                        san.push((b'a' + mv.from().file()) as char);
                    }
                    if rank {
                        san.push((b'1' + mv.from().rank()) as char);
                    }
                }
            }

            if mv.is_capture() {
                san.push('x');
            }
            san.push_str(&mv.to().to_string());
            if let Some(promo) = mv.promotion() {
                san.push('=');
                san.push(promo.to_char().to_ascii_uppercase());
            }
        }

        // Check and mate suffixes come from the successor position
        let next = self.do_move(mv);
        if next.is_king_attacked() {
            if next.generate_legal_moves().is_empty() {
                san.push('#');
            } else {
                san.push('+');
            }
        }

        san
    }

    /// Minimal disambiguation for a piece move: file first, then rank, then
    /// both. Returns (`needs_file`, `needs_rank`).
    fn disambiguation(&self, mv: Move, piece: Piece) -> (bool, bool) {
        let mut shares_file = false;
        let mut shares_rank = false;
        let mut any = false;

        for &other in &self.generate_legal_moves() {
            if other.to() != mv.to()
                || other.from() == mv.from()
                || self.piece_type_at(other.from()) != Some(piece)
            {
                continue;
            }
            any = true;
            if other.from().file() == mv.from().file() {
                shares_file = true;
            }
            if other.from().rank() == mv.from().rank() {
                shares_rank = true;
            }
        }

        if !any {
            (false, false)
        } else if !shares_file {
            (true, false)
        } else if !shares_rank {
            (false, true)
        } else {
            (true, true)
        }
    }

    /// Parse a SAN token ("e4", "Nbd2", "exd5", "O-O", "e8=Q+") against the
    /// legal moves of this position.
    ///
    /// Ambiguous tokens (several legal matches) and unmatched tokens are
    /// errors, never an arbitrary pick.
    pub fn parse_san(&self, san: &str) -> Result<Move, SanError> {
        let token = san.trim().trim_end_matches(['+', '#']);
        if token.is_empty() {
            return Err(SanError::Empty);
        }

        if token == "O-O" || token == "0-0" {
            return self
                .generate_legal_moves()
                .iter()
                .copied()
                .find(|m| m.is_castle_kingside())
                .ok_or(SanError::NoMatchingMove {
                    san: san.to_string(),
                });
        }
        if token == "O-O-O" || token == "0-0-0" {
            return self
                .generate_legal_moves()
                .iter()
                .copied()
                .find(|m| m.is_castle_queenside())
                .ok_or(SanError::NoMatchingMove {
                    san: san.to_string(),
                });
        }

        let chars: Vec<char> = token.chars().collect();
        let (piece, body) = match chars[0] {
            c if c.is_ascii_uppercase() => {
                let p = Piece::from_char(c).ok_or(SanError::InvalidPiece { char: c })?;
                (p, &chars[1..])
            }
            _ => (Piece::Pawn, &chars[..]),
        };

        // Split off "=P" promotion suffix
        let (body, promotion) = match body {
            [rest @ .., '=', promo] => {
                let p = Piece::from_char(*promo)
                    .ok_or(SanError::InvalidPromotion { char: *promo })?;
                if matches!(p, Piece::Pawn | Piece::King) {
                    return Err(SanError::InvalidPromotion { char: *promo });
                }
                (rest, Some(p))
            }
            _ => (body, None),
        };

        // The destination is the trailing square; whatever precedes it is
        // disambiguation and an optional 'x'
        if body.len() < 2 {
            return Err(SanError::InvalidSquare {
                notation: san.to_string(),
            });
        }
        let dest_text: String = body[body.len() - 2..].iter().collect();
        let dest: Square = dest_text.parse().map_err(|_| SanError::InvalidSquare {
            notation: san.to_string(),
        })?;

        let mut disambig_file: Option<u8> = None;
        let mut disambig_rank: Option<u8> = None;
        for &c in &body[..body.len() - 2] {
            match c {
                'x' => {}
                'a'..='h' => disambig_file = Some(c as u8 - b'a'),
                '1'..='8' => disambig_rank = Some(c as u8 - b'1'),
                _ => {
                    return Err(SanError::InvalidSquare {
                        notation: san.to_string(),
                    })
                }
            }
        }

        let mut matched: Option<Move> = None;
        for &mv in &self.generate_legal_moves() {
            if mv.to() != dest
                || self.piece_type_at(mv.from()) != Some(piece)
                || mv.promotion() != promotion
                || mv.is_castling()
            {
                continue;
            }
            if disambig_file.is_some_and(|f| mv.from().file() != f) {
                continue;
            }
            if disambig_rank.is_some_and(|r| mv.from().rank() != r) {
                continue;
            }
            if matched.is_some() {
                return Err(SanError::AmbiguousMove {
                    san: san.to_string(),
                });
            }
            matched = Some(mv);
        }

        matched.ok_or(SanError::NoMatchingMove {
            san: san.to_string(),
        })
    }

    /// Parse a SAN token and apply it in one call.
    pub fn do_san_move(&self, san: &str) -> Result<Self, SanError> {
        Ok(self.do_move(self.parse_san(san)?))
    }
}
