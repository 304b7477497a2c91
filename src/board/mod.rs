//! Chess board representation and game logic.
//!
//! Bitboard-based position state with fully legality-checked move
//! generation, FEN and SAN at the boundary, and the search on top.
//!
//! # Example
//! ```
//! use ferrofish::board::Board;
//!
//! let board = Board::new();
//! let moves = board.generate_legal_moves();
//! assert_eq!(moves.len(), 20);
//! ```

pub(crate) mod attacks;
pub mod error;
mod fen;
mod movegen;
pub(crate) mod pst;
mod san;
pub mod search;
mod state;
pub mod types;

pub use error::{FenError, MoveParseError, SanError, SquareError};
pub use state::{Board, START_FEN};
pub use types::{Bitboard, Color, Move, MoveList, Piece, Square};
