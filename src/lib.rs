//! Xiangqi (Chinese chess) rules engine and match state machine.
//!
//! - [`rules`]: pure move generation, check detection and legality filtering.
//! - [`game`]: [`MatchState`], which turns board picks into selections, moves and
//!   an outcome, and queues animation cues for whatever draws the board.

pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod game;
pub mod rules;
pub mod types;
mod zobrist;

pub use board::{in_bounds, Board, Cell};
pub use config::MatchConfig;
pub use error::{BoardError, ConfigError};
pub use events::{CaptureEvent, MoveEvent, Notice};
pub use game::{MatchOutcome, MatchState, Status};
pub use rules::{all_legal_moves, apply_move, is_in_check, legal_moves_from, pseudo_moves_from};
pub use types::{Move, Piece, PieceKind, Side, Square};

/// The standard starting position.
pub fn initial_layout() -> Board {
    Board::initial_layout()
}
