//! Chess rules engine
//!
//! Maintains the board state, generates legal moves, detects check, checkmate and stalemate,
//! and tracks the FIDE draw conditions (repetition, move-count rules, insufficient material)
//! together with the draw offer/claim protocol.
//!
//! # Example
//!
//! ```
//! use arbiter::{Color, DrawKind, Game, Outcome};
//!
//! let mut game = Game::new_initial();
//! game.push_uci_list("g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1 f6g8").unwrap();
//! assert!(game.claim_draw(DrawKind::ThreefoldRepetition).is_some());
//! assert_eq!(game.outcome(), Some(Outcome::Draw(DrawKind::ThreefoldRepetition)));
//! assert_eq!(game.board().side(), Color::White);
//! ```

pub mod attack;
pub mod board;
pub mod draw;
pub mod game;
pub mod legal;
pub mod material;
pub mod movegen;
pub mod moves;
pub mod state;

mod zobrist;

pub use arbiter_base::{geometry, types};

pub use board::Board;
pub use draw::{DrawCondition, DrawConfig, DrawManager, DrawOffer, DrawStatus, MoveFacts};
pub use game::{Game, GameError};
pub use movegen::MoveList;
pub use moves::{Move, MoveKind, PromotePiece, UciMove};
pub use state::GameState;
pub use types::{
    CastlingRights, CastlingSide, Color, DrawKind, File, Outcome, Piece, PieceKind, Rank, Square,
};
