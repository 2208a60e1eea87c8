//! Check, checkmate and stalemate detection

use crate::board::Board;
use crate::movegen;
use crate::types::Color;

use std::fmt;

/// State of the side to move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameState {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}

impl GameState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(*self, GameState::Checkmate | GameState::Stalemate)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let s = match *self {
            GameState::Ongoing => "ongoing",
            GameState::Check => "check",
            GameState::Checkmate => "checkmate",
            GameState::Stalemate => "stalemate",
        };
        write!(f, "{}", s)
    }
}

/// Returns `true` if the king of color `c` is attacked
///
/// Attacks are computed directly from the piece patterns, so no move generation is involved.
pub fn in_check(b: &Board, c: Color) -> bool {
    match b.king_square(c) {
        Some(k) => b.is_square_attacked(k, c.inv()),
        None => false,
    }
}

/// Returns `true` if color `c` is in check and has no legal moves
pub fn checkmate(b: &Board, c: Color) -> bool {
    in_check(b, c) && !movegen::has_legal_moves_for(b, c)
}

/// Returns `true` if color `c` is not in check and has no legal moves
pub fn stalemate(b: &Board, c: Color) -> bool {
    !in_check(b, c) && !movegen::has_legal_moves_for(b, c)
}

/// Evaluates the state of the side to move
pub fn status(b: &Board) -> GameState {
    let c = b.side();
    let check = in_check(b, c);
    match (check, movegen::has_legal_moves_for(b, c)) {
        (true, false) => GameState::Checkmate,
        (false, false) => GameState::Stalemate,
        (true, true) => GameState::Check,
        (false, true) => GameState::Ongoing,
    }
}
