//! Game driver combining a [`Board`] with a [`DrawManager`]

use crate::board::{self, Board};
use crate::draw::{DrawCondition, DrawConfig, DrawManager, DrawStatus, MoveFacts};
use crate::movegen::{self, MoveList};
use crate::moves::{self, uci, Move};
use crate::state::{self, GameState};
use crate::types::{Color, DrawKind, Outcome, PieceKind};

use thiserror::Error;
use tracing::debug;

/// Error applying a move to a [`Game`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The game has already finished
    #[error("game is finished")]
    Finished,
    /// The move is not legal
    #[error("invalid move: {0}")]
    Move(#[from] moves::ValidateError),
    /// The UCI move cannot be parsed or is not legal
    #[error("bad UCI move: {0}")]
    Uci(#[from] uci::ParseError),
    /// The move at position `pos` in a list of UCI moves is bad
    #[error("cannot apply UCI move #{}: {}", .pos + 1, .source)]
    UciList {
        pos: usize,
        #[source]
        source: Box<GameError>,
    },
}

/// Chess game
///
/// Owns the board, the draw tracking state and the moves played so far. Every applied move
/// updates the draw state exactly once, then the game is checked for checkmate and automatic
/// draws.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    draws: DrawManager,
    moves: Vec<Move>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Creates a game starting from position `board`
    ///
    /// The starting position itself may already be finished (for example, checkmate or
    /// insufficient material), in which case the outcome is set immediately.
    pub fn new(board: Board, config: DrawConfig) -> Self {
        let draws = DrawManager::new(&board, config);
        let mut res = Game {
            board,
            draws,
            moves: Vec::new(),
            outcome: None,
        };
        res.update_outcome();
        res
    }

    pub fn new_initial() -> Self {
        Self::new(Board::initial(), DrawConfig::default())
    }

    pub fn from_fen(s: &str) -> Result<Self, board::FenParseError> {
        Ok(Self::new(Board::from_fen(s)?, DrawConfig::default()))
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn draws(&self) -> &DrawManager {
        &self.draws
    }

    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the state of the side to move
    pub fn state(&self) -> GameState {
        state::status(&self.board)
    }

    /// Returns legal moves of the side to move
    ///
    /// A finished game has no legal moves.
    pub fn legal_moves(&self) -> MoveList {
        if self.is_finished() {
            return MoveList::new();
        }
        movegen::legal(&self.board)
    }

    pub fn draw_status(&self) -> DrawStatus {
        self.draws.status()
    }

    fn update_outcome(&mut self) {
        let side = self.board.side();
        if state::checkmate(&self.board, side) {
            let outcome = Outcome::Checkmate { winner: side.inv() };
            debug!(outcome = %outcome, "game finished");
            self.outcome = Some(outcome);
            return;
        }
        self.draws.update_claimable_draws(&self.board);
        self.outcome = self.draws.outcome();
        if let Some(outcome) = self.outcome {
            debug!(outcome = %outcome, "game finished");
        }
    }

    /// Validates and applies the move `mv`
    pub fn push(&mut self, mv: Move) -> Result<(), GameError> {
        if self.is_finished() {
            return Err(GameError::Finished);
        }
        let was_pawn_move = matches!(
            self.board.get(mv.src()),
            Some(p) if p.kind == PieceKind::Pawn
        );
        self.board.make_move(mv)?;
        let facts = MoveFacts {
            was_capture: mv.is_capture(),
            was_pawn_move,
            is_check: self.board.is_check(),
        };
        self.draws.update_position(&self.board, facts);
        self.moves.push(mv);
        self.update_outcome();
        Ok(())
    }

    /// Parses the UCI move `s` and applies it
    pub fn push_uci(&mut self, s: &str) -> Result<Move, GameError> {
        if self.is_finished() {
            return Err(GameError::Finished);
        }
        let mv = Move::from_uci(s, &self.board)?;
        self.push(mv)?;
        Ok(mv)
    }

    /// Applies a whitespace-separated list of UCI moves
    ///
    /// Stops at the first bad move. The moves before it remain applied.
    pub fn push_uci_list(&mut self, list: &str) -> Result<(), GameError> {
        for (pos, token) in list.split_ascii_whitespace().enumerate() {
            self.push_uci(token).map_err(|e| GameError::UciList {
                pos,
                source: Box::new(e),
            })?;
        }
        Ok(())
    }

    pub fn offer_draw(&mut self, by: Color) -> bool {
        !self.is_finished() && self.draws.offer_draw(by)
    }

    pub fn decline_draw(&mut self, by: Color) -> bool {
        self.draws.decline_draw(by)
    }

    pub fn accept_draw(&mut self, by: Color) -> Option<DrawCondition> {
        if self.is_finished() {
            return None;
        }
        let cond = self.draws.accept_draw(by)?;
        self.outcome = Some(Outcome::Draw(cond.kind));
        debug!(outcome = %Outcome::Draw(cond.kind), "game finished");
        Some(cond)
    }

    pub fn claim_draw(&mut self, kind: DrawKind) -> Option<DrawCondition> {
        if self.is_finished() {
            return None;
        }
        let cond = self.draws.claim_draw(kind)?;
        self.outcome = Some(Outcome::Draw(cond.kind));
        debug!(outcome = %Outcome::Draw(cond.kind), "game finished");
        Some(cond)
    }

    /// Starts the game over from position `board`
    pub fn reset(&mut self, board: Board) {
        self.draws.reset(&board);
        self.board = board;
        self.moves.clear();
        self.outcome = None;
        self.update_outcome();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new_initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scholars_mate() {
        let mut g = Game::new_initial();
        g.push_uci_list("e2e4 e7e5 f1c4 b8c6 d1h5 g8f6").unwrap();
        assert!(!g.is_finished());
        assert!(g.legal_moves().iter().any(|m| m.to_string() == "h5f7"));
        g.push_uci("h5f7").unwrap();
        assert_eq!(g.state(), GameState::Checkmate);
        assert_eq!(
            g.outcome(),
            Some(Outcome::Checkmate {
                winner: Color::White
            })
        );
        assert!(g.legal_moves().is_empty());
        assert_eq!(g.push_uci("e8e7"), Err(GameError::Finished));
        assert_eq!(g.moves().len(), 7);
    }

    #[test]
    fn test_bad_moves() {
        let mut g = Game::new_initial();
        assert!(matches!(
            g.push_uci("e2e5"),
            Err(GameError::Uci(uci::ParseError::Validate(
                moves::ValidateError::NotLegal
            )))
        ));
        assert_eq!(
            g.push_uci_list("e2e4 e7e5 x").map_err(|e| e.to_string()),
            Err("cannot apply UCI move #3: bad UCI move: cannot parse move: bad string length"
                .to_string())
        );
        assert_eq!(g.moves().len(), 2);
        assert_eq!(g.board().side(), Color::White);

        assert_eq!(
            Game::from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1").map(|_| ()),
            Err(board::FenParseError::Valid(
                board::ValidateError::OpponentKingAttacked
            ))
        );
    }

    #[test]
    fn test_automatic_draw() {
        let mut g = Game::from_fen("4k3/8/8/8/8/8/3r4/4K3 w - - 0 1").unwrap();
        assert_eq!(g.state(), GameState::Ongoing);
        g.push_uci("e1d2").unwrap();
        assert_eq!(
            g.outcome(),
            Some(Outcome::Draw(DrawKind::InsufficientMaterial))
        );
        assert!(g.draw_status().game_over);

        let g = Game::from_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(g.outcome(), Some(Outcome::Draw(DrawKind::Stalemate)));
    }

    #[test]
    fn test_claim_and_agree() {
        let mut g = Game::new_initial();
        assert_eq!(g.claim_draw(DrawKind::ThreefoldRepetition), None);
        g.push_uci_list("g1f3 g8f6 f3g1 f6g8 g1f3 g8f6 f3g1 f6g8")
            .unwrap();
        assert!(!g.is_finished());
        assert!(g
            .draws()
            .claimable()
            .iter()
            .any(|c| c.kind == DrawKind::ThreefoldRepetition));
        assert!(g.claim_draw(DrawKind::ThreefoldRepetition).is_some());
        assert_eq!(
            g.outcome(),
            Some(Outcome::Draw(DrawKind::ThreefoldRepetition))
        );

        let mut g = Game::new_initial();
        g.push_uci("e2e4").unwrap();
        assert!(g.offer_draw(Color::White));
        assert!(g.accept_draw(Color::White).is_none());
        assert!(g.accept_draw(Color::Black).is_some());
        assert_eq!(g.outcome(), Some(Outcome::Draw(DrawKind::MutualAgreement)));
        assert!(!g.offer_draw(Color::Black));

        g.reset(Board::initial());
        assert!(!g.is_finished());
        assert!(g.moves().is_empty());
        assert_eq!(g.legal_moves().len(), 20);
    }
}
