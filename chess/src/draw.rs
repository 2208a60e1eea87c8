//! Draw detection and the draw offer/claim protocol
//!
//! [`DrawManager`] tracks the history of a single game: position signatures with their
//! repetition counts, the halfmove clock and the recent checks. It must be updated with
//! [`DrawManager::update_position()`] exactly once per applied half-move, otherwise the
//! repetition and clock state diverge from the real game.

use crate::board::Board;
use crate::material;
use crate::state;
use crate::types::{Color, DrawKind, Outcome};

use std::collections::{HashMap, VecDeque};
use std::fmt;

use tracing::debug;

/// Thresholds used by [`DrawManager`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawConfig {
    /// Number of occurrences of a position to claim a repetition draw
    pub repetition_threshold: usize,
    /// Halfmove clock value to claim a draw by the fifty-move rule
    pub fifty_move_plies: u16,
    /// Halfmove clock value for an automatic draw by the seventy-five-move rule
    pub seventy_five_move_plies: u16,
    /// Number of recent half-moves for which the check flag is kept
    pub check_history_len: usize,
    /// Number of consecutive checks required to label a repetition as perpetual check
    pub perpetual_check_window: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            repetition_threshold: 3,
            fifty_move_plies: 100,
            seventy_five_move_plies: 150,
            check_history_len: 20,
            perpetual_check_window: 6,
        }
    }
}

/// Facts about the half-move just applied
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MoveFacts {
    pub was_capture: bool,
    pub was_pawn_move: bool,
    /// Whether the move gave check
    pub is_check: bool,
}

/// Detected draw condition
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawCondition {
    pub kind: DrawKind,
    /// If `true`, the condition ends the game immediately. Otherwise it must be claimed.
    pub automatic: bool,
    pub description: String,
    /// Move number at which the condition was detected
    pub move_number: u32,
    pub position_hash: Option<u64>,
    pub info: Option<String>,
}

impl DrawCondition {
    fn new(kind: DrawKind, automatic: bool, description: String, move_number: u32) -> Self {
        DrawCondition {
            kind,
            automatic,
            description,
            move_number,
            position_hash: None,
            info: None,
        }
    }

    fn with_hash(mut self, hash: Option<u64>) -> Self {
        self.position_hash = hash;
        self
    }

    fn with_info(mut self, info: String) -> Self {
        self.info = Some(info);
        self
    }
}

impl fmt::Display for DrawCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.description)?;
        if let Some(info) = &self.info {
            write!(f, " ({})", info)?;
        }
        if self.automatic {
            write!(f, " [Automatic Draw]")
        } else {
            write!(f, " [Claimable Draw]")
        }
    }
}

/// Pending draw offer
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawOffer {
    pub by: Color,
    pub move_number: u32,
}

/// Snapshot of the draw state, suitable for a UI
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawStatus {
    pub game_over: bool,
    pub result: Option<DrawCondition>,
    pub offer: Option<DrawOffer>,
    pub claimable: Vec<DrawCondition>,
    pub halfmove_clock: u16,
    /// Largest repetition count among all the positions seen
    pub max_repetitions: usize,
    pub move_number: u32,
    pub last_irreversible_move: Option<u32>,
}

/// Full tracking history of a [`DrawManager`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawHistory {
    /// Signatures of all the positions in order of appearance
    pub positions: Vec<u64>,
    pub counts: HashMap<u64, usize>,
    /// Move numbers at which each position occurred
    pub position_moves: HashMap<u64, Vec<u32>>,
    pub halfmove_clock: u16,
    pub move_number: u32,
    pub checks: Vec<bool>,
    pub last_irreversible_move: Option<u32>,
    pub offer: Option<DrawOffer>,
}

/// Draw detection state of a single game
#[derive(Debug, Clone)]
pub struct DrawManager {
    config: DrawConfig,
    positions: Vec<u64>,
    counts: HashMap<u64, usize>,
    position_moves: HashMap<u64, Vec<u32>>,
    halfmove_clock: u16,
    move_number: u32,
    last_irreversible_move: Option<u32>,
    checks: VecDeque<bool>,
    offer: Option<DrawOffer>,
    claimable: Vec<DrawCondition>,
    result: Option<DrawCondition>,
}

impl DrawManager {
    /// Creates a manager for a game starting from `board`
    ///
    /// The starting position counts as the first occurrence for repetition purposes.
    pub fn new(board: &Board, config: DrawConfig) -> Self {
        let mut res = DrawManager {
            config,
            positions: Vec::new(),
            counts: HashMap::new(),
            position_moves: HashMap::new(),
            halfmove_clock: board.halfmove_clock(),
            move_number: u32::from(board.fullmove_number()),
            last_irreversible_move: None,
            checks: VecDeque::with_capacity(config.check_history_len + 1),
            offer: None,
            claimable: Vec::new(),
            result: None,
        };
        res.record(board.zobrist_hash());
        res
    }

    /// Forgets the whole history and starts over from `board`
    pub fn reset(&mut self, board: &Board) {
        *self = DrawManager::new(board, self.config);
    }

    fn record(&mut self, hash: u64) {
        self.positions.push(hash);
        *self.counts.entry(hash).or_insert(0) += 1;
        self.position_moves
            .entry(hash)
            .or_default()
            .push(self.move_number);
    }

    /// Registers the half-move which has just been applied to `board`
    ///
    /// Any pending draw offer is cleared.
    pub fn update_position(&mut self, board: &Board, facts: MoveFacts) {
        self.record(board.zobrist_hash());

        if facts.was_capture || facts.was_pawn_move {
            self.halfmove_clock = 0;
            self.last_irreversible_move = Some(self.move_number);
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        self.checks.push_back(facts.is_check);
        while self.checks.len() > self.config.check_history_len {
            self.checks.pop_front();
        }

        // Black has just moved
        if board.side() == Color::White {
            self.move_number += 1;
        }

        self.offer = None;
    }

    fn current_hash(&self) -> Option<u64> {
        self.positions.last().copied()
    }

    /// Returns how many times the current position has occurred
    pub fn repetition_count(&self) -> usize {
        self.current_hash()
            .and_then(|h| self.counts.get(&h).copied())
            .unwrap_or(0)
    }

    fn repetition(&self) -> Option<DrawCondition> {
        let count = self.repetition_count();
        if count < self.config.repetition_threshold {
            return None;
        }
        let hash = self.current_hash();
        let moves = hash
            .and_then(|h| self.position_moves.get(&h))
            .map(|m| {
                m.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        let cond = DrawCondition::new(
            DrawKind::ThreefoldRepetition,
            false,
            format!(
                "Position repeated {} times (moves: {})",
                self.config.repetition_threshold, moves
            ),
            self.move_number,
        );
        Some(
            cond.with_hash(hash)
                .with_info(format!("Repetition count: {}", count)),
        )
    }

    fn perpetual_check(&self, repetition: Option<&DrawCondition>) -> Option<DrawCondition> {
        let window = self.config.perpetual_check_window;
        if self.checks.len() < window || !self.checks.iter().rev().take(window).all(|&c| c) {
            return None;
        }
        let repetition = repetition?;
        let cond = DrawCondition::new(
            DrawKind::PerpetualCheck,
            false,
            "Perpetual check detected (subset of threefold repetition)".to_string(),
            self.move_number,
        );
        Some(
            cond.with_hash(repetition.position_hash)
                .with_info("Pattern of consecutive checks with position repetition".to_string()),
        )
    }

    /// Evaluates every draw condition on `board`
    ///
    /// The conditions are returned in priority order: stalemate, threefold repetition,
    /// fifty-move rule, seventy-five-move rule, insufficient material, dead position, perpetual
    /// check. Nothing is mutated.
    pub fn check_all_draw_conditions(&self, board: &Board) -> Vec<DrawCondition> {
        let mut res = Vec::new();
        let hash = self.current_hash();

        if state::stalemate(board, board.side()) {
            res.push(
                DrawCondition::new(
                    DrawKind::Stalemate,
                    true,
                    "Player to move has no legal moves and is not in check".to_string(),
                    self.move_number,
                )
                .with_hash(hash),
            );
        }

        let repetition = self.repetition();
        if let Some(cond) = &repetition {
            res.push(cond.clone());
        }

        let clock_info = format!("Halfmove clock: {}", self.halfmove_clock);
        if self.halfmove_clock >= self.config.fifty_move_plies {
            let since = match self.last_irreversible_move {
                Some(n) => format!("since move {}", n),
                None => "since the start".to_string(),
            };
            res.push(
                DrawCondition::new(
                    DrawKind::FiftyMoveRule,
                    false,
                    format!(
                        "{} moves without capture or pawn move ({})",
                        self.config.fifty_move_plies / 2,
                        since
                    ),
                    self.move_number,
                )
                .with_info(clock_info.clone()),
            );
        }

        if self.halfmove_clock >= self.config.seventy_five_move_plies {
            res.push(
                DrawCondition::new(
                    DrawKind::SeventyFiveMoveRule,
                    true,
                    format!(
                        "{} moves without capture or pawn move (automatic draw)",
                        self.config.seventy_five_move_plies / 2
                    ),
                    self.move_number,
                )
                .with_info(clock_info),
            );
        }

        if let Some(material) = material::insufficient_material(board) {
            res.push(DrawCondition::new(
                DrawKind::InsufficientMaterial,
                true,
                material.to_string(),
                self.move_number,
            ));
        }

        if let Some(desc) = material::dead_position(board) {
            res.push(DrawCondition::new(
                DrawKind::DeadPosition,
                true,
                desc,
                self.move_number,
            ));
        }

        if let Some(cond) = self.perpetual_check(repetition.as_ref()) {
            res.push(cond);
        }

        res
    }

    /// Re-evaluates the draw conditions on `board`
    ///
    /// The first automatic condition in priority order ends the game. Claimable conditions are
    /// stored, replacing the previously stored ones.
    pub fn update_claimable_draws(&mut self, board: &Board) {
        let (automatic, claimable): (Vec<_>, Vec<_>) = self
            .check_all_draw_conditions(board)
            .into_iter()
            .partition(|c| c.automatic);
        if self.result.is_none() {
            if let Some(cond) = automatic.into_iter().next() {
                debug!(kind = %cond.kind, "automatic draw: {}", cond);
                self.result = Some(cond);
            }
        }
        self.claimable = claimable;
    }

    /// Offers a draw on behalf of `by`
    ///
    /// Fails if the game is over or another offer is pending.
    pub fn offer_draw(&mut self, by: Color) -> bool {
        if self.is_game_over() || self.offer.is_some() {
            return false;
        }
        self.offer = Some(DrawOffer {
            by,
            move_number: self.move_number,
        });
        debug!(by = %by, move_number = self.move_number, "draw offered");
        true
    }

    /// Accepts the pending draw offer on behalf of `by`
    ///
    /// Succeeds only if the offer was made by the opponent. The game ends by mutual agreement.
    pub fn accept_draw(&mut self, by: Color) -> Option<DrawCondition> {
        let offer = match self.offer {
            Some(o) if o.by != by && !self.is_game_over() => o,
            _ => return None,
        };
        let cond = DrawCondition::new(
            DrawKind::MutualAgreement,
            true,
            format!(
                "Draw agreed between players (offered by {}, accepted by {})",
                offer.by, by
            ),
            self.move_number,
        )
        .with_info(format!("Offer made on move {}", offer.move_number));
        debug!(by = %by, "draw accepted");
        self.offer = None;
        self.result = Some(cond.clone());
        Some(cond)
    }

    /// Declines the pending draw offer on behalf of `by`
    pub fn decline_draw(&mut self, by: Color) -> bool {
        match self.offer {
            Some(o) if o.by != by => {
                self.offer = None;
                debug!(by = %by, "draw declined");
                true
            }
            _ => false,
        }
    }

    /// Claims a draw of kind `kind`
    ///
    /// Succeeds only if a matching claimable condition is currently stored.
    pub fn claim_draw(&mut self, kind: DrawKind) -> Option<DrawCondition> {
        if self.is_game_over() {
            return None;
        }
        let cond = self
            .claimable
            .iter()
            .find(|c| c.kind == kind && !c.automatic)?
            .clone();
        debug!(kind = %kind, "draw claimed: {}", cond);
        self.result = Some(cond.clone());
        Some(cond)
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.result.is_some()
    }

    #[inline]
    pub fn result(&self) -> Option<&DrawCondition> {
        self.result.as_ref()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.result.as_ref().map(|c| Outcome::Draw(c.kind))
    }

    #[inline]
    pub fn claimable(&self) -> &[DrawCondition] {
        &self.claimable
    }

    #[inline]
    pub fn offer(&self) -> Option<DrawOffer> {
        self.offer
    }

    #[inline]
    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    #[inline]
    pub fn last_irreversible_move(&self) -> Option<u32> {
        self.last_irreversible_move
    }

    pub fn status(&self) -> DrawStatus {
        DrawStatus {
            game_over: self.is_game_over(),
            result: self.result.clone(),
            offer: self.offer,
            claimable: self.claimable.clone(),
            halfmove_clock: self.halfmove_clock,
            max_repetitions: self.counts.values().copied().max().unwrap_or(0),
            move_number: self.move_number,
            last_irreversible_move: self.last_irreversible_move,
        }
    }

    pub fn history(&self) -> DrawHistory {
        DrawHistory {
            positions: self.positions.clone(),
            counts: self.counts.clone(),
            position_moves: self.position_moves.clone(),
            halfmove_clock: self.halfmove_clock,
            move_number: self.move_number,
            checks: self.checks.iter().copied().collect(),
            last_irreversible_move: self.last_irreversible_move,
            offer: self.offer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Move;
    use crate::types::PieceKind;

    fn play(b: &mut Board, d: &mut DrawManager, s: &str) {
        let mv = Move::from_uci(s, b).unwrap();
        let facts = MoveFacts {
            was_capture: mv.is_capture(),
            was_pawn_move: matches!(b.get(mv.src()), Some(p) if p.kind == PieceKind::Pawn),
            is_check: false,
        };
        b.make_move(mv).unwrap();
        let facts = MoveFacts {
            is_check: b.is_check(),
            ..facts
        };
        d.update_position(b, facts);
        d.update_claimable_draws(b);
    }

    fn kinds(conds: &[DrawCondition]) -> Vec<DrawKind> {
        conds.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_threefold() {
        let mut b = Board::initial();
        let mut d = DrawManager::new(&b, DrawConfig::default());
        let moves = ["g1f3", "g8f6", "f3g1", "f6g8"];

        for s in moves {
            play(&mut b, &mut d, s);
            assert!(d.claimable().is_empty());
        }
        assert_eq!(d.repetition_count(), 2);
        for s in &moves[..3] {
            play(&mut b, &mut d, s);
            assert!(d.claimable().is_empty());
        }
        play(&mut b, &mut d, moves[3]);
        assert_eq!(d.repetition_count(), 3);
        assert_eq!(kinds(d.claimable()), vec![DrawKind::ThreefoldRepetition]);
        assert_eq!(
            d.claimable()[0].description,
            "Position repeated 3 times (moves: 1, 2, 4)"
        );
        assert_eq!(d.claimable()[0].position_hash, Some(b.zobrist_hash()));
        assert!(!d.is_game_over());
        assert_eq!(d.status().max_repetitions, 3);

        let cond = d.claim_draw(DrawKind::ThreefoldRepetition).unwrap();
        assert_eq!(cond.kind, DrawKind::ThreefoldRepetition);
        assert!(d.is_game_over());
        assert_eq!(d.outcome(), Some(Outcome::Draw(DrawKind::ThreefoldRepetition)));
        assert_eq!(d.claim_draw(DrawKind::ThreefoldRepetition), None);
    }

    #[test]
    fn test_move_clocks() {
        let fen = |clock: u16| format!("4k3/8/8/8/8/8/8/R3K3 w - - {} 80", clock);

        let b = Board::from_fen(&fen(99)).unwrap();
        let d = DrawManager::new(&b, DrawConfig::default());
        assert!(d.check_all_draw_conditions(&b).is_empty());

        let b = Board::from_fen(&fen(100)).unwrap();
        let mut d = DrawManager::new(&b, DrawConfig::default());
        let conds = d.check_all_draw_conditions(&b);
        assert_eq!(kinds(&conds), vec![DrawKind::FiftyMoveRule]);
        assert!(!conds[0].automatic);
        assert_eq!(
            conds[0].to_string(),
            "50 moves without capture or pawn move (since the start) \
             (Halfmove clock: 100) [Claimable Draw]"
        );
        d.update_claimable_draws(&b);
        assert!(!d.is_game_over());
        assert_eq!(d.claim_draw(DrawKind::ThreefoldRepetition), None);
        assert!(d.claim_draw(DrawKind::FiftyMoveRule).is_some());
        assert!(d.is_game_over());

        let b = Board::from_fen(&fen(150)).unwrap();
        let mut d = DrawManager::new(&b, DrawConfig::default());
        assert_eq!(
            kinds(&d.check_all_draw_conditions(&b)),
            vec![DrawKind::FiftyMoveRule, DrawKind::SeventyFiveMoveRule]
        );
        d.update_claimable_draws(&b);
        assert!(d.is_game_over());
        assert_eq!(d.result().map(|c| c.kind), Some(DrawKind::SeventyFiveMoveRule));
        assert!(d.status().game_over);
    }

    #[test]
    fn test_clock_updates() {
        let mut b = Board::initial();
        let mut d = DrawManager::new(&b, DrawConfig::default());
        play(&mut b, &mut d, "g1f3");
        assert_eq!(d.halfmove_clock(), 1);
        assert_eq!(d.move_number(), 1);
        play(&mut b, &mut d, "e7e5");
        assert_eq!(d.halfmove_clock(), 0);
        assert_eq!(d.move_number(), 2);
        assert_eq!(d.last_irreversible_move(), Some(1));
        play(&mut b, &mut d, "f3e5");
        assert_eq!(d.halfmove_clock(), 0);
        assert_eq!(d.last_irreversible_move(), Some(2));
        assert_eq!(d.halfmove_clock(), b.halfmove_clock());
        assert_eq!(d.history().positions.len(), 4);
    }

    #[test]
    fn test_stalemate_and_material() {
        let b = Board::from_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").unwrap();
        let mut d = DrawManager::new(&b, DrawConfig::default());
        d.update_claimable_draws(&b);
        assert_eq!(d.result().map(|c| c.kind), Some(DrawKind::Stalemate));
        assert!(d.claimable().is_empty());

        let b = Board::from_fen("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1").unwrap();
        let mut d = DrawManager::new(&b, DrawConfig::default());
        assert_eq!(
            kinds(&d.check_all_draw_conditions(&b)),
            vec![DrawKind::InsufficientMaterial, DrawKind::DeadPosition]
        );
        d.update_claimable_draws(&b);
        let result = d.result().unwrap();
        assert_eq!(result.kind, DrawKind::InsufficientMaterial);
        assert_eq!(
            result.to_string(),
            "King + Knight vs King [Automatic Draw]"
        );

        let b = Board::from_fen("4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1").unwrap();
        let d = DrawManager::new(&b, DrawConfig::default());
        assert_eq!(
            kinds(&d.check_all_draw_conditions(&b)),
            vec![DrawKind::DeadPosition]
        );

        let b = Board::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let d = DrawManager::new(&b, DrawConfig::default());
        assert!(d.check_all_draw_conditions(&b).is_empty());
    }

    #[test]
    fn test_perpetual_check() {
        const FEN: &str = "6k1/5pp1/8/8/4Q3/8/8/K7 w - - 0 1";
        let moves = [
            "e4e8", "g8h7", "e8e4", "h7g8", "e4e8", "g8h7", "e8e4", "h7g8", "e4e8",
        ];

        let mut b = Board::from_fen(FEN).unwrap();
        let mut d = DrawManager::new(&b, DrawConfig::default());
        for s in moves {
            play(&mut b, &mut d, s);
        }
        assert_eq!(d.repetition_count(), 3);
        // Only the white moves were checks
        assert_eq!(kinds(d.claimable()), vec![DrawKind::ThreefoldRepetition]);
        assert_eq!(
            d.history().checks,
            vec![true, false, true, false, true, false, true, false, true]
        );

        let config = DrawConfig {
            perpetual_check_window: 1,
            ..DrawConfig::default()
        };
        let mut b = Board::from_fen(FEN).unwrap();
        let mut d = DrawManager::new(&b, config);
        for s in moves {
            play(&mut b, &mut d, s);
        }
        assert_eq!(
            kinds(d.claimable()),
            vec![DrawKind::ThreefoldRepetition, DrawKind::PerpetualCheck]
        );
        let perpetual = &d.claimable()[1];
        assert_eq!(perpetual.position_hash, Some(b.zobrist_hash()));
        assert!(d.claim_draw(DrawKind::PerpetualCheck).is_some());
        assert_eq!(d.outcome(), Some(Outcome::Draw(DrawKind::PerpetualCheck)));
    }

    fn play_marked(b: &mut Board, d: &mut DrawManager, s: &str, is_check: bool) {
        let mv = b.make_uci(s).unwrap();
        let facts = MoveFacts {
            was_capture: mv.is_capture(),
            was_pawn_move: false,
            is_check,
        };
        d.update_position(b, facts);
        d.update_claimable_draws(b);
    }

    #[test]
    fn test_check_history() {
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        let marks = |i: usize| i % 3 == 0;

        let mut b = Board::initial();
        let mut d = DrawManager::new(&b, DrawConfig::default());
        for i in 0..24 {
            play_marked(&mut b, &mut d, shuffle[i % 4], marks(i));
            assert!(d.history().checks.len() <= 20);
        }
        assert_eq!(
            d.history().checks,
            (4..24).map(marks).collect::<Vec<_>>()
        );
        assert_eq!(kinds(d.claimable()), vec![DrawKind::ThreefoldRepetition]);
    }

    #[test]
    fn test_perpetual_check_default_window() {
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];

        // Six trailing checks
        let mut b = Board::initial();
        let mut d = DrawManager::new(&b, DrawConfig::default());
        for i in 0..8 {
            play_marked(&mut b, &mut d, shuffle[i % 4], i >= 2);
        }
        assert_eq!(d.repetition_count(), 3);
        assert_eq!(
            kinds(d.claimable()),
            vec![DrawKind::ThreefoldRepetition, DrawKind::PerpetualCheck]
        );

        // Five trailing checks
        let mut b = Board::initial();
        let mut d = DrawManager::new(&b, DrawConfig::default());
        for i in 0..8 {
            play_marked(&mut b, &mut d, shuffle[i % 4], i >= 3);
        }
        assert_eq!(kinds(d.claimable()), vec![DrawKind::ThreefoldRepetition]);
    }

    #[test]
    fn test_offers() {
        let mut b = Board::initial();
        let mut d = DrawManager::new(&b, DrawConfig::default());

        assert!(!d.decline_draw(Color::Black));
        assert_eq!(d.accept_draw(Color::Black), None);
        assert!(d.offer_draw(Color::White));
        assert!(!d.offer_draw(Color::Black));
        assert_eq!(d.accept_draw(Color::White), None);
        assert!(!d.decline_draw(Color::White));
        assert!(d.decline_draw(Color::Black));
        assert_eq!(d.offer(), None);

        assert!(d.offer_draw(Color::White));
        play(&mut b, &mut d, "e2e4");
        assert_eq!(d.offer(), None);
        assert_eq!(d.accept_draw(Color::Black), None);

        assert!(d.offer_draw(Color::Black));
        let cond = d.accept_draw(Color::White).unwrap();
        assert_eq!(cond.kind, DrawKind::MutualAgreement);
        assert!(cond.automatic);
        assert_eq!(
            cond.description,
            "Draw agreed between players (offered by black, accepted by white)"
        );
        assert!(d.is_game_over());
        assert!(!d.offer_draw(Color::White));

        d.reset(&Board::initial());
        assert!(!d.is_game_over());
        assert_eq!(d.history().positions.len(), 1);
        assert_eq!(d.move_number(), 1);
    }
}
