//! Board and related things

use crate::moves::{self, uci, Move};
use crate::types::{
    self, CastlingRights, CastlingSide, Color, File, Piece, PieceKind, Rank, Square,
};
use crate::{attack, geometry, zobrist};

use std::collections::HashMap;
use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;
use tracing::trace;

/// Board validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Invalid en passant target specified (i.e. it is located on an invalid rank)
    #[error("invalid enpassant position {0}")]
    InvalidEnpassant(Square),
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// There is a pawn on the 1st or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Square),
    /// Opponent's king is under attack
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

/// Error parsing the first part of FEN (i.e. the positions of pieces on the board)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CellsParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing [`Board`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// FEN contains non-ASCII characters
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// FEN doesn't have board part
    #[error("board not specified")]
    NoBoard,
    /// Error parsing board from FEN
    #[error("bad board: {0}")]
    Board(#[from] CellsParseError),
    /// FEN doesn't have move side part
    #[error("no move side")]
    NoMoveSide,
    /// Error parsing move side from FEN
    #[error("bad move side: {0}")]
    MoveSide(#[from] types::ColorParseError),
    /// FEN doesn't have castling rights part
    #[error("no castling rights")]
    NoCastling,
    /// Error parsing castling rights from FEN
    #[error("bad castling rights: {0}")]
    Castling(#[from] types::CastlingRightsParseError),
    /// FEN doesn't have en passant part
    #[error("no enpassant")]
    NoEnpassant,
    /// Error parsing en passant from FEN
    #[error("bad enpassant: {0}")]
    Enpassant(#[from] types::SquareParseError),
    /// En passant rank is invalid
    #[error("invalid enpassant rank {0}")]
    InvalidEnpassantRank(Rank),
    /// Error parsing halfmove clock
    #[error("bad halfmove clock: {0}")]
    HalfmoveClock(ParseIntError),
    /// Error parsing fullmove number
    #[error("bad fullmove number: {0}")]
    FullmoveNumber(ParseIntError),
    /// FEN contains extra data
    #[error("extra data in FEN")]
    ExtraData,
    /// Board was parsed, but it's invalid
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// Chess board
///
/// Owns the 8×8 grid of pieces together with the side to move, castling rights, en passant
/// target, halfmove clock, fullmove number and the multiset of position signatures seen so far.
///
/// The board is mutated in place by [`Board::make_move()`]. The position signature is the Zobrist
/// hash of the piece layout, castling rights, en passant file and side to move. It is kept up to
/// date incrementally and recorded once per applied move.
///
/// # Example
///
/// ```
/// # use arbiter::{Board, Move};
/// #
/// let mut b = Board::initial();
/// for s in ["e2e4", "e7e5", "g1f3", "b8c6", "f1b5"] {
///     let mv = Move::from_uci(s, &b).unwrap();
///     b.make_move(mv).unwrap();
/// }
/// assert_eq!(
///     b.to_fen().unwrap(),
///     "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) cells: [Option<Piece>; 64],
    pub(crate) side: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) ep_target: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) hash: u64,
    signatures: HashMap<u64, usize>,
}

impl Board {
    /// Returns a board without any pieces
    ///
    /// Such board is not valid until both kings are put on it with [`Board::put()`].
    pub fn empty() -> Board {
        let mut res = Board {
            cells: [None; 64],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
            signatures: HashMap::new(),
        };
        res.hash = res.compute_hash();
        res
    }

    /// Returns a board with the initial position
    pub fn initial() -> Board {
        let mut res = Board::empty();
        for file in File::iter() {
            res.put(
                Square::from_parts(file, Rank::R2),
                Some(Piece::new(Color::White, PieceKind::Pawn)),
            );
            res.put(
                Square::from_parts(file, Rank::R7),
                Some(Piece::new(Color::Black, PieceKind::Pawn)),
            );
        }
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            for (file, kind) in [
                (File::A, PieceKind::Rook),
                (File::B, PieceKind::Knight),
                (File::C, PieceKind::Bishop),
                (File::D, PieceKind::Queen),
                (File::E, PieceKind::King),
                (File::F, PieceKind::Bishop),
                (File::G, PieceKind::Knight),
                (File::H, PieceKind::Rook),
            ] {
                res.put(Square::from_parts(file, rank), Some(Piece::new(color, kind)));
            }
        }
        res.hash ^= zobrist::castling(res.castling);
        res.castling = CastlingRights::FULL;
        res.hash ^= zobrist::castling(res.castling);
        res.record_position();
        res
    }

    /// Parses a board from FEN
    ///
    /// Does the same as [`Board::from_str`]. It is recommended to use this function instead of
    /// `from_str()` for better readability.
    ///
    /// Missing halfmove clock and fullmove number are treated as `0` and `1` respectively. The
    /// imported position is recorded as the first position signature.
    pub fn from_fen(fen: &str) -> Result<Board, FenParseError> {
        Board::from_str(fen)
    }

    /// Returns the contents of the square `sq`
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cell(sq)
    }

    /// Returns the contents of the square with file `file` and rank `rank`
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Option<Piece> {
        self.get(Square::from_parts(file, rank))
    }

    /// Puts `piece` to the square `sq`, returning the previous contents of this square
    ///
    /// The position signature is kept up to date. Castling rights and en passant target are not
    /// changed, so the caller is responsible for keeping them consistent with the new layout.
    pub fn put(&mut self, sq: Square, piece: Option<Piece>) -> Option<Piece> {
        let old = self.cell(sq);
        if let Some(p) = old {
            self.hash ^= zobrist::piece(p, sq);
        }
        if let Some(p) = piece {
            self.hash ^= zobrist::piece(p, sq);
        }
        self.set_cell(sq, piece);
        old
    }

    #[inline]
    pub(crate) fn cell(&self, sq: Square) -> Option<Piece> {
        unsafe { *self.cells.get_unchecked(sq.index()) }
    }

    #[inline]
    pub(crate) fn set_cell(&mut self, sq: Square, piece: Option<Piece>) {
        unsafe {
            *self.cells.get_unchecked_mut(sq.index()) = piece;
        }
    }

    /// Iterates over all the pieces on the board together with their squares
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (Square::from_index(i), p)))
    }

    /// Returns the square of the king of color `c`
    pub fn king_square(&self, c: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.color == c && p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    /// Returns castling rights
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the square a pawn can capture en passant onto
    ///
    /// It is set only immediately after a double pawn move and cleared after any other move.
    #[inline]
    pub fn ep_target(&self) -> Option<Square> {
        self.ep_target
    }

    /// Returns the number of half-moves since the last capture or pawn move
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Returns the move number
    ///
    /// Note that this is move number, not half-move number. It is incremented after each
    /// move by Black.
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Returns the Zobrist hash of the position
    ///
    /// This function is quite fast, as it doesn't compute anything and just returns the
    /// stored value.
    ///
    /// Note that Zobrist hash doesn't contain halfmove clock and move number, so it can be used
    /// to detect draw by repetitions.
    #[inline]
    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    /// Recalculates the Zobrist hash of the position from scratch
    pub fn compute_hash(&self) -> u64 {
        let mut hash = if self.side == Color::White {
            zobrist::MOVE_SIDE
        } else {
            0
        };
        if let Some(p) = self.ep_target {
            hash ^= zobrist::enpassant(p.file());
        }
        hash ^= zobrist::castling(self.castling);
        for (sq, piece) in self.pieces() {
            hash ^= zobrist::piece(piece, sq);
        }
        hash
    }

    /// Records the current position signature
    ///
    /// [`Board::make_move()`] calls it after every move, so normally you don't need to call it
    /// yourself.
    pub fn record_position(&mut self) {
        *self.signatures.entry(self.hash).or_insert(0) += 1;
    }

    /// Returns how many times the current position has been recorded
    pub fn repetition_count(&self) -> usize {
        self.signatures.get(&self.hash).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetition_count() >= 3
    }

    /// Returns `true` if the square `sq` is attacked by any piece of color `by`
    #[inline]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        attack::is_attacked(&self.cells, sq, by)
    }

    /// Returns `true` if the current side is in check
    pub fn is_check(&self) -> bool {
        match self.king_square(self.side) {
            Some(k) => self.is_square_attacked(k, self.side.inv()),
            None => false,
        }
    }

    /// Validates the board
    ///
    /// The board is valid if each side has exactly one king, there are no pawns on the first and
    /// the last ranks, the en passant target (if any) is located on the correct rank, and the
    /// king of the side not to move is not under attack.
    pub fn validate(&self) -> Result<(), ValidateError> {
        for color in [Color::White, Color::Black] {
            let kings = self
                .pieces()
                .filter(|(_, p)| p.color == color && p.kind == PieceKind::King)
                .count();
            match kings {
                0 => return Err(ValidateError::NoKing(color)),
                1 => {}
                _ => return Err(ValidateError::TooManyKings(color)),
            }
        }

        if let Some((sq, _)) = self.pieces().find(|(sq, p)| {
            p.kind == PieceKind::Pawn && matches!(sq.rank(), Rank::R1 | Rank::R8)
        }) {
            return Err(ValidateError::InvalidPawn(sq));
        }

        if let Some(p) = self.ep_target {
            if p.rank() != geometry::enpassant_dst_rank(self.side) {
                return Err(ValidateError::InvalidEnpassant(p));
            }
        }

        if let Some(k) = self.king_square(self.side.inv()) {
            if self.is_square_attacked(k, self.side) {
                return Err(ValidateError::OpponentKingAttacked);
            }
        }

        Ok(())
    }

    /// Converts the board into a FEN string
    ///
    /// Unlike `Board::to_string()`, the board is validated first, so a corrupt position is
    /// reported as an error instead of producing a FEN that cannot be read back.
    pub fn to_fen(&self) -> Result<String, ValidateError> {
        self.validate()?;
        Ok(self.to_string())
    }

    /// Validates and applies the move `mv`, then records the new position signature
    ///
    /// If the move is not legal, the board is left untouched.
    pub fn make_move(&mut self, mv: Move) -> Result<(), moves::ValidateError> {
        mv.validate(self)?;
        moves::make_move_unchecked(self, mv);
        self.record_position();
        trace!(
            mv = %mv,
            halfmove_clock = self.halfmove_clock,
            "move applied"
        );
        Ok(())
    }

    /// Parses the UCI string `s` into a legal move and applies it
    pub fn make_uci(&mut self, s: &str) -> Result<Move, uci::ParseError> {
        let mv = Move::from_uci(s, self)?;
        self.make_move(mv)?;
        Ok(mv)
    }

    fn fix_castling(&mut self) {
        for color in [Color::White, Color::Black] {
            let rank = geometry::castling_rank(color);
            let king = Piece::new(color, PieceKind::King);
            let rook = Piece::new(color, PieceKind::Rook);
            if !matches!(self.get2(File::E, rank), Some(p) if p.same_as(&king)) {
                self.castling.unset_color(color);
            }
            for (file, side) in [(File::A, CastlingSide::Queen), (File::H, CastlingSide::King)] {
                if !matches!(self.get2(file, rank), Some(p) if p.same_as(&rook)) {
                    self.castling.unset(color, side);
                }
            }
        }
    }

    fn fix_moved_flags(&mut self) {
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            let piece = match self.cells[idx] {
                Some(p) => p,
                None => continue,
            };
            let rank = geometry::castling_rank(piece.color);
            let moved = match piece.kind {
                PieceKind::Pawn => sq.rank() != geometry::pawn_home_rank(piece.color),
                PieceKind::King => {
                    sq != Square::from_parts(File::E, rank)
                        || !self.castling.has_color(piece.color)
                }
                PieceKind::Rook => {
                    let side = if sq == Square::from_parts(File::A, rank) {
                        Some(CastlingSide::Queen)
                    } else if sq == Square::from_parts(File::H, rank) {
                        Some(CastlingSide::King)
                    } else {
                        None
                    };
                    !side.map_or(false, |s| self.castling.has(piece.color, s))
                }
                _ => false,
            };
            self.cells[idx] = Some(Piece { moved, ..piece });
        }
    }

    fn fix_enpassant(&mut self) {
        let target = match self.ep_target {
            Some(t) => t,
            None => return,
        };
        // Reset en passant if there is no pawn which has just passed the target square
        let passed = target.shift(-geometry::pawn_direction(self.side), 0);
        let pawn = Piece::new(self.side.inv(), PieceKind::Pawn);
        let has_pawn = matches!(passed.and_then(|sq| self.get(sq)), Some(p) if p.same_as(&pawn));
        if !has_pawn || self.get(target).is_some() {
            self.ep_target = None;
        }
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        let same_cells = self
            .cells
            .iter()
            .zip(other.cells.iter())
            .all(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => a.same_as(b),
                (None, None) => true,
                _ => false,
            });
        same_cells
            && self.side == other.side
            && self.castling == other.castling
            && self.ep_target == other.ep_target
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

impl Eq for Board {}

fn parse_cells(s: &str) -> Result<[Option<Piece>; 64], CellsParseError> {
    type Error = CellsParseError;

    let mut file = 0_usize;
    let mut rank = 0_usize;
    let mut pos = 0_usize;
    let mut cells = [None; 64];
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                file += add;
                pos += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(Rank::from_index(rank)));
                }
                rank += 1;
                file = 0;
                if rank >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                cells[pos] =
                    Some(Piece::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?);
                file += 1;
                pos += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(Rank::from_index(rank)));
    }
    if rank < 7 {
        return Err(Error::Underflow);
    }

    Ok(cells)
}

fn parse_ep_target(s: &str, side: Color) -> Result<Option<Square>, FenParseError> {
    if s == "-" {
        return Ok(None);
    }
    let target = Square::from_str(s)?;
    if target.rank() != geometry::enpassant_dst_rank(side) {
        return Err(FenParseError::InvalidEnpassantRank(target.rank()));
    }
    Ok(Some(target))
}

impl FromStr for Board {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        type Error = FenParseError;

        if !s.is_ascii() {
            return Err(Error::NonAscii);
        }
        let mut iter = s.split(' ').fuse();

        let cells = parse_cells(iter.next().ok_or(Error::NoBoard)?)?;
        let side = Color::from_str(iter.next().ok_or(Error::NoMoveSide)?)?;
        let castling = CastlingRights::from_str(iter.next().ok_or(Error::NoCastling)?)?;
        let ep_target = parse_ep_target(iter.next().ok_or(Error::NoEnpassant)?, side)?;
        let halfmove_clock = match iter.next() {
            Some(s) => u16::from_str(s).map_err(Error::HalfmoveClock)?,
            None => 0,
        };
        let fullmove_number = match iter.next() {
            Some(s) => u16::from_str(s).map_err(Error::FullmoveNumber)?,
            None => 1,
        };

        if iter.next().is_some() {
            return Err(Error::ExtraData);
        }

        let mut res = Board {
            cells,
            side,
            castling,
            ep_target,
            halfmove_clock,
            fullmove_number,
            hash: 0,
            signatures: HashMap::new(),
        };
        res.fix_castling();
        res.fix_moved_flags();
        res.fix_enpassant();
        res.validate()?;
        res.hash = res.compute_hash();
        res.record_position();
        Ok(res)
    }
}

fn format_cells(cells: &[Option<Piece>; 64], f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    for rank in Rank::iter() {
        if rank.index() != 0 {
            write!(f, "/")?;
        }
        let mut empty = 0;
        for file in File::iter() {
            let piece = match cells[Square::from_parts(file, rank).index()] {
                Some(p) => p,
                None => {
                    empty += 1;
                    continue;
                }
            };
            if empty != 0 {
                write!(f, "{}", (b'0' + empty) as char)?;
                empty = 0;
            }
            write!(f, "{}", piece)?;
        }
        if empty != 0 {
            write!(f, "{}", (b'0' + empty) as char)?;
        }
    }
    Ok(())
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        format_cells(&self.cells, f)?;
        write!(f, " {} {}", self.side.as_char(), self.castling)?;
        match self.ep_target {
            Some(p) => write!(f, " {}", p)?,
            None => write!(f, " -")?,
        };
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)?;
        Ok(())
    }
}
