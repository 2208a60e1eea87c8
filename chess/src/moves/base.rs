use super::uci;
use crate::board::Board;
use crate::legal::Checker;
use crate::types::{CastlingRights, CastlingSide, Color, File, Piece, PieceKind, Square};
use crate::{geometry, movegen, zobrist};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Move kind
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MoveKind {
    /// Non-pawn move or capture (except castling)
    Simple = 0,
    /// Kingside castling
    CastlingKingside = 1,
    /// Queenside castling
    CastlingQueenside = 2,
    /// Single pawn move (either non-capture or capture)
    PawnSimple = 3,
    /// Double pawn move
    PawnDouble = 4,
    /// En passant
    Enpassant = 5,
    /// Pawn move to the last rank (either non-capture or capture)
    Promote = 6,
}

/// Target piece for promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PromotePiece {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl PromotePiece {
    pub const fn kind(&self) -> PieceKind {
        match *self {
            PromotePiece::Knight => PieceKind::Knight,
            PromotePiece::Bishop => PieceKind::Bishop,
            PromotePiece::Rook => PieceKind::Rook,
            PromotePiece::Queen => PieceKind::Queen,
        }
    }

    pub fn as_char(&self) -> char {
        self.kind().as_char()
    }

    pub fn from_char(c: char) -> Option<PromotePiece> {
        match c {
            'n' => Some(PromotePiece::Knight),
            'b' => Some(PromotePiece::Bishop),
            'r' => Some(PromotePiece::Rook),
            'q' => Some(PromotePiece::Queen),
            _ => None,
        }
    }
}

impl From<CastlingSide> for MoveKind {
    #[inline]
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::King => Self::CastlingKingside,
            CastlingSide::Queen => Self::CastlingQueenside,
        }
    }
}

impl TryFrom<MoveKind> for CastlingSide {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        match kind {
            MoveKind::CastlingKingside => Ok(Self::King),
            MoveKind::CastlingQueenside => Ok(Self::Queen),
            _ => Err(()),
        }
    }
}

/// Chess move
///
/// Moves are produced by the move generator (see [`movegen`](crate::movegen)) or resolved from
/// engine strings via [`UciMove`](super::UciMove), and are consumed by [`Board::make_move()`].
///
/// Besides the source and destination squares, a move carries a snapshot of the piece it
/// captures (if any). For en passant, the captured pawn stands beside the source square, not on
/// the destination square.
///
/// Moves can have different degrees of validity:
///
/// - _Semilegal_. A move is considered semilegal if it's valid by the rules of chess, except that
///   the king can remain under attack after such move.
///
/// - _Legal_. A move is considered legal if it's semilegal plus the king doesn't remain under
///   attack.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    kind: MoveKind,
    src: Square,
    dst: Square,
    captured: Option<Piece>,
    promote: Option<PromotePiece>,
}

/// Error indicating that move is invalid
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Move is not semi-legal
    #[error("move is not semi-legal")]
    NotSemiLegal,
    /// Move is not legal
    #[error("move is not legal")]
    NotLegal,
}

impl Move {
    /// Creates a move from its raw parts
    ///
    /// Promote moves get promoted to a queen.
    pub const fn new(kind: MoveKind, src: Square, dst: Square, captured: Option<Piece>) -> Move {
        let promote = match kind {
            MoveKind::Promote => Some(PromotePiece::Queen),
            _ => None,
        };
        Move {
            kind,
            src,
            dst,
            captured,
            promote,
        }
    }

    /// Creates a castling move made by `color` with side `side`
    pub fn from_castling(color: Color, side: CastlingSide) -> Move {
        let rank = geometry::castling_rank(color);
        let src = Square::from_parts(File::E, rank);
        let dst = match side {
            CastlingSide::King => Square::from_parts(File::G, rank),
            CastlingSide::Queen => Square::from_parts(File::C, rank),
        };
        Move::new(MoveKind::from(side), src, dst, None)
    }

    /// Creates a move from the UCI string `s` if `b` is the position preceding this move
    ///
    /// The returned move is guaranteed to be legal.
    pub fn from_uci(s: &str, b: &Board) -> Result<Move, uci::ParseError> {
        Ok(uci::Move::from_str(s)?.into_move(b)?)
    }

    /// Returns the same move with the promotion piece replaced by `piece`
    ///
    /// Returns `None` if this move is not a promotion.
    pub fn with_promote(self, piece: PromotePiece) -> Option<Move> {
        match self.kind {
            MoveKind::Promote => Some(Move {
                promote: Some(piece),
                ..self
            }),
            _ => None,
        }
    }

    /// Returns `true` if the move is semilegal
    pub fn is_semilegal(&self, b: &Board) -> bool {
        match b.get(self.src) {
            Some(p) if p.color == b.side() => {}
            _ => return false,
        };
        let mut list = movegen::MoveList::new();
        movegen::semilegal_from_into(b, self.src, &mut list);
        list.iter()
            .any(|m| m.kind == self.kind && m.dst == self.dst && m.captured == self.captured)
    }

    /// Validates whether this move is semilegal from position `b`
    #[inline]
    pub fn semi_validate(&self, b: &Board) -> Result<(), ValidateError> {
        if !self.is_semilegal(b) {
            return Err(ValidateError::NotSemiLegal);
        }
        Ok(())
    }

    /// Validates whether this move is legal from position `b`
    pub fn validate(&self, b: &Board) -> Result<(), ValidateError> {
        self.semi_validate(b)?;
        match Checker::new(b, b.side()).is_legal(*self) {
            true => Ok(()),
            false => Err(ValidateError::NotLegal),
        }
    }

    /// Returns the kind of this move
    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Returns the source square
    #[inline]
    pub const fn src(&self) -> Square {
        self.src
    }

    /// Returns the destination square
    #[inline]
    pub const fn dst(&self) -> Square {
        self.dst
    }

    /// Returns the piece captured by this move
    #[inline]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// Returns the piece the pawn turns into, if this move is a promotion
    #[inline]
    pub const fn promote(&self) -> Option<PromotePiece> {
        self.promote
    }

    /// Returns `true` if this move captures a piece
    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn is_enpassant(&self) -> bool {
        self.kind == MoveKind::Enpassant
    }

    #[inline]
    pub fn castling_side(&self) -> Option<CastlingSide> {
        self.kind.try_into().ok()
    }

    /// Returns the square of the piece captured by this move
    pub fn captured_square(&self) -> Option<Square> {
        self.captured?;
        match self.kind {
            MoveKind::Enpassant => Square::from_row_col(self.src.row(), self.dst.col()),
            _ => Some(self.dst),
        }
    }

    /// Converts this move into a parsed UCI representation
    #[inline]
    pub fn uci(&self) -> uci::Move {
        (*self).into()
    }
}

impl fmt::Display for Move {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.uci().fmt(f)
    }
}

/// Metadata necessary to undo the applied move
#[derive(Debug, Copy, Clone)]
pub struct RawUndo {
    hash: u64,
    piece: Piece,
    captured: Option<Piece>,
    rook: Option<Piece>,
    castling: CastlingRights,
    ep_target: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
}

fn update_castling(b: &mut Board, src: Square, dst: Square) {
    let mut castling = b.castling;
    for color in [Color::White, Color::Black] {
        let rank = geometry::castling_rank(color);
        let king = Square::from_parts(File::E, rank);
        let queen_rook = Square::from_parts(File::A, rank);
        let king_rook = Square::from_parts(File::H, rank);
        for sq in [src, dst] {
            if sq == king {
                castling.unset_color(color);
            }
            if sq == queen_rook {
                castling.unset(color, CastlingSide::Queen);
            }
            if sq == king_rook {
                castling.unset(color, CastlingSide::King);
            }
        }
    }

    if castling != b.castling {
        b.hash ^= zobrist::castling(b.castling);
        b.castling = castling;
        b.hash ^= zobrist::castling(b.castling);
    }
}

fn castling_files(side: CastlingSide) -> (File, File) {
    match side {
        CastlingSide::King => (File::H, File::F),
        CastlingSide::Queen => (File::A, File::D),
    }
}

/// Applies a semilegal move without validating it
///
/// This is the silent primitive behind [`Board::make_move()`] and the legality filter: it does not
/// record the position signature and emits no events. The returned [`RawUndo`] allows to revert the
/// move with [`unmake_move_unchecked()`].
///
/// # Panics
///
/// The move must be semilegal for `b`. Otherwise, the function may panic or leave the board in an
/// invalid state.
pub fn make_move_unchecked(b: &mut Board, mv: Move) -> RawUndo {
    let piece = match b.get(mv.src) {
        Some(p) => p,
        None => panic!("no piece on source square {}", mv.src),
    };
    let color = piece.color;
    let mut undo = RawUndo {
        hash: b.hash,
        piece,
        captured: None,
        rook: None,
        castling: b.castling,
        ep_target: b.ep_target,
        halfmove_clock: b.halfmove_clock,
        fullmove_number: b.fullmove_number,
    };

    if let Some(target) = b.ep_target.take() {
        b.hash ^= zobrist::enpassant(target.file());
    }

    match mv.kind {
        MoveKind::Simple | MoveKind::PawnSimple | MoveKind::PawnDouble | MoveKind::Promote => {
            undo.captured = b.put(mv.dst, None);
            b.put(mv.src, None);
            let moved = match mv.promote {
                Some(p) if mv.kind == MoveKind::Promote => Piece::new(color, p.kind()).moved(),
                _ => piece.moved(),
            };
            b.put(mv.dst, Some(moved));
            if mv.kind == MoveKind::PawnDouble {
                let target = Square::from_row_col(
                    (mv.src.row() + mv.dst.row()) / 2,
                    mv.src.col(),
                );
                if let Some(target) = target {
                    b.ep_target = Some(target);
                    b.hash ^= zobrist::enpassant(target.file());
                }
            }
        }
        MoveKind::Enpassant => {
            if let Some(taken) = Square::from_row_col(mv.src.row(), mv.dst.col()) {
                undo.captured = b.put(taken, None);
            }
            b.put(mv.src, None);
            b.put(mv.dst, Some(piece.moved()));
        }
        MoveKind::CastlingKingside | MoveKind::CastlingQueenside => {
            let side = if mv.kind == MoveKind::CastlingKingside {
                CastlingSide::King
            } else {
                CastlingSide::Queen
            };
            let rank = geometry::castling_rank(color);
            let (rook_src, rook_dst) = castling_files(side);
            let rook_src = Square::from_parts(rook_src, rank);
            let rook_dst = Square::from_parts(rook_dst, rank);
            let rook = b.cell(rook_src);
            undo.rook = rook;
            b.set_cell(mv.src, None);
            b.set_cell(rook_src, None);
            b.set_cell(mv.dst, Some(piece.moved()));
            b.set_cell(rook_dst, rook.map(Piece::moved));
            b.hash ^= zobrist::castling_delta(color, side);
        }
    }

    update_castling(b, mv.src, mv.dst);

    if undo.captured.is_some() || piece.kind == PieceKind::Pawn {
        b.halfmove_clock = 0;
    } else {
        b.halfmove_clock = b.halfmove_clock.saturating_add(1);
    }
    if color == Color::Black {
        b.fullmove_number = b.fullmove_number.saturating_add(1);
    }
    b.side = color.inv();
    b.hash ^= zobrist::MOVE_SIDE;

    undo
}

/// Reverts the move previously applied with [`make_move_unchecked()`]
///
/// `mv` and `u` must be exactly the move and the undo record from the latest call to
/// [`make_move_unchecked()`] on this board.
pub fn unmake_move_unchecked(b: &mut Board, mv: Move, u: RawUndo) {
    let color = u.piece.color;
    match mv.kind {
        MoveKind::Simple | MoveKind::PawnSimple | MoveKind::PawnDouble | MoveKind::Promote => {
            b.set_cell(mv.src, Some(u.piece));
            b.set_cell(mv.dst, u.captured);
        }
        MoveKind::Enpassant => {
            b.set_cell(mv.src, Some(u.piece));
            b.set_cell(mv.dst, None);
            if let Some(taken) = Square::from_row_col(mv.src.row(), mv.dst.col()) {
                b.set_cell(taken, u.captured);
            }
        }
        MoveKind::CastlingKingside | MoveKind::CastlingQueenside => {
            let side = if mv.kind == MoveKind::CastlingKingside {
                CastlingSide::King
            } else {
                CastlingSide::Queen
            };
            let rank = geometry::castling_rank(color);
            let (rook_src, rook_dst) = castling_files(side);
            b.set_cell(mv.dst, None);
            b.set_cell(Square::from_parts(rook_dst, rank), None);
            b.set_cell(mv.src, Some(u.piece));
            b.set_cell(Square::from_parts(rook_src, rank), u.rook);
        }
    }

    b.side = color;
    b.castling = u.castling;
    b.ep_target = u.ep_target;
    b.halfmove_clock = u.halfmove_clock;
    b.fullmove_number = u.fullmove_number;
    b.hash = u.hash;
}
