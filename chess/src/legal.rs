use crate::attack;
use crate::board::Board;
use crate::moves::{Move, MoveKind};
use crate::types::{Color, Piece, PieceKind, Square};

/// Legality filter for semilegal moves
///
/// Works on a private copy of the cells only: each move is made on the copy, the king is
/// checked for attacks, then the move is reverted. The source board is never touched.
#[derive(Clone, Debug)]
pub struct Checker {
    side: Color,
    king: Option<Square>,
    cells: [Option<Piece>; 64],
}

struct Undo {
    dst: Option<Piece>,
    taken: Option<(Square, Option<Piece>)>,
}

impl Checker {
    /// Creates a checker for moves of color `side`
    pub fn new(src: &Board, side: Color) -> Self {
        Self {
            side,
            king: src.king_square(side),
            cells: src.cells,
        }
    }

    fn is_attacked(&self, sq: Square) -> bool {
        attack::is_attacked(&self.cells, sq, self.side.inv())
    }

    fn make_move(&mut self, mv: Move) -> Undo {
        let piece = self.cells[mv.src().index()];
        let dst = self.cells[mv.dst().index()];
        let mut taken = None;
        if mv.kind() == MoveKind::Enpassant {
            if let Some(sq) = Square::from_row_col(mv.src().row(), mv.dst().col()) {
                taken = Some((sq, self.cells[sq.index()]));
                self.cells[sq.index()] = None;
            }
        }
        self.cells[mv.src().index()] = None;
        self.cells[mv.dst().index()] = piece;
        Undo { dst, taken }
    }

    fn unmake_move(&mut self, mv: Move, u: Undo) {
        self.cells[mv.src().index()] = self.cells[mv.dst().index()];
        self.cells[mv.dst().index()] = u.dst;
        if let Some((sq, p)) = u.taken {
            self.cells[sq.index()] = p;
        }
    }

    fn is_castling_legal(&mut self, mv: Move) -> bool {
        // The king may not castle out of, through, or into check
        let pass = match Square::from_row_col(
            mv.src().row(),
            (mv.src().col() + mv.dst().col()) / 2,
        ) {
            Some(sq) => sq,
            None => return false,
        };
        if self.is_attacked(mv.src()) || self.is_attacked(pass) {
            return false;
        }
        let u = self.make_move(mv);
        let res = !self.is_attacked(mv.dst());
        self.unmake_move(mv, u);
        res
    }

    /// Returns `true` if the semilegal move `mv` doesn't leave the king of the moving side
    /// under attack
    pub fn is_legal(&mut self, mv: Move) -> bool {
        if mv.castling_side().is_some() {
            return self.is_castling_legal(mv);
        }

        let moves_king = matches!(
            self.cells[mv.src().index()],
            Some(p) if p.kind == PieceKind::King
        );
        let king = if moves_king { Some(mv.dst()) } else { self.king };
        let king = match king {
            Some(k) => k,
            None => return true,
        };

        let u = self.make_move(mv);
        let res = !self.is_attacked(king);
        self.unmake_move(mv, u);
        res
    }
}
