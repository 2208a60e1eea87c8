//! Move patterns of the pieces and attack detection

use crate::types::{Color, Piece, PieceKind, Square};

/// Offsets as `(delta_row, delta_col)` pairs
pub type Offsets = &'static [(isize, isize)];

pub const KNIGHT_OFFSETS: Offsets = &[
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_OFFSETS: Offsets = &[
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const DIAGONAL: Offsets = &[(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub const ORTHOGONAL: Offsets = &[(-1, 0), (1, 0), (0, -1), (0, 1)];

/// How a piece moves and captures
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Pushes forward, captures diagonally forward
    Pawn,
    /// Jumps by each offset once
    Leaper(Offsets),
    /// Slides along each direction until blocked
    Slider(Offsets),
    /// Slides along both diagonal and orthogonal directions
    DoubleSlider(Offsets, Offsets),
}

impl Pattern {
    /// Iterates over the directions or offsets of this pattern
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize)> {
        let (first, second): (Offsets, Offsets) = match *self {
            Pattern::Pawn => (&[], &[]),
            Pattern::Leaper(o) | Pattern::Slider(o) => (o, &[]),
            Pattern::DoubleSlider(a, b) => (a, b),
        };
        first.iter().chain(second.iter()).copied()
    }
}

/// Returns the move pattern of the piece kind `kind`
pub const fn pattern(kind: PieceKind) -> Pattern {
    match kind {
        PieceKind::Pawn => Pattern::Pawn,
        PieceKind::Knight => Pattern::Leaper(KNIGHT_OFFSETS),
        PieceKind::Bishop => Pattern::Slider(DIAGONAL),
        PieceKind::Rook => Pattern::Slider(ORTHOGONAL),
        PieceKind::Queen => Pattern::DoubleSlider(DIAGONAL, ORTHOGONAL),
        PieceKind::King => Pattern::Leaper(KING_OFFSETS),
    }
}

#[inline]
fn cell(cells: &[Option<Piece>; 64], sq: Square) -> Option<Piece> {
    cells[sq.index()]
}

fn has_piece(cells: &[Option<Piece>; 64], sq: Option<Square>, by: Color, kind: PieceKind) -> bool {
    matches!(sq.and_then(|sq| cell(cells, sq)), Some(p) if p.color == by && p.kind == kind)
}

fn slider_hits(
    cells: &[Option<Piece>; 64],
    sq: Square,
    dirs: Offsets,
    by: Color,
    kind: PieceKind,
) -> bool {
    for &(dr, dc) in dirs {
        let mut cur = sq.shift(dr, dc);
        while let Some(c) = cur {
            if let Some(p) = cell(cells, c) {
                if p.color == by && (p.kind == kind || p.kind == PieceKind::Queen) {
                    return true;
                }
                break;
            }
            cur = c.shift(dr, dc);
        }
    }
    false
}

/// Returns `true` if the square `sq` is attacked by any piece of color `by`
///
/// Only captures count, so pawn pushes don't attack anything. The function works on a raw
/// cells array, so it can be used on a scratch copy during legality checks.
pub fn is_attacked(cells: &[Option<Piece>; 64], sq: Square, by: Color) -> bool {
    // A pawn of color `by` attacks `sq` from the squares one step back along its direction
    let back = -Piece::new(by, PieceKind::Pawn).direction();
    if has_piece(cells, sq.shift(back, -1), by, PieceKind::Pawn)
        || has_piece(cells, sq.shift(back, 1), by, PieceKind::Pawn)
    {
        return true;
    }

    // Near attacks
    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, dc)| has_piece(cells, sq.shift(dr, dc), by, PieceKind::Knight))
        || KING_OFFSETS
            .iter()
            .any(|&(dr, dc)| has_piece(cells, sq.shift(dr, dc), by, PieceKind::King))
    {
        return true;
    }

    // Far attacks
    slider_hits(cells, sq, DIAGONAL, by, PieceKind::Bishop)
        || slider_hits(cells, sq, ORTHOGONAL, by, PieceKind::Rook)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use std::str::FromStr;

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    #[test]
    fn test_patterns() {
        assert_eq!(pattern(PieceKind::Queen).offsets().count(), 8);
        assert_eq!(pattern(PieceKind::Knight).offsets().count(), 8);
        assert_eq!(pattern(PieceKind::Pawn).offsets().count(), 0);
        assert!(matches!(pattern(PieceKind::Rook), Pattern::Slider(_)));
        assert!(matches!(pattern(PieceKind::King), Pattern::Leaper(_)));
    }

    #[test]
    fn test_attacked() {
        let b = Board::from_fen("3R3B/8/3R4/1NP1Q3/3p4/1NP5/5B2/3R1K1k w - - 0 1").unwrap();
        assert!(b.is_square_attacked(sq("d4"), Color::White));
        assert!(!b.is_square_attacked(sq("d4"), Color::Black));
        assert!(b.is_square_attacked(sq("c3"), Color::Black));
        assert!(b.is_square_attacked(sq("e3"), Color::Black));
        assert!(!b.is_square_attacked(sq("d3"), Color::Black));

        let b = Board::from_fen("8/8/8/2KPk3/8/8/8/8 w - - 0 1").unwrap();
        assert!(b.is_square_attacked(sq("d5"), Color::White));
        assert!(b.is_square_attacked(sq("d5"), Color::Black));
        assert!(b.is_square_attacked(sq("e6"), Color::White));
        assert!(b.is_square_attacked(sq("d6"), Color::Black));
        assert!(!b.is_square_attacked(sq("g5"), Color::White));
    }

    #[test]
    fn test_sliders_blocked() {
        let b = Board::from_fen("4k3/8/8/8/1q6/2P5/8/4K2R w - - 0 1").unwrap();
        assert!(!b.is_square_attacked(sq("e1"), Color::Black));
        assert!(b.is_square_attacked(sq("c3"), Color::Black));
        assert!(b.is_square_attacked(sq("h8"), Color::White));
        assert!(b.is_square_attacked(sq("f1"), Color::White));
        assert!(b.is_square_attacked(sq("d1"), Color::White));
        assert!(!b.is_square_attacked(sq("a1"), Color::White));
    }
}
