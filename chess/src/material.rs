//! Material-based draw detection

use crate::board::Board;
use crate::types::{Color, Piece, PieceKind, Square};

use std::fmt;

/// Material combination with which checkmate is impossible
///
/// The table is deliberately conservative: any combination not listed here is considered
/// sufficient, even if it is drawish.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Insufficient {
    /// King vs King
    KingVsKing,
    /// King and a single minor piece vs King
    MinorVsKing { color: Color, kind: PieceKind },
    /// King and Bishop vs King and Bishop, with both bishops on the same square color
    BishopsSameShade { light: bool },
    /// King and Knight vs King and Knight
    KnightVsKnight,
}

impl fmt::Display for Insufficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Self::KingVsKing => write!(f, "King vs King"),
            Self::MinorVsKing {
                color: Color::White,
                kind,
            } => write!(f, "King + {} vs King", kind),
            Self::MinorVsKing {
                color: Color::Black,
                kind,
            } => write!(f, "King vs King + {}", kind),
            Self::BishopsSameShade { light } => write!(
                f,
                "King + Bishop vs King + Bishop (both on {} squares)",
                if light { "light" } else { "dark" }
            ),
            Self::KnightVsKnight => write!(f, "King + Knight vs King + Knight"),
        }
    }
}

fn non_king_pieces(b: &Board) -> impl Iterator<Item = (Square, Piece)> + '_ {
    b.pieces().filter(|(_, p)| p.kind != PieceKind::King)
}

/// Classifies the material on the board against the insufficient material table
pub fn insufficient_material(b: &Board) -> Option<Insufficient> {
    let mut white = Vec::new();
    let mut black = Vec::new();
    for (sq, p) in non_king_pieces(b) {
        match p.color {
            Color::White => white.push((sq, p.kind)),
            Color::Black => black.push((sq, p.kind)),
        }
        if white.len() + black.len() > 2 {
            return None;
        }
    }

    match (white.as_slice(), black.as_slice()) {
        ([], []) => Some(Insufficient::KingVsKing),
        ([(_, kind)], []) if kind.is_minor() => Some(Insufficient::MinorVsKing {
            color: Color::White,
            kind: *kind,
        }),
        ([], [(_, kind)]) if kind.is_minor() => Some(Insufficient::MinorVsKing {
            color: Color::Black,
            kind: *kind,
        }),
        ([(w, PieceKind::Bishop)], [(bl, PieceKind::Bishop)]) if w.is_light() == bl.is_light() => {
            Some(Insufficient::BishopsSameShade {
                light: w.is_light(),
            })
        }
        ([(_, PieceKind::Knight)], [(_, PieceKind::Knight)]) => Some(Insufficient::KnightVsKnight),
        _ => None,
    }
}

/// Detects a narrow set of dead positions
///
/// Only positions with at most two non-king pieces are analyzed: a bare board, a single minor
/// piece, or two knights of the same side. Returns the description of the remaining material.
pub fn dead_position(b: &Board) -> Option<String> {
    let pieces: Vec<Piece> = non_king_pieces(b).map(|(_, p)| p).take(3).collect();
    let dead = match pieces.as_slice() {
        [] => true,
        [p] => p.kind.is_minor(),
        [x, y] => x.kind == PieceKind::Knight && x.same_as(y),
        _ => false,
    };
    if !dead {
        return None;
    }
    let desc = pieces
        .iter()
        .map(|p| format!("{} {}", p.color, p.kind.to_string().to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!(
        "Dead position: checkmate impossible with current material ({})",
        desc
    ))
}
