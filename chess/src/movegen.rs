//! Pseudo-legal and legal move generation

use crate::attack::{self, Pattern};
use crate::board::Board;
use crate::geometry;
use crate::legal::Checker;
use crate::moves::{self, Move, MoveKind};
use crate::types::{CastlingSide, Color, File, Piece, PieceKind, Square};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut MoveList {
    type Item = &'a mut Move;
    type IntoIter = slice::IterMut<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl<const N: usize> MovePush for ArrayVec<Move, N> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

struct MoveGen<'a, P> {
    b: &'a Board,
    dst: &'a mut P,
}

impl<'a, P: MovePush> MoveGen<'a, P> {
    fn new(b: &'a Board, dst: &'a mut P) -> Self {
        Self { b, dst }
    }

    fn add(&mut self, kind: MoveKind, src: Square, dst: Square, captured: Option<Piece>) {
        self.dst.push(Move::new(kind, src, dst, captured));
    }

    fn gen_pawn(&mut self, src: Square, pawn: Piece) {
        let c = pawn.color;
        let dir = pawn.direction();
        let simple_kind = |dst: Square| {
            if dst.rank() == geometry::promote_rank(c) {
                MoveKind::Promote
            } else {
                MoveKind::PawnSimple
            }
        };

        // Pushes
        if let Some(one) = src.shift(dir, 0) {
            if self.b.get(one).is_none() {
                self.add(simple_kind(one), src, one, None);
                if !pawn.moved && src.rank() == geometry::pawn_home_rank(c) {
                    if let Some(two) = one.shift(dir, 0) {
                        if self.b.get(two).is_none() {
                            self.add(MoveKind::PawnDouble, src, two, None);
                        }
                    }
                }
            }
        }

        // Captures
        for dc in [-1, 1] {
            let dst = match src.shift(dir, dc) {
                Some(sq) => sq,
                None => continue,
            };
            match self.b.get(dst) {
                Some(p) if p.color != c => self.add(simple_kind(dst), src, dst, Some(p)),
                Some(_) => {}
                None => {
                    if self.b.ep_target() != Some(dst)
                        || src.rank() != geometry::enpassant_src_rank(c)
                    {
                        continue;
                    }
                    let passed = Square::from_row_col(src.row(), dst.col());
                    match passed.and_then(|sq| self.b.get(sq)) {
                        Some(p) if p.color != c && p.kind == PieceKind::Pawn => {
                            self.add(MoveKind::Enpassant, src, dst, Some(p))
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    fn gen_leaper(&mut self, src: Square, piece: Piece, offsets: attack::Offsets) {
        for &(dr, dc) in offsets {
            let dst = match src.shift(dr, dc) {
                Some(sq) => sq,
                None => continue,
            };
            match self.b.get(dst) {
                Some(p) if p.color == piece.color => {}
                captured => self.add(MoveKind::Simple, src, dst, captured),
            }
        }
    }

    fn gen_slider(
        &mut self,
        src: Square,
        piece: Piece,
        dirs: impl Iterator<Item = (isize, isize)>,
    ) {
        for (dr, dc) in dirs {
            let mut cur = src.shift(dr, dc);
            while let Some(dst) = cur {
                match self.b.get(dst) {
                    None => self.add(MoveKind::Simple, src, dst, None),
                    Some(p) => {
                        if p.color != piece.color {
                            self.add(MoveKind::Simple, src, dst, Some(p));
                        }
                        break;
                    }
                }
                cur = dst.shift(dr, dc);
            }
        }
    }

    fn gen_castling(&mut self, src: Square, king: Piece) {
        let c = king.color;
        let rank = geometry::castling_rank(c);
        if king.moved || src != Square::from_parts(File::E, rank) {
            return;
        }
        for (side, rook_file, between) in [
            (CastlingSide::King, File::H, &[File::F, File::G][..]),
            (CastlingSide::Queen, File::A, &[File::B, File::C, File::D][..]),
        ] {
            if !self.b.castling().has(c, side) {
                continue;
            }
            let rook_ok = matches!(
                self.b.get2(rook_file, rank),
                Some(p) if p.color == c && p.kind == PieceKind::Rook && !p.moved
            );
            let empty = between
                .iter()
                .all(|&f| self.b.get2(f, rank).is_none());
            if rook_ok && empty {
                self.dst.push(Move::from_castling(c, side));
            }
        }
    }

    fn gen_from(&mut self, src: Square) {
        let piece = match self.b.get(src) {
            Some(p) => p,
            None => return,
        };
        match attack::pattern(piece.kind) {
            Pattern::Pawn => self.gen_pawn(src, piece),
            Pattern::Leaper(offsets) => {
                self.gen_leaper(src, piece, offsets);
                if piece.kind == PieceKind::King {
                    self.gen_castling(src, piece);
                }
            }
            pattern => self.gen_slider(src, piece, pattern.offsets()),
        }
    }

    fn gen_all(&mut self, c: Color) {
        for (sq, _) in self.b.pieces().filter(|(_, p)| p.color == c) {
            self.gen_from(sq);
        }
    }
}

/// Generates semilegal moves of the piece on square `src` into `dst`
///
/// The piece may belong to either side. Nothing is generated for an empty square.
pub fn semilegal_from_into<P: MovePush>(b: &Board, src: Square, dst: &mut P) {
    MoveGen::new(b, dst).gen_from(src);
}

/// Generates semilegal moves of all the pieces of color `c` into `dst`
pub fn semilegal_for_into<P: MovePush>(b: &Board, c: Color, dst: &mut P) {
    MoveGen::new(b, dst).gen_all(c);
}

/// Returns semilegal moves of the side to move
pub fn semilegal(b: &Board) -> MoveList {
    semilegal_for(b, b.side())
}

/// Returns semilegal moves of color `c`
pub fn semilegal_for(b: &Board, c: Color) -> MoveList {
    let mut res = MoveList::new();
    semilegal_for_into(b, c, &mut res);
    res
}

fn retain_legal(b: &Board, c: Color, list: &mut MoveList) {
    let mut checker = Checker::new(b, c);
    list.retain(|&mut mv| checker.is_legal(mv));
}

/// Returns legal moves of the side to move
pub fn legal(b: &Board) -> MoveList {
    legal_for(b, b.side())
}

/// Returns legal moves of color `c`
///
/// Moves are checked as if `c` were the side to move. En passant is generated only for the
/// side to move.
pub fn legal_for(b: &Board, c: Color) -> MoveList {
    let mut res = semilegal_for(b, c);
    retain_legal(b, c, &mut res);
    res
}

/// Returns legal moves of the piece on square `src`
pub fn legal_from(b: &Board, src: Square) -> MoveList {
    let mut res = MoveList::new();
    let c = match b.get(src) {
        Some(p) => p.color,
        None => return res,
    };
    semilegal_from_into(b, src, &mut res);
    retain_legal(b, c, &mut res);
    res
}

/// Returns `true` if the side to move has at least one legal move
pub fn has_legal_moves(b: &Board) -> bool {
    has_legal_moves_for(b, b.side())
}

/// Returns `true` if color `c` has at least one legal move
pub fn has_legal_moves_for(b: &Board, c: Color) -> bool {
    let mut checker = Checker::new(b, c);
    let mut list = MoveList::new();
    for (sq, _) in b.pieces().filter(|(_, p)| p.color == c) {
        list.clear();
        semilegal_from_into(b, sq, &mut list);
        if list.iter().any(|&mv| checker.is_legal(mv)) {
            return true;
        }
    }
    false
}

/// Returns the squares of other pieces that could legally move to the destination of `mv`
///
/// Only pieces of the same kind and color as the one making `mv` are considered. This is what a
/// notation layer needs to disambiguate moves like `Nbd2`.
pub fn ambiguous_sources(b: &Board, mv: Move) -> Vec<Square> {
    let piece = match b.get(mv.src()) {
        Some(p) => p,
        None => return Vec::new(),
    };
    b.pieces()
        .filter(|&(sq, p)| sq != mv.src() && p.same_as(&piece))
        .filter(|&(sq, _)| legal_from(b, sq).iter().any(|m| m.dst() == mv.dst()))
        .map(|(sq, _)| sq)
        .collect()
}

/// Counts the leaf nodes of the legal move tree of depth `depth`
///
/// Each promotion is counted once, as the generator only yields promotions to queen.
pub fn perft(b: &mut Board, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let list = legal(b);
    if depth == 1 {
        return list.len() as u64;
    }
    let mut res = 0;
    for &mv in &list {
        let u = moves::make_move_unchecked(b, mv);
        res += perft(b, depth - 1);
        moves::unmake_move_unchecked(b, mv, u);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;
    use std::str::FromStr;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    fn uci_set(list: &MoveList) -> BTreeSet<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_initial() {
        let mut b = Board::initial();
        assert_eq!(legal(&b).len(), 20);
        assert_eq!(semilegal(&b).len(), 20);
        b.make_uci("e2e4").unwrap();
        assert_eq!(legal(&b).len(), 20);
        assert_eq!(legal_for(&b, Color::White).len(), 30);
    }

    #[test]
    fn test_perft() {
        let mut b = Board::initial();
        assert_eq!(perft(&mut b, 1), 20);
        assert_eq!(perft(&mut b, 2), 400);
        assert_eq!(perft(&mut b, 3), 8902);
        assert_eq!(b, Board::initial());

        let mut b = Board::from_fen(KIWIPETE).unwrap();
        assert_eq!(perft(&mut b, 1), 48);
        assert_eq!(perft(&mut b, 2), 2039);
        assert_eq!(b.to_fen().unwrap(), KIWIPETE);
    }

    #[test]
    fn test_enpassant() {
        let b = Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3")
            .unwrap();
        let moves = legal_from(&b, sq("e5"));
        assert_eq!(uci_set(&moves), BTreeSet::from(["e5d6".to_string(), "e5e6".to_string()]));
        let ep = moves.iter().find(|m| m.is_enpassant()).copied().unwrap();
        assert_eq!(ep.dst(), sq("d6"));
        assert_eq!(ep.captured_square(), Some(sq("d5")));
    }

    #[test]
    fn test_castling() {
        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = legal_from(&b, sq("e1"));
        assert!(uci_set(&moves).contains("e1g1"));
        assert!(uci_set(&moves).contains("e1c1"));
        assert_eq!(legal(&b).len(), 26);

        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1").unwrap();
        let moves = uci_set(&legal_from(&b, sq("e1")));
        assert!(!moves.contains("e1g1"));
        assert!(!moves.contains("e1c1"));

        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").unwrap();
        let moves = uci_set(&legal_from(&b, sq("e1")));
        assert!(!moves.contains("e1g1"));
        assert!(!moves.contains("e1c1"));
    }

    #[test]
    fn test_promote() {
        let b = Board::from_fen("1r5k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let moves = legal_from(&b, sq("a7"));
        assert_eq!(uci_set(&moves), BTreeSet::from(["a7a8q".to_string(), "a7b8q".to_string()]));
        assert!(moves.iter().all(|m| m.kind() == MoveKind::Promote));
    }

    #[test]
    fn test_no_moves() {
        let b = Board::from_fen("7K/8/5n2/5n2/8/8/7k/8 w - - 0 1").unwrap();
        assert!(!has_legal_moves(&b));
        assert!(legal(&b).is_empty());
        assert!(has_legal_moves_for(&b, Color::Black));
    }

    #[test]
    fn test_ambiguous_sources() {
        let b = Board::from_fen("3R3B/B7/1B1R4/1N2Q3/RQ1p4/1N6/5B2/3R1K1k w - - 0 1").unwrap();
        let d4 = sq("d4");
        let find = |src: &str| {
            legal_from(&b, sq(src))
                .iter()
                .copied()
                .find(|m| m.dst() == d4)
                .unwrap()
        };

        assert_eq!(ambiguous_sources(&b, find("b3")), vec![sq("b5")]);
        assert_eq!(ambiguous_sources(&b, find("b6")), vec![sq("f2")]);
        assert_eq!(ambiguous_sources(&b, find("d6")), vec![sq("d1")]);
        assert_eq!(ambiguous_sources(&b, find("e5")), vec![sq("b4")]);

        let king = legal_from(&b, sq("f1"))
            .iter()
            .copied()
            .find(|m| m.dst() == sq("e2"))
            .unwrap();
        assert!(ambiguous_sources(&b, king).is_empty());
    }

    #[test]
    fn test_random_playout() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let mut b = Board::initial();
            for _ in 0..80 {
                let list = legal(&b);
                if list.is_empty() {
                    break;
                }
                let mv = list[rng.gen_range(0..list.len())];
                let clock = b.halfmove_clock();
                let pawn_move = matches!(b.get(mv.src()), Some(p) if p.kind == PieceKind::Pawn);
                b.make_move(mv).unwrap();

                if mv.is_capture() || pawn_move {
                    assert_eq!(b.halfmove_clock(), 0);
                } else {
                    assert_eq!(b.halfmove_clock(), clock + 1);
                }
                for c in [Color::White, Color::Black] {
                    let kings = b
                        .pieces()
                        .filter(|(_, p)| p.color == c && p.kind == PieceKind::King)
                        .count();
                    assert_eq!(kings, 1);
                }
                assert_eq!(b.zobrist_hash(), b.compute_hash());
                let fen = b.to_fen().unwrap();
                assert_eq!(Board::from_fen(&fen).unwrap(), b);
            }
        }
    }
}
