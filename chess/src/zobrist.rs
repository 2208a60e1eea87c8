use crate::types::{CastlingRights, CastlingSide, Color, File, Piece, Square};

include!(concat!(env!("OUT_DIR"), "/zobrist.rs"));

pub fn piece(piece: Piece, sq: Square) -> u64 {
    unsafe {
        *PIECES
            .get_unchecked(piece.index())
            .get_unchecked(sq.index())
    }
}

pub fn enpassant(file: File) -> u64 {
    unsafe { *ENPASSANT.get_unchecked(file.index()) }
}

pub fn castling(rights: CastlingRights) -> u64 {
    unsafe { *CASTLING.get_unchecked(rights.index()) }
}

/// Combined key of the king and rook relocation done by castling
pub fn castling_delta(color: Color, side: CastlingSide) -> u64 {
    match side {
        CastlingSide::Queen => unsafe { *CASTLING_QUEENSIDE.get_unchecked(color.index()) },
        CastlingSide::King => unsafe { *CASTLING_KINGSIDE.get_unchecked(color.index()) },
    }
}
