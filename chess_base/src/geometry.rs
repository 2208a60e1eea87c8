use crate::types::{Color, Rank};

pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

/// Rank on which the pawns of color `c` stand initially
pub const fn pawn_home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

/// Rank on which the pawns of color `c` get promoted
pub const fn promote_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Rank on which a pawn of color `c` stands before capturing en passant
pub const fn enpassant_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R5,
        Color::Black => Rank::R4,
    }
}

/// Rank of the en passant target square when `c` is the side to move
pub const fn enpassant_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    }
}

/// Row delta of a forward pawn step for color `c`
pub const fn pawn_direction(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks() {
        for c in [Color::White, Color::Black] {
            let home = pawn_home_rank(c).index() as isize;
            let promote = promote_rank(c).index() as isize;
            let dir = pawn_direction(c);
            assert_eq!(home + 6 * dir, promote);
            assert_eq!(castling_rank(c).index() as isize, home - dir);
            assert_eq!(
                enpassant_dst_rank(c).index() as isize,
                enpassant_src_rank(c).index() as isize + dir
            );
        }
    }
}
