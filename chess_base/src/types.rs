use std::fmt::{self, Display};
use std::hint;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SquareParseError {
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PieceParseError {
    #[error("unexpected piece char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unexpected color char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastlingRightsParseError {
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
    #[error("duplicate char {0:?}")]
    DuplicateChar(char),
    #[error("unexpected empty string")]
    EmptyString,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const unsafe fn from_index_unchecked(val: usize) -> Self {
        match val {
            0 => File::A,
            1 => File::B,
            2 => File::C,
            3 => File::D,
            4 => File::E,
            5 => File::F,
            6 => File::G,
            7 => File::H,
            _ => hint::unreachable_unchecked(),
        }
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "file index must be between 0 and 7");
        unsafe { Self::from_index_unchecked(val) }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File::from_index((u32::from(c) - u32::from('a')) as usize)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Board rank
///
/// Ranks are indexed top-down, so the index of a rank is the board row: [`Rank::R8`] is row 0
/// and [`Rank::R1`] is row 7.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Rank {
    R8 = 0,
    R7 = 1,
    R6 = 2,
    R5 = 3,
    R4 = 4,
    R3 = 5,
    R2 = 6,
    R1 = 7,
}

impl Rank {
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const unsafe fn from_index_unchecked(val: usize) -> Self {
        match val {
            0 => Rank::R8,
            1 => Rank::R7,
            2 => Rank::R6,
            3 => Rank::R5,
            4 => Rank::R4,
            5 => Rank::R3,
            6 => Rank::R2,
            7 => Rank::R1,
            _ => hint::unreachable_unchecked(),
        }
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "rank index must be between 0 and 7");
        unsafe { Self::from_index_unchecked(val) }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..8).map(|x| unsafe { Self::from_index_unchecked(x) })
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(Rank::from_index((u32::from('8') - u32::from(c)) as usize)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'8' - *self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Square on the board, addressed as `(row, col)` with row 0 being the 8th rank
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    pub const fn from_index(val: usize) -> Square {
        assert!(val < 64, "square must be between 0 and 63");
        Square(val as u8)
    }

    pub const fn from_parts(file: File, rank: Rank) -> Square {
        Square(((rank as u8) << 3) | file as u8)
    }

    /// Returns the square at `(row, col)`, or `None` if it lies outside of the board
    pub const fn from_row_col(row: usize, col: usize) -> Option<Square> {
        if row >= 8 || col >= 8 {
            return None;
        }
        Some(Square((row << 3 | col) as u8))
    }

    pub const fn file(&self) -> File {
        unsafe { File::from_index_unchecked((self.0 & 7) as usize) }
    }

    pub const fn rank(&self) -> Rank {
        unsafe { Rank::from_index_unchecked((self.0 >> 3) as usize) }
    }

    pub const fn row(&self) -> usize {
        (self.0 >> 3) as usize
    }

    pub const fn col(&self) -> usize {
        (self.0 & 7) as usize
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns `true` if the square is a light one (`a8` and `h1` are light)
    pub const fn is_light(&self) -> bool {
        (self.row() + self.col()) % 2 == 0
    }

    pub fn shift(self, delta_row: isize, delta_col: isize) -> Option<Square> {
        let row = self.row().wrapping_add(delta_row as usize);
        let col = self.col().wrapping_add(delta_col as usize);
        Square::from_row_col(row, col)
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Square)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.0 < 64 {
            return write!(f, "Square({})", self);
        }
        write!(f, "Square(?{:?})", self.0)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file().as_char(), self.rank().as_char())
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file_ch, rank_ch) = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => (f, r),
            _ => return Err(SquareParseError::BadLength),
        };
        Ok(Square::from_parts(
            File::from_char(file_ch).ok_or(SquareParseError::UnexpectedFileChar(file_ch))?,
            Rank::from_char(rank_ch).ok_or(SquareParseError::UnexpectedRankChar(rank_ch))?,
        ))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Color {
    #[display(fmt = "white")]
    White = 0,
    #[display(fmt = "black")]
    Black = 1,
}

impl Color {
    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Color::from_char(ch).ok_or(ColorParseError::UnexpectedChar(ch)),
            _ => Err(ColorParseError::BadLength),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const COUNT: usize = 6;

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        [
            PieceKind::Pawn,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Rook,
            PieceKind::Queen,
            PieceKind::King,
        ]
        .into_iter()
    }

    pub const fn is_minor(&self) -> bool {
        matches!(*self, PieceKind::Knight | PieceKind::Bishop)
    }

    pub fn as_char(&self) -> char {
        b"pnbrqk"[*self as usize] as char
    }

    pub fn from_char(c: char) -> Option<PieceKind> {
        match c {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// Chess piece standing on the board
///
/// Besides its kind and color, the piece remembers whether it has already moved. This flag
/// matters only for pawns (double push) and for kings and rooks (castling).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub moved: bool,
}

impl Piece {
    /// Number of distinct (color, kind) pairs
    pub const COUNT: usize = 12;

    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece {
            kind,
            color,
            moved: false,
        }
    }

    pub const fn moved(self) -> Piece {
        Piece {
            moved: true,
            ..self
        }
    }

    /// Index of the (color, kind) pair, ignoring the moved flag
    pub const fn index(&self) -> usize {
        self.color.index() * PieceKind::COUNT + self.kind.index()
    }

    /// Returns `true` if both pieces have the same kind and color
    pub const fn same_as(&self, other: &Piece) -> bool {
        self.index() == other.index()
    }

    /// Row delta of a forward pawn step for this piece's color
    pub const fn direction(&self) -> isize {
        match self.color {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn as_char(&self) -> char {
        let c = self.kind.as_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = PieceKind::from_char(c.to_ascii_lowercase())?;
        Some(Piece::new(color, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Piece::from_char(ch).ok_or(PieceParseError::UnexpectedChar(ch)),
            _ => Err(PieceParseError::BadLength),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum CastlingSide {
    Queen = 0,
    King = 1,
}

#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    const fn to_index(c: Color, s: CastlingSide) -> u8 {
        ((c as u8) << 1) | s as u8
    }

    pub const EMPTY: CastlingRights = CastlingRights(0);
    pub const FULL: CastlingRights = CastlingRights(15);

    pub const fn has(&self, c: Color, s: CastlingSide) -> bool {
        ((self.0 >> Self::to_index(c, s)) & 1) != 0
    }

    pub const fn has_color(&self, c: Color) -> bool {
        self.has(c, CastlingSide::King) || self.has(c, CastlingSide::Queen)
    }

    pub const fn with(self, c: Color, s: CastlingSide) -> CastlingRights {
        CastlingRights(self.0 | (1_u8 << Self::to_index(c, s)))
    }

    pub fn set(&mut self, c: Color, s: CastlingSide) {
        *self = self.with(c, s)
    }

    pub fn unset(&mut self, c: Color, s: CastlingSide) {
        self.0 &= !(1_u8 << Self::to_index(c, s))
    }

    pub fn unset_color(&mut self, c: Color) {
        self.unset(c, CastlingSide::King);
        self.unset(c, CastlingSide::Queen);
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "CastlingRights({})", self)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if *self == Self::EMPTY {
            return write!(f, "-");
        }
        for (color, side, ch) in [
            (Color::White, CastlingSide::King, 'K'),
            (Color::White, CastlingSide::Queen, 'Q'),
            (Color::Black, CastlingSide::King, 'k'),
            (Color::Black, CastlingSide::Queen, 'q'),
        ] {
            if self.has(color, side) {
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

impl FromStr for CastlingRights {
    type Err = CastlingRightsParseError;

    fn from_str(s: &str) -> Result<CastlingRights, Self::Err> {
        type Error = CastlingRightsParseError;
        if s == "-" {
            return Ok(CastlingRights::EMPTY);
        }
        if s.is_empty() {
            return Err(Error::EmptyString);
        }
        let mut res = CastlingRights::EMPTY;
        for ch in s.chars() {
            let (color, side) = match ch {
                'K' => (Color::White, CastlingSide::King),
                'Q' => (Color::White, CastlingSide::Queen),
                'k' => (Color::Black, CastlingSide::King),
                'q' => (Color::Black, CastlingSide::Queen),
                _ => return Err(Error::UnexpectedChar(ch)),
            };
            if res.has(color, side) {
                return Err(Error::DuplicateChar(ch));
            }
            res.set(color, side);
        }
        Ok(res)
    }
}

/// Reason for a drawn game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DrawKind {
    #[display(fmt = "stalemate")]
    Stalemate,
    #[display(fmt = "threefold repetition")]
    ThreefoldRepetition,
    #[display(fmt = "fifty-move rule")]
    FiftyMoveRule,
    #[display(fmt = "seventy-five-move rule")]
    SeventyFiveMoveRule,
    #[display(fmt = "insufficient material")]
    InsufficientMaterial,
    #[display(fmt = "mutual agreement")]
    MutualAgreement,
    /// Threefold repetition reached through an uninterrupted series of checks
    #[display(fmt = "perpetual check")]
    PerpetualCheck,
    #[display(fmt = "dead position")]
    DeadPosition,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Outcome {
    Checkmate { winner: Color },
    Draw(DrawKind),
}

impl Outcome {
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Self::Checkmate { winner } => Some(winner),
            Self::Draw(_) => None,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Self::Checkmate { winner } => write!(f, "{} wins by checkmate", winner),
            Self::Draw(kind) => write!(f, "draw by {}", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file() {
        for (idx, file) in File::iter().enumerate() {
            assert_eq!(file.index(), idx);
            assert_eq!(File::from_index(idx), file);
            assert_eq!(File::from_char(file.as_char()), Some(file));
        }
    }

    #[test]
    fn test_rank() {
        for (idx, rank) in Rank::iter().enumerate() {
            assert_eq!(rank.index(), idx);
            assert_eq!(Rank::from_index(idx), rank);
            assert_eq!(Rank::from_char(rank.as_char()), Some(rank));
        }
    }

    #[test]
    fn test_square() {
        let mut squares = Vec::new();
        for rank in Rank::iter() {
            for file in File::iter() {
                let sq = Square::from_parts(file, rank);
                assert_eq!(sq.file(), file);
                assert_eq!(sq.rank(), rank);
                assert_eq!(sq.row(), rank.index());
                assert_eq!(sq.col(), file.index());
                squares.push(sq);
            }
        }
        assert_eq!(squares, Square::iter().collect::<Vec<_>>());
        assert_eq!(Square::from_row_col(8, 0), None);
        assert_eq!(Square::from_row_col(0, 8), None);
        assert_eq!(
            Square::from_row_col(6, 4),
            Some(Square::from_parts(File::E, Rank::R2))
        );
    }

    #[test]
    fn test_square_shift() {
        let e4 = Square::from_parts(File::E, Rank::R4);
        assert_eq!(e4.shift(-1, 0), Some(Square::from_parts(File::E, Rank::R5)));
        assert_eq!(e4.shift(2, 1), Some(Square::from_parts(File::F, Rank::R2)));
        let a1 = Square::from_parts(File::A, Rank::R1);
        assert_eq!(a1.shift(1, 0), None);
        assert_eq!(a1.shift(0, -1), None);
    }

    #[test]
    fn test_square_color() {
        assert!(Square::from_parts(File::A, Rank::R8).is_light());
        assert!(Square::from_parts(File::H, Rank::R1).is_light());
        assert!(!Square::from_parts(File::A, Rank::R1).is_light());
        assert!(!Square::from_parts(File::C, Rank::R1).is_light());
        assert!(Square::from_parts(File::F, Rank::R1).is_light());
    }

    #[test]
    fn test_piece() {
        let mut seen = Vec::new();
        for color in [Color::White, Color::Black] {
            for kind in PieceKind::iter() {
                let piece = Piece::new(color, kind);
                assert!(!piece.moved);
                assert_eq!(Piece::from_char(piece.as_char()), Some(piece));
                assert!(piece.moved().same_as(&piece));
                seen.push(piece.index());
            }
        }
        assert_eq!(seen, (0..Piece::COUNT).collect::<Vec<_>>());
        assert_eq!(Piece::from_char('x'), None);
        assert_eq!(Piece::from_str("Nn"), Err(PieceParseError::BadLength));
    }

    #[test]
    fn test_castling() {
        let empty = CastlingRights::EMPTY;
        assert!(!empty.has_color(Color::White));
        assert!(!empty.has_color(Color::Black));
        assert_eq!(empty.to_string(), "-");
        assert_eq!(CastlingRights::from_str("-"), Ok(empty));

        let full = CastlingRights::FULL;
        assert!(full.has(Color::White, CastlingSide::Queen));
        assert!(full.has(Color::Black, CastlingSide::King));
        assert_eq!(full.to_string(), "KQkq");
        assert_eq!(CastlingRights::from_str("KQkq"), Ok(full));

        let mut rights = CastlingRights::EMPTY;
        rights.set(Color::White, CastlingSide::King);
        rights.set(Color::Black, CastlingSide::Queen);
        assert_eq!(rights.to_string(), "Kq");
        rights.unset_color(Color::White);
        assert_eq!(rights.to_string(), "q");
        assert_eq!(CastlingRights::from_str("q"), Ok(rights));

        assert_eq!(
            CastlingRights::from_str("KK"),
            Err(CastlingRightsParseError::DuplicateChar('K'))
        );
        assert_eq!(
            CastlingRights::from_str("KX"),
            Err(CastlingRightsParseError::UnexpectedChar('X'))
        );
    }

    #[test]
    fn test_square_str() {
        assert_eq!(Square::from_parts(File::B, Rank::R4).to_string(), "b4");
        assert_eq!(
            Square::from_str("a1"),
            Ok(Square::from_parts(File::A, Rank::R1))
        );
        assert_eq!(
            Square::from_str("h9"),
            Err(SquareParseError::UnexpectedRankChar('9'))
        );
        assert_eq!(
            Square::from_str("i4"),
            Err(SquareParseError::UnexpectedFileChar('i'))
        );
        assert_eq!(Square::from_str("e"), Err(SquareParseError::BadLength));
    }

    #[test]
    fn test_display() {
        assert_eq!(DrawKind::FiftyMoveRule.to_string(), "fifty-move rule");
        assert_eq!(PieceKind::Knight.to_string(), "Knight");
        assert_eq!(
            Outcome::Checkmate {
                winner: Color::Black
            }
            .to_string(),
            "black wins by checkmate"
        );
        assert_eq!(
            Outcome::Draw(DrawKind::Stalemate).to_string(),
            "draw by stalemate"
        );
    }
}
