//! Utilities to work with moves in UCI format

use super::base::{self, PromotePiece, ValidateError};
use crate::board::Board;
use crate::movegen;
use crate::types::{Square, SquareParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error creating a parsed UCI representation from string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(SquareParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(SquareParseError),
    /// Bad promote character
    #[error("bad promote char {0:?}")]
    BadPromote(char),
}

/// Error parsing UCI into a legal [`moves::Move`](super::Move)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    /// Error parsing move
    #[error("cannot parse move: {0}")]
    Parse(#[from] RawParseError),
    /// Move is not legal in the given position
    #[error("invalid move: {0}")]
    Validate(#[from] ValidateError),
}

/// Parsed move in UCI format
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    /// Source square
    pub src: Square,
    /// Destination square
    pub dst: Square,
    /// Piece to promote, if any
    pub promote: Option<PromotePiece>,
}

impl Move {
    /// Converts the UCI move into a legal [`moves::Move`](super::Move) in position `b`
    ///
    /// The move is looked up among the legal moves by its source and destination squares. A
    /// promotion without an explicit piece promotes to a queen. A promote piece given for a
    /// non-promoting move makes the move invalid.
    pub fn into_move(self, b: &Board) -> Result<base::Move, ValidateError> {
        let legal = movegen::legal_from(b, self.src);
        let mv = legal
            .iter()
            .find(|m| m.dst() == self.dst)
            .copied()
            .ok_or(ValidateError::NotLegal)?;
        match self.promote {
            Some(p) => mv.with_promote(p).ok_or(ValidateError::NotLegal),
            None => Ok(mv),
        }
    }
}

impl From<base::Move> for Move {
    #[inline]
    fn from(mv: base::Move) -> Move {
        Move {
            src: mv.src(),
            dst: mv.dst(),
            promote: mv.promote(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(p) = self.promote {
            write!(f, "{}", p.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if !s.is_ascii() || !matches!(s.len(), 4 | 5) {
            return Err(RawParseError::BadLength);
        }
        let src = Square::from_str(&s[0..2]).map_err(RawParseError::BadSrc)?;
        let dst = Square::from_str(&s[2..4]).map_err(RawParseError::BadDst)?;
        let promote = match s.as_bytes().get(4) {
            Some(&b) => Some(
                PromotePiece::from_char(b as char).ok_or(RawParseError::BadPromote(b as char))?,
            ),
            None => None,
        };
        Ok(Move { src, dst, promote })
    }
}
