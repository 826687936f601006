use std::fmt;
use std::str::FromStr;

use tidal_db::{LineCol, LineIndex, TextSize};

/// A cursor given on the command line: a byte offset, or a 1-based
/// `line:column` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Position {
    Offset(u32),
    LineCol { line: u32, col: u32 },
}

impl Position {
    pub(crate) fn to_offset(self, line_index: &LineIndex, len: TextSize) -> Option<TextSize> {
        let offset = match self {
            Position::Offset(offset) => TextSize::new(offset),
            Position::LineCol { line, col } => {
                line_index.offset(LineCol { line: line.checked_sub(1)?, col: col.checked_sub(1)? })?
            }
        };
        (offset <= len).then_some(offset)
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = |part: &str| {
            part.parse::<u32>().map_err(|error| format!("invalid position `{s}`: {error}"))
        };

        match s.split_once(':') {
            Some((line, col)) => Ok(Position::LineCol { line: number(line)?, col: number(col)? }),
            None => number(s).map(Position::Offset),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Offset(offset) => write!(f, "{offset}"),
            Position::LineCol { line, col } => write!(f, "{line}:{col}"),
        }
    }
}
