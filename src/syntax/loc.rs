//! Provides `Loc` source locations and the `HasLoc` trait for
//! extracting them from syntax elements.
use std::fmt;

/// Source location annotation carried by every node, as handed over
/// by the host compiler: a line and an optional column.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Loc {
    line: u32,
    column: Option<u32>,
}

impl Loc {
    /// A line-only location
    pub fn line(line: u32) -> Self {
        Loc { line, column: None }
    }

    /// A line and column location
    pub fn at(line: u32, column: u32) -> Self {
        Loc {
            line,
            column: Some(column),
        }
    }

    pub fn line_no(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> Option<u32> {
        self.column
    }
}

impl From<u32> for Loc {
    fn from(line: u32) -> Self {
        Loc::line(line)
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(c) => write!(f, "{}:{}", self.line, c),
            None => write!(f, "{}", self.line),
        }
    }
}

pub trait HasLoc {
    fn loc(&self) -> Loc;
}

impl<T: HasLoc> HasLoc for Vec<T> {
    /// The location of the first element (if any)
    fn loc(&self) -> Loc {
        self.first().map(HasLoc::loc).unwrap_or_default()
    }
}

impl<T: HasLoc> HasLoc for Box<T> {
    fn loc(&self) -> Loc {
        self.as_ref().loc()
    }
}
