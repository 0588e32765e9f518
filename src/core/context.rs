//! The syntactic role of the subtree being rewritten
use std::fmt;

/// Context threaded through every rewrite.
///
/// Set at clause boundaries (patterns, guards, body) and at the left
/// side of a match; inherited unchanged everywhere else. Only the
/// desugaring rules consult it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Context {
    /// Before entering any clause
    #[default]
    Undefined,
    /// Value-producing expression
    Body,
    /// Pattern being matched
    Pattern,
    /// Guard test
    Guard,
}

impl Context {
    /// Desugaring to runtime calls is only legal here
    pub fn is_body(self) -> bool {
        self == Context::Body
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Undefined => write!(f, "undefined"),
            Context::Body => write!(f, "body"),
            Context::Pattern => write!(f, "pattern"),
            Context::Guard => write!(f, "guard"),
        }
    }
}
