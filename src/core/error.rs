//! Errors encountered while rewriting a unit
use crate::core::context::Context;
use crate::syntax::ast::Expr;
use crate::syntax::loc::{HasLoc, Loc};
use codespan_reporting::diagnostic::Diagnostic;
use itertools::Itertools;
use std::fmt;
use thiserror::Error;

/// Tool name under which failures are reported to the host
pub const TOOL: &str = "mapsugar";

/// An enclosing node passed through on the way down to a failure
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: String,
    pub loc: Loc,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}", self.kind, self.loc)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RewriteError {
    /// No rule covers the node in this context. This is a gap in the
    /// rule set rather than a mistake in the program.
    #[error("no rewrite rule for {} node at line {} in {context} context", .node.kind(), .node.loc())]
    UnsupportedConstruct {
        node: Box<Expr>,
        context: Context,
        /// Enclosing nodes, innermost (the node itself) first
        trail: Vec<Frame>,
    },
    /// A construct that is invalid as written
    #[error("{message}")]
    Malformed { line: u32, message: String },
}

impl RewriteError {
    pub fn unsupported(node: Expr, context: Context) -> Self {
        RewriteError::UnsupportedConstruct {
            node: Box::new(node),
            context,
            trail: vec![],
        }
    }

    pub fn malformed<S: Into<String>>(loc: Loc, message: S) -> Self {
        RewriteError::Malformed {
            line: loc.line_no(),
            message: message.into(),
        }
    }

    /// Record an enclosing node as the error propagates outwards
    pub fn within(mut self, kind: &str, loc: Loc) -> Self {
        if let RewriteError::UnsupportedConstruct { trail, .. } = &mut self {
            trail.push(Frame {
                kind: kind.to_string(),
                loc,
            });
        }
        self
    }

    /// Enclosing nodes of an unsupported construct, innermost first
    pub fn trail(&self) -> &[Frame] {
        match self {
            RewriteError::UnsupportedConstruct { trail, .. } => trail,
            RewriteError::Malformed { .. } => &[],
        }
    }
}

/// One error in the host's `(line, tool, detail)` shape
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub line: u32,
    pub tool: &'static str,
    pub detail: String,
}

/// A failed transformation in the host's `(file, [error])` shape
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub file: String,
    pub errors: Vec<ErrorInfo>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.errors
                .iter()
                .map(|e| format!("{}:{}: {}", self.file, e.line, e.detail))
                .join("\n")
        )
    }
}

impl std::error::Error for Failure {}

/// Outcome of a failed rewrite of a unit
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("{file}: {source}")]
    MissingRule { file: String, source: RewriteError },
    #[error(transparent)]
    Failed(#[from] Failure),
}

impl TransformError {
    /// The file the failure is reported against
    pub fn file(&self) -> &str {
        match self {
            TransformError::MissingRule { file, .. } => file,
            TransformError::Failed(failure) => &failure.file,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        match self {
            TransformError::MissingRule { file, source } => {
                let mut notes = vec![format!("in {}", file)];
                if !source.trail().is_empty() {
                    notes.push(format!(
                        "while rewriting:\n{}",
                        source
                            .trail()
                            .iter()
                            .rev()
                            .map(|frame| format!("- {}", frame))
                            .join("\n")
                    ));
                }
                notes.push(
                    "the rewrite has no rule for this construct; this is a limitation, not an error in the program"
                        .to_string(),
                );
                Diagnostic::bug()
                    .with_message(format!("{}", source))
                    .with_notes(notes)
            }
            TransformError::Failed(failure) => Diagnostic::error()
                .with_message(format!("{}", failure))
                .with_notes(
                    failure
                        .errors
                        .iter()
                        .map(|e| format!("reported by {} at {}:{}", e.tool, failure.file, e.line))
                        .collect(),
                ),
        }
    }
}
