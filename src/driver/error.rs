//! Overall high-level error type for mapsugar
use crate::core::error::TransformError;
use crate::syntax::error::ReadError;
use codespan_reporting::diagnostic::Diagnostic;
use std::fmt::Display;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapsugarError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("could not write output: {0}")]
    Write(#[from] serde_json::Error),
    #[error("unknown export format {0}")]
    UnknownFormat(String),
    #[error("path {0} could not be read")]
    FileCouldNotBeRead(String),
}

fn default_diagnostic<E>(e: &E) -> Diagnostic<usize>
where
    E: Display,
{
    Diagnostic::error().with_message(format!("{}", e))
}

impl MapsugarError {
    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        match self {
            MapsugarError::Read(e) => e.to_diagnostic(),
            MapsugarError::Transform(e) => e.to_diagnostic(),
            e => default_diagnostic(e),
        }
    }

    /// Process exit code to report the error with
    pub fn exit_code(&self) -> i32 {
        match self {
            MapsugarError::Transform(TransformError::MissingRule { .. }) => 2,
            _ => 1,
        }
    }
}
