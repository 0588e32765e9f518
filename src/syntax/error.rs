//! Errors reading the interchange representation of a unit
use codespan_reporting::diagnostic::Diagnostic;
use thiserror::Error;

/// An error reading forms, located by a JSON path into the input
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("input was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a list at {0}")]
    ExpectedList(String),
    #[error("expected an object at {0}")]
    ExpectedObject(String),
    #[error("missing field {1} at {0}")]
    MissingField(String, &'static str),
    #[error("expected {1} at {0}")]
    WrongType(String, &'static str),
    #[error("invalid location annotation at {0}")]
    InvalidLocation(String),
    #[error("unknown comprehension qualifier {1} at {0}")]
    UnknownQualifier(String, String),
}

impl ReadError {
    /// JSON path of the offending element, if known
    pub fn path(&self) -> Option<&str> {
        use self::ReadError::*;

        match self {
            Json(_) => None,
            ExpectedList(p) => Some(p),
            ExpectedObject(p) => Some(p),
            MissingField(p, _) => Some(p),
            WrongType(p, _) => Some(p),
            InvalidLocation(p) => Some(p),
            UnknownQualifier(p, _) => Some(p),
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let diag = Diagnostic::error().with_message(format!("{}", self));
        match self {
            ReadError::Json(_) => diag.with_notes(vec![
                "input should be a JSON list of forms as produced by the host compiler".to_string(),
            ]),
            _ => diag,
        }
    }
}
