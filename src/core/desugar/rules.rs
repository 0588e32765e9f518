//! The desugaring rules, only applicable in body context
use super::{rewritable::Rewritable, synth};
use crate::core::{context::Context, error::RewriteError};
use crate::syntax::{ast::Expr, loc::Loc};
use tracing::trace;

/// Result of offering a node to the rules
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// A rule fired, the node is fully rewritten
    Rewritten(Expr),
    /// No rule applies, the node is handed back untouched
    Declined(Expr),
}

/// Offer a body context node to the rules.
///
/// Aggregate literals (with or without base) and dotted field access
/// are desugared. A field access whose base is the empty atom `''` is
/// the host's root-qualified name `.name`, not a field access, and is
/// declined.
pub fn desugar(expr: Expr) -> Result<Outcome, RewriteError> {
    match expr {
        Expr::Map(loc, None, entries) => {
            trace!(line = loc.line_no(), entries = entries.len(), "literal");
            let entries = entries.rewrite(Context::Body)?;
            Ok(Outcome::Rewritten(synth::build_store(
                synth::build_new(loc),
                entries,
            )))
        }
        Expr::Map(loc, Some(base), entries) => {
            trace!(line = loc.line_no(), entries = entries.len(), "merge");
            let base = base.rewrite(Context::Body)?;
            let entries = entries.rewrite(Context::Body)?;
            Ok(Outcome::Rewritten(synth::build_store(*base, entries)))
        }
        Expr::Field(loc, None, name) => Err(missing_base(loc, &name)),
        Expr::Field(loc, Some(base), name) if !base.is_empty_atom() => {
            trace!(line = loc.line_no(), field = %name, "fetch");
            let base = base.rewrite(Context::Body)?;
            Ok(Outcome::Rewritten(synth::build_fetch(loc, name, *base)))
        }
        other => Ok(Outcome::Declined(other)),
    }
}

/// A field access with nothing to read from, rejected in any context
pub fn missing_base(loc: Loc, name: &str) -> RewriteError {
    RewriteError::malformed(
        loc,
        format!("field access '.{}' has no expression to read it from", name),
    )
}
