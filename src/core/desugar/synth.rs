//! Synthesis of container calls
//!
//! Desugared syntax becomes remote calls into the ordered dictionary
//! module of the host runtime:
//!
//! - `#{}` becomes `orddict:new()`
//! - each entry `k = V` becomes `orddict:store(k, V, Container)`
//! - `E.k` becomes `orddict:fetch(k, E)`
use crate::syntax::{
    ast::{Expr, FieldEntry, Literal},
    loc::Loc,
    make::remote_call_at,
};

/// Module providing the container at run time
pub const CONTAINER: &str = "orddict";

fn key(loc: Loc, name: String) -> Expr {
    Expr::Lit(loc, Literal::Atom(name))
}

/// A fresh empty container
pub fn build_new(loc: Loc) -> Expr {
    remote_call_at(loc, CONTAINER, "new", vec![])
}

/// Store each entry over `base`.
///
/// The first entry is stored innermost, so the last entry for any
/// key is the one that is applied last and wins. Each call carries
/// the location of its entry.
pub fn build_store(base: Expr, entries: Vec<FieldEntry>) -> Expr {
    entries
        .into_iter()
        .fold(base, |container, FieldEntry { loc, key: k, value }| {
            remote_call_at(loc, CONTAINER, "store", vec![key(loc, k), value, container])
        })
}

/// Fetch `name` from `container`
pub fn build_fetch(loc: Loc, name: String, container: Expr) -> Expr {
    remote_call_at(loc, CONTAINER, "fetch", vec![key(loc, name), container])
}
