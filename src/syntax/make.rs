//! Helpers for constructing synthetic AST nodes
//!
//! Locations are given as bare line numbers.
use crate::syntax::ast::*;
use crate::syntax::loc::Loc;

/// Construct an atom
pub fn atom<T: AsRef<str>>(line: u32, name: T) -> Expr {
    Expr::Lit(Loc::line(line), Literal::Atom(name.as_ref().to_string()))
}

/// Construct an integer
pub fn int(line: u32, n: i64) -> Expr {
    Expr::Lit(Loc::line(line), Literal::Integer(n))
}

/// Construct a string
pub fn string<T: AsRef<str>>(line: u32, s: T) -> Expr {
    Expr::Lit(Loc::line(line), Literal::Str(s.as_ref().to_string()))
}

/// Construct the empty list
pub fn nil(line: u32) -> Expr {
    Expr::Lit(Loc::line(line), Literal::Nil)
}

/// Construct a variable reference
pub fn var<T: AsRef<str>>(line: u32, name: T) -> Expr {
    Expr::Var(Loc::line(line), name.as_ref().to_string())
}

pub fn tuple(line: u32, elements: Vec<Expr>) -> Expr {
    Expr::Tuple(Loc::line(line), elements)
}

/// Construct a proper list as a chain of cons cells ending in nil
pub fn list(line: u32, elements: Vec<Expr>) -> Expr {
    elements.into_iter().rev().fold(nil(line), |tail, head| {
        Expr::Cons(Loc::line(line), Box::new(head), Box::new(tail))
    })
}

/// Construct a binary operator application
pub fn op<T: AsRef<str>>(line: u32, op: T, left: Expr, right: Expr) -> Expr {
    Expr::BinOp(
        Loc::line(line),
        op.as_ref().to_string(),
        Box::new(left),
        Box::new(right),
    )
}

/// Construct a call of a local function
pub fn call<T: AsRef<str>>(line: u32, function: T, args: Vec<Expr>) -> Expr {
    Expr::Call(Loc::line(line), Box::new(atom(line, function)), args)
}

/// Construct a call `module:function(args)` with every node at `loc`
pub fn remote_call_at(loc: Loc, module: &str, function: &str, args: Vec<Expr>) -> Expr {
    let name = |n: &str| Box::new(Expr::Lit(loc, Literal::Atom(n.to_string())));
    Expr::Call(
        loc,
        Box::new(Expr::Remote(loc, name(module), name(function))),
        args,
    )
}

/// Construct a call `module:function(args)`
pub fn remote_call(line: u32, module: &str, function: &str, args: Vec<Expr>) -> Expr {
    remote_call_at(Loc::line(line), module, function, args)
}

/// Construct an aggregate literal entry
pub fn entry<T: AsRef<str>>(line: u32, key: T, value: Expr) -> FieldEntry {
    FieldEntry {
        loc: Loc::line(line),
        key: key.as_ref().to_string(),
        value,
    }
}

/// Construct an aggregate literal `#{...}`
pub fn map(line: u32, entries: Vec<FieldEntry>) -> Expr {
    Expr::Map(Loc::line(line), None, entries)
}

/// Construct an aggregate update `Base#{...}`
pub fn update(line: u32, base: Expr, entries: Vec<FieldEntry>) -> Expr {
    Expr::Map(Loc::line(line), Some(Box::new(base)), entries)
}

/// Construct a dotted field access `Base.field`
pub fn field<T: AsRef<str>>(line: u32, base: Expr, name: T) -> Expr {
    Expr::Field(
        Loc::line(line),
        Some(Box::new(base)),
        name.as_ref().to_string(),
    )
}

/// Construct a match `Pattern = Expr`
pub fn bind(line: u32, pattern: Expr, expr: Expr) -> Expr {
    Expr::Match(Loc::line(line), Box::new(pattern), Box::new(expr))
}

/// Construct a clause
pub fn clause(line: u32, patterns: Vec<Expr>, guards: Vec<Vec<Expr>>, body: Vec<Expr>) -> Clause {
    Clause {
        loc: Loc::line(line),
        patterns,
        guards,
        body,
    }
}

/// Construct a function form, arity taken from the first clause
pub fn function<T: AsRef<str>>(line: u32, name: T, clauses: Vec<Clause>) -> Form {
    let arity = clauses.first().map(|c| c.patterns.len()).unwrap_or(0);
    Form::Function(Loc::line(line), name.as_ref().to_string(), arity, clauses)
}

/// Construct a file marker form
pub fn file_marker<T: AsRef<str>>(line: u32, name: T) -> Form {
    Form::File(Loc::line(line), name.as_ref().to_string(), line)
}
