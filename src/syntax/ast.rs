//! Abstract syntax of the compilation units handed over by the host
//! compiler.
//!
//! A unit is a sequence of top-level `Form`s. Function forms carry
//! clauses made up of patterns, guards and bodies, all of which are
//! `Expr` trees. Every node carries the `Loc` it was read with and
//! rewriting preserves it on every node it copies.
use crate::syntax::loc::{HasLoc, Loc};
use serde_json::Value;

/// Literal (atomic) values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Atom(String),
    Integer(i64),
    Float(f64),
    Char(char),
    Str(String),
    /// The empty list
    Nil,
}

/// A top-level form of a compilation unit
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    /// File marker (file name, line) - subsequent forms originate
    /// from this file
    File(Loc, String, u32),
    /// Function definition (name, arity, clauses)
    Function(Loc, String, usize, Vec<Clause>),
    /// Any other attribute, value kept as read
    Attribute(Loc, String, Value),
    /// End of file marker
    Eof(Loc),
    /// A top-level form that is not interpreted
    Other(Value),
}

impl HasLoc for Form {
    fn loc(&self) -> Loc {
        match self {
            Form::File(l, _, _) | Form::Function(l, _, _, _) | Form::Attribute(l, _, _) => *l,
            Form::Eof(l) => *l,
            Form::Other(_) => Loc::default(),
        }
    }
}

/// A clause: patterns, guard sequence and body.
///
/// The guard sequence is a disjunction of guards, each of which is a
/// conjunction of guard tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub loc: Loc,
    pub patterns: Vec<Expr>,
    pub guards: Vec<Vec<Expr>>,
    pub body: Vec<Expr>,
}

impl HasLoc for Clause {
    fn loc(&self) -> Loc {
        self.loc
    }
}

/// An entry `key = value` of an aggregate literal
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub loc: Loc,
    pub key: String,
    pub value: Expr,
}

/// A field `name = value` of a host record (name may be `_`)
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub loc: Loc,
    pub name: String,
    pub value: Expr,
}

/// A segment `Value:Size/Types` of a binary
#[derive(Debug, Clone, PartialEq)]
pub struct BinSegment {
    pub loc: Loc,
    pub value: Expr,
    pub size: Option<Expr>,
    /// Type specifiers, `None` for the default
    pub types: Option<Vec<String>>,
}

/// Comprehension qualifiers
#[derive(Debug, Clone, PartialEq)]
pub enum Qualifier {
    /// `Pattern <- List`
    Generate(Loc, Expr, Expr),
    /// `Pattern <= Binary`
    BinGenerate(Loc, Expr, Expr),
    Filter(Expr),
}

/// The `after Timeout -> Body` section of a receive
#[derive(Debug, Clone, PartialEq)]
pub struct After {
    pub timeout: Box<Expr>,
    pub body: Vec<Expr>,
}

/// Expressions, patterns and guard tests
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Atomic literal
    Lit(Loc, Literal),
    /// Variable reference
    Var(Loc, String),
    Tuple(Loc, Vec<Expr>),
    /// List cell (head, tail)
    Cons(Loc, Box<Expr>, Box<Expr>),
    Bin(Loc, Vec<BinSegment>),
    /// Binary operator (op, left, right)
    BinOp(Loc, String, Box<Expr>, Box<Expr>),
    /// Unary operator (op, operand)
    UnOp(Loc, String, Box<Expr>),
    /// Function call (function, args)
    Call(Loc, Box<Expr>, Vec<Expr>),
    /// Qualified name `module:function`
    Remote(Loc, Box<Expr>, Box<Expr>),
    /// List comprehension (template, qualifiers)
    ListComp(Loc, Box<Expr>, Vec<Qualifier>),
    /// Binary comprehension (template, qualifiers)
    BinComp(Loc, Box<Expr>, Vec<Qualifier>),
    /// `begin ... end`
    Block(Loc, Vec<Expr>),
    If(Loc, Vec<Clause>),
    /// Case (subject, clauses)
    Case(Loc, Box<Expr>, Vec<Clause>),
    /// Try (body, of-clauses, handler clauses, after body)
    Try(Loc, Vec<Expr>, Vec<Clause>, Vec<Clause>, Vec<Expr>),
    Catch(Loc, Box<Expr>),
    Receive(Loc, Vec<Clause>, Option<After>),
    /// Anonymous function
    Fun(Loc, Vec<Clause>),
    /// Anonymous function with a name for recursion
    NamedFun(Loc, String, Vec<Clause>),
    /// `fun name/arity`
    FunRef(Loc, String, usize),
    /// `fun Module:Name/Arity`
    RemoteFunRef(Loc, Box<Expr>, Box<Expr>, Box<Expr>),
    /// Host record aggregate (base, record name, fields)
    Record(Loc, Option<Box<Expr>>, String, Vec<RecordField>),
    /// Host record field access `Expr#name.field`
    RecordField(Loc, Box<Expr>, String, String),
    /// Host record field index `#name.field`
    RecordIndex(Loc, String, String),
    /// Aggregate literal `#{k = V, ...}` with optional base for the
    /// update form `Base#{k = V, ...}`
    Map(Loc, Option<Box<Expr>>, Vec<FieldEntry>),
    /// Dotted field access `Expr.field`
    Field(Loc, Option<Box<Expr>>, String),
    /// Exception pattern `Class:Pattern[:Stacktrace]` of handler
    /// clauses
    Exception(Loc, Box<Expr>, Box<Expr>, Option<Box<Expr>>),
    /// Match / bind (pattern, expression)
    Match(Loc, Box<Expr>, Box<Expr>),
    /// Node with a tag outside the grammar (tag, node as read)
    Foreign(Loc, String, Value),
}

impl HasLoc for Expr {
    fn loc(&self) -> Loc {
        use self::Expr::*;

        match *self {
            Lit(l, _) => l,
            Var(l, _) => l,
            Tuple(l, _) => l,
            Cons(l, _, _) => l,
            Bin(l, _) => l,
            BinOp(l, _, _, _) => l,
            UnOp(l, _, _) => l,
            Call(l, _, _) => l,
            Remote(l, _, _) => l,
            ListComp(l, _, _) => l,
            BinComp(l, _, _) => l,
            Block(l, _) => l,
            If(l, _) => l,
            Case(l, _, _) => l,
            Try(l, _, _, _, _) => l,
            Catch(l, _) => l,
            Receive(l, _, _) => l,
            Fun(l, _) => l,
            NamedFun(l, _, _) => l,
            FunRef(l, _, _) => l,
            RemoteFunRef(l, _, _, _) => l,
            Record(l, _, _, _) => l,
            RecordField(l, _, _, _) => l,
            RecordIndex(l, _, _) => l,
            Map(l, _, _) => l,
            Field(l, _, _) => l,
            Exception(l, _, _, _) => l,
            Match(l, _, _) => l,
            Foreign(l, _, _) => l,
        }
    }
}

impl Expr {
    /// Short name of the node kind, matching the interchange tag
    pub fn kind(&self) -> &str {
        match self {
            Expr::Foreign(_, tag, _) => tag,
            _ => self.grammar_kind(),
        }
    }

    /// Kind name within the known grammar, `"foreign"` for nodes
    /// outside it
    pub fn grammar_kind(&self) -> &'static str {
        use self::Expr::*;

        match self {
            Lit(_, Literal::Atom(_)) => "atom",
            Lit(_, Literal::Integer(_)) => "integer",
            Lit(_, Literal::Float(_)) => "float",
            Lit(_, Literal::Char(_)) => "char",
            Lit(_, Literal::Str(_)) => "string",
            Lit(_, Literal::Nil) => "nil",
            Var(_, _) => "var",
            Tuple(_, _) => "tuple",
            Cons(_, _, _) => "cons",
            Bin(_, _) => "bin",
            BinOp(_, _, _, _) | UnOp(_, _, _) => "op",
            Call(_, _, _) => "call",
            Remote(_, _, _) => "remote",
            ListComp(_, _, _) => "lc",
            BinComp(_, _, _) => "bc",
            Block(_, _) => "block",
            If(_, _) => "if",
            Case(_, _, _) => "case",
            Try(_, _, _, _, _) => "try",
            Catch(_, _) => "catch",
            Receive(_, _, _) => "receive",
            Fun(_, _) => "fun",
            NamedFun(_, _, _) => "named_fun",
            FunRef(_, _, _) => "fun_ref",
            RemoteFunRef(_, _, _, _) => "remote_fun_ref",
            Record(_, _, _, _) => "record",
            RecordField(_, _, _, _) => "record_field",
            RecordIndex(_, _, _) => "record_index",
            Map(_, _, _) => "map",
            Field(_, _, _) => "field",
            Exception(_, _, _, _) => "exception",
            Match(_, _, _) => "match",
            Foreign(_, _, _) => "foreign",
        }
    }

    /// True iff this is the zero-length-name atom `''`, which the host
    /// grammar produces as the base of a root-qualified name `.name`
    pub fn is_empty_atom(&self) -> bool {
        matches!(self, Expr::Lit(_, Literal::Atom(name)) if name.is_empty())
    }

    /// The atom name if this is an atom literal
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Expr::Lit(_, Literal::Atom(name)) => Some(name),
            _ => None,
        }
    }
}
