//! Pretty printing forms in host source syntax, for inspecting the
//! result of a rewrite.
use crate::syntax::ast::*;
use pretty::RcDoc;

/// Express an AST element as source, pretty printing to string.
pub fn express<I>(item: &I) -> String
where
    I: ToSourceDoc,
{
    render(item.source_doc())
}

/// Express a whole unit as source, one form per paragraph.
pub fn express_unit(forms: &[Form]) -> String {
    let docs = forms
        .iter()
        .filter(|f| !matches!(f, Form::Eof(_)))
        .map(|f| f.source_doc().append(RcDoc::hardline()));
    render(RcDoc::intersperse(docs, RcDoc::hardline()))
}

fn render(doc: RcDoc<()>) -> String {
    let mut w = Vec::new();
    // writing to a Vec cannot fail
    let _ = doc.render(80, &mut w);
    String::from_utf8_lossy(&w).into_owned()
}

/// Rendering AST as source text (without regard for preserving the
/// layout implied by locations...)
pub trait ToSourceDoc {
    fn source_doc(&self) -> RcDoc<()>;
}

/// Determine if an atom can be written without quotes
fn is_normal(atom: &str) -> bool {
    let mut chars = atom.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '@')
}

fn atom_text(atom: &str) -> String {
    if is_normal(atom) {
        atom.to_string()
    } else {
        format!("'{}'", atom.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

impl ToSourceDoc for Literal {
    fn source_doc(&self) -> RcDoc<()> {
        match self {
            Literal::Atom(a) => RcDoc::text(atom_text(a)),
            Literal::Integer(i) => RcDoc::text(i.to_string()),
            Literal::Float(f) => RcDoc::text(format!("{:?}", f)),
            Literal::Char(c) => RcDoc::text(format!("${}", c.escape_default())),
            Literal::Str(s) => RcDoc::text(format!("{:?}", s)),
            Literal::Nil => RcDoc::text("[]"),
        }
    }
}

/// Comma separated items that may break across lines
fn commas<'a, I>(docs: I) -> RcDoc<'a>
where
    I: IntoIterator<Item = RcDoc<'a>>,
{
    RcDoc::intersperse(docs, RcDoc::text(",").append(RcDoc::line()))
        .nest(4)
        .group()
}

fn exprs(exprs: &[Expr]) -> RcDoc<()> {
    commas(exprs.iter().map(ToSourceDoc::source_doc))
}

/// Body expressions, one per line
fn body(exprs: &[Expr]) -> RcDoc<()> {
    RcDoc::intersperse(
        exprs.iter().map(ToSourceDoc::source_doc),
        RcDoc::text(",").append(RcDoc::hardline()),
    )
}

fn guard_sequence(guards: &[Vec<Expr>]) -> RcDoc<()> {
    RcDoc::intersperse(guards.iter().map(|g| exprs(g)), RcDoc::text("; "))
}

/// Operands that are themselves operators are parenthesised
fn operand(expr: &Expr) -> RcDoc<()> {
    match expr {
        Expr::BinOp(..) | Expr::UnOp(..) | Expr::Match(..) | Expr::Catch(..) => RcDoc::text("(")
            .append(expr.source_doc())
            .append(RcDoc::text(")")),
        _ => expr.source_doc(),
    }
}

/// How a clause head is written
enum Head<'a> {
    /// `name(Patterns)` of a function form or named fun
    Named(&'a str),
    /// `(Patterns)` of an anonymous fun
    Fun,
    /// `Pattern` of case, receive and try clauses
    Bare,
    /// guard only, for if clauses
    GuardOnly,
}

fn clause<'a>(head: &Head<'a>, c: &'a Clause) -> RcDoc<'a> {
    let args = || {
        RcDoc::text("(")
            .append(exprs(&c.patterns))
            .append(RcDoc::text(")"))
    };
    let mut doc = match head {
        Head::Named(name) => RcDoc::text(atom_text(name)).append(args()),
        Head::Fun => args(),
        Head::Bare => exprs(&c.patterns),
        Head::GuardOnly => guard_sequence(&c.guards),
    };
    if !c.guards.is_empty() && !matches!(head, Head::GuardOnly) {
        doc = doc
            .append(RcDoc::text(" when "))
            .append(guard_sequence(&c.guards));
    }
    doc.append(RcDoc::text(" ->"))
        .append(RcDoc::hardline().append(body(&c.body)).nest(4))
}

fn clauses<'a>(head: Head<'a>, cs: &'a [Clause]) -> RcDoc<'a> {
    RcDoc::intersperse(
        cs.iter().map(|c| clause(&head, c)),
        RcDoc::text(";").append(RcDoc::hardline()),
    )
}

/// `keyword` + indented clauses + `end`
fn clause_block<'a>(opening: RcDoc<'a>, head: Head<'a>, cs: &'a [Clause]) -> RcDoc<'a> {
    opening
        .append(RcDoc::hardline().append(clauses(head, cs)).nest(4))
        .append(RcDoc::hardline())
        .append(RcDoc::text("end"))
}

/// A proper list is written `[a, b]`, an improper one `[a | T]`
fn list(expr: &Expr) -> RcDoc<()> {
    let mut heads = vec![];
    let mut tail = expr;
    while let Expr::Cons(_, h, t) = tail {
        heads.push(h.source_doc());
        tail = t;
    }
    let doc = RcDoc::text("[").append(commas(heads));
    match tail {
        Expr::Lit(_, Literal::Nil) => doc.append(RcDoc::text("]")),
        _ => doc
            .append(RcDoc::text(" | "))
            .append(tail.source_doc())
            .append(RcDoc::text("]")),
    }
}

fn qualifiers(qs: &[Qualifier]) -> RcDoc<()> {
    commas(qs.iter().map(|q| match q {
        Qualifier::Generate(_, p, s) => p
            .source_doc()
            .append(RcDoc::text(" <- "))
            .append(s.source_doc()),
        Qualifier::BinGenerate(_, p, s) => p
            .source_doc()
            .append(RcDoc::text(" <= "))
            .append(s.source_doc()),
        Qualifier::Filter(test) => test.source_doc(),
    }))
}

fn segment(segment: &BinSegment) -> RcDoc<()> {
    let mut doc = operand(&segment.value);
    if let Some(size) = &segment.size {
        doc = doc.append(RcDoc::text(":")).append(operand(size));
    }
    if let Some(types) = &segment.types {
        doc = doc.append(RcDoc::text("/")).append(RcDoc::text(types.join("-")));
    }
    doc
}

fn base(base: &Option<Box<Expr>>) -> RcDoc<()> {
    match base {
        Some(b) => operand(b),
        None => RcDoc::nil(),
    }
}

impl ToSourceDoc for Expr {
    fn source_doc(&self) -> RcDoc<()> {
        match self {
            Expr::Lit(_, lit) => lit.source_doc(),
            Expr::Var(_, name) => RcDoc::text(name.as_str()),
            Expr::Tuple(_, es) => RcDoc::text("{")
                .append(exprs(es))
                .append(RcDoc::text("}")),
            Expr::Cons(..) => list(self),
            Expr::Bin(_, segments) => RcDoc::text("<<")
                .append(commas(segments.iter().map(segment)))
                .append(RcDoc::text(">>")),
            Expr::BinOp(_, op, l, r) => operand(l)
                .append(RcDoc::text(format!(" {} ", op)))
                .append(operand(r)),
            Expr::UnOp(_, op, e) => {
                let sep = if op.chars().all(|c| c.is_ascii_alphabetic()) {
                    " "
                } else {
                    ""
                };
                RcDoc::text(format!("{}{}", op, sep)).append(operand(e))
            }
            Expr::Call(_, f, args) => operand(f)
                .append(RcDoc::text("("))
                .append(exprs(args))
                .append(RcDoc::text(")")),
            Expr::Remote(_, m, f) => m
                .source_doc()
                .append(RcDoc::text(":"))
                .append(f.source_doc()),
            Expr::ListComp(_, t, qs) => RcDoc::text("[")
                .append(t.source_doc())
                .append(RcDoc::text(" || "))
                .append(qualifiers(qs))
                .append(RcDoc::text("]")),
            Expr::BinComp(_, t, qs) => RcDoc::text("<< ")
                .append(t.source_doc())
                .append(RcDoc::text(" || "))
                .append(qualifiers(qs))
                .append(RcDoc::text(" >>")),
            Expr::Block(_, b) => RcDoc::text("begin")
                .append(RcDoc::hardline().append(body(b)).nest(4))
                .append(RcDoc::hardline())
                .append(RcDoc::text("end")),
            Expr::If(_, cs) => clause_block(RcDoc::text("if"), Head::GuardOnly, cs),
            Expr::Case(_, subject, cs) => clause_block(
                RcDoc::text("case ")
                    .append(subject.source_doc())
                    .append(RcDoc::text(" of")),
                Head::Bare,
                cs,
            ),
            Expr::Try(_, b, cs, handlers, after) => {
                let mut doc = RcDoc::text("try")
                    .append(RcDoc::hardline().append(body(b)).nest(4))
                    .append(RcDoc::hardline());
                if !cs.is_empty() {
                    doc = doc
                        .append(RcDoc::text("of"))
                        .append(RcDoc::hardline().append(clauses(Head::Bare, cs)).nest(4))
                        .append(RcDoc::hardline());
                }
                if !handlers.is_empty() {
                    doc = doc
                        .append(RcDoc::text("catch"))
                        .append(
                            RcDoc::hardline()
                                .append(clauses(Head::Bare, handlers))
                                .nest(4),
                        )
                        .append(RcDoc::hardline());
                }
                if !after.is_empty() {
                    doc = doc
                        .append(RcDoc::text("after"))
                        .append(RcDoc::hardline().append(body(after)).nest(4))
                        .append(RcDoc::hardline());
                }
                doc.append(RcDoc::text("end"))
            }
            Expr::Catch(_, e) => RcDoc::text("catch ").append(e.source_doc()),
            Expr::Receive(_, cs, after) => {
                let mut doc = RcDoc::text("receive");
                if !cs.is_empty() {
                    doc = doc.append(RcDoc::hardline().append(clauses(Head::Bare, cs)).nest(4));
                }
                if let Some(After { timeout, body: b }) = after {
                    doc = doc
                        .append(RcDoc::hardline())
                        .append(RcDoc::text("after"))
                        .append(
                            RcDoc::hardline()
                                .append(timeout.source_doc())
                                .append(RcDoc::text(" ->"))
                                .append(RcDoc::hardline().append(body(b)).nest(4))
                                .nest(4),
                        );
                }
                doc.append(RcDoc::hardline()).append(RcDoc::text("end"))
            }
            Expr::Fun(_, cs) => clause_block(RcDoc::text("fun"), Head::Fun, cs),
            Expr::NamedFun(_, name, cs) => {
                clause_block(RcDoc::text("fun"), Head::Named(name.as_str()), cs)
            }
            Expr::FunRef(_, name, arity) => {
                RcDoc::text(format!("fun {}/{}", atom_text(name), arity))
            }
            Expr::RemoteFunRef(_, m, f, a) => RcDoc::text("fun ")
                .append(m.source_doc())
                .append(RcDoc::text(":"))
                .append(f.source_doc())
                .append(RcDoc::text("/"))
                .append(a.source_doc()),
            Expr::Record(_, b, name, fields) => base(b)
                .append(RcDoc::text(format!("#{}{{", atom_text(name))))
                .append(commas(fields.iter().map(|f| {
                    RcDoc::text(f.name.as_str())
                        .append(RcDoc::text(" = "))
                        .append(f.value.source_doc())
                })))
                .append(RcDoc::text("}")),
            Expr::RecordField(_, record, name, field) => operand(record).append(RcDoc::text(
                format!("#{}.{}", atom_text(name), atom_text(field)),
            )),
            Expr::RecordIndex(_, name, field) => {
                RcDoc::text(format!("#{}.{}", atom_text(name), atom_text(field)))
            }
            Expr::Map(_, b, entries) => base(b)
                .append(RcDoc::text("#{"))
                .append(commas(entries.iter().map(|e| {
                    RcDoc::text(atom_text(&e.key))
                        .append(RcDoc::text(" = "))
                        .append(e.value.source_doc())
                })))
                .append(RcDoc::text("}")),
            // a root-qualified name is written `.name`
            Expr::Field(_, Some(b), field) if b.is_empty_atom() => {
                RcDoc::text(format!(".{}", atom_text(field)))
            }
            Expr::Field(_, b, field) => base(b)
                .append(RcDoc::text("."))
                .append(RcDoc::text(atom_text(field))),
            Expr::Exception(_, class, pattern, stack) => {
                let doc = class
                    .source_doc()
                    .append(RcDoc::text(":"))
                    .append(pattern.source_doc());
                match stack {
                    Some(s) => doc.append(RcDoc::text(":")).append(s.source_doc()),
                    None => doc,
                }
            }
            Expr::Match(_, p, e) => p
                .source_doc()
                .append(RcDoc::text(" = "))
                .append(e.source_doc()),
            Expr::Foreign(_, tag, _) => RcDoc::text(format!("<?{}?>", tag)),
        }
    }
}

impl ToSourceDoc for Form {
    fn source_doc(&self) -> RcDoc<()> {
        match self {
            Form::File(_, name, line) => RcDoc::text(format!("-file({:?}, {}).", name, line)),
            Form::Function(_, name, _, cs) => {
                clauses(Head::Named(name.as_str()), cs).append(RcDoc::text("."))
            }
            Form::Attribute(_, name, value) => {
                RcDoc::text(format!("-{}({}).", atom_text(name), value))
            }
            Form::Eof(_) => RcDoc::nil(),
            Form::Other(value) => RcDoc::text(format!("%% {}", value)),
        }
    }
}
