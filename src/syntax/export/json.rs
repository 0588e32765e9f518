//! Write forms back out in the JSON interchange representation.
//!
//! This is the inverse of `syntax::read` for every node it can
//! produce; foreign nodes and uninterpreted forms are written exactly
//! as they were read.
use crate::syntax::ast::*;
use crate::syntax::loc::Loc;
use serde_json::{json, Map, Value};

/// Render a unit as a JSON value
pub fn unit_to_json(forms: &[Form]) -> Value {
    Value::Array(forms.iter().map(form_to_json).collect())
}

/// Render a unit as pretty-printed JSON text
pub fn unit_to_string(forms: &[Form]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&unit_to_json(forms))
}

fn loc(loc: &Loc) -> Value {
    match loc.column() {
        Some(c) => json!([loc.line_no(), c]),
        None => json!(loc.line_no()),
    }
}

pub fn form_to_json(form: &Form) -> Value {
    match form {
        Form::File(l, file, line) => {
            json!({"form": "file", "loc": loc(l), "file": file, "line": line})
        }
        Form::Function(l, name, arity, clauses) => json!({
            "form": "function",
            "loc": loc(l),
            "name": name,
            "arity": arity,
            "clauses": clauses_to_json(clauses),
        }),
        Form::Attribute(l, name, value) => {
            json!({"form": "attribute", "loc": loc(l), "name": name, "value": value})
        }
        Form::Eof(l) => json!({"form": "eof", "loc": loc(l)}),
        Form::Other(value) => value.clone(),
    }
}

fn clauses_to_json(clauses: &[Clause]) -> Value {
    Value::Array(clauses.iter().map(clause_to_json).collect())
}

fn clause_to_json(clause: &Clause) -> Value {
    json!({
        "loc": loc(&clause.loc),
        "patterns": exprs_to_json(&clause.patterns),
        "guards": Value::Array(clause.guards.iter().map(|g| exprs_to_json(g)).collect()),
        "body": exprs_to_json(&clause.body),
    })
}

fn exprs_to_json(exprs: &[Expr]) -> Value {
    Value::Array(exprs.iter().map(expr_to_json).collect())
}

/// Build a node object from a tag, location and further fields
fn node(tag: &str, l: &Loc, fields: Vec<(&str, Value)>) -> Value {
    let mut object = Map::new();
    object.insert("node".to_string(), Value::from(tag));
    object.insert("loc".to_string(), loc(l));
    for (k, v) in fields {
        object.insert(k.to_string(), v);
    }
    Value::Object(object)
}

fn opt_expr(expr: &Option<Box<Expr>>) -> Value {
    expr.as_ref().map(|e| expr_to_json(e)).unwrap_or(Value::Null)
}

pub fn expr_to_json(expr: &Expr) -> Value {
    match expr {
        Expr::Lit(l, lit) => match lit {
            Literal::Atom(a) => node("atom", l, vec![("value", json!(a))]),
            Literal::Integer(i) => node("integer", l, vec![("value", json!(i))]),
            Literal::Float(f) => node("float", l, vec![("value", json!(f))]),
            Literal::Char(c) => node("char", l, vec![("value", json!(c.to_string()))]),
            Literal::Str(s) => node("string", l, vec![("value", json!(s))]),
            Literal::Nil => node("nil", l, vec![]),
        },
        Expr::Var(l, name) => node("var", l, vec![("name", json!(name))]),
        Expr::Tuple(l, es) => node("tuple", l, vec![("elements", exprs_to_json(es))]),
        Expr::Cons(l, h, t) => node(
            "cons",
            l,
            vec![("head", expr_to_json(h)), ("tail", expr_to_json(t))],
        ),
        Expr::Bin(l, segments) => node(
            "bin",
            l,
            vec![(
                "elements",
                Value::Array(segments.iter().map(segment_to_json).collect()),
            )],
        ),
        Expr::BinOp(l, op, left, right) => node(
            "op",
            l,
            vec![
                ("op", json!(op)),
                ("left", expr_to_json(left)),
                ("right", expr_to_json(right)),
            ],
        ),
        Expr::UnOp(l, op, operand) => node(
            "op",
            l,
            vec![("op", json!(op)), ("operand", expr_to_json(operand))],
        ),
        Expr::Call(l, f, args) => node(
            "call",
            l,
            vec![("function", expr_to_json(f)), ("args", exprs_to_json(args))],
        ),
        Expr::Remote(l, m, f) => node(
            "remote",
            l,
            vec![("module", expr_to_json(m)), ("function", expr_to_json(f))],
        ),
        Expr::ListComp(l, t, qs) => node(
            "lc",
            l,
            vec![("template", expr_to_json(t)), ("qualifiers", qualifiers_to_json(qs))],
        ),
        Expr::BinComp(l, t, qs) => node(
            "bc",
            l,
            vec![("template", expr_to_json(t)), ("qualifiers", qualifiers_to_json(qs))],
        ),
        Expr::Block(l, body) => node("block", l, vec![("body", exprs_to_json(body))]),
        Expr::If(l, cs) => node("if", l, vec![("clauses", clauses_to_json(cs))]),
        Expr::Case(l, subject, cs) => node(
            "case",
            l,
            vec![("subject", expr_to_json(subject)), ("clauses", clauses_to_json(cs))],
        ),
        Expr::Try(l, body, cs, handlers, after) => node(
            "try",
            l,
            vec![
                ("body", exprs_to_json(body)),
                ("clauses", clauses_to_json(cs)),
                ("handlers", clauses_to_json(handlers)),
                ("after", exprs_to_json(after)),
            ],
        ),
        Expr::Catch(l, e) => node("catch", l, vec![("expr", expr_to_json(e))]),
        Expr::Receive(l, cs, after) => node(
            "receive",
            l,
            vec![
                ("clauses", clauses_to_json(cs)),
                (
                    "after",
                    match after {
                        Some(After { timeout, body }) => json!({
                            "timeout": expr_to_json(timeout),
                            "body": exprs_to_json(body),
                        }),
                        None => Value::Null,
                    },
                ),
            ],
        ),
        Expr::Fun(l, cs) => node("fun", l, vec![("clauses", clauses_to_json(cs))]),
        Expr::NamedFun(l, name, cs) => node(
            "named_fun",
            l,
            vec![("name", json!(name)), ("clauses", clauses_to_json(cs))],
        ),
        Expr::FunRef(l, name, arity) => node(
            "fun_ref",
            l,
            vec![("name", json!(name)), ("arity", json!(arity))],
        ),
        Expr::RemoteFunRef(l, m, n, a) => node(
            "remote_fun_ref",
            l,
            vec![
                ("module", expr_to_json(m)),
                ("name", expr_to_json(n)),
                ("arity", expr_to_json(a)),
            ],
        ),
        Expr::Record(l, base, name, fields) => node(
            "record",
            l,
            vec![
                ("base", opt_expr(base)),
                ("name", json!(name)),
                (
                    "fields",
                    Value::Array(
                        fields
                            .iter()
                            .map(|f| {
                                json!({"loc": loc(&f.loc), "name": f.name, "value": expr_to_json(&f.value)})
                            })
                            .collect(),
                    ),
                ),
            ],
        ),
        Expr::RecordField(l, record, name, field) => node(
            "record_field",
            l,
            vec![
                ("record", expr_to_json(record)),
                ("name", json!(name)),
                ("field", json!(field)),
            ],
        ),
        Expr::RecordIndex(l, name, field) => node(
            "record_index",
            l,
            vec![("name", json!(name)), ("field", json!(field))],
        ),
        Expr::Map(l, base, entries) => node(
            "map",
            l,
            vec![
                ("base", opt_expr(base)),
                (
                    "entries",
                    Value::Array(
                        entries
                            .iter()
                            .map(|e| {
                                json!({"loc": loc(&e.loc), "key": e.key, "value": expr_to_json(&e.value)})
                            })
                            .collect(),
                    ),
                ),
            ],
        ),
        Expr::Field(l, base, field) => node(
            "field",
            l,
            vec![("base", opt_expr(base)), ("field", json!(field))],
        ),
        Expr::Exception(l, class, pattern, stack) => node(
            "exception",
            l,
            vec![
                ("class", expr_to_json(class)),
                ("pattern", expr_to_json(pattern)),
                ("stack", opt_expr(stack)),
            ],
        ),
        Expr::Match(l, p, e) => node(
            "match",
            l,
            vec![("pattern", expr_to_json(p)), ("expr", expr_to_json(e))],
        ),
        Expr::Foreign(_, _, raw) => raw.clone(),
    }
}

fn qualifiers_to_json(qualifiers: &[Qualifier]) -> Value {
    Value::Array(
        qualifiers
            .iter()
            .map(|q| match q {
                Qualifier::Generate(l, p, s) => json!({
                    "qualifier": "generate",
                    "loc": loc(l),
                    "pattern": expr_to_json(p),
                    "source": expr_to_json(s),
                }),
                Qualifier::BinGenerate(l, p, s) => json!({
                    "qualifier": "b_generate",
                    "loc": loc(l),
                    "pattern": expr_to_json(p),
                    "source": expr_to_json(s),
                }),
                Qualifier::Filter(test) => json!({"qualifier": "filter", "test": expr_to_json(test)}),
            })
            .collect(),
    )
}

fn segment_to_json(segment: &BinSegment) -> Value {
    json!({
        "loc": loc(&segment.loc),
        "value": expr_to_json(&segment.value),
        "size": segment.size.as_ref().map(expr_to_json).unwrap_or(Value::Null),
        "types": segment.types,
    })
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::syntax::read::{read_expr, read_forms};
    use serde_json::json;

    /// A unit touching most of the grammar, written the way a host
    /// would hand it over
    fn sample() -> Value {
        json!([
            {"form": "file", "loc": 1, "file": "sample.src", "line": 1},
            {"form": "attribute", "loc": 2, "name": "module", "value": "sample"},
            {"form": "function", "loc": [4, 1], "name": "go", "arity": 1, "clauses": [
                {"loc": [4, 1],
                 "patterns": [{"node": "match", "loc": 4,
                               "pattern": {"node": "tuple", "loc": 4, "elements": [
                                   {"node": "atom", "loc": 4, "value": "ok"},
                                   {"node": "var", "loc": 4, "name": "V"}]},
                               "expr": {"node": "var", "loc": 4, "name": "T"}}],
                 "guards": [[{"node": "op", "loc": 4, "op": ">",
                              "left": {"node": "var", "loc": 4, "name": "V"},
                              "right": {"node": "integer", "loc": 4, "value": 0}}]],
                 "body": [
                    {"node": "case", "loc": 5,
                     "subject": {"node": "call", "loc": 5,
                                 "function": {"node": "remote", "loc": 5,
                                              "module": {"node": "atom", "loc": 5, "value": "lists"},
                                              "function": {"node": "atom", "loc": 5, "value": "reverse"}},
                                 "args": [{"node": "cons", "loc": 5,
                                           "head": {"node": "char", "loc": 5, "value": "x"},
                                           "tail": {"node": "nil", "loc": 5}}]},
                     "clauses": [{"loc": 6, "patterns": [{"node": "var", "loc": 6, "name": "_"}],
                                  "guards": [],
                                  "body": [{"node": "lc", "loc": 6,
                                            "template": {"node": "var", "loc": 6, "name": "Y"},
                                            "qualifiers": [
                                                {"qualifier": "generate", "loc": 6,
                                                 "pattern": {"node": "var", "loc": 6, "name": "Y"},
                                                 "source": {"node": "string", "loc": 6, "value": "ab"}},
                                                {"qualifier": "filter",
                                                 "test": {"node": "atom", "loc": 6, "value": "true"}}]}]}]},
                    {"node": "try", "loc": 7,
                     "body": [{"node": "float", "loc": 7, "value": 1.5}],
                     "clauses": [],
                     "handlers": [{"loc": 8,
                                   "patterns": [{"node": "exception", "loc": 8,
                                                 "class": {"node": "atom", "loc": 8, "value": "error"},
                                                 "pattern": {"node": "var", "loc": 8, "name": "E"},
                                                 "stack": null}],
                                   "guards": [],
                                   "body": [{"node": "var", "loc": 8, "name": "E"}]}],
                     "after": []},
                    {"node": "bin", "loc": 9, "elements": [
                        {"loc": 9, "value": {"node": "var", "loc": 9, "name": "V"},
                         "size": {"node": "integer", "loc": 9, "value": 8},
                         "types": ["integer", "unit:1"]},
                        {"loc": 9, "value": {"node": "integer", "loc": 9, "value": 1},
                         "size": null, "types": null}]},
                    {"node": "record", "loc": 10, "base": null, "name": "r", "fields": [
                        {"loc": 10, "name": "a", "value": {"node": "integer", "loc": 10, "value": 1}}]},
                    {"node": "receive", "loc": 11, "clauses": [],
                     "after": {"timeout": {"node": "integer", "loc": 11, "value": 0},
                               "body": [{"node": "fun_ref", "loc": 11, "name": "go", "arity": 1}]}},
                    {"node": "zorg", "loc": 12, "whatever": [1, {"x": true}]}
                 ]}
            ]},
            {"form": "eof", "loc": 13}
        ])
    }

    #[test]
    pub fn test_written_unit_reads_back_identically() {
        let value = sample();
        let forms = read_forms(&value).unwrap();
        assert_eq!(unit_to_json(&forms), value);
    }

    #[test]
    pub fn test_field_and_map_nodes() {
        let field = json!({"node": "field", "loc": 3, "base": null, "field": "x"});
        assert_eq!(expr_to_json(&read_expr(&field).unwrap()), field);

        let update = json!({"node": "map", "loc": 3,
                            "base": {"node": "var", "loc": 3, "name": "M"},
                            "entries": [{"loc": [3, 8], "key": "a",
                                         "value": {"node": "integer", "loc": 3, "value": 1}}]});
        assert_eq!(expr_to_json(&read_expr(&update).unwrap()), update);
    }
}
