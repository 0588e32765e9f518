//! Read a unit of forms from its JSON interchange representation.
//!
//! Forms are objects tagged by `"form"`, expressions are objects
//! tagged by `"node"`. Locations are a line number or a `[line,
//! column]` pair. An expression tag outside the grammar is read as
//! `Expr::Foreign` at exactly that node so that the rewrite can
//! reject it, while an unrecognised top-level form is kept whole as
//! `Form::Other`. A foreign node may omit its location (line 0) but
//! a location it does carry must be well formed.
use crate::syntax::ast::*;
use crate::syntax::error::ReadError;
use crate::syntax::loc::Loc;
use serde_json::{Map, Value};

/// Read a unit from JSON text
pub fn read_unit(text: &str) -> Result<Vec<Form>, ReadError> {
    let value: Value = serde_json::from_str(text)?;
    read_forms(&value)
}

/// Read a unit from a JSON value (a list of forms)
pub fn read_forms(value: &Value) -> Result<Vec<Form>, ReadError> {
    Node::root(value).elements()?.iter().map(form).collect()
}

/// Read a single expression from a JSON value
pub fn read_expr(value: &Value) -> Result<Expr, ReadError> {
    expr(&Node::root(value))
}

/// A JSON value with its path from the root, for error reporting
struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    fn root(value: &'a Value) -> Self {
        Node {
            value,
            path: "$".to_string(),
        }
    }

    fn object(&self) -> Result<&'a Map<String, Value>, ReadError> {
        self.value
            .as_object()
            .ok_or_else(|| ReadError::ExpectedObject(self.path.clone()))
    }

    /// Field of an object, absent or null reads as `None`
    fn opt_field(&self, name: &'static str) -> Result<Option<Node<'a>>, ReadError> {
        Ok(match self.object()?.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some(Node {
                value,
                path: format!("{}.{}", self.path, name),
            }),
        })
    }

    fn field(&self, name: &'static str) -> Result<Node<'a>, ReadError> {
        self.opt_field(name)?
            .ok_or_else(|| ReadError::MissingField(self.path.clone(), name))
    }

    fn elements(&self) -> Result<Vec<Node<'a>>, ReadError> {
        let items = self
            .value
            .as_array()
            .ok_or_else(|| ReadError::ExpectedList(self.path.clone()))?;
        Ok(items
            .iter()
            .enumerate()
            .map(|(i, value)| Node {
                value,
                path: format!("{}[{}]", self.path, i),
            })
            .collect())
    }

    fn str(&self) -> Result<&'a str, ReadError> {
        self.value
            .as_str()
            .ok_or_else(|| ReadError::WrongType(self.path.clone(), "a string"))
    }

    fn string(&self) -> Result<String, ReadError> {
        self.str().map(str::to_string)
    }

    fn i64(&self) -> Result<i64, ReadError> {
        self.value
            .as_i64()
            .ok_or_else(|| ReadError::WrongType(self.path.clone(), "an integer"))
    }

    fn f64(&self) -> Result<f64, ReadError> {
        self.value
            .as_f64()
            .ok_or_else(|| ReadError::WrongType(self.path.clone(), "a number"))
    }

    fn u32(&self) -> Result<u32, ReadError> {
        self.value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| ReadError::WrongType(self.path.clone(), "a non-negative integer"))
    }

    fn usize(&self) -> Result<usize, ReadError> {
        self.value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| ReadError::WrongType(self.path.clone(), "a non-negative integer"))
    }

    fn tag(&self, name: &'static str) -> Result<Option<&'a str>, ReadError> {
        Ok(self.object()?.get(name).and_then(Value::as_str))
    }

    /// Read the location of this node
    fn loc(&self) -> Result<Loc, ReadError> {
        let loc = self.field("loc")?;
        match loc.value {
            Value::Number(_) => loc.u32().map(Loc::line),
            Value::Array(parts) => match parts.as_slice() {
                [line, column] => match (line.as_u64(), column.as_u64()) {
                    (Some(l), Some(c)) => Ok(Loc::at(
                        u32::try_from(l).map_err(|_| ReadError::InvalidLocation(loc.path.clone()))?,
                        u32::try_from(c).map_err(|_| ReadError::InvalidLocation(loc.path.clone()))?,
                    )),
                    _ => Err(ReadError::InvalidLocation(loc.path.clone())),
                },
                _ => Err(ReadError::InvalidLocation(loc.path.clone())),
            },
            _ => Err(ReadError::InvalidLocation(loc.path.clone())),
        }
    }
}

fn form(n: &Node) -> Result<Form, ReadError> {
    let tag = match n.value.as_object() {
        Some(_) => n.tag("form")?,
        None => None,
    };

    match tag {
        Some("file") => Ok(Form::File(
            n.loc()?,
            n.field("file")?.string()?,
            n.field("line")?.u32()?,
        )),
        Some("function") => Ok(Form::Function(
            n.loc()?,
            n.field("name")?.string()?,
            n.field("arity")?.usize()?,
            clauses(&n.field("clauses")?)?,
        )),
        Some("attribute") => Ok(Form::Attribute(
            n.loc()?,
            n.field("name")?.string()?,
            n.opt_field("value")?
                .map(|v| v.value.clone())
                .unwrap_or(Value::Null),
        )),
        Some("eof") => Ok(Form::Eof(n.loc()?)),
        _ => Ok(Form::Other(n.value.clone())),
    }
}

fn clauses(n: &Node) -> Result<Vec<Clause>, ReadError> {
    n.elements()?.iter().map(clause).collect()
}

fn clause(n: &Node) -> Result<Clause, ReadError> {
    Ok(Clause {
        loc: n.loc()?,
        patterns: exprs(&n.field("patterns")?)?,
        guards: match n.opt_field("guards")? {
            Some(gs) => gs.elements()?.iter().map(exprs).collect::<Result<_, _>>()?,
            None => vec![],
        },
        body: exprs(&n.field("body")?)?,
    })
}

fn exprs(n: &Node) -> Result<Vec<Expr>, ReadError> {
    n.elements()?.iter().map(expr).collect()
}

fn boxed(n: &Node, name: &'static str) -> Result<Box<Expr>, ReadError> {
    Ok(Box::new(expr(&n.field(name)?)?))
}

fn opt_boxed(n: &Node, name: &'static str) -> Result<Option<Box<Expr>>, ReadError> {
    n.opt_field(name)?
        .map(|e| expr(&e).map(Box::new))
        .transpose()
}

fn expr(n: &Node) -> Result<Expr, ReadError> {
    let tag = n
        .tag("node")?
        .ok_or_else(|| ReadError::MissingField(n.path.clone(), "node"))?;

    Ok(match tag {
        "atom" => Expr::Lit(n.loc()?, Literal::Atom(n.field("value")?.string()?)),
        "integer" => Expr::Lit(n.loc()?, Literal::Integer(n.field("value")?.i64()?)),
        "float" => Expr::Lit(n.loc()?, Literal::Float(n.field("value")?.f64()?)),
        "char" => {
            let value = n.field("value")?;
            let mut chars = value.str()?.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Expr::Lit(n.loc()?, Literal::Char(c)),
                _ => return Err(ReadError::WrongType(value.path, "a single character")),
            }
        }
        "string" => Expr::Lit(n.loc()?, Literal::Str(n.field("value")?.string()?)),
        "nil" => Expr::Lit(n.loc()?, Literal::Nil),
        "var" => Expr::Var(n.loc()?, n.field("name")?.string()?),
        "tuple" => Expr::Tuple(n.loc()?, exprs(&n.field("elements")?)?),
        "cons" => Expr::Cons(n.loc()?, boxed(n, "head")?, boxed(n, "tail")?),
        "bin" => Expr::Bin(
            n.loc()?,
            n.field("elements")?
                .elements()?
                .iter()
                .map(segment)
                .collect::<Result<_, _>>()?,
        ),
        "op" => {
            let op = n.field("op")?.string()?;
            match n.opt_field("operand")? {
                Some(operand) => Expr::UnOp(n.loc()?, op, Box::new(expr(&operand)?)),
                None => Expr::BinOp(n.loc()?, op, boxed(n, "left")?, boxed(n, "right")?),
            }
        }
        "call" => Expr::Call(n.loc()?, boxed(n, "function")?, exprs(&n.field("args")?)?),
        "remote" => Expr::Remote(n.loc()?, boxed(n, "module")?, boxed(n, "function")?),
        "lc" => Expr::ListComp(
            n.loc()?,
            boxed(n, "template")?,
            qualifiers(&n.field("qualifiers")?)?,
        ),
        "bc" => Expr::BinComp(
            n.loc()?,
            boxed(n, "template")?,
            qualifiers(&n.field("qualifiers")?)?,
        ),
        "block" => Expr::Block(n.loc()?, exprs(&n.field("body")?)?),
        "if" => Expr::If(n.loc()?, clauses(&n.field("clauses")?)?),
        "case" => Expr::Case(n.loc()?, boxed(n, "subject")?, clauses(&n.field("clauses")?)?),
        "try" => Expr::Try(
            n.loc()?,
            exprs(&n.field("body")?)?,
            optional_clauses(n, "clauses")?,
            optional_clauses(n, "handlers")?,
            match n.opt_field("after")? {
                Some(after) => exprs(&after)?,
                None => vec![],
            },
        ),
        "catch" => Expr::Catch(n.loc()?, boxed(n, "expr")?),
        "receive" => Expr::Receive(
            n.loc()?,
            optional_clauses(n, "clauses")?,
            match n.opt_field("after")? {
                Some(after) => Some(After {
                    timeout: boxed(&after, "timeout")?,
                    body: exprs(&after.field("body")?)?,
                }),
                None => None,
            },
        ),
        "fun" => Expr::Fun(n.loc()?, clauses(&n.field("clauses")?)?),
        "named_fun" => Expr::NamedFun(
            n.loc()?,
            n.field("name")?.string()?,
            clauses(&n.field("clauses")?)?,
        ),
        "fun_ref" => Expr::FunRef(
            n.loc()?,
            n.field("name")?.string()?,
            n.field("arity")?.usize()?,
        ),
        "remote_fun_ref" => Expr::RemoteFunRef(
            n.loc()?,
            boxed(n, "module")?,
            boxed(n, "name")?,
            boxed(n, "arity")?,
        ),
        "record" => Expr::Record(
            n.loc()?,
            opt_boxed(n, "base")?,
            n.field("name")?.string()?,
            n.field("fields")?
                .elements()?
                .iter()
                .map(record_field)
                .collect::<Result<_, _>>()?,
        ),
        "record_field" => Expr::RecordField(
            n.loc()?,
            boxed(n, "record")?,
            n.field("name")?.string()?,
            n.field("field")?.string()?,
        ),
        "record_index" => Expr::RecordIndex(
            n.loc()?,
            n.field("name")?.string()?,
            n.field("field")?.string()?,
        ),
        "map" => Expr::Map(
            n.loc()?,
            opt_boxed(n, "base")?,
            n.field("entries")?
                .elements()?
                .iter()
                .map(field_entry)
                .collect::<Result<_, _>>()?,
        ),
        "field" => Expr::Field(n.loc()?, opt_boxed(n, "base")?, n.field("field")?.string()?),
        "exception" => Expr::Exception(
            n.loc()?,
            boxed(n, "class")?,
            boxed(n, "pattern")?,
            opt_boxed(n, "stack")?,
        ),
        "match" => Expr::Match(n.loc()?, boxed(n, "pattern")?, boxed(n, "expr")?),
        other => {
            let loc = match n.opt_field("loc")? {
                Some(_) => n.loc()?,
                None => Loc::default(),
            };
            Expr::Foreign(loc, other.to_string(), n.value.clone())
        }
    })
}

fn optional_clauses(n: &Node, name: &'static str) -> Result<Vec<Clause>, ReadError> {
    match n.opt_field(name)? {
        Some(cs) => clauses(&cs),
        None => Ok(vec![]),
    }
}

fn qualifiers(n: &Node) -> Result<Vec<Qualifier>, ReadError> {
    n.elements()?.iter().map(qualifier).collect()
}

fn qualifier(n: &Node) -> Result<Qualifier, ReadError> {
    match n.tag("qualifier")? {
        Some("generate") => Ok(Qualifier::Generate(
            n.loc()?,
            expr(&n.field("pattern")?)?,
            expr(&n.field("source")?)?,
        )),
        Some("b_generate") => Ok(Qualifier::BinGenerate(
            n.loc()?,
            expr(&n.field("pattern")?)?,
            expr(&n.field("source")?)?,
        )),
        Some("filter") => Ok(Qualifier::Filter(expr(&n.field("test")?)?)),
        Some(other) => Err(ReadError::UnknownQualifier(
            n.path.clone(),
            other.to_string(),
        )),
        None => Err(ReadError::MissingField(n.path.clone(), "qualifier")),
    }
}

fn segment(n: &Node) -> Result<BinSegment, ReadError> {
    Ok(BinSegment {
        loc: n.loc()?,
        value: expr(&n.field("value")?)?,
        size: n.opt_field("size")?.map(|s| expr(&s)).transpose()?,
        types: match n.opt_field("types")? {
            Some(types) => Some(
                types
                    .elements()?
                    .iter()
                    .map(Node::string)
                    .collect::<Result<_, _>>()?,
            ),
            None => None,
        },
    })
}

fn field_entry(n: &Node) -> Result<FieldEntry, ReadError> {
    Ok(FieldEntry {
        loc: n.loc()?,
        key: n.field("key")?.string()?,
        value: expr(&n.field("value")?)?,
    })
}

fn record_field(n: &Node) -> Result<RecordField, ReadError> {
    Ok(RecordField {
        loc: n.loc()?,
        name: n.field("name")?.string()?,
        value: expr(&n.field("value")?)?,
    })
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::syntax::loc::HasLoc;
    use crate::syntax::make::{atom, clause, entry, file_marker, function, int, map, op, var};
    use serde_json::json;

    #[test]
    pub fn test_read_locations() {
        assert_eq!(
            read_expr(&json!({"node": "atom", "loc": 3, "value": "ok"})).unwrap(),
            atom(3, "ok")
        );
        assert_eq!(
            read_expr(&json!({"node": "var", "loc": [3, 9], "name": "X"})).unwrap(),
            Expr::Var(Loc::at(3, 9), "X".to_string())
        );
        assert!(matches!(
            read_expr(&json!({"node": "var", "loc": "3", "name": "X"})),
            Err(ReadError::InvalidLocation(p)) if p == "$.loc"
        ));
    }

    #[test]
    pub fn test_read_function() {
        let unit = json!([
            {"form": "file", "loc": 1, "file": "foo.src", "line": 1},
            {"form": "function", "loc": 4, "name": "f", "arity": 1, "clauses": [
                {"loc": 4,
                 "patterns": [{"node": "var", "loc": 4, "name": "X"}],
                 "guards": [],
                 "body": [{"node": "map", "loc": 5, "entries": [
                     {"loc": 5, "key": "a", "value": {"node": "var", "loc": 5, "name": "X"}}
                 ]}]}
            ]},
            {"form": "eof", "loc": 7}
        ]);

        let forms = read_forms(&unit).unwrap();
        assert_eq!(
            forms,
            vec![
                file_marker(1, "foo.src"),
                function(
                    4,
                    "f",
                    vec![clause(
                        4,
                        vec![var(4, "X")],
                        vec![],
                        vec![map(5, vec![entry(5, "a", var(5, "X"))])]
                    )]
                ),
                Form::Eof(Loc::line(7)),
            ]
        );
    }

    #[test]
    pub fn test_unknown_tag_is_foreign_at_that_node() {
        let value = json!({"node": "tuple", "loc": 2, "elements": [
            {"node": "atom", "loc": 2, "value": "ok"},
            {"node": "zorg", "loc": 2, "payload": [1, 2]}
        ]});

        match read_expr(&value).unwrap() {
            Expr::Tuple(_, elements) => {
                assert_eq!(elements[0], atom(2, "ok"));
                assert_eq!(
                    elements[1],
                    Expr::Foreign(
                        Loc::line(2),
                        "zorg".to_string(),
                        json!({"node": "zorg", "loc": 2, "payload": [1, 2]})
                    )
                );
            }
            other => panic!("expected tuple, got {:?}", other),
        }
    }

    #[test]
    pub fn test_foreign_node_location() {
        assert_eq!(
            read_expr(&json!({"node": "zorg"})).unwrap().loc(),
            Loc::default()
        );
        assert!(matches!(
            read_expr(&json!({"node": "tuple", "loc": 1, "elements": [
                {"node": "zorg", "loc": "seven"}
            ]})),
            Err(ReadError::InvalidLocation(p)) if p == "$.elements[0].loc"
        ));
    }

    #[test]
    pub fn test_unknown_form_passes_whole() {
        let value = json!([{"form": "warning", "loc": 1, "text": "x"}, 42]);
        let forms = read_forms(&value).unwrap();
        assert_eq!(
            forms,
            vec![
                Form::Other(json!({"form": "warning", "loc": 1, "text": "x"})),
                Form::Other(json!(42))
            ]
        );
    }

    #[test]
    pub fn test_missing_field_reports_path() {
        let value = json!([{"form": "function", "loc": 1, "name": "f", "arity": 0, "clauses": [
            {"loc": 1, "patterns": [], "body": [{"node": "call", "loc": 1, "args": []}]}
        ]}]);
        match read_forms(&value) {
            Err(ReadError::MissingField(path, "function")) => {
                assert_eq!(path, "$[0].clauses[0].body[0]")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    pub fn test_unary_and_binary_op() {
        let neg = json!({"node": "op", "loc": 1, "op": "-", "operand": {"node": "integer", "loc": 1, "value": 2}});
        assert_eq!(
            read_expr(&neg).unwrap(),
            Expr::UnOp(Loc::line(1), "-".to_string(), Box::new(int(1, 2)))
        );
        let add = json!({"node": "op", "loc": 1, "op": "+",
                         "left": {"node": "integer", "loc": 1, "value": 1},
                         "right": {"node": "integer", "loc": 1, "value": 2}});
        assert_eq!(read_expr(&add).unwrap(), op(1, "+", int(1, 1), int(1, 2)));
    }

    #[test]
    pub fn test_field_without_base() {
        let value = json!({"node": "field", "loc": 6, "field": "foo"});
        assert_eq!(
            read_expr(&value).unwrap(),
            Expr::Field(Loc::line(6), None, "foo".to_string())
        );
    }
}
