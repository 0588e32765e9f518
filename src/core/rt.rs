//! Reference runtime for rewritten code.
//!
//! Desugared programs depend on an ordered dictionary module at run
//! time. This is a small model of it together with an evaluator over
//! the expressions that rewriting produces, enough to check what a
//! rewritten tree computes.
use crate::core::desugar::synth::CONTAINER;
use crate::syntax::ast::{Expr, Literal};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use thiserror::Error;

/// Ordered dictionary keyed by atom, later stores overwrite earlier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dict(BTreeMap<String, Value>);

impl Dict {
    pub fn new() -> Self {
        Dict::default()
    }

    /// A copy of this dictionary with `key` mapped to `value`
    pub fn store<K: Into<String>>(mut self, key: K, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn fetch(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

/// Run time values
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Atom(String),
    Integer(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Dict(Dict),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn seq(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            Value::Atom(a) => write!(f, "{}", a),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Tuple(items) => {
                write!(f, "{{")?;
                seq(f, items)?;
                write!(f, "}}")
            }
            Value::List(items) => {
                write!(f, "[")?;
                seq(f, items)?;
                write!(f, "]")
            }
            Value::Dict(dict) => {
                let pairs: Vec<Value> = dict
                    .iter()
                    .map(|(k, v)| Value::Tuple(vec![Value::Atom(k.clone()), v.clone()]))
                    .collect();
                write!(f, "[")?;
                seq(f, &pairs)?;
                write!(f, "]")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("variable {0} is unbound")]
    Unbound(String),
    #[error("no match of right hand side value {0}")]
    BadMatch(String),
    #[error("key {0} not found")]
    BadKey(String),
    #[error("bad argument to {0}")]
    BadArg(String),
    #[error("undefined function {0}")]
    Undefined(String),
    #[error("cannot evaluate {0} node")]
    Unsupported(String),
}

/// Variable bindings
pub type Env = HashMap<String, Value>;

/// Evaluate a closed expression
pub fn eval_expr(expr: &Expr) -> Result<Value, EvalError> {
    eval(expr, &mut Env::new())
}

/// Evaluate `expr`, binding match variables into `env`
pub fn eval(expr: &Expr, env: &mut Env) -> Result<Value, EvalError> {
    match expr {
        Expr::Lit(_, lit) => Ok(literal(lit)),
        Expr::Var(_, name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::Unbound(name.clone())),
        Expr::Tuple(_, items) => Ok(Value::Tuple(
            items
                .iter()
                .map(|e| eval(e, env))
                .collect::<Result<_, _>>()?,
        )),
        Expr::Cons(_, head, tail) => {
            let head = eval(head, env)?;
            match eval(tail, env)? {
                Value::List(mut items) => {
                    items.insert(0, head);
                    Ok(Value::List(items))
                }
                other => Err(EvalError::BadArg(format!("[_|{}]", other))),
            }
        }
        Expr::BinOp(_, op, left, right) => {
            let left = eval(left, env)?;
            let right = eval(right, env)?;
            arithmetic(op, left, right)
        }
        Expr::UnOp(_, op, operand) => match (op.as_str(), eval(operand, env)?) {
            ("-", Value::Integer(n)) => Ok(Value::Integer(n.wrapping_neg())),
            ("-", Value::Float(x)) => Ok(Value::Float(-x)),
            ("+", v @ (Value::Integer(_) | Value::Float(_))) => Ok(v),
            (op, _) => Err(EvalError::BadArg(op.to_string())),
        },
        Expr::Block(_, body) => {
            let mut result = Value::Atom("ok".to_string());
            for e in body {
                result = eval(e, env)?;
            }
            Ok(result)
        }
        Expr::Match(_, pattern, e) => {
            let value = eval(e, env)?;
            match &**pattern {
                Expr::Var(_, name) if name == "_" => Ok(value),
                Expr::Var(_, name) => match env.get(name) {
                    Some(bound) if *bound != value => Err(EvalError::BadMatch(value.to_string())),
                    Some(_) => Ok(value),
                    None => {
                        env.insert(name.clone(), value.clone());
                        Ok(value)
                    }
                },
                other => Err(EvalError::Unsupported(other.kind().to_string())),
            }
        }
        Expr::Call(_, function, args) => match &**function {
            Expr::Remote(_, module, name) => match (module.as_atom(), name.as_atom()) {
                (Some(module), Some(name)) if module == CONTAINER => {
                    let args = args
                        .iter()
                        .map(|a| eval(a, env))
                        .collect::<Result<Vec<_>, _>>()?;
                    container_call(name, args)
                }
                (Some(module), Some(name)) => Err(EvalError::Undefined(format!(
                    "{}:{}/{}",
                    module,
                    name,
                    args.len()
                ))),
                _ => Err(EvalError::Unsupported("call".to_string())),
            },
            _ => Err(EvalError::Unsupported("call".to_string())),
        },
        other => Err(EvalError::Unsupported(other.kind().to_string())),
    }
}

fn literal(lit: &Literal) -> Value {
    match lit {
        Literal::Atom(a) => Value::Atom(a.clone()),
        Literal::Integer(n) => Value::Integer(*n),
        Literal::Float(x) => Value::Float(*x),
        Literal::Char(c) => Value::Integer(*c as i64),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Nil => Value::List(vec![]),
    }
}

fn arithmetic(op: &str, left: Value, right: Value) -> Result<Value, EvalError> {
    use self::Value::*;

    match (op, left, right) {
        ("+", Integer(a), Integer(b)) => Ok(Integer(a.wrapping_add(b))),
        ("-", Integer(a), Integer(b)) => Ok(Integer(a.wrapping_sub(b))),
        ("*", Integer(a), Integer(b)) => Ok(Integer(a.wrapping_mul(b))),
        ("div", Integer(a), Integer(b)) => a
            .checked_div(b)
            .map(Integer)
            .ok_or_else(|| EvalError::BadArg(op.to_string())),
        ("rem", Integer(a), Integer(b)) => a
            .checked_rem(b)
            .map(Integer)
            .ok_or_else(|| EvalError::BadArg(op.to_string())),
        (op, a, b) => match (as_float(&a), as_float(&b)) {
            (Some(x), Some(y)) => match op {
                "+" => Ok(Float(x + y)),
                "-" => Ok(Float(x - y)),
                "*" => Ok(Float(x * y)),
                "/" if y != 0.0 => Ok(Float(x / y)),
                _ => Err(EvalError::BadArg(op.to_string())),
            },
            _ => Err(EvalError::BadArg(op.to_string())),
        },
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(n) => Some(*n as f64),
        Value::Float(x) => Some(*x),
        _ => None,
    }
}

fn container_call(name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
    let signature = || format!("{}:{}/{}", CONTAINER, name, args.len());

    match (name, args.as_slice()) {
        ("new", []) => Ok(Value::Dict(Dict::new())),
        ("store", [Value::Atom(key), value, Value::Dict(dict)]) => {
            Ok(Value::Dict(dict.clone().store(key.clone(), value.clone())))
        }
        ("fetch", [Value::Atom(key), Value::Dict(dict)]) => dict
            .fetch(key)
            .cloned()
            .ok_or_else(|| EvalError::BadKey(key.clone())),
        ("store", [_, _, _]) | ("fetch", [_, _]) => Err(EvalError::BadArg(signature())),
        _ => Err(EvalError::Undefined(signature())),
    }
}
