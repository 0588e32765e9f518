//! Rewriter drives one compilation run over the top-level forms.
use super::rewritable::Rewritable;
use crate::core::{
    context::Context,
    error::{ErrorInfo, Failure, RewriteError, TransformError, TOOL},
};
use crate::syntax::ast::Form;
use tracing::{debug, warn};

/// File reported against until a file marker is seen
pub const NO_FILE: &str = "nofile";

/// State kept for the duration of one run
#[derive(Debug, Clone, Default)]
pub struct RunState {
    /// Most recent file marker
    file: Option<String>,
}

/// Rewrites the forms of one compilation unit.
///
/// A `Rewriter` owns its run state so separate units may be rewritten
/// concurrently with one `Rewriter` each.
#[derive(Debug, Default)]
pub struct Rewriter {
    state: RunState,
}

impl Rewriter {
    pub fn new() -> Self {
        Rewriter::default()
    }

    /// Start with a file name to report against before any marker
    pub fn for_file<T: AsRef<str>>(name: T) -> Self {
        Rewriter {
            state: RunState {
                file: Some(name.as_ref().to_string()),
            },
        }
    }

    /// The file errors are currently reported against
    pub fn file(&self) -> &str {
        self.state.file.as_deref().unwrap_or(NO_FILE)
    }

    /// Rewrite every form of the unit, preserving their order
    pub fn transform(&mut self, forms: Vec<Form>) -> Result<Vec<Form>, TransformError> {
        forms.into_iter().map(|form| self.form(form)).collect()
    }

    fn form(&mut self, form: Form) -> Result<Form, TransformError> {
        match form {
            Form::File(loc, name, line) => {
                debug!(file = %name, "file marker");
                self.state.file = Some(name.clone());
                Ok(Form::File(loc, name, line))
            }
            Form::Function(loc, name, arity, clauses) => {
                debug!(function = %name, arity, clauses = clauses.len(), "rewriting");
                let clauses = clauses
                    .rewrite(Context::Undefined)
                    .map_err(|e| self.report(e.within(&format!("function {}/{}", name, arity), loc)))?;
                Ok(Form::Function(loc, name, arity, clauses))
            }
            Form::Other(value) => {
                warn!("passing through unrecognised top-level form");
                Ok(Form::Other(value))
            }
            other => Ok(other),
        }
    }

    /// Tag a rewrite failure with the current file
    fn report(&self, error: RewriteError) -> TransformError {
        let file = self.file().to_string();
        match error {
            RewriteError::Malformed { line, message } => TransformError::Failed(Failure {
                file,
                errors: vec![ErrorInfo {
                    line,
                    tool: TOOL,
                    detail: message,
                }],
            }),
            source => TransformError::MissingRule { file, source },
        }
    }
}

/// Rewrite the forms of a unit.
///
/// `options` are the host's compile options; they are accepted for
/// compatibility with the host's transform hook and do not affect the
/// rewrite.
pub fn transform(forms: Vec<Form>, _options: &[String]) -> Result<Vec<Form>, TransformError> {
    Rewriter::new().transform(forms)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::core::rt::{eval_expr, Dict, Value};
    use crate::syntax::ast::{Expr, Literal};
    use crate::syntax::loc::Loc;
    use crate::syntax::make::*;
    use serde_json::json;

    fn body_of(forms: &[Form]) -> &Expr {
        match forms.iter().find(|f| matches!(f, Form::Function(..))) {
            Some(Form::Function(_, _, _, clauses)) => &clauses[0].body[0],
            _ => panic!("no function"),
        }
    }

    fn unit(body: Expr) -> Vec<Form> {
        vec![
            Form::Attribute(Loc::line(1), "module".to_string(), json!("m")),
            function(3, "f", vec![clause(3, vec![], vec![], vec![body])]),
            Form::Eof(Loc::line(9)),
        ]
    }

    #[test]
    pub fn test_plain_unit_is_unchanged() {
        let forms = vec![
            file_marker(1, "a.src"),
            Form::Attribute(Loc::line(1), "export".to_string(), json!([["f", 1]])),
            function(
                3,
                "f",
                vec![
                    clause(3, vec![int(3, 0)], vec![], vec![atom(3, "zero")]),
                    clause(
                        4,
                        vec![var(4, "N")],
                        vec![vec![op(4, ">", var(4, "N"), int(4, 0))]],
                        vec![call(5, "f", vec![op(5, "-", var(5, "N"), int(5, 1))])],
                    ),
                ],
            ),
            Form::Other(json!({"form": "spec", "loc": 2})),
            Form::Eof(Loc::line(6)),
        ];
        assert_eq!(transform(forms.clone(), &[]).unwrap(), forms);
    }

    #[test]
    pub fn test_literal_evaluates_to_inserted_entries() {
        let forms = transform(
            unit(map(
                3,
                vec![entry(3, "a", int(3, 1)), entry(3, "b", op(3, "+", int(3, 1), int(3, 1)))],
            )),
            &[],
        )
        .unwrap();
        let expected = Dict::new()
            .store("a", Value::Integer(1))
            .store("b", Value::Integer(2));
        assert_eq!(eval_expr(body_of(&forms)).unwrap(), Value::Dict(expected));
    }

    #[test]
    pub fn test_last_write_wins() {
        let forms = transform(
            unit(map(3, vec![entry(3, "a", int(3, 1)), entry(4, "a", int(4, 2))])),
            &[],
        )
        .unwrap();
        let body = body_of(&forms);

        // the second entry's store is outermost
        match body {
            Expr::Call(loc, _, args) => {
                assert_eq!(*loc, Loc::line(4));
                assert_eq!(args[1], int(4, 2));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            eval_expr(body).unwrap(),
            Value::Dict(Dict::new().store("a", Value::Integer(2)))
        );
    }

    #[test]
    pub fn test_merge_preserves_base() {
        let base = map(
            3,
            vec![entry(3, "a", int(3, 1)), entry(3, "b", int(3, 2))],
        );
        let forms = transform(
            unit(update(3, base, vec![entry(3, "a", int(3, 10))])),
            &[],
        )
        .unwrap();
        let expected = Dict::new()
            .store("a", Value::Integer(10))
            .store("b", Value::Integer(2));
        assert_eq!(eval_expr(body_of(&forms)).unwrap(), Value::Dict(expected));
    }

    #[test]
    pub fn test_field_fetch() {
        let forms = transform(
            unit(field(
                3,
                map(3, vec![entry(3, "foo", string(3, "bar"))]),
                "foo",
            )),
            &[],
        )
        .unwrap();
        assert_eq!(
            eval_expr(body_of(&forms)).unwrap(),
            Value::Str("bar".to_string())
        );
    }

    #[test]
    pub fn test_field_without_base_fails_in_file() {
        let forms = vec![
            file_marker(1, "foo.src"),
            function(
                3,
                "f",
                vec![clause(
                    3,
                    vec![],
                    vec![],
                    vec![Expr::Field(Loc::line(5), None, "foo".to_string())],
                )],
            ),
        ];
        match transform(forms, &[]) {
            Err(TransformError::Failed(Failure { file, errors })) => {
                assert_eq!(file, "foo.src");
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].line, 5);
                assert_eq!(errors[0].tool, TOOL);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    pub fn test_missing_rule_carries_latest_file() {
        let foreign = Expr::Foreign(Loc::line(12), "zorg".to_string(), json!({"node": "zorg"}));
        let forms = vec![
            file_marker(1, "top.src"),
            function(2, "g", vec![clause(2, vec![], vec![], vec![atom(2, "ok")])]),
            file_marker(10, "foo.src"),
            function(11, "h", vec![clause(11, vec![], vec![], vec![foreign.clone()])]),
        ];
        let err = transform(forms, &[]).unwrap_err();
        assert_eq!(err.file(), "foo.src");
        match err {
            TransformError::MissingRule {
                source: RewriteError::UnsupportedConstruct { node, trail, .. },
                ..
            } => {
                assert_eq!(*node, foreign);
                let kinds: Vec<_> = trail.iter().map(|f| f.kind.as_str()).collect();
                assert_eq!(kinds, vec!["zorg", "clause", "function h/0"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    pub fn test_file_defaults() {
        assert_eq!(Rewriter::new().file(), NO_FILE);

        let mut rewriter = Rewriter::for_file("input.json");
        assert_eq!(rewriter.file(), "input.json");
        rewriter.transform(vec![file_marker(1, "x.src")]).unwrap();
        assert_eq!(rewriter.file(), "x.src");
    }

    #[test]
    pub fn test_options_are_ignored() {
        let forms = unit(map(3, vec![entry(3, "a", Expr::Lit(Loc::line(3), Literal::Nil))]));
        assert_eq!(
            transform(forms.clone(), &["debug_info".to_string()]).unwrap(),
            transform(forms, &[]).unwrap()
        );
    }
}
