//! Structural rewriting of expressions
use super::{
    rewritable::Rewritable,
    rules::{self, Outcome},
};
use crate::core::{context::Context, error::RewriteError};
use crate::syntax::{ast::Expr, loc::HasLoc};

impl Rewritable for Expr {
    fn rewrite(self, ctx: Context) -> Result<Self, RewriteError> {
        if let Expr::Foreign(loc, tag, _) = &self {
            let (loc, tag) = (*loc, tag.clone());
            return Err(RewriteError::unsupported(self, ctx).within(&tag, loc));
        }

        let loc = self.loc();
        let kind = self.grammar_kind();
        rewrite_node(self, ctx).map_err(|e| e.within(kind, loc))
    }
}

fn rewrite_node(expr: Expr, ctx: Context) -> Result<Expr, RewriteError> {
    let expr = if ctx.is_body() {
        match rules::desugar(expr)? {
            Outcome::Rewritten(rewritten) => return Ok(rewritten),
            Outcome::Declined(expr) => expr,
        }
    } else {
        expr
    };

    structural(expr, ctx)
}

/// Rebuild the node from its rewritten children.
///
/// Children inherit `ctx` except for the left side of a match, which
/// is a pattern, and clauses, which set their own contexts.
fn structural(expr: Expr, ctx: Context) -> Result<Expr, RewriteError> {
    use self::Expr::*;

    Ok(match expr {
        Lit(..) | Var(..) | FunRef(..) | RecordIndex(..) => expr,
        Tuple(l, elements) => Tuple(l, elements.rewrite(ctx)?),
        Cons(l, head, tail) => Cons(l, head.rewrite(ctx)?, tail.rewrite(ctx)?),
        Bin(l, segments) => Bin(l, segments.rewrite(ctx)?),
        BinOp(l, op, left, right) => BinOp(l, op, left.rewrite(ctx)?, right.rewrite(ctx)?),
        UnOp(l, op, operand) => UnOp(l, op, operand.rewrite(ctx)?),
        Call(l, f, args) => Call(l, f.rewrite(ctx)?, args.rewrite(ctx)?),
        Remote(l, module, function) => Remote(l, module.rewrite(ctx)?, function.rewrite(ctx)?),
        ListComp(l, template, qualifiers) => {
            ListComp(l, template.rewrite(ctx)?, qualifiers.rewrite(ctx)?)
        }
        BinComp(l, template, qualifiers) => {
            BinComp(l, template.rewrite(ctx)?, qualifiers.rewrite(ctx)?)
        }
        Block(l, body) => Block(l, body.rewrite(ctx)?),
        If(l, clauses) => If(l, clauses.rewrite(ctx)?),
        Case(l, subject, clauses) => Case(l, subject.rewrite(ctx)?, clauses.rewrite(ctx)?),
        Try(l, body, clauses, handlers, after) => Try(
            l,
            body.rewrite(ctx)?,
            clauses.rewrite(ctx)?,
            handlers.rewrite(ctx)?,
            after.rewrite(ctx)?,
        ),
        Catch(l, e) => Catch(l, e.rewrite(ctx)?),
        Receive(l, clauses, after) => Receive(l, clauses.rewrite(ctx)?, after.rewrite(ctx)?),
        Fun(l, clauses) => Fun(l, clauses.rewrite(ctx)?),
        NamedFun(l, name, clauses) => NamedFun(l, name, clauses.rewrite(ctx)?),
        RemoteFunRef(l, module, function, arity) => RemoteFunRef(
            l,
            module.rewrite(ctx)?,
            function.rewrite(ctx)?,
            arity.rewrite(ctx)?,
        ),
        Record(l, base, name, fields) => Record(l, base.rewrite(ctx)?, name, fields.rewrite(ctx)?),
        RecordField(l, e, record, field) => RecordField(l, e.rewrite(ctx)?, record, field),
        Map(l, base, entries) => Map(l, base.rewrite(ctx)?, entries.rewrite(ctx)?),
        Field(l, None, name) => return Err(rules::missing_base(l, &name)),
        // no pattern form for a field access in the host grammar, bar
        // the root-qualified name on ''
        Field(l, Some(base), name) if ctx == Context::Pattern && !base.is_empty_atom() => {
            return Err(RewriteError::unsupported(Field(l, Some(base), name), ctx))
        }
        Field(l, base, name) => Field(l, base.rewrite(ctx)?, name),
        Exception(l, class, pattern, stack) => Exception(
            l,
            class.rewrite(ctx)?,
            pattern.rewrite(ctx)?,
            stack.rewrite(ctx)?,
        ),
        Match(l, pattern, e) => Match(l, pattern.rewrite(Context::Pattern)?, e.rewrite(ctx)?),
        Foreign(..) => return Err(RewriteError::unsupported(expr, ctx)),
    })
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::syntax::ast::*;
    use crate::syntax::loc::Loc;
    use crate::syntax::make::*;
    use serde_json::json;

    fn plain() -> Expr {
        Expr::Case(
            Loc::at(2, 5),
            Box::new(call(2, "f", vec![var(2, "X"), string(2, "s")])),
            vec![
                clause(
                    3,
                    vec![tuple(3, vec![atom(3, "ok"), var(3, "V")])],
                    vec![vec![op(3, ">", var(3, "V"), int(3, 0))]],
                    vec![op(4, "+", var(4, "V"), int(4, 1))],
                ),
                clause(
                    5,
                    vec![bind(5, var(5, "Y"), list(5, vec![int(5, 1)]))],
                    vec![],
                    vec![Expr::Catch(
                        Loc::line(6),
                        Box::new(remote_call(6, "lists", "sum", vec![var(6, "Y")])),
                    )],
                ),
            ],
        )
    }

    #[test]
    pub fn test_plain_code_is_unchanged() {
        for ctx in [
            Context::Undefined,
            Context::Body,
            Context::Pattern,
            Context::Guard,
        ] {
            assert_eq!(plain().rewrite(ctx).unwrap(), plain());
        }
    }

    #[test]
    pub fn test_gating_in_guard() {
        let e = op(
            1,
            "andalso",
            map(1, vec![entry(1, "a", int(1, 1))]),
            field(1, var(1, "M"), "a"),
        );
        assert_eq!(e.clone().rewrite(Context::Guard).unwrap(), e);
    }

    #[test]
    pub fn test_map_in_pattern_passes_through() {
        let e = map(1, vec![entry(1, "a", var(1, "A"))]);
        assert_eq!(e.clone().rewrite(Context::Pattern).unwrap(), e);
    }

    #[test]
    pub fn test_field_in_pattern_is_unsupported() {
        let e = tuple(2, vec![field(2, var(2, "M"), "a")]);
        match e.rewrite(Context::Pattern) {
            Err(RewriteError::UnsupportedConstruct { node, context, .. }) => {
                assert_eq!(*node, field(2, var(2, "M"), "a"));
                assert_eq!(context, Context::Pattern);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    pub fn test_match_left_side_is_pattern() {
        // M = #{a = 1} in a body: only the right side is desugared
        let e = bind(
            1,
            map(1, vec![entry(1, "a", var(1, "A"))]),
            map(1, vec![entry(1, "a", int(1, 1))]),
        );
        match e.rewrite(Context::Body).unwrap() {
            Expr::Match(_, left, right) => {
                assert!(matches!(*left, Expr::Map(_, None, _)));
                assert!(matches!(*right, Expr::Call(_, _, _)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    pub fn test_nested_bind_in_pattern_stays_pattern() {
        let e = bind(
            1,
            var(1, "A"),
            bind(1, map(1, vec![]), map(1, vec![entry(1, "k", var(1, "K"))])),
        );
        assert_eq!(e.clone().rewrite(Context::Pattern).unwrap(), e);
    }

    #[test]
    pub fn test_root_qualified_name_passes_through() {
        let e = call(1, "g", vec![field(1, atom(1, ""), "lists")]);
        for ctx in [
            Context::Undefined,
            Context::Body,
            Context::Pattern,
            Context::Guard,
        ] {
            assert_eq!(e.clone().rewrite(ctx).unwrap(), e);
        }
    }

    #[test]
    pub fn test_field_without_base_is_malformed_everywhere() {
        for ctx in [
            Context::Undefined,
            Context::Body,
            Context::Pattern,
            Context::Guard,
        ] {
            let e = Expr::Field(Loc::line(4), None, "foo".to_string());
            match e.rewrite(ctx) {
                Err(RewriteError::Malformed { line, .. }) => assert_eq!(line, 4),
                other => panic!("unexpected {:?} in {:?}", other, ctx),
            }
        }
    }

    #[test]
    pub fn test_field_without_base_in_guard_fails_the_clause() {
        let c = clause(
            3,
            vec![var(3, "X")],
            vec![vec![Expr::Field(Loc::line(3), None, "foo".to_string())]],
            vec![atom(4, "ok")],
        );
        assert!(matches!(
            c.rewrite(Context::Body),
            Err(RewriteError::Malformed { line: 3, .. })
        ));
    }

    #[test]
    pub fn test_foreign_node_fails_with_that_node() {
        let foreign = Expr::Foreign(
            Loc::line(7),
            "zorg".to_string(),
            json!({"node": "zorg", "loc": 7}),
        );
        let e = Expr::Block(Loc::line(6), vec![atom(6, "ok"), foreign.clone()]);
        match e.rewrite(Context::Guard) {
            Err(RewriteError::UnsupportedConstruct {
                node,
                context,
                trail,
            }) => {
                assert_eq!(*node, foreign);
                assert_eq!(context, Context::Guard);
                assert_eq!(trail[0].kind, "zorg");
                assert_eq!(trail[1].kind, "block");
                assert_eq!(trail[1].loc, Loc::line(6));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    pub fn test_exception_pattern_is_rewritten_elementwise() {
        let handler = clause(
            9,
            vec![Expr::Exception(
                Loc::line(9),
                Box::new(atom(9, "error")),
                Box::new(map(9, vec![entry(9, "reason", var(9, "R"))])),
                Some(Box::new(var(9, "S"))),
            )],
            vec![],
            vec![field(10, var(10, "R"), "code")],
        );
        let e = Expr::Try(Loc::line(8), vec![atom(8, "ok")], vec![], vec![handler], vec![]);
        match e.rewrite(Context::Body).unwrap() {
            Expr::Try(_, _, _, handlers, _) => {
                assert!(matches!(
                    &handlers[0].patterns[0],
                    Expr::Exception(_, _, p, Some(_)) if matches!(**p, Expr::Map(..))
                ));
                assert_eq!(
                    handlers[0].body[0],
                    remote_call(10, "orddict", "fetch", vec![atom(10, "code"), var(10, "R")])
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    pub fn test_fun_clauses_reset_context() {
        // a fun inside a guard-context expression still has a body
        let e = Expr::Fun(
            Loc::line(1),
            vec![clause(1, vec![], vec![], vec![map(1, vec![])])],
        );
        match e.rewrite(Context::Guard).unwrap() {
            Expr::Fun(_, clauses) => {
                assert_eq!(clauses[0].body[0], remote_call(1, "orddict", "new", vec![]))
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
