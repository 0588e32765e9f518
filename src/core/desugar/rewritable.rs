//! The Rewritable trait

use crate::core::{context::Context, error::RewriteError};
use crate::syntax::ast::*;

/// Parts of the tree which can be rewritten under a context
pub trait Rewritable: Sized {
    fn rewrite(self, ctx: Context) -> Result<Self, RewriteError>;
}

impl<T: Rewritable> Rewritable for Vec<T> {
    fn rewrite(self, ctx: Context) -> Result<Self, RewriteError> {
        self.into_iter().map(|item| item.rewrite(ctx)).collect()
    }
}

impl<T: Rewritable> Rewritable for Option<T> {
    fn rewrite(self, ctx: Context) -> Result<Self, RewriteError> {
        self.map(|item| item.rewrite(ctx)).transpose()
    }
}

impl<T: Rewritable> Rewritable for Box<T> {
    fn rewrite(self, ctx: Context) -> Result<Self, RewriteError> {
        Ok(Box::new((*self).rewrite(ctx)?))
    }
}

/// A clause sets its own contexts whatever it is entered with
impl Rewritable for Clause {
    fn rewrite(self, _ctx: Context) -> Result<Self, RewriteError> {
        let Clause {
            loc,
            patterns,
            guards,
            body,
        } = self;

        let rewrite_parts = || -> Result<Clause, RewriteError> {
            Ok(Clause {
                loc,
                patterns: patterns.rewrite(Context::Pattern)?,
                guards: guards.rewrite(Context::Guard)?,
                body: body.rewrite(Context::Body)?,
            })
        };

        rewrite_parts().map_err(|e| e.within("clause", loc))
    }
}

impl Rewritable for Qualifier {
    fn rewrite(self, ctx: Context) -> Result<Self, RewriteError> {
        Ok(match self {
            Qualifier::Generate(loc, pattern, source) => {
                Qualifier::Generate(loc, pattern.rewrite(ctx)?, source.rewrite(ctx)?)
            }
            Qualifier::BinGenerate(loc, pattern, source) => {
                Qualifier::BinGenerate(loc, pattern.rewrite(ctx)?, source.rewrite(ctx)?)
            }
            Qualifier::Filter(test) => Qualifier::Filter(test.rewrite(ctx)?),
        })
    }
}

impl Rewritable for BinSegment {
    fn rewrite(self, ctx: Context) -> Result<Self, RewriteError> {
        Ok(BinSegment {
            loc: self.loc,
            value: self.value.rewrite(ctx)?,
            size: self.size.rewrite(ctx)?,
            types: self.types,
        })
    }
}

impl Rewritable for FieldEntry {
    fn rewrite(self, ctx: Context) -> Result<Self, RewriteError> {
        Ok(FieldEntry {
            loc: self.loc,
            key: self.key,
            value: self.value.rewrite(ctx)?,
        })
    }
}

impl Rewritable for RecordField {
    fn rewrite(self, ctx: Context) -> Result<Self, RewriteError> {
        Ok(RecordField {
            loc: self.loc,
            name: self.name,
            value: self.value.rewrite(ctx)?,
        })
    }
}

impl Rewritable for After {
    fn rewrite(self, ctx: Context) -> Result<Self, RewriteError> {
        Ok(After {
            timeout: self.timeout.rewrite(ctx)?,
            body: self.body.rewrite(ctx)?,
        })
    }
}
