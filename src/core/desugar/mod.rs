//! Desugaring of aggregate syntax into container calls.
//!
//! This:
//! - rewrites aggregate literals `#{k = V}` into `orddict:store` calls
//!   over `orddict:new()`
//! - rewrites updates `Base#{k = V}` into `orddict:store` calls over
//!   the rewritten base
//! - rewrites field access `E.k` into `orddict:fetch`
//!
//! Rules only fire in body context. In patterns and guards the
//! syntax is rebuilt structurally, except a field access in a pattern
//! which has no meaning and is rejected. Every other node is rebuilt
//! from its rewritten children, and a node outside the grammar stops
//! the run.

pub mod dispatch;
pub mod rewritable;
pub mod rewriter;
pub mod rules;
pub mod synth;

pub use rewritable::Rewritable;
pub use rewriter::{transform, Rewriter};
