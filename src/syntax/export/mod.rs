//! Writing forms out again, as interchange JSON or as source text
pub mod json;
pub mod pretty;
