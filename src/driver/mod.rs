//! Command line driver: options, loading, the rewrite pipeline and
//! reporting
pub mod error;
pub mod options;
pub mod rewrite;
pub mod source;
pub mod statistics;
