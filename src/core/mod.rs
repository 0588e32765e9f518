//! The rewrite of a unit and its supporting runtime model
#![allow(clippy::result_large_err)]
pub mod context;
pub mod desugar;
pub mod error;
pub mod rt;
