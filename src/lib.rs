#![recursion_limit = "256"]

extern crate codespan_reporting;
extern crate indexmap;
extern crate itertools;
extern crate pretty;
extern crate serde_json;
extern crate thiserror;

pub mod core;
pub mod driver;
pub mod syntax;
