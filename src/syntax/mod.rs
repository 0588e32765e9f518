pub mod ast;
pub mod error;
pub mod export;
pub mod loc;
pub mod make;
pub mod read;
