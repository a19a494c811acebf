pub mod http;

#[macro_use]
pub mod macros;
pub mod operation;

pub mod sys;
pub mod types;
