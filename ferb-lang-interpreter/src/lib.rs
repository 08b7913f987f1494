pub mod environment;
pub mod evaluator;
pub mod object;
pub mod operators;
pub mod output;
mod program;
pub mod thunk;

pub use program::{execute, run, Error, Execution};
