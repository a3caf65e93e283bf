//! STIMPL tree-walking evaluator.
//!
//! Evaluates an AST against a persistent environment chain, checking operand
//! types at every operator application. Each node yields a value, its type,
//! and the environment produced by evaluating it.

mod config;
pub mod env;
mod error;
pub mod evaluator;
pub mod output;
mod runner;

pub use config::EvalConfig;
pub use env::Environment;
pub use error::{ErrorKind, EvalError, EvalResult};
pub use evaluator::{apply_binary, Evaluated, Evaluator};
pub use output::{Output, Stdout};
pub use runner::{load_program, run, run_captured, run_with};
