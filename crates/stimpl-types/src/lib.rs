//! Shared types for STIMPL.
//!
//! This crate defines the AST node types and the runtime value and type
//! representations shared by the evaluator and by any program-construction
//! layer that builds trees for it.

pub mod ast;
mod value;

pub use ast::{BinOp, Expr};
pub use value::{Type, Value};
