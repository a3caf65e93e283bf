//! Runtime error types for the STIMPL evaluator.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Evaluation error. Every variant aborts the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum EvalError {
    /// Read of an unassigned variable, or an AST node outside the known set.
    #[error("syntax error: {0}")]
    Syntax(String),
    /// Unsupported operand type(s), mismatched operands, or a reassignment
    /// that changes a variable's established type.
    #[error("type error: {0}")]
    Type(String),
    /// Division by zero or integer overflow.
    #[error("math error: {0}")]
    Math(String),
    /// Configured step limit exceeded.
    #[error("gas exhausted after {limit} steps")]
    GasExhausted { limit: u64 },
}

/// Broad classification of an [`EvalError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Syntax,
    Type,
    Math,
    Resource,
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Syntax(_) => ErrorKind::Syntax,
            Self::Type(_) => ErrorKind::Type,
            Self::Math(_) => ErrorKind::Math,
            Self::GasExhausted { .. } => ErrorKind::Resource,
        }
    }

    /// Structured JSON report for hosts.
    pub fn to_json(&self) -> String {
        // Serializing a string-only enum cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"kind\":\"{}\"}}", self.kind()))
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Type => write!(f, "type"),
            Self::Math => write!(f, "math"),
            Self::Resource => write!(f, "resource"),
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
