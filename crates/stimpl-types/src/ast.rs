//! AST node types for the STIMPL language.
//!
//! Trees are built by a program-construction layer (or deserialized from
//! JSON) and borrowed read-only by the evaluator. Recursive children are
//! boxed to keep the enum size reasonable.

use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// A STIMPL expression. Everything, including a whole program, is an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// The unit literal.
    Ren,
    IntLiteral(i64),
    FloatingPointLiteral(f64),
    StringLiteral(String),
    BooleanLiteral(bool),

    /// Read of a variable by name.
    Variable(String),
    /// `variable = value`; declares on first use, reassigns afterwards.
    Assign {
        variable: String,
        value: Box<Expr>,
    },

    /// `left op right`
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Logical negation.
    Not(Box<Expr>),

    /// `if condition { true_branch } else { false_branch }`
    If {
        condition: Box<Expr>,
        true_branch: Box<Expr>,
        false_branch: Box<Expr>,
    },
    /// `while condition { body }`
    While {
        condition: Box<Expr>,
        body: Box<Expr>,
    },

    /// Ordered list of expressions; yields the last one's result.
    Sequence(Vec<Expr>),
    /// Top-level sequence.
    Program(Vec<Expr>),

    /// Emits its operand's value and yields it unchanged.
    Print(Box<Expr>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    // Logical
    And,
    Or,
    // Relational
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Ne,
}

impl BinOp {
    /// Node name, as used in constructor-style rendering and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
            Self::And => "And",
            Self::Or => "Or",
            Self::Lt => "Lt",
            Self::Lte => "Lte",
            Self::Gt => "Gt",
            Self::Gte => "Gte",
            Self::Eq => "Eq",
            Self::Ne => "Ne",
        }
    }

    /// Operator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::And => "and",
            Self::Or => "or",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        }
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Construction helpers
// ══════════════════════════════════════════════════════════════════════════════

impl Expr {
    pub fn ren() -> Self {
        Self::Ren
    }

    pub fn int(n: i64) -> Self {
        Self::IntLiteral(n)
    }

    pub fn float(x: f64) -> Self {
        Self::FloatingPointLiteral(x)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::StringLiteral(s.into())
    }

    pub fn boolean(b: bool) -> Self {
        Self::BooleanLiteral(b)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn assign(variable: impl Into<String>, value: Expr) -> Self {
        Self::Assign {
            variable: variable.into(),
            value: Box::new(value),
        }
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn add(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Add, left, right)
    }

    pub fn sub(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Subtract, left, right)
    }

    pub fn mul(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Multiply, left, right)
    }

    pub fn div(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Divide, left, right)
    }

    pub fn and(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::And, left, right)
    }

    pub fn or(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Or, left, right)
    }

    pub fn lt(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Lt, left, right)
    }

    pub fn lte(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Lte, left, right)
    }

    pub fn gt(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Gt, left, right)
    }

    pub fn gte(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Gte, left, right)
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Eq, left, right)
    }

    pub fn ne(left: Expr, right: Expr) -> Self {
        Self::binary(BinOp::Ne, left, right)
    }

    pub fn not(expr: Expr) -> Self {
        Self::Not(Box::new(expr))
    }

    pub fn if_else(condition: Expr, true_branch: Expr, false_branch: Expr) -> Self {
        Self::If {
            condition: Box::new(condition),
            true_branch: Box::new(true_branch),
            false_branch: Box::new(false_branch),
        }
    }

    pub fn while_loop(condition: Expr, body: Expr) -> Self {
        Self::While {
            condition: Box::new(condition),
            body: Box::new(body),
        }
    }

    pub fn seq(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self::Sequence(exprs.into_iter().collect())
    }

    pub fn program(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self::Program(exprs.into_iter().collect())
    }

    pub fn print(expr: Expr) -> Self {
        Self::Print(Box::new(expr))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Rendering
// ══════════════════════════════════════════════════════════════════════════════

/// Constructor-style rendering, e.g. `Add(IntLiteral(1), Variable(x))`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ren => write!(f, "Ren()"),
            Self::IntLiteral(n) => write!(f, "IntLiteral({n})"),
            Self::FloatingPointLiteral(x) => write!(f, "FloatingPointLiteral({x:?})"),
            Self::StringLiteral(s) => write!(f, "StringLiteral({s:?})"),
            Self::BooleanLiteral(b) => write!(f, "BooleanLiteral({b})"),
            Self::Variable(name) => write!(f, "Variable({name})"),
            Self::Assign { variable, value } => write!(f, "Assign({variable}, {value})"),
            Self::Binary { op, left, right } => write!(f, "{}({left}, {right})", op.name()),
            Self::Not(expr) => write!(f, "Not({expr})"),
            Self::If {
                condition,
                true_branch,
                false_branch,
            } => write!(f, "If({condition}, {true_branch}, {false_branch})"),
            Self::While { condition, body } => write!(f, "While({condition}, {body})"),
            Self::Sequence(exprs) => write_list(f, "Sequence", exprs),
            Self::Program(exprs) => write_list(f, "Program", exprs),
            Self::Print(expr) => write!(f, "Print({expr})"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, exprs: &[Expr]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{expr}")?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested() {
        let e = Expr::assign("x", Expr::add(Expr::int(1), Expr::var("y")));
        assert_eq!(e.to_string(), "Assign(x, Add(IntLiteral(1), Variable(y)))");
    }

    #[test]
    fn test_display_program() {
        let e = Expr::program([Expr::print(Expr::string("hi")), Expr::ren()]);
        assert_eq!(e.to_string(), "Program(Print(StringLiteral(\"hi\")), Ren())");
        assert_eq!(Expr::program([]).to_string(), "Program()");
    }

    #[test]
    fn test_binop_categories() {
        assert!(BinOp::Divide.is_arithmetic());
        assert!(BinOp::Or.is_logical());
        assert!(!BinOp::Ne.is_arithmetic());
        assert!(!BinOp::Lt.is_logical());
        assert_eq!(BinOp::Lte.symbol(), "<=");
    }
}
