//! Core expression evaluator.

use crate::config::EvalConfig;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::output::{Output, Stdout};
use std::cmp::Ordering;
use stimpl_types::{BinOp, Expr, Type, Value};

/// Result of evaluating one node: its value (and therefore its type) plus
/// the environment left behind.
#[derive(Debug, Clone)]
pub struct Evaluated {
    pub value: Value,
    pub env: Environment,
}

impl Evaluated {
    pub fn new(value: Value, env: Environment) -> Self {
        Self { value, env }
    }

    pub fn ty(&self) -> Type {
        self.value.ty()
    }
}

/// The core evaluator: walks AST nodes, threading the environment through
/// every child in left-to-right order.
pub struct Evaluator<O: Output = Stdout> {
    /// Receives the text of every `Print`.
    output: O,
    /// Nodes evaluated so far.
    gas: u64,
    /// Step limit; `None` is unlimited.
    gas_limit: Option<u64>,
    debug: bool,
}

impl Evaluator<Stdout> {
    /// Evaluator printing to standard output, with no step limit.
    pub fn new() -> Self {
        Self::with_output(Stdout)
    }
}

impl Default for Evaluator<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Output> Evaluator<O> {
    pub fn with_output(output: O) -> Self {
        Self::with_config(&EvalConfig::default(), output)
    }

    pub fn with_config(config: &EvalConfig, output: O) -> Self {
        Self {
            output,
            gas: 0,
            gas_limit: config.gas_limit,
            debug: config.debug,
        }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    pub fn gas_used(&self) -> u64 {
        self.gas
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Consume one unit of gas. Returns error if a limit is set and exhausted.
    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        match self.gas_limit {
            Some(limit) if self.gas > limit => Err(EvalError::GasExhausted { limit }),
            _ => Ok(()),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Dispatch
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate `expr` in `env`.
    ///
    /// Literals and variable reads return `env` untouched. Any error aborts
    /// the evaluation; there is no partial result.
    pub fn evaluate(&mut self, expr: &Expr, env: Environment) -> EvalResult<Evaluated> {
        self.tick()?;
        match expr {
            Expr::Ren => Ok(Evaluated::new(Value::Unit, env)),
            Expr::IntLiteral(n) => Ok(Evaluated::new(Value::Integer(*n), env)),
            Expr::FloatingPointLiteral(x) => Ok(Evaluated::new(Value::FloatingPoint(*x), env)),
            Expr::StringLiteral(s) => Ok(Evaluated::new(Value::String(s.clone()), env)),
            Expr::BooleanLiteral(b) => Ok(Evaluated::new(Value::Boolean(*b), env)),

            Expr::Print(inner) => self.eval_print(inner, env),
            Expr::Sequence(exprs) | Expr::Program(exprs) => self.eval_sequence(exprs, env),

            Expr::Variable(name) => eval_variable(name, env),
            Expr::Assign { variable, value } => self.eval_assign(variable, value, env),

            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right, env),
            Expr::Not(inner) => self.eval_not(inner, env),

            Expr::If {
                condition,
                true_branch,
                false_branch,
            } => self.eval_if(condition, true_branch, false_branch, env),
            Expr::While { condition, body } => self.eval_while(condition, body, env),
        }
    }

    // ── Observation & Sequencing ─────────────────────────────────────────

    fn eval_print(&mut self, inner: &Expr, env: Environment) -> EvalResult<Evaluated> {
        let result = self.evaluate(inner, env)?;
        match result.value {
            Value::Unit => self.output.emit("Unit"),
            ref value => self.output.emit(&value.to_string()),
        }
        Ok(result)
    }

    fn eval_sequence(&mut self, exprs: &[Expr], env: Environment) -> EvalResult<Evaluated> {
        // An empty body yields Unit.
        let mut result = Evaluated::new(Value::Unit, env);
        for expr in exprs {
            result = self.evaluate(expr, result.env)?;
        }
        Ok(result)
    }

    // ── Variables ────────────────────────────────────────────────────────

    fn eval_assign(
        &mut self,
        variable: &str,
        value: &Expr,
        env: Environment,
    ) -> EvalResult<Evaluated> {
        let Evaluated { value, env } = self.evaluate(value, env)?;

        let established = env.lookup(variable).map(Value::ty);
        if let Some(established) = established {
            if established != value.ty() {
                return Err(EvalError::Type(format!(
                    "Mismatched types for Assignment: Cannot assign {} to {established}",
                    value.ty()
                )));
            }
        }

        tracing::trace!(variable, value = %value, "assign");
        let env = env.extend(variable, value.clone());
        Ok(Evaluated::new(value, env))
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        env: Environment,
    ) -> EvalResult<Evaluated> {
        // Both sides always run, left first, before any type check.
        let Evaluated { value: lv, env } = self.evaluate(left, env)?;
        let Evaluated { value: rv, env } = self.evaluate(right, env)?;
        let value = apply_binary(op, lv, rv)?;
        Ok(Evaluated::new(value, env))
    }

    fn eval_not(&mut self, inner: &Expr, env: Environment) -> EvalResult<Evaluated> {
        let Evaluated { value, env } = self.evaluate(inner, env)?;
        match value {
            Value::Boolean(b) => Ok(Evaluated::new(Value::Boolean(!b), env)),
            _ => Err(EvalError::Type(
                "Cannot perform logical not on a non-boolean operand.".into(),
            )),
        }
    }

    // ── Control Flow ─────────────────────────────────────────────────────

    fn eval_if(
        &mut self,
        condition: &Expr,
        true_branch: &Expr,
        false_branch: &Expr,
        env: Environment,
    ) -> EvalResult<Evaluated> {
        let Evaluated { value, env } = self.evaluate(condition, env)?;
        let Some(holds) = value.as_bool() else {
            return Err(EvalError::Type(
                "Cannot perform conditional on a non-boolean operand.".into(),
            ));
        };
        if holds {
            self.evaluate(true_branch, env)
        } else {
            self.evaluate(false_branch, env)
        }
    }

    fn eval_while(
        &mut self,
        condition: &Expr,
        body: &Expr,
        env: Environment,
    ) -> EvalResult<Evaluated> {
        let Evaluated { value, mut env } = self.evaluate(condition, env)?;
        let mut holds = loop_condition(&value)?;
        let mut iterations: u64 = 0;

        while holds {
            let after_body = self.evaluate(body, env)?;
            let Evaluated { value, env: after_cond } = self.evaluate(condition, after_body.env)?;
            holds = loop_condition(&value)?;
            env = after_cond;
            iterations += 1;
        }

        tracing::trace!(iterations, "while loop finished");
        Ok(Evaluated::new(Value::Boolean(false), env))
    }
}

fn eval_variable(name: &str, env: Environment) -> EvalResult<Evaluated> {
    let value = env
        .lookup(name)
        .cloned()
        .ok_or_else(|| EvalError::Syntax(format!("Cannot read from {name} before assignment.")))?;
    Ok(Evaluated::new(value, env))
}

fn loop_condition(value: &Value) -> EvalResult<bool> {
    value.as_bool().ok_or_else(|| {
        EvalError::Type("Condition expression must have a boolean type".into())
    })
}

// ══════════════════════════════════════════════════════════════════════════
// Operator semantics
// ══════════════════════════════════════════════════════════════════════════

/// Apply a binary operator to two already-evaluated operands.
///
/// Operand types must match before any operator-specific work happens.
pub fn apply_binary(op: BinOp, lv: Value, rv: Value) -> EvalResult<Value> {
    if lv.ty() != rv.ty() {
        return Err(mismatch(op, lv.ty(), rv.ty()));
    }
    if op.is_arithmetic() {
        eval_arithmetic(op, lv, rv)
    } else if op.is_logical() {
        eval_logical(op, &lv, &rv)
    } else {
        eval_relational(op, &lv, &rv)
    }
}

fn mismatch(op: BinOp, l: Type, r: Type) -> EvalError {
    let msg = match op {
        BinOp::Add => format!("Mismatched types for Add: Cannot add {l} to {r}"),
        BinOp::Subtract | BinOp::Multiply | BinOp::Divide => {
            let verb = verb(op);
            format!("Mismatched types for {verb}: Cannot {verb} {l} to {r}")
        }
        BinOp::And => format!("Mismatched types for And: Cannot evaluate {l} and {r}"),
        BinOp::Or => format!("Mismatched types for Or: Cannot evaluate {l} or {r}"),
        _ => format!(
            "Mismatched types for {}: Cannot compare {l} and {r}",
            op.name()
        ),
    };
    EvalError::Type(msg)
}

fn verb(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "add",
        BinOp::Subtract => "subtract",
        BinOp::Multiply => "multiply",
        BinOp::Divide => "divide",
        BinOp::And => "and",
        BinOp::Or => "or",
        _ => "compare",
    }
}

fn eval_arithmetic(op: BinOp, lv: Value, rv: Value) -> EvalResult<Value> {
    if op == BinOp::Divide && rv.is_zero() {
        return Err(EvalError::Math(
            "Math error for divide: Cannot divide by zero".into(),
        ));
    }

    match (lv, rv) {
        (Value::Integer(a), Value::Integer(b)) => {
            let result = match op {
                BinOp::Add => a.checked_add(b),
                BinOp::Subtract => a.checked_sub(b),
                BinOp::Multiply => a.checked_mul(b),
                _ => floor_div(a, b),
            };
            result.map(Value::Integer).ok_or_else(|| {
                EvalError::Math(format!("Math error for {}: integer overflow", verb(op)))
            })
        }
        (Value::FloatingPoint(a), Value::FloatingPoint(b)) => {
            let result = match op {
                BinOp::Add => a + b,
                BinOp::Subtract => a - b,
                BinOp::Multiply => a * b,
                _ => a / b,
            };
            Ok(Value::FloatingPoint(result))
        }
        (Value::String(a), Value::String(b)) if op == BinOp::Add => Ok(Value::String(a + &b)),
        (lv, _) => Err(EvalError::Type(format!("Cannot {} {}s", verb(op), lv.ty()))),
    }
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

fn eval_logical(op: BinOp, lv: &Value, rv: &Value) -> EvalResult<Value> {
    match (lv, rv) {
        (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(if op == BinOp::And {
            *a && *b
        } else {
            *a || *b
        })),
        _ => Err(EvalError::Type(format!(
            "Cannot perform logical {} on non-boolean operands.",
            verb(op)
        ))),
    }
}

fn eval_relational(op: BinOp, lv: &Value, rv: &Value) -> EvalResult<Value> {
    // Unit values are all equal to each other.
    let ordering = match (lv, rv) {
        (Value::Unit, Value::Unit) => Some(Ordering::Equal),
        (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
        (Value::FloatingPoint(a), Value::FloatingPoint(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => a.partial_cmp(b),
        (Value::Boolean(a), Value::Boolean(b)) => a.partial_cmp(b),
        _ => {
            return Err(EvalError::Type(format!(
                "Cannot perform {} on {} type.",
                op.symbol(),
                lv.ty()
            )))
        }
    };

    // An unordered pair (NaN) is only ever "not equal".
    let holds = match op {
        BinOp::Lt => ordering == Some(Ordering::Less),
        BinOp::Lte => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinOp::Gt => ordering == Some(Ordering::Greater),
        BinOp::Gte => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        BinOp::Eq => ordering == Some(Ordering::Equal),
        _ => ordering != Some(Ordering::Equal),
    };
    Ok(Value::Boolean(holds))
}
